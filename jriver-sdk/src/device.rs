//! Device registry metadata

use serde::{Deserialize, Serialize};

use mcws_api::ServerInfo;

use crate::DOMAIN;

pub const MANUFACTURER: &str = "JRiver";

/// How the host should group entities into a device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// `(domain, unique id)` pairs
    pub identifiers: Vec<(String, String)>,
    pub manufacturer: String,
    pub model: String,
    pub sw_version: String,
    pub name: String,
}

impl DeviceInfo {
    pub fn new(unique_id: &str, name: impl Into<String>, server_info: &ServerInfo) -> Self {
        Self {
            identifiers: vec![(DOMAIN.to_string(), unique_id.to_string())],
            manufacturer: MANUFACTURER.to_string(),
            model: format!("Media Server - {}", server_info.platform),
            sw_version: server_info.version.clone(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_info_from_server() {
        let info = ServerInfo {
            name: "Library".to_string(),
            platform: "Windows".to_string(),
            version: "31.0.87".to_string(),
        };
        let device = DeviceInfo::new("entry1_player", "media.local Player", &info);

        assert_eq!(device.identifiers, vec![("jriver".to_string(), "entry1_player".to_string())]);
        assert_eq!(device.manufacturer, "JRiver");
        assert_eq!(device.model, "Media Server - Windows");
        assert_eq!(device.sw_version, "31.0.87");
        assert_eq!(device.name, "media.local Player");
    }
}

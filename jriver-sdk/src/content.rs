//! Media content ids
//!
//! Catalog entries carry string ids so the host can hand them back later:
//!
//! - `N|<node id>|<title>` for a browse folder
//! - `K|<key>` for a playable library item
//!
//! Ids are parsed once into [`ContentRef`]; anything else is rejected.

use std::fmt;
use std::str::FromStr;

use crate::error::SdkError;

/// Prefix of ids owned by the host's own media sources
pub const MEDIA_SOURCE_PREFIX: &str = "media-source://";

/// True for ids that belong to the host's media-source system
pub fn is_media_source_id(content_id: &str) -> bool {
    content_id.starts_with(MEDIA_SOURCE_PREFIX)
}

/// A parsed media content id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContentRef {
    /// Browse folder; playing it plays every file below the node
    Folder { node_id: i64, title: String },
    /// Single library item
    Item { key: String },
}

impl ContentRef {
    pub fn folder(node_id: i64, title: impl Into<String>) -> Self {
        ContentRef::Folder {
            node_id,
            title: title.into(),
        }
    }

    pub fn item(key: impl Into<String>) -> Self {
        ContentRef::Item { key: key.into() }
    }

    pub fn parse(content_id: &str) -> Result<Self, SdkError> {
        let invalid = || SdkError::InvalidContentId(content_id.to_string());

        if let Some(rest) = content_id.strip_prefix("N|") {
            let (node_id, title) = rest.split_once('|').ok_or_else(invalid)?;
            let node_id = node_id.parse::<i64>().map_err(|_| invalid())?;
            Ok(ContentRef::folder(node_id, title))
        } else if let Some(key) = content_id.strip_prefix("K|") {
            if key.is_empty() {
                return Err(invalid());
            }
            Ok(ContentRef::item(key))
        } else {
            Err(invalid())
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, ContentRef::Folder { .. })
    }
}

impl FromStr for ContentRef {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentRef::parse(s)
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentRef::Folder { node_id, title } => write!(f, "N|{}|{}", node_id, title),
            ContentRef::Item { key } => write!(f, "K|{}", key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_folder() {
        assert_eq!(
            ContentRef::parse("N|42|Rock").unwrap(),
            ContentRef::folder(42, "Rock")
        );
    }

    #[test]
    fn test_folder_title_may_contain_separator() {
        let parsed = ContentRef::parse("N|7|AC|DC").unwrap();
        assert_eq!(parsed, ContentRef::folder(7, "AC|DC"));
        assert_eq!(parsed.to_string(), "N|7|AC|DC");
    }

    #[test]
    fn test_parse_item() {
        assert_eq!(ContentRef::parse("K|abc123").unwrap(), ContentRef::item("abc123"));
    }

    #[test]
    fn test_rejects_malformed_ids() {
        for id in ["X|bad", "", "N|", "N|42", "N|forty|Rock", "K|", "k|abc", "42"] {
            assert!(
                matches!(ContentRef::parse(id), Err(SdkError::InvalidContentId(ref s)) if s == id),
                "{id:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_media_source_detection() {
        assert!(is_media_source_id("media-source://radio_browser/abc"));
        assert!(!is_media_source_id("K|media-source://x"));
    }

    proptest! {
        #[test]
        fn prop_folder_ids_are_stable(node_id in any::<i64>(), title in "[^\\x00]{0,24}") {
            let content = ContentRef::folder(node_id, title);
            let reparsed = ContentRef::parse(&content.to_string()).unwrap();
            prop_assert_eq!(reparsed, content);
        }

        #[test]
        fn prop_unknown_prefixes_rejected(prefix in "[A-JL-MO-Z]", rest in ".{0,16}") {
            let id = format!("{}|{}", prefix, rest);
            prop_assert!(ContentRef::parse(&id).is_err());
        }
    }
}

//! Values reported by a JRiver Media Center server
//!
//! These mirror what MCWS returns from `Alive`, `Playback/Zones`,
//! `Playback/Info` and `Browse/Children`, already decoded into typed fields.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identity of the connected server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Friendly library/server name
    pub name: String,
    /// Operating system reported by the server (e.g. "Windows", "Linux")
    pub platform: String,
    /// Program version string
    pub version: String,
}

/// An independently controllable playback output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
    /// Whether this is the zone commands target when no zone is given
    #[serde(default)]
    pub active: bool,
}

impl Zone {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            active: false,
        }
    }

    pub fn active(mut self) -> Self {
        self.active = true;
        self
    }
}

/// Playback state as reported by `Playback/Info`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaybackState {
    Stopped,
    Waiting,
    Paused,
    Playing,
}

impl PlaybackState {
    /// Decode the numeric state used on the wire (0-3)
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(PlaybackState::Stopped),
            1 => Some(PlaybackState::Paused),
            2 => Some(PlaybackState::Playing),
            3 => Some(PlaybackState::Waiting),
            _ => None,
        }
    }
}

/// Native media type of a file or view
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    Audio,
    Video,
    Image,
    Tv,
    Playlist,
    Data,
    Other(String),
}

impl FromStr for MediaType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "audio" => MediaType::Audio,
            "video" => MediaType::Video,
            "image" => MediaType::Image,
            "tv" => MediaType::Tv,
            "playlist" => MediaType::Playlist,
            "data" => MediaType::Data,
            _ => MediaType::Other(s.trim().to_string()),
        })
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Audio => write!(f, "Audio"),
            MediaType::Video => write!(f, "Video"),
            MediaType::Image => write!(f, "Image"),
            MediaType::Tv => write!(f, "TV"),
            MediaType::Playlist => write!(f, "Playlist"),
            MediaType::Data => write!(f, "Data"),
            MediaType::Other(other) => write!(f, "{}", other),
        }
    }
}

/// Native media sub type (the `Media Sub Type` library field, or the kind of
/// a browse view)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaSubType {
    Music,
    Audiobook,
    Podcast,
    Radio,
    Album,
    Artist,
    Movie,
    Film,
    Episode,
    Season,
    TvShow,
    MusicVideo,
    Other(String),
}

impl FromStr for MediaSubType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "music" => MediaSubType::Music,
            "audiobook" | "audio book" => MediaSubType::Audiobook,
            "podcast" => MediaSubType::Podcast,
            "radio" => MediaSubType::Radio,
            "album" => MediaSubType::Album,
            "artist" => MediaSubType::Artist,
            "movie" => MediaSubType::Movie,
            "film" => MediaSubType::Film,
            "episode" => MediaSubType::Episode,
            "season" => MediaSubType::Season,
            "tv show" | "tvshow" | "show" => MediaSubType::TvShow,
            "music video" => MediaSubType::MusicVideo,
            _ => MediaSubType::Other(s.trim().to_string()),
        })
    }
}

/// Per-zone playback snapshot from `Playback/Info`
///
/// Everything except `state` may be missing; negative positions and
/// durations mean the server does not know them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackInfo {
    pub state: PlaybackState,
    pub zone_id: Option<String>,
    pub zone_name: Option<String>,
    /// Volume in the range 0.0-1.0
    pub volume: Option<f32>,
    pub muted: Option<bool>,
    pub position_ms: Option<i64>,
    pub duration_ms: Option<i64>,
    /// Playing from a live input; position and duration are meaningless
    #[serde(default)]
    pub live_input: bool,
    pub file_key: Option<String>,
    pub media_type: Option<MediaType>,
    pub media_sub_type: Option<MediaSubType>,
    pub name: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub series: Option<String>,
    pub season: Option<String>,
    pub episode: Option<String>,
    /// Server-relative image path, see [`MediaServer::make_url`](crate::MediaServer::make_url)
    pub image_url: Option<String>,
}

impl PlaybackInfo {
    /// A bare record with only the playback state set
    pub fn new(state: PlaybackState) -> Self {
        Self {
            state,
            zone_id: None,
            zone_name: None,
            volume: None,
            muted: None,
            position_ms: None,
            duration_ms: None,
            live_input: false,
            file_key: None,
            media_type: None,
            media_sub_type: None,
            name: None,
            artist: None,
            album: None,
            album_artist: None,
            series: None,
            season: None,
            episode: None,
            image_url: None,
        }
    }
}

/// What a browse child points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BrowseTarget {
    /// A folder/view that has children of its own
    Node(i64),
    /// A playable file, identified by its library key
    Item(String),
}

/// One entry of a `Browse/Children` listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NativeBrowseChild {
    pub name: String,
    pub target: BrowseTarget,
    pub media_type: Option<MediaType>,
    pub media_sub_type: Option<MediaSubType>,
    pub image_url: Option<String>,
}

impl NativeBrowseChild {
    pub fn node(id: i64, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: BrowseTarget::Node(id),
            media_type: None,
            media_sub_type: None,
            image_url: None,
        }
    }

    pub fn item(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: BrowseTarget::Item(key.into()),
            media_type: None,
            media_sub_type: None,
            image_url: None,
        }
    }

    pub fn with_types(mut self, media_type: MediaType, media_sub_type: MediaSubType) -> Self {
        self.media_type = Some(media_type);
        self.media_sub_type = Some(media_sub_type);
        self
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.target, BrowseTarget::Node(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_parsing_is_case_insensitive() {
        assert_eq!("audio".parse::<MediaType>().unwrap(), MediaType::Audio);
        assert_eq!("TV".parse::<MediaType>().unwrap(), MediaType::Tv);
        assert_eq!(
            "Widget".parse::<MediaType>().unwrap(),
            MediaType::Other("Widget".to_string())
        );
    }

    #[test]
    fn test_sub_type_aliases() {
        assert_eq!("TV Show".parse::<MediaSubType>().unwrap(), MediaSubType::TvShow);
        assert_eq!("Music Video".parse::<MediaSubType>().unwrap(), MediaSubType::MusicVideo);
        assert_eq!("Audio Book".parse::<MediaSubType>().unwrap(), MediaSubType::Audiobook);
    }

    #[test]
    fn test_playback_state_codes() {
        assert_eq!(PlaybackState::from_code(2), Some(PlaybackState::Playing));
        assert_eq!(PlaybackState::from_code(3), Some(PlaybackState::Waiting));
        assert_eq!(PlaybackState::from_code(-1), None);
    }

    #[test]
    fn test_playback_info_json_defaults() {
        let json = r#"{"state":"Paused","zone_id":null,"zone_name":null,"volume":0.25,
            "muted":false,"position_ms":null,"duration_ms":null,"file_key":"17",
            "media_type":null,"media_sub_type":null,"name":null,"artist":null,
            "album":null,"album_artist":null,"series":null,"season":null,
            "episode":null,"image_url":null}"#;
        let info: PlaybackInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.state, PlaybackState::Paused);
        assert!(!info.live_input);
        assert_eq!(info.volume, Some(0.25));
    }
}

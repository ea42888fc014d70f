//! Catalog media types and the translation from server-native types

use std::fmt;

use serde::{Deserialize, Serialize};

use mcws_api::{MediaSubType, MediaType};

/// Media type vocabulary of the host's media catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogMediaType {
    Album,
    Artist,
    Track,
    Movie,
    Episode,
    Season,
    #[serde(rename = "tvshow")]
    TvShow,
    Playlist,
    File,
    Folder,
}

impl CatalogMediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogMediaType::Album => "album",
            CatalogMediaType::Artist => "artist",
            CatalogMediaType::Track => "track",
            CatalogMediaType::Movie => "movie",
            CatalogMediaType::Episode => "episode",
            CatalogMediaType::Season => "season",
            CatalogMediaType::TvShow => "tvshow",
            CatalogMediaType::Playlist => "playlist",
            CatalogMediaType::File => "file",
            CatalogMediaType::Folder => "folder",
        }
    }

    /// Parse a catalog type name, ignoring case
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "album" => Some(CatalogMediaType::Album),
            "artist" => Some(CatalogMediaType::Artist),
            "track" => Some(CatalogMediaType::Track),
            "movie" => Some(CatalogMediaType::Movie),
            "episode" => Some(CatalogMediaType::Episode),
            "season" => Some(CatalogMediaType::Season),
            "tvshow" => Some(CatalogMediaType::TvShow),
            "playlist" => Some(CatalogMediaType::Playlist),
            "file" => Some(CatalogMediaType::File),
            "folder" => Some(CatalogMediaType::Folder),
            _ => None,
        }
    }

    /// Types whose content ids point into the server's browse tree
    pub fn is_library_content(&self) -> bool {
        matches!(
            self,
            CatalogMediaType::Album
                | CatalogMediaType::Artist
                | CatalogMediaType::Track
                | CatalogMediaType::Movie
                | CatalogMediaType::Episode
                | CatalogMediaType::Season
                | CatalogMediaType::TvShow
        )
    }

    /// Translate a native (type, sub type) pair
    ///
    /// Folders always translate, falling back to `Folder`. Items without a
    /// catalog equivalent (images, data, unknown types) return `None`.
    pub fn translate(
        media_type: Option<&MediaType>,
        media_sub_type: Option<&MediaSubType>,
        is_folder: bool,
    ) -> Option<Self> {
        use MediaSubType as S;
        use MediaType as T;

        let translated = match (media_type, media_sub_type) {
            (Some(T::Audio), Some(S::Album)) => Some(CatalogMediaType::Album),
            (Some(T::Audio), Some(S::Artist)) => Some(CatalogMediaType::Artist),
            (Some(T::Audio), _) if !is_folder => Some(CatalogMediaType::Track),
            (Some(T::Video), Some(S::Movie | S::Film)) => Some(CatalogMediaType::Movie),
            (Some(T::Video | T::Tv), Some(S::Episode)) => Some(CatalogMediaType::Episode),
            (Some(T::Video | T::Tv), Some(S::Season)) => Some(CatalogMediaType::Season),
            (Some(T::Video | T::Tv), Some(S::TvShow)) => Some(CatalogMediaType::TvShow),
            (Some(T::Video), _) if !is_folder => Some(CatalogMediaType::File),
            (Some(T::Playlist), _) => Some(CatalogMediaType::Playlist),
            _ => None,
        };

        match translated {
            None if is_folder => Some(CatalogMediaType::Folder),
            other => other,
        }
    }
}

impl fmt::Display for CatalogMediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(MediaType::Audio, MediaSubType::Music, Some(CatalogMediaType::Track))]
    #[case(MediaType::Audio, MediaSubType::Podcast, Some(CatalogMediaType::Track))]
    #[case(MediaType::Audio, MediaSubType::Album, Some(CatalogMediaType::Album))]
    #[case(MediaType::Audio, MediaSubType::Artist, Some(CatalogMediaType::Artist))]
    #[case(MediaType::Video, MediaSubType::Movie, Some(CatalogMediaType::Movie))]
    #[case(MediaType::Video, MediaSubType::Film, Some(CatalogMediaType::Movie))]
    #[case(MediaType::Tv, MediaSubType::Episode, Some(CatalogMediaType::Episode))]
    #[case(MediaType::Video, MediaSubType::Season, Some(CatalogMediaType::Season))]
    #[case(MediaType::Video, MediaSubType::TvShow, Some(CatalogMediaType::TvShow))]
    #[case(MediaType::Video, MediaSubType::MusicVideo, Some(CatalogMediaType::File))]
    #[case(MediaType::Playlist, MediaSubType::Other(String::new()), Some(CatalogMediaType::Playlist))]
    #[case(MediaType::Image, MediaSubType::Other(String::new()), None)]
    #[case(MediaType::Data, MediaSubType::Other(String::new()), None)]
    #[case(MediaType::Other("Widget".into()), MediaSubType::Music, None)]
    fn test_item_translation(
        #[case] media_type: MediaType,
        #[case] sub_type: MediaSubType,
        #[case] expected: Option<CatalogMediaType>,
    ) {
        assert_eq!(
            CatalogMediaType::translate(Some(&media_type), Some(&sub_type), false),
            expected
        );
    }

    #[rstest]
    #[case(Some(MediaType::Audio), Some(MediaSubType::Music), CatalogMediaType::Folder)]
    #[case(Some(MediaType::Audio), Some(MediaSubType::Artist), CatalogMediaType::Artist)]
    #[case(Some(MediaType::Video), Some(MediaSubType::Movie), CatalogMediaType::Movie)]
    #[case(Some(MediaType::Image), None, CatalogMediaType::Folder)]
    #[case(None, None, CatalogMediaType::Folder)]
    fn test_folder_translation(
        #[case] media_type: Option<MediaType>,
        #[case] sub_type: Option<MediaSubType>,
        #[case] expected: CatalogMediaType,
    ) {
        assert_eq!(
            CatalogMediaType::translate(media_type.as_ref(), sub_type.as_ref(), true),
            Some(expected)
        );
    }

    #[test]
    fn test_item_without_types_is_unsupported() {
        assert_eq!(CatalogMediaType::translate(None, None, false), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(CatalogMediaType::from_name("TVShow"), Some(CatalogMediaType::TvShow));
        assert_eq!(CatalogMediaType::from_name("url"), None);
        assert_eq!(CatalogMediaType::TvShow.to_string(), "tvshow");
        assert!(CatalogMediaType::Track.is_library_content());
        assert!(!CatalogMediaType::Playlist.is_library_content());
    }
}

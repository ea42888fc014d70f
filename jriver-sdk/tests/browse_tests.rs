//! Browse resolution against the in-memory media server

use std::sync::Arc;

use async_trait::async_trait;
use mcws_api::testing::FakeMediaServer;
use mcws_api::{MediaServer, MediaSubType, MediaType, NativeBrowseChild};

use jriver_sdk::browse::LIBRARY_CONTENT_TYPE;
use jriver_sdk::{
    BrowseCursor, BrowseNode, BrowsePath, BrowseResolver, ContentRef, MediaSourceBrowser, SdkError,
};

// ============================================================================
// Test Helpers
// ============================================================================

fn library() -> Arc<FakeMediaServer> {
    Arc::new(
        FakeMediaServer::new()
            .with_children(
                None,
                vec![
                    NativeBrowseChild::node(1, "Audio"),
                    NativeBrowseChild::node(2, "Video"),
                    NativeBrowseChild::item("stray", "Loose File")
                        .with_types(MediaType::Audio, MediaSubType::Music),
                ],
            )
            .with_children(
                Some(1),
                vec![
                    NativeBrowseChild::node(10, "Artist")
                        .with_types(MediaType::Audio, MediaSubType::Artist),
                    NativeBrowseChild::node(11, "Album")
                        .with_types(MediaType::Audio, MediaSubType::Album),
                ],
            )
            .with_children(
                Some(42),
                vec![
                    NativeBrowseChild::node(420, "Live"),
                    NativeBrowseChild::item("k1", "Song").with_types(MediaType::Audio, MediaSubType::Music),
                    NativeBrowseChild::item("k2", "Cover").with_types(MediaType::Image, MediaSubType::Other(String::new())),
                    NativeBrowseChild::item("k3", "Clip").with_types(MediaType::Video, MediaSubType::Movie),
                ],
            )
            .with_children(
                Some(77),
                vec![NativeBrowseChild::item("img", "Photo")
                    .with_types(MediaType::Image, MediaSubType::Other(String::new()))],
            ),
    )
}

fn resolver(fake: &Arc<FakeMediaServer>, paths: &[&str]) -> BrowseResolver {
    let client: Arc<dyn MediaServer> = fake.clone();
    let paths = paths.iter().map(|p| BrowsePath::parse(p).unwrap()).collect();
    BrowseResolver::new(client, "Test Library", paths)
}

fn ids(node: &BrowseNode) -> Vec<&str> {
    node.children.iter().map(|c| c.media_content_id.as_str()).collect()
}

struct RadioSource;

#[async_trait]
impl MediaSourceBrowser for RadioSource {
    async fn browse(&self, content_id: &str) -> jriver_sdk::Result<BrowseNode> {
        Ok(BrowseNode {
            title: "Radio".to_string(),
            media_content_type: "app".to_string(),
            media_content_id: content_id.to_string(),
            can_play: false,
            can_expand: true,
            thumbnail: None,
            children: Vec::new(),
            has_supported_leaves: false,
        })
    }

    async fn resolve_media(&self, _content_id: &str) -> jriver_sdk::Result<String> {
        Ok("http://radio.example/stream.mp3".to_string())
    }
}

// ============================================================================
// Folder and item cursors
// ============================================================================

#[tokio::test]
async fn test_folder_cursor_queries_node() {
    let fake = library();
    let resolver = resolver(&fake, &[]);

    let (node, supported) = resolver
        .resolve(Some(&BrowseCursor::new("album", "N|42|Rock")))
        .await
        .unwrap();

    let queried = fake.calls_to("get_browse_children");
    assert_eq!(queried.len(), 1);
    assert_eq!(queried[0].args, vec!["42"]);

    assert!(supported);
    assert_eq!(node.title, "Rock");
    assert_eq!(node.media_content_id, "N|42|Rock");
    assert_eq!(node.media_content_type, "album");
    assert!(node.can_expand);
    assert!(node.has_supported_leaves);
}

#[tokio::test]
async fn test_folder_children_are_translated_and_filtered() {
    let fake = library();
    let resolver = resolver(&fake, &[]);

    let (node, _) = resolver
        .resolve(Some(&BrowseCursor::new("folder", "N|42|Rock")))
        .await
        .unwrap();

    // The image item has no catalog equivalent; server order is kept
    assert_eq!(ids(&node), vec!["N|420|Live", "K|k1", "K|k3"]);

    let live = &node.children[0];
    assert_eq!(live.media_content_type, "folder");
    assert!(live.can_expand && live.can_play);
    assert!(live.children.is_empty());

    let song = &node.children[1];
    assert_eq!(song.media_content_type, "track");
    assert!(song.can_play && !song.can_expand);

    assert_eq!(node.children[2].media_content_type, "movie");
}

#[tokio::test]
async fn test_folder_with_only_unsupported_children() {
    let fake = library();
    let resolver = resolver(&fake, &[]);

    let (node, supported) = resolver
        .resolve(Some(&BrowseCursor::new("folder", "N|77|Photos")))
        .await
        .unwrap();

    assert!(!supported);
    assert!(node.children.is_empty());
}

#[tokio::test]
async fn test_item_cursor_is_a_leaf() {
    let fake = library();
    let resolver = resolver(&fake, &[]);

    let (node, supported) = resolver
        .resolve(Some(&BrowseCursor::new("track", "K|abc123")))
        .await
        .unwrap();

    assert!(!supported);
    assert!(node.children.is_empty());
    assert!(!node.has_supported_leaves);
    assert!(!node.can_expand);
    assert_eq!(node.media_content_id, "K|abc123");
    assert!(fake.calls_to("get_browse_children").is_empty());
}

#[tokio::test]
async fn test_malformed_cursor_is_rejected() {
    let fake = library();
    let resolver = resolver(&fake, &[]);

    let result = resolver.resolve(Some(&BrowseCursor::new("album", "X|bad"))).await;

    assert!(matches!(result, Err(SdkError::InvalidContentId(ref id)) if id == "X|bad"));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_rejected_node_is_not_found() {
    let fake = library();
    let resolver = resolver(&fake, &[]);

    let result = resolver.resolve(Some(&BrowseCursor::new("album", "N|999|Gone"))).await;

    match result {
        Err(SdkError::BrowseNotFound {
            content_type,
            content_id,
        }) => {
            assert_eq!(content_type, "album");
            assert_eq!(content_id, "N|999|Gone");
        }
        other => panic!("expected BrowseNotFound, got {:?}", other.map(|(n, _)| n)),
    }
}

#[tokio::test]
async fn test_connection_failure_propagates() {
    let fake = library();
    let resolver = resolver(&fake, &[]);
    fake.set_failure(Some(mcws_api::ApiError::Connectivity("down".into())));

    let result = resolver.resolve(Some(&BrowseCursor::new("album", "N|42|Rock"))).await;

    assert!(matches!(result, Err(SdkError::Api(ref err)) if err.is_connection_failure()));
}

// ============================================================================
// Root
// ============================================================================

#[tokio::test]
async fn test_root_lists_configured_paths() {
    let fake = library();
    let resolver = resolver(&fake, &["Audio/Album", "audio / ARTIST", "Audio/Podcasts"]);

    let (root, supported) = resolver.resolve(None).await.unwrap();

    assert!(supported);
    assert_eq!(root.title, "Test Library");
    assert_eq!(root.media_content_type, LIBRARY_CONTENT_TYPE);
    assert_eq!(root.media_content_id, "");
    assert!(!root.can_play);

    // Unresolvable paths are skipped, titles come from the configured path
    assert_eq!(ids(&root), vec!["N|11|Album", "N|10|ARTIST"]);
    assert_eq!(root.children[0].media_content_type, "album");
    assert_eq!(root.children[1].media_content_type, "artist");
    assert!(root.children.iter().all(|c| c.children.is_empty()));
}

#[tokio::test]
async fn test_root_without_paths_lists_top_level_folders() {
    let fake = library();
    let resolver = resolver(&fake, &[]);

    let (root, _) = resolver.resolve(None).await.unwrap();

    assert_eq!(ids(&root), vec!["N|1|Audio", "N|2|Video"]);
}

#[tokio::test]
async fn test_root_falls_back_when_no_path_resolves() {
    let fake = library();
    let resolver = resolver(&fake, &["Pictures/Holidays"]);

    let (root, _) = resolver.resolve(None).await.unwrap();

    assert_eq!(ids(&root), vec!["N|1|Audio", "N|2|Video"]);
}

#[tokio::test]
async fn test_root_without_folders_is_not_found() {
    let fake = Arc::new(FakeMediaServer::new().with_children(
        None,
        vec![NativeBrowseChild::item("stray", "Loose File").with_types(MediaType::Audio, MediaSubType::Music)],
    ));
    let resolver = resolver(&fake, &["Audio/Album"]);

    let result = resolver.resolve(None).await;

    assert!(matches!(
        result,
        Err(SdkError::BrowseNotFound { ref content_type, .. }) if content_type == LIBRARY_CONTENT_TYPE
    ));
}

#[tokio::test]
async fn test_walk_skips_items_named_like_the_segment() {
    let fake = Arc::new(
        FakeMediaServer::new()
            .with_children(
                None,
                vec![
                    NativeBrowseChild::item("a", "Audio").with_types(MediaType::Audio, MediaSubType::Music),
                    NativeBrowseChild::node(1, "Audio"),
                ],
            )
            .with_children(
                Some(1),
                vec![NativeBrowseChild::node(11, "Album").with_types(MediaType::Audio, MediaSubType::Album)],
            ),
    );
    let resolver = resolver(&fake, &["Audio/Album"]);

    let (root, _) = resolver.resolve(None).await.unwrap();

    assert_eq!(ids(&root), vec!["N|11|Album"]);
}

#[tokio::test]
async fn test_root_ids_round_trip() {
    let fake = library();
    let resolver = resolver(&fake, &["Audio/Album"]);

    let (root, _) = resolver.resolve(None).await.unwrap();
    let content = ContentRef::parse(&root.children[0].media_content_id).unwrap();

    assert_eq!(content, ContentRef::folder(11, "Album"));
}

#[tokio::test]
async fn test_thumbnails_use_server_urls() {
    let mut child = NativeBrowseChild::item("k1", "Song").with_types(MediaType::Audio, MediaSubType::Music);
    child.image_url = Some("File/GetImage?File=k1".to_string());
    let fake = Arc::new(FakeMediaServer::new().with_children(Some(5), vec![child]));
    let resolver = resolver(&fake, &[]);

    let (node, _) = resolver
        .resolve(Some(&BrowseCursor::new("folder", "N|5|Songs")))
        .await
        .unwrap();

    assert_eq!(
        node.children[0].thumbnail.as_deref(),
        Some("http://fake-mcws:52199/MCWS/v1/File/GetImage?File=k1")
    );
}

// ============================================================================
// Media sources
// ============================================================================

#[tokio::test]
async fn test_media_source_ids_are_delegated() {
    let fake = library();
    let resolver = resolver(&fake, &[]).with_media_source(Arc::new(RadioSource));

    let (node, supported) = resolver
        .resolve(Some(&BrowseCursor::new("app", "media-source://radio_browser")))
        .await
        .unwrap();

    assert!(supported);
    assert_eq!(node.title, "Radio");
    assert_eq!(node.media_content_id, "media-source://radio_browser");
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_media_source_without_browser_is_not_found() {
    let fake = library();
    let resolver = resolver(&fake, &[]);

    let result = resolver
        .resolve(Some(&BrowseCursor::new("app", "media-source://radio_browser")))
        .await;

    assert!(matches!(result, Err(SdkError::BrowseNotFound { .. })));
}

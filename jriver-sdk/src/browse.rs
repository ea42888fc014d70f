//! Media browsing
//!
//! [`BrowseResolver`] materializes one level of the server's browse tree as
//! catalog [`BrowseNode`]s. Nothing is cached; every call asks the server.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use mcws_api::{ApiError, BrowseTarget, MediaServer, NativeBrowseChild};

use crate::content::{is_media_source_id, ContentRef};
use crate::error::{Result, SdkError};
use crate::media_type::CatalogMediaType;

/// Content type of the synthetic root node
pub const LIBRARY_CONTENT_TYPE: &str = "library";

/// A configured browse root such as `Audio/Artist`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BrowsePath {
    segments: Vec<String>,
}

impl BrowsePath {
    pub fn parse(raw: &str) -> Result<Self> {
        let segments: Vec<String> = raw
            .split('/')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        if segments.is_empty() {
            return Err(SdkError::Config(format!("empty browse path {:?}", raw)));
        }

        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Display title, the last segment
    pub fn title(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or_default()
    }
}

impl FromStr for BrowsePath {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self> {
        BrowsePath::parse(s)
    }
}

impl TryFrom<String> for BrowsePath {
    type Error = SdkError;

    fn try_from(value: String) -> Result<Self> {
        BrowsePath::parse(&value)
    }
}

impl From<BrowsePath> for String {
    fn from(path: BrowsePath) -> Self {
        path.to_string()
    }
}

impl fmt::Display for BrowsePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// One node of the media catalog handed to the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowseNode {
    pub title: String,
    pub media_content_type: String,
    pub media_content_id: String,
    pub can_play: bool,
    pub can_expand: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    /// Only the requested level; grandchildren are never filled in
    #[serde(default)]
    pub children: Vec<BrowseNode>,
    #[serde(default)]
    pub has_supported_leaves: bool,
}

impl BrowseNode {
    pub fn folder(media_type: CatalogMediaType, content: &ContentRef, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            media_content_type: media_type.to_string(),
            media_content_id: content.to_string(),
            can_play: true,
            can_expand: true,
            thumbnail: None,
            children: Vec::new(),
            has_supported_leaves: false,
        }
    }

    pub fn leaf(media_type: impl Into<String>, content: &ContentRef, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            media_content_type: media_type.into(),
            media_content_id: content.to_string(),
            can_play: true,
            can_expand: false,
            thumbnail: None,
            children: Vec::new(),
            has_supported_leaves: false,
        }
    }

    pub fn with_thumbnail(mut self, thumbnail: Option<String>) -> Self {
        self.thumbnail = thumbnail;
        self
    }
}

/// Position in the catalog the host asks about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseCursor {
    pub content_type: String,
    pub content_id: String,
}

impl BrowseCursor {
    pub fn new(content_type: impl Into<String>, content_id: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            content_id: content_id.into(),
        }
    }
}

/// The host's own media sources, reached through `media-source://` ids
#[async_trait]
pub trait MediaSourceBrowser: Send + Sync {
    async fn browse(&self, content_id: &str) -> Result<BrowseNode>;

    /// Resolve a media-source id to a URL the server can play
    async fn resolve_media(&self, content_id: &str) -> Result<String>;
}

/// Builds catalog nodes from the server's browse tree
pub struct BrowseResolver {
    client: Arc<dyn MediaServer>,
    server_name: String,
    paths: Vec<BrowsePath>,
    media_source: Option<Arc<dyn MediaSourceBrowser>>,
}

impl BrowseResolver {
    pub fn new(client: Arc<dyn MediaServer>, server_name: impl Into<String>, paths: Vec<BrowsePath>) -> Self {
        Self {
            client,
            server_name: server_name.into(),
            paths,
            media_source: None,
        }
    }

    pub fn with_media_source(mut self, media_source: Arc<dyn MediaSourceBrowser>) -> Self {
        self.media_source = Some(media_source);
        self
    }

    pub fn paths(&self) -> &[BrowsePath] {
        &self.paths
    }

    pub fn media_source(&self) -> Option<&Arc<dyn MediaSourceBrowser>> {
        self.media_source.as_ref()
    }

    /// Resolve one level of the catalog
    ///
    /// Returns the node and whether any of its children are supported.
    /// `None` yields the synthetic root, which is never empty: a server with
    /// no top-level folders reports [`SdkError::BrowseNotFound`].
    pub async fn resolve(&self, cursor: Option<&BrowseCursor>) -> Result<(BrowseNode, bool)> {
        let Some(cursor) = cursor else {
            return self.resolve_root().await;
        };

        if is_media_source_id(&cursor.content_id) {
            let source = self.media_source.as_ref().ok_or_else(|| {
                SdkError::browse_not_found(&cursor.content_type, &cursor.content_id)
            })?;
            let node = source.browse(&cursor.content_id).await?;
            return Ok((node, true));
        }

        let content = ContentRef::parse(&cursor.content_id)?;
        let (node_id, title) = match &content {
            ContentRef::Folder { node_id, title } => (*node_id, title.clone()),
            ContentRef::Item { key } => {
                let leaf = BrowseNode::leaf(cursor.content_type.clone(), &content, key.clone());
                return Ok((leaf, false));
            }
        };

        let listed = self
            .list_children(Some(node_id))
            .await?
            .ok_or_else(|| SdkError::browse_not_found(&cursor.content_type, &cursor.content_id))?;

        let children: Vec<BrowseNode> = listed.iter().filter_map(|c| self.child_node(c)).collect();
        let has_supported = !children.is_empty();

        debug!(
            node_id,
            listed = listed.len(),
            kept = children.len(),
            "Resolved browse folder"
        );

        let node = BrowseNode {
            title,
            media_content_type: cursor.content_type.clone(),
            media_content_id: content.to_string(),
            can_play: true,
            can_expand: true,
            thumbnail: None,
            children,
            has_supported_leaves: has_supported,
        };

        Ok((node, has_supported))
    }

    async fn resolve_root(&self) -> Result<(BrowseNode, bool)> {
        let mut children = Vec::new();

        for path in &self.paths {
            match self.walk(path).await? {
                Some(child) => children.push(child),
                None => warn!(path = %path, "Browse path not found on server, skipping"),
            }
        }

        if children.is_empty() {
            let top_level = self.list_children(None).await?.unwrap_or_default();
            children = top_level
                .iter()
                .filter(|c| c.is_folder())
                .filter_map(|c| self.child_node(c))
                .collect();
        }

        if children.is_empty() {
            return Err(SdkError::browse_not_found(LIBRARY_CONTENT_TYPE, ""));
        }

        let root = BrowseNode {
            title: self.server_name.clone(),
            media_content_type: LIBRARY_CONTENT_TYPE.to_string(),
            media_content_id: String::new(),
            can_play: false,
            can_expand: true,
            thumbnail: None,
            children,
            has_supported_leaves: true,
        };

        Ok((root, true))
    }

    /// Follow `path` from the top level by folder name
    async fn walk(&self, path: &BrowsePath) -> Result<Option<BrowseNode>> {
        let mut parent = None;
        let mut found = None;

        for segment in path.segments() {
            let Some(children) = self.list_children(parent).await? else {
                return Ok(None);
            };

            let matched = children.into_iter().find_map(|child| match child.target {
                BrowseTarget::Node(node_id) if child.name.trim().eq_ignore_ascii_case(segment) => {
                    Some((node_id, child))
                }
                _ => None,
            });

            let Some((node_id, child)) = matched else {
                return Ok(None);
            };
            parent = Some(node_id);
            found = Some((node_id, child));
        }

        Ok(found.map(|(node_id, child)| {
            let media_type =
                CatalogMediaType::translate(child.media_type.as_ref(), child.media_sub_type.as_ref(), true)
                    .unwrap_or(CatalogMediaType::Folder);
            let content = ContentRef::folder(node_id, path.title());
            BrowseNode::folder(media_type, &content, path.title()).with_thumbnail(self.thumbnail(&child))
        }))
    }

    /// `None` when the server rejects the node
    async fn list_children(&self, node_id: Option<i64>) -> Result<Option<Vec<NativeBrowseChild>>> {
        match self.client.get_browse_children(node_id).await {
            Ok(children) => Ok(Some(children)),
            Err(ApiError::InvalidParameter(reason)) => {
                debug!(?node_id, %reason, "Server rejected browse node");
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn child_node(&self, child: &NativeBrowseChild) -> Option<BrowseNode> {
        let media_type = CatalogMediaType::translate(
            child.media_type.as_ref(),
            child.media_sub_type.as_ref(),
            child.is_folder(),
        )?;

        let node = match &child.target {
            BrowseTarget::Node(node_id) => {
                BrowseNode::folder(media_type, &ContentRef::folder(*node_id, &child.name), &child.name)
            }
            BrowseTarget::Item(key) => {
                BrowseNode::leaf(media_type.as_str(), &ContentRef::item(key), &child.name)
            }
        };

        Some(node.with_thumbnail(self.thumbnail(child)))
    }

    fn thumbnail(&self, child: &NativeBrowseChild) -> Option<String> {
        child
            .image_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .map(|url| self.client.make_url(url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browse_path_segments() {
        let path = BrowsePath::parse(" Audio / Artist/ ").unwrap();
        assert_eq!(path.segments(), ["Audio", "Artist"]);
        assert_eq!(path.title(), "Artist");
        assert_eq!(path.to_string(), "Audio/Artist");
    }

    #[test]
    fn test_empty_browse_path_is_rejected() {
        for raw in ["", "/", " / / "] {
            assert!(matches!(BrowsePath::parse(raw), Err(SdkError::Config(_))));
        }
    }

    #[test]
    fn test_browse_path_serde() {
        let paths: Vec<BrowsePath> = serde_json::from_str(r#"["Audio/Album", "Video"]"#).unwrap();
        assert_eq!(paths[0].title(), "Album");
        assert_eq!(serde_json::to_string(&paths).unwrap(), r#"["Audio/Album","Video"]"#);
        assert!(serde_json::from_str::<BrowsePath>(r#""  ""#).is_err());
    }

    #[test]
    fn test_node_serialization_skips_missing_thumbnail() {
        let node = BrowseNode::leaf("track", &ContentRef::item("7"), "Song");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["media_content_id"], "K|7");
        assert!(json.get("thumbnail").is_none());
    }
}

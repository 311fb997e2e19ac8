//! Asset types flowing through the capture pipeline
//!
//! A [`RawAsset`] is what the platform hands back from a capture or pick.
//! An [`ImageAsset`] is the canonical, immutable unit stored in a
//! collection once the raw asset has been encoded.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

/// Prefix of the canonical payload produced on native platforms
pub const JPEG_DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

/// Where an image was acquired from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Taken with the device camera
    Camera,
    /// Selected from the media library
    Library,
}

impl Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Camera => write!(f, "camera"),
            SourceKind::Library => write!(f, "library"),
        }
    }
}

/// Reference to an acquired asset as reported by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetReference {
    /// A file on the local device (native platforms)
    LocalFile(PathBuf),
    /// An inline or browser-local URI (`data:` or `blob:`)
    Uri(String),
}

impl AssetReference {
    /// Render the reference as a string
    pub fn as_uri(&self) -> String {
        match self {
            AssetReference::LocalFile(path) => path.to_string_lossy().into_owned(),
            AssetReference::Uri(uri) => uri.clone(),
        }
    }
}

/// Unprocessed result of a capture or pick interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawAsset {
    /// Platform reference to the asset
    pub reference: AssetReference,
    /// Source the asset came from
    pub source: SourceKind,
    /// File name hint, if the platform reported one
    pub file_name: Option<String>,
}

impl RawAsset {
    /// Create a raw asset backed by a local file
    pub fn local_file(path: impl Into<PathBuf>, source: SourceKind) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string());
        Self {
            reference: AssetReference::LocalFile(path),
            source,
            file_name,
        }
    }

    /// Create a raw asset backed by a URI
    pub fn uri(uri: impl Into<String>, source: SourceKind) -> Self {
        Self {
            reference: AssetReference::Uri(uri.into()),
            source,
            file_name: None,
        }
    }

    /// Local path of the asset, if it is a local file
    pub fn local_path(&self) -> Option<&Path> {
        match &self.reference {
            AssetReference::LocalFile(path) => Some(path),
            AssetReference::Uri(_) => None,
        }
    }
}

/// Displayable identity of a stored image, valid for the current process only
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetIdentity {
    /// Local file reference, cheap to redisplay; never sent over the network
    LocalFile(PathBuf),
    /// The payload itself serves as identity
    Inline(String),
}

/// Canonical image unit owned by a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    identity: AssetIdentity,
    encoded_payload: String,
    source: Option<SourceKind>,
}

impl ImageAsset {
    /// Create an asset from its parts
    pub fn new(identity: AssetIdentity, encoded_payload: String, source: SourceKind) -> Self {
        Self {
            identity,
            encoded_payload,
            source: Some(source),
        }
    }

    /// Create an asset from a payload supplied at construction time
    pub fn preloaded(payload: impl Into<String>) -> Self {
        let payload = payload.into();
        Self {
            identity: AssetIdentity::Inline(payload.clone()),
            encoded_payload: payload,
            source: None,
        }
    }

    /// Displayable identity
    pub fn identity(&self) -> &AssetIdentity {
        &self.identity
    }

    /// Canonical payload handed to external collaborators
    pub fn encoded_payload(&self) -> &str {
        &self.encoded_payload
    }

    /// Acquisition source, `None` for preloaded items
    pub fn source(&self) -> Option<SourceKind> {
        self.source
    }

    /// Short label for listings
    pub fn label(&self) -> String {
        match &self.identity {
            AssetIdentity::LocalFile(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            AssetIdentity::Inline(payload) => {
                let head: String = payload.chars().take(32).collect();
                if payload.len() > head.len() {
                    format!("{}...", head)
                } else {
                    head
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_asset_local_file_name() {
        let raw = RawAsset::local_file("/tmp/roll/IMG_0001.JPG", SourceKind::Camera);
        assert_eq!(raw.file_name.as_deref(), Some("IMG_0001.JPG"));
        assert_eq!(raw.local_path(), Some(Path::new("/tmp/roll/IMG_0001.JPG")));
    }

    #[test]
    fn test_raw_asset_uri_has_no_path() {
        let raw = RawAsset::uri("data:image/jpeg;base64,AAAA", SourceKind::Library);
        assert!(raw.local_path().is_none());
        assert_eq!(raw.reference.as_uri(), "data:image/jpeg;base64,AAAA");
    }

    #[test]
    fn test_preloaded_asset() {
        let asset = ImageAsset::preloaded("https://cdn.example/1.jpg");
        assert_eq!(asset.encoded_payload(), "https://cdn.example/1.jpg");
        assert_eq!(asset.source(), None);
        assert_eq!(
            asset.identity(),
            &AssetIdentity::Inline("https://cdn.example/1.jpg".to_string())
        );
    }

    #[test]
    fn test_label_truncates_inline_payloads() {
        let payload = format!("{}{}", JPEG_DATA_URI_PREFIX, "A".repeat(100));
        let asset = ImageAsset::preloaded(payload);
        assert!(asset.label().ends_with("..."));

        let file = ImageAsset::new(
            AssetIdentity::LocalFile(PathBuf::from("/roll/IMG_7.jpg")),
            "data:image/jpeg;base64,AA==".to_string(),
            SourceKind::Camera,
        );
        assert_eq!(file.label(), "IMG_7.jpg");
    }
}

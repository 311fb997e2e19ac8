//! Platform abstraction traits for testability
//!
//! This module defines the seams between the capture pipeline and the
//! platform it runs on, allowing both real frontends (terminal, desktop
//! dialogs) and mock platforms to be used interchangeably.
//!
//! # Architecture
//!
//! - `PermissionPrompt` - Shows the platform's native permission prompt
//! - `CapturePlatform` - Runs the camera capture or library pick interaction
//! - `Alerter` - Surfaces a human-readable message to the operator
//! - `Platform` - Which encoding policy applies (browser or native)
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use photo_capture::device::traits::{CapturePlatform, CaptureRequest, CaptureResponse};
//!
//! async fn count_selection<P: CapturePlatform>(platform: &P) -> usize {
//!     match platform.pick(&CaptureRequest::library(true)).await {
//!         Ok(CaptureResponse::Selected(assets)) => assets.len(),
//!         _ => 0,
//!     }
//! }
//! ```

#![allow(async_fn_in_trait)]

use crate::core::asset::{RawAsset, SourceKind};
use crate::core::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A device permission gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityKind {
    /// Camera access
    Camera,
    /// Media library (photo gallery) access
    Library,
}

impl CapabilityKind {
    /// All capability kinds, in a stable order
    pub const ALL: [CapabilityKind; 2] = [CapabilityKind::Camera, CapabilityKind::Library];

    /// The capability that gates acquisitions from `source`
    pub fn for_source(source: SourceKind) -> Self {
        match source {
            SourceKind::Camera => CapabilityKind::Camera,
            SourceKind::Library => CapabilityKind::Library,
        }
    }

    /// Get a human-readable name for this capability
    pub fn display_name(&self) -> &'static str {
        match self {
            CapabilityKind::Camera => "camera",
            CapabilityKind::Library => "photo library",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            CapabilityKind::Camera => 0,
            CapabilityKind::Library => 1,
        }
    }
}

impl Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Grant state of a capability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapabilityState {
    /// Never asked in this process
    #[default]
    Undetermined,
    /// The operator allowed access
    Granted,
    /// The operator refused access
    Denied,
}

impl CapabilityState {
    /// Check if access is granted
    pub fn is_granted(&self) -> bool {
        matches!(self, CapabilityState::Granted)
    }

    /// Check if a decision has been made
    pub fn is_determined(&self) -> bool {
        !matches!(self, CapabilityState::Undetermined)
    }
}

/// Which canonical encoding policy applies on this platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Native device: local file references are transcoded to data URIs
    #[default]
    Native,
    /// Browser: the picker hands back an inline payload directly
    Browser,
}

impl Platform {
    /// Check if this is the browser platform
    pub fn is_browser(&self) -> bool {
        matches!(self, Platform::Browser)
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Native => write!(f, "native"),
            Platform::Browser => write!(f, "browser"),
        }
    }
}

/// Parameters handed to the platform capture/pick interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    /// Where the image comes from
    pub source: SourceKind,
    /// Allow selecting several images (library only)
    pub allow_multiple: bool,
    /// Ask the platform to return base64 payloads directly
    pub base64: bool,
}

impl CaptureRequest {
    /// Request for a single camera shot
    pub fn camera() -> Self {
        Self {
            source: SourceKind::Camera,
            allow_multiple: false,
            base64: false,
        }
    }

    /// Request for a library selection
    pub fn library(allow_multiple: bool) -> Self {
        Self {
            source: SourceKind::Library,
            allow_multiple,
            base64: false,
        }
    }

    /// Ask for inline base64 payloads
    pub fn with_base64(mut self, base64: bool) -> Self {
        self.base64 = base64;
        self
    }
}

/// What the platform interaction returned
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureResponse {
    /// The operator dismissed the interaction without choosing anything
    Dismissed,
    /// Raw assets in the order the platform reports them
    Selected(Vec<RawAsset>),
}

/// Trait for the platform's native permission prompt
///
/// Called at most once per capability per process by the
/// [`CapabilityBroker`](crate::device::capability::CapabilityBroker).
pub trait PermissionPrompt {
    /// Show the prompt and report whether access was granted
    async fn prompt(&self, kind: CapabilityKind) -> Result<bool>;
}

/// Trait for the platform capture and pick interactions
///
/// Errors returned here are device errors (I/O failure, unsupported
/// source). A dismissed interaction is `Ok(CaptureResponse::Dismissed)`.
pub trait CapturePlatform {
    /// Take a photo with the camera
    async fn capture(&self, request: &CaptureRequest) -> Result<CaptureResponse>;

    /// Pick one or more photos from the media library
    async fn pick(&self, request: &CaptureRequest) -> Result<CaptureResponse>;
}

/// Trait for the platform's alerting mechanism
pub trait Alerter {
    /// Show a message to the operator
    async fn alert(&self, title: &str, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_for_source() {
        assert_eq!(
            CapabilityKind::for_source(SourceKind::Camera),
            CapabilityKind::Camera
        );
        assert_eq!(
            CapabilityKind::for_source(SourceKind::Library),
            CapabilityKind::Library
        );
    }

    #[test]
    fn test_capability_state_helpers() {
        assert!(!CapabilityState::Undetermined.is_determined());
        assert!(CapabilityState::Granted.is_granted());
        assert!(CapabilityState::Denied.is_determined());
        assert!(!CapabilityState::Denied.is_granted());
    }

    #[test]
    fn test_capture_request_builders() {
        let camera = CaptureRequest::camera();
        assert_eq!(camera.source, SourceKind::Camera);
        assert!(!camera.allow_multiple);

        let library = CaptureRequest::library(true).with_base64(true);
        assert_eq!(library.source, SourceKind::Library);
        assert!(library.allow_multiple);
        assert!(library.base64);
    }

    #[test]
    fn test_platform_serde_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            platform: Platform,
        }
        let parsed: Wrapper = toml::from_str("platform = \"browser\"").unwrap();
        assert_eq!(parsed.platform, Platform::Browser);
        assert_eq!(Platform::Native.to_string(), "native");
    }
}

//! Error types for the photo capture pipeline
//!
//! `CaptureError` is the crate-wide error. `AcquisitionFailure` is the
//! narrower taxonomy reported to callers for a terminal acquisition attempt.
//! A user-dismissed picker is not an error and has no variant here.

use crate::device::traits::CapabilityKind;
use std::fmt;
use thiserror::Error;

/// Main error type for the photo capture pipeline
#[derive(Error, Debug)]
pub enum CaptureError {
    /// The platform refused access to the camera or the media library
    #[error("Permission denied for {0}")]
    PermissionDenied(CapabilityKind),

    /// The acquired file could not be read or turned into a payload
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The platform capture or pick interaction failed
    #[error("Device error: {0}")]
    Device(String),

    /// An acquisition is already in flight for this collection
    #[error("An acquisition is already in progress")]
    Busy,

    /// The collection was torn down
    #[error("The photo collection has been disposed")]
    Disposed,

    /// General I/O error
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration could not be loaded or saved
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, CaptureError>;

impl From<std::io::Error> for CaptureError {
    fn from(err: std::io::Error) -> Self {
        CaptureError::Io(err.to_string())
    }
}

impl From<crate::core::config::ConfigError> for CaptureError {
    fn from(err: crate::core::config::ConfigError) -> Self {
        CaptureError::Config(err.to_string())
    }
}

/// Reason a single acquisition attempt terminated without a result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionFailure {
    /// The capability gate for the requested source is denied
    PermissionDenied(CapabilityKind),
    /// Reading or encoding an acquired file failed
    EncodingError(String),
    /// The platform capture/pick interaction raised an error
    DeviceError(String),
}

impl AcquisitionFailure {
    /// Stable machine-readable reason code
    pub fn code(&self) -> &'static str {
        match self {
            AcquisitionFailure::PermissionDenied(_) => "permission_denied",
            AcquisitionFailure::EncodingError(_) => "encoding_error",
            AcquisitionFailure::DeviceError(_) => "device_error",
        }
    }

    /// Map a pipeline error onto the caller-facing taxonomy.
    ///
    /// Returns `None` for errors that are not acquisition failures
    /// (busy, disposed, configuration).
    pub fn from_error(err: &CaptureError) -> Option<Self> {
        match err {
            CaptureError::PermissionDenied(kind) => {
                Some(AcquisitionFailure::PermissionDenied(*kind))
            }
            CaptureError::Encoding(msg) => Some(AcquisitionFailure::EncodingError(msg.clone())),
            CaptureError::Io(msg) => Some(AcquisitionFailure::EncodingError(msg.clone())),
            CaptureError::Device(msg) => Some(AcquisitionFailure::DeviceError(msg.clone())),
            CaptureError::Busy | CaptureError::Disposed | CaptureError::Config(_) => None,
        }
    }
}

impl fmt::Display for AcquisitionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AcquisitionFailure::PermissionDenied(kind) => {
                write!(f, "Access to the {} was denied", kind.display_name())
            }
            AcquisitionFailure::EncodingError(msg) => {
                write!(f, "The photo could not be processed: {}", msg)
            }
            AcquisitionFailure::DeviceError(msg) => {
                write!(f, "The photo could not be acquired: {}", msg)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_codes() {
        assert_eq!(
            AcquisitionFailure::PermissionDenied(CapabilityKind::Camera).code(),
            "permission_denied"
        );
        assert_eq!(
            AcquisitionFailure::EncodingError("x".into()).code(),
            "encoding_error"
        );
        assert_eq!(
            AcquisitionFailure::DeviceError("x".into()).code(),
            "device_error"
        );
    }

    #[test]
    fn test_from_error_mapping() {
        let denied = CaptureError::PermissionDenied(CapabilityKind::Library);
        assert_eq!(
            AcquisitionFailure::from_error(&denied),
            Some(AcquisitionFailure::PermissionDenied(CapabilityKind::Library))
        );

        let io = CaptureError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(matches!(
            AcquisitionFailure::from_error(&io),
            Some(AcquisitionFailure::EncodingError(_))
        ));

        assert_eq!(AcquisitionFailure::from_error(&CaptureError::Busy), None);
        assert_eq!(AcquisitionFailure::from_error(&CaptureError::Disposed), None);
    }

    #[test]
    fn test_failure_display_is_human_readable() {
        let msg = AcquisitionFailure::PermissionDenied(CapabilityKind::Camera).to_string();
        assert_eq!(msg, "Access to the camera was denied");
    }
}

//! Asset Encoder
//!
//! Turns a [`RawAsset`] into the canonical [`ImageAsset`]. Stored payloads
//! must look the same no matter which platform produced them, so the policy
//! lives behind one trait with two strategies picked once at startup:
//!
//! - [`BrowserEncoder`]: the reference the picker returned (a `data:` URI
//!   when base64 capture was requested) is already the payload.
//! - [`NativeEncoder`]: the local file is read and wrapped as
//!   `data:image/jpeg;base64,<bytes>`. The file path stays the displayable
//!   identity and never leaves the device.

use crate::core::asset::{AssetIdentity, ImageAsset, RawAsset, JPEG_DATA_URI_PREFIX};
use crate::core::error::{CaptureError, Result};
use crate::device::traits::Platform;
use base64::{engine::general_purpose::STANDARD, Engine};
use log::{debug, warn};
use std::fs;

/// Strategy converting raw assets into canonical payloads
pub trait AssetEncoder: Send + Sync {
    /// Encode one raw asset
    fn encode(&self, raw: &RawAsset) -> Result<ImageAsset>;

    /// Platform this strategy belongs to
    fn platform(&self) -> Platform;

    /// Encode a whole batch, failing without partial output
    fn encode_all(&self, raws: &[RawAsset]) -> Result<Vec<ImageAsset>> {
        raws.iter().map(|raw| self.encode(raw)).collect()
    }
}

/// Select the encoding strategy for `platform`
pub fn encoder_for(platform: Platform) -> Box<dyn AssetEncoder> {
    match platform {
        Platform::Browser => Box::new(BrowserEncoder),
        Platform::Native => Box::new(NativeEncoder),
    }
}

/// Browser strategy: the picker's reference is the payload
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserEncoder;

impl AssetEncoder for BrowserEncoder {
    fn encode(&self, raw: &RawAsset) -> Result<ImageAsset> {
        let payload = raw.reference.as_uri();
        if payload.is_empty() {
            return Err(CaptureError::Encoding(
                "picker returned an empty reference".to_string(),
            ));
        }
        Ok(ImageAsset::new(
            AssetIdentity::Inline(payload.clone()),
            payload,
            raw.source,
        ))
    }

    fn platform(&self) -> Platform {
        Platform::Browser
    }
}

/// Native strategy: read the local file and wrap it as a JPEG data URI
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeEncoder;

impl AssetEncoder for NativeEncoder {
    fn encode(&self, raw: &RawAsset) -> Result<ImageAsset> {
        let path = match raw.local_path() {
            Some(path) => path,
            None => {
                // Inline payloads from a native picker are already canonical
                let uri = raw.reference.as_uri();
                if uri.starts_with("data:image/") {
                    return Ok(ImageAsset::new(
                        AssetIdentity::Inline(uri.clone()),
                        uri,
                        raw.source,
                    ));
                }
                return Err(CaptureError::Encoding(format!(
                    "expected a local file, got '{}'",
                    uri
                )));
            }
        };

        let bytes = fs::read(path).map_err(|e| {
            warn!("Failed to read {}: {}", path.display(), e);
            CaptureError::Encoding(format!("failed to read '{}': {}", path.display(), e))
        })?;

        if bytes.is_empty() {
            return Err(CaptureError::Encoding(format!(
                "'{}' is empty",
                path.display()
            )));
        }

        let format = image::guess_format(&bytes).map_err(|_| {
            CaptureError::Encoding(format!("'{}' is not a supported image", path.display()))
        })?;
        debug!(
            "Encoding {} ({:?}, {} bytes)",
            path.display(),
            format,
            bytes.len()
        );

        Ok(ImageAsset::new(
            AssetIdentity::LocalFile(path.to_path_buf()),
            encode_bytes(&bytes),
            raw.source,
        ))
    }

    fn platform(&self) -> Platform {
        Platform::Native
    }
}

/// Wrap raw image bytes as the canonical JPEG data URI
pub fn encode_bytes(bytes: &[u8]) -> String {
    format!("{}{}", JPEG_DATA_URI_PREFIX, STANDARD.encode(bytes))
}

/// Decode a `data:<mime>;base64,<bytes>` payload back to bytes
pub fn decode_payload(payload: &str) -> Result<Vec<u8>> {
    let rest = payload
        .strip_prefix("data:")
        .ok_or_else(|| CaptureError::Encoding("payload is not a data URI".to_string()))?;
    let (header, data) = rest
        .split_once(',')
        .ok_or_else(|| CaptureError::Encoding("data URI has no payload".to_string()))?;
    if !header.ends_with(";base64") {
        return Err(CaptureError::Encoding(
            "data URI is not base64 encoded".to_string(),
        ));
    }
    STANDARD
        .decode(data)
        .map_err(|e| CaptureError::Encoding(format!("invalid base64 payload: {}", e)))
}

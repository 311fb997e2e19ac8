//! Desktop frontend
//!
//! Native file and message dialogs through rfd. The library is whatever
//! folder the operator browses to; the camera opens the dialog in the
//! folder new shots land in.

use crate::core::asset::RawAsset;
use crate::core::config::LibraryConfig;
use crate::core::error::Result;
use crate::device::encoder::encode_bytes;
use crate::device::traits::{
    Alerter, CapabilityKind, CapturePlatform, CaptureRequest, CaptureResponse, PermissionPrompt,
};
use log::{debug, info, warn};
use rfd::{
    AsyncFileDialog, AsyncMessageDialog, FileHandle, MessageButtons, MessageDialogResult,
    MessageLevel,
};

/// Camera and library through native file dialogs
#[derive(Debug, Clone)]
pub struct DesktopPlatform {
    config: LibraryConfig,
}

impl DesktopPlatform {
    /// Create a desktop platform starting in the configured folders
    pub fn new(config: LibraryConfig) -> Self {
        Self { config }
    }

    fn dialog(&self, title: &str, directory: &std::path::Path) -> AsyncFileDialog {
        let mut dialog = AsyncFileDialog::new()
            .set_title(title)
            .add_filter("Images", self.config.extensions.as_slice());
        if directory.is_dir() {
            dialog = dialog.set_directory(directory);
        }
        dialog
    }

    async fn to_raw_assets(
        &self,
        handles: Vec<FileHandle>,
        request: &CaptureRequest,
    ) -> Vec<RawAsset> {
        let mut assets = Vec::with_capacity(handles.len());
        for handle in handles {
            if request.base64 {
                let bytes = handle.read().await;
                let mut raw = RawAsset::uri(encode_bytes(&bytes), request.source);
                raw.file_name = Some(handle.file_name());
                assets.push(raw);
            } else {
                assets.push(RawAsset::local_file(
                    handle.path().to_path_buf(),
                    request.source,
                ));
            }
        }
        assets
    }
}

impl CapturePlatform for DesktopPlatform {
    async fn capture(&self, request: &CaptureRequest) -> Result<CaptureResponse> {
        debug!(
            "Opening camera folder {}",
            self.config.camera_directory.display()
        );
        let picked = self
            .dialog("Select the photo you just took", &self.config.camera_directory)
            .pick_file()
            .await;

        match picked {
            Some(handle) => {
                info!("Captured {}", handle.path().display());
                let assets = self.to_raw_assets(vec![handle], request).await;
                Ok(CaptureResponse::Selected(assets))
            }
            None => Ok(CaptureResponse::Dismissed),
        }
    }

    async fn pick(&self, request: &CaptureRequest) -> Result<CaptureResponse> {
        let directory = &self.config.directory;
        let handles = if request.allow_multiple {
            self.dialog("Choose photos", directory).pick_files().await
        } else {
            self.dialog("Choose a photo", directory)
                .pick_file()
                .await
                .map(|handle| vec![handle])
        };

        match handles {
            Some(handles) if !handles.is_empty() => {
                info!("Picked {} photo(s)", handles.len());
                let assets = self.to_raw_assets(handles, request).await;
                Ok(CaptureResponse::Selected(assets))
            }
            _ => Ok(CaptureResponse::Dismissed),
        }
    }
}

/// Permission prompt shown as a native Yes/No dialog
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopPermissions;

impl PermissionPrompt for DesktopPermissions {
    async fn prompt(&self, kind: CapabilityKind) -> Result<bool> {
        let result = AsyncMessageDialog::new()
            .set_title("Permission")
            .set_description(format!("Allow access to the {}?", kind.display_name()))
            .set_level(MessageLevel::Info)
            .set_buttons(MessageButtons::YesNo)
            .show()
            .await;
        Ok(matches!(result, MessageDialogResult::Yes))
    }
}

/// Alerts shown as native message boxes
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopAlerter;

impl Alerter for DesktopAlerter {
    async fn alert(&self, title: &str, message: &str) {
        warn!("{}: {}", title, message);
        AsyncMessageDialog::new()
            .set_title(title)
            .set_description(message)
            .set_level(MessageLevel::Error)
            .set_buttons(MessageButtons::Ok)
            .show()
            .await;
    }
}

//! Acquisition Orchestrator
//!
//! Drives one capture-or-pick attempt: capability check, platform
//! interaction, and normalization of the result into an
//! [`AcquisitionOutcome`]. This is the only place the pipeline waits on the
//! operator.

use crate::core::asset::{RawAsset, SourceKind};
use crate::core::cancel::CancellationToken;
use crate::core::error::AcquisitionFailure;
use crate::device::capability::CapabilityBroker;
use crate::device::traits::{
    CapabilityKind, CapturePlatform, CaptureRequest, CaptureResponse,
    PermissionPrompt, Platform,
};
use log::{debug, info, warn};
use std::sync::Arc;

/// Terminal result of one acquisition attempt
#[derive(Debug, Clone, PartialEq)]
pub enum AcquisitionOutcome {
    /// Raw assets in platform order (never empty)
    Acquired(Vec<RawAsset>),
    /// The operator dismissed the interaction, or the attempt was aborted
    Cancelled,
    /// The attempt failed
    Failed(AcquisitionFailure),
}

impl AcquisitionOutcome {
    /// Number of assets acquired
    pub fn asset_count(&self) -> usize {
        match self {
            AcquisitionOutcome::Acquired(assets) => assets.len(),
            _ => 0,
        }
    }
}

/// Runs capture/pick interactions behind the capability gate
pub struct AcquisitionOrchestrator<P, Q> {
    platform: P,
    broker: Arc<CapabilityBroker<Q>>,
    target: Platform,
}

impl<P: CapturePlatform, Q: PermissionPrompt> AcquisitionOrchestrator<P, Q> {
    /// Create an orchestrator for `platform` sharing `broker`'s capability cache
    pub fn new(platform: P, broker: Arc<CapabilityBroker<Q>>, target: Platform) -> Self {
        Self {
            platform,
            broker,
            target,
        }
    }

    /// Run one acquisition attempt.
    ///
    /// `allow_multiple` only applies to the library; the camera yields at
    /// most one asset. Cancelling `cancel` while the interaction is open
    /// resolves the attempt as [`AcquisitionOutcome::Cancelled`].
    pub async fn acquire(
        &self,
        source: SourceKind,
        allow_multiple: bool,
        cancel: &CancellationToken,
    ) -> AcquisitionOutcome {
        if cancel.is_cancelled() {
            debug!("Acquisition from {} skipped: already cancelled", source);
            return AcquisitionOutcome::Cancelled;
        }

        let kind = CapabilityKind::for_source(source);
        let state = tokio::select! {
            state = self.broker.request(kind) => state,
            _ = cancel.cancelled() => return AcquisitionOutcome::Cancelled,
        };
        if !state.is_granted() {
            info!("Acquisition from {} aborted: {} access denied", source, kind);
            return AcquisitionOutcome::Failed(AcquisitionFailure::PermissionDenied(kind));
        }

        let request = match source {
            SourceKind::Camera => CaptureRequest::camera(),
            SourceKind::Library => CaptureRequest::library(allow_multiple),
        }
        .with_base64(self.target.is_browser());

        info!(
            "Starting {} acquisition (multiple: {})",
            source, request.allow_multiple
        );

        let response = tokio::select! {
            response = self.interact(&request) => response,
            _ = cancel.cancelled() => {
                info!("Acquisition from {} cancelled during interaction", source);
                return AcquisitionOutcome::Cancelled;
            }
        };

        match response {
            Ok(CaptureResponse::Dismissed) => {
                debug!("Operator dismissed the {} interaction", source);
                AcquisitionOutcome::Cancelled
            }
            Ok(CaptureResponse::Selected(assets)) if assets.is_empty() => {
                debug!("Empty {} selection treated as dismissal", source);
                AcquisitionOutcome::Cancelled
            }
            Ok(CaptureResponse::Selected(mut assets)) => {
                if !request.allow_multiple && assets.len() > 1 {
                    warn!(
                        "Platform returned {} assets for a single {} acquisition, keeping the first",
                        assets.len(),
                        source
                    );
                    assets.truncate(1);
                }
                info!("Acquired {} asset(s) from {}", assets.len(), source);
                AcquisitionOutcome::Acquired(assets)
            }
            Err(e) => {
                warn!("{} acquisition failed: {}", source, e);
                AcquisitionOutcome::Failed(AcquisitionFailure::DeviceError(e.to_string()))
            }
        }
    }

    async fn interact(
        &self,
        request: &CaptureRequest,
    ) -> crate::core::error::Result<CaptureResponse> {
        match request.source {
            SourceKind::Camera => self.platform.capture(request).await,
            SourceKind::Library => self.platform.pick(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdb::mock_device::{MockCapturePlatform, MockPermissions};
    use std::time::Duration;

    fn orchestrator(
        platform: MockCapturePlatform,
        permissions: MockPermissions,
        target: Platform,
    ) -> AcquisitionOrchestrator<MockCapturePlatform, MockPermissions> {
        AcquisitionOrchestrator::new(
            platform,
            Arc::new(CapabilityBroker::new(permissions)),
            target,
        )
    }

    fn raw(n: usize) -> RawAsset {
        RawAsset::local_file(format!("/roll/IMG_{:04}.JPG", n), SourceKind::Library)
    }

    #[tokio::test]
    async fn test_denied_never_invokes_device_ui() {
        let platform = MockCapturePlatform::new().respond(CaptureResponse::Selected(vec![raw(1)]));
        let orch = orchestrator(platform.clone(), MockPermissions::denying(), Platform::Native);

        let outcome = orch
            .acquire(SourceKind::Camera, false, &CancellationToken::new())
            .await;

        assert_eq!(
            outcome,
            AcquisitionOutcome::Failed(AcquisitionFailure::PermissionDenied(
                CapabilityKind::Camera
            ))
        );
        assert_eq!(platform.interaction_count(), 0);
    }

    #[tokio::test]
    async fn test_library_returns_assets_in_platform_order() {
        let platform = MockCapturePlatform::new().respond(CaptureResponse::Selected(vec![
            raw(3),
            raw(1),
            raw(2),
        ]));
        let orch = orchestrator(platform.clone(), MockPermissions::granting(), Platform::Native);

        let outcome = orch
            .acquire(SourceKind::Library, true, &CancellationToken::new())
            .await;

        assert_eq!(
            outcome,
            AcquisitionOutcome::Acquired(vec![raw(3), raw(1), raw(2)])
        );
        let requests = platform.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].allow_multiple);
        assert!(!requests[0].base64);
    }

    #[tokio::test]
    async fn test_camera_ignores_allow_multiple() {
        let platform =
            MockCapturePlatform::new().respond(CaptureResponse::Selected(vec![raw(1), raw(2)]));
        let orch = orchestrator(platform.clone(), MockPermissions::granting(), Platform::Native);

        let outcome = orch
            .acquire(SourceKind::Camera, true, &CancellationToken::new())
            .await;

        assert_eq!(outcome.asset_count(), 1);
        assert!(!platform.requests()[0].allow_multiple);
    }

    #[tokio::test]
    async fn test_dismissal_and_empty_selection_are_cancelled() {
        let platform = MockCapturePlatform::new()
            .respond(CaptureResponse::Dismissed)
            .respond(CaptureResponse::Selected(Vec::new()));
        let orch = orchestrator(platform, MockPermissions::granting(), Platform::Native);
        let token = CancellationToken::new();

        assert_eq!(
            orch.acquire(SourceKind::Library, true, &token).await,
            AcquisitionOutcome::Cancelled
        );
        assert_eq!(
            orch.acquire(SourceKind::Library, true, &token).await,
            AcquisitionOutcome::Cancelled
        );
    }

    #[tokio::test]
    async fn test_platform_error_is_device_error() {
        let platform = MockCapturePlatform::new().fail("camera hardware unavailable");
        let orch = orchestrator(platform, MockPermissions::granting(), Platform::Native);

        let outcome = orch
            .acquire(SourceKind::Camera, false, &CancellationToken::new())
            .await;
        assert!(matches!(
            outcome,
            AcquisitionOutcome::Failed(AcquisitionFailure::DeviceError(msg)) if msg.contains("camera hardware unavailable")
        ));
    }

    #[tokio::test]
    async fn test_browser_requests_base64() {
        let platform = MockCapturePlatform::new().respond(CaptureResponse::Selected(vec![
            RawAsset::uri("data:image/jpeg;base64,AAAA", SourceKind::Library),
        ]));
        let orch = orchestrator(platform.clone(), MockPermissions::granting(), Platform::Browser);

        orch.acquire(SourceKind::Library, false, &CancellationToken::new())
            .await;
        assert!(platform.requests()[0].base64);
    }

    #[tokio::test]
    async fn test_cancel_during_interaction() {
        let platform = MockCapturePlatform::new().never_resolve();
        let orch = orchestrator(platform.clone(), MockPermissions::granting(), Platform::Native);
        let token = CancellationToken::new();
        let canceller = token.clone();

        let (outcome, _) = tokio::join!(orch.acquire(SourceKind::Camera, false, &token), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });

        assert_eq!(outcome, AcquisitionOutcome::Cancelled);
        assert_eq!(platform.interaction_count(), 1);
    }

    #[tokio::test]
    async fn test_already_cancelled_token_skips_everything() {
        let permissions = MockPermissions::granting();
        let platform = MockCapturePlatform::new().respond(CaptureResponse::Selected(vec![raw(1)]));
        let orch = orchestrator(platform.clone(), permissions.clone(), Platform::Native);
        let token = CancellationToken::new();
        token.cancel();

        assert_eq!(
            orch.acquire(SourceKind::Library, true, &token).await,
            AcquisitionOutcome::Cancelled
        );
        assert_eq!(permissions.prompt_count(CapabilityKind::Library), 0);
        assert_eq!(platform.interaction_count(), 0);
    }
}

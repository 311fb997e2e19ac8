//! Collection Manager
//!
//! Owns the [`PhotoCollection`] of one widget instance and runs everything
//! that touches it: acquisitions (with the busy gate), batch encoding,
//! confirmed removal, listener notifications and teardown.
//!
//! # Acquisition discipline
//!
//! `busy` is raised before the orchestrator is called and lowered on every
//! exit path by a guard, including when the acquisition future is dropped.
//! A second acquisition while busy is rejected with [`CaptureError::Busy`].
//! A batch is encoded completely before the collection is touched, so an
//! encoding failure never leaves a partial add behind.
//!
//! # Teardown
//!
//! [`CollectionManager::dispose`] cancels the instance's token. An
//! acquisition in flight resolves as cancelled and its result is discarded
//! without mutation or notification.

use crate::core::asset::{ImageAsset, SourceKind};
use crate::core::cancel::CancellationToken;
use crate::core::collection::{CollectionMode, PhotoCollection};
use crate::core::config::{MessagesConfig, WidgetConfig};
use crate::core::error::{AcquisitionFailure, CaptureError, Result};
use crate::device::confirm::ConfirmationGateway;
use crate::device::encoder::AssetEncoder;
use crate::device::orchestrator::{AcquisitionOrchestrator, AcquisitionOutcome};
use crate::device::traits::{Alerter, CapabilityKind, CapturePlatform, PermissionPrompt};
use crate::ui::events::{CollectionListener, NullListener};
use log::{debug, info, warn};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Result of an acquisition attempt that was allowed to start
#[derive(Debug, Clone, PartialEq)]
pub enum AcquireReport {
    /// Assets entered the collection
    Added {
        /// Number of assets that entered (1 in single mode)
        count: usize,
    },
    /// The operator dismissed the interaction
    Cancelled,
    /// The attempt failed; the operator has been alerted
    Failed(AcquisitionFailure),
    /// The widget was disposed while the attempt was in flight
    Discarded,
}

/// Result of a removal request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The item was removed and the listener notified
    Removed,
    /// The operator declined the confirmation
    Declined,
    /// No item at that position; nothing happened
    NothingToRemove,
}

/// Lowers the busy flag when dropped
struct BusyGuard<'a> {
    collection: &'a RwLock<PhotoCollection>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let mut collection = self
            .collection
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        collection.end_acquisition();
    }
}

/// Photo collection of one widget instance plus its pipeline
pub struct CollectionManager<P, Q, G, A> {
    collection: RwLock<PhotoCollection>,
    orchestrator: AcquisitionOrchestrator<P, Q>,
    encoder: Box<dyn AssetEncoder>,
    confirmation: G,
    alerter: A,
    listener: Box<dyn CollectionListener>,
    messages: MessagesConfig,
    required: bool,
    token: CancellationToken,
}

impl<P, Q, G, A> CollectionManager<P, Q, G, A>
where
    P: CapturePlatform,
    Q: PermissionPrompt,
    G: ConfirmationGateway,
    A: Alerter,
{
    /// Create a manager from the widget's construction config
    pub fn new(
        widget: &WidgetConfig,
        orchestrator: AcquisitionOrchestrator<P, Q>,
        encoder: Box<dyn AssetEncoder>,
        confirmation: G,
        alerter: A,
    ) -> Self {
        if widget.mode == CollectionMode::Single && widget.initial_items.len() > 1 {
            warn!(
                "Single-mode widget given {} initial items, keeping the last",
                widget.initial_items.len()
            );
        }
        let initial = widget
            .initial_items
            .iter()
            .map(|payload| ImageAsset::preloaded(payload.as_str()))
            .collect();

        Self {
            collection: RwLock::new(PhotoCollection::with_items(widget.mode, initial)),
            orchestrator,
            encoder,
            confirmation,
            alerter,
            listener: Box::new(NullListener),
            messages: MessagesConfig::default(),
            required: widget.required,
            token: CancellationToken::new(),
        }
    }

    /// Attach the host's listener
    pub fn with_listener(mut self, listener: impl CollectionListener + 'static) -> Self {
        self.listener = Box::new(listener);
        self
    }

    /// Tear down when `token` is cancelled from outside
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Use custom user-visible texts
    pub fn with_messages(mut self, messages: MessagesConfig) -> Self {
        self.messages = messages;
        self
    }

    fn read(&self) -> RwLockReadGuard<'_, PhotoCollection> {
        self.collection
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, PhotoCollection> {
        self.collection
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Collection mode
    pub fn mode(&self) -> CollectionMode {
        self.read().mode()
    }

    /// Copy of the current items
    pub fn items(&self) -> Vec<ImageAsset> {
        self.read().items().to_vec()
    }

    /// Ordered canonical payloads
    pub fn snapshot(&self) -> Vec<String> {
        self.read().payloads()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if the collection is empty
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Whether an acquisition is in flight
    pub fn is_busy(&self) -> bool {
        self.read().is_busy()
    }

    /// Whether the widget has been torn down
    pub fn is_disposed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Hint to show while a required collection is empty
    pub fn required_hint(&self) -> Option<&str> {
        (self.required && self.is_empty()).then_some(self.messages.required_hint.as_str())
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    fn begin_acquisition(&self) -> Result<BusyGuard<'_>> {
        if !self.write().try_begin_acquisition() {
            return Err(CaptureError::Busy);
        }
        Ok(BusyGuard {
            collection: &self.collection,
        })
    }

    /// Capture or pick images and add them to the collection.
    ///
    /// Fails with [`CaptureError::Busy`] while another acquisition is in
    /// flight and with [`CaptureError::Disposed`] after teardown. Every
    /// other outcome is reported through [`AcquireReport`].
    pub async fn acquire(&self, source: SourceKind) -> Result<AcquireReport> {
        if self.is_disposed() {
            return Err(CaptureError::Disposed);
        }
        let busy = self.begin_acquisition()?;
        let allow_multiple = self.mode().is_multiple();
        debug!("Acquisition from {} started", source);

        let outcome = self
            .orchestrator
            .acquire(source, allow_multiple, &self.token)
            .await;
        debug!(
            "Acquisition from {} resolved with {} asset(s)",
            source,
            outcome.asset_count()
        );

        if self.is_disposed() {
            info!("Widget disposed during acquisition, discarding result");
            return Ok(AcquireReport::Discarded);
        }

        match outcome {
            AcquisitionOutcome::Cancelled => Ok(AcquireReport::Cancelled),
            AcquisitionOutcome::Failed(reason) => {
                drop(busy);
                self.report_failure(&reason).await;
                Ok(AcquireReport::Failed(reason))
            }
            AcquisitionOutcome::Acquired(raws) => match self.encoder.encode_all(&raws) {
                Ok(assets) => {
                    let count = self.add_all(assets);
                    Ok(AcquireReport::Added { count })
                }
                Err(e) => {
                    let reason = AcquisitionFailure::from_error(&e)
                        .unwrap_or_else(|| AcquisitionFailure::EncodingError(e.to_string()));
                    warn!("Encoding {} asset(s) failed: {}", raws.len(), e);
                    drop(busy);
                    self.report_failure(&reason).await;
                    Ok(AcquireReport::Failed(reason))
                }
            },
        }
    }

    /// Add already-encoded assets.
    ///
    /// Multiple mode appends; single mode keeps the last asset of the batch.
    /// Fires one `on_asset_ready` per asset that entered, then one
    /// `on_collection_changed`. An empty batch changes nothing and notifies
    /// nobody. Returns the number of assets that entered.
    pub fn add_all(&self, assets: Vec<ImageAsset>) -> usize {
        if self.is_disposed() {
            warn!("Ignoring {} asset(s) added after disposal", assets.len());
            return 0;
        }

        let (entered, snapshot) = {
            let mut collection = self.write();
            let entered = collection.add_all(assets);
            (entered, collection.payloads())
        };
        if entered.is_empty() {
            return 0;
        }

        info!(
            "Added {} photo(s), collection now holds {}",
            entered.len(),
            snapshot.len()
        );
        for asset in &entered {
            self.listener.on_asset_ready(asset.encoded_payload());
        }
        self.listener.on_collection_changed(&snapshot);
        entered.len()
    }

    /// Remove the item at `index` after the operator confirms.
    ///
    /// In single mode the lone item is removed whatever `index` is. An
    /// index with nothing behind it is a no-op and asks nothing. If the
    /// item at `index` changes while the operator is deciding, nothing is
    /// removed.
    pub async fn remove(&self, index: usize) -> Result<RemoveOutcome> {
        if self.is_disposed() {
            return Err(CaptureError::Disposed);
        }
        let Some(target) = self.read().item_to_remove(index) else {
            debug!("Nothing to remove at index {}", index);
            return Ok(RemoveOutcome::NothingToRemove);
        };

        if !self
            .confirmation
            .confirm(&self.messages.remove_confirmation)
            .await
        {
            debug!("Removal of index {} declined", index);
            return Ok(RemoveOutcome::Declined);
        }
        if self.is_disposed() {
            return Err(CaptureError::Disposed);
        }

        let snapshot = {
            let mut collection = self.write();
            if collection.item_to_remove(index).as_ref() != Some(&target) {
                info!("Photo at index {} changed while confirming, keeping it", index);
                return Ok(RemoveOutcome::NothingToRemove);
            }
            collection.remove(index);
            collection.payloads()
        };

        info!(
            "Removed photo at index {}, {} left",
            index,
            snapshot.len()
        );
        self.listener.on_collection_changed(&snapshot);
        Ok(RemoveOutcome::Removed)
    }

    /// Tear the widget down, aborting any acquisition in flight
    pub fn dispose(&self) {
        if !self.is_disposed() {
            info!("Disposing photo collection");
            self.token.cancel();
        }
    }

    async fn report_failure(&self, reason: &AcquisitionFailure) {
        let message = match reason {
            AcquisitionFailure::PermissionDenied(CapabilityKind::Camera) => {
                &self.messages.camera_permission_denied
            }
            AcquisitionFailure::PermissionDenied(CapabilityKind::Library) => {
                &self.messages.library_permission_denied
            }
            AcquisitionFailure::EncodingError(_) => &self.messages.encoding_failed,
            AcquisitionFailure::DeviceError(_) => &self.messages.device_failed,
        };
        self.alerter.alert(&self.messages.error_title, message).await;
        self.listener.on_acquisition_error(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::asset::RawAsset;
    use crate::device::capability::CapabilityBroker;
    use crate::device::encoder::{decode_payload, encoder_for};
    use crate::device::traits::{CaptureResponse, Platform};
    use crate::testdb::generator::MockDataGenerator;
    use crate::testdb::mock_device::{
        MockAlerter, MockCapturePlatform, MockConfirmation, MockPermissions, RecordingListener,
    };
    use crate::ui::events::WidgetEvent;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    type TestManager =
        CollectionManager<MockCapturePlatform, MockPermissions, MockConfirmation, MockAlerter>;

    struct Harness {
        manager: TestManager,
        platform: MockCapturePlatform,
        listener: RecordingListener,
        alerter: MockAlerter,
        confirmation: MockConfirmation,
    }

    fn harness(
        widget: WidgetConfig,
        platform: MockCapturePlatform,
        permissions: MockPermissions,
        confirm: bool,
    ) -> Harness {
        harness_with(
            widget,
            platform,
            permissions,
            MockConfirmation::answering(confirm),
            MockAlerter::new(),
        )
    }

    fn harness_with(
        widget: WidgetConfig,
        platform: MockCapturePlatform,
        permissions: MockPermissions,
        confirmation: MockConfirmation,
        alerter: MockAlerter,
    ) -> Harness {
        let listener = RecordingListener::new();
        let orchestrator = AcquisitionOrchestrator::new(
            platform.clone(),
            Arc::new(CapabilityBroker::new(permissions)),
            Platform::Native,
        );
        let manager = CollectionManager::new(
            &widget,
            orchestrator,
            encoder_for(Platform::Native),
            confirmation.clone(),
            alerter.clone(),
        )
        .with_listener(listener.clone());
        Harness {
            manager,
            platform,
            listener,
            alerter,
            confirmation,
        }
    }

    fn photo(dir: &TempDir, name: &str, seed: u64) -> RawAsset {
        let path = dir.path().join(name);
        std::fs::write(&path, MockDataGenerator::generate_jpeg_with_seed(1024, seed)).unwrap();
        RawAsset::local_file(path, SourceKind::Library)
    }

    fn preloaded(n: usize) -> String {
        format!("data:image/jpeg;base64,{}", n)
    }

    #[tokio::test]
    async fn test_acquire_three_in_multiple_mode() {
        let dir = TempDir::new().unwrap();
        let raws = vec![photo(&dir, "a.jpg", 1), photo(&dir, "b.jpg", 2), photo(&dir, "c.jpg", 3)];
        let h = harness(
            WidgetConfig::new(CollectionMode::Multiple),
            MockCapturePlatform::new().respond(CaptureResponse::Selected(raws)),
            MockPermissions::granting(),
            true,
        );

        let report = h.manager.acquire(SourceKind::Library).await.unwrap();
        assert_eq!(report, AcquireReport::Added { count: 3 });

        let events = h.listener.events();
        assert_eq!(events.len(), 4);
        let ready = h.listener.ready_payloads();
        assert_eq!(ready, h.manager.snapshot());
        assert_eq!(
            decode_payload(&ready[1]).unwrap(),
            MockDataGenerator::generate_jpeg_with_seed(1024, 2)
        );
        assert!(matches!(
            events.last(),
            Some(WidgetEvent::CollectionChanged { snapshot }) if snapshot.len() == 3
        ));
        assert!(!h.manager.is_busy());
    }

    #[tokio::test]
    async fn test_single_mode_replaces_existing_item() {
        let dir = TempDir::new().unwrap();
        let h = harness(
            WidgetConfig::new(CollectionMode::Single).with_initial_items(vec![preloaded(1)]),
            MockCapturePlatform::new()
                .respond(CaptureResponse::Selected(vec![photo(&dir, "new.jpg", 9)])),
            MockPermissions::granting(),
            true,
        );

        h.manager.acquire(SourceKind::Camera).await.unwrap();
        assert_eq!(h.manager.len(), 1);
        assert_ne!(h.manager.snapshot()[0], preloaded(1));
        assert!(!h.platform.requests()[0].allow_multiple);
    }

    #[tokio::test]
    async fn test_permission_denied_alerts_and_leaves_items() {
        let h = harness(
            WidgetConfig::new(CollectionMode::Multiple).with_initial_items(vec![preloaded(1)]),
            MockCapturePlatform::new(),
            MockPermissions::denying(),
            true,
        );

        let report = h.manager.acquire(SourceKind::Camera).await.unwrap();
        assert_eq!(
            report,
            AcquireReport::Failed(AcquisitionFailure::PermissionDenied(CapabilityKind::Camera))
        );
        assert_eq!(h.platform.interaction_count(), 0);
        assert_eq!(h.manager.snapshot(), vec![preloaded(1)]);
        assert_eq!(h.alerter.alerts().len(), 1);
        assert_eq!(
            h.alerter.alerts()[0].1,
            MessagesConfig::default().camera_permission_denied
        );
        assert_eq!(h.listener.errors().len(), 1);
        assert!(!h.manager.is_busy());
    }

    #[tokio::test]
    async fn test_cancelled_acquisition_is_silent() {
        let h = harness(
            WidgetConfig::new(CollectionMode::Multiple),
            MockCapturePlatform::new().respond(CaptureResponse::Dismissed),
            MockPermissions::granting(),
            true,
        );

        let report = h.manager.acquire(SourceKind::Library).await.unwrap();
        assert_eq!(report, AcquireReport::Cancelled);
        assert!(h.listener.events().is_empty());
        assert!(h.alerter.alerts().is_empty());
        assert!(!h.manager.is_busy());
    }

    #[tokio::test]
    async fn test_encoding_failure_is_atomic() {
        let dir = TempDir::new().unwrap();
        let raws = vec![
            photo(&dir, "ok.jpg", 1),
            RawAsset::local_file(dir.path().join("vanished.jpg"), SourceKind::Library),
        ];
        let h = harness(
            WidgetConfig::new(CollectionMode::Multiple),
            MockCapturePlatform::new().respond(CaptureResponse::Selected(raws)),
            MockPermissions::granting(),
            true,
        );

        let report = h.manager.acquire(SourceKind::Library).await.unwrap();
        assert!(matches!(
            report,
            AcquireReport::Failed(AcquisitionFailure::EncodingError(_))
        ));
        assert!(h.manager.is_empty());
        assert!(h.listener.ready_payloads().is_empty());
        assert!(h.listener.snapshots().is_empty());
        assert_eq!(h.listener.errors().len(), 1);
        assert!(!h.manager.is_busy());
    }

    #[tokio::test]
    async fn test_device_error_reported() {
        let h = harness(
            WidgetConfig::new(CollectionMode::Single),
            MockCapturePlatform::new().fail("sensor offline"),
            MockPermissions::granting(),
            true,
        );

        let report = h.manager.acquire(SourceKind::Camera).await.unwrap();
        assert!(matches!(
            report,
            AcquireReport::Failed(AcquisitionFailure::DeviceError(_))
        ));
        assert_eq!(h.listener.errors()[0].code(), "device_error");
        assert!(!h.manager.is_busy());
    }

    #[tokio::test]
    async fn test_busy_during_acquisition_and_overlap_rejected() {
        let dir = TempDir::new().unwrap();
        let h = harness(
            WidgetConfig::new(CollectionMode::Multiple),
            MockCapturePlatform::new()
                .with_delay(Duration::from_millis(30))
                .respond(CaptureResponse::Selected(vec![photo(&dir, "a.jpg", 1)])),
            MockPermissions::granting(),
            true,
        );
        assert!(!h.manager.is_busy());

        let (first, (busy_seen, second)) = tokio::join!(h.manager.acquire(SourceKind::Library), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            let busy = h.manager.is_busy();
            (busy, h.manager.acquire(SourceKind::Library).await)
        });

        assert!(busy_seen);
        assert!(matches!(second, Err(CaptureError::Busy)));
        assert_eq!(first.unwrap(), AcquireReport::Added { count: 1 });
        assert_eq!(h.platform.interaction_count(), 1);
        assert!(!h.manager.is_busy());
    }

    #[tokio::test]
    async fn test_dropped_acquisition_releases_busy() {
        let h = harness(
            WidgetConfig::new(CollectionMode::Multiple),
            MockCapturePlatform::new().never_resolve(),
            MockPermissions::granting(),
            true,
        );

        let result =
            tokio::time::timeout(Duration::from_millis(10), h.manager.acquire(SourceKind::Camera))
                .await;
        assert!(result.is_err());
        assert!(!h.manager.is_busy());
    }

    #[tokio::test]
    async fn test_dispose_during_acquisition_discards_result() {
        let h = harness(
            WidgetConfig::new(CollectionMode::Multiple),
            MockCapturePlatform::new().never_resolve(),
            MockPermissions::granting(),
            true,
        );

        let (report, _) = tokio::join!(h.manager.acquire(SourceKind::Library), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            h.manager.dispose();
        });

        assert_eq!(report.unwrap(), AcquireReport::Discarded);
        assert!(!h.manager.is_busy());
        assert!(h.listener.events().is_empty());
        assert!(matches!(
            h.manager.acquire(SourceKind::Library).await,
            Err(CaptureError::Disposed)
        ));
        assert!(matches!(h.manager.remove(0).await, Err(CaptureError::Disposed)));
    }

    #[tokio::test]
    async fn test_remove_confirmed_in_multiple_mode() {
        let h = harness(
            WidgetConfig::new(CollectionMode::Multiple)
                .with_initial_items((0..4).map(preloaded).collect()),
            MockCapturePlatform::new(),
            MockPermissions::granting(),
            true,
        );

        assert_eq!(h.manager.remove(1).await.unwrap(), RemoveOutcome::Removed);
        let expected = vec![preloaded(0), preloaded(2), preloaded(3)];
        assert_eq!(h.manager.snapshot(), expected);
        assert_eq!(h.listener.snapshots(), vec![expected]);
        assert_eq!(
            h.confirmation.asked(),
            vec![MessagesConfig::default().remove_confirmation]
        );
    }

    #[tokio::test]
    async fn test_remove_out_of_range_asks_nothing() {
        let h = harness(
            WidgetConfig::new(CollectionMode::Multiple),
            MockCapturePlatform::new(),
            MockPermissions::granting(),
            true,
        );

        assert_eq!(
            h.manager.remove(0).await.unwrap(),
            RemoveOutcome::NothingToRemove
        );
        assert!(h.confirmation.asked().is_empty());
        assert!(h.listener.events().is_empty());
    }

    #[tokio::test]
    async fn test_declined_removal_in_single_mode() {
        let h = harness(
            WidgetConfig::new(CollectionMode::Single).with_initial_items(vec![preloaded(1)]),
            MockCapturePlatform::new(),
            MockPermissions::granting(),
            false,
        );

        assert_eq!(h.manager.remove(0).await.unwrap(), RemoveOutcome::Declined);
        assert_eq!(h.manager.len(), 1);
        assert!(h.listener.events().is_empty());
    }

    #[tokio::test]
    async fn test_photo_replaced_while_confirming_is_kept() {
        let dir = TempDir::new().unwrap();
        let h = harness_with(
            WidgetConfig::new(CollectionMode::Single).with_initial_items(vec![preloaded(1)]),
            MockCapturePlatform::new()
                .with_delay(Duration::from_millis(5))
                .respond(CaptureResponse::Selected(vec![photo(&dir, "new.jpg", 7)])),
            MockPermissions::granting(),
            MockConfirmation::answering(true).with_delay(Duration::from_millis(30)),
            MockAlerter::new(),
        );

        let (acquired, removed) =
            tokio::join!(h.manager.acquire(SourceKind::Camera), h.manager.remove(0));

        assert_eq!(acquired.unwrap(), AcquireReport::Added { count: 1 });
        assert_eq!(removed.unwrap(), RemoveOutcome::NothingToRemove);
        assert_eq!(h.confirmation.asked().len(), 1);
        assert_eq!(h.manager.len(), 1);
        assert_ne!(h.manager.snapshot(), vec![preloaded(1)]);
        assert_eq!(h.listener.snapshots(), vec![h.manager.snapshot()]);
    }

    #[tokio::test]
    async fn test_overlapping_removals_take_one_photo() {
        let h = harness_with(
            WidgetConfig::new(CollectionMode::Multiple)
                .with_initial_items(vec![preloaded(1), preloaded(2)]),
            MockCapturePlatform::new(),
            MockPermissions::granting(),
            MockConfirmation::answering(true).with_delay(Duration::from_millis(10)),
            MockAlerter::new(),
        );

        let (first, second) = tokio::join!(h.manager.remove(0), h.manager.remove(0));

        assert_eq!(first.unwrap(), RemoveOutcome::Removed);
        assert_eq!(second.unwrap(), RemoveOutcome::NothingToRemove);
        assert_eq!(h.manager.snapshot(), vec![preloaded(2)]);
        assert_eq!(h.listener.snapshots().len(), 1);
    }

    #[tokio::test]
    async fn test_busy_released_before_failure_alert() {
        let h = harness_with(
            WidgetConfig::new(CollectionMode::Multiple),
            MockCapturePlatform::new(),
            MockPermissions::denying().grant(CapabilityKind::Library),
            MockConfirmation::answering(true),
            MockAlerter::new().with_delay(Duration::from_millis(30)),
        );

        let (report, during_alert) = tokio::join!(h.manager.acquire(SourceKind::Camera), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            (h.alerter.alerts().len(), h.manager.is_busy())
        });

        assert_eq!(
            report.unwrap(),
            AcquireReport::Failed(AcquisitionFailure::PermissionDenied(CapabilityKind::Camera))
        );
        assert_eq!(during_alert, (1, false));
        assert_eq!(h.platform.interaction_count(), 0);
    }

    #[tokio::test]
    async fn test_single_mode_remove_ignores_index() {
        let h = harness(
            WidgetConfig::new(CollectionMode::Single).with_initial_items(vec![preloaded(1)]),
            MockCapturePlatform::new(),
            MockPermissions::granting(),
            true,
        );

        assert_eq!(h.manager.remove(7).await.unwrap(), RemoveOutcome::Removed);
        assert!(h.manager.is_empty());
        assert_eq!(h.listener.snapshots(), vec![Vec::<String>::new()]);
    }

    #[tokio::test]
    async fn test_required_hint_follows_emptiness() {
        let dir = TempDir::new().unwrap();
        let h = harness(
            WidgetConfig::new(CollectionMode::Multiple).required(true),
            MockCapturePlatform::new()
                .respond(CaptureResponse::Selected(vec![photo(&dir, "a.jpg", 1)])),
            MockPermissions::granting(),
            true,
        );

        assert_eq!(h.manager.required_hint(), Some("At least one photo required"));
        h.manager.acquire(SourceKind::Library).await.unwrap();
        assert_eq!(h.manager.required_hint(), None);

        let optional = harness(
            WidgetConfig::new(CollectionMode::Multiple),
            MockCapturePlatform::new(),
            MockPermissions::granting(),
            true,
        );
        assert_eq!(optional.manager.required_hint(), None);
    }

    #[tokio::test]
    async fn test_external_token_disposes() {
        let token = CancellationToken::new();
        let h = harness(
            WidgetConfig::new(CollectionMode::Multiple),
            MockCapturePlatform::new(),
            MockPermissions::granting(),
            true,
        );
        let manager = h.manager.with_cancellation(token.clone());
        assert!(!manager.is_disposed());

        token.cancel();
        assert!(manager.is_disposed());
        assert!(matches!(
            manager.acquire(SourceKind::Camera).await,
            Err(CaptureError::Disposed)
        ));
    }

    #[test]
    fn test_add_all_empty_batch_is_silent() {
        let h = harness(
            WidgetConfig::new(CollectionMode::Multiple),
            MockCapturePlatform::new(),
            MockPermissions::granting(),
            true,
        );
        assert_eq!(h.manager.add_all(Vec::new()), 0);
        assert!(h.listener.events().is_empty());
    }

    #[test]
    fn test_single_mode_initial_items_keep_last() {
        let h = harness(
            WidgetConfig::new(CollectionMode::Single)
                .with_initial_items(vec![preloaded(1), preloaded(2)]),
            MockCapturePlatform::new(),
            MockPermissions::granting(),
            true,
        );
        assert_eq!(h.manager.snapshot(), vec![preloaded(2)]);
    }
}

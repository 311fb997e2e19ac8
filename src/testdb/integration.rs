//! Scenario tests running the real collection pipeline against mock platforms
//!
//! Each scenario wires a [`CollectionManager`] to the scripted mocks from
//! [`mock_device`](super::mock_device), drives it the way an operator would,
//! and checks the observable behavior: collection contents, the busy flag,
//! listener notifications and alerts.
//!
//! # Overview
//!
//! These scenarios verify:
//! - Single mode keeps only the last acquired photo
//! - Multiple mode keeps acquisition order and removes without reordering
//! - `busy` is only raised while an acquisition is in flight
//! - A denied capability never opens the camera or library
//! - Native encoding round-trips the original bytes
//! - The required hint follows emptiness
//! - Declined removal changes nothing
//! - A three-photo pick notifies in input order
//! - Teardown during an acquisition discards its result
//! - The widget stays usable after device failures
//!
//! The runner is also reachable from the CLI (`photo-capture test`).

use super::generator::MockDataGenerator;
use super::mock_device::{
    MockAlerter, MockCapturePlatform, MockConfirmation, MockPermissions, RecordingListener,
};
use crate::core::asset::{RawAsset, SourceKind};
use crate::core::collection::CollectionMode;
use crate::core::config::WidgetConfig;
use crate::core::error::CaptureError;
use crate::core::manager::{AcquireReport, CollectionManager, RemoveOutcome};
use crate::device::capability::CapabilityBroker;
use crate::device::encoder::{decode_payload, encode_bytes, encoder_for, AssetEncoder, NativeEncoder};
use crate::device::orchestrator::AcquisitionOrchestrator;
use crate::device::traits::{CapabilityKind, CaptureResponse, Platform};
use crate::ui::events::WidgetEvent;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

// =============================================================================
// SCENARIO CATALOG
// =============================================================================

/// All scenarios as `(name, description)`, in run order
pub const SCENARIOS: &[(&str, &str)] = &[
    (
        "single_last_write_wins",
        "Single mode holds at most one photo, the last one acquired",
    ),
    (
        "multiple_order_and_removal",
        "Multiple mode appends in order and removes without reordering",
    ),
    (
        "busy_discipline",
        "Busy only between acquisition start and resolution",
    ),
    (
        "permission_denied",
        "Denied access never opens the camera or library",
    ),
    (
        "native_round_trip",
        "Native payload decodes back to the original file bytes",
    ),
    (
        "required_hint",
        "Required hint shows while empty, hides after an acquisition",
    ),
    (
        "declined_removal",
        "Declining the removal prompt changes nothing",
    ),
    (
        "three_photo_notifications",
        "Three picked photos notify in input order, then one snapshot",
    ),
    (
        "dispose_during_acquisition",
        "Teardown while the picker is open discards the result",
    ),
    (
        "flaky_device_recovers",
        "Device failures are alerted and the widget stays usable",
    ),
];

/// Outcome of one scenario
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Scenario name
    pub name: String,
    /// Whether every check held
    pub passed: bool,
    /// Checks that did not hold
    pub failures: Vec<String>,
    /// Wall time spent in the scenario
    pub duration: Duration,
}

/// Summary over several scenarios
#[derive(Debug, Clone, Default)]
pub struct ScenarioSummary {
    /// Scenarios run
    pub total: usize,
    /// Scenarios that passed
    pub passed: usize,
    /// Individual results
    pub results: Vec<ScenarioResult>,
}

impl ScenarioSummary {
    /// Check if every scenario passed
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

/// Collects failed checks for one scenario
#[derive(Debug, Default)]
struct Checks {
    failures: Vec<String>,
}

impl Checks {
    fn check(&mut self, ok: bool, what: impl Into<String>) {
        if !ok {
            self.failures.push(what.into());
        }
    }

    fn check_eq<T: PartialEq + std::fmt::Debug>(&mut self, actual: T, expected: T, what: &str) {
        if actual != expected {
            self.failures
                .push(format!("{}: expected {:?}, got {:?}", what, expected, actual));
        }
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

type MockManager =
    CollectionManager<MockCapturePlatform, MockPermissions, MockConfirmation, MockAlerter>;

struct Fixture {
    manager: MockManager,
    platform: MockCapturePlatform,
    listener: RecordingListener,
    alerter: MockAlerter,
    confirmation: MockConfirmation,
}

impl Fixture {
    fn new(
        widget: WidgetConfig,
        platform: MockCapturePlatform,
        permissions: MockPermissions,
        confirm: bool,
    ) -> Self {
        let listener = RecordingListener::new();
        let alerter = MockAlerter::new();
        let confirmation = MockConfirmation::answering(confirm);
        let orchestrator = AcquisitionOrchestrator::new(
            platform.clone(),
            Arc::new(CapabilityBroker::new(permissions)),
            Platform::Browser,
        );
        let manager = CollectionManager::new(
            &widget,
            orchestrator,
            encoder_for(Platform::Browser),
            confirmation.clone(),
            alerter.clone(),
        )
        .with_listener(listener.clone());

        Self {
            manager,
            platform,
            listener,
            alerter,
            confirmation,
        }
    }
}

/// Inline JPEG payload with deterministic content
fn inline_photo(seed: u64) -> RawAsset {
    RawAsset::uri(
        encode_bytes(&MockDataGenerator::generate_jpeg_with_seed(256, seed)),
        SourceKind::Library,
    )
}

fn selected(seeds: &[u64]) -> CaptureResponse {
    CaptureResponse::Selected(seeds.iter().map(|&seed| inline_photo(seed)).collect())
}

fn payload(seed: u64) -> String {
    inline_photo(seed).reference.as_uri()
}

/// Directory under the system temp dir, removed on drop
struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    fn new(name: &str) -> std::io::Result<Self> {
        let path = std::env::temp_dir().join(format!(
            "photo_capture_{}_{}_{}",
            name,
            std::process::id(),
            rand::random::<u32>()
        ));
        fs::create_dir_all(&path)?;
        Ok(Self { path })
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

// =============================================================================
// SCENARIOS
// =============================================================================

async fn single_last_write_wins(c: &mut Checks) {
    let platform = MockCapturePlatform::new()
        .respond(selected(&[1]))
        .respond(CaptureResponse::Dismissed)
        .respond(selected(&[2]));
    let fx = Fixture::new(
        WidgetConfig::new(CollectionMode::Single).with_initial_items(vec![payload(0)]),
        platform,
        MockPermissions::granting(),
        true,
    );

    for _ in 0..3 {
        let _ = fx.manager.acquire(SourceKind::Library).await;
        c.check(fx.manager.len() <= 1, "single mode holds more than one item");
    }
    c.check_eq(fx.manager.snapshot(), vec![payload(2)], "stored item");

    // A batch handed over directly still keeps only its last asset
    let assets = encoder_for(Platform::Browser)
        .encode_all(&[inline_photo(3), inline_photo(4)])
        .unwrap_or_default();
    fx.manager.add_all(assets);
    c.check_eq(fx.manager.snapshot(), vec![payload(4)], "stored item after batch");
}

async fn multiple_order_and_removal(c: &mut Checks) {
    let platform = MockCapturePlatform::new()
        .respond(selected(&[1, 2]))
        .respond(selected(&[3, 4]));
    let fx = Fixture::new(
        WidgetConfig::new(CollectionMode::Multiple),
        platform,
        MockPermissions::granting(),
        true,
    );

    let _ = fx.manager.acquire(SourceKind::Library).await;
    let _ = fx.manager.acquire(SourceKind::Library).await;
    c.check_eq(
        fx.manager.snapshot(),
        (1..=4).map(payload).collect::<Vec<_>>(),
        "order after two picks",
    );

    let removed = fx.manager.remove(1).await;
    c.check(
        matches!(removed, Ok(RemoveOutcome::Removed)),
        format!("remove(1) returned {:?}", removed),
    );
    c.check_eq(
        fx.manager.snapshot(),
        vec![payload(1), payload(3), payload(4)],
        "order after removal",
    );
    c.check_eq(
        fx.listener.snapshots().last().cloned(),
        Some(fx.manager.snapshot()),
        "last snapshot notification",
    );
}

async fn busy_discipline(c: &mut Checks) {
    let platform = MockCapturePlatform::new()
        .with_delay(Duration::from_millis(20))
        .respond(selected(&[1]))
        .respond(CaptureResponse::Dismissed)
        .fail("lens cover closed");
    let fx = Fixture::new(
        WidgetConfig::new(CollectionMode::Multiple),
        platform,
        MockPermissions::granting(),
        true,
    );

    c.check(!fx.manager.is_busy(), "busy before the first acquisition");
    for label in ["success", "cancellation", "error"] {
        let (_, during) = tokio::join!(fx.manager.acquire(SourceKind::Camera), async {
            tokio::time::sleep(Duration::from_millis(5)).await;
            fx.manager.is_busy()
        });
        c.check(during, format!("not busy during {}", label));
        c.check(!fx.manager.is_busy(), format!("still busy after {}", label));
    }

    let (_, overlapping) = tokio::join!(fx.manager.acquire(SourceKind::Library), async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        fx.manager.acquire(SourceKind::Library).await
    });
    c.check(
        matches!(overlapping, Err(CaptureError::Busy)),
        "overlapping acquisition was not rejected",
    );
    c.check(!fx.manager.is_busy(), "busy after overlapping attempt");
}

async fn permission_denied(c: &mut Checks) {
    let fx = Fixture::new(
        WidgetConfig::new(CollectionMode::Multiple).with_initial_items(vec![payload(1)]),
        MockCapturePlatform::new().respond(selected(&[2])),
        MockPermissions::granting().deny(CapabilityKind::Camera),
        true,
    );

    let report = fx.manager.acquire(SourceKind::Camera).await;
    c.check(
        matches!(report, Ok(AcquireReport::Failed(ref f)) if f.code() == "permission_denied"),
        format!("camera acquisition returned {:?}", report),
    );
    c.check_eq(fx.platform.interaction_count(), 0, "device interactions");
    c.check_eq(fx.manager.snapshot(), vec![payload(1)], "items");
    c.check_eq(fx.alerter.alerts().len(), 1, "alerts shown");

    // The library is still allowed
    let report = fx.manager.acquire(SourceKind::Library).await;
    c.check(
        matches!(report, Ok(AcquireReport::Added { count: 1 })),
        format!("library acquisition returned {:?}", report),
    );
}

async fn native_round_trip(c: &mut Checks) {
    let scratch = match ScratchDir::new("round_trip") {
        Ok(dir) => dir,
        Err(e) => return c.check(false, format!("scratch dir: {}", e)),
    };
    let paths = match MockDataGenerator::write_library(&scratch.path, 5) {
        Ok(paths) => paths,
        Err(e) => return c.check(false, format!("writing library: {}", e)),
    };

    for path in paths {
        let original = fs::read(&path).unwrap_or_default();
        let raw = RawAsset::local_file(&path, SourceKind::Library);
        match NativeEncoder.encode(&raw) {
            Ok(asset) => {
                c.check(
                    asset.encoded_payload().starts_with("data:image/jpeg;base64,"),
                    format!("{} payload prefix", path.display()),
                );
                let decoded = decode_payload(asset.encoded_payload()).unwrap_or_default();
                c.check(
                    decoded == original,
                    format!("{} did not round-trip", path.display()),
                );
            }
            Err(e) => c.check(false, format!("{}: {}", path.display(), e)),
        }
    }
}

async fn required_hint(c: &mut Checks) {
    let fx = Fixture::new(
        WidgetConfig::new(CollectionMode::Multiple).required(true),
        MockCapturePlatform::new().respond(selected(&[1])),
        MockPermissions::granting(),
        true,
    );

    c.check_eq(
        fx.manager.required_hint(),
        Some("At least one photo required"),
        "hint while empty",
    );
    let _ = fx.manager.acquire(SourceKind::Library).await;
    c.check_eq(fx.manager.required_hint(), None, "hint after acquisition");
}

async fn declined_removal(c: &mut Checks) {
    let fx = Fixture::new(
        WidgetConfig::new(CollectionMode::Single).with_initial_items(vec![payload(1)]),
        MockCapturePlatform::new(),
        MockPermissions::granting(),
        false,
    );

    let outcome = fx.manager.remove(0).await;
    c.check(
        matches!(outcome, Ok(RemoveOutcome::Declined)),
        format!("remove returned {:?}", outcome),
    );
    c.check_eq(fx.confirmation.asked().len(), 1, "confirmations asked");
    c.check_eq(fx.manager.len(), 1, "item count");
    c.check(fx.listener.events().is_empty(), "notification fired");
}

async fn three_photo_notifications(c: &mut Checks) {
    let fx = Fixture::new(
        WidgetConfig::new(CollectionMode::Multiple),
        MockCapturePlatform::new().respond(selected(&[7, 8, 9])),
        MockPermissions::granting(),
        true,
    );

    let _ = fx.manager.acquire(SourceKind::Library).await;
    let expected: Vec<String> = [7, 8, 9].into_iter().map(payload).collect();
    let events = fx.listener.events();
    let names: Vec<&str> = events.iter().map(WidgetEvent::name).collect();
    c.check_eq(
        names,
        vec!["asset_ready", "asset_ready", "asset_ready", "collection_changed"],
        "notification sequence",
    );
    c.check_eq(fx.listener.ready_payloads(), expected.clone(), "ready payloads");
    c.check_eq(fx.listener.snapshots(), vec![expected], "snapshot");
}

async fn dispose_during_acquisition(c: &mut Checks) {
    let fx = Fixture::new(
        WidgetConfig::new(CollectionMode::Multiple),
        MockCapturePlatform::new().pending(),
        MockPermissions::granting(),
        true,
    );

    let (report, _) = tokio::join!(fx.manager.acquire(SourceKind::Library), async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        fx.manager.dispose();
    });
    c.check(
        matches!(report, Ok(AcquireReport::Discarded)),
        format!("acquisition returned {:?}", report),
    );
    c.check(!fx.manager.is_busy(), "busy after disposal");
    c.check(fx.listener.events().is_empty(), "notification after disposal");
    c.check(
        matches!(
            fx.manager.acquire(SourceKind::Library).await,
            Err(CaptureError::Disposed)
        ),
        "acquisition accepted after disposal",
    );
}

async fn flaky_device_recovers(c: &mut Checks) {
    let fx = Fixture::new(
        WidgetConfig::new(CollectionMode::Multiple),
        MockCapturePlatform::new().flaky(100),
        MockPermissions::granting(),
        true,
    );

    for _ in 0..3 {
        let report = fx.manager.acquire(SourceKind::Camera).await;
        c.check(
            matches!(report, Ok(AcquireReport::Failed(ref f)) if f.code() == "device_error"),
            format!("flaky acquisition returned {:?}", report),
        );
        c.check(!fx.manager.is_busy(), "busy after device failure");
    }
    c.check_eq(fx.alerter.alerts().len(), 3, "alerts shown");
    c.check_eq(fx.listener.errors().len(), 3, "error notifications");
    c.check(fx.manager.is_empty(), "items after failures");
}

// =============================================================================
// RUNNER
// =============================================================================

/// Run one scenario by name, `None` if no scenario has that name
pub async fn run_scenario(name: &str) -> Option<ScenarioResult> {
    let mut checks = Checks::default();
    let start = Instant::now();

    match name {
        "single_last_write_wins" => single_last_write_wins(&mut checks).await,
        "multiple_order_and_removal" => multiple_order_and_removal(&mut checks).await,
        "busy_discipline" => busy_discipline(&mut checks).await,
        "permission_denied" => permission_denied(&mut checks).await,
        "native_round_trip" => native_round_trip(&mut checks).await,
        "required_hint" => required_hint(&mut checks).await,
        "declined_removal" => declined_removal(&mut checks).await,
        "three_photo_notifications" => three_photo_notifications(&mut checks).await,
        "dispose_during_acquisition" => dispose_during_acquisition(&mut checks).await,
        "flaky_device_recovers" => flaky_device_recovers(&mut checks).await,
        _ => return None,
    }

    Some(ScenarioResult {
        name: name.to_string(),
        passed: checks.failures.is_empty(),
        failures: checks.failures,
        duration: start.elapsed(),
    })
}

/// Run the named scenarios (all of them when `names` is empty)
pub async fn run_scenarios(names: &[String]) -> ScenarioSummary {
    let selected: Vec<&str> = if names.is_empty() {
        SCENARIOS.iter().map(|(name, _)| *name).collect()
    } else {
        names.iter().map(String::as_str).collect()
    };

    let mut summary = ScenarioSummary::default();
    for name in selected {
        let result = match run_scenario(name).await {
            Some(result) => result,
            None => ScenarioResult {
                name: name.to_string(),
                passed: false,
                failures: vec![format!("unknown scenario '{}'", name)],
                duration: Duration::ZERO,
            },
        };
        summary.total += 1;
        if result.passed {
            summary.passed += 1;
        }
        summary.results.push(result);
    }
    summary
}

//! Mock platform implementation for testing without a real device
//!
//! Scriptable stand-ins for every platform seam of the pipeline: permission
//! prompt, capture/pick interaction, confirmation dialog, alerting and the
//! host's listener. All mocks are cheap to clone and share their recorded
//! state between clones, so a test can keep one handle while the pipeline
//! owns another.

use crate::core::error::{AcquisitionFailure, CaptureError, Result};
use crate::device::confirm::ConfirmationGateway;
use crate::device::traits::{
    Alerter, CapabilityKind, CapturePlatform, CaptureRequest, CaptureResponse, PermissionPrompt,
};
use crate::ui::events::{CollectionListener, WidgetEvent};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

// =============================================================================
// Permissions
// =============================================================================

#[derive(Debug)]
struct PermissionState {
    answers: [bool; 2],
    fail: bool,
    delay: Option<Duration>,
    prompts: [AtomicUsize; 2],
}

/// Scripted permission prompt
#[derive(Debug, Clone)]
pub struct MockPermissions {
    state: Arc<RwLock<PermissionState>>,
}

impl MockPermissions {
    fn with_answer(answer: bool, fail: bool) -> Self {
        Self {
            state: Arc::new(RwLock::new(PermissionState {
                answers: [answer, answer],
                fail,
                delay: None,
                prompts: [AtomicUsize::new(0), AtomicUsize::new(0)],
            })),
        }
    }

    /// Operator allows every capability
    pub fn granting() -> Self {
        Self::with_answer(true, false)
    }

    /// Operator refuses every capability
    pub fn denying() -> Self {
        Self::with_answer(false, false)
    }

    /// The prompt itself errors out
    pub fn failing() -> Self {
        Self::with_answer(false, true)
    }

    /// Refuse one capability
    pub fn deny(self, kind: CapabilityKind) -> Self {
        self.set_answer(kind, false);
        self
    }

    /// Allow one capability
    pub fn grant(self, kind: CapabilityKind) -> Self {
        self.set_answer(kind, true);
        self
    }

    /// Keep the prompt on screen for `delay` before answering
    pub fn with_delay(self, delay: Duration) -> Self {
        if let Ok(mut state) = self.state.write() {
            state.delay = Some(delay);
        }
        self
    }

    fn set_answer(&self, kind: CapabilityKind, answer: bool) {
        if let Ok(mut state) = self.state.write() {
            state.answers[kind.index()] = answer;
        }
    }

    /// How many times the prompt for `kind` was shown
    pub fn prompt_count(&self, kind: CapabilityKind) -> usize {
        self.state
            .read()
            .map(|state| state.prompts[kind.index()].load(Ordering::SeqCst))
            .unwrap_or(0)
    }
}

impl PermissionPrompt for MockPermissions {
    async fn prompt(&self, kind: CapabilityKind) -> Result<bool> {
        let (answer, fail, delay) = {
            let state = self
                .state
                .read()
                .map_err(|_| CaptureError::Device("permission state poisoned".to_string()))?;
            state.prompts[kind.index()].fetch_add(1, Ordering::SeqCst);
            (state.answers[kind.index()], state.fail, state.delay)
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if fail {
            return Err(CaptureError::Device("permission service unavailable".to_string()));
        }
        Ok(answer)
    }
}

// =============================================================================
// Capture platform
// =============================================================================

/// One scripted reaction of the mock platform
#[derive(Debug, Clone)]
pub enum ScriptedInteraction {
    /// Return this response
    Respond(CaptureResponse),
    /// Fail with a device error
    Fail(String),
    /// Never resolve (operator walked away with the camera open)
    Pending,
}

/// Configuration for mock platform behavior
#[derive(Debug, Clone, Default)]
pub struct MockPlatformConfig {
    /// Delay before every interaction resolves
    pub interaction_delay: Option<Duration>,
    /// Random device failures (percentage 0-100)
    pub random_failure_rate: u8,
    /// Every interaction stays pending forever
    pub never_resolve: bool,
}

#[derive(Debug, Default)]
struct PlatformState {
    script: VecDeque<ScriptedInteraction>,
    requests: Vec<CaptureRequest>,
    config: MockPlatformConfig,
}

/// Scripted camera / library platform
///
/// Interactions consume the script in order; once it is exhausted the
/// platform behaves as if the operator dismissed the picker.
#[derive(Debug, Clone, Default)]
pub struct MockCapturePlatform {
    state: Arc<Mutex<PlatformState>>,
}

impl MockCapturePlatform {
    /// Create a platform with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response
    pub fn respond(self, response: CaptureResponse) -> Self {
        self.push(ScriptedInteraction::Respond(response));
        self
    }

    /// Queue a device failure
    pub fn fail(self, message: &str) -> Self {
        self.push(ScriptedInteraction::Fail(message.to_string()));
        self
    }

    /// Queue an interaction that never resolves
    pub fn pending(self) -> Self {
        self.push(ScriptedInteraction::Pending);
        self
    }

    /// Make every interaction hang forever
    pub fn never_resolve(self) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.config.never_resolve = true;
        }
        self
    }

    /// Delay every interaction
    pub fn with_delay(self, delay: Duration) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.config.interaction_delay = Some(delay);
        }
        self
    }

    /// Fail a percentage of interactions at random
    pub fn flaky(self, failure_rate: u8) -> Self {
        if let Ok(mut state) = self.state.lock() {
            state.config.random_failure_rate = failure_rate.min(100);
        }
        self
    }

    /// Queue a scripted interaction
    pub fn push(&self, interaction: ScriptedInteraction) {
        if let Ok(mut state) = self.state.lock() {
            state.script.push_back(interaction);
        }
    }

    /// Number of capture/pick interactions opened
    pub fn interaction_count(&self) -> usize {
        self.requests().len()
    }

    /// Requests received, in order
    pub fn requests(&self) -> Vec<CaptureRequest> {
        self.state
            .lock()
            .map(|state| state.requests.clone())
            .unwrap_or_default()
    }

    async fn interact(&self, request: &CaptureRequest) -> Result<CaptureResponse> {
        let (next, config) = {
            let mut state = self
                .state
                .lock()
                .map_err(|_| CaptureError::Device("platform state poisoned".to_string()))?;
            state.requests.push(request.clone());
            (state.script.pop_front(), state.config.clone())
        };

        if config.never_resolve {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = config.interaction_delay {
            tokio::time::sleep(delay).await;
        }
        if config.random_failure_rate > 0 {
            let roll = rand::random::<u8>() % 100;
            if roll < config.random_failure_rate {
                return Err(CaptureError::Device("simulated random failure".to_string()));
            }
        }

        match next {
            Some(ScriptedInteraction::Respond(response)) => Ok(response),
            Some(ScriptedInteraction::Fail(message)) => Err(CaptureError::Device(message)),
            Some(ScriptedInteraction::Pending) => {
                std::future::pending::<()>().await;
                Ok(CaptureResponse::Dismissed)
            }
            None => Ok(CaptureResponse::Dismissed),
        }
    }
}

impl CapturePlatform for MockCapturePlatform {
    async fn capture(&self, request: &CaptureRequest) -> Result<CaptureResponse> {
        self.interact(request).await
    }

    async fn pick(&self, request: &CaptureRequest) -> Result<CaptureResponse> {
        self.interact(request).await
    }
}

// =============================================================================
// Confirmation, alerts, listener
// =============================================================================

/// Scripted confirmation dialog that records what it was asked
#[derive(Debug, Clone)]
pub struct MockConfirmation {
    answer: bool,
    delay: Option<Duration>,
    asked: Arc<Mutex<Vec<String>>>,
}

impl MockConfirmation {
    /// Dialog answered with `answer`
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            delay: None,
            asked: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Keep the dialog open for `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Messages shown so far
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

impl ConfirmationGateway for MockConfirmation {
    async fn confirm(&self, message: &str) -> bool {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(message.to_string());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.answer
    }
}

/// Alerter that records every message
#[derive(Debug, Clone, Default)]
pub struct MockAlerter {
    alerts: Arc<Mutex<Vec<(String, String)>>>,
    delay: Option<Duration>,
}

impl MockAlerter {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep each alert open for `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Alerts shown so far as `(title, message)`
    pub fn alerts(&self) -> Vec<(String, String)> {
        self.alerts.lock().map(|a| a.clone()).unwrap_or_default()
    }
}

impl Alerter for MockAlerter {
    async fn alert(&self, title: &str, message: &str) {
        if let Ok(mut alerts) = self.alerts.lock() {
            alerts.push((title.to_string(), message.to_string()));
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Listener that records every notification
#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    events: Arc<Mutex<Vec<WidgetEvent>>>,
}

impl RecordingListener {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far
    pub fn events(&self) -> Vec<WidgetEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Payloads of `AssetReady` notifications, in order
    pub fn ready_payloads(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                WidgetEvent::AssetReady { payload } => Some(payload),
                _ => None,
            })
            .collect()
    }

    /// Snapshots of `CollectionChanged` notifications, in order
    pub fn snapshots(&self) -> Vec<Vec<String>> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                WidgetEvent::CollectionChanged { snapshot } => Some(snapshot),
                _ => None,
            })
            .collect()
    }

    /// Reasons of `AcquisitionError` notifications, in order
    pub fn errors(&self) -> Vec<AcquisitionFailure> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                WidgetEvent::AcquisitionError { reason } => Some(reason),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: WidgetEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl CollectionListener for RecordingListener {
    fn on_asset_ready(&self, payload: &str) {
        self.record(WidgetEvent::AssetReady {
            payload: payload.to_string(),
        });
    }

    fn on_collection_changed(&self, snapshot: &[String]) {
        self.record(WidgetEvent::CollectionChanged {
            snapshot: snapshot.to_vec(),
        });
    }

    fn on_acquisition_error(&self, reason: &AcquisitionFailure) {
        self.record(WidgetEvent::AcquisitionError {
            reason: reason.clone(),
        });
    }
}

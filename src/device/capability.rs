//! Capability Broker
//!
//! Requests and caches camera / media-library grants. The cache is
//! process-wide: build one broker at startup, share it by `Arc` between every
//! collection, and call [`CapabilityBroker::reset`] to tear it down.
//!
//! # State machine
//!
//! Each capability starts `Undetermined` and moves once to `Granted` or
//! `Denied`. A denied capability is never re-prompted; the operator has to
//! change it in system settings and the host has to `reset` the broker.
//!
//! Concurrent requests for the same capability while its prompt is on screen
//! wait for that prompt instead of opening a second one.

use crate::device::traits::{CapabilityKind, CapabilityState, PermissionPrompt};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Process-wide capability cache in front of the platform prompt
#[derive(Debug)]
pub struct CapabilityBroker<Q> {
    prompt: Q,
    states: [Mutex<CapabilityState>; 2],
    prompts_shown: AtomicUsize,
}

impl<Q: PermissionPrompt> CapabilityBroker<Q> {
    /// Create a broker with every capability undetermined
    pub fn new(prompt: Q) -> Self {
        Self {
            prompt,
            states: [
                Mutex::new(CapabilityState::Undetermined),
                Mutex::new(CapabilityState::Undetermined),
            ],
            prompts_shown: AtomicUsize::new(0),
        }
    }

    /// Create a broker with some decisions already known
    /// (e.g. remembered by the platform or fixed by configuration)
    pub fn with_presets(prompt: Q, presets: &[(CapabilityKind, CapabilityState)]) -> Self {
        let broker = Self::new(prompt);
        for (kind, state) in presets {
            if let Ok(mut slot) = broker.states[kind.index()].try_lock() {
                *slot = *state;
            }
        }
        broker
    }

    /// Request a capability, prompting only if it is undetermined.
    ///
    /// Always resolves to `Granted` or `Denied`. A failing prompt counts as
    /// a denial.
    pub async fn request(&self, kind: CapabilityKind) -> CapabilityState {
        let mut state = self.states[kind.index()].lock().await;
        if state.is_determined() {
            debug!("Capability {} already {:?}", kind, *state);
            return *state;
        }

        info!("Requesting {} permission", kind);
        self.prompts_shown.fetch_add(1, Ordering::SeqCst);
        let granted = match self.prompt.prompt(kind).await {
            Ok(granted) => granted,
            Err(e) => {
                warn!("Permission prompt for {} failed: {}", kind, e);
                false
            }
        };

        *state = if granted {
            CapabilityState::Granted
        } else {
            CapabilityState::Denied
        };
        info!("Capability {} is now {:?}", kind, *state);
        *state
    }

    /// Current cached state without prompting.
    ///
    /// Reports `Undetermined` while a prompt for `kind` is on screen.
    pub fn state(&self, kind: CapabilityKind) -> CapabilityState {
        self.states[kind.index()]
            .try_lock()
            .map(|state| *state)
            .unwrap_or(CapabilityState::Undetermined)
    }

    /// Number of native prompts shown since creation
    pub fn prompts_shown(&self) -> usize {
        self.prompts_shown.load(Ordering::SeqCst)
    }

    /// Forget every decision so the next request prompts again
    pub async fn reset(&self) {
        for kind in CapabilityKind::ALL {
            *self.states[kind.index()].lock().await = CapabilityState::Undetermined;
        }
        info!("Capability cache reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testdb::mock_device::MockPermissions;
    use std::time::Duration;

    #[tokio::test]
    async fn test_grant_is_cached() {
        let prompt = MockPermissions::granting();
        let broker = CapabilityBroker::new(prompt.clone());

        assert_eq!(
            broker.state(CapabilityKind::Camera),
            CapabilityState::Undetermined
        );
        assert_eq!(
            broker.request(CapabilityKind::Camera).await,
            CapabilityState::Granted
        );
        assert_eq!(
            broker.request(CapabilityKind::Camera).await,
            CapabilityState::Granted
        );
        assert_eq!(prompt.prompt_count(CapabilityKind::Camera), 1);
        assert_eq!(broker.prompts_shown(), 1);
    }

    #[tokio::test]
    async fn test_denial_is_not_reprompted() {
        let prompt = MockPermissions::denying();
        let broker = CapabilityBroker::new(prompt.clone());

        assert_eq!(
            broker.request(CapabilityKind::Library).await,
            CapabilityState::Denied
        );
        assert_eq!(
            broker.request(CapabilityKind::Library).await,
            CapabilityState::Denied
        );
        assert_eq!(prompt.prompt_count(CapabilityKind::Library), 1);
    }

    #[tokio::test]
    async fn test_capabilities_are_independent() {
        let prompt = MockPermissions::granting().deny(CapabilityKind::Camera);
        let broker = CapabilityBroker::new(prompt);

        assert_eq!(
            broker.request(CapabilityKind::Camera).await,
            CapabilityState::Denied
        );
        assert_eq!(
            broker.request(CapabilityKind::Library).await,
            CapabilityState::Granted
        );
    }

    #[tokio::test]
    async fn test_prompt_error_counts_as_denial() {
        let prompt = MockPermissions::failing();
        let broker = CapabilityBroker::new(prompt);
        assert_eq!(
            broker.request(CapabilityKind::Camera).await,
            CapabilityState::Denied
        );
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_one_prompt() {
        let prompt = MockPermissions::granting().with_delay(Duration::from_millis(20));
        let broker = CapabilityBroker::new(prompt.clone());

        let (a, b, c) = tokio::join!(
            broker.request(CapabilityKind::Camera),
            broker.request(CapabilityKind::Camera),
            broker.request(CapabilityKind::Camera)
        );

        assert_eq!(a, CapabilityState::Granted);
        assert_eq!(b, CapabilityState::Granted);
        assert_eq!(c, CapabilityState::Granted);
        assert_eq!(prompt.prompt_count(CapabilityKind::Camera), 1);
    }

    #[tokio::test]
    async fn test_presets_skip_prompt() {
        let prompt = MockPermissions::granting();
        let broker = CapabilityBroker::with_presets(
            prompt.clone(),
            &[(CapabilityKind::Library, CapabilityState::Denied)],
        );

        assert_eq!(
            broker.state(CapabilityKind::Library),
            CapabilityState::Denied
        );
        assert_eq!(
            broker.request(CapabilityKind::Library).await,
            CapabilityState::Denied
        );
        assert_eq!(prompt.prompt_count(CapabilityKind::Library), 0);
    }

    #[tokio::test]
    async fn test_reset_allows_new_prompt() {
        let prompt = MockPermissions::denying();
        let broker = CapabilityBroker::new(prompt.clone());

        broker.request(CapabilityKind::Camera).await;
        broker.reset().await;
        assert_eq!(
            broker.state(CapabilityKind::Camera),
            CapabilityState::Undetermined
        );

        broker.request(CapabilityKind::Camera).await;
        assert_eq!(prompt.prompt_count(CapabilityKind::Camera), 2);
    }
}

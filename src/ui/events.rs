//! Widget Events Module
//!
//! Notifications a photo collection sends to the screen that owns it. A host
//! either implements [`CollectionListener`] directly or uses
//! [`ChannelListener`] to receive [`WidgetEvent`]s through a channel and
//! poll them from its UI loop.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use crate::core::error::AcquisitionFailure;

// =============================================================================
// Events
// =============================================================================

/// Events emitted by a collection manager
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetEvent {
    /// A newly acquired asset entered the collection
    AssetReady {
        /// Canonical payload of the asset
        payload: String,
    },

    /// The collection changed; carries the full ordered snapshot
    CollectionChanged {
        /// Canonical payloads in collection order
        snapshot: Vec<String>,
    },

    /// An acquisition attempt failed (never sent for a cancellation)
    AcquisitionError {
        /// Failure reason
        reason: AcquisitionFailure,
    },
}

impl WidgetEvent {
    /// Short event name, useful for logs
    pub fn name(&self) -> &'static str {
        match self {
            WidgetEvent::AssetReady { .. } => "asset_ready",
            WidgetEvent::CollectionChanged { .. } => "collection_changed",
            WidgetEvent::AcquisitionError { .. } => "acquisition_error",
        }
    }
}

// =============================================================================
// Listener trait
// =============================================================================

/// Callbacks fired by a collection manager
///
/// Every method has a no-op default so hosts only implement what they use.
pub trait CollectionListener {
    /// Fired once per asset that enters the collection, in order
    fn on_asset_ready(&self, _payload: &str) {}

    /// Fired after every successful add or remove with the full snapshot
    fn on_collection_changed(&self, _snapshot: &[String]) {}

    /// Fired for permission, encoding and device failures
    fn on_acquisition_error(&self, _reason: &AcquisitionFailure) {}
}

/// Listener that ignores every notification
#[derive(Debug, Clone, Copy, Default)]
pub struct NullListener;

impl CollectionListener for NullListener {}

impl<T: CollectionListener + ?Sized> CollectionListener for std::sync::Arc<T> {
    fn on_asset_ready(&self, payload: &str) {
        (**self).on_asset_ready(payload)
    }

    fn on_collection_changed(&self, snapshot: &[String]) {
        (**self).on_collection_changed(snapshot)
    }

    fn on_acquisition_error(&self, reason: &AcquisitionFailure) {
        (**self).on_acquisition_error(reason)
    }
}

// =============================================================================
// Channel listener
// =============================================================================

/// Listener that forwards notifications into a channel
#[derive(Debug, Clone)]
pub struct ChannelListener {
    sender: Sender<WidgetEvent>,
}

/// Receiving end of a [`ChannelListener`]
#[derive(Debug)]
pub struct WidgetEvents {
    receiver: Receiver<WidgetEvent>,
}

impl ChannelListener {
    /// Create a listener and the receiver the UI polls
    pub fn new() -> (Self, WidgetEvents) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, WidgetEvents { receiver })
    }

    fn send(&self, event: WidgetEvent) {
        // A dropped receiver means nobody is listening any more
        let _ = self.sender.send(event);
    }
}

impl CollectionListener for ChannelListener {
    fn on_asset_ready(&self, payload: &str) {
        self.send(WidgetEvent::AssetReady {
            payload: payload.to_string(),
        });
    }

    fn on_collection_changed(&self, snapshot: &[String]) {
        self.send(WidgetEvent::CollectionChanged {
            snapshot: snapshot.to_vec(),
        });
    }

    fn on_acquisition_error(&self, reason: &AcquisitionFailure) {
        self.send(WidgetEvent::AcquisitionError {
            reason: reason.clone(),
        });
    }
}

impl WidgetEvents {
    /// Poll one event without blocking
    pub fn try_recv_event(&self) -> Option<WidgetEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Take every pending event
    pub fn drain_events(&self) -> Vec<WidgetEvent> {
        std::iter::from_fn(|| self.try_recv_event()).collect()
    }
}

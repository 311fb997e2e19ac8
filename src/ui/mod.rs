//! UI Support Module
//!
//! Framework-agnostic glue between a photo collection and the screen that
//! hosts it.
//!
//! - [`events`] - Listener trait and channel-based event delivery
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use photo_capture::ui::{ChannelListener, WidgetEvent};
//!
//! let (listener, events) = ChannelListener::new();
//! // hand `listener` to a CollectionManager, then in the UI loop:
//! while let Some(event) = events.try_recv_event() {
//!     match event {
//!         WidgetEvent::AssetReady { payload } => { /* upload */ }
//!         WidgetEvent::CollectionChanged { snapshot } => { /* redraw */ }
//!         WidgetEvent::AcquisitionError { reason } => { /* log */ }
//!     }
//! }
//! # drop(listener);
//! ```

pub mod events;

pub use events::{ChannelListener, CollectionListener, NullListener, WidgetEvent, WidgetEvents};

//! Photo Capture Library
//!
//! A photo input widget for forms: take a picture or pick images from the
//! media library, turn them into upload-ready payloads, and keep them in an
//! ordered collection the user can review and prune.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`core`] - Configuration, error handling, assets, the collection and
//!   the collection manager that ties everything together
//! - [`device`] - Capability broker, acquisition orchestrator, asset
//!   encoders, confirmation gateways and the terminal/desktop frontends
//! - [`ui`] - Widget events and listeners for host applications
//! - [`cli`] - Command-line interface (only used by the binary)
//! - [`testdb`] - Mock platforms, data generators and scenarios
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use photo_capture::core::asset::SourceKind;
//! use photo_capture::core::config::Config;
//! use photo_capture::core::manager::CollectionManager;
//! use photo_capture::device::{
//!     encoder_for, AcquisitionOrchestrator, CapabilityBroker, TerminalAlerter,
//!     TerminalConfirmation, TerminalPermissions, TerminalPlatform,
//! };
//! use std::sync::Arc;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let config = Config::load_default()?;
//! let kind = config.platform.kind;
//!
//! let broker = Arc::new(CapabilityBroker::new(TerminalPermissions));
//! let platform = TerminalPlatform::new(config.library.clone());
//! let orchestrator = AcquisitionOrchestrator::new(platform, broker, kind);
//!
//! let manager = CollectionManager::new(
//!     &config.widget,
//!     orchestrator,
//!     encoder_for(kind),
//!     TerminalConfirmation,
//!     TerminalAlerter,
//! );
//!
//! manager.acquire(SourceKind::Library).await?;
//! println!("{} photo(s) selected", manager.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Testing Without a Camera
//!
//! The `testdb` module runs the whole pipeline against scripted platforms:
//!
//! ```rust,no_run
//! # async fn demo() {
//! let summary = photo_capture::testdb::run_scenarios(&[]).await;
//! println!("Passed: {}/{}", summary.passed, summary.total);
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod device;
pub mod testdb;
pub mod ui;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

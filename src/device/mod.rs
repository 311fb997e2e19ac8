//! Device interaction module
//!
//! Everything that talks to the operator or the platform: capability
//! prompts, the camera and media library, confirmation dialogs and alerts.
//!
//! # Submodules
//!
//! - `traits` - Platform seams and the request/response types crossing them
//! - `capability` - Capability broker caching permission decisions
//! - `orchestrator` - Acquisition orchestrator running one capture or pick
//! - `encoder` - Native and browser encoding strategies
//! - `confirm` - Confirmation gateway for destructive actions
//! - `terminal` - Terminal frontend (dialoguer prompts over a directory)
//! - `desktop` - Desktop frontend (native dialogs via rfd)
//!
//! # Architecture
//!
//! The pipeline only sees the traits in [`traits`] and [`confirm`]. Both the
//! real frontends and the mocks in `testdb` implement them, so the whole
//! acquisition flow runs the same against either.

pub mod capability;
pub mod confirm;
pub mod desktop;
pub mod encoder;
pub mod orchestrator;
pub mod terminal;
pub mod traits;

pub use capability::CapabilityBroker;
pub use confirm::{ConfirmationGateway, DesktopConfirmation, FixedConfirmation, TerminalConfirmation};
pub use desktop::{DesktopAlerter, DesktopPermissions, DesktopPlatform};
pub use encoder::{encoder_for, AssetEncoder, BrowserEncoder, NativeEncoder};
pub use orchestrator::{AcquisitionOrchestrator, AcquisitionOutcome};
pub use terminal::{TerminalAlerter, TerminalPermissions, TerminalPlatform};
pub use traits::{
    Alerter, CapabilityKind, CapabilityState, CapturePlatform, CaptureRequest, CaptureResponse,
    PermissionPrompt, Platform,
};

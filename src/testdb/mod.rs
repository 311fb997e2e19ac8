//! Test Database Module
//!
//! This module provides a testing framework for the photo widget that
//! exercises every part of the capture pipeline without a camera, a photo
//! library or an operator at the keyboard.
//!
//! # Features
//!
//! - **Mock Platforms**: Scripted permission prompts, camera/library
//!   interactions, confirmation dialogs and alerts
//! - **Data Generators**: Deterministic JPEG/PNG content and on-disk photo
//!   libraries
//! - **Scenarios**: End-to-end checks of the collection's observable
//!   behavior, runnable from tests and from the CLI
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use photo_capture::testdb::{run_scenarios, SCENARIOS};
//!
//! # async fn demo() {
//! let summary = run_scenarios(&[]).await;
//! println!("Passed: {}/{}", summary.passed, summary.total);
//! println!("{} scenarios available", SCENARIOS.len());
//! # }
//! ```

pub mod generator;
pub mod integration;
pub mod mock_device;

// Re-export commonly used types for convenience
pub use generator::MockDataGenerator;
pub use integration::{run_scenario, run_scenarios, ScenarioResult, ScenarioSummary, SCENARIOS};
pub use mock_device::{
    MockAlerter, MockCapturePlatform, MockConfirmation, MockPermissions, MockPlatformConfig,
    RecordingListener, ScriptedInteraction,
};

/// Prelude module for easy imports
pub mod prelude {
    pub use super::generator::MockDataGenerator;
    pub use super::mock_device::{
        MockAlerter, MockCapturePlatform, MockConfirmation, MockPermissions, RecordingListener,
    };
}

/// Get a list of all available scenario names
pub fn list_scenario_names() -> Vec<String> {
    SCENARIOS.iter().map(|(name, _)| name.to_string()).collect()
}

/// Print available scenarios to console
pub fn print_available_scenarios() {
    println!();
    println!("  Available scenarios:");
    println!();
    for (name, description) in SCENARIOS {
        println!("   • {} - {}", name, description);
    }
    println!();
    println!("  Total: {} scenarios available", SCENARIOS.len());
    println!();
}

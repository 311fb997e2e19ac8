//! Confirmation Gateway
//!
//! Destructive actions (removing a photo) ask the operator first. Platforms
//! disagree on how: a terminal prompt blocks, a native dialog is
//! asynchronous. Both sit behind the same async [`ConfirmationGateway`]
//! contract so the collection manager never has to know which one it got.

#![allow(async_fn_in_trait)]

use dialoguer::Confirm;
use log::{debug, warn};

/// Asks the operator to confirm a destructive action
pub trait ConfirmationGateway {
    /// Resolve to `true` only on an explicit affirmative answer
    async fn confirm(&self, message: &str) -> bool;
}

/// Headless gateway with a fixed answer
#[derive(Debug, Clone, Copy)]
pub struct FixedConfirmation {
    answer: bool,
}

impl FixedConfirmation {
    /// Always confirm
    pub fn always() -> Self {
        Self { answer: true }
    }

    /// Always decline
    pub fn never() -> Self {
        Self { answer: false }
    }
}

impl ConfirmationGateway for FixedConfirmation {
    async fn confirm(&self, message: &str) -> bool {
        debug!("Auto-answering '{}' with {}", message, self.answer);
        self.answer
    }
}

/// Blocking terminal prompt, run off the async thread
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirmation;

impl ConfirmationGateway for TerminalConfirmation {
    async fn confirm(&self, message: &str) -> bool {
        let prompt = message.to_string();
        let answer = tokio::task::spawn_blocking(move || {
            Confirm::new()
                .with_prompt(prompt)
                .default(false)
                .interact_opt()
        })
        .await;

        match answer {
            Ok(Ok(Some(answer))) => answer,
            // Escape / q dismisses the prompt
            Ok(Ok(None)) => false,
            Ok(Err(e)) => {
                warn!("Confirmation prompt failed: {}", e);
                false
            }
            Err(e) => {
                warn!("Confirmation prompt task failed: {}", e);
                false
            }
        }
    }
}

/// Native message dialog
#[derive(Debug, Clone, Default)]
pub struct DesktopConfirmation {
    title: String,
}

impl DesktopConfirmation {
    /// Create a dialog gateway with the given window title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl ConfirmationGateway for DesktopConfirmation {
    async fn confirm(&self, message: &str) -> bool {
        let result = rfd::AsyncMessageDialog::new()
            .set_title(self.title.as_str())
            .set_description(message)
            .set_level(rfd::MessageLevel::Warning)
            .set_buttons(rfd::MessageButtons::YesNo)
            .show()
            .await;
        matches!(result, rfd::MessageDialogResult::Yes)
    }
}

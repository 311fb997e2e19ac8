//! Progress and console output utilities for the CLI
//!
//! Key features:
//! - A spinner shown while an acquisition waits on a native dialog
//! - Consistent console markers for results
//! - Dual console + file writer for logging

use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::time::{Duration, Instant};

// ============================================================================
// Styles - Consistent visual appearance
// ============================================================================

/// Get the spinner style for waiting on the operator
fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⣾⣽⣻⢿⡿⣟⣯⣷")
}

// ============================================================================
// Console output helpers
// ============================================================================

/// Print a header section with a box
pub fn print_header(title: &str) {
    let width = 68;
    let title_padded = format!("{:^width$}", title, width = width - 4);
    println!();
    println!("╔{}╗", "═".repeat(width - 2));
    println!("║{}║", title_padded);
    println!("╚{}╝", "═".repeat(width - 2));
    println!();
}

/// Print a success message with checkmark
pub fn print_success(msg: &str) {
    println!("  ✓ {}", msg);
}

/// Print an info message with bullet
pub fn print_info(msg: &str) {
    println!("  • {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("  ⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    println!("  ✗ {}", msg);
}

// ============================================================================
// Acquisition spinner
// ============================================================================

/// Spinner shown while an acquisition is in flight
pub struct AcquisitionSpinner {
    spinner: ProgressBar,
    start_time: Instant,
}

impl AcquisitionSpinner {
    /// Start spinning with `msg`
    pub fn start(msg: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(80));
        spinner.set_message(msg.to_string());

        Self {
            spinner,
            start_time: Instant::now(),
        }
    }

    /// Spinner that draws nothing, for interactive terminal prompts
    pub fn hidden() -> Self {
        Self {
            spinner: ProgressBar::hidden(),
            start_time: Instant::now(),
        }
    }

    /// Time since the spinner started
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Finish with a summary message
    pub fn finish(&self, msg: &str) {
        self.spinner.finish_with_message(format!(
            "{} ({:.1}s)",
            msg,
            self.elapsed().as_secs_f64()
        ));
    }

    /// Finish and clear the spinner
    pub fn clear(&self) {
        self.spinner.finish_and_clear();
    }
}

// ============================================================================
// Utility functions
// ============================================================================

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Shorten a payload for display
pub fn abbreviate(payload: &str, max_len: usize) -> String {
    if payload.chars().count() <= max_len {
        return payload.to_string();
    }
    let head: String = payload.chars().take(max_len).collect();
    format!("{}… ({} chars)", head, payload.chars().count())
}

// ============================================================================
// Dual writer for file + console logging
// ============================================================================

/// A writer that writes to both console and file
///
/// Used for logging to both stderr and a log file simultaneously.
pub struct DualWriter {
    pub console: std::io::Stderr,
    pub file: std::fs::File,
}

impl Write for DualWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let _ = self.console.write(buf);
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let _ = self.console.flush();
        self.file.flush()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(500), "500 bytes");
        assert_eq!(format_bytes(1024), "1.0 KB");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(1048576), "1.00 MB");
        assert_eq!(format_bytes(1073741824), "1.00 GB");
    }

    #[test]
    fn test_abbreviate() {
        assert_eq!(abbreviate("data:abc", 20), "data:abc");
        assert_eq!(abbreviate("data:image/jpeg", 4), "data… (15 chars)");
    }

    #[test]
    fn test_dual_writer_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("log.txt");
        let mut writer = DualWriter {
            console: std::io::stderr(),
            file: std::fs::File::create(&path).unwrap(),
        };
        writeln!(writer, "hello").unwrap();
        writer.flush().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "hello\n");
    }

    #[test]
    fn test_hidden_spinner() {
        let spinner = AcquisitionSpinner::hidden();
        spinner.clear();
        assert!(spinner.elapsed() < Duration::from_secs(5));
    }
}

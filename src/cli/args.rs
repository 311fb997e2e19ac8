//! Command-line argument definitions
//!
//! This module defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Capture or pick photos into a photo collection from the terminal
#[derive(Parser, Debug)]
#[command(name = "photo-capture")]
#[command(version)]
#[command(about = "Capture or pick photos and produce upload-ready image payloads", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Collection mode: single or multiple (overrides config)
    #[arg(short, long, global = true, value_parser = ["single", "multiple"])]
    pub mode: Option<String>,

    /// Encoding policy: native or browser (overrides config)
    #[arg(short, long, global = true, value_parser = ["native", "browser"])]
    pub platform: Option<String>,

    /// Interactive frontend: terminal or desktop (overrides config)
    #[arg(short, long, global = true, value_parser = ["terminal", "desktop"])]
    pub frontend: Option<String>,

    /// Show the required hint while the collection is empty (overrides config)
    #[arg(short, long, global = true)]
    pub required: Option<bool>,

    /// Print collection snapshots as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Log level: error, warn, info, debug, trace (overrides config)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Take one photo with the camera
    Capture,

    /// Choose photos from the media library
    Pick,

    /// Interactive session: capture, pick, remove and list until done
    ///
    /// This is the default when no command is given.
    Session,

    /// Print the canonical payload of an image file
    Encode {
        /// Image file to encode
        file: PathBuf,
    },

    /// Generate a configuration file at a specific location
    GenerateConfig {
        /// Output path for the config file (defaults to standard location)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show current configuration
    ShowConfig,

    /// Run the built-in scenarios against mock platforms
    ///
    /// No camera, photo library or operator input is needed.
    Test {
        #[command(subcommand)]
        test_command: TestCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum TestCommands {
    /// Run all scenarios
    RunAll {
        /// Show every failed check
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run specific scenarios by name
    Run {
        /// Scenario names to run (comma-separated or multiple values)
        #[arg(value_delimiter = ',')]
        scenarios: Vec<String>,

        /// Show every failed check
        #[arg(short, long)]
        verbose: bool,
    },

    /// List all available scenarios
    ListScenarios,

    /// Generate a mock photo library
    ///
    /// Creates JPEG and PNG files in the specified directory for use as
    /// a library or camera folder.
    GenerateData {
        /// Output directory for generated files
        #[arg(short, long)]
        output: PathBuf,

        /// Number of files to generate
        #[arg(short = 'n', long, default_value = "20")]
        count: usize,
    },
}

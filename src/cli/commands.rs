//! Command handler implementations
//!
//! This module contains the implementation of all CLI commands. Commands
//! that drive a photo widget build one [`CollectionManager`] for the
//! configured frontend and run it on a current-thread tokio runtime.

use crate::cli::progress::{
    abbreviate, format_bytes, print_error, print_header, print_info, print_success,
    print_warning, AcquisitionSpinner,
};
use crate::cli::{Args, Commands, TestCommands};
use crate::core::asset::{RawAsset, SourceKind};
use crate::core::cancel::CancellationToken;
use crate::core::collection::CollectionMode;
use crate::core::config::{write_default_config, Config, Frontend};
use crate::core::error::CaptureError;
use crate::core::manager::{AcquireReport, CollectionManager, RemoveOutcome};
use crate::device::capability::CapabilityBroker;
use crate::device::confirm::{ConfirmationGateway, DesktopConfirmation, TerminalConfirmation};
use crate::device::desktop::{DesktopAlerter, DesktopPermissions, DesktopPlatform};
use crate::device::encoder::{encoder_for, AssetEncoder, NativeEncoder};
use crate::device::orchestrator::AcquisitionOrchestrator;
use crate::device::terminal::{TerminalAlerter, TerminalPermissions, TerminalPlatform};
use crate::device::traits::{Alerter, CapturePlatform, PermissionPrompt, Platform};
use crate::testdb::{self, MockDataGenerator};
use crate::ui::events::{ChannelListener, WidgetEvent, WidgetEvents};
use anyhow::{bail, Result};
use dialoguer::Select;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What a widget command does once the manager is built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WidgetAction {
    Capture,
    Pick,
    Session,
}

/// Run the appropriate command based on CLI arguments
///
/// `shutdown` is cancelled by the Ctrl+C handler and disposes the widget.
pub fn run_command(args: &Args, config: &Config, shutdown: CancellationToken) -> Result<()> {
    match &args.command {
        Some(Commands::GenerateConfig { output }) => generate_config_file(output.clone()),
        Some(Commands::ShowConfig) => {
            show_config(config);
            Ok(())
        }
        Some(Commands::Encode { file }) => encode_file(file, args.json),
        Some(Commands::Test { test_command }) => handle_test_command(test_command),
        Some(Commands::Capture) => run_widget(config, shutdown, WidgetAction::Capture, args.json),
        Some(Commands::Pick) => run_widget(config, shutdown, WidgetAction::Pick, args.json),
        Some(Commands::Session) | None => {
            run_widget(config, shutdown, WidgetAction::Session, args.json)
        }
    }
}

/// Apply command-line overrides on top of the loaded configuration
pub fn apply_overrides(args: &Args, config: &mut Config) {
    match args.mode.as_deref() {
        Some("single") => config.widget.mode = CollectionMode::Single,
        Some("multiple") => config.widget.mode = CollectionMode::Multiple,
        _ => {}
    }
    match args.platform.as_deref() {
        Some("native") => config.platform.kind = Platform::Native,
        Some("browser") => config.platform.kind = Platform::Browser,
        _ => {}
    }
    match args.frontend.as_deref() {
        Some("terminal") => config.platform.frontend = Frontend::Terminal,
        Some("desktop") => config.platform.frontend = Frontend::Desktop,
        _ => {}
    }
    if let Some(required) = args.required {
        config.widget.required = required;
    }
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

// ============================================================================
// Widget commands
// ============================================================================

fn run_widget(
    config: &Config,
    shutdown: CancellationToken,
    action: WidgetAction,
    json: bool,
) -> Result<()> {
    match config.platform.frontend {
        Frontend::Terminal => drive_widget(
            config,
            TerminalPlatform::new(config.library.clone()),
            TerminalPermissions,
            TerminalConfirmation,
            TerminalAlerter,
            shutdown,
            action,
            json,
        ),
        Frontend::Desktop => drive_widget(
            config,
            DesktopPlatform::new(config.library.clone()),
            DesktopPermissions,
            DesktopConfirmation::new(config.messages.error_title.clone()),
            DesktopAlerter,
            shutdown,
            action,
            json,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn drive_widget<P, Q, G, A>(
    config: &Config,
    platform: P,
    prompt: Q,
    confirmation: G,
    alerter: A,
    shutdown: CancellationToken,
    action: WidgetAction,
    json: bool,
) -> Result<()>
where
    P: CapturePlatform,
    Q: PermissionPrompt,
    G: ConfirmationGateway,
    A: Alerter,
{
    let kind = config.platform.kind;
    let broker = Arc::new(CapabilityBroker::with_presets(
        prompt,
        &config.permissions.presets(),
    ));
    let orchestrator = AcquisitionOrchestrator::new(platform, broker, kind);
    let (listener, events) = ChannelListener::new();

    let manager = CollectionManager::new(
        &config.widget,
        orchestrator,
        encoder_for(kind),
        confirmation,
        alerter,
    )
    .with_listener(listener)
    .with_messages(config.messages.clone())
    .with_cancellation(shutdown);

    info!(
        "Photo widget ready ({} mode, {} platform, {} item(s) preloaded)",
        manager.mode(),
        kind,
        manager.len()
    );

    let spinner = config.platform.frontend == Frontend::Desktop;
    let rt = runtime()?;
    let result = rt.block_on(async {
        match action {
            WidgetAction::Capture => acquire_once(&manager, &events, SourceKind::Camera, spinner)
                .await
                .map(|_| ()),
            WidgetAction::Pick => acquire_once(&manager, &events, SourceKind::Library, spinner)
                .await
                .map(|_| ()),
            WidgetAction::Session => run_session(&manager, &events, spinner).await,
        }
    });
    // Leave any prompt still blocked on stdin behind
    rt.shutdown_background();
    result?;

    print_collection(&manager, json)?;
    Ok(())
}

async fn acquire_once<P, Q, G, A>(
    manager: &CollectionManager<P, Q, G, A>,
    events: &WidgetEvents,
    source: SourceKind,
    spinner: bool,
) -> Result<AcquireReport>
where
    P: CapturePlatform,
    Q: PermissionPrompt,
    G: ConfirmationGateway,
    A: Alerter,
{
    let progress = if spinner {
        AcquisitionSpinner::start(match source {
            SourceKind::Camera => "Waiting for the camera...",
            SourceKind::Library => "Waiting for the photo library...",
        })
    } else {
        AcquisitionSpinner::hidden()
    };

    let report = manager.acquire(source).await;
    match &report {
        Ok(AcquireReport::Added { count }) if spinner => {
            progress.finish(&format!("Added {} photo(s)", count))
        }
        _ => progress.clear(),
    }

    match report {
        Ok(report) => {
            match &report {
                AcquireReport::Added { count } => {
                    if !spinner {
                        print_success(&format!("Added {} photo(s)", count))
                    }
                }
                AcquireReport::Cancelled => print_info("Cancelled"),
                AcquireReport::Failed(reason) => debug!("Acquisition failed: {}", reason.code()),
                AcquireReport::Discarded => print_warning("Interrupted, result discarded"),
            }
            report_events(events);
            Ok(report)
        }
        Err(CaptureError::Disposed) => Ok(AcquireReport::Discarded),
        Err(e) => Err(e.into()),
    }
}

/// Log what the widget notified since the last call
fn report_events(events: &WidgetEvents) {
    for event in events.drain_events() {
        match event {
            WidgetEvent::AssetReady { payload } => {
                debug!("Photo ready: {}", abbreviate(&payload, 48))
            }
            WidgetEvent::CollectionChanged { snapshot } => {
                info!("Collection now holds {} photo(s)", snapshot.len())
            }
            WidgetEvent::AcquisitionError { reason } => {
                info!("Acquisition failed ({}): {}", reason.code(), reason)
            }
        }
    }
}

const SESSION_ACTIONS: [&str; 5] = [
    "Take a photo",
    "Choose from library",
    "Remove a photo",
    "List photos",
    "Done",
];

/// Blocking dialoguer menu, run off the async thread
async fn choose(prompt: String, items: Vec<String>) -> Result<Option<usize>> {
    let choice = tokio::task::spawn_blocking(move || {
        Select::new()
            .with_prompt(prompt)
            .items(&items)
            .default(0)
            .interact_opt()
    })
    .await??;
    Ok(choice)
}

async fn run_session<P, Q, G, A>(
    manager: &CollectionManager<P, Q, G, A>,
    events: &WidgetEvents,
    spinner: bool,
) -> Result<()>
where
    P: CapturePlatform,
    Q: PermissionPrompt,
    G: ConfirmationGateway,
    A: Alerter,
{
    print_header("Photo Session");

    while !manager.is_disposed() {
        if let Some(hint) = manager.required_hint() {
            print_warning(hint);
        }

        let actions = SESSION_ACTIONS.iter().map(|a| a.to_string()).collect();
        let choice = choose("What next?".to_string(), actions).await?;
        match choice {
            Some(0) => {
                acquire_once(manager, events, SourceKind::Camera, spinner).await?;
            }
            Some(1) => {
                acquire_once(manager, events, SourceKind::Library, spinner).await?;
            }
            Some(2) => remove_interactive(manager, events).await?,
            Some(3) => list_items(manager),
            _ => break,
        }
    }

    if manager.is_disposed() {
        print_warning("Session interrupted");
    }
    Ok(())
}

async fn remove_interactive<P, Q, G, A>(
    manager: &CollectionManager<P, Q, G, A>,
    events: &WidgetEvents,
) -> Result<()>
where
    P: CapturePlatform,
    Q: PermissionPrompt,
    G: ConfirmationGateway,
    A: Alerter,
{
    let labels: Vec<String> = manager.items().iter().map(|item| item.label()).collect();
    if labels.is_empty() {
        print_info("No photos to remove");
        return Ok(());
    }

    let index = match manager.mode() {
        CollectionMode::Single => 0,
        CollectionMode::Multiple => {
            match choose("Remove which photo?".to_string(), labels).await? {
                Some(index) => index,
                None => return Ok(()),
            }
        }
    };

    match manager.remove(index).await {
        Ok(RemoveOutcome::Removed) => print_success("Photo removed"),
        Ok(RemoveOutcome::Declined) => print_info("Kept"),
        Ok(RemoveOutcome::NothingToRemove) => print_info("No photo at that position"),
        Err(CaptureError::Disposed) => {}
        Err(e) => return Err(e.into()),
    }
    report_events(events);
    Ok(())
}

fn list_items<P, Q, G, A>(manager: &CollectionManager<P, Q, G, A>)
where
    P: CapturePlatform,
    Q: PermissionPrompt,
    G: ConfirmationGateway,
    A: Alerter,
{
    let items = manager.items();
    if items.is_empty() {
        print_info("No photos yet");
        return;
    }
    for (i, item) in items.iter().enumerate() {
        println!(
            "  [{}] {} ({})",
            i + 1,
            item.label(),
            format_bytes(item.encoded_payload().len() as u64)
        );
    }
}

fn print_collection<P, Q, G, A>(manager: &CollectionManager<P, Q, G, A>, json: bool) -> Result<()>
where
    P: CapturePlatform,
    Q: PermissionPrompt,
    G: ConfirmationGateway,
    A: Alerter,
{
    if json {
        let snapshot = serde_json::json!({
            "mode": manager.mode(),
            "items": manager.snapshot(),
            "required_hint": manager.required_hint(),
        });
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!();
    println!("  Collection ({} mode): {} photo(s)", manager.mode(), manager.len());
    for (i, payload) in manager.snapshot().iter().enumerate() {
        println!("  [{}] {}", i + 1, abbreviate(payload, 60));
    }
    if let Some(hint) = manager.required_hint() {
        print_warning(hint);
    }
    Ok(())
}

// ============================================================================
// Encode
// ============================================================================

/// Print the canonical payload of one image file
pub fn encode_file(file: &Path, json: bool) -> Result<()> {
    let asset = NativeEncoder.encode(&RawAsset::local_file(file, SourceKind::Library))?;
    let payload = asset.encoded_payload();
    info!(
        "Encoded {} into {}",
        file.display(),
        format_bytes(payload.len() as u64)
    );

    if json {
        let out = serde_json::json!({
            "file": file.display().to_string(),
            "payload": payload,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", payload);
    }
    Ok(())
}

// ============================================================================
// Configuration
// ============================================================================

/// Generate a configuration file at the specified or default location
pub fn generate_config_file(output: Option<PathBuf>) -> Result<()> {
    let path = write_default_config(output)?;

    info!("Configuration file: {}", path.display());
    info!("Edit this file to customize the photo widget.");
    info!("");
    info!("Quick tip: Run 'photo-capture show-config' to verify your settings.");

    Ok(())
}

/// Show the current configuration settings
pub fn show_config(config: &Config) {
    let config_path = Config::get_active_config_path();
    info!("Configuration file: {}", config_path.display());
    if !config_path.exists() {
        info!("(Using default settings - no config file found)");
    }
    info!("");
    info!("Current Configuration:");
    info!("----------------------");
    info!("[widget]");
    info!("  mode = \"{}\"", config.widget.mode);
    info!("  required = {}", config.widget.required);
    info!("  initial_items = {} item(s)", config.widget.initial_items.len());
    info!("");
    info!("[platform]");
    info!("  kind = \"{}\"", config.platform.kind);
    info!("  frontend = {:?}", config.platform.frontend);
    info!("");
    info!("[library]");
    info!("  directory = \"{}\"", config.library.directory.display());
    info!(
        "  camera_directory = \"{}\"",
        config.library.camera_directory.display()
    );
    info!("  extensions = {:?}", config.library.extensions);
    info!("  recursive = {}", config.library.recursive);
    info!("");
    info!("[permissions]");
    info!("  camera = {:?}", config.permissions.camera);
    info!("  library = {:?}", config.permissions.library);
    info!("");
    info!("[messages]");
    info!("  error_title = {:?}", config.messages.error_title);
    info!(
        "  remove_confirmation = {:?}",
        config.messages.remove_confirmation
    );
    info!("  required_hint = {:?}", config.messages.required_hint);
    info!("");
    info!("[logging]");
    info!("  level = \"{}\"", config.logging.level);
    info!("  log_to_file = {}", config.logging.log_to_file);
    info!("  log_file = \"{}\"", config.logging.log_file.display());
}

// ============================================================================
// Test commands
// ============================================================================

/// Handle `photo-capture test ...`
pub fn handle_test_command(test_command: &TestCommands) -> Result<()> {
    match test_command {
        TestCommands::RunAll { verbose } => test_run_scenarios(&[], *verbose),
        TestCommands::Run { scenarios, verbose } => test_run_scenarios(scenarios, *verbose),
        TestCommands::ListScenarios => {
            testdb::print_available_scenarios();
            Ok(())
        }
        TestCommands::GenerateData { output, count } => test_generate_data(output, *count),
    }
}

fn test_run_scenarios(names: &[String], verbose: bool) -> Result<()> {
    print_header("Photo Widget Scenarios");

    let summary = runtime()?.block_on(testdb::run_scenarios(names));
    for result in &summary.results {
        if result.passed {
            print_success(&format!(
                "{} ({:.0} ms)",
                result.name,
                result.duration.as_secs_f64() * 1000.0
            ));
        } else {
            print_error(&result.name);
            if verbose {
                for failure in &result.failures {
                    println!("      - {}", failure);
                }
            }
        }
    }

    println!(
        "\n  Scenarios complete: {}/{} passed",
        summary.passed, summary.total
    );

    if !summary.all_passed() {
        bail!("{} scenario(s) failed", summary.total - summary.passed);
    }
    Ok(())
}

fn test_generate_data(output: &Path, count: usize) -> Result<()> {
    println!("\n  Generating mock photo library...");
    println!("   Output: {}", output.display());
    println!("   Count: {} files", count);
    println!();

    let paths = MockDataGenerator::write_library(output, count)?;
    print_success(&format!(
        "Generated {} files in {}",
        paths.len(),
        output.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_apply_overrides() {
        let args = Args::parse_from([
            "photo-capture",
            "--mode",
            "multiple",
            "--platform",
            "browser",
            "--frontend",
            "desktop",
            "--required",
            "true",
            "--log-level",
            "debug",
        ]);
        let mut config = Config::default();
        apply_overrides(&args, &mut config);

        assert_eq!(config.widget.mode, CollectionMode::Multiple);
        assert_eq!(config.platform.kind, Platform::Browser);
        assert_eq!(config.platform.frontend, Frontend::Desktop);
        assert!(config.widget.required);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let args = Args::parse_from(["photo-capture", "show-config"]);
        let mut config = Config::default();
        config.widget.mode = CollectionMode::Multiple;
        apply_overrides(&args, &mut config);
        assert_eq!(config.widget.mode, CollectionMode::Multiple);
        assert_eq!(config.platform.kind, Platform::Native);
    }

    #[test]
    fn test_encode_file_rejects_non_image() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.jpg");
        std::fs::write(&path, b"not a photo").unwrap();
        assert!(encode_file(&path, false).is_err());

        let photo = dir.path().join("photo.jpg");
        std::fs::write(&photo, MockDataGenerator::generate_jpeg_header(128)).unwrap();
        assert!(encode_file(&photo, true).is_ok());
    }

    #[test]
    fn test_generate_data_and_scenarios() {
        let dir = TempDir::new().unwrap();
        test_generate_data(&dir.path().join("roll"), 4).unwrap();
        assert_eq!(std::fs::read_dir(dir.path().join("roll")).unwrap().count(), 4);

        assert!(test_run_scenarios(&["required_hint".to_string()], true).is_ok());
        assert!(test_run_scenarios(&["missing".to_string()], false).is_err());
    }
}

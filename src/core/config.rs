//! Configuration module for the photo capture tool
//!
//! Supports loading configuration from a TOML file.
//! Configuration is stored in a standard location:
//! - Windows: %APPDATA%\photo_capture\config.toml
//! - Linux: ~/.config/photo_capture/config.toml
//! - macOS: ~/Library/Application Support/photo_capture/config.toml

use crate::core::collection::CollectionMode;
use crate::device::traits::{CapabilityKind, CapabilityState, Platform};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application name used for config directory
const APP_NAME: &str = "photo_capture";

/// Default config file name
const CONFIG_FILE_NAME: &str = "config.toml";

/// Local override file names, checked before the standard location
const LOCAL_CONFIG_FILES: [&str; 2] = ["./config.toml", "./photo_capture.toml"];

/// Get the standard configuration directory for the application.
pub fn get_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_NAME))
}

/// Get the standard configuration file path.
pub fn get_config_path() -> Option<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Ensure the configuration directory exists.
pub fn ensure_config_dir() -> Result<PathBuf, ConfigError> {
    let config_dir = get_config_dir().ok_or(ConfigError::ConfigDirNotFound)?;

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)
            .map_err(|e| ConfigError::WriteError(config_dir.clone(), e.to_string()))?;
    }

    Ok(config_dir)
}

/// Write the default config template to `path`, or to the standard
/// location when `path` is `None`. Returns the path written.
pub fn write_default_config(path: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    let path = match path {
        Some(path) => path,
        None => ensure_config_dir()?.join(CONFIG_FILE_NAME),
    };
    fs::write(&path, Config::generate_default_config())
        .map_err(|e| ConfigError::WriteError(path.clone(), e.to_string()))?;
    Ok(path)
}

/// Which interactive frontend drives the capture platform
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Frontend {
    /// Terminal prompts and a library directory
    #[default]
    Terminal,
    /// Native file and message dialogs
    Desktop,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Widget construction settings
    pub widget: WidgetConfig,

    /// Platform settings
    pub platform: PlatformConfig,

    /// Library and camera directories for the terminal frontend
    pub library: LibraryConfig,

    /// Capability decisions known before the first prompt
    pub permissions: PermissionsConfig,

    /// User-visible texts
    pub messages: MessagesConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

/// Configuration accepted when a photo widget is constructed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Single image or list of images
    pub mode: CollectionMode,

    /// Show a hint while the collection is empty
    pub required: bool,

    /// Payloads already attached to the record being edited
    pub initial_items: Vec<String>,
}

impl WidgetConfig {
    /// Widget config for `mode` with nothing preloaded
    pub fn new(mode: CollectionMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    /// Mark the widget as required
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Preload payloads
    pub fn with_initial_items(mut self, items: Vec<String>) -> Self {
        self.initial_items = items;
        self
    }
}

/// Platform configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Encoding policy: native or browser
    pub kind: Platform,

    /// Interactive frontend: terminal or desktop
    pub frontend: Frontend,
}

/// Library configuration for the terminal frontend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Directory browsed as the media library
    pub directory: PathBuf,

    /// Directory the camera drops new shots into
    pub camera_directory: PathBuf,

    /// File extensions listed in the library (lowercase, without dot)
    pub extensions: Vec<String>,

    /// Include subdirectories
    pub recursive: bool,
}

/// Capability decisions applied before any prompt
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PermissionsConfig {
    /// Camera decision (`undetermined` prompts on first use)
    pub camera: CapabilityState,

    /// Media library decision
    pub library: CapabilityState,
}

impl PermissionsConfig {
    /// Decisions that are already known, for seeding the broker
    pub fn presets(&self) -> Vec<(CapabilityKind, CapabilityState)> {
        [
            (CapabilityKind::Camera, self.camera),
            (CapabilityKind::Library, self.library),
        ]
        .into_iter()
        .filter(|(_, state)| state.is_determined())
        .collect()
    }
}

/// User-visible texts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessagesConfig {
    /// Alert title for failed acquisitions
    pub error_title: String,

    /// Shown when camera access is denied
    pub camera_permission_denied: String,

    /// Shown when media library access is denied
    pub library_permission_denied: String,

    /// Shown when a file cannot be encoded
    pub encoding_failed: String,

    /// Shown when the platform interaction fails
    pub device_failed: String,

    /// Asked before removing a photo
    pub remove_confirmation: String,

    /// Hint while a required collection is empty
    pub required_hint: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log to file
    pub log_to_file: bool,

    /// Log file path
    pub log_file: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        let pictures = dirs::picture_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            camera_directory: pictures.join("Camera"),
            directory: pictures,
            extensions: vec![
                "jpg".to_string(),
                "jpeg".to_string(),
                "png".to_string(),
            ],
            recursive: true,
        }
    }
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            error_title: "Photo".to_string(),
            camera_permission_denied:
                "Camera access is required to take a photo. Enable it in the system settings."
                    .to_string(),
            library_permission_denied:
                "Photo library access is required to choose a photo. Enable it in the system settings."
                    .to_string(),
            encoding_failed: "The photo could not be processed.".to_string(),
            device_failed: "The photo could not be acquired.".to_string(),
            remove_confirmation: "Remove this photo?".to_string(),
            required_hint: "At least one photo required".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: false,
            log_file: PathBuf::from("./photo_capture.log"),
        }
    }
}

impl LibraryConfig {
    /// Check if `path` has one of the configured extensions
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .map(|e| self.extensions.iter().any(|allowed| *allowed == e))
            .unwrap_or(false)
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;

        Self::from_toml(&content).map_err(|e| match e {
            ConfigError::ParseError(_, msg) => ConfigError::ParseError(path.to_path_buf(), msg),
            other => other,
        })
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(PathBuf::new(), e.to_string()))
    }

    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./config.toml (current directory - for development/override)
    /// 2. ./photo_capture.toml (current directory - alternative name)
    /// 3. Standard config location
    ///
    /// If no config file is found, returns default configuration.
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_from_paths(&Self::search_paths())
    }

    /// Load the first existing file in `paths`, or defaults
    pub fn load_from_paths(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Get the path where the config file is (or would be) located.
    pub fn get_active_config_path() -> PathBuf {
        Self::search_paths()
            .into_iter()
            .find(|path| path.exists())
            .or_else(get_config_path)
            .unwrap_or_else(|| PathBuf::from("./config.toml"))
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = LOCAL_CONFIG_FILES.iter().map(PathBuf::from).collect();
        if let Some(standard) = get_config_path() {
            paths.push(standard);
        }
        paths
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        fs::write(path.as_ref(), content)
            .map_err(|e| ConfigError::WriteError(path.as_ref().to_path_buf(), e.to_string()))?;

        Ok(())
    }

    /// Generate a default config file with comments
    pub fn generate_default_config() -> String {
        include_str!("../../config.example.toml").to_string()
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    /// Configuration file was not found at the specified path
    FileNotFound(PathBuf),
    /// Failed to read the configuration file
    ReadError(PathBuf, String),
    /// Failed to parse the configuration file (invalid TOML)
    ParseError(PathBuf, String),
    /// Failed to serialize configuration to TOML
    SerializeError(String),
    /// Failed to write configuration file
    WriteError(PathBuf, String),
    /// Could not determine config directory
    ConfigDirNotFound,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ReadError(path, err) => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::ParseError(path, err) => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::SerializeError(err) => {
                write!(f, "Failed to serialize configuration: {}", err)
            }
            ConfigError::WriteError(path, err) => {
                write!(
                    f,
                    "Failed to write config file '{}': {}",
                    path.display(),
                    err
                )
            }
            ConfigError::ConfigDirNotFound => {
                write!(f, "Could not determine configuration directory")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

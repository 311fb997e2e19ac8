//! Terminal frontend
//!
//! Implements the platform seams with dialoguer prompts over plain
//! directories: the media library is a folder of pictures, the camera is
//! the folder a tethered camera (or phone sync) drops new shots into.

use crate::core::asset::RawAsset;
use crate::core::config::LibraryConfig;
use crate::core::error::{CaptureError, Result};
use crate::device::encoder::encode_bytes;
use crate::device::traits::{
    Alerter, CapabilityKind, CapturePlatform, CaptureRequest, CaptureResponse, PermissionPrompt,
};
use dialoguer::{Confirm, Input, MultiSelect, Select};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use walkdir::WalkDir;

fn prompt_error(e: dialoguer::Error) -> CaptureError {
    CaptureError::Device(format!("Failed to read input: {}", e))
}

/// Run a blocking dialoguer interaction off the async thread
async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CaptureError::Device(format!("Prompt task failed: {}", e)))?
}

/// Resolve a path typed at the camera prompt; empty input cancels
pub fn typed_photo(typed: &str) -> Result<Option<PathBuf>> {
    let typed = typed.trim();
    if typed.is_empty() {
        return Ok(None);
    }
    let path = PathBuf::from(typed);
    if !path.is_file() {
        return Err(CaptureError::Device(format!(
            "No photo at {}",
            path.display()
        )));
    }
    Ok(Some(path))
}

/// List the pictures under `dir` accepted by `config`, sorted by path
pub fn collect_library(config: &LibraryConfig, dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(CaptureError::Device(format!(
            "Library folder does not exist: {}",
            dir.display()
        )));
    }

    let walker = WalkDir::new(dir).max_depth(if config.recursive { usize::MAX } else { 1 });
    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|entry| entry.file_type().is_file() && config.accepts(entry.path()))
        .map(|entry| entry.into_path())
        .collect();
    files.sort();

    debug!("Found {} picture(s) in {}", files.len(), dir.display());
    Ok(files)
}

/// Most recently modified picture in `dir`
pub fn newest_picture(config: &LibraryConfig, dir: &Path) -> Result<Option<PathBuf>> {
    let newest = collect_library(config, dir)?
        .into_iter()
        .map(|path| {
            let modified = fs::metadata(&path)
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, path)
        })
        .max_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)))
        .map(|(_, path)| path);
    Ok(newest)
}

/// Convert a chosen file into what the request asked for
///
/// With `base64` set the platform hands back an inline data URI instead of
/// the file reference.
pub fn to_raw_asset(path: PathBuf, request: &CaptureRequest) -> Result<RawAsset> {
    if !request.base64 {
        return Ok(RawAsset::local_file(path, request.source));
    }
    let bytes = fs::read(&path).map_err(|e| {
        CaptureError::Device(format!("Failed to read {}: {}", path.display(), e))
    })?;
    let mut raw = RawAsset::uri(encode_bytes(&bytes), request.source);
    raw.file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    Ok(raw)
}

fn label(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Camera and library backed by local folders
#[derive(Debug, Clone)]
pub struct TerminalPlatform {
    config: LibraryConfig,
}

impl TerminalPlatform {
    /// Create a terminal platform over the configured folders
    pub fn new(config: LibraryConfig) -> Self {
        Self { config }
    }
}

impl CapturePlatform for TerminalPlatform {
    async fn capture(&self, request: &CaptureRequest) -> Result<CaptureResponse> {
        let config = self.config.clone();
        let dir = self.config.camera_directory.clone();

        let chosen = blocking(move || {
            println!();
            println!("  Take the photo now, then continue once the camera has saved it.");
            println!("  Watching: {}", dir.display());
            println!();

            let ready = Confirm::new()
                .with_prompt("Photo taken?")
                .default(true)
                .interact_opt()
                .map_err(prompt_error)?;
            if ready != Some(true) {
                return Ok(None);
            }

            let newest = if dir.is_dir() {
                newest_picture(&config, &dir)?
            } else {
                None
            };
            if let Some(path) = newest {
                let name = label(&dir, &path);
                let keep = Confirm::new()
                    .with_prompt(format!("Use {}?", name))
                    .default(true)
                    .interact_opt()
                    .map_err(prompt_error)?;
                if keep == Some(true) {
                    return Ok(Some(path));
                }
            }

            let typed: String = Input::new()
                .with_prompt("Path to the photo (empty to cancel)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_error)?;
            typed_photo(&typed)
        })
        .await?;

        match chosen {
            Some(path) => {
                info!("Captured {}", path.display());
                Ok(CaptureResponse::Selected(vec![to_raw_asset(path, request)?]))
            }
            None => Ok(CaptureResponse::Dismissed),
        }
    }

    async fn pick(&self, request: &CaptureRequest) -> Result<CaptureResponse> {
        let dir = self.config.directory.clone();
        let files = collect_library(&self.config, &dir)?;
        if files.is_empty() {
            println!("  No photos found in {}", dir.display());
            return Ok(CaptureResponse::Dismissed);
        }

        let labels: Vec<String> = files.iter().map(|path| label(&dir, path)).collect();
        let allow_multiple = request.allow_multiple;

        let picked = blocking(move || {
            if allow_multiple {
                MultiSelect::new()
                    .with_prompt("Choose photos (space to select, enter to confirm)")
                    .items(&labels)
                    .interact_opt()
                    .map_err(prompt_error)
            } else {
                Select::new()
                    .with_prompt("Choose a photo")
                    .items(&labels)
                    .default(0)
                    .interact_opt()
                    .map(|choice| choice.map(|index| vec![index]))
                    .map_err(prompt_error)
            }
        })
        .await?;

        let indices = match picked {
            Some(indices) if !indices.is_empty() => indices,
            _ => return Ok(CaptureResponse::Dismissed),
        };

        let assets = indices
            .into_iter()
            .filter_map(|index| files.get(index).cloned())
            .map(|path| to_raw_asset(path, request))
            .collect::<Result<Vec<_>>>()?;
        info!("Picked {} photo(s) from {}", assets.len(), dir.display());
        Ok(CaptureResponse::Selected(assets))
    }
}

/// Permission prompt asked on the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalPermissions;

impl PermissionPrompt for TerminalPermissions {
    async fn prompt(&self, kind: CapabilityKind) -> Result<bool> {
        let answer = blocking(move || {
            Confirm::new()
                .with_prompt(format!("Allow access to the {}?", kind.display_name()))
                .default(false)
                .interact_opt()
                .map_err(prompt_error)
        })
        .await?;
        Ok(answer == Some(true))
    }
}

/// Alerts printed to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalAlerter;

impl Alerter for TerminalAlerter {
    async fn alert(&self, title: &str, message: &str) {
        warn!("{}: {}", title, message);
        eprintln!("\n  ⚠ {}: {}\n", title, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::encoder::decode_payload;
    use crate::testdb::generator::MockDataGenerator;
    use tempfile::TempDir;

    #[test]
    fn test_typed_photo_must_exist() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shot.jpg");
        fs::write(&path, MockDataGenerator::generate_jpeg_header(64)).unwrap();

        assert_eq!(typed_photo("   ").unwrap(), None);
        assert_eq!(
            typed_photo(&format!("  {}  ", path.display())).unwrap(),
            Some(path.clone())
        );

        let missing = dir.path().join("shoot.jpg");
        match typed_photo(&missing.display().to_string()) {
            Err(CaptureError::Device(msg)) => assert!(msg.contains("shoot.jpg")),
            other => panic!("expected a device error, got {:?}", other),
        }
        assert!(matches!(
            typed_photo(&dir.path().display().to_string()),
            Err(CaptureError::Device(_))
        ));
    }

    fn library_config(dir: &Path, recursive: bool) -> LibraryConfig {
        LibraryConfig {
            directory: dir.to_path_buf(),
            camera_directory: dir.to_path_buf(),
            extensions: vec!["jpg".to_string(), "png".to_string()],
            recursive,
        }
    }

    #[test]
    fn test_collect_library_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("2024")).unwrap();
        fs::write(dir.path().join("b.jpg"), b"x").unwrap();
        fs::write(dir.path().join("a.PNG"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::write(dir.path().join("2024").join("c.jpg"), b"x").unwrap();

        let flat = collect_library(&library_config(dir.path(), false), dir.path()).unwrap();
        let names: Vec<_> = flat
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.PNG", "b.jpg"]);

        let deep = collect_library(&library_config(dir.path(), true), dir.path()).unwrap();
        assert_eq!(deep.len(), 3);
    }

    #[test]
    fn test_missing_library_is_device_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        let result = collect_library(&library_config(dir.path(), true), &missing);
        assert!(matches!(result, Err(CaptureError::Device(_))));
    }

    #[test]
    fn test_newest_picture() {
        let dir = TempDir::new().unwrap();
        let config = library_config(dir.path(), false);
        assert_eq!(newest_picture(&config, dir.path()).unwrap(), None);

        let old = dir.path().join("old.jpg");
        let new = dir.path().join("new.jpg");
        fs::write(&old, b"x").unwrap();
        fs::write(&new, b"x").unwrap();
        let earlier = SystemTime::now() - std::time::Duration::from_secs(3600);
        fs::File::options()
            .write(true)
            .open(&old)
            .unwrap()
            .set_modified(earlier)
            .unwrap();

        assert_eq!(newest_picture(&config, dir.path()).unwrap(), Some(new));
    }

    #[test]
    fn test_to_raw_asset_honors_base64() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("shot.jpg");
        let bytes = MockDataGenerator::generate_jpeg_with_seed(256, 4);
        fs::write(&path, &bytes).unwrap();

        let by_reference = to_raw_asset(path.clone(), &CaptureRequest::camera()).unwrap();
        assert_eq!(by_reference.local_path(), Some(path.as_path()));

        let inline =
            to_raw_asset(path, &CaptureRequest::library(false).with_base64(true)).unwrap();
        assert!(inline.local_path().is_none());
        assert_eq!(inline.file_name.as_deref(), Some("shot.jpg"));
        assert_eq!(decode_payload(&inline.reference.as_uri()).unwrap(), bytes);
    }
}

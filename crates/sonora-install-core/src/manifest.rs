//! Install manifest: the record of what an install wrote.
//!
//! Persisted as JSON next to the installed files. Writes go through a temp
//! file, fsync and rename so a crash never leaves a half-written manifest.

use crate::config::AppConfig;
use crate::error::{InstallError, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;

/// One copied file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledFile {
    pub path: PathBuf,
    pub source: PathBuf,
    pub size_bytes: u64,
    pub sha256: String,
}

/// Everything a single install produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallManifest {
    pub installer_version: String,
    pub installed_at: DateTime<Utc>,
    pub install_dir: PathBuf,
    pub files: Vec<InstalledFile>,
    #[serde(default)]
    pub desktop_entries: Vec<PathBuf>,
}

impl InstallManifest {
    /// Start a manifest for an install into `install_dir`.
    pub fn new(install_dir: impl Into<PathBuf>) -> Self {
        Self {
            installer_version: AppConfig::INSTALLER_VERSION.to_string(),
            installed_at: Utc::now(),
            install_dir: install_dir.into(),
            files: Vec::new(),
            desktop_entries: Vec::new(),
        }
    }

    /// Load the manifest, or `None` when nothing has been installed.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        read_json(path)
    }

    /// Persist the manifest atomically.
    pub fn save(&self, path: &Path) -> Result<()> {
        write_json_atomic(path, self)
    }
}

/// Read and parse a JSON file. Returns `None` if the file doesn't exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(InstallError::io_action("read manifest", path, e)),
    };

    let data = serde_json::from_str(&contents).map_err(|e| InstallError::Json {
        message: format!("Failed to parse {}: {}", path.display(), e),
        source: Some(e),
    })?;

    Ok(Some(data))
}

/// Write `data` as pretty JSON via temp file and rename.
pub fn write_json_atomic<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| InstallError::io_action("create manifest directory", parent, e))?;
    }

    let temp_path = path.with_extension(format!("json.{}.tmp", process::id()));

    let serialized = serde_json::to_string_pretty(data).map_err(|e| InstallError::Json {
        message: format!("Failed to serialize manifest: {}", e),
        source: Some(e),
    })?;

    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .map_err(|e| InstallError::io_action("create temp manifest", &temp_path, e))?;

        file.write_all(serialized.as_bytes())
            .map_err(|e| InstallError::io_action("write temp manifest", &temp_path, e))?;

        file.sync_all()
            .map_err(|e| InstallError::io_action("sync temp manifest", &temp_path, e))?;
    }

    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(InstallError::io_action("rename manifest into place", path, e));
    }

    debug!("Wrote manifest {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(dir: &Path) -> InstallManifest {
        let mut manifest = InstallManifest::new(dir);
        manifest.files.push(InstalledFile {
            path: dir.join("sonora"),
            source: PathBuf::from("/src/sonora"),
            size_bytes: 6,
            sha256: "00".repeat(32),
        });
        manifest.desktop_entries.push(PathBuf::from("/apps/sonora.desktop"));
        manifest
    }

    #[test]
    fn test_load_missing_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let loaded = InstallManifest::load(&temp_dir.path().join("nope.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sonora").join("install-manifest.json");
        let manifest = sample(temp_dir.path());

        manifest.save(&path).unwrap();
        let loaded = InstallManifest::load(&path).unwrap().unwrap();

        assert_eq!(loaded, manifest);
        // No temp files left behind
        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_manifest_uses_camel_case() {
        let temp_dir = TempDir::new().unwrap();
        let json = serde_json::to_value(sample(temp_dir.path())).unwrap();

        assert!(json.get("installerVersion").is_some());
        assert!(json.get("desktopEntries").is_some());
        assert!(json["files"][0].get("sizeBytes").is_some());
    }

    #[test]
    fn test_load_corrupt_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("install-manifest.json");
        fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            InstallManifest::load(&path),
            Err(InstallError::Json { .. })
        ));
    }
}

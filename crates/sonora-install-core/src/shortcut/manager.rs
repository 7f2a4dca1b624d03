//! Menu entry and desktop shortcut placement.

use super::desktop_entry::DesktopEntry;
use crate::config::InstallConfig;
use crate::error::{InstallError, Result};
use crate::platform;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Which shortcuts currently exist on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShortcutState {
    /// Whether the application menu entry exists.
    pub menu: bool,
    /// Whether the desktop shortcut exists.
    pub desktop: bool,
}

/// Places the Sonora desktop entry into menu and desktop locations.
pub struct ShortcutManager {
    /// Applications directory (~/.local/share/applications).
    applications_dir: PathBuf,
    /// Desktop directory (~/Desktop), when known.
    desktop_dir: Option<PathBuf>,
}

impl ShortcutManager {
    /// Create a manager for the given directories.
    pub fn new(applications_dir: impl AsRef<Path>, desktop_dir: Option<PathBuf>) -> Self {
        Self {
            applications_dir: applications_dir.as_ref().to_path_buf(),
            desktop_dir,
        }
    }

    /// Path of the application menu entry.
    pub fn menu_path(&self) -> PathBuf {
        self.applications_dir.join(InstallConfig::DESKTOP_FILE_NAME)
    }

    /// Path of the desktop shortcut, if a desktop directory is known.
    pub fn desktop_path(&self) -> Option<PathBuf> {
        self.desktop_dir
            .as_ref()
            .map(|dir| dir.join(InstallConfig::DESKTOP_FILE_NAME))
    }

    /// Get the current shortcut state.
    pub fn state(&self) -> ShortcutState {
        ShortcutState {
            menu: self.menu_path().is_file(),
            desktop: self.desktop_path().is_some_and(|p| p.is_file()),
        }
    }

    /// Write the menu entry and, optionally, the desktop shortcut.
    ///
    /// Returns every path written, menu entry first.
    pub fn create(&self, entry: &DesktopEntry, desktop: bool) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(2);

        let menu_path = self.menu_path();
        entry.write_to_file(&menu_path)?;
        written.push(menu_path);

        if desktop {
            let desktop_path = self.desktop_path().ok_or_else(|| InstallError::Config {
                message: "Desktop shortcut requested but no desktop directory is known"
                    .to_string(),
            })?;
            entry.write_to_file(&desktop_path)?;
            written.push(desktop_path);
        }

        info!(
            "Created shortcuts: menu=true, desktop={}",
            written.len() > 1
        );

        Ok(written)
    }

    /// Ask the desktop environment to re-read the applications directory.
    ///
    /// Best effort: a missing tool or a failed run is only logged.
    pub fn refresh_menu_cache(&self) {
        let tool = InstallConfig::DESKTOP_DATABASE_TOOL;
        if !platform::command_exists(tool) {
            debug!("{} not available, skipping menu cache refresh", tool);
            return;
        }

        match std::process::Command::new(tool)
            .arg(&self.applications_dir)
            .output()
        {
            Ok(output) if output.status.success() => {
                debug!("Refreshed desktop database for {:?}", self.applications_dir);
            }
            Ok(output) => warn!(
                "{} failed: {}",
                tool,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
            Err(e) => warn!("Failed to run {}: {}", tool, e),
        }
    }
}

/// Remove a shortcut file. Returns whether something was removed.
pub fn remove_shortcut(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed shortcut {:?}", path);
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(InstallError::io_action("remove shortcut", path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_entry() -> DesktopEntry {
        DesktopEntry::sonora(Path::new("/opt/sonora/sonora"), Path::new("/opt/sonora/sonora.png"))
    }

    #[test]
    fn test_shortcut_state_empty() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ShortcutManager::new(temp_dir.path().join("applications"), None);

        assert_eq!(manager.state(), ShortcutState::default());
        assert!(manager.desktop_path().is_none());
    }

    #[test]
    fn test_create_menu_and_desktop() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ShortcutManager::new(
            temp_dir.path().join("applications"),
            Some(temp_dir.path().join("Desktop")),
        );

        let written = manager.create(&sample_entry(), true).unwrap();

        assert_eq!(written.len(), 2);
        assert!(written[0].ends_with("applications/sonora.desktop"));
        assert_eq!(
            manager.state(),
            ShortcutState {
                menu: true,
                desktop: true
            }
        );
    }

    #[test]
    fn test_desktop_requested_without_dir() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ShortcutManager::new(temp_dir.path().join("applications"), None);

        let result = manager.create(&sample_entry(), true);
        assert!(matches!(result, Err(InstallError::Config { .. })));
    }

    #[test]
    fn test_remove_shortcut_missing_is_ok() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sonora.desktop");

        assert!(!remove_shortcut(&path).unwrap());

        fs::write(&path, "[Desktop Entry]\n").unwrap();
        assert!(remove_shortcut(&path).unwrap());
        assert!(!path.exists());
    }
}

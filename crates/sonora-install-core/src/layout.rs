//! Resolution of every path the installer reads or writes.

use crate::config::{AppConfig, InstallConfig};
use crate::error::{InstallError, Result};
use crate::platform;
use std::path::{Path, PathBuf};

/// User-supplied overrides; `None` means "use the platform default".
#[derive(Debug, Clone, Default)]
pub struct LayoutOverrides {
    /// Directory holding the prebuilt executable and icon.
    pub source_dir: Option<PathBuf>,
    /// Target directory for the copied files.
    pub install_dir: Option<PathBuf>,
    /// Directory that receives the menu entry.
    pub applications_dir: Option<PathBuf>,
    /// Directory that receives the optional desktop shortcut.
    pub desktop_dir: Option<PathBuf>,
}

/// Fully resolved install paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLayout {
    pub source_dir: PathBuf,
    pub executable_name: String,
    pub icon_name: String,
    pub install_dir: PathBuf,
    pub applications_dir: PathBuf,
    pub desktop_dir: Option<PathBuf>,
}

impl InstallLayout {
    /// Resolve a layout, filling gaps from the current directory and the
    /// user's XDG data directory.
    pub fn resolve(overrides: LayoutOverrides) -> Result<Self> {
        let source_dir = match overrides.source_dir {
            Some(dir) => absolutize(dir)?,
            None => current_dir()?,
        };

        // Only consult the platform for paths the user did not supply
        let install_dir = match overrides.install_dir {
            Some(dir) => absolutize(dir)?,
            None => platform::data_dir()?.join(InstallConfig::INSTALL_DIR_NAME),
        };
        let applications_dir = match overrides.applications_dir {
            Some(dir) => absolutize(dir)?,
            None => platform::applications_dir()?,
        };
        let desktop_dir = match overrides.desktop_dir {
            Some(dir) => Some(absolutize(dir)?),
            None => platform::desktop_dir().ok(),
        };

        Ok(Self::new(source_dir, install_dir, applications_dir, desktop_dir))
    }

    /// Build a layout from explicit directories with the default file names.
    pub fn new(
        source_dir: impl Into<PathBuf>,
        install_dir: impl Into<PathBuf>,
        applications_dir: impl Into<PathBuf>,
        desktop_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            executable_name: InstallConfig::EXECUTABLE_NAME.to_string(),
            icon_name: InstallConfig::ICON_NAME.to_string(),
            install_dir: install_dir.into(),
            applications_dir: applications_dir.into(),
            desktop_dir,
        }
    }

    pub fn source_executable(&self) -> PathBuf {
        self.source_dir.join(&self.executable_name)
    }

    pub fn source_icon(&self) -> PathBuf {
        self.source_dir.join(&self.icon_name)
    }

    pub fn installed_executable(&self) -> PathBuf {
        self.install_dir.join(&self.executable_name)
    }

    pub fn installed_icon(&self) -> PathBuf {
        self.install_dir.join(&self.icon_name)
    }

    pub fn menu_entry_path(&self) -> PathBuf {
        self.applications_dir.join(InstallConfig::DESKTOP_FILE_NAME)
    }

    pub fn desktop_shortcut_path(&self) -> Option<PathBuf> {
        self.desktop_dir
            .as_ref()
            .map(|d| d.join(InstallConfig::DESKTOP_FILE_NAME))
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.install_dir.join(InstallConfig::MANIFEST_FILENAME)
    }

    /// `(source, destination)` pairs for every file the install copies.
    pub fn file_pairs(&self) -> [(PathBuf, PathBuf); 2] {
        [
            (self.source_executable(), self.installed_executable()),
            (self.source_icon(), self.installed_icon()),
        ]
    }

    /// Whether `path` lives inside the install directory.
    pub fn owns(&self, path: &Path) -> bool {
        path.starts_with(&self.install_dir)
    }

    /// Whether `path` is one of the desktop entry locations this layout writes.
    pub fn owns_shortcut(&self, path: &Path) -> bool {
        path == self.menu_entry_path()
            || self.desktop_shortcut_path().is_some_and(|p| p == path)
    }
}

fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().map_err(|e| InstallError::io_action("read current directory", ".", e))
}

/// Anchor a relative path at the current directory. Desktop entries need
/// absolute paths to launch from anywhere.
fn absolutize(path: PathBuf) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path)
    } else {
        Ok(current_dir()?.join(path))
    }
}

impl std::fmt::Display for InstallLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} install layout:", AppConfig::APP_NAME)?;
        writeln!(f, "  source:       {}", self.source_dir.display())?;
        writeln!(f, "  install dir:  {}", self.install_dir.display())?;
        write!(f, "  menu entry:   {}", self.menu_entry_path().display())
    }
}

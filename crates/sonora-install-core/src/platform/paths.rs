//! Platform-specific path lookups.

use crate::config::InstallConfig;
use crate::error::{InstallError, Result};
use std::path::PathBuf;

/// Get the user-local data directory.
///
/// # Platform Behavior
/// - **Linux**: `$XDG_DATA_HOME` or `~/.local/share`
/// - **Windows**: `%APPDATA%`
/// - **macOS**: `~/Library/Application Support`
pub fn data_dir() -> Result<PathBuf> {
    dirs::data_dir().ok_or_else(|| InstallError::Config {
        message: "Could not determine user data directory".to_string(),
    })
}

/// Get the directory desktop environments scan for menu entries.
///
/// Always `{data_dir}/applications`, per the XDG base directory layout.
pub fn applications_dir() -> Result<PathBuf> {
    Ok(data_dir()?.join(InstallConfig::APPLICATIONS_DIR_NAME))
}

/// Get the user's desktop directory.
///
/// Honors `XDG_DESKTOP_DIR` through `user-dirs.dirs` on Linux.
pub fn desktop_dir() -> Result<PathBuf> {
    dirs::desktop_dir().ok_or_else(|| InstallError::Config {
        message: "Could not determine desktop directory".to_string(),
    })
}

/// Check if a command exists in the system PATH.
pub fn command_exists(cmd: &str) -> bool {
    #[cfg(unix)]
    {
        std::process::Command::new("which")
            .arg(cmd)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[cfg(windows)]
    {
        std::process::Command::new("where")
            .arg(cmd)
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

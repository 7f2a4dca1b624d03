//! Executable-bit handling.

use crate::error::{InstallError, Result};
use std::path::Path;
use tracing::debug;

/// Make a file executable.
///
/// # Platform Behavior
/// - **Unix**: Sets mode 0o755
/// - **Windows**: No-op (executability comes from the extension)
pub fn set_executable(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let metadata = std::fs::metadata(path)
            .map_err(|e| InstallError::io_action("read file metadata", path, e))?;
        let mut permissions = metadata.permissions();
        permissions.set_mode(0o755);
        std::fs::set_permissions(path, permissions)
            .map_err(|e| InstallError::io_action("set permissions", path, e))?;
        debug!("Set executable permissions on: {}", path.display());
    }

    #[cfg(windows)]
    {
        debug!("Skipping executable bit on Windows for: {}", path.display());
    }

    Ok(())
}

/// Check if a file has executable permissions.
///
/// # Platform Behavior
/// - **Unix**: Any execute bit set
/// - **Windows**: Common executable extensions
pub fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(path)
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(windows)]
    {
        path.extension()
            .map(|ext| {
                let ext = ext.to_string_lossy().to_lowercase();
                matches!(ext.as_str(), "exe" | "bat" | "cmd" | "com")
            })
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_set_executable() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("sonora");
        File::create(&file_path).unwrap();

        #[cfg(unix)]
        assert!(!is_executable(&file_path));

        set_executable(&file_path).unwrap();

        #[cfg(unix)]
        assert!(is_executable(&file_path));
    }

    #[test]
    fn test_set_executable_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");

        #[cfg(unix)]
        assert!(set_executable(&missing).is_err());
        #[cfg(windows)]
        assert!(set_executable(&missing).is_ok());
    }

    #[test]
    fn test_directory_is_not_executable_file() {
        let temp_dir = TempDir::new().unwrap();
        #[cfg(unix)]
        assert!(!is_executable(temp_dir.path()));
    }
}

//! Platform abstraction layer.
//!
//! All `#[cfg]` blocks for OS-specific behavior live here:
//! - `paths` - user-local data, applications and desktop directories
//! - `permissions` - executable bits

pub mod paths;
pub mod permissions;

pub use paths::{applications_dir, command_exists, data_dir, desktop_dir};
pub use permissions::{is_executable, set_executable};

/// Returns the current platform name.
pub fn current_platform() -> &'static str {
    #[cfg(target_os = "linux")]
    {
        "linux"
    }
    #[cfg(target_os = "windows")]
    {
        "windows"
    }
    #[cfg(target_os = "macos")]
    {
        "macos"
    }
    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    {
        "unknown"
    }
}

/// Desktop entries are only understood by freedesktop-style environments.
pub fn supports_desktop_entries() -> bool {
    cfg!(all(unix, not(target_os = "macos")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_platform() {
        let platform = current_platform();
        assert!(["linux", "windows", "macos", "unknown"].contains(&platform));
    }

    #[test]
    fn test_supports_desktop_entries() {
        #[cfg(target_os = "linux")]
        assert!(supports_desktop_entries());

        #[cfg(target_os = "windows")]
        assert!(!supports_desktop_entries());
    }
}

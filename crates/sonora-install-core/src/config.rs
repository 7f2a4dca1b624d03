//! Centralized configuration for the Sonora installer.
//!
//! Fixed names and defaults live here; anything a user may override is
//! threaded through [`crate::layout::LayoutOverrides`] instead.

/// Application-level configuration.
pub struct AppConfig;

impl AppConfig {
    pub const APP_NAME: &'static str = "Sonora";
    pub const APP_ID: &'static str = "sonora";
    pub const INSTALLER_NAME: &'static str = "sonora-install";
    pub const INSTALLER_VERSION: &'static str = env!("CARGO_PKG_VERSION");
}

/// File and directory names used by the install layout.
pub struct InstallConfig;

impl InstallConfig {
    pub const EXECUTABLE_NAME: &'static str = "sonora";
    pub const ICON_NAME: &'static str = "sonora.png";
    pub const INSTALL_DIR_NAME: &'static str = "sonora";
    pub const APPLICATIONS_DIR_NAME: &'static str = "applications";
    pub const DESKTOP_FILE_NAME: &'static str = "sonora.desktop";
    pub const MANIFEST_FILENAME: &'static str = "install-manifest.json";
    pub const HASH_CHUNK_SIZE: usize = 64 * 1024;
    pub const DESKTOP_DATABASE_TOOL: &'static str = "update-desktop-database";
}

/// Default fields of the Sonora desktop entry.
pub struct DesktopEntryConfig;

impl DesktopEntryConfig {
    pub const NAME: &'static str = "Sonora";
    pub const GENERIC_NAME: &'static str = "Music Player";
    pub const COMMENT: &'static str = "Play and organize your music library";
    pub const ENTRY_TYPE: &'static str = "Application";
    pub const CATEGORIES: &'static [&'static str] = &["AudioVideo", "Audio", "Player"];
    pub const KEYWORDS: &'static [&'static str] = &["music", "audio", "player", "mp3", "flac"];
    pub const STARTUP_WM_CLASS: &'static str = "sonora";
}

//! Sonora Install Core - installs the prebuilt Sonora music player.
//!
//! The library copies the Sonora executable and icon into a user-local data
//! directory and registers an XDG desktop entry pointing at them. It also
//! keeps a manifest so an install can later be verified or removed.
//!
//! # Example
//!
//! ```rust,no_run
//! use sonora_install::{InstallLayout, InstallOptions, Installer, LayoutOverrides};
//!
//! fn main() -> sonora_install::Result<()> {
//!     let layout = InstallLayout::resolve(LayoutOverrides {
//!         source_dir: Some("dist".into()),
//!         ..Default::default()
//!     })?;
//!     let installer = Installer::new(layout);
//!
//!     let report = installer.install(&InstallOptions::default())?;
//!     println!("Installed into {}", report.install_dir.display());
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod hashing;
pub mod installer;
pub mod layout;
pub mod manifest;
pub mod platform;
pub mod shortcut;

pub use config::{AppConfig, DesktopEntryConfig, InstallConfig};
pub use error::{InstallError, Result};
pub use installer::{
    FileMismatch, InstallOptions, InstallReport, InstallStatus, Installer, UninstallReport,
    VerifyReport,
};
pub use layout::{InstallLayout, LayoutOverrides};
pub use manifest::{InstallManifest, InstalledFile};
pub use shortcut::{DesktopEntry, DesktopEntryBuilder, ShortcutManager, ShortcutState};

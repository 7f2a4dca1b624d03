//! Desktop shortcut and menu entry management.
//!
//! Provides:
//! - Desktop entry rendering and parsing (.desktop files)
//! - Placement into ~/.local/share/applications and, optionally, ~/Desktop
//!
//! # Platform Support
//!
//! Desktop entries follow the XDG Desktop Entry Specification and are only
//! meaningful on freedesktop environments (Linux and the BSDs).

mod desktop_entry;
mod manager;

pub use desktop_entry::{quote_exec_arg, DesktopEntry, DesktopEntryBuilder};
pub use manager::{remove_shortcut, ShortcutManager, ShortcutState};

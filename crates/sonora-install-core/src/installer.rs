//! The install procedure and its inverse.
//!
//! An install is a straight line: check sources, create the target
//! directory, copy the executable and icon, write the desktop entry, record a
//! manifest. Every step overwrites, so re-running is safe.

use crate::error::{InstallError, Result};
use crate::hashing::sha256_file;
use crate::layout::InstallLayout;
use crate::manifest::{InstallManifest, InstalledFile};
use crate::platform;
use crate::shortcut::{remove_shortcut, DesktopEntry, ShortcutManager};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const PARTIAL_SUFFIX: &str = ".part";

/// Knobs for a single install run.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Also place a shortcut on the user's desktop.
    pub desktop_shortcut: bool,
    /// Run `update-desktop-database` afterwards.
    pub refresh_caches: bool,
}

impl Default for InstallOptions {
    fn default() -> Self {
        Self {
            desktop_shortcut: false,
            refresh_caches: true,
        }
    }
}

/// What an install wrote.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallReport {
    pub install_dir: PathBuf,
    pub files: Vec<InstalledFile>,
    pub desktop_entries: Vec<PathBuf>,
    pub manifest_path: PathBuf,
}

/// Snapshot of what is currently on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallStatus {
    pub install_dir: PathBuf,
    pub install_dir_exists: bool,
    pub executable_present: bool,
    pub executable_is_executable: bool,
    pub icon_present: bool,
    pub menu_entry_present: bool,
    pub desktop_shortcut_present: bool,
    pub manifest_present: bool,
    /// The menu entry's Exec points at the installed executable.
    pub menu_entry_targets_install: bool,
}

impl InstallStatus {
    /// Whether every piece of a complete install is in place.
    pub fn is_installed(&self) -> bool {
        self.install_dir_exists
            && self.executable_present
            && self.icon_present
            && self.menu_entry_present
            && self.menu_entry_targets_install
    }
}

/// One file whose content no longer matches the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMismatch {
    pub path: PathBuf,
    pub expected: String,
    pub actual: String,
}

/// Result of re-hashing installed files against the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyReport {
    pub checked: usize,
    pub missing: Vec<PathBuf>,
    pub modified: Vec<FileMismatch>,
}

impl VerifyReport {
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty() && self.modified.is_empty()
    }

    /// Turn the first problem into an error.
    pub fn into_result(self) -> Result<Self> {
        if let Some(path) = self.missing.first() {
            return Err(InstallError::FileNotFound(path.clone()));
        }
        if let Some(m) = self.modified.first() {
            return Err(InstallError::Verification {
                path: m.path.clone(),
                expected: m.expected.clone(),
                actual: m.actual.clone(),
            });
        }
        Ok(self)
    }
}

/// What an uninstall removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UninstallReport {
    pub removed: Vec<PathBuf>,
    pub install_dir_removed: bool,
}

/// Installs, inspects and removes Sonora for one resolved layout.
pub struct Installer {
    layout: InstallLayout,
    shortcuts: ShortcutManager,
}

impl Installer {
    pub fn new(layout: InstallLayout) -> Self {
        let shortcuts = ShortcutManager::new(&layout.applications_dir, layout.desktop_dir.clone());
        Self { layout, shortcuts }
    }

    pub fn layout(&self) -> &InstallLayout {
        &self.layout
    }

    /// Install the executable, icon and desktop entry.
    pub fn install(&self, options: &InstallOptions) -> Result<InstallReport> {
        let layout = &self.layout;

        // Check everything up front so a bad source leaves nothing behind
        for (source, _) in layout.file_pairs() {
            if !source.is_file() {
                return Err(InstallError::FileNotFound(source));
            }
        }
        if options.desktop_shortcut && layout.desktop_dir.is_none() {
            return Err(InstallError::Config {
                message: "Desktop shortcut requested but no desktop directory is known"
                    .to_string(),
            });
        }
        if !platform::supports_desktop_entries() {
            warn!(
                "Desktop entries are not used on {}; the menu entry will be inert",
                platform::current_platform()
            );
        }

        info!("Installing Sonora into {}", layout.install_dir.display());
        fs::create_dir_all(&layout.install_dir)
            .map_err(|e| InstallError::io_action("create install directory", &layout.install_dir, e))?;

        let mut manifest = InstallManifest::new(&layout.install_dir);
        manifest.files.push(copy_file(
            &layout.source_executable(),
            &layout.installed_executable(),
            true,
        )?);
        manifest.files.push(copy_file(
            &layout.source_icon(),
            &layout.installed_icon(),
            false,
        )?);

        let entry = DesktopEntry::sonora(&layout.installed_executable(), &layout.installed_icon());
        manifest.desktop_entries = self.shortcuts.create(&entry, options.desktop_shortcut)?;

        let manifest_path = layout.manifest_path();
        manifest.save(&manifest_path)?;

        if options.refresh_caches {
            self.shortcuts.refresh_menu_cache();
        }

        info!(
            "Installed {} files and {} desktop entries",
            manifest.files.len(),
            manifest.desktop_entries.len()
        );

        Ok(InstallReport {
            install_dir: manifest.install_dir,
            files: manifest.files,
            desktop_entries: manifest.desktop_entries,
            manifest_path,
        })
    }

    /// Inspect the current install without modifying anything.
    pub fn status(&self) -> InstallStatus {
        let layout = &self.layout;
        let executable = layout.installed_executable();
        let shortcut_state = self.shortcuts.state();

        let menu_entry_targets_install = fs::read_to_string(self.shortcuts.menu_path())
            .ok()
            .and_then(|content| DesktopEntry::parse(&content).ok())
            .and_then(|entry| entry.exec_program())
            .is_some_and(|program| Path::new(&program) == executable);

        InstallStatus {
            install_dir: layout.install_dir.clone(),
            install_dir_exists: layout.install_dir.is_dir(),
            executable_present: executable.is_file(),
            executable_is_executable: platform::is_executable(&executable),
            icon_present: layout.installed_icon().is_file(),
            menu_entry_present: shortcut_state.menu,
            desktop_shortcut_present: shortcut_state.desktop,
            manifest_present: layout.manifest_path().is_file(),
            menu_entry_targets_install,
        }
    }

    /// Re-hash installed files and compare against the manifest.
    pub fn verify(&self) -> Result<VerifyReport> {
        let manifest_path = self.layout.manifest_path();
        let manifest = InstallManifest::load(&manifest_path)?
            .ok_or(InstallError::NotInstalled { path: manifest_path })?;

        let mut report = VerifyReport::default();
        for file in &manifest.files {
            report.checked += 1;
            if !file.path.is_file() {
                warn!("Installed file missing: {}", file.path.display());
                report.missing.push(file.path.clone());
                continue;
            }
            let actual = sha256_file(&file.path)?;
            if actual != file.sha256 {
                warn!("Installed file modified: {}", file.path.display());
                report.modified.push(FileMismatch {
                    path: file.path.clone(),
                    expected: file.sha256.clone(),
                    actual,
                });
            }
        }

        debug!(
            "Verified {} files: {} missing, {} modified",
            report.checked,
            report.missing.len(),
            report.modified.len()
        );
        Ok(report)
    }

    /// Remove everything an install wrote.
    ///
    /// Falls back to the default paths when the manifest is gone. Anything
    /// already absent is skipped silently.
    pub fn uninstall(&self, refresh_caches: bool) -> Result<UninstallReport> {
        let layout = &self.layout;
        let manifest_path = layout.manifest_path();
        let manifest = InstallManifest::load(&manifest_path)?;

        let (entries, files) = match manifest {
            Some(m) => (
                m.desktop_entries,
                m.files.into_iter().map(|f| f.path).collect::<Vec<_>>(),
            ),
            None => {
                let mut entries = vec![layout.menu_entry_path()];
                entries.extend(layout.desktop_shortcut_path());
                (
                    entries,
                    vec![layout.installed_executable(), layout.installed_icon()],
                )
            }
        };

        let mut report = UninstallReport::default();

        for entry in entries {
            if !layout.owns_shortcut(&entry) {
                warn!("Refusing to remove {} as a desktop entry", entry.display());
                continue;
            }
            if remove_shortcut(&entry)? {
                report.removed.push(entry);
            }
        }

        for file in files.into_iter().chain(std::iter::once(manifest_path)) {
            if !layout.owns(&file) {
                warn!("Refusing to remove {} outside the install directory", file.display());
                continue;
            }
            match fs::remove_file(&file) {
                Ok(()) => report.removed.push(file),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(InstallError::io_action("remove installed file", &file, e)),
            }
        }

        report.install_dir_removed = remove_dir_if_empty(&layout.install_dir)?;

        if refresh_caches && !report.removed.is_empty() {
            self.shortcuts.refresh_menu_cache();
        }

        info!(
            "Uninstalled Sonora: removed {} paths, install dir removed={}",
            report.removed.len(),
            report.install_dir_removed
        );

        Ok(report)
    }
}

/// Copy `source` to `dest` through a sibling temp file and record it.
fn copy_file(source: &Path, dest: &Path, executable: bool) -> Result<InstalledFile> {
    let same_file = match (source.canonicalize(), dest.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    };

    if same_file {
        debug!("{} is already in place", dest.display());
    } else {
        let mut partial = dest.as_os_str().to_owned();
        partial.push(PARTIAL_SUFFIX);
        let partial = PathBuf::from(partial);

        let placed = fs::copy(source, &partial)
            .map_err(|e| InstallError::io_action("copy file", &partial, e))
            .and_then(|_| {
                if executable {
                    platform::set_executable(&partial)
                } else {
                    Ok(())
                }
            })
            // Rename replaces a running binary without tripping ETXTBSY
            .and_then(|_| {
                fs::rename(&partial, dest)
                    .map_err(|e| InstallError::io_action("move file into place", dest, e))
            });
        if let Err(e) = placed {
            let _ = fs::remove_file(&partial);
            return Err(e);
        }
        debug!("Copied {} -> {}", source.display(), dest.display());
    }

    let size_bytes = fs::metadata(dest)
        .map_err(|e| InstallError::io_with_path(e, dest))?
        .len();

    Ok(InstalledFile {
        path: dest.to_path_buf(),
        source: source.to_path_buf(),
        size_bytes,
        sha256: sha256_file(dest)?,
    })
}

fn remove_dir_if_empty(dir: &Path) -> Result<bool> {
    let mut entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(InstallError::io_action("read install directory", dir, e)),
    };

    if entries.next().is_some() {
        debug!("Leaving non-empty {}", dir.display());
        return Ok(false);
    }

    fs::remove_dir(dir).map_err(|e| InstallError::io_action("remove install directory", dir, e))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture() -> (TempDir, Installer) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let dist = root.join("dist");
        fs::create_dir_all(&dist).unwrap();
        fs::write(dist.join("sonora"), b"#!/bin/sh\necho sonora\n").unwrap();
        fs::write(dist.join("sonora.png"), b"\x89PNG fake icon").unwrap();

        let layout = InstallLayout::new(
            dist,
            root.join("share").join("sonora"),
            root.join("share").join("applications"),
            Some(root.join("Desktop")),
        );
        (temp_dir, Installer::new(layout))
    }

    fn quiet() -> InstallOptions {
        InstallOptions {
            desktop_shortcut: false,
            refresh_caches: false,
        }
    }

    #[test]
    fn test_copy_file_same_path_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sonora");
        fs::write(&path, b"binary").unwrap();

        let record = copy_file(&path, &path, false).unwrap();

        assert_eq!(fs::read(&path).unwrap(), b"binary");
        assert_eq!(record.size_bytes, 6);
    }

    #[test]
    fn test_copy_file_leaves_no_partial() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src.png");
        let dest = temp_dir.path().join("dest.png");
        fs::write(&src, b"icon").unwrap();

        copy_file(&src, &dest, false).unwrap();

        assert!(dest.is_file());
        assert!(!temp_dir.path().join("dest.png.part").exists());
    }

    #[test]
    fn test_copy_file_failure_cleans_partial() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("sonora");
        fs::write(&src, b"binary").unwrap();
        // A non-empty directory in the way makes the final rename fail
        let dest = temp_dir.path().join("blocked");
        fs::create_dir_all(dest.join("inner")).unwrap();

        assert!(copy_file(&src, &dest, true).is_err());
        assert!(!temp_dir.path().join("blocked.part").exists());
    }

    #[test]
    fn test_status_before_and_after_install() {
        let (_tmp, installer) = fixture();

        let before = installer.status();
        assert!(!before.is_installed());
        assert!(!before.install_dir_exists);

        installer.install(&quiet()).unwrap();

        let after = installer.status();
        assert!(after.is_installed());
        assert!(after.manifest_present);
        assert!(!after.desktop_shortcut_present);
        #[cfg(unix)]
        assert!(after.executable_is_executable);
    }

    #[test]
    fn test_status_detects_foreign_menu_entry() {
        let (_tmp, installer) = fixture();
        installer.install(&quiet()).unwrap();

        let other = DesktopEntry::sonora(Path::new("/usr/bin/sonora"), Path::new("sonora"));
        other.write_to_file(&installer.layout().menu_entry_path()).unwrap();

        let status = installer.status();
        assert!(status.menu_entry_present);
        assert!(!status.menu_entry_targets_install);
        assert!(!status.is_installed());
    }

    #[test]
    fn test_verify_without_install() {
        let (_tmp, installer) = fixture();
        assert!(matches!(
            installer.verify(),
            Err(InstallError::NotInstalled { .. })
        ));
    }

    #[test]
    fn test_verify_report_into_result() {
        let report = VerifyReport {
            checked: 2,
            missing: vec![],
            modified: vec![FileMismatch {
                path: PathBuf::from("/x"),
                expected: "a".into(),
                actual: "b".into(),
            }],
        };
        assert!(!report.is_ok());
        assert!(matches!(
            report.into_result(),
            Err(InstallError::Verification { .. })
        ));
    }

    #[test]
    fn test_uninstall_keeps_foreign_files() {
        let (_tmp, installer) = fixture();
        installer.install(&quiet()).unwrap();
        let stray = installer.layout().install_dir.join("user-notes.txt");
        fs::write(&stray, "keep me").unwrap();

        let report = installer.uninstall(false).unwrap();

        assert!(!report.install_dir_removed);
        assert!(stray.exists());
        assert!(!installer.layout().installed_executable().exists());
    }
}

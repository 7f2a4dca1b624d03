//! Human and JSON rendering of command results.

use anyhow::Result;
use serde::Serialize;
use sonora_install::{InstallReport, InstallStatus, UninstallReport, VerifyReport};

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn mark(ok: bool) -> &'static str {
    if ok {
        "yes"
    } else {
        "no"
    }
}

pub fn print_install(report: &InstallReport, json: bool) -> Result<()> {
    if json {
        return print_json(report);
    }
    println!("Installed Sonora into {}", report.install_dir.display());
    for file in &report.files {
        println!("  {} ({} bytes)", file.path.display(), file.size_bytes);
    }
    for entry in &report.desktop_entries {
        println!("  shortcut: {}", entry.display());
    }
    Ok(())
}

pub fn print_status(status: &InstallStatus, json: bool) -> Result<()> {
    if json {
        return print_json(status);
    }
    println!("Install directory: {}", status.install_dir.display());
    println!("  directory present:   {}", mark(status.install_dir_exists));
    println!(
        "  executable:          {}{}",
        mark(status.executable_present),
        if status.executable_present && !status.executable_is_executable {
            " (not executable)"
        } else {
            ""
        }
    );
    println!("  icon:                {}", mark(status.icon_present));
    println!(
        "  menu entry:          {}{}",
        mark(status.menu_entry_present),
        if status.menu_entry_present && !status.menu_entry_targets_install {
            " (points elsewhere)"
        } else {
            ""
        }
    );
    println!("  desktop shortcut:    {}", mark(status.desktop_shortcut_present));
    println!("  manifest:            {}", mark(status.manifest_present));
    println!(
        "Sonora is {}installed",
        if status.is_installed() { "" } else { "not " }
    );
    Ok(())
}

pub fn print_verify(report: &VerifyReport, json: bool) -> Result<()> {
    if json {
        return print_json(report);
    }
    for path in &report.missing {
        println!("missing:  {}", path.display());
    }
    for mismatch in &report.modified {
        println!("modified: {}", mismatch.path.display());
    }
    println!(
        "Checked {} files: {}",
        report.checked,
        if report.is_ok() { "all intact" } else { "problems found" }
    );
    Ok(())
}

pub fn print_uninstall(report: &UninstallReport, json: bool) -> Result<()> {
    if json {
        return print_json(report);
    }
    if report.removed.is_empty() {
        println!("Nothing to remove");
        return Ok(());
    }
    for path in &report.removed {
        println!("removed: {}", path.display());
    }
    if report.install_dir_removed {
        println!("Removed empty install directory");
    }
    Ok(())
}

//! Sonora installer CLI.
//!
//! Copies the prebuilt Sonora executable and icon into the user's data
//! directory and registers a desktop menu entry for them.

mod cli;
mod report;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command, LogFormat};
use sonora_install::{InstallError, InstallLayout, InstallOptions, Installer};
use std::process::ExitCode;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.debug, cli.log_format);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            exit_code_for(&err)
        }
    }
}

fn init_logging(debug: bool, format: LogFormat) {
    let log_level = if debug { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.as_str().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Compact => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let layout = InstallLayout::resolve(cli.layout.into_overrides())?;
    let installer = Installer::new(layout);

    match cli.command {
        Command::Install { desktop, no_refresh } => {
            info!("{}", installer.layout());
            let report = installer.install(&InstallOptions {
                desktop_shortcut: desktop,
                refresh_caches: !no_refresh,
            })?;
            report::print_install(&report, cli.json)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Status => {
            let status = installer.status();
            report::print_status(&status, cli.json)?;
            Ok(if status.is_installed() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Command::Verify => {
            let report = installer.verify()?;
            report::print_verify(&report, cli.json)?;
            report.into_result()?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Uninstall { no_refresh } => {
            let report = installer.uninstall(!no_refresh)?;
            report::print_uninstall(&report, cli.json)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// 2 for problems the user can fix (missing sources, tampered install),
/// 1 for everything else.
fn exit_code_for(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<InstallError>() {
        Some(e) if e.is_user_facing() => ExitCode::from(2),
        _ => ExitCode::from(1),
    }
}

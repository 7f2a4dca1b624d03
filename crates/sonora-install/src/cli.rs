//! Command-line arguments.

use clap::{Args, Parser, Subcommand, ValueEnum};
use sonora_install::LayoutOverrides;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sonora-install")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Install the Sonora music player for the current user")]
#[command(long_about = "sonora-install - Sonora desktop installer\n\n\
    Copies the prebuilt `sonora` executable and `sonora.png` icon into the\n\
    user data directory and adds Sonora to the application menu.\n\n\
    Examples:\n\
      sonora-install install --source ./dist\n\
      sonora-install install --source ./dist --desktop\n\
      sonora-install status --json\n\
      sonora-install uninstall")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub layout: LayoutArgs,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,

    /// Print results as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Copy the executable and icon, then register the menu entry
    Install {
        /// Also place a shortcut on the desktop
        #[arg(long)]
        desktop: bool,

        /// Skip running update-desktop-database
        #[arg(long)]
        no_refresh: bool,
    },

    /// Show what is currently installed
    Status,

    /// Check installed files against the install manifest
    Verify,

    /// Remove everything a previous install wrote
    Uninstall {
        /// Skip running update-desktop-database
        #[arg(long)]
        no_refresh: bool,
    },
}

/// Path overrides shared by every subcommand.
#[derive(Args, Debug, Default)]
pub struct LayoutArgs {
    /// Directory containing the prebuilt `sonora` and `sonora.png`
    #[arg(long, value_name = "DIR", global = true)]
    pub source: Option<PathBuf>,

    /// Install directory (default: $XDG_DATA_HOME/sonora)
    #[arg(long, value_name = "DIR", global = true)]
    pub prefix: Option<PathBuf>,

    /// Directory for the menu entry (default: $XDG_DATA_HOME/applications)
    #[arg(long, value_name = "DIR", global = true)]
    pub applications_dir: Option<PathBuf>,

    /// Directory for the desktop shortcut (default: the XDG desktop dir)
    #[arg(long, value_name = "DIR", global = true)]
    pub desktop_dir: Option<PathBuf>,
}

impl LayoutArgs {
    pub fn into_overrides(self) -> LayoutOverrides {
        LayoutOverrides {
            source_dir: self.source,
            install_dir: self.prefix,
            applications_dir: self.applications_dir,
            desktop_dir: self.desktop_dir,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

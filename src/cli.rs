use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser};
use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::XcpScan;

/// Snapshot management for ZFS storage appliances.
#[derive(Parser, Debug)]
#[command(name = "zfssnap", version, about, long_about = None)]
pub struct Cli {
    /// ZFS appliance/storage name.
    #[arg(short = 's', value_name = "STORAGE")]
    pub storage: String,

    /// Filesystem to operate on (`-fs` is accepted too).
    #[arg(long = "fs", value_name = "FILESYSTEM")]
    pub filesystem: String,

    /// Snapshot name (`-sp` is accepted too).
    #[arg(long = "sp", value_name = "SNAPSHOT")]
    pub snapshot: Option<String>,

    #[command(flatten)]
    pub actions: ActionFlags,

    /// Appliance REST port.
    #[arg(long, env = "ZFSSNAP_PORT", default_value_t = 215)]
    pub port: u16,

    /// Appliance user sent as X-Auth-User.
    #[arg(long, env = "ZFSSNAP_USER", default_value = "root")]
    pub user: String,

    /// Appliance key sent as X-Auth-Key.
    #[arg(
        long,
        env = "ZFSSNAP_KEY",
        default_value = "password",
        hide_default_value = true,
        hide_env_values = true
    )]
    pub key: String,

    /// Per-request timeout (e.g. 30s, 2m).
    #[arg(long, default_value = "30s", value_parser = humantime::parse_duration)]
    pub timeout: Duration,

    /// Directory receiving the inventory export.
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Base name of the exported CSV and JSON files.
    #[arg(long, default_value = "datafile")]
    pub output_name: String,

    /// How --xcp scans existing snapshots before creating.
    #[arg(long, value_enum, default_value_t = XcpScan::PerRecord)]
    pub xcp_scan: XcpScan,

    /// Increase diagnostic output on stderr (-v, -vv, -vvv).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// The mutually exclusive action switches.
#[derive(Args, Debug, Default)]
#[group(multiple = false)]
pub struct ActionFlags {
    /// Create the snapshot and export the inventory.
    #[arg(long, requires = "snapshot")]
    pub create: bool,

    /// Delete the snapshot and export the remaining inventory.
    #[arg(long, requires = "snapshot")]
    pub remove: bool,

    /// Report whether the snapshot exists, creating it otherwise.
    #[arg(long, requires = "snapshot")]
    pub xcp: bool,

    /// Report whether any snapshot name starts with "xcp".
    #[arg(long)]
    pub xcpfind: bool,

    /// Print and export every snapshot of the filesystem.
    #[arg(long)]
    pub list: bool,
}

/// One snapshot action per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Create { snapshot: String },
    List,
    Remove { snapshot: String },
    Find,
    FindOrCreate { snapshot: String },
}

impl Cli {
    /// Parse the process arguments, accepting the `-fs`/`-sp` spellings.
    pub fn parse_args() -> Self {
        Self::parse_from(normalize_args(std::env::args_os()))
    }

    /// The requested action, or `None` when no action switch was given.
    pub fn action(&self) -> Result<Option<Action>> {
        let flags = &self.actions;
        let snapshot = || {
            self.snapshot
                .clone()
                .context("a snapshot name (-sp) is required for this action")
        };
        let action = if flags.create {
            Some(Action::Create { snapshot: snapshot()? })
        } else if flags.list {
            Some(Action::List)
        } else if flags.remove {
            Some(Action::Remove { snapshot: snapshot()? })
        } else if flags.xcpfind {
            Some(Action::Find)
        } else if flags.xcp {
            Some(Action::FindOrCreate { snapshot: snapshot()? })
        } else {
            None
        };
        Ok(action)
    }
}

/// Rewrite the two-letter single-dash options into their long forms.
///
/// `clap` would read `-fs` as `-f -s`.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            for short in ["-fs", "-sp"] {
                if text == short || text.strip_prefix(short).is_some_and(|rest| rest.starts_with('=')) {
                    return OsString::from(format!("-{}", text));
                }
            }
            arg
        })
        .collect()
}

use anyhow::{Context, Result};
use path_absolutize::Absolutize;
use std::fmt;
use std::time::Duration;

use crate::cli::Cli;
use crate::export::ExportTarget;

/// How `--xcp` scans the inventory before creating its snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum XcpScan {
    /// Create once for every non-matching snapshot seen before a match.
    #[default]
    PerRecord,
    /// Scan the whole inventory, then create once if nothing matched.
    Full,
}

/// Where and how to reach the appliance.
#[derive(Clone)]
pub struct Connection {
    pub storage: String,
    pub port: u16,
    pub user: String,
    pub key: String,
    pub timeout: Duration,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("storage", &self.storage)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Everything a run needs besides the action itself.
#[derive(Debug, Clone)]
pub struct Settings {
    pub connection: Connection,
    pub filesystem: String,
    pub export: ExportTarget,
    pub xcp_scan: XcpScan,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let dir = cli
            .output_dir
            .absolutize()
            .with_context(|| format!("invalid output directory: {}", cli.output_dir.display()))?
            .into_owned();
        Ok(Self {
            connection: Connection {
                storage: cli.storage.clone(),
                port: cli.port,
                user: cli.user.clone(),
                key: cli.key.clone(),
                timeout: cli.timeout,
            },
            filesystem: cli.filesystem.clone(),
            export: ExportTarget::new(dir, &cli.output_name),
            xcp_scan: cli.xcp_scan,
        })
    }
}

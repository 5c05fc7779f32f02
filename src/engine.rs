use anyhow::{Context, Result};
use reqwest::StatusCode;
use std::io::Write;
use tracing::{debug, info, warn};

use crate::cli::{Action, Cli};
use crate::client::{Appliance, RestClient};
use crate::config::{Settings, XcpScan};
use crate::error::ApplianceError;
use crate::exit_codes::exit;
use crate::export::{self, ExportTarget};
use crate::model::Scope;
use crate::reporter::{
    Reporter, CREATING_SNAPSHOT, FILESYSTEM_NOT_FOUND, NO_SNAPSHOT_FOUND, SNAPSHOT_DELETED,
};
use crate::resolve;

/// Prefix the xcp migration tool gives its snapshots.
pub const XCP_PREFIX: &str = "xcp";

/// How a run ended. Every variant exits successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The action printed `True`.
    Succeeded,
    /// The action printed `False`.
    Failed,
    FilesystemNotFound,
    NoSnapshots,
    /// No action switch was given; only the filesystem was resolved.
    NoAction,
}

pub fn run(cli: Cli) -> Result<i32> {
    let settings = Settings::from_cli(&cli)?;
    let action = cli.action()?;
    let client = RestClient::new(&settings.connection).context("failed to set up appliance client")?;
    debug!(base = %client.endpoints().base(), ?action, "starting");

    let mut reporter = Reporter::stdout();
    let outcome = execute(&client, &settings, action, &mut reporter)?;
    debug!(?outcome, "finished");
    Ok(exit::SUCCESS)
}

/// Resolve the filesystem, then dispatch the single requested action.
pub fn execute<A, W>(
    api: &A,
    settings: &Settings,
    action: Option<Action>,
    reporter: &mut Reporter<W>,
) -> Result<Outcome>
where
    A: Appliance + ?Sized,
    W: Write,
{
    let scope = match resolve::resolve(api, &settings.filesystem) {
        Ok(scope) => scope,
        Err(ApplianceError::FilesystemNotFound(name)) => {
            warn!(filesystem = %name, "filesystem not found on appliance");
            reporter.line(FILESYSTEM_NOT_FOUND)?;
            return Ok(Outcome::FilesystemNotFound);
        }
        Err(e) => return Err(e).context("failed to resolve filesystem"),
    };

    let Some(action) = action else {
        debug!("no action requested");
        return Ok(Outcome::NoAction);
    };
    let target = &settings.export;
    match action {
        Action::Create { snapshot } => create(api, &scope, target, &snapshot, reporter),
        Action::List => list(api, &scope, target, reporter),
        Action::Remove { snapshot } => remove(api, &scope, target, &snapshot, reporter),
        Action::Find => find(api, &scope, reporter),
        Action::FindOrCreate { snapshot } => {
            find_or_create(api, &scope, target, &snapshot, settings.xcp_scan, reporter)
        }
    }
}

/// Create `name`; an already existing snapshot counts as created.
pub fn create<A, W>(
    api: &A,
    scope: &Scope,
    target: &ExportTarget,
    name: &str,
    reporter: &mut Reporter<W>,
) -> Result<Outcome>
where
    A: Appliance + ?Sized,
    W: Write,
{
    let status = api
        .create_snapshot(scope, name)
        .with_context(|| format!("failed to create snapshot {}", name))?;
    let inventory = api.snapshots(scope).context("failed to list snapshots")?;

    if status == StatusCode::CREATED || status == StatusCode::CONFLICT {
        info!(snapshot = name, %status, "snapshot present");
        reporter.verdict(true)?;
        export::export(&inventory, target).context("failed to export snapshot inventory")?;
        Ok(Outcome::Succeeded)
    } else {
        warn!(snapshot = name, %status, "appliance refused snapshot creation");
        reporter.verdict(false)?;
        Ok(Outcome::Failed)
    }
}

pub fn list<A, W>(
    api: &A,
    scope: &Scope,
    target: &ExportTarget,
    reporter: &mut Reporter<W>,
) -> Result<Outcome>
where
    A: Appliance + ?Sized,
    W: Write,
{
    let inventory = api.snapshots(scope).context("failed to list snapshots")?;
    if inventory.is_empty() {
        reporter.line(NO_SNAPSHOT_FOUND)?;
        return Ok(Outcome::NoSnapshots);
    }
    reporter.listing(&serde_json::to_string_pretty(&inventory)?)?;
    export::export(&inventory, target).context("failed to export snapshot inventory")?;
    Ok(Outcome::Succeeded)
}

/// Delete `name`; only `204 No Content` counts as deleted.
pub fn remove<A, W>(
    api: &A,
    scope: &Scope,
    target: &ExportTarget,
    name: &str,
    reporter: &mut Reporter<W>,
) -> Result<Outcome>
where
    A: Appliance + ?Sized,
    W: Write,
{
    let status = api
        .destroy_snapshot(scope, name)
        .with_context(|| format!("failed to delete snapshot {}", name))?;
    let inventory = api.snapshots(scope).context("failed to list snapshots")?;

    if status == StatusCode::NO_CONTENT {
        info!(snapshot = name, "snapshot deleted");
        reporter.line(SNAPSHOT_DELETED)?;
        reporter.verdict(true)?;
        export::export(&inventory, target).context("failed to export snapshot inventory")?;
        Ok(Outcome::Succeeded)
    } else {
        warn!(snapshot = name, %status, "appliance refused snapshot deletion");
        reporter.verdict(false)?;
        Ok(Outcome::Failed)
    }
}

/// Report whether any snapshot carries the xcp prefix.
pub fn find<A, W>(api: &A, scope: &Scope, reporter: &mut Reporter<W>) -> Result<Outcome>
where
    A: Appliance + ?Sized,
    W: Write,
{
    let inventory = api.snapshots(scope).context("failed to list snapshots")?;
    if inventory.is_empty() {
        reporter.line(NO_SNAPSHOT_FOUND)?;
        return Ok(Outcome::NoSnapshots);
    }
    let found = inventory.any_with_prefix(XCP_PREFIX);
    reporter.verdict(found)?;
    Ok(if found { Outcome::Succeeded } else { Outcome::Failed })
}

/// Report whether `name` exists, creating it when it does not.
///
/// With `XcpScan::PerRecord` a create is issued for every non-matching
/// snapshot scanned before a match; `XcpScan::Full` creates at most once.
pub fn find_or_create<A, W>(
    api: &A,
    scope: &Scope,
    target: &ExportTarget,
    name: &str,
    scan: XcpScan,
    reporter: &mut Reporter<W>,
) -> Result<Outcome>
where
    A: Appliance + ?Sized,
    W: Write,
{
    let inventory = api.snapshots(scope).context("failed to list snapshots")?;
    if inventory.is_empty() {
        reporter.line(NO_SNAPSHOT_FOUND)?;
        return Ok(Outcome::NoSnapshots);
    }

    match scan {
        XcpScan::PerRecord => {
            let mut outcome = Outcome::Failed;
            for snapshot in inventory.iter() {
                if snapshot.name() == Some(name) {
                    reporter.verdict(true)?;
                    return Ok(Outcome::Succeeded);
                }
                debug!(scanned = ?snapshot.name(), wanted = name, "no match, creating");
                announce_creation(reporter)?;
                outcome = create(api, scope, target, name, reporter)?;
            }
            Ok(outcome)
        }
        XcpScan::Full => {
            if inventory.contains(name) {
                reporter.verdict(true)?;
                return Ok(Outcome::Succeeded);
            }
            announce_creation(reporter)?;
            create(api, scope, target, name, reporter)
        }
    }
}

fn announce_creation<W: Write>(reporter: &mut Reporter<W>) -> std::io::Result<()> {
    reporter.line(CREATING_SNAPSHOT)?;
    reporter.line("")
}

//! In-memory appliance shared by the integration tests.

#![allow(dead_code)]

use reqwest::StatusCode;
use serde_json::{Value, json};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;

use zfssnap::client::Appliance;
use zfssnap::config::{Connection, Settings, XcpScan};
use zfssnap::error::ApplianceError;
use zfssnap::export::ExportTarget;
use zfssnap::model::{Filesystem, Inventory, Scope};
use zfssnap::reporter::Reporter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Filesystems,
    Snapshots(Scope),
    Create(Scope, String),
    Destroy(Scope, String),
}

/// Serves canned listings and statuses and records every request.
///
/// Successive snapshot listings are served in order; the last one repeats.
pub struct FakeAppliance {
    filesystems: Vec<Filesystem>,
    listings: RefCell<VecDeque<Inventory>>,
    create_status: StatusCode,
    destroy_status: StatusCode,
    filesystems_status: StatusCode,
    listing_status: StatusCode,
    calls: RefCell<Vec<Call>>,
}

impl FakeAppliance {
    pub fn new() -> Self {
        Self {
            filesystems: vec![
                filesystem("tank0", "p0", "proj0"),
                filesystem("tank1", "p1", "proj1"),
            ],
            listings: RefCell::new(VecDeque::new()),
            create_status: StatusCode::CREATED,
            destroy_status: StatusCode::NO_CONTENT,
            filesystems_status: StatusCode::OK,
            listing_status: StatusCode::OK,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_listing(self, snapshots: Value) -> Self {
        self.listings.borrow_mut().push_back(inventory(snapshots));
        self
    }

    pub fn with_create_status(mut self, status: StatusCode) -> Self {
        self.create_status = status;
        self
    }

    pub fn with_destroy_status(mut self, status: StatusCode) -> Self {
        self.destroy_status = status;
        self
    }

    /// Answer the filesystem listing with `status` instead of a collection.
    pub fn with_filesystems_status(mut self, status: StatusCode) -> Self {
        self.filesystems_status = status;
        self
    }

    /// Answer every snapshot listing with `status` instead of a collection.
    pub fn with_listing_status(mut self, status: StatusCode) -> Self {
        self.listing_status = status;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn creates(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::Create(..)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl Appliance for FakeAppliance {
    fn filesystems(&self) -> Result<Vec<Filesystem>, ApplianceError> {
        self.record(Call::Filesystems);
        check(self.filesystems_status, "filesystems")?;
        Ok(self.filesystems.clone())
    }

    fn snapshots(&self, scope: &Scope) -> Result<Inventory, ApplianceError> {
        self.record(Call::Snapshots(scope.clone()));
        check(self.listing_status, "snapshots")?;
        let mut listings = self.listings.borrow_mut();
        let inventory = if listings.len() > 1 {
            listings.pop_front().unwrap_or_default()
        } else {
            listings.front().cloned().unwrap_or_default()
        };
        Ok(inventory)
    }

    fn create_snapshot(&self, scope: &Scope, name: &str) -> Result<StatusCode, ApplianceError> {
        self.record(Call::Create(scope.clone(), name.to_string()));
        Ok(self.create_status)
    }

    fn destroy_snapshot(&self, scope: &Scope, name: &str) -> Result<StatusCode, ApplianceError> {
        self.record(Call::Destroy(scope.clone(), name.to_string()));
        Ok(self.destroy_status)
    }
}

fn check(status: StatusCode, path: &str) -> Result<(), ApplianceError> {
    if status.is_success() {
        return Ok(());
    }
    Err(ApplianceError::Status {
        method: "GET",
        url: format!("https://zfs01:215/api/storage/v1/{}", path),
        status,
    })
}

pub fn filesystem(name: &str, pool: &str, project: &str) -> Filesystem {
    Filesystem {
        name: name.into(),
        pool: pool.into(),
        project: project.into(),
    }
}

pub fn inventory(snapshots: Value) -> Inventory {
    serde_json::from_value(json!({ "snapshots": snapshots })).unwrap()
}

pub fn tank1() -> Scope {
    Scope {
        pool: "p1".into(),
        project: "proj1".into(),
        filesystem: "tank1".into(),
    }
}

pub fn settings(dir: &Path, filesystem: &str, xcp_scan: XcpScan) -> Settings {
    Settings {
        connection: Connection {
            storage: "zfs01".into(),
            port: 215,
            user: "root".into(),
            key: "password".into(),
            timeout: Duration::from_secs(30),
        },
        filesystem: filesystem.into(),
        export: ExportTarget::new(dir, "datafile"),
        xcp_scan,
    }
}

pub fn reporter() -> Reporter<Vec<u8>> {
    Reporter::new(Vec::new())
}

pub fn output(reporter: Reporter<Vec<u8>>) -> String {
    String::from_utf8(reporter.into_inner()).unwrap()
}

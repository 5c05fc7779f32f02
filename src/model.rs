use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A filesystem entry from the appliance's filesystem collection.
///
/// Only the fields needed to scope snapshot requests are decoded; the rest of
/// the appliance payload is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Filesystem {
    pub name: String,
    pub pool: String,
    pub project: String,
}

/// Body of `GET /filesystems`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesystemList {
    pub filesystems: Vec<Filesystem>,
}

/// The pool/project/filesystem triple every snapshot URL is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub pool: String,
    pub project: String,
    pub filesystem: String,
}

impl From<&Filesystem> for Scope {
    fn from(fs: &Filesystem) -> Self {
        Self {
            pool: fs.pool.clone(),
            project: fs.project.clone(),
            filesystem: fs.name.clone(),
        }
    }
}

/// A snapshot record exactly as the appliance returned it.
///
/// Field order is preserved so exports follow the appliance's own layout.
/// Only `name` is ever interpreted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Snapshot(Map<String, Value>);

impl Snapshot {
    pub fn name(&self) -> Option<&str> {
        self.0.get("name").and_then(Value::as_str)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// Body of `GET .../snapshots`: the snapshot inventory of one filesystem.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Inventory {
    pub snapshots: Vec<Snapshot>,
}

impl Inventory {
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Snapshot> {
        self.snapshots.iter()
    }

    /// True when some snapshot carries exactly `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.iter().any(|s| s.name() == Some(name))
    }

    /// True when some snapshot name starts with `prefix`.
    pub fn any_with_prefix(&self, prefix: &str) -> bool {
        self.iter()
            .any(|s| s.name().is_some_and(|n| n.starts_with(prefix)))
    }
}

/// Body of `POST .../snapshots`.
#[derive(Debug, Clone, Serialize)]
pub struct NewSnapshot<'a> {
    pub name: &'a str,
    pub retention: Retention,
}

impl<'a> NewSnapshot<'a> {
    pub fn unlocked(name: &'a str) -> Self {
        Self {
            name,
            retention: Retention::Unlocked,
        }
    }
}

/// Snapshot retention lock requested at creation.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Retention {
    Unlocked,
}

//! CSV and JSON export of a snapshot inventory.
//!
//! Every export rewrites both files. The pair is written CSV first, JSON
//! second, with no rollback if the second write fails.
//!
//! A first record without fields gives an empty header; the `csv` crate
//! writes every such empty record as `""`.

use serde_json::Value;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::ExportError;
use crate::model::Inventory;

/// The directory and base name an inventory is exported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    dir: PathBuf,
    base_name: String,
}

impl ExportTarget {
    pub fn new(dir: impl Into<PathBuf>, base_name: &str) -> Self {
        Self {
            dir: dir.into(),
            base_name: base_name.to_string(),
        }
    }

    pub fn csv_path(&self) -> PathBuf {
        self.dir.join(format!("{}.csv", self.base_name))
    }

    pub fn json_path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.base_name))
    }
}

/// Write `inventory` to both export files, overwriting them.
pub fn export(inventory: &Inventory, target: &ExportTarget) -> Result<(), ExportError> {
    let csv_path = target.csv_path();
    write_csv(inventory, &csv_path)?;
    let json_path = target.json_path();
    write_json(inventory, &json_path)?;
    info!(
        snapshots = inventory.len(),
        csv = %csv_path.display(),
        json = %json_path.display(),
        "inventory exported"
    );
    Ok(())
}

/// Header from the first record's field order, one aligned row per record.
fn write_csv(inventory: &Inventory, path: &Path) -> Result<(), ExportError> {
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_path(path)
        .map_err(csv_err)?;

    if let Some(first) = inventory.snapshots.first() {
        let header: Vec<&str> = first.fields().keys().map(String::as_str).collect();
        writer.write_record(&header).map_err(csv_err)?;
        for snapshot in inventory.iter() {
            let row = header
                .iter()
                .map(|key| snapshot.fields().get(*key).map(cell).unwrap_or_default());
            writer.write_record(row).map_err(csv_err)?;
        }
    }
    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json(inventory: &Inventory, path: &Path) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &inventory.snapshots).map_err(|source| {
        ExportError::Json {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(io_err)
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        nested => nested.to_string(),
    }
}

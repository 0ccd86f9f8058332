use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Writer};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::CoreError;
use crate::models::snapshot::{Snapshot, TIMESTAMP_FORMAT};

use super::schema::LedgerSchema;

/// Append-only CSV ledger of portfolio snapshots.
///
/// One header row, then one row per recorded snapshot in chronological order.
/// Rows are never rewritten. There is no file locking: two processes appending
/// to the same file at once can interleave or corrupt rows.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
    schema: LedgerSchema,
}

impl Ledger {
    /// Open the ledger at `path`, creating it with a header when absent.
    ///
    /// An existing file must carry exactly the header `asset_ids` produce;
    /// anything else is a `SchemaMismatch`.
    pub fn open_or_create(path: impl AsRef<Path>, asset_ids: &[String]) -> Result<Self, CoreError> {
        let path = path.as_ref().to_path_buf();
        let schema = LedgerSchema::new(asset_ids.to_vec());

        let is_empty = match std::fs::metadata(&path) {
            Ok(meta) => meta.len() == 0,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => return Err(e.into()),
        };

        if is_empty {
            let mut writer = Writer::from_writer(File::create(&path)?);
            writer.write_record(schema.header())?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            info!(path = %path.display(), assets = schema.asset_count(), "created ledger");
        } else {
            let header = read_header(&path)?;
            schema.validate_header(&header, &path.display().to_string())?;
            debug!(path = %path.display(), "opened ledger");
        }

        Ok(Self { path, schema })
    }

    /// Open an existing ledger for reading, taking its schema from the header.
    ///
    /// The asset set may differ from the current configuration.
    pub fn open_existing(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref().to_path_buf();
        let header = read_header(&path)?;
        let schema = LedgerSchema::from_header(&header, &path.display().to_string())?;
        Ok(Self { path, schema })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn schema(&self) -> &LedgerSchema {
        &self.schema
    }

    /// Number of data rows (header excluded).
    pub fn row_count(&self) -> Result<usize, CoreError> {
        Ok(self.read_records()?.len())
    }

    /// Quantities recorded in the last row, or 0 for every asset when the
    /// ledger has no data rows yet.
    pub fn last_quantities(&self) -> Result<HashMap<String, f64>, CoreError> {
        let records = self.read_records()?;
        let Some(last) = records.last() else {
            return Ok(self
                .schema
                .asset_ids()
                .iter()
                .map(|id| (id.clone(), 0.0))
                .collect());
        };

        let row = records.len() + 1;
        let mut quantities = HashMap::with_capacity(self.schema.asset_count());
        for asset_id in self.schema.asset_ids() {
            let quantity = self.cell(last, row, self.schema.quantity_index(asset_id))?;
            quantities.insert(asset_id.clone(), quantity);
        }
        Ok(quantities)
    }

    /// Append one snapshot as a new row and sync it to disk.
    ///
    /// Columns follow the schema order. A snapshot missing any schema asset is
    /// rejected rather than written with a gap.
    pub fn append(&self, snapshot: &Snapshot) -> Result<(), CoreError> {
        let mut record = Vec::with_capacity(self.schema.width());
        record.push(snapshot.formatted_timestamp());
        record.push(snapshot.total_value.to_string());

        for asset_id in self.schema.asset_ids() {
            let value = snapshot
                .values
                .get(asset_id)
                .ok_or_else(|| self.missing_column("value", asset_id))?;
            record.push(value.to_string());
        }
        for asset_id in self.schema.asset_ids() {
            let quantity = snapshot
                .quantities
                .get(asset_id)
                .ok_or_else(|| self.missing_column("quantity", asset_id))?;
            record.push(quantity.to_string());
        }

        let mut file = OpenOptions::new().read(true).append(true).open(&self.path)?;
        if !ends_with_newline(&mut file)? {
            file.write_all(b"\n")?;
        }
        let mut writer = Writer::from_writer(file);
        writer.write_record(&record)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;

        info!(
            path = %self.path.display(),
            timestamp = %snapshot.formatted_timestamp(),
            total_value = snapshot.total_value,
            "appended snapshot"
        );
        Ok(())
    }

    /// Every data row, in file order.
    pub fn read_all(&self) -> Result<Vec<Snapshot>, CoreError> {
        self.read_records()?
            .iter()
            .enumerate()
            // +2: 1-based lines, header on line 1
            .map(|(idx, record)| self.parse_row(record, idx + 2))
            .collect()
    }

    fn read_records(&self) -> Result<Vec<StringRecord>, CoreError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)?;
        let records = reader.records().collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn parse_row(&self, record: &StringRecord, row: usize) -> Result<Snapshot, CoreError> {
        let raw_timestamp = record.get(0).unwrap_or_default().trim();
        let timestamp = NaiveDateTime::parse_from_str(raw_timestamp, TIMESTAMP_FORMAT)
            .map_err(|e| CoreError::InvalidLedger {
                row,
                message: format!("bad timestamp '{raw_timestamp}': {e}"),
            })?;
        let total_value = self.cell(record, row, Some(1))?;

        let mut values = HashMap::with_capacity(self.schema.asset_count());
        let mut quantities = HashMap::with_capacity(self.schema.asset_count());
        for asset_id in self.schema.asset_ids() {
            values.insert(
                asset_id.clone(),
                self.cell(record, row, self.schema.value_index(asset_id))?,
            );
            quantities.insert(
                asset_id.clone(),
                self.cell(record, row, self.schema.quantity_index(asset_id))?,
            );
        }

        Ok(Snapshot {
            timestamp,
            total_value,
            values,
            quantities,
        })
    }

    /// Numeric cell at `index`. Blank cells read as 0.
    fn cell(&self, record: &StringRecord, row: usize, index: Option<usize>) -> Result<f64, CoreError> {
        let index = index.ok_or_else(|| CoreError::InvalidLedger {
            row,
            message: "column not in schema".into(),
        })?;
        let raw = record
            .get(index)
            .ok_or_else(|| CoreError::InvalidLedger {
                row,
                message: format!("missing column {index}"),
            })?
            .trim();
        if raw.is_empty() {
            return Ok(0.0);
        }
        raw.parse().map_err(|e| CoreError::InvalidLedger {
            row,
            message: format!("column {index}: '{raw}' is not a number: {e}"),
        })
    }

    fn missing_column(&self, kind: &str, asset_id: &str) -> CoreError {
        CoreError::SchemaMismatch {
            path: self.path.display().to_string(),
            message: format!("snapshot has no {kind} for '{asset_id}'"),
        }
    }
}

/// Whether the file is empty or its last byte is `\n`.
fn ends_with_newline(file: &mut File) -> Result<bool, CoreError> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn read_header(path: &Path) -> Result<Vec<String>, CoreError> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let header = reader.headers()?;
    Ok(header.iter().map(|h| h.trim().to_string()).collect())
}

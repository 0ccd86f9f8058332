use crate::errors::CoreError;

/// First header cell.
pub const DATETIME_COLUMN: &str = "DateTime";

/// Second header cell.
pub const TOTAL_COLUMN: &str = "TotalValue";

/// Suffix of the per-asset quantity columns.
pub const QUANTITY_SUFFIX: &str = " Last Quantity";

/// Column layout of a ledger file.
///
/// Layout:
/// ```text
/// DateTime, TotalValue, <asset_1> .. <asset_n>, <asset_1> Last Quantity .. <asset_n> Last Quantity
/// ```
///
/// Columns are resolved through this object instead of fixed offsets, and an
/// existing file's header must match it exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSchema {
    asset_ids: Vec<String>,
}

impl LedgerSchema {
    pub fn new(asset_ids: Vec<String>) -> Self {
        Self { asset_ids }
    }

    pub fn asset_ids(&self) -> &[String] {
        &self.asset_ids
    }

    pub fn asset_count(&self) -> usize {
        self.asset_ids.len()
    }

    /// Total number of columns per row.
    pub fn width(&self) -> usize {
        2 + 2 * self.asset_ids.len()
    }

    /// The header row written when a ledger is created.
    pub fn header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(self.width());
        header.push(DATETIME_COLUMN.to_string());
        header.push(TOTAL_COLUMN.to_string());
        header.extend(self.asset_ids.iter().cloned());
        header.extend(self.asset_ids.iter().map(|id| quantity_column(id)));
        header
    }

    /// Index of an asset's value column.
    pub fn value_index(&self, asset_id: &str) -> Option<usize> {
        self.position(asset_id).map(|i| 2 + i)
    }

    /// Index of an asset's quantity column.
    pub fn quantity_index(&self, asset_id: &str) -> Option<usize> {
        self.position(asset_id).map(|i| 2 + self.asset_ids.len() + i)
    }

    fn position(&self, asset_id: &str) -> Option<usize> {
        self.asset_ids.iter().position(|id| id == asset_id)
    }

    /// Check a file header against this schema.
    pub fn validate_header(&self, header: &[String], path: &str) -> Result<(), CoreError> {
        let expected = self.header();
        if header == expected.as_slice() {
            return Ok(());
        }

        let message = if header.len() != expected.len() {
            format!(
                "expected {} columns, found {} (header: {})",
                expected.len(),
                header.len(),
                header.join(",")
            )
        } else {
            header
                .iter()
                .zip(expected.iter())
                .enumerate()
                .find(|(_, (found, wanted))| found != wanted)
                .map(|(idx, (found, wanted))| {
                    format!("column {idx} is '{found}', expected '{wanted}'")
                })
                .unwrap_or_else(|| "header differs from configuration".to_string())
        };

        Err(CoreError::SchemaMismatch {
            path: path.to_string(),
            message,
        })
    }

    /// Recover a schema from an existing file header.
    ///
    /// The header must be well formed: `DateTime`, `TotalValue`, N value
    /// columns and then the N matching quantity columns in the same order.
    pub fn from_header(header: &[String], path: &str) -> Result<Self, CoreError> {
        let mismatch = |message: String| CoreError::SchemaMismatch {
            path: path.to_string(),
            message,
        };

        if header.len() < 2 || header[0] != DATETIME_COLUMN || header[1] != TOTAL_COLUMN {
            return Err(mismatch(format!(
                "header must start with '{DATETIME_COLUMN},{TOTAL_COLUMN}', found '{}'",
                header.join(",")
            )));
        }

        let rest = &header[2..];
        if rest.len() % 2 != 0 {
            return Err(mismatch(format!(
                "expected paired value/quantity columns, found {} asset columns",
                rest.len()
            )));
        }

        let (values, quantities) = rest.split_at(rest.len() / 2);
        for (value_col, quantity_col) in values.iter().zip(quantities) {
            if *quantity_col != quantity_column(value_col) {
                return Err(mismatch(format!(
                    "quantity column '{quantity_col}' does not match value column '{value_col}'"
                )));
            }
        }

        Ok(Self::new(values.to_vec()))
    }
}

/// Header of an asset's quantity column, e.g. "bitcoin Last Quantity".
pub fn quantity_column(asset_id: &str) -> String {
    format!("{asset_id}{QUANTITY_SUFFIX}")
}

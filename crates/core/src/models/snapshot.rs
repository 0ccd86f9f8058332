use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Timestamp format used in the `DateTime` ledger column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One ledger row: the portfolio's value at a point in time.
///
/// Created once per run, appended to the ledger, never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: NaiveDateTime,

    /// Sum of all per-asset values
    pub total_value: f64,

    /// asset_id → price × quantity at `timestamp`
    pub values: HashMap<String, f64>,

    /// asset_id → quantity held at `timestamp`
    pub quantities: HashMap<String, f64>,
}

impl Snapshot {
    /// `timestamp` with seconds precision, as written to the ledger.
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// How an asset's quantity moved relative to the last ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    /// No previous quantity (0) and a nonzero quantity now
    Added,
    /// Previous quantity was nonzero and differs from the current one
    Changed,
    Unchanged,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeKind::Added => write!(f, "Added"),
            ChangeKind::Changed => write!(f, "Changed"),
            ChangeKind::Unchanged => write!(f, "Unchanged"),
        }
    }
}

/// Quantity change detected while building a snapshot. Logged, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub asset_id: String,
    pub kind: ChangeKind,
    pub previous: f64,
    pub current: f64,
}

impl ChangeEvent {
    pub fn classify(asset_id: impl Into<String>, previous: f64, current: f64) -> Self {
        let kind = if previous == 0.0 && current != 0.0 {
            ChangeKind::Added
        } else if previous != current && previous != 0.0 {
            ChangeKind::Changed
        } else {
            ChangeKind::Unchanged
        };
        Self {
            asset_id: asset_id.into(),
            kind,
            previous,
            current,
        }
    }
}

/// Result of building one snapshot.
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub snapshot: Snapshot,

    /// One entry per holding, in configuration order
    pub changes: Vec<ChangeEvent>,

    /// asset_id → fetched unit price; absent when the fetch failed
    pub prices: HashMap<String, f64>,

    /// Assets whose price could not be fetched (valued at 0)
    pub unavailable: Vec<String>,
}

use thiserror::Error;

/// Unified error type for the entire value-tracker-core library.
/// Every public function returns `Result<T, CoreError>`.
///
/// Variants fall into three recovery classes:
/// - fetch errors degrade a single asset's price to "unavailable",
/// - storage errors abort the run,
/// - input errors skip a single asset in the what-if calculator.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Ledger / File ───────────────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Ledger schema mismatch in {path}: {message}")]
    SchemaMismatch { path: String, message: String },

    #[error("Invalid ledger row {row}: {message}")]
    InvalidLedger { row: usize, message: String },

    // ── Price fetching ──────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Could not read a price for {asset}: {message}")]
    PriceParse { asset: String, message: String },

    // ── Operator input ──────────────────────────────────────────────
    #[error("Invalid input for {asset}: {message}")]
    InvalidInput { asset: String, message: String },

    // ── Configuration ───────────────────────────────────────────────
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CoreError {
    /// Price could not be fetched; the asset degrades to "unavailable".
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            CoreError::Api { .. } | CoreError::Network(_) | CoreError::PriceParse { .. }
        )
    }

    /// The ledger cannot be read or written. Fatal for a run.
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            CoreError::FileIO(_)
                | CoreError::Csv(_)
                | CoreError::SchemaMismatch { .. }
                | CoreError::InvalidLedger { .. }
        )
    }

    /// Bad operator input for a single asset.
    pub fn is_input_error(&self) -> bool {
        matches!(self, CoreError::InvalidInput { .. })
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<csv::Error> for CoreError {
    fn from(e: csv::Error) -> Self {
        match e.kind() {
            csv::ErrorKind::Io(io) => CoreError::FileIO(io.to_string()),
            _ => CoreError::Csv(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; keep query strings out of logs.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}

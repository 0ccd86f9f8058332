use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single data point for portfolio chart rendering.
///
/// One per ledger row. The annotation is the hover text, lines separated by `\n`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDataPoint {
    pub timestamp: NaiveDateTime,

    /// Total portfolio value recorded in that row
    pub total_value: f64,

    /// "Date: …", "Total Value: $…" and one line per quantity change
    pub annotation: String,
}

/// Labels for the rendered chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartOptions {
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub trace_name: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            title: "Total Value Over Time".to_string(),
            x_axis_title: "Date and Time".to_string(),
            y_axis_title: "Total Value ($)".to_string(),
            trace_name: "Total Value".to_string(),
        }
    }
}

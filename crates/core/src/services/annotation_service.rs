use crate::models::chart::ChartDataPoint;
use crate::models::snapshot::Snapshot;

/// Derives hover text for each ledger row from the quantity deltas between
/// consecutive rows.
///
/// Pure: no I/O, nothing stored. Annotations are recomputed on every read.
pub struct AnnotationService;

impl AnnotationService {
    pub fn new() -> Self {
        Self
    }

    /// One annotation per row, same length and order as `rows`.
    ///
    /// Row 0 lists every asset as added; later rows list only the assets whose
    /// quantity differs from the previous row. Assets missing from a row's
    /// quantities (ledger written with another asset set) are skipped.
    pub fn annotate(&self, rows: &[Snapshot], asset_ids: &[String]) -> Vec<String> {
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                let previous = i.checked_sub(1).map(|p| &rows[p]);
                self.annotate_row(row, previous, asset_ids)
            })
            .collect()
    }

    /// Pair every row with its annotation for the chart renderer.
    pub fn chart_points(&self, rows: &[Snapshot], asset_ids: &[String]) -> Vec<ChartDataPoint> {
        rows.iter()
            .zip(self.annotate(rows, asset_ids))
            .map(|(row, annotation)| ChartDataPoint {
                timestamp: row.timestamp,
                total_value: row.total_value,
                annotation,
            })
            .collect()
    }

    fn annotate_row(&self, row: &Snapshot, previous: Option<&Snapshot>, asset_ids: &[String]) -> String {
        let mut lines = vec![
            format!("Date: {}", row.formatted_timestamp()),
            format!("Total Value: ${:.2}", row.total_value),
        ];

        for asset_id in asset_ids {
            let Some(&current) = row.quantities.get(asset_id) else {
                continue;
            };

            match previous {
                None => lines.push(format!("{asset_id} added with quantity {current}")),
                Some(prev_row) => {
                    let Some(&prev) = prev_row.quantities.get(asset_id) else {
                        continue;
                    };
                    if prev != current {
                        lines.push(format!("{asset_id} quantity change: {prev} -> {current}"));
                    }
                }
            }
        }

        lines.join("\n")
    }
}

impl Default for AnnotationService {
    fn default() -> Self {
        Self::new()
    }
}

use serde_json::json;
use std::path::Path;
use tracing::info;

use crate::errors::CoreError;
use crate::models::chart::{ChartDataPoint, ChartOptions};
use crate::models::snapshot::TIMESTAMP_FORMAT;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Renders the value history as a standalone interactive HTML chart.
///
/// The core computes all the numbers and hover text; Plotly.js (loaded from
/// its CDN by the page) only draws them.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Build the HTML page for `points`.
    pub fn render_html(&self, points: &[ChartDataPoint], options: &ChartOptions) -> Result<String, CoreError> {
        let x: Vec<String> = points
            .iter()
            .map(|p| p.timestamp.format(TIMESTAMP_FORMAT).to_string())
            .collect();
        let y: Vec<f64> = points.iter().map(|p| p.total_value).collect();
        let text: Vec<String> = points.iter().map(|p| p.annotation.replace('\n', "<br>")).collect();

        let data = json!([{
            "type": "scatter",
            "mode": "lines+markers",
            "name": options.trace_name,
            "x": x,
            "y": y,
            "text": text,
            "hoverinfo": "text",
        }]);
        let layout = json!({
            "title": { "text": options.title },
            "xaxis": { "title": { "text": options.x_axis_title }, "fixedrange": false },
            "yaxis": { "title": { "text": options.y_axis_title }, "fixedrange": false },
            "dragmode": "zoom",
        });

        let data = script_safe(&serde_json::to_string(&data)?);
        let layout = script_safe(&serde_json::to_string(&layout)?);
        let title = html_escape(&options.title);

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_CDN}"></script>
</head>
<body>
<div id="chart" style="width:100%;height:90vh;"></div>
<script>
Plotly.newPlot("chart", {data}, {layout}, {{"responsive": true}});
</script>
</body>
</html>
"#
        ))
    }

    /// Render `points` and write the page to `path`.
    pub fn write_html(
        &self,
        points: &[ChartDataPoint],
        options: &ChartOptions,
        path: impl AsRef<Path>,
    ) -> Result<(), CoreError> {
        let path = path.as_ref();
        let html = self.render_html(points, options)?;
        std::fs::write(path, html)?;
        info!(path = %path.display(), points = points.len(), "wrote chart");
        Ok(())
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}

/// Keep embedded JSON from closing the surrounding <script> element.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

//! Serializable Chart.js-shaped configuration types.
//!
//! These structs serialize to the exact object shape `new Chart(ctx, config)`
//! expects, so a builder's output can be embedded in the dashboard page or
//! printed by `growthboard charts` and pasted into a browser console
//! unchanged. Style fields are optional and omitted from the JSON when
//! unset.

use serde::Serialize;
use serde_json::Value;

/// Chart type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Doughnut,
}

/// A complete chart configuration: `{type, data, options}`.
#[derive(Debug, Clone, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    /// Chart.js options tree. Kept as a raw JSON value — the options surface
    /// is wide and only the charting library interprets it.
    pub options: Value,
}

/// Labels plus one or more datasets.
#[derive(Debug, Clone, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// One data series with optional Chart.js styling.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<f64>,
    /// Single color or per-point color array.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tension: Option<f64>,
}

impl ChartConfig {
    /// The chart title, when the options tree carries one.
    pub fn title(&self) -> Option<&str> {
        self.options
            .pointer("/plugins/title/text")
            .and_then(Value::as_str)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

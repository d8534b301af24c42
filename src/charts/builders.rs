//! Per-slot chart config builders and the initializer registry.
//!
//! Each builder maps the analytics payload to one slot's Chart.js config.
//! The registry makes the slot → initializer mapping an explicit table the
//! orchestrator consults, so "no initializer for this slot" is a value the
//! state machine can act on instead of a missing global function.

use std::collections::BTreeMap;

use anyhow::{Result, bail};
use serde_json::{Value, json};

use super::model::{ChartConfig, ChartData, ChartKind, Dataset};
use super::ChartSlot;
use crate::analytics::AnalyticsPayload;

/// Brand accent green used across all charts.
const ACCENT: &str = "#1db954";
/// Lighter companion green for secondary series.
const ACCENT_LIGHT: &str = "#84e684";
/// Tick label color on the dark theme.
const TICK_COLOR: &str = "#c7f7d2";

/// An initializer builds one slot's chart config from the payload.
pub type Initializer = fn(&AnalyticsPayload) -> Result<ChartConfig>;

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Explicit slot → initializer table.
///
/// [`InitializerRegistry::standard`] wires all five dashboard slots. Tests
/// build partial or failing registries to exercise the orchestrator's
/// fallback transitions.
#[derive(Debug, Default)]
pub struct InitializerRegistry {
    entries: BTreeMap<ChartSlot, Initializer>,
}

impl InitializerRegistry {
    /// Registry with no initializers — every slot falls back.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The production registry covering all five slots.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.insert(ChartSlot::Listening, listening_chart);
        registry.insert(ChartSlot::Conversion, conversion_chart);
        registry.insert(ChartSlot::AbSplit, ab_split_chart);
        registry.insert(ChartSlot::Region, region_chart);
        registry.insert(ChartSlot::Growth, growth_chart);
        registry
    }

    /// Register (or replace) a slot's initializer.
    pub fn insert(&mut self, slot: ChartSlot, init: Initializer) {
        self.entries.insert(slot, init);
    }

    /// Remove a slot's initializer, if present.
    pub fn remove(&mut self, slot: ChartSlot) {
        self.entries.remove(&slot);
    }

    /// Initializer for a slot, `None` when the slot has no custom builder.
    pub fn get(&self, slot: ChartSlot) -> Option<Initializer> {
        self.entries.get(&slot).copied()
    }
}

// ---------------------------------------------------------------------------
// Slot builders
// ---------------------------------------------------------------------------

/// Weekly listening momentum: a Mon–Sun line with a soft fill.
pub fn listening_chart(payload: &AnalyticsPayload) -> Result<ChartConfig> {
    let labels = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
    if payload.weekly_listening.len() != labels.len() {
        bail!(
            "weekly listening series has {} entries, expected {}",
            payload.weekly_listening.len(),
            labels.len()
        );
    }

    Ok(ChartConfig {
        kind: ChartKind::Line,
        data: ChartData {
            labels: labels.iter().map(|s| s.to_string()).collect(),
            datasets: vec![Dataset {
                label: Some("Listening Time (min)".into()),
                data: payload.weekly_listening.clone(),
                border_color: Some(json!(ACCENT)),
                background_color: Some(json!("rgba(29,185,84,0.25)")),
                border_width: Some(2.5),
                fill: Some(true),
                tension: Some(0.4),
                ..Dataset::default()
            }],
        },
        options: options_with_title("Weekly Listening Momentum", json!({})),
    })
}

/// A/B campaign performance: baseline vs improved conversions as bars.
pub fn conversion_chart(payload: &AnalyticsPayload) -> Result<ChartConfig> {
    let (a, b) = (
        payload.conversions_for("versionA"),
        payload.conversions_for("versionB"),
    );

    Ok(ChartConfig {
        kind: ChartKind::Bar,
        data: ChartData {
            labels: vec!["Version A".into(), "Version B".into()],
            datasets: vec![Dataset {
                label: Some("Conversions".into()),
                data: vec![a, b],
                background_color: Some(json!([
                    "rgba(85,85,85,0.75)",
                    "rgba(29,185,84,0.85)"
                ])),
                border_color: Some(json!(["#555", ACCENT])),
                border_width: Some(1.5),
                border_radius: Some(12.0),
                ..Dataset::default()
            }],
        },
        options: options_with_title("A/B Campaign Performance", json!({})),
    })
}

/// Campaign conversion share: the same A/B counts as a doughnut.
pub fn ab_split_chart(payload: &AnalyticsPayload) -> Result<ChartConfig> {
    let (a, b) = (
        payload.conversions_for("versionA"),
        payload.conversions_for("versionB"),
    );

    Ok(ChartConfig {
        kind: ChartKind::Doughnut,
        data: ChartData {
            labels: vec!["Version A".into(), "Version B".into()],
            datasets: vec![Dataset {
                data: vec![a, b],
                background_color: Some(json!([ACCENT, ACCENT_LIGHT])),
                border_color: Some(json!("#0d1210")),
                border_width: Some(3.0),
                ..Dataset::default()
            }],
        },
        options: options_with_title(
            "Campaign Conversion Share",
            json!({"cutout": "55%", "plugins": {"legend": {"position": "bottom"}}}),
        ),
    })
}

/// Regional growth leaderboard: horizontal bars, one per region.
///
/// Errors when the payload has no regions — the orchestrator turns that
/// into a placeholder chart rather than drawing an empty axis.
pub fn region_chart(payload: &AnalyticsPayload) -> Result<ChartConfig> {
    if payload.regions.is_empty() {
        bail!("no regional growth data");
    }

    let labels: Vec<String> = payload.regions.keys().cloned().collect();
    let data: Vec<f64> = payload.regions.values().copied().collect();

    Ok(ChartConfig {
        kind: ChartKind::Bar,
        data: ChartData {
            labels,
            datasets: vec![Dataset {
                label: Some("Growth (%)".into()),
                data,
                background_color: Some(json!([
                    ACCENT, "#1ed760", "#9fffb0", "#68ff9f", "#2fd479"
                ])),
                border_color: Some(json!("#0b2e1a")),
                border_width: Some(1.2),
                border_radius: Some(10.0),
                ..Dataset::default()
            }],
        },
        options: options_with_title(
            "Fastest-Growing Audiobook Markets",
            // Fixed x max keeps the 10% bars visible next to the 31% one.
            json!({
                "indexAxis": "y",
                "plugins": {"legend": {"display": false}},
                "scales": {"x": {"beginAtZero": true, "max": 40}}
            }),
        ),
    })
}

/// Listener and hours growth 2023–2025: two indexed line series.
///
/// The series are fixed report figures (index 100 = 2023), not part of the
/// fetched payload.
pub fn growth_chart(_payload: &AnalyticsPayload) -> Result<ChartConfig> {
    Ok(ChartConfig {
        kind: ChartKind::Line,
        data: ChartData {
            labels: vec!["2023".into(), "2024".into(), "2025".into()],
            datasets: vec![
                Dataset {
                    label: Some("Audiobook Listeners (YoY % Growth)".into()),
                    data: vec![100.0, 136.0, 185.0],
                    border_color: Some(json!(ACCENT)),
                    background_color: Some(json!("rgba(132,230,132,0.25)")),
                    border_width: Some(3.0),
                    fill: Some(true),
                    tension: Some(0.35),
                    ..Dataset::default()
                },
                Dataset {
                    label: Some("Listening Hours (YoY % Growth)".into()),
                    data: vec![100.0, 137.0, 187.0],
                    border_color: Some(json!(ACCENT_LIGHT)),
                    background_color: Some(json!("rgba(132,230,132,0.1)")),
                    border_width: Some(2.0),
                    fill: Some(false),
                    tension: Some(0.35),
                    ..Dataset::default()
                },
            ],
        },
        options: options_with_title("Audiobook Listener Growth Over Time (2023-2025)", json!({})),
    })
}

/// Placeholder chart for a slot whose initializer is missing or failed.
///
/// A fixed 3-category bar with synthetic data, titled after the slot so the
/// degraded state is visible on the page.
pub fn fallback_chart(slot: ChartSlot) -> ChartConfig {
    ChartConfig {
        kind: ChartKind::Bar,
        data: ChartData {
            labels: vec!["A".into(), "B".into(), "C".into()],
            datasets: vec![Dataset {
                label: Some(format!("{} (fallback)", slot.id())),
                data: vec![1.0, 2.0, 3.0],
                background_color: Some(json!([
                    "rgba(29,185,84,0.9)",
                    "rgba(29,185,84,0.7)",
                    "rgba(29,185,84,0.5)"
                ])),
                border_color: Some(json!("rgba(29,185,84,1)")),
                border_width: Some(1.0),
                ..Dataset::default()
            }],
        },
        options: options_with_title(&format!("{} (fallback)", slot.id()), json!({})),
    }
}

/// Base options (responsive, dark ticks, titled) merged with per-chart extras.
fn options_with_title(title: &str, extra: Value) -> Value {
    let mut options = json!({
        "responsive": true,
        "plugins": {
            "title": {"display": true, "text": title, "color": "#fff"},
            "legend": {"labels": {"color": "#e8ffe8"}}
        },
        "scales": {
            "y": {"beginAtZero": true, "ticks": {"color": TICK_COLOR}},
            "x": {"ticks": {"color": TICK_COLOR}}
        }
    });
    merge(&mut options, extra);
    options
}

/// Deep-merge `overlay` into `base`; overlay wins on leaf conflicts.
fn merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                merge(base_map.entry(key).or_insert(Value::Null), value);
            }
        }
        (base_slot, overlay) => *base_slot = overlay,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

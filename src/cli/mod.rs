//! CLI command implementations for growthboard diagnostics.
//!
//! Provides subcommand handlers for:
//! - `growthboard data` — print the canned analytics payload
//! - `growthboard charts [SLOT]` — print the chart configuration plan
//! - `growthboard insight "question"` — one-shot AI insight
//! - `growthboard health` — config, API key, and upstream checks

use anyhow::{Result, bail};
use colored::Colorize;

use crate::analytics;
use crate::charts::builders::InitializerRegistry;
use crate::charts::ChartSlot;
use crate::config::{self, GrowthboardConfig};
use crate::llm::{self, CompletionClient};

// ---------------------------------------------------------------------------
// growthboard data
// ---------------------------------------------------------------------------

/// Print the analytics payload exactly as `GET /api/data` serves it.
pub fn run_data() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&analytics::payload())?);
    Ok(())
}

// ---------------------------------------------------------------------------
// growthboard charts
// ---------------------------------------------------------------------------

/// Print the chart configuration plan for one slot, or all five.
///
/// Configs are built from the canned payload through the same registry the
/// dashboard uses, so the output is exactly what a browser would hand to
/// `new Chart(ctx, config)`.
pub fn run_charts(slot: Option<&str>) -> Result<()> {
    let payload = analytics::payload();
    let registry = InitializerRegistry::standard();

    let slots: Vec<ChartSlot> = match slot {
        Some(id) => match ChartSlot::from_id(id) {
            Some(slot) => vec![slot],
            None => {
                let known: Vec<&str> = ChartSlot::all().iter().map(|s| s.id()).collect();
                bail!("unknown chart slot '{id}'. Known slots: {}", known.join(", "));
            }
        },
        None => ChartSlot::all().to_vec(),
    };

    let mut plan = serde_json::Map::new();
    for slot in slots {
        let config = match registry.get(slot) {
            Some(init) => init(&payload)?,
            None => crate::charts::builders::fallback_chart(slot),
        };
        plan.insert(slot.id().to_string(), serde_json::to_value(&config)?);
    }

    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

// ---------------------------------------------------------------------------
// growthboard insight
// ---------------------------------------------------------------------------

/// Ask the growth analyst one question from the terminal.
pub fn run_insight(config: &GrowthboardConfig, message: &str) -> Result<()> {
    println!(
        "{} {}",
        "Asking".dimmed(),
        config.insight.model.as_str().cyan()
    );

    match llm::generate_insight(&config.insight, message) {
        Ok(reply) => {
            println!("\n{reply}");
            Ok(())
        }
        Err(err) => bail!("insight generation failed: {err}"),
    }
}

// ---------------------------------------------------------------------------
// growthboard health
// ---------------------------------------------------------------------------

/// Check configuration, API key, and upstream reachability.
pub fn run_health(config: &GrowthboardConfig) -> Result<()> {
    println!("{}", "growthboard health".bold().cyan());
    println!("{}", "=".repeat(40));

    let config_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    print_check(
        "config file",
        config_exists,
        "found",
        "using built-in defaults",
    );

    let has_key = config.insight.api_key.is_some();
    print_check(
        "API key",
        has_key,
        "configured",
        "missing (insight requests will fail)",
    );

    let client = CompletionClient::from_config(&config.insight);
    let reachable = client.is_reachable();
    print_check(
        "upstream API",
        reachable,
        "reachable",
        "unreachable",
    );

    let asset_dir = std::path::Path::new(&config.server.asset_dir);
    print_check(
        "asset dir",
        asset_dir.is_dir(),
        "present",
        "absent (embedded frontend only)",
    );

    println!();
    println!(
        "  model: {}   port: {}",
        client.model_name().cyan(),
        config.server.port.to_string().cyan()
    );

    Ok(())
}

fn print_check(name: &str, ok: bool, ok_msg: &str, warn_msg: &str) {
    if ok {
        println!("  {} {name}: {ok_msg}", "OK".green().bold());
    } else {
        println!("  {} {name}: {warn_msg}", "WARN".yellow().bold());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Canned analytics data served at `GET /api/data`.
//!
//! The dashboard is a demo surface: the payload is a fixed document, rebuilt
//! fresh on every request, with no persistence anywhere. Field names are
//! camelCase on the wire to match the frontend contract.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Number of entries in the weekly series (Mon–Sun).
pub const DAYS_PER_WEEK: usize = 7;

/// The full analytics document behind the five dashboard charts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsPayload {
    /// Weekly listening time trend, Mon–Sun (minutes).
    pub weekly_listening: Vec<f64>,
    /// Free-to-premium conversion rate trend over the same week (%).
    pub free_to_premium: Vec<f64>,
    /// Region name → growth percentage.
    pub regions: BTreeMap<String, f64>,
    /// Campaign variant name → conversion counts.
    pub campaign_data: BTreeMap<String, CampaignVariant>,
}

/// Conversion counts for one A/B campaign variant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CampaignVariant {
    pub conversions: u32,
    pub users: u32,
}

impl AnalyticsPayload {
    /// Conversions for a campaign variant, zero if the variant is absent.
    ///
    /// Mirrors the frontend's defensive `?? 0` access so a chart never fails
    /// to build just because a variant is missing from the document.
    pub fn conversions_for(&self, variant: &str) -> f64 {
        self.campaign_data
            .get(variant)
            .map(|v| f64::from(v.conversions))
            .unwrap_or(0.0)
    }
}

/// Build the fixed analytics payload.
///
/// Listening and conversion series are fictional; region and campaign
/// figures track the published audiobook growth report (10% MoM in France,
/// the Netherlands, and Germany, 31% YoY UK revenue, 14% US adult growth).
pub fn payload() -> AnalyticsPayload {
    let regions = [
        ("France", 10.0),
        ("Netherlands", 10.0),
        ("Germany", 10.0),
        ("UK", 31.0),
        ("US", 14.0),
    ]
    .into_iter()
    .map(|(name, pct)| (name.to_string(), pct))
    .collect();

    let campaign_data = [
        // versionA is the baseline campaign, versionB the improved one.
        ("versionA", 360, 1000),
        ("versionB", 460, 1000),
        // Audiobooks+ cohort: +18% usage after 30 days.
        ("audiobooksPlus", 180, 800),
    ]
    .into_iter()
    .map(|(name, conversions, users)| {
        (name.to_string(), CampaignVariant { conversions, users })
    })
    .collect();

    AnalyticsPayload {
        weekly_listening: vec![20.0, 35.0, 50.0, 65.0, 80.0, 95.0, 110.0],
        free_to_premium: vec![8.0, 10.0, 14.0, 19.0, 24.0, 28.0, 32.0],
        regions,
        campaign_data,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

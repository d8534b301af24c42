//! Chart slots, config builders, and the resilient initialization sequence.
//!
//! The dashboard has five fixed visualization slots. Each slot maps to a
//! builder that turns the analytics payload into a Chart.js-shaped
//! configuration, via an explicit [`builders::InitializerRegistry`] rather
//! than the name-convention lookup a dynamic frontend would use.
//!
//! [`orchestrator`] drives the per-slot state machine: attempt the slot's
//! initializer, fall back to a placeholder chart when it is missing or
//! fails, and report slots whose canvas can't be drawn on at all. The
//! embedded browser script (`web::frontend`) mirrors the same sequence.

pub mod builders;
pub mod model;
pub mod orchestrator;

pub use builders::InitializerRegistry;
pub use model::{ChartConfig, ChartKind};
pub use orchestrator::{RenderSurface, SlotOutcome};

/// The five fixed dashboard visualization slots.
///
/// Each variant's [`id`](ChartSlot::id) matches the canvas element id in the
/// dashboard page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChartSlot {
    /// Weekly listening time trend (line).
    Listening,
    /// A/B campaign conversion counts (bar).
    Conversion,
    /// A/B conversion share (doughnut).
    AbSplit,
    /// Regional growth leaderboard (horizontal bar).
    Region,
    /// Listener and hours growth 2023–2025 (two-series line).
    Growth,
}

impl ChartSlot {
    /// All slots in dashboard order.
    pub fn all() -> [ChartSlot; 5] {
        [
            Self::Listening,
            Self::Conversion,
            Self::AbSplit,
            Self::Region,
            Self::Growth,
        ]
    }

    /// Canvas element id for this slot.
    pub fn id(self) -> &'static str {
        match self {
            Self::Listening => "listeningChart",
            Self::Conversion => "conversionChart",
            Self::AbSplit => "abChart",
            Self::Region => "regionChart",
            Self::Growth => "growthChart",
        }
    }

    /// Look a slot up by its canvas element id.
    pub fn from_id(id: &str) -> Option<ChartSlot> {
        Self::all().into_iter().find(|slot| slot.id() == id)
    }
}

impl std::fmt::Display for ChartSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

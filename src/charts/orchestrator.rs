//! The resilient chart-initialization sequence.
//!
//! Each slot moves independently through `Attempting → {Rendered,
//! FallbackRendered, Failed}`; one broken canvas never halts the others.
//! Two separate passes exist on purpose:
//!
//! - [`data_pass`] runs once the analytics payload has been fetched and
//!   binds real data through the initializer registry;
//! - [`safety_net_pass`] runs on DOM-ready with synthetic placeholder data
//!   and no payload at all, so the page shows *something* in every slot
//!   even when the fetch failed. It leaves slots the data pass already
//!   rendered untouched, so a successful chart is never overwritten with
//!   placeholder data.
//!
//! The [`RenderSurface`] trait abstracts the DOM side (canvas lookup, 2D
//! context, instance lifetime, status display), which keeps both passes
//! testable without a browser.

use std::collections::BTreeMap;

use super::ChartSlot;
use super::builders::{InitializerRegistry, fallback_chart};
use super::model::ChartConfig;
use crate::analytics::AnalyticsPayload;

/// Canvases measured below this height (px) get a minimum applied.
pub const MIN_USABLE_HEIGHT: u32 = 200;
/// The minimum height (px) applied to undersized canvases before drawing.
pub const APPLIED_MIN_HEIGHT: u32 = 360;

/// Terminal state of one slot after a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOutcome {
    /// The slot's own initializer built and attached a chart.
    Rendered,
    /// The placeholder chart was attached instead.
    FallbackRendered,
    /// No chart could be attached (canvas or context missing, or the
    /// placeholder itself failed to attach).
    Failed,
}

/// Per-slot outcomes of one orchestration pass.
pub type PassReport = BTreeMap<ChartSlot, SlotOutcome>;

/// The rendering side the orchestrator drives.
///
/// In the browser this is the DOM; in tests it is a mock. Attaching may
/// fail (the charting library can reject a config), which is why
/// [`attach_chart`](RenderSurface::attach_chart) returns a result.
pub trait RenderSurface {
    /// Whether the slot's canvas element exists on the page.
    fn has_canvas(&self, slot: ChartSlot) -> bool;
    /// Whether a 2D drawing context can be obtained for the slot's canvas.
    fn context_available(&self, slot: ChartSlot) -> bool;
    /// The canvas's current rendered height in pixels.
    fn canvas_height(&self, slot: ChartSlot) -> u32;
    /// Force a minimum height on the canvas before drawing.
    fn apply_min_height(&mut self, slot: ChartSlot, px: u32);
    /// Whether a chart instance is currently attached to the slot's canvas.
    fn has_chart(&self, slot: ChartSlot) -> bool;
    /// Destroy the chart instance attached to the slot's canvas.
    fn destroy_chart(&mut self, slot: ChartSlot);
    /// Attach a new chart instance built from `config`.
    fn attach_chart(&mut self, slot: ChartSlot, config: ChartConfig) -> Result<(), String>;
    /// Surface a message on the page's status display element.
    fn set_status(&mut self, message: &str);
}

// ---------------------------------------------------------------------------
// Passes
// ---------------------------------------------------------------------------

/// Primary pass: bind the fetched analytics payload to every slot.
///
/// Per slot: verify the canvas and its 2D context, apply the minimum-height
/// policy, destroy any previously attached instance, then attach the chart
/// built by the slot's registered initializer. A missing or failing
/// initializer degrades to the placeholder chart; only an unusable canvas
/// fails the slot outright.
pub fn data_pass(
    payload: &AnalyticsPayload,
    registry: &InitializerRegistry,
    surface: &mut dyn RenderSurface,
) -> PassReport {
    let mut report = PassReport::new();

    for slot in ChartSlot::all() {
        let outcome = run_slot(slot, payload, registry, surface);
        report.insert(slot, outcome);
    }

    report
}

/// Safety-net pass: re-assert every slot on DOM-ready, without the payload.
///
/// Slots the data pass already rendered are kept as-is. Every other slot
/// gets the synthetic placeholder chart so layout failures are visible even
/// when the data fetch never completed. Callers without a prior report
/// (fetch failed before any pass ran) pass an empty one.
pub fn safety_net_pass(surface: &mut dyn RenderSurface, prior: &PassReport) -> PassReport {
    let mut report = PassReport::new();

    for slot in ChartSlot::all() {
        if prior.get(&slot) == Some(&SlotOutcome::Rendered) {
            report.insert(slot, SlotOutcome::Rendered);
            continue;
        }
        let outcome = run_fallback_slot(slot, surface);
        report.insert(slot, outcome);
    }

    let attached = report
        .values()
        .filter(|o| **o != SlotOutcome::Failed)
        .count();
    surface.set_status(&format!(
        "Chart initialization attempted: {attached} of {} slots have a chart.",
        ChartSlot::all().len()
    ));

    report
}

// ---------------------------------------------------------------------------
// Per-slot transitions
// ---------------------------------------------------------------------------

/// Drive one slot through the data-bound attempt.
fn run_slot(
    slot: ChartSlot,
    payload: &AnalyticsPayload,
    registry: &InitializerRegistry,
    surface: &mut dyn RenderSurface,
) -> SlotOutcome {
    if !prepare_canvas(slot, surface) {
        return SlotOutcome::Failed;
    }

    // Idempotence: never stack a second instance on the same canvas.
    if surface.has_chart(slot) {
        surface.destroy_chart(slot);
    }

    match registry.get(slot) {
        Some(init) => match init(payload).and_then(|config| {
            surface
                .attach_chart(slot, config)
                .map_err(|e| anyhow::anyhow!(e))
        }) {
            Ok(()) => SlotOutcome::Rendered,
            Err(err) => {
                surface.set_status(&format!("Error initializing {slot}: {err}"));
                attach_fallback(slot, surface)
            }
        },
        // No initializer registered: degrade quietly to the placeholder.
        None => attach_fallback(slot, surface),
    }
}

/// Drive one slot through the synthetic fallback attempt.
fn run_fallback_slot(slot: ChartSlot, surface: &mut dyn RenderSurface) -> SlotOutcome {
    if !prepare_canvas(slot, surface) {
        return SlotOutcome::Failed;
    }

    if surface.has_chart(slot) {
        surface.destroy_chart(slot);
    }

    attach_fallback(slot, surface)
}

/// Shared entry checks: canvas present, context usable, height policy.
///
/// Returns `false` when the slot cannot be drawn on; the caller maps that
/// to [`SlotOutcome::Failed`].
fn prepare_canvas(slot: ChartSlot, surface: &mut dyn RenderSurface) -> bool {
    if !surface.has_canvas(slot) {
        surface.set_status(&format!("Canvas not found: {slot}"));
        return false;
    }

    if surface.canvas_height(slot) < MIN_USABLE_HEIGHT {
        surface.apply_min_height(slot, APPLIED_MIN_HEIGHT);
    }

    if !surface.context_available(slot) {
        surface.set_status(&format!("Canvas context error for {slot}"));
        return false;
    }

    true
}

/// Attach the placeholder chart; a failure here is terminal for the slot.
fn attach_fallback(slot: ChartSlot, surface: &mut dyn RenderSurface) -> SlotOutcome {
    match surface.attach_chart(slot, fallback_chart(slot)) {
        Ok(()) => SlotOutcome::FallbackRendered,
        Err(err) => {
            surface.set_status(&format!("Failed to create chart for {slot}: {err}"));
            SlotOutcome::Failed
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics;
    use std::collections::{BTreeSet, HashMap};

    /// In-memory stand-in for the DOM side.
    #[derive(Default)]
    struct MockSurface {
        missing_canvases: BTreeSet<ChartSlot>,
        broken_contexts: BTreeSet<ChartSlot>,
        reject_attach: BTreeSet<ChartSlot>,
        heights: HashMap<ChartSlot, u32>,
        min_heights: HashMap<ChartSlot, u32>,
        attached: HashMap<ChartSlot, ChartConfig>,
        attach_log: Vec<ChartSlot>,
        destroy_log: Vec<ChartSlot>,
        statuses: Vec<String>,
    }

    impl RenderSurface for MockSurface {
        fn has_canvas(&self, slot: ChartSlot) -> bool {
            !self.missing_canvases.contains(&slot)
        }
        fn context_available(&self, slot: ChartSlot) -> bool {
            !self.broken_contexts.contains(&slot)
        }
        fn canvas_height(&self, slot: ChartSlot) -> u32 {
            self.heights.get(&slot).copied().unwrap_or(400)
        }
        fn apply_min_height(&mut self, slot: ChartSlot, px: u32) {
            self.min_heights.insert(slot, px);
        }
        fn has_chart(&self, slot: ChartSlot) -> bool {
            self.attached.contains_key(&slot)
        }
        fn destroy_chart(&mut self, slot: ChartSlot) {
            self.attached.remove(&slot);
            self.destroy_log.push(slot);
        }
        fn attach_chart(&mut self, slot: ChartSlot, config: ChartConfig) -> Result<(), String> {
            if self.reject_attach.contains(&slot) {
                return Err("charting library rejected config".to_string());
            }
            self.attached.insert(slot, config);
            self.attach_log.push(slot);
            Ok(())
        }
        fn set_status(&mut self, message: &str) {
            self.statuses.push(message.to_string());
        }
    }

    fn full_pass(surface: &mut MockSurface) -> PassReport {
        data_pass(
            &analytics::payload(),
            &InitializerRegistry::standard(),
            surface,
        )
    }

    #[test]
    fn data_pass_renders_all_five_slots() {
        let mut surface = MockSurface::default();
        let report = full_pass(&mut surface);

        assert_eq!(report.len(), 5);
        assert!(report.values().all(|o| *o == SlotOutcome::Rendered));
        assert_eq!(surface.attach_log.len(), 5);
    }

    #[test]
    fn missing_canvas_fails_only_that_slot() {
        let mut surface = MockSurface::default();
        surface.missing_canvases.insert(ChartSlot::AbSplit);

        let report = full_pass(&mut surface);

        assert_eq!(report[&ChartSlot::AbSplit], SlotOutcome::Failed);
        let rendered = report
            .values()
            .filter(|o| **o == SlotOutcome::Rendered)
            .count();
        assert_eq!(rendered, 4);
        assert!(
            surface
                .statuses
                .iter()
                .any(|s| s.contains("Canvas not found: abChart"))
        );
    }

    #[test]
    fn broken_context_fails_the_slot() {
        let mut surface = MockSurface::default();
        surface.broken_contexts.insert(ChartSlot::Growth);

        let report = full_pass(&mut surface);

        assert_eq!(report[&ChartSlot::Growth], SlotOutcome::Failed);
        assert!(!surface.attached.contains_key(&ChartSlot::Growth));
    }

    #[test]
    fn undersized_canvas_gets_min_height_before_drawing() {
        let mut surface = MockSurface::default();
        surface.heights.insert(ChartSlot::Listening, 120);

        full_pass(&mut surface);

        assert_eq!(
            surface.min_heights.get(&ChartSlot::Listening),
            Some(&APPLIED_MIN_HEIGHT)
        );
        assert!(!surface.min_heights.contains_key(&ChartSlot::Region));
    }

    #[test]
    fn rerun_destroys_prior_instance_first() {
        let mut surface = MockSurface::default();
        full_pass(&mut surface);
        assert!(surface.destroy_log.is_empty());

        full_pass(&mut surface);

        // Second run destroyed each of the five before re-attaching
        assert_eq!(surface.destroy_log.len(), 5);
        assert_eq!(surface.attach_log.len(), 10);
        assert_eq!(surface.attached.len(), 5);
    }

    #[test]
    fn failing_initializer_degrades_to_fallback() {
        let mut registry = InitializerRegistry::standard();
        fn broken(_: &analytics::AnalyticsPayload) -> anyhow::Result<ChartConfig> {
            anyhow::bail!("synthetic initializer failure")
        }
        registry.insert(ChartSlot::Region, broken);

        let mut surface = MockSurface::default();
        let report = data_pass(&analytics::payload(), &registry, &mut surface);

        assert_eq!(report[&ChartSlot::Region], SlotOutcome::FallbackRendered);
        let attached = &surface.attached[&ChartSlot::Region];
        assert_eq!(attached.data.labels, vec!["A", "B", "C"]);
        assert!(
            surface
                .statuses
                .iter()
                .any(|s| s.contains("Error initializing regionChart"))
        );
    }

    #[test]
    fn unregistered_slot_gets_quiet_fallback() {
        let mut registry = InitializerRegistry::standard();
        registry.remove(ChartSlot::Conversion);

        let mut surface = MockSurface::default();
        let report = data_pass(&analytics::payload(), &registry, &mut surface);

        assert_eq!(report[&ChartSlot::Conversion], SlotOutcome::FallbackRendered);
        // No error was surfaced: nothing threw, there was just no initializer
        assert!(surface.statuses.is_empty());
    }

    #[test]
    fn rejected_attach_falls_back_then_fails_terminally() {
        let mut surface = MockSurface::default();
        surface.reject_attach.insert(ChartSlot::Listening);

        let report = full_pass(&mut surface);

        // Primary attach and the fallback both rejected
        assert_eq!(report[&ChartSlot::Listening], SlotOutcome::Failed);
        assert!(
            surface
                .statuses
                .iter()
                .any(|s| s.contains("Failed to create chart for listeningChart"))
        );
    }

    #[test]
    fn safety_net_runs_without_any_payload() {
        let mut surface = MockSurface::default();
        let report = safety_net_pass(&mut surface, &PassReport::new());

        assert_eq!(report.len(), 5);
        assert!(report.values().all(|o| *o == SlotOutcome::FallbackRendered));
        assert!(
            surface
                .statuses
                .last()
                .unwrap()
                .contains("5 of 5 slots have a chart")
        );
    }

    #[test]
    fn safety_net_preserves_slots_rendered_by_data_pass() {
        let mut surface = MockSurface::default();
        let prior = full_pass(&mut surface);
        let listening_before = surface.attached[&ChartSlot::Listening].clone();

        let report = safety_net_pass(&mut surface, &prior);

        assert!(report.values().all(|o| *o == SlotOutcome::Rendered));
        // The rendered chart was not replaced with placeholder data
        let listening_after = &surface.attached[&ChartSlot::Listening];
        assert_eq!(listening_after.data.labels, listening_before.data.labels);
        assert_ne!(listening_after.data.labels, vec!["A", "B", "C"]);
        assert!(surface.destroy_log.is_empty());
    }

    #[test]
    fn safety_net_repairs_failed_slots_when_canvas_recovers() {
        let mut surface = MockSurface::default();
        surface.missing_canvases.insert(ChartSlot::Growth);
        let prior = full_pass(&mut surface);
        assert_eq!(prior[&ChartSlot::Growth], SlotOutcome::Failed);

        // Canvas appears by DOM-ready
        surface.missing_canvases.clear();
        let report = safety_net_pass(&mut surface, &prior);

        assert_eq!(report[&ChartSlot::Growth], SlotOutcome::FallbackRendered);
        // The four rendered slots stayed rendered
        assert_eq!(
            report
                .values()
                .filter(|o| **o == SlotOutcome::Rendered)
                .count(),
            4
        );
    }
}

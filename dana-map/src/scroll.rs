//! Which scenes an intersection batch triggers.
//!
//! The browser side turns each `IntersectionObserverEntry` into a
//! [`StepEntry`]; everything after that is decided here.

use crate::backend::MapBackend;
use crate::controller::MapController;
use crate::scene::SceneTable;

/// One observed `.step` element.
#[derive(Debug, Clone, PartialEq)]
pub struct StepEntry {
    /// Raw `data-step` attribute, if the element had one
    pub step: Option<String>,
    pub ratio: f64,
    pub intersecting: bool,
}

impl StepEntry {
    pub fn new(step: impl Into<String>, ratio: f64, intersecting: bool) -> Self {
        Self {
            step: Some(step.into()),
            ratio,
            intersecting,
        }
    }
}

/// Parse a `data-step` value. Whitespace is tolerated; anything that is not
/// a positive integer is not a step.
pub fn parse_step(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|&n| n > 0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollObserver {
    threshold: f64,
}

impl Default for ScrollObserver {
    fn default() -> Self {
        Self {
            threshold: Self::DEFAULT_THRESHOLD,
        }
    }
}

impl ScrollObserver {
    /// Fraction of a step that must be visible before it fires.
    pub const DEFAULT_THRESHOLD: f64 = 0.6;

    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Steps to run for one batch, in delivery order. Steps outside
    /// `1..=scene_count` are dropped.
    pub fn triggered_steps(&self, entries: &[StepEntry], scene_count: usize) -> Vec<usize> {
        entries
            .iter()
            .filter(|e| e.intersecting && e.ratio >= self.threshold)
            .filter_map(|e| {
                let raw = e.step.as_deref().unwrap_or("");
                match parse_step(raw) {
                    Some(step) if step <= scene_count => Some(step),
                    _ => {
                        log::debug!("[DANA] scroll: skipping step {:?}", e.step);
                        None
                    }
                }
            })
            .collect()
    }

    /// Apply the scenes a batch triggers. Returns the steps applied.
    pub fn dispatch<B: MapBackend>(
        &self,
        entries: &[StepEntry],
        table: &SceneTable,
        controller: &mut MapController<B>,
    ) -> Vec<usize> {
        let steps = self.triggered_steps(entries, table.len());
        for &step in &steps {
            table.apply(step, controller);
        }
        steps
    }
}

//! IntersectionObserver over the story's `.step` elements.

use crate::js_bridge::js_error;
use anyhow::Context;
use dana_map::StepEntry;
use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

/// Attribute holding a step's 1-based scene number.
pub const STEP_ATTRIBUTE: &str = "data-step";

fn to_step_entry(entry: &IntersectionObserverEntry) -> StepEntry {
    StepEntry {
        step: entry.target().get_attribute(STEP_ATTRIBUTE),
        ratio: entry.intersection_ratio(),
        intersecting: entry.is_intersecting(),
    }
}

/// Watches every element matching a selector. Disconnects on drop.
pub struct StepObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

impl StepObserver {
    /// Observe `selector` at `threshold`; `on_batch` gets each delivery.
    /// Returns the observer and how many elements it watches.
    pub fn observe(
        selector: &str,
        threshold: f64,
        mut on_batch: impl FnMut(Vec<StepEntry>) + 'static,
    ) -> anyhow::Result<(Self, u32)> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .context("no document")?;

        let callback = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
            move |entries: Array, _observer: IntersectionObserver| {
                let batch: Vec<StepEntry> = entries
                    .iter()
                    .filter_map(|e| e.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|e| to_step_entry(&e))
                    .collect();
                on_batch(batch);
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
                .map_err(js_error)?;

        let nodes = document.query_selector_all(selector).map_err(js_error)?;
        let mut watched = 0;
        for i in 0..nodes.length() {
            if let Some(element) = nodes.item(i).and_then(|n| n.dyn_into::<web_sys::Element>().ok()) {
                observer.observe(&element);
                watched += 1;
            }
        }
        if watched == 0 {
            log::warn!("[DANA] scroll: no elements match {}", selector);
        }

        Ok((
            Self {
                observer,
                _callback: callback,
            },
            watched,
        ))
    }
}

impl Drop for StepObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

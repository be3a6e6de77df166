//! Where chart configurations end up.
//!
//! Charts are addressed by the id of their `<canvas>`. The browser
//! implementation keeps one Chart.js instance per id; every mutation is
//! followed by a redraw on that side.

use serde_json::Value;

pub trait ChartBackend {
    /// Build a chart from a full Chart.js configuration.
    fn create(&mut self, canvas_id: &str, config: &Value) -> anyhow::Result<()>;
    /// Replace the data array of one dataset.
    fn set_dataset_data(&mut self, canvas_id: &str, index: usize, data: &Value);
    /// Replace every dataset.
    fn set_datasets(&mut self, canvas_id: &str, datasets: &Value);
    /// Replace `options.plugins.title`.
    fn set_title(&mut self, canvas_id: &str, title: &Value);
    fn destroy(&mut self, canvas_id: &str);
}

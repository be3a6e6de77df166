//! [`ChartBackend`] over the `window.danaCharts` registry.

use crate::js_bridge::js_error;
use dana_charts::ChartBackend;
use serde_json::Value;
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = danaCharts, js_name = create, catch)]
    fn charts_create(canvas_id: &str, config_json: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = danaCharts, js_name = setDatasetData)]
    fn charts_set_dataset_data(canvas_id: &str, index: u32, data_json: &str);

    #[wasm_bindgen(js_namespace = danaCharts, js_name = setDatasets)]
    fn charts_set_datasets(canvas_id: &str, datasets_json: &str);

    #[wasm_bindgen(js_namespace = danaCharts, js_name = setTitle)]
    fn charts_set_title(canvas_id: &str, title_json: &str);

    #[wasm_bindgen(js_namespace = danaCharts, js_name = destroy)]
    fn charts_destroy(canvas_id: &str);
}

/// Stateless handle; the registry on the JS side owns the charts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartJs;

impl ChartBackend for ChartJs {
    fn create(&mut self, canvas_id: &str, config: &Value) -> anyhow::Result<()> {
        charts_create(canvas_id, &config.to_string()).map_err(js_error)
    }

    fn set_dataset_data(&mut self, canvas_id: &str, index: usize, data: &Value) {
        let Ok(index) = u32::try_from(index) else {
            log::warn!("[DANA] charts: dataset index {} out of range", index);
            return;
        };
        charts_set_dataset_data(canvas_id, index, &data.to_string());
    }

    fn set_datasets(&mut self, canvas_id: &str, datasets: &Value) {
        charts_set_datasets(canvas_id, &datasets.to_string());
    }

    fn set_title(&mut self, canvas_id: &str, title: &Value) {
        charts_set_title(canvas_id, &title.to_string());
    }

    fn destroy(&mut self, canvas_id: &str) {
        charts_destroy(canvas_id);
    }
}

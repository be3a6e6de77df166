//! Recording chart backend for unit tests.

use crate::backend::ChartBackend;
use serde_json::Value;
use std::collections::BTreeMap;

/// Two stations from the 29 October series.
pub const PRECIP: &str = r#"{
    "config": {"labels": ["06h", "12h", "18h"]},
    "estaciones": {
        "turis": {"label": "Turís", "intensidad": [12.4, 184.6, 30.2], "acumulado": [20, 410.8, 771.8]},
        "chiva": {"label": "Chiva", "intensidad": [8, null, 15], "acumulado": [10, 300, 491]}
    }
}"#;

#[derive(Debug, Default)]
pub struct MockCharts {
    /// Live charts by canvas id, with their current config
    pub charts: BTreeMap<String, Value>,
    pub created: usize,
    pub destroyed: usize,
    pub fail_create: bool,
}

impl MockCharts {
    pub fn config(&self, id: &str) -> &Value {
        &self.charts[id]
    }

    pub fn datasets(&self, id: &str) -> &Vec<Value> {
        match &self.charts[id]["data"]["datasets"] {
            Value::Array(items) => items,
            other => panic!("datasets is not an array: {}", other),
        }
    }
}

impl ChartBackend for MockCharts {
    fn create(&mut self, canvas_id: &str, config: &Value) -> anyhow::Result<()> {
        if self.fail_create {
            anyhow::bail!("Chart.js not loaded");
        }
        self.created += 1;
        self.charts.insert(canvas_id.to_string(), config.clone());
        Ok(())
    }

    fn set_dataset_data(&mut self, canvas_id: &str, index: usize, data: &Value) {
        if let Some(chart) = self.charts.get_mut(canvas_id) {
            chart["data"]["datasets"][index]["data"] = data.clone();
        }
    }

    fn set_datasets(&mut self, canvas_id: &str, datasets: &Value) {
        if let Some(chart) = self.charts.get_mut(canvas_id) {
            chart["data"]["datasets"] = datasets.clone();
        }
    }

    fn set_title(&mut self, canvas_id: &str, title: &Value) {
        if let Some(chart) = self.charts.get_mut(canvas_id) {
            chart["options"]["plugins"]["title"] = title.clone();
        }
    }

    fn destroy(&mut self, canvas_id: &str) {
        if self.charts.remove(canvas_id).is_some() {
            self.destroyed += 1;
        }
    }
}

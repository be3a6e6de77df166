//! Rainfall intensity for any set of stations, one line each.

use crate::backend::ChartBackend;
use crate::common::{axis_title, hidden_title, series, StationOption};
use dana_meteo::palette::{station_color, with_alpha_suffix};
use dana_meteo::station::PrecipitationData;
use serde_json::{json, Value};

pub const EMPTY_TITLE: &str = "Selecciona al menos una estación";
pub const LOAD_ERROR: &str = "Error cargando datos de estaciones";

pub fn config(labels: &[String]) -> Value {
    json!({
        "type": "line",
        "data": { "labels": labels, "datasets": [] },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "resizeDelay": 100,
            "plugins": {
                "title": hidden_title(),
                "legend": {
                    "display": true,
                    "position": "top",
                    "align": "center",
                    "labels": {
                        "boxWidth": 10,
                        "boxHeight": 10,
                        "padding": 8,
                        "font": { "size": 10 },
                        "usePointStyle": true,
                        "pointStyle": "circle",
                    },
                },
                "tooltip": { "mode": "index", "intersect": false },
            },
            "scales": {
                "x": {
                    "ticks": { "maxRotation": 0, "autoSkip": true, "maxTicksLimit": 6, "font": { "size": 10 } },
                    "grid": { "display": false },
                },
                "y": {
                    "title": axis_title("Intensidad (mm/h)", None),
                    "grid": { "color": "rgba(0,0,0,0.05)" },
                    "beginAtZero": true,
                },
            },
            "elements": {
                "line": { "tension": 0.3, "borderWidth": 2 },
                "point": { "radius": 2, "hoverRadius": 4 },
            },
        },
    })
}

fn empty_title() -> Value {
    json!({
        "display": true,
        "text": EMPTY_TITLE,
        "color": "#94a3b8",
        "font": { "size": 12 },
    })
}

pub struct MultiLineChart<B> {
    backend: B,
    canvas_id: String,
    data: Option<PrecipitationData>,
    /// Shown station keys, in the order they were ticked
    shown: Vec<String>,
    error: Option<String>,
}

impl<B: ChartBackend> MultiLineChart<B> {
    pub fn new(backend: B, canvas_id: impl Into<String>) -> Self {
        Self {
            backend,
            canvas_id: canvas_id.into(),
            data: None,
            shown: Vec::new(),
            error: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn canvas_id(&self) -> &str {
        &self.canvas_id
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn shown(&self) -> &[String] {
        &self.shown
    }

    pub fn load(&mut self, result: anyhow::Result<PrecipitationData>) {
        let data = match result {
            Ok(data) => data,
            Err(e) => {
                log::error!("[DANA] multi-line chart: {:#}", e);
                self.error = Some(LOAD_ERROR.to_string());
                return;
            }
        };

        if self.data.is_some() {
            self.backend.destroy(&self.canvas_id);
        }
        if let Err(e) = self.backend.create(&self.canvas_id, &config(data.labels())) {
            log::error!("[DANA] multi-line chart: {:#}", e);
            self.error = Some(LOAD_ERROR.to_string());
            self.data = None;
            return;
        }
        self.error = None;
        self.shown.clear();
        let first = data.first_key().map(str::to_string);
        self.data = Some(data);
        match first {
            Some(key) => {
                self.toggle(&key, true);
            }
            None => self.push(),
        }
    }

    /// Tick or untick a station. Returns whether the chart changed.
    pub fn toggle(&mut self, key: &str, checked: bool) -> bool {
        let known = self
            .data
            .as_ref()
            .is_some_and(|d| d.station(key).is_some());
        if !known {
            log::warn!("[DANA] multi-line chart: unknown station {}", key);
            return false;
        }

        let position = self.shown.iter().position(|k| k == key);
        match (checked, position) {
            (true, None) => self.shown.push(key.to_string()),
            (false, Some(i)) => {
                self.shown.remove(i);
            }
            _ => return false,
        }
        self.push();
        true
    }

    /// Chart.js datasets for the shown stations.
    pub fn datasets(&self) -> Value {
        let Some(data) = self.data.as_ref() else {
            return json!([]);
        };
        let datasets: Vec<Value> = self
            .shown
            .iter()
            .filter_map(|key| data.station(key).map(|st| (key, st)))
            .map(|(key, st)| {
                let color = station_color(key);
                json!({
                    "key": key,
                    "label": st.label,
                    "data": series(&st.intensity),
                    "borderColor": color,
                    "backgroundColor": with_alpha_suffix(color, "20"),
                    "borderWidth": 2,
                    "tension": 0.3,
                    "fill": false,
                    "pointRadius": 2,
                    "pointBackgroundColor": color,
                    "pointBorderColor": "#0f172a",
                    "pointBorderWidth": 1,
                })
            })
            .collect();
        Value::Array(datasets)
    }

    pub fn options(&self) -> Vec<StationOption> {
        let Some(data) = self.data.as_ref() else {
            return Vec::new();
        };
        data.stations
            .iter()
            .map(|(key, station)| StationOption {
                key: key.clone(),
                label: station.label.clone(),
                color: Some(station_color(key)),
                active: self.shown.contains(key),
            })
            .collect()
    }

    pub fn destroy(&mut self) {
        if self.data.take().is_some() {
            self.backend.destroy(&self.canvas_id);
        }
        self.shown.clear();
    }

    fn push(&mut self) {
        let datasets = self.datasets();
        let title = if self.shown.is_empty() {
            empty_title()
        } else {
            hidden_title()
        };
        self.backend.set_datasets(&self.canvas_id, &datasets);
        self.backend.set_title(&self.canvas_id, &title);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockCharts, PRECIP};

    fn loaded() -> MultiLineChart<MockCharts> {
        let mut chart = MultiLineChart::new(MockCharts::default(), "multiLineChart");
        chart.load(Ok(PrecipitationData::from_json(PRECIP).unwrap()));
        chart
    }

    fn keys(chart: &MultiLineChart<MockCharts>) -> Vec<String> {
        chart
            .backend()
            .datasets("multiLineChart")
            .iter()
            .map(|d| d["key"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_first_station_is_checked() {
        let chart = loaded();
        assert_eq!(keys(&chart), vec!["turis"]);
        let options = chart.options();
        assert!(options[0].active);
        assert!(!options[1].active);
        assert_eq!(options[0].color, Some(station_color("turis")));
    }

    #[test]
    fn test_toggle_adds_and_removes_one_dataset() {
        let mut chart = loaded();
        assert!(chart.toggle("chiva", true));
        assert_eq!(keys(&chart), vec!["turis", "chiva"]);

        assert!(!chart.toggle("chiva", true));
        assert_eq!(keys(&chart).len(), 2);

        assert!(chart.toggle("turis", false));
        assert_eq!(keys(&chart), vec!["chiva"]);

        assert!(!chart.toggle("turis", false));
        assert!(!chart.toggle("paterna", true));
        assert_eq!(keys(&chart), vec!["chiva"]);
    }

    #[test]
    fn test_dataset_colors_are_stable() {
        let mut chart = loaded();
        chart.toggle("chiva", true);
        let color = station_color("chiva");
        let ds = chart.backend().datasets("multiLineChart")[1].clone();
        assert_eq!(ds["borderColor"], color);
        assert_eq!(ds["backgroundColor"], format!("{}20", color));

        chart.toggle("chiva", false);
        chart.toggle("chiva", true);
        assert_eq!(chart.backend().datasets("multiLineChart")[1]["borderColor"], color);
    }

    #[test]
    fn test_empty_state_title() {
        let mut chart = loaded();
        let title = |c: &MultiLineChart<MockCharts>| {
            c.backend().config("multiLineChart")["options"]["plugins"]["title"].clone()
        };
        assert_eq!(title(&chart)["display"], false);

        chart.toggle("turis", false);
        assert_eq!(title(&chart)["display"], true);
        assert_eq!(title(&chart)["text"], EMPTY_TITLE);

        chart.toggle("chiva", true);
        assert_eq!(title(&chart)["display"], false);
    }

    #[test]
    fn test_failed_load_keeps_selection() {
        let mut chart = loaded();
        chart.toggle("chiva", true);
        chart.load(Err(anyhow::anyhow!("offline")));
        assert_eq!(chart.error(), Some(LOAD_ERROR));
        assert_eq!(chart.shown(), ["turis".to_string(), "chiva".to_string()]);
        assert_eq!(chart.backend().created, 1);
    }
}

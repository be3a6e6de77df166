//! Intensity + cumulative rainfall for one station at a time.

use crate::backend::ChartBackend;
use crate::common::{axis_title, hidden_title, series, slanted_x_axis, StationOption};
use dana_meteo::station::{PrecipitationData, StationSeries};
use serde_json::{json, Value};

pub const INTENSITY_MAX: f64 = 200.0;
pub const CUMULATIVE_MAX: f64 = 800.0;
pub const LOAD_ERROR: &str = "Error cargando datos de estaciones";

const INTENSITY_COLOR: &str = "#36a2eb";
const CUMULATIVE_COLOR: &str = "#ff6384";

pub fn config(labels: &[String]) -> Value {
    json!({
        "type": "bar",
        "data": {
            "labels": labels,
            "datasets": [
                {
                    "type": "line",
                    "label": "Intensidad",
                    "data": [],
                    "borderColor": INTENSITY_COLOR,
                    "backgroundColor": "transparent",
                    "borderWidth": 2,
                    "tension": 0.3,
                    "pointRadius": 3,
                    "pointBackgroundColor": INTENSITY_COLOR,
                    "yAxisID": "y",
                },
                {
                    "type": "line",
                    "label": "Acumulado",
                    "data": [],
                    "yAxisID": "y1",
                    "borderColor": CUMULATIVE_COLOR,
                    "backgroundColor": "rgba(255, 99, 132, 0.3)",
                    "borderWidth": 0,
                    "pointRadius": 0,
                    "tension": 0.3,
                    "fill": "origin",
                },
            ],
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "resizeDelay": 100,
            "animation": { "duration": 800, "easing": "easeOutQuart" },
            "interaction": { "mode": "index", "intersect": false },
            "plugins": {
                "title": hidden_title(),
                "legend": {
                    "position": "top",
                    "align": "end",
                    "labels": {
                        "boxWidth": 12,
                        "boxHeight": 12,
                        "padding": 10,
                        "font": { "size": 11, "family": "system-ui" },
                        "usePointStyle": true,
                        "pointStyle": "rectRounded",
                    },
                },
                "tooltip": { "mode": "index", "intersect": false },
            },
            "scales": {
                "x": slanted_x_axis(8),
                "y": {
                    "type": "linear",
                    "position": "left",
                    "title": axis_title("Intensidad (mm/h)", Some(INTENSITY_COLOR)),
                    "grid": { "color": "rgba(0,0,0,0.05)" },
                    "beginAtZero": true,
                    "max": INTENSITY_MAX,
                },
                "y1": {
                    "type": "linear",
                    "position": "right",
                    "title": axis_title("Acumulado (mm)", Some(CUMULATIVE_COLOR)),
                    "grid": { "drawOnChartArea": false },
                    "beginAtZero": true,
                    "max": CUMULATIVE_MAX,
                },
            },
        },
    })
}

/// Station name plus its event total, e.g. "Turís · 772 mm".
fn button_label(station: &StationSeries) -> String {
    match station.total() {
        Some(total) => format!("{} · {:.0} mm", station.label, total),
        None => station.label.clone(),
    }
}

pub struct ComboChart<B> {
    backend: B,
    canvas_id: String,
    data: Option<PrecipitationData>,
    selected: Option<String>,
    error: Option<String>,
}

impl<B: ChartBackend> ComboChart<B> {
    pub fn new(backend: B, canvas_id: impl Into<String>) -> Self {
        Self {
            backend,
            canvas_id: canvas_id.into(),
            data: None,
            selected: None,
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

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Take the fetch result. A failure only sets the inline error; a chart
    /// already on screen stays as it was.
    pub fn load(&mut self, result: anyhow::Result<PrecipitationData>) {
        let data = match result {
            Ok(data) => data,
            Err(e) => {
                log::error!("[DANA] combo chart: {:#}", e);
                self.error = Some(LOAD_ERROR.to_string());
                return;
            }
        };

        if self.data.is_some() {
            self.backend.destroy(&self.canvas_id);
        }
        if let Err(e) = self.backend.create(&self.canvas_id, &config(data.labels())) {
            log::error!("[DANA] combo chart: {:#}", e);
            self.error = Some(LOAD_ERROR.to_string());
            self.data = None;
            return;
        }
        self.error = None;
        let first = data.first_key().map(str::to_string);
        self.data = Some(data);
        self.selected = None;
        if let Some(key) = first {
            self.update(&key);
        }
    }

    /// Show `key`'s series. Unknown keys are ignored.
    pub fn update(&mut self, key: &str) -> bool {
        let Some(station) = self.data.as_ref().and_then(|d| d.station(key)) else {
            log::warn!("[DANA] combo chart: unknown station {}", key);
            return false;
        };
        let StationSeries {
            intensity,
            cumulative,
            ..
        } = station;
        self.backend
            .set_dataset_data(&self.canvas_id, 0, &series(intensity));
        self.backend
            .set_dataset_data(&self.canvas_id, 1, &series(cumulative));
        self.selected = Some(key.to_string());
        true
    }

    /// One button per station; the selected one is active.
    pub fn options(&self) -> Vec<StationOption> {
        let Some(data) = self.data.as_ref() else {
            return Vec::new();
        };
        data.stations
            .iter()
            .map(|(key, station)| StationOption {
                key: key.clone(),
                label: button_label(station),
                color: None,
                active: self.selected.as_deref() == Some(key.as_str()),
            })
            .collect()
    }

    pub fn destroy(&mut self) {
        if self.data.take().is_some() {
            self.backend.destroy(&self.canvas_id);
        }
        self.selected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockCharts, PRECIP};

    fn data() -> PrecipitationData {
        PrecipitationData::from_json(PRECIP).unwrap()
    }

    #[test]
    fn test_load_selects_first_station() {
        let mut chart = ComboChart::new(MockCharts::default(), "comboChart");
        chart.load(Ok(data()));

        assert_eq!(chart.selected(), Some("turis"));
        let datasets = chart.backend().datasets("comboChart");
        assert_eq!(datasets[0]["data"], json!([12.4, 184.6, 30.2]));
        assert_eq!(datasets[1]["data"], json!([20.0, 410.8, 771.8]));

        let cfg = chart.backend().config("comboChart");
        assert_eq!(cfg["options"]["scales"]["y"]["max"], 200.0);
        assert_eq!(cfg["options"]["scales"]["y1"]["max"], 800.0);
        assert_eq!(cfg["data"]["datasets"][1]["fill"], "origin");
        assert_eq!(cfg["data"]["labels"], json!(["06h", "12h", "18h"]));
    }

    #[test]
    fn test_update_swaps_series_without_new_chart() {
        let mut chart = ComboChart::new(MockCharts::default(), "comboChart");
        chart.load(Ok(data()));
        assert!(chart.update("chiva"));
        assert_eq!(chart.backend().created, 1);
        assert_eq!(
            chart.backend().datasets("comboChart")[0]["data"],
            json!([8.0, null, 15.0])
        );

        let active: Vec<String> = chart
            .options()
            .into_iter()
            .filter(|o| o.active)
            .map(|o| o.key)
            .collect();
        assert_eq!(active, vec!["chiva"]);
    }

    #[test]
    fn test_buttons_show_station_total() {
        let mut chart = ComboChart::new(MockCharts::default(), "comboChart");
        chart.load(Ok(data()));
        let labels: Vec<String> = chart.options().into_iter().map(|o| o.label).collect();
        assert_eq!(labels, vec!["Turís · 772 mm", "Chiva · 491 mm"]);

        let dry = PrecipitationData::from_json(
            r#"{"config": {"labels": ["06h"]},
                "estaciones": {"sueca": {"label": "Sueca", "intensidad": [null], "acumulado": [null]}}}"#,
        )
        .unwrap();
        chart.load(Ok(dry));
        assert_eq!(chart.options()[0].label, "Sueca");
    }

    #[test]
    fn test_unknown_station_is_ignored() {
        let mut chart = ComboChart::new(MockCharts::default(), "comboChart");
        chart.load(Ok(data()));
        assert!(!chart.update("paterna"));
        assert_eq!(chart.selected(), Some("turis"));

        let mut empty = ComboChart::new(MockCharts::default(), "comboChart");
        assert!(!empty.update("turis"));
    }

    #[test]
    fn test_reload_destroys_previous_chart() {
        let mut chart = ComboChart::new(MockCharts::default(), "comboChart");
        chart.load(Ok(data()));
        chart.update("chiva");
        chart.load(Ok(data()));
        assert_eq!(chart.backend().created, 2);
        assert_eq!(chart.backend().destroyed, 1);
        assert_eq!(chart.selected(), Some("turis"));
    }

    #[test]
    fn test_failed_load_keeps_existing_chart() {
        let mut chart = ComboChart::new(MockCharts::default(), "comboChart");
        chart.load(Ok(data()));
        chart.load(Err(anyhow::anyhow!("HTTP 500")));

        assert_eq!(chart.error(), Some(LOAD_ERROR));
        assert_eq!(chart.backend().created, 1);
        assert_eq!(chart.backend().destroyed, 0);
        assert_eq!(chart.selected(), Some("turis"));
        assert_eq!(chart.options().len(), 2);
    }

    #[test]
    fn test_backend_failure_is_reported() {
        let mut chart = ComboChart::new(
            MockCharts {
                fail_create: true,
                ..Default::default()
            },
            "comboChart",
        );
        chart.load(Ok(data()));
        assert_eq!(chart.error(), Some(LOAD_ERROR));
        assert!(chart.options().is_empty());
    }
}

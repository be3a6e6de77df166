//! Sea surface temperature against its historical mean.

use crate::backend::ChartBackend;
use crate::common::{axis_title, hidden_title, series, slanted_x_axis};
use dana_meteo::sea_temperature::SeaTemperatureData;
use serde_json::{json, Value};

pub const LOAD_ERROR: &str = "Error cargando datos";

pub fn config(data: &SeaTemperatureData) -> Value {
    json!({
        "type": "line",
        "data": {
            "labels": data.labels(),
            "datasets": [
                {
                    "label": "Temp Mar",
                    "data": series(&data.sea_temperatures()),
                    "borderColor": "#36a2eb",
                    "backgroundColor": "rgba(54, 162, 235, 0.1)",
                    "borderWidth": 2,
                    "tension": 0.4,
                    "pointRadius": 3,
                    "pointBackgroundColor": "#36a2eb",
                },
                {
                    "label": "Media Histórica",
                    "data": series(&data.historical_means()),
                    "borderColor": "#ff6384",
                    "backgroundColor": "rgba(255, 99, 132, 0.1)",
                    "borderWidth": 2,
                    "borderDash": [5, 5],
                    "tension": 0.4,
                    "pointRadius": 3,
                    "pointBackgroundColor": "#ff6384",
                },
            ],
        },
        "options": {
            "responsive": true,
            "maintainAspectRatio": false,
            "resizeDelay": 100,
            "plugins": {
                "title": hidden_title(),
                "legend": {
                    "position": "top",
                    "align": "end",
                    "labels": { "boxWidth": 12, "boxHeight": 12, "padding": 10, "font": { "size": 11 }, "usePointStyle": true },
                },
            },
            "scales": {
                "x": slanted_x_axis(8),
                "y": {
                    "title": axis_title("Temperatura (°C)", None),
                    "grid": { "color": "rgba(0,0,0,0.05)" },
                },
            },
        },
    })
}

pub struct SeaTempChart<B> {
    backend: B,
    canvas_id: String,
    loaded: bool,
    error: Option<String>,
}

impl<B: ChartBackend> SeaTempChart<B> {
    pub fn new(backend: B, canvas_id: impl Into<String>) -> Self {
        Self {
            backend,
            canvas_id: canvas_id.into(),
            loaded: false,
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

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn load(&mut self, result: anyhow::Result<SeaTemperatureData>) {
        let data = match result {
            Ok(data) => data,
            Err(e) => {
                log::error!("[DANA] sea temperature chart: {:#}", e);
                self.error = Some(LOAD_ERROR.to_string());
                return;
            }
        };
        if self.loaded {
            self.backend.destroy(&self.canvas_id);
            self.loaded = false;
        }
        match self.backend.create(&self.canvas_id, &config(&data)) {
            Ok(()) => {
                self.loaded = true;
                self.error = None;
            }
            Err(e) => {
                log::error!("[DANA] sea temperature chart: {:#}", e);
                self.error = Some(LOAD_ERROR.to_string());
            }
        }
    }

    pub fn destroy(&mut self) {
        if self.loaded {
            self.backend.destroy(&self.canvas_id);
            self.loaded = false;
        }
    }
}

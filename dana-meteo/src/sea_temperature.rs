//! Daily Mediterranean surface temperature against its historical mean.

use crate::lenient;
use crate::{MeteoError, Result};
use dana_utils::dates;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SeaTemperatureDay {
    /// Day as an ISO date string
    pub dia: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub temp_mar: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub media_historica: Option<f64>,
}

impl SeaTemperatureDay {
    /// Degrees above the historical mean, when both are known.
    pub fn anomaly(&self) -> Option<f64> {
        Some(self.temp_mar? - self.media_historica?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SeaTemperatureData {
    #[serde(default)]
    pub dataset: Vec<SeaTemperatureDay>,
}

impl SeaTemperatureData {
    pub fn from_json(json: &str) -> Result<Self> {
        let data: SeaTemperatureData = serde_json::from_str(json)?;
        if data.dataset.is_empty() {
            return Err(MeteoError::InvalidFormat(
                "sea temperature payload has no days".to_string(),
            ));
        }
        Ok(data)
    }

    /// "d/m" axis labels, one per day.
    pub fn labels(&self) -> Vec<String> {
        self.dataset
            .iter()
            .map(|d| dates::day_month_label_or_raw(&d.dia))
            .collect()
    }

    pub fn sea_temperatures(&self) -> Vec<Option<f64>> {
        self.dataset.iter().map(|d| d.temp_mar).collect()
    }

    pub fn historical_means(&self) -> Vec<Option<f64>> {
        self.dataset.iter().map(|d| d.media_historica).collect()
    }

    /// Largest anomaly of the period and the day it happened.
    pub fn peak_anomaly(&self) -> Result<Option<(String, f64)>> {
        let mut peak: Option<(String, f64)> = None;
        for day in &self.dataset {
            let Some(anomaly) = day.anomaly() else {
                continue;
            };
            if peak.as_ref().map_or(true, |(_, best)| anomaly > *best) {
                let parsed = dates::parse_day(&day.dia)
                    .map_err(|e| MeteoError::DateParse(format!("{}: {}", day.dia, e)))?;
                peak = Some((dates::day_month_label(&parsed), anomaly));
            }
        }
        Ok(peak)
    }
}

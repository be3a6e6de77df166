//! Pieces shared by every chart configuration.

use serde::Serialize;
use serde_json::{json, Value};

pub const PRECIPITATION_SOURCE: &str = "AEMET / AVAMET / CHJ";
pub const SEA_TEMPERATURE_SOURCE: &str = "CEAM, AEMET y Copernicus Marine Service";

/// Caption rendered under a chart.
pub fn source_caption(source: &str) -> String {
    format!("Fuente: {}", source)
}

/// Series as Chart.js data: gaps become `null`.
pub fn series(values: &[Option<f64>]) -> Value {
    json!(values)
}

pub fn axis_title(text: &str, color: Option<&str>) -> Value {
    let mut title = json!({
        "display": true,
        "text": text,
        "font": { "size": 10, "weight": "bold" },
    });
    if let Some(color) = color {
        title["color"] = json!(color);
    }
    title
}

/// Slanted, sparse time labels.
pub fn slanted_x_axis(max_ticks: u32) -> Value {
    json!({
        "ticks": {
            "maxRotation": 45,
            "minRotation": 45,
            "autoSkip": true,
            "maxTicksLimit": max_ticks,
            "font": { "size": 10 },
        },
        "grid": { "display": false },
    })
}

pub fn hidden_title() -> Value {
    json!({ "display": false })
}

/// A selectable station as the UI renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationOption {
    pub key: String,
    pub label: String,
    pub color: Option<&'static str>,
    /// Pressed button / ticked checkbox
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_caption() {
        assert_eq!(source_caption(PRECIPITATION_SOURCE), "Fuente: AEMET / AVAMET / CHJ");
    }

    #[test]
    fn test_series_keeps_gaps() {
        assert_eq!(series(&[Some(1.5), None]), json!([1.5, null]));
    }

    #[test]
    fn test_axis_title_color() {
        assert!(axis_title("Acumulado (mm)", None).get("color").is_none());
        assert_eq!(axis_title("Acumulado (mm)", Some("#ff6384"))["color"], "#ff6384");
    }
}

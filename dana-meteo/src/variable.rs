//! The measurements a reader can put on the map.

use serde::{Deserialize, Serialize};

/// Which color scale / heatmap ladder a variable uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    Precipitation,
    Temperature,
    Wind,
}

impl VariableKind {
    /// Heatmap normalization maximum used when none is configured.
    pub fn default_max(&self) -> f64 {
        match self {
            VariableKind::Precipitation => 600.0,
            VariableKind::Temperature => 40.0,
            VariableKind::Wind => 100.0,
        }
    }
}

/// Numeric measurement fields of a feature record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeteoField {
    /// `meteo_prec`, accumulated precipitation (mm)
    Precipitation,
    /// `meteo_t_min` (°C)
    TempMin,
    /// `meteo_t_mit` (°C)
    TempMean,
    /// `meteo_t_max` (°C)
    TempMax,
    /// `meteo_vent_max` (km/h)
    WindMax,
    /// `meteo_hr_mit` (%)
    Humidity,
}

impl MeteoField {
    /// Property name in the GeoJSON source.
    pub fn property(&self) -> &'static str {
        match self {
            MeteoField::Precipitation => "meteo_prec",
            MeteoField::TempMin => "meteo_t_min",
            MeteoField::TempMean => "meteo_t_mit",
            MeteoField::TempMax => "meteo_t_max",
            MeteoField::WindMax => "meteo_vent_max",
            MeteoField::Humidity => "meteo_hr_mit",
        }
    }
}

/// A selectable map variable: where its value lives, how it is labelled and
/// how the heatmap normalizes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapVariable {
    pub id: &'static str,
    pub field: MeteoField,
    pub name: &'static str,
    pub unit: &'static str,
    pub max_heatmap: f64,
    pub kind: VariableKind,
}

impl MapVariable {
    pub const PRECIPITATION: MapVariable = MapVariable {
        id: "precipitacion",
        field: MeteoField::Precipitation,
        name: "Precipitación",
        unit: "mm",
        max_heatmap: 600.0,
        kind: VariableKind::Precipitation,
    };

    pub const TEMP_MEAN: MapVariable = MapVariable {
        id: "t_media",
        field: MeteoField::TempMean,
        name: "Temperatura Media",
        unit: "°C",
        max_heatmap: 40.0,
        kind: VariableKind::Temperature,
    };

    pub const TEMP_MAX: MapVariable = MapVariable {
        id: "t_maxima",
        field: MeteoField::TempMax,
        name: "Temperatura Máxima",
        unit: "°C",
        max_heatmap: 45.0,
        kind: VariableKind::Temperature,
    };

    pub const TEMP_MIN: MapVariable = MapVariable {
        id: "t_minima",
        field: MeteoField::TempMin,
        name: "Temperatura Mínima",
        unit: "°C",
        max_heatmap: 30.0,
        kind: VariableKind::Temperature,
    };

    pub const WIND: MapVariable = MapVariable {
        id: "viento",
        field: MeteoField::WindMax,
        name: "Viento Máximo",
        unit: "km/h",
        max_heatmap: 100.0,
        kind: VariableKind::Wind,
    };

    /// Every variable in selector order.
    pub const ALL: [MapVariable; 5] = [
        Self::PRECIPITATION,
        Self::TEMP_MEAN,
        Self::TEMP_MAX,
        Self::TEMP_MIN,
        Self::WIND,
    ];

    pub fn by_id(id: &str) -> Option<MapVariable> {
        Self::ALL.iter().copied().find(|v| v.id == id)
    }
}

impl Default for MapVariable {
    fn default() -> Self {
        Self::PRECIPITATION
    }
}

//! Per-municipality polygon styling and the hover summary.

use crate::backend::MapBackend;
use dana_meteo::color_scale::{color_for, ColorToken};
use dana_meteo::feature::{FeatureCollection, MeteoProperties};
use dana_meteo::variable::{MapVariable, MeteoField};
use dana_utils::numbers::{fixed, group_thousands};
use serde::{Deserialize, Serialize};

/// Leaflet path options for one feature.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureStyle {
    pub fill_color: String,
    pub weight: f64,
    pub color: String,
    pub fill_opacity: f64,
    pub opacity: f64,
}

pub const EXTREME_FILL: &str = "#800026";
pub const MUTED_FILL: &str = "#ccc";

/// How the polygons are colored.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleRule {
    /// Threshold color scale of the current variable.
    #[default]
    Scale,
    /// Precipitation above `threshold` stands out, everything else is muted.
    Extremes { threshold: f64 },
}

pub fn style_for(properties: &MeteoProperties, variable: &MapVariable, rule: StyleRule) -> FeatureStyle {
    match rule {
        StyleRule::Scale => FeatureStyle {
            fill_color: color_for(properties.value(variable.field), variable.kind).to_string(),
            weight: 1.0,
            color: "#666".to_string(),
            fill_opacity: 0.75,
            opacity: 1.0,
        },
        StyleRule::Extremes { threshold } => {
            let extreme = properties
                .value(MeteoField::Precipitation)
                .is_some_and(|v| v > threshold);
            FeatureStyle {
                fill_color: if extreme { EXTREME_FILL } else { MUTED_FILL }.to_string(),
                weight: 1.0,
                color: "#333".to_string(),
                fill_opacity: 0.8,
                opacity: 1.0,
            }
        }
    }
}

/// Styles for every feature, index-aligned with the collection.
pub fn styles_for(collection: &FeatureCollection, variable: &MapVariable, rule: StyleRule) -> Vec<FeatureStyle> {
    collection
        .features
        .iter()
        .map(|f| style_for(&f.properties, variable, rule))
        .collect()
}

#[derive(Debug, Default)]
pub struct ChoroplethLayer {
    styles: Vec<FeatureStyle>,
    attached: bool,
}

impl ChoroplethLayer {
    pub fn new(collection: &FeatureCollection, variable: &MapVariable, rule: StyleRule) -> Self {
        Self {
            styles: styles_for(collection, variable, rule),
            attached: false,
        }
    }

    pub fn styles(&self) -> &[FeatureStyle] {
        &self.styles
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn attach<B: MapBackend>(&mut self, backend: &mut B) {
        if !self.attached {
            backend.show_choropleth(&self.styles);
            self.attached = true;
        }
    }

    pub fn detach<B: MapBackend>(&mut self, backend: &mut B) {
        if self.attached {
            backend.hide_choropleth();
            self.attached = false;
        }
    }

    pub fn restyle<B: MapBackend>(
        &mut self,
        backend: &mut B,
        collection: &FeatureCollection,
        variable: &MapVariable,
        rule: StyleRule,
    ) {
        self.styles = styles_for(collection, variable, rule);
        backend.restyle_choropleth(&self.styles);
    }
}

/// The selected variable's reading, in its scale color.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlight {
    pub text: String,
    pub color: ColorToken,
}

/// What the info panel shows for a hovered municipality.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureInfo {
    pub title: String,
    /// "Estación: X (ubicación)", absent when no station was matched
    pub station: Option<String>,
    pub readings: Vec<String>,
    pub highlight: Option<Highlight>,
    pub population: Option<String>,
}

impl FeatureInfo {
    pub fn describe(properties: &MeteoProperties, variable: &MapVariable) -> Self {
        let title = properties
            .municipality()
            .unwrap_or("Municipio desconocido")
            .to_string();
        let population = properties
            .poblacion
            .map(|p| group_thousands(p.round() as i64));

        if !properties.has_station() {
            return Self {
                title,
                station: None,
                readings: Vec::new(),
                highlight: None,
                population,
            };
        }

        let station = properties.meteo_estacion.as_deref().map(|name| {
            match properties.meteo_ubicacion.as_deref() {
                Some(place) => format!("Estación: {} ({})", name, place),
                None => format!("Estación: {}", name),
            }
        });

        let opt = |v: Option<f64>| v.map(|v| fixed(v, 1)).unwrap_or_else(|| "–".to_string());
        let mut readings = Vec::new();
        if properties.meteo_t_min.is_some() {
            readings.push(format!(
                "Temp: {}° / {}° / {}°",
                opt(properties.meteo_t_min),
                opt(properties.meteo_t_mit),
                opt(properties.meteo_t_max)
            ));
        }
        if let Some(prec) = properties.meteo_prec {
            readings.push(format!("Precip: {}mm", fixed(prec, 1)));
        }
        if let Some(wind) = properties.meteo_vent_max {
            let dir = properties.meteo_vent_dir.as_deref().unwrap_or("");
            readings.push(format!("Viento: {}km/h {}", fixed(wind, 1), dir).trim_end().to_string());
        }
        if let Some(hr) = properties.meteo_hr_mit {
            readings.push(format!("Humedad: {}%", fixed(hr, 0)));
        }

        let highlight = properties.value(variable.field).map(|v| Highlight {
            text: format!("{}: {}{}", variable.name, fixed(v, 1), variable.unit),
            color: color_for(Some(v), variable.kind),
        });

        Self {
            title,
            station,
            readings,
            highlight,
            population,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(json: &str) -> MeteoProperties {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_scale_style() {
        let p = props(r#"{"meteo_prec": 491.0}"#);
        let s = style_for(&p, &MapVariable::PRECIPITATION, StyleRule::Scale);
        assert_eq!(s.fill_color, "#bd0026");
        assert_eq!(s.color, "#666");
        assert_eq!(s.fill_opacity, 0.75);

        let missing = style_for(&props("{}"), &MapVariable::PRECIPITATION, StyleRule::Scale);
        assert_eq!(missing.fill_color, "#d9d9d9");
    }

    #[test]
    fn test_extremes_style() {
        let rule = StyleRule::Extremes { threshold: 300.0 };
        let wet = style_for(&props(r#"{"meteo_prec": 301}"#), &MapVariable::WIND, rule);
        let dry = style_for(&props(r#"{"meteo_prec": 300}"#), &MapVariable::WIND, rule);
        let none = style_for(&props("{}"), &MapVariable::WIND, rule);
        assert_eq!(wet.fill_color, EXTREME_FILL);
        assert_eq!(dry.fill_color, MUTED_FILL);
        assert_eq!(none.fill_color, MUTED_FILL);
    }

    #[test]
    fn test_style_serializes_as_leaflet_options() {
        let s = style_for(&props("{}"), &MapVariable::PRECIPITATION, StyleRule::Scale);
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["fillColor"], "#d9d9d9");
        assert_eq!(v["fillOpacity"], 0.75);
    }

    #[test]
    fn test_describe_with_station() {
        let p = props(
            r#"{"NAMEUNIT": "Chiva", "meteo_estacion": "Chiva", "meteo_ubicacion": "Valencia",
                "meteo_prec": 491.2, "meteo_t_min": 12, "meteo_t_mit": 15.5, "meteo_t_max": 19,
                "meteo_vent_max": 62, "meteo_vent_dir": "NE", "meteo_hr_mit": 91, "poblacion": 16834}"#,
        );
        let info = FeatureInfo::describe(&p, &MapVariable::PRECIPITATION);
        assert_eq!(info.title, "Chiva");
        assert_eq!(info.station.as_deref(), Some("Estación: Chiva (Valencia)"));
        assert_eq!(
            info.readings,
            vec![
                "Temp: 12.0° / 15.5° / 19.0°",
                "Precip: 491.2mm",
                "Viento: 62.0km/h NE",
                "Humedad: 91%"
            ]
        );
        let highlight = info.highlight.unwrap();
        assert_eq!(highlight.text, "Precipitación: 491.2mm");
        assert_eq!(highlight.color, ColorToken("#bd0026"));
        assert_eq!(info.population.as_deref(), Some("16.834"));
    }

    #[test]
    fn test_describe_without_station() {
        let info = FeatureInfo::describe(&props(r#"{"nombre": "Bugarra"}"#), &MapVariable::WIND);
        assert_eq!(info.title, "Bugarra");
        assert!(info.station.is_none());
        assert!(info.readings.is_empty());
        assert!(info.highlight.is_none());
    }
}

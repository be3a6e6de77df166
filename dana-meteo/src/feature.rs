//! GeoJSON municipality features carrying the `meteo_*` measurements.
//!
//! Only the parts the story uses are modelled: Polygon and MultiPolygon
//! geometries and an explicit optional-field property record. Any other
//! geometry (or a malformed one) is kept as [`Geometry::Unsupported`] so a
//! single bad feature never sinks the whole collection.

use crate::geo::{LatLng, LatLngBounds};
use crate::lenient;
use crate::variable::MeteoField;
use crate::{MeteoError, Result};
use serde::Deserialize;
use serde_json::Value;

/// A GeoJSON position. Extra dimensions (altitude) are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "Vec<f64>")]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
}

impl Position {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    pub fn to_lat_lng(self) -> LatLng {
        LatLng::new(self.lat, self.lon)
    }
}

impl TryFrom<Vec<f64>> for Position {
    type Error = String;

    fn try_from(value: Vec<f64>) -> std::result::Result<Self, Self::Error> {
        match value.as_slice() {
            [lon, lat, ..] => Ok(Position::new(*lon, *lat)),
            _ => Err(format!("position needs 2 coordinates, got {}", value.len())),
        }
    }
}

/// A closed (or not) sequence of positions.
pub type Ring = Vec<Position>;

/// Polygon rings: the outer ring first, holes after.
pub type Polygon = Vec<Ring>;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawGeometry")]
pub enum Geometry {
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
    /// Any other type, or coordinates that did not decode; holds the type name.
    Unsupported(String),
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

impl TryFrom<RawGeometry> for Geometry {
    type Error = String;

    fn try_from(raw: RawGeometry) -> std::result::Result<Self, Self::Error> {
        let decoded = match raw.kind.as_str() {
            "Polygon" => serde_json::from_value(raw.coordinates).map(Geometry::Polygon),
            "MultiPolygon" => serde_json::from_value(raw.coordinates).map(Geometry::MultiPolygon),
            _ => return Ok(Geometry::Unsupported(raw.kind)),
        };
        Ok(decoded.unwrap_or_else(|e| {
            log::warn!("[DANA] feature: malformed {} coordinates: {}", raw.kind, e);
            Geometry::Unsupported(raw.kind)
        }))
    }
}

impl Geometry {
    /// Every position of every ring.
    pub fn positions(&self) -> Box<dyn Iterator<Item = Position> + '_> {
        match self {
            Geometry::Polygon(rings) => Box::new(rings.iter().flatten().copied()),
            Geometry::MultiPolygon(polygons) => {
                Box::new(polygons.iter().flatten().flatten().copied())
            }
            Geometry::Unsupported(_) => Box::new(std::iter::empty()),
        }
    }
}

/// Measurements attached to a municipality. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MeteoProperties {
    #[serde(default, deserialize_with = "lenient::number")]
    pub meteo_prec: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub meteo_t_min: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub meteo_t_mit: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub meteo_t_max: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub meteo_vent_max: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub meteo_vent_dir: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub meteo_hr_mit: Option<f64>,
    /// Station name the municipality's measurements come from
    #[serde(default, deserialize_with = "lenient::text")]
    pub meteo_estacion: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub meteo_ubicacion: Option<String>,
    /// Official municipality name
    #[serde(rename = "NAMEUNIT", default, deserialize_with = "lenient::text")]
    pub name_unit: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub poblacion: Option<f64>,
}

impl MeteoProperties {
    pub fn value(&self, field: MeteoField) -> Option<f64> {
        match field {
            MeteoField::Precipitation => self.meteo_prec,
            MeteoField::TempMin => self.meteo_t_min,
            MeteoField::TempMean => self.meteo_t_mit,
            MeteoField::TempMax => self.meteo_t_max,
            MeteoField::WindMax => self.meteo_vent_max,
            MeteoField::Humidity => self.meteo_hr_mit,
        }
    }

    /// Municipality name for display: official name, then local name.
    pub fn municipality(&self) -> Option<&str> {
        self.name_unit.as_deref().or(self.nombre.as_deref())
    }

    /// Name shown in tooltips: station, official name, local name, or a placeholder.
    pub fn display_name(&self) -> &str {
        self.meteo_estacion
            .as_deref()
            .or(self.municipality())
            .unwrap_or("Municipio desconocido")
    }

    /// Whether a weather station was matched to this municipality at all.
    pub fn has_station(&self) -> bool {
        self.meteo_estacion.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeatureRecord {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "lenient::null_as_default")]
    pub properties: MeteoProperties,
}

impl FeatureRecord {
    pub fn value(&self, field: MeteoField) -> Option<f64> {
        self.properties.value(field)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<FeatureRecord>,
}

impl FeatureCollection {
    /// Decode a GeoJSON FeatureCollection.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        match value.get("type").and_then(Value::as_str) {
            Some("FeatureCollection") | None => {}
            Some(other) => {
                return Err(MeteoError::InvalidFormat(format!(
                    "expected a FeatureCollection, got {}",
                    other
                )))
            }
        }
        let collection: FeatureCollection = serde_json::from_value(value)?;
        log::info!(
            "[DANA] feature: decoded {} features",
            collection.features.len()
        );
        Ok(collection)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Bounds of every supported geometry, if any.
    pub fn bounds(&self) -> Option<LatLngBounds> {
        LatLngBounds::from_points(
            self.features
                .iter()
                .filter_map(|f| f.geometry.as_ref())
                .flat_map(|g| g.positions())
                .map(Position::to_lat_lng),
        )
    }

    /// Count of features with a usable value for the field.
    pub fn count_with_value(&self, field: MeteoField) -> usize {
        self.features
            .iter()
            .filter(|f| f.value(field).is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Polygon", "coordinates": [[[-0.5, 39.0], [-0.3, 39.0], [-0.3, 39.2], [-0.5, 39.0]]]},
                "properties": {"NAMEUNIT": "Paiporta", "meteo_prec": 0, "meteo_t_max": "24.5", "meteo_estacion": "Turís", "poblacion": 27180}
            },
            {
                "type": "Feature",
                "geometry": {"type": "MultiPolygon", "coordinates": [[[[-1.0, 38.5, 12.0], [-0.9, 38.5], [-0.9, 38.6], [-1.0, 38.5]]]]},
                "properties": {"nombre": "Chiva", "meteo_prec": null, "meteo_vent_dir": "NE"}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [0.1, 39.9]},
                "properties": null
            },
            {
                "type": "Feature",
                "geometry": null,
                "properties": {"meteo_prec": "n/d"}
            }
        ]
    }"#;

    #[test]
    fn test_decode_collection() {
        let fc = FeatureCollection::from_json(SAMPLE).unwrap();
        assert_eq!(fc.len(), 4);

        let paiporta = &fc.features[0].properties;
        assert_eq!(paiporta.meteo_prec, Some(0.0));
        assert_eq!(paiporta.meteo_t_max, Some(24.5));
        assert_eq!(paiporta.display_name(), "Turís");
        assert_eq!(paiporta.municipality(), Some("Paiporta"));
        assert_eq!(paiporta.poblacion, Some(27180.0));

        let chiva = &fc.features[1];
        assert_eq!(chiva.properties.meteo_prec, None);
        assert_eq!(chiva.properties.display_name(), "Chiva");
        assert!(matches!(chiva.geometry, Some(Geometry::MultiPolygon(_))));

        assert_eq!(
            fc.features[2].geometry,
            Some(Geometry::Unsupported("Point".to_string()))
        );
        assert_eq!(fc.features[2].properties, MeteoProperties::default());
        assert_eq!(fc.features[2].properties.display_name(), "Municipio desconocido");

        assert!(fc.features[3].geometry.is_none());
        assert_eq!(fc.features[3].value(MeteoField::Precipitation), None);
    }

    #[test]
    fn test_zero_counts_as_a_value() {
        let fc = FeatureCollection::from_json(SAMPLE).unwrap();
        assert_eq!(fc.count_with_value(MeteoField::Precipitation), 1);
    }

    #[test]
    fn test_bounds_ignore_unsupported() {
        let fc = FeatureCollection::from_json(SAMPLE).unwrap();
        let bounds = fc.bounds().unwrap();
        assert_eq!(bounds.south_west, LatLng::new(38.5, -1.0));
        assert_eq!(bounds.north_east, LatLng::new(39.2, -0.3));
    }

    #[test]
    fn test_malformed_polygon_is_unsupported() {
        let json = r#"{"features": [{"geometry": {"type": "Polygon", "coordinates": [[[1.0]]]}, "properties": {}}]}"#;
        let fc = FeatureCollection::from_json(json).unwrap();
        assert_eq!(
            fc.features[0].geometry,
            Some(Geometry::Unsupported("Polygon".to_string()))
        );
    }

    #[test]
    fn test_rejects_other_geojson_types() {
        let err = FeatureCollection::from_json(r#"{"type": "Feature", "features": []}"#).unwrap_err();
        assert!(matches!(err, MeteoError::InvalidFormat(_)));
        assert!(FeatureCollection::from_json("not json").is_err());
    }
}

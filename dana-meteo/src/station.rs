//! Per-station precipitation series behind the combo and multi-line charts.
//!
//! Payload shape:
//! ```text
//! { "config": { "labels": [...] },
//!   "estaciones": { "<key>": { "label": ..., "intensidad": [...], "acumulado": [...] } } }
//! ```
//! Stations keep the order they appear in the document; the first one is
//! the default selection.

use crate::lenient;
use crate::{MeteoError, Result};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SeriesConfig {
    /// Shared time labels for every station series
    #[serde(default)]
    pub labels: Vec<String>,
}

/// One station: instantaneous intensity (mm/h) and running total (mm).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StationSeries {
    pub label: String,
    #[serde(rename = "intensidad", default, deserialize_with = "lenient::number_seq")]
    pub intensity: Vec<Option<f64>>,
    #[serde(rename = "acumulado", default, deserialize_with = "lenient::number_seq")]
    pub cumulative: Vec<Option<f64>>,
}

impl StationSeries {
    /// Largest cumulative value, i.e. the event total for the station.
    pub fn total(&self) -> Option<f64> {
        self.cumulative
            .iter()
            .flatten()
            .copied()
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PrecipitationData {
    #[serde(default)]
    pub config: SeriesConfig,
    #[serde(rename = "estaciones", deserialize_with = "ordered_entries")]
    pub stations: Vec<(String, StationSeries)>,
}

impl PrecipitationData {
    pub fn from_json(json: &str) -> Result<Self> {
        let data: PrecipitationData = serde_json::from_str(json)?;
        if data.stations.is_empty() {
            return Err(MeteoError::InvalidFormat(
                "precipitation payload has no stations".to_string(),
            ));
        }
        for (key, station) in &data.stations {
            if station.intensity.len() != data.config.labels.len()
                || station.cumulative.len() != data.config.labels.len()
            {
                log::warn!(
                    "[DANA] station: series for {} do not match the {} labels",
                    key,
                    data.config.labels.len()
                );
            }
        }
        log::info!("[DANA] station: decoded {} stations", data.stations.len());
        Ok(data)
    }

    pub fn labels(&self) -> &[String] {
        &self.config.labels
    }

    pub fn station(&self, key: &str) -> Option<&StationSeries> {
        self.stations
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, s)| s)
    }

    pub fn first_key(&self) -> Option<&str> {
        self.keys().next()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.stations.iter().map(|(k, _)| k.as_str())
    }
}

/// Decode a JSON object into its entries in document order. A repeated key
/// keeps its first position and its last value.
fn ordered_entries<'de, D, T>(deserializer: D) -> std::result::Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct EntriesVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an object of stations")
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries: Vec<(String, T)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, T>()? {
                match entries.iter_mut().find(|(k, _)| *k == key) {
                    Some(existing) => existing.1 = value,
                    None => entries.push((key, value)),
                }
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor(PhantomData))
}

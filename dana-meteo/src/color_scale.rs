//! Threshold color scales for the choropleth and the legend.
//!
//! Each variable kind has a table of (threshold, color) pairs ordered from
//! the highest threshold down; the first matching row wins. Missing values
//! get [`NO_DATA`], which is never produced by a real value, zero included.

use crate::lenient::coerce_f64;
use crate::variable::VariableKind;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// A CSS color string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ColorToken(pub &'static str);

impl ColorToken {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Color for null / missing / NaN values.
pub const NO_DATA: ColorToken = ColorToken("#d9d9d9");

/// How a row's threshold compares against the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    /// value >= threshold
    AtLeast,
    /// value > threshold (band tops are inclusive)
    Above,
}

struct Scale {
    bound: Bound,
    rows: &'static [(f64, ColorToken)],
    floor: ColorToken,
}

const PRECIPITATION: Scale = Scale {
    bound: Bound::AtLeast,
    rows: &[
        (600.0, ColorToken("#49006a")),
        (400.0, ColorToken("#bd0026")),
        (200.0, ColorToken("#f03b20")),
        (100.0, ColorToken("#fd8d3c")),
        (50.0, ColorToken("#fecc5c")),
        (20.0, ColorToken("#ffffb2")),
        (5.0, ColorToken("#c6dbef")),
    ],
    floor: ColorToken("#f7fbff"),
};

const TEMPERATURE: Scale = Scale {
    bound: Bound::Above,
    rows: &[
        (35.0, ColorToken("#d73027")),
        (30.0, ColorToken("#f46d43")),
        (25.0, ColorToken("#fdae61")),
        (20.0, ColorToken("#fee090")),
        (15.0, ColorToken("#e0f3f8")),
        (10.0, ColorToken("#abd9e9")),
        (5.0, ColorToken("#74add1")),
        (0.0, ColorToken("#4575b4")),
    ],
    floor: ColorToken("#313695"),
};

const WIND: Scale = Scale {
    bound: Bound::AtLeast,
    rows: &[
        (100.0, ColorToken("#67001f")),
        (80.0, ColorToken("#b2182b")),
        (60.0, ColorToken("#d6604d")),
        (40.0, ColorToken("#f4a582")),
        (20.0, ColorToken("#fddbc7")),
    ],
    floor: ColorToken("#92c5de"),
};

fn scale(kind: VariableKind) -> &'static Scale {
    match kind {
        VariableKind::Precipitation => &PRECIPITATION,
        VariableKind::Temperature => &TEMPERATURE,
        VariableKind::Wind => &WIND,
    }
}

/// Resolve a value to its display color.
pub fn color_for(value: Option<f64>, kind: VariableKind) -> ColorToken {
    let v = match value {
        Some(v) if !v.is_nan() => v,
        _ => return NO_DATA,
    };
    let scale = scale(kind);
    scale
        .rows
        .iter()
        .find(|(threshold, _)| match scale.bound {
            Bound::AtLeast => v >= *threshold,
            Bound::Above => v > *threshold,
        })
        .map(|(_, color)| *color)
        .unwrap_or(scale.floor)
}

/// Resolve an untyped JSON property, coercing numeric strings first.
pub fn color_for_raw(value: &Value, kind: VariableKind) -> ColorToken {
    color_for(coerce_f64(value), kind)
}

/// Scale rows as (threshold, color), highest first, followed by the floor
/// color. Used to build legends without duplicating the tables.
pub fn bands(kind: VariableKind) -> (Vec<(f64, ColorToken)>, ColorToken) {
    let scale = scale(kind);
    (scale.rows.to_vec(), scale.floor)
}

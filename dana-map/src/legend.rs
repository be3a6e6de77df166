//! Legend content as a pure function of (mode, variable).

use crate::controller::VisualizationMode;
use crate::heatmap::intensity_color;
use dana_meteo::color_scale::{bands, ColorToken, NO_DATA};
use dana_meteo::variable::{MapVariable, VariableKind};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: ColorToken,
    /// Use light text on this swatch.
    pub light_text: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Legend {
    /// Discrete bands, highest first, plus the "no data" swatch.
    Ranges {
        title: String,
        entries: Vec<LegendEntry>,
        no_data: LegendEntry,
    },
    /// Continuous ramp with low / mid / high ticks.
    Gradient {
        title: String,
        css: String,
        ticks: [String; 3],
    },
}

impl Legend {
    pub fn title(&self) -> &str {
        match self {
            Legend::Ranges { title, .. } | Legend::Gradient { title, .. } => title,
        }
    }
}

fn tick(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

fn unit_suffix(kind: VariableKind) -> &'static str {
    match kind {
        VariableKind::Temperature => "°",
        _ => "",
    }
}

fn ranges(variable: &MapVariable) -> Vec<LegendEntry> {
    let (rows, floor) = bands(variable.kind);
    let suffix = unit_suffix(variable.kind);
    let light = |threshold: f64| variable.kind == VariableKind::Temperature && threshold >= 30.0;

    let mut entries = Vec::with_capacity(rows.len() + 1);
    for (i, (threshold, color)) in rows.iter().enumerate() {
        let label = match i {
            0 => format!("> {}{}", tick(*threshold), suffix),
            _ => format!("{}-{}{}", tick(*threshold), tick(rows[i - 1].0), suffix),
        };
        entries.push(LegendEntry {
            label,
            color: *color,
            light_text: light(*threshold),
        });
    }
    if let Some((lowest, _)) = rows.last() {
        entries.push(LegendEntry {
            label: format!("< {}{}", tick(*lowest), suffix),
            color: floor,
            light_text: false,
        });
    }
    entries
}

/// CSS gradient matching the heatmap's color ladder.
fn heat_gradient(kind: VariableKind) -> String {
    let stops: Vec<String> = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0]
        .iter()
        .map(|&i| {
            let c = intensity_color(i, kind);
            format!("rgb({}, {}, {})", c.r, c.g, c.b)
        })
        .collect();
    format!("linear-gradient(to right, {})", stops.join(", "))
}

pub fn legend_for(mode: VisualizationMode, variable: &MapVariable) -> Legend {
    let title = format!("{} ({})", variable.name, variable.unit);
    match mode {
        VisualizationMode::Choropleth => Legend::Ranges {
            title,
            entries: ranges(variable),
            no_data: LegendEntry {
                label: "Sin datos".to_string(),
                color: NO_DATA,
                light_text: false,
            },
        },
        VisualizationMode::Heatmap => {
            let max = variable.max_heatmap;
            Legend::Gradient {
                title,
                css: heat_gradient(variable.kind),
                ticks: ["0".to_string(), tick(max / 2.0), format!("{}+", tick(max))],
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precipitation_ranges() {
        let legend = legend_for(VisualizationMode::Choropleth, &MapVariable::PRECIPITATION);
        let Legend::Ranges { title, entries, no_data } = legend else {
            panic!("expected ranges");
        };
        assert_eq!(title, "Precipitación (mm)");
        let labels: Vec<&str> = entries.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["> 600", "400-600", "200-400", "100-200", "50-100", "20-50", "5-20", "< 5"]
        );
        assert_eq!(entries[0].color, ColorToken("#49006a"));
        assert_eq!(entries[7].color, ColorToken("#f7fbff"));
        assert_eq!(no_data.color, NO_DATA);
        assert_eq!(no_data.label, "Sin datos");
    }

    #[test]
    fn test_temperature_ranges_have_degree_suffix() {
        let legend = legend_for(VisualizationMode::Choropleth, &MapVariable::TEMP_MEAN);
        let Legend::Ranges { entries, .. } = legend else {
            panic!("expected ranges");
        };
        assert_eq!(entries.first().unwrap().label, "> 35°");
        assert!(entries.first().unwrap().light_text);
        assert_eq!(entries[2].label, "25-30°");
        assert!(!entries[2].light_text);
        assert_eq!(entries.last().unwrap().label, "< 0°");
        assert_eq!(entries.len(), 9);
    }

    #[test]
    fn test_heatmap_gradient_ticks() {
        let legend = legend_for(VisualizationMode::Heatmap, &MapVariable::TEMP_MAX);
        assert_eq!(legend.title(), "Temperatura Máxima (°C)");
        let Legend::Gradient { ticks, css, .. } = legend else {
            panic!("expected gradient");
        };
        assert_eq!(ticks, ["0".to_string(), "22.5".to_string(), "45+".to_string()]);
        assert!(css.starts_with("linear-gradient(to right, rgb(0, 50, 255)"));
    }

    #[test]
    fn test_legend_depends_only_on_mode_and_variable() {
        for v in MapVariable::ALL {
            for mode in [VisualizationMode::Choropleth, VisualizationMode::Heatmap] {
                assert_eq!(legend_for(mode, &v), legend_for(mode, &v));
            }
        }
    }
}

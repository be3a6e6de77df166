//! Controls, legend and info panel around the story map.

use crate::state::StoryState;
use dana_map::choropleth::FeatureInfo;
use dana_map::legend::{Legend, LegendEntry};
use dana_map::VisualizationMode;
use dana_meteo::variable::MapVariable;
use dioxus::prelude::*;

const MODES: [VisualizationMode; 2] = [VisualizationMode::Choropleth, VisualizationMode::Heatmap];

#[derive(Props, Clone, PartialEq)]
pub struct MapControlsProps {
    pub on_mode: EventHandler<VisualizationMode>,
    /// Receives a variable id
    pub on_variable: EventHandler<String>,
}

/// Mode buttons plus the variable dropdown.
#[component]
pub fn MapControls(props: MapControlsProps) -> Element {
    let state = use_context::<StoryState>();
    let mode = (state.map_mode)();
    let variable = (state.map_variable)();
    let disabled = !(state.map_ready)();
    let on_mode = props.on_mode;
    let on_variable = props.on_variable;

    rsx! {
        div {
            class: "controls",
            style: "display: flex; flex-wrap: wrap; gap: 8px; align-items: center; margin-bottom: 8px;",
            select {
                id: "var-select",
                disabled,
                style: "padding: 4px; width: 180px;",
                onchange: move |evt: Event<FormData>| on_variable.call(evt.value()),
                for v in MapVariable::ALL {
                    option {
                        value: "{v.id}",
                        selected: v.id == variable.id,
                        "{v.name}"
                    }
                }
            }
            for (m, label) in MODES.map(|m| (m, m.label())) {
                button {
                    class: if m == mode { "mode-btn active" } else { "mode-btn" },
                    disabled,
                    style: if m == mode {
                        "padding: 4px 10px; border: 1px solid #f03b20; background: #f03b20; color: #fff; cursor: pointer;"
                    } else {
                        "padding: 4px 10px; border: 1px solid #334155; background: #1e293b; color: #cbd5e1; cursor: pointer;"
                    },
                    onclick: move |_| on_mode.call(m),
                    "{label}"
                }
            }
        }
    }
}

#[derive(Props, Clone, PartialEq)]
struct LegendRowProps {
    entry: LegendEntry,
}

#[component]
fn LegendRow(props: LegendRowProps) -> Element {
    let text = if props.entry.light_text { "#fff" } else { "#111" };
    rsx! {
        div {
            style: "display: flex; align-items: center; gap: 6px; font-size: 11px;",
            span {
                style: "display: inline-block; width: 18px; height: 12px; background: {props.entry.color}; border: 1px solid #999;",
            }
            span {
                style: "padding: 0 4px; background: {props.entry.color}; color: {text};",
                "{props.entry.label}"
            }
        }
    }
}

/// Legend for the current mode and variable.
#[component]
pub fn MapLegend() -> Element {
    let state = use_context::<StoryState>();
    let Some(legend) = (state.legend)() else {
        return rsx! {};
    };

    let title = legend.title().to_string();
    let content = match legend {
        Legend::Ranges { entries, no_data, .. } => rsx! {
            for entry in entries {
                LegendRow { entry }
            }
            LegendRow { entry: no_data }
        },
        Legend::Gradient { css, ticks, .. } => rsx! {
            div {
                style: "height: 12px; width: 180px; background: {css};",
            }
            div {
                style: "display: flex; justify-content: space-between; width: 180px; font-size: 10px;",
                for t in ticks {
                    span { "{t}" }
                }
            }
        },
    };

    rsx! {
        div {
            class: "legend",
            style: "background: rgba(255,255,255,0.92); padding: 8px; border-radius: 4px; color: #111; max-width: 220px;",
            h4 {
                style: "margin: 0 0 6px 0; font-size: 12px;",
                "{title}"
            }
            {content}
        }
    }
}

/// Hover details for a municipality, or a prompt when nothing is hovered.
#[component]
pub fn InfoPanel() -> Element {
    let state = use_context::<StoryState>();
    let variable = (state.map_variable)();
    let mode_label = (state.map_mode)().label();

    let body = match (state.hovered)() {
        None => rsx! {
            h3 { style: "margin: 0 0 4px 0; font-size: 14px;", "Datos Meteorológicos" }
            p {
                style: "margin: 0; font-size: 12px;",
                "Variable: "
                strong { "{variable.name}" }
                br {}
                "Modo: "
                strong { "{mode_label}" }
                br {}
                "Pasa el ratón para ver datos"
            }
        },
        Some(info) => feature_details(info),
    };

    rsx! {
        div {
            class: "info-panel",
            style: "background: rgba(255,255,255,0.92); padding: 8px 10px; border-radius: 4px; color: #111; min-width: 200px;",
            {body}
        }
    }
}

fn feature_details(info: FeatureInfo) -> Element {
    let FeatureInfo {
        title,
        station,
        readings,
        highlight,
        population,
    } = info;

    rsx! {
        h3 { style: "margin: 0 0 4px 0; font-size: 14px;", "{title}" }
        if let Some(station) = station {
            div { style: "font-size: 11px; color: #666; margin-bottom: 8px;", "{station}" }
            div {
                style: "font-size: 12px; line-height: 1.4;",
                for reading in readings {
                    div { "{reading}" }
                }
            }
            if let Some(highlight) = highlight {
                div {
                    style: "margin-top: 8px; padding-top: 8px; border-top: 1px solid #ddd;",
                    strong {
                        style: "font-size: 16px; color: {highlight.color};",
                        "{highlight.text}"
                    }
                }
            }
        } else {
            div { style: "color: #999;", "Sin datos meteorológicos" }
        }
        if let Some(population) = population {
            div { style: "font-size: 11px; color: #666; margin-top: 6px;", "Población: {population}" }
        }
    }
}

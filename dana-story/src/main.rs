//! DANA Valencia, October 2024: a scroll-driven story.
//!
//! Data flow:
//! 1. On mount the glue scripts for Leaflet and Chart.js are evaluated.
//! 2. Three independent loads start: the municipality GeoJSON for the map,
//!    the station precipitation series for two charts, and the sea
//!    temperature series for the third. Each waits for its library, fetches
//!    its JSON and hands the result to its controller; a failure only
//!    affects that visualization.
//! 3. Scrolling through the `.step` blocks applies the matching scene to the
//!    map; the map controls, station buttons and checkboxes drive the
//!    controllers directly.

mod story;

use dana_charts::common::{PRECIPITATION_SOURCE, SEA_TEMPERATURE_SOURCE};
use dana_map::VisualizationMode;
use dana_story_ui::components::{
    ChartContainer, ChartHeader, CompareSlider, ErrorDisplay, InfoPanel, LoadingSpinner,
    MapControls, MapLegend, StationButtons, StationCheckboxes,
};
use dana_story_ui::js_bridge;
use dana_story_ui::state::StoryState;
use dioxus::prelude::*;
use story::{Story, COMBO_CANVAS, MULTI_CANVAS, SEA_CANVAS};

/// Map scene captions, in scene order.
const STEPS: [&str; 7] = [
    "A finales de octubre de 2024 una DANA, una depresión aislada en niveles altos, se desprende de la corriente en chorro y queda estancada sobre la península.",
    "Su trayectoria la lleva hacia el Mediterráneo, donde encuentra un mar excepcionalmente cálido tras el verano.",
    "El 29 de octubre las tormentas se organizan sobre el interior de Valencia, en las cabeceras del Poyo y el Magro.",
    "La precipitación acumulada por municipio muestra dónde se concentró el agua.",
    "En rojo, los municipios que superaron los 300 mm en un solo episodio.",
    "El relieve explica el resto: el agua caída en las sierras bajó en pocas horas hacia l'Horta Sud.",
    "Una catástrofe que dejó más de doscientas víctimas y cambió la forma de mirar el riesgo de inundación.",
];

fn main() {
    if dioxus_logger::init(dioxus_logger::tracing::Level::INFO).is_err() {
        web_sys::console::warn_1(&"[DANA] logger already initialized".into());
    }
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("dana-story-root"))
        .launch(App);
}

#[component]
fn App() -> Element {
    let state = use_context_provider(StoryState::new);
    let story = use_context_provider(Story::new);

    use_effect({
        let story = story.clone();
        move || {
            js_bridge::init_scripts();
            spawn(story.clone().start_map(state));
            spawn(story.clone().load_precipitation(state));
            spawn(story.clone().load_sea_temperature(state));
        }
    });

    use_drop({
        let story = story.clone();
        move || story.teardown()
    });

    rsx! {
        div {
            style: "background: #0f172a; color: #e2e8f0; font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; line-height: 1.6;",

            header {
                style: "padding: 64px 16px 32px 16px; max-width: 760px; margin: 0 auto;",
                h1 { style: "font-size: 36px; margin: 0 0 12px 0;", "La DANA de Valencia" }
                p {
                    style: "font-size: 18px; color: #94a3b8; margin: 0;",
                    "Cómo un mar demasiado cálido y una tormenta estancada convirtieron un día de lluvia en la peor riada en décadas."
                }
            }

            MapSection {}
            RainSection {}
            SeaSection {}
            CompareSection {}

            footer {
                style: "padding: 32px 16px; text-align: center; font-size: 11px; color: #64748b;",
                "Datos: AEMET, AVAMET, CHJ, CEAM y Copernicus Marine Service."
            }
        }
    }
}

/// Sticky map with the scroll steps beside it.
#[component]
fn MapSection() -> Element {
    let state = use_context::<StoryState>();
    let story = use_context::<Story>();
    let current = (state.current_step)();

    let on_mode = {
        let story = story.clone();
        move |mode: VisualizationMode| story.select_mode(mode, state)
    };
    let on_variable = move |id: String| story.select_variable(&id, state);

    rsx! {
        section {
            style: "display: flex; flex-wrap: wrap; gap: 24px; padding: 16px; max-width: 1200px; margin: 0 auto;",
            div {
                style: "flex: 1 1 520px; position: sticky; top: 16px; align-self: flex-start;",
                MapControls { on_mode, on_variable }
                div {
                    style: "position: relative;",
                    div {
                        id: "map",
                        style: "width: 100%; height: 480px; border-radius: 6px; overflow: hidden;",
                    }
                    if !(state.map_ready)() {
                        div {
                            style: "position: absolute; inset: 0; display: flex; align-items: center; justify-content: center;",
                            LoadingSpinner { label: "Cargando mapa...".to_string() }
                        }
                    }
                    div {
                        style: "position: absolute; top: 10px; right: 10px; z-index: 1000;",
                        InfoPanel {}
                    }
                    div {
                        style: "position: absolute; bottom: 24px; left: 10px; z-index: 1000;",
                        MapLegend {}
                    }
                }
            }
            div {
                style: "flex: 1 1 320px;",
                for (step, text) in STEPS.iter().enumerate().map(|(i, t)| (i + 1, *t)) {
                    div {
                        class: "step",
                        "data-step": "{step}",
                        style: if current == Some(step) {
                            "min-height: 70vh; display: flex; align-items: center; opacity: 1; transition: opacity 0.3s;"
                        } else {
                            "min-height: 70vh; display: flex; align-items: center; opacity: 0.4; transition: opacity 0.3s;"
                        },
                        p {
                            style: "background: #1e293b; padding: 16px 20px; border-radius: 6px; font-size: 16px;",
                            "{text}"
                        }
                    }
                }
            }
        }
    }
}

/// Station precipitation: one station at a time, then several compared.
#[component]
fn RainSection() -> Element {
    let state = use_context::<StoryState>();
    let story = use_context::<Story>();

    let on_select = {
        let story = story.clone();
        move |key: String| story.select_station(&key, state)
    };
    let on_toggle = move |(key, checked): (String, bool)| story.toggle_station(&key, checked, state);
    let combo_loading = (state.combo_options)().is_empty() && (state.combo_error)().is_none();
    let multi_loading = (state.multi_options)().is_empty() && (state.multi_error)().is_none();

    rsx! {
        section {
            style: "padding: 32px 16px; max-width: 900px; margin: 0 auto;",
            ChartHeader {
                title: "Lluvia estación a estación".to_string(),
                subtitle: "Intensidad (mm/h, línea) y acumulado (mm, área) el 29 de octubre".to_string(),
            }
            StationButtons {
                options: (state.combo_options)(),
                error: (state.combo_error)(),
                on_select,
            }
            ChartContainer {
                id: COMBO_CANVAS.to_string(),
                source: PRECIPITATION_SOURCE.to_string(),
                loading: combo_loading,
            }

            div { style: "height: 32px;" }

            ChartHeader {
                title: "Comparar estaciones".to_string(),
                subtitle: "Intensidad de precipitación (mm/h)".to_string(),
            }
            StationCheckboxes {
                options: (state.multi_options)(),
                error: (state.multi_error)(),
                on_toggle,
            }
            ChartContainer {
                id: MULTI_CANVAS.to_string(),
                source: PRECIPITATION_SOURCE.to_string(),
                loading: multi_loading,
            }
        }
    }
}

#[component]
fn SeaSection() -> Element {
    let state = use_context::<StoryState>();

    rsx! {
        section {
            style: "padding: 32px 16px; max-width: 900px; margin: 0 auto;",
            ChartHeader {
                title: "Un Mediterráneo demasiado cálido".to_string(),
                subtitle: "Temperatura superficial del mar frente a su media histórica (°C)".to_string(),
            }
            if let Some(message) = (state.sea_error)() {
                ErrorDisplay { message }
            }
            ChartContainer {
                id: SEA_CANVAS.to_string(),
                source: SEA_TEMPERATURE_SOURCE.to_string(),
                loading: (state.sea_loading)(),
            }
        }
    }
}

#[component]
fn CompareSection() -> Element {
    rsx! {
        section {
            style: "padding: 32px 16px; max-width: 900px; margin: 0 auto;",
            ChartHeader {
                title: "Antes y después".to_string(),
                subtitle: "Arrastra para comparar la zona de Paiporta antes y después de la riada".to_string(),
            }
            CompareSlider {
                id: "compare-paiporta".to_string(),
                before_src: "img/paiporta_antes.jpg".to_string(),
                after_src: "img/paiporta_despues.jpg".to_string(),
            }
        }
    }
}

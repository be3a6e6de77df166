//! One checkbox per station for the multi-line chart, tinted with the
//! station's line color.

use crate::components::ErrorDisplay;
use dana_charts::StationOption;
use dioxus::prelude::*;

const FALLBACK_COLOR: &str = "#60a5fa";

#[derive(Props, Clone, PartialEq)]
pub struct StationCheckboxesProps {
    pub options: Vec<StationOption>,
    pub error: Option<String>,
    /// (station key, checked)
    pub on_toggle: EventHandler<(String, bool)>,
}

#[component]
pub fn StationCheckboxes(props: StationCheckboxesProps) -> Element {
    if let Some(message) = props.error.clone() {
        return rsx! {
            ErrorDisplay { message }
        };
    }
    let on_toggle = props.on_toggle;

    rsx! {
        div {
            id: "stationCheckboxes",
            style: "display: flex; flex-wrap: wrap; gap: 4px 12px; margin: 8px 0;",
            for (option, key, color) in props.options.iter().map(|o| (o.clone(), o.key.clone(), o.color.unwrap_or(FALLBACK_COLOR))) {
                label {
                    key: "{option.key}",
                    style: "display: flex; align-items: center; gap: 4px; font-size: 12px; color: #cbd5e1; cursor: pointer;",
                    input {
                        r#type: "checkbox",
                        value: "{option.key}",
                        checked: option.active,
                        style: "accent-color: {color};",
                        onchange: move |evt: Event<FormData>| {
                            on_toggle.call((key.clone(), evt.checked()));
                        },
                    }
                    span {
                        style: "display: inline-block; width: 8px; height: 8px; border-radius: 50%; background: {color};",
                    }
                    "{option.label}"
                }
            }
        }
    }
}

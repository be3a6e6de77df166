//! One button per station for the combo chart.

use crate::components::ErrorDisplay;
use dana_charts::StationOption;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct StationButtonsProps {
    pub options: Vec<StationOption>,
    /// Replaces the buttons when set
    pub error: Option<String>,
    pub on_select: EventHandler<String>,
}

fn button_style(active: bool) -> &'static str {
    if active {
        "padding: 4px 10px; border-radius: 999px; border: 1px solid #36a2eb; background: #36a2eb; color: #0f172a; font-size: 12px; cursor: pointer;"
    } else {
        "padding: 4px 10px; border-radius: 999px; border: 1px solid #334155; background: transparent; color: #cbd5e1; font-size: 12px; cursor: pointer;"
    }
}

#[component]
pub fn StationButtons(props: StationButtonsProps) -> Element {
    if let Some(message) = props.error.clone() {
        return rsx! {
            ErrorDisplay { message }
        };
    }
    let on_select = props.on_select;

    rsx! {
        div {
            id: "stationSelector",
            style: "display: flex; flex-wrap: wrap; gap: 6px; margin: 8px 0;",
            for (option, key) in props.options.iter().map(|o| (o.clone(), o.key.clone())) {
                button {
                    key: "{option.key}",
                    class: if option.active { "selector-btn active" } else { "selector-btn" },
                    style: button_style(option.active),
                    onclick: move |_| on_select.call(key.clone()),
                    "{option.label}"
                }
            }
        }
    }
}

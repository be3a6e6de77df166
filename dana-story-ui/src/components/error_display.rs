//! Inline error message shown in place of a chart's controls.

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ErrorDisplayProps {
    pub message: String,
}

#[component]
pub fn ErrorDisplay(props: ErrorDisplayProps) -> Element {
    rsx! {
        p {
            style: "margin: 4px 0; color: #ef4444; font-size: 12px;",
            "{props.message}"
        }
    }
}

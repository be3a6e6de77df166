//! Canvas host for a Chart.js chart, with its source caption.

use dana_charts::source_caption;
use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct ChartContainerProps {
    /// The canvas id; chart controllers address the chart by it
    pub id: String,
    /// Attribution shown under the chart
    pub source: String,
    #[props(default = false)]
    pub loading: bool,
    /// Minimum height in pixels
    #[props(default = 320)]
    pub min_height: u32,
}

/// The canvas stays mounted while loading so a chart can be created on it
/// as soon as data arrives.
#[component]
pub fn ChartContainer(props: ChartContainerProps) -> Element {
    let style = format!(
        "height: {}px; position: relative; width: 100%;",
        props.min_height
    );
    let caption = source_caption(&props.source);

    rsx! {
        div {
            style: "{style}",
            if props.loading {
                div {
                    style: "position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%); color: #94a3b8; font-size: 12px;",
                    "Cargando gráfica..."
                }
            }
            canvas {
                id: "{props.id}",
            }
        }
        p {
            style: "margin: 4px 0 0 0; font-size: 11px; color: #94a3b8; text-align: right;",
            "{caption}"
        }
    }
}

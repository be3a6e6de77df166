//! Browser side of the DANA story.
//!
//! - `js_bridge`: glue script loading, library readiness, fetch
//! - `leaflet`, `canvas`: the map backend and heatmap canvas over Leaflet
//! - `chart_js`: the chart backend over Chart.js
//! - `observer`: IntersectionObserver for the scroll steps
//! - `state`: shared `StoryState` signals
//! - `components`: RSX components

pub mod canvas;
pub mod chart_js;
pub mod components;
pub mod js_bridge;
pub mod leaflet;
pub mod observer;
pub mod state;

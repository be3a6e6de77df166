//! Map logic for the DANA story: visualization modes, the canvas heatmap,
//! choropleth styling, legends, and the scenes the reader scrolls through.
//!
//! Nothing here touches the DOM. The browser crate implements
//! [`backend::MapBackend`] on top of Leaflet and drives a
//! [`controller::MapController`] from map and scroll events.

pub mod backend;
pub mod choropleth;
pub mod config;
pub mod controller;
pub mod event_bus;
pub mod geo;
pub mod heatmap;
pub mod legend;
pub mod scene;
pub mod scroll;

#[cfg(test)]
mod mock;

pub use backend::{HeatCanvas, MapBackend, Overlay};
pub use config::MapConfig;
pub use controller::{MapController, MapSnapshot, VisualizationMode};
pub use event_bus::MapEvent;
pub use scene::{SceneAction, SceneTable};
pub use scroll::{ScrollObserver, StepEntry};

//! Story state shared through Dioxus context.
//!
//! `StoryState` bundles the reactive signals the components render from. It
//! is provided once with `use_context_provider` and read anywhere with
//! `use_context::<StoryState>()`. The controllers themselves live outside
//! the signals; after each operation the app copies what the UI needs here.

use dana_charts::StationOption;
use dana_map::choropleth::FeatureInfo;
use dana_map::legend::Legend;
use dana_map::VisualizationMode;
use dana_meteo::variable::MapVariable;
use dioxus::prelude::*;

#[derive(Clone, Copy)]
pub struct StoryState {
    /// Leaflet mounted and the map controller created
    pub map_ready: Signal<bool>,
    pub map_mode: Signal<VisualizationMode>,
    pub map_variable: Signal<MapVariable>,
    pub legend: Signal<Option<Legend>>,
    /// Municipality under the pointer
    pub hovered: Signal<Option<FeatureInfo>>,

    pub combo_options: Signal<Vec<StationOption>>,
    pub combo_error: Signal<Option<String>>,
    pub multi_options: Signal<Vec<StationOption>>,
    pub multi_error: Signal<Option<String>>,
    pub sea_loading: Signal<bool>,
    pub sea_error: Signal<Option<String>>,

    /// Last scene the scroll observer applied
    pub current_step: Signal<Option<usize>>,
}

impl StoryState {
    pub fn new() -> Self {
        Self {
            map_ready: Signal::new(false),
            map_mode: Signal::new(VisualizationMode::default()),
            map_variable: Signal::new(MapVariable::default()),
            legend: Signal::new(None),
            hovered: Signal::new(None),
            combo_options: Signal::new(Vec::new()),
            combo_error: Signal::new(None),
            multi_options: Signal::new(Vec::new()),
            multi_error: Signal::new(None),
            sea_loading: Signal::new(true),
            sea_error: Signal::new(None),
            current_step: Signal::new(None),
        }
    }
}

impl Default for StoryState {
    fn default() -> Self {
        Self::new()
    }
}

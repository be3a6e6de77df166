//! The map's state machine.
//!
//! `MapController` owns the backend, the loaded features and both
//! visualization layers. Exactly one of choropleth / heatmap is attached
//! while data is loaded, and switching always removes the old layer before
//! adding the new one. Every public operation sets absolute state, so
//! repeating a call leaves the map as it was.

use crate::backend::{MapBackend, Overlay};
use crate::choropleth::{ChoroplethLayer, FeatureInfo, StyleRule};
use crate::config::MapConfig;
use crate::event_bus::{EventBus, Listener, MapEvent};
use crate::geo::{LatLng, LatLngBounds};
use crate::heatmap::{points_from_features, HeatmapConfig, HeatmapLayer};
use crate::legend::{legend_for, Legend};
use anyhow::Context;
use dana_meteo::feature::FeatureCollection;
use dana_meteo::variable::MapVariable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualizationMode {
    #[default]
    Choropleth,
    Heatmap,
}

impl VisualizationMode {
    /// Button label in the map controls.
    pub fn label(&self) -> &'static str {
        match self {
            VisualizationMode::Choropleth => "Municipios",
            VisualizationMode::Heatmap => "Calor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerId {
    Choropleth,
    Heatmap,
    Overlay(Overlay),
}

/// Observable map state, for comparing before/after an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSnapshot {
    pub center: LatLng,
    pub zoom: f64,
    pub mode: VisualizationMode,
    pub variable: &'static str,
    pub layers: Vec<LayerId>,
    pub style: StyleRule,
}

pub struct MapController<B: MapBackend> {
    backend: B,
    config: MapConfig,
    bus: EventBus,
    mode: VisualizationMode,
    variable: MapVariable,
    style_rule: StyleRule,
    legend: Legend,
    features: Option<FeatureCollection>,
    choropleth: Option<ChoroplethLayer>,
    heatmap: Option<HeatmapLayer<B::Canvas>>,
    overlays: BTreeSet<Overlay>,
}

impl<B: MapBackend> MapController<B> {
    pub fn new(backend: B, config: MapConfig) -> Self {
        let mode = VisualizationMode::default();
        let variable = MapVariable::default();
        Self {
            backend,
            config,
            bus: EventBus::new(),
            mode,
            variable,
            style_rule: StyleRule::default(),
            legend: legend_for(mode, &variable),
            features: None,
            choropleth: None,
            heatmap: None,
            overlays: BTreeSet::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn mode(&self) -> VisualizationMode {
        self.mode
    }

    pub fn variable(&self) -> MapVariable {
        self.variable
    }

    pub fn style_rule(&self) -> StyleRule {
        self.style_rule
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    pub fn features(&self) -> Option<&FeatureCollection> {
        self.features.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.features.is_some()
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.bus
    }

    /// Decode municipality GeoJSON and put it on the map. Replaces whatever
    /// was loaded before. Returns the number of features.
    pub fn load(&mut self, geojson: &str) -> anyhow::Result<usize> {
        let collection =
            FeatureCollection::from_json(geojson).context("decoding municipality GeoJSON")?;

        self.detach_visualizations();
        self.backend.set_features(geojson);
        self.choropleth = Some(ChoroplethLayer::new(&collection, &self.variable, self.style_rule));
        self.heatmap = Some(self.build_heatmap(&collection));

        let count = collection.len();
        let bounds = collection.bounds();
        log::info!(
            "[DANA] map: loaded {} features ({} with {})",
            count,
            collection.count_with_value(self.variable.field),
            self.variable.field.property()
        );
        self.features = Some(collection);
        self.attach_current();

        if let Some(bounds) = bounds.filter(LatLngBounds::is_valid) {
            self.backend.fit_bounds(bounds.pad(self.config.fit_padding));
        }
        Ok(count)
    }

    /// Load a fetch result, reporting any failure on the map.
    pub fn load_result(&mut self, fetched: anyhow::Result<String>) {
        match fetched.and_then(|text| self.load(&text)) {
            Ok(_) => {}
            Err(e) => {
                log::error!("[DANA] map: {:#}", e);
                let message = self.config.load_error_message;
                self.show_error(message);
            }
        }
    }

    /// Switch visualization. Returns false when `mode` is already active.
    pub fn set_mode(&mut self, mode: VisualizationMode) -> bool {
        if mode == self.mode {
            return false;
        }
        log::debug!("[DANA] map: mode {:?} -> {:?}", self.mode, mode);
        self.detach_visualizations();
        self.mode = mode;
        self.attach_current();
        self.refresh_legend();
        true
    }

    /// Switch the measured variable. Returns false when it is already selected.
    pub fn set_variable(&mut self, variable: MapVariable) -> bool {
        if variable == self.variable {
            return false;
        }
        self.variable = variable;

        if let Some(collection) = self.features.take() {
            if let Some(mut old) = self.heatmap.take() {
                old.detach(&mut self.backend, &mut self.bus);
            }
            self.heatmap = Some(self.build_heatmap(&collection));
            if let Some(choropleth) = self.choropleth.as_mut() {
                choropleth.restyle(&mut self.backend, &collection, &self.variable, self.style_rule);
            }
            self.features = Some(collection);
            if self.mode == VisualizationMode::Heatmap {
                self.attach_current();
            }
        }
        self.refresh_legend();
        true
    }

    pub fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.backend.set_view(center, zoom);
    }

    pub fn fit_bounds(&mut self, bounds: LatLngBounds) {
        if bounds.is_valid() {
            self.backend.fit_bounds(bounds);
        } else {
            log::warn!("[DANA] map: ignoring invalid bounds {:?}", bounds);
        }
    }

    pub fn reset_view(&mut self) {
        self.backend
            .set_view(self.config.initial_center, self.config.initial_zoom);
    }

    /// Returns false when the overlay was already shown.
    pub fn show_overlay(&mut self, overlay: Overlay) -> bool {
        if !self.overlays.insert(overlay) {
            return false;
        }
        self.backend.show_overlay(overlay);
        true
    }

    /// Returns false when the overlay was not shown.
    pub fn hide_overlay(&mut self, overlay: Overlay) -> bool {
        if !self.overlays.remove(&overlay) {
            return false;
        }
        self.backend.hide_overlay(overlay);
        true
    }

    pub fn highlight_extremes(&mut self, threshold: f64) {
        self.set_style_rule(StyleRule::Extremes { threshold });
    }

    pub fn reset_style(&mut self) {
        self.set_style_rule(StyleRule::Scale);
    }

    fn set_style_rule(&mut self, rule: StyleRule) {
        if rule == self.style_rule {
            return;
        }
        self.style_rule = rule;
        if let (Some(choropleth), Some(collection)) = (self.choropleth.as_mut(), self.features.as_ref()) {
            choropleth.restyle(&mut self.backend, collection, &self.variable, rule);
        }
    }

    /// Route a map event to the layers listening for it.
    pub fn dispatch(&mut self, event: MapEvent) {
        for listener in self.bus.listeners_for(event) {
            match listener {
                Listener::Heatmap => {
                    if let Some(heatmap) = self.heatmap.as_mut() {
                        heatmap.draw(&self.backend);
                    }
                }
            }
        }
    }

    pub fn active_layers(&self) -> Vec<LayerId> {
        let mut layers = Vec::new();
        if self.choropleth.as_ref().is_some_and(ChoroplethLayer::is_attached) {
            layers.push(LayerId::Choropleth);
        }
        if self.heatmap.as_ref().is_some_and(HeatmapLayer::is_attached) {
            layers.push(LayerId::Heatmap);
        }
        layers.extend(self.overlays.iter().copied().map(LayerId::Overlay));
        layers
    }

    pub fn snapshot(&self) -> MapSnapshot {
        MapSnapshot {
            center: self.backend.center(),
            zoom: self.backend.zoom(),
            mode: self.mode,
            variable: self.variable.id,
            layers: self.active_layers(),
            style: self.style_rule,
        }
    }

    /// Info panel content for the feature at `index`.
    pub fn describe(&self, index: usize) -> Option<FeatureInfo> {
        let feature = self.features.as_ref()?.features.get(index)?;
        Some(FeatureInfo::describe(&feature.properties, &self.variable))
    }

    /// Remove every layer and drop the data. Mode goes back to choropleth.
    pub fn teardown(&mut self) {
        self.detach_visualizations();
        for overlay in std::mem::take(&mut self.overlays) {
            self.backend.hide_overlay(overlay);
        }
        self.choropleth = None;
        self.heatmap = None;
        self.features = None;
        self.mode = VisualizationMode::Choropleth;
        self.style_rule = StyleRule::Scale;
        self.refresh_legend();
        log::info!("[DANA] map: torn down");
    }

    pub fn show_error(&mut self, message: &str) {
        self.backend.show_error(message);
    }

    fn build_heatmap(&self, collection: &FeatureCollection) -> HeatmapLayer<B::Canvas> {
        HeatmapLayer::new(
            points_from_features(collection, self.variable.field),
            HeatmapConfig::for_variable(&self.variable),
        )
    }

    fn detach_visualizations(&mut self) {
        if let Some(choropleth) = self.choropleth.as_mut() {
            choropleth.detach(&mut self.backend);
        }
        if let Some(heatmap) = self.heatmap.as_mut() {
            heatmap.detach(&mut self.backend, &mut self.bus);
        }
    }

    fn attach_current(&mut self) {
        match self.mode {
            VisualizationMode::Choropleth => {
                if let Some(choropleth) = self.choropleth.as_mut() {
                    choropleth.attach(&mut self.backend);
                }
            }
            VisualizationMode::Heatmap => {
                if let Some(heatmap) = self.heatmap.as_mut() {
                    if let Err(e) = heatmap.attach(&mut self.backend, &mut self.bus) {
                        log::error!("[DANA] map: heatmap canvas unavailable: {:#}", e);
                    }
                }
            }
        }
    }

    fn refresh_legend(&mut self) {
        self.legend = legend_for(self.mode, &self.variable);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::legend::Legend;
    use crate::mock::{MockMap, GEOJSON};

    fn loaded() -> MapController<MockMap> {
        let mut c = MapController::new(MockMap::new(), MapConfig::default());
        c.load(GEOJSON).unwrap();
        c
    }

    #[test]
    fn test_load_attaches_choropleth_and_fits_padded_bounds() {
        let c = loaded();
        let map = c.backend();
        assert!(map.geojson.is_some());
        assert!(map.choropleth_shown);
        assert_eq!(map.styles.len(), 4);
        assert_eq!(map.styles[0].fill_color, "#bd0026");
        assert_eq!(map.styles[1].fill_color, "#f7fbff");
        assert_eq!(map.live_canvases, 0);

        let fit = map.last_fit.unwrap();
        assert!((fit.south_west.lng - (-0.95)).abs() < 1e-9);
        assert!((fit.north_east.lat - 39.74).abs() < 1e-9);
        assert_eq!(c.active_layers(), vec![LayerId::Choropleth]);
    }

    #[test]
    fn test_load_twice_replaces_layers() {
        let mut c = loaded();
        c.set_mode(VisualizationMode::Heatmap);
        c.load(GEOJSON).unwrap();
        assert_eq!(c.backend().live_canvases, 1);
        assert_eq!(c.event_bus().listener_count(), 1);
        assert_eq!(c.active_layers(), vec![LayerId::Heatmap]);
    }

    #[test]
    fn test_load_failure_reports_on_map() {
        let mut c = MapController::new(MockMap::new(), MapConfig::default());
        c.load_result(Ok("{\"type\": \"Topology\"}".to_string()));
        c.load_result(Err(anyhow::anyhow!("HTTP 404")));
        assert_eq!(c.backend().errors.len(), 2);
        assert_eq!(c.backend().errors[0], "No se pudieron cargar los datos del mapa");
        assert!(!c.is_loaded());
    }

    #[test]
    fn test_set_mode_same_mode_is_noop() {
        let mut c = loaded();
        assert!(c.set_mode(VisualizationMode::Heatmap));
        let legend = c.legend().clone();
        let calls = c.backend().calls.len();
        let layers = c.active_layers();

        assert!(!c.set_mode(VisualizationMode::Heatmap));
        assert_eq!(c.legend(), &legend);
        assert_eq!(c.backend().calls.len(), calls);
        assert_eq!(c.active_layers(), layers);
        assert!(matches!(c.legend(), Legend::Gradient { .. }));
    }

    #[test]
    fn test_mode_round_trip_never_stacks_layers() {
        let mut c = loaded();
        c.backend_mut().calls.clear();

        assert!(c.set_mode(VisualizationMode::Heatmap));
        assert_eq!(c.backend().visualizations(), (false, 1));
        assert!(c.set_mode(VisualizationMode::Choropleth));
        assert_eq!(c.backend().visualizations(), (true, 0));
        assert_eq!(c.active_layers(), vec![LayerId::Choropleth]);
        assert_eq!(c.event_bus().listener_count(), 0);

        // Removal always precedes the addition.
        assert_eq!(
            c.backend().calls,
            vec!["hide:choropleth", "canvas:create", "canvas:remove", "show:choropleth"]
        );
    }

    #[test]
    fn test_heatmap_uses_positive_values_only() {
        let mut c = loaded();
        c.set_mode(VisualizationMode::Heatmap);
        c.dispatch(MapEvent::MoveEnd);
        c.set_mode(VisualizationMode::Choropleth);
        // Chiva (491) and Bugarra (150.5); zero and null geometry are left out.
        let canvas = &c.backend().canvases_removed[0];
        assert_eq!(canvas.paints.len(), 2);
        assert_eq!(canvas.clears, 2);
    }

    #[test]
    fn test_mode_before_load_only_changes_legend() {
        let mut c = MapController::new(MockMap::new(), MapConfig::default());
        assert!(c.set_mode(VisualizationMode::Heatmap));
        assert_eq!(c.backend().visualizations(), (false, 0));
        assert!(c.active_layers().is_empty());

        c.load(GEOJSON).unwrap();
        assert_eq!(c.active_layers(), vec![LayerId::Heatmap]);
    }

    #[test]
    fn test_set_variable_rebuilds_heatmap_and_restyles() {
        let mut c = loaded();
        c.set_mode(VisualizationMode::Heatmap);
        assert!(c.set_variable(MapVariable::TEMP_MEAN));
        assert!(!c.set_variable(MapVariable::TEMP_MEAN));

        assert_eq!(c.backend().live_canvases, 1);
        assert_eq!(c.event_bus().listener_count(), 1);
        assert_eq!(c.backend().styles[0].fill_color, "#e0f3f8");
        assert_eq!(c.legend().title(), "Temperatura Media (°C)");
        assert_eq!(c.snapshot().variable, "t_media");
    }

    #[test]
    fn test_set_variable_in_choropleth_keeps_heatmap_detached() {
        let mut c = loaded();
        c.set_variable(MapVariable::WIND);
        assert_eq!(c.backend().live_canvases, 0);
        assert_eq!(c.backend().styles[0].fill_color, "#d6604d");
        assert_eq!(c.backend().styles[1].fill_color, "#d9d9d9");
    }

    #[test]
    fn test_overlays_have_set_semantics() {
        let mut c = loaded();
        assert!(c.show_overlay(Overlay::DanaTrack));
        assert!(!c.show_overlay(Overlay::DanaTrack));
        assert_eq!(
            c.backend().calls.iter().filter(|s| *s == "show:dana").count(),
            1
        );
        assert!(c.hide_overlay(Overlay::DanaTrack));
        assert!(!c.hide_overlay(Overlay::Relief));
        assert!(c.backend().overlays.is_empty());
    }

    #[test]
    fn test_highlight_extremes_and_reset() {
        let mut c = loaded();
        c.highlight_extremes(300.0);
        let fills: Vec<&str> = c.backend().styles.iter().map(|s| s.fill_color.as_str()).collect();
        assert_eq!(fills, vec!["#800026", "#ccc", "#ccc", "#800026"]);
        assert_eq!(c.snapshot().style, StyleRule::Extremes { threshold: 300.0 });

        c.reset_style();
        assert_eq!(c.backend().styles[0].fill_color, "#bd0026");
    }

    #[test]
    fn test_camera() {
        let mut c = loaded();
        c.set_view(LatLng::new(40.2, -3.5), 6.0);
        assert_eq!(c.snapshot().zoom, 6.0);
        c.reset_view();
        let s = c.snapshot();
        assert_eq!(s.center, LatLng::new(39.4, -0.6));
        assert_eq!(s.zoom, 8.0);

        let fits = c.backend().calls.iter().filter(|s| *s == "fit").count();
        c.fit_bounds(LatLngBounds {
            south_west: LatLng::new(41.0, 0.0),
            north_east: LatLng::new(40.0, 1.0),
        });
        assert_eq!(c.backend().calls.iter().filter(|s| *s == "fit").count(), fits);
    }

    #[test]
    fn test_describe() {
        let c = loaded();
        let info = c.describe(0).unwrap();
        assert_eq!(info.title, "Chiva");
        assert!(info.highlight.is_some());
        assert!(c.describe(1).unwrap().station.is_none());
        assert!(c.describe(99).is_none());
    }

    #[test]
    fn test_teardown() {
        let mut c = loaded();
        c.set_mode(VisualizationMode::Heatmap);
        c.show_overlay(Overlay::Relief);
        c.highlight_extremes(300.0);

        c.teardown();
        assert_eq!(c.mode(), VisualizationMode::Choropleth);
        assert!(c.active_layers().is_empty());
        assert_eq!(c.backend().visualizations(), (false, 0));
        assert!(c.backend().overlays.is_empty());
        assert_eq!(c.event_bus().listener_count(), 0);
        assert!(!c.is_loaded());
        assert!(matches!(c.legend(), Legend::Ranges { .. }));
    }

    #[test]
    fn test_canvas_failure_leaves_heatmap_detached() {
        let mut c = loaded();
        c.backend_mut().fail_canvas = true;
        assert!(c.set_mode(VisualizationMode::Heatmap));
        assert!(c.active_layers().is_empty());
        assert_eq!(c.event_bus().listener_count(), 0);
    }
}

//! Recording map backend for unit tests.

use crate::backend::{HeatCanvas, MapBackend, Overlay};
use crate::choropleth::FeatureStyle;
use crate::geo::{LatLng, LatLngBounds, Pixel, Size};
use crate::heatmap::GradientStop;
use std::collections::BTreeSet;

/// Four municipalities around Chiva: a wet one, a zero reading, a
/// moderate one and one without geometry.
pub const GEOJSON: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature",
         "geometry": {"type": "Polygon", "coordinates": [[[-0.8, 39.3], [-0.6, 39.3], [-0.6, 39.5], [-0.8, 39.5], [-0.8, 39.3]]]},
         "properties": {"NAMEUNIT": "Chiva", "meteo_estacion": "Chiva", "meteo_prec": 491.0, "meteo_t_mit": 16.0, "meteo_vent_max": 62}},
        {"type": "Feature",
         "geometry": {"type": "Polygon", "coordinates": [[[-0.6, 39.3], [-0.4, 39.3], [-0.4, 39.5], [-0.6, 39.5], [-0.6, 39.3]]]},
         "properties": {"NAMEUNIT": "Paiporta", "meteo_prec": "0", "meteo_t_mit": 18.5}},
        {"type": "Feature",
         "geometry": {"type": "Polygon", "coordinates": [[[-0.9, 39.5], [-0.7, 39.5], [-0.7, 39.7], [-0.9, 39.7], [-0.9, 39.5]]]},
         "properties": {"NAMEUNIT": "Bugarra", "meteo_prec": 150.5}},
        {"type": "Feature", "geometry": null, "properties": {"NAMEUNIT": "Sin geometría", "meteo_prec": 700}}
    ]
}"#;

#[derive(Debug, Clone, PartialEq)]
pub struct Paint {
    pub center: Pixel,
    pub radius: f64,
    pub stops: Vec<GradientStop>,
}

#[derive(Debug, Default)]
pub struct MockCanvas {
    pub size: Size,
    pub clears: usize,
    pub paints: Vec<Paint>,
}

impl HeatCanvas for MockCanvas {
    fn resize(&mut self, size: Size) {
        self.size = size;
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.paints.clear();
    }

    fn paint_radial(&mut self, center: Pixel, radius: f64, stops: &[GradientStop]) {
        self.paints.push(Paint {
            center,
            radius,
            stops: stops.to_vec(),
        });
    }
}

#[derive(Debug)]
pub struct MockMap {
    pub center: LatLng,
    pub zoom: f64,
    pub bounds: LatLngBounds,
    pub size: Size,
    pub geojson: Option<String>,
    pub choropleth_shown: bool,
    pub styles: Vec<FeatureStyle>,
    pub overlays: BTreeSet<Overlay>,
    pub live_canvases: usize,
    pub canvases_created: usize,
    pub canvases_removed: Vec<MockCanvas>,
    pub fail_canvas: bool,
    pub last_fit: Option<LatLngBounds>,
    pub errors: Vec<String>,
    /// Layer calls in order, e.g. "hide:choropleth", "canvas:create"
    pub calls: Vec<String>,
}

impl MockMap {
    pub fn new() -> Self {
        Self {
            center: LatLng::new(39.4, -0.6),
            zoom: 8.0,
            bounds: LatLngBounds::new(LatLng::new(37.0, -3.0), LatLng::new(42.0, 1.0)),
            size: Size::new(800, 600),
            geojson: None,
            choropleth_shown: false,
            styles: Vec::new(),
            overlays: BTreeSet::new(),
            live_canvases: 0,
            canvases_created: 0,
            canvases_removed: Vec::new(),
            fail_canvas: false,
            last_fit: None,
            errors: Vec::new(),
            calls: Vec::new(),
        }
    }

    /// Visualization layers currently on the map.
    pub fn visualizations(&self) -> (bool, usize) {
        (self.choropleth_shown, self.live_canvases)
    }
}

impl MapBackend for MockMap {
    type Canvas = MockCanvas;

    fn center(&self) -> LatLng {
        self.center
    }

    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn visible_bounds(&self) -> LatLngBounds {
        self.bounds
    }

    fn size(&self) -> Size {
        self.size
    }

    fn project(&self, point: LatLng) -> Pixel {
        Pixel::new(
            (point.lng - self.bounds.south_west.lng) * 100.0,
            (self.bounds.north_east.lat - point.lat) * 100.0,
        )
    }

    fn set_view(&mut self, center: LatLng, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
        self.calls.push(format!("view:{},{}@{}", center.lat, center.lng, zoom));
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds) {
        self.center = bounds.center();
        self.last_fit = Some(bounds);
        self.calls.push("fit".to_string());
    }

    fn set_features(&mut self, geojson: &str) {
        self.geojson = Some(geojson.to_string());
        self.calls.push("features".to_string());
    }

    fn show_choropleth(&mut self, styles: &[FeatureStyle]) {
        self.choropleth_shown = true;
        self.styles = styles.to_vec();
        self.calls.push("show:choropleth".to_string());
    }

    fn restyle_choropleth(&mut self, styles: &[FeatureStyle]) {
        self.styles = styles.to_vec();
        self.calls.push("restyle:choropleth".to_string());
    }

    fn hide_choropleth(&mut self) {
        self.choropleth_shown = false;
        self.calls.push("hide:choropleth".to_string());
    }

    fn show_overlay(&mut self, overlay: Overlay) {
        self.overlays.insert(overlay);
        self.calls.push(format!("show:{}", overlay.js_name()));
    }

    fn hide_overlay(&mut self, overlay: Overlay) {
        self.overlays.remove(&overlay);
        self.calls.push(format!("hide:{}", overlay.js_name()));
    }

    fn create_canvas(&mut self) -> anyhow::Result<MockCanvas> {
        if self.fail_canvas {
            anyhow::bail!("no 2d context");
        }
        self.live_canvases += 1;
        self.canvases_created += 1;
        self.calls.push("canvas:create".to_string());
        Ok(MockCanvas::default())
    }

    fn remove_canvas(&mut self, canvas: MockCanvas) {
        self.live_canvases -= 1;
        self.canvases_removed.push(canvas);
        self.calls.push("canvas:remove".to_string());
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

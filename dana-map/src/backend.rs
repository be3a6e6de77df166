//! The seam between map logic and whatever actually draws the map.
//!
//! In the browser this is Leaflet plus an overlay `<canvas>`; in tests it is
//! a recording mock. Everything above this trait is plain Rust.

use crate::choropleth::FeatureStyle;
use crate::geo::{LatLng, LatLngBounds, Pixel, Size};
use crate::heatmap::GradientStop;
use serde::{Deserialize, Serialize};

/// Static layers the story switches on and off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overlay {
    /// Track of the cut-off low across the peninsula
    #[serde(alias = "dana")]
    DanaTrack,
    /// Shaded relief tiles
    Relief,
}

impl Overlay {
    /// Name the JS glue uses for the layer.
    pub fn js_name(&self) -> &'static str {
        match self {
            Overlay::DanaTrack => "dana",
            Overlay::Relief => "relief",
        }
    }
}

/// A 2D drawing surface stacked over the map.
pub trait HeatCanvas {
    /// Match the backing store to the viewport.
    fn resize(&mut self, size: Size);
    fn clear(&mut self);
    /// Fill a circle with a radial gradient centred on `center`.
    fn paint_radial(&mut self, center: Pixel, radius: f64, stops: &[GradientStop]);
}

pub trait MapBackend {
    type Canvas: HeatCanvas;

    fn center(&self) -> LatLng;
    fn zoom(&self) -> f64;
    fn visible_bounds(&self) -> LatLngBounds;
    fn size(&self) -> Size;
    /// Geographic point to container pixel.
    fn project(&self, point: LatLng) -> Pixel;

    fn set_view(&mut self, center: LatLng, zoom: f64);
    fn fit_bounds(&mut self, bounds: LatLngBounds);

    /// Hand the raw GeoJSON to the backend; styles later refer to its
    /// features by index.
    fn set_features(&mut self, geojson: &str);
    /// Add the municipality polygons with one style per feature.
    fn show_choropleth(&mut self, styles: &[FeatureStyle]);
    /// Restyle the polygons in place, whether shown or not.
    fn restyle_choropleth(&mut self, styles: &[FeatureStyle]);
    fn hide_choropleth(&mut self);

    fn show_overlay(&mut self, overlay: Overlay);
    fn hide_overlay(&mut self, overlay: Overlay);

    fn create_canvas(&mut self) -> anyhow::Result<Self::Canvas>;
    fn remove_canvas(&mut self, canvas: Self::Canvas);

    /// Report a failure to the reader on the map itself.
    fn show_error(&mut self, message: &str);
}

//! [`MapBackend`] over Leaflet, through the `window.danaMap` glue.

use crate::canvas::CanvasSurface;
use crate::js_bridge::js_error;
use dana_map::choropleth::FeatureStyle;
use dana_map::geo::{LatLng, LatLngBounds, Pixel, Size};
use dana_map::{MapBackend, MapConfig, MapEvent, Overlay};
use js_sys::Array;
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = danaMap, js_name = init, catch)]
    fn map_init(container_id: &str, lat: f64, lng: f64, zoom: f64) -> Result<(), JsValue>;

    #[wasm_bindgen(js_namespace = danaMap, js_name = getCenter)]
    fn map_get_center() -> Array;
    #[wasm_bindgen(js_namespace = danaMap, js_name = getZoom)]
    fn map_get_zoom() -> f64;
    #[wasm_bindgen(js_namespace = danaMap, js_name = getBounds)]
    fn map_get_bounds() -> Array;
    #[wasm_bindgen(js_namespace = danaMap, js_name = getSize)]
    fn map_get_size() -> Array;
    #[wasm_bindgen(js_namespace = danaMap, js_name = project)]
    fn map_project(lat: f64, lng: f64) -> Array;

    #[wasm_bindgen(js_namespace = danaMap, js_name = setView)]
    fn map_set_view(lat: f64, lng: f64, zoom: f64);
    #[wasm_bindgen(js_namespace = danaMap, js_name = fitBounds)]
    fn map_fit_bounds(south: f64, west: f64, north: f64, east: f64);

    #[wasm_bindgen(js_namespace = danaMap, js_name = setFeatures, catch)]
    fn map_set_features(geojson: &str) -> Result<(), JsValue>;
    #[wasm_bindgen(js_namespace = danaMap, js_name = showChoropleth)]
    fn map_show_choropleth(styles_json: &str);
    #[wasm_bindgen(js_namespace = danaMap, js_name = restyleChoropleth)]
    fn map_restyle_choropleth(styles_json: &str);
    #[wasm_bindgen(js_namespace = danaMap, js_name = hideChoropleth)]
    fn map_hide_choropleth();
    #[wasm_bindgen(js_namespace = danaMap, js_name = onHover)]
    fn map_on_hover(callback: &JsValue);

    #[wasm_bindgen(js_namespace = danaMap, js_name = showOverlay)]
    fn map_show_overlay(name: &str);
    #[wasm_bindgen(js_namespace = danaMap, js_name = hideOverlay)]
    fn map_hide_overlay(name: &str);

    #[wasm_bindgen(js_namespace = danaMap, js_name = createCanvas, catch)]
    fn map_create_canvas() -> Result<HtmlCanvasElement, JsValue>;
    #[wasm_bindgen(js_namespace = danaMap, js_name = removeCanvas)]
    fn map_remove_canvas(canvas: &HtmlCanvasElement);

    #[wasm_bindgen(js_namespace = danaMap, js_name = on)]
    fn map_on(events: &str, callback: &JsValue);
    #[wasm_bindgen(js_namespace = danaMap, js_name = off)]
    fn map_off(callback: &JsValue);

    #[wasm_bindgen(js_namespace = danaMap, js_name = showError)]
    fn map_show_error(message: &str);
    #[wasm_bindgen(js_namespace = danaMap, js_name = remove)]
    fn map_remove();
}

fn number(values: &Array, index: u32) -> f64 {
    values.get(index).as_f64().unwrap_or(0.0)
}

fn styles_json(styles: &[FeatureStyle]) -> Option<String> {
    match serde_json::to_string(styles) {
        Ok(json) => Some(json),
        Err(e) => {
            log::error!("[DANA] leaflet: cannot encode styles: {}", e);
            None
        }
    }
}

/// The live Leaflet map. Only one exists per page.
#[derive(Debug)]
pub struct LeafletMap {
    _private: (),
}

impl LeafletMap {
    /// Mount the map into `config.container_id`. Leaflet must be loaded.
    pub fn mount(config: &MapConfig) -> anyhow::Result<Self> {
        let center = config.initial_center;
        map_init(config.container_id, center.lat, center.lng, config.initial_zoom)
            .map_err(js_error)?;
        log::info!("[DANA] leaflet: mounted on #{}", config.container_id);
        Ok(Self { _private: () })
    }
}

impl Drop for LeafletMap {
    fn drop(&mut self) {
        map_remove();
    }
}

impl MapBackend for LeafletMap {
    type Canvas = CanvasSurface;

    fn center(&self) -> LatLng {
        let c = map_get_center();
        LatLng::new(number(&c, 0), number(&c, 1))
    }

    fn zoom(&self) -> f64 {
        map_get_zoom()
    }

    fn visible_bounds(&self) -> LatLngBounds {
        let b = map_get_bounds();
        LatLngBounds::new(
            LatLng::new(number(&b, 0), number(&b, 1)),
            LatLng::new(number(&b, 2), number(&b, 3)),
        )
    }

    fn size(&self) -> Size {
        let s = map_get_size();
        Size::new(number(&s, 0).max(0.0) as u32, number(&s, 1).max(0.0) as u32)
    }

    fn project(&self, point: LatLng) -> Pixel {
        let p = map_project(point.lat, point.lng);
        Pixel::new(number(&p, 0), number(&p, 1))
    }

    fn set_view(&mut self, center: LatLng, zoom: f64) {
        map_set_view(center.lat, center.lng, zoom);
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds) {
        let (sw, ne) = (bounds.south_west, bounds.north_east);
        map_fit_bounds(sw.lat, sw.lng, ne.lat, ne.lng);
    }

    fn set_features(&mut self, geojson: &str) {
        if let Err(e) = map_set_features(geojson) {
            log::error!("[DANA] leaflet: setFeatures failed: {:#}", js_error(e));
        }
    }

    fn show_choropleth(&mut self, styles: &[FeatureStyle]) {
        if let Some(json) = styles_json(styles) {
            map_show_choropleth(&json);
        }
    }

    fn restyle_choropleth(&mut self, styles: &[FeatureStyle]) {
        if let Some(json) = styles_json(styles) {
            map_restyle_choropleth(&json);
        }
    }

    fn hide_choropleth(&mut self) {
        map_hide_choropleth();
    }

    fn show_overlay(&mut self, overlay: Overlay) {
        map_show_overlay(overlay.js_name());
    }

    fn hide_overlay(&mut self, overlay: Overlay) {
        map_hide_overlay(overlay.js_name());
    }

    fn create_canvas(&mut self) -> anyhow::Result<CanvasSurface> {
        let element = map_create_canvas().map_err(js_error)?;
        CanvasSurface::new(element)
    }

    fn remove_canvas(&mut self, canvas: CanvasSurface) {
        map_remove_canvas(canvas.element());
    }

    fn show_error(&mut self, message: &str) {
        map_show_error(message);
    }
}

/// A Leaflet `moveend`/`resize` subscription. Dropping it calls `off`.
pub struct MapListener {
    callback: Closure<dyn FnMut(String)>,
}

impl MapListener {
    pub fn new(mut handler: impl FnMut(MapEvent) + 'static) -> Self {
        let callback = Closure::<dyn FnMut(String)>::new(move |kind: String| {
            match kind.as_str() {
                "moveend" => handler(MapEvent::MoveEnd),
                "resize" => handler(MapEvent::Resize),
                other => log::debug!("[DANA] leaflet: ignoring {} event", other),
            }
        });
        map_on("moveend resize", callback.as_ref());
        Self { callback }
    }
}

impl Drop for MapListener {
    fn drop(&mut self) {
        map_off(self.callback.as_ref());
    }
}

/// Feature hover callback; `None` when the pointer leaves a feature.
pub struct HoverListener {
    _callback: Closure<dyn FnMut(i32)>,
}

impl HoverListener {
    pub fn new(mut handler: impl FnMut(Option<usize>) + 'static) -> Self {
        let callback = Closure::<dyn FnMut(i32)>::new(move |index: i32| {
            handler(usize::try_from(index).ok());
        });
        map_on_hover(callback.as_ref());
        Self {
            _callback: callback,
        }
    }
}

impl Drop for HoverListener {
    fn drop(&mut self) {
        map_on_hover(&JsValue::NULL);
    }
}

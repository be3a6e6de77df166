//! Map defaults.

use crate::geo::LatLng;

#[derive(Debug, Clone, PartialEq)]
pub struct MapConfig {
    /// DOM id of the element Leaflet mounts into
    pub container_id: &'static str,
    pub initial_center: LatLng,
    pub initial_zoom: f64,
    /// Fraction of the data span added around it when fitting the camera
    pub fit_padding: f64,
    pub load_error_message: &'static str,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            container_id: "map",
            initial_center: LatLng::new(39.4, -0.6),
            initial_zoom: 8.0,
            fit_padding: 0.1,
            load_error_message: "No se pudieron cargar los datos del mapa",
        }
    }
}

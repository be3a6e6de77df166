//! Representative points for municipality polygons.
//!
//! The heatmap places one point per municipality, so every polygon needs a
//! single coordinate. Area-weighted centroid of the outer ring, falling back
//! to the ring's bounding-box midpoint when the ring has no area.

use crate::feature::{Geometry, Position, Ring};
use crate::geo::LatLng;

/// Below this absolute signed area a ring is treated as degenerate.
pub const DEGENERATE_AREA: f64 = 1e-10;

/// Centroid of a Polygon / MultiPolygon as (lat, lng).
///
/// MultiPolygons use the polygon whose outer ring has the most vertices.
/// Returns `None` for other geometry types, rings with fewer than three
/// positions, or a non-finite result.
pub fn centroid_of(geometry: &Geometry) -> Option<LatLng> {
    let ring = outer_ring(geometry)?;
    if ring.len() < 3 {
        return None;
    }

    let (area2, cx, cy) = signed_area_sums(ring);
    let point = if area2.abs() / 2.0 < DEGENERATE_AREA {
        bbox_midpoint(ring)
    } else {
        let area = area2 / 2.0;
        LatLng::new(cy / (6.0 * area), cx / (6.0 * area))
    };

    point.is_finite().then_some(point)
}

fn outer_ring(geometry: &Geometry) -> Option<&Ring> {
    match geometry {
        Geometry::Polygon(rings) => rings.first(),
        Geometry::MultiPolygon(polygons) => {
            let mut best: Option<&Ring> = None;
            for ring in polygons.iter().filter_map(|p| p.first()) {
                if best.map_or(true, |b| ring.len() > b.len()) {
                    best = Some(ring);
                }
            }
            best
        }
        Geometry::Unsupported(_) => None,
    }
}

/// Twice the signed area plus the unnormalized centroid sums.
///
/// Closed rings (last == first) sum consecutive pairs; open rings also get
/// the closing edge.
fn signed_area_sums(ring: &[Position]) -> (f64, f64, f64) {
    let closed = ring.first() == ring.last();
    let edges = if closed { ring.len() - 1 } else { ring.len() };

    let mut area2 = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..edges {
        let p1 = ring[i];
        let p2 = ring[(i + 1) % ring.len()];
        let cross = p1.lon * p2.lat - p2.lon * p1.lat;
        area2 += cross;
        cx += (p1.lon + p2.lon) * cross;
        cy += (p1.lat + p2.lat) * cross;
    }
    (area2, cx, cy)
}

fn bbox_midpoint(ring: &[Position]) -> LatLng {
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in ring {
        min_x = min_x.min(p.lon);
        max_x = max_x.max(p.lon);
        min_y = min_y.min(p.lat);
        max_y = max_y.max(p.lat);
    }
    LatLng::new((min_y + max_y) / 2.0, (min_x + max_x) / 2.0)
}

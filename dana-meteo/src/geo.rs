//! Geographic primitives shared by the map and the data model.

use serde::{Deserialize, Serialize};

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// An axis-aligned geographic rectangle (south-west / north-east corners).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// Build bounds from two arbitrary corners.
    pub fn new(a: LatLng, b: LatLng) -> Self {
        Self {
            south_west: LatLng::new(a.lat.min(b.lat), a.lng.min(b.lng)),
            north_east: LatLng::new(a.lat.max(b.lat), a.lng.max(b.lng)),
        }
    }

    /// Smallest bounds containing every finite point, or `None` when there is none.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut bounds: Option<Self> = None;
        for point in points.into_iter().filter(LatLng::is_finite) {
            match bounds.as_mut() {
                Some(b) => b.extend(point),
                None => bounds = Some(Self::new(point, point)),
            }
        }
        bounds
    }

    pub fn extend(&mut self, point: LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Inclusive containment, as Leaflet's `LatLngBounds.contains`.
    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    pub fn is_valid(&self) -> bool {
        self.south_west.is_finite()
            && self.north_east.is_finite()
            && self.south_west.lat <= self.north_east.lat
            && self.south_west.lng <= self.north_east.lng
    }

    /// Grow each side by `ratio` of the span (Leaflet's `pad`).
    pub fn pad(&self, ratio: f64) -> Self {
        let dlat = (self.north_east.lat - self.south_west.lat) * ratio;
        let dlng = (self.north_east.lng - self.south_west.lng) * ratio;
        Self {
            south_west: LatLng::new(self.south_west.lat - dlat, self.south_west.lng - dlng),
            north_east: LatLng::new(self.north_east.lat + dlat, self.north_east.lng + dlng),
        }
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.south_west.lat + self.north_east.lat) / 2.0,
            (self.south_west.lng + self.north_east.lng) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_orders_corners() {
        let b = LatLngBounds::new(LatLng::new(41.0, 1.0), LatLng::new(38.0, -1.0));
        assert_eq!(b.south_west, LatLng::new(38.0, -1.0));
        assert_eq!(b.north_east, LatLng::new(41.0, 1.0));
        assert!(b.is_valid());
    }

    #[test]
    fn test_from_points_skips_non_finite() {
        let b = LatLngBounds::from_points(vec![
            LatLng::new(39.0, -0.5),
            LatLng::new(f64::NAN, 3.0),
            LatLng::new(40.0, 0.5),
        ])
        .unwrap();
        assert_eq!(b.south_west, LatLng::new(39.0, -0.5));
        assert_eq!(b.north_east, LatLng::new(40.0, 0.5));

        assert!(LatLngBounds::from_points(Vec::new()).is_none());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let b = LatLngBounds::new(LatLng::new(38.0, -1.0), LatLng::new(41.0, 1.0));
        assert!(b.contains(LatLng::new(38.0, -1.0)));
        assert!(b.contains(LatLng::new(39.5, 0.0)));
        assert!(!b.contains(LatLng::new(41.1, 0.0)));
        assert!(!b.contains(LatLng::new(f64::NAN, 0.0)));
    }

    #[test]
    fn test_pad() {
        let b = LatLngBounds::new(LatLng::new(0.0, 0.0), LatLng::new(10.0, 20.0)).pad(0.1);
        assert_eq!(b.south_west, LatLng::new(-1.0, -2.0));
        assert_eq!(b.north_east, LatLng::new(11.0, 22.0));
        assert_eq!(b.center(), LatLng::new(5.0, 10.0));
    }
}

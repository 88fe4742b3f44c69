use geo::Point;
use serde::{Deserialize, Serialize};

/// A lat/lng pair as the map UI consumes it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Dhaka, used when a constituency has no computable centroid.
    pub const CAPITAL: GeoPoint = GeoPoint { lat: 23.8103, lng: 90.4125 };

    pub const fn new(lat: f64, lng: f64) -> Self { Self { lat, lng } }
}

impl Default for GeoPoint {
    fn default() -> Self { Self::CAPITAL }
}

/// Points are lon/lat (x/y), as in GeoJSON.
impl From<Point<f64>> for GeoPoint {
    fn from(point: Point<f64>) -> Self {
        Self { lat: point.y(), lng: point.x() }
    }
}

//! Distance functions over fixed-point positions
//!
//! Path elements never compute distances themselves: they call a
//! [`DistanceFn`] and round the result up to whole meters.

use geo::{HaversineDistance, Point};

use super::position::CoordinateScale;

/// Distance in meters between two fixed-point `(longitude, latitude)` pairs.
pub trait DistanceFn {
    fn distance(&self, lon1: i32, lat1: i32, lon2: i32, lat2: i32) -> f64;
}

impl<F> DistanceFn for F
where
    F: Fn(i32, i32, i32, i32) -> f64,
{
    fn distance(&self, lon1: i32, lat1: i32, lon2: i32, lat2: i32) -> f64 {
        self(lon1, lat1, lon2, lat2)
    }
}

/// Haversine distance in meters between two points given in degrees
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let p1 = Point::new(lon1, lat1);
    let p2 = Point::new(lon2, lat2);
    p1.haversine_distance(&p2)
}

/// Conservative integer meters: `floor(d) + 1`.
///
/// Never below the true distance, and at least 1 even for coincident points.
/// Distances past `i32::MAX` saturate.
pub fn round_up_meters(meters: f64) -> i32 {
    (meters.floor() + 1.0) as i32
}

/// Great-circle distance over the configured fixed-point encoding
#[derive(Debug, Clone, Copy, Default)]
pub struct GreatCircle {
    scale: CoordinateScale,
}

impl GreatCircle {
    pub fn new(scale: CoordinateScale) -> Self {
        Self { scale }
    }
}

impl DistanceFn for GreatCircle {
    fn distance(&self, lon1: i32, lat1: i32, lon2: i32, lat2: i32) -> f64 {
        let (lon1, lat1) = self.scale.decode(lon1, lat1);
        let (lon2, lat2) = self.scale.decode(lon2, lat2);
        haversine_distance(lat1, lon1, lat2, lon2)
    }
}

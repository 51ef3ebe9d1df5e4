//! Positions in the engine's fixed-point coordinate space
//!
//! Longitude and latitude are stored as `i32` fixed-point degrees. The
//! encoding belongs to the map-data layer; [`CoordinateScale`] only knows how
//! to convert it back to degrees for distance computations.

use serde::{Deserialize, Serialize};

/// Anything with a fixed-point position and a quantized elevation.
pub trait Positioned {
    fn longitude(&self) -> i32;

    fn latitude(&self) -> i32;

    /// Elevation in quarter meters
    fn elevation_quantized(&self) -> i16;

    /// Elevation in meters (quarter-meter resolution)
    fn elevation_meters(&self) -> f64 {
        f64::from(self.elevation_quantized()) / 4.0
    }

    /// 64-bit position key, see [`position_id`]
    fn unique_id(&self) -> i64 {
        position_id(self.longitude(), self.latitude())
    }
}

/// Pack a position into a 64-bit key: `longitude << 32 | latitude`.
///
/// Both halves are sign-extended before the `or`, so a negative latitude sets
/// every high bit and the key no longer carries the longitude. The engine's
/// offset encoding keeps latitudes non-negative.
pub fn position_id(longitude: i32, latitude: i32) -> i64 {
    (i64::from(longitude) << 32) | i64::from(latitude)
}

/// Inverse of [`position_id`] for non-negative latitudes: `(longitude, latitude)`
pub fn split_position_id(id: i64) -> (i32, i32) {
    ((id >> 32) as i32, id as i32)
}

/// Plain positioned value, as handed out by the map-data layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: i32,
    pub latitude: i32,
    pub elevation_quantized: i16,
}

impl GeoPoint {
    pub fn new(longitude: i32, latitude: i32) -> Self {
        Self {
            longitude,
            latitude,
            elevation_quantized: 0,
        }
    }

    pub fn with_elevation(mut self, elevation_quantized: i16) -> Self {
        self.elevation_quantized = elevation_quantized;
        self
    }
}

impl Positioned for GeoPoint {
    fn longitude(&self) -> i32 {
        self.longitude
    }

    fn latitude(&self) -> i32 {
        self.latitude
    }

    fn elevation_quantized(&self) -> i16 {
        self.elevation_quantized
    }
}

/// Fixed-point encoding of degrees.
///
/// `fixed = (degrees + offset) * scale`. The default matches the routing
/// engine's micro-degree grid, shifted so both axes stay non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinateScale {
    /// Fixed-point units per degree
    pub scale: f64,
    /// Degrees added to longitude before scaling
    pub lon_offset: f64,
    /// Degrees added to latitude before scaling
    pub lat_offset: f64,
}

impl Default for CoordinateScale {
    fn default() -> Self {
        Self {
            scale: 1_000_000.0,
            lon_offset: 180.0,
            lat_offset: 90.0,
        }
    }
}

impl CoordinateScale {
    /// Fixed-point `(longitude, latitude)` to degrees `(lon, lat)`
    pub fn decode(&self, longitude: i32, latitude: i32) -> (f64, f64) {
        (
            f64::from(longitude) / self.scale - self.lon_offset,
            f64::from(latitude) / self.scale - self.lat_offset,
        )
    }

    /// Degrees `(lon, lat)` to fixed-point `(longitude, latitude)`
    pub fn encode(&self, lon: f64, lat: f64) -> (i32, i32) {
        (
            ((lon + self.lon_offset) * self.scale).round() as i32,
            ((lat + self.lat_offset) * self.scale).round() as i32,
        )
    }
}

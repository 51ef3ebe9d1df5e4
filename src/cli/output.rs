//! Output formatting for the butterfly-path CLI

use butterfly_path::{CoordinateScale, PathElement, Positioned};
use serde::Serialize;

/// JSON view of a decoded record
#[derive(Debug, Serialize)]
pub struct ElementView {
    pub longitude: i32,
    pub latitude: i32,
    pub lon_deg: f64,
    pub lat_deg: f64,
    pub elevation_meters: f64,
    pub cost: i32,
    pub id: i64,
}

impl ElementView {
    pub fn new(element: &PathElement, scale: &CoordinateScale) -> Self {
        let (lon_deg, lat_deg) = scale.decode(element.longitude(), element.latitude());
        Self {
            longitude: element.longitude(),
            latitude: element.latitude(),
            lon_deg,
            lat_deg,
            elevation_meters: element.elevation_meters(),
            cost: element.cost(),
            id: element.unique_id(),
        }
    }
}

/// One text line per record: index, position key, degrees, elevation, cost
pub fn format_element(index: usize, element: &PathElement, scale: &CoordinateScale) -> String {
    let (lon_deg, lat_deg) = scale.decode(element.longitude(), element.latitude());
    let key = element.to_string();
    format!(
        "{index:>6}  {key:<22} {lat_deg:>11.6} {lon_deg:>11.6}  {:>8.2} m  cost {}",
        element.elevation_meters(),
        element.cost()
    )
}

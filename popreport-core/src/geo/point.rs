//! Coordinate points

use serde::{Deserialize, Serialize};

/// Angular units of a coordinate point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Degrees,
}

/// A longitude/latitude pair with longitude normalized into `[-180, 180)`
///
/// Latitude is stored as given. Construction never fails; use
/// [`CoordinatePoint::is_valid`] before handing the point to geometry code.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoordinatePoint {
    longitude: f64,
    latitude: f64,
    units: Units,
}

impl CoordinatePoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude: normalize_longitude(longitude),
            latitude,
            units: Units::Degrees,
        }
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// Whether the point lies within the WGS84 bounds `[-180,180] x [-90,90]`
    ///
    /// Bounds are inclusive. NaN components are never valid.
    pub fn is_valid(&self) -> bool {
        (-180.0..=180.0).contains(&self.longitude) && (-90.0..=90.0).contains(&self.latitude)
    }
}

/// Reduces a longitude modulo 360 into `[-180, 180)`
///
/// Infinite input yields NaN.
pub fn normalize_longitude(longitude: f64) -> f64 {
    let wrapped = longitude.rem_euclid(360.0);
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Normalizes and validates a raw longitude/latitude pair
pub fn validate(longitude: f64, latitude: f64) -> bool {
    CoordinatePoint::new(longitude, latitude).is_valid()
}

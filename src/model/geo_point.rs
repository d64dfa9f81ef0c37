use std::cmp::Ordering;

use crate::error::{invalid_argument, FirestoreResult};
use crate::util::compare_doubles;

/// A latitude/longitude pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> FirestoreResult<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(invalid_argument(format!(
                "Latitude must be in the range of [-90, 90], but was {latitude}"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid_argument(format!(
                "Longitude must be in the range of [-180, 180], but was {longitude}"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Orders by latitude, then longitude.
    pub fn compare(&self, other: &GeoPoint) -> Ordering {
        compare_doubles(self.latitude, other.latitude)
            .then_with(|| compare_doubles(self.longitude, other.longitude))
    }
}

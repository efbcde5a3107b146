//! Great-circle distance between check-in coordinates and a project site.
//!
//! Bad coordinates mean a configuration or client defect, so every entry
//! point validates before computing and never clamps.

use thiserror::Error;

/// Mean Earth radius in meters.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    #[error("latitude must be a finite number between -90 and 90, got {0}")]
    InvalidLatitude(f64),

    #[error("longitude must be a finite number between -180 and 180, got {0}")]
    InvalidLongitude(f64),

    #[error("radius must be a finite non-negative number of meters, got {0}")]
    InvalidRadius(f64),
}

/// A validated (latitude, longitude) pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Haversine distance in meters between two validated coordinates.
pub fn distance_meters(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Containment test: `distance <= radius`. The radius itself is validated,
/// a negative or non-finite value is rejected rather than clamped.
pub fn within_radius(from: Coordinate, to: Coordinate, radius_meters: f64) -> Result<bool, GeoError> {
    if !radius_meters.is_finite() || radius_meters < 0.0 {
        return Err(GeoError::InvalidRadius(radius_meters));
    }
    Ok(distance_meters(from, to) <= radius_meters)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_distance_zero_for_identical_points() {
        let p = coord(23.8103, 90.4125);
        assert_eq!(distance_meters(p, p), 0.0);
    }

    #[test]
    fn test_distance_symmetric() {
        let a = coord(23.8103, 90.4125);
        let b = coord(23.7806, 90.2794);
        let ab = distance_meters(a, b);
        let ba = distance_meters(b, a);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn test_known_distance_one_degree_latitude() {
        // One degree of latitude on a 6371 km sphere is ~111.19 km.
        let a = coord(0.0, 0.0);
        let b = coord(1.0, 0.0);
        let d = distance_meters(a, b);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn test_short_distance_plausible() {
        // Two points ~150m apart in the same city block.
        let a = coord(23.810300, 90.412500);
        let b = coord(23.811300, 90.413200);
        let d = distance_meters(a, b);
        assert!(d > 100.0 && d < 250.0, "got {d}");
    }

    #[test]
    fn test_latitude_out_of_range_rejected() {
        assert_eq!(
            Coordinate::new(90.5, 0.0),
            Err(GeoError::InvalidLatitude(90.5))
        );
        assert_eq!(
            Coordinate::new(-91.0, 0.0),
            Err(GeoError::InvalidLatitude(-91.0))
        );
    }

    #[test]
    fn test_longitude_out_of_range_rejected() {
        assert_eq!(
            Coordinate::new(0.0, 180.01),
            Err(GeoError::InvalidLongitude(180.01))
        );
        assert_eq!(
            Coordinate::new(0.0, -200.0),
            Err(GeoError::InvalidLongitude(-200.0))
        );
    }

    #[test]
    fn test_non_finite_coordinates_rejected() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_boundary_coordinates_accepted() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_negative_radius_rejected() {
        let p = coord(0.0, 0.0);
        assert_eq!(
            within_radius(p, p, -1.0),
            Err(GeoError::InvalidRadius(-1.0))
        );
    }

    #[test]
    fn test_within_radius_boundary_inclusive() {
        let a = coord(0.0, 0.0);
        let b = coord(1.0, 0.0);
        let d = distance_meters(a, b);
        assert!(within_radius(a, b, d).unwrap());
        assert!(!within_radius(a, b, d - 1.0).unwrap());
        // Zero radius contains only the point itself.
        assert!(within_radius(a, a, 0.0).unwrap());
    }
}

//! Great-circle distance between GPS fixes

use crate::models::PositionSample;

/// Mean Earth radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers between two lat/lon points in degrees
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Haversine distance in kilometers between two position samples
pub fn sample_distance_km(a: &PositionSample, b: &PositionSample) -> f64 {
    haversine_km(a.latitude_deg, a.longitude_deg, b.latitude_deg, b.longitude_deg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        assert_eq!(haversine_km(38.0, -1.0, 38.0, -1.0), 0.0);
    }

    #[test]
    fn test_one_milli_degree_latitude() {
        // 0.001 degrees of latitude is roughly 111 meters
        let d = haversine_km(38.0, -1.0, 38.001, -1.0);
        assert!((d - 0.111).abs() < 0.001, "got {}", d);
    }

    #[test]
    fn test_half_block_latitude() {
        // 0.00005 degrees of latitude is roughly 5.6 meters
        let d = haversine_km(38.0, -1.0, 38.00005, -1.0);
        assert!((d - 0.00556).abs() < 0.0002, "got {}", d);
    }

    #[test]
    fn test_symmetry() {
        let ab = haversine_km(37.99, -1.13, 38.01, -1.11);
        let ba = haversine_km(38.01, -1.11, 37.99, -1.13);
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn test_longitude_shrinks_with_latitude() {
        // A degree of longitude is shorter away from the equator
        let at_equator = haversine_km(0.0, 0.0, 0.0, 1.0);
        let at_60 = haversine_km(60.0, 0.0, 60.0, 1.0);
        assert!(at_60 < at_equator * 0.6);
    }
}

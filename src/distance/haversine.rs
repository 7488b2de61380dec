/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Great-circle distance in kilometers between two `(lat, lon)` points in degrees.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = from;
    let (lat2, lon2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    // rounding can push `a` a hair above 1 for antipodal points
    let c = 2.0 * a.min(1.0).sqrt().asin();

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        let dist = haversine_km((23.8103, 90.4125), (23.8103, 90.4125));
        assert_eq!(dist, 0.0);
    }

    #[test]
    fn test_dhaka_to_chattogram() {
        // roughly 200 km as the crow flies
        let dist = haversine_km((23.8103, 90.4125), (22.3569, 91.7832));
        assert!(dist > 190.0 && dist < 225.0, "got {}", dist);
    }

    #[test]
    fn test_argument_order_does_not_matter() {
        let a = (23.7925, 90.4078);
        let b = (23.8041, 90.3643);
        assert_eq!(haversine_km(a, b), haversine_km(b, a));
    }

    #[test]
    fn test_antipodal_points_stay_finite() {
        let dist = haversine_km((0.0, 0.0), (0.0, 180.0));
        assert!(dist.is_finite());
        assert!((dist - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }
}

//! Great-circle distance on the mean-radius sphere.
//!
//! One distance model is used for every pair in a ranking pass; mixing
//! approximations would corrupt the ordering, so this is the only distance
//! function in the crate.

/// Mean earth radius in meters (IUGG).
const MEAN_EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Great-circle distance between two WGS84 points, in meters.
///
/// Uses the Vincenty special case of the great-circle formula, which stays
/// numerically accurate for both tiny and near-antipodal separations.
/// Callers validate that all four values are finite and in range; the
/// result is then finite and non-negative.
#[must_use]
pub fn great_circle_meters(lat1_deg: f64, lng1_deg: f64, lat2_deg: f64, lng2_deg: f64) -> f64 {
    let (lat1_sin, lat1_cos) = lat1_deg.to_radians().sin_cos();
    let (lat2_sin, lat2_cos) = lat2_deg.to_radians().sin_cos();
    let (dlng_sin, dlng_cos) = (lng1_deg - lng2_deg).abs().to_radians().sin_cos();

    let nom1 = lat2_cos * dlng_sin;
    let nom2 = lat1_cos * lat2_sin - lat1_sin * lat2_cos * dlng_cos;
    let nom = nom1.hypot(nom2);
    let denom = lat1_sin * lat2_sin + lat1_cos * lat2_cos * dlng_cos;

    MEAN_EARTH_RADIUS_METERS * nom.atan2(denom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_at_identical_points() {
        assert_eq!(great_circle_meters(0.0, 0.0, 0.0, 0.0), 0.0);
        assert_eq!(
            great_circle_meters(25.0330, 121.5654, 25.0330, 121.5654),
            0.0
        );
        assert_eq!(great_circle_meters(-25.0, 55.0, -25.0, 55.0), 0.0);
    }

    #[test]
    fn antimeridian_neighbors_are_close() {
        let d = great_circle_meters(-15.0, -180.0, -15.0, 180.0);
        assert!(d < 0.001, "expected ~0 across the antimeridian, got {d}");
    }

    #[test]
    fn symmetric() {
        let there = great_circle_meters(25.0135, 121.5418, 25.0330, 121.5654);
        let back = great_circle_meters(25.0330, 121.5654, 25.0135, 121.5418);
        assert!((there - back).abs() < 1e-6);
    }

    #[test]
    fn campus_to_taipei_101() {
        // NTUST campus to Taipei 101, roughly 3.2 km apart.
        let d = great_circle_meters(25.0135, 121.5418, 25.0330, 121.5654);
        assert!(d > 3_100.0, "too short: {d}");
        assert!(d < 3_350.0, "too long: {d}");
    }

    #[test]
    fn taipei_to_kaohsiung() {
        let d = great_circle_meters(25.0478, 121.5170, 22.6273, 120.3014);
        assert!(d > 290_000.0, "too short: {d}");
        assert!(d < 300_000.0, "too long: {d}");
    }

    #[test]
    fn never_negative_for_scattered_pairs() {
        let points = [
            (-81.2281, 77.7574),
            (40.9211, -93.3330),
            (67.0156, 122.1027),
            (-87.8470, 132.7169),
            (-37.4448, -124.4675),
            (29.2972, 0.0321),
        ];
        for (lat1, lng1) in points {
            for (lat2, lng2) in points {
                let d = great_circle_meters(lat1, lng1, lat2, lng2);
                assert!(d >= 0.0, "negative distance for {lat1},{lng1} -> {lat2},{lng2}");
                assert!(d.is_finite());
            }
        }
    }
}

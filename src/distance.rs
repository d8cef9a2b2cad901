// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

/// Radius of Earth used for all distances, in miles.
const EARTH_RADIUS: f64 = 3963.0;

/// Calculates the great-circle distance between two lat-lon positions
/// on Earth using the [haversine formula](https://en.wikipedia.org/wiki/Haversine_formula).
/// Returns the result in miles.
pub fn earth_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();

    let sin_dphi_half = ((lat2 - lat1).to_radians() * 0.5).sin();
    let sin_dlambda_half = ((lon2 - lon1).to_radians() * 0.5).sin();

    let h = sin_dphi_half * sin_dphi_half
        + phi1.cos() * phi2.cos() * sin_dlambda_half * sin_dlambda_half;

    // Rounding may push h slightly outside of [0, 1] for antipodal points.
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Calculates the initial bearing (forward azimuth) of the great-circle arc
/// from the first to the second position, in degrees clockwise from north,
/// in the range `[-180, 180]`.
///
/// The bearing is not symmetric: the bearing back from the second position
/// generally differs from the forward bearing rotated by 180°.
pub fn initial_bearing(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let y = dlambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlambda.cos();

    y.atan2(x).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! assert_almost_eq {
        ($a:expr, $b:expr, $eps:expr) => {
            assert!(
                (($a - $b).abs() < $eps),
                "assertion failed: {} ≈ {}",
                $a,
                $b
            )
        };
    }

    #[test]
    fn one_degree_at_equator() {
        assert_almost_eq!(earth_distance(0.0, 0.0, 1.0, 0.0), 69.166, 0.01);
        assert_almost_eq!(earth_distance(0.0, 0.0, 0.0, 1.0), 69.166, 0.01);
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let points = [
            (37.8716, -122.2727),
            (37.8650, -122.2600),
            (52.2297, 21.0122),
            (-33.8688, 151.2093),
        ];

        for &(lat1, lon1) in &points {
            assert_eq!(earth_distance(lat1, lon1, lat1, lon1), 0.0);
            for &(lat2, lon2) in &points {
                assert_eq!(
                    earth_distance(lat1, lon1, lat2, lon2),
                    earth_distance(lat2, lon2, lat1, lon1),
                );
            }
        }
    }

    #[test]
    fn triangle_inequality() {
        let points = [
            (37.8716, -122.2727),
            (37.8650, -122.2600),
            (37.8801, -122.2500),
            (52.2297, 21.0122),
            (0.0, 0.0),
            (-33.8688, 151.2093),
        ];

        for &(a_lat, a_lon) in &points {
            for &(b_lat, b_lon) in &points {
                for &(c_lat, c_lon) in &points {
                    let ac = earth_distance(a_lat, a_lon, c_lat, c_lon);
                    let ab = earth_distance(a_lat, a_lon, b_lat, b_lon);
                    let bc = earth_distance(b_lat, b_lon, c_lat, c_lon);
                    assert!(ac <= ab + bc + 1e-9, "{} > {} + {}", ac, ab, bc);
                }
            }
        }
    }

    #[test]
    fn cardinal_bearings() {
        assert_almost_eq!(initial_bearing(0.0, 0.0, 1.0, 0.0), 0.0, 1e-9);
        assert_almost_eq!(initial_bearing(0.0, 0.0, 0.0, 1.0), 90.0, 1e-9);
        assert_almost_eq!(initial_bearing(0.0, 0.0, -1.0, 0.0), 180.0, 1e-9);
        assert_almost_eq!(initial_bearing(0.0, 0.0, 0.0, -1.0), -90.0, 1e-9);
    }

    #[test]
    fn bearing_is_not_symmetric() {
        let forward = initial_bearing(40.0, -74.0, 51.5, 0.0);
        let backward = initial_bearing(51.5, 0.0, 40.0, -74.0);
        let reversed = if backward > 0.0 {
            backward - 180.0
        } else {
            backward + 180.0
        };
        assert!((forward - reversed).abs() > 1.0);
    }
}

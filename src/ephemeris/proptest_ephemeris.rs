//! Property-based tests for the Kepler solver using proptest.
//!
//! These tests verify solver convergence and the degenerate-input guarantees
//! across a wide range of orbital elements.

use std::f64::consts::TAU;

use bevy::math::DVec3;
use proptest::prelude::*;

use super::kepler::{OrbitalElements, solve_eccentric_anomaly, solve_position};
use crate::types::MAX_ECCENTRICITY;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Newton iteration satisfies Kepler's equation for any bound eccentricity.
    #[test]
    fn prop_kepler_converges(
        eccentricity in 0.0f64..MAX_ECCENTRICITY,
        mean_anomaly in -1.0e4f64..1.0e4,
    ) {
        let e_anomaly = solve_eccentric_anomaly(mean_anomaly, eccentricity);
        let residual = e_anomaly - eccentricity * e_anomaly.sin() - mean_anomaly.rem_euclid(TAU);
        prop_assert!(
            residual.abs() < 1e-6,
            "residual {residual:e} for e={eccentricity}, M={mean_anomaly}"
        );
    }

    /// Circular orbits need no iteration: E = M.
    #[test]
    fn prop_circular_eccentric_equals_mean(mean_anomaly in 0.0f64..TAU) {
        prop_assert_eq!(solve_eccentric_anomaly(mean_anomaly, 0.0), mean_anomaly);
    }

    /// Radius stays between periapsis and apoapsis at any time.
    #[test]
    fn prop_radius_between_apsides(
        semi_major_axis in 1.0f64..1.0e4,
        eccentricity in 0.0f64..0.99,
        period in 0.1f64..1.0e5,
        elapsed in -1.0e6f64..1.0e6,
        inclination in 0.0f64..180.0,
        node in 0.0f64..360.0,
        periapsis in 0.0f64..360.0,
    ) {
        let elements = OrbitalElements::new(semi_major_axis, eccentricity, period)
            .with_orientation_deg(inclination, node, periapsis);
        let r = solve_position(&elements, elapsed).length();
        let tolerance = semi_major_axis * 1e-6;
        prop_assert!(r >= semi_major_axis * (1.0 - eccentricity) - tolerance, "r={r}");
        prop_assert!(r <= semi_major_axis * (1.0 + eccentricity) + tolerance, "r={r}");
    }

    /// Non-positive semi-major axis or period always gives the origin.
    #[test]
    fn prop_degenerate_shape_is_origin(
        semi_major_axis in -1.0e4f64..=0.0,
        period in -1.0e4f64..=0.0,
        eccentricity in 0.0f64..2.0,
        elapsed in -1.0e4f64..1.0e4,
    ) {
        let bad_axis = OrbitalElements::new(semi_major_axis, eccentricity, 10.0);
        let bad_period = OrbitalElements::new(10.0, eccentricity, period);
        prop_assert_eq!(solve_position(&bad_axis, elapsed), DVec3::ZERO);
        prop_assert_eq!(solve_position(&bad_period, elapsed), DVec3::ZERO);
    }

    /// Unsupported eccentricities are clamped and still give finite positions.
    #[test]
    fn prop_open_orbit_eccentricity_stays_finite(
        eccentricity in 1.0f64..100.0,
        elapsed in 0.0f64..1.0e4,
    ) {
        let elements = OrbitalElements::new(50.0, eccentricity, 30.0);
        prop_assert_eq!(elements.clamped_eccentricity(), MAX_ECCENTRICITY);
        prop_assert!(solve_position(&elements, elapsed).is_finite());
    }
}

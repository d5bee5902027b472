//! Kepler orbit solver using Newton's method for the Kepler equation.
//!
//! Positions are computed relative to the orbital parent, in the parent's
//! frame, from a set of classical orbital elements and an elapsed time in
//! simulated days. Degenerate or missing elements never produce NaN: they
//! resolve to the parent's origin or to zero angles.

use std::f64::consts::{PI, TAU};

use bevy::math::{DVec2, DVec3};

use crate::types::{
    DEG_TO_RAD, KEPLER_MAX_ITERATIONS, KEPLER_MIN_DERIVATIVE, KEPLER_TOLERANCE, MAX_ECCENTRICITY,
};

/// Classical orbital elements of a body around its parent.
///
/// Lengths are in working units, the period in days, and angles in radians.
/// Every field is optional: missing angles default to zero, and a missing
/// semi-major axis or period makes the orbit degenerate (stationary at the
/// parent's origin).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrbitalElements {
    pub semi_major_axis: Option<f64>,
    pub eccentricity: Option<f64>,
    /// Orbital period in days.
    pub period: Option<f64>,
    pub inclination: Option<f64>,
    pub longitude_of_ascending_node: Option<f64>,
    pub argument_of_periapsis: Option<f64>,
    pub mean_anomaly_at_epoch: Option<f64>,
}

impl OrbitalElements {
    /// Elements for an orbit in the reference plane with periapsis on +x.
    pub fn new(semi_major_axis: f64, eccentricity: f64, period_days: f64) -> Self {
        Self {
            semi_major_axis: Some(semi_major_axis),
            eccentricity: Some(eccentricity),
            period: Some(period_days),
            ..Default::default()
        }
    }

    /// Set the three orientation angles, given in degrees.
    pub fn with_orientation_deg(
        mut self,
        inclination: f64,
        longitude_of_ascending_node: f64,
        argument_of_periapsis: f64,
    ) -> Self {
        self.inclination = Some(inclination * DEG_TO_RAD);
        self.longitude_of_ascending_node = Some(longitude_of_ascending_node * DEG_TO_RAD);
        self.argument_of_periapsis = Some(argument_of_periapsis * DEG_TO_RAD);
        self
    }

    /// Set the mean anomaly at epoch, given in degrees.
    pub fn with_mean_anomaly_deg(mut self, mean_anomaly: f64) -> Self {
        self.mean_anomaly_at_epoch = Some(mean_anomaly * DEG_TO_RAD);
        self
    }

    /// Semi-major axis and period, if both are present, finite and positive.
    fn shape(&self) -> Option<(f64, f64)> {
        let a = self.semi_major_axis.filter(|a| a.is_finite() && *a > 0.0)?;
        let period = self.period.filter(|p| p.is_finite() && *p > 0.0)?;
        Some((a, period))
    }

    /// Eccentricity clamped into `[0, MAX_ECCENTRICITY]`.
    ///
    /// Parabolic and hyperbolic values are not supported and are pulled back
    /// into the elliptical range before reaching the solver.
    pub fn clamped_eccentricity(&self) -> f64 {
        finite_or_zero(self.eccentricity).clamp(0.0, MAX_ECCENTRICITY)
    }

    /// Mean motion in radians per day, or `None` for a degenerate orbit.
    pub fn mean_motion(&self) -> Option<f64> {
        self.shape().map(|(_, period)| TAU / period)
    }

    /// Mean anomaly at `elapsed_days`, normalized into `[0, 2π)`.
    pub fn mean_anomaly(&self, elapsed_days: f64) -> Option<f64> {
        let n = self.mean_motion()?;
        let m = finite_or_zero(self.mean_anomaly_at_epoch) + n * elapsed_days;
        m.is_finite().then(|| m.rem_euclid(TAU))
    }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Solve Kepler's equation `M = E - e·sin(E)` for the eccentric anomaly.
///
/// Newton–Raphson starting from `E = M` for `e < 0.8` and `E = π` otherwise.
/// Iteration stops once the correction falls below [`KEPLER_TOLERANCE`], after
/// [`KEPLER_MAX_ITERATIONS`], or as soon as the derivative `1 - e·cos(E)` gets
/// too small to divide by. The mean anomaly is normalized to `[0, 2π)` first.
pub fn solve_eccentric_anomaly(mean_anomaly: f64, eccentricity: f64) -> f64 {
    let m = mean_anomaly.rem_euclid(TAU);

    let mut e_anomaly = if eccentricity < 0.8 { m } else { PI };

    for _ in 0..KEPLER_MAX_ITERATIONS {
        let f = e_anomaly - eccentricity * e_anomaly.sin() - m;
        let f_prime = 1.0 - eccentricity * e_anomaly.cos();

        if f_prime.abs() < KEPLER_MIN_DERIVATIVE {
            break;
        }

        let delta = f / f_prime;
        e_anomaly -= delta;

        if delta.abs() < KEPLER_TOLERANCE {
            break;
        }
    }

    e_anomaly
}

/// True anomaly from eccentric anomaly.
///
/// This is the half-angle identity `tan(ν/2) = sqrt((1+e)/(1-e))·tan(E/2)`,
/// evaluated with `atan2` so that `E = π` stays well defined.
pub fn eccentric_to_true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let half_e = eccentric_anomaly / 2.0;
    let y = (1.0 + eccentricity).sqrt() * half_e.sin();
    let x = (1.0 - eccentricity).sqrt() * half_e.cos();
    2.0 * y.atan2(x)
}

/// Position in the orbital plane (periapsis along +x).
fn planar_position(semi_major_axis: f64, eccentricity: f64, true_anomaly: f64) -> DVec2 {
    let r = semi_major_axis * (1.0 - eccentricity * eccentricity)
        / (1.0 + eccentricity * true_anomaly.cos());
    DVec2::new(r * true_anomaly.cos(), r * true_anomaly.sin())
}

/// Rotate an orbital-plane position into the parent frame.
///
/// Composes rotations by the argument of periapsis (ω), the inclination (i)
/// and the longitude of the ascending node (Ω): `Rz(Ω)·Rx(i)·Rz(ω)`.
fn rotate_to_parent_frame(planar: DVec2, elements: &OrbitalElements) -> DVec3 {
    let (sin_o, cos_o) = finite_or_zero(elements.longitude_of_ascending_node).sin_cos();
    let (sin_i, cos_i) = finite_or_zero(elements.inclination).sin_cos();
    let (sin_w, cos_w) = finite_or_zero(elements.argument_of_periapsis).sin_cos();

    let DVec2 { x, y } = planar;

    DVec3::new(
        x * (cos_o * cos_w - sin_o * sin_w * cos_i) - y * (cos_o * sin_w + sin_o * cos_w * cos_i),
        x * (sin_o * cos_w + cos_o * sin_w * cos_i) - y * (sin_o * sin_w - cos_o * cos_w * cos_i),
        x * (sin_w * sin_i) + y * (cos_w * sin_i),
    )
}

/// Position relative to the orbital parent after `elapsed_days` of simulated time.
///
/// Returns the origin for degenerate elements (non-positive or missing
/// semi-major axis or period) and for a non-finite elapsed time. Pure and
/// deterministic.
pub fn solve_position(elements: &OrbitalElements, elapsed_days: f64) -> DVec3 {
    let Some((a, _)) = elements.shape() else {
        return DVec3::ZERO;
    };
    let Some(mean_anomaly) = elements.mean_anomaly(elapsed_days) else {
        return DVec3::ZERO;
    };

    let e = elements.clamped_eccentricity();
    let e_anomaly = solve_eccentric_anomaly(mean_anomaly, e);
    let true_anomaly = eccentric_to_true_anomaly(e_anomaly, e);

    let position = rotate_to_parent_frame(planar_position(a, e, true_anomaly), elements);
    if position.is_finite() {
        position
    } else {
        DVec3::ZERO
    }
}

//! Property-based tests for probe physics using proptest.
//!
//! These tests verify physical invariants across a wide range of bodies,
//! orbits, and launch sequences.

use bevy::math::DVec3;
use proptest::prelude::*;

use crate::effects::EffectManager;
use crate::physics::{compute_acceleration, semi_implicit_euler};
use crate::probe::{ProbePool, Trail};
use crate::test_utils::{assertions, fixtures};
use crate::types::{BodySnapshot, ProbeConfig};

fn vec3(range: f64) -> impl Strategy<Value = DVec3> {
    (-range..range, -range..range, -range..range).prop_map(|(x, y, z)| DVec3::new(x, y, z))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Single body: |a| = G·m/d², pointing from the probe to the body.
    #[test]
    fn prop_single_body_inverse_square(
        probe in vec3(1000.0),
        body in vec3(1000.0),
        mass in 1.0f64..1e6,
        g in 1e-3f64..10.0,
    ) {
        let d = probe.distance(body);
        prop_assume!(d > 1e-3);

        let acc = compute_acceleration(probe, &[BodySnapshot::new(body, 1.0, mass)], g);
        let expected = g * mass / (d * d);

        prop_assert!((acc.length() - expected).abs() <= expected * 1e-9);
        let alignment = acc.normalize().dot((body - probe).normalize());
        prop_assert!(alignment > 1.0 - 1e-9, "acceleration points away: {}", alignment);
    }

    /// Central force: semi-implicit Euler keeps r × v fixed.
    #[test]
    fn prop_angular_momentum_conserved(
        r in 1.0f64..100.0,
        gm in 1.0f64..1000.0,
    ) {
        let mut state = fixtures::circular_orbit(r, gm);
        let body = fixtures::central_body(gm);
        let initial = assertions::angular_momentum(state);
        let dt = assertions::orbital_period(r, gm) / 2000.0;

        for _ in 0..2000 {
            let acc = compute_acceleration(state.pos, &[body], 1.0);
            semi_implicit_euler(&mut state.pos, &mut state.vel, acc, dt).unwrap();
        }

        let drift = (assertions::angular_momentum(state) - initial).length() / initial.length();
        prop_assert!(drift < 1e-9, "angular momentum drift {:e}", drift);
    }

    /// Energy error of the symplectic step stays bounded over one orbit.
    #[test]
    fn prop_energy_bounded_one_orbit(
        r in 1.0f64..100.0,
        gm in 1.0f64..1000.0,
    ) {
        let mut state = fixtures::circular_orbit(r, gm);
        let body = fixtures::central_body(gm);
        let initial = assertions::orbital_energy(state, gm);
        let dt = assertions::orbital_period(r, gm) / 2000.0;

        for _ in 0..2000 {
            let acc = compute_acceleration(state.pos, &[body], 1.0);
            semi_implicit_euler(&mut state.pos, &mut state.vel, acc, dt).unwrap();
        }

        assertions::assert_energy_conserved(initial, assertions::orbital_energy(state, gm), 0.02);
    }

    /// Trails never exceed their capacity.
    #[test]
    fn prop_trail_capacity(capacity in 0usize..150, pushes in 0usize..400) {
        let mut trail = Trail::new(DVec3::ZERO, capacity);
        for i in 0..pushes {
            trail.push(DVec3::splat(i as f64));
            prop_assert!(trail.len() <= capacity.max(2));
        }
        prop_assert!(trail.is_drawable());
    }

    /// The pool never holds more than its capacity and keeps the newest probes.
    #[test]
    fn prop_pool_keeps_newest(launches in 1usize..200) {
        let mut pool = ProbePool::new(ProbeConfig::default(), 1.0);
        let mut ids = Vec::new();
        for _ in 0..launches {
            ids.push(pool.launch(DVec3::ZERO, DVec3::X, 1.0, 1.0).unwrap().id);
            prop_assert!(pool.len() <= 50);
        }

        let kept: Vec<_> = pool.iter().map(|p| p.id).collect();
        let newest = &ids[ids.len().saturating_sub(50)..];
        prop_assert_eq!(kept.as_slice(), newest);
    }

    /// Whatever the frame delta, live probes keep finite state.
    #[test]
    fn prop_live_probes_stay_finite(
        dt in prop_oneof![
            Just(f64::NAN),
            Just(f64::INFINITY),
            Just(-1.0),
            0.0f64..10.0,
        ],
        mass in prop_oneof![Just(f64::MAX), 1.0f64..1e9],
        body in vec3(50.0),
    ) {
        let mut pool = ProbePool::new(ProbeConfig::default(), 1.0);
        let mut effects = EffectManager::default();
        pool.launch(DVec3::ZERO, DVec3::Y, 5.0, 1.0).unwrap();

        let bodies = [BodySnapshot::new(body, 0.001, mass)];
        for _ in 0..5 {
            pool.step(dt, &bodies, DVec3::ZERO, &mut effects);
        }

        for probe in pool.iter() {
            prop_assert!(probe.is_alive());
            prop_assert!(probe.position.is_finite());
            prop_assert!(probe.velocity.is_finite());
            prop_assert!(probe.trail.points().all(|p| p.is_finite()));
        }
    }
}

//! Property tests for the fitting core.

use proptest::prelude::*;

use kinematics_fit::domain::{Masses, Trial};
use kinematics_fit::fit::{fit_quadratic, sample_accelerations};
use kinematics_fit::models::{expected_acceleration, relative_error};

fn close(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * (1.0 + b.abs())
}

proptest! {
    #[test]
    fn noise_free_fit_recovers_motion(
        alpha in 0.1f64..20.0,
        v0 in -2.0f64..2.0,
        d0 in -1.0f64..1.0,
        n in 3usize..30,
        dt in 0.05f64..0.5,
    ) {
        let times: Vec<f64> = (1..=n).map(|i| i as f64 * dt).collect();
        let displacements: Vec<f64> =
            times.iter().map(|t| 0.5 * alpha * t * t + v0 * t + d0).collect();

        let fit = fit_quadratic(&times, &displacements).unwrap();
        prop_assert!(close(fit.a, alpha / 2.0, 1e-6), "a={} alpha={}", fit.a, alpha);
        prop_assert!(close(fit.b, v0, 1e-5), "b={} v0={}", fit.b, v0);
        prop_assert!(close(fit.c, d0, 1e-5), "c={} d0={}", fit.c, d0);
        prop_assert_eq!(fit.acceleration(), 2.0 * fit.a);
    }

    #[test]
    fn trial_rejects_mismatched_lengths(n in 1usize..20, m in 1usize..20) {
        let times: Vec<f64> = (1..=n).map(|i| i as f64).collect();
        let displacements: Vec<f64> = (1..=m).map(|i| i as f64).collect();
        let result = Trial::new(1, Masses::Single { cart: 1.0 }, times, displacements);
        prop_assert_eq!(result.is_ok(), n == m);
        if let Ok(trial) = result {
            prop_assert_eq!(trial.times().len(), trial.displacements().len());
        }
    }

    #[test]
    fn monte_carlo_length_and_determinism(
        samples in 1usize..64,
        seed in any::<u64>(),
        sigma in 0.0f64..0.02,
    ) {
        let times: Vec<f64> = (1..=8).map(|i| 0.25 * i as f64).collect();
        let displacements: Vec<f64> = times.iter().map(|t| 0.4 * t * t).collect();

        let a = sample_accelerations(&times, &displacements, sigma, samples, seed).unwrap();
        let b = sample_accelerations(&times, &displacements, sigma, samples, seed).unwrap();
        prop_assert_eq!(a.len(), samples);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn expected_acceleration_bounded_by_gravity(
        hanging in 0.0f64..10.0,
        cart in 0.01f64..10.0,
        g in 1.0f64..20.0,
    ) {
        let e = expected_acceleration(hanging, cart, g).unwrap();
        prop_assert!(e >= 0.0);
        prop_assert!(e <= g);
    }

    #[test]
    fn relative_error_is_normalized_distance(
        expected in prop_oneof![-50.0f64..-0.01, 0.01f64..50.0],
        fitted in -50.0f64..50.0,
    ) {
        let r = relative_error(expected, fitted).unwrap();
        prop_assert!(r >= 0.0);
        prop_assert!(close(r * expected.abs(), (expected - fitted).abs(), 1e-12));
    }
}

#[test]
fn zero_sigma_reproduces_point_fit() {
    let times: Vec<f64> = (1..=6).map(|i| 0.3 * i as f64).collect();
    let displacements: Vec<f64> = times.iter().map(|t| 0.45 * t * t + 0.1 * t).collect();
    let point = fit_quadratic(&times, &displacements).unwrap().acceleration();

    let samples = sample_accelerations(&times, &displacements, 0.0, 1000, 1).unwrap();
    assert_eq!(samples.len(), 1000);
    assert!(samples.iter().all(|&a| a == point));
}

#[test]
fn relative_error_reference_value() {
    let r = relative_error(9.81, 9.0).unwrap();
    assert!((r - 0.0826).abs() < 1e-4);
}

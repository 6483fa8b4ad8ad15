use num_complex::Complex64;
use reflcalc::{
    ReflError, reflectivity, reflectivity_amplitude, reflectivity_amplitude_rough,
    reflectivity_rough,
};

const LAMBDA: f64 = 5.0;

fn constant_lambda(n: usize) -> Vec<f64> {
    vec![LAMBDA; n]
}

#[test]
fn test_substrate_total_external_reflection() {
    // Semi-infinite non-absorbing substrate: R = 1 exactly below the
    // critical edge Qc = sqrt(16 pi rho) ~ 0.01418, small above it.
    let rho = [0.0, 4e-6];
    let mu = [0.0, 0.0];
    let d = [0.0, 0.0];
    let q = [0.002, 0.005, 0.010, 0.0141, 0.02, 0.05];
    let r = reflectivity(&rho, &mu, &d, &constant_lambda(q.len()), &q).unwrap();

    for (qk, rk) in q.iter().zip(&r).take(4) {
        assert!((rk - 1.0).abs() < 1e-10, "R({qk}) = {rk}, expected 1");
    }
    assert!(r[4] < 0.05, "R(0.02) = {}", r[4]);
    assert!(r[5] < 1e-3, "R(0.05) = {}", r[5]);
}

#[test]
fn test_single_slab_kiessig_fringes() {
    // 200 A slab: fringe minima above the critical edge spaced by
    // ~2 pi / d = 0.0314 inv A.
    let rho = [0.0, 4e-6, 0.0];
    let mu = [0.0; 3];
    let d = [0.0, 200.0, 0.0];
    let q: Vec<f64> = (0..400).map(|i| 0.001 + 5e-4 * i as f64).collect();
    let r = reflectivity(&rho, &mu, &d, &constant_lambda(q.len()), &q).unwrap();

    // Strong reflection below the critical edge (finite thickness lets
    // a little intensity tunnel through, so not exactly 1).
    assert!(r[2] > 0.95, "R(0.002) = {}", r[2]);

    let minima: Vec<f64> = (1..q.len() - 1)
        .filter(|&i| q[i] > 0.04 && r[i] < r[i - 1] && r[i] < r[i + 1])
        .map(|i| q[i])
        .collect();
    assert!(minima.len() >= 4, "found {} fringe minima", minima.len());
    let expected = 2.0 * std::f64::consts::PI / 200.0;
    for pair in minima.windows(2) {
        let spacing = pair[1] - pair[0];
        assert!(
            (spacing - expected).abs() < 0.1 * expected,
            "fringe spacing {spacing}, expected ~{expected}"
        );
    }
}

#[test]
fn test_reflectivity_bounded_for_non_absorbing_stack() {
    let rho = [0.0, 2e-6, 6.5e-6, -5.6e-7, 2.07e-6];
    let mu = [0.0; 5];
    let d = [0.0, 85.0, 40.0, 220.0, 0.0];
    let q: Vec<f64> = (1..300).map(|i| 1e-3 * i as f64).collect();
    let r = reflectivity(&rho, &mu, &d, &constant_lambda(q.len()), &q).unwrap();

    assert_eq!(r.len(), q.len());
    for (qk, rk) in q.iter().zip(&r) {
        assert!((0.0..=1.0 + 1e-9).contains(rk), "R({qk}) = {rk}");
    }
}

#[test]
fn test_q_zero_pins_amplitude() {
    let rho = [0.0, 4e-6, 2.07e-6];
    let mu = [0.0; 3];
    let d = [0.0, 100.0, 0.0];
    let amp = reflectivity_amplitude(&rho, &mu, &d, &[LAMBDA], &[0.0]).unwrap();
    assert_eq!(amp[0], Complex64::new(-1.0, 0.0));
}

#[test]
fn test_negative_q_probes_reversed_stack() {
    let rho = [0.0, 3e-6, 6e-6];
    let mu = [0.0, 1e-8, 2e-8];
    let d = [0.0, 120.0, 0.0];
    let reversed_rho = [6e-6, 3e-6, 0.0];
    let reversed_mu = [2e-8, 1e-8, 0.0];
    let reversed_d = [0.0, 120.0, 0.0];

    let q = [0.02, 0.05, 0.11];
    let neg_q: Vec<f64> = q.iter().map(|x| -x).collect();
    let lambda = constant_lambda(q.len());

    let back = reflectivity(&rho, &mu, &d, &lambda, &neg_q).unwrap();
    let forward = reflectivity(&reversed_rho, &reversed_mu, &reversed_d, &lambda, &q).unwrap();
    for (b, f) in back.iter().zip(&forward) {
        assert!((b - f).abs() < 1e-12, "back {b} != reversed forward {f}");
    }
}

#[test]
fn test_absorption_damps_total_reflection() {
    let q = [0.005, 0.010];
    let lambda = constant_lambda(q.len());
    let clean = reflectivity(&[0.0, 4e-6], &[0.0, 0.0], &[0.0, 0.0], &lambda, &q).unwrap();
    let absorbing = reflectivity(&[0.0, 4e-6], &[0.0, 1e-6], &[0.0, 0.0], &lambda, &q).unwrap();
    for (c, a) in clean.iter().zip(&absorbing) {
        assert!((c - 1.0).abs() < 1e-10);
        assert!(*a < *c, "absorbing R {a} not below clean R {c}");
    }
}

#[test]
fn test_zero_roughness_matches_plain_exactly() {
    let rho = [0.0, 2e-6, 6.5e-6, 2.07e-6];
    let mu = [0.0, 0.0, 1e-8, 0.0];
    let d = [0.0, 85.0, 40.0, 0.0];
    let sigma = [0.0; 3];
    let q: Vec<f64> = (1..100).map(|i| 2e-3 * i as f64).collect();
    let lambda = constant_lambda(q.len());

    let plain = reflectivity_amplitude(&rho, &mu, &d, &lambda, &q).unwrap();
    let rough = reflectivity_amplitude_rough(&rho, &mu, &d, &sigma, &lambda, &q).unwrap();
    assert_eq!(plain, rough);
}

#[test]
fn test_roughness_attenuates_above_critical_edge() {
    let rho = [0.0, 4e-6];
    let mu = [0.0, 0.0];
    let d = [0.0, 0.0];
    let q: Vec<f64> = (0..50).map(|i| 0.02 + 5e-3 * i as f64).collect();
    let lambda = constant_lambda(q.len());

    let smooth = reflectivity(&rho, &mu, &d, &lambda, &q).unwrap();
    let rough = reflectivity_rough(&rho, &mu, &d, &[5.0], &lambda, &q).unwrap();
    for (i, (s, r)) in smooth.iter().zip(&rough).enumerate() {
        assert!(r <= &(s + 1e-12), "rough > smooth at q={}: {r} vs {s}", q[i]);
    }
    // And strictly below well above the edge.
    assert!(rough[20] < 0.5 * smooth[20]);
}

#[test]
fn test_sigma_accepts_per_layer_or_per_interface() {
    let rho = [0.0, 4e-6, 2.07e-6];
    let mu = [0.0; 3];
    let d = [0.0, 100.0, 0.0];
    let q = [0.03, 0.08];
    let lambda = constant_lambda(q.len());

    let per_interface =
        reflectivity_rough(&rho, &mu, &d, &[3.0, 4.0], &lambda, &q).unwrap();
    let per_layer =
        reflectivity_rough(&rho, &mu, &d, &[3.0, 4.0, 99.0], &lambda, &q).unwrap();
    assert_eq!(per_interface, per_layer);
}

#[test]
fn test_uniform_medium_reflects_nothing() {
    let r = reflectivity(&[4e-6], &[0.0], &[0.0], &[LAMBDA], &[0.05]).unwrap();
    assert_eq!(r, vec![0.0]);
}

#[test]
fn test_empty_q_gives_empty_output() {
    let r = reflectivity(&[0.0, 4e-6], &[0.0, 0.0], &[0.0, 0.0], &[], &[]).unwrap();
    assert!(r.is_empty());
}

#[test]
fn test_shape_mismatch_detected() {
    let err = reflectivity(&[0.0, 4e-6], &[0.0], &[0.0, 0.0], &[LAMBDA], &[0.05]).unwrap_err();
    assert!(matches!(err, ReflError::ShapeMismatch { name: "mu", .. }));

    let err =
        reflectivity(&[0.0, 4e-6], &[0.0, 0.0], &[0.0, 0.0], &[LAMBDA], &[0.05, 0.06]).unwrap_err();
    assert!(matches!(err, ReflError::ShapeMismatch { name: "lambda", .. }));
}

#[test]
fn test_invalid_physical_input_detected() {
    let err =
        reflectivity(&[0.0, 4e-6], &[0.0, 0.0], &[0.0, -5.0], &[LAMBDA], &[0.05]).unwrap_err();
    assert!(matches!(err, ReflError::InvalidInput { name: "d", .. }));

    let err = reflectivity(
        &[0.0, f64::NAN],
        &[0.0, 0.0],
        &[0.0, 0.0],
        &[LAMBDA],
        &[0.05],
    )
    .unwrap_err();
    assert!(matches!(err, ReflError::InvalidInput { name: "rho", .. }));

    let err = reflectivity_rough(
        &[0.0, 4e-6],
        &[0.0, 0.0],
        &[0.0, 0.0],
        &[-1.0],
        &[LAMBDA],
        &[0.05],
    )
    .unwrap_err();
    assert!(matches!(err, ReflError::InvalidInput { name: "sigma", .. }));
}

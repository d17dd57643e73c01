use ndarray::{ArrayD, IxDyn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use volume_similarity::*;

fn random_volume(shape: &[usize], seed: u64) -> ArrayD<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let n: usize = shape.iter().product();
    let values = (0..n).map(|_| rng.gen_range(0.0..1.0)).collect();
    ArrayD::from_shape_vec(IxDyn(shape), values).unwrap()
}

/// Smooth blob plus noise, closer to an anatomical image than white noise.
fn phantom(shape: &[usize], seed: u64, noise: f64) -> ArrayD<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let centre: Vec<f64> = shape.iter().map(|&n| (n as f64 - 1.0) / 2.0).collect();
    ArrayD::from_shape_fn(IxDyn(shape), |idx| {
        let r2: f64 = (0..shape.len())
            .map(|axis| {
                let d = (idx[axis] as f64 - centre[axis]) / shape[axis] as f64;
                d * d
            })
            .sum();
        (-r2 * 8.0).exp() * 0.8 + rng.gen_range(0.0..noise)
    })
}

fn metrics_of(a: &ArrayD<f64>, b: &ArrayD<f64>) -> SimilarityMetrics {
    compute_metrics(a, b, &MetricsConfig::default()).unwrap()
}

#[test]
fn test_identical_inputs_are_optimal() {
    let a = phantom(&[12, 14, 10], 3, 0.1);
    let metrics = metrics_of(&a, &a);

    assert!((metrics.cc - 1.0).abs() < 1e-9);
    assert!((metrics.ncc - 1.0).abs() < 1e-9);
    assert!((metrics.ssim - 1.0).abs() < 1e-9);
    assert_eq!(metrics.mse, 0.0);
    assert!((metrics.nmi - 1.0).abs() < 1e-6);
}

#[test]
fn test_positive_scaling_keeps_correlation() {
    let a = phantom(&[10, 10, 10], 5, 0.05);
    let b = a.mapv(|v| v * 2.5);
    let metrics = metrics_of(&a, &b);

    assert!((metrics.cc - 1.0).abs() < 1e-9);
    assert!((metrics.ncc - 1.0).abs() < 1e-9);
    assert!(metrics.mse > 0.0);
    // Equal-width bins over each volume's own range give identical labels.
    assert!((metrics.nmi - 1.0).abs() < 1e-6);
}

#[test]
fn test_cc_and_ncc_agree() {
    for seed in 0..5 {
        let a = phantom(&[9, 9, 9], seed, 0.3);
        let b = phantom(&[9, 9, 9], seed + 100, 0.3);
        let metrics = metrics_of(&a, &b);
        assert!(
            (metrics.cc - metrics.ncc).abs() < 1e-9,
            "seed {}: cc={} ncc={}",
            seed,
            metrics.cc,
            metrics.ncc
        );
    }
}

#[test]
fn test_all_ones_mask_changes_nothing() {
    let a = phantom(&[8, 8, 8], 11, 0.2);
    let b = phantom(&[8, 8, 8], 12, 0.2);
    let ones = ArrayD::from_elem(IxDyn(&[8, 8, 8]), 1.0);

    let unmasked = MaskedPair::new(a.clone(), b.clone(), None).unwrap();
    let masked = MaskedPair::new(a, b, Some(&ones)).unwrap();
    assert!(masked.masked);

    let config = MetricsConfig::default();
    let expected = compute_metrics(&unmasked.fixed, &unmasked.moving, &config).unwrap();
    let actual = compute_metrics(&masked.fixed, &masked.moving, &config).unwrap();
    assert_eq!(expected, actual);
}

#[test]
fn test_all_zero_mask_does_not_fail() {
    let a = phantom(&[6, 6, 6], 21, 0.2);
    let b = phantom(&[6, 6, 6], 22, 0.2);
    let zeros = ArrayD::zeros(IxDyn(&[6, 6, 6]));

    let pair = MaskedPair::new(a, b, Some(&zeros)).unwrap();
    let metrics = compute_metrics(&pair.fixed, &pair.moving, &MetricsConfig::default()).unwrap();

    assert!(metrics.cc.is_nan());
    assert!(metrics.ncc.is_nan());
    assert_eq!(metrics.mse, 0.0);

    let record = MetricRecord::new(
        std::path::Path::new("ses2.nii.gz"),
        "T2w",
        "SCT_rigid",
        &metrics,
        pair.masked,
    );
    let csv = to_csv_string(&record, HeaderStyle::Short).unwrap();
    let row: Vec<&str> = csv.lines().nth(1).unwrap().split(',').collect();
    assert_eq!(row[3], "NaN");
    assert_eq!(row[8], "True");
}

#[test]
fn test_nmi_stays_in_unit_interval() {
    for seed in 0..4 {
        let a = random_volume(&[10, 10, 10], seed);
        let b = random_volume(&[10, 10, 10], seed + 50);
        let related = phantom(&[10, 10, 10], seed, 0.4);
        let noisy = related.mapv(|v| v + 0.1) + &a * 0.2;

        for (x, y) in [(&a, &b), (&related, &noisy)] {
            let nmi = metrics_of(x, y).nmi;
            assert!(nmi > -1e-6 && nmi < 1.0 + 1e-6, "seed {}: nmi={}", seed, nmi);
        }
    }
}

#[test]
fn test_related_volumes_score_higher_than_unrelated() {
    let a = phantom(&[12, 12, 12], 1, 0.05);
    let related = phantom(&[12, 12, 12], 2, 0.05);
    let unrelated = random_volume(&[12, 12, 12], 3);

    let good = metrics_of(&a, &related);
    let bad = metrics_of(&a, &unrelated);
    assert!(good.cc > bad.cc);
    assert!(good.ssim > bad.ssim);
    assert!(good.nmi > bad.nmi);
    assert!(good.mse < bad.mse);
}

#[test]
fn test_shape_mismatch_is_reported() {
    let a = random_volume(&[6, 6, 6], 1);
    let b = random_volume(&[6, 6, 5], 2);

    let err = MaskedPair::new(a, b, None).unwrap_err();
    match err.downcast_ref::<SimilarityError>() {
        Some(SimilarityError::ShapeMismatch {
            expected, found, ..
        }) => {
            assert_eq!(expected, &vec![6, 6, 6]);
            assert_eq!(found, &vec![6, 6, 5]);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

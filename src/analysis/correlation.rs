//! Linear correlation and squared-error statistics over flattened volumes.

/// Pearson correlation coefficient of paired samples.
///
/// Deviations are scaled by their largest magnitude before normalisation,
/// which keeps very large intensities from overflowing. Returns NaN when
/// either input is constant.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 || is_constant(x) || is_constant(y) {
        return f64::NAN;
    }

    let xm = scaled_deviations(x);
    let ym = scaled_deviations(y);
    let norm_x = norm(&xm);
    let norm_y = norm(&ym);

    let r: f64 = xm
        .iter()
        .zip(&ym)
        .map(|(a, b)| (a / norm_x) * (b / norm_y))
        .sum();
    r.clamp(-1.0, 1.0)
}

/// Off-diagonal entry of the 2x2 sample correlation matrix of `x` and `y`.
///
/// Same quantity as [`pearson_correlation`], computed from the covariance
/// matrix (ddof = 1) instead. NaN when either input is constant.
pub fn correlation_matrix_ncc(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return f64::NAN;
    }

    let n = x.len() as f64;
    let mean_x = mean(x);
    let mean_y = mean(y);

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    let cov_xy = sxy / (n - 1.0);
    let std_x = (sxx / (n - 1.0)).sqrt();
    let std_y = (syy / (n - 1.0)).sqrt();

    (cov_xy / std_x / std_y).clamp(-1.0, 1.0)
}

/// Mean of squared per-voxel differences.
pub fn mean_squared_error(x: &[f64], y: &[f64]) -> f64 {
    if x.is_empty() {
        return f64::NAN;
    }
    let sum: f64 = x.iter().zip(y).map(|(a, b)| (a - b) * (a - b)).sum();
    sum / x.len() as f64
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|&v| v == values[0])
}

fn scaled_deviations(values: &[f64]) -> Vec<f64> {
    let m = mean(values);
    let mut deviations: Vec<f64> = values.iter().map(|v| v - m).collect();
    let max_abs = deviations.iter().fold(0.0f64, |acc, d| acc.max(d.abs()));
    if max_abs > 0.0 {
        deviations.iter_mut().for_each(|d| *d /= max_abs);
    }
    deviations
}

fn norm(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}

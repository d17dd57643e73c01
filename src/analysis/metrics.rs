use super::correlation::{correlation_matrix_ncc, mean_squared_error, pearson_correlation};
use super::mutual_information::entropy_terms;
use super::ssim::structural_similarity;
use crate::config::MetricsConfig;
use crate::error::{ensure_same_shape, SimilarityError};
use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// The five similarity statistics of a volume pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityMetrics {
    /// Pearson cross-correlation, optimum 1
    pub cc: f64,
    /// Mean structural similarity, optimum 1
    pub ssim: f64,
    /// Mean squared error, optimum 0
    pub mse: f64,
    /// Normalized cross-correlation from the correlation matrix, optimum 1
    pub ncc: f64,
    /// Normalized mutual information, optimum 1
    pub nmi: f64,
}

impl SimilarityMetrics {
    /// Names of the metrics that came out NaN or infinite.
    pub fn non_finite(&self) -> Vec<&'static str> {
        [
            ("CC", self.cc),
            ("SSIM", self.ssim),
            ("MSE", self.mse),
            ("NCC", self.ncc),
            ("NMI", self.nmi),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_finite())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Compute all metrics over the same voxel population of both volumes.
///
/// Degenerate inputs (constant volumes, an all-zero mask) do not fail: the
/// affected metrics come back as NaN or infinity and a warning is logged.
/// An invalid `config` is rejected before any work is done.
pub fn compute_metrics(
    fixed: &ArrayD<f64>,
    moving: &ArrayD<f64>,
    config: &MetricsConfig,
) -> crate::Result<SimilarityMetrics> {
    config.validate().map_err(SimilarityError::InvalidConfig)?;
    ensure_same_shape("registered volume", fixed.shape(), moving.shape())?;
    if fixed.len() < 2 {
        return Err(SimilarityError::TooFewVoxels(fixed.len()).into());
    }

    let x: Vec<f64> = fixed.iter().copied().collect();
    let y: Vec<f64> = moving.iter().copied().collect();

    let cc = pearson_correlation(&x, &y);
    let ssim = structural_similarity(fixed, moving, &config.ssim)?;
    let mse = mean_squared_error(&x, &y);
    let ncc = correlation_matrix_ncc(&x, &y);

    let entropies = entropy_terms(&x, &y, &config.nmi);
    debug!(
        h_fixed = entropies.fixed,
        h_moving = entropies.moving,
        h_joint = entropies.joint,
        "Entropy terms"
    );
    let nmi = entropies.normalized();

    let metrics = SimilarityMetrics {
        cc,
        ssim,
        mse,
        ncc,
        nmi,
    };

    let undefined = metrics.non_finite();
    if !undefined.is_empty() {
        warn!(
            metrics = ?undefined,
            "Degenerate input: some metrics are undefined (constant volume or empty mask)"
        );
    }

    Ok(metrics)
}

use crate::error::ensure_same_shape;
use ndarray::{ArrayD, Zip};
use tracing::{debug, warn};

/// Voxel counts of a mask, used for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskSummary {
    pub inside: usize,
    pub total: usize,
    /// True when every value is exactly 0 or 1.
    pub binary: bool,
}

impl MaskSummary {
    pub fn of(mask: &ArrayD<f64>) -> Self {
        let inside = mask.iter().filter(|&&v| v != 0.0).count();
        let binary = mask.iter().all(|&v| v == 0.0 || v == 1.0);
        Self {
            inside,
            total: mask.len(),
            binary,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inside == 0
    }
}

/// Multiply an image by a mask of identical shape.
///
/// Mask values act as weights; non-binary masks are not thresholded.
pub fn apply_mask(image: &ArrayD<f64>, mask: &ArrayD<f64>) -> crate::Result<ArrayD<f64>> {
    ensure_same_shape("mask", image.shape(), mask.shape())?;
    Ok(Zip::from(image)
        .and(mask)
        .map_collect(|&value, &weight| value * weight))
}

/// The fixed/moving pair after the optional masking stage.
#[derive(Debug, Clone)]
pub struct MaskedPair {
    pub fixed: ArrayD<f64>,
    pub moving: ArrayD<f64>,
    pub masked: bool,
}

impl MaskedPair {
    /// Validate shapes and apply the same mask to both volumes.
    pub fn new(
        fixed: ArrayD<f64>,
        moving: ArrayD<f64>,
        mask: Option<&ArrayD<f64>>,
    ) -> crate::Result<Self> {
        ensure_same_shape("registered volume", fixed.shape(), moving.shape())?;

        let Some(mask) = mask else {
            return Ok(Self {
                fixed,
                moving,
                masked: false,
            });
        };

        let summary = MaskSummary::of(mask);
        debug!(
            inside = summary.inside,
            total = summary.total,
            binary = summary.binary,
            "Applying mask"
        );
        if summary.is_empty() {
            warn!("Mask contains no nonzero voxels; correlation metrics will be undefined");
        } else if !summary.binary {
            warn!("Mask is not binary; its values are used as voxel weights");
        }

        Ok(Self {
            fixed: apply_mask(&fixed, mask)?,
            moving: apply_mask(&moving, mask)?,
            masked: true,
        })
    }
}

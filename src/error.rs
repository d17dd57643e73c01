use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the volume loading, masking and metric stages.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimilarityError {
    #[error("shape mismatch for {what}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        what: String,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("at least 2 voxels are required to compare volumes, got {0}")]
    TooFewVoxels(usize),

    #[error("volume extent {extent} is smaller than the minimum SSIM window of {minimum}")]
    VolumeTooSmall { extent: usize, minimum: usize },

    #[error("invalid configuration: {}", .0.join("; "))]
    InvalidConfig(Vec<String>),

    #[error("failed to read NIfTI volume {path:?}: {message}")]
    Nifti { path: PathBuf, message: String },
}

pub(crate) fn ensure_same_shape(
    what: &str,
    expected: &[usize],
    found: &[usize],
) -> Result<(), SimilarityError> {
    if expected != found {
        return Err(SimilarityError::ShapeMismatch {
            what: what.to_string(),
            expected: expected.to_vec(),
            found: found.to_vec(),
        });
    }
    Ok(())
}

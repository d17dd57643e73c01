//! NIfTI volume loading
//!
//! Reads single-file NIfTI-1/2 volumes (`.nii`, `.nii.gz`) into f64 arrays.
//! Gzip compression is detected from the content, not the file name.

use super::Volume;
use crate::error::SimilarityError;
use anyhow::Context;
use flate2::read::GzDecoder;
use ndarray::{ArrayD, IxDyn};
use nifti::{InMemNiftiObject, IntoNdArray, NiftiObject};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// Check if bytes are gzip compressed
pub(crate) fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() >= 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

/// Load a NIfTI volume from disk at native resolution.
///
/// Intensities are scaled by `scl_slope`/`scl_inter` and converted to f64.
/// The file handle is released before any conversion work starts.
pub fn load_volume<P: AsRef<Path>>(path: P) -> crate::Result<Volume> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "Volume file does not exist: {}",
            path.display()
        ));
    }

    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read volume file {}", path.display()))?;

    let volume = parse_volume(&bytes).map_err(|message| SimilarityError::Nifti {
        path: path.to_path_buf(),
        message,
    })?;

    debug!(
        path = %path.display(),
        shape = ?volume.shape(),
        voxel_size = ?volume.voxel_size,
        "Loaded volume"
    );
    Ok(volume)
}

/// Decode an in-memory NIfTI file.
pub fn parse_volume(bytes: &[u8]) -> Result<Volume, String> {
    let obj: InMemNiftiObject = if is_gzip(bytes) {
        InMemNiftiObject::from_reader(GzDecoder::new(Cursor::new(bytes)))
            .map_err(|e| format!("not a readable gzipped NIfTI file: {}", e))?
    } else {
        InMemNiftiObject::from_reader(Cursor::new(bytes))
            .map_err(|e| format!("not a readable NIfTI file: {}", e))?
    };

    let header = obj.header();
    let ndim = header.dim[0] as usize;
    if ndim == 0 || ndim > 7 {
        return Err(format!("invalid dimensionality dim[0]={}", ndim));
    }
    let voxel_size: Vec<f64> = header.pixdim[1..=ndim]
        .iter()
        .map(|&p| p as f64)
        .collect();

    let array = obj
        .into_volume()
        .into_ndarray::<f64>()
        .map_err(|e| format!("failed to convert voxel data: {}", e))?;

    // Rebuild in this crate's ndarray so the reader's array type never leaks.
    let shape = array.shape().to_vec();
    let values: Vec<f64> = array.iter().copied().collect();
    let data = ArrayD::from_shape_vec(IxDyn(&shape), values)
        .map_err(|e| format!("voxel data does not match shape {:?}: {}", shape, e))?;

    let voxel_size = if voxel_size.len() == data.ndim() {
        voxel_size
    } else {
        vec![1.0; data.ndim()]
    };

    Ok(Volume::new(data).with_voxel_size(voxel_size))
}

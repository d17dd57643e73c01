//! NIfTI-1 volume writing
//!
//! Produces single-file `n+1` volumes with FLOAT32 voxels. Used to build
//! fixtures for the comparison pipeline.

use super::Volume;
use anyhow::Context;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::path::Path;

const HEADER_SIZE: usize = 348;
const VOX_OFFSET: usize = 352;
const DT_FLOAT32: i16 = 16;

/// Encode a volume as uncompressed NIfTI-1 bytes.
pub fn encode_volume(volume: &Volume) -> crate::Result<Vec<u8>> {
    let ndim = volume.ndim();
    if ndim == 0 || ndim > 7 {
        return Err(anyhow::anyhow!(
            "NIfTI-1 supports 1 to 7 dimensions, got {}",
            ndim
        ));
    }

    let mut header = [0u8; HEADER_SIZE];
    header[0..4].copy_from_slice(&(HEADER_SIZE as i32).to_le_bytes());

    let mut dim = [1i16; 8];
    dim[0] = ndim as i16;
    for (axis, &extent) in volume.shape().iter().enumerate() {
        dim[axis + 1] = i16::try_from(extent)
            .map_err(|_| anyhow::anyhow!("extent {} exceeds the NIfTI-1 limit", extent))?;
    }
    for (i, d) in dim.iter().enumerate() {
        let offset = 40 + i * 2;
        header[offset..offset + 2].copy_from_slice(&d.to_le_bytes());
    }

    header[70..72].copy_from_slice(&DT_FLOAT32.to_le_bytes());
    header[72..74].copy_from_slice(&32i16.to_le_bytes());

    let mut pixdim = [1.0f32; 8];
    for (axis, &size) in volume.voxel_size.iter().take(7).enumerate() {
        pixdim[axis + 1] = size as f32;
    }
    for (i, p) in pixdim.iter().enumerate() {
        let offset = 76 + i * 4;
        header[offset..offset + 4].copy_from_slice(&p.to_le_bytes());
    }

    header[108..112].copy_from_slice(&(VOX_OFFSET as f32).to_le_bytes());
    // scl_slope = 1, scl_inter = 0
    header[112..116].copy_from_slice(&1.0f32.to_le_bytes());
    header[116..120].copy_from_slice(&0.0f32.to_le_bytes());
    header[344..348].copy_from_slice(b"n+1\0");

    let mut buffer = Vec::with_capacity(VOX_OFFSET + volume.len() * 4);
    buffer.extend_from_slice(&header);
    buffer.extend_from_slice(&[0u8; VOX_OFFSET - HEADER_SIZE]);

    // NIfTI stores the first axis fastest; the transposed view iterates that way.
    for &value in volume.data.t().iter() {
        buffer.extend_from_slice(&(value as f32).to_le_bytes());
    }

    Ok(buffer)
}

/// Write a volume to disk, gzip-compressed when the path ends in `.nii.gz`.
pub fn save_volume<P: AsRef<Path>>(path: P, volume: &Volume) -> crate::Result<()> {
    let path = path.as_ref();
    let raw = encode_volume(volume)?;

    let bytes = if path.to_string_lossy().ends_with(".nii.gz") {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&raw)?;
        encoder.finish()?
    } else {
        raw
    };

    std::fs::write(path, bytes)
        .with_context(|| format!("Failed to write volume file {}", path.display()))
}

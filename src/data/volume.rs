use ndarray::{ArrayD, IxDyn};

/// A scalar volume held in memory as f64 intensities.
///
/// Axis order follows the NIfTI `dim` field, so a 3D scan has shape
/// `[nx, ny, nz]`. Voxel sizes are carried along for logging only; no metric
/// depends on them.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    pub data: ArrayD<f64>,
    pub voxel_size: Vec<f64>,
}

impl Volume {
    /// Wrap an array with unit voxel spacing.
    pub fn new(data: ArrayD<f64>) -> Self {
        let voxel_size = vec![1.0; data.ndim()];
        Self { data, voxel_size }
    }

    pub fn from_shape_vec(shape: &[usize], values: Vec<f64>) -> crate::Result<Self> {
        let data = ArrayD::from_shape_vec(IxDyn(shape), values)?;
        Ok(Self::new(data))
    }

    pub fn with_voxel_size(mut self, voxel_size: Vec<f64>) -> Self {
        self.voxel_size = voxel_size;
        self
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_data(self) -> ArrayD<f64> {
        self.data
    }
}

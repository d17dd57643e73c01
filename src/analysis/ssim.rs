//! N-dimensional structural similarity
//!
//! Mean SSIM over a uniform (box) window applied separably along every axis.
//! Borders are mirrored with the edge sample repeated (`d c b a | a b c d`),
//! variances use the sample normalisation `NP / (NP - 1)`, and the mean is
//! taken after cropping half a window from each side of each axis.

use crate::config::SsimConfig;
use crate::error::{ensure_same_shape, SimilarityError};
use ndarray::{ArrayD, Axis, Slice, Zip};
use tracing::warn;

/// Smallest window that still gives a sample covariance.
pub const MIN_WINDOW: usize = 3;

pub fn structural_similarity(
    a: &ArrayD<f64>,
    b: &ArrayD<f64>,
    config: &SsimConfig,
) -> crate::Result<f64> {
    ensure_same_shape("SSIM input", a.shape(), b.shape())?;
    let window = effective_window(a.shape(), config.window_size)?;

    let np = (window as f64).powi(a.ndim() as i32);
    let cov_norm = np / (np - 1.0);
    let c1 = (config.k1 * config.data_range).powi(2);
    let c2 = (config.k2 * config.data_range).powi(2);

    let ux = uniform_filter(a, window);
    let uy = uniform_filter(b, window);
    let uxx = uniform_filter(&(a * a), window);
    let uyy = uniform_filter(&(b * b), window);
    let uxy = uniform_filter(&(a * b), window);

    let mut ssim_map = ArrayD::<f64>::zeros(a.raw_dim());
    Zip::from(&mut ssim_map)
        .and(&ux)
        .and(&uy)
        .and(&uxx)
        .and(&uyy)
        .and(&uxy)
        .for_each(|s, &mx, &my, &mxx, &myy, &mxy| {
            let vx = cov_norm * (mxx - mx * mx);
            let vy = cov_norm * (myy - my * my);
            let vxy = cov_norm * (mxy - mx * my);

            let a1 = 2.0 * mx * my + c1;
            let a2 = 2.0 * vxy + c2;
            let b1 = mx * mx + my * my + c1;
            let b2 = vx + vy + c2;
            *s = (a1 * a2) / (b1 * b2);
        });

    let pad = (window - 1) / 2;
    let mut cropped = ssim_map.view();
    for axis in 0..cropped.ndim() {
        let len = cropped.len_of(Axis(axis));
        cropped.slice_axis_inplace(Axis(axis), Slice::from(pad..len - pad));
    }

    Ok(cropped.mean().unwrap_or(f64::NAN))
}

/// Window side actually used for a volume of the given shape.
///
/// The requested side must be odd and at least [`MIN_WINDOW`]. Volumes
/// thinner than the requested window fall back to the largest odd window
/// that fits.
pub fn effective_window(shape: &[usize], requested: usize) -> Result<usize, SimilarityError> {
    if requested < MIN_WINDOW || requested % 2 == 0 {
        return Err(SimilarityError::InvalidConfig(vec![format!(
            "SSIM window_size must be odd and at least {}, got {}",
            MIN_WINDOW, requested
        )]));
    }

    let min_extent = shape.iter().copied().min().unwrap_or(0);
    if min_extent >= requested {
        return Ok(requested);
    }
    if min_extent < MIN_WINDOW {
        return Err(SimilarityError::VolumeTooSmall {
            extent: min_extent,
            minimum: MIN_WINDOW,
        });
    }

    let fitted = if min_extent % 2 == 0 { min_extent - 1 } else { min_extent };
    warn!(
        requested,
        fitted,
        shape = ?shape,
        "SSIM window exceeds the volume extent; using a smaller window"
    );
    Ok(fitted)
}

/// Moving average of side `size` along every axis, mirrored at the borders.
pub fn uniform_filter(input: &ArrayD<f64>, size: usize) -> ArrayD<f64> {
    let mut output = input.to_owned();
    let radius = (size / 2) as isize;
    let mut line = Vec::new();

    for axis in 0..output.ndim() {
        for mut lane in output.lanes_mut(Axis(axis)) {
            line.clear();
            line.extend(lane.iter().copied());
            let n = line.len() as isize;

            for (i, value) in lane.iter_mut().enumerate() {
                let centre = i as isize;
                let sum: f64 = (-radius..=radius)
                    .map(|offset| line[reflect_index(centre + offset, n)])
                    .sum();
                *value = sum / size as f64;
            }
        }
    }

    output
}

fn reflect_index(index: isize, len: isize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * len;
    let wrapped = index.rem_euclid(period);
    if wrapped >= len {
        (period - 1 - wrapped) as usize
    } else {
        wrapped as usize
    }
}

//! Kernel DFT builder (C6).
//!
//! Grounded on `gaussian_window`, `get_gaussian` and `prepare_kernel_DFT`
//! in `original_source/src/gaussianblur.cpp`: size the odd Gaussian
//! window from `sigma`, zero-pad it to an efficient transform length,
//! rotate the window's center to index 0 so the forward transform is
//! real-valued, and take the forward FFT once per axis (reusing the
//! column spectrum for the row axis when the image is square).

use crate::error::BlurResult;
use crate::fft::{RealFftFacade, RealFftPlan};
use crate::image::ImageGeometry;
use crate::sizing::nearest_valid;
use std::f32::consts::PI;

/// Padding applied to both axes before each FFT, equal to `(window-1)/2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailingZeros {
    pub row: usize,
    pub col: usize,
}

/// Forward real spectra of the 1-D Gaussian kernel for both axes, plus
/// the plans used to convolve lines of each axis's length.
pub struct KernelSpectrum {
    pub kerf_row: Vec<f32>,
    pub kerf_col: Vec<f32>,
    pub row_plan: RealFftPlan,
    pub col_plan: RealFftPlan,
    pub pad: usize,
    pub trailing_zeros: TrailingZeros,
    pub fft_row: usize,
    pub fft_col: usize,
}

/// Returns the odd kernel width needed for `sigma`, clamped to
/// `max_width` (0 meaning unclamped).
pub fn gaussian_window(sigma: f32, max_width: usize) -> usize {
    let radius = (sigma * (2.0 * 255f32.ln()).sqrt() - 1.0).max(0.0);
    let mut width = (radius * 2.0 + 0.5) as usize;
    if max_width != 0 {
        width = width.min(max_width);
    }
    if width % 2 == 0 {
        width += 1;
    }
    width
}

/// Builds the zero-padded, centered 1-D Gaussian of length `fft_len`
/// (or `width` if `fft_len == 0`), normalized to sum to 1.
fn get_gaussian(sigma: f32, width: usize, fft_len: usize) -> Vec<f32> {
    let len = if fft_len != 0 { fft_len } else { width };
    let mut kernel = vec![0.0f32; len];

    let mid = (width - 1) as f32 / 2.0;
    let s = 2.0 * sigma * sigma;
    for i in 0..width {
        let y = i as f32 - mid;
        kernel[i] = (-(y * y) / s).exp() / (PI * s);
    }
    let sum: f32 = kernel[..width].iter().sum();
    let inv_sum = 1.0 / sum;
    for v in kernel[..width].iter_mut() {
        *v *= inv_sum;
    }

    if fft_len != 0 {
        let shift = width / 2;
        if shift != 0 {
            kernel.rotate_left(shift);
        }
    }
    kernel
}

fn forward_spectrum(facade: &mut RealFftFacade, sigma: f32, width: usize, len: usize) -> BlurResult<(Vec<f32>, RealFftPlan)> {
    let plan = facade.plan(len)?;
    let mut window = get_gaussian(sigma, width, len);
    let mut spectrum = plan.make_spectrum();
    let mut out = vec![0.0f32; len];
    plan.forward_ordered(&mut window, &mut out, &mut spectrum)?;
    Ok((out, plan))
}

/// Builds the [`KernelSpectrum`] for `geometry` and `sigma` per
/// `original_source`'s `prepare_kernel_DFT`.
pub fn prepare_kernel_spectrum(geometry: &ImageGeometry, sigma: f32) -> BlurResult<KernelSpectrum> {
    let mut facade = RealFftFacade::new();

    let k_size = gaussian_window(sigma, geometry.rows.max(geometry.cols));
    let pad = (k_size - 1) / 2;

    let raw_row = geometry.rows + 2 * pad;
    let raw_col = geometry.cols + 2 * pad;

    let fft_row = nearest_valid(raw_row as u32) as usize;
    let fft_col = nearest_valid(raw_col as u32) as usize;

    let trailing_zeros = TrailingZeros {
        row: fft_row - raw_row,
        col: fft_col - raw_col,
    };

    let (kerf_col, col_plan) = forward_spectrum(&mut facade, sigma, k_size, fft_col)?;

    let (kerf_row, row_plan) = if fft_row == fft_col {
        let row_plan = facade.plan(fft_row)?;
        (kerf_col.clone(), row_plan)
    } else {
        forward_spectrum(&mut facade, sigma, k_size, fft_row)?
    };

    Ok(KernelSpectrum {
        kerf_row,
        kerf_col,
        row_plan,
        col_plan,
        pad,
        trailing_zeros,
        fft_row,
        fft_col,
    })
}

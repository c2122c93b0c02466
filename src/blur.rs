//! Orchestrator (C8) and configuration surface (C12).
//!
//! Grounded on `gaussianblur()` in `original_source/src/gaussianblur.cpp`:
//! validate, deinterleave, build the kernel spectrum once, run the
//! two-pass convolver per processed channel, reinterleave.

use crate::convolve;
use crate::error::{BlurError, BlurResult};
use crate::image::{DeinterleavedPlanes, Image};
use crate::interleave;
use crate::kernel::prepare_kernel_spectrum;
use crate::parallel::TileLoop;
use tracing::{debug, debug_span};

/// Configuration for a blur call beyond the bare `(sigma, apply_to_alpha)`
/// pair, mirroring `vfx-ops`'s value-type builder conventions
/// (`Kernel::gaussian`, `Filter`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlurOptions {
    sigma: f32,
    apply_to_alpha: bool,
    parallel: bool,
}

impl BlurOptions {
    /// Starts a builder with `apply_to_alpha = false` and `parallel = true`.
    pub fn new(sigma: f32) -> Self {
        Self {
            sigma,
            apply_to_alpha: false,
            parallel: true,
        }
    }

    /// Sets whether the alpha channel is blurred alongside RGB.
    pub fn apply_to_alpha(mut self, value: bool) -> Self {
        self.apply_to_alpha = value;
        self
    }

    /// Sets whether the tile loop (C2) may use worker threads. `false`
    /// forces the sequential fallback, useful for P9 determinism checks
    /// or to bound peak memory.
    pub fn parallel(mut self, value: bool) -> Self {
        self.parallel = value;
        self
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }

    pub fn apply_to_alpha_enabled(&self) -> bool {
        self.apply_to_alpha
    }
}

/// Blurs `image` in place with a Gaussian of standard deviation `sigma`.
///
/// The first 3 channels (RGB) are always blurred; the 4th (alpha) is
/// blurred iff `image` has 4 channels and `apply_to_alpha` is set.
///
/// # Errors
///
/// Returns [`BlurError::InvalidParameter`] if `sigma <= 0` and
/// [`BlurError::UnsupportedInput`] if the channel count is outside
/// `{3, 4}` or the data buffer length does not match the geometry; in
/// both cases `image` is left byte-identical to its input.
pub fn blur(image: &mut Image, sigma: f32, apply_to_alpha: bool) -> BlurResult<()> {
    blur_with(image, &BlurOptions::new(sigma).apply_to_alpha(apply_to_alpha))
}

/// As [`blur`], but takes an explicit [`BlurOptions`] (C12).
pub fn blur_with(image: &mut Image, options: &BlurOptions) -> BlurResult<()> {
    let geometry = image.geometry;
    let span = debug_span!(
        "blur",
        rows = geometry.rows,
        cols = geometry.cols,
        channels = geometry.channels,
        sigma = options.sigma,
    );
    let _enter = span.enter();

    if options.sigma <= 0.0 {
        debug!("rejecting non-positive sigma");
        return Err(BlurError::invalid_parameter(format!(
            "sigma must be > 0, got {}",
            options.sigma
        )));
    }
    let channels = geometry.channels;
    if channels != 3 && channels != 4 {
        debug!(channels, "rejecting unsupported channel count");
        return Err(BlurError::unsupported_input(format!(
            "channels must be 3 or 4, got {channels}"
        )));
    }
    if image.data.len() != geometry.byte_len() {
        debug!("rejecting mismatched buffer length");
        return Err(BlurError::unsupported_input(format!(
            "data length {} does not match rows*cols*channels={}",
            image.data.len(),
            geometry.byte_len()
        )));
    }

    let tile_loop = if options.parallel {
        TileLoop::parallel()
    } else {
        TileLoop::sequential()
    };

    let pixel_count = geometry.pixel_count();
    let mut planes: DeinterleavedPlanes = vec![vec![0.0f32; pixel_count]; channels];
    interleave::deinterleave(&image.data, &mut planes, channels, pixel_count, &tile_loop);

    debug!("building kernel spectrum");
    let spectrum = prepare_kernel_spectrum(&geometry, options.sigma)?;

    let processed = if channels == 4 && options.apply_to_alpha { 4 } else { 3 };
    debug!(processed, "running two-pass convolution");

    let row_scaler = 1.0 / spectrum.fft_col as f32;
    let col_scaler = 1.0 / spectrum.fft_row as f32;

    for plane in planes.iter_mut().take(processed) {
        convolve::convolve_lines(
            plane,
            geometry.rows,
            geometry.cols,
            spectrum.pad,
            spectrum.trailing_zeros.col,
            &spectrum.col_plan,
            &spectrum.kerf_col,
            row_scaler,
            &tile_loop,
        );
        convolve::convolve_lines(
            plane,
            geometry.cols,
            geometry.rows,
            spectrum.pad,
            spectrum.trailing_zeros.row,
            &spectrum.row_plan,
            &spectrum.kerf_row,
            col_scaler,
            &tile_loop,
        );
    }

    interleave::interleave(&planes, &mut image.data, channels, pixel_count, &tile_loop);
    Ok(())
}

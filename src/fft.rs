//! Ordered real-FFT façade (C9), backed by the `realfft` crate.
//!
//! Grounded on `examples/champi-dev-guitarfx_rust/src/dsp/convolution.rs`,
//! which drives `realfft::RealFftPlanner<f32>` for partitioned
//! convolution the same way this module drives it for tiled 2-D
//! convolution. `realfft` returns a plain `Vec<Complex<f32>>` of length
//! `N/2+1`; [`RealFftPlan::forward_ordered`]/[`RealFftPlan::inverse_ordered`]
//! repack that into the PFFFT-style ordered layout resolved in
//! `SPEC_FULL.md` §3: `[Re(0), Re(N/2), Re(1), Im(1), …, Re(N/2-1), Im(N/2-1)]`.

use crate::error::{BlurError, BlurResult};
use num_complex::Complex32;
use realfft::{ComplexToReal, RealFftPlanner, RealToComplex};
use std::sync::Arc;

/// A forward/inverse real-FFT plan pair for one transform length.
pub struct RealFftPlan {
    len: usize,
    forward: Arc<dyn RealToComplex<f32>>,
    inverse: Arc<dyn ComplexToReal<f32>>,
}

impl RealFftPlan {
    /// The transform length this plan was built for.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Allocates a complex intermediate buffer of the size this plan's
    /// forward/inverse calls require (`len/2 + 1` bins).
    pub fn make_spectrum(&self) -> Vec<Complex32> {
        self.forward.make_output_vec()
    }

    /// Forward real FFT of `input` (length `len`), written to `output`
    /// (length `len`) in the ordered packed-real layout. `spectrum` is
    /// reusable scratch of length `len/2 + 1`, typically from
    /// [`RealFftPlan::make_spectrum`].
    pub fn forward_ordered(
        &self,
        input: &mut [f32],
        output: &mut [f32],
        spectrum: &mut [Complex32],
    ) -> BlurResult<()> {
        debug_assert_eq!(input.len(), self.len);
        debug_assert_eq!(output.len(), self.len);
        self.forward
            .process(input, spectrum)
            .map_err(|e| BlurError::internal(format!("forward FFT of length {}: {e}", self.len)))?;
        pack_ordered(spectrum, output, self.len);
        Ok(())
    }

    /// Inverse real FFT. `input` is the ordered packed-real layout
    /// (length `len`), unnormalized output of length `len` is written to
    /// `output`. `spectrum` is reusable scratch as above.
    pub fn inverse_ordered(
        &self,
        input: &[f32],
        output: &mut [f32],
        spectrum: &mut [Complex32],
    ) -> BlurResult<()> {
        debug_assert_eq!(input.len(), self.len);
        debug_assert_eq!(output.len(), self.len);
        unpack_ordered(input, spectrum, self.len);
        self.inverse
            .process(spectrum, output)
            .map_err(|e| BlurError::internal(format!("inverse FFT of length {}: {e}", self.len)))?;
        Ok(())
    }
}

fn pack_ordered(spectrum: &[Complex32], out: &mut [f32], n: usize) {
    out[0] = spectrum[0].re;
    out[1] = spectrum[n / 2].re;
    for k in 1..n / 2 {
        out[2 * k] = spectrum[k].re;
        out[2 * k + 1] = spectrum[k].im;
    }
}

fn unpack_ordered(packed: &[f32], spectrum: &mut [Complex32], n: usize) {
    spectrum[0] = Complex32::new(packed[0], 0.0);
    spectrum[n / 2] = Complex32::new(packed[1], 0.0);
    for k in 1..n / 2 {
        spectrum[k] = Complex32::new(packed[2 * k], packed[2 * k + 1]);
    }
}

/// Builds [`RealFftPlan`]s for the lengths the kernel builder and
/// convolver need. Owns the `realfft` planner's internal FFT cache so
/// repeated requests for the same length reuse the same underlying plan.
#[derive(Default)]
pub struct RealFftFacade {
    planner: RealFftPlanner<f32>,
}

impl RealFftFacade {
    /// Creates an empty facade with a fresh planner.
    pub fn new() -> Self {
        Self {
            planner: RealFftPlanner::new(),
        }
    }

    /// Builds a forward/inverse plan pair for transform length `n`.
    ///
    /// # Errors
    ///
    /// Returns [`BlurError::Resource`] if `n` is zero or odd (the real
    /// FFT requires an even length to pack Nyquist).
    pub fn plan(&mut self, n: usize) -> BlurResult<RealFftPlan> {
        if n == 0 || n % 2 != 0 {
            return Err(BlurError::resource(format!(
                "transform length {n} must be a positive even number"
            )));
        }
        Ok(RealFftPlan {
            len: n,
            forward: self.planner.plan_fft_forward(n),
            inverse: self.planner.plan_fft_inverse(n),
        })
    }
}

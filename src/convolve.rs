//! Tiled 1-D convolver (C7).
//!
//! Grounded on `process_channel_tiles`/`pffft_sorted_optimized_convolution`
//! in `original_source/src/gaussianblur.cpp`: reflect-pad each line into
//! aligned scratch, forward FFT, multiply by the real kernel spectrum
//! with the single-scaler trick, inverse FFT, strip the pad, then hand
//! the whole plane through the blocked transpose before the next axis.
//!
//! Per-line failures inside the tile loop are treated as fatal to the
//! process (spec.md §4.C2: `f` is assumed infallible over its
//! precomputed inputs) — an FFT plan built for a validated, even length
//! is not expected to fail, so a contract violation here is a bug, not a
//! recoverable condition.

use crate::alloc::AlignedBuf;
use crate::fft::RealFftPlan;
use crate::parallel::TileLoop;
use crate::transpose::transpose_blocked;

struct SendPtr<T>(*mut T);
unsafe impl<T> Send for SendPtr<T> {}
// SAFETY: each tile (line) writes only its own `[j*line_len, (j+1)*line_len)`
// slice of the result buffer; no two tiles overlap.
unsafe impl<T> Sync for SendPtr<T> {}

fn reflect(idx: isize, line_len: usize) -> usize {
    idx.clamp(0, line_len as isize - 1) as usize
}

/// Convolves every one of `line_count` contiguous lines of length
/// `line_len` in `plane` against `kerf` (an ordered packed real
/// spectrum of length `fft = kerf.len()`), then transposes the result
/// back into `plane` for the next axis.
///
/// `plane` must hold exactly `line_count * line_len` elements.
#[allow(clippy::too_many_arguments)]
pub fn convolve_lines(
    plane: &mut [f32],
    line_count: usize,
    line_len: usize,
    pad: usize,
    trailing_zeros: usize,
    plan: &RealFftPlan,
    kerf: &[f32],
    scaler: f32,
    tile_loop: &TileLoop,
) {
    debug_assert_eq!(plane.len(), line_count * line_len);
    let fft = plan.len();
    debug_assert_eq!(kerf.len(), fft);

    let mut result = vec![0.0f32; line_count * line_len];
    let result_ptr = SendPtr(result.as_mut_ptr());
    // Reborrowed as shared: read-only for the lifetime of the tile loop,
    // which completes (joining all workers) before `plane` is borrowed
    // mutably again below.
    let plane_ro: &[f32] = plane;

    tile_loop.for_each(line_count, move |j| {
        let base = j * line_len;
        let mut tile = AlignedBuf::zeroed(fft).expect("tile scratch allocation");
        let mut work = AlignedBuf::zeroed(fft).expect("work scratch allocation");
        let mut spectrum = plan.make_spectrum();

        let line = &plane_ro[base..base + line_len];

        for k in 0..pad {
            let src = pad as isize - k as isize;
            tile[k] = line[reflect(src, line_len)];
        }
        tile[pad..pad + line_len].copy_from_slice(line);
        for k in 0..pad {
            let src = line_len as isize - 2 - k as isize;
            tile[pad + line_len + k] = line[reflect(src, line_len)];
        }
        // positions [fft - trailing_zeros, fft) stay zero from AlignedBuf::zeroed.
        debug_assert!(pad + line_len + pad <= fft - trailing_zeros);

        plan.forward_ordered(&mut tile, &mut work, &mut spectrum)
            .expect("forward FFT of a validated transform length");

        for i in 0..fft / 2 {
            let m = kerf[2 * i] * scaler;
            work[2 * i] *= m;
            work[2 * i + 1] *= m;
        }

        plan.inverse_ordered(&work, &mut tile, &mut spectrum)
            .expect("inverse FFT of a validated transform length");

        // SAFETY: tiles partition `[0, line_count*line_len)` by `j`.
        unsafe {
            std::ptr::copy_nonoverlapping(
                tile[pad..pad + line_len].as_ptr(),
                result_ptr.0.add(base),
                line_len,
            );
        }
    });

    transpose_blocked(&result, plane, line_len, line_count, 1, tile_loop);
}

//! Channel deinterleave / interleave (C4).
//!
//! Grounded on `deinterleave_channels`/`interleave_channels` in
//! `original_source/include/gaussianblur/helpers.hpp`: both directions
//! are split into L2-cache-sized blocks dispatched through [`TileLoop`].
//! Deinterleaving never rounds (`u8 -> f32` is exact); interleaving adds
//! `0.5` before truncating back to `u8` and clamps to `[0, 255]` — the
//! defensive clamp the source's own comments call out as a latent gap.

use crate::transpose::L2_CACHE_SIZE;
use crate::parallel::TileLoop;

struct SendPtr<T>(*mut T);
// SAFETY: callers only write through this pointer at indices a single
// tile owns, and tiles partition `[0, total)` without overlap.
unsafe impl<T> Send for SendPtr<T> {}
unsafe impl<T> Sync for SendPtr<T> {}

fn block_size(channels: usize) -> usize {
    (L2_CACHE_SIZE / (channels * std::mem::size_of::<f32>())).max(1)
}

/// Splits an interleaved `u8` buffer of `total` pixels into `channels`
/// planar `f32` buffers, each of length `total`.
///
/// `planes` must already contain `channels` buffers of length `total`.
pub fn deinterleave(
    src: &[u8],
    planes: &mut [Vec<f32>],
    channels: usize,
    total: usize,
    tile_loop: &TileLoop,
) {
    debug_assert_eq!(src.len(), total * channels);
    debug_assert_eq!(planes.len(), channels);
    if total == 0 {
        return;
    }
    let block = block_size(channels);
    let num_blocks = total.div_ceil(block);
    let last_block = if total % block == 0 { block } else { total % block };

    let plane_ptrs: Vec<SendPtr<f32>> = planes.iter_mut().map(|p| SendPtr(p.as_mut_ptr())).collect();

    // `src` is captured by shared reference (Sync via `u8: Sync`), so
    // only the write side needs the raw-pointer/unsafe treatment.
    tile_loop.for_each(num_blocks, move |n| {
        let x = n * block;
        let len = if n == num_blocks - 1 { last_block } else { block };
        for xx in 0..len {
            let base = (x + xx) * channels;
            for c in 0..channels {
                let v = src[base + c] as f32;
                // SAFETY: x+xx < total, c < channels; disjoint across tiles.
                unsafe {
                    *plane_ptrs[c].0.add(x + xx) = v;
                }
            }
        }
    });
}

/// Merges `channels` planar `f32` buffers, each of length `total`, back
/// into an interleaved `u8` buffer.
///
/// Values are rounded to the nearest integer (round-half-up) and clamped
/// to `[0, 255]` before truncation.
pub fn interleave(
    planes: &[Vec<f32>],
    dst: &mut [u8],
    channels: usize,
    total: usize,
    tile_loop: &TileLoop,
) {
    debug_assert_eq!(dst.len(), total * channels);
    debug_assert_eq!(planes.len(), channels);
    if total == 0 {
        return;
    }
    let block = block_size(channels);
    let num_blocks = total.div_ceil(block);
    let last_block = if total % block == 0 { block } else { total % block };

    let dst_ptr = SendPtr(dst.as_mut_ptr());

    // `planes` is captured by shared reference (Sync via `Vec<f32>: Sync`),
    // so only the write side needs the raw-pointer/unsafe treatment.
    tile_loop.for_each(num_blocks, move |n| {
        let x = n * block;
        let len = if n == num_blocks - 1 { last_block } else { block };
        for xx in 0..len {
            let base = (x + xx) * channels;
            for c in 0..channels {
                let v = (planes[c][x + xx] + 0.5).clamp(0.0, 255.0);
                // SAFETY: x+xx < total, c < channels; disjoint across tiles.
                unsafe {
                    *dst_ptr.0.add(base + c) = v as u8;
                }
            }
        }
    });
}

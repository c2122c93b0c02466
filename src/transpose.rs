//! Cache-blocked 2-D transpose (C3).
//!
//! Grounded on `flip_block` in
//! `original_source/include/gaussianblur/helpers.hpp`: the array is
//! divided into square tiles sized to fit an L2 cache, each tile handed
//! to [`TileLoop`], and copied with unit-stride writes inside the tile.

use crate::parallel::TileLoop;

/// Size, in bytes, of the cache level the tile geometry targets.
pub const L2_CACHE_SIZE: usize = 16 * 1024 * 1024;

struct SendPtr<T>(*mut T);
// SAFETY: every tile dispatched by `transpose_blocked` writes a disjoint
// region of the buffer this points into, so concurrent writers never alias.
unsafe impl<T> Send for SendPtr<T> {}
unsafe impl<T> Sync for SendPtr<T> {}

/// Transposes a `channels`-channel interleaved `w`×`h` array into a
/// `channels`-channel interleaved `h`×`w` array.
///
/// `input` must hold exactly `w * h * channels` elements and `output`
/// must be sized identically. Tiling follows `flip_block`: square blocks
/// of side `floor(sqrt(L2_CACHE_SIZE / (channels * size_of::<T>())))`,
/// clamped to at least 1, with truncated blocks along the last row/column
/// of tiles.
pub fn transpose_blocked<T: Copy + Send + Sync>(
    input: &[T],
    output: &mut [T],
    w: usize,
    h: usize,
    channels: usize,
    tile_loop: &TileLoop,
) {
    debug_assert_eq!(input.len(), w * h * channels);
    debug_assert_eq!(output.len(), w * h * channels);
    if w == 0 || h == 0 || channels == 0 {
        return;
    }

    let elem_size = std::mem::size_of::<T>().max(1);
    let block = ((L2_CACHE_SIZE / (channels * elem_size)) as f64)
        .sqrt()
        .floor() as usize;
    let block = block.max(1);

    let w_blocks = w.div_ceil(block);
    let h_blocks = h.div_ceil(block);
    let last_blockx = if w % block == 0 { block } else { w % block };
    let last_blocky = if h % block == 0 { block } else { h % block };

    let out_ptr = SendPtr(output.as_mut_ptr());

    // `input` is captured by shared reference, not a raw pointer: reads
    // are never mutated concurrently, so ordinary borrowing (Sync via
    // `T: Sync`) is enough and needs no unsafe.
    tile_loop.for_each(w_blocks * h_blocks, move |n| {
        let x = n / h_blocks;
        let y = n % h_blocks;
        let blockx = if x == w_blocks - 1 { last_blockx } else { block };
        let blocky = if y == h_blocks - 1 { last_blocky } else { block };

        let mut p = block * (y * w * channels + x * channels);
        let mut q = block * (y * channels + x * h * channels);

        for _xx in 0..blockx {
            for _yy in 0..blocky {
                for k in 0..channels {
                    // SAFETY: (q+k) < w*h*channels; tiles partition the
                    // output into disjoint ranges.
                    unsafe {
                        *out_ptr.0.add(q + k) = input[p + k];
                    }
                }
                p += w * channels;
                q += channels;
            }
            p = (p as isize + channels as isize * (1 - blocky as isize * w as isize)) as usize;
            q += channels * (h - blocky);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transposes_2x2_single_channel() {
        let input = [1u8, 2, 3, 4];
        let mut output = [0u8; 4];
        transpose_blocked(&input, &mut output, 2, 2, 1, &TileLoop::sequential());
        assert_eq!(output, [1, 3, 2, 4]);
    }

    #[test]
    fn roundtrips_for_rectangular_multichannel() {
        let w = 5;
        let h = 3;
        let channels = 3;
        let input: Vec<u8> = (0..(w * h * channels) as u32).map(|v| (v % 251) as u8).collect();
        let mut flipped = vec![0u8; input.len()];
        transpose_blocked(&input, &mut flipped, w, h, channels, &TileLoop::sequential());
        let mut back = vec![0u8; input.len()];
        transpose_blocked(&flipped, &mut back, h, w, channels, &TileLoop::sequential());
        assert_eq!(back, input);
    }

    #[test]
    fn parallel_matches_sequential() {
        let w = 37;
        let h = 41;
        let channels = 4;
        let input: Vec<f32> = (0..(w * h * channels) as u32).map(|v| v as f32).collect();
        let mut seq = vec![0.0f32; input.len()];
        let mut par = vec![0.0f32; input.len()];
        transpose_blocked(&input, &mut seq, w, h, channels, &TileLoop::sequential());
        transpose_blocked(&input, &mut par, w, h, channels, &TileLoop::parallel());
        assert_eq!(seq, par);
    }
}

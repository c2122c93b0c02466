//! 64-byte-aligned scratch buffers for the FFT primitive.
//!
//! The real-FFT façade (see [`crate::fft`]) requires its input, output and
//! scratch buffers to be aligned to the SIMD width the underlying
//! transform uses internally. [`AlignedBuf`] is a thin `Vec<f32>`-like
//! owner that guarantees this alignment and propagates allocation
//! failure as [`BlurError::Resource`] instead of aborting the process.

use crate::error::{BlurError, BlurResult};
use std::alloc::{self, Layout};
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

/// Minimum alignment required by the FFT primitive, in bytes.
pub const ALIGNMENT: usize = 64;

/// A heap buffer of `f32` aligned to [`ALIGNMENT`] bytes.
///
/// Behaves like a fixed-length `Vec<f32>` (all elements zero-initialized)
/// but never reallocates, so the alignment guarantee always holds.
pub struct AlignedBuf {
    ptr: NonNull<f32>,
    len: usize,
}

// SAFETY: AlignedBuf exclusively owns its allocation; no interior mutability.
unsafe impl Send for AlignedBuf {}
unsafe impl Sync for AlignedBuf {}

impl AlignedBuf {
    /// Allocates a zero-filled buffer of `len` `f32`s, aligned to
    /// [`ALIGNMENT`] bytes.
    ///
    /// # Errors
    ///
    /// Returns [`BlurError::Resource`] if the allocation fails or `len`
    /// would overflow the layout size.
    pub fn zeroed(len: usize) -> BlurResult<Self> {
        if len == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                len: 0,
            });
        }
        let layout = Layout::array::<f32>(len)
            .map_err(|e| BlurError::resource(format!("layout overflow for {len} floats: {e}")))?
            .align_to(ALIGNMENT)
            .map_err(|e| BlurError::resource(format!("alignment failure: {e}")))?;
        // SAFETY: layout has non-zero size because len > 0.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(raw as *mut f32).ok_or_else(|| {
            BlurError::resource(format!("allocation of {} bytes failed", layout.size()))
        })?;
        Ok(Self { ptr, len })
    }

    fn layout(&self) -> Layout {
        Layout::array::<f32>(self.len)
            .expect("layout was already validated at construction")
            .align_to(ALIGNMENT)
            .expect("alignment was already validated at construction")
    }

    /// Returns the buffer length in elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the buffer has zero elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Deref for AlignedBuf {
    type Target = [f32];

    #[inline]
    fn deref(&self) -> &[f32] {
        if self.len == 0 {
            &[]
        } else {
            // SAFETY: ptr is valid for len elements, properly aligned and initialized.
            unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
        }
    }
}

impl DerefMut for AlignedBuf {
    #[inline]
    fn deref_mut(&mut self) -> &mut [f32] {
        if self.len == 0 {
            &mut []
        } else {
            // SAFETY: ptr is valid for len elements, properly aligned and initialized.
            unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
        }
    }
}

impl Drop for AlignedBuf {
    fn drop(&mut self) {
        if self.len != 0 {
            // SAFETY: allocated with the same layout in `zeroed`.
            unsafe { alloc::dealloc(self.ptr.as_ptr() as *mut u8, self.layout()) };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_aligned_and_zeroed() {
        let buf = AlignedBuf::zeroed(129).unwrap();
        assert_eq!(buf.len(), 129);
        assert_eq!(buf.as_ptr() as usize % ALIGNMENT, 0);
        assert!(buf.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn zero_length_is_valid() {
        let buf = AlignedBuf::zeroed(0).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn is_mutable() {
        let mut buf = AlignedBuf::zeroed(4).unwrap();
        buf[0] = 1.0;
        buf[3] = 2.0;
        assert_eq!(&buf[..], &[1.0, 0.0, 0.0, 2.0]);
    }
}

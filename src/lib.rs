//! # gaussianblur
//!
//! A frequency-domain separable Gaussian blur engine for 8-bit
//! interleaved raster images (3 or 4 channels).
//!
//! Both passes of the 2-D blur are computed as 1-D real-FFT
//! convolutions — rows first, then columns, with a cache-blocked
//! transpose between them — using reflected boundary padding and
//! prime-factor-friendly transform sizing.
//!
//! # Example
//!
//! ```
//! use gaussianblur::{blur, Image};
//!
//! let mut image = Image::new(4, 4, 3, vec![128u8; 4 * 4 * 3]).unwrap();
//! blur(&mut image, 2.0, false).unwrap();
//! ```
//!
//! # Scope
//!
//! Image codecs, CLI/language bindings, GPU execution and arbitrary
//! channel counts are out of scope; see each module's documentation for
//! the invariants it upholds.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod alloc;
mod blur;
mod convolve;
mod error;
mod fft;
mod image;
mod interleave;
mod kernel;
mod parallel;
mod sizing;
mod transpose;

pub use blur::{blur, blur_with, BlurOptions};
pub use error::{BlurError, BlurResult};
pub use image::{DeinterleavedPlanes, Image, ImageGeometry};
pub use kernel::{prepare_kernel_spectrum, KernelSpectrum, TrailingZeros};
pub use parallel::TileLoop;

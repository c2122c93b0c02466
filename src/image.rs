//! The image data model (spec.md §3).
//!
//! Grounded on `vfx-core::image`'s fallible-constructor convention, but
//! deliberately bare: a blur call needs only geometry plus an owned
//! interleaved byte buffer, not `vfx-core`'s generic color-space/pixel-
//! format machinery.

use crate::error::{BlurError, BlurResult};

/// Dimensions of an [`Image`]. `channels` must be 3 or 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageGeometry {
    pub rows: usize,
    pub cols: usize,
    pub channels: usize,
}

impl ImageGeometry {
    /// Builds a geometry, rejecting zero dimensions or unsupported
    /// channel counts up front.
    pub fn new(rows: usize, cols: usize, channels: usize) -> BlurResult<Self> {
        if rows == 0 || cols == 0 {
            return Err(BlurError::unsupported_input(format!(
                "rows and cols must be >= 1, got rows={rows} cols={cols}"
            )));
        }
        Ok(Self { rows, cols, channels })
    }

    /// Total pixel count (`rows * cols`), ignoring channels.
    pub fn pixel_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Total byte count of an interleaved buffer with this geometry.
    pub fn byte_len(&self) -> usize {
        self.pixel_count() * self.channels
    }
}

/// An 8-bit interleaved raster image, channel-last (`R,G,B,R,G,B,…`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub geometry: ImageGeometry,
    pub data: Vec<u8>,
}

impl Image {
    /// Builds an image, rejecting a `data` length that does not match
    /// `rows * cols * channels` exactly.
    pub fn new(rows: usize, cols: usize, channels: usize, data: Vec<u8>) -> BlurResult<Self> {
        let geometry = ImageGeometry::new(rows, cols, channels)?;
        if data.len() != geometry.byte_len() {
            return Err(BlurError::unsupported_input(format!(
                "data length {} does not match rows*cols*channels={}",
                data.len(),
                geometry.byte_len()
            )));
        }
        Ok(Self { geometry, data })
    }

    /// Number of channels in this image's geometry.
    pub fn channels(&self) -> usize {
        self.geometry.channels
    }
}

/// Planar `f32` representation of an image's channels, one plane per
/// channel, each of length `rows * cols`. Transient: built and consumed
/// within a single blur call.
pub type DeinterleavedPlanes = Vec<Vec<f32>>;

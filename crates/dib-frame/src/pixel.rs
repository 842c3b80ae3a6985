//! Channel reordering for 32-bit-per-pixel frame buffers.
//!
//! Every conversion writes a fully opaque alpha channel. Source alpha is
//! discarded: the display surfaces fed by this crate do not blend, and
//! translucent pixels are rejected downstream.

use bytemuck::{Pod, Zeroable};

use crate::error::{FrameError, Result};

/// Bytes per pixel for every buffer handled by this crate.
pub const BYTES_PER_PIXEL: usize = 4;

/// Alpha value written into every converted pixel.
pub const OPAQUE: u8 = u8::MAX;

/// Pixel grid of a frame buffer.
///
/// Both sides are positive and fit the signed 32-bit fields of the bitmap
/// info header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameDimensions {
    width: u32,
    height: u32,
}

impl FrameDimensions {
    /// Validate and create dimensions.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let limit = i32::MAX as u32;
        if width == 0 || height == 0 || width > limit || height > limit {
            return Err(FrameError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes a 32bpp buffer of these dimensions occupies.
    pub fn byte_len(&self) -> Result<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
            .ok_or(FrameError::InvalidDimensions {
                width: self.width,
                height: self.height,
            })
    }

    /// Check that `buffer` holds exactly one 32bpp frame of these dimensions.
    pub fn check_buffer(&self, buffer: &[u8]) -> Result<()> {
        let expected = self.byte_len()?;
        if buffer.len() != expected {
            return Err(FrameError::InvalidBufferSize {
                width: self.width,
                height: self.height,
                expected,
                actual: buffer.len(),
            });
        }
        Ok(())
    }
}

/// Byte order of the four components of a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelOrder {
    Rgba,
    Bgra,
}

/// Red, green, blue, alpha in memory order.
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Blue, green, red, alpha in memory order (Windows DIB layout).
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Bgra {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

/// A 4-byte pixel layout.
trait Pixel: Pod {
    fn rgb(&self) -> (u8, u8, u8);
    fn opaque(r: u8, g: u8, b: u8) -> Self;
}

impl Pixel for Rgba {
    fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: OPAQUE }
    }
}

impl Pixel for Bgra {
    fn rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { b, g, r, a: OPAQUE }
    }
}

/// Allocate a zero-filled buffer, reporting allocation failure as an error.
pub(crate) fn zeroed(len: usize) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| FrameError::OutOfMemory { requested: len })?;
    buf.resize(len, 0);
    Ok(buf)
}

fn reorder<S: Pixel, D: Pixel>(src: &[u8], dst: &mut [u8]) {
    // Pixel structs have alignment 1 and the caller checked the length, so
    // the casts cannot fail.
    let src: &[S] = bytemuck::cast_slice(src);
    let dst: &mut [D] = bytemuck::cast_slice_mut(dst);
    for (s, d) in src.iter().zip(dst.iter_mut()) {
        let (r, g, b) = s.rgb();
        *d = D::opaque(r, g, b);
    }
}

/// Convert a frame between channel orders into a newly allocated buffer.
///
/// The output has the same length as `src`. Alpha is forced to [`OPAQUE`]
/// even when `from == to`.
pub fn convert(
    src: &[u8],
    dims: FrameDimensions,
    from: ChannelOrder,
    to: ChannelOrder,
) -> Result<Vec<u8>> {
    dims.check_buffer(src)?;
    let mut dst = zeroed(src.len())?;

    match (from, to) {
        (ChannelOrder::Rgba, ChannelOrder::Bgra) => reorder::<Rgba, Bgra>(src, &mut dst),
        (ChannelOrder::Bgra, ChannelOrder::Rgba) => reorder::<Bgra, Rgba>(src, &mut dst),
        (ChannelOrder::Rgba, ChannelOrder::Rgba) => reorder::<Rgba, Rgba>(src, &mut dst),
        (ChannelOrder::Bgra, ChannelOrder::Bgra) => reorder::<Bgra, Bgra>(src, &mut dst),
    }

    Ok(dst)
}

/// Convert an RGBA video frame to the BGRA layout expected by DIB consumers.
pub fn rgba_to_bgra(src: &[u8], dims: FrameDimensions) -> Result<Vec<u8>> {
    convert(src, dims, ChannelOrder::Rgba, ChannelOrder::Bgra)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(w: u32, h: u32) -> FrameDimensions {
        FrameDimensions::new(w, h).unwrap()
    }

    /// Gradient RGBA image with a varying alpha channel.
    fn make_test_rgba(width: u32, height: u32) -> Vec<u8> {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                data.push((x % 256) as u8); // R
                data.push((y % 256) as u8); // G
                data.push(((x + y) % 256) as u8); // B
                data.push(((x * 7 + y) % 256) as u8); // A
            }
        }
        data
    }

    #[test]
    fn converts_single_pixel_and_forces_opaque_alpha() {
        let out = rgba_to_bgra(&[10, 20, 30, 99], dims(1, 1)).unwrap();
        assert_eq!(out, vec![30, 20, 10, 255]);
    }

    #[test]
    fn preserves_colour_channels_for_every_pixel() {
        let src = make_test_rgba(37, 11);
        let out = rgba_to_bgra(&src, dims(37, 11)).unwrap();
        assert_eq!(out.len(), src.len());

        for (s, d) in src.chunks_exact(4).zip(out.chunks_exact(4)) {
            assert_eq!(d[2], s[0], "red");
            assert_eq!(d[1], s[1], "green");
            assert_eq!(d[0], s[2], "blue");
            assert_eq!(d[3], 255, "alpha");
        }
    }

    #[test]
    fn transparent_input_becomes_opaque() {
        let src = vec![1, 2, 3, 0, 4, 5, 6, 0];
        let out = rgba_to_bgra(&src, dims(2, 1)).unwrap();
        assert_eq!(out, vec![3, 2, 1, 255, 6, 5, 4, 255]);
    }

    #[test]
    fn bgra_to_rgba_swaps_back() {
        let out = convert(&[30, 20, 10, 7], dims(1, 1), ChannelOrder::Bgra, ChannelOrder::Rgba)
            .unwrap();
        assert_eq!(out, vec![10, 20, 30, 255]);
    }

    #[test]
    fn same_order_copies_colour_and_forces_alpha() {
        let out = convert(&[1, 2, 3, 4], dims(1, 1), ChannelOrder::Bgra, ChannelOrder::Bgra)
            .unwrap();
        assert_eq!(out, vec![1, 2, 3, 255]);
    }

    #[test]
    fn undersized_buffer_is_rejected() {
        let err = rgba_to_bgra(&[0u8; 4], dims(2, 1)).unwrap_err();
        assert_eq!(
            err,
            FrameError::InvalidBufferSize {
                width: 2,
                height: 1,
                expected: 8,
                actual: 4,
            }
        );
    }

    #[test]
    fn oversized_buffer_is_rejected() {
        let err = rgba_to_bgra(&[0u8; 12], dims(2, 1)).unwrap_err();
        assert!(matches!(err, FrameError::InvalidBufferSize { actual: 12, .. }));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(FrameDimensions::new(0, 10).is_err());
        assert!(FrameDimensions::new(10, 0).is_err());
    }

    #[test]
    fn dimensions_beyond_signed_header_range_are_rejected() {
        let err = FrameDimensions::new(i32::MAX as u32 + 1, 1).unwrap_err();
        assert!(matches!(err, FrameError::InvalidDimensions { .. }));
        assert!(FrameDimensions::new(i32::MAX as u32, 1).is_ok());
    }

    #[test]
    fn byte_len_is_four_bytes_per_pixel() {
        assert_eq!(dims(640, 480).byte_len().unwrap(), 640 * 480 * 4);
    }

    #[test]
    fn pixel_structs_are_four_bytes() {
        assert_eq!(std::mem::size_of::<Rgba>(), BYTES_PER_PIXEL);
        assert_eq!(std::mem::size_of::<Bgra>(), BYTES_PER_PIXEL);
    }
}

//! 32bpp bitmap container (BMP file) encoding.
//!
//! Layout: 14-byte `BITMAPFILEHEADER`, 40-byte `BITMAPINFOHEADER`, then the
//! raw BGRA pixel rows. All multi-byte fields are little-endian. Row order is
//! signalled by the sign of the info header height: negative for top-down,
//! positive for bottom-up.

use std::io::Write;
use std::path::Path;

use bytes::{Buf, BufMut};

use crate::error::{FrameError, Result};
use crate::pixel::{zeroed, FrameDimensions};

/// `"BM"`, i.e. `0x4D42` stored little-endian.
pub const BITMAP_MAGIC: [u8; 2] = *b"BM";

/// Size of `BITMAPFILEHEADER`.
pub const FILE_HEADER_SIZE: usize = 14;

/// Size of `BITMAPINFOHEADER`.
pub const INFO_HEADER_SIZE: usize = 40;

/// Offset of the first pixel byte from the start of the container.
pub const PIXEL_DATA_OFFSET: usize = FILE_HEADER_SIZE + INFO_HEADER_SIZE;

const PLANES: u16 = 1;
const BITS_PER_PIXEL: u16 = 32;
/// `BI_RGB`: uncompressed.
const COMPRESSION_RGB: u32 = 0;

/// Whether the first pixel row is the top or the bottom of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowOrder {
    TopDown,
    BottomUp,
}

impl RowOrder {
    /// Info header height for this row order.
    fn signed_height(self, height: u32) -> i32 {
        // FrameDimensions guarantees height <= i32::MAX.
        let h = height as i32;
        match self {
            RowOrder::TopDown => -h,
            RowOrder::BottomUp => h,
        }
    }

    /// Row order encoded by an info header height.
    pub fn from_signed_height(height: i32) -> Self {
        if height < 0 {
            RowOrder::TopDown
        } else {
            RowOrder::BottomUp
        }
    }
}

/// `BITMAPFILEHEADER` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileHeader {
    pub file_size: u32,
    pub pixel_offset: u32,
}

impl FileHeader {
    fn put<B: BufMut>(&self, out: &mut B) {
        out.put_slice(&BITMAP_MAGIC);
        out.put_u32_le(self.file_size);
        out.put_u16_le(0); // reserved1
        out.put_u16_le(0); // reserved2
        out.put_u32_le(self.pixel_offset);
    }

    /// Read the file header at the start of `bytes`.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let mut buf = bytes.get(..FILE_HEADER_SIZE)?;
        if buf[..2] != BITMAP_MAGIC {
            return None;
        }
        buf.advance(2);
        let file_size = buf.get_u32_le();
        buf.advance(4); // reserved words
        Some(Self {
            file_size,
            pixel_offset: buf.get_u32_le(),
        })
    }
}

/// `BITMAPINFOHEADER` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoHeader {
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: u32,
    pub size_image: u32,
    pub x_pels_per_meter: i32,
    pub y_pels_per_meter: i32,
    pub clr_used: u32,
    pub clr_important: u32,
}

impl InfoHeader {
    /// Header for an uncompressed 32bpp image.
    ///
    /// The resolution fields carry the pixel dimensions; consumers of these
    /// containers ignore DPI.
    pub fn new(dims: FrameDimensions, order: RowOrder) -> Self {
        let width = dims.width() as i32;
        Self {
            width,
            height: order.signed_height(dims.height()),
            planes: PLANES,
            bit_count: BITS_PER_PIXEL,
            compression: COMPRESSION_RGB,
            size_image: 0,
            x_pels_per_meter: width,
            y_pels_per_meter: dims.height() as i32,
            clr_used: 0,
            clr_important: 0,
        }
    }

    pub fn row_order(&self) -> RowOrder {
        RowOrder::from_signed_height(self.height)
    }

    fn put<B: BufMut>(&self, out: &mut B) {
        out.put_u32_le(INFO_HEADER_SIZE as u32); // biSize
        out.put_i32_le(self.width);
        out.put_i32_le(self.height);
        out.put_u16_le(self.planes);
        out.put_u16_le(self.bit_count);
        out.put_u32_le(self.compression);
        out.put_u32_le(self.size_image);
        out.put_i32_le(self.x_pels_per_meter);
        out.put_i32_le(self.y_pels_per_meter);
        out.put_u32_le(self.clr_used);
        out.put_u32_le(self.clr_important);
    }

    /// Read an info header. `bytes` starts at the header, not the file.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let mut buf = bytes.get(..INFO_HEADER_SIZE)?;
        if buf.get_u32_le() as usize != INFO_HEADER_SIZE {
            return None;
        }
        Some(Self {
            width: buf.get_i32_le(),
            height: buf.get_i32_le(),
            planes: buf.get_u16_le(),
            bit_count: buf.get_u16_le(),
            compression: buf.get_u32_le(),
            size_image: buf.get_u32_le(),
            x_pels_per_meter: buf.get_i32_le(),
            y_pels_per_meter: buf.get_i32_le(),
            clr_used: buf.get_u32_le(),
            clr_important: buf.get_u32_le(),
        })
    }
}

/// An encoded bitmap: headers followed by pixel data.
///
/// Owns its bytes outright; nothing in this crate keeps a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapContainer {
    bytes: Vec<u8>,
}

impl BitmapContainer {
    /// Total length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false for containers produced by [`write`].
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Hand the buffer over to the caller.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn file_header(&self) -> Option<FileHeader> {
        FileHeader::parse(&self.bytes)
    }

    pub fn info_header(&self) -> Option<InfoHeader> {
        self.bytes
            .get(FILE_HEADER_SIZE..)
            .and_then(InfoHeader::parse)
    }

    /// Pixel payload following the headers.
    pub fn pixels(&self) -> &[u8] {
        &self.bytes[PIXEL_DATA_OFFSET..]
    }

    /// Stream the container to a writer.
    pub fn write_to<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        out.write_all(&self.bytes)?;
        out.flush()
    }

    /// Persist the container as a `.bmp` file.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, &self.bytes)
    }
}

impl AsRef<[u8]> for BitmapContainer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// Package a BGRA pixel buffer as a 32bpp bitmap container.
///
/// `pixels` must already be in the container's channel order and hold
/// exactly one frame of `dims`. The output is zero-initialized before the
/// headers and payload are copied in, so identical inputs always produce
/// identical bytes.
pub fn write(pixels: &[u8], dims: FrameDimensions, order: RowOrder) -> Result<BitmapContainer> {
    dims.check_buffer(pixels)?;

    let total = PIXEL_DATA_OFFSET
        .checked_add(pixels.len())
        .filter(|&n| u32::try_from(n).is_ok())
        .ok_or(FrameError::InvalidDimensions {
            width: dims.width(),
            height: dims.height(),
        })?;

    let mut bytes = zeroed(total)?;

    let mut out = &mut bytes[..];
    FileHeader {
        file_size: total as u32,
        pixel_offset: PIXEL_DATA_OFFSET as u32,
    }
    .put(&mut out);
    InfoHeader::new(dims, order).put(&mut out);
    out.put_slice(pixels);

    Ok(BitmapContainer { bytes })
}

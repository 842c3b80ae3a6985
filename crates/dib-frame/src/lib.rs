//! Pixel channel reordering and 32bpp bitmap container encoding.
//!
//! Video frames arrive as RGBA buffers; display surfaces on Windows take
//! BGRA rows wrapped in a BMP container. [`rgba_to_bgra`] fixes the channel
//! order and [`write`] produces the container. [`capture_from_surface`]
//! packages pixels read back from a native drawable.

pub mod bitmap;
pub mod error;
#[cfg(windows)]
pub mod gdi;
pub mod pixel;
pub mod surface;

pub use bitmap::{
    write, BitmapContainer, FileHeader, InfoHeader, RowOrder, BITMAP_MAGIC, FILE_HEADER_SIZE,
    INFO_HEADER_SIZE, PIXEL_DATA_OFFSET,
};
pub use error::{FrameError, Result};
pub use pixel::{convert, rgba_to_bgra, ChannelOrder, FrameDimensions};
pub use surface::{capture_from_surface, DrawableSurface, SurfacePixels};

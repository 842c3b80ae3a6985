//! Bitmaps captured from native drawable surfaces.
//!
//! `DrawableSurface` abstracts the OS query so the packaging path can be
//! exercised without a display. The GDI implementation lives in
//! [`crate::gdi`].

use tracing::debug;

use crate::bitmap::{write, BitmapContainer, RowOrder};
use crate::error::Result;
use crate::pixel::FrameDimensions;

/// Pixels read back from a native surface.
///
/// `pixels` is 32bpp, bottom-up, already in the container's channel order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfacePixels {
    pub dims: FrameDimensions,
    pub pixels: Vec<u8>,
}

/// A native pixel surface that can be read back as 32bpp DIB rows.
pub trait DrawableSurface {
    /// Query dimensions and pixel data.
    ///
    /// Implementations release any OS drawing context before returning,
    /// on success and on failure.
    fn query(&self) -> Result<SurfacePixels>;
}

/// Read a native surface and package it as a bottom-up bitmap container.
///
/// No channel reordering happens here: native capture already yields the
/// container's layout.
pub fn capture_from_surface<S: DrawableSurface + ?Sized>(surface: &S) -> Result<BitmapContainer> {
    let SurfacePixels { dims, pixels } = surface
        .query()
        .inspect_err(|e| debug!("surface query failed: {e}"))?;
    write(&pixels, dims, RowOrder::BottomUp)
}

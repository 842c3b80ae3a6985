//! GDI readback of `HBITMAP` surfaces.

use windows::Win32::Graphics::Gdi::{
    GetDC, GetDIBits, GetObjectW, ReleaseDC, BITMAP, BITMAPINFO, BITMAPINFOHEADER, BI_RGB,
    DIB_RGB_COLORS, HBITMAP, HDC, RGBQUAD,
};

use crate::error::{FrameError, Result};
use crate::pixel::{zeroed, FrameDimensions};
use crate::surface::{DrawableSurface, SurfacePixels};

/// Screen device context guard. Pairs GetDC with ReleaseDC.
struct ScreenDc(HDC);

impl ScreenDc {
    fn acquire() -> Result<Self> {
        let hdc = unsafe { GetDC(None) };
        if hdc.is_invalid() {
            return Err(FrameError::NativeQueryFailure(
                "GetDC returned a null device context".to_string(),
            ));
        }
        Ok(Self(hdc))
    }
}

impl Drop for ScreenDc {
    fn drop(&mut self) {
        unsafe {
            ReleaseDC(None, self.0);
        }
    }
}

/// A borrowed GDI bitmap handle.
///
/// The handle stays owned by whoever created it; this type never deletes it.
#[derive(Debug, Clone, Copy)]
pub struct GdiBitmap {
    handle: HBITMAP,
}

impl GdiBitmap {
    /// Wrap a bitmap handle.
    ///
    /// # Safety
    ///
    /// `handle` must be a valid `HBITMAP` for as long as this value is
    /// used, and must not be selected into a device context during a query.
    pub unsafe fn from_raw(handle: HBITMAP) -> Self {
        Self { handle }
    }

    fn dimensions(&self) -> Result<FrameDimensions> {
        let mut bm = BITMAP::default();
        let written = unsafe {
            GetObjectW(
                self.handle.into(),
                std::mem::size_of::<BITMAP>() as i32,
                Some(&mut bm as *mut BITMAP as *mut core::ffi::c_void),
            )
        };
        if written == 0 {
            return Err(FrameError::NativeQueryFailure(
                "GetObjectW failed for bitmap handle".to_string(),
            ));
        }

        let width = u32::try_from(bm.bmWidth);
        let height = u32::try_from(bm.bmHeight);
        match (width, height) {
            (Ok(w), Ok(h)) => FrameDimensions::new(w, h),
            _ => Err(FrameError::NativeQueryFailure(format!(
                "bitmap reports invalid size {}x{}",
                bm.bmWidth, bm.bmHeight
            ))),
        }
    }
}

impl DrawableSurface for GdiBitmap {
    fn query(&self) -> Result<SurfacePixels> {
        let dims = self.dimensions()?;
        let mut pixels = zeroed(dims.byte_len()?)?;

        // Positive height requests bottom-up rows, the DIB default.
        let mut bmi = BITMAPINFO {
            bmiHeader: BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: dims.width() as i32,
                biHeight: dims.height() as i32,
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                biSizeImage: 0,
                biXPelsPerMeter: 0,
                biYPelsPerMeter: 0,
                biClrUsed: 0,
                biClrImportant: 0,
            },
            bmiColors: [RGBQUAD {
                rgbBlue: 0,
                rgbGreen: 0,
                rgbRed: 0,
                rgbReserved: 0,
            }],
        };

        let screen = ScreenDc::acquire()?;
        let scanlines = unsafe {
            GetDIBits(
                screen.0,
                self.handle,
                0,
                dims.height(),
                Some(pixels.as_mut_ptr() as *mut core::ffi::c_void),
                &mut bmi,
                DIB_RGB_COLORS,
            )
        };
        drop(screen);

        check_scanlines(scanlines, dims)?;
        Ok(SurfacePixels { dims, pixels })
    }
}

/// A readback counts only if every row was copied; the rest of the buffer
/// would otherwise be packaged as zeros.
fn check_scanlines(copied: i32, dims: FrameDimensions) -> Result<()> {
    if u32::try_from(copied).ok() == Some(dims.height()) {
        return Ok(());
    }
    Err(FrameError::NativeQueryFailure(format!(
        "GetDIBits copied {copied} of {} scanlines",
        dims.height()
    )))
}

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use dib_frame::{
    capture_from_surface, rgba_to_bgra, write, BitmapContainer, DrawableSurface,
    FrameDimensions, RowOrder,
};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::stats::{RenderStats, RenderStatsSnapshot};
use crate::error::{BridgeError, Result};

/// Application-side render target, one per video view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(pub i64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct ViewSlot {
    latest: Arc<BitmapContainer>,
    stats: RenderStats,
}

/// Turns incoming video frames into bitmap containers, one slot per view.
///
/// Each slot keeps only the most recent container. A frame that fails to
/// convert is counted as dropped and the previous container stays current,
/// so the view keeps showing the last good frame.
pub struct FrameRenderer {
    views: Mutex<HashMap<ViewId, ViewSlot>>,
    warn_on_drop: bool,
}

impl FrameRenderer {
    pub fn new(warn_on_drop: bool) -> Self {
        Self {
            views: Mutex::new(HashMap::new()),
            warn_on_drop,
        }
    }

    /// Present an RGBA frame from the engine's video renderer.
    ///
    /// Channels are reordered to BGRA with opaque alpha and the rows are
    /// labelled bottom-up, matching the native renderer's DIB output.
    pub fn present_rgba(&self, view: ViewId, rgba: &[u8], width: u32, height: u32) -> Result<()> {
        let encoded = FrameDimensions::new(width, height).and_then(|dims| {
            let bgra = rgba_to_bgra(rgba, dims)?;
            write(&bgra, dims, RowOrder::BottomUp)
        });
        self.store(view, encoded)
    }

    /// Present a frame that is already BGRA with the top row first.
    pub fn present_bgra(&self, view: ViewId, bgra: &[u8], width: u32, height: u32) -> Result<()> {
        let encoded = FrameDimensions::new(width, height)
            .and_then(|dims| write(bgra, dims, RowOrder::TopDown));
        self.store(view, encoded)
    }

    /// Present the contents of a native drawable surface.
    pub fn present_surface<S: DrawableSurface + ?Sized>(
        &self,
        view: ViewId,
        surface: &S,
    ) -> Result<()> {
        self.store(view, capture_from_surface(surface))
    }

    /// Present a GDI bitmap handed over by the engine (e.g. a snapshot).
    ///
    /// # Safety
    ///
    /// `handle` must be a valid bitmap that is not selected into any device
    /// context for the duration of the call.
    #[cfg(windows)]
    pub unsafe fn present_hbitmap(
        &self,
        view: ViewId,
        handle: windows::Win32::Graphics::Gdi::HBITMAP,
    ) -> Result<()> {
        let surface = dib_frame::gdi::GdiBitmap::from_raw(handle);
        self.present_surface(view, &surface)
    }

    /// A view gets a slot with its first good frame; failures before that
    /// are logged but leave nothing behind.
    fn store(&self, view: ViewId, encoded: dib_frame::Result<BitmapContainer>) -> Result<()> {
        let mut views = self.views.lock();
        match encoded {
            Ok(bitmap) => {
                let len = bitmap.len();
                let bitmap = Arc::new(bitmap);
                let slot = views.entry(view).or_insert_with(|| ViewSlot {
                    latest: Arc::clone(&bitmap),
                    stats: RenderStats::new(),
                });
                slot.latest = bitmap;
                slot.stats.record_frame(len);
                Ok(())
            }
            Err(e) => {
                if let Some(slot) = views.get_mut(&view) {
                    slot.stats.record_drop(e.to_string());
                }
                if self.warn_on_drop {
                    warn!("Dropping frame for view {view}: {e}");
                } else {
                    debug!("dropping frame for view {view}: {e}");
                }
                Err(e.into())
            }
        }
    }

    /// Most recent container for a view.
    pub fn latest(&self, view: ViewId) -> Result<Arc<BitmapContainer>> {
        self.views
            .lock()
            .get(&view)
            .map(|slot| Arc::clone(&slot.latest))
            .ok_or(BridgeError::UnknownView(view))
    }

    pub fn stats(&self, view: ViewId) -> Result<RenderStatsSnapshot> {
        let views = self.views.lock();
        views
            .get(&view)
            .map(|slot| slot.stats.snapshot())
            .ok_or(BridgeError::UnknownView(view))
    }

    /// Forget a view and its last frame. Returns whether it existed.
    pub fn remove_view(&self, view: ViewId) -> bool {
        self.views.lock().remove(&view).is_some()
    }

    pub fn view_count(&self) -> usize {
        self.views.lock().len()
    }
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dib_frame::{FrameError, SurfacePixels, PIXEL_DATA_OFFSET};

    const VIEW: ViewId = ViewId(7);

    struct StaticSurface(dib_frame::Result<SurfacePixels>);

    impl DrawableSurface for StaticSurface {
        fn query(&self) -> dib_frame::Result<SurfacePixels> {
            self.0.clone()
        }
    }

    #[test]
    fn rgba_frame_becomes_bottom_up_bgra_bitmap() {
        let renderer = FrameRenderer::default();
        renderer.present_rgba(VIEW, &[10, 20, 30, 99], 1, 1).unwrap();

        let bmp = renderer.latest(VIEW).unwrap();
        assert_eq!(bmp.len(), PIXEL_DATA_OFFSET + 4);
        assert_eq!(bmp.pixels(), &[30, 20, 10, 255]);
        assert_eq!(bmp.info_header().unwrap().height, 1);
    }

    #[test]
    fn bgra_frame_is_packaged_top_down_unchanged() {
        let renderer = FrameRenderer::default();
        let bgra = vec![1, 2, 3, 4, 5, 6, 7, 8];
        renderer.present_bgra(VIEW, &bgra, 1, 2).unwrap();

        let bmp = renderer.latest(VIEW).unwrap();
        assert_eq!(bmp.pixels(), bgra.as_slice());
        assert_eq!(bmp.info_header().unwrap().height, -2);
    }

    #[test]
    fn surface_frame_is_packaged_bottom_up() {
        let renderer = FrameRenderer::default();
        let surface = StaticSurface(Ok(SurfacePixels {
            dims: FrameDimensions::new(2, 1).unwrap(),
            pixels: vec![0u8; 8],
        }));
        renderer.present_surface(VIEW, &surface).unwrap();

        let info = renderer.latest(VIEW).unwrap().info_header().unwrap();
        assert_eq!((info.width, info.height), (2, 1));
    }

    #[test]
    fn bad_frame_is_dropped_and_previous_frame_kept() {
        let renderer = FrameRenderer::default();
        renderer.present_rgba(VIEW, &[1, 2, 3, 4], 1, 1).unwrap();

        let err = renderer.present_rgba(VIEW, &[0u8; 4], 2, 1).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Frame(FrameError::InvalidBufferSize { .. })
        ));

        let bmp = renderer.latest(VIEW).unwrap();
        assert_eq!(bmp.pixels(), &[3, 2, 1, 255]);

        let stats = renderer.stats(VIEW).unwrap();
        assert_eq!(stats.frame_count, 1);
        assert_eq!(stats.drop_count, 1);
        assert!(stats.last_error.unwrap().contains("invalid buffer size"));
    }

    #[test]
    fn zero_sized_frame_is_rejected() {
        let renderer = FrameRenderer::new(false);
        let err = renderer.present_bgra(VIEW, &[], 0, 0).unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Frame(FrameError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn native_failure_is_reported_and_counted() {
        let renderer = FrameRenderer::default();
        renderer.present_rgba(VIEW, &[0u8; 4], 1, 1).unwrap();
        let surface = StaticSurface(Err(FrameError::NativeQueryFailure("GetObjectW".into())));
        let err = renderer.present_surface(VIEW, &surface).unwrap_err();
        assert!(err.to_string().contains("GetObjectW"));
        assert_eq!(renderer.stats(VIEW).unwrap().drop_count, 1);
    }

    #[test]
    fn failures_on_a_new_view_leave_no_slot() {
        let renderer = FrameRenderer::default();
        assert!(renderer.present_rgba(VIEW, &[0u8; 3], 1, 1).is_err());
        assert!(renderer.present_bgra(VIEW, &[], 0, 0).is_err());

        assert_eq!(renderer.view_count(), 0);
        assert!(matches!(
            renderer.latest(VIEW),
            Err(BridgeError::UnknownView(_))
        ));
        assert!(renderer.stats(VIEW).is_err());
    }

    #[test]
    fn unknown_view_is_reported() {
        let renderer = FrameRenderer::default();
        assert!(matches!(
            renderer.latest(ViewId(99)),
            Err(BridgeError::UnknownView(ViewId(99)))
        ));
        assert!(renderer.stats(ViewId(99)).is_err());
    }

    #[test]
    fn views_are_independent() {
        let renderer = FrameRenderer::default();
        renderer.present_rgba(ViewId(1), &[1, 1, 1, 1], 1, 1).unwrap();
        renderer.present_rgba(ViewId(2), &[2, 2, 2, 2], 1, 1).unwrap();
        assert_eq!(renderer.view_count(), 2);
        assert_eq!(renderer.latest(ViewId(1)).unwrap().pixels(), &[1, 1, 1, 255]);
        assert_eq!(renderer.latest(ViewId(2)).unwrap().pixels(), &[2, 2, 2, 255]);
    }

    #[test]
    fn remove_view_forgets_frames() {
        let renderer = FrameRenderer::default();
        renderer.present_rgba(VIEW, &[0u8; 4], 1, 1).unwrap();
        assert!(renderer.remove_view(VIEW));
        assert!(!renderer.remove_view(VIEW));
        assert_eq!(renderer.view_count(), 0);
    }

    #[test]
    fn latest_frame_outlives_later_presents() {
        let renderer = FrameRenderer::default();
        renderer.present_rgba(VIEW, &[1, 2, 3, 4], 1, 1).unwrap();
        let held = renderer.latest(VIEW).unwrap();
        renderer.present_rgba(VIEW, &[9, 9, 9, 9], 1, 1).unwrap();
        assert_eq!(held.pixels(), &[3, 2, 1, 255]);
    }

    #[test]
    fn view_id_serialises_as_plain_integer() {
        assert_eq!(serde_json::to_value(ViewId(42)).unwrap(), 42);
        let id: ViewId = serde_json::from_value(serde_json::json!(5)).unwrap();
        assert_eq!(id, ViewId(5));
    }
}

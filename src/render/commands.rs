use base64::Engine;
use tauri::State;

use super::renderer::{FrameRenderer, ViewId};
use super::stats::RenderStatsSnapshot;
use crate::bridge::ExpressBridge;

/// Base64 of the latest bitmap container for a view.
fn encode_latest(renderer: &FrameRenderer, view: ViewId) -> crate::error::Result<String> {
    let bitmap = renderer.latest(view)?;
    Ok(base64::engine::general_purpose::STANDARD.encode(bitmap.as_bytes()))
}

/// Get the latest frame of a view as a base64-encoded BMP.
#[tauri::command]
pub async fn get_frame(state: State<'_, ExpressBridge>, view_id: i64) -> Result<String, String> {
    encode_latest(state.renderer(), ViewId(view_id)).map_err(|e| e.to_string())
}

/// Get render statistics for a view.
#[tauri::command]
pub async fn get_render_stats(
    state: State<'_, ExpressBridge>,
    view_id: i64,
) -> Result<RenderStatsSnapshot, String> {
    state
        .renderer()
        .stats(ViewId(view_id))
        .map_err(|e| e.to_string())
}

/// Release a view's frame slot. Idempotent.
#[tauri::command]
pub async fn destroy_view(state: State<'_, ExpressBridge>, view_id: i64) -> Result<(), String> {
    if state.renderer().remove_view(ViewId(view_id)) {
        tracing::debug!("destroyed view {view_id}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_latest_returns_base64_bmp() {
        let renderer = FrameRenderer::default();
        renderer
            .present_rgba(ViewId(1), &[10, 20, 30, 99], 1, 1)
            .unwrap();

        let b64 = encode_latest(&renderer, ViewId(1)).unwrap();
        let decoded = base64::engine::general_purpose::STANDARD
            .decode(b64)
            .unwrap();
        assert_eq!(&decoded[0..2], b"BM");
        assert_eq!(decoded.len(), 58);
        assert_eq!(&decoded[54..], &[30, 20, 10, 255]);
    }

    #[test]
    fn encode_latest_fails_for_unknown_view() {
        let renderer = FrameRenderer::default();
        let err = encode_latest(&renderer, ViewId(3)).unwrap_err();
        assert_eq!(err.to_string(), "unknown view: 3");
    }

    #[test]
    fn encode_latest_fails_when_only_bad_frames_arrived() {
        let renderer = FrameRenderer::default();
        let _ = renderer.present_rgba(ViewId(4), &[], 1, 1);
        let err = encode_latest(&renderer, ViewId(4)).unwrap_err();
        assert_eq!(err.to_string(), "unknown view: 4");
    }
}

//! Tauri plugin bridging the Express real-time audio/video engine.
//!
//! The native engine binding pushes two things through this crate: callback
//! events, forwarded to the webview over an IPC channel, and video frames,
//! converted to BMP containers the webview pulls with `get_frame`.

mod bridge;
mod config;
mod error;
pub mod events;
pub mod render;

use tauri::plugin::{Builder, TauriPlugin};
use tauri::{Manager, Runtime, State};

pub use bridge::ExpressBridge;
pub use config::BridgeConfig;
pub use error::{BridgeError, Result};

/// Plugin name, also the key of its section under `plugins` in the config.
pub const PLUGIN_NAME: &str = "express-engine";

/// Access the bridge state from any Tauri manager (app, window, webview).
pub trait ExpressBridgeExt<R: Runtime> {
    fn express_bridge(&self) -> State<'_, ExpressBridge>;
}

impl<R: Runtime, T: Manager<R>> ExpressBridgeExt<R> for T {
    fn express_bridge(&self) -> State<'_, ExpressBridge> {
        self.state::<ExpressBridge>()
    }
}

/// Build the plugin. Register it with `tauri::Builder::plugin`.
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<BridgeConfig>> {
    Builder::<R, Option<BridgeConfig>>::new(PLUGIN_NAME)
        .invoke_handler(tauri::generate_handler![
            events::commands::subscribe_events,
            events::commands::unsubscribe_events,
            render::commands::get_frame,
            render::commands::get_render_stats,
            render::commands::destroy_view,
        ])
        .setup(|app, api| {
            let config = api.config().clone().unwrap_or_default();
            tracing::info!(
                "{PLUGIN_NAME} bridge ready (log_events={}, warn_on_dropped_frames={})",
                config.log_events,
                config.warn_on_dropped_frames
            );
            app.manage(ExpressBridge::new(config));
            Ok(())
        })
        .build()
}

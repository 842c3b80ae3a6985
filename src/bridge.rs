use std::sync::Arc;

use crate::config::BridgeConfig;
use crate::events::{EngineEventHandler, EventForwarder};
use crate::render::FrameRenderer;

/// Managed state shared by the plugin commands and the native binding.
///
/// Built once during plugin setup. The native engine binding registers
/// [`ExpressBridge::event_handler`] as its callback target and feeds video
/// frames into [`ExpressBridge::renderer`].
pub struct ExpressBridge {
    config: BridgeConfig,
    forwarder: Arc<EventForwarder>,
    renderer: Arc<FrameRenderer>,
}

impl ExpressBridge {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            forwarder: Arc::new(EventForwarder::new(config.log_events)),
            renderer: Arc::new(FrameRenderer::new(config.warn_on_dropped_frames)),
            config,
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn forwarder(&self) -> &EventForwarder {
        &self.forwarder
    }

    /// Callback target to hand to the native engine.
    pub fn event_handler(&self) -> Arc<dyn EngineEventHandler> {
        self.forwarder.clone()
    }

    pub fn renderer(&self) -> &FrameRenderer {
        &self.renderer
    }

    /// Shared renderer handle for the engine's video render thread.
    pub fn renderer_handle(&self) -> Arc<FrameRenderer> {
        Arc::clone(&self.renderer)
    }
}

impl Default for ExpressBridge {
    fn default() -> Self {
        Self::new(BridgeConfig::default())
    }
}

use serde::Deserialize;

/// Plugin configuration, read from `plugins.express-engine` in the Tauri
/// config. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BridgeConfig {
    /// Trace every forwarded engine event.
    pub log_events: bool,
    /// Log dropped frames at warn level instead of debug.
    pub warn_on_dropped_frames: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log_events: false,
            warn_on_dropped_frames: true,
        }
    }
}

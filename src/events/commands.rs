use tauri::ipc::Channel;
use tauri::State;

use super::types::EngineEvent;
use crate::bridge::ExpressBridge;

/// Route engine events to `on_event`. Replaces any earlier subscription.
#[tauri::command]
pub async fn subscribe_events(
    state: State<'_, ExpressBridge>,
    on_event: Channel<EngineEvent>,
) -> Result<(), String> {
    state.forwarder().set_sink(Box::new(on_event));
    tracing::debug!("engine event subscriber attached");
    Ok(())
}

/// Stop routing engine events. Idempotent.
#[tauri::command]
pub async fn unsubscribe_events(state: State<'_, ExpressBridge>) -> Result<(), String> {
    state.forwarder().clear_sink();
    tracing::debug!("engine event subscriber detached");
    Ok(())
}

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tauri::ipc::Channel;
use tracing::{trace, warn};

use super::types::EngineEvent;

/// Receives engine callbacks from the native binding.
///
/// The native layer translates each SDK callback into an [`EngineEvent`] and
/// calls `on_event` on whatever thread the SDK fired it from.
pub trait EngineEventHandler: Send + Sync {
    fn on_event(&self, event: EngineEvent);
}

/// Outbound destination for forwarded events.
///
/// `deliver` runs while the forwarder serializes delivery: it may attach or
/// detach sinks, but must not forward events itself, and a slow sink stalls
/// every engine callback thread.
pub trait EventSink: Send + Sync {
    fn deliver(&self, event: EngineEvent) -> Result<(), String>;
}

impl EventSink for Channel<EngineEvent> {
    fn deliver(&self, event: EngineEvent) -> Result<(), String> {
        self.send(event).map_err(|e| e.to_string())
    }
}

/// Republishes engine callbacks onto a single subscriber channel.
///
/// Created once when the bridge is set up and shared by `Arc` with the
/// native binding and the command layer. Events are delivered in call order;
/// with no subscriber attached they are dropped, never buffered.
pub struct EventForwarder {
    sink: Mutex<Option<Arc<dyn EventSink>>>,
    delivery: Mutex<()>,
    forwarded: AtomicU64,
    dropped: AtomicU64,
    log_events: bool,
}

impl EventForwarder {
    pub fn new(log_events: bool) -> Self {
        Self {
            sink: Mutex::new(None),
            delivery: Mutex::new(()),
            forwarded: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            log_events,
        }
    }

    /// Attach a subscriber, replacing any previous one.
    pub fn set_sink(&self, sink: Box<dyn EventSink>) {
        *self.sink.lock() = Some(Arc::from(sink));
    }

    /// Detach the subscriber. Later events are dropped.
    pub fn clear_sink(&self) {
        *self.sink.lock() = None;
    }

    pub fn has_sink(&self) -> bool {
        self.sink.lock().is_some()
    }

    /// Deliver one event to the current subscriber.
    pub fn forward(&self, event: EngineEvent) {
        // Held across delivery so concurrent callbacks reach the subscriber
        // in the order they acquired it. The sink slot itself is only locked
        // long enough to clone the handle.
        let _order = self.delivery.lock();
        let current = self.sink.lock().clone();
        let Some(sink) = current else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            trace!("no event subscriber, dropping {}", event.method());
            return;
        };

        let method = event.method();
        if self.log_events {
            trace!("forwarding {method}");
        }
        match sink.deliver(event) {
            Ok(()) => {
                self.forwarded.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                warn!("Failed to deliver {method} event: {e}");
            }
        }
    }

    /// Events handed to a subscriber so far.
    pub fn forwarded_count(&self) -> u64 {
        self.forwarded.load(Ordering::Relaxed)
    }

    /// Events discarded for lack of a subscriber or a failed delivery.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for EventForwarder {
    fn default() -> Self {
        Self::new(false)
    }
}

impl EngineEventHandler for EventForwarder {
    fn on_event(&self, event: EngineEvent) {
        self.forward(event);
    }
}

// Engine events: native callback payloads and their forwarding to the app.

pub mod commands;
pub mod forwarder;
pub mod types;

pub use forwarder::{EngineEventHandler, EventForwarder, EventSink};
pub use types::EngineEvent;

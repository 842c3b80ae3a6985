// Video rendering: frame conversion, per-view bitmap slots, and IPC delivery.

pub mod commands;
pub mod renderer;
pub mod stats;

pub use renderer::{FrameRenderer, ViewId};
pub use stats::{RenderStats, RenderStatsSnapshot};

use dib_frame::FrameError;
use thiserror::Error;

use crate::render::ViewId;

/// Bridge-level errors.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("frame conversion failed: {0}")]
    Frame(#[from] FrameError),

    #[error("unknown view: {0}")]
    UnknownView(ViewId),
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, BridgeError>;

//! Loop error types.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoopError {
    /// The reactor has been dropped; nothing will run further registrations.
    #[error("event loop is closed")]
    Closed,

    #[error("event loop queue is full ({0} pending)")]
    QueueFull(usize),

    #[error("failed to spawn loop thread: {0}")]
    Spawn(#[from] io::Error),
}

pub mod schedule;
pub mod runqueue;
pub mod thread;
mod config;
mod defer;
mod error;
mod invoke;
mod shared;

pub use config::LoopConfig;
pub use defer::{defer_to_loop_thread, defer_with_priority};
pub use error::LoopError;
pub use invoke::Invoke;
pub use shared::Shared;

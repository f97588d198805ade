use std::thread::{self, JoinHandle};

use tracing::debug;

use crate::config::LoopConfig;
use crate::error::LoopError;
use crate::runqueue::{make_runqueue_with, Queuer};

/// A dedicated thread that owns a `Reactor` and runs it.
pub struct LoopThread {
    queuer: Queuer,
    join: JoinHandle<()>,
}

impl LoopThread {
    pub fn spawn(config: &LoopConfig) -> Result<LoopThread, LoopError> {
        let (queuer, reactor) = make_runqueue_with(config);
        let name = config.thread_name.clone();
        let join = thread::Builder::new().name(name.clone()).spawn(move || {
            reactor.run();
            // Dropping the reactor closes the queue and releases whatever never ran.
        })?;
        debug!(thread = %name, "loop thread spawned");
        Ok(LoopThread { queuer, join })
    }

    pub fn handle(&self) -> Queuer {
        self.queuer.clone()
    }

    /// Stops the loop after its current dispatch and waits for the thread. Records still queued
    /// are released without running.
    ///
    /// Errors with the panic payload if a record panicked on the loop thread.
    pub fn shutdown(self) -> thread::Result<()> {
        self.queuer.quit();
        self.join()
    }

    /// Waits for the loop to finish on its own, which happens once every other handle is dropped.
    pub fn join(self) -> thread::Result<()> {
        let LoopThread { queuer, join } = self;
        drop(queuer);
        join.join()
    }
}

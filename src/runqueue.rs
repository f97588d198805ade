use std::cell::Cell;
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::mem;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use boxfnonce::SendBoxFnOnce;
use tracing::{debug, trace, warn};

use crate::config::LoopConfig;
use crate::error::LoopError;
use crate::schedule::{Priority, Scheduler};

/// A queued call: created on the registering thread, consumed by exactly one dispatch.
pub type Record = SendBoxFnOnce<'static, ()>;

struct State<T> {
    queues: [VecDeque<T>; 3],
    senders: usize,
    quit: bool,
    closed: bool,
    loop_thread: Option<ThreadId>,
}

impl<T> State<T> {
    fn pending(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }

    fn pop(&mut self) -> Option<T> {
        self.queues.iter_mut().find_map(|q| q.pop_front())
    }
}

struct Buffer<T> {
    state: Mutex<State<T>>,
    ready: Condvar,
    max_pending: Option<usize>,
}

impl<T> Buffer<T> {
    // Callbacks never run under this lock, so a poisoned lock still holds a consistent queue.
    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct Sender<T> {
    buffer: Arc<Buffer<T>>,
}

impl<T> Sender<T> {
    fn send(&self, priority: Priority, t: T) -> Result<(), LoopError> {
        let mut state = self.buffer.lock();
        if state.closed {
            warn!(?priority, "registration rejected, loop is closed");
            return Err(LoopError::Closed);
        }
        let pending = state.pending();
        if let Some(max) = self.buffer.max_pending {
            if pending >= max {
                warn!(?priority, pending, "registration rejected, queue is full");
                return Err(LoopError::QueueFull(pending));
            }
        }
        state.queues[priority.index()].push_back(t);
        trace!(?priority, pending = pending + 1, "record enqueued");
        drop(state);
        self.buffer.ready.notify_one();
        Ok(())
    }
}

impl<T> Clone for Sender<T> {
    fn clone(&self) -> Self {
        self.buffer.lock().senders += 1;
        Sender {
            buffer: Arc::clone(&self.buffer),
        }
    }
}

impl<T> Drop for Sender<T> {
    fn drop(&mut self) {
        let mut state = self.buffer.lock();
        state.senders -= 1;
        if state.senders == 0 {
            drop(state);
            self.buffer.ready.notify_all();
        }
    }
}

struct Receiver<T> {
    buffer: Arc<Buffer<T>>,
}

impl<T> Receiver<T> {
    fn receive(&self) -> Option<T> {
        self.buffer.lock().pop()
    }

    // Blocks until something is queued. Returns None once a quit is requested, or once every
    // sender is gone and the queue has drained.
    fn wait(&self) -> Option<T> {
        let mut state = self.buffer.lock();
        loop {
            if state.quit {
                state.quit = false;
                return None;
            }
            if let Some(t) = state.pop() {
                return Some(t);
            }
            if state.senders == 0 {
                return None;
            }
            state = self
                .buffer
                .ready
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

fn make_channel<T>(max_pending: Option<usize>) -> (Sender<T>, Receiver<T>) {
    let b = Arc::new(Buffer {
        state: Mutex::new(State {
            queues: [VecDeque::new(), VecDeque::new(), VecDeque::new()],
            senders: 1,
            quit: false,
            closed: false,
            loop_thread: None,
        }),
        ready: Condvar::new(),
        max_pending,
    });
    (
        Sender {
            buffer: Arc::clone(&b),
        },
        Receiver { buffer: b },
    )
}

/// Handle for registering calls with a `Reactor`. Cheap to clone, usable from any thread.
#[derive(Clone)]
pub struct Queuer {
    sender: Sender<Record>,
}

impl Scheduler for Queuer {
    fn schedule_with<F>(&self, priority: Priority, f: F) -> Result<(), LoopError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.sender.send(priority, Record::from(f))
    }
}

impl Queuer {
    /// Asks a blocking `Reactor::run` to return once the current dispatch finishes.
    ///
    /// Records still queued stay queued.
    pub fn quit(&self) {
        self.sender.buffer.lock().quit = true;
        self.sender.buffer.ready.notify_all();
    }

    /// True when called from the thread currently dispatching the reactor.
    pub fn is_loop_thread(&self) -> bool {
        self.sender.buffer.lock().loop_thread == Some(thread::current().id())
    }

    /// Records registered but not yet dispatched.
    pub fn pending(&self) -> usize {
        self.sender.buffer.lock().pending()
    }
}

struct Entered<'r> {
    buffer: &'r Buffer<Record>,
    previous: Option<ThreadId>,
}

impl Drop for Entered<'_> {
    fn drop(&mut self) {
        self.buffer.lock().loop_thread = self.previous;
    }
}

/// The loop side of a run queue. Owned by exactly one thread at a time.
pub struct Reactor {
    receiver: Receiver<Record>,
    _not_sync: PhantomData<Cell<()>>,
}

impl Reactor {
    fn enter(&self) -> Entered<'_> {
        let buffer = &*self.receiver.buffer;
        let previous = mem::replace(&mut buffer.lock().loop_thread, Some(thread::current().id()));
        Entered { buffer, previous }
    }

    /// Dispatches queued records until none are left, including any queued by the records
    /// themselves. Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let _entered = self.enter();
        let mut ran = 0;
        while let Some(f) = self.receiver.receive() {
            trace!("dispatching record");
            f.call();
            ran += 1;
        }
        ran
    }

    /// Dispatches at most one record.
    pub fn dispatch_one(&self) -> bool {
        let _entered = self.enter();
        match self.receiver.receive() {
            Some(f) => {
                trace!("dispatching record");
                f.call();
                true
            }
            None => false,
        }
    }

    /// Blocks the current thread, dispatching records as they arrive, until `Queuer::quit` is
    /// called or every `Queuer` has been dropped and the queue is empty.
    ///
    /// A panicking record unwinds out of here; it has already left the queue.
    pub fn run(&self) {
        let _entered = self.enter();
        debug!("loop running");
        while let Some(f) = self.receiver.wait() {
            trace!("dispatching record");
            f.call();
        }
        debug!("loop stopped");
    }
}

impl Drop for Reactor {
    fn drop(&mut self) {
        let dropped: Vec<VecDeque<Record>> = {
            let mut state = self.receiver.buffer.lock();
            state.closed = true;
            state.queues.iter_mut().map(mem::take).collect()
        };
        let count: usize = dropped.iter().map(VecDeque::len).sum();
        if count > 0 {
            debug!(count, "loop closed, releasing records that never ran");
        }
    }
}

pub fn make_runqueue() -> (Queuer, Reactor) {
    make_runqueue_with(&LoopConfig::default())
}

pub fn make_runqueue_with(config: &LoopConfig) -> (Queuer, Reactor) {
    let (sdr, rcv) = make_channel::<Record>(config.max_pending);
    (
        Queuer { sender: sdr },
        Reactor {
            receiver: rcv,
            _not_sync: PhantomData,
        },
    )
}

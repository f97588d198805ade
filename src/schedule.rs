use crate::error::LoopError;

// Dispatch priority of a queued record.
//
// The loop always drains the highest non-empty priority first; records of equal priority run in
// the order they were registered. `Idle` work only runs once nothing more urgent is waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    High,
    Default,
    Idle,
}

impl Priority {
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

// Trait that schedules a FnOnce to run once on the thread driving some loop.
//
// Registration may happen from any thread. The FnOnce is never run inline; it runs on a later
// dispatch of the loop, after which it is dropped.
//
// Note: anything captured by the FnOnce must be owned, since the caller's stack is long gone by
// the time it runs.
pub trait Scheduler: Clone {
    fn schedule_with<F>(&self, priority: Priority, f: F) -> Result<(), LoopError>
    where
        F: FnOnce() + Send + 'static;

    fn schedule<F>(&self, f: F) -> Result<(), LoopError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.schedule_with(Priority::Default, f)
    }
}

#[cfg(test)]
mod tests {
    use super::Priority;

    #[test]
    fn priorities_order_high_first() {
        assert!(Priority::High < Priority::Default);
        assert!(Priority::Default < Priority::Idle);
        assert_eq!(0, Priority::High.index());
        assert_eq!(2, Priority::Idle.index());
    }
}

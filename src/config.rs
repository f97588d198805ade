/// Settings for a run queue and the thread that drives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopConfig {
    /// Name given to the thread spawned by `LoopThread::spawn`.
    pub thread_name: String,
    /// Registrations beyond this many pending records are rejected. `None` = unbounded.
    pub max_pending: Option<usize>,
}

impl Default for LoopConfig {
    fn default() -> Self {
        LoopConfig {
            thread_name: "idle-loop".to_string(),
            max_pending: None,
        }
    }
}

impl LoopConfig {
    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    pub fn with_max_pending(mut self, max: usize) -> Self {
        self.max_pending = Some(max);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::LoopConfig;

    #[test]
    fn defaults_are_unbounded() {
        let c = LoopConfig::default();
        assert_eq!("idle-loop", c.thread_name);
        assert_eq!(None, c.max_pending);
    }

    #[test]
    fn builder_overrides() {
        let c = LoopConfig::default().with_thread_name("ui").with_max_pending(4);
        assert_eq!("ui", c.thread_name);
        assert_eq!(Some(4), c.max_pending);
    }
}

//! Configuration for the background statement queue.

use std::time::Duration;

/// Configuration for [`SqlQueue`](crate::SqlQueue).
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// How long the worker sleeps when the queue is empty.
    pub poll_interval: Duration,
    /// Whether statements queued before [`SqlQueue::stop`](crate::SqlQueue::stop)
    /// still run before the worker exits.
    pub drain_on_stop: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            drain_on_stop: true,
        }
    }
}

impl QueueConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the empty-queue polling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set whether pending statements run on stop.
    pub fn with_drain_on_stop(mut self, drain: bool) -> Self {
        self.drain_on_stop = drain;
        self
    }
}

//! Per-session ordered event log.

use std::collections::VecDeque;

use crate::domain::event::LiveEvent;

/// Append-only log of one session's events.
///
/// With a capacity the oldest events are evicted first; without one the log
/// keeps everything for the life of the process.
#[derive(Debug, Clone)]
pub(super) struct EventLog {
    events: VecDeque<LiveEvent>,
    capacity: Option<usize>,
}

impl EventLog {
    pub(super) fn new(capacity: Option<usize>) -> Self {
        Self {
            events: VecDeque::new(),
            capacity,
        }
    }

    pub(super) fn push(&mut self, event: LiveEvent) {
        if let Some(capacity) = self.capacity {
            while self.events.len() >= capacity {
                self.events.pop_front();
            }
        }
        self.events.push_back(event);
    }

    /// The newest `limit` events in recording order.
    pub(super) fn recent(&self, limit: usize) -> Vec<LiveEvent> {
        let skip = self.events.len().saturating_sub(limit);
        self.events.iter().skip(skip).cloned().collect()
    }

    #[cfg(test)]
    pub(super) fn len(&self) -> usize {
        self.events.len()
    }
}

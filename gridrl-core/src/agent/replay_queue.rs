use super::DynamicQTable;
use crate::TransitionInformation;
use std::collections::VecDeque;

/// Bounded history of recent transitions.
///
/// Every replay walks the whole queue from the newest to the oldest transition
/// and backs up each one again, so rewards propagate several steps back at once.
#[derive(Debug, Clone)]
pub struct ReplayQueue {
    capacity: usize,
    transitions: VecDeque<TransitionInformation>,
}

impl ReplayQueue {
    /// Constructs an empty queue. A capacity of zero disables replay.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            transitions: VecDeque::with_capacity(capacity),
        }
    }

    /// Appends a transition, evicting the oldest one on overflow.
    pub fn push(&mut self, transition: TransitionInformation) {
        if self.capacity == 0 {
            return;
        }
        if self.transitions.len() == self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Backs up every queued transition in reverse chronological order.
    pub fn replay(&self, table: &mut DynamicQTable, discount_rate: f64) {
        for t in self.transitions.iter().rev() {
            table.backup(t, discount_rate);
        }
    }

    /// Number of queued transitions.
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Maximum number of queued transitions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Queued transitions from the oldest to the newest.
    pub fn iter(&self) -> impl Iterator<Item = &TransitionInformation> {
        self.transitions.iter()
    }
}

//! Interrupts waiting for delivery on the next dispatcher tick.

/// Ordered, append-only list of interrupt numbers awaiting delivery.
///
/// Entries are not deduplicated: pending the same enabled interrupt twice
/// before a tick delivers it twice.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PendingQueue {
    entries: Vec<i32>,
}

impl PendingQueue {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends `irqn` in arrival order.
    pub fn push(&mut self, irqn: i32) {
        self.entries.push(irqn);
    }

    /// Returns `true` when nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of queued entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Queued entries in current order.
    #[must_use]
    pub fn as_slice(&self) -> &[i32] {
        &self.entries
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Takes every entry in arrival order, leaving the queue empty.
    pub fn take(&mut self) -> Vec<i32> {
        std::mem::take(&mut self.entries)
    }

    /// Puts `entries` back ahead of anything queued since they were taken.
    pub fn requeue_front(&mut self, entries: &[i32]) {
        self.entries.splice(0..0, entries.iter().copied());
    }
}

#[cfg(test)]
mod tests {
    use super::PendingQueue;

    #[test]
    fn duplicates_are_kept_in_arrival_order() {
        let mut queue = PendingQueue::new();
        queue.push(4);
        queue.push(4);
        queue.push(1);
        assert_eq!(queue.as_slice(), &[4, 4, 1]);
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn take_empties_queue_in_arrival_order() {
        let mut queue = PendingQueue::new();
        for irqn in [5, 2, 9, 3] {
            queue.push(irqn);
        }
        assert_eq!(queue.take(), vec![5, 2, 9, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn requeue_front_preserves_order_ahead_of_new_entries() {
        let mut queue = PendingQueue::new();
        queue.push(7);
        queue.requeue_front(&[1, 2]);
        assert_eq!(queue.as_slice(), &[1, 2, 7]);
        queue.clear();
        assert!(queue.is_empty());
    }
}

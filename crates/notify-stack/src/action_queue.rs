//! Ordered action queue with a concurrency of one.
//!
//! Every operation that moves windows or changes the visible stack (show,
//! close, and the re-stacking animation a close triggers) is pushed here and
//! executed by the engine strictly in submission order. The engine pops the
//! next action only after the previous one, including any animation it
//! awaited, has fully completed. Two actions therefore never observe the
//! stack at the same time.

use std::collections::VecDeque;

/// FIFO of pending actions.
///
/// Unbounded: the engine bounds what it pushes (shows by the admission
/// limit, closes coalesced per notification id).
#[derive(Debug)]
pub struct ActionQueue<A> {
    pending: VecDeque<A>,
}

impl<A> Default for ActionQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> ActionQueue<A> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
        }
    }

    pub fn push(&mut self, action: A) {
        self.pending.push_back(action);
    }

    /// Next action to execute, oldest first.
    pub fn pop(&mut self) -> Option<A> {
        self.pending.pop_front()
    }

    /// Drop every pending action without running it.
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }

    /// Remove every pending action, oldest first, so the caller can salvage some.
    pub fn drain(&mut self) -> impl Iterator<Item = A> + '_ {
        self.pending.drain(..)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_submission_order() {
        let mut queue = ActionQueue::new();
        for n in 1..=3 {
            queue.push(n);
        }
        assert_eq!(queue.pop(), Some(1));
        queue.push(4);
        assert_eq!(queue.pop(), Some(2));
        assert_eq!(queue.pop(), Some(3));
        assert_eq!(queue.pop(), Some(4));
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_accepts_long_bursts() {
        let mut queue = ActionQueue::new();
        for n in 0..1000 {
            queue.push(n);
        }
        assert_eq!(queue.len(), 1000);
        assert_eq!(queue.pop(), Some(0));
    }

    #[test]
    fn test_clear_drops_pending() {
        let mut queue = ActionQueue::new();
        queue.push(1);
        queue.push(2);
        assert_eq!(queue.clear(), 2);
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), None);
    }

    #[test]
    fn test_drain_keeps_order() {
        let mut queue = ActionQueue::new();
        queue.push('x');
        queue.push('y');
        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained, vec!['x', 'y']);
        assert!(queue.is_empty());
    }
}

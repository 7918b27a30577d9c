//! Single-shot delayed actions
//!
//! Stands in for toolkit timers: actions are queued with a delay and handed
//! back once due, so the UI can finish layout before a position is applied.
//! Entries never repeat and cannot be cancelled.

use std::time::{Duration, Instant};

#[derive(Debug)]
struct Scheduled<A> {
    due: Instant,
    seq: u64,
    action: A,
}

#[derive(Debug)]
pub struct DeferredQueue<A> {
    entries: Vec<Scheduled<A>>,
    next_seq: u64,
}

impl<A> Default for DeferredQueue<A> {
    fn default() -> Self {
        Self { entries: Vec::new(), next_seq: 0 }
    }
}

impl<A> DeferredQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Instant, delay: Duration, action: A) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Scheduled { due: now + delay, seq, action });
    }

    /// Removes and returns every action due at `now`, earliest first; ties
    /// keep scheduling order.
    pub fn take_due(&mut self, now: Instant) -> Vec<A> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|entry| entry.due <= now);
        self.entries = pending;

        due.sort_by_key(|entry| (entry.due, entry.seq));
        due.into_iter().map(|entry| entry.action).collect()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.entries.iter().map(|entry| entry.due).min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_fire_once_when_due() {
        let start = Instant::now();
        let mut queue = DeferredQueue::new();
        queue.schedule(start, Duration::from_millis(500), "restore");

        assert!(queue.take_due(start + Duration::from_millis(499)).is_empty());
        assert_eq!(queue.take_due(start + Duration::from_millis(500)), vec!["restore"]);
        assert!(queue.take_due(start + Duration::from_secs(10)).is_empty());
        assert_eq!(queue.next_deadline(), None);
    }

    #[test]
    fn due_actions_come_back_in_deadline_then_insertion_order() {
        let start = Instant::now();
        let mut queue = DeferredQueue::new();
        queue.schedule(start, Duration::from_millis(300), "late");
        queue.schedule(start, Duration::from_millis(100), "first");
        queue.schedule(start, Duration::from_millis(100), "second");

        assert_eq!(queue.next_deadline(), Some(start + Duration::from_millis(100)));
        assert_eq!(
            queue.take_due(start + Duration::from_secs(1)),
            vec!["first", "second", "late"]
        );
    }

    #[test]
    fn pending_actions_survive_partial_drain() {
        let start = Instant::now();
        let mut queue = DeferredQueue::new();
        queue.schedule(start, Duration::from_millis(100), 1);
        queue.schedule(start, Duration::from_millis(1000), 2);

        assert_eq!(queue.take_due(start + Duration::from_millis(200)), vec![1]);
        assert_eq!(queue.next_deadline(), Some(start + Duration::from_millis(1000)));
        assert_eq!(queue.take_due(start + Duration::from_millis(1000)), vec![2]);
        assert_eq!(queue.next_deadline(), None);
    }
}

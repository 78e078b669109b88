//! A virtual-clock timer queue (`setTimeout` without a real clock).
//!
//! The embedder owns time: [`TimerQueue::advance`] moves the clock forward and hands back every
//! task that came due, in due order. Tasks scheduled with the same due time fire in scheduling
//! order.
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Pending<T> {
    id: TimerId,
    due: Duration,
    task: T,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    now: Duration,
    next_id: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the queue was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule(&mut self, delay: Duration, task: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: self.now.saturating_add(delay),
            task,
        });
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let idx = self.pending.iter().position(|p| p.id == id)?;
        Some(self.pending.remove(idx).task)
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Delay until the earliest pending task is due.
    pub fn time_until_next(&self) -> Option<Duration> {
        self.pending
            .iter()
            .map(|p| p.due.saturating_sub(self.now))
            .min()
    }

    /// Moves the clock forward by `by` and drains every task due at or before the new time.
    pub fn advance(&mut self, by: Duration) -> Vec<T> {
        self.now = self.now.saturating_add(by);
        let now = self.now;

        let (mut due, rest): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending).into_iter().partition(|p| p.due <= now);
        self.pending = rest;

        due.sort_by_key(|p| (p.due, p.id));
        due.into_iter().map(|p| p.task).collect()
    }
}

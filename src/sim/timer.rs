//! Deferred timers on the simulation loop
//!
//! Countdown ticks, star spawns and banner durations are timers on one
//! queue, drained synchronously each tick. Every timer has a handle that
//! can be cancelled; nothing runs on another thread.
//!
//! Usage per tick:
//! ```
//! # use circle_keeper::sim::TimerQueue;
//! let mut timers = TimerQueue::new();
//! timers.schedule(0.5, "ding");
//! timers.advance(1.0);
//! while let Some((_handle, event)) = timers.pop_due() {
//!     assert_eq!(event, "ding");
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Tolerance for "due now" comparisons
const DUE_EPSILON: f64 = 1e-9;

/// Handle to a scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Entry<E> {
    handle: TimerHandle,
    due: f64,
    /// Period for repeating timers
    interval: Option<f64>,
    /// Tie-break for timers due at the same instant
    seq: u64,
    event: E,
}

/// Single-threaded timer queue
#[derive(Debug, Clone)]
pub struct TimerQueue<E> {
    /// Time the host has advanced to
    clock: f64,
    /// Time of the timer being fired (or `clock` once drained)
    now: f64,
    next_handle: u64,
    next_seq: u64,
    entries: Vec<Entry<E>>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self {
            clock: 0.0,
            now: 0.0,
            next_handle: 1,
            next_seq: 0,
            entries: Vec::new(),
        }
    }
}

impl<E: Clone> TimerQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time in seconds
    ///
    /// While draining, this is the due time of the timer just fired, so
    /// timers scheduled from a handler chain without drift.
    pub fn now(&self) -> f64 {
        self.now
    }

    /// Fire `event` once after `delay` seconds
    pub fn schedule(&mut self, delay: f32, event: E) -> TimerHandle {
        self.push(delay as f64, None, event)
    }

    /// Fire `event` every `interval` seconds, first after one interval
    pub fn schedule_repeating(&mut self, interval: f32, event: E) -> TimerHandle {
        let interval = interval as f64;
        self.push(interval, Some(interval), event)
    }

    fn push(&mut self, delay: f64, interval: Option<f64>, event: E) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        let seq = self.bump_seq();
        self.entries.push(Entry {
            handle,
            due: self.now + delay.max(0.0),
            interval,
            seq,
            event,
        });
        handle
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Cancel a timer; returns false if it already fired or was cancelled
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        before != self.entries.len()
    }

    /// Whether the timer is still pending
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.entries.iter().any(|e| e.handle == handle)
    }

    /// Pending events, in no particular order
    pub fn pending(&self) -> impl Iterator<Item = &E> {
        self.entries.iter().map(|e| &e.event)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move the clock forward; call [`pop_due`](Self::pop_due) to fire
    pub fn advance(&mut self, dt: f32) {
        self.clock += dt as f64;
    }

    /// Fire the earliest due timer, if any
    ///
    /// Ordered by due time, then scheduling order. Repeating timers are
    /// re-armed one interval later, so a long frame fires them more than
    /// once.
    pub fn pop_due(&mut self) -> Option<(TimerHandle, E)> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= self.clock + DUE_EPSILON)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i);

        let Some(idx) = idx else {
            self.now = self.clock;
            return None;
        };

        self.now = self.now.max(self.entries[idx].due);
        let fired = match self.entries[idx].interval {
            Some(interval) => {
                let seq = self.bump_seq();
                let entry = &mut self.entries[idx];
                entry.due += interval;
                entry.seq = seq;
                (entry.handle, entry.event.clone())
            }
            None => {
                let entry = self.entries.remove(idx);
                (entry.handle, entry.event)
            }
        };
        Some(fired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(timers: &mut TimerQueue<&'static str>) -> Vec<&'static str> {
        std::iter::from_fn(|| timers.pop_due().map(|(_, e)| e)).collect()
    }

    #[test]
    fn test_fires_in_due_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(2.0, "late");
        timers.schedule(1.0, "early");
        timers.schedule(1.0, "early-second");

        timers.advance(0.5);
        assert!(drain(&mut timers).is_empty());

        timers.advance(2.0);
        assert_eq!(drain(&mut timers), vec!["early", "early-second", "late"]);
        assert!(timers.is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut timers = TimerQueue::new();
        let h = timers.schedule(1.0, "never");
        assert!(timers.is_pending(h));
        assert!(timers.cancel(h));
        assert!(!timers.cancel(h));
        timers.advance(5.0);
        assert!(drain(&mut timers).is_empty());
    }

    #[test]
    fn test_repeating_counts() {
        let mut timers = TimerQueue::new();
        let h = timers.schedule_repeating(2.0, "star");
        let mut fired = 0;
        for _ in 0..(7 * 120) {
            timers.advance(1.0 / 120.0);
            fired += drain(&mut timers).len();
        }
        assert_eq!(fired, 3);
        assert!(timers.is_pending(h));
    }

    #[test]
    fn test_repeating_catches_up_on_long_frame() {
        let mut timers = TimerQueue::new();
        timers.schedule_repeating(1.0, "tick");
        timers.advance(3.5);
        assert_eq!(drain(&mut timers).len(), 3);
    }

    #[test]
    fn test_chained_schedule_uses_fire_time() {
        let mut timers = TimerQueue::new();
        timers.schedule(1.0, "first");
        timers.advance(1.75);
        let (_, event) = timers.pop_due().unwrap();
        assert_eq!(event, "first");
        assert!((timers.now() - 1.0).abs() < 1e-9);

        // Chained from the handler: due at 2.0, not 2.75
        timers.schedule(1.0, "second");
        assert!(timers.pop_due().is_none());
        timers.advance(0.25);
        assert_eq!(drain(&mut timers), vec!["second"]);
    }
}

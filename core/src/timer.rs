use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Identifies one scheduled timer. Handles are unique for the lifetime of
/// their queue and are never reused, so a handle kept past cancellation can
/// only ever miss.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

/// Scheduling capability handed to the session, so the rules never touch a
/// real clock. Hosts decide what "time" means: wall time in a frontend,
/// synthetic time in tests.
pub trait Scheduler {
    /// Arms a timer that fires once after `after`.
    fn schedule_once(&mut self, after: Duration) -> TimerHandle;

    /// Arms a timer that fires every `every`, starting one period from now.
    fn schedule_repeating(&mut self, every: Duration) -> TimerHandle;

    /// Disarms a timer. Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
}

#[derive(Copy, Clone, Debug, Serialize, Deserialize)]
struct TimerEntry {
    handle: TimerHandle,
    due: Duration,
    period: Option<Duration>,
}

/// Virtual-time [`Scheduler`]: nothing fires until the host moves time
/// forward with [`advance`](TimerQueue::advance), passing either measured or
/// synthetic elapsed time.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TimerQueue {
    now: Duration,
    last_handle: u64,
    entries: Vec<TimerEntry>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual time accumulated so far.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_idle(&self) -> bool {
        self.entries.is_empty()
    }

    /// Time until the earliest pending timer, `None` when nothing is armed.
    /// Hosts use this to block exactly as long as it stays uneventful.
    pub fn next_due(&self) -> Option<Duration> {
        self.entries
            .iter()
            .map(|entry| entry.due.saturating_sub(self.now))
            .min()
    }

    /// Moves virtual time forward by `dt` and returns every handle that came
    /// due, in due order. Repeating timers re-arm as they fire, so a large
    /// `dt` yields one handle per elapsed period.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerHandle> {
        let target = self.now + dt;
        let mut fired = Vec::new();

        loop {
            let due_idx = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, entry)| entry.due <= target)
                .min_by_key(|&(idx, entry)| (entry.due, idx))
                .map(|(idx, _)| idx);
            let Some(idx) = due_idx else { break };

            fired.push(self.entries[idx].handle);
            match self.entries[idx].period {
                Some(period) => self.entries[idx].due += period,
                None => {
                    self.entries.remove(idx);
                }
            }
        }

        self.now = target;
        fired
    }

    fn push(&mut self, after: Duration, period: Option<Duration>) -> TimerHandle {
        self.last_handle += 1;
        let handle = TimerHandle(self.last_handle);
        // a zero period would never drain; treat it as one-shot
        let period = period.filter(|period| !period.is_zero());
        self.entries.push(TimerEntry {
            handle,
            due: self.now + after,
            period,
        });
        handle
    }
}

impl Scheduler for TimerQueue {
    fn schedule_once(&mut self, after: Duration) -> TimerHandle {
        self.push(after, None)
    }

    fn schedule_repeating(&mut self, every: Duration) -> TimerHandle {
        self.push(every, Some(every))
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.entries.retain(|entry| entry.handle != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn one_shot_fires_once_at_its_due_time() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule_once(500 * MS);

        assert_eq!(queue.advance(499 * MS), vec![]);
        assert_eq!(queue.advance(MS), vec![handle]);
        assert_eq!(queue.advance(1000 * MS), vec![]);
        assert!(queue.is_idle());
    }

    #[test]
    fn repeating_timer_rearms_each_period() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule_repeating(1000 * MS);

        assert_eq!(queue.advance(1000 * MS), vec![handle]);
        assert_eq!(queue.advance(1000 * MS), vec![handle]);
        assert!(!queue.is_idle());
    }

    #[test]
    fn large_advance_yields_one_fire_per_elapsed_period() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule_repeating(1000 * MS);

        assert_eq!(queue.advance(3500 * MS), vec![handle, handle, handle]);
        assert_eq!(queue.next_due(), Some(500 * MS));
    }

    #[test]
    fn timers_fire_in_due_order() {
        let mut queue = TimerQueue::new();
        let slow = queue.schedule_once(700 * MS);
        let tick = queue.schedule_repeating(300 * MS);

        assert_eq!(queue.advance(1000 * MS), vec![tick, tick, slow, tick]);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule_once(100 * MS);
        queue.cancel(handle);

        assert_eq!(queue.advance(1000 * MS), vec![]);
        assert!(queue.is_idle());
    }

    #[test]
    fn cancelling_an_expired_handle_is_harmless() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule_once(100 * MS);
        queue.advance(100 * MS);

        queue.cancel(handle);
        assert!(queue.is_idle());
    }

    #[test]
    fn handles_are_never_reused() {
        let mut queue = TimerQueue::new();
        let first = queue.schedule_once(100 * MS);
        queue.advance(100 * MS);
        let second = queue.schedule_once(100 * MS);

        assert_ne!(first, second);
    }

    #[test]
    fn next_due_tracks_the_earliest_timer() {
        let mut queue = TimerQueue::new();
        assert_eq!(queue.next_due(), None);

        queue.schedule_once(700 * MS);
        queue.schedule_once(300 * MS);
        assert_eq!(queue.next_due(), Some(300 * MS));

        queue.advance(200 * MS);
        assert_eq!(queue.next_due(), Some(100 * MS));
    }
}

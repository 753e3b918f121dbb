//! Single-slot scheduled task with token-based cancellation
//!
//! Scheduling a new payload supersedes the pending one: its token is no
//! longer current, so a late `take_due` can never hand it out.

use std::time::{Duration, Instant};

/// Generation counter identifying one scheduled payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token(u64);

#[derive(Debug, Clone)]
struct Pending<T> {
    token: Token,
    due: Instant,
    payload: T,
}

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    generation: u64,
    slot: Option<Pending<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            slot: None,
        }
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `payload` to become due `delay` after `now`, replacing
    /// whatever was pending
    pub fn schedule(&mut self, payload: T, delay: Duration, now: Instant) -> Token {
        self.generation += 1;
        let token = Token(self.generation);
        self.slot = Some(Pending {
            token,
            due: now + delay,
            payload,
        });
        token
    }

    /// Drop the pending payload, if any. Returns whether one was dropped.
    pub fn cancel(&mut self) -> bool {
        self.generation += 1;
        self.slot.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    pub fn pending(&self) -> Option<&T> {
        self.slot.as_ref().map(|p| &p.payload)
    }

    pub fn is_current(&self, token: Token) -> bool {
        self.slot.as_ref().is_some_and(|p| p.token == token)
    }

    /// Time left until the pending payload is due
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.slot
            .as_ref()
            .map(|p| p.due.saturating_duration_since(now))
    }

    /// Hand out the payload once it is due
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.slot {
            Some(p) if p.due <= now => self.slot.take().map(|p| p.payload),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_300: Duration = Duration::from_millis(300);

    #[test]
    fn test_payload_is_due_after_delay() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(2, MS_300, start);

        assert_eq!(scheduler.take_due(start + Duration::from_millis(299)), None);
        assert!(scheduler.is_pending());
        assert_eq!(scheduler.take_due(start + MS_300), Some(2));
        assert!(!scheduler.is_pending());
        assert_eq!(scheduler.take_due(start + MS_300 * 2), None);
    }

    #[test]
    fn test_new_schedule_supersedes_pending() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        let first = scheduler.schedule(2, MS_300, start);
        let second = scheduler.schedule(3, MS_300, start + Duration::from_millis(100));

        assert!(!scheduler.is_current(first));
        assert!(scheduler.is_current(second));
        // The first deadline passes without firing anything
        assert_eq!(scheduler.take_due(start + MS_300), None);
        assert_eq!(scheduler.take_due(start + Duration::from_millis(400)), Some(3));
    }

    #[test]
    fn test_cancel_invalidates_token() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        let token = scheduler.schedule("reset", MS_300, start);

        assert!(scheduler.cancel());
        assert!(!scheduler.is_current(token));
        assert!(!scheduler.cancel());
        assert_eq!(scheduler.take_due(start + MS_300), None);
    }

    #[test]
    fn test_remaining_saturates() {
        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        assert_eq!(scheduler.remaining(start), None);
        scheduler.schedule((), MS_300, start);
        assert_eq!(scheduler.remaining(start), Some(MS_300));
        assert_eq!(scheduler.remaining(start + MS_300 * 2), Some(Duration::ZERO));
    }
}

//! Self-pacing for the detection loop.
//!
//! A cycle that takes `elapsed` is followed by a pause of
//! `max(0, interval - elapsed)`, so the loop runs at the target rate when
//! detection is fast and back-to-back (never overlapping) when it is slow.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticker {
    interval: Duration,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Ticker { interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Pause before the next cycle, given how long this one took.
    pub fn next_delay(&self, elapsed: Duration) -> Duration {
        self.interval.saturating_sub(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_cycles_wait_out_the_interval() {
        let t = Ticker::new(Duration::from_millis(33));
        assert_eq!(t.next_delay(Duration::from_millis(8)), Duration::from_millis(25));
        assert_eq!(t.next_delay(Duration::ZERO), Duration::from_millis(33));
    }

    #[test]
    fn slow_cycles_do_not_wait() {
        let t = Ticker::new(Duration::from_millis(33));
        assert_eq!(t.next_delay(Duration::from_millis(33)), Duration::ZERO);
        assert_eq!(t.next_delay(Duration::from_millis(90)), Duration::ZERO);
    }
}

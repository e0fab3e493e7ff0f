//! Timing utilities for evaluation phases.

use std::time::{Duration, Instant};

/// RAII timer that adds the elapsed time to a slot when dropped, so early
/// returns out of a phase are still counted.
///
/// ```rust,ignore
/// let mut resolve = Duration::ZERO;
/// {
///     let _timer = PhaseTimer::new(&mut resolve);
///     // ... look up the user ...
/// }
/// ```
pub struct PhaseTimer<'a> {
    start: Instant,
    slot: &'a mut Duration,
}

impl<'a> PhaseTimer<'a> {
    pub fn new(slot: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            slot,
        }
    }
}

impl Drop for PhaseTimer<'_> {
    fn drop(&mut self) {
        *self.slot += self.start.elapsed();
    }
}

/// Per-phase durations of one evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseDurations {
    pub parse: Duration,
    pub resolve: Duration,
    pub matching: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_phase_timer_records_elapsed() {
        let mut duration = Duration::ZERO;
        {
            let _timer = PhaseTimer::new(&mut duration);
            thread::sleep(Duration::from_millis(10));
        }
        assert!(duration.as_millis() >= 10);
    }

    #[test]
    fn test_phase_timer_accumulates() {
        let mut duration = Duration::ZERO;
        for _ in 0..3 {
            let _timer = PhaseTimer::new(&mut duration);
            thread::sleep(Duration::from_millis(5));
        }
        assert!(duration.as_millis() >= 15);
    }

    #[test]
    fn test_phase_timer_records_on_early_return() {
        fn fallible(slot: &mut Duration) -> Result<(), ()> {
            let _timer = PhaseTimer::new(slot);
            thread::sleep(Duration::from_millis(2));
            Err(())
        }

        let mut duration = Duration::ZERO;
        assert!(fallible(&mut duration).is_err());
        assert!(duration.as_millis() >= 2);
    }
}

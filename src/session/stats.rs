use std::time::{Duration, Instant};

/// Counters for the running process only; never persisted.
///
/// Fields are private so `total == correct + incorrect` cannot be broken
/// from outside.
#[derive(Clone, Debug)]
pub struct SessionStats {
    correct: u32,
    incorrect: u32,
    total: u32,
    started_at: Instant,
}

impl SessionStats {
    pub fn new(started_at: Instant) -> Self {
        Self {
            correct: 0,
            incorrect: 0,
            total: 0,
            started_at,
        }
    }

    pub fn record(&mut self, correct: bool) {
        if correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
        self.total += 1;
    }

    pub fn correct(&self) -> u32 {
        self.correct
    }

    pub fn incorrect(&self) -> u32 {
        self.incorrect
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Rounded percentage of correct judgements, 0 before the first one.
    pub fn accuracy_percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.correct as f64 / self.total as f64 * 100.0).round() as u32
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    pub fn elapsed_minutes(&self, now: Instant) -> u64 {
        self.elapsed(now).as_secs() / 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_track_both_counters() {
        let mut stats = SessionStats::new(Instant::now());
        for correct in [true, false, true, true, false] {
            stats.record(correct);
            assert_eq!(stats.total(), stats.correct() + stats.incorrect());
        }
        assert_eq!(stats.correct(), 3);
        assert_eq!(stats.incorrect(), 2);
    }

    #[test]
    fn accuracy_is_rounded_and_zero_when_empty() {
        let mut stats = SessionStats::new(Instant::now());
        assert_eq!(stats.accuracy_percent(), 0);
        stats.record(true);
        stats.record(true);
        stats.record(false);
        assert_eq!(stats.accuracy_percent(), 67);
    }

    #[test]
    fn elapsed_minutes_truncates() {
        let t0 = Instant::now();
        let stats = SessionStats::new(t0);
        assert_eq!(stats.elapsed_minutes(t0 + Duration::from_secs(119)), 1);
        assert_eq!(stats.elapsed_minutes(t0), 0);
    }
}

use std::time::{Duration, Instant};

/// Wall-clock countdown toward a deadline.
///
/// While paused the deadline is dropped and only the remaining duration is
/// kept; resuming sets a fresh deadline from the resume instant, so time spent
/// paused never counts against the session.
#[derive(Debug, Clone, Copy)]
pub struct Countdown {
    total: Duration,
    state: State,
}

#[derive(Debug, Clone, Copy)]
enum State {
    Running { end_time: Instant },
    Paused { remaining: Duration },
}

impl Countdown {
    pub fn start(now: Instant, total: Duration) -> Self {
        Self {
            total,
            state: State::Running { end_time: now + total },
        }
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, State::Paused { .. })
    }

    #[cfg(test)]
    pub fn end_time(&self) -> Option<Instant> {
        match self.state {
            State::Running { end_time } => Some(end_time),
            State::Paused { .. } => None,
        }
    }

    pub fn remaining(&self, now: Instant) -> Duration {
        match self.state {
            State::Running { end_time } => end_time.saturating_duration_since(now),
            State::Paused { remaining } => remaining,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        !self.is_paused() && self.remaining(now).is_zero()
    }

    pub fn pause(&mut self, now: Instant) {
        if let State::Running { .. } = self.state {
            self.state = State::Paused { remaining: self.remaining(now) };
        }
    }

    pub fn resume(&mut self, now: Instant) {
        if let State::Paused { remaining } = self.state {
            self.state = State::Running { end_time: now + remaining };
        }
    }

    pub fn progress_ratio(&self, now: Instant) -> f64 {
        let total = self.total.as_secs_f64();
        if total == 0.0 {
            return 1.0;
        }
        (1.0 - self.remaining(now).as_secs_f64() / total).clamp(0.0, 1.0)
    }
}

/// Whole seconds left, rounded up so `00:00` is only shown once the deadline passes.
pub fn display_secs(remaining: Duration) -> u64 {
    let secs = remaining.as_secs();
    if remaining.subsec_nanos() > 0 { secs + 1 } else { secs }
}

pub fn format_time(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEC: Duration = Duration::from_secs(1);

    #[test]
    fn test_remaining_counts_down() {
        let t0 = Instant::now();
        let c = Countdown::start(t0, 10 * SEC);
        assert_eq!(c.remaining(t0), 10 * SEC);
        assert_eq!(c.remaining(t0 + 4 * SEC), 6 * SEC);
        assert!(!c.is_expired(t0 + 9 * SEC));
        assert!(c.is_expired(t0 + 10 * SEC));
        assert_eq!(c.remaining(t0 + 30 * SEC), Duration::ZERO);
    }

    #[test]
    fn test_pause_shifts_deadline_by_paused_time() {
        let t0 = Instant::now();
        let mut c = Countdown::start(t0, 60 * SEC);

        c.pause(t0 + 20 * SEC);
        assert!(c.is_paused());
        assert_eq!(c.remaining(t0 + 500 * SEC), 40 * SEC);
        assert!(!c.is_expired(t0 + 500 * SEC));

        c.resume(t0 + 320 * SEC);
        assert_eq!(c.end_time(), Some(t0 + 360 * SEC));
        assert_eq!(c.remaining(t0 + 340 * SEC), 20 * SEC);
        assert!(c.is_expired(t0 + 360 * SEC));
    }

    #[test]
    fn test_total_wall_clock_includes_pause_exactly() {
        let t0 = Instant::now();
        let mut c = Countdown::start(t0, 25 * SEC);
        c.pause(t0 + 5 * SEC);
        c.resume(t0 + 12 * SEC);
        c.pause(t0 + 15 * SEC);
        c.resume(t0 + 18 * SEC);

        // 25s of countdown plus 7s and 3s paused.
        assert_eq!(c.end_time(), Some(t0 + 35 * SEC));
    }

    #[test]
    fn test_pause_and_resume_are_idempotent() {
        let t0 = Instant::now();
        let mut c = Countdown::start(t0, 10 * SEC);
        c.resume(t0 + SEC);
        assert_eq!(c.end_time(), Some(t0 + 10 * SEC));

        c.pause(t0 + 2 * SEC);
        c.pause(t0 + 5 * SEC);
        assert_eq!(c.remaining(t0 + 9 * SEC), 8 * SEC);
    }

    #[test]
    fn test_progress_ratio() {
        let t0 = Instant::now();
        let c = Countdown::start(t0, 100 * SEC);
        assert_eq!(c.progress_ratio(t0), 0.0);
        assert!((c.progress_ratio(t0 + 25 * SEC) - 0.25).abs() < 1e-9);
        assert_eq!(c.progress_ratio(t0 + 200 * SEC), 1.0);
    }

    #[test]
    fn test_display_secs_rounds_up() {
        assert_eq!(display_secs(Duration::from_millis(1)), 1);
        assert_eq!(display_secs(Duration::from_millis(59_001)), 60);
        assert_eq!(display_secs(Duration::from_secs(3)), 3);
        assert_eq!(display_secs(Duration::ZERO), 0);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(25 * 60), "25:00");
        assert_eq!(format_time(100 * 60 + 9), "100:09");
    }
}

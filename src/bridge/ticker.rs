use std::time::{Duration, Instant};

/// Fixed-period timer polled from the UI thread's frame loop.
#[derive(Debug, Clone)]
pub struct StateTicker {
    period: Duration,
    next_due: Option<Instant>,
}

impl StateTicker {
    pub fn new(period: Duration) -> Self {
        StateTicker {
            period,
            next_due: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// True once per elapsed period. A late poll does not fire a burst of
    /// catch-up ticks.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        let mut next = due + self.period;
        if next <= now {
            next = now + self.period;
        }
        self.next_due = Some(next);
        true
    }

    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_per_period() {
        let start = Instant::now();
        let period = Duration::from_millis(200);
        let mut ticker = StateTicker::new(period);
        assert!(!ticker.poll(start));

        ticker.start(start);
        assert!(!ticker.poll(start + Duration::from_millis(199)));
        assert!(ticker.poll(start + period));
        assert!(!ticker.poll(start + period));
        assert!(ticker.poll(start + period * 2));
    }

    #[test]
    fn test_late_poll_does_not_burst() {
        let start = Instant::now();
        let period = Duration::from_millis(200);
        let mut ticker = StateTicker::new(period);
        ticker.start(start);

        let late = start + Duration::from_millis(1_000);
        assert!(ticker.poll(late));
        assert!(!ticker.poll(late));
        assert_eq!(ticker.time_until_due(late), Some(period));
    }

    #[test]
    fn test_stopped_ticker_never_fires() {
        let start = Instant::now();
        let mut ticker = StateTicker::new(Duration::from_millis(10));
        ticker.start(start);
        ticker.stop();
        assert!(!ticker.is_running());
        assert!(!ticker.poll(start + Duration::from_secs(5)));
        assert_eq!(ticker.time_until_due(start), None);
    }
}

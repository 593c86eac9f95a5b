//! Rate-limited gates.
//!
//! A [`Throttle`] opens at most once per interval. The first check always
//! opens; later checks open only once the interval has elapsed since the last
//! time the gate opened.

use std::time::{Duration, Instant};

#[derive(Clone, Debug)]
pub struct Throttle {
    interval: Duration,
    last_opened: Option<Instant>,
}

impl Throttle {
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_opened: None,
        }
    }

    /// Returns true and re-arms the gate when it is open at `now`.
    pub fn ready(&mut self, now: Instant) -> bool {
        match self.last_opened {
            Some(last) if now.saturating_duration_since(last) < self.interval => false,
            _ => {
                self.last_opened = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_once_per_interval() {
        let start = Instant::now();
        let mut throttle = Throttle::new(Duration::from_secs(1));

        assert!(throttle.ready(start));
        assert!(!throttle.ready(start + Duration::from_millis(999)));
        assert!(throttle.ready(start + Duration::from_secs(1)));
        assert!(!throttle.ready(start + Duration::from_millis(1500)));
    }
}

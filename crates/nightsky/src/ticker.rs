//! Fixed-rate frame scheduling.
//!
//! Terminals have no display-refresh callback, so frames are paced by a
//! fixed interval derived from the configured frame rate.

use std::time::{Duration, Instant};

/// How long to wait for input when no frame is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Hands out frame deadlines at a fixed rate.
#[derive(Debug, Clone)]
pub struct FrameTicker {
    interval: Duration,
    next: Option<Instant>,
}

impl FrameTicker {
    pub fn new(fps: u32) -> Self {
        Self {
            interval: Duration::from_secs(1) / fps.max(1),
            next: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Schedule the first frame for `now`.
    pub fn start(&mut self, now: Instant) {
        self.next = Some(now);
    }

    /// Cancel the pending frame; no frame is due until the next start.
    pub fn stop(&mut self) {
        self.next = None;
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    /// Time left until the next frame is due.
    pub fn timeout(&self, now: Instant) -> Duration {
        self.next
            .map(|next| next.saturating_duration_since(now))
            .unwrap_or(IDLE_POLL)
    }

    /// True if a frame is due at `now`; schedules the one after it.
    ///
    /// After a stall the schedule restarts from `now` instead of
    /// rendering the missed frames back to back.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(next) = self.next else {
            return false;
        };
        if now < next {
            return false;
        }

        let following = next + self.interval;
        self.next = Some(if following <= now {
            now + self.interval
        } else {
            following
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_from_fps() {
        assert_eq!(FrameTicker::new(50).interval(), Duration::from_millis(20));
        assert_eq!(FrameTicker::new(0).interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_not_running_until_started() {
        let mut ticker = FrameTicker::new(30);
        let now = Instant::now();
        assert!(!ticker.is_running());
        assert!(!ticker.tick(now));
        assert_eq!(ticker.timeout(now), IDLE_POLL);
    }

    #[test]
    fn test_ticks_at_fixed_rate() {
        let mut ticker = FrameTicker::new(50);
        let t0 = Instant::now();
        ticker.start(t0);

        assert!(ticker.tick(t0));
        assert!(!ticker.tick(t0 + Duration::from_millis(10)));
        assert_eq!(
            ticker.timeout(t0 + Duration::from_millis(10)),
            Duration::from_millis(10)
        );
        assert!(ticker.tick(t0 + Duration::from_millis(20)));
        assert!(!ticker.tick(t0 + Duration::from_millis(21)));
    }

    #[test]
    fn test_stall_does_not_burst() {
        let mut ticker = FrameTicker::new(50);
        let t0 = Instant::now();
        ticker.start(t0);
        assert!(ticker.tick(t0));

        let late = t0 + Duration::from_millis(500);
        assert!(ticker.tick(late));
        assert!(!ticker.tick(late + Duration::from_millis(1)));
        assert!(ticker.tick(late + Duration::from_millis(20)));
    }

    #[test]
    fn test_stop_cancels_pending_frame() {
        let mut ticker = FrameTicker::new(30);
        let t0 = Instant::now();
        ticker.start(t0);
        ticker.stop();
        assert!(!ticker.tick(t0 + Duration::from_secs(1)));
        assert!(!ticker.is_running());
    }
}

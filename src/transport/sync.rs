//! Seek bar synchronisation.
//!
//! While playing, the seek bar is refreshed from the engine every `interval`.
//! Pressing the bar suspends refreshes until release, which yields exactly one
//! seek target.

use std::time::{Duration, Instant};

/// Seek bar range; the bar shows a percentage.
pub const SLIDER_MAX: u8 = 100;

/// Percentage of `position` within `duration`, bounded to `0..=100`.
/// Zero when the duration is unknown or zero.
pub fn percent(position: Duration, duration: Duration) -> u8 {
    if duration.is_zero() {
        return 0;
    }
    let pct = position.as_millis().saturating_mul(100) / duration.as_millis().max(1);
    pct.min(u128::from(SLIDER_MAX)) as u8
}

/// Offset a slider value maps to: `value * duration / max`.
pub fn target_position(value: u8, duration: Duration) -> Duration {
    let value = u128::from(value.min(SLIDER_MAX));
    let millis = value * duration.as_millis() / u128::from(SLIDER_MAX);
    Duration::from_millis(millis as u64)
}

/// Slider value under column `x` of a bar `width` cells wide.
pub fn slider_value_at(x: u16, width: u16) -> u8 {
    if width <= 1 {
        return 0;
    }
    let x = u32::from(x.min(width - 1));
    let span = u32::from(width - 1);
    (u32::from(SLIDER_MAX) * x / span) as u8
}

/// Format as `MM:SS`.
pub fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[derive(Debug, Clone)]
pub struct PositionSync {
    interval: Duration,
    running: bool,
    dragging: bool,
    next_due: Option<Instant>,
    value: u8,
}

impl PositionSync {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            running: false,
            dragging: false,
            next_due: None,
            value: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Current seek bar value, 0-100.
    pub fn value(&self) -> u8 {
        self.value
    }

    /// Start (or keep) polling; the first poll is due immediately.
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.next_due = None;
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.next_due = None;
    }

    /// Stop and return the bar to zero.
    pub fn reset(&mut self) {
        self.stop();
        self.dragging = false;
        self.value = 0;
    }

    /// True when a poll should happen at `now`. Consumes the slot.
    pub fn due(&mut self, now: Instant) -> bool {
        if !self.running || self.dragging {
            return false;
        }
        match self.next_due {
            Some(t) if now < t => false,
            _ => {
                self.next_due = Some(now + self.interval);
                true
            }
        }
    }

    /// How long the caller may sleep before the next poll.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        if !self.running || self.dragging {
            return None;
        }
        Some(
            self.next_due
                .map_or(Duration::ZERO, |t| t.saturating_duration_since(now)),
        )
    }

    /// Push a fresh engine reading into the bar.
    pub fn update(&mut self, position: Duration, duration: Option<Duration>) -> u8 {
        if !self.dragging {
            self.value = duration.map_or(0, |d| percent(position, d));
        }
        self.value
    }

    /// The bar was pressed: suspend polling.
    pub fn press(&mut self) {
        self.dragging = true;
    }

    /// The bar moved under the pointer.
    pub fn drag_to(&mut self, value: u8) {
        self.value = value.min(SLIDER_MAX);
    }

    /// The bar was released: resume polling and return the seek target.
    pub fn release(&mut self, duration: Option<Duration>) -> Option<Duration> {
        self.dragging = false;
        self.next_due = None;
        duration.map(|d| target_position(self.value, d))
    }

    /// `MM:SS / MM:SS` for the slider value against `duration`.
    pub fn preview(&self, duration: Option<Duration>) -> Option<String> {
        duration.map(|d| {
            format!(
                "{} / {}",
                format_mmss(target_position(self.value, d)),
                format_mmss(d)
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn percent_is_zero_for_zero_duration() {
        assert_eq!(percent(ms(0), ms(0)), 0);
        assert_eq!(percent(ms(5_000), Duration::ZERO), 0);
    }

    #[test]
    fn percent_is_bounded_and_monotonic() {
        let duration = ms(180_000);
        let mut last = 0;
        for pos in (0..=200_000).step_by(1_250) {
            let p = percent(ms(pos), duration);
            assert!(p <= 100);
            assert!(p >= last, "percent went backwards at {pos}ms");
            last = p;
        }
        assert_eq!(percent(duration, duration), 100);
        assert_eq!(percent(ms(250_000), duration), 100);
        assert_eq!(percent(ms(90_000), duration), 50);
    }

    #[test]
    fn percent_does_not_overflow_on_huge_values() {
        assert_eq!(percent(Duration::MAX, Duration::MAX), 100);
        assert_eq!(percent(Duration::MAX, ms(1)), 100);
    }

    #[test]
    fn target_position_scales_slider_value() {
        assert_eq!(target_position(0, ms(200_000)), ms(0));
        assert_eq!(target_position(25, ms(200_000)), ms(50_000));
        assert_eq!(target_position(100, ms(200_000)), ms(200_000));
        assert_eq!(target_position(200, ms(200_000)), ms(200_000));
        assert_eq!(target_position(50, Duration::ZERO), ms(0));
    }

    #[test]
    fn slider_value_maps_columns_linearly() {
        assert_eq!(slider_value_at(0, 101), 0);
        assert_eq!(slider_value_at(50, 101), 50);
        assert_eq!(slider_value_at(100, 101), 100);
        assert_eq!(slider_value_at(500, 101), 100);
        assert_eq!(slider_value_at(3, 0), 0);
        assert_eq!(slider_value_at(0, 1), 0);
    }

    #[test]
    fn due_fires_once_per_interval_while_running() {
        let t0 = Instant::now();
        let mut sync = PositionSync::new(ms(100));
        assert!(!sync.due(t0));

        sync.start();
        assert!(sync.due(t0));
        assert!(!sync.due(t0 + ms(50)));
        assert_eq!(sync.time_until_due(t0 + ms(50)), Some(ms(50)));
        assert!(sync.due(t0 + ms(100)));

        sync.stop();
        assert!(!sync.due(t0 + ms(500)));
        assert_eq!(sync.time_until_due(t0), None);
    }

    #[test]
    fn dragging_suspends_polling_and_release_yields_target() {
        let t0 = Instant::now();
        let mut sync = PositionSync::new(ms(100));
        sync.start();
        sync.update(ms(30_000), Some(ms(60_000)));
        assert_eq!(sync.value(), 50);

        sync.press();
        assert!(!sync.due(t0));
        sync.drag_to(75);
        // Readings while dragging must not move the bar under the pointer.
        sync.update(ms(31_000), Some(ms(60_000)));
        assert_eq!(sync.value(), 75);
        assert_eq!(sync.preview(Some(ms(60_000))).as_deref(), Some("00:45 / 01:00"));

        assert_eq!(sync.release(Some(ms(60_000))), Some(ms(45_000)));
        assert!(!sync.is_dragging());
        assert!(sync.due(t0));
    }

    #[test]
    fn release_without_duration_has_no_target() {
        let mut sync = PositionSync::new(ms(100));
        sync.press();
        sync.drag_to(40);
        assert_eq!(sync.release(None), None);
    }

    #[test]
    fn reset_returns_bar_to_zero() {
        let mut sync = PositionSync::new(ms(100));
        sync.start();
        sync.update(ms(10), Some(ms(20)));
        sync.reset();
        assert_eq!(sync.value(), 0);
        assert!(!sync.is_running());
    }

    #[test]
    fn format_mmss_pads_minutes_and_seconds() {
        assert_eq!(format_mmss(Duration::from_secs(0)), "00:00");
        assert_eq!(format_mmss(Duration::from_secs(65)), "01:05");
        assert_eq!(format_mmss(Duration::from_secs(3_600)), "60:00");
    }
}

//! Wall-clock playback position.
//!
//! The output sink does not report an offset that survives seeking, so the
//! position is derived from when playback (re)started plus what had already
//! been played before the last pause or seek.

use std::time::{Duration, Instant};

#[derive(Debug, Default, Clone)]
pub struct PlaybackClock {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl PlaybackClock {
    pub fn elapsed_at(&self, now: Instant) -> Duration {
        self.accumulated
            + self
                .started_at
                .map_or(Duration::ZERO, |st| now.saturating_duration_since(st))
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed_at(Instant::now())
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn start_at(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn pause_at(&mut self, now: Instant) {
        if let Some(st) = self.started_at.take() {
            self.accumulated += now.saturating_duration_since(st);
        }
    }

    /// Jump to `position`; a running clock keeps running from there.
    pub fn set_at(&mut self, position: Duration, now: Instant) {
        self.accumulated = position;
        if self.started_at.is_some() {
            self.started_at = Some(now);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

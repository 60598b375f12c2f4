use super::clock::PlaybackClock;
use std::time::{Duration, Instant};

#[test]
fn clock_accumulates_across_pauses() {
    let t0 = Instant::now();
    let mut clock = PlaybackClock::default();
    assert_eq!(clock.elapsed_at(t0), Duration::ZERO);

    clock.start_at(t0);
    assert!(clock.is_running());
    clock.pause_at(t0 + Duration::from_secs(3));
    assert!(!clock.is_running());

    // Paused time does not count.
    assert_eq!(clock.elapsed_at(t0 + Duration::from_secs(60)), Duration::from_secs(3));

    clock.start_at(t0 + Duration::from_secs(60));
    assert_eq!(clock.elapsed_at(t0 + Duration::from_secs(62)), Duration::from_secs(5));
}

#[test]
fn clock_start_is_idempotent() {
    let t0 = Instant::now();
    let mut clock = PlaybackClock::default();
    clock.start_at(t0);
    clock.start_at(t0 + Duration::from_secs(10));
    assert_eq!(clock.elapsed_at(t0 + Duration::from_secs(10)), Duration::from_secs(10));
}

#[test]
fn clock_seek_keeps_running_state() {
    let t0 = Instant::now();
    let mut clock = PlaybackClock::default();

    clock.set_at(Duration::from_secs(30), t0);
    assert!(!clock.is_running());
    assert_eq!(clock.elapsed_at(t0 + Duration::from_secs(5)), Duration::from_secs(30));

    clock.start_at(t0);
    clock.set_at(Duration::from_secs(10), t0 + Duration::from_secs(4));
    assert_eq!(clock.elapsed_at(t0 + Duration::from_secs(6)), Duration::from_secs(12));

    clock.reset();
    assert_eq!(clock.elapsed_at(t0), Duration::ZERO);
}

use super::*;
use crate::audio::MediaEngine;
use crate::config::{LoopModeSetting, Settings};
use crate::error::{Error, Result};
use crate::library::Track;
use crate::playlist::Playlist;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Open(PathBuf),
    Play,
    Pause,
    Stop,
    Seek(Duration),
    Volume(u8),
}

/// Records every call; tracks are 60 s long unless they are named `bad.*`.
#[derive(Default)]
struct FakeEngine {
    calls: Vec<Call>,
    loaded: bool,
    position: Duration,
    finished: bool,
}

impl FakeEngine {
    fn take_calls(&mut self) -> Vec<Call> {
        std::mem::take(&mut self.calls)
    }
}

impl MediaEngine for FakeEngine {
    fn open(&mut self, path: &Path, _hint: Option<Duration>) -> Result<Option<Duration>> {
        self.calls.push(Call::Open(path.to_path_buf()));
        if path.file_stem().and_then(|s| s.to_str()) == Some("bad") {
            return Err(Error::NoMedia);
        }
        self.loaded = true;
        self.position = Duration::ZERO;
        self.finished = false;
        Ok(Some(Duration::from_secs(60)))
    }

    fn play(&mut self) {
        self.calls.push(Call::Play);
    }

    fn pause(&mut self) {
        self.calls.push(Call::Pause);
    }

    fn stop(&mut self) {
        self.calls.push(Call::Stop);
        self.loaded = false;
        self.position = Duration::ZERO;
    }

    fn set_position(&mut self, position: Duration) -> Result<()> {
        self.calls.push(Call::Seek(position));
        self.position = position;
        Ok(())
    }

    fn set_volume(&mut self, volume: u8) {
        self.calls.push(Call::Volume(volume));
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn duration(&self) -> Option<Duration> {
        self.loaded.then_some(Duration::from_secs(60))
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

fn settings() -> Settings {
    Settings::default()
}

fn transport_with(settings: &Settings) -> Transport<FakeEngine> {
    let mut t = Transport::new(FakeEngine::default(), settings);
    t.engine_mut().take_calls();
    t
}

fn transport() -> Transport<FakeEngine> {
    transport_with(&settings())
}

fn playlist(names: &[&str]) -> Playlist {
    Playlist::from_tracks(
        names
            .iter()
            .map(|n| Track::bare(format!("/music/{n}")))
            .collect(),
    )
}

fn path(name: &str) -> PathBuf {
    PathBuf::from(format!("/music/{name}"))
}

#[test]
fn new_applies_configured_volume_and_loop_mode() {
    let mut s = settings();
    s.audio.volume = 80;
    s.playback.loop_mode = LoopModeSetting::LoopOne;
    let t = Transport::new(FakeEngine::default(), &s);
    assert_eq!(t.volume(), 80);
    assert_eq!(t.loop_mode(), LoopMode::LoopOne);
    assert_eq!(t.engine().calls, vec![Call::Volume(80)]);
    assert_eq!(t.state(), PlaybackState::Stopped);
}

#[test]
fn play_from_stopped_loads_first_track_and_starts_sync() {
    let mut t = transport();
    let mut p = playlist(&["a.mp3", "b.mp3"]);

    t.play(&mut p).unwrap();
    assert_eq!(t.state(), PlaybackState::Playing);
    assert_eq!(p.cursor(), Some(0));
    assert!(t.sync().is_running());
    assert_eq!(t.loaded(), Some(path("a.mp3").as_path()));
    assert_eq!(t.engine().calls, vec![Call::Open(path("a.mp3")), Call::Play]);
}

#[test]
fn play_on_empty_playlist_is_an_error_and_stays_stopped() {
    let mut t = transport();
    let mut p = Playlist::new();
    assert!(matches!(t.play(&mut p), Err(Error::NoMedia)));
    assert_eq!(t.state(), PlaybackState::Stopped);
    assert!(t.engine().calls.is_empty());
}

#[test]
fn pause_and_resume_toggle_between_playing_and_paused() {
    let mut t = transport();
    let mut p = playlist(&["a.mp3"]);
    t.play(&mut p).unwrap();
    t.engine_mut().take_calls();

    t.pause();
    assert_eq!(t.state(), PlaybackState::Paused);
    assert!(!t.sync().is_running());

    t.play(&mut p).unwrap();
    assert_eq!(t.state(), PlaybackState::Playing);
    assert!(t.sync().is_running());

    // Resuming must not reload the media.
    assert_eq!(t.engine().calls, vec![Call::Pause, Call::Play]);
}

#[test]
fn pause_when_not_playing_is_a_no_op() {
    let mut t = transport();
    t.pause();
    assert_eq!(t.state(), PlaybackState::Stopped);
    assert!(t.engine().calls.is_empty());
}

#[test]
fn toggle_walks_the_state_table() {
    let mut t = transport();
    let mut p = playlist(&["a.mp3"]);
    t.toggle(&mut p).unwrap();
    assert_eq!(t.state(), PlaybackState::Playing);
    t.toggle(&mut p).unwrap();
    assert_eq!(t.state(), PlaybackState::Paused);
    t.toggle(&mut p).unwrap();
    assert_eq!(t.state(), PlaybackState::Playing);
}

#[test]
fn stop_from_any_state_resets_sync_and_keeps_cursor() {
    for pause_first in [false, true] {
        let mut t = transport();
        let mut p = playlist(&["a.mp3", "b.mp3"]);
        t.play_index(&mut p, 1).unwrap();
        if pause_first {
            t.pause();
        }
        t.stop();
        assert_eq!(t.state(), PlaybackState::Stopped);
        assert!(!t.sync().is_running());
        assert_eq!(t.sync().value(), 0);
        assert_eq!(t.loaded(), None);
        assert_eq!(p.cursor(), Some(1));
    }
}

#[test]
fn failed_load_leaves_transport_stopped() {
    let mut t = transport();
    let mut p = playlist(&["bad.mp3", "b.mp3"]);
    assert!(t.play(&mut p).is_err());
    assert_eq!(t.state(), PlaybackState::Stopped);
    assert!(!t.sync().is_running());
    assert_eq!(t.loaded(), None);
}

#[test]
fn play_index_out_of_range_is_rejected() {
    let mut t = transport();
    let mut p = playlist(&["a.mp3"]);
    assert!(t.play_index(&mut p, 4).is_err());
    assert_eq!(p.cursor(), None);
}

#[test]
fn next_and_previous_stop_at_the_ends_without_repeat() {
    let mut t = transport();
    let mut p = playlist(&["a.mp3", "b.mp3"]);
    t.play_index(&mut p, 1).unwrap();

    assert_eq!(t.next(&mut p).unwrap(), None);
    assert_eq!(p.cursor(), Some(1));

    assert_eq!(t.previous(&mut p).unwrap(), Some(0));
    assert_eq!(t.previous(&mut p).unwrap(), None);
    assert_eq!(p.cursor(), Some(0));
    assert_eq!(t.state(), PlaybackState::Playing);
}

#[test]
fn next_wraps_when_repeat_is_on() {
    let mut t = transport();
    let mut p = playlist(&["a.mp3", "b.mp3"]);
    assert_eq!(t.toggle_repeat(), LoopMode::LoopAll);
    t.play_index(&mut p, 1).unwrap();

    assert_eq!(t.next(&mut p).unwrap(), Some(0));
    assert_eq!(t.loaded(), Some(path("a.mp3").as_path()));
    assert_eq!(t.previous(&mut p).unwrap(), Some(1));
}

#[test]
fn repeat_toggle_and_cycle() {
    let mut t = transport();
    assert_eq!(t.loop_mode(), LoopMode::NoLoop);
    assert_eq!(t.toggle_repeat(), LoopMode::LoopAll);
    assert_eq!(t.toggle_repeat(), LoopMode::NoLoop);

    assert_eq!(t.cycle_loop_mode(), LoopMode::LoopAll);
    assert_eq!(t.cycle_loop_mode(), LoopMode::LoopOne);
    assert!(t.loop_mode().is_repeating());
    assert_eq!(t.toggle_repeat(), LoopMode::NoLoop);
}

#[test]
fn end_of_track_stops_by_default() {
    let mut t = transport();
    let mut p = playlist(&["a.mp3", "b.mp3"]);
    t.play(&mut p).unwrap();
    t.engine_mut().take_calls();

    t.engine_mut().finished = true;
    assert_eq!(t.tick(&mut p, Instant::now()).unwrap(), TickEvent::Finished);
    assert_eq!(t.state(), PlaybackState::Stopped);
    assert!(!t.sync().is_running());
    assert_eq!(t.loaded(), None);
    assert_eq!(p.cursor(), Some(0));
    assert_eq!(t.engine().calls, vec![Call::Stop]);
}

#[test]
fn end_of_track_advances_then_stops_at_playlist_end() {
    let mut s = settings();
    s.playback.auto_advance = true;
    let mut t = transport_with(&s);
    let mut p = playlist(&["a.mp3", "b.mp3"]);
    t.play(&mut p).unwrap();
    let now = Instant::now();

    t.engine_mut().finished = true;
    assert_eq!(t.tick(&mut p, now).unwrap(), TickEvent::Advanced(1));
    assert_eq!(t.state(), PlaybackState::Playing);

    t.engine_mut().finished = true;
    assert_eq!(t.tick(&mut p, now).unwrap(), TickEvent::Finished);
    assert_eq!(t.state(), PlaybackState::Stopped);
    assert!(!t.sync().is_running());
    assert_eq!(p.cursor(), Some(1));
}

#[test]
fn end_of_track_into_unplayable_file_returns_the_error() {
    let mut s = settings();
    s.playback.auto_advance = true;
    let mut t = transport_with(&s);
    let mut p = playlist(&["a.mp3", "bad.mp3", "c.mp3"]);
    t.play(&mut p).unwrap();

    t.engine_mut().finished = true;
    assert!(matches!(
        t.tick(&mut p, Instant::now()),
        Err(Error::NoMedia)
    ));
    assert_eq!(t.state(), PlaybackState::Stopped);
    assert!(!t.sync().is_running());
    assert_eq!(t.loaded(), None);
    assert_eq!(p.cursor(), Some(1));
}

#[test]
fn end_of_track_with_repeat_into_unplayable_file_returns_the_error() {
    let mut t = transport();
    t.toggle_repeat();
    let mut p = playlist(&["bad.mp3", "b.mp3"]);
    t.play_index(&mut p, 1).unwrap();

    t.engine_mut().finished = true;
    assert!(t.tick(&mut p, Instant::now()).is_err());
    assert_eq!(t.state(), PlaybackState::Stopped);
    assert_eq!(p.cursor(), Some(0));
}

#[test]
fn end_of_track_with_repeat_wraps_to_first() {
    let mut t = transport();
    t.toggle_repeat();
    let mut p = playlist(&["a.mp3", "b.mp3"]);
    t.play_index(&mut p, 1).unwrap();

    t.engine_mut().finished = true;
    assert_eq!(t.tick(&mut p, Instant::now()).unwrap(), TickEvent::Advanced(0));
    assert_eq!(t.state(), PlaybackState::Playing);
}

#[test]
fn end_of_track_with_repeat_one_replays_same_track() {
    let mut t = transport();
    t.cycle_loop_mode();
    t.cycle_loop_mode();
    let mut p = playlist(&["a.mp3", "b.mp3"]);
    t.play(&mut p).unwrap();
    t.engine_mut().take_calls();

    t.engine_mut().finished = true;
    assert_eq!(t.tick(&mut p, Instant::now()).unwrap(), TickEvent::Advanced(0));
    assert_eq!(
        t.engine().calls,
        vec![Call::Open(path("a.mp3")), Call::Play]
    );
}

#[test]
fn tick_syncs_seek_bar_only_while_playing() {
    let mut t = transport();
    let mut p = playlist(&["a.mp3"]);
    let now = Instant::now();
    assert_eq!(t.tick(&mut p, now).unwrap(), TickEvent::Idle);

    t.play(&mut p).unwrap();
    t.engine_mut().position = Duration::from_secs(15);
    assert_eq!(t.tick(&mut p, now).unwrap(), TickEvent::Synced(25));
    // Not due again until the interval passes.
    assert_eq!(t.tick(&mut p, now + Duration::from_millis(10)).unwrap(), TickEvent::Idle);
    assert_eq!(
        t.tick(&mut p, now + Duration::from_millis(100)).unwrap(),
        TickEvent::Synced(25)
    );

    t.pause();
    assert_eq!(t.tick(&mut p, now + Duration::from_secs(5)).unwrap(), TickEvent::Idle);
}

#[test]
fn seek_bar_drag_suspends_sync_and_release_seeks_and_plays() {
    let mut t = transport();
    let mut p = playlist(&["a.mp3"]);
    t.play(&mut p).unwrap();
    t.pause();
    t.engine_mut().take_calls();
    let now = Instant::now();

    t.begin_seek();
    t.drag_seek(50);
    assert_eq!(t.tick(&mut p, now).unwrap(), TickEvent::Idle);
    let snap = t.snapshot();
    assert!(snap.dragging);
    assert_eq!(snap.seek_preview.as_deref(), Some("00:30 / 01:00"));

    t.end_seek().unwrap();
    assert_eq!(
        t.engine().calls,
        vec![Call::Seek(Duration::from_secs(30)), Call::Play]
    );
    assert_eq!(t.state(), PlaybackState::Playing);
    assert!(t.sync().is_running());
    assert!(!t.sync().is_dragging());
}

#[test]
fn seek_release_without_media_resets_the_bar() {
    let mut t = transport();
    t.begin_seek();
    t.drag_seek(80);
    assert!(t.end_seek().is_err());
    assert_eq!(t.sync().value(), 0);
    assert_eq!(t.state(), PlaybackState::Stopped);
    assert!(t.engine().calls.is_empty());
}

#[test]
fn seek_to_percent_is_a_single_seek() {
    let mut t = transport();
    let mut p = playlist(&["a.mp3"]);
    t.play(&mut p).unwrap();
    t.engine_mut().take_calls();

    t.seek_to_percent(90).unwrap();
    assert_eq!(
        t.engine().calls,
        vec![Call::Seek(Duration::from_secs(54)), Call::Play]
    );
}

#[test]
fn seek_by_clamps_to_track_bounds() {
    let mut t = transport();
    let mut p = playlist(&["a.mp3"]);
    assert!(t.seek_by(5).is_err());

    t.play(&mut p).unwrap();
    t.engine_mut().position = Duration::from_secs(3);
    t.seek_by(-5).unwrap();
    assert_eq!(t.engine().position, Duration::ZERO);

    t.seek_by(500).unwrap();
    assert_eq!(t.engine().position, Duration::from_secs(60));
    assert_eq!(t.sync().value(), 100);
}

#[test]
fn seek_to_keeps_pause_and_updates_bar() {
    let mut t = transport();
    let mut p = playlist(&["a.mp3"]);
    assert!(matches!(
        t.seek_to(Duration::from_secs(1)),
        Err(Error::NoMedia)
    ));

    t.play(&mut p).unwrap();
    t.pause();
    t.engine_mut().take_calls();

    t.seek_to(Duration::from_secs(15)).unwrap();
    assert_eq!(t.state(), PlaybackState::Paused);
    assert_eq!(t.sync().value(), 25);
    assert_eq!(t.engine().calls, vec![Call::Seek(Duration::from_secs(15))]);
}

#[test]
fn volume_is_clamped() {
    let mut t = transport();
    t.set_volume(250);
    assert_eq!(t.volume(), 100);
    assert_eq!(t.change_volume(-30), 70);
    assert_eq!(t.change_volume(-200), 0);
    assert_eq!(t.change_volume(5), 5);
    assert_eq!(t.engine().calls.last(), Some(&Call::Volume(5)));
}

#[test]
fn removing_the_playing_track_stops_playback() {
    let mut t = transport();
    let mut p = playlist(&["a.mp3", "b.mp3", "c.mp3"]);
    t.play_index(&mut p, 1).unwrap();

    t.remove(&mut p, 0);
    assert_eq!(t.state(), PlaybackState::Playing);
    assert_eq!(p.cursor(), Some(0));

    let removed = t.remove(&mut p, 0).unwrap();
    assert_eq!(removed.display, "b.mp3");
    assert_eq!(t.state(), PlaybackState::Stopped);
    assert_eq!(p.cursor(), None);
}

#[test]
fn clear_stops_and_empties() {
    let mut t = transport();
    let mut p = playlist(&["a.mp3", "b.mp3"]);
    t.play(&mut p).unwrap();
    t.clear(&mut p);
    assert!(p.is_empty());
    assert_eq!(t.state(), PlaybackState::Stopped);
}

#[test]
fn shuffle_keeps_playing_track_current() {
    let mut t = transport();
    let names: Vec<String> = (0..10).map(|i| format!("{i}.mp3")).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut p = playlist(&refs);
    t.play_index(&mut p, 4).unwrap();

    t.shuffle(&mut p);
    assert_eq!(p.cursor(), Some(0));
    assert_eq!(p.current().unwrap().path, path("4.mp3"));
    assert_eq!(t.state(), PlaybackState::Playing);
}

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::audio::MediaEngine;
use crate::config::Settings;
use crate::error::{Error, Result};
use crate::library::Track;
use crate::playlist::{Playlist, Step};

use super::sync::PositionSync;
use super::types::{LoopMode, PlaybackState, TickEvent, TransportSnapshot};

/// Maps user commands onto playlist cursor moves and engine calls.
///
/// The seek bar poll runs exactly while the state is `Playing`.
pub struct Transport<E: MediaEngine> {
    engine: E,
    state: PlaybackState,
    loop_mode: LoopMode,
    volume: u8,
    auto_advance: bool,
    sync: PositionSync,
    loaded: Option<PathBuf>,
}

impl<E: MediaEngine> Transport<E> {
    pub fn new(engine: E, settings: &Settings) -> Self {
        let mut transport = Self {
            engine,
            state: PlaybackState::Stopped,
            loop_mode: settings.playback.loop_mode.into(),
            volume: 0,
            auto_advance: settings.playback.auto_advance,
            sync: PositionSync::new(Duration::from_millis(settings.playback.sync_interval_ms)),
            loaded: None,
        };
        transport.set_volume(settings.audio.volume);
        transport
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn sync(&self) -> &PositionSync {
        &self.sync
    }

    /// Path of the media currently loaded in the engine.
    pub fn loaded(&self) -> Option<&Path> {
        self.loaded.as_deref()
    }

    fn load(&mut self, playlist: &Playlist) -> Result<()> {
        let Some(track) = playlist.current() else {
            return Err(Error::NoMedia);
        };
        match self.engine.open(&track.path, track.duration) {
            Ok(duration) => {
                info!(path = %track.path.display(), ?duration, "loaded track");
                self.loaded = Some(track.path.clone());
                self.sync.reset();
                Ok(())
            }
            Err(e) => {
                warn!(path = %track.path.display(), error = %e, "cannot load track");
                self.engine.stop();
                self.loaded = None;
                self.state = PlaybackState::Stopped;
                self.sync.reset();
                Err(e)
            }
        }
    }

    fn start_playing(&mut self) {
        self.engine.play();
        self.state = PlaybackState::Playing;
        self.sync.start();
    }

    /// Stopped → load the cursor track (the first one if no cursor) and play;
    /// Paused → resume; Playing → nothing.
    pub fn play(&mut self, playlist: &mut Playlist) -> Result<()> {
        match self.state {
            PlaybackState::Playing => Ok(()),
            PlaybackState::Paused => {
                self.start_playing();
                debug!("resumed");
                Ok(())
            }
            PlaybackState::Stopped => {
                if playlist.cursor().is_none() && playlist.advance(Step::Forward, false).is_none() {
                    return Err(Error::NoMedia);
                }
                self.load(playlist)?;
                self.start_playing();
                Ok(())
            }
        }
    }

    /// Point the cursor at `index` and play it from the start.
    pub fn play_index(&mut self, playlist: &mut Playlist, index: usize) -> Result<()> {
        if index >= playlist.len() {
            return Err(Error::NoMedia);
        }
        playlist.select(index);
        self.load(playlist)?;
        self.start_playing();
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.engine.pause();
            self.state = PlaybackState::Paused;
            self.sync.stop();
            debug!("paused");
        }
    }

    pub fn toggle(&mut self, playlist: &mut Playlist) -> Result<()> {
        if self.state == PlaybackState::Playing {
            self.pause();
            Ok(())
        } else {
            self.play(playlist)
        }
    }

    /// Unload and return the seek bar to zero. The cursor is kept.
    pub fn stop(&mut self) {
        self.engine.stop();
        self.state = PlaybackState::Stopped;
        self.sync.reset();
        self.loaded = None;
        debug!("stopped");
    }

    fn step(&mut self, playlist: &mut Playlist, step: Step, wrap: bool) -> Result<Option<usize>> {
        match playlist.advance(step, wrap) {
            Some(i) => {
                self.load(playlist)?;
                self.start_playing();
                Ok(Some(i))
            }
            None => Ok(None),
        }
    }

    /// Play the following track. At the end this is a no-op unless repeating.
    pub fn next(&mut self, playlist: &mut Playlist) -> Result<Option<usize>> {
        let wrap = self.loop_mode == LoopMode::LoopAll;
        self.step(playlist, Step::Forward, wrap)
    }

    /// Play the preceding track. At the start this is a no-op unless repeating.
    pub fn previous(&mut self, playlist: &mut Playlist) -> Result<Option<usize>> {
        let wrap = self.loop_mode == LoopMode::LoopAll;
        self.step(playlist, Step::Back, wrap)
    }

    /// Current track first, rest randomized; playback is not interrupted.
    pub fn shuffle(&mut self, playlist: &mut Playlist) {
        playlist.shuffle();
        info!(tracks = playlist.len(), "shuffled playlist");
    }

    pub fn sort(&mut self, playlist: &mut Playlist) {
        playlist.sort();
        info!(tracks = playlist.len(), "sorted playlist");
    }

    /// Remove a track; removing the one being played stops playback.
    pub fn remove(&mut self, playlist: &mut Playlist, index: usize) -> Option<Track> {
        if playlist.cursor() == Some(index) {
            self.stop();
        }
        playlist.remove(index)
    }

    pub fn clear(&mut self, playlist: &mut Playlist) {
        self.stop();
        playlist.clear();
    }

    /// Flip the repeat flag (no-loop ↔ repeat all).
    pub fn toggle_repeat(&mut self) -> LoopMode {
        self.loop_mode = if self.loop_mode.is_repeating() {
            LoopMode::NoLoop
        } else {
            LoopMode::LoopAll
        };
        self.loop_mode
    }

    /// Cycle `NoLoop -> LoopAll -> LoopOne`.
    pub fn cycle_loop_mode(&mut self) -> LoopMode {
        self.loop_mode = match self.loop_mode {
            LoopMode::NoLoop => LoopMode::LoopAll,
            LoopMode::LoopAll => LoopMode::LoopOne,
            LoopMode::LoopOne => LoopMode::NoLoop,
        };
        self.loop_mode
    }

    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume.min(100);
        self.engine.set_volume(self.volume);
    }

    pub fn change_volume(&mut self, delta: i16) -> u8 {
        let v = (i16::from(self.volume) + delta).clamp(0, 100);
        self.set_volume(v as u8);
        self.volume
    }

    /// Scrub by `secs` (negative goes back), clamped to the track.
    pub fn seek_by(&mut self, secs: i64) -> Result<()> {
        if self.loaded.is_none() {
            return Err(Error::NoMedia);
        }
        let cur = self.engine.position();
        let step = Duration::from_secs(secs.unsigned_abs());
        let target = if secs < 0 {
            cur.saturating_sub(step)
        } else {
            cur.saturating_add(step)
        };
        self.seek_to(target)
    }

    /// Jump to an absolute offset, clamped to the track. The play state is
    /// kept.
    pub fn seek_to(&mut self, target: Duration) -> Result<()> {
        if self.loaded.is_none() {
            return Err(Error::NoMedia);
        }
        let target = match self.engine.duration() {
            Some(d) => target.min(d),
            None => target,
        };
        self.engine.set_position(target)?;
        self.sync.update(target, self.engine.duration());
        Ok(())
    }

    /// The seek bar was pressed.
    pub fn begin_seek(&mut self) {
        self.sync.press();
    }

    /// The seek bar is being dragged.
    pub fn drag_seek(&mut self, value: u8) {
        self.sync.drag_to(value);
    }

    /// The seek bar was released: one seek, then playback resumes.
    pub fn end_seek(&mut self) -> Result<()> {
        let target = self.sync.release(self.engine.duration());
        if self.loaded.is_none() {
            self.sync.reset();
            return Err(Error::NoMedia);
        }
        if let Some(target) = target {
            self.engine.set_position(target)?;
            debug!(?target, "seek bar released");
        }
        self.start_playing();
        Ok(())
    }

    /// Jump to a seek bar value without a drag.
    pub fn seek_to_percent(&mut self, value: u8) -> Result<()> {
        self.begin_seek();
        self.drag_seek(value);
        self.end_seek()
    }

    /// Advance the clockwork: handle end of track, then refresh the seek bar
    /// when a poll is due. A track that fails to load on the way to the next
    /// one leaves the transport stopped and the error is returned.
    pub fn tick(&mut self, playlist: &mut Playlist, now: Instant) -> Result<TickEvent> {
        if self.state == PlaybackState::Playing && self.engine.is_finished() {
            return self.on_track_end(playlist);
        }
        if self.sync.due(now) {
            let value = self
                .sync
                .update(self.engine.position(), self.engine.duration());
            return Ok(TickEvent::Synced(value));
        }
        Ok(TickEvent::Idle)
    }

    fn on_track_end(&mut self, playlist: &mut Playlist) -> Result<TickEvent> {
        let next = match self.loop_mode {
            LoopMode::LoopOne => playlist.cursor(),
            LoopMode::LoopAll => playlist.advance(Step::Forward, true),
            LoopMode::NoLoop if self.auto_advance => playlist.advance(Step::Forward, false),
            LoopMode::NoLoop => None,
        };

        match next {
            Some(i) => {
                self.load(playlist)?;
                self.start_playing();
                Ok(TickEvent::Advanced(i))
            }
            None => {
                info!("end of playback");
                self.stop();
                Ok(TickEvent::Finished)
            }
        }
    }

    /// How long the event loop may wait before the next `tick` matters.
    pub fn poll_timeout(&self, now: Instant) -> Option<Duration> {
        self.sync.time_until_due(now)
    }

    pub fn snapshot(&self) -> TransportSnapshot {
        let duration = self.engine.duration();
        TransportSnapshot {
            state: self.state,
            loop_mode: self.loop_mode,
            volume: self.volume,
            position: if self.loaded.is_some() {
                self.engine.position()
            } else {
                Duration::ZERO
            },
            duration,
            seek_value: self.sync.value(),
            dragging: self.sync.is_dragging(),
            seek_preview: if self.sync.is_dragging() {
                self.sync.preview(duration)
            } else {
                None
            },
        }
    }
}

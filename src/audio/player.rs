use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info};

use crate::error::{Error, Result};

use super::clock::PlaybackClock;
use super::engine::MediaEngine;
use super::sink::create_sink_at;

/// `rodio`-backed media engine.
///
/// Owns the output stream for its whole life; dropping the player closes the
/// audio device.
pub struct AudioPlayer {
    stream: OutputStream,
    sink: Option<Sink>,
    path: Option<PathBuf>,
    duration: Option<Duration>,
    volume: f32,
    clock: PlaybackClock,
}

impl AudioPlayer {
    pub fn new() -> Result<Self> {
        let mut stream = OutputStreamBuilder::open_default_stream()?;
        // rodio logs to stderr when the stream is dropped, which would land on
        // top of the terminal UI.
        stream.log_on_drop(false);
        info!("audio output opened");

        Ok(Self {
            stream,
            sink: None,
            path: None,
            duration: None,
            volume: 0.5,
            clock: PlaybackClock::default(),
        })
    }

    fn is_playing(&self) -> bool {
        self.clock.is_running()
    }
}

impl MediaEngine for AudioPlayer {
    fn open(&mut self, path: &Path, hint: Option<Duration>) -> Result<Option<Duration>> {
        let prepared = create_sink_at(&self.stream, path, Duration::ZERO, self.volume)?;

        if let Some(old) = self.sink.take() {
            old.stop();
        }
        self.sink = Some(prepared.sink);
        self.path = Some(path.to_path_buf());
        self.duration = prepared.total.or(hint);
        self.clock.reset();

        debug!(path = %path.display(), duration = ?self.duration, "media loaded");
        Ok(self.duration)
    }

    fn play(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.play();
            self.clock.start_at(Instant::now());
        }
    }

    fn pause(&mut self) {
        if let Some(s) = self.sink.as_ref() {
            s.pause();
            self.clock.pause_at(Instant::now());
        }
    }

    fn stop(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.path = None;
        self.duration = None;
        self.clock.reset();
    }

    fn set_position(&mut self, position: Duration) -> Result<()> {
        let Some(path) = self.path.clone() else {
            return Err(Error::NoMedia);
        };
        let position = match self.duration {
            Some(d) => position.min(d),
            None => position,
        };

        // Rebuild the sink and skip into the file.
        let prepared = create_sink_at(&self.stream, &path, position, self.volume)?;
        let playing = self.is_playing();
        if let Some(old) = self.sink.take() {
            old.stop();
        }
        if playing {
            prepared.sink.play();
        }
        self.sink = Some(prepared.sink);
        self.clock.set_at(position, Instant::now());
        debug!(?position, "seeked");
        Ok(())
    }

    fn set_volume(&mut self, volume: u8) {
        self.volume = f32::from(volume.min(100)) / 100.0;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(self.volume);
        }
    }

    fn position(&self) -> Duration {
        let elapsed = self.clock.elapsed();
        match self.duration {
            Some(d) => elapsed.min(d),
            None => elapsed,
        }
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn is_finished(&self) -> bool {
        self.is_playing() && self.sink.as_ref().is_some_and(|s| s.empty())
    }
}

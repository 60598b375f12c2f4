use std::time::Duration;

use crate::config::LoopModeSetting;

/// The playback state of the transport.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum LoopMode {
    /// Do not wrap at the end of the playlist.
    #[default]
    NoLoop,
    /// Wrap around to the start of the playlist (the repeat flag).
    LoopAll,
    /// Repeat the current track when it ends.
    LoopOne,
}

impl LoopMode {
    pub fn is_repeating(self) -> bool {
        self != LoopMode::NoLoop
    }

    pub fn label(self) -> &'static str {
        match self {
            LoopMode::NoLoop => "No-loop",
            LoopMode::LoopAll => "Repeat",
            LoopMode::LoopOne => "Repeat-one",
        }
    }
}

impl From<LoopModeSetting> for LoopMode {
    fn from(s: LoopModeSetting) -> Self {
        match s {
            LoopModeSetting::NoLoop => LoopMode::NoLoop,
            LoopModeSetting::LoopAll => LoopMode::LoopAll,
            LoopModeSetting::LoopOne => LoopMode::LoopOne,
        }
    }
}

/// What happened during a [`Transport::tick`](super::Transport::tick).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickEvent {
    /// Nothing to report.
    Idle,
    /// The seek bar was refreshed with this value.
    Synced(u8),
    /// The track ended and playback moved on to this playlist index.
    Advanced(usize),
    /// The track ended and nothing follows.
    Finished,
}

/// Read-only view of the transport for rendering.
#[derive(Debug, Clone)]
pub struct TransportSnapshot {
    pub state: PlaybackState,
    pub loop_mode: LoopMode,
    pub volume: u8,
    pub position: Duration,
    pub duration: Option<Duration>,
    pub seek_value: u8,
    pub dragging: bool,
    pub seek_preview: Option<String>,
}

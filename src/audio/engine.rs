use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// The playback surface the transport drives.
///
/// Implementations load one media file at a time. Loading leaves it paused at
/// offset zero.
pub trait MediaEngine {
    /// Load `path`, replacing whatever was loaded. Returns the total duration
    /// when the decoder knows it.
    fn open(&mut self, path: &Path, hint: Option<Duration>) -> Result<Option<Duration>>;
    fn play(&mut self);
    fn pause(&mut self);
    /// Stop and unload.
    fn stop(&mut self);
    /// Jump to `position`, keeping the current play/pause state.
    fn set_position(&mut self, position: Duration) -> Result<()>;
    /// Volume in percent, 0-100.
    fn set_volume(&mut self, volume: u8);
    fn position(&self) -> Duration;
    fn duration(&self) -> Option<Duration>;
    /// True once loaded media has played to its end.
    fn is_finished(&self) -> bool;
}

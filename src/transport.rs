//! Transport control: the play/pause/stop state machine over a
//! [`MediaEngine`](crate::audio::MediaEngine), and the seek bar sync loop.

mod controller;
pub mod sync;
mod types;

pub use controller::Transport;
pub use sync::PositionSync;
pub use types::{LoopMode, PlaybackState, TickEvent, TransportSnapshot};

#[cfg(test)]
mod tests;

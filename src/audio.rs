//! Media engine adapter.
//!
//! Decoding and output are `rodio`'s job; this module only loads one file at
//! a time into a sink and answers position/duration questions about it.

mod clock;
mod engine;
mod player;
mod sink;

pub use clock::PlaybackClock;
pub use engine::MediaEngine;
pub use player::AudioPlayer;

#[cfg(test)]
mod tests;

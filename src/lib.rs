//! encore: a terminal media player with playlist management, and a small
//! album-art viewer.
//!
//! The playlist store, the transport state machine and the seek bar sync are
//! plain types driven by the runtime's event loop; audio goes through the
//! [`audio::MediaEngine`] trait.

pub mod app;
pub mod art;
pub mod audio;
pub mod config;
pub mod error;
pub mod library;
pub mod logging;
pub mod mpris;
pub mod playlist;
pub mod runtime;
pub mod transport;
pub mod ui;

pub use error::{Error, Result};

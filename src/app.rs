//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the playlist, selection
//! and the view state drawn around it.

mod model;

pub use model::*;

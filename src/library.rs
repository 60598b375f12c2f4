//! Media file discovery and track metadata.
//!
//! Folders are walked with `walkdir` and filtered by extension; tags and
//! durations are read with `lofty` once, when a track is added.

mod display;
mod model;
mod scan;

pub use display::display_from_fields;
pub use model::Track;
pub use scan::{collect, is_media_file, is_video_file, read_track, scan};

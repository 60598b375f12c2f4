//! The playlist store: ordered tracks, a playback cursor, and the files
//! playlists are saved to and loaded from.

mod m3u;
mod store;

pub use m3u::{is_m3u, load_m3u, parse_m3u, save, save_labels, save_m3u};
pub use store::{Playlist, Step};

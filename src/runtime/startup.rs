use std::env;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::config::LibrarySettings;
use crate::library::{Track, collect, is_media_file, read_track, scan};
use crate::playlist::{Playlist, is_m3u, load_m3u};

/// Expand a leading `~` the way a shell would.
pub fn expand_user(input: &str) -> PathBuf {
    let home = || env::var_os("HOME").map(PathBuf::from);
    if input == "~" {
        if let Some(h) = home() {
            return h;
        }
    } else if let Some(rest) = input.strip_prefix("~/") {
        if let Some(h) = home() {
            return h.join(rest);
        }
    }
    PathBuf::from(input)
}

/// Tracks behind one user-supplied path: a folder is scanned, an M3U file is
/// read, a media file is taken as-is.
pub fn tracks_for(path: &Path, library: &LibrarySettings) -> Vec<Track> {
    if path.is_dir() {
        scan(path, library)
    } else if is_m3u(path) {
        load_m3u(path, library).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "cannot read playlist");
            Vec::new()
        })
    } else if path.is_file() && is_media_file(path, library) {
        vec![read_track(path, library)]
    } else {
        warn!(path = %path.display(), "not a media file, folder or playlist");
        Vec::new()
    }
}

/// Build the playlist the player starts with from the command line.
pub fn initial_playlist(
    paths: &[PathBuf],
    playlist_file: Option<&Path>,
    library: &LibrarySettings,
) -> Playlist {
    let mut playlist = Playlist::new();

    if let Some(file) = playlist_file {
        match load_m3u(file, library) {
            Ok(tracks) => {
                playlist.extend(tracks);
            }
            Err(e) => warn!(path = %file.display(), error = %e, "cannot read playlist"),
        }
    }

    let (lists, media): (Vec<&PathBuf>, Vec<&PathBuf>) =
        paths.iter().partition(|p| p.is_file() && is_m3u(p));
    for list in lists {
        playlist.extend(tracks_for(list, library));
    }
    playlist.extend(collect(&media, library));
    playlist
}

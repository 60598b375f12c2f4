use std::path::Path;
use std::time::Duration;

use lofty::prelude::*;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::LibrarySettings;

use super::display::display_from_fields;
use super::model::{Track, default_title};

fn extension_in(path: &Path, exts: &[String]) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter()
                .map(|e| e.trim().trim_start_matches('.'))
                .any(|e| !e.is_empty() && e.eq_ignore_ascii_case(&ext))
        })
        .unwrap_or(false)
}

/// True when `path` carries one of the configured media extensions.
pub fn is_media_file(path: &Path, settings: &LibrarySettings) -> bool {
    extension_in(path, &settings.extensions)
}

/// True when `path` should be shown in the media pane rather than the list.
pub fn is_video_file(path: &Path, settings: &LibrarySettings) -> bool {
    extension_in(path, &settings.video_extensions)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Read a single media file into a `Track`.
///
/// Unreadable tags are not an error: the track keeps its file-name label.
pub fn read_track(path: &Path, settings: &LibrarySettings) -> Track {
    let mut title = default_title(path);
    let mut artist: Option<String> = None;
    let mut album: Option<String> = None;
    let mut duration: Option<Duration> = None;

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            let d = tagged.properties().duration();
            if !d.is_zero() {
                duration = Some(d);
            }

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.title().filter(|v| !v.trim().is_empty()) {
                    title = v.trim().to_string();
                }
                artist = tag
                    .artist()
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty());
                album = tag
                    .album()
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty());
            }
        }
        Err(e) => debug!(path = %path.display(), error = %e, "no readable tags"),
    }

    let display = display_from_fields(
        path,
        &title,
        artist.as_deref(),
        album.as_deref(),
        &settings.display_fields,
        &settings.display_separator,
    );

    Track {
        path: path.to_path_buf(),
        title,
        artist,
        album,
        duration,
        display,
    }
}

/// Walk `dir` and return every media file as a `Track`, in file-name order.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Vec<Track> {
    let mut walker = WalkDir::new(dir)
        .follow_links(settings.follow_links)
        .sort_by_file_name();

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.path().is_file() && is_media_file(e.path(), settings))
        .map(|e| read_track(e.path(), settings))
        .collect()
}

/// Expand user-supplied paths: directories are scanned, media files read,
/// anything else skipped.
pub fn collect(paths: &[impl AsRef<Path>], settings: &LibrarySettings) -> Vec<Track> {
    let mut tracks = Vec::new();
    for p in paths {
        let p = p.as_ref();
        if p.is_dir() {
            tracks.extend(scan(p, settings));
        } else if p.is_file() && is_media_file(p, settings) {
            tracks.push(read_track(p, settings));
        } else {
            warn!(path = %p.display(), "not a media file or folder");
        }
    }
    tracks
}

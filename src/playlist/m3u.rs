//! Playlist files.
//!
//! Two writers exist: the plain label dump (one display label per line, which
//! cannot be read back) and extended M3U, which can.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::LibrarySettings;
use crate::error::Result;
use crate::library::{Track, read_track};

use super::store::Playlist;

/// True when `path` has an `.m3u` / `.m3u8` extension.
pub fn is_m3u(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("m3u") || e.eq_ignore_ascii_case("m3u8"))
        .unwrap_or(false)
}

/// Save `playlist` to `path`, picking the format from the extension.
pub fn save(playlist: &Playlist, path: &Path) -> Result<()> {
    if is_m3u(path) {
        save_m3u(playlist, path)
    } else {
        save_labels(playlist, path)
    }
}

/// Write newline-separated display labels.
pub fn save_labels(playlist: &Playlist, path: &Path) -> Result<()> {
    let mut out = BufWriter::new(fs::File::create(path)?);
    for track in playlist.tracks() {
        writeln!(out, "{}", track.display)?;
    }
    out.flush()?;
    info!(path = %path.display(), tracks = playlist.len(), "saved playlist labels");
    Ok(())
}

/// Write an extended M3U playlist with absolute or as-added paths.
pub fn save_m3u(playlist: &Playlist, path: &Path) -> Result<()> {
    let mut out = BufWriter::new(fs::File::create(path)?);
    writeln!(out, "#EXTM3U")?;
    for track in playlist.tracks() {
        // -1 is the conventional "unknown length".
        let secs = track.duration.map(|d| d.as_secs() as i64).unwrap_or(-1);
        writeln!(out, "#EXTINF:{},{}", secs, track.display)?;
        writeln!(out, "{}", track.path.display())?;
    }
    out.flush()?;
    info!(path = %path.display(), tracks = playlist.len(), "saved m3u playlist");
    Ok(())
}

/// Parse the entries of an M3U document. Relative entries are resolved
/// against `base`; directives and blank lines are ignored.
pub fn parse_m3u(text: &str, base: &Path) -> Vec<PathBuf> {
    text.lines()
        .map(|l| l.trim_start_matches('\u{feff}').trim())
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(|l| {
            let l = l.strip_prefix("file://").unwrap_or(l);
            let p = PathBuf::from(l);
            if p.is_absolute() { p } else { base.join(p) }
        })
        .collect()
}

/// Load the tracks listed in an M3U file. Missing files are skipped.
pub fn load_m3u(path: &Path, settings: &LibrarySettings) -> Result<Vec<Track>> {
    let text = fs::read_to_string(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));

    let tracks: Vec<Track> = parse_m3u(&text, base)
        .into_iter()
        .filter(|p| {
            let exists = p.is_file();
            if !exists {
                warn!(entry = %p.display(), "playlist entry not found");
            }
            exists
        })
        .map(|p| read_track(&p, settings))
        .collect();

    info!(path = %path.display(), tracks = tracks.len(), "loaded playlist");
    Ok(tracks)
}

use std::path::{Path, PathBuf};
use std::time::Duration;

/// A playlist entry pointing at a media file.
///
/// Identity is the path; the rest is read once when the track is added.
#[derive(Clone, Debug)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<Duration>,
    pub display: String,
}

impl Track {
    /// Build a track without reading tags; the label is the file name.
    pub fn bare(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let title = default_title(&path);
        let display = path
            .file_name()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| title.clone());
        Self {
            path,
            title,
            artist: None,
            album: None,
            duration: None,
            display,
        }
    }

    pub fn same_media(&self, other: &Track) -> bool {
        self.path == other.path
    }
}

impl PartialEq for Track {
    fn eq(&self, other: &Self) -> bool {
        self.same_media(other)
    }
}

impl Eq for Track {}

pub(super) fn default_title(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string()
}

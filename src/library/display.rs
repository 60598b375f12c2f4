use std::path::Path;

use crate::config::TrackDisplayField;

/// Build a display label for a track according to `fields` and separator.
///
/// Falls back to the file name (then `title`) when no field produced text.
pub fn display_from_fields(
    path: &Path,
    title: &str,
    artist: Option<&str>,
    album: Option<&str>,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    let file_name = path.file_name().and_then(|s| s.to_str());
    let non_empty = |s: Option<&str>| s.map(str::trim).filter(|s| !s.is_empty()).map(String::from);

    let parts: Vec<String> = fields
        .iter()
        .filter_map(|f| match f {
            TrackDisplayField::Title => non_empty(Some(title)),
            TrackDisplayField::Artist => non_empty(artist),
            TrackDisplayField::Album => non_empty(album),
            TrackDisplayField::Filename => non_empty(file_name),
            TrackDisplayField::Path => Some(path.display().to_string()),
        })
        .collect();

    if !parts.is_empty() {
        parts.join(sep)
    } else if let Some(name) = file_name {
        name.to_string()
    } else {
        title.to_string()
    }
}

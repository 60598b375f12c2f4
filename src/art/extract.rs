use std::path::Path;

use image::DynamicImage;
use lofty::picture::PictureType;
use lofty::prelude::*;

use crate::error::{Error, Result};

/// Largest edge kept after decoding; the terminal never needs more.
const THUMBNAIL_EDGE: u32 = 256;

/// Embedded artwork bytes of `path`, front cover first, else the first
/// picture of any tag.
pub fn extract(path: &Path) -> Result<Option<Vec<u8>>> {
    let tagged = lofty::read_from_path(path).map_err(|source| Error::Tags {
        path: path.to_path_buf(),
        source,
    })?;

    let pictures: Vec<_> = tagged.tags().iter().flat_map(|t| t.pictures()).collect();
    let chosen = pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first());

    Ok(chosen.map(|p| p.data().to_vec()))
}

/// Decode artwork bytes, shrinking them to a terminal-friendly size.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    let img = image::load_from_memory(bytes)?;
    if img.width() > THUMBNAIL_EDGE || img.height() > THUMBNAIL_EDGE {
        Ok(img.thumbnail(THUMBNAIL_EDGE, THUMBNAIL_EDGE))
    } else {
        Ok(img)
    }
}

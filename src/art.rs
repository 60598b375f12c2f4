//! Embedded album artwork: extraction with `lofty`, decoding with `image`,
//! and rendering into terminal cells.

mod extract;
mod render;

use std::path::{Path, PathBuf};

use image::DynamicImage;
use tracing::{debug, warn};

pub use extract::{decode, extract};
pub use render::to_lines;

pub const NO_ART: &str = "No Album Art Found";

/// Artwork of one media file, ready to render.
#[derive(Debug, Default, Clone)]
pub struct ArtView {
    source: Option<PathBuf>,
    image: Option<DynamicImage>,
}

impl ArtView {
    /// Read and decode the artwork of `path`. Any failure degrades to an
    /// empty view.
    pub fn load(path: &Path) -> Self {
        let image = match extract(path) {
            Ok(Some(bytes)) => match decode(&bytes) {
                Ok(img) => Some(img),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "undecodable artwork");
                    None
                }
            },
            Ok(None) => {
                debug!(path = %path.display(), "no embedded artwork");
                None
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read artwork");
                None
            }
        };
        Self {
            source: Some(path.to_path_buf()),
            image,
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn image(&self) -> Option<&DynamicImage> {
        self.image.as_ref()
    }

    pub fn has_art(&self) -> bool {
        self.image.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use ratatui::style::Color;
    use std::io::Cursor;

    fn two_tone(w: u32, h: u32) -> DynamicImage {
        // Red on top half, blue on bottom half.
        let img = RgbImage::from_fn(w, h, |_, y| {
            if y < h / 2 {
                Rgb([255, 0, 0])
            } else {
                Rgb([0, 0, 255])
            }
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn decode_reads_png_and_shrinks_large_pictures() {
        let mut bytes = Vec::new();
        two_tone(600, 300)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let img = decode(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (256, 128));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode(b"definitely not an image").is_err());
    }

    #[test]
    fn to_lines_fits_square_picture_and_uses_half_blocks() {
        let lines = to_lines(&two_tone(8, 8), 4, 2);
        assert_eq!(lines.len(), 2);

        // One padding span, then one cell per pixel column.
        let first = &lines[0].spans;
        assert_eq!(first.len(), 5);
        assert_eq!(first[1].content, "\u{2580}");
        assert!(matches!(first[1].style.fg, Some(Color::Rgb(r, _, b)) if r > 200 && b < 50));

        let last = &lines[1].spans;
        assert!(matches!(last[1].style.bg, Some(Color::Rgb(r, _, b)) if r < 50 && b > 200));
    }

    #[test]
    fn to_lines_centers_narrow_pictures() {
        // 2:4 picture into 10x2 cells -> 2 px wide, 4 px tall.
        let lines = to_lines(&two_tone(2, 4), 10, 2);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].spans[0].content.len(), 4);
        assert_eq!(lines[0].spans.len(), 3);
    }

    #[test]
    fn to_lines_handles_empty_area() {
        assert!(to_lines(&two_tone(4, 4), 0, 10).is_empty());
        assert!(to_lines(&two_tone(4, 4), 10, 0).is_empty());
    }

    #[test]
    fn load_degrades_to_no_art_for_untagged_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.mp3");
        std::fs::write(&path, b"not really audio").unwrap();

        let view = ArtView::load(&path);
        assert!(!view.has_art());
        assert_eq!(view.source(), Some(path.as_path()));
    }
}

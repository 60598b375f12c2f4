use image::DynamicImage;
use image::imageops::FilterType;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

const UPPER_HALF: &str = "\u{2580}";

/// Render `img` into at most `width` x `height` terminal cells, two pixels per
/// cell (upper half block: foreground = top pixel, background = bottom).
/// Aspect ratio is kept and the picture is centered.
pub fn to_lines(img: &DynamicImage, width: u16, height: u16) -> Vec<Line<'static>> {
    if width == 0 || height == 0 || img.width() == 0 || img.height() == 0 {
        return Vec::new();
    }

    let fitted = img
        .resize(u32::from(width), u32::from(height) * 2, FilterType::Triangle)
        .to_rgb8();
    let (w, h) = fitted.dimensions();
    let rows = h.div_ceil(2);

    let left_pad = " ".repeat(usize::from(width).saturating_sub(w as usize) / 2);
    let top_pad = usize::from(height).saturating_sub(rows as usize) / 2;

    let mut lines: Vec<Line<'static>> = vec![Line::default(); top_pad];
    for row in 0..rows {
        let y = row * 2;
        let mut spans = Vec::with_capacity(w as usize + 1);
        spans.push(Span::raw(left_pad.clone()));
        for x in 0..w {
            let top = fitted.get_pixel(x, y).0;
            let mut style = Style::default().fg(Color::Rgb(top[0], top[1], top[2]));
            if y + 1 < h {
                let bottom = fitted.get_pixel(x, y + 1).0;
                style = style.bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
            }
            spans.push(Span::styled(UPPER_HALF, style));
        }
        lines.push(Line::from(spans));
    }
    lines
}

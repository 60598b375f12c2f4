//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::{collections::BTreeMap, sync::LazyLock, time::Duration};

use crate::app::{App, View};
use crate::art::{self, ArtView, NO_ART};
use crate::config::{ControlsSettings, Settings, TimeField, UiSettings};
use crate::transport::sync::format_mmss;
use crate::transport::{PlaybackState, TransportSnapshot};

static CONTROLS_MAP: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    BTreeMap::from([
        ("j/k", "up/down"),
        ("gg/G", "top/bottom"),
        ("enter", "play selected"),
        ("space/p", "play/pause"),
        ("x", "stop"),
        ("h/l", "prev/next"),
        // H/L is filled dynamically from config.
        ("0-9", "jump"),
        ("+/-", "volume"),
        ("s", "shuffle"),
        ("o", "sort"),
        ("r/R", "loop mode/repeat"),
        ("d/D", "remove/clear"),
        ("a", "add"),
        ("O/w", "open/save playlist"),
        ("v", "view"),
        ("f", "fullscreen"),
        ("K", "metadata"),
        ("q", "quit"),
    ])
});

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(controls: &ControlsSettings) -> String {
    // Keep the rendered order stable and human-friendly.
    let order = [
        "j/k", "gg/G", "enter", "space/p", "x", "h/l", "H/L", "0-9", "+/-", "s", "o", "r/R",
        "d/D", "a", "O/w", "v", "f", "K", "q",
    ];
    order
        .iter()
        .filter_map(|k| {
            if *k == "H/L" {
                Some(format!("[H/L] scrub -/+{}s", controls.scrub_seconds))
            } else {
                CONTROLS_MAP.get(*k).map(|v| format!("[{}] {}", k, v))
            }
        })
        .collect::<Vec<String>>()
        .join(" | ")
}

/// Build the seek bar time text (elapsed/total/remaining) per `UiSettings`.
pub fn time_text(elapsed: Duration, total: Option<Duration>, ui: &UiSettings) -> String {
    let mut parts: Vec<String> = Vec::new();
    for f in &ui.time_fields {
        match f {
            TimeField::Elapsed => parts.push(format_mmss(elapsed)),
            TimeField::Total => {
                if let Some(t) = total {
                    parts.push(format_mmss(t));
                }
            }
            TimeField::Remaining => {
                if let Some(t) = total {
                    let rem = t.saturating_sub(elapsed);
                    parts.push(format!("-{}", format_mmss(rem)));
                }
            }
        }
    }
    parts.join(&ui.time_separator)
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width: width.min(r.width),
        height: height.min(r.height),
    }
}

/// Format an optional duration, rounding up partial seconds, showing total seconds.
fn format_duration_mmss_ceil(d: Option<Duration>) -> String {
    let Some(d) = d else {
        return "-".to_string();
    };

    let mut total_secs = d.as_secs();
    if d.subsec_nanos() > 0 {
        total_secs = total_secs.saturating_add(1);
    }

    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{}:{:02} ({}s)", minutes, seconds, total_secs)
}

fn state_label(state: PlaybackState) -> &'static str {
    match state {
        PlaybackState::Stopped => "Stopped",
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
    }
}

fn status_text(app: &App, snap: &TransportSnapshot) -> String {
    let mut parts: Vec<String> = vec![
        format!(" {}", state_label(snap.state)),
        format!("PLAYBACK: {}", snap.loop_mode.label()),
        format!("VOL: {}%", snap.volume),
    ];
    if app.follow_playback {
        parts.push("CURSOR: Follow".to_string());
    } else {
        parts.push("CURSOR: Free-roam".to_string());
    }
    if let Some(t) = app.playlist.current() {
        parts.push(format!("Song: {}", t.display));
    }
    if let Some(msg) = &app.status {
        parts.push(msg.clone());
    }
    parts.join(" • ")
}

/// Row window of `height` rows over `total` items that keeps `selected`
/// centered when possible. Returns `(start, end, selected_in_window)`.
fn visible_window(total: usize, height: usize, selected: usize) -> (usize, usize, usize) {
    if total <= height || height == 0 {
        return (0, total, selected);
    }
    let half = height / 2;
    let mut start = selected.saturating_sub(half);
    if start + height > total {
        start = total - height;
    }
    (start, start + height, selected - start)
}

fn draw_playlist(frame: &mut Frame, app: &App, area: Rect) {
    // Only build ListItems for the visible window.
    let total = app.playlist.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let (start, end, selected_pos) = visible_window(total, list_height, app.selected);
    let cursor = app.playlist.cursor();

    let items: Vec<ListItem> = app.playlist.tracks()[start..end]
        .iter()
        .enumerate()
        .map(|(offset, t)| {
            if cursor == Some(start + offset) {
                ListItem::new(format!("♪ {}", t.display)).bold()
            } else {
                ListItem::new(format!("  {}", t.display))
            }
        })
        .collect();

    let title = format!(" playlist ({}) ", total);
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(selected_pos));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn art_lines(view: &ArtView, area: Rect) -> Vec<Line<'static>> {
    match view.image() {
        Some(img) => art::to_lines(img, area.width, area.height),
        None => {
            let top = usize::from(area.height / 2);
            let mut lines = vec![Line::default(); top];
            lines.push(Line::from(NO_ART).italic());
            lines
        }
    }
}

fn draw_art(frame: &mut Frame, view: &ArtView, area: Rect, title: &str) {
    let block = Block::default().borders(Borders::ALL).title(title.to_string());
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let lines = art_lines(view, inner);
    let alignment = if view.has_art() {
        Alignment::Left
    } else {
        Alignment::Center
    };
    frame.render_widget(Paragraph::new(lines).alignment(alignment), inner);
}

fn draw_media(frame: &mut Frame, app: &App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    draw_art(frame, &app.art, cols[0], " media ");

    let details = match app.playlist.current() {
        Some(t) => format!(
            "Title: {}\nArtist: {}\nAlbum: {}\nDuration: {}\nFile: {}",
            t.title,
            t.artist.as_deref().unwrap_or("-"),
            t.album.as_deref().unwrap_or("-"),
            format_duration_mmss_ceil(t.duration),
            t.path.display()
        ),
        None => "Nothing loaded".to_string(),
    };
    let par = Paragraph::new(details)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" details "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(par, cols[1]);
}

/// Draw the seek bar into `area`; returns the inner rect used for pointer
/// hit-testing.
fn draw_seek_bar(frame: &mut Frame, snap: &TransportSnapshot, ui: &UiSettings, area: Rect) -> Rect {
    let label = match (&snap.seek_preview, snap.dragging) {
        (Some(preview), true) => preview.clone(),
        _ => time_text(snap.position, snap.duration, ui),
    };
    let block = Block::default().borders(Borders::ALL).title(" position ");
    let inner = block.inner(area);
    let gauge = Gauge::default()
        .block(block)
        .percent(u16::from(snap.seek_value))
        .label(label);
    frame.render_widget(gauge, area);
    inner
}

fn draw_prompt(frame: &mut Frame, title: &str, input: &str, area: Rect) {
    let popup_area = centered_rect_sized(72, 3, area);
    frame.render_widget(Clear, popup_area);
    let par = Paragraph::new(format!("{input}_")).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_bottom(" enter: ok | esc: cancel "),
    );
    frame.render_widget(par, popup_area);
}

fn draw_metadata(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_sized(72, 9, area);
    frame.render_widget(Clear, popup_area);

    let meta = if let Some(track) = app.selected_track() {
        format!(
            "Title: {}\nArtist: {}\nAlbum: {}\nDuration: {}\nPath: {}",
            track.title,
            track.artist.as_deref().unwrap_or("-"),
            track.album.as_deref().unwrap_or("-"),
            format_duration_mmss_ceil(track.duration),
            track.path.display()
        )
    } else {
        "No track selected".to_string()
    };
    let meta_paragraph = Paragraph::new(meta)
        .block(
            Block::default()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .borders(Borders::ALL)
                .title(" metadata (K closes) "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(meta_paragraph, popup_area);
}

/// Render the player UI. Returns the seek bar's inner area so pointer events
/// can be mapped onto it.
pub fn draw(frame: &mut Frame, app: &App, snap: &TransportSnapshot, settings: &Settings) -> Rect {
    let (main_area, seek_area) = if app.fullscreen {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(3)])
            .split(frame.area());
        (chunks[0], chunks[1])
    } else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(3),
                Constraint::Length(4),
            ])
            .split(frame.area());

        let header = Paragraph::new(settings.ui.header_text.as_str())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" encore ")
                    .title_alignment(Alignment::Center),
            );
        frame.render_widget(header, chunks[0]);

        let status = Paragraph::new(status_text(app, snap))
            .block(
                Block::bordered()
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    })
                    .title(" status "),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(status, chunks[1]);

        let footer = Paragraph::new(controls_text(&settings.controls))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" controls ")
                    .padding(Padding {
                        left: 1,
                        right: 0,
                        top: 0,
                        bottom: 0,
                    }),
            )
            .wrap(Wrap { trim: true });
        frame.render_widget(footer, chunks[4]);

        (chunks[2], chunks[3])
    };

    match app.view {
        View::Playlist => draw_playlist(frame, app, main_area),
        View::Media => draw_media(frame, app, main_area),
    }

    // Overlays stay inside the main pane so the seek bar remains visible.
    if app.metadata_window {
        draw_metadata(frame, app, main_area);
    }
    if let Some(prompt) = &app.prompt {
        draw_prompt(frame, prompt.kind.title(), &prompt.input, main_area);
    }

    draw_seek_bar(frame, snap, &settings.ui, seek_area)
}

/// Render the standalone artwork viewer; `prompt` is the file name being
/// typed, if the open prompt is up.
pub fn draw_art_viewer(frame: &mut Frame, view: &ArtView, prompt: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    let title = match view.source().and_then(|p| p.file_name()) {
        Some(name) => format!(" {} ", name.to_string_lossy()),
        None => " album art ".to_string(),
    };
    draw_art(frame, view, chunks[0], &title);

    let help = Paragraph::new("[o] open file | [q] quit").dim();
    frame.render_widget(help, chunks[1]);

    if let Some(input) = prompt {
        draw_prompt(frame, " open media file ", input, chunks[0]);
    }
}

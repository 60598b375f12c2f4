use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;
use tracing::{info, warn};

use crate::app::{App, PromptKind};
use crate::audio::MediaEngine;
use crate::config;
use crate::error::{Error, Result};
use crate::mpris::{ControlCmd, MprisHandle};
use crate::playlist::{self, load_m3u};
use crate::runtime::mpris_sync::{update_mpris, update_mpris_track};
use crate::runtime::startup::{expand_user, tracks_for};
use crate::runtime::terminal::Term;
use crate::transport::sync::slider_value_at;
use crate::transport::{TickEvent, Transport};
use crate::ui;

/// Upper bound on how long input polling blocks.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
    /// Seek bar area from the last frame, for mouse hit-testing.
    pub seek_area: Rect,
    /// A press on the seek bar has not been released yet.
    pub dragging: bool,
    /// Media the UI and MPRIS were last told about.
    last_loaded: Option<PathBuf>,
    /// Playlist index MPRIS last published for it.
    last_cursor: Option<usize>,
}

/// Main terminal event loop: ticks the transport, draws, and dispatches MPRIS
/// commands and terminal input. Returns `Ok(())` when shutdown is requested.
pub fn run<E: MediaEngine>(
    terminal: &mut Term,
    settings: &config::Settings,
    app: &mut App,
    transport: &mut Transport<E>,
    mpris: &MprisHandle,
    control_rx: &mpsc::Receiver<ControlCmd>,
    state: &mut EventLoopState,
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    loop {
        let ticked = transport.tick(&mut app.playlist, Instant::now());
        on_tick(app, ticked);
        observe_loaded(settings, app, transport, mpris, state);
        app.follow_cursor();

        let snap = transport.snapshot();
        update_mpris(mpris, &snap);
        terminal.draw(|f| state.seek_area = ui::draw(f, app, &snap, settings))?;

        while let Ok(cmd) = control_rx.try_recv() {
            if handle_control_cmd(cmd, app, transport) {
                transport.stop();
                return Ok(());
            }
        }

        let timeout = transport
            .poll_timeout(Instant::now())
            .map_or(IDLE_POLL, |d| d.min(IDLE_POLL));
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(key, settings, app, transport, state) {
                        transport.stop();
                        break;
                    }
                }
                Event::Mouse(mouse) => handle_mouse_event(mouse, app, transport, state),
                _ => {}
            }
        }
    }

    Ok(())
}

/// Surface what the end of a track led to.
fn on_tick(app: &mut App, ticked: Result<TickEvent>) {
    if let Some(TickEvent::Finished) = report(app, "play", ticked) {
        app.set_status("End of playlist");
    }
}

/// Tell the view when the loaded media changed, and MPRIS when either the
/// media or its playlist index did (shuffle, sort and removals move it).
fn observe_loaded<E: MediaEngine>(
    settings: &config::Settings,
    app: &mut App,
    transport: &Transport<E>,
    mpris: &MprisHandle,
    state: &mut EventLoopState,
) {
    let loaded = transport.loaded().map(Path::to_path_buf);
    let cursor = app.playlist.cursor();
    let media_changed = loaded != state.last_loaded;
    if !media_changed && cursor == state.last_cursor {
        return;
    }
    if media_changed {
        if let Some(path) = &loaded {
            app.on_media_loaded(path, &settings.library);
        }
    }
    update_mpris_track(mpris, app, loaded.is_some());
    state.last_loaded = loaded;
    state.last_cursor = cursor;
}

/// Turn a failed command into a status message.
fn report<T>(app: &mut App, what: &str, result: Result<T>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(Error::NoMedia) => {
            app.set_status("Nothing to play");
            None
        }
        Err(e) => {
            warn!(error = %e, "cannot {what}");
            app.set_status(format!("cannot {what}: {e}"));
            None
        }
    }
}

/// Apply a transport command from MPRIS or a key. Returns true on quit.
fn handle_control_cmd<E: MediaEngine>(
    cmd: ControlCmd,
    app: &mut App,
    transport: &mut Transport<E>,
) -> bool {
    match cmd {
        ControlCmd::Quit => return true,
        ControlCmd::Play => {
            app.follow_playback_on();
            let r = transport.play(&mut app.playlist);
            report(app, "play", r);
        }
        ControlCmd::Pause => transport.pause(),
        ControlCmd::PlayPause => {
            app.follow_playback_on();
            let r = transport.toggle(&mut app.playlist);
            report(app, "play", r);
        }
        ControlCmd::Stop => transport.stop(),
        ControlCmd::Next => {
            app.follow_playback_on();
            let r = transport.next(&mut app.playlist);
            report(app, "play next", r);
        }
        ControlCmd::Prev => {
            app.follow_playback_on();
            let r = transport.previous(&mut app.playlist);
            report(app, "play previous", r);
        }
        ControlCmd::Seek(offset_us) => {
            let cur = i64::try_from(transport.snapshot().position.as_micros()).unwrap_or(i64::MAX);
            let target = cur.saturating_add(offset_us).max(0) as u64;
            let r = transport.seek_to(Duration::from_micros(target));
            report(app, "seek", r);
        }
        ControlCmd::SetPosition(us) => {
            let target = Duration::from_micros(us.max(0) as u64);
            let in_track = transport.snapshot().duration.is_none_or(|d| target <= d);
            if us >= 0 && in_track {
                let r = transport.seek_to(target);
                report(app, "seek", r);
            }
        }
    }
    false
}

/// Run a line typed into the prompt.
fn apply_prompt<E: MediaEngine>(
    kind: PromptKind,
    input: &str,
    settings: &config::Settings,
    app: &mut App,
    transport: &mut Transport<E>,
) {
    let path = expand_user(input);
    match kind {
        PromptKind::AddPath => {
            let tracks = tracks_for(&path, &settings.library);
            if tracks.is_empty() {
                app.set_status(format!("Nothing playable in {}", path.display()));
            } else {
                let added = app.playlist.extend(tracks);
                info!(path = %path.display(), added, "added to playlist");
                app.set_status(format!("Added {added} track(s)"));
            }
        }
        PromptKind::OpenPlaylist => {
            let loaded = load_m3u(&path, &settings.library);
            if let Some(tracks) = report(app, "open playlist", loaded) {
                transport.clear(&mut app.playlist);
                let n = app.playlist.extend(tracks);
                app.select_first();
                app.set_status(format!("Loaded {n} track(s)"));
            }
        }
        PromptKind::SavePlaylist => {
            let saved = playlist::save(&app.playlist, &path);
            if report(app, "save playlist", saved).is_some() {
                app.set_status(format!("Saved to {}", path.display()));
            }
        }
    }
}

fn handle_prompt_key<E: MediaEngine>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    transport: &mut Transport<E>,
) {
    match key.code {
        KeyCode::Esc => app.cancel_prompt(),
        KeyCode::Backspace => app.pop_prompt_char(),
        KeyCode::Enter => {
            if let Some((kind, input)) = app.submit_prompt() {
                apply_prompt(kind, &input, settings, app, transport);
            }
        }
        KeyCode::Char(c) if !c.is_control() => app.push_prompt_char(c),
        _ => {}
    }
}

/// Handle one key press. Returns true on quit.
pub fn handle_key_event<E: MediaEngine>(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    transport: &mut Transport<E>,
    state: &mut EventLoopState,
) -> bool {
    if app.prompt.is_some() {
        state.pending_gg = false;
        handle_prompt_key(key, settings, app, transport);
        return false;
    }

    let was_gg = std::mem::take(&mut state.pending_gg);
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('g') => {
            if was_gg {
                app.follow_playback_off();
                app.select_first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            app.follow_playback_off();
            app.select_last();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.follow_playback_off();
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.follow_playback_off();
            app.prev();
        }
        KeyCode::Enter => {
            if app.has_tracks() {
                app.follow_playback_on();
                let r = transport.play_index(&mut app.playlist, app.selected);
                report(app, "play", r);
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            handle_control_cmd(ControlCmd::PlayPause, app, transport);
        }
        KeyCode::Char('x') => {
            handle_control_cmd(ControlCmd::Stop, app, transport);
        }
        KeyCode::Char('l') => {
            handle_control_cmd(ControlCmd::Next, app, transport);
        }
        KeyCode::Char('h') => {
            handle_control_cmd(ControlCmd::Prev, app, transport);
        }
        KeyCode::Char('L') => {
            let secs = settings.controls.scrub_seconds.min(i64::MAX as u64) as i64;
            let r = transport.seek_by(secs);
            report(app, "seek", r);
        }
        KeyCode::Char('H') => {
            let secs = settings.controls.scrub_seconds.min(i64::MAX as u64) as i64;
            let r = transport.seek_by(-secs);
            report(app, "seek", r);
        }
        KeyCode::Char(c @ '0'..='9') => {
            let tenth = c.to_digit(10).unwrap_or(0) as u8;
            let r = transport.seek_to_percent(tenth * 10);
            report(app, "seek", r);
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            let v = transport.change_volume(i16::from(settings.controls.volume_step));
            app.set_status(format!("Volume {v}%"));
        }
        KeyCode::Char('-') => {
            let v = transport.change_volume(-i16::from(settings.controls.volume_step));
            app.set_status(format!("Volume {v}%"));
        }
        KeyCode::Char('s') => {
            transport.shuffle(&mut app.playlist);
            app.follow_playback_on();
            app.select_first();
            app.follow_cursor();
        }
        KeyCode::Char('o') => {
            transport.sort(&mut app.playlist);
            app.follow_cursor();
        }
        KeyCode::Char('r') => {
            let mode = transport.cycle_loop_mode();
            app.set_status(format!("Loop: {}", mode.label()));
        }
        KeyCode::Char('R') => {
            let mode = transport.toggle_repeat();
            app.set_status(format!("Loop: {}", mode.label()));
        }
        KeyCode::Char('d') => {
            if let Some(t) = transport.remove(&mut app.playlist, app.selected) {
                app.set_status(format!("Removed {}", t.display));
            }
            app.clamp_selection();
        }
        KeyCode::Char('D') => {
            transport.clear(&mut app.playlist);
            app.select_first();
            app.set_status("Playlist cleared");
        }
        KeyCode::Char('a') => app.open_prompt(PromptKind::AddPath),
        KeyCode::Char('O') => app.open_prompt(PromptKind::OpenPlaylist),
        KeyCode::Char('w') => app.open_prompt(PromptKind::SavePlaylist),
        KeyCode::Char('v') => app.toggle_view(),
        KeyCode::Char('f') => app.toggle_fullscreen(),
        KeyCode::Char('K') => app.toggle_metadata_window(),
        KeyCode::Esc => {
            app.metadata_window = false;
            app.clear_status();
        }
        _ => {}
    }

    false
}

/// Slider value under a pointer at (`column`, `row`), if it is on the bar.
pub fn seek_value_at(area: Rect, column: u16, row: u16) -> Option<u8> {
    let inside = column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height);
    inside.then(|| slider_value_at(column - area.x, area.width))
}

/// Press, drag and release on the seek bar.
pub fn handle_mouse_event<E: MediaEngine>(
    mouse: MouseEvent,
    app: &mut App,
    transport: &mut Transport<E>,
    state: &mut EventLoopState,
) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if let Some(v) = seek_value_at(state.seek_area, mouse.column, mouse.row) {
                transport.begin_seek();
                transport.drag_seek(v);
                state.dragging = true;
            }
        }
        MouseEventKind::Drag(MouseButton::Left) if state.dragging => {
            let area = state.seek_area;
            transport.drag_seek(slider_value_at(mouse.column.saturating_sub(area.x), area.width));
        }
        MouseEventKind::Up(MouseButton::Left) if state.dragging => {
            state.dragging = false;
            let r = transport.end_seek();
            report(app, "seek", r);
        }
        _ => {}
    }
}

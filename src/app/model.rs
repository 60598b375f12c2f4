//! Application model types: `App`, `View` and the input `Prompt`.
//!
//! The `App` struct holds the playlist plus everything the UI shows around
//! it: selection, active pane, popups and the status message. Playback state
//! itself lives in the transport.

use std::path::Path;

use crate::art::ArtView;
use crate::config::{LibrarySettings, ViewSetting};
use crate::library::{Track, is_video_file};
use crate::playlist::Playlist;

/// The pane shown in the main area.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum View {
    #[default]
    Playlist,
    /// Artwork and details of the loaded media.
    Media,
}

impl From<ViewSetting> for View {
    fn from(v: ViewSetting) -> Self {
        match v {
            ViewSetting::Playlist => View::Playlist,
            ViewSetting::Media => View::Media,
        }
    }
}

/// What a line typed into the prompt is used for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PromptKind {
    /// A media file or a folder to append.
    AddPath,
    /// An M3U playlist to load.
    OpenPlaylist,
    /// Where to save the playlist.
    SavePlaylist,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            PromptKind::AddPath => " add file or folder ",
            PromptKind::OpenPlaylist => " open playlist ",
            PromptKind::SavePlaylist => " save playlist as ",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: String,
}

/// The main application model.
pub struct App {
    pub playlist: Playlist,
    pub selected: usize,
    pub view: View,

    /// Selection jumps to the playing track whenever it changes.
    pub follow_playback: bool,
    /// Header and footer hidden.
    pub fullscreen: bool,
    pub metadata_window: bool,

    pub prompt: Option<Prompt>,
    pub status: Option<String>,
    pub art: ArtView,
}

impl App {
    /// Create a new `App` over `playlist`, starting in `view`.
    pub fn new(playlist: Playlist, view: View) -> Self {
        Self {
            playlist,
            selected: 0,
            view,
            follow_playback: true,
            fullscreen: false,
            metadata_window: false,
            prompt: None,
            status: None,
            art: ArtView::default(),
        }
    }

    /// Return true if the playlist contains any tracks.
    pub fn has_tracks(&self) -> bool {
        !self.playlist.is_empty()
    }

    pub fn selected_track(&self) -> Option<&Track> {
        self.playlist.get(self.selected)
    }

    /// Set the selected index, clamped to the playlist.
    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx.min(self.playlist.len().saturating_sub(1));
    }

    /// Keep the selection inside the playlist after it shrank.
    pub fn clamp_selection(&mut self) {
        self.set_selected(self.selected);
    }

    /// Move selection to the next track, wrapping to the top.
    pub fn next(&mut self) {
        let len = self.playlist.len();
        if len > 0 {
            self.selected = (self.selected + 1) % len;
        }
    }

    /// Move selection to the previous track, wrapping to the bottom.
    pub fn prev(&mut self) {
        let len = self.playlist.len();
        if len > 0 {
            self.selected = if self.selected == 0 {
                len - 1
            } else {
                self.selected - 1
            };
        }
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.set_selected(usize::MAX);
    }

    /// Enable following playback (selection follows the playing track).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
    }

    /// Disable follow-playback; the selection roams freely.
    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Move the selection onto the playlist cursor when following playback.
    pub fn follow_cursor(&mut self) {
        if !self.follow_playback {
            return;
        }
        if let Some(c) = self.playlist.cursor() {
            self.selected = c;
        }
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }

    pub fn toggle_view(&mut self) {
        self.view = match self.view {
            View::Playlist => View::Media,
            View::Media => View::Playlist,
        };
    }

    /// A new track was loaded: pick the pane that suits it and refresh the
    /// artwork.
    pub fn on_media_loaded(&mut self, path: &Path, library: &LibrarySettings) {
        self.view = if is_video_file(path, library) {
            View::Media
        } else {
            View::Playlist
        };
        self.load_art(path);
    }

    /// Read the artwork of `path` unless it is already shown.
    pub fn load_art(&mut self, path: &Path) {
        if self.art.source() != Some(path) {
            self.art = ArtView::load(path);
        }
    }

    pub fn open_prompt(&mut self, kind: PromptKind) {
        self.prompt = Some(Prompt {
            kind,
            input: String::new(),
        });
    }

    pub fn push_prompt_char(&mut self, c: char) {
        if let Some(p) = self.prompt.as_mut() {
            p.input.push(c);
        }
    }

    pub fn pop_prompt_char(&mut self) {
        if let Some(p) = self.prompt.as_mut() {
            p.input.pop();
        }
    }

    pub fn cancel_prompt(&mut self) {
        self.prompt = None;
    }

    /// Close the prompt, returning what was typed (trimmed). `None` when no
    /// prompt was open or the input is blank.
    pub fn submit_prompt(&mut self) -> Option<(PromptKind, String)> {
        let p = self.prompt.take()?;
        let input = p.input.trim();
        if input.is_empty() {
            None
        } else {
            Some((p.kind, input.to_string()))
        }
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status = Some(msg.into());
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }
}

use rand::Rng;
use rand::seq::SliceRandom;

use crate::library::Track;

/// Direction for [`Playlist::advance`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    Forward,
    Back,
}

/// An ordered list of tracks plus the cursor of the one loaded for playback.
///
/// Invariant: `cursor`, when set, is always `< tracks.len()`.
#[derive(Debug, Default, Clone)]
pub struct Playlist {
    tracks: Vec<Track>,
    cursor: Option<usize>,
}

impl Playlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        let mut playlist = Self::new();
        playlist.extend(tracks);
        playlist
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The track under the cursor.
    pub fn current(&self) -> Option<&Track> {
        self.cursor.and_then(|i| self.tracks.get(i))
    }

    pub fn position_of(&self, track: &Track) -> Option<usize> {
        self.tracks.iter().position(|t| t == track)
    }

    /// Append `track` unless a track with the same path is already listed.
    /// Returns whether the playlist changed.
    pub fn append(&mut self, track: Track) -> bool {
        if self.position_of(&track).is_some() {
            return false;
        }
        self.tracks.push(track);
        true
    }

    /// Append every track; returns how many were new.
    pub fn extend(&mut self, tracks: impl IntoIterator<Item = Track>) -> usize {
        let mut added = 0;
        for track in tracks {
            if self.append(track) {
                added += 1;
            }
        }
        added
    }

    /// Point the cursor at `index`. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> Option<&Track> {
        if index < self.tracks.len() {
            self.cursor = Some(index);
        }
        self.current()
    }

    pub fn clear_cursor(&mut self) {
        self.cursor = None;
    }

    /// Remove the track at `index`.
    ///
    /// Removing the cursor track clears the cursor; removing an earlier track
    /// shifts the cursor so it keeps pointing at the same track.
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        if index >= self.tracks.len() {
            return None;
        }
        let removed = self.tracks.remove(index);
        self.cursor = match self.cursor {
            Some(c) if c == index => None,
            Some(c) if c > index => Some(c - 1),
            other => other,
        };
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.tracks.clear();
        self.cursor = None;
    }

    /// Shuffle with the thread-local generator.
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::rng());
    }

    /// Move the current track to the front and randomize the rest; the cursor
    /// ends up on position 0. Without a cursor everything is randomized.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.tracks.len() < 2 {
            return;
        }
        match self.cursor {
            Some(c) => {
                let current = self.tracks.remove(c);
                self.tracks.shuffle(rng);
                self.tracks.insert(0, current);
                self.cursor = Some(0);
            }
            None => self.tracks.shuffle(rng),
        }
    }

    /// Sort by display label (case-insensitive first), keeping the cursor on
    /// the same track.
    pub fn sort(&mut self) {
        let current = self.current().cloned();
        self.tracks.sort_by(|a, b| {
            a.display
                .to_lowercase()
                .cmp(&b.display.to_lowercase())
                .then_with(|| a.display.cmp(&b.display))
        });
        self.cursor = current.and_then(|t| self.position_of(&t));
    }

    /// Move the cursor one step. Boundaries are no-ops unless `wrap` is set.
    /// Without a cursor, stepping forward lands on the first track and
    /// stepping back on the last.
    ///
    /// Returns the new cursor when it moved.
    pub fn advance(&mut self, step: Step, wrap: bool) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        let next = match (self.cursor, step) {
            (None, Step::Forward) => Some(0),
            (None, Step::Back) => Some(len - 1),
            (Some(c), Step::Forward) if c + 1 < len => Some(c + 1),
            (Some(_), Step::Forward) => wrap.then_some(0),
            (Some(c), Step::Back) if c > 0 => Some(c - 1),
            (Some(_), Step::Back) => wrap.then_some(len - 1),
        };
        // A one-track playlist wrapping onto itself still counts as a move.
        if let Some(n) = next {
            self.cursor = Some(n);
        }
        next
    }
}

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use tracing::{info, warn};

use crate::art::ArtView;
use crate::logging;
use crate::runtime::settings::load_settings;
use crate::runtime::startup::expand_user;
use crate::runtime::terminal::with_terminal;
use crate::ui;

/// Show the artwork embedded in a media file.
#[derive(Parser, Debug)]
#[command(name = "encore-art", version, about)]
pub struct ArtArgs {
    /// Media file to read artwork from.
    pub file: Option<PathBuf>,
}

/// The viewer's whole state: one picture and, while the open-file prompt is
/// up, the path typed so far.
#[derive(Debug, Default)]
pub struct ArtViewer {
    pub view: ArtView,
    pub prompt: Option<String>,
}

impl ArtViewer {
    pub fn open(&mut self, path: &std::path::Path) {
        info!(path = %path.display(), "showing artwork");
        self.view = ArtView::load(path);
    }

    /// Handle one key press. Returns true on quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if let Some(input) = self.prompt.as_mut() {
            match key.code {
                KeyCode::Esc => self.prompt = None,
                KeyCode::Backspace => {
                    input.pop();
                }
                KeyCode::Enter => {
                    let input = input.trim().to_string();
                    self.prompt = None;
                    if !input.is_empty() {
                        self.open(&expand_user(&input));
                    }
                }
                KeyCode::Char(c) if !c.is_control() => input.push(c),
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('o') => {
                self.prompt = Some(String::new());
            }
            _ => {}
        }
        false
    }
}

/// Entry point of the `encore-art` binary.
pub fn run_art_viewer() -> Result<(), Box<dyn Error>> {
    let args = ArtArgs::parse();
    let settings = load_settings();
    if let Err(e) = logging::init(&settings.logging) {
        eprintln!("encore-art: logging disabled: {e}");
    }

    let mut viewer = ArtViewer::default();
    if let Some(file) = &args.file {
        viewer.open(file);
    }

    with_terminal(|terminal| {
        loop {
            terminal.draw(|f| ui::draw_art_viewer(f, &viewer.view, viewer.prompt.as_deref()))?;

            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press && viewer.handle_key(key) {
                        return Ok(());
                    }
                }
            }
        }
    })
    .inspect_err(|e| warn!(error = %e, "art viewer failed"))
}

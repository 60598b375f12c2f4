use std::path::PathBuf;
use std::sync::mpsc;

use clap::Parser;
use tracing::info;

use crate::app::App;
use crate::audio::AudioPlayer;
use crate::logging;
use crate::mpris::ControlCmd;
use crate::transport::Transport;

mod art_viewer;
mod event_loop;
mod mpris_sync;
mod settings;
mod startup;
mod terminal;

pub use art_viewer::run_art_viewer;

/// Terminal media player with playlist management.
#[derive(Parser, Debug)]
#[command(name = "encore", version, about)]
pub struct Args {
    /// Media files, folders or M3U playlists to queue.
    pub paths: Vec<PathBuf>,

    /// M3U playlist to load before PATHS.
    #[arg(long, value_name = "FILE")]
    pub playlist: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    pub dump_config: bool,
}

/// Entry point of the `encore` binary.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let settings = settings::load_settings();

    if args.dump_config {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    match logging::init(&settings.logging) {
        Ok(path) => info!(log = %path.display(), "encore starting"),
        Err(e) => eprintln!("encore: logging disabled: {e}"),
    }

    let playlist =
        startup::initial_playlist(&args.paths, args.playlist.as_deref(), &settings.library);
    info!(tracks = playlist.len(), "initial playlist");

    let mut transport = Transport::new(AudioPlayer::new()?, &settings);
    let mut app = App::new(playlist, settings.ui.start_view.into());

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let mpris = crate::mpris::spawn_mpris(control_tx);

    terminal::with_terminal(|terminal| {
        let mut state = event_loop::EventLoopState::default();
        event_loop::run(
            terminal,
            &settings,
            &mut app,
            &mut transport,
            &mpris,
            &control_rx,
            &mut state,
        )
    })
}

use crate::app::App;
use crate::mpris::MprisHandle;
use crate::transport::TransportSnapshot;

/// Publish transport state; cheap enough to call every frame.
pub fn update_mpris(mpris: &MprisHandle, snap: &TransportSnapshot) {
    mpris.set_playback(snap.state, snap.loop_mode, snap.volume);
    mpris.set_position(snap.position);
}

/// Publish the loaded track, or clear it when nothing is loaded.
pub fn update_mpris_track(mpris: &MprisHandle, app: &App, loaded: bool) {
    if loaded {
        mpris.set_track_metadata(app.playlist.cursor(), app.playlist.current());
    } else {
        mpris.set_track_metadata(None, None);
    }
}

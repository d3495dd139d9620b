use crate::assets::store::AudioCache;
use crate::foundation::core::PlayMode;

/// Rewind and start every cached track. Does nothing unless `mode` is forwards.
///
/// Returns the number of tracks started.
pub(crate) fn play_all(cache: &mut AudioCache, mode: PlayMode) -> usize {
    if mode != PlayMode::Forwards {
        tracing::debug!(?mode, "audio trigger skipped");
        return 0;
    }
    let mut started = 0;
    for track in cache.tracks_mut() {
        let voice = track.voice_mut();
        voice.seek(0.0);
        voice.play();
        started += 1;
    }
    started
}

/// Pause and rewind every cached track regardless of direction.
pub(crate) fn stop_all(cache: &mut AudioCache) -> usize {
    let mut stopped = 0;
    for track in cache.tracks_mut() {
        let voice = track.voice_mut();
        voice.pause();
        voice.seek(0.0);
        stopped += 1;
    }
    stopped
}

#[cfg(test)]
#[path = "../../tests/unit/audio/trigger.rs"]
mod tests;

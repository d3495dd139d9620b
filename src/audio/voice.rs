use std::sync::Arc;

use base64::Engine as _;

use crate::foundation::error::PlayerResult;

/// MIME type attached to ID3-tagged audio payloads.
pub const MPEG_AUDIO_MIME: &str = "audio/mpeg";

/// Transport controls of one playable audio resource.
///
/// Hosts back this with their media stack. Calls are fire-and-forget: overlapping
/// `play`/`pause` from different callers follow whatever the host stack does.
pub trait AudioVoice: Send {
    /// Start or resume playback from the current position.
    fn play(&mut self);
    /// Pause playback, keeping the current position.
    fn pause(&mut self);
    /// Move the playback position.
    fn seek(&mut self, position_sec: f64);
    /// Whether the voice is playing.
    fn is_playing(&self) -> bool;
    /// Current position in seconds.
    fn position_sec(&self) -> f64;
}

/// Encoded audio payload handed to an [`AudioHost`].
///
/// Exposes both playable forms a host may want: the raw bytes (blob form) and
/// a base64 data URI.
#[derive(Clone, Debug)]
pub struct AudioSource {
    mime: &'static str,
    bytes: Arc<[u8]>,
}

impl AudioSource {
    pub(crate) fn new(mime: &'static str, bytes: Arc<[u8]>) -> Self {
        Self { mime, bytes }
    }

    /// MIME type of the payload.
    pub fn mime(&self) -> &'static str {
        self.mime
    }

    /// Encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// `data:<mime>;base64,<payload>` form.
    pub fn data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Builds playable voices from encoded audio.
///
/// This is the one place that knows about host media capabilities; the rest of
/// the pipeline only sees [`AudioVoice`].
pub trait AudioHost: Send + Sync {
    /// Construct a voice for `source`. Errors are reported as prepare warnings.
    fn create_voice(&self, source: &AudioSource) -> PlayerResult<Box<dyn AudioVoice>>;
}

/// State-only voice with no audible output.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryVoice {
    playing: bool,
    position_sec: f64,
}

impl AudioVoice for MemoryVoice {
    fn play(&mut self) {
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, position_sec: f64) {
        self.position_sec = position_sec.max(0.0);
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn position_sec(&self) -> f64 {
        self.position_sec
    }
}

/// Default host for headless use: every payload gets a [`MemoryVoice`].
#[derive(Clone, Copy, Debug, Default)]
pub struct HeadlessAudioHost;

impl AudioHost for HeadlessAudioHost {
    fn create_voice(&self, _source: &AudioSource) -> PlayerResult<Box<dyn AudioVoice>> {
        Ok(Box::new(MemoryVoice::default()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/voice.rs"]
mod tests;

use std::collections::HashMap;
use std::sync::Arc;

use crate::audio::voice::AudioVoice;
use crate::foundation::error::{PlayerError, PlayerResult};

#[derive(Clone, Debug, PartialEq, Eq)]
/// Decoded raster image in premultiplied RGBA8 form.
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major premultiplied RGBA8.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Wrap already-premultiplied pixels, checking the buffer length.
    pub fn from_rgba8_premul(width: u32, height: u32, data: Vec<u8>) -> PlayerResult<Self> {
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if data.len() != expected {
            return Err(PlayerError::validation(format!(
                "image buffer has {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        })
    }

    /// A single-colour image, mostly useful for handles built by hosts and tests.
    pub fn solid(width: u32, height: u32, premul: [u8; 4]) -> Self {
        let px = (width as usize).saturating_mul(height as usize);
        let mut data = Vec::with_capacity(px * 4);
        for _ in 0..px {
            data.extend_from_slice(&premul);
        }
        Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        }
    }

    /// Read one premultiplied pixel, `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba8_premul.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Decoded image resources keyed by asset key. Rebuilt on every prepare.
#[derive(Clone, Debug, Default)]
pub struct ImageCache {
    images: HashMap<String, PreparedImage>,
}

impl ImageCache {
    /// Look up a decoded image.
    pub fn get(&self, key: &str) -> Option<&PreparedImage> {
        self.images.get(key)
    }

    /// Return `true` if `key` has a decoded image.
    pub fn contains(&self, key: &str) -> bool {
        self.images.contains_key(key)
    }

    /// Number of cached images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Return `true` if no image is cached.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Iterate over cached keys (arbitrary order).
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.images.keys().map(String::as_str)
    }

    pub(crate) fn insert(&mut self, key: String, image: PreparedImage) {
        self.images.insert(key, image);
    }

    pub(crate) fn clear(&mut self) {
        self.images.clear();
    }
}

/// Playable audio resource with its own transport state.
pub struct AudioTrack {
    mime: &'static str,
    byte_len: usize,
    voice: Box<dyn AudioVoice>,
}

impl std::fmt::Debug for AudioTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioTrack")
            .field("mime", &self.mime)
            .field("byte_len", &self.byte_len)
            .field("playing", &self.voice.is_playing())
            .field("position_sec", &self.voice.position_sec())
            .finish()
    }
}

impl AudioTrack {
    pub(crate) fn new(mime: &'static str, byte_len: usize, voice: Box<dyn AudioVoice>) -> Self {
        Self {
            mime,
            byte_len,
            voice,
        }
    }

    /// MIME type of the encoded payload.
    pub fn mime(&self) -> &'static str {
        self.mime
    }

    /// Size of the encoded payload in bytes.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Whether the voice is currently playing.
    pub fn is_playing(&self) -> bool {
        self.voice.is_playing()
    }

    /// Current playback position in seconds.
    pub fn position_sec(&self) -> f64 {
        self.voice.position_sec()
    }

    /// Move the playback position without changing play/pause state.
    pub fn seek(&mut self, position_sec: f64) {
        self.voice.seek(position_sec);
    }

    pub(crate) fn voice_mut(&mut self) -> &mut dyn AudioVoice {
        self.voice.as_mut()
    }
}

/// Audio resources keyed by asset key. Same lifecycle as [`ImageCache`].
#[derive(Debug, Default)]
pub struct AudioCache {
    tracks: HashMap<String, AudioTrack>,
}

impl AudioCache {
    /// Look up an audio track.
    pub fn get(&self, key: &str) -> Option<&AudioTrack> {
        self.tracks.get(key)
    }

    /// Mutable lookup, e.g. to seek a single track.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut AudioTrack> {
        self.tracks.get_mut(key)
    }

    /// Return `true` if `key` has an audio track.
    pub fn contains(&self, key: &str) -> bool {
        self.tracks.contains_key(key)
    }

    /// Number of cached tracks.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Return `true` if no track is cached.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Iterate over `(key, track)` pairs (arbitrary order).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AudioTrack)> {
        self.tracks.iter().map(|(k, t)| (k.as_str(), t))
    }

    pub(crate) fn tracks_mut(&mut self) -> impl Iterator<Item = &mut AudioTrack> {
        self.tracks.values_mut()
    }

    pub(crate) fn insert(&mut self, key: String, track: AudioTrack) {
        self.tracks.insert(key, track);
    }

    pub(crate) fn clear(&mut self) {
        self.tracks.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;

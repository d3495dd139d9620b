use std::collections::BTreeSet;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crate::assets::decode::{ImageDecoder, PayloadKind, sniff_payload};
use crate::assets::store::{AudioCache, AudioTrack, ImageCache, PreparedImage};
use crate::audio::voice::{AudioHost, AudioSource, MPEG_AUDIO_MIME};
use crate::foundation::error::{PlayerError, PlayerResult};
use crate::scene::model::{AnimationDesc, AssetSource, Payload};

/// Non-fatal problem found while preparing assets. The affected key is left out
/// of the caches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PrepareWarning {
    /// Payload matched neither a known image nor a known audio signature.
    UnsupportedPayload {
        /// Asset key.
        key: String,
    },
    /// The image decoder reported an error.
    DecodeFailed {
        /// Asset key.
        key: String,
        /// Decoder message.
        message: String,
    },
    /// The audio host could not build a voice.
    AudioUnavailable {
        /// Asset key.
        key: String,
        /// Host message.
        message: String,
    },
}

impl PrepareWarning {
    /// Asset key the warning is about.
    pub fn key(&self) -> &str {
        match self {
            Self::UnsupportedPayload { key }
            | Self::DecodeFailed { key, .. }
            | Self::AudioUnavailable { key, .. } => key,
        }
    }
}

/// Outcome of a completed prepare.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrepareReport {
    /// Generation this report belongs to.
    pub generation: u64,
    /// Images available to the compositor (handles plus successful decodes).
    pub images: usize,
    /// Audio tracks available to the trigger.
    pub audio: usize,
    /// Images that went through the asynchronous decode gate.
    pub decoded: usize,
    /// Late decode results from superseded prepares discarded while this prepare
    /// started or waited. Results that land after it completed are counted by the
    /// next prepare.
    pub stale_dropped: usize,
    /// Recoverable problems, in discovery order.
    pub warnings: Vec<PrepareWarning>,
}

impl PrepareReport {
    /// Return `true` when nothing was dropped or failed.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

struct DecodeMsg {
    generation: u64,
    key: String,
    result: PlayerResult<PreparedImage>,
}

/// Bookkeeping for one prepare whose image decodes have not all reported back.
#[derive(Debug)]
pub(crate) struct InFlight {
    generation: u64,
    total: usize,
    loaded: usize,
    decoded: usize,
    pending_keys: BTreeSet<String>,
    audio: usize,
    stale_dropped: usize,
    warnings: Vec<PrepareWarning>,
    timeout: Duration,
    deadline: Instant,
}

impl InFlight {
    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    fn is_complete(&self) -> bool {
        self.loaded == self.total
    }

    fn stall_error(&self) -> PlayerError {
        tracing::warn!(
            generation = self.generation,
            pending = ?self.pending_keys,
            "image decode stalled"
        );
        PlayerError::DecodeStall {
            pending: self.total - self.loaded,
            timeout_ms: self.timeout.as_millis() as u64,
        }
    }

    fn report(&self, images: &ImageCache) -> PrepareReport {
        PrepareReport {
            generation: self.generation,
            images: images.len(),
            audio: self.audio,
            decoded: self.decoded,
            stale_dropped: self.stale_dropped,
            warnings: self.warnings.clone(),
        }
    }
}

/// Whether [`AssetResolver::settle`] may block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Settle {
    /// Drain whatever has arrived and return.
    Poll,
    /// Wait until the gate opens or the deadline passes.
    Wait,
}

/// Turns an animation's asset map into image and audio caches.
///
/// Image decodes run on a private rayon pool and report back over one channel that
/// lives as long as the resolver. Every message carries the generation of the
/// prepare that spawned it, so results from a superseded prepare are discarded.
pub(crate) struct AssetResolver {
    decoder: Arc<dyn ImageDecoder>,
    audio_host: Arc<dyn AudioHost>,
    pool: rayon::ThreadPool,
    tx: mpsc::Sender<DecodeMsg>,
    rx: mpsc::Receiver<DecodeMsg>,
}

impl AssetResolver {
    pub(crate) fn new(
        decoder: Arc<dyn ImageDecoder>,
        audio_host: Arc<dyn AudioHost>,
        threads: Option<usize>,
    ) -> PlayerResult<Self> {
        let (tx, rx) = mpsc::channel();
        Ok(Self {
            decoder,
            audio_host,
            pool: build_thread_pool(threads)?,
            tx,
            rx,
        })
    }

    /// Rebuild both caches from `anim` and spawn the image decodes.
    ///
    /// Handles and audio land in the caches before this returns; decoded images land
    /// as [`Self::settle`] receives them.
    pub(crate) fn begin(
        &self,
        anim: &AnimationDesc,
        generation: u64,
        timeout: Duration,
        images: &mut ImageCache,
        audio: &mut AudioCache,
    ) -> InFlight {
        images.clear();
        audio.clear();

        let mut inflight = InFlight {
            generation,
            total: 0,
            loaded: 0,
            decoded: 0,
            pending_keys: BTreeSet::new(),
            audio: 0,
            stale_dropped: 0,
            warnings: Vec::new(),
            timeout,
            deadline: Instant::now() + timeout,
        };
        self.drain_stale(&mut inflight);

        for (key, source) in &anim.images {
            match source {
                AssetSource::Handle(img) => images.insert(key.clone(), img.clone()),
                AssetSource::Image(payload) => self.spawn_decode(&mut inflight, key, payload),
                AssetSource::Audio(payload) => self.open_audio(&mut inflight, audio, key, payload),
                AssetSource::Encoded(payload) => match sniff_payload(payload.bytes()) {
                    Some(PayloadKind::Image) => self.spawn_decode(&mut inflight, key, payload),
                    Some(PayloadKind::Audio) => {
                        self.open_audio(&mut inflight, audio, key, payload)
                    }
                    None => {
                        tracing::warn!(%key, "unsupported asset payload dropped");
                        inflight
                            .warnings
                            .push(PrepareWarning::UnsupportedPayload { key: key.clone() });
                    }
                },
            }
        }

        tracing::debug!(
            generation,
            handles = images.len(),
            decodes = inflight.total,
            audio = inflight.audio,
            "asset prepare started"
        );
        inflight
    }

    /// Feed received decode results into `images` until the gate opens.
    ///
    /// Returns the report once every decode of `inflight` has reported back, `None`
    /// if polling found the gate still closed.
    pub(crate) fn settle(
        &self,
        inflight: &mut InFlight,
        images: &mut ImageCache,
        mode: Settle,
    ) -> PlayerResult<Option<PrepareReport>> {
        loop {
            if inflight.is_complete() {
                return Ok(Some(inflight.report(images)));
            }

            let msg = match mode {
                Settle::Poll => match self.rx.try_recv() {
                    Ok(msg) => msg,
                    Err(mpsc::TryRecvError::Empty) => {
                        if Instant::now() >= inflight.deadline {
                            return Err(inflight.stall_error());
                        }
                        return Ok(None);
                    }
                    Err(mpsc::TryRecvError::Disconnected) => {
                        return Err(PlayerError::decode("decode channel disconnected"));
                    }
                },
                Settle::Wait => {
                    let remaining = inflight.deadline.saturating_duration_since(Instant::now());
                    match self.rx.recv_timeout(remaining) {
                        Ok(msg) => msg,
                        Err(mpsc::RecvTimeoutError::Timeout) => {
                            return Err(inflight.stall_error());
                        }
                        Err(mpsc::RecvTimeoutError::Disconnected) => {
                            return Err(PlayerError::decode("decode channel disconnected"));
                        }
                    }
                }
            };

            if msg.generation != inflight.generation {
                tracing::warn!(
                    stale = msg.generation,
                    current = inflight.generation,
                    key = %msg.key,
                    "discarding decode result from superseded prepare"
                );
                inflight.stale_dropped += 1;
                continue;
            }

            inflight.loaded += 1;
            inflight.pending_keys.remove(&msg.key);
            match msg.result {
                Ok(img) => {
                    inflight.decoded += 1;
                    images.insert(msg.key, img);
                }
                Err(e) => {
                    tracing::warn!(key = %msg.key, error = %e, "image decode failed");
                    inflight.warnings.push(PrepareWarning::DecodeFailed {
                        key: msg.key,
                        message: e.to_string(),
                    });
                }
            }
            tracing::debug!(
                loaded = inflight.loaded,
                total = inflight.total,
                "image decode completed"
            );
        }
    }

    // Nothing of this generation is spawned yet, so everything queued is stale.
    fn drain_stale(&self, inflight: &mut InFlight) {
        while let Ok(msg) = self.rx.try_recv() {
            tracing::warn!(
                stale = msg.generation,
                current = inflight.generation,
                key = %msg.key,
                "discarding decode result from superseded prepare"
            );
            inflight.stale_dropped += 1;
        }
    }

    fn spawn_decode(&self, inflight: &mut InFlight, key: &str, payload: &Payload) {
        inflight.total += 1;
        inflight.pending_keys.insert(key.to_string());

        let generation = inflight.generation;
        let key = key.to_string();
        let bytes = payload.shared();
        let decoder = Arc::clone(&self.decoder);
        let tx = self.tx.clone();
        self.pool.spawn(move || {
            let result = decoder.decode(&bytes);
            // The receiver only goes away with the resolver itself.
            let _ = tx.send(DecodeMsg {
                generation,
                key,
                result,
            });
        });
    }

    fn open_audio(
        &self,
        inflight: &mut InFlight,
        audio: &mut AudioCache,
        key: &str,
        payload: &Payload,
    ) {
        let source = AudioSource::new(MPEG_AUDIO_MIME, payload.shared());
        match self.audio_host.create_voice(&source) {
            Ok(voice) => {
                audio.insert(
                    key.to_string(),
                    AudioTrack::new(source.mime(), source.bytes().len(), voice),
                );
                inflight.audio += 1;
            }
            Err(e) => {
                tracing::warn!(%key, error = %e, "audio voice unavailable");
                inflight.warnings.push(PrepareWarning::AudioUnavailable {
                    key: key.to_string(),
                    message: e.to_string(),
                });
            }
        }
    }
}

fn build_thread_pool(threads: Option<usize>) -> PlayerResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PlayerError::validation(
            "decode_threads must be >= 1 when set",
        ));
    }
    let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("asset-decode-{i}"));
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PlayerError::validation(format!("failed to build decode thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/resolver.rs"]
mod tests;

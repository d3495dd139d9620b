use std::sync::Arc;

use crate::assets::decode::{ImageCrateDecoder, ImageDecoder};
use crate::assets::resolver::{AssetResolver, InFlight, PrepareReport, Settle};
use crate::assets::store::{AudioCache, ImageCache};
use crate::audio::trigger;
use crate::audio::voice::{AudioHost, HeadlessAudioHost};
use crate::foundation::core::{FrameIndex, PlayMode};
use crate::foundation::error::{PlayerError, PlayerResult};
use crate::player::opts::RendererOpts;
use crate::render::compositor::{Compositor, SpriteCompositor};
use crate::render::frame_cache::FrameCache;
use crate::render::surface::Surface;
use crate::scene::model::AnimationDesc;
use crate::scene::overlay::DynamicOverlays;

/// Identifies one prepare call. Only the most recent ticket is honoured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PrepareTicket {
    generation: u64,
}

impl PrepareTicket {
    /// Generation number assigned to the prepare.
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// What a [`Renderer::draw_frame`] call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
    /// Output not visible; nothing was touched.
    Skipped,
    /// A cached snapshot was copied to the output.
    CacheHit,
    /// The compositor painted the frame.
    Composited,
}

enum PrepareState {
    Idle,
    Pending(InFlight),
    Ready(PrepareReport),
    Failed,
}

/// Builder for a [`Renderer`] with non-default collaborators.
pub struct RendererBuilder {
    width: u32,
    height: u32,
    opts: RendererOpts,
    compositor: Box<dyn Compositor>,
    decoder: Arc<dyn ImageDecoder>,
    audio_host: Arc<dyn AudioHost>,
}

impl RendererBuilder {
    /// Set renderer options.
    pub fn opts(mut self, opts: RendererOpts) -> Self {
        self.opts = opts;
        self
    }

    /// Replace the built-in [`SpriteCompositor`].
    pub fn compositor(mut self, compositor: impl Compositor + 'static) -> Self {
        self.compositor = Box::new(compositor);
        self
    }

    /// Replace the `image`-crate decoder.
    pub fn image_decoder(mut self, decoder: Arc<dyn ImageDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Replace the headless audio host.
    pub fn audio_host(mut self, host: Arc<dyn AudioHost>) -> Self {
        self.audio_host = host;
        self
    }

    /// Validate options and build the renderer.
    pub fn build(self) -> PlayerResult<Renderer> {
        self.opts.validate()?;
        let resolver = AssetResolver::new(self.decoder, self.audio_host, self.opts.decode_threads)?;
        Ok(Renderer {
            target: Surface::new(self.width, self.height),
            offscreen: Surface::new(self.width, self.height),
            opts: self.opts,
            compositor: self.compositor,
            resolver,
            images: ImageCache::default(),
            audio: AudioCache::default(),
            overlays: DynamicOverlays::default(),
            frames: FrameCache::new(),
            anim: None,
            generation: 0,
            state: PrepareState::Idle,
            play_mode: PlayMode::Forwards,
            visible: true,
        })
    }
}

/// Per-instance frame pipeline: asset prepare, offscreen composite, frame cache and
/// audio triggers.
///
/// Call order: [`Renderer::prepare`] (or `begin_prepare` + `poll_prepare` /
/// `finish_prepare`) once per loaded animation, then [`Renderer::draw_frame`] per
/// tick. Nothing here is shared across instances.
pub struct Renderer {
    opts: RendererOpts,
    target: Surface,
    offscreen: Surface,
    compositor: Box<dyn Compositor>,
    resolver: AssetResolver,
    images: ImageCache,
    audio: AudioCache,
    overlays: DynamicOverlays,
    frames: FrameCache,
    anim: Option<Arc<AnimationDesc>>,
    generation: u64,
    state: PrepareState,
    play_mode: PlayMode,
    visible: bool,
}

impl Renderer {
    /// Renderer with the built-in compositor, decoder and headless audio.
    pub fn new(width: u32, height: u32, opts: RendererOpts) -> PlayerResult<Self> {
        Self::builder(width, height).opts(opts).build()
    }

    /// Start configuring a renderer whose visible surface is `width` x `height`.
    pub fn builder(width: u32, height: u32) -> RendererBuilder {
        RendererBuilder {
            width,
            height,
            opts: RendererOpts::default(),
            compositor: Box::new(SpriteCompositor),
            decoder: Arc::new(ImageCrateDecoder),
            audio_host: Arc::new(HeadlessAudioHost),
        }
    }

    /// Load `anim` and block until its image decodes complete or time out.
    #[tracing::instrument(skip(self, anim))]
    pub fn prepare(&mut self, anim: impl Into<Arc<AnimationDesc>>) -> PlayerResult<PrepareReport> {
        let ticket = self.begin_prepare(anim)?;
        self.finish_prepare(ticket)
    }

    /// Start loading `anim` without waiting for image decodes.
    ///
    /// Replaces both asset caches and the overlay map, and supersedes any prepare
    /// still in flight. Drawing is refused until the returned ticket completes.
    pub fn begin_prepare(
        &mut self,
        anim: impl Into<Arc<AnimationDesc>>,
    ) -> PlayerResult<PrepareTicket> {
        let anim = anim.into();
        anim.validate()?;

        self.generation += 1;
        if self.opts.clear_frames_on_prepare {
            self.frames.clear();
        }
        self.overlays = DynamicOverlays::from_map(&anim.dynamic_elements);
        let inflight = self.resolver.begin(
            &anim,
            self.generation,
            self.opts.decode_timeout(),
            &mut self.images,
            &mut self.audio,
        );
        self.state = PrepareState::Pending(inflight);
        self.anim = Some(anim);

        Ok(PrepareTicket {
            generation: self.generation,
        })
    }

    /// Absorb finished decodes without blocking.
    ///
    /// Returns `Ok(None)` while decodes are outstanding and the timeout has not
    /// passed.
    pub fn poll_prepare(&mut self, ticket: PrepareTicket) -> PlayerResult<Option<PrepareReport>> {
        self.settle(ticket, Settle::Poll)
    }

    /// Block until every image decode of `ticket` has completed.
    pub fn finish_prepare(&mut self, ticket: PrepareTicket) -> PlayerResult<PrepareReport> {
        match self.settle(ticket, Settle::Wait)? {
            Some(report) => Ok(report),
            None => Err(PlayerError::validation(
                "prepare did not complete while waiting",
            )),
        }
    }

    fn settle(
        &mut self,
        ticket: PrepareTicket,
        mode: Settle,
    ) -> PlayerResult<Option<PrepareReport>> {
        if ticket.generation != self.generation {
            return Err(PlayerError::Superseded {
                generation: ticket.generation,
                current: self.generation,
            });
        }

        let inflight = match &mut self.state {
            PrepareState::Ready(report) => return Ok(Some(report.clone())),
            PrepareState::Failed => {
                return Err(PlayerError::validation(format!(
                    "prepare generation {} already failed",
                    ticket.generation
                )));
            }
            PrepareState::Idle => {
                return Err(PlayerError::validation("no prepare in progress"));
            }
            PrepareState::Pending(inflight) => inflight,
        };
        debug_assert_eq!(inflight.generation(), ticket.generation);

        match self.resolver.settle(inflight, &mut self.images, mode) {
            Ok(Some(report)) => {
                tracing::debug!(
                    generation = report.generation,
                    images = report.images,
                    audio = report.audio,
                    warnings = report.warnings.len(),
                    "prepare complete"
                );
                self.state = PrepareState::Ready(report.clone());
                Ok(Some(report))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                self.state = PrepareState::Failed;
                Err(e)
            }
        }
    }

    /// Draw `frame` onto the visible surface.
    ///
    /// Skips entirely while visibility tracking reports the output hidden. Otherwise
    /// clears the output, then either replays a cached snapshot or composites the
    /// frame offscreen and copies it over, caching the result when enabled.
    #[tracing::instrument(skip(self))]
    pub fn draw_frame(&mut self, frame: FrameIndex) -> PlayerResult<DrawOutcome> {
        if self.opts.visibility_tracking && !self.visible {
            return Ok(DrawOutcome::Skipped);
        }

        let anim = match (&self.state, self.anim.as_ref()) {
            (PrepareState::Ready(_), Some(anim)) => anim,
            _ => {
                return Err(PlayerError::validation(
                    "draw_frame requires a completed prepare",
                ));
            }
        };
        if !anim.contains_frame(frame) {
            return Err(PlayerError::validation(format!(
                "frame {} out of range for animation with {} frames",
                frame.0, anim.frames
            )));
        }

        self.target.clear();

        if self.opts.cache_frames
            && let Some(snap) = self.frames.get(frame)
        {
            tracing::debug!(frame = frame.0, "frame cache hit");
            self.target.blit_snapshot(snap);
            return Ok(DrawOutcome::CacheHit);
        }

        self.offscreen
            .resize(self.target.width(), self.target.height());
        self.compositor.render(
            &mut self.offscreen,
            &self.images,
            &self.overlays,
            anim,
            frame,
        )?;
        self.target.blit(&self.offscreen);

        if self.opts.cache_frames {
            self.frames.put(frame, self.offscreen.snapshot());
        }
        Ok(DrawOutcome::Composited)
    }

    /// Rewind and start every audio track, only during forward playback.
    ///
    /// Returns the number of tracks started.
    pub fn play_audio(&mut self) -> usize {
        trigger::play_all(&mut self.audio, self.play_mode)
    }

    /// Pause and rewind every audio track.
    pub fn stop_audio(&mut self) -> usize {
        trigger::stop_all(&mut self.audio)
    }

    /// Reset the visible surface to transparent.
    pub fn clear(&mut self) {
        self.target.clear();
    }

    /// Resize (and clear) the visible surface. Cached frames keep their native size.
    pub fn resize_target(&mut self, width: u32, height: u32) {
        self.target.resize(width, height);
    }

    /// The visible surface.
    pub fn target(&self) -> &Surface {
        &self.target
    }

    /// Set the playback direction used by [`Renderer::play_audio`].
    pub fn set_play_mode(&mut self, mode: PlayMode) {
        self.play_mode = mode;
    }

    /// Current playback direction.
    pub fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    /// Report whether the output is on screen.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Last reported visibility.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Toggle frame caching. Existing snapshots are kept.
    pub fn set_cache_frames(&mut self, enabled: bool) {
        self.opts.cache_frames = enabled;
    }

    /// Toggle the visibility gate.
    pub fn set_visibility_tracking(&mut self, enabled: bool) {
        self.opts.visibility_tracking = enabled;
    }

    /// Active options.
    pub fn opts(&self) -> &RendererOpts {
        &self.opts
    }

    /// Generation of the most recent prepare (0 before the first).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the most recent prepare has completed.
    pub fn is_ready(&self) -> bool {
        matches!(self.state, PrepareState::Ready(_))
    }

    /// The animation of the most recent prepare.
    pub fn animation(&self) -> Option<&AnimationDesc> {
        self.anim.as_deref()
    }

    /// Decoded images.
    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    /// Audio tracks.
    pub fn audio(&self) -> &AudioCache {
        &self.audio
    }

    /// Mutable audio tracks, for per-track seeks.
    pub fn audio_mut(&mut self) -> &mut AudioCache {
        &mut self.audio
    }

    /// Overlays handed to the compositor.
    pub fn overlays(&self) -> &DynamicOverlays {
        &self.overlays
    }

    /// Cached frame snapshots.
    pub fn frame_cache(&self) -> &FrameCache {
        &self.frames
    }
}

#[cfg(test)]
#[path = "../../tests/unit/player/renderer.rs"]
mod tests;

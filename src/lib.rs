//! Per-frame rendering pipeline for sprite animation playback.
//!
//! A [`Renderer`] owns everything one playing animation needs between the parser and
//! the screen:
//!
//! 1. **Prepare**: classify the animation's asset map, decode images on worker
//!    threads and build playable audio tracks ([`Renderer::prepare`]).
//! 2. **Draw**: clear the visible [`Surface`], then either replay a cached
//!    [`FrameSnapshot`] or run the [`Compositor`] offscreen and copy the result over
//!    ([`Renderer::draw_frame`]).
//! 3. **Audio**: start or stop every track together, gated on [`PlayMode`]
//!    ([`Renderer::play_audio`], [`Renderer::stop_audio`]).
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Premultiplied RGBA8** everywhere pixels are stored, including cached frames.
//! - **Generation-tagged prepares**: decode results from a superseded prepare never
//!   reach the caches of a newer one.
//! - **Host seams as traits**: image decoding ([`ImageDecoder`]), audio output
//!   ([`AudioHost`]) and frame painting ([`Compositor`]) are pluggable.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod audio;
mod foundation;
mod player;
mod render;
mod scene;

pub use crate::assets::decode::{
    ImageCrateDecoder, ImageDecoder, PayloadKind, decode_base64, decode_image, sniff_payload,
};
pub use crate::assets::resolver::{PrepareReport, PrepareWarning};
pub use crate::assets::store::{AudioCache, AudioTrack, ImageCache, PreparedImage};
pub use crate::audio::voice::{
    AudioHost, AudioSource, AudioVoice, HeadlessAudioHost, MPEG_AUDIO_MIME, MemoryVoice,
};
pub use crate::foundation::core::{Affine, Canvas, FrameIndex, PlayMode, Point, Rect, Vec2};
pub use crate::foundation::error::{PlayerError, PlayerResult};
pub use crate::player::opts::RendererOpts;
pub use crate::player::renderer::{DrawOutcome, PrepareTicket, Renderer, RendererBuilder};
pub use crate::render::compositor::{Compositor, SpriteCompositor};
pub use crate::render::frame_cache::{FrameCache, FrameCacheStats};
pub use crate::render::surface::{FrameSnapshot, Surface};
pub use crate::scene::model::{
    AnimationDesc, AssetSource, LayoutRect, Payload, SpriteDesc, SpriteFrame,
};
pub use crate::scene::overlay::{DynamicOverlay, DynamicOverlays};

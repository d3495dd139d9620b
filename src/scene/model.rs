use std::collections::BTreeMap;
use std::sync::Arc;

use crate::assets::decode::decode_base64;
use crate::assets::store::PreparedImage;
use crate::foundation::core::{Canvas, FrameIndex};
use crate::foundation::error::{PlayerError, PlayerResult};
use crate::scene::overlay::DynamicOverlay;

/// Encoded asset bytes shared between the description and decode workers.
#[derive(Clone, PartialEq, Eq)]
pub struct Payload(Arc<[u8]>);

impl Payload {
    /// Wrap raw encoded bytes.
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(bytes.into())
    }

    /// Borrow the encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    pub(crate) fn shared(&self) -> Arc<[u8]> {
        Arc::clone(&self.0)
    }
}

impl std::fmt::Debug for Payload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Payload").field("len", &self.0.len()).finish()
    }
}

/// One entry of an animation's asset map.
#[derive(Clone, Debug, serde::Deserialize)]
#[serde(from = "AssetSourceRepr")]
pub enum AssetSource {
    /// Already-decoded image supplied by the host.
    Handle(PreparedImage),
    /// Encoded image the parser already identified.
    Image(Payload),
    /// Encoded audio the parser already identified.
    Audio(Payload),
    /// Encoded bytes of unknown kind, classified by magic-byte sniffing.
    ///
    /// JSON strings that are not valid base64 land here with no bytes, so only
    /// that key is dropped at prepare time.
    Encoded(Payload),
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "snake_case")]
enum TaggedKind {
    Image,
    Audio,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum AssetSourceRepr {
    Bare(String),
    Tagged { kind: TaggedKind, data: String },
}

impl From<AssetSourceRepr> for AssetSource {
    fn from(repr: AssetSourceRepr) -> Self {
        let (kind, data) = match repr {
            AssetSourceRepr::Bare(s) => (None, s),
            AssetSourceRepr::Tagged { kind, data } => (Some(kind), data),
        };
        let bytes = match decode_base64(&data) {
            Ok(bytes) => bytes,
            // Left for the resolver to drop with an unsupported-payload warning.
            Err(e) => {
                tracing::debug!(error = %e, "asset payload is not base64");
                return Self::Encoded(Payload::new(Vec::new()));
            }
        };
        let payload = Payload::new(bytes);
        match kind {
            None => Self::Encoded(payload),
            Some(TaggedKind::Image) => Self::Image(payload),
            Some(TaggedKind::Audio) => Self::Audio(payload),
        }
    }
}

/// Sprite placement rectangle in design-space pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Deserialize)]
pub struct LayoutRect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

/// Per-frame state of one sprite.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct SpriteFrame {
    /// Opacity in `[0, 1]`. Zero hides the sprite for this frame.
    #[serde(default)]
    pub alpha: f64,
    /// Where the image is placed before `transform` applies.
    #[serde(default)]
    pub layout: LayoutRect,
    /// Row-major `[a, b, c, d, tx, ty]` affine; identity when absent.
    #[serde(default)]
    pub transform: Option<[f64; 6]>,
}

/// A sprite bound to one image key, with one entry per animation frame.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct SpriteDesc {
    /// Key into the image map (or a dynamic overlay of the same key).
    pub image_key: String,
    /// Frame entries; missing trailing entries mean the sprite is absent.
    #[serde(default)]
    pub frames: Vec<SpriteFrame>,
}

/// Decoded animation description as handed over by the parsing collaborator.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct AnimationDesc {
    /// Design-space size the sprite geometry is expressed in.
    pub canvas: Canvas,
    /// Nominal frames per second.
    pub fps: u32,
    /// Frame count.
    pub frames: u64,
    /// Image/audio assets keyed by asset key.
    #[serde(default)]
    pub images: BTreeMap<String, AssetSource>,
    /// Sprites in painter's order.
    #[serde(default)]
    pub sprites: Vec<SpriteDesc>,
    /// Host-substituted overlays keyed by image key.
    #[serde(skip)]
    pub dynamic_elements: BTreeMap<String, DynamicOverlay>,
}

impl AnimationDesc {
    /// Empty description with no assets or sprites.
    pub fn new(canvas: Canvas, fps: u32, frames: u64) -> PlayerResult<Self> {
        let desc = Self {
            canvas,
            fps,
            frames,
            images: BTreeMap::new(),
            sprites: Vec::new(),
            dynamic_elements: BTreeMap::new(),
        };
        desc.validate()?;
        Ok(desc)
    }

    /// Parse and validate a JSON description.
    pub fn from_json_str(s: &str) -> PlayerResult<Self> {
        let desc: Self = serde_json::from_str(s).map_err(|e| PlayerError::serde(e.to_string()))?;
        desc.validate()?;
        Ok(desc)
    }

    /// Check the invariants the renderer relies on.
    pub fn validate(&self) -> PlayerResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(PlayerError::validation("animation canvas must be non-empty"));
        }
        if self.fps == 0 {
            return Err(PlayerError::validation("animation fps must be > 0"));
        }
        if self.frames == 0 {
            return Err(PlayerError::validation(
                "animation must have at least one frame",
            ));
        }
        Ok(())
    }

    /// Return `true` if `frame` addresses a frame of this animation.
    pub fn contains_frame(&self, frame: FrameIndex) -> bool {
        frame.0 < self.frames
    }

    /// Insert or replace an asset entry.
    pub fn insert_asset(&mut self, key: impl Into<String>, source: AssetSource) {
        self.images.insert(key.into(), source);
    }

    /// Substitute `image` wherever sprites reference `key`.
    pub fn set_dynamic_image(&mut self, key: impl Into<String>, image: PreparedImage) {
        self.dynamic_elements
            .insert(key.into(), DynamicOverlay::Image(image));
    }

    /// Hide every sprite that references `key`.
    pub fn set_dynamic_hidden(&mut self, key: impl Into<String>) {
        self.dynamic_elements
            .insert(key.into(), DynamicOverlay::Hidden);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;

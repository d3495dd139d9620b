use crate::foundation::error::{PlayerError, PlayerResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// 0-based frame index into a loaded animation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Pixel dimensions of a raster surface or design-space canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> PlayerResult<Self> {
        if width == 0 || height == 0 {
            return Err(PlayerError::validation("canvas dimensions must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Number of pixels covered by this canvas.
    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }
}

/// Playback direction reported by the scheduler.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayMode {
    /// Normal forward playback. The only mode that triggers audio.
    #[default]
    Forwards,
    /// Reverse playback.
    Backwards,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;

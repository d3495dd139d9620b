use std::time::Duration;

use crate::foundation::error::{PlayerError, PlayerResult};

/// Construction-time options for a [`crate::Renderer`].
///
/// Every field has a default, so a JSON config only needs the keys it changes.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RendererOpts {
    /// Keep a snapshot of every composited frame and replay it on revisits.
    pub cache_frames: bool,
    /// Skip drawing while the host reports the output as not visible.
    pub visibility_tracking: bool,
    /// How long a prepare may wait for image decodes before failing.
    pub decode_timeout_ms: u64,
    /// Override the decode worker count. `None` uses rayon defaults.
    pub decode_threads: Option<usize>,
    /// Drop cached frames whenever a new prepare starts.
    pub clear_frames_on_prepare: bool,
}

impl Default for RendererOpts {
    fn default() -> Self {
        Self {
            cache_frames: false,
            visibility_tracking: false,
            decode_timeout_ms: 10_000,
            decode_threads: None,
            clear_frames_on_prepare: true,
        }
    }
}

impl RendererOpts {
    /// Parse options from JSON. Missing keys take their defaults.
    pub fn from_json_str(s: &str) -> PlayerResult<Self> {
        let opts: Self = serde_json::from_str(s).map_err(|e| PlayerError::serde(e.to_string()))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Reject settings the renderer cannot honour.
    pub fn validate(&self) -> PlayerResult<()> {
        if self.decode_timeout_ms == 0 {
            return Err(PlayerError::validation("decode_timeout_ms must be > 0"));
        }
        if self.decode_threads == Some(0) {
            return Err(PlayerError::validation(
                "decode_threads must be >= 1 when set",
            ));
        }
        Ok(())
    }

    pub(crate) fn decode_timeout(&self) -> Duration {
        Duration::from_millis(self.decode_timeout_ms)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/player/opts.rs"]
mod tests;

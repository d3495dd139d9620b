/// Result alias used throughout the player pipeline.
pub type PlayerResult<T> = Result<T, PlayerError>;

/// Error type for prepare, draw and audio operations.
#[derive(thiserror::Error, Debug)]
pub enum PlayerError {
    /// Invalid input or a violated call-order contract.
    #[error("validation error: {0}")]
    Validation(String),

    /// An asset payload could not be turned into a resource.
    #[error("decode error: {0}")]
    Decode(String),

    /// Image decodes did not all complete before the prepare timeout.
    #[error("decode stall: {pending} image decode(s) still pending after {timeout_ms}ms")]
    DecodeStall {
        /// Number of decodes that never signalled completion.
        pending: usize,
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// A newer prepare replaced the one being awaited.
    #[error("prepare generation {generation} superseded by generation {current}")]
    Superseded {
        /// Generation of the stale prepare.
        generation: u64,
        /// Generation currently owned by the renderer.
        current: u64,
    },

    /// JSON input could not be parsed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other failure, with its source chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlayerError {
    /// Build a [`PlayerError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PlayerError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`PlayerError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for failures a caller may recover from by retrying `prepare`
    /// with different input.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::DecodeStall { .. } | Self::Superseded { .. }
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

//! Error types for the shell.

use thiserror::Error;

/// Result type for shell operations.
pub type Result<T> = std::result::Result<T, ShellError>;

/// Errors that can occur while reconciling chrome and persistence.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShellError {
    /// The OS or renderer lacks a feature. Callers treat this as a no-op.
    #[error("capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// The renderer's script context can't take requests yet.
    #[error("renderer not ready: {0}")]
    NotReady(String),

    /// Storage settings were configured more than once.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Bar color and icon theme don't contrast, or a color didn't parse.
    #[error("invalid appearance: {0}")]
    InvalidAppearance(String),

    /// Any other failure reported by the renderer bridge.
    #[error("bridge error: {0}")]
    Bridge(String),
}

impl ShellError {
    /// Whether the failure is an expected branch rather than a fault.
    pub fn is_tolerated(&self) -> bool {
        matches!(self, Self::CapabilityUnavailable(_) | Self::NotReady(_))
    }
}

//! Message boundary between the native owner thread and the renderer's
//! script context.
//!
//! Requests are queued onto the script context and never awaited. The
//! renderer reports how each one ended through [`BridgeOutcome`], possibly
//! long after the lifecycle event that issued it.

use crate::error::Result;
use std::fmt;

/// Identifies a posted request so its reply can be matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeRequest {
    /// Install or replace the safe-area stylesheet on the current document.
    InjectStyle { css: String },
    /// Remove the safe-area stylesheet.
    RemoveStyle,
    /// Ask the status bar plugin to stop drawing content under the bar.
    RequestOverlayDisabled,
}

impl BridgeRequest {
    pub fn name(&self) -> &'static str {
        match self {
            Self::InjectStyle { .. } => "inject-style",
            Self::RemoveStyle => "remove-style",
            Self::RequestOverlayDisabled => "request-overlay-disabled",
        }
    }
}

/// How the script context finished a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeOutcome {
    Completed,
    /// The capability wasn't registered yet; the request was dropped.
    CapabilityMissing,
    Rejected(String),
}

impl BridgeOutcome {
    /// Parse the outcome string reported by the generated scripts.
    pub fn from_report(report: &str) -> Self {
        match report {
            "ok" => Self::Completed,
            "unavailable" => Self::CapabilityMissing,
            other => Self::Rejected(other.strip_prefix("error:").unwrap_or(other).to_string()),
        }
    }
}

/// Fire-and-forget channel into the renderer.
pub trait RendererBridge {
    /// Queue `request` on the script context and return immediately.
    ///
    /// Errors describe why the request could not be queued at all, for
    /// example [`ShellError::NotReady`](crate::ShellError::NotReady) while
    /// no document exists.
    fn post(&mut self, id: RequestId, request: &BridgeRequest) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_report() {
        assert_eq!(BridgeOutcome::from_report("ok"), BridgeOutcome::Completed);
        assert_eq!(BridgeOutcome::from_report("unavailable"), BridgeOutcome::CapabilityMissing);
        assert_eq!(
            BridgeOutcome::from_report("error:plugin threw"),
            BridgeOutcome::Rejected("plugin threw".to_string())
        );
    }
}

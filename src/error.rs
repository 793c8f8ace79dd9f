//! Unified error handling for livechat-insight.
//!
//! Unknown and ignored command kinds are not errors; they are reported as
//! [`Dispatched`](crate::handlers::Dispatched) outcomes. Only payload decode
//! failures leave the dispatcher as errors.

use blive_proto::ProtocolError;
use thiserror::Error;

// ============================================================================
// Dispatch Errors (command processing)
// ============================================================================

/// Errors that can occur while dispatching a raw command.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to decode {cmd}: {source}")]
    Decode {
        cmd: &'static str,
        #[source]
        source: ProtocolError,
    },
}

impl DispatchError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Decode { source, .. } => source.error_code(),
        }
    }

    /// Normalized name of the command that failed.
    pub fn cmd(&self) -> &'static str {
        match self {
            Self::Decode { cmd, .. } => cmd,
        }
    }
}

// ============================================================================
// Pipeline Errors (insight queue)
// ============================================================================

/// Insight queue errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The consumer task has exited; the message was dropped.
    #[error("insight consumer is gone")]
    ConsumerGone,
}

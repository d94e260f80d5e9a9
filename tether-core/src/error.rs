//! Error types for Tether.
//!
//! A single enum covers every failure the bridge can report:
//!
//! - Synchronous, at the call site: [`BridgeError::InvalidArgument`],
//!   [`BridgeError::TransportUnavailable`], [`BridgeError::Serialization`],
//!   [`BridgeError::NoRuntime`]
//! - Asynchronous, through a pending RPC call: [`BridgeError::Remote`],
//!   [`BridgeError::Timeout`], [`BridgeError::Cancelled`]

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Top-level error type for all Tether operations.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Bad input at the call site.
    #[error("invalid argument `{field}`: {reason}")]
    InvalidArgument {
        /// Name of the offending field (`type`, `data`, `timeout`, ...).
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// No native bridge is present in the current execution context.
    #[error("native transport `{transport}` is not available")]
    TransportUnavailable {
        /// Name of the transport that was asked to send.
        transport: String,
    },

    /// The native side replied with an `errors` payload.
    #[error("remote error: {message}")]
    Remote {
        /// `errors.message` from the reply.
        message: String,
        /// `errors.errorCode` from the reply, if present.
        code: Option<Value>,
    },

    /// No reply arrived within the allotted window.
    #[error("rpc `{event_type}` timed out after {elapsed:?}")]
    Timeout {
        /// The event type the call was waiting on.
        event_type: String,
        /// The configured window that elapsed.
        elapsed: Duration,
    },

    /// A payload could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An RPC call was issued outside a tokio runtime.
    #[error("rpc calls require a running tokio runtime")]
    NoRuntime,

    /// The call's completion was dropped before it resolved.
    #[error("rpc call was cancelled before completion")]
    Cancelled,
}

impl BridgeError {
    /// Shorthand for [`BridgeError::InvalidArgument`].
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        BridgeError::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }

    /// Returns `true` for [`BridgeError::Timeout`].
    pub fn is_timeout(&self) -> bool {
        matches!(self, BridgeError::Timeout { .. })
    }

    /// Returns `true` for [`BridgeError::Remote`].
    pub fn is_remote(&self) -> bool {
        matches!(self, BridgeError::Remote { .. })
    }

    /// Returns the offending field for [`BridgeError::InvalidArgument`].
    pub fn invalid_field(&self) -> Option<&'static str> {
        match self {
            BridgeError::InvalidArgument { field, .. } => Some(field),
            _ => None,
        }
    }
}

/// Alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = BridgeError::invalid("type", "must not be empty");
        assert_eq!(err.to_string(), "invalid argument `type`: must not be empty");
        assert_eq!(err.invalid_field(), Some("type"));
    }

    #[test]
    fn test_timeout_display() {
        let err = BridgeError::Timeout {
            event_type: "getUser".into(),
            elapsed: Duration::from_millis(250),
        };
        assert!(err.is_timeout());
        assert!(!err.is_remote());
        assert!(err.to_string().contains("getUser"));
        assert!(err.to_string().contains("250ms"));
    }
}

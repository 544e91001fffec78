//! Error types for logtide-core.
//!
//! Each concern gets its own enum so a failure can never be mistaken for
//! another kind: a dropped connection is not an empty inventory, and neither
//! is a malformed intent.

use thiserror::Error;

/// Connection refused, dropped, or otherwise unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("invalid stream url: {0}")]
    InvalidUrl(String),

    #[error("invalid authorization header")]
    InvalidAuthHeader,

    #[error("connect failed: {0}")]
    Connect(String),

    #[error("stream failed: {0}")]
    Stream(String),
}

/// Listing selectable sources failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("invalid directory url: {0}")]
    InvalidUrl(String),

    #[error("inventory request failed: {0}")]
    Request(String),

    #[error("inventory returned HTTP {0}")]
    Status(u16),

    #[error("inventory response could not be decoded: {0}")]
    Decode(String),

    #[error("inventory request timed out after {0}s")]
    Timeout(u64),
}

/// A reconfiguration intent that was rejected before touching the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tail depth must be a whole number, got {0:?}")]
    MalformedTailDepth(String),

    #[error("tail depth must be at least 1")]
    ZeroTailDepth,

    #[error("tail depth {requested} exceeds the maximum of {max}")]
    TailDepthTooLarge { requested: u64, max: u32 },

    #[error("unknown source: {0}")]
    UnknownSource(String),
}

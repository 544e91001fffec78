//! Core types for logtide-core.
//!
//! This module defines the data structures shared across the pipeline layers:
//! the parsed line, its [`Severity`], the per-session [`SessionConfig`] and
//! the [`SourceInfo`] records returned by the inventory service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logical log line after timestamp extraction.
///
/// `message` is the trimmed remainder when a leading timestamp was found, and
/// the untouched line otherwise. An empty `message` is a blank row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLine {
    pub timestamp: Option<DateTime<Utc>>,
    pub message: String,
}

impl ParsedLine {
    /// A line with no leading timestamp.
    pub fn plain(message: impl Into<String>) -> Self {
        Self {
            timestamp: None,
            message: message.into(),
        }
    }

    /// Whitespace-only lines are kept positionally and render as empty rows.
    pub fn is_blank(&self) -> bool {
        self.message.trim().is_empty()
    }
}

/// Display severity assigned to a line by the classifier.
///
/// Variants are listed in detection precedence, not in order of magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Success,
    Info,
    Debug,
}

impl Severity {
    /// All severities in detection precedence.
    pub const ALL: [Severity; 5] = [
        Severity::Error,
        Severity::Warning,
        Severity::Success,
        Severity::Info,
        Severity::Debug,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Success => "success",
            Severity::Info => "info",
            Severity::Debug => "debug",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed line together with the severity the classifier picked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub line: ParsedLine,
    pub severity: Severity,
}

/// Parameters of one tailing session. Every change replaces the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub source_id: String,
    /// Number of historical lines requested when the stream opens.
    pub tail_depth: u32,
    pub server_hint: Option<String>,
}

/// One selectable source as reported by the inventory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub source_id: String,
    pub name: String,
    #[serde(default)]
    pub state: String,
}

/// Session state as reported to the display surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayState {
    Connecting,
    Receiving,
    Ended,
    Error,
    NoSource,
}

impl std::fmt::Display for DisplayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DisplayState::Connecting => write!(f, "connecting"),
            DisplayState::Receiving => write!(f, "receiving"),
            DisplayState::Ended => write!(f, "ended"),
            DisplayState::Error => write!(f, "error"),
            DisplayState::NoSource => write!(f, "no_source"),
        }
    }
}

//! Renderer: turns classified lines into display-ready records.
//!
//! A [`RenderedRecord`] carries everything the display surface needs: the
//! formatted timestamp (absent entirely when timestamps are off), the
//! severity with its fixed visual metadata, the HTML-safe message with
//! terminal colours mapped to inline styles, and a plain-text form for
//! terminal output.

use chrono::{DateTime, Local, Utc};
use serde::Deserialize;

use crate::ansi;
use crate::types::{ClassifiedLine, Severity};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const BLANK_ROW_HEIGHT: &str = "1.2em";

// ---------------------------------------------------------------------------
// Severity styling
// ---------------------------------------------------------------------------

/// Visual metadata attached to every rendered line of a given severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityStyle {
    pub border: &'static str,
    pub badge_background: &'static str,
    pub badge_text: &'static str,
    pub label: &'static str,
}

const ERROR_STYLE: SeverityStyle = SeverityStyle {
    border: "#ef4444",
    badge_background: "#fee2e2",
    badge_text: "#991b1b",
    label: "ERROR",
};
const WARNING_STYLE: SeverityStyle = SeverityStyle {
    border: "#f59e0b",
    badge_background: "#fef3c7",
    badge_text: "#92400e",
    label: "WARN",
};
const SUCCESS_STYLE: SeverityStyle = SeverityStyle {
    border: "#10b981",
    badge_background: "#d1fae5",
    badge_text: "#065f46",
    label: "OK",
};
const INFO_STYLE: SeverityStyle = SeverityStyle {
    border: "#3b82f6",
    badge_background: "#dbeafe",
    badge_text: "#1e40af",
    label: "INFO",
};
const DEBUG_STYLE: SeverityStyle = SeverityStyle {
    border: "#9ca3af",
    badge_background: "#f3f4f6",
    badge_text: "#374151",
    label: "DEBUG",
};

/// Look up the fixed style for `severity`.
pub fn severity_style(severity: Severity) -> &'static SeverityStyle {
    match severity {
        Severity::Error => &ERROR_STYLE,
        Severity::Warning => &WARNING_STYLE,
        Severity::Success => &SUCCESS_STYLE,
        Severity::Info => &INFO_STYLE,
        Severity::Debug => &DEBUG_STYLE,
    }
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Time zone used to display parsed timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayZone {
    #[default]
    Local,
    Utc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_timestamps: bool,
    pub zone: DisplayZone,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_timestamps: true,
            zone: DisplayZone::Local,
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A rendered, non-blank line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub timestamp: Option<String>,
    pub severity: Severity,
    pub style: &'static SeverityStyle,
    /// Escaped message with terminal colours as inline spans.
    pub html: String,
    /// Message with escape sequences removed.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedRecord {
    /// Fixed-height empty row: no badge, border, or message.
    Blank,
    Line(RenderedLine),
}

impl RenderedRecord {
    pub fn severity(&self) -> Option<Severity> {
        match self {
            RenderedRecord::Blank => None,
            RenderedRecord::Line(line) => Some(line.severity),
        }
    }

    /// Plain message text; empty for blank rows.
    pub fn text(&self) -> &str {
        match self {
            RenderedRecord::Blank => "",
            RenderedRecord::Line(line) => &line.text,
        }
    }

    /// One row of markup for the display surface.
    pub fn to_html(&self) -> String {
        match self {
            RenderedRecord::Blank => {
                format!("<div class=\"log-line blank\" style=\"height:{BLANK_ROW_HEIGHT}\"></div>")
            }
            RenderedRecord::Line(line) => {
                let ts = line
                    .timestamp
                    .as_deref()
                    .map(|ts| format!("<span class=\"ts\">{ts}</span>"))
                    .unwrap_or_default();
                format!(
                    "<div class=\"log-line log-{sev}\" style=\"border-left:3px solid {border}\">\
                     {ts}<span class=\"badge\" style=\"background:{bg};color:{fg}\">{label}</span>\
                     <span class=\"msg\">{html}</span></div>",
                    sev = line.severity,
                    border = line.style.border,
                    bg = line.style.badge_background,
                    fg = line.style.badge_text,
                    label = line.style.label,
                    html = line.html,
                )
            }
        }
    }

    /// One row of plain text for terminal output.
    pub fn to_text(&self) -> String {
        match self {
            RenderedRecord::Blank => String::new(),
            RenderedRecord::Line(line) => match &line.timestamp {
                Some(ts) => format!("{ts} {:<5} {}", line.style.label, line.text),
                None => format!("{:<5} {}", line.style.label, line.text),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn render(&self, classified: &ClassifiedLine) -> RenderedRecord {
        let line = &classified.line;
        // A timestamped line with no message still carries its timestamp.
        if line.timestamp.is_none() && line.is_blank() {
            return RenderedRecord::Blank;
        }
        RenderedRecord::Line(RenderedLine {
            timestamp: line.timestamp.and_then(|ts| self.format_timestamp(ts)),
            severity: classified.severity,
            style: severity_style(classified.severity),
            html: ansi::to_html(&line.message),
            text: ansi::strip(&line.message),
        })
    }

    /// Render a line the session produced itself (error banner, end marker).
    pub fn render_synthetic(&self, message: &str, severity: Severity) -> RenderedRecord {
        RenderedRecord::Line(RenderedLine {
            timestamp: None,
            severity,
            style: severity_style(severity),
            html: escape_html(message),
            text: message.to_string(),
        })
    }

    fn format_timestamp(&self, ts: DateTime<Utc>) -> Option<String> {
        if !self.options.show_timestamps {
            return None;
        }
        let formatted = match self.options.zone {
            DisplayZone::Local => ts.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string(),
            DisplayZone::Utc => ts.format(TIMESTAMP_FORMAT).to_string(),
        };
        Some(formatted)
    }
}

/// Escape `s` for embedding in HTML text or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Wrap `records` in a standalone HTML page.
pub fn render_document(title: &str, records: &[RenderedRecord]) -> String {
    let rows: String = records.iter().map(RenderedRecord::to_html).collect::<Vec<_>>().join("\n");
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         <style>\n\
         body {{ font-family: monospace; font-size: 13px; }}\n\
         .log-line {{ padding: 1px 6px; white-space: pre-wrap; }}\n\
         .ts {{ opacity: 0.6; margin-right: 6px; }}\n\
         .badge {{ border-radius: 3px; padding: 0 4px; margin-right: 6px; font-size: 11px; }}\n\
         </style>\n</head>\n<body>\n{rows}\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

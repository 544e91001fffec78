//! Stream session: one live attempt to tail a source at one configuration.
//!
//! # State machine
//!
//! ```text
//! Connecting ──► Connected ──► Receiving ──► Closed(Normal | Error)
//!      └────────────┴─────────────┴──────────────┘ (error / close)
//! ```
//!
//! Every chunk is appended verbatim to the session's [`LogBuffer`]; the
//! lines it completes are parsed, classified and rendered, and their records
//! are appended to the output. Earlier records are never touched, and the
//! result is always identical to reprocessing the whole buffer from scratch
//! (see [`StreamSession::rerender`]).
//!
//! `Closed` is terminal. Events that arrive afterwards are ignored; resuming
//! means building a new session.

use crate::buffer::LogBuffer;
use crate::classifier;
use crate::parser;
use crate::renderer::{RenderedRecord, Renderer};
use crate::transport::TransportEvent;
use crate::types::{ClassifiedLine, DisplayState, SessionConfig, Severity};

pub const END_MARKER: &str = "--- Log stream ended ---";
pub const CONNECTING_PLACEHOLDER: &str = "Connecting…";
pub const WAITING_PLACEHOLDER: &str = "Connected, waiting for logs…";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Normal,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Connected,
    Receiving,
    Closed(CloseReason),
}

impl SessionState {
    pub fn is_closed(self) -> bool {
        matches!(self, SessionState::Closed(_))
    }
}

pub struct StreamSession {
    generation: u64,
    config: SessionConfig,
    state: SessionState,
    buffer: LogBuffer,
    renderer: Renderer,
    records: Vec<RenderedRecord>,
    /// Trailing fragment rendered when the stream closed mid-line.
    flushed: bool,
    error_banner: Option<RenderedRecord>,
    end_marker: Option<RenderedRecord>,
}

impl StreamSession {
    pub fn new(generation: u64, config: SessionConfig, renderer: Renderer) -> Self {
        tracing::info!(
            generation,
            source = %config.source_id,
            tail = config.tail_depth,
            "session: connecting"
        );
        Self {
            generation,
            config,
            state: SessionState::Connecting,
            buffer: LogBuffer::new(),
            renderer,
            records: Vec::new(),
            flushed: false,
            error_banner: None,
            end_marker: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn buffer(&self) -> &LogBuffer {
        &self.buffer
    }

    /// Apply one transport event. Returns `true` when the visible output or
    /// state changed.
    pub fn handle(&mut self, event: TransportEvent) -> bool {
        if self.state.is_closed() {
            tracing::debug!(
                generation = self.generation,
                ?event,
                "session: event after close ignored"
            );
            return false;
        }
        match event {
            TransportEvent::Opened => self.on_open(),
            TransportEvent::Chunk(bytes) => self.on_chunk(&bytes),
            TransportEvent::Error(reason) => self.on_error(&reason),
            TransportEvent::Closed => self.on_close(),
        }
    }

    fn on_open(&mut self) -> bool {
        if self.state != SessionState::Connecting {
            return false;
        }
        tracing::info!(generation = self.generation, "session: connected");
        self.state = SessionState::Connected;
        true
    }

    fn on_chunk(&mut self, chunk: &[u8]) -> bool {
        let was = self.state;
        self.state = SessionState::Receiving;
        self.buffer.push(chunk);

        let renderer = self.renderer;
        let before = self.records.len();
        self.records
            .extend(render_text(&renderer, self.buffer.take_complete()));

        tracing::debug!(
            generation = self.generation,
            bytes = chunk.len(),
            new_records = self.records.len() - before,
            "session: chunk"
        );
        was != self.state || self.records.len() != before
    }

    fn on_error(&mut self, reason: &str) -> bool {
        tracing::warn!(generation = self.generation, reason, "session: transport error");
        self.flush();
        self.error_banner = Some(
            self.renderer
                .render_synthetic(&format!("Connection error: {reason}"), Severity::Error),
        );
        self.state = SessionState::Closed(CloseReason::Error);
        true
    }

    fn on_close(&mut self) -> bool {
        tracing::info!(
            generation = self.generation,
            bytes = self.buffer.len(),
            "session: stream ended"
        );
        self.flush();
        if !self.buffer.is_empty() {
            self.end_marker = Some(self.renderer.render_synthetic(END_MARKER, Severity::Info));
        }
        self.state = SessionState::Closed(CloseReason::Normal);
        true
    }

    /// Render the unterminated trailing fragment, if any. Nothing more will
    /// arrive to complete it.
    fn flush(&mut self) {
        let renderer = self.renderer;
        let fragment = self.buffer.take_remainder();
        if !fragment.is_empty() {
            self.flushed = true;
            self.records.extend(render_text(&renderer, fragment));
        }
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    /// The full current output in display order: error banner, buffered
    /// lines, end marker.
    pub fn records(&self) -> impl Iterator<Item = &RenderedRecord> {
        self.error_banner
            .iter()
            .chain(self.records.iter())
            .chain(self.end_marker.iter())
    }

    /// Records for the buffered lines only, without synthetic lines.
    pub fn line_records(&self) -> &[RenderedRecord] {
        &self.records
    }

    /// Reprocess the entire buffer from scratch. Always equal to
    /// [`line_records`](Self::line_records).
    pub fn rerender(&self) -> Vec<RenderedRecord> {
        let text = self.buffer.as_str();
        let end = if self.flushed {
            text.len()
        } else {
            parser::complete_len(text)
        };
        render_text(&self.renderer, &text[..end]).collect()
    }

    /// Transient status text shown while there is nothing else to show. Never
    /// part of the buffer.
    pub fn placeholder(&self) -> Option<&'static str> {
        match self.state {
            SessionState::Connecting => Some(CONNECTING_PLACEHOLDER),
            SessionState::Connected | SessionState::Receiving if self.records.is_empty() => {
                Some(WAITING_PLACEHOLDER)
            }
            _ => None,
        }
    }

    pub fn display_state(&self) -> DisplayState {
        match self.state {
            SessionState::Connecting => DisplayState::Connecting,
            SessionState::Connected | SessionState::Receiving => DisplayState::Receiving,
            SessionState::Closed(CloseReason::Normal) => DisplayState::Ended,
            SessionState::Closed(CloseReason::Error) => DisplayState::Error,
        }
    }
}

/// Parse, classify and render every line of `text`.
pub fn render_text<'a>(
    renderer: &'a Renderer,
    text: &'a str,
) -> impl Iterator<Item = RenderedRecord> + 'a {
    parser::complete_lines(text).map(move |raw| {
        let line = parser::parse_line(raw);
        let severity = classifier::classify(&line.message);
        renderer.render(&ClassifiedLine { line, severity })
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Source controller: owns the selectable parameters (source, tail depth)
//! and the single live [`StreamSession`].
//!
//! Every accepted reconfiguration closes the current session and opens a
//! fresh one with an empty buffer, so lines from one source or depth never
//! leak into another. Intents are validated first; a rejected intent leaves
//! the working session alone.
//!
//! Sessions are numbered by a generation counter. Transport events carry the
//! generation that opened them and anything addressed to a replaced session
//! is dropped on arrival.
//!
//! # Run loop
//!
//! [`SourceController::run`] is the single worker: it interleaves intents and
//! transport events with `tokio::select!`, handles one at a time, and
//! publishes a [`DisplayUpdate`] after each change. Source listings are
//! bounded by [`ControllerSettings::directory_timeout`], and any listing in
//! flight is abandoned as soon as the display stops receiving updates.

use std::time::Duration;

use tokio::sync::mpsc;

use crate::error::{ConfigError, DirectoryError};
use crate::renderer::{RenderOptions, RenderedRecord, Renderer};
use crate::session::StreamSession;
use crate::transport::{Envelope, EventSink, SourceDirectory, Transport, TransportHandle};
use crate::types::{DisplayState, SessionConfig, SourceInfo};

pub const NO_SOURCE_PLACEHOLDER: &str = "No log sources available. Refresh to check again.";

// ---------------------------------------------------------------------------
// Intents and updates
// ---------------------------------------------------------------------------

/// A user request coming from the display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    SelectSource(String),
    /// Raw depth as typed; validated by the controller.
    SetTailDepth(String),
    Refresh,
}

/// Everything the display surface needs to redraw.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayUpdate {
    /// Generation of the session shown; changes whenever it is replaced.
    pub generation: u64,
    pub state: DisplayState,
    pub source: Option<String>,
    pub tail_depth: u32,
    pub sources: Vec<SourceInfo>,
    pub placeholder: Option<String>,
    /// Rejected intent or inventory failure, for the status line.
    pub notice: Option<String>,
    pub records: Vec<RenderedRecord>,
}

/// Fixed parameters of a controller.
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub app_id: String,
    pub initial_source: Option<String>,
    pub initial_tail_depth: u32,
    pub max_tail_depth: u32,
    pub server_hint: Option<String>,
    pub render: RenderOptions,
    /// Upper bound on one source listing.
    pub directory_timeout: Duration,
}

/// Validate a tail depth typed by the user.
pub fn parse_tail_depth(raw: &str, max: u32) -> Result<u32, ConfigError> {
    let requested: u64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::MalformedTailDepth(raw.to_string()))?;
    check_tail_depth(requested, max)
}

/// Check a numeric tail depth against `1..=max`.
pub fn check_tail_depth(requested: u64, max: u32) -> Result<u32, ConfigError> {
    if requested == 0 {
        return Err(ConfigError::ZeroTailDepth);
    }
    if requested > u64::from(max) {
        return Err(ConfigError::TailDepthTooLarge { requested, max });
    }
    Ok(requested as u32)
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

struct ActiveSession {
    session: StreamSession,
    handle: TransportHandle,
}

pub struct SourceController<T, D> {
    settings: ControllerSettings,
    transport: T,
    directory: D,
    renderer: Renderer,
    sources: Vec<SourceInfo>,
    selected: Option<String>,
    tail_depth: u32,
    generation: u64,
    active: Option<ActiveSession>,
    notice: Option<String>,
    events_tx: mpsc::UnboundedSender<Envelope>,
    events_rx: mpsc::UnboundedReceiver<Envelope>,
}

impl<T: Transport, D: SourceDirectory> SourceController<T, D> {
    pub fn new(settings: ControllerSettings, transport: T, directory: D) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            tail_depth: settings.initial_tail_depth,
            selected: settings.initial_source.clone(),
            renderer: Renderer::new(settings.render),
            settings,
            transport,
            directory,
            sources: Vec::new(),
            generation: 0,
            active: None,
            notice: None,
            events_tx,
            events_rx,
        }
    }

    /// Resolve sources and open the first session.
    pub async fn open(&mut self) {
        self.resolve_and_start().await;
    }

    /// Apply one intent. A rejected intent returns the reason and leaves the
    /// current session running.
    pub async fn handle_intent(&mut self, intent: Intent) -> Result<(), ConfigError> {
        tracing::debug!(?intent, "controller: intent");
        match intent {
            Intent::SelectSource(id) => {
                if !self.sources.iter().any(|s| s.source_id == id) {
                    return Err(ConfigError::UnknownSource(id));
                }
                self.notice = None;
                self.selected = Some(id);
                self.restart();
            }
            Intent::SetTailDepth(raw) => {
                let depth = parse_tail_depth(&raw, self.settings.max_tail_depth)?;
                self.notice = None;
                self.tail_depth = depth;
                if self.selected.is_some() && !self.sources.is_empty() {
                    self.restart();
                }
            }
            Intent::Refresh => {
                self.notice = None;
                self.teardown();
                self.resolve_and_start().await;
            }
        }
        Ok(())
    }

    /// Route a transport event to the live session. Returns `true` when the
    /// display needs an update.
    pub fn handle_event(&mut self, envelope: Envelope) -> bool {
        match self.active.as_mut() {
            Some(active) if active.session.generation() == envelope.generation => {
                active.session.handle(envelope.event)
            }
            _ => {
                tracing::debug!(
                    generation = envelope.generation,
                    current = self.generation,
                    "controller: dropping stale event"
                );
                false
            }
        }
    }

    /// Wait for the next transport event addressed to any session.
    pub async fn next_event(&mut self) -> Option<Envelope> {
        self.events_rx.recv().await
    }

    /// Close the live session, if any. Used when the display goes away.
    pub fn shutdown(&mut self) {
        self.teardown();
    }

    /// Drive the controller until the intent channel closes.
    pub async fn run(
        mut self,
        mut intents: mpsc::Receiver<Intent>,
        updates: mpsc::UnboundedSender<DisplayUpdate>,
    ) {
        tokio::select! {
            _ = self.open() => {}
            _ = updates.closed() => {
                tracing::info!("controller: display closed during initial listing");
                self.shutdown();
                return;
            }
        }
        let _ = updates.send(self.view());

        loop {
            tokio::select! {
                intent = intents.recv() => {
                    let Some(intent) = intent else { break };
                    let outcome = tokio::select! {
                        outcome = self.handle_intent(intent) => outcome,
                        _ = updates.closed() => break,
                    };
                    if let Err(e) = outcome {
                        tracing::info!(error = %e, "controller: intent rejected");
                        self.notice = Some(e.to_string());
                    }
                    if updates.send(self.view()).is_err() {
                        break;
                    }
                }
                Some(envelope) = self.events_rx.recv() => {
                    if self.handle_event(envelope) && updates.send(self.view()).is_err() {
                        break;
                    }
                }
            }
        }

        self.shutdown();
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn sources(&self) -> &[SourceInfo] {
        &self.sources
    }

    pub fn tail_depth(&self) -> u32 {
        self.tail_depth
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn session(&self) -> Option<&StreamSession> {
        self.active.as_ref().map(|a| &a.session)
    }

    /// Snapshot for the display surface.
    pub fn view(&self) -> DisplayUpdate {
        match &self.active {
            Some(active) => DisplayUpdate {
                generation: active.session.generation(),
                state: active.session.display_state(),
                source: Some(active.session.config().source_id.clone()),
                tail_depth: self.tail_depth,
                sources: self.sources.clone(),
                placeholder: active.session.placeholder().map(str::to_string),
                notice: self.notice.clone(),
                records: active.session.records().cloned().collect(),
            },
            None => DisplayUpdate {
                generation: self.generation,
                state: DisplayState::NoSource,
                source: None,
                tail_depth: self.tail_depth,
                sources: self.sources.clone(),
                placeholder: Some(NO_SOURCE_PLACEHOLDER.to_string()),
                notice: self.notice.clone(),
                records: Vec::new(),
            },
        }
    }

    // -----------------------------------------------------------------------
    // Session replacement
    // -----------------------------------------------------------------------

    async fn resolve_and_start(&mut self) {
        let limit = self.settings.directory_timeout;
        let listing = self.directory.list_sources(&self.settings.app_id);
        let listed = tokio::time::timeout(limit, listing)
            .await
            .unwrap_or(Err(DirectoryError::Timeout(limit.as_secs())));
        match listed {
            Ok(sources) => self.sources = sources,
            Err(e) => {
                self.report_directory_failure(e);
                return;
            }
        }

        let keep = self
            .selected
            .as_ref()
            .filter(|id| self.sources.iter().any(|s| &s.source_id == *id))
            .cloned();
        self.selected = keep.or_else(|| self.sources.first().map(|s| s.source_id.clone()));

        match &self.selected {
            Some(_) => self.restart(),
            None => tracing::info!(app = %self.settings.app_id, "controller: no sources"),
        }
    }

    fn report_directory_failure(&mut self, e: DirectoryError) {
        tracing::warn!(
            app = %self.settings.app_id,
            error = %e,
            "controller: source listing failed"
        );
        self.sources.clear();
        self.selected = None;
        self.notice = Some(e.to_string());
    }

    fn restart(&mut self) {
        self.teardown();
        let Some(source_id) = self.selected.clone() else {
            return;
        };

        self.generation += 1;
        let config = SessionConfig {
            source_id,
            tail_depth: self.tail_depth,
            server_hint: self.settings.server_hint.clone(),
        };
        let sink = EventSink::new(self.generation, self.events_tx.clone());
        let handle = self.transport.open(&config, sink);
        let session = StreamSession::new(self.generation, config, self.renderer);
        self.active = Some(ActiveSession { session, handle });
    }

    fn teardown(&mut self) {
        if let Some(active) = self.active.take() {
            tracing::info!(
                generation = active.session.generation(),
                source = %active.session.config().source_id,
                "controller: closing session"
            );
            active.handle.close();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Test builders: ergonomic constructors for sessions, settings and sources.
//!
//! These builders are meant for readable assertions, not production use.
//! They fix the display zone to UTC so rendered timestamps are stable.

use std::time::Duration;

use logtide_core::renderer::DisplayZone;
use logtide_core::{
    ControllerSettings, RenderOptions, RenderedRecord, Renderer, SessionConfig, SourceInfo,
    StreamSession, TransportEvent,
};

/// Renderer with timestamps shown in UTC.
pub fn utc_renderer() -> Renderer {
    Renderer::new(RenderOptions {
        show_timestamps: true,
        zone: DisplayZone::Utc,
    })
}

pub fn session_config(source_id: &str, tail_depth: u32) -> SessionConfig {
    SessionConfig {
        source_id: source_id.to_string(),
        tail_depth,
        server_hint: None,
    }
}

/// A fresh session for `web-1` at generation 1.
pub fn new_session() -> StreamSession {
    StreamSession::new(1, session_config("web-1", 100), utc_renderer())
}

pub fn chunk(text: &str) -> TransportEvent {
    TransportEvent::Chunk(text.as_bytes().to_vec())
}

/// Open a session and feed it `chunks` in order.
pub fn session_fed(chunks: &[&[u8]]) -> StreamSession {
    let mut session = new_session();
    session.handle(TransportEvent::Opened);
    for part in chunks {
        session.handle(TransportEvent::Chunk(part.to_vec()));
    }
    session
}

pub fn records_of(session: &StreamSession) -> Vec<RenderedRecord> {
    session.records().cloned().collect()
}

pub fn source(id: &str) -> SourceInfo {
    SourceInfo {
        source_id: id.to_string(),
        name: id.replace('-', " "),
        state: "running".to_string(),
    }
}

pub fn sources(ids: &[&str]) -> Vec<SourceInfo> {
    ids.iter().map(|id| source(id)).collect()
}

// ---------------------------------------------------------------------------
// SettingsBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`ControllerSettings`].
///
/// ```rust
/// let settings = SettingsBuilder::new("shop").source("worker-1").tail(50).build();
/// ```
pub struct SettingsBuilder {
    settings: ControllerSettings,
}

impl SettingsBuilder {
    pub fn new(app_id: &str) -> Self {
        Self {
            settings: ControllerSettings {
                app_id: app_id.to_string(),
                initial_source: None,
                initial_tail_depth: 100,
                max_tail_depth: 10_000,
                server_hint: None,
                render: utc_renderer().options(),
                directory_timeout: Duration::from_secs(5),
            },
        }
    }

    pub fn source(mut self, id: &str) -> Self {
        self.settings.initial_source = Some(id.to_string());
        self
    }

    pub fn tail(mut self, depth: u32) -> Self {
        self.settings.initial_tail_depth = depth;
        self
    }

    pub fn max_tail(mut self, max: u32) -> Self {
        self.settings.max_tail_depth = max;
        self
    }

    pub fn server(mut self, hint: &str) -> Self {
        self.settings.server_hint = Some(hint.to_string());
        self
    }

    pub fn directory_timeout(mut self, limit: Duration) -> Self {
        self.settings.directory_timeout = limit;
        self
    }

    pub fn build(self) -> ControllerSettings {
        self.settings
    }
}

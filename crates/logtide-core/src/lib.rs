//! logtide-core: the live log-stream pipeline.
//!
//! This crate exposes the pipeline layers as public modules, plus the shared
//! types and the collaborator seams ([`Transport`], [`SourceDirectory`]) the
//! feed adapters implement.
//!
//! # Architecture
//!
//! ```text
//! Transport ──► StreamSession ──► parser ──► classifier ──► renderer
//!     ▲               │
//!     └── SourceController ◄── Intent        DisplayUpdate ──► display
//! ```
//!
//! Transport events reach the controller over a `tokio` channel tagged with
//! the generation of the session that opened them. The controller's run loop
//! is the only writer of session state.

pub mod ansi;
pub mod buffer;
pub mod classifier;
pub mod config;
pub mod controller;
pub mod error;
pub mod parser;
pub mod renderer;
pub mod session;
pub mod transport;
pub mod types;

pub use controller::{ControllerSettings, DisplayUpdate, Intent, SourceController};
pub use error::{ConfigError, DirectoryError, TransportError};
pub use renderer::{RenderOptions, RenderedRecord, Renderer};
pub use session::StreamSession;
pub use transport::{EventSink, SourceDirectory, Transport, TransportEvent, TransportHandle};
pub use types::{ClassifiedLine, DisplayState, ParsedLine, SessionConfig, Severity, SourceInfo};

//! logtide-feeds: transport and inventory adapters for logtide.
//!
//! Each adapter implements one of the collaborator seams defined in
//! [`logtide_core::transport`]: [`WebSocketTransport`] streams a source's log
//! output, [`HttpSourceDirectory`] lists the sources an application exposes.

pub mod directory;
pub mod websocket;

pub use directory::HttpSourceDirectory;
pub use websocket::WebSocketTransport;

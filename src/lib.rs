//! logtide: live, classified tailing of remote container and build logs.
//!
//! The pipeline lives in `logtide-core` and the network adapters in
//! `logtide-feeds`. This crate is the command-line shell around them: it
//! loads configuration, turns typed commands into controller intents and
//! prints the rendered output.
//!
//! # Architecture
//!
//! ```text
//! stdin ──► Command ──► Intent ──► SourceController ──► DisplayUpdate ──► Printer
//!                                       ▲
//!                     WebSocketTransport ┘ HttpSourceDirectory
//! ```

pub mod app;
pub mod commands;
pub mod output;

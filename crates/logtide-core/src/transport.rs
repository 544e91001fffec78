//! Collaborator seams: the streaming transport and the inventory service.
//!
//! A [`Transport`] opens a connection without blocking the caller and
//! reports what happens on it as [`TransportEvent`]s through an
//! [`EventSink`]. Every event is stamped with the generation of the session
//! that opened it, so the controller can drop anything a replaced session
//! still manages to deliver.

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::DirectoryError;
use crate::types::{SessionConfig, SourceInfo};

/// Something that happened on a live connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Opened,
    /// An opaque inbound fragment, in arrival order.
    Chunk(Vec<u8>),
    Error(String),
    Closed,
}

/// A [`TransportEvent`] tagged with the generation of the session it
/// belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub generation: u64,
    pub event: TransportEvent,
}

/// Sending half handed to a transport when it opens.
#[derive(Debug, Clone)]
pub struct EventSink {
    generation: u64,
    tx: mpsc::UnboundedSender<Envelope>,
}

impl EventSink {
    pub fn new(generation: u64, tx: mpsc::UnboundedSender<Envelope>) -> Self {
        Self { generation, tx }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Deliver `event`. Returns `false` once the controller has gone away.
    pub fn send(&self, event: TransportEvent) -> bool {
        self.tx
            .send(Envelope {
                generation: self.generation,
                event,
            })
            .is_ok()
    }
}

/// Owns the resources of one open connection. Closing (or dropping) the
/// handle aborts the connection task immediately.
#[derive(Debug)]
pub struct TransportHandle {
    task: Option<JoinHandle<()>>,
}

impl TransportHandle {
    pub fn from_task(task: JoinHandle<()>) -> Self {
        Self { task: Some(task) }
    }

    pub fn close(mut self) {
        self.abort();
    }

    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for TransportHandle {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Opens log streams.
pub trait Transport: Send + Sync + 'static {
    /// Start connecting for `config`. Must return without waiting for the
    /// connection; progress is reported through `sink`.
    fn open(&self, config: &SessionConfig, sink: EventSink) -> TransportHandle;
}

/// Read-only inventory of selectable sources for an application.
#[async_trait]
pub trait SourceDirectory: Send + Sync + 'static {
    async fn list_sources(&self, app_id: &str) -> Result<Vec<SourceInfo>, DirectoryError>;
}

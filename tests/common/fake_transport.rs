//! Scripted transport for controller tests.
//!
//! [`ScriptedTransport::open`] records every stream the controller opens and
//! hands the test its [`EventSink`], so the test decides exactly which events
//! arrive and when. Each opened stream is backed by a parked task; when the
//! controller closes the handle the task is aborted, which the test observes
//! through [`ScriptedTransport::wait_closed`].
//!
//! # Example
//!
//! ```rust,no_run
//! let transport = ScriptedTransport::default();
//! // ... controller opens a session ...
//! transport.emit(0, TransportEvent::Opened);
//! transport.emit(0, chunk("Listening on port 3000\n"));
//! ```

use logtide_core::{EventSink, SessionConfig, Transport, TransportEvent, TransportHandle};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;

struct OpenedStream {
    config: SessionConfig,
    sink: EventSink,
    /// Resolves with `Err` once the backing task has been dropped.
    alive: Option<oneshot::Receiver<()>>,
}

#[derive(Clone, Default)]
pub struct ScriptedTransport {
    opened: Arc<Mutex<Vec<OpenedStream>>>,
}

impl Transport for ScriptedTransport {
    fn open(&self, config: &SessionConfig, sink: EventSink) -> TransportHandle {
        let (guard, alive) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let _guard = guard;
            std::future::pending::<()>().await;
        });
        self.opened.lock().unwrap().push(OpenedStream {
            config: config.clone(),
            sink,
            alive: Some(alive),
        });
        TransportHandle::from_task(task)
    }
}

impl ScriptedTransport {
    /// Number of streams opened so far.
    pub fn open_count(&self) -> usize {
        self.opened.lock().unwrap().len()
    }

    pub fn config(&self, index: usize) -> SessionConfig {
        self.opened.lock().unwrap()[index].config.clone()
    }

    pub fn generation(&self, index: usize) -> u64 {
        self.opened.lock().unwrap()[index].sink.generation()
    }

    /// Deliver `event` through the sink of the `index`th stream.
    pub fn emit(&self, index: usize, event: TransportEvent) -> bool {
        let sink = self.opened.lock().unwrap()[index].sink.clone();
        sink.send(event)
    }

    /// Wait up to one second for the `index`th stream to be closed.
    pub async fn wait_closed(&self, index: usize) -> bool {
        let Some(mut alive) = self.opened.lock().unwrap()[index].alive.take() else {
            return true;
        };
        match tokio::time::timeout(Duration::from_secs(1), &mut alive).await {
            Ok(_) => true,
            Err(_) => {
                self.opened.lock().unwrap()[index].alive = Some(alive);
                false
            }
        }
    }

    /// True while the `index`th stream has not been closed.
    pub fn is_open(&self, index: usize) -> bool {
        let mut opened = self.opened.lock().unwrap();
        match opened[index].alive.as_mut() {
            Some(alive) => matches!(alive.try_recv(), Err(oneshot::error::TryRecvError::Empty)),
            None => false,
        }
    }
}

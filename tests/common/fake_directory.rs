//! In-memory source inventory.
//!
//! The listing can be swapped or made to fail between calls, which is how
//! harnesses simulate sources appearing, disappearing, the inventory
//! service going down, or it hanging without a reply.

use async_trait::async_trait;
use logtide_core::{DirectoryError, SourceDirectory, SourceInfo};
use std::sync::{Arc, Mutex};

struct DirectoryState {
    response: Result<Vec<SourceInfo>, DirectoryError>,
    calls: Vec<String>,
    silent: bool,
}

#[derive(Clone)]
pub struct StaticDirectory {
    state: Arc<Mutex<DirectoryState>>,
}

impl StaticDirectory {
    pub fn new(sources: Vec<SourceInfo>) -> Self {
        Self {
            state: Arc::new(Mutex::new(DirectoryState {
                response: Ok(sources),
                calls: Vec::new(),
                silent: false,
            })),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn set_sources(&self, sources: Vec<SourceInfo>) {
        self.state.lock().unwrap().response = Ok(sources);
    }

    pub fn fail_with(&self, error: DirectoryError) {
        self.state.lock().unwrap().response = Err(error);
    }

    /// Leave every later listing pending forever.
    pub fn stop_answering(&self) {
        self.state.lock().unwrap().silent = true;
    }

    /// App ids passed to every listing so far.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl SourceDirectory for StaticDirectory {
    async fn list_sources(&self, app_id: &str) -> Result<Vec<SourceInfo>, DirectoryError> {
        let response = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(app_id.to_string());
            (!state.silent).then(|| state.response.clone())
        };
        match response {
            Some(response) => response,
            None => std::future::pending().await,
        }
    }
}

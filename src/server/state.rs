use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::provider::analyzer::ImageAnalyzer;
use crate::trace::logger::TraceLogger;
use crate::ui::profile::NormalizeProfile;

/// Shared by every handler; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<dyn ImageAnalyzer>,
    pub profile: NormalizeProfile,
    pub tracer: Arc<TraceLogger>,
    pub logs: LogStore,
}

impl AppState {
    pub fn new(analyzer: Arc<dyn ImageAnalyzer>, profile: NormalizeProfile) -> Self {
        Self {
            analyzer,
            profile,
            tracer: Arc::new(TraceLogger::disabled()),
            logs: LogStore::default(),
        }
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = Arc::new(tracer);
        self
    }
}

/// Payloads received on the echo route, in arrival order.
/// Unbounded and lost on restart.
#[derive(Clone, Default)]
pub struct LogStore {
    entries: Arc<Mutex<Vec<Value>>>,
}

impl LogStore {
    pub fn push(&self, entry: Value) {
        // A poisoned lock only means another handler panicked mid-push.
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push(entry);
    }

    pub fn snapshot(&self) -> Vec<Value> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

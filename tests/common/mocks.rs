use async_trait::async_trait;
use qr_sender::{Error, Result, diagnostics::DiagnosticSink, view::ImageSink};
use std::sync::{Arc, Mutex};

/// Diagnostic sink that keeps every recorded message
#[derive(Debug, Default, Clone)]
pub struct RecordingDiagnostics {
    pub entries: Arc<Mutex<Vec<String>>>,
}

impl RecordingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }
}

impl DiagnosticSink for RecordingDiagnostics {
    fn record(&self, message: &str) {
        self.entries.lock().unwrap().push(message.to_string());
    }
}

/// Image sink that always fails, for exercising the sink error path
#[derive(Debug, Default)]
pub struct FailingSink {
    pub attempts: Mutex<usize>,
}

#[async_trait]
impl ImageSink for FailingSink {
    async fn show(&self, _source: &str) -> Result<()> {
        *self.attempts.lock().unwrap() += 1;
        Err(Error::internal("sink unavailable"))
    }
}

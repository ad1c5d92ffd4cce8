use tracing::error;

/// Destination for failures that are reported but never shown to the user.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, message: &str);
}

/// Emits diagnostics as `error` level tracing events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn record(&self, message: &str) {
        error!("{}", message);
    }
}

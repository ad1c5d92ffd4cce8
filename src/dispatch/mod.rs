mod data_uri;
mod types;

pub use data_uri::*;
pub use types::*;

use crate::{
    Error, Result,
    config::DispatcherConfig,
    diagnostics::DiagnosticSink,
    view::{ImageSink, InputSource},
};
use serde_json::Value;
use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};
use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, info};
use url::Url;

/// Posts input text to the receive endpoint and shows the returned image.
///
/// Every dispatch gets a token from a monotonically increasing counter. When
/// `discard_stale` is set, a response is only applied if no newer token has
/// rendered yet, so overlapping requests settle on the most recent one.
#[derive(Clone)]
pub struct RequestDispatcher {
    inner: Arc<Inner>,
}

struct Inner {
    client: reqwest::Client,
    endpoint: Url,
    reject_error_status: bool,
    discard_stale: bool,
    next_token: AtomicU64,
    // Newest token shown so far. Held across the sink write.
    applied: Mutex<u64>,
    sink: Arc<dyn ImageSink>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl RequestDispatcher {
    pub fn new(
        config: &DispatcherConfig,
        sink: Arc<dyn ImageSink>,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Result<Self> {
        let endpoint = Url::parse(&config.endpoint)?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "Unsupported endpoint scheme: {}",
                endpoint.scheme()
            )));
        }

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;

        debug!("Creating request dispatcher for: {}", endpoint);

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                endpoint,
                reject_error_status: config.reject_error_status,
                discard_stale: config.discard_stale,
                next_token: AtomicU64::new(0),
                applied: Mutex::new(0),
                sink,
                diagnostics,
            }),
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }

    /// Reads the current input value and dispatches it.
    pub fn trigger(&self, input: &dyn InputSource) -> JoinHandle<Outcome> {
        self.dispatch(input.value())
    }

    /// Starts a request in the background and returns immediately.
    ///
    /// The token is taken before spawning so that tokens follow call order.
    pub fn dispatch(&self, input: String) -> JoinHandle<Outcome> {
        let token = self.next_token();
        let this = self.clone();
        tokio::spawn(async move { this.run(token, input).await })
    }

    /// Sends one request and waits until it has been rendered or logged.
    pub async fn send(&self, input: String) -> Outcome {
        let token = self.next_token();
        self.run(token, input).await
    }

    fn next_token(&self) -> u64 {
        self.inner.next_token.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn run(&self, token: u64, input: String) -> Outcome {
        debug!("Dispatching request {} ({} bytes of input)", token, input.len());

        match self.fetch_source(input).await {
            Ok(source) => self.apply(token, source).await,
            Err(error) => self.fail(token, error),
        }
    }

    async fn fetch_source(&self, input: String) -> Result<String> {
        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .json(&ReceiveRequest::new(input))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            if self.inner.reject_error_status {
                let body = match response.text().await {
                    Ok(body) => body,
                    Err(e) => format!("<unreadable body: {}>", e),
                };
                return Err(Error::Status {
                    status: status.as_u16(),
                    body,
                });
            }
            debug!("Endpoint returned {}, parsing body anyway", status);
        }

        let bytes = response.bytes().await?;
        let body: Value = serde_json::from_slice(&bytes)?;
        let image = image_field_text(&body)?;

        Ok(DataUri::png(image).to_string())
    }

    async fn apply(&self, token: u64, source: String) -> Outcome {
        let mut applied = self.inner.applied.lock().await;

        if self.inner.discard_stale && token < *applied {
            debug!(
                "Dropping response {} because {} has already rendered",
                token, *applied
            );
            return Outcome::Stale { token };
        }

        if let Err(error) = self.inner.sink.show(&source).await {
            return self.fail(token, error);
        }
        *applied = (*applied).max(token);

        info!("Rendered response {}", token);
        Outcome::Rendered { token, source }
    }

    fn fail(&self, token: u64, error: Error) -> Outcome {
        self.inner
            .diagnostics
            .record(&format!("Error: {}", error));
        Outcome::Failed { token, error }
    }
}

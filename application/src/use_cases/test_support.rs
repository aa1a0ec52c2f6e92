//! Scripted test doubles shared by the use case tests.

use crate::ports::dataset_logger::DatasetLogger;
use crate::ports::provider_adapter::ProviderAdapter;
use async_trait::async_trait;
use mindgate_domain::{BackendError, Capabilities, ConversationRequest, LogCategory, ProviderKind};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

/// A scripted result for the mock adapter
#[derive(Debug, Clone)]
pub(crate) enum Scripted {
    Text(String),
    Error(BackendError),
    Embedding(Vec<f32>),
}

pub(crate) fn text(t: &str) -> Scripted {
    Scripted::Text(t.to_string())
}

type CallHook = Arc<dyn Fn(usize) + Send + Sync>;

/// Mock adapter that returns scripted results in order and records every call
pub(crate) struct ScriptedAdapter {
    kind: ProviderKind,
    capabilities: Capabilities,
    responses: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ConversationRequest>>,
    dispatched: Mutex<Vec<Instant>>,
    images: Mutex<Vec<Vec<u8>>>,
    hook: Option<CallHook>,
    latency: Duration,
}

impl ScriptedAdapter {
    pub(crate) fn new(responses: Vec<Scripted>) -> Self {
        Self {
            kind: ProviderKind::OpenAi,
            capabilities: Capabilities::new(true, true),
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
            dispatched: Mutex::new(Vec::new()),
            images: Mutex::new(Vec::new()),
            hook: None,
            latency: Duration::ZERO,
        }
    }

    pub(crate) fn with_kind(mut self, kind: ProviderKind) -> Self {
        self.kind = kind;
        self
    }

    pub(crate) fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Run `hook(call_index)` inside every remote call.
    pub(crate) fn with_hook(mut self, hook: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.hook = Some(Arc::new(hook));
        self
    }

    /// Sleep this long inside every remote call.
    pub(crate) fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub(crate) fn requests(&self) -> Vec<ConversationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn dispatched(&self) -> Vec<Instant> {
        self.dispatched.lock().unwrap().clone()
    }

    pub(crate) fn images(&self) -> Vec<Vec<u8>> {
        self.images.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.dispatched.lock().unwrap().len()
    }

    async fn next(&self) -> Scripted {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        let index = {
            let mut dispatched = self.dispatched.lock().unwrap();
            dispatched.push(Instant::now());
            dispatched.len() - 1
        };
        if let Some(hook) = &self.hook {
            hook(index);
        }
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Scripted::Text("(no more responses)".to_string()))
    }
}

#[async_trait]
impl ProviderAdapter for ScriptedAdapter {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn model_id(&self) -> &str {
        "scripted"
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    async fn send_completion(&self, request: &ConversationRequest) -> Result<String, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.next().await {
            Scripted::Text(t) => Ok(t),
            Scripted::Error(e) => Err(e),
            Scripted::Embedding(_) => Err(BackendError::transport("unexpected embedding")),
        }
    }

    async fn send_vision(
        &self,
        request: &ConversationRequest,
        image: &[u8],
    ) -> Result<String, BackendError> {
        self.requests.lock().unwrap().push(request.clone());
        self.images.lock().unwrap().push(image.to_vec());
        match self.next().await {
            Scripted::Text(t) => Ok(t),
            Scripted::Error(e) => Err(e),
            Scripted::Embedding(_) => Err(BackendError::transport("unexpected embedding")),
        }
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, BackendError> {
        match self.next().await {
            Scripted::Embedding(v) => Ok(v),
            Scripted::Error(e) => Err(e),
            Scripted::Text(_) => Err(BackendError::transport("unexpected text")),
        }
    }
}

/// A dataset row captured by [`RecordingLogger`]
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LoggedRow {
    pub category: LogCategory,
    pub input: String,
    pub output: String,
}

/// Logger that keeps every call in memory
#[derive(Default)]
pub(crate) struct RecordingLogger {
    rows: Mutex<Vec<LoggedRow>>,
    vision: Mutex<Vec<(Vec<u8>, String)>>,
}

impl RecordingLogger {
    pub(crate) fn rows(&self) -> Vec<LoggedRow> {
        self.rows.lock().unwrap().clone()
    }

    pub(crate) fn vision(&self) -> Vec<(Vec<u8>, String)> {
        self.vision.lock().unwrap().clone()
    }
}

impl DatasetLogger for RecordingLogger {
    fn record(&self, category: LogCategory, input: &str, output: &str) {
        self.rows.lock().unwrap().push(LoggedRow {
            category,
            input: input.to_string(),
            output: output.to_string(),
        });
    }

    fn record_vision(&self, image: &[u8], transcript: &str) {
        self.vision
            .lock()
            .unwrap()
            .push((image.to_vec(), transcript.to_string()));
    }
}

//! Test doubles shared by the use case tests

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::progress::ProgressNotifier;
use crate::ports::provider_adapter::ProviderAdapter;
use crate::ports::provider_client::{CompletionRequest, GatewayError, ProviderClient};
use crate::use_cases::judge_verdict::SeedSource;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use triplet_domain::{Attachment, ProviderId, ProviderResult, VerdictReport};

/// Provider client replaying a fixed script of outcomes
///
/// Once the script runs out, the last outcome repeats.
pub(crate) struct ScriptedClient {
    name: String,
    script: Mutex<VecDeque<Result<String, GatewayError>>>,
    last: Mutex<Result<String, GatewayError>>,
    delay_ms: AtomicU64,
    calls: AtomicUsize,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl ScriptedClient {
    pub fn scripted(name: &str, script: Vec<Result<String, GatewayError>>) -> Arc<Self> {
        let last = script
            .last()
            .cloned()
            .unwrap_or_else(|| Err(GatewayError::RequestFailed("empty script".to_string())));
        Arc::new(Self {
            name: name.to_string(),
            script: Mutex::new(script.into()),
            last: Mutex::new(last),
            delay_ms: AtomicU64::new(0),
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        })
    }

    pub fn answering(name: &str, text: &str) -> Arc<Self> {
        Self::scripted(name, vec![Ok(text.to_string())])
    }

    pub fn failing(name: &str, error: GatewayError) -> Arc<Self> {
        Self::scripted(name, vec![Err(error)])
    }

    pub fn with_delay(self: Arc<Self>, delay: Duration) -> Arc<Self> {
        self.delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProviderClient for ScriptedClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(outcome) => outcome,
            None => self.last.lock().unwrap().clone(),
        }
    }
}

/// Adapter answering after a fixed delay
pub(crate) struct DelayedAdapter {
    id: ProviderId,
    delay: Duration,
    text: String,
}

impl DelayedAdapter {
    pub fn new(id: ProviderId, delay_ms: u64, text: &str) -> Self {
        Self {
            id,
            delay: Duration::from_millis(delay_ms),
            text: text.to_string(),
        }
    }
}

#[async_trait]
impl ProviderAdapter for DelayedAdapter {
    fn id(&self) -> &ProviderId {
        &self.id
    }

    fn supports_vision(&self) -> bool {
        false
    }

    async fn call(&self, _prompt: &str, _attachments: &[Attachment]) -> ProviderResult {
        let start = Instant::now();
        tokio::time::sleep(self.delay).await;
        ProviderResult::success(
            self.id.clone(),
            self.text.clone(),
            start.elapsed().as_millis() as u64,
        )
    }
}

/// Adapter whose task panics
pub(crate) struct PanickingAdapter {
    id: ProviderId,
}

impl PanickingAdapter {
    pub fn new(id: ProviderId) -> Self {
        Self { id }
    }
}

#[async_trait]
impl ProviderAdapter for PanickingAdapter {
    fn id(&self) -> &ProviderId {
        &self.id
    }

    fn supports_vision(&self) -> bool {
        false
    }

    async fn call(&self, _prompt: &str, _attachments: &[Attachment]) -> ProviderResult {
        panic!("adapter {} blew up", self.id);
    }
}

pub(crate) struct FixedSeed(pub u64);

impl SeedSource for FixedSeed {
    fn next_seed(&self) -> u64 {
        self.0
    }
}

/// Seed source that panics, taking the verdict task down with it
pub(crate) struct PanickingSeed;

impl SeedSource for PanickingSeed {
    fn next_seed(&self) -> u64 {
        panic!("seed source exhausted");
    }
}

#[derive(Default)]
pub(crate) struct RecordingLogger {
    events: Mutex<Vec<&'static str>>,
}

impl RecordingLogger {
    pub fn event_types(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }
}

impl ConversationLogger for RecordingLogger {
    fn log(&self, event: ConversationEvent) {
        self.events.lock().unwrap().push(event.event_type);
    }
}

#[derive(Default)]
pub(crate) struct RecordingProgress {
    total: AtomicUsize,
    completed: Mutex<Vec<String>>,
    verdict: AtomicBool,
}

impl RecordingProgress {
    pub fn total(&self) -> usize {
        self.total.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }

    pub fn verdict_seen(&self) -> bool {
        self.verdict.load(Ordering::SeqCst)
    }
}

impl ProgressNotifier for RecordingProgress {
    fn on_dispatch_start(&self, total_providers: usize) {
        self.total.store(total_providers, Ordering::SeqCst);
    }

    fn on_provider_complete(&self, result: &ProviderResult) {
        self.completed
            .lock()
            .unwrap()
            .push(result.provider_id().to_string());
    }

    fn on_verdict_complete(&self, _report: &VerdictReport) {
        self.verdict.store(true, Ordering::SeqCst);
    }
}

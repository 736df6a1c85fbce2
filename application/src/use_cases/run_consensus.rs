//! Run Consensus use case
//!
//! Fans one request out to every configured provider at once, gathers the
//! results, and resolves the verdict. Two delivery modes share the dispatch:
//!
//! - **batch** ([`RunConsensusUseCase::run_batch`]): waits for everything and
//!   returns a [`ConsensusResult`] in configured provider order;
//! - **streaming** ([`RunConsensusUseCase::run_streaming`]): emits one event per
//!   provider in completion order, then the verdict, then `Done`.
//!
//! A provider failure never affects another provider: adapters are total,
//! and a panicking adapter task is reported as an error result for its slot.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::{NoProgress, ProgressNotifier};
use crate::ports::provider_adapter::ProviderAdapter;
use crate::use_cases::judge_verdict::VerdictJudge;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::{Id, JoinSet};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use triplet_domain::{
    Attachment, ConsensusEvent, ConsensusRequest, ConsensusResult, ConsensusResultBuilder,
    NoticeTemplate, ProviderId, ProviderResult, VerdictReport, VerdictTemplate,
};

/// Errors raised while assembling the coordinator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RunConsensusError {
    #[error("No providers configured")]
    NoProviders,

    #[error("Provider '{0}' is configured more than once")]
    DuplicateProvider(String),

    #[error("Provider id '{0}' is reserved for stream control keys")]
    ReservedProvider(String),
}

/// In-flight provider tasks of one run
struct Dispatch {
    tasks: JoinSet<(usize, ProviderResult)>,
    slots: HashMap<Id, usize>,
    ids: Vec<ProviderId>,
    builder: ConsensusResultBuilder,
    start: Instant,
}

impl Dispatch {
    /// Spawn every adapter immediately; none waits for another.
    fn start(adapters: &[Arc<dyn ProviderAdapter>], request: &ConsensusRequest) -> Self {
        let start = Instant::now();
        let prompt: Arc<str> = Arc::from(request.prompt().content());
        let attachments: Arc<[Attachment]> = Arc::from(request.attachments());
        let ids: Vec<ProviderId> = adapters.iter().map(|a| a.id().clone()).collect();

        let mut tasks = JoinSet::new();
        let mut slots = HashMap::new();

        for (index, adapter) in adapters.iter().enumerate() {
            let adapter = Arc::clone(adapter);
            let prompt = Arc::clone(&prompt);
            let attachments = Arc::clone(&attachments);

            let handle = tasks.spawn(async move {
                let result = adapter.call(&prompt, &attachments).await;
                (index, result)
            });
            slots.insert(handle.id(), index);
        }

        Self {
            tasks,
            slots,
            builder: ConsensusResultBuilder::new(ids.clone()),
            ids,
            start,
        }
    }

    /// Next finished provider, in completion order. `None` once all are done.
    async fn next(&mut self) -> Option<ProviderResult> {
        loop {
            let joined = self.tasks.join_next_with_id().await?;

            let (index, result) = match joined {
                Ok((_, (index, result))) => (index, result),
                Err(e) => {
                    let Some(index) = self.slots.get(&e.id()).copied() else {
                        warn!("Join error from an unknown task: {}", e);
                        continue;
                    };
                    let id = &self.ids[index];
                    warn!("{} task failed: {}", id, e);
                    let text = NoticeTemplate::provider_error(id, "internal error");
                    let elapsed = self.start.elapsed().as_millis() as u64;
                    (index, ProviderResult::failure(id.clone(), text, elapsed))
                }
            };

            self.builder.fill(index, result.clone());
            return Some(result);
        }
    }

    fn completed(&self) -> Vec<ProviderResult> {
        self.builder.completed()
    }

    fn elapsed_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    fn seal(self, verdict: Option<VerdictReport>) -> ConsensusResult {
        let total = self.elapsed_ms();
        self.builder.seal(verdict, total)
    }
}

/// Receiving half of a streaming run
///
/// Dropping it cancels delivery: providers still finish, but no verdict
/// is computed.
pub struct ConsensusStream {
    receiver: mpsc::Receiver<ConsensusEvent>,
}

impl ConsensusStream {
    /// Next event, or `None` after `Done`
    pub async fn next(&mut self) -> Option<ConsensusEvent> {
        self.receiver.recv().await
    }

    /// Drain every remaining event
    pub async fn collect(mut self) -> Vec<ConsensusEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.receiver.recv().await {
            events.push(event);
        }
        events
    }
}

/// Use case for running a consensus request
#[derive(Clone)]
pub struct RunConsensusUseCase {
    adapters: Arc<Vec<Arc<dyn ProviderAdapter>>>,
    judge: Arc<VerdictJudge>,
    logger: Arc<dyn ConversationLogger>,
}

impl RunConsensusUseCase {
    pub fn new(
        adapters: Vec<Arc<dyn ProviderAdapter>>,
        judge: Arc<VerdictJudge>,
    ) -> Result<Self, RunConsensusError> {
        if adapters.is_empty() {
            return Err(RunConsensusError::NoProviders);
        }

        let mut seen = HashSet::new();
        for adapter in &adapters {
            let id = adapter.id();
            if id.is_reserved() {
                return Err(RunConsensusError::ReservedProvider(id.to_string()));
            }
            if !seen.insert(id.clone()) {
                return Err(RunConsensusError::DuplicateProvider(id.to_string()));
            }
        }

        Ok(Self {
            adapters: Arc::new(adapters),
            judge,
            logger: Arc::new(NoConversationLogger),
        })
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Provider ids in dispatch order
    pub fn provider_ids(&self) -> Vec<ProviderId> {
        self.adapters.iter().map(|a| a.id().clone()).collect()
    }

    /// Run the request and wait for the full result
    pub async fn run_batch(&self, request: ConsensusRequest) -> ConsensusResult {
        self.run_batch_with_progress(request, &NoProgress).await
    }

    /// Run the request with progress callbacks
    pub async fn run_batch_with_progress(
        &self,
        request: ConsensusRequest,
        progress: &dyn ProgressNotifier,
    ) -> ConsensusResult {
        info!("Starting consensus with {} providers", self.adapters.len());

        let mut dispatch = Dispatch::start(&self.adapters, &request);
        progress.on_dispatch_start(self.adapters.len());

        while let Some(result) = dispatch.next().await {
            self.logger.log(ConversationEvent::provider_result(&result));
            progress.on_provider_complete(&result);
        }

        let results = dispatch.completed();
        let verdict = self.resolve_verdict(&request, &results, progress).await;
        let consensus = dispatch.seal(Some(verdict));

        self.logger.log(ConversationEvent::run_complete(
            "batch",
            consensus.results().len(),
            consensus.failed().count(),
            consensus.total_elapsed_ms(),
        ));
        info!(
            "Consensus complete in {}ms ({} failed)",
            consensus.total_elapsed_ms(),
            consensus.failed().count()
        );

        consensus
    }

    /// Run the request and deliver events as they happen
    ///
    /// Must be called from within a tokio runtime. Events go through a
    /// channel sized for the whole run, so the driver never waits on a
    /// slow consumer.
    pub fn run_streaming(&self, request: ConsensusRequest) -> ConsensusStream {
        let (sender, receiver) = mpsc::channel(self.adapters.len() + 3);
        let this = self.clone();

        tokio::spawn(async move {
            this.drive_stream(request, sender).await;
        });

        ConsensusStream { receiver }
    }

    async fn drive_stream(self, request: ConsensusRequest, sender: mpsc::Sender<ConsensusEvent>) {
        info!(
            "Starting streaming consensus with {} providers",
            self.adapters.len()
        );

        let mut dispatch = Dispatch::start(&self.adapters, &request);
        let mut open = true;

        while let Some(result) = dispatch.next().await {
            self.logger.log(ConversationEvent::provider_result(&result));
            if open && sender.send(ConsensusEvent::Provider(result)).await.is_err() {
                info!("Stream receiver dropped; remaining providers will finish unobserved");
                open = false;
            }
        }

        let results = dispatch.completed();
        let failed = results.iter().filter(|r| r.is_error()).count();

        if open && !sender.is_closed() {
            let this = self.clone();
            let verdict = tokio::spawn(async move {
                this.resolve_verdict(&request, &results, &NoProgress).await
            })
            .await;

            let event = match verdict {
                Ok(report) => ConsensusEvent::Verdict(report),
                Err(e) => {
                    warn!("Verdict task failed: {}", e);
                    ConsensusEvent::Error(format!("verdict failed: {}", e))
                }
            };

            if sender.send(event).await.is_ok() {
                let _ = sender.send(ConsensusEvent::Done).await;
            }
        } else {
            debug!("Skipping verdict for a closed stream");
        }

        self.logger.log(ConversationEvent::run_complete(
            "stream",
            self.adapters.len(),
            failed,
            dispatch.elapsed_ms(),
        ));
    }

    async fn resolve_verdict(
        &self,
        request: &ConsensusRequest,
        results: &[ProviderResult],
        progress: &dyn ProgressNotifier,
    ) -> VerdictReport {
        let report = if request.skip_verdict() {
            debug!("Verdict skipped by request");
            VerdictReport::skipped(results)
        } else {
            progress.on_verdict_start();
            self.judge
                .evaluate(request.prompt().content(), results)
                .await
        };

        let report = if request.has_images() {
            let capabilities: Vec<(ProviderId, bool)> = self
                .adapters
                .iter()
                .map(|a| (a.id().clone(), a.supports_vision()))
                .collect();
            report.with_note(VerdictTemplate::vision_note(&capabilities))
        } else {
            report
        };

        progress.on_verdict_complete(&report);
        self.logger.log(ConversationEvent::verdict(&report));
        report
    }
}

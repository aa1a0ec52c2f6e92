//! Prompt Orchestrator use case.
//!
//! Builds requests from named templates, sends them through an
//! [`InferenceGateway`] and post-processes the result. One orchestrator
//! serves one agent:
//!
//! - all of its gateways share one [`CadenceThrottle`]
//! - conversational calls are discarded when a newer inbound message
//!   arrives before they finish ([`MessageClock`])
//! - at most one code-generation call is in flight; a second one is
//!   rejected with a placeholder instead of being queued

use crate::config::{GatewayParams, OrchestratorParams};
use crate::pacing::{CadenceThrottle, MessageClock, StalenessMark};
use crate::ports::dataset_logger::{DatasetLogger, NoDatasetLogger};
use crate::ports::provider_adapter::ProviderAdapter;
use crate::use_cases::inference_gateway::{GatewayError, InferenceGateway};
use mindgate_domain::messages;
use mindgate_domain::prompt::{format_transcript, render};
use mindgate_domain::util::preview;
use mindgate_domain::{
    ConversationRequest, ErrorClassifier, Placeholder, PromptContext, PromptKind, SelfGoal, Turn,
    parse_goal,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};

/// Resets the code-generation flag on every exit path.
struct CodeGenerationGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> CodeGenerationGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for CodeGenerationGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Use case for building and sending every prompt of one agent.
pub struct PromptOrchestrator {
    chat: Arc<dyn ProviderAdapter>,
    code: Option<Arc<dyn ProviderAdapter>>,
    vision: Option<Arc<dyn ProviderAdapter>>,
    embedding: Option<Arc<dyn ProviderAdapter>>,
    classifier: Arc<ErrorClassifier>,
    dataset_logger: Arc<dyn DatasetLogger>,
    throttle: Arc<CadenceThrottle>,
    clock: Arc<MessageClock>,
    gateway_params: GatewayParams,
    params: OrchestratorParams,
    code_in_flight: AtomicBool,
}

impl PromptOrchestrator {
    pub fn new(
        chat: Arc<dyn ProviderAdapter>,
        gateway_params: GatewayParams,
        params: OrchestratorParams,
    ) -> Self {
        Self {
            chat,
            code: None,
            vision: None,
            embedding: None,
            classifier: Arc::new(ErrorClassifier::default()),
            dataset_logger: Arc::new(NoDatasetLogger),
            throttle: Arc::new(CadenceThrottle::new(gateway_params.cooldown)),
            clock: Arc::new(MessageClock::new()),
            gateway_params,
            params,
            code_in_flight: AtomicBool::new(false),
        }
    }

    /// Use a dedicated adapter for code generation.
    pub fn with_code_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.code = Some(adapter);
        self
    }

    /// Use a dedicated adapter for image analysis.
    pub fn with_vision_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.vision = Some(adapter);
        self
    }

    /// Use a dedicated adapter for embeddings.
    pub fn with_embedding_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.embedding = Some(adapter);
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<ErrorClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_dataset_logger(mut self, logger: Arc<dyn DatasetLogger>) -> Self {
        self.dataset_logger = logger;
        self
    }

    pub fn params(&self) -> &OrchestratorParams {
        &self.params
    }

    /// Record that a new inbound message arrived. In-flight conversational
    /// calls started before this point will return an empty reply.
    pub fn note_inbound_message(&self) -> u64 {
        self.clock.advance()
    }

    /// Base context: `$NAME`, plus examples and command docs cut to the
    /// configured maxima.
    pub fn context(&self, examples: &[String], command_docs: &[String]) -> PromptContext {
        PromptContext::new()
            .with(Placeholder::Name, self.params.agent_name.clone())
            .with_examples(examples, self.params.max_examples)
            .with_command_docs(command_docs, self.params.max_command_docs)
    }

    fn render(&self, kind: PromptKind, mut context: PromptContext) -> String {
        if !context.contains(Placeholder::Name) {
            context.set(Placeholder::Name, self.params.agent_name.clone());
        }
        let rendered = render(self.params.templates.get(kind), &context);
        if !rendered.is_complete() {
            warn!(
                template = %kind,
                unresolved = ?rendered.unresolved,
                "Prompt has unresolved placeholders"
            );
        }
        rendered.text
    }

    fn gateway(&self, adapter: &Arc<dyn ProviderAdapter>) -> InferenceGateway {
        InferenceGateway::new(adapter.clone(), self.gateway_params.clone())
            .with_classifier(self.classifier.clone())
            .with_throttle(self.throttle.clone())
            .with_dataset_logger(self.dataset_logger.clone())
    }

    fn is_unusable(&self, text: &str) -> bool {
        text.trim().is_empty() || text.contains(messages::BACKEND_FAILURE)
    }

    /// Conversational reply to `history`.
    ///
    /// Empty, generic-failure and cross-agent outputs are regenerated up to
    /// `max_generation_retries` times before falling back to an apology. A
    /// stale call returns an empty string.
    pub async fn prompt_conversation(&self, history: &[Turn], context: PromptContext) -> String {
        let mark = self.clock.mark();
        let system = self.render(PromptKind::Conversation, context);
        let gateway = self.gateway(&self.chat);

        for attempt in 1..=self.params.max_generation_retries {
            let request =
                ConversationRequest::new(history.to_vec()).with_system_message(system.clone());
            let Some(result) = gateway.complete(request, &mark).await else {
                info!("Conversation reply discarded: a newer message arrived");
                return String::new();
            };

            if result.text.contains(&self.params.cross_agent_tag) {
                warn!(attempt, "Model wrote as another agent, regenerating");
                continue;
            }
            if self.is_unusable(&result.text) {
                warn!(attempt, "Unusable reply, regenerating");
                continue;
            }
            return result.text;
        }

        messages::GENERATION_APOLOGY.to_string()
    }

    /// Code for the latest request in `history`.
    pub async fn prompt_coding(&self, history: &[Turn], context: PromptContext) -> String {
        let Some(_guard) = CodeGenerationGuard::try_acquire(&self.code_in_flight) else {
            info!("Code generation already in flight, rejecting request");
            return messages::CODE_BUSY.to_string();
        };

        let system = self.render(PromptKind::Coding, context);
        let adapter = self.code.as_ref().unwrap_or(&self.chat);
        let request = ConversationRequest::new(history.to_vec()).with_system_message(system);
        self.gateway(adapter)
            .complete(request, &StalenessMark::never())
            .await
            .map(|result| result.text)
            .unwrap_or_default()
    }

    /// Fold `to_summarize` into a new memory summary.
    pub async fn prompt_memory_summary(
        &self,
        to_summarize: &[Turn],
        context: PromptContext,
    ) -> String {
        let context = context.with(Placeholder::ToSummarize, format_transcript(to_summarize));
        let prompt = self.render(PromptKind::MemorySummarization, context);
        let request = ConversationRequest::new(vec![Turn::user(prompt)]);
        self.gateway(&self.chat)
            .complete(request, &StalenessMark::never())
            .await
            .map(|result| result.text)
            .unwrap_or_default()
    }

    /// Ask the model for its next goal. Failed calls and malformed replies
    /// yield `None`.
    pub async fn prompt_goal_setting(
        &self,
        history: &[Turn],
        last_goals: &str,
        context: PromptContext,
    ) -> Option<SelfGoal> {
        let context = context.with(Placeholder::LastGoals, last_goals);
        let system = self.render(PromptKind::GoalSetting, context);
        let turns = if history.is_empty() {
            vec![Turn::user("Set your next goal.")]
        } else {
            history.to_vec()
        };
        let request = ConversationRequest::new(turns).with_system_message(system);
        let result = self
            .gateway(&self.chat)
            .complete(request, &StalenessMark::never())
            .await?;
        if !result.is_success() {
            return None;
        }
        let goal = parse_goal(&result.text);
        if goal.is_none() {
            debug!("No valid goal in reply: {}", preview(&result.text, 120));
        }
        goal
    }

    /// Whether the agent should interrupt its work to answer another agent.
    pub async fn prompt_should_respond(&self, convo: &[Turn], context: PromptContext) -> bool {
        let prompt = self.render(PromptKind::BotResponder, context.with_conversation(convo));
        let request = ConversationRequest::new(vec![Turn::user(prompt)]);
        match self
            .gateway(&self.chat)
            .complete(request, &StalenessMark::never())
            .await
        {
            Some(result) if result.is_success() => {
                result.text.trim().eq_ignore_ascii_case("respond")
            }
            _ => false,
        }
    }

    /// Describe `image` (JPEG bytes). Successful transcripts are recorded
    /// with the image.
    pub async fn prompt_vision(
        &self,
        history: &[Turn],
        image: &[u8],
        context: PromptContext,
    ) -> String {
        let prompt = self.render(PromptKind::ImageAnalysis, context);
        let mut turns = history.to_vec();
        turns.push(Turn::user(prompt));
        let adapter = self.vision.as_ref().unwrap_or(&self.chat);
        let Some(result) = self
            .gateway(adapter)
            .complete_vision(ConversationRequest::new(turns), image, &StalenessMark::never())
            .await
        else {
            return String::new();
        };
        if result.is_success() {
            self.dataset_logger.record_vision(image, &result.text);
        }
        result.text
    }

    /// Embed `text` for ranking. The only orchestrator call that can fail.
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, GatewayError> {
        let adapter = self.embedding.as_ref().unwrap_or(&self.chat);
        self.gateway(adapter).embed(text).await
    }
}

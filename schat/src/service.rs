//! The bounded turn loop driving one chat session.

use std::sync::Arc;

use futures_util::StreamExt;
use scommon::ConversationId;
use sprovider::{
    FinalMessage, ModelProvider, ModelRequest, PromptCatalog, StreamEvent, ToolInvocation, Turn,
};
use stooling::{describe_tool_call, ProductDisplay, ToolExecutionContext, ToolGateway, ToolOutcome};

use crate::{
    ChatError, ChatRuntimeHooks, ClientEvent, ConversationStore, EventEmitter, NoopChatHooks,
    WorkingHistory,
};

const DEFAULT_MODEL: &str = "claude-sonnet-4-5";

/// Limits for one session. `max_model_rounds` bounds provider invocations
/// per user message; a tool-use-only model can never loop unbounded.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatPolicy {
    pub model: String,
    pub max_model_rounds: u32,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

impl Default for ChatPolicy {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_model_rounds: 6,
            max_tokens: 1024,
            temperature: None,
        }
    }
}

/// How turn appends reach the durable store. `Detached` spawns the write
/// and never lets its failure reach the client; `Awaited` propagates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PersistenceMode {
    #[default]
    Detached,
    Awaited,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatSessionRequest {
    pub conversation_id: ConversationId,
    pub message: String,
    pub prompt_type: Option<String>,
    pub customer_token: Option<String>,
}

impl ChatSessionRequest {
    pub fn new(conversation_id: impl Into<ConversationId>, message: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            message: message.into(),
            prompt_type: None,
            customer_token: None,
        }
    }

    pub fn with_prompt_type(mut self, prompt_type: impl Into<String>) -> Self {
        self.prompt_type = Some(prompt_type.into());
        self
    }

    pub fn with_customer_token(mut self, token: impl Into<String>) -> Self {
        self.customer_token = Some(token.into());
        self
    }
}

#[derive(Clone)]
pub struct ChatService {
    provider: Arc<dyn ModelProvider>,
    store: Arc<dyn ConversationStore>,
    gateway: Arc<dyn ToolGateway>,
    prompts: PromptCatalog,
    policy: ChatPolicy,
    persistence: PersistenceMode,
    hooks: Arc<dyn ChatRuntimeHooks>,
}

impl ChatService {
    pub fn builder() -> ChatServiceBuilder {
        ChatServiceBuilder::default()
    }

    /// Runs one user message to completion against `emitter`.
    ///
    /// Relays text deltas as they arrive, dispatches requested tool calls
    /// between rounds, and stops on `EndTurn`, on a missing stop reason,
    /// or when the round budget is spent. Tool failures feed back into
    /// the conversation; provider failures propagate to the caller, which
    /// surfaces exactly one classified terminal event.
    pub async fn run_session(
        &self,
        request: ChatSessionRequest,
        emitter: &dyn EventEmitter,
    ) -> Result<(), ChatError> {
        if request.message.trim().is_empty() {
            return Err(ChatError::invalid_request("message must not be empty"));
        }

        let conversation_id = request.conversation_id.clone();
        emitter.send(&ClientEvent::Id {
            conversation_id: conversation_id.to_string(),
        });
        self.hooks.on_session_start(&conversation_id);

        let mut history = WorkingHistory::seeded(self.store.load_turns(&conversation_id).await?);
        let user_turn = Turn::user_text(request.message.clone());
        history.push(user_turn.clone());
        self.persist_turn(&conversation_id, user_turn).await?;

        let system_prompt = self.prompts.resolve(request.prompt_type.as_deref()).to_string();
        let catalog = self.gateway.catalog();
        let tool_context = {
            let context = ToolExecutionContext::new(conversation_id.clone());
            match &request.customer_token {
                Some(token) => context.with_customer_token(token.clone()),
                None => context,
            }
        };

        let mut products: Vec<ProductDisplay> = Vec::new();
        let mut rounds = 0;

        while rounds < self.policy.max_model_rounds {
            rounds += 1;
            self.hooks.on_round_start(&conversation_id, rounds);

            let model_request = self.build_model_request(&system_prompt, &history, &catalog)?;
            let (message, requested_tools) = self.stream_round(model_request, emitter).await?;

            let assistant_turn = Turn::assistant(message.content.clone());
            history.push(assistant_turn.clone());
            self.persist_turn(&conversation_id, assistant_turn).await?;

            for _ in &message.content {
                emitter.send(&ClientEvent::ContentBlockComplete);
            }
            emitter.send(&ClientEvent::MessageComplete);
            self.hooks
                .on_round_complete(&conversation_id, rounds, message.stop_reason);

            // No stop reason means the provider response did not conform;
            // stop rather than loop on it.
            if message.stop_reason.is_none() || message.ends_turn() || requested_tools.is_empty() {
                break;
            }

            let result_turn = self
                .dispatch_tools(requested_tools, &tool_context, &mut products, emitter)
                .await;
            history.push(result_turn);
        }

        emitter.send(&ClientEvent::EndTurn);
        if !products.is_empty() {
            emitter.send(&ClientEvent::ProductResults { products });
        }
        self.hooks.on_session_complete(&conversation_id, rounds);

        Ok(())
    }

    fn build_model_request(
        &self,
        system_prompt: &str,
        history: &WorkingHistory,
        catalog: &[sprovider::ToolDefinition],
    ) -> Result<ModelRequest, ChatError> {
        let mut builder = ModelRequest::builder(self.policy.model.clone())
            .system(system_prompt)
            .history(history.snapshot())
            .tools(catalog.to_vec())
            .max_tokens(self.policy.max_tokens);

        if let Some(temperature) = self.policy.temperature {
            builder = builder.temperature(temperature);
        }

        Ok(builder.build()?)
    }

    /// Drives one provider invocation: relays deltas immediately, collects
    /// tool-use requests, and returns the terminal message.
    async fn stream_round(
        &self,
        request: ModelRequest,
        emitter: &dyn EventEmitter,
    ) -> Result<(FinalMessage, Vec<ToolInvocation>), ChatError> {
        let mut stream = self.provider.stream(request).await?;
        let mut requested_tools = Vec::new();
        let mut final_message = None;

        while let Some(event) = stream.next().await {
            match event? {
                StreamEvent::TextDelta(text) => {
                    emitter.send(&ClientEvent::Chunk { text });
                }
                StreamEvent::ToolUseRequest(invocation) => requested_tools.push(invocation),
                StreamEvent::MessageComplete(message) => {
                    final_message = Some(message);
                }
            }
        }

        let message = final_message.ok_or_else(|| {
            ChatError::provider("provider stream ended without a terminal message")
        })?;

        Ok((message, requested_tools))
    }

    /// Runs every requested tool and folds the outcomes into one user
    /// turn of `tool_result` blocks, announcing each call with `tool_use`
    /// and each folded result with `new_message`. Failures become
    /// error-tagged blocks the model sees next round; they never abort
    /// the session.
    async fn dispatch_tools(
        &self,
        requested_tools: Vec<ToolInvocation>,
        context: &ToolExecutionContext,
        products: &mut Vec<ProductDisplay>,
        emitter: &dyn EventEmitter,
    ) -> Turn {
        let mut result_blocks = Vec::with_capacity(requested_tools.len());

        for invocation in requested_tools {
            emitter.send(&ClientEvent::ToolUse {
                description: describe_tool_call(&invocation.name, &invocation.input),
            });

            let tool_name = invocation.name.clone();
            let tool_use_id = invocation.id.clone();
            let outcome = match self.gateway.call_tool(invocation, context.clone()).await {
                Ok(envelope) => envelope.into_outcome(),
                Err(error) => ToolOutcome::Failure {
                    detail: error.to_string(),
                },
            };

            let failed = outcome.is_failure();
            match outcome {
                ToolOutcome::Success {
                    payload,
                    display_items,
                } => {
                    products.extend(display_items);
                    result_blocks.push(sprovider::ContentBlock::tool_result(
                        tool_use_id,
                        payload.to_string(),
                    ));
                }
                ToolOutcome::Failure { detail } => {
                    result_blocks.push(sprovider::ContentBlock::tool_error(tool_use_id, detail));
                }
            }

            self.hooks
                .on_tool_dispatch(&context.conversation_id, &tool_name, failed);
            emitter.send(&ClientEvent::NewMessage);
        }

        Turn::user(result_blocks)
    }

    async fn persist_turn(
        &self,
        conversation_id: &ConversationId,
        turn: Turn,
    ) -> Result<(), ChatError> {
        match self.persistence {
            PersistenceMode::Awaited => self.store.append_turn(conversation_id, turn).await,
            PersistenceMode::Detached => {
                let store = Arc::clone(&self.store);
                let hooks = Arc::clone(&self.hooks);
                let conversation_id = conversation_id.clone();

                tokio::spawn(async move {
                    if let Err(error) = store.append_turn(&conversation_id, turn).await {
                        tracing::warn!(
                            conversation_id = %conversation_id,
                            error = %error,
                            "turn persistence failed"
                        );
                        hooks.on_persistence_failure(&conversation_id, &error);
                    }
                });

                Ok(())
            }
        }
    }
}

#[derive(Default)]
pub struct ChatServiceBuilder {
    provider: Option<Arc<dyn ModelProvider>>,
    store: Option<Arc<dyn ConversationStore>>,
    gateway: Option<Arc<dyn ToolGateway>>,
    prompts: Option<PromptCatalog>,
    policy: Option<ChatPolicy>,
    persistence: Option<PersistenceMode>,
    hooks: Option<Arc<dyn ChatRuntimeHooks>>,
}

impl ChatServiceBuilder {
    pub fn provider(mut self, provider: Arc<dyn ModelProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn store(mut self, store: Arc<dyn ConversationStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn gateway(mut self, gateway: Arc<dyn ToolGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn prompts(mut self, prompts: PromptCatalog) -> Self {
        self.prompts = Some(prompts);
        self
    }

    pub fn policy(mut self, policy: ChatPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn persistence(mut self, persistence: PersistenceMode) -> Self {
        self.persistence = Some(persistence);
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn ChatRuntimeHooks>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn build(self) -> Result<ChatService, ChatError> {
        let provider = self
            .provider
            .ok_or_else(|| ChatError::invalid_request("chat service requires a provider"))?;
        let store = self
            .store
            .ok_or_else(|| ChatError::invalid_request("chat service requires a store"))?;
        let gateway = self
            .gateway
            .ok_or_else(|| ChatError::invalid_request("chat service requires a tool gateway"))?;

        Ok(ChatService {
            provider,
            store,
            gateway,
            prompts: self.prompts.unwrap_or_default(),
            policy: self.policy.unwrap_or_default(),
            persistence: self.persistence.unwrap_or_default(),
            hooks: self
                .hooks
                .unwrap_or_else(|| Arc::new(NoopChatHooks)),
        })
    }
}

//! End-to-end turn loop scenarios with scripted providers and gateways.

use std::sync::{Arc, Mutex};

use schat::{
    BufferedEmitter, ChatPolicy, ChatService, ChatSessionRequest, ClientEvent, ConversationStore,
    InMemoryConversationStore, PersistenceMode,
};
use serde_json::json;
use sprovider::{
    BoxedEventStream, ContentBlock, FinalMessage, ModelProvider, ModelRequest, ProviderError,
    ProviderFuture, ProviderId, StopReason, StreamEvent, TokenUsage, ToolInvocation,
    VecEventStream,
};
use stooling::{RegistryGateway, ToolEnvelope, ToolGateway, ToolRegistry};

struct ScriptedProvider {
    scripts: Mutex<Vec<Vec<Result<StreamEvent, ProviderError>>>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedProvider {
    fn new(scripts: Vec<Vec<Result<StreamEvent, ProviderError>>>) -> Self {
        Self {
            scripts: Mutex::new(scripts),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.lock().expect("requests lock").len()
    }
}

impl ModelProvider for ScriptedProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Scripted
    }

    fn stream<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ProviderFuture<'a, Result<BoxedEventStream<'a>, ProviderError>> {
        Box::pin(async move {
            self.requests.lock().expect("requests lock").push(request);

            let mut scripts = self.scripts.lock().expect("scripts lock");
            if scripts.is_empty() {
                return Err(ProviderError::unavailable("no scripted rounds left"));
            }
            let events = scripts.remove(0);
            Ok(Box::pin(VecEventStream::new(events)) as BoxedEventStream<'a>)
        })
    }
}

fn tool_use_round(tool: &str, input: serde_json::Value) -> Vec<Result<StreamEvent, ProviderError>> {
    let invocation = ToolInvocation {
        id: format!("toolu_{tool}"),
        name: tool.to_string(),
        input,
    };

    vec![
        Ok(StreamEvent::ToolUseRequest(invocation.clone())),
        Ok(StreamEvent::MessageComplete(FinalMessage {
            content: vec![ContentBlock::tool_use(invocation)],
            stop_reason: Some(StopReason::ToolUse),
            usage: TokenUsage::default(),
        })),
    ]
}

fn text_round(text: &str) -> Vec<Result<StreamEvent, ProviderError>> {
    vec![
        Ok(StreamEvent::TextDelta(text.to_string())),
        Ok(StreamEvent::MessageComplete(FinalMessage {
            content: vec![ContentBlock::text(text)],
            stop_reason: Some(StopReason::EndTurn),
            usage: TokenUsage::default(),
        })),
    ]
}

fn search_gateway(envelope: ToolEnvelope) -> Arc<dyn ToolGateway> {
    let mut registry = ToolRegistry::new();
    let envelope = Arc::new(envelope);
    registry.register_fn(
        sprovider::ToolDefinition {
            name: "search_catalog".to_string(),
            description: "Searches the storefront catalog".to_string(),
            input_schema: r#"{"type":"object"}"#.to_string(),
        },
        move |_input, _ctx| {
            let envelope = Arc::clone(&envelope);
            async move { Ok((*envelope).clone()) }
        },
    );

    Arc::new(RegistryGateway::new(Arc::new(registry)))
}

fn service(
    provider: Arc<ScriptedProvider>,
    gateway: Arc<dyn ToolGateway>,
) -> (ChatService, Arc<InMemoryConversationStore>) {
    let store = Arc::new(InMemoryConversationStore::new());
    let service = ChatService::builder()
        .provider(provider)
        .store(Arc::clone(&store) as Arc<dyn schat::ConversationStore>)
        .gateway(gateway)
        .persistence(PersistenceMode::Awaited)
        .build()
        .expect("service should build");

    (service, store)
}

#[tokio::test]
async fn successful_tool_round_feeds_products_and_continues() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_use_round("search_catalog", json!({"query": "boots"})),
        text_round("We have Trail Boots in stock."),
    ]));
    let gateway = search_gateway(ToolEnvelope::success(json!({
        "products": [{"id": "p1", "title": "Trail Boots", "price": "129.00"}]
    })));
    let (service, _store) = service(Arc::clone(&provider), gateway);

    let emitter = BufferedEmitter::new();
    service
        .run_session(
            ChatSessionRequest::new("conv-1", "do you have boots?"),
            &emitter,
        )
        .await
        .expect("session should succeed");

    assert_eq!(provider.request_count(), 2);

    let document = emitter.into_document();
    assert_eq!(document.message, "We have Trail Boots in stock.");
    assert_eq!(document.products.len(), 1);
    assert_eq!(document.products[0].title.as_deref(), Some("Trail Boots"));

    let types: Vec<&ClientEvent> = document.events.iter().collect();
    assert!(types
        .iter()
        .any(|event| matches!(event, ClientEvent::ToolUse { description } if description.contains("boots"))));
    assert!(types.iter().any(|event| matches!(event, ClientEvent::NewMessage)));
    assert!(types
        .iter()
        .any(|event| matches!(event, ClientEvent::ProductResults { .. })));

    // product_results trails end_turn
    let end_turn_at = document
        .events
        .iter()
        .position(|event| matches!(event, ClientEvent::EndTurn))
        .expect("end_turn present");
    let products_at = document
        .events
        .iter()
        .position(|event| matches!(event, ClientEvent::ProductResults { .. }))
        .expect("product_results present");
    assert!(products_at > end_turn_at);
}

#[tokio::test]
async fn failed_tool_round_continues_with_error_tagged_result() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_use_round("search_catalog", json!({"query": "boots"})),
        text_round("I could not reach inventory, sorry."),
    ]));
    let gateway = search_gateway(ToolEnvelope::failure("inventory service unavailable"));
    let (service, _store) = service(Arc::clone(&provider), gateway);

    let emitter = BufferedEmitter::new();
    service
        .run_session(
            ChatSessionRequest::new("conv-1", "do you have boots?"),
            &emitter,
        )
        .await
        .expect("tool failure must not abort the session");

    let requests = provider.requests.lock().expect("requests lock");
    assert_eq!(requests.len(), 2);

    // Second round sees the failure as an error-tagged tool result.
    let folded = requests[1]
        .history
        .last()
        .expect("tool result turn present");
    assert_eq!(folded.role, sprovider::Role::User);
    assert!(matches!(
        &folded.content[0],
        ContentBlock::ToolResult { is_error: true, content, .. }
            if content.contains("inventory service unavailable")
    ));

    let document = emitter.into_document();
    assert!(document.products.is_empty());
    assert_eq!(document.message, "I could not reach inventory, sorry.");
}

#[tokio::test]
async fn each_tool_call_in_a_round_gets_its_own_new_message() {
    let first = ToolInvocation {
        id: "toolu_1".to_string(),
        name: "search_catalog".to_string(),
        input: json!({"query": "boots"}),
    };
    let second = ToolInvocation {
        id: "toolu_2".to_string(),
        name: "search_catalog".to_string(),
        input: json!({"query": "socks"}),
    };
    let two_tool_round = vec![
        Ok(StreamEvent::ToolUseRequest(first.clone())),
        Ok(StreamEvent::ToolUseRequest(second.clone())),
        Ok(StreamEvent::MessageComplete(FinalMessage {
            content: vec![
                ContentBlock::tool_use(first),
                ContentBlock::tool_use(second),
            ],
            stop_reason: Some(StopReason::ToolUse),
            usage: TokenUsage::default(),
        })),
    ];
    let provider = Arc::new(ScriptedProvider::new(vec![
        two_tool_round,
        text_round("Boots and socks are both in stock."),
    ]));
    let gateway = search_gateway(ToolEnvelope::success(json!({"products": []})));
    let (service, _store) = service(Arc::clone(&provider), gateway);

    let emitter = BufferedEmitter::new();
    service
        .run_session(
            ChatSessionRequest::new("conv-1", "boots and socks?"),
            &emitter,
        )
        .await
        .expect("session should succeed");

    let document = emitter.into_document();
    let markers: Vec<&ClientEvent> = document
        .events
        .iter()
        .filter(|event| {
            matches!(event, ClientEvent::ToolUse { .. } | ClientEvent::NewMessage)
        })
        .collect();

    // Every call is announced and answered in place: use, message, use, message.
    assert_eq!(markers.len(), 4);
    assert!(matches!(markers[0], ClientEvent::ToolUse { .. }));
    assert!(matches!(markers[1], ClientEvent::NewMessage));
    assert!(matches!(markers[2], ClientEvent::ToolUse { .. }));
    assert!(matches!(markers[3], ClientEvent::NewMessage));

    // Both results still fold into the single user turn the next round sees.
    let requests = provider.requests.lock().expect("requests lock");
    let folded = requests[1].history.last().expect("tool result turn present");
    assert_eq!(folded.content.len(), 2);
}

#[tokio::test]
async fn round_budget_caps_tool_use_only_sessions_at_six_invocations() {
    let scripts = (0..10)
        .map(|_| tool_use_round("search_catalog", json!({"query": "boots"})))
        .collect();
    let provider = Arc::new(ScriptedProvider::new(scripts));
    let gateway = search_gateway(ToolEnvelope::success(json!({"products": []})));
    let (service, _store) = service(Arc::clone(&provider), gateway);

    let emitter = BufferedEmitter::new();
    service
        .run_session(ChatSessionRequest::new("conv-1", "keep searching"), &emitter)
        .await
        .expect("session should succeed");

    assert_eq!(provider.request_count(), 6);
    let document = emitter.into_document();
    assert!(document.events.iter().any(|event| matches!(event, ClientEvent::EndTurn)));
}

#[tokio::test]
async fn buffered_mode_concatenates_chunks_across_deltas() {
    let provider = Arc::new(ScriptedProvider::new(vec![vec![
        Ok(StreamEvent::TextDelta("Hel".to_string())),
        Ok(StreamEvent::TextDelta("lo".to_string())),
        Ok(StreamEvent::MessageComplete(FinalMessage {
            content: vec![ContentBlock::text("Hello")],
            stop_reason: Some(StopReason::EndTurn),
            usage: TokenUsage::default(),
        })),
    ]]));
    let (service, store) = service(
        Arc::clone(&provider),
        Arc::new(RegistryGateway::default()),
    );

    let emitter = BufferedEmitter::new();
    service
        .run_session(ChatSessionRequest::new("conv-1", "hi"), &emitter)
        .await
        .expect("session should succeed");

    let document = emitter.into_document();
    assert_eq!(document.message, "Hello");

    let turns = store
        .load_turns(&scommon::ConversationId::from("conv-1"))
        .await
        .expect("load should succeed");
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[1].text(), "Hello");
}

#[tokio::test]
async fn custom_round_policy_is_honored() {
    let scripts = (0..4)
        .map(|_| tool_use_round("search_catalog", json!({})))
        .collect();
    let provider = Arc::new(ScriptedProvider::new(scripts));
    let gateway = search_gateway(ToolEnvelope::success(json!({})));

    let store = Arc::new(InMemoryConversationStore::new());
    let service = ChatService::builder()
        .provider(Arc::clone(&provider) as Arc<dyn ModelProvider>)
        .store(store)
        .gateway(gateway)
        .policy(ChatPolicy {
            max_model_rounds: 2,
            ..ChatPolicy::default()
        })
        .persistence(PersistenceMode::Awaited)
        .build()
        .expect("service should build");

    let emitter = BufferedEmitter::new();
    service
        .run_session(ChatSessionRequest::new("conv-1", "hi"), &emitter)
        .await
        .expect("session should succeed");

    assert_eq!(provider.request_count(), 2);
}

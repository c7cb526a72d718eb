//! The two-phase conversation loop.
//!
//! Single pass per request, no persisted session state:
//! classify -> retrieve -> prompt -> model call #1 -> branch. A direct
//! answer terminates the run; a function-call directive is dispatched and
//! the envelope is formatted by model call #2. Only model-transport
//! failures abort the request; dispatch failures are data and still produce
//! a normal-looking answer.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use switchboard_core::classify::{ClassificationResult, IntentClassifier};
use switchboard_core::envelope::{ArgumentMap, DispatchRequest, DispatchResult, FunctionDispatch};
use switchboard_core::platform::{detect_platform_mentions, PlatformGate};
use switchboard_core::registry::FunctionRegistry;

use crate::llm::{ChatMessage, LlmClient, LlmError};
use crate::prompt::PromptBuilder;
use crate::retrieval::{ContextRetriever, RetrievedDocs};

/// The sole inbound value: one chat message and an optional domain hint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserQuery {
    pub message: String,
    pub domain_hint: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatResponse {
    pub role: String,
    pub label: String,
    pub response: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestContext {
    pub correlation_id: String,
}

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Model(#[from] LlmError),
}

const ACCESS_POINT_FORMAT_PROMPT: &str = "You are formatting a wireless access-point report for \
a chat window. Summarize the report message first, then render the access-point entries as an \
HTML table with one row per access point.";

const GENERIC_FORMAT_PROMPT: &str = "Render the following function result as clean HTML for a \
chat window. Tabulate arrays, keep scalar values inline, and explain any error in plain \
language.";

pub struct ConversationOrchestrator {
    classifier: IntentClassifier,
    gate: PlatformGate,
    registry: Arc<FunctionRegistry>,
    llm: Arc<dyn LlmClient>,
    retriever: Arc<dyn ContextRetriever>,
    dispatcher: Arc<dyn FunctionDispatch>,
}

impl ConversationOrchestrator {
    pub fn new(
        classifier: IntentClassifier,
        gate: PlatformGate,
        registry: Arc<FunctionRegistry>,
        llm: Arc<dyn LlmClient>,
        retriever: Arc<dyn ContextRetriever>,
        dispatcher: Arc<dyn FunctionDispatch>,
    ) -> Self {
        Self { classifier, gate, registry, llm, retriever, dispatcher }
    }

    pub async fn run(
        &self,
        query: &UserQuery,
        ctx: &RequestContext,
    ) -> Result<ChatResponse, OrchestratorError> {
        let classification =
            self.classifier.classify(&query.message, query.domain_hint.as_deref());
        let label = classification.label().to_string();
        info!(
            event_name = "chat.classified",
            correlation_id = %ctx.correlation_id,
            label = %label,
            "message classified"
        );

        let mentions = detect_platform_mentions(&query.message);
        let docs = self.retrieve(&classification, &query.message, ctx).await;
        let messages =
            PromptBuilder::build(&classification, &docs, &mentions, &self.gate, &query.message);

        let catalog = self.registry.model_catalog();
        let first = self.llm.chat(&messages, Some(catalog.as_slice())).await?;

        let Some(call) = first.function_call else {
            return Ok(ChatResponse {
                role: "assistant".to_string(),
                label,
                response: first.content.unwrap_or_default(),
            });
        };

        let arguments = parse_arguments(&call.arguments_json, &call.name, ctx);
        let result = self
            .dispatcher
            .dispatch(DispatchRequest::new(call.name, arguments))
            .await;
        info!(
            event_name = "chat.dispatched",
            correlation_id = %ctx.correlation_id,
            function = %result.function_name,
            success = result.is_success(),
            "function dispatched"
        );

        let second = self.llm.chat(&phase2_messages(&result), None).await?;
        Ok(ChatResponse {
            role: "assistant".to_string(),
            label,
            response: second.content.unwrap_or_default(),
        })
    }

    /// Retrieval routing per classification. Retrieval is an external
    /// collaborator; a failure there degrades to an empty context rather
    /// than aborting the chat.
    async fn retrieve(
        &self,
        classification: &ClassificationResult,
        message: &str,
        ctx: &RequestContext,
    ) -> RetrievedDocs {
        let outcome = match classification {
            ClassificationResult::Event => {
                self.retriever.retrieve_event_info(message).await.map(RetrievedDocs::Event)
            }
            ClassificationResult::Lob { .. } => {
                self.retriever.retrieve_lob_info(message).await.map(RetrievedDocs::Lob)
            }
            ClassificationResult::DomainFallback { .. } => {
                let mentions = detect_platform_mentions(message);
                if mentions.is_empty() {
                    self.retriever.retrieve_domain_info(message).await.map(RetrievedDocs::Domain)
                } else {
                    let platform_names: Vec<String> =
                        mentions.iter().map(|platform| platform.key().to_string()).collect();
                    self.retriever
                        .retrieve_api_docs(message, &platform_names)
                        .await
                        .map(RetrievedDocs::ApiDocs)
                }
            }
        };

        match outcome {
            Ok(docs) => docs,
            Err(error) => {
                warn!(
                    event_name = "chat.retrieval.degraded",
                    correlation_id = %ctx.correlation_id,
                    error = %error,
                    "retrieval failed, continuing without context"
                );
                RetrievedDocs::Domain(Vec::new())
            }
        }
    }
}

/// Lenient recovery: malformed argument JSON becomes an empty map, not a
/// request failure.
fn parse_arguments(arguments_json: &str, function: &str, ctx: &RequestContext) -> ArgumentMap {
    match serde_json::from_str::<Value>(arguments_json) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            warn!(
                event_name = "chat.function_call.bad_arguments",
                correlation_id = %ctx.correlation_id,
                function = %function,
                raw = %arguments_json,
                "malformed function-call arguments, substituting empty map"
            );
            ArgumentMap::new()
        }
    }
}

/// An object carrying both a "message" and a list of access-point-like
/// entries is formatted by the specialized prompt.
fn is_access_point_report(payload: &Value) -> bool {
    let Some(object) = payload.as_object() else {
        return false;
    };
    if !object.contains_key("message") {
        return false;
    }
    object.values().any(|value| {
        value.as_array().is_some_and(|entries| {
            !entries.is_empty()
                && entries.iter().all(|entry| {
                    entry.as_object().is_some_and(|fields| {
                        fields.contains_key("ap_name")
                            || fields.contains_key("apName")
                            || fields.contains_key("mac_address")
                            || fields.contains_key("macAddress")
                    })
                })
        })
    })
}

fn phase2_messages(result: &DispatchResult) -> Vec<ChatMessage> {
    let specialized = result.payload().is_some_and(is_access_point_report);
    let system = if specialized { ACCESS_POINT_FORMAT_PROMPT } else { GENERIC_FORMAT_PROMPT };
    vec![
        ChatMessage::system(system),
        ChatMessage::user(result.to_model_payload().to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::{json, Value};

    use switchboard_core::classify::IntentClassifier;
    use switchboard_core::envelope::{DispatchRequest, DispatchResult, FunctionDispatch};
    use switchboard_core::platform::PlatformGate;
    use switchboard_core::registry::{
        FunctionRegistry, FunctionSpec, ParamKind, ParamSpec, RestBinding, RestMethod,
    };
    use switchboard_core::platform::PlatformId;

    use super::{
        is_access_point_report, ChatMessage, ConversationOrchestrator, RequestContext, UserQuery,
    };
    use crate::llm::{FunctionCallIntent, LlmClient, LlmError, ModelResponse};
    use crate::retrieval::{
        ApiDocSnippet, ContextRetriever, DomainSnippet, EventSnippet, LobSnippet, RetrievalError,
    };

    struct ScriptedLlm {
        responses: Mutex<Vec<ModelResponse>>,
        calls: Mutex<Vec<(Vec<ChatMessage>, bool)>>,
    }

    impl ScriptedLlm {
        fn new(responses: Vec<ModelResponse>) -> Self {
            Self { responses: Mutex::new(responses), calls: Mutex::new(Vec::new()) }
        }

        fn recorded_calls(&self) -> Vec<(Vec<ChatMessage>, bool)> {
            self.calls.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn chat(
            &self,
            messages: &[ChatMessage],
            functions: Option<&[Value]>,
        ) -> Result<ModelResponse, LlmError> {
            self.calls
                .lock()
                .expect("lock")
                .push((messages.to_vec(), functions.is_some()));
            let mut responses = self.responses.lock().expect("lock");
            if responses.is_empty() {
                return Err(LlmError::Transport("script exhausted".to_string()));
            }
            Ok(responses.remove(0))
        }
    }

    #[derive(Default)]
    struct RecordingRetriever {
        methods: Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl ContextRetriever for RecordingRetriever {
        async fn retrieve_event_info(
            &self,
            _query: &str,
        ) -> Result<Vec<EventSnippet>, RetrievalError> {
            self.methods.lock().expect("lock").push("event");
            Ok(Vec::new())
        }

        async fn retrieve_lob_info(&self, _query: &str) -> Result<Vec<LobSnippet>, RetrievalError> {
            self.methods.lock().expect("lock").push("lob");
            Ok(Vec::new())
        }

        async fn retrieve_domain_info(
            &self,
            _query: &str,
        ) -> Result<Vec<DomainSnippet>, RetrievalError> {
            self.methods.lock().expect("lock").push("domain");
            Ok(Vec::new())
        }

        async fn retrieve_api_docs(
            &self,
            _query: &str,
            _platform_names: &[String],
        ) -> Result<Vec<ApiDocSnippet>, RetrievalError> {
            self.methods.lock().expect("lock").push("api_docs");
            Ok(Vec::new())
        }
    }

    #[derive(Default)]
    struct RecordingDispatcher {
        requests: Mutex<Vec<DispatchRequest>>,
        payload: Option<Value>,
    }

    #[async_trait]
    impl FunctionDispatch for RecordingDispatcher {
        async fn dispatch(&self, request: DispatchRequest) -> DispatchResult {
            self.requests.lock().expect("lock").push(request.clone());
            DispatchResult::success(
                request.function_name,
                request.arguments,
                self.payload.clone().unwrap_or_else(|| json!([{"serial": "Q2SW-0001"}])),
            )
        }
    }

    fn test_registry() -> Arc<FunctionRegistry> {
        let spec = FunctionSpec {
            name: "list_all_switches_in_org".to_string(),
            description: "List switches".to_string(),
            platform: PlatformId::Meraki,
            binding: RestBinding { method: RestMethod::Get, path: "/devices".to_string() },
            parameters: vec![ParamSpec {
                name: "organization_id".to_string(),
                kind: ParamKind::String,
                description: "org".to_string(),
            }],
            required: Vec::new(),
            binary_payload: false,
        };
        Arc::new(FunctionRegistry::from_specs(vec![spec]).expect("registry builds"))
    }

    fn orchestrator(
        llm: Arc<ScriptedLlm>,
        retriever: Arc<RecordingRetriever>,
        dispatcher: Arc<RecordingDispatcher>,
    ) -> ConversationOrchestrator {
        ConversationOrchestrator::new(
            IntentClassifier::new("general", false),
            PlatformGate::all_enabled(),
            test_registry(),
            llm,
            retriever,
            dispatcher,
        )
    }

    fn ctx() -> RequestContext {
        RequestContext { correlation_id: "test-corr".to_string() }
    }

    #[tokio::test]
    async fn direct_answer_skips_dispatch_and_second_call() {
        let llm = Arc::new(ScriptedLlm::new(vec![ModelResponse {
            content: Some("The uplink is healthy.".to_string()),
            function_call: None,
        }]));
        let retriever = Arc::new(RecordingRetriever::default());
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let orchestrator = orchestrator(llm.clone(), retriever, dispatcher.clone());

        let response = orchestrator
            .run(
                &UserQuery { message: "is the uplink ok".to_string(), domain_hint: None },
                &ctx(),
            )
            .await
            .expect("run succeeds");

        assert_eq!(response.role, "assistant");
        assert_eq!(response.response, "The uplink is healthy.");
        assert!(dispatcher.requests.lock().expect("lock").is_empty());
        assert_eq!(llm.recorded_calls().len(), 1);
    }

    #[tokio::test]
    async fn function_call_flows_through_dispatch_into_phase_two() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            ModelResponse {
                content: None,
                function_call: Some(FunctionCallIntent {
                    name: "list_all_switches_in_org".to_string(),
                    arguments_json: "{\"organization_id\": \"123\"}".to_string(),
                }),
            },
            ModelResponse {
                content: Some("<table>...</table>".to_string()),
                function_call: None,
            },
        ]));
        let retriever = Arc::new(RecordingRetriever::default());
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let orchestrator = orchestrator(llm.clone(), retriever, dispatcher.clone());

        let response = orchestrator
            .run(
                &UserQuery { message: "list all meraki switches".to_string(), domain_hint: None },
                &ctx(),
            )
            .await
            .expect("run succeeds");

        assert_eq!(response.response, "<table>...</table>");

        let requests = dispatcher.requests.lock().expect("lock");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].function_name, "list_all_switches_in_org");
        assert_eq!(requests[0].arguments["organization_id"], "123");

        let calls = llm.recorded_calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].1, "phase 1 carries the function catalog");
        assert!(!calls[1].1, "phase 2 carries no catalog");
        assert!(calls[1].0[0].content.contains("Render the following function result"));
    }

    #[tokio::test]
    async fn malformed_argument_json_recovers_to_empty_map() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            ModelResponse {
                content: None,
                function_call: Some(FunctionCallIntent {
                    name: "list_all_switches_in_org".to_string(),
                    arguments_json: "{not json".to_string(),
                }),
            },
            ModelResponse { content: Some("done".to_string()), function_call: None },
        ]));
        let retriever = Arc::new(RecordingRetriever::default());
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let orchestrator = orchestrator(llm, retriever, dispatcher.clone());

        orchestrator
            .run(&UserQuery { message: "switches".to_string(), domain_hint: None }, &ctx())
            .await
            .expect("lenient recovery keeps the run alive");

        let requests = dispatcher.requests.lock().expect("lock");
        assert!(requests[0].arguments.is_empty());
    }

    #[tokio::test]
    async fn access_point_reports_use_the_specialized_formatting_prompt() {
        let payload = json!({
            "message": "2 access points found",
            "access_points": [
                {"ap_name": "AP-Lobby", "mac_address": "aa:bb"},
                {"ap_name": "AP-Cafe", "mac_address": "cc:dd"}
            ]
        });
        let llm = Arc::new(ScriptedLlm::new(vec![
            ModelResponse {
                content: None,
                function_call: Some(FunctionCallIntent {
                    name: "list_all_switches_in_org".to_string(),
                    arguments_json: "{}".to_string(),
                }),
            },
            ModelResponse { content: Some("formatted".to_string()), function_call: None },
        ]));
        let retriever = Arc::new(RecordingRetriever::default());
        let dispatcher =
            Arc::new(RecordingDispatcher { requests: Mutex::new(Vec::new()), payload: Some(payload) });
        let orchestrator = orchestrator(llm.clone(), retriever, dispatcher);

        orchestrator
            .run(&UserQuery { message: "access points".to_string(), domain_hint: None }, &ctx())
            .await
            .expect("run succeeds");

        let calls = llm.recorded_calls();
        assert!(calls[1].0[0].content.contains("wireless access-point report"));
    }

    #[tokio::test]
    async fn event_messages_route_to_event_retrieval() {
        let llm = Arc::new(ScriptedLlm::new(vec![ModelResponse {
            content: Some("keynote at 9".to_string()),
            function_call: None,
        }]));
        let retriever = Arc::new(RecordingRetriever::default());
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let orchestrator = orchestrator(llm, retriever.clone(), dispatcher);

        let response = orchestrator
            .run(
                &UserQuery { message: "what events are today".to_string(), domain_hint: None },
                &ctx(),
            )
            .await
            .expect("run succeeds");

        assert_eq!(response.label, "event");
        assert_eq!(*retriever.methods.lock().expect("lock"), vec!["event"]);
    }

    #[tokio::test]
    async fn fallback_with_platform_mention_routes_to_api_docs() {
        let llm = Arc::new(ScriptedLlm::new(vec![ModelResponse {
            content: Some("see docs".to_string()),
            function_call: None,
        }]));
        let retriever = Arc::new(RecordingRetriever::default());
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let orchestrator = orchestrator(llm, retriever.clone(), dispatcher);

        orchestrator
            .run(
                &UserQuery {
                    message: "how does the meraki api paginate".to_string(),
                    domain_hint: None,
                },
                &ctx(),
            )
            .await
            .expect("run succeeds");

        assert_eq!(*retriever.methods.lock().expect("lock"), vec!["api_docs"]);
    }

    #[tokio::test]
    async fn model_transport_failure_aborts_the_request() {
        let llm = Arc::new(ScriptedLlm::new(Vec::new()));
        let retriever = Arc::new(RecordingRetriever::default());
        let dispatcher = Arc::new(RecordingDispatcher::default());
        let orchestrator = orchestrator(llm, retriever, dispatcher);

        let error = orchestrator
            .run(&UserQuery { message: "hello".to_string(), domain_hint: None }, &ctx())
            .await
            .expect_err("transport failure must abort");
        assert!(error.to_string().contains("model transport failure"));
    }

    #[test]
    fn access_point_detection_requires_message_and_entry_list() {
        assert!(is_access_point_report(&json!({
            "message": "found",
            "items": [{"ap_name": "AP-1"}]
        })));
        assert!(!is_access_point_report(&json!({
            "items": [{"ap_name": "AP-1"}]
        })));
        assert!(!is_access_point_report(&json!({
            "message": "found",
            "items": [{"serial": "Q2SW-1"}]
        })));
        assert!(!is_access_point_report(&json!([{"ap_name": "AP-1"}])));
    }
}

//! The inbound chat boundary.
//!
//! `POST /api/v1/chat` accepts `{message, domain_hint?}` and returns
//! `{role, label, response}`. The backend facade, dispatcher, and
//! orchestrator are constructed fresh per request; only the registry, the
//! warning table, and the gate are shared process-wide. A model-transport
//! failure maps to a fixed generic apology with a 500 status; a dispatch
//! failure still produces a normal-looking answer.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use switchboard_agent::llm::LlmClient;
use switchboard_agent::orchestrator::{
    ConversationOrchestrator, RequestContext, UserQuery,
};
use switchboard_agent::retrieval::ContextRetriever;
use switchboard_core::classify::IntentClassifier;
use switchboard_core::config::{ChatConfig, PlatformsConfig};
use switchboard_core::errors::ApplicationError;
use switchboard_core::platform::PlatformGate;
use switchboard_core::registry::FunctionRegistry;
use switchboard_platforms::{BackendFacade, BackendInvoker, Dispatcher};

#[derive(Clone)]
pub struct ChatState {
    pub registry: Arc<FunctionRegistry>,
    pub warnings: Arc<HashMap<String, String>>,
    pub gate: PlatformGate,
    pub platforms: PlatformsConfig,
    pub chat: ChatConfig,
    pub llm: Arc<dyn LlmClient>,
    pub retriever: Arc<dyn ContextRetriever>,
    /// Test seam: replaces the per-request facade with a fixed backend.
    pub backend_override: Option<Arc<dyn BackendInvoker>>,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequestBody {
    pub message: String,
    #[serde(default)]
    pub domain_hint: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatErrorBody {
    pub error: String,
    pub correlation_id: String,
}

pub fn router(state: ChatState) -> Router {
    Router::new().route("/api/v1/chat", post(chat)).with_state(state)
}

pub async fn chat(
    State(state): State<ChatState>,
    Json(body): Json<ChatRequestBody>,
) -> Response {
    let correlation_id = Uuid::new_v4().to_string();

    if body.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ChatErrorBody {
                error: "The request could not be processed. Check the message and try again."
                    .to_string(),
                correlation_id,
            }),
        )
            .into_response();
    }

    info!(
        event_name = "chat.request.received",
        correlation_id = %correlation_id,
        "chat request received"
    );

    // Fresh facade per request: credentials are never cached across
    // requests, and only the platform a resolved call needs gets built.
    let backend: Arc<dyn BackendInvoker> = match &state.backend_override {
        Some(backend) => backend.clone(),
        None => Arc::new(BackendFacade::new(state.gate, state.platforms.clone())),
    };
    let dispatcher =
        Arc::new(Dispatcher::new(state.registry.clone(), state.warnings.clone(), backend));

    let orchestrator = ConversationOrchestrator::new(
        IntentClassifier::new(state.chat.default_domain.clone(), state.chat.in_domain_only),
        state.gate,
        state.registry.clone(),
        state.llm.clone(),
        state.retriever.clone(),
        dispatcher,
    );

    let query = UserQuery { message: body.message, domain_hint: body.domain_hint };
    let ctx = RequestContext { correlation_id: correlation_id.clone() };

    match orchestrator.run(&query, &ctx).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(err) => {
            error!(
                event_name = "chat.request.failed",
                correlation_id = %correlation_id,
                error = %err,
                "chat request aborted"
            );
            let interface = ApplicationError::ModelTransport(err.to_string())
                .into_interface(correlation_id.clone());
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatErrorBody {
                    error: interface.user_message().to_string(),
                    correlation_id,
                }),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use switchboard_agent::llm::{
        ChatMessage, FunctionCallIntent, LlmClient, LlmError, ModelResponse,
    };
    use switchboard_agent::retrieval::StaticRetriever;
    use switchboard_core::catalog::{build_registry, standing_warnings};
    use switchboard_core::config::{AppConfig, ChatConfig};
    use switchboard_core::envelope::ArgumentMap;
    use switchboard_core::platform::PlatformGate;
    use switchboard_core::registry::FunctionSpec;
    use switchboard_platforms::{BackendInvoker, PlatformError, PlatformPayload};

    use super::{router, ChatState};

    struct ScriptedLlm {
        responses: Mutex<Vec<ModelResponse>>,
        calls: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedLlm {
        fn new(responses: Vec<ModelResponse>) -> Self {
            Self { responses: Mutex::new(responses), calls: Mutex::new(Vec::new()) }
        }

        fn recorded_calls(&self) -> Vec<Vec<ChatMessage>> {
            self.calls.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn chat(
            &self,
            messages: &[ChatMessage],
            _functions: Option<&[Value]>,
        ) -> Result<ModelResponse, LlmError> {
            self.calls.lock().expect("lock").push(messages.to_vec());
            let mut responses = self.responses.lock().expect("lock");
            if responses.is_empty() {
                return Err(LlmError::Transport("connection refused".to_string()));
            }
            Ok(responses.remove(0))
        }
    }

    struct StubBackend {
        payload: Value,
    }

    #[async_trait]
    impl BackendInvoker for StubBackend {
        async fn invoke(
            &self,
            _spec: &FunctionSpec,
            _args: &ArgumentMap,
        ) -> Result<PlatformPayload, PlatformError> {
            Ok(PlatformPayload::Json(self.payload.clone()))
        }
    }

    fn switch_call() -> ModelResponse {
        ModelResponse {
            content: None,
            function_call: Some(FunctionCallIntent {
                name: "list_all_switches_in_org".to_string(),
                arguments_json: "{}".to_string(),
            }),
        }
    }

    fn text(content: &str) -> ModelResponse {
        ModelResponse { content: Some(content.to_string()), function_call: None }
    }

    fn test_router(
        llm: Arc<ScriptedLlm>,
        gate: PlatformGate,
        backend_override: Option<Arc<dyn BackendInvoker>>,
        default_domain: &str,
    ) -> Router {
        router(ChatState {
            registry: Arc::new(build_registry().expect("catalog builds")),
            warnings: Arc::new(standing_warnings()),
            gate,
            platforms: AppConfig::default().platforms,
            chat: ChatConfig {
                default_domain: default_domain.to_string(),
                in_domain_only: false,
            },
            llm,
            retriever: Arc::new(StaticRetriever::default()),
            backend_override,
        })
    }

    async fn post_chat(router: Router, body: Value) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/chat")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn switch_listing_round_trips_through_dispatch_and_formatting() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            switch_call(),
            text("Your organization has one switch: Q2SW-0001."),
        ]));
        let gate = PlatformGate::new(false, false, true, false);
        let backend: Arc<dyn BackendInvoker> =
            Arc::new(StubBackend { payload: json!([{"serial": "Q2SW-0001"}]) });
        let router = test_router(llm.clone(), gate, Some(backend), "general");

        let (status, body) = post_chat(
            router,
            json!({"message": "list all meraki switches", "domain_hint": ""}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "assistant");
        assert!(!body["response"].as_str().expect("text").is_empty());

        let calls = llm.recorded_calls();
        assert_eq!(calls.len(), 2, "both conversation phases ran");
        assert!(calls[1][1].content.contains("Q2SW-0001"), "phase 2 saw the payload");
    }

    #[tokio::test]
    async fn disabled_platform_still_yields_a_chat_response() {
        let llm = Arc::new(ScriptedLlm::new(vec![
            switch_call(),
            text("The Meraki integration is currently unavailable."),
        ]));
        let router = test_router(llm.clone(), PlatformGate::all_disabled(), None, "general");

        let (status, body) = post_chat(
            router,
            json!({"message": "list all meraki switches", "domain_hint": ""}),
        )
        .await;

        assert_eq!(status, StatusCode::OK, "a dispatch failure is not an HTTP error");
        assert!(!body["response"].as_str().expect("text").is_empty());

        let calls = llm.recorded_calls();
        assert!(
            calls[1][1].content.contains("integration is disabled"),
            "phase 2 saw the failure envelope"
        );
    }

    #[tokio::test]
    async fn lob_question_can_resolve_without_any_function_call() {
        let llm = Arc::new(ScriptedLlm::new(vec![text(
            "Crop rotation keeps soil nutrients balanced across seasons.",
        )]));
        let router = test_router(
            llm.clone(),
            PlatformGate::all_enabled(),
            None,
            "lob-agriculture",
        );

        let (status, body) = post_chat(
            router,
            json!({"message": "tell me about crop rotation in agriculture", "domain_hint": ""}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["label"], "lob-agriculture");
        assert_eq!(
            body["response"],
            "Crop rotation keeps soil nutrients balanced across seasons."
        );
        assert_eq!(llm.recorded_calls().len(), 1, "no second phase without a dispatch");
    }

    #[tokio::test]
    async fn model_transport_failure_maps_to_a_generic_apology() {
        let llm = Arc::new(ScriptedLlm::new(Vec::new()));
        let router = test_router(llm, PlatformGate::all_enabled(), None, "general");

        let (status, body) =
            post_chat(router, json!({"message": "hello", "domain_hint": ""})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().expect("text").contains("Something went wrong"));
    }

    #[tokio::test]
    async fn blank_messages_are_rejected_up_front() {
        let llm = Arc::new(ScriptedLlm::new(Vec::new()));
        let router = test_router(llm.clone(), PlatformGate::all_enabled(), None, "general");

        let (status, _) = post_chat(router, json!({"message": "   "})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(llm.recorded_calls().is_empty(), "no model call for an empty message");
    }
}

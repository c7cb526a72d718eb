//! Function-call dispatch.
//!
//! Five steps, in order: registry resolution, required-argument validation,
//! standing-warning lookup, invocation through the backend facade, and
//! binary-payload normalization. Every step that goes wrong produces a
//! `Failure` envelope; the dispatcher never propagates an error to its
//! caller.
//!
//! Each attempt is logged with its verbatim argument values. There is no
//! redaction policy yet; some operations carry credential-like strings, so
//! clarify requirements before exposing these logs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use switchboard_core::envelope::{
    binary_surrogate, ArgumentMap, DispatchRequest, DispatchResult, FunctionDispatch,
};
use switchboard_core::registry::{FunctionRegistry, FunctionSpec};

use crate::facade::BackendInvoker;
use crate::http::PlatformPayload;

/// How unknown argument keys are treated. Permissive forwards them to the
/// adapter untouched (the observed, default behavior); strict rejects the
/// call before any network I/O.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ArgumentPolicy {
    #[default]
    Permissive,
    Strict,
}

pub struct Dispatcher {
    registry: Arc<FunctionRegistry>,
    warnings: Arc<HashMap<String, String>>,
    backend: Arc<dyn BackendInvoker>,
    policy: ArgumentPolicy,
}

impl Dispatcher {
    pub fn new(
        registry: Arc<FunctionRegistry>,
        warnings: Arc<HashMap<String, String>>,
        backend: Arc<dyn BackendInvoker>,
    ) -> Self {
        Self { registry, warnings, backend, policy: ArgumentPolicy::default() }
    }

    pub fn with_policy(mut self, policy: ArgumentPolicy) -> Self {
        self.policy = policy;
        self
    }

    async fn invoke(&self, spec: &FunctionSpec, request: &DispatchRequest) -> DispatchResult {
        match self.backend.invoke(spec, &request.arguments).await {
            Ok(PlatformPayload::Json(payload)) => DispatchResult::success(
                request.function_name.clone(),
                request.arguments.clone(),
                payload,
            ),
            Ok(PlatformPayload::Binary(bytes)) => {
                self.normalize_binary(request, bytes).await
            }
            Err(error) => DispatchResult::failure(
                request.function_name.clone(),
                request.arguments.clone(),
                error.to_string(),
            ),
        }
    }

    /// Raw bytes never enter the envelope. Saving to a local path is the
    /// one sanctioned side channel; the envelope carries the byte-count
    /// surrogate either way.
    async fn normalize_binary(&self, request: &DispatchRequest, bytes: Vec<u8>) -> DispatchResult {
        let save_path = request.arguments.get("save_path").and_then(Value::as_str);

        if let Some(path) = save_path {
            if let Err(error) = tokio::fs::write(path, &bytes).await {
                warn!(
                    event_name = "dispatch.binary.save_failed",
                    function = %request.function_name,
                    path = %path,
                    error = %error,
                    "binary payload could not be saved"
                );
                return DispatchResult::failure(
                    request.function_name.clone(),
                    request.arguments.clone(),
                    format!("failed to save binary payload to `{path}`: {error}"),
                );
            }
        }

        DispatchResult::success(
            request.function_name.clone(),
            request.arguments.clone(),
            binary_surrogate(bytes.len(), save_path),
        )
    }
}

#[async_trait]
impl FunctionDispatch for Dispatcher {
    async fn dispatch(&self, request: DispatchRequest) -> DispatchResult {
        // Argument values are logged verbatim; see the module note.
        let arguments_json = Value::Object(request.arguments.clone());
        info!(
            event_name = "dispatch.attempt",
            function = %request.function_name,
            arguments = %arguments_json,
            "dispatching function call"
        );

        let warning = self.warnings.get(&request.function_name).cloned();

        let Some(spec) = self.registry.lookup(&request.function_name) else {
            return DispatchResult::failure(
                request.function_name.clone(),
                request.arguments,
                format!("Function '{}' not implemented yet.", request.function_name),
            )
            .with_warning(warning);
        };

        for required in &spec.required {
            if !request.arguments.contains_key(required) {
                return DispatchResult::failure(
                    request.function_name.clone(),
                    request.arguments,
                    format!(
                        "Missing required argument `{required}` for function '{}'.",
                        request.function_name
                    ),
                )
                .with_warning(warning);
            }
        }

        if self.policy == ArgumentPolicy::Strict {
            if let Some(unknown) =
                request.arguments.keys().find(|name| !spec.has_parameter(name.as_str()))
            {
                return DispatchResult::failure(
                    request.function_name.clone(),
                    request.arguments.clone(),
                    format!(
                        "Unknown argument `{unknown}` for function '{}'.",
                        request.function_name
                    ),
                )
                .with_warning(warning);
            }
        }

        self.invoke(spec, &request).await.with_warning(warning)
    }
}

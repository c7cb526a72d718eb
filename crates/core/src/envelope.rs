//! Dispatch envelopes.
//!
//! The dispatcher is total: every `(function_name, arguments)` pair yields a
//! [`DispatchResult`], never an error. Failures are data so the phase-2
//! formatting call can still explain them to the user in prose.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

pub type ArgumentMap = Map<String, Value>;

/// One model-initiated function call. Scoped to a single request, never
/// persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchRequest {
    pub function_name: String,
    pub arguments: ArgumentMap,
}

impl DispatchRequest {
    pub fn new(function_name: impl Into<String>, arguments: ArgumentMap) -> Self {
        Self { function_name: function_name.into(), arguments }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchOutcome {
    Success { payload: Value },
    Failure { error_message: String },
}

/// The normalized envelope returned by dispatch regardless of outcome:
/// `{function, arguments, result|error, warning?}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DispatchResult {
    pub function_name: String,
    pub arguments: ArgumentMap,
    #[serde(flatten)]
    pub outcome: DispatchOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl DispatchResult {
    pub fn success(function_name: impl Into<String>, arguments: ArgumentMap, payload: Value) -> Self {
        Self {
            function_name: function_name.into(),
            arguments,
            outcome: DispatchOutcome::Success { payload },
            warning: None,
        }
    }

    pub fn failure(
        function_name: impl Into<String>,
        arguments: ArgumentMap,
        error_message: impl Into<String>,
    ) -> Self {
        Self {
            function_name: function_name.into(),
            arguments,
            outcome: DispatchOutcome::Failure { error_message: error_message.into() },
            warning: None,
        }
    }

    pub fn with_warning(mut self, warning: Option<String>) -> Self {
        self.warning = warning;
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, DispatchOutcome::Success { .. })
    }

    pub fn payload(&self) -> Option<&Value> {
        match &self.outcome {
            DispatchOutcome::Success { payload } => Some(payload),
            DispatchOutcome::Failure { .. } => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            DispatchOutcome::Failure { error_message } => Some(error_message),
            DispatchOutcome::Success { .. } => None,
        }
    }

    /// The envelope as a JSON value, as handed to the phase-2 formatting
    /// call.
    pub fn to_model_payload(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|_| {
            Value::String("dispatch envelope could not be serialized".to_string())
        })
    }
}

/// The dispatch seam. The orchestrator only depends on this; the concrete
/// implementation lives with the platform adapters.
#[async_trait]
pub trait FunctionDispatch: Send + Sync {
    async fn dispatch(&self, request: DispatchRequest) -> DispatchResult;
}

/// Textual surrogate for a binary payload. Raw bytes are never embedded in
/// the envelope; saving to local disk is the one sanctioned side channel.
pub fn binary_surrogate(byte_count: usize, saved_to: Option<&str>) -> Value {
    let text = match saved_to {
        Some(path) => format!("<binary payload: {byte_count} bytes, saved to {path}>"),
        None => format!("<binary payload: {byte_count} bytes>"),
    };
    Value::String(text)
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map};

    use super::{binary_surrogate, DispatchResult};

    #[test]
    fn success_envelope_serializes_with_payload_and_without_warning() {
        let result = DispatchResult::success("get_network", Map::new(), json!([{"id": "N_1"}]));
        let value = result.to_model_payload();

        assert_eq!(value["function_name"], "get_network");
        assert_eq!(value["success"]["payload"][0]["id"], "N_1");
        assert!(value.get("warning").is_none());
    }

    #[test]
    fn failure_envelope_keeps_arguments_and_warning() {
        let mut arguments = Map::new();
        arguments.insert("serial".to_string(), json!("Q2XX-1"));
        let result = DispatchResult::failure("get_device", arguments, "upstream timed out")
            .with_warning(Some("advisory".to_string()));

        assert!(!result.is_success());
        assert_eq!(result.error_message(), Some("upstream timed out"));
        let value = result.to_model_payload();
        assert_eq!(value["failure"]["error_message"], "upstream timed out");
        assert_eq!(value["arguments"]["serial"], "Q2XX-1");
        assert_eq!(value["warning"], "advisory");
    }

    #[test]
    fn binary_surrogate_states_the_byte_length() {
        assert_eq!(
            binary_surrogate(245_760, None),
            json!("<binary payload: 245760 bytes>")
        );
        assert_eq!(
            binary_surrogate(12, Some("/tmp/floor.png")),
            json!("<binary payload: 12 bytes, saved to /tmp/floor.png>")
        );
    }
}

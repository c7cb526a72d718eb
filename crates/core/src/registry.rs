use std::collections::HashMap;

use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::platform::PlatformId;

/// JSON-value granularity accepted for operation parameters. The catalog has
/// no nested-object parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Number,
    Boolean,
}

impl ParamKind {
    pub fn json_type(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub kind: ParamKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestMethod {
    Get,
    Post,
}

impl RestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// How an operation maps onto its platform's REST surface. `{name}` segments
/// in the path are filled from the argument map; leftover scalar arguments
/// become query parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RestBinding {
    pub method: RestMethod,
    pub path: String,
}

/// One callable operation: what the model sees (name, description, parameter
/// schema) plus what dispatch needs (owning platform, REST binding, whether
/// the payload is binary).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    pub platform: PlatformId,
    pub binding: RestBinding,
    pub parameters: Vec<ParamSpec>,
    pub required: Vec<String>,
    pub binary_payload: bool,
}

impl FunctionSpec {
    /// JSON-Schema-like `parameters` object in the shape the model expects:
    /// `{"type": "object", "properties": {...}, "required": [...]}`.
    pub fn parameters_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.parameters {
            properties.insert(
                param.name.clone(),
                json!({ "type": param.kind.json_type(), "description": param.description }),
            );
        }
        json!({ "type": "object", "properties": properties, "required": self.required })
    }

    /// Full model-facing projection of this spec.
    pub fn model_projection(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "parameters": self.parameters_schema(),
        })
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.iter().any(|param| param.name == name)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate function name `{0}` in registry")]
    DuplicateName(String),
    #[error("function `{function}` requires parameter `{param}` that is not declared in its properties")]
    UnknownRequiredParam { function: String, param: String },
}

/// Immutable, process-wide catalog of callable operations. Built and
/// validated once at startup; duplicate names or a `required` entry missing
/// from the declared parameters are fatal construction errors. Lookup is
/// O(1) by name; insertion order is preserved for presentation to the model.
#[derive(Clone, Debug, Default)]
pub struct FunctionRegistry {
    specs: Vec<FunctionSpec>,
    by_name: HashMap<String, usize>,
}

impl FunctionRegistry {
    pub fn from_specs(specs: Vec<FunctionSpec>) -> Result<Self, RegistryError> {
        let mut by_name = HashMap::with_capacity(specs.len());
        for (index, spec) in specs.iter().enumerate() {
            if by_name.insert(spec.name.clone(), index).is_some() {
                return Err(RegistryError::DuplicateName(spec.name.clone()));
            }
            for required in &spec.required {
                if !spec.has_parameter(required) {
                    return Err(RegistryError::UnknownRequiredParam {
                        function: spec.name.clone(),
                        param: required.clone(),
                    });
                }
            }
        }
        Ok(Self { specs, by_name })
    }

    pub fn lookup(&self, name: &str) -> Option<&FunctionSpec> {
        self.by_name.get(name).map(|index| &self.specs[*index])
    }

    pub fn all(&self) -> &[FunctionSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// The full catalog in the model-facing shape, in insertion order.
    pub fn model_catalog(&self) -> Vec<Value> {
        self.specs.iter().map(FunctionSpec::model_projection).collect()
    }
}

//! Cloud-network platform adapter.
//!
//! Auth is a per-request API-key header. Organization-scoped operations may
//! omit `organization_id`; the configured default organization fills it.

use secrecy::SecretString;
use serde_json::Value;

use switchboard_core::config::MerakiConfig;
use switchboard_core::envelope::ArgumentMap;
use switchboard_core::platform::PlatformId;
use switchboard_core::registry::FunctionSpec;

use crate::http::{AuthHeader, PlatformError, PlatformPayload, RestInvoker};

pub struct MerakiClient {
    invoker: RestInvoker,
    default_organization_id: Option<String>,
}

impl MerakiClient {
    pub fn new(config: &MerakiConfig) -> Self {
        let api_key =
            config.api_key.clone().unwrap_or_else(|| SecretString::from(String::new()));
        Self {
            invoker: RestInvoker::new(
                PlatformId::Meraki,
                &config.base_url,
                AuthHeader::Named { name: "X-Cisco-Meraki-API-Key", value: api_key },
            ),
            default_organization_id: config.organization_id.clone(),
        }
    }

    pub async fn invoke(
        &self,
        spec: &FunctionSpec,
        args: &ArgumentMap,
    ) -> Result<PlatformPayload, PlatformError> {
        let args = with_default_organization(
            &spec.binding.path,
            args,
            self.default_organization_id.as_deref(),
        );
        self.invoker.invoke(&spec.binding, &args).await
    }
}

fn with_default_organization(
    path: &str,
    args: &ArgumentMap,
    default_organization_id: Option<&str>,
) -> ArgumentMap {
    let mut args = args.clone();
    if path.contains("{organization_id}") && !args.contains_key("organization_id") {
        if let Some(organization_id) = default_organization_id {
            args.insert("organization_id".to_string(), Value::String(organization_id.to_string()));
        }
    }
    args
}

//! Meetings platform adapter. Auth is a bearer token.

use secrecy::SecretString;

use switchboard_core::config::WebexConfig;
use switchboard_core::envelope::ArgumentMap;
use switchboard_core::platform::PlatformId;
use switchboard_core::registry::FunctionSpec;

use crate::http::{AuthHeader, PlatformError, PlatformPayload, RestInvoker};

pub struct WebexClient {
    invoker: RestInvoker,
}

impl WebexClient {
    pub fn new(config: &WebexConfig) -> Self {
        let token = config.token.clone().unwrap_or_else(|| SecretString::from(String::new()));
        Self {
            invoker: RestInvoker::new(
                PlatformId::Webex,
                &config.base_url,
                AuthHeader::Bearer(token),
            ),
        }
    }

    pub async fn invoke(
        &self,
        spec: &FunctionSpec,
        args: &ArgumentMap,
    ) -> Result<PlatformPayload, PlatformError> {
        self.invoker.invoke(&spec.binding, args).await
    }
}

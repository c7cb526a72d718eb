//! Location-service adapter. Auth is a bearer API key; floor images and
//! history exports come back as binary payloads.

use secrecy::SecretString;

use switchboard_core::config::SpacesConfig;
use switchboard_core::envelope::ArgumentMap;
use switchboard_core::platform::PlatformId;
use switchboard_core::registry::FunctionSpec;

use crate::http::{AuthHeader, PlatformError, PlatformPayload, RestInvoker};

pub struct SpacesClient {
    invoker: RestInvoker,
}

impl SpacesClient {
    pub fn new(config: &SpacesConfig) -> Self {
        let api_key =
            config.api_key.clone().unwrap_or_else(|| SecretString::from(String::new()));
        Self {
            invoker: RestInvoker::new(
                PlatformId::Spaces,
                &config.base_url,
                AuthHeader::Bearer(api_key),
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

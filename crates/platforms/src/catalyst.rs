//! SDN/fabric controller adapter. Auth is the controller's token header.

use secrecy::SecretString;

use switchboard_core::config::CatalystConfig;
use switchboard_core::envelope::ArgumentMap;
use switchboard_core::platform::PlatformId;
use switchboard_core::registry::FunctionSpec;

use crate::http::{AuthHeader, PlatformError, PlatformPayload, RestInvoker};

pub struct CatalystClient {
    invoker: RestInvoker,
}

impl CatalystClient {
    pub fn new(config: &CatalystConfig) -> Self {
        let token = config.token.clone().unwrap_or_else(|| SecretString::from(String::new()));
        Self {
            invoker: RestInvoker::new(
                PlatformId::Catalyst,
                &config.base_url,
                AuthHeader::Named { name: "X-Auth-Token", value: token },
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

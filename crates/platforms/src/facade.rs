//! Per-request backend facade.
//!
//! Built fresh for every inbound request from the platform gate and the
//! process configuration; credentials are never cached across requests.
//! Adapters are constructed lazily: only the platform a resolved operation
//! belongs to is ever instantiated, and a disabled platform's adapter never
//! exists at all.

use std::sync::OnceLock;

use async_trait::async_trait;

use switchboard_core::config::PlatformsConfig;
use switchboard_core::envelope::ArgumentMap;
use switchboard_core::platform::{PlatformGate, PlatformId};
use switchboard_core::registry::FunctionSpec;

use crate::catalyst::CatalystClient;
use crate::http::{PlatformError, PlatformPayload};
use crate::meraki::MerakiClient;
use crate::spaces::SpacesClient;
use crate::webex::WebexClient;

/// The invocation seam between the dispatcher and the platform adapters.
#[async_trait]
pub trait BackendInvoker: Send + Sync {
    async fn invoke(
        &self,
        spec: &FunctionSpec,
        args: &ArgumentMap,
    ) -> Result<PlatformPayload, PlatformError>;
}

pub struct BackendFacade {
    gate: PlatformGate,
    config: PlatformsConfig,
    spaces: OnceLock<SpacesClient>,
    catalyst: OnceLock<CatalystClient>,
    meraki: OnceLock<MerakiClient>,
    webex: OnceLock<WebexClient>,
}

impl BackendFacade {
    pub fn new(gate: PlatformGate, config: PlatformsConfig) -> Self {
        Self {
            gate,
            config,
            spaces: OnceLock::new(),
            catalyst: OnceLock::new(),
            meraki: OnceLock::new(),
            webex: OnceLock::new(),
        }
    }

    #[cfg(test)]
    fn adapter_constructed(&self, platform: PlatformId) -> bool {
        match platform {
            PlatformId::Spaces => self.spaces.get().is_some(),
            PlatformId::Catalyst => self.catalyst.get().is_some(),
            PlatformId::Meraki => self.meraki.get().is_some(),
            PlatformId::Webex => self.webex.get().is_some(),
        }
    }
}

#[async_trait]
impl BackendInvoker for BackendFacade {
    async fn invoke(
        &self,
        spec: &FunctionSpec,
        args: &ArgumentMap,
    ) -> Result<PlatformPayload, PlatformError> {
        if !self.gate.is_enabled(spec.platform) {
            return Err(PlatformError::Disabled(spec.platform));
        }

        match spec.platform {
            PlatformId::Spaces => {
                self.spaces
                    .get_or_init(|| SpacesClient::new(&self.config.spaces))
                    .invoke(spec, args)
                    .await
            }
            PlatformId::Catalyst => {
                self.catalyst
                    .get_or_init(|| CatalystClient::new(&self.config.catalyst))
                    .invoke(spec, args)
                    .await
            }
            PlatformId::Meraki => {
                self.meraki
                    .get_or_init(|| MerakiClient::new(&self.config.meraki))
                    .invoke(spec, args)
                    .await
            }
            PlatformId::Webex => {
                self.webex
                    .get_or_init(|| WebexClient::new(&self.config.webex))
                    .invoke(spec, args)
                    .await
            }
        }
    }
}

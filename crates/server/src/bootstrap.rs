use std::collections::HashMap;
use std::sync::Arc;

use switchboard_core::catalog::{build_registry, standing_warnings};
use switchboard_core::config::{AppConfig, ConfigError, LoadOptions};
use switchboard_core::platform::PlatformGate;
use switchboard_core::registry::{FunctionRegistry, RegistryError};
use thiserror::Error;
use tracing::info;

pub struct Application {
    pub config: AppConfig,
    pub registry: Arc<FunctionRegistry>,
    pub warnings: Arc<HashMap<String, String>>,
    pub gate: PlatformGate,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("function registry validation failed: {0}")]
    Registry(#[from] RegistryError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    // An invalid catalog is a fatal startup error, never a runtime one.
    let registry = Arc::new(build_registry()?);
    let warnings = Arc::new(standing_warnings());
    let gate = config.platform_gate();

    info!(
        event_name = "system.bootstrap.registry_built",
        correlation_id = "bootstrap",
        functions = registry.len(),
        enabled_platforms = ?gate.enabled_platforms(),
        "function registry validated"
    );

    Ok(Application { config, registry, warnings, gate })
}

#[cfg(test)]
mod tests {
    use switchboard_core::config::{ConfigOverrides, LoadOptions};
    use switchboard_core::platform::PlatformId;

    use crate::bootstrap::bootstrap;

    #[test]
    fn bootstrap_fails_fast_on_enabled_platform_without_credentials() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                catalyst_enabled: Some(true),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });

        assert!(result.is_err());
        let message = result.err().expect("error").to_string();
        assert!(message.contains("platforms.catalyst.token"));
    }

    #[test]
    fn bootstrap_builds_registry_warnings_and_gate() {
        let app = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                meraki_enabled: Some(true),
                meraki_api_key: Some("meraki-key".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .expect("bootstrap should succeed with valid overrides");

        assert!(app.registry.len() > 75, "catalog should be fully registered");
        assert!(app.gate.is_enabled(PlatformId::Meraki));
        assert!(!app.gate.is_enabled(PlatformId::Webex));
        for function_name in app.warnings.keys() {
            assert!(
                app.registry.lookup(function_name).is_some(),
                "warning table entry `{function_name}` must resolve in the registry"
            );
        }
    }
}

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::platform::PlatformGate;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub chat: ChatConfig,
    pub platforms: PlatformsConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub graceful_shutdown_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

#[derive(Clone, Debug)]
pub struct ChatConfig {
    /// Domain assumed when the caller supplies no hint.
    pub default_domain: String,
    /// Fallback answers restricted to retrieved context. Taken verbatim
    /// into every DomainFallback classification.
    pub in_domain_only: bool,
}

#[derive(Clone, Debug)]
pub struct PlatformsConfig {
    pub spaces: SpacesConfig,
    pub catalyst: CatalystConfig,
    pub meraki: MerakiConfig,
    pub webex: WebexConfig,
}

#[derive(Clone, Debug)]
pub struct SpacesConfig {
    pub enabled: bool,
    pub base_url: String,
    pub api_key: Option<SecretString>,
}

#[derive(Clone, Debug)]
pub struct CatalystConfig {
    pub enabled: bool,
    pub base_url: String,
    pub token: Option<SecretString>,
}

#[derive(Clone, Debug)]
pub struct MerakiConfig {
    pub enabled: bool,
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub organization_id: Option<String>,
}

#[derive(Clone, Debug)]
pub struct WebexConfig {
    pub enabled: bool,
    pub base_url: String,
    pub token: Option<SecretString>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LlmProvider {
    OpenAi,
    Ollama,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub log_level: Option<String>,
    pub llm_provider: Option<LlmProvider>,
    pub llm_model: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_base_url: Option<String>,
    pub default_domain: Option<String>,
    pub in_domain_only: Option<bool>,
    pub spaces_enabled: Option<bool>,
    pub spaces_api_key: Option<String>,
    pub catalyst_enabled: Option<bool>,
    pub catalyst_token: Option<String>,
    pub meraki_enabled: Option<bool>,
    pub meraki_api_key: Option<String>,
    pub meraki_organization_id: Option<String>,
    pub webex_enabled: Option<bool>,
    pub webex_token: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "127.0.0.1".to_string(),
                port: 8085,
                graceful_shutdown_secs: 15,
            },
            llm: LlmConfig {
                provider: LlmProvider::Ollama,
                api_key: None,
                base_url: Some("http://localhost:11434/v1".to_string()),
                model: "llama3.1".to_string(),
                timeout_secs: 60,
                max_retries: 2,
            },
            chat: ChatConfig { default_domain: "general".to_string(), in_domain_only: false },
            platforms: PlatformsConfig {
                spaces: SpacesConfig {
                    enabled: false,
                    base_url: "https://dnaspaces.io".to_string(),
                    api_key: None,
                },
                catalyst: CatalystConfig {
                    enabled: false,
                    base_url: "https://dnacenter.local".to_string(),
                    token: None,
                },
                meraki: MerakiConfig {
                    enabled: false,
                    base_url: "https://api.meraki.com".to_string(),
                    api_key: None,
                    organization_id: None,
                },
                webex: WebexConfig {
                    enabled: false,
                    base_url: "https://webexapis.com".to_string(),
                    token: None,
                },
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            other => Err(ConfigError::Validation(format!(
                "unsupported llm provider `{other}` (expected openai|ollama)"
            ))),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected =
                options.config_path.unwrap_or_else(|| PathBuf::from("switchboard.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    /// The per-platform enablement gate, derived once at startup.
    pub fn platform_gate(&self) -> PlatformGate {
        PlatformGate::new(
            self.platforms.spaces.enabled,
            self.platforms.catalyst.enabled,
            self.platforms.meraki.enabled,
            self.platforms.webex.enabled,
        )
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
            if let Some(graceful_shutdown_secs) = server.graceful_shutdown_secs {
                self.server.graceful_shutdown_secs = graceful_shutdown_secs;
            }
        }

        if let Some(llm) = patch.llm {
            if let Some(provider) = llm.provider {
                self.llm.provider = provider;
            }
            if let Some(llm_api_key_value) = llm.api_key {
                self.llm.api_key = Some(secret_value(llm_api_key_value));
            }
            if let Some(base_url) = llm.base_url {
                self.llm.base_url = Some(base_url);
            }
            if let Some(model) = llm.model {
                self.llm.model = model;
            }
            if let Some(timeout_secs) = llm.timeout_secs {
                self.llm.timeout_secs = timeout_secs;
            }
            if let Some(max_retries) = llm.max_retries {
                self.llm.max_retries = max_retries;
            }
        }

        if let Some(chat) = patch.chat {
            if let Some(default_domain) = chat.default_domain {
                self.chat.default_domain = default_domain;
            }
            if let Some(in_domain_only) = chat.in_domain_only {
                self.chat.in_domain_only = in_domain_only;
            }
        }

        if let Some(platforms) = patch.platforms {
            if let Some(spaces) = platforms.spaces {
                if let Some(enabled) = spaces.enabled {
                    self.platforms.spaces.enabled = enabled;
                }
                if let Some(base_url) = spaces.base_url {
                    self.platforms.spaces.base_url = base_url;
                }
                if let Some(spaces_api_key_value) = spaces.api_key {
                    self.platforms.spaces.api_key = Some(secret_value(spaces_api_key_value));
                }
            }
            if let Some(catalyst) = platforms.catalyst {
                if let Some(enabled) = catalyst.enabled {
                    self.platforms.catalyst.enabled = enabled;
                }
                if let Some(base_url) = catalyst.base_url {
                    self.platforms.catalyst.base_url = base_url;
                }
                if let Some(catalyst_token_value) = catalyst.token {
                    self.platforms.catalyst.token = Some(secret_value(catalyst_token_value));
                }
            }
            if let Some(meraki) = platforms.meraki {
                if let Some(enabled) = meraki.enabled {
                    self.platforms.meraki.enabled = enabled;
                }
                if let Some(base_url) = meraki.base_url {
                    self.platforms.meraki.base_url = base_url;
                }
                if let Some(meraki_api_key_value) = meraki.api_key {
                    self.platforms.meraki.api_key = Some(secret_value(meraki_api_key_value));
                }
                if let Some(organization_id) = meraki.organization_id {
                    self.platforms.meraki.organization_id = Some(organization_id);
                }
            }
            if let Some(webex) = platforms.webex {
                if let Some(enabled) = webex.enabled {
                    self.platforms.webex.enabled = enabled;
                }
                if let Some(base_url) = webex.base_url {
                    self.platforms.webex.base_url = base_url;
                }
                if let Some(webex_token_value) = webex.token {
                    self.platforms.webex.token = Some(secret_value(webex_token_value));
                }
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("SWITCHBOARD_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("SWITCHBOARD_SERVER_PORT") {
            self.server.port = parse_u16("SWITCHBOARD_SERVER_PORT", &value)?;
        }
        if let Some(value) = read_env("SWITCHBOARD_SERVER_GRACEFUL_SHUTDOWN_SECS") {
            self.server.graceful_shutdown_secs =
                parse_u64("SWITCHBOARD_SERVER_GRACEFUL_SHUTDOWN_SECS", &value)?;
        }

        if let Some(value) = read_env("SWITCHBOARD_LLM_PROVIDER") {
            self.llm.provider = value.parse()?;
        }
        if let Some(value) = read_env("SWITCHBOARD_LLM_API_KEY") {
            self.llm.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("SWITCHBOARD_LLM_BASE_URL") {
            self.llm.base_url = Some(value);
        }
        if let Some(value) = read_env("SWITCHBOARD_LLM_MODEL") {
            self.llm.model = value;
        }
        if let Some(value) = read_env("SWITCHBOARD_LLM_TIMEOUT_SECS") {
            self.llm.timeout_secs = parse_u64("SWITCHBOARD_LLM_TIMEOUT_SECS", &value)?;
        }
        if let Some(value) = read_env("SWITCHBOARD_LLM_MAX_RETRIES") {
            self.llm.max_retries = parse_u32("SWITCHBOARD_LLM_MAX_RETRIES", &value)?;
        }

        if let Some(value) = read_env("SWITCHBOARD_CHAT_DEFAULT_DOMAIN") {
            self.chat.default_domain = value;
        }
        if let Some(value) = read_env("SWITCHBOARD_CHAT_IN_DOMAIN_ONLY") {
            self.chat.in_domain_only = parse_bool("SWITCHBOARD_CHAT_IN_DOMAIN_ONLY", &value)?;
        }

        if let Some(value) = read_env("SWITCHBOARD_SPACES_ENABLED") {
            self.platforms.spaces.enabled = parse_bool("SWITCHBOARD_SPACES_ENABLED", &value)?;
        }
        if let Some(value) = read_env("SWITCHBOARD_SPACES_BASE_URL") {
            self.platforms.spaces.base_url = value;
        }
        if let Some(value) = read_env("SWITCHBOARD_SPACES_API_KEY") {
            self.platforms.spaces.api_key = Some(secret_value(value));
        }

        if let Some(value) = read_env("SWITCHBOARD_CATALYST_ENABLED") {
            self.platforms.catalyst.enabled = parse_bool("SWITCHBOARD_CATALYST_ENABLED", &value)?;
        }
        if let Some(value) = read_env("SWITCHBOARD_CATALYST_BASE_URL") {
            self.platforms.catalyst.base_url = value;
        }
        if let Some(value) = read_env("SWITCHBOARD_CATALYST_TOKEN") {
            self.platforms.catalyst.token = Some(secret_value(value));
        }

        if let Some(value) = read_env("SWITCHBOARD_MERAKI_ENABLED") {
            self.platforms.meraki.enabled = parse_bool("SWITCHBOARD_MERAKI_ENABLED", &value)?;
        }
        if let Some(value) = read_env("SWITCHBOARD_MERAKI_BASE_URL") {
            self.platforms.meraki.base_url = value;
        }
        if let Some(value) = read_env("SWITCHBOARD_MERAKI_API_KEY") {
            self.platforms.meraki.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("SWITCHBOARD_MERAKI_ORGANIZATION_ID") {
            self.platforms.meraki.organization_id = Some(value);
        }

        if let Some(value) = read_env("SWITCHBOARD_WEBEX_ENABLED") {
            self.platforms.webex.enabled = parse_bool("SWITCHBOARD_WEBEX_ENABLED", &value)?;
        }
        if let Some(value) = read_env("SWITCHBOARD_WEBEX_BASE_URL") {
            self.platforms.webex.base_url = value;
        }
        if let Some(value) = read_env("SWITCHBOARD_WEBEX_TOKEN") {
            self.platforms.webex.token = Some(secret_value(value));
        }

        let log_level =
            read_env("SWITCHBOARD_LOGGING_LEVEL").or_else(|| read_env("SWITCHBOARD_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("SWITCHBOARD_LOGGING_FORMAT").or_else(|| read_env("SWITCHBOARD_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(llm_provider) = overrides.llm_provider {
            self.llm.provider = llm_provider;
        }
        if let Some(llm_model) = overrides.llm_model {
            self.llm.model = llm_model;
        }
        if let Some(llm_api_key) = overrides.llm_api_key {
            self.llm.api_key = Some(secret_value(llm_api_key));
        }
        if let Some(llm_base_url) = overrides.llm_base_url {
            self.llm.base_url = Some(llm_base_url);
        }
        if let Some(default_domain) = overrides.default_domain {
            self.chat.default_domain = default_domain;
        }
        if let Some(in_domain_only) = overrides.in_domain_only {
            self.chat.in_domain_only = in_domain_only;
        }

        if let Some(enabled) = overrides.spaces_enabled {
            self.platforms.spaces.enabled = enabled;
        }
        if let Some(api_key) = overrides.spaces_api_key {
            self.platforms.spaces.api_key = Some(secret_value(api_key));
        }
        if let Some(enabled) = overrides.catalyst_enabled {
            self.platforms.catalyst.enabled = enabled;
        }
        if let Some(token) = overrides.catalyst_token {
            self.platforms.catalyst.token = Some(secret_value(token));
        }
        if let Some(enabled) = overrides.meraki_enabled {
            self.platforms.meraki.enabled = enabled;
        }
        if let Some(api_key) = overrides.meraki_api_key {
            self.platforms.meraki.api_key = Some(secret_value(api_key));
        }
        if let Some(organization_id) = overrides.meraki_organization_id {
            self.platforms.meraki.organization_id = Some(organization_id);
        }
        if let Some(enabled) = overrides.webex_enabled {
            self.platforms.webex.enabled = enabled;
        }
        if let Some(token) = overrides.webex_token {
            self.platforms.webex.token = Some(secret_value(token));
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_server(&self.server)?;
        validate_llm(&self.llm)?;
        validate_chat(&self.chat)?;
        validate_platforms(&self.platforms)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("switchboard.toml"), PathBuf::from("config/switchboard.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }

    if server.graceful_shutdown_secs == 0 {
        return Err(ConfigError::Validation(
            "server.graceful_shutdown_secs must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_llm(llm: &LlmConfig) -> Result<(), ConfigError> {
    if llm.timeout_secs == 0 || llm.timeout_secs > 300 {
        return Err(ConfigError::Validation(
            "llm.timeout_secs must be in range 1..=300".to_string(),
        ));
    }

    match llm.provider {
        LlmProvider::OpenAi => {
            let missing = llm
                .api_key
                .as_ref()
                .map(|value| value.expose_secret().trim().is_empty())
                .unwrap_or(true);
            if missing {
                return Err(ConfigError::Validation(
                    "llm.api_key is required for the openai provider".to_string(),
                ));
            }
        }
        LlmProvider::Ollama => {
            let missing =
                llm.base_url.as_ref().map(|value| value.trim().is_empty()).unwrap_or(true);
            if missing {
                return Err(ConfigError::Validation(
                    "llm.base_url is required for the ollama provider".to_string(),
                ));
            }
        }
    }

    Ok(())
}

fn validate_chat(chat: &ChatConfig) -> Result<(), ConfigError> {
    if chat.default_domain.trim().is_empty() {
        return Err(ConfigError::Validation(
            "chat.default_domain must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_platforms(platforms: &PlatformsConfig) -> Result<(), ConfigError> {
    validate_base_url("platforms.spaces.base_url", &platforms.spaces.base_url)?;
    validate_base_url("platforms.catalyst.base_url", &platforms.catalyst.base_url)?;
    validate_base_url("platforms.meraki.base_url", &platforms.meraki.base_url)?;
    validate_base_url("platforms.webex.base_url", &platforms.webex.base_url)?;

    if platforms.spaces.enabled && secret_missing(platforms.spaces.api_key.as_ref()) {
        return Err(ConfigError::Validation(
            "platforms.spaces.enabled is true but platforms.spaces.api_key is missing".to_string(),
        ));
    }
    if platforms.catalyst.enabled && secret_missing(platforms.catalyst.token.as_ref()) {
        return Err(ConfigError::Validation(
            "platforms.catalyst.enabled is true but platforms.catalyst.token is missing"
                .to_string(),
        ));
    }
    if platforms.meraki.enabled && secret_missing(platforms.meraki.api_key.as_ref()) {
        return Err(ConfigError::Validation(
            "platforms.meraki.enabled is true but platforms.meraki.api_key is missing".to_string(),
        ));
    }
    if platforms.webex.enabled && secret_missing(platforms.webex.token.as_ref()) {
        return Err(ConfigError::Validation(
            "platforms.webex.enabled is true but platforms.webex.token is missing".to_string(),
        ));
    }

    Ok(())
}

fn secret_missing(secret: Option<&SecretString>) -> bool {
    secret.map(|value| value.expose_secret().trim().is_empty()).unwrap_or(true)
}

fn validate_base_url(key: &str, value: &str) -> Result<(), ConfigError> {
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{key} must start with http:// or https://"
        )));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value.parse::<bool>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    server: Option<ServerPatch>,
    llm: Option<LlmPatch>,
    chat: Option<ChatPatch>,
    platforms: Option<PlatformsPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
    graceful_shutdown_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LlmPatch {
    provider: Option<LlmProvider>,
    api_key: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    timeout_secs: Option<u64>,
    max_retries: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct ChatPatch {
    default_domain: Option<String>,
    in_domain_only: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
struct PlatformsPatch {
    spaces: Option<SpacesPatch>,
    catalyst: Option<CatalystPatch>,
    meraki: Option<MerakiPatch>,
    webex: Option<WebexPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct SpacesPatch {
    enabled: Option<bool>,
    base_url: Option<String>,
    api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CatalystPatch {
    enabled: Option<bool>,
    base_url: Option<String>,
    token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct MerakiPatch {
    enabled: Option<bool>,
    base_url: Option<String>,
    api_key: Option<String>,
    organization_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct WebexPatch {
    enabled: Option<bool>,
    base_url: Option<String>,
    token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

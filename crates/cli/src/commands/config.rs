use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use switchboard_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let source = |key_path: &str, env_key: &str| {
        field_source(key_path, Some(env_key), config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        source("server.bind_address", "SWITCHBOARD_SERVER_BIND_ADDRESS"),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        source("server.port", "SWITCHBOARD_SERVER_PORT"),
    ));

    lines.push(render_line(
        "llm.provider",
        &format!("{:?}", config.llm.provider),
        source("llm.provider", "SWITCHBOARD_LLM_PROVIDER"),
    ));
    lines.push(render_line(
        "llm.model",
        &config.llm.model,
        source("llm.model", "SWITCHBOARD_LLM_MODEL"),
    ));
    lines.push(render_line(
        "llm.base_url",
        config.llm.base_url.as_deref().unwrap_or("<unset>"),
        source("llm.base_url", "SWITCHBOARD_LLM_BASE_URL"),
    ));
    let llm_api_key = if config.llm.api_key.is_some() { "<redacted>" } else { "<unset>" };
    lines.push(render_line(
        "llm.api_key",
        llm_api_key,
        source("llm.api_key", "SWITCHBOARD_LLM_API_KEY"),
    ));

    lines.push(render_line(
        "chat.default_domain",
        &config.chat.default_domain,
        source("chat.default_domain", "SWITCHBOARD_CHAT_DEFAULT_DOMAIN"),
    ));
    lines.push(render_line(
        "chat.in_domain_only",
        &config.chat.in_domain_only.to_string(),
        source("chat.in_domain_only", "SWITCHBOARD_CHAT_IN_DOMAIN_ONLY"),
    ));

    lines.push(render_line(
        "platforms.spaces.enabled",
        &config.platforms.spaces.enabled.to_string(),
        source("platforms.spaces.enabled", "SWITCHBOARD_SPACES_ENABLED"),
    ));
    lines.push(render_line(
        "platforms.catalyst.enabled",
        &config.platforms.catalyst.enabled.to_string(),
        source("platforms.catalyst.enabled", "SWITCHBOARD_CATALYST_ENABLED"),
    ));
    lines.push(render_line(
        "platforms.meraki.enabled",
        &config.platforms.meraki.enabled.to_string(),
        source("platforms.meraki.enabled", "SWITCHBOARD_MERAKI_ENABLED"),
    ));
    lines.push(render_line(
        "platforms.meraki.organization_id",
        config.platforms.meraki.organization_id.as_deref().unwrap_or("<unset>"),
        source("platforms.meraki.organization_id", "SWITCHBOARD_MERAKI_ORGANIZATION_ID"),
    ));
    lines.push(render_line(
        "platforms.webex.enabled",
        &config.platforms.webex.enabled.to_string(),
        source("platforms.webex.enabled", "SWITCHBOARD_WEBEX_ENABLED"),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", "SWITCHBOARD_LOGGING_LEVEL"),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", "SWITCHBOARD_LOGGING_FORMAT"),
    ));

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("switchboard.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/switchboard.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_key: Option<&str>,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_key {
        if env::var_os(env_key).is_some() {
            return format!("env ({env_key})");
        }
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

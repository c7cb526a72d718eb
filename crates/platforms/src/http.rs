//! Shared REST invoker.
//!
//! Every adapter drives the same machinery: `{name}` segments in the
//! binding path are filled from the argument map, remaining scalar
//! arguments become query parameters (unknown extras included; the handler
//! contract is permissive), and the response is parsed as JSON unless the
//! payload is binary.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use switchboard_core::envelope::ArgumentMap;
use switchboard_core::platform::PlatformId;
use switchboard_core::registry::{RestBinding, RestMethod};

const REQUEST_TIMEOUT_SECS: u64 = 30;
const MAX_TRANSPORT_RETRIES: u32 = 2;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("the {0} integration is disabled")]
    Disabled(PlatformId),
    #[error("missing path parameter `{param}` for {platform} request")]
    MissingPathParam { platform: PlatformId, param: String },
    #[error("request to {platform} failed: {message}")]
    Transport { platform: PlatformId, message: String },
    #[error("{platform} returned status {status}: {body}")]
    Api { platform: PlatformId, status: u16, body: String },
    #[error("malformed response from {platform}: {message}")]
    Malformed { platform: PlatformId, message: String },
}

/// A handler's raw result: a JSON-compatible value, or raw bytes for
/// floor-plan images and bulk exports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlatformPayload {
    Json(Value),
    Binary(Vec<u8>),
}

#[derive(Clone)]
pub enum AuthHeader {
    Bearer(SecretString),
    Named { name: &'static str, value: SecretString },
}

pub struct RestInvoker {
    http: reqwest::Client,
    platform: PlatformId,
    base_url: String,
    auth: AuthHeader,
}

impl RestInvoker {
    pub fn new(platform: PlatformId, base_url: &str, auth: AuthHeader) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self { http, platform, base_url: base_url.trim_end_matches('/').to_string(), auth }
    }

    pub async fn invoke(
        &self,
        binding: &RestBinding,
        args: &ArgumentMap,
    ) -> Result<PlatformPayload, PlatformError> {
        let (path, consumed) = render_path(&binding.path, args).map_err(|param| {
            PlatformError::MissingPathParam { platform: self.platform, param }
        })?;
        let url = format!("{}{}", self.base_url, path);
        let query = query_pairs(args, &consumed);

        let mut last_transport_error = None;
        for attempt in 0..=MAX_TRANSPORT_RETRIES {
            if attempt > 0 {
                tokio::time::sleep(Duration::from_millis(250 * u64::from(attempt))).await;
            }

            let mut request = match binding.method {
                RestMethod::Get => self.http.get(&url),
                RestMethod::Post => self.http.post(&url),
            };
            request = request.query(&query);
            request = match &self.auth {
                AuthHeader::Bearer(token) => request.bearer_auth(token.expose_secret()),
                AuthHeader::Named { name, value } => {
                    request.header(*name, value.expose_secret())
                }
            };

            match request.send().await {
                Ok(response) => return self.read_response(response).await,
                Err(error) => {
                    debug!(
                        event_name = "platform.request.retry",
                        platform = self.platform.key(),
                        attempt,
                        error = %error,
                        "platform request failed, retrying"
                    );
                    last_transport_error = Some(error);
                }
            }
        }

        Err(PlatformError::Transport {
            platform: self.platform,
            message: last_transport_error
                .map(|error| error.to_string())
                .unwrap_or_else(|| "request never attempted".to_string()),
        })
    }

    async fn read_response(
        &self,
        response: reqwest::Response,
    ) -> Result<PlatformPayload, PlatformError> {
        let status = response.status();
        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlatformError::Api {
                platform: self.platform,
                status: status.as_u16(),
                body,
            });
        }

        if is_json {
            let text = response.text().await.map_err(|error| PlatformError::Transport {
                platform: self.platform,
                message: error.to_string(),
            })?;
            if text.trim().is_empty() {
                return Ok(PlatformPayload::Json(Value::Null));
            }
            let value = serde_json::from_str(&text).map_err(|error| PlatformError::Malformed {
                platform: self.platform,
                message: error.to_string(),
            })?;
            return Ok(PlatformPayload::Json(value));
        }

        let bytes = response.bytes().await.map_err(|error| PlatformError::Transport {
            platform: self.platform,
            message: error.to_string(),
        })?;
        Ok(PlatformPayload::Binary(bytes.to_vec()))
    }
}

/// Substitute `{name}` segments from the argument map. Returns the rendered
/// path and the names consumed by it; a placeholder with no scalar argument
/// is the returned error.
pub fn render_path(template: &str, args: &ArgumentMap) -> Result<(String, Vec<String>), String> {
    let mut rendered = String::with_capacity(template.len());
    let mut consumed = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        rendered.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('}') else {
            rendered.push_str(&rest[start..]);
            rest = "";
            break;
        };
        let param = &after[..end];
        let value = args.get(param).and_then(scalar_to_string).ok_or_else(|| param.to_string())?;
        rendered.push_str(&value);
        consumed.push(param.to_string());
        rest = &after[end + 1..];
    }
    rendered.push_str(rest);

    Ok((rendered, consumed))
}

/// Remaining scalar arguments as query pairs, in map order. Path-consumed
/// names and the `save_path` side channel are excluded; everything else
/// passes through, known or not.
pub fn query_pairs(args: &ArgumentMap, consumed: &[String]) -> Vec<(String, String)> {
    args.iter()
        .filter(|(name, _)| *name != "save_path" && !consumed.contains(name))
        .filter_map(|(name, value)| scalar_to_string(value).map(|value| (name.clone(), value)))
        .collect()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

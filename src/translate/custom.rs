//! Client for the dedicated translation server.
//!
//! The server runs on its own port and routes every request through a single
//! backend no matter which engine name it receives, so the client always
//! sends [`FIXED_ENGINE`].  When the server gives up on a request it answers
//! 5xx with a "time limit exceeded" message naming the limit and the line it
//! was working on; that case is reported as [`TranslateError::TimeLimit`].

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::engine::gateway_text;
use super::{guarded, http_client, truncate, Language, TranslateError, Translator};
use crate::config::CustomServerConfig;

/// The only engine the server accepts.
pub const FIXED_ENGINE: &str = "google";

const TIME_LIMIT_MARKER: &str = "time limit exceeded";

/// Generic server errors are cut shorter than gateway ones.
const ERROR_BODY_LIMIT: usize = 200;

pub struct CustomServerTranslator {
    name: String,
    endpoint: String,
    client: reqwest::Client,
}

impl CustomServerTranslator {
    pub fn new(name: impl Into<String>, base_url: &str, client: reqwest::Client) -> Self {
        Self {
            name: name.into(),
            endpoint: format!("{}/translate", base_url.trim_end_matches('/')),
            client,
        }
    }

    pub fn from_config(config: &CustomServerConfig) -> Self {
        Self::new(&config.name, &config.base_url, http_client(config.timeout_secs))
    }

    async fn request(&self, text: &str, from: Language, to: Language) -> Result<String, TranslateError> {
        let body = serde_json::json!({
            "text":   text,
            "from":   from.code(),
            "to":     to.code(),
            "engine": FIXED_ENGINE,
        });

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_server_error() {
            if let Some((limit, line)) = parse_time_limit(&body) {
                return Err(TranslateError::TimeLimit { limit, line });
            }
        }
        if !status.is_success() {
            return Err(TranslateError::Status {
                status: status.as_u16(),
                body: truncate(&body, ERROR_BODY_LIMIT),
            });
        }

        let json: Value = serde_json::from_str(&body).map_err(|e| {
            TranslateError::Parse(format!("{e}; body: {}", truncate(&body, ERROR_BODY_LIMIT)))
        })?;
        gateway_text(&json)
    }
}

#[async_trait]
impl Translator for CustomServerTranslator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn translate(
        &self,
        text: &str,
        from: Language,
        to: Language,
        cancel: &CancellationToken,
    ) -> Result<String, TranslateError> {
        guarded(&self.name, cancel, || self.request(text, from, to), |raw| raw).await
    }
}

/// Extract `(limit, line)` from a time-limit error body.
///
/// The message may be the raw body or wrapped in a JSON `detail` / `error` /
/// `message` field, e.g.
/// `Time limit exceeded: 15 seconds while translating line: 'Привет'`.
/// `limit` is the first number after the marker, `line` the text after the
/// last `line:`; either falls back to `"?"`.
pub fn parse_time_limit(body: &str) -> Option<(String, String)> {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["detail", "error", "message"]
                .iter()
                .find_map(|k| v.get(*k).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.to_string());

    let lower = message.to_lowercase();
    let marker = lower.find(TIME_LIMIT_MARKER)?;
    // `to_lowercase` can change byte lengths; fall back to the whole message
    // when the offsets no longer line up.
    let tail = message
        .get(marker + TIME_LIMIT_MARKER.len()..)
        .filter(|_| lower.len() == message.len())
        .unwrap_or(message.as_str());

    let limit: String = tail
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    let line = tail
        .rfind("line:")
        .map(|i| tail[i + "line:".len()..].trim())
        .map(|l| l.trim_matches(|c| c == '\'' || c == '"').to_string())
        .filter(|l| !l.is_empty());

    Some((
        if limit.is_empty() { "?".to_string() } else { limit },
        line.unwrap_or_else(|| "?".to_string()),
    ))
}

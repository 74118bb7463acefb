//! Engine-selecting client for the shared local translation gateway.
//!
//! One gateway process fronts several backends; each [`EngineTranslator`]
//! names the backend it wants with the `engine` field.  Several translators
//! usually share one gateway URL and one HTTP client.

use async_trait::async_trait;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::{guarded, read_json, Language, TranslateError, Translator};
use crate::config::{EngineConfig, GatewayConfig};

/// Calls `POST {base_url}/translate` with a named engine.
///
/// Request body:
/// ```json
/// {"text": "...", "from": "ru", "to": "en", "engine": "google"}
/// ```
/// The translation is read from the first string field among
/// `translation`, `result` and `text`.
pub struct EngineTranslator {
    name: String,
    engine: String,
    endpoint: String,
    client: reqwest::Client,
}

impl EngineTranslator {
    pub fn new(
        name: impl Into<String>,
        engine: impl Into<String>,
        base_url: &str,
        client: reqwest::Client,
    ) -> Self {
        Self {
            name: name.into(),
            engine: engine.into(),
            endpoint: format!("{}/translate", base_url.trim_end_matches('/')),
            client,
        }
    }

    /// Build from config, sharing `client` with the other gateway engines.
    pub fn from_config(engine: &EngineConfig, gateway: &GatewayConfig, client: reqwest::Client) -> Self {
        Self::new(&engine.name, &engine.engine, &gateway.base_url, client)
    }

    pub fn engine(&self) -> &str {
        &self.engine
    }

    async fn request(&self, text: &str, from: Language, to: Language) -> Result<String, TranslateError> {
        let body = serde_json::json!({
            "text":   text,
            "from":   from.code(),
            "to":     to.code(),
            "engine": self.engine,
        });

        let response = self.client.post(&self.endpoint).json(&body).send().await?;
        let json = read_json(response).await?;
        gateway_text(&json)
    }
}

/// Shared with [`super::custom`], which speaks the same response format.
pub(crate) fn gateway_text(json: &Value) -> Result<String, TranslateError> {
    ["translation", "result", "text"]
        .iter()
        .find_map(|key| json.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .ok_or_else(|| TranslateError::Parse(format!("no translation field in {json}")))
}

#[async_trait]
impl Translator for EngineTranslator {
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

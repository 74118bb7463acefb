//! Chat-completion translator.
//!
//! `ChatTranslator` calls any OpenAI-compatible `/v1/chat/completions`
//! endpoint with a single user-role prompt built by [`PromptBuilder`].  The
//! answer is pulled out with [`extract_content`] and, when configured, the
//! reasoning block is stripped before the text is returned.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::extract::{extract_content, strip_reasoning};
use super::{guarded, http_client, read_json, Language, PromptBuilder, TranslateError, Translator};
use crate::config::{ChatConfig, ReasoningTags};

/// Calls an OpenAI-compatible `/v1/chat/completions` endpoint.
///
/// Works with OpenAI, Groq, OpenRouter, Ollama (OpenAI mode), LM Studio and
/// anything else that speaks the chat-completions wire format.  The
/// `Authorization: Bearer …` header carries the key resolved from
/// [`ChatConfig`]; without one the call fails fast with
/// [`TranslateError::MissingCredential`].
pub struct ChatTranslator {
    name: String,
    endpoint: String,
    model: String,
    temperature: f32,
    api_key: Option<String>,
    reasoning_tags: Option<ReasoningTags>,
    prompt_builder: PromptBuilder,
    client: reqwest::Client,
}

impl ChatTranslator {
    pub fn from_config(config: &ChatConfig) -> Self {
        Self {
            name: config.name.clone(),
            endpoint: format!("{}/v1/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
            temperature: config.temperature,
            api_key: config.resolve_api_key(),
            reasoning_tags: config.reasoning_tags.clone(),
            prompt_builder: PromptBuilder::new(
                config.prompt_template.as_deref(),
                config.explain_language.as_deref(),
            ),
            client: http_client(config.timeout_secs),
        }
    }

    /// Request body for one translation.
    pub fn request_body(&self, text: &str, from: Language, to: Language) -> serde_json::Value {
        serde_json::json!({
            "model":       self.model,
            "messages": [
                { "role": "user", "content": self.prompt_builder.build(text, from, to) }
            ],
            "stream":      false,
            "temperature": self.temperature,
        })
    }

    async fn request(&self, key: &str, text: &str, from: Language, to: Language) -> Result<String, TranslateError> {
        let body = self.request_body(text, from, to);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;

        let json = read_json(response).await?;
        extract_content(&json).ok_or(TranslateError::EmptyResponse)
    }

    fn post_process(&self, raw: String) -> String {
        match &self.reasoning_tags {
            Some(tags) => strip_reasoning(&raw, &tags.start, &tags.end),
            None => raw,
        }
    }
}

#[async_trait]
impl Translator for ChatTranslator {
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
        let Some(key) = self.api_key.as_deref() else {
            log::warn!("translate[{}]: no API key configured, skipping", self.name);
            return Err(TranslateError::MissingCredential);
        };

        guarded(
            &self.name,
            cancel,
            || self.request(key, text, from, to),
            |raw| self.post_process(raw),
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::test_server::serve_once;

    fn make_config(base_url: &str, api_key: Option<&str>) -> ChatConfig {
        ChatConfig {
            name: "GPT".into(),
            base_url: base_url.into(),
            api_key: api_key.map(str::to_string),
            api_key_env: None,
            model: "gpt-4o-mini".into(),
            temperature: 0.2,
            timeout_secs: 10,
            prompt_template: None,
            reasoning_tags: None,
            explain_language: None,
            role: crate::config::TranslatorRole::Variant,
        }
    }

    fn completion(content: &str) -> String {
        serde_json::json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
            .to_string()
    }

    #[tokio::test]
    async fn missing_credential_returns_error_without_request() {
        let t = ChatTranslator::from_config(&make_config("http://127.0.0.1:9", None));
        let err = t
            .translate("Hi", Language::English, Language::Russian, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::MissingCredential));
    }

    #[tokio::test]
    async fn sends_single_user_message_with_bearer() {
        let (base, req) = serve_once(200, &completion("Hello world")).await;
        let t = ChatTranslator::from_config(&make_config(&base, Some("sk-test")));

        let out = t
            .translate("Привет мир", Language::Russian, Language::English, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(out, "Hello world");

        let raw = req.await.unwrap();
        assert!(raw.starts_with("POST /v1/chat/completions"));
        assert!(raw.to_ascii_lowercase().contains("authorization: bearer sk-test"));
        assert!(raw.contains(r#""role":"user""#));
        assert!(!raw.contains(r#""role":"system""#));
    }

    #[tokio::test]
    async fn strips_configured_reasoning_block() {
        let (base, _req) = serve_once(200, &completion("<think>notes</think>Bonjour")).await;
        let mut config = make_config(&base, Some("sk-test"));
        config.reasoning_tags = Some(ReasoningTags::default());

        let out = ChatTranslator::from_config(&config)
            .translate("Hello", Language::English, Language::Russian, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(out, "Bonjour");
    }

    #[tokio::test]
    async fn keeps_reasoning_block_when_not_configured() {
        let (base, _req) = serve_once(200, &completion("<think>notes</think>Bonjour")).await;
        let out = ChatTranslator::from_config(&make_config(&base, Some("sk-test")))
            .translate("Hello", Language::English, Language::Russian, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(out, "<think>notes</think>Bonjour");
    }

    #[tokio::test]
    async fn explanation_suffix_passes_through_unparsed() {
        let (base, req) = serve_once(200, &completion("Hello---missing article")).await;
        let mut config = make_config(&base, Some("sk-test"));
        config.explain_language = Some("en".into());

        let out = ChatTranslator::from_config(&config)
            .translate("Hello", Language::English, Language::Russian, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(out, "Hello---missing article");
        assert!(req.await.unwrap().contains("---"));
    }

    #[tokio::test]
    async fn http_error_is_reported() {
        let (base, _req) = serve_once(401, r#"{"error":{"message":"bad key"}}"#).await;
        let err = ChatTranslator::from_config(&make_config(&base, Some("sk-bad")))
            .translate("Hello", Language::English, Language::Russian, &CancellationToken::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::Status { status: 401, .. }));
    }

    #[test]
    fn request_body_shape() {
        let t = ChatTranslator::from_config(&make_config("http://h", Some("k")));
        let body = t.request_body("Hi", Language::English, Language::Russian);
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"].as_array().map(Vec::len), Some(1));
        assert!(body["messages"][0]["content"]
            .as_str()
            .is_some_and(|c| c.contains("from English to Russian")));
    }

    /// `ChatTranslator` must be usable as `dyn Translator`.
    #[test]
    fn translator_is_object_safe() {
        let t: Box<dyn Translator> =
            Box::new(ChatTranslator::from_config(&make_config("http://h", None)));
        assert_eq!(t.name(), "GPT");
    }
}

//! Translation providers.
//!
//! This module provides:
//! * [`Translator`]: async trait implemented by every provider.
//! * [`EngineTranslator`]: named engine behind the shared local gateway.
//! * [`CustomServerTranslator`]: dedicated server pinned to one backend.
//! * [`ChatTranslator`]: OpenAI-compatible chat-completions endpoint.
//! * [`TranslatorRoster`]: the primary/variant sets built from config.
//! * [`Direction`] / [`Language`]: script-based direction detection.
//! * [`TranslateError`]: error variants for provider calls.
//!
//! Every provider runs its request through [`guarded`], which races the call
//! against the session's [`CancellationToken`], applies the provider's
//! post-processing and reports failures uniformly.

pub mod chat;
pub mod custom;
pub mod direction;
pub mod engine;
pub mod extract;
pub mod prompt;
pub mod roster;

use std::future::Future;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use chat::ChatTranslator;
pub use custom::CustomServerTranslator;
pub use direction::{Direction, Language};
pub use engine::EngineTranslator;
pub use prompt::PromptBuilder;
pub use roster::{RosterRole, TranslatorRoster};

/// Response bodies are cut to this many characters before logging.
const LOG_BODY_LIMIT: usize = 300;

// ---------------------------------------------------------------------------
// TranslateError
// ---------------------------------------------------------------------------

/// Errors a provider call can end with.  None of them are fatal to the
/// session; the orchestrator treats every variant as "no result".
#[derive(Debug, Error)]
pub enum TranslateError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The HTTP client gave up waiting for a response.
    #[error("request timed out")]
    Timeout,

    /// Non-2xx status.  `body` is already truncated for logging.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The server hit its own per-request time limit.
    #[error("server time limit exceeded (limit: {limit}, line: {line})")]
    TimeLimit { limit: String, line: String },

    /// The response body was not the expected JSON shape.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// The provider answered with no usable text.
    #[error("empty translation")]
    EmptyResponse,

    /// The provider needs an API key and none is configured.
    #[error("no API key configured")]
    MissingCredential,

    /// The session's cancellation token fired first.
    #[error("canceled")]
    Cancelled,
}

impl From<reqwest::Error> for TranslateError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranslateError::Timeout
        } else {
            TranslateError::Request(e.to_string())
        }
    }
}

impl TranslateError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TranslateError::Cancelled)
    }
}

// ---------------------------------------------------------------------------
// Translator trait
// ---------------------------------------------------------------------------

/// A translation provider.
///
/// Implementors must be stateless with respect to calls and `Send + Sync` so
/// a single instance can serve many concurrent sessions through
/// `Arc<dyn Translator>`.  A canceled call returns
/// [`TranslateError::Cancelled`] promptly.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Name reported alongside results.
    fn name(&self) -> &str;

    async fn translate(
        &self,
        text: &str,
        from: Language,
        to: Language,
        cancel: &CancellationToken,
    ) -> Result<String, TranslateError>;
}

// ---------------------------------------------------------------------------
// Shared call wrapper
// ---------------------------------------------------------------------------

/// Run a provider request with uniform cancellation, post-processing and
/// failure logging.
///
/// `call` performs the network round trip and yields the raw text.
/// `post_process` turns raw text into the final translation.  The result is
/// trimmed; an empty translation becomes [`TranslateError::EmptyResponse`].
pub async fn guarded<C, Fut, P>(
    name: &str,
    cancel: &CancellationToken,
    call: C,
    post_process: P,
) -> Result<String, TranslateError>
where
    C: FnOnce() -> Fut,
    Fut: Future<Output = Result<String, TranslateError>>,
    P: FnOnce(String) -> String,
{
    if cancel.is_cancelled() {
        return Err(TranslateError::Cancelled);
    }

    let outcome = tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(TranslateError::Cancelled),
        res = call() => res,
    };

    let result = outcome.and_then(|raw| {
        let text = post_process(raw).trim().to_string();
        if text.is_empty() {
            Err(TranslateError::EmptyResponse)
        } else {
            Ok(text)
        }
    });

    match &result {
        Ok(text) => log::debug!("translate[{name}]: ok ({} chars)", text.chars().count()),
        Err(TranslateError::Cancelled) => log::debug!("translate[{name}]: canceled"),
        // Already reported by the provider, once per attempt.
        Err(TranslateError::MissingCredential) => {}
        Err(e) => log::warn!("translate[{name}]: {e}"),
    }

    result
}

// ---------------------------------------------------------------------------
// HTTP helpers shared by the providers
// ---------------------------------------------------------------------------

/// Read a response as JSON, turning non-2xx statuses into
/// [`TranslateError::Status`] with a truncated body.
pub(crate) async fn read_json(
    response: reqwest::Response,
) -> Result<serde_json::Value, TranslateError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(TranslateError::Status {
            status: status.as_u16(),
            body: truncate(&body, LOG_BODY_LIMIT),
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        TranslateError::Parse(format!("{e}; body: {}", truncate(&body, LOG_BODY_LIMIT)))
    })
}

/// Cut `s` to at most `max` characters, marking the cut with `…`.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &s[..idx]),
        None => s.to_string(),
    }
}

/// Build a client with the per-request timeout.  Falls back to a default
/// client if the builder fails.
pub(crate) fn http_client(timeout_secs: u64) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

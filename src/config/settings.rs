//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// TranslatorRole
// ---------------------------------------------------------------------------

/// Which roster set a configured translator joins.
///
/// | Variant   | Raced for the clipboard | Streamed to the display |
/// |-----------|-------------------------|-------------------------|
/// | Primary   | Yes                     | Yes                     |
/// | Variant   | No                      | Yes                     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslatorRole {
    Primary,
    Variant,
}

impl Default for TranslatorRole {
    fn default() -> Self {
        Self::Variant
    }
}

// ---------------------------------------------------------------------------
// HotkeyConfig
// ---------------------------------------------------------------------------

/// Global hotkey binding.  A translation is triggered by pressing `key`
/// twice within `double_press_ms`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HotkeyConfig {
    /// Key name understood by [`crate::hotkey::parse_key`] (e.g. `"ControlLeft"`).
    pub key: String,
    /// Maximum gap between the two presses, in milliseconds.
    pub double_press_ms: u64,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            key: "ControlLeft".into(),
            double_press_ms: 400,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Session orchestration knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Milliseconds to wait after the copy keystroke for the clipboard to
    /// receive the selection.
    pub settle_delay_ms: u64,
    /// When `true`, registering a new session cancels the previously
    /// registered one even if it only has background variants left running.
    /// When `false`, those variants finish unmanaged.
    pub cancel_previous_on_register: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 150,
            cancel_previous_on_register: false,
        }
    }
}

// ---------------------------------------------------------------------------
// GatewayConfig / EngineConfig
// ---------------------------------------------------------------------------

/// Shared local translation gateway that fronts several named engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL, e.g. `http://127.0.0.1:5005`.
    pub base_url: String,
    /// Per-request timeout applied by the HTTP client.
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5005".into(),
            timeout_secs: 30,
        }
    }
}

/// One translator backed by a named engine of the shared gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Display name reported with results (e.g. `"Google"`).
    pub name: String,
    /// Engine identifier sent to the gateway (e.g. `"google"`).
    pub engine: String,
    #[serde(default)]
    pub role: TranslatorRole,
}

// ---------------------------------------------------------------------------
// CustomServerConfig
// ---------------------------------------------------------------------------

/// A dedicated translation server on its own port.  It always receives the
/// fixed backend engine regardless of configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomServerConfig {
    pub name: String,
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(default)]
    pub role: TranslatorRole,
}

impl Default for CustomServerConfig {
    fn default() -> Self {
        Self {
            name: "Custom".into(),
            base_url: "http://127.0.0.1:5006".into(),
            timeout_secs: 30,
            role: TranslatorRole::Variant,
        }
    }
}

// ---------------------------------------------------------------------------
// ChatConfig
// ---------------------------------------------------------------------------

/// Start/end markers of a reasoning block to strip from model output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReasoningTags {
    pub start: String,
    pub end: String,
}

impl Default for ReasoningTags {
    fn default() -> Self {
        Self {
            start: "<think>".into(),
            end: "</think>".into(),
        }
    }
}

/// An OpenAI-compatible `/v1/chat/completions` translator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    pub name: String,
    /// Base URL of the API endpoint (e.g. `https://api.openai.com`).
    pub base_url: String,
    /// Inline API key.  Takes precedence over `api_key_env`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable holding the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Model identifier sent to the API.
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Prompt template with `{from}`, `{to}` and `{text}` placeholders.
    /// `None` selects the built-in template.
    #[serde(default)]
    pub prompt_template: Option<String>,
    /// Strip this reasoning block from responses.
    #[serde(default)]
    pub reasoning_tags: Option<ReasoningTags>,
    /// Ask for a `---`-delimited mistake explanation when the source
    /// language equals this code.
    #[serde(default)]
    pub explain_language: Option<String>,
    #[serde(default)]
    pub role: TranslatorRole,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            name: "GPT".into(),
            base_url: "https://api.openai.com".into(),
            api_key: None,
            api_key_env: Some("OPENAI_API_KEY".into()),
            model: "gpt-4o-mini".into(),
            temperature: 0.2,
            timeout_secs: 30,
            prompt_template: None,
            reasoning_tags: None,
            explain_language: None,
            role: TranslatorRole::Variant,
        }
    }
}

impl ChatConfig {
    /// Resolve the credential: inline key first, then the environment.
    /// Empty strings count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        let inline = self.api_key.as_deref().filter(|k| !k.trim().is_empty());
        if let Some(key) = inline {
            return Some(key.to_string());
        }
        self.api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|k| !k.trim().is_empty())
    }
}

// ---------------------------------------------------------------------------
// DisplayConfig
// ---------------------------------------------------------------------------

/// Overlay process that receives display messages on stdin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Executable to launch.  `None` logs messages instead.
    #[serde(default)]
    pub overlay_command: Option<String>,
    #[serde(default)]
    pub overlay_args: Vec<String>,
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use hotkey_translator::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub hotkey: HotkeyConfig,
    pub session: SessionConfig,
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub engines: Vec<EngineConfig>,
    #[serde(default)]
    pub custom_server: Option<CustomServerConfig>,
    #[serde(default)]
    pub chat: Vec<ChatConfig>,
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            hotkey: HotkeyConfig::default(),
            session: SessionConfig::default(),
            gateway: GatewayConfig::default(),
            engines: vec![
                EngineConfig {
                    name: "Google".into(),
                    engine: "google".into(),
                    role: TranslatorRole::Primary,
                },
                EngineConfig {
                    name: "Yandex".into(),
                    engine: "yandex".into(),
                    role: TranslatorRole::Primary,
                },
            ],
            custom_server: Some(CustomServerConfig::default()),
            chat: vec![ChatConfig {
                explain_language: Some("en".into()),
                ..ChatConfig::default()
            }],
            display: DisplayConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject configurations that cannot produce any translation.
    pub fn validate(&self) -> Result<()> {
        let total = self.engines.len() + self.chat.len() + usize::from(self.custom_server.is_some());
        if total == 0 {
            bail!("no translators configured");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

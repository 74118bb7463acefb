//! Configuration module.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the hotkey,
//! session and each translator family, `AppPaths` for the platform config
//! directory, and TOML persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, ChatConfig, CustomServerConfig, DisplayConfig, EngineConfig, GatewayConfig,
    HotkeyConfig, ReasoningTags, SessionConfig, TranslatorRole,
};

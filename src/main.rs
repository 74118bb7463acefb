//! Application entry point: hotkey selection translator.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run) and
//!    validate it.
//! 3. Create the [`tokio`] runtime.
//! 4. Build the translator roster and the display sink.
//! 5. Build the [`SessionOrchestrator`] with the desktop collaborators.
//! 6. Spawn the hotkey listener thread.
//! 7. Spawn one `handle_trigger` task per trigger until Ctrl+C.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use hotkey_translator::{
    capture::{KeystrokeCapture, SimulationGuard, SystemClipboard},
    config::{AppConfig, DisplayConfig},
    display::{DisplaySink, LogDisplay, OverlayDisplay},
    hotkey::{parse_key, HotkeyEvent, HotkeyListener},
    session::{Collaborators, SessionOrchestrator},
    translate::TranslatorRoster,
};

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("hotkey translator starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    config.validate()?;

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    rt.block_on(run(config))
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    // 4. Providers and display
    let roster = TranslatorRoster::from_config(&config);
    log::info!("translators: {}", roster.describe());
    let display = build_display(&config.display);

    // 5. Orchestrator
    let guard = SimulationGuard::new();
    let collaborators = Collaborators {
        capture: Arc::new(KeystrokeCapture::new()),
        clipboard: Arc::new(SystemClipboard::new()),
        display,
        guard: guard.clone(),
    };
    let orchestrator = Arc::new(SessionOrchestrator::new(
        roster,
        collaborators,
        config.session.clone(),
    ));

    // 6. Hotkey listener thread
    let key = parse_key(&config.hotkey.key).unwrap_or_else(|| {
        log::warn!("hotkey: unknown key {:?}; using ControlLeft", config.hotkey.key);
        rdev::Key::ControlLeft
    });
    let (hotkey_tx, mut hotkey_rx) = mpsc::channel::<HotkeyEvent>(16);
    let _listener = HotkeyListener::start(
        key,
        Duration::from_millis(config.hotkey.double_press_ms),
        guard,
        hotkey_tx,
    )
    .context("failed to spawn hotkey-listener thread")?;
    log::info!("hotkey: double-press {:?} to translate the selection", key);

    // 7. Trigger loop
    let shutdown = CancellationToken::new();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            res = &mut ctrl_c => {
                if let Err(e) = res {
                    log::warn!("cannot listen for Ctrl+C: {e}");
                }
                log::info!("shutting down");
                break;
            }
            event = hotkey_rx.recv() => match event {
                Some(HotkeyEvent::Trigger) => {
                    let orchestrator = Arc::clone(&orchestrator);
                    let shutdown = shutdown.clone();
                    tokio::spawn(async move { orchestrator.handle_trigger(&shutdown).await });
                }
                None => {
                    log::warn!("hotkey: listener stopped; shutting down");
                    break;
                }
            },
        }
    }

    shutdown.cancel();
    Ok(())
}

/// The overlay process when one is configured, log output otherwise.
fn build_display(config: &DisplayConfig) -> Arc<dyn DisplaySink> {
    let Some(command) = &config.overlay_command else {
        log::info!("display: no overlay configured; results go to the log");
        return Arc::new(LogDisplay);
    };

    match OverlayDisplay::spawn(command, &config.overlay_args) {
        Ok(overlay) => Arc::new(overlay),
        Err(e) => {
            log::warn!("display: cannot start overlay {command:?} ({e}); logging instead");
            Arc::new(LogDisplay)
        }
    }
}

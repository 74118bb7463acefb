//! The per-trigger session driver.
//!
//! [`SessionOrchestrator::handle_trigger`] is called once per hotkey trigger,
//! each call on its own task.  At most one call is inside the critical
//! section (capture, cache decision, primary race) at a time; a trigger that
//! finds the slot busy cancels the holder and takes over once it leaves.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

use super::fanout::FanOut;
use super::{CacheEntry, Registration, SessionError, SessionId, SessionRegistry, TranslationCache};
use crate::capture::{CaptureError, Clipboard, SelectionCapture, SimulationGuard};
use crate::config::SessionConfig;
use crate::display::{DisplayMessage, DisplaySink};
use crate::translate::{Direction, TranslatorRoster};

/// The desktop-facing pieces a session drives.
#[derive(Clone)]
pub struct Collaborators {
    pub capture: Arc<dyn SelectionCapture>,
    pub clipboard: Arc<dyn Clipboard>,
    pub display: Arc<dyn DisplaySink>,
    /// Shared with the hotkey listener.
    pub guard: SimulationGuard,
}

pub struct SessionOrchestrator {
    /// The critical section.  Capacity 1.
    slot: Arc<Semaphore>,
    /// At most one trigger waits for `slot`.  Capacity 1.
    waiting: Arc<Semaphore>,
    registry: SessionRegistry,
    cache: Mutex<TranslationCache>,
    roster: Arc<TranslatorRoster>,
    collaborators: Collaborators,
    settings: SessionConfig,
}

impl SessionOrchestrator {
    pub fn new(
        roster: TranslatorRoster,
        collaborators: Collaborators,
        settings: SessionConfig,
    ) -> Self {
        Self {
            slot: Arc::new(Semaphore::new(1)),
            waiting: Arc::new(Semaphore::new(1)),
            registry: SessionRegistry::new(),
            cache: Mutex::new(TranslationCache::new()),
            roster: Arc::new(roster),
            collaborators,
            settings,
        }
    }

    /// Run one translation session.  Returns once the primary race is
    /// settled (or the session ends early); variants keep streaming to the
    /// display in the background.
    pub async fn handle_trigger(&self, shutdown: &CancellationToken) {
        let Some(_permit) = self.acquire_slot(shutdown).await else {
            return;
        };

        let id = SessionId::new();
        match self.run_session(id, shutdown).await {
            Ok(()) => {}
            Err(SessionError::Cancelled) if shutdown.is_cancelled() => {
                log::info!("session[{id}]: stopped for shutdown");
            }
            Err(SessionError::Cancelled) => log::debug!("session[{id}]: superseded"),
            Err(SessionError::NoSelection) => log::info!("session[{id}]: nothing selected"),
            Err(e) => log::error!("session[{id}]: {e}"),
        }
    }

    /// The session currently registered for supersession, if any.
    pub fn active_session(&self) -> Option<SessionId> {
        self.registry.active_id()
    }

    pub fn cached(&self) -> Option<CacheEntry> {
        self.lock_cache().current().cloned()
    }

    pub fn roster(&self) -> &TranslatorRoster {
        &self.roster
    }

    async fn acquire_slot(&self, shutdown: &CancellationToken) -> Option<OwnedSemaphorePermit> {
        if let Ok(permit) = Arc::clone(&self.slot).try_acquire_owned() {
            return Some(permit);
        }

        let Ok(_ticket) = Arc::clone(&self.waiting).try_acquire_owned() else {
            // Someone is already queued; it will pick up the newest selection.
            let active = self.registry.cancel_active();
            log::debug!(
                "session: trigger coalesced into the pending one (canceled {})",
                active.map_or_else(|| "nothing".to_string(), |id| id.to_string())
            );
            return None;
        };

        if let Some(active) = self.registry.cancel_active() {
            log::debug!("session[{active}]: superseding");
        }

        tokio::select! {
            biased;
            _ = shutdown.cancelled() => None,
            permit = Arc::clone(&self.slot).acquire_owned() => permit.ok(),
        }
    }

    async fn run_session(&self, id: SessionId, shutdown: &CancellationToken) -> Result<(), SessionError> {
        let token = shutdown.child_token();
        if let Some(previous) =
            self.registry
                .register(id, token.clone(), self.settings.cancel_previous_on_register)
        {
            log::debug!("session[{id}]: replaces {previous}");
        }
        log::info!("session[{id}]: started");

        let registration = Arc::new(Registration::new(self.registry.clone(), id));
        self.translate_selection(&registration, &token, shutdown).await
    }

    async fn translate_selection(
        &self,
        registration: &Arc<Registration>,
        token: &CancellationToken,
        shutdown: &CancellationToken,
    ) -> Result<(), SessionError> {
        let id = registration.id();
        let Collaborators {
            capture,
            clipboard,
            display,
            guard,
        } = &self.collaborators;

        display.send(DisplayMessage::Working { session_id: id });

        {
            let _scope = guard.begin();
            capture.capture_selection(token).await?;
            tokio::select! {
                biased;
                _ = token.cancelled() => return Err(SessionError::Cancelled),
                _ = tokio::time::sleep(Duration::from_millis(self.settings.settle_delay_ms)) => {}
            }
        }

        let text = clipboard.get_text(token).await?;
        if text.trim().is_empty() {
            return Err(SessionError::NoSelection);
        }

        let direction = Direction::detect(&text);
        log::debug!(
            "session[{id}]: {} chars, {} -> {}",
            text.chars().count(),
            direction.from,
            direction.to
        );

        let hit = self.lock_cache().lookup(&text).cloned();
        let cached_provider = hit.as_ref().map(|entry| entry.provider_name.clone());
        if let Some(entry) = hit {
            log::debug!("session[{id}]: cache hit ({})", entry.provider_name);
            display.send(DisplayMessage::VariantResult {
                session_id: id,
                provider: entry.provider_name.clone(),
                text: entry.translated_text.clone(),
            });
            self.write_clipboard(id, &entry.translated_text, token, shutdown).await;
            self.lock_cache().store(entry);
        }
        let cache_used = cached_provider.is_some();

        let winner = FanOut {
            session_id: id,
            text: text.clone(),
            direction,
            token: token.clone(),
            shutdown: shutdown.clone(),
            roster: Arc::clone(&self.roster),
            display: Arc::clone(display),
            registration: Arc::clone(registration),
            cached_provider,
        }
        .start();

        if cache_used {
            return Ok(());
        }

        let win = tokio::select! {
            biased;
            _ = token.cancelled() => return Err(SessionError::Cancelled),
            win = winner => win.map_err(|_| {
                SessionError::Internal("dispatcher dropped the primary race".into())
            })?,
        };

        let Some(win) = win else {
            log::info!("session[{id}]: no primary translator succeeded");
            return Ok(());
        };

        log::info!("session[{id}]: {} won the primary race", win.provider);
        self.lock_cache().store(CacheEntry {
            source_text: text,
            translated_text: win.text.clone(),
            provider_name: win.provider,
        });
        self.write_clipboard(id, &win.text, token, shutdown).await;
        Ok(())
    }

    /// A canceled write may still land: the blocking call is not aborted.
    async fn write_clipboard(
        &self,
        id: SessionId,
        text: &str,
        token: &CancellationToken,
        shutdown: &CancellationToken,
    ) {
        if let Err(e) = self.collaborators.clipboard.set_text(text, token).await {
            let (level, what) = clipboard_error_log(&e, shutdown.is_cancelled());
            log::log!(level, "session[{id}]: {what}");
        }
    }

    fn lock_cache(&self) -> MutexGuard<'_, TranslationCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// How a failed clipboard write is reported.  Cancellation is never a
/// failure.
fn clipboard_error_log(e: &CaptureError, shutting_down: bool) -> (log::Level, String) {
    match e {
        CaptureError::Cancelled if shutting_down => (
            log::Level::Info,
            "stopped for shutdown during clipboard write".to_string(),
        ),
        CaptureError::Cancelled => (
            log::Level::Debug,
            "superseded during clipboard write".to_string(),
        ),
        other => (log::Level::Warn, format!("clipboard write failed: {other}")),
    }
}

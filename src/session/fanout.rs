//! Provider fan-out and the detached result dispatcher.
//!
//! [`FanOut::start`] spawns one task per translator under the session token
//! and a dispatcher task that consumes completions in arrival order.  The
//! dispatcher:
//!
//! * reports the first non-empty primary result through the returned
//!   oneshot (or `None` once every primary has failed);
//! * streams every success to the display sink, except the completion of
//!   the provider whose cached result the session already showed;
//! * releases its hold on the session's registration once every call has
//!   settled.
//!
//! Nobody awaits the dispatcher; its only observable effects are the
//! display messages and the registry cleanup.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::oneshot;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use super::{Registration, SessionId};
use crate::display::{DisplayMessage, DisplaySink};
use crate::translate::{Direction, RosterRole, TranslateError, TranslatorRoster};

/// The first primary translator to come back with text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimaryWin {
    pub provider: String,
    pub text: String,
}

struct Completion {
    provider: String,
    role: RosterRole,
    elapsed_ms: u128,
    result: Result<String, TranslateError>,
}

/// Everything the dispatcher needs, owned so it can outlive the caller.
pub struct FanOut {
    pub session_id: SessionId,
    pub text: String,
    pub direction: Direction,
    pub token: CancellationToken,
    pub shutdown: CancellationToken,
    pub roster: Arc<TranslatorRoster>,
    pub display: Arc<dyn DisplaySink>,
    /// Held until every call settles.
    pub registration: Arc<Registration>,
    /// Provider whose cached result was already displayed for this session.
    pub cached_provider: Option<String>,
}

impl FanOut {
    /// Spawn every provider call plus the dispatcher.  Must be called from
    /// inside a tokio runtime.
    pub fn start(self) -> oneshot::Receiver<Option<PrimaryWin>> {
        let (win_tx, win_rx) = oneshot::channel();
        let mut calls = JoinSet::new();
        let text: Arc<str> = Arc::from(self.text.as_str());

        for (role, translator) in self.roster.iter() {
            let translator = Arc::clone(translator);
            let text = Arc::clone(&text);
            let token = self.token.clone();
            let Direction { from, to } = self.direction;

            calls.spawn(async move {
                let started = Instant::now();
                let result = translator.translate(&text, from, to, &token).await;
                Completion {
                    provider: translator.name().to_string(),
                    role,
                    elapsed_ms: started.elapsed().as_millis(),
                    result,
                }
            });
        }

        let primaries = self.roster.primary().len();
        tokio::spawn(self.dispatch(calls, primaries, win_tx));
        win_rx
    }

    async fn dispatch(
        self,
        mut calls: JoinSet<Completion>,
        primaries: usize,
        win_tx: oneshot::Sender<Option<PrimaryWin>>,
    ) {
        let id = self.session_id;
        let mut win_tx = Some(win_tx);
        let mut primaries_left = primaries;

        if primaries_left == 0 {
            if let Some(tx) = win_tx.take() {
                let _ = tx.send(None);
            }
        }

        while let Some(joined) = calls.join_next().await {
            let completion = match joined {
                Ok(c) => c,
                Err(e) => {
                    log::error!("session[{id}]: provider task failed: {e}");
                    continue;
                }
            };

            let Completion {
                provider,
                role,
                elapsed_ms,
                result,
            } = completion;

            match result {
                Ok(text) => {
                    log::debug!("session[{id}]: {provider} answered in {elapsed_ms} ms");
                    if role == RosterRole::Primary {
                        if let Some(tx) = win_tx.take() {
                            let _ = tx.send(Some(PrimaryWin {
                                provider: provider.clone(),
                                text: text.clone(),
                            }));
                        }
                    }
                    if self.cached_provider.as_deref() != Some(provider.as_str()) {
                        self.display.send(DisplayMessage::VariantResult {
                            session_id: id,
                            provider,
                            text,
                        });
                    }
                }
                Err(TranslateError::Cancelled) => {
                    if self.shutdown.is_cancelled() {
                        log::debug!("session[{id}]: {provider} stopped for shutdown");
                    } else {
                        log::debug!("session[{id}]: {provider} superseded");
                    }
                }
                // Providers log their own failures.
                Err(_) => {}
            }

            if role == RosterRole::Primary {
                primaries_left = primaries_left.saturating_sub(1);
                if primaries_left == 0 {
                    if let Some(tx) = win_tx.take() {
                        let _ = tx.send(None);
                    }
                }
            }
        }

        // A panicked primary never decrements the counter.
        if let Some(tx) = win_tx.take() {
            let _ = tx.send(None);
        }

        log::debug!("session[{id}]: all providers settled");
    }
}

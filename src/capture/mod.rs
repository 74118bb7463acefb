//! Selection capture: copy keystroke, clipboard access and the simulation
//! guard.
//!
//! # Overview
//!
//! Reading the user's selection is done through the clipboard:
//!
//! 1. **Guard**: enter a [`SimulationScope`] so the hotkey listener ignores
//!    the keystrokes we are about to inject.
//! 2. **Copy**: simulate Ctrl+C (⌘C on macOS) via [`SelectionCapture`].
//! 3. **Settle**: wait briefly for the target app to fill the clipboard.
//! 4. **Read**: fetch the text via [`Clipboard`].
//!
//! The orchestrator only sees the traits; [`KeystrokeCapture`] and
//! [`SystemClipboard`] are the desktop implementations.

pub mod clipboard;
pub mod keyboard;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

pub use clipboard::SystemClipboard;
pub use keyboard::KeystrokeCapture;

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum CaptureError {
    /// Could not open or read the system clipboard.
    #[error("cannot access clipboard: {0}")]
    ClipboardAccess(String),

    /// Could not write text to the system clipboard.
    #[error("cannot set clipboard text: {0}")]
    ClipboardSet(String),

    /// Could not simulate the copy keystroke.
    #[error("cannot simulate key press: {0}")]
    KeySimulation(String),

    /// The blocking worker panicked or was aborted.
    #[error("capture task failed: {0}")]
    Task(String),

    #[error("canceled")]
    Cancelled,
}

impl From<tokio::task::JoinError> for CaptureError {
    fn from(e: tokio::task::JoinError) -> Self {
        CaptureError::Task(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// Makes the focused application copy its selection to the clipboard.
#[async_trait]
pub trait SelectionCapture: Send + Sync {
    async fn capture_selection(&self, cancel: &CancellationToken) -> Result<(), CaptureError>;
}

/// Plain-text clipboard access.
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Current clipboard text; empty when the clipboard holds no text.
    async fn get_text(&self, cancel: &CancellationToken) -> Result<String, CaptureError>;

    async fn set_text(&self, text: &str, cancel: &CancellationToken) -> Result<(), CaptureError>;
}

/// Run a blocking clipboard/keyboard call off the async workers, giving up
/// early if `cancel` fires.  The blocking call itself runs to completion.
pub(crate) async fn run_blocking<T, F>(cancel: &CancellationToken, f: F) -> Result<T, CaptureError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, CaptureError> + Send + 'static,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(CaptureError::Cancelled),
        joined = tokio::task::spawn_blocking(f) => joined?,
    }
}

// ---------------------------------------------------------------------------
// SimulationGuard
// ---------------------------------------------------------------------------

/// Shared flag telling the hotkey listener that key events are synthetic.
///
/// Cheap to clone.  Scopes nest: the guard stays active until every
/// [`SimulationScope`] is dropped.
///
/// ```
/// use hotkey_translator::capture::SimulationGuard;
///
/// let guard = SimulationGuard::new();
/// {
///     let _scope = guard.begin();
///     assert!(guard.is_active());
/// }
/// assert!(!guard.is_active());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulationGuard {
    depth: Arc<AtomicUsize>,
}

impl SimulationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> SimulationScope {
        self.depth.fetch_add(1, Ordering::SeqCst);
        SimulationScope {
            depth: Arc::clone(&self.depth),
        }
    }

    pub fn is_active(&self) -> bool {
        self.depth.load(Ordering::SeqCst) > 0
    }
}

/// RAII handle returned by [`SimulationGuard::begin`].
#[must_use = "the guard is released as soon as the scope is dropped"]
pub struct SimulationScope {
    depth: Arc<AtomicUsize>,
}

impl Drop for SimulationScope {
    fn drop(&mut self) {
        self.depth.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn scopes_nest() {
        let guard = SimulationGuard::new();
        let other = guard.clone();

        let outer = guard.begin();
        let inner = other.begin();
        drop(outer);
        assert!(guard.is_active());
        drop(inner);
        assert!(!guard.is_active());
    }

    #[tokio::test]
    async fn run_blocking_returns_value() {
        let out = run_blocking(&CancellationToken::new(), || Ok(42)).await.unwrap();
        assert_eq!(out, 42);
    }

    #[tokio::test]
    async fn run_blocking_maps_panic_to_task_error() {
        let err = run_blocking::<(), _>(&CancellationToken::new(), || panic!("boom"))
            .await
            .unwrap_err();
        assert!(matches!(err, CaptureError::Task(_)));
    }

    #[tokio::test]
    async fn run_blocking_stops_waiting_on_cancel() {
        let token = CancellationToken::new();
        token.cancel();
        let err = run_blocking(&token, || {
            std::thread::sleep(Duration::from_millis(200));
            Ok(())
        })
        .await
        .unwrap_err();
        assert!(matches!(err, CaptureError::Cancelled));
    }
}

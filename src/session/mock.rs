//! Test doubles for the session collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::capture::{CaptureError, Clipboard, SelectionCapture, SimulationGuard};
use crate::translate::{guarded, Language, TranslateError, Translator};

// ---------------------------------------------------------------------------
// MockTranslator
// ---------------------------------------------------------------------------

/// Counters shared between a [`MockTranslator`] and the test body.
#[derive(Clone, Default)]
pub struct Probe {
    calls: Arc<AtomicUsize>,
    completed: Arc<AtomicUsize>,
    cancelled: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<(String, Language, Language)>>>,
}

impl Probe {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Calls that ran to the end of their delay.
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<(String, Language, Language)> {
        self.requests.lock().unwrap().clone()
    }
}

/// Answers after a fixed delay with a fixed outcome.  Goes through
/// [`guarded`] like the real providers.
pub struct MockTranslator {
    name: String,
    outcome: Option<String>,
    delay: Duration,
    probe: Probe,
}

impl MockTranslator {
    pub fn ok(name: &str, text: &str, delay_ms: u64) -> Self {
        Self {
            name: name.into(),
            outcome: Some(text.into()),
            delay: Duration::from_millis(delay_ms),
            probe: Probe::default(),
        }
    }

    pub fn failing(name: &str, delay_ms: u64) -> Self {
        Self {
            outcome: None,
            ..Self::ok(name, "", delay_ms)
        }
    }

    pub fn probe(&self) -> Probe {
        self.probe.clone()
    }
}

#[async_trait]
impl Translator for MockTranslator {
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
        self.probe.calls.fetch_add(1, Ordering::SeqCst);
        self.probe
            .requests
            .lock()
            .unwrap()
            .push((text.to_string(), from, to));

        let result = guarded(
            &self.name,
            cancel,
            || async {
                tokio::time::sleep(self.delay).await;
                self.probe.completed.fetch_add(1, Ordering::SeqCst);
                self.outcome
                    .clone()
                    .ok_or_else(|| TranslateError::Request("mock failure".into()))
            },
            |raw| raw,
        )
        .await;

        if result.as_ref().is_err_and(TranslateError::is_cancelled) {
            self.probe.cancelled.fetch_add(1, Ordering::SeqCst);
        }
        result
    }
}

// ---------------------------------------------------------------------------
// MockCapture
// ---------------------------------------------------------------------------

/// Copy keystroke that takes `delay` and tracks how many captures overlap.
pub struct MockCapture {
    delay: Duration,
    guard: SimulationGuard,
    active: AtomicUsize,
    max_active: AtomicUsize,
    calls: AtomicUsize,
    unguarded_calls: AtomicUsize,
}

impl MockCapture {
    pub fn new(delay_ms: u64, guard: SimulationGuard) -> Self {
        Self {
            delay: Duration::from_millis(delay_ms),
            guard,
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
            calls: AtomicUsize::new(0),
            unguarded_calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    /// Captures that ran without a simulation scope held.
    pub fn unguarded_calls(&self) -> usize {
        self.unguarded_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SelectionCapture for MockCapture {
    async fn capture_selection(&self, cancel: &CancellationToken) -> Result<(), CaptureError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.guard.is_active() {
            self.unguarded_calls.fetch_add(1, Ordering::SeqCst);
        }

        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now, Ordering::SeqCst);

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(CaptureError::Cancelled),
            _ = tokio::time::sleep(self.delay) => Ok(()),
        };

        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

// ---------------------------------------------------------------------------
// MockClipboard
// ---------------------------------------------------------------------------

/// Serves a fixed "selection" and records every completed write.
#[derive(Default)]
pub struct MockClipboard {
    selection: Mutex<String>,
    writes: Mutex<Vec<String>>,
    write_delay: Duration,
    write_attempts: AtomicUsize,
    canceled_writes: AtomicUsize,
}

impl MockClipboard {
    pub fn new(selection: &str) -> Self {
        Self {
            selection: Mutex::new(selection.into()),
            ..Self::default()
        }
    }

    /// Writes take `delay_ms` and give up if the token fires first.
    pub fn with_write_delay(mut self, delay_ms: u64) -> Self {
        self.write_delay = Duration::from_millis(delay_ms);
        self
    }

    /// What the next copy keystroke will put on the clipboard.
    pub fn select(&self, text: &str) {
        *self.selection.lock().unwrap() = text.into();
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }

    pub fn canceled_writes(&self) -> usize {
        self.canceled_writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Clipboard for MockClipboard {
    async fn get_text(&self, _cancel: &CancellationToken) -> Result<String, CaptureError> {
        Ok(self.selection.lock().unwrap().clone())
    }

    async fn set_text(&self, text: &str, cancel: &CancellationToken) -> Result<(), CaptureError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                self.canceled_writes.fetch_add(1, Ordering::SeqCst);
                return Err(CaptureError::Cancelled);
            }
            _ = tokio::time::sleep(self.write_delay) => {}
        }
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

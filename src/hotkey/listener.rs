//! Dedicated OS-thread hotkey listener using `rdev::listen`.
//!
//! `rdev::listen` is a blocking call that must live on its own OS thread.
//! [`HotkeyListener`] owns that thread and a stop flag; dropping it sets the
//! flag so the callback silently ignores further events.
//!
//! # Shutdown caveat
//!
//! `rdev::listen` has **no graceful shutdown API**.  Setting the stop flag
//! prevents events from being forwarded, but the OS thread itself will remain
//! blocked in the rdev event loop until the process exits.  rdev holds no
//! resources that need explicit cleanup.

use std::io;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use super::{DoublePressDetector, HotkeyEvent};
use crate::capture::SimulationGuard;

/// Handle to a running hotkey listener thread.
///
/// Construct one with [`HotkeyListener::start`].  Drop it to stop forwarding
/// events.
pub struct HotkeyListener {
    stop: Arc<AtomicBool>,
    /// Never joined: `rdev::listen` does not return.
    _thread: std::thread::JoinHandle<()>,
}

impl HotkeyListener {
    /// Spawn the listener thread.  Sends [`HotkeyEvent::Trigger`] on `tx`
    /// each time `key` is double-pressed within `window`.
    ///
    /// Key presses seen while `guard` is active are synthetic (our own copy
    /// keystroke) and are dropped before they reach the detector.
    pub fn start(
        key: rdev::Key,
        window: Duration,
        guard: SimulationGuard,
        tx: mpsc::Sender<HotkeyEvent>,
    ) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_clone = Arc::clone(&stop);

        let thread = std::thread::Builder::new()
            .name("hotkey-listener".into())
            .spawn(move || {
                let mut detector = DoublePressDetector::new(window);

                let result = rdev::listen(move |event| {
                    if stop_clone.load(Ordering::Relaxed) {
                        return;
                    }

                    match event.event_type {
                        // Releases always count, so a real release during
                        // our copy keystroke does not leave the key "held".
                        rdev::EventType::KeyRelease(k) if k == key => detector.on_release(),
                        _ if guard.is_active() => {}
                        rdev::EventType::KeyPress(k) if k == key => {
                            if detector.on_press(Instant::now()) {
                                log::debug!("hotkey: double press of {key:?}");
                                // blocking_send is safe to call from non-async threads.
                                let _ = tx.blocking_send(HotkeyEvent::Trigger);
                            }
                        }
                        rdev::EventType::KeyPress(_) => detector.on_other_key(),
                        _ => {}
                    }
                });

                if let Err(e) = result {
                    log::error!("hotkey: rdev::listen exited with error: {:?}", e);
                }
            })?;

        Ok(Self {
            stop,
            _thread: thread,
        })
    }
}

impl Drop for HotkeyListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

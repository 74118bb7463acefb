//! Global trigger hotkey, backed by `rdev`.
//!
//! # Design
//!
//! `rdev::listen()` is a blocking OS-level call that never returns while the
//! process is alive.  It must run on a **dedicated OS thread**; it cannot be
//! used inside a tokio task.
//!
//! A translation is requested by pressing the configured key twice within a
//! short window (by default left Ctrl).  [`DoublePressDetector`] holds that
//! logic and knows nothing about rdev, so it is tested with plain
//! [`Instant`]s.  [`HotkeyListener`] feeds it from the rdev thread and ignores
//! every event while a [`SimulationGuard`](crate::capture::SimulationGuard)
//! scope is held, so our own Ctrl+C never counts as a press.
//!
//! # Usage
//!
//! ```no_run
//! use std::time::Duration;
//! use tokio::sync::mpsc;
//! use hotkey_translator::capture::SimulationGuard;
//! use hotkey_translator::hotkey::{parse_key, HotkeyListener};
//!
//! let (tx, mut rx) = mpsc::channel(16);
//! let key = parse_key("ControlLeft").expect("unknown key");
//! let _listener = HotkeyListener::start(key, Duration::from_millis(400), SimulationGuard::new(), tx);
//!
//! // In your async loop:
//! // while let Some(ev) = rx.recv().await { ... }
//! ```

pub mod listener;

use std::time::{Duration, Instant};

pub use listener::HotkeyListener;

// ---------------------------------------------------------------------------
// HotkeyEvent
// ---------------------------------------------------------------------------

/// Events emitted by the hotkey listener thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotkeyEvent {
    /// The trigger key was double-pressed: translate the selection.
    Trigger,
}

// ---------------------------------------------------------------------------
// DoublePressDetector
// ---------------------------------------------------------------------------

/// Recognises two presses of the same key within `window`.
///
/// Auto-repeat presses (a press while the key is already held) are ignored,
/// and any other key in between resets the sequence, so chords such as
/// Ctrl+C followed by Ctrl do not trigger.
#[derive(Debug, Clone)]
pub struct DoublePressDetector {
    window: Duration,
    last_press: Option<Instant>,
    held: bool,
}

impl DoublePressDetector {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_press: None,
            held: false,
        }
    }

    /// Feed a press of the watched key.  Returns `true` when it completes a
    /// double press.
    pub fn on_press(&mut self, now: Instant) -> bool {
        if self.held {
            return false;
        }
        self.held = true;

        match self.last_press {
            Some(prev) if now.saturating_duration_since(prev) <= self.window => {
                self.last_press = None;
                true
            }
            _ => {
                self.last_press = Some(now);
                false
            }
        }
    }

    pub fn on_release(&mut self) {
        self.held = false;
    }

    /// Any other key was pressed.
    pub fn on_other_key(&mut self) {
        self.last_press = None;
    }
}

// ---------------------------------------------------------------------------
// parse_key
// ---------------------------------------------------------------------------

/// Parse a hotkey name from a config string into an [`rdev::Key`].
///
/// Supports modifier keys, F1–F12, common named keys, and single uppercase or
/// lowercase ASCII letters.
///
/// Returns `None` for unrecognised names so callers can fall back to a default
/// or display an error to the user.
///
/// # Examples
///
/// ```
/// use hotkey_translator::hotkey::parse_key;
///
/// assert_eq!(parse_key("ControlLeft"), Some(rdev::Key::ControlLeft));
/// assert_eq!(parse_key("F9"),          Some(rdev::Key::F9));
/// assert_eq!(parse_key("a"),           Some(rdev::Key::KeyA));
/// assert_eq!(parse_key("xyz"),         None);
/// ```
pub fn parse_key(key_str: &str) -> Option<rdev::Key> {
    match key_str {
        // Modifiers
        "ControlLeft" | "LeftCtrl" | "Ctrl" => Some(rdev::Key::ControlLeft),
        "ControlRight" | "RightCtrl" => Some(rdev::Key::ControlRight),
        "ShiftLeft" | "LeftShift" | "Shift" => Some(rdev::Key::ShiftLeft),
        "ShiftRight" | "RightShift" => Some(rdev::Key::ShiftRight),
        "Alt" | "LeftAlt" => Some(rdev::Key::Alt),
        "AltGr" | "RightAlt" => Some(rdev::Key::AltGr),
        "MetaLeft" | "LeftMeta" | "Cmd" => Some(rdev::Key::MetaLeft),
        "MetaRight" | "RightMeta" => Some(rdev::Key::MetaRight),

        // Function keys
        "F1" => Some(rdev::Key::F1),
        "F2" => Some(rdev::Key::F2),
        "F3" => Some(rdev::Key::F3),
        "F4" => Some(rdev::Key::F4),
        "F5" => Some(rdev::Key::F5),
        "F6" => Some(rdev::Key::F6),
        "F7" => Some(rdev::Key::F7),
        "F8" => Some(rdev::Key::F8),
        "F9" => Some(rdev::Key::F9),
        "F10" => Some(rdev::Key::F10),
        "F11" => Some(rdev::Key::F11),
        "F12" => Some(rdev::Key::F12),

        // Navigation / control
        "Escape" | "Esc" => Some(rdev::Key::Escape),
        "Space" => Some(rdev::Key::Space),
        "Return" | "Enter" => Some(rdev::Key::Return),
        "Tab" => Some(rdev::Key::Tab),
        "Backspace" => Some(rdev::Key::Backspace),
        "Delete" | "Del" => Some(rdev::Key::Delete),
        "Home" => Some(rdev::Key::Home),
        "End" => Some(rdev::Key::End),
        "PageUp" => Some(rdev::Key::PageUp),
        "PageDown" => Some(rdev::Key::PageDown),
        "UpArrow" | "Up" => Some(rdev::Key::UpArrow),
        "DownArrow" | "Down" => Some(rdev::Key::DownArrow),
        "LeftArrow" | "Left" => Some(rdev::Key::LeftArrow),
        "RightArrow" | "Right" => Some(rdev::Key::RightArrow),

        // Lock / special
        "CapsLock" => Some(rdev::Key::CapsLock),
        "NumLock" => Some(rdev::Key::NumLock),
        "ScrollLock" => Some(rdev::Key::ScrollLock),
        "PrintScreen" => Some(rdev::Key::PrintScreen),
        "Pause" => Some(rdev::Key::Pause),

        // Letter keys (case-insensitive)
        "A" | "a" => Some(rdev::Key::KeyA),
        "B" | "b" => Some(rdev::Key::KeyB),
        "C" | "c" => Some(rdev::Key::KeyC),
        "D" | "d" => Some(rdev::Key::KeyD),
        "E" | "e" => Some(rdev::Key::KeyE),
        "F" | "f" => Some(rdev::Key::KeyF),
        "G" | "g" => Some(rdev::Key::KeyG),
        "H" | "h" => Some(rdev::Key::KeyH),
        "I" | "i" => Some(rdev::Key::KeyI),
        "J" | "j" => Some(rdev::Key::KeyJ),
        "K" | "k" => Some(rdev::Key::KeyK),
        "L" | "l" => Some(rdev::Key::KeyL),
        "M" | "m" => Some(rdev::Key::KeyM),
        "N" | "n" => Some(rdev::Key::KeyN),
        "O" | "o" => Some(rdev::Key::KeyO),
        "P" | "p" => Some(rdev::Key::KeyP),
        "Q" | "q" => Some(rdev::Key::KeyQ),
        "R" | "r" => Some(rdev::Key::KeyR),
        "S" | "s" => Some(rdev::Key::KeyS),
        "T" | "t" => Some(rdev::Key::KeyT),
        "U" | "u" => Some(rdev::Key::KeyU),
        "V" | "v" => Some(rdev::Key::KeyV),
        "W" | "w" => Some(rdev::Key::KeyW),
        "X" | "x" => Some(rdev::Key::KeyX),
        "Y" | "y" => Some(rdev::Key::KeyY),
        "Z" | "z" => Some(rdev::Key::KeyZ),

        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

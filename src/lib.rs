//! Hotkey selection translator.
//!
//! Double-press the trigger key and the selected text is copied, translated
//! between Russian and English by several providers at once, and the fastest
//! primary result lands on the clipboard while every result streams to the
//! overlay.
//!
//! | Module        | Role                                              |
//! |---------------|---------------------------------------------------|
//! | [`capture`]   | copy keystroke, clipboard, simulation guard       |
//! | [`config`]    | `settings.toml` loading and defaults              |
//! | [`display`]   | display sinks (overlay process, log, channel)     |
//! | [`hotkey`]    | global double-press listener                      |
//! | [`session`]   | single-flight sessions, fan-out, cache            |
//! | [`translate`] | providers, roster, direction detection            |

pub mod capture;
pub mod config;
pub mod display;
pub mod hotkey;
pub mod session;
pub mod translate;

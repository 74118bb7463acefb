//! Session orchestration: single-flight translation sessions with
//! supersession, provider fan-out and a primary race.
//!
//! # Architecture
//!
//! ```text
//! HotkeyEvent::Trigger
//!        │
//!        ▼
//! SessionOrchestrator::handle_trigger()      ← one tokio task per trigger
//!        │
//!        ├─ acquire slot (supersede the holder if busy)
//!        ├─ register session token, display "working"
//!        ├─ guard + copy keystroke + settle delay, read clipboard
//!        ├─ Direction::detect
//!        ├─ cache hit → display + clipboard, don't wait for the race
//!        ├─ fan-out ──────────────▶ dispatcher task (detached)
//!        │                            ├─ streams every completion
//!        │                            ├─ reports first primary winner
//!        │                            └─ disposes the session when settled
//!        ├─ await winner → cache + clipboard
//!        └─ release slot
//! ```

pub mod cache;
pub mod fanout;
pub mod orchestrator;
pub mod registry;

#[cfg(test)]
pub(crate) mod mock;

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::capture::CaptureError;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use cache::{CacheEntry, TranslationCache};
pub use orchestrator::{Collaborators, SessionOrchestrator};
pub use registry::{Registration, SessionRegistry};

// ---------------------------------------------------------------------------
// SessionId
// ---------------------------------------------------------------------------

/// Opaque session identifier carried by every display message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    /// First 8 hex digits; enough to tell sessions apart in logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{}", self.0)
        } else {
            let simple = self.0.simple().to_string();
            f.write_str(&simple[..8])
        }
    }
}

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// Reasons a session ends early.  Provider failures never show up here.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session's token fired: superseded or shutting down.
    #[error("session canceled")]
    Cancelled,

    /// The clipboard held no text after the copy keystroke.
    #[error("nothing selected")]
    NoSelection,

    #[error("selection capture failed: {0}")]
    Capture(CaptureError),

    /// Bookkeeping failure inside the orchestrator itself.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CaptureError> for SessionError {
    fn from(e: CaptureError) -> Self {
        match e {
            CaptureError::Cancelled => SessionError::Cancelled,
            other => SessionError::Capture(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
    }

    #[test]
    fn display_is_short_unless_alternate() {
        let id = SessionId::new();
        assert_eq!(id.to_string().len(), 8);
        assert_eq!(format!("{id:#}").len(), 36);
    }

    #[test]
    fn serialises_as_full_uuid_string() {
        let id = SessionId::new();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json.as_str().map(str::len), Some(36));
    }

    #[test]
    fn cancelled_capture_maps_to_cancelled_session() {
        assert!(matches!(
            SessionError::from(CaptureError::Cancelled),
            SessionError::Cancelled
        ));
        assert!(matches!(
            SessionError::from(CaptureError::ClipboardAccess("x".into())),
            SessionError::Capture(_)
        ));
    }
}

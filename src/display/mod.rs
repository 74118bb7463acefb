//! Display sink: the one-way message stream towards the overlay.
//!
//! The orchestrator emits two kinds of [`DisplayMessage`], each tagged with
//! the [`SessionId`] it belongs to.  Sinks are fire-and-forget: `send` never
//! blocks and never fails the session.  Discarding messages from superseded
//! sessions is the receiving side's job.
//!
//! | Sink               | Destination                               |
//! |--------------------|-------------------------------------------|
//! | [`OverlayDisplay`] | JSON lines on the overlay process's stdin |
//! | [`LogDisplay`]     | `log::info!` (headless runs)              |
//! | [`ChannelDisplay`] | a `tokio::sync::mpsc` channel             |

pub mod overlay;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::session::SessionId;

pub use overlay::OverlayDisplay;

// ---------------------------------------------------------------------------
// DisplayMessage
// ---------------------------------------------------------------------------

/// A message for the display surface.
///
/// Serialised as one JSON object per message:
///
/// ```json
/// {"type":"working","session_id":"…"}
/// {"type":"variant_result","session_id":"…","provider":"Google","text":"Hello"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DisplayMessage {
    /// A session has started; show a busy indicator.
    Working { session_id: SessionId },
    /// One provider finished.  Sent once per successful call, in arrival
    /// order.
    VariantResult {
        session_id: SessionId,
        provider: String,
        text: String,
    },
}

impl DisplayMessage {
    pub fn session_id(&self) -> SessionId {
        match self {
            DisplayMessage::Working { session_id }
            | DisplayMessage::VariantResult { session_id, .. } => *session_id,
        }
    }
}

// ---------------------------------------------------------------------------
// DisplaySink
// ---------------------------------------------------------------------------

/// Receives display messages.  Implementations must not block.
pub trait DisplaySink: Send + Sync {
    fn send(&self, message: DisplayMessage);
}

/// Forwards messages into an unbounded channel.
#[derive(Clone)]
pub struct ChannelDisplay {
    tx: mpsc::UnboundedSender<DisplayMessage>,
}

impl ChannelDisplay {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DisplayMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl DisplaySink for ChannelDisplay {
    fn send(&self, message: DisplayMessage) {
        // Receiver gone means nobody is watching; nothing to do.
        let _ = self.tx.send(message);
    }
}

/// Logs messages instead of showing them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDisplay;

impl DisplaySink for LogDisplay {
    fn send(&self, message: DisplayMessage) {
        match message {
            DisplayMessage::Working { session_id } => {
                log::info!("display[{session_id}]: working…");
            }
            DisplayMessage::VariantResult {
                session_id,
                provider,
                text,
            } => {
                log::info!("display[{session_id}]: {provider}: {text}");
            }
        }
    }
}

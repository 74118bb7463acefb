//! Overlay process sink.
//!
//! The overlay is a separate UI process.  [`OverlayDisplay::spawn`] launches
//! it with a piped stdin and a writer task that serialises each
//! [`DisplayMessage`] as one JSON line.  `send` only pushes onto an unbounded
//! channel, so the orchestrator never waits on the overlay.

use std::process::Stdio;

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;

use super::{DisplayMessage, DisplaySink};

pub struct OverlayDisplay {
    tx: mpsc::UnboundedSender<DisplayMessage>,
    /// Held so the overlay is killed when the sink is dropped.
    _child: Option<Child>,
}

impl OverlayDisplay {
    /// Launch `command args…` and stream messages to its stdin.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn spawn(command: &str, args: &[String]) -> std::io::Result<Self> {
        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| std::io::Error::other("overlay stdin was not piped"))?;

        log::info!("display: overlay started ({command})");
        let mut display = Self::from_writer(stdin);
        display._child = Some(child);
        Ok(display)
    }

    /// Stream JSON lines into any async writer.
    pub fn from_writer<W>(writer: W) -> Self
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(write_lines(writer, rx));
        Self { tx, _child: None }
    }
}

impl DisplaySink for OverlayDisplay {
    fn send(&self, message: DisplayMessage) {
        if self.tx.send(message).is_err() {
            log::debug!("display: overlay writer has stopped, message dropped");
        }
    }
}

async fn write_lines<W>(mut writer: W, mut rx: mpsc::UnboundedReceiver<DisplayMessage>)
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = rx.recv().await {
        let mut line = match serde_json::to_string(&message) {
            Ok(line) => line,
            Err(e) => {
                log::warn!("display: cannot serialise message: {e}");
                continue;
            }
        };
        line.push('\n');

        let written = async {
            writer.write_all(line.as_bytes()).await?;
            writer.flush().await
        }
        .await;

        if let Err(e) = written {
            log::warn!("display: overlay pipe closed ({e}); stopping writer");
            break;
        }
    }
}

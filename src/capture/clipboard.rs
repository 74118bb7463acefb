//! System clipboard backed by the `arboard` crate.
//!
//! Each call opens a short-lived [`arboard::Clipboard`] on the blocking pool
//! rather than sharing one handle, because `arboard::Clipboard` is not `Send`
//! on all platforms and the handle is cheap to create.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::{run_blocking, CaptureError, Clipboard};

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn get_text(&self, cancel: &CancellationToken) -> Result<String, CaptureError> {
        run_blocking(cancel, || {
            let mut clipboard = open_clipboard()?;
            // `get_text` errors when the clipboard is empty or holds non-text
            // data; both mean "nothing selected".
            Ok(clipboard.get_text().unwrap_or_default())
        })
        .await
    }

    async fn set_text(&self, text: &str, cancel: &CancellationToken) -> Result<(), CaptureError> {
        let text = text.to_string();
        run_blocking(cancel, move || {
            let mut clipboard = open_clipboard()?;
            clipboard
                .set_text(text)
                .map_err(|e| CaptureError::ClipboardSet(e.to_string()))
        })
        .await
    }
}

fn open_clipboard() -> Result<arboard::Clipboard, CaptureError> {
    arboard::Clipboard::new().map_err(|e| CaptureError::ClipboardAccess(e.to_string()))
}

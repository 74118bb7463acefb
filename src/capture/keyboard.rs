//! Copy keystroke backed by the `enigo` crate.
//!
//! | Platform | Shortcut |
//! |----------|----------|
//! | macOS    | ⌘C       |
//! | Windows  | Ctrl+C   |
//! | Linux    | Ctrl+C   |

use async_trait::async_trait;
use enigo::{Direction, Enigo, Key, Keyboard, Settings};
use tokio_util::sync::CancellationToken;

use super::{run_blocking, CaptureError, SelectionCapture};

#[cfg(target_os = "macos")]
const COPY_MODIFIER: Key = Key::Meta;
#[cfg(not(target_os = "macos"))]
const COPY_MODIFIER: Key = Key::Control;

/// Captures the selection by sending the platform copy shortcut to the
/// focused window.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeystrokeCapture;

impl KeystrokeCapture {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SelectionCapture for KeystrokeCapture {
    async fn capture_selection(&self, cancel: &CancellationToken) -> Result<(), CaptureError> {
        run_blocking(cancel, simulate_copy).await
    }
}

/// A new [`Enigo`] is created per call because it is not `Send`.
fn simulate_copy() -> Result<(), CaptureError> {
    let key_err = |e: enigo::InputError| CaptureError::KeySimulation(e.to_string());

    let mut enigo =
        Enigo::new(&Settings::default()).map_err(|e| CaptureError::KeySimulation(e.to_string()))?;

    enigo.key(COPY_MODIFIER, Direction::Press).map_err(key_err)?;
    let clicked = enigo.key(Key::Unicode('c'), Direction::Click).map_err(key_err);
    // Always release the modifier, even if the click failed.
    enigo.key(COPY_MODIFIER, Direction::Release).map_err(key_err)?;
    clicked
}

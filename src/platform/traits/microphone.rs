//! Microphone interface trait

use crate::platform::Result;

/// Audio capture used by the sound trigger
///
/// Moved into the sound-monitor thread on activation, so implementations
/// must be `Send`.
pub trait MicrophoneInterface: Send + 'static {
    /// Peak amplitude since the previous call (0..=32767)
    fn read_amplitude(&mut self) -> Result<u16>;
}

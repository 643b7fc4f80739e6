//! Torch interface trait

use crate::platform::Result;

/// Camera LED used as a torch
///
/// The arbiter is the only writer; it tracks the last state it requested and
/// never calls `set_torch` with the same value twice in a row.
pub trait TorchInterface {
    /// Switch the torch on or off
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Torch` when the camera service rejects the
    /// call (camera busy, service disconnected).
    fn set_torch(&mut self, on: bool) -> Result<()>;
}

//! Settings storage trait

use crate::platform::Result;

/// Whole-blob key/value store for the settings block
pub trait SettingsStorage {
    /// Read the stored block into `buf`, returning its length
    ///
    /// # Errors
    ///
    /// `PlatformError::Storage(StorageError::Empty)` when nothing was saved
    /// yet; `PlatformError::Io` on a backing-store failure.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Replace the stored block
    fn write(&mut self, data: &[u8]) -> Result<()>;
}

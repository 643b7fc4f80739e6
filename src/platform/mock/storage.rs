//! Mock settings storage for testing

use crate::platform::{
    error::{PlatformError, StorageError},
    traits::SettingsStorage,
    Result,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct Store {
    blob: Option<Vec<u8>>,
    fail_writes: bool,
    writes: usize,
}

/// In-memory settings store
///
/// Clones share the stored blob, so a test can hand one clone to an app,
/// drop the app and open a second one on the same data.
#[derive(Debug, Clone, Default)]
pub struct MockStorage {
    store: Rc<RefCell<Store>>,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored bytes, if any
    pub fn contents(&self) -> Option<Vec<u8>> {
        self.store.borrow().blob.clone()
    }

    /// Replace the stored bytes directly (corruption tests)
    pub fn set_contents(&self, data: &[u8]) {
        self.store.borrow_mut().blob = Some(data.to_vec());
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.store.borrow_mut().fail_writes = fail;
    }

    /// Successful writes so far
    pub fn write_count(&self) -> usize {
        self.store.borrow().writes
    }
}

impl SettingsStorage for MockStorage {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let store = self.store.borrow();
        let blob = store
            .blob
            .as_ref()
            .ok_or(PlatformError::Storage(StorageError::Empty))?;
        let len = blob.len().min(buf.len());
        buf[..len].copy_from_slice(&blob[..len]);
        Ok(len)
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        let mut store = self.store.borrow_mut();
        if store.fail_writes {
            return Err(PlatformError::Storage(StorageError::WriteFailed));
        }
        store.blob = Some(data.to_vec());
        store.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_reports_empty() {
        let mut storage = MockStorage::new();
        let mut buf = [0u8; 8];
        assert!(matches!(
            storage.read(&mut buf),
            Err(PlatformError::Storage(StorageError::Empty))
        ));
    }

    #[test]
    fn clones_share_blob() {
        let mut storage = MockStorage::new();
        storage.write(b"TRCH").unwrap();
        let mut reopened = storage.clone();
        let mut buf = [0u8; 8];
        assert_eq!(reopened.read(&mut buf).unwrap(), 4);
        assert_eq!(&buf[..4], b"TRCH");
        assert_eq!(storage.write_count(), 1);
    }
}

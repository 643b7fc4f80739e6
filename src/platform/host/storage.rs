//! File-backed settings storage

use crate::platform::{
    error::{PlatformError, StorageError},
    traits::SettingsStorage,
    Result,
};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Settings block stored in a single file
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so a crash mid-write leaves the previous block intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStorage for FileStorage {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PlatformError::Storage(StorageError::Empty))
            }
            Err(e) => return Err(e.into()),
        };
        let len = data.len().min(buf.len());
        buf[..len].copy_from_slice(&data[..len]);
        Ok(len)
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, data)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

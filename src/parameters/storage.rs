//! Storage-backed settings
//!
//! Loads the settings block at startup and writes it back on demand.
//! Loading never fails: a missing, corrupt or foreign block yields the
//! defaults (logged), so a damaged store can never keep features from
//! starting.
//!
//! # Example
//!
//! ```
//! use torchlight::parameters::SettingsStore;
//! use torchlight::platform::mock::MockStorage;
//! use torchlight_core::parameters::SettingsForm;
//!
//! let mut storage = MockStorage::new();
//! let mut store = SettingsStore::load(&mut storage);
//!
//! let outcome = store.apply_form(&SettingsForm {
//!     max_flicker_hz: Some(50),
//!     ..SettingsForm::default()
//! });
//! assert!(!outcome.has_invalid());
//! store.save(&mut storage).unwrap();
//!
//! let reloaded = SettingsStore::load(&mut storage);
//! assert_eq!(reloaded.settings().max_flicker_hz, 50);
//! ```

use crate::platform::{PlatformError, Result, SettingsStorage, StorageError};
use torchlight_core::parameters::{
    decode_settings, encode_settings, FormOutcome, ParameterError, SettingKey, Settings,
    SettingsForm, SettingsUpdate, BLOCK_MAX_SIZE,
};

/// Read buffer size; leaves room for blocks written by newer versions
const READ_BUFFER_SIZE: usize = 4 * BLOCK_MAX_SIZE;

/// Settings with a dirty flag and storage round-trip
#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    settings: Settings,
    dirty: bool,
}

impl SettingsStore {
    /// Store holding the defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings, falling back to the defaults on any failure
    pub fn load<S: SettingsStorage>(storage: &mut S) -> Self {
        let mut buf = [0u8; READ_BUFFER_SIZE];
        let settings = match storage.read(&mut buf) {
            Ok(len) => match decode_settings(&buf[..len]) {
                Ok(settings) => {
                    crate::log_info!("settings loaded ({} bytes)", len);
                    settings
                }
                Err(e) => {
                    crate::log_warn!("stored settings rejected ({}), using defaults", e);
                    Settings::default()
                }
            },
            Err(PlatformError::Storage(StorageError::Empty)) => {
                crate::log_info!("no stored settings, using defaults");
                Settings::default()
            }
            Err(e) => {
                crate::log_warn!("settings read failed ({}), using defaults", e);
                Settings::default()
            }
        };

        Self {
            settings,
            dirty: false,
        }
    }

    /// Write the settings block
    ///
    /// # Errors
    ///
    /// The storage error; the store stays dirty so a later save retries.
    pub fn save<S: SettingsStorage>(&mut self, storage: &mut S) -> Result<()> {
        let mut buf = [0u8; BLOCK_MAX_SIZE];
        let len = encode_settings(&self.settings, &mut buf)
            .map_err(|_| PlatformError::Storage(StorageError::WriteFailed))?;
        storage.write(&buf[..len])?;
        self.dirty = false;
        crate::log_debug!("settings saved ({} bytes)", len);
        Ok(())
    }

    /// Save only if something changed since the last load or save
    pub fn save_if_dirty<S: SettingsStorage>(&mut self, storage: &mut S) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.save(storage)?;
        Ok(true)
    }

    /// Validate a settings form and merge every accepted field
    pub fn apply_form(&mut self, form: &SettingsForm) -> FormOutcome {
        let outcome = form.validate();
        if outcome.has_invalid() {
            crate::log_warn!("settings form rejected fields: {:?}", outcome.invalid);
        }
        self.apply(&outcome.update);
        outcome
    }

    /// Merge an already validated update
    pub fn apply(&mut self, update: &SettingsUpdate) {
        if update.is_empty() {
            return;
        }
        let before = self.settings;
        self.settings.merge(update);
        if self.settings != before {
            self.dirty = true;
        }
    }

    /// Set a single value (slider input)
    pub fn set(&mut self, key: SettingKey, value: u32) -> core::result::Result<(), ParameterError> {
        if self.settings.get(key) == value {
            return Ok(());
        }
        self.settings.set(key, value)?;
        self.dirty = true;
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

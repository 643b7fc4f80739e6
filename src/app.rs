//! Application coordinator
//!
//! Ties the arbiter to settings persistence across the host lifecycle:
//!
//! - create: load settings (defaults on any failure), build the arbiter
//! - settings screen: validate the form, commit accepted fields, persist
//! - manual flicker: starts at the stored rate; a new rate is stored
//! - pause: persist pending changes
//! - teardown: release every feature resource, then persist

use crate::arbiter::{ArbiterConfig, ArbiterError, EventSink, FeatureArbiter};
use crate::parameters::SettingsStore;
use crate::platform::{Platform, SettingsStorage};
use torchlight_core::feature::FeatureRequest;
use torchlight_core::parameters::{
    FormOutcome, ParameterError, SettingKey, Settings, SettingsForm,
};
use torchlight_core::traits::TimeSource;

/// Lifecycle coordinator
pub struct TorchlightApp<P: Platform, C: TimeSource, E: EventSink, S: SettingsStorage> {
    arbiter: FeatureArbiter<P, C, E>,
    store: SettingsStore,
    storage: S,
}

impl<P: Platform, C: TimeSource, E: EventSink, S: SettingsStorage> TorchlightApp<P, C, E, S> {
    /// Load settings and build the arbiter
    pub fn create(platform: P, clock: C, events: E, storage: S) -> Self {
        Self::with_config(platform, clock, events, storage, ArbiterConfig::default())
    }

    pub fn with_config(
        platform: P,
        clock: C,
        events: E,
        mut storage: S,
        config: ArbiterConfig,
    ) -> Self {
        let store = SettingsStore::load(&mut storage);
        let arbiter =
            FeatureArbiter::with_config(platform, clock, events, *store.settings(), config);
        crate::log_info!("torchlight started");
        Self {
            arbiter,
            store,
            storage,
        }
    }

    pub fn arbiter(&self) -> &FeatureArbiter<P, C, E> {
        &self.arbiter
    }

    pub fn arbiter_mut(&mut self) -> &mut FeatureArbiter<P, C, E> {
        &mut self.arbiter
    }

    pub fn settings(&self) -> &Settings {
        self.store.settings()
    }

    /// Form pre-filled with the current values
    pub fn settings_form(&self) -> SettingsForm {
        SettingsForm::from_settings(self.store.settings())
    }

    /// Commit every valid field of `form` and persist
    ///
    /// Invalid fields are reported in the outcome and left unchanged. A
    /// persistence failure is logged; the new values stay in effect and
    /// are written again on pause.
    pub fn apply_settings(&mut self, form: &SettingsForm) -> FormOutcome {
        let outcome = self.store.apply_form(form);
        self.sync_settings();
        outcome
    }

    /// Activate a feature
    ///
    /// A manual flicker rate that starts successfully becomes the stored
    /// `flickerFlashlightHz`.
    pub fn activate(&mut self, request: FeatureRequest) -> Result<(), ArbiterError> {
        self.arbiter.activate(request)?;
        if let FeatureRequest::Flicker { hz } = request {
            if let Err(e) = self.set_setting(SettingKey::FlickerHz, hz) {
                crate::log_warn!("flicker rate {} Hz not stored: {}", hz, e);
            }
        }
        Ok(())
    }

    /// Manual flicker at the stored rate
    pub fn start_flicker(&mut self) -> Result<(), ArbiterError> {
        let hz = self.store.settings().flicker_hz;
        self.activate(FeatureRequest::Flicker { hz })
    }

    /// Change one value from a slider
    pub fn set_setting(&mut self, key: SettingKey, value: u32) -> Result<(), ParameterError> {
        self.store.set(key, value)?;
        self.sync_settings();
        Ok(())
    }

    /// Host is going to the background
    pub fn pause(&mut self) {
        self.persist();
    }

    /// Stop every feature and persist settings
    pub fn teardown(mut self) {
        self.arbiter.shutdown();
        self.persist();
        crate::log_info!("torchlight stopped");
    }

    /// Storage backing this app
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn sync_settings(&mut self) {
        self.arbiter.set_settings(*self.store.settings());
        self.persist();
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save_if_dirty(&mut self.storage) {
            crate::log_error!("failed to persist settings: {}", e);
        }
    }
}

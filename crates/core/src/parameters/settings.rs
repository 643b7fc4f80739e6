//! Settings values and the settings-form contract
//!
//! The settings form receives the current values, lets the user edit them,
//! and hands back only the fields that passed validation. Each field is
//! validated on its own: a bad field is flagged and left out, the good ones
//! still go through.

use super::error::ParameterError;
use super::registry::SettingKey;
use bitflags::bitflags;

/// Current settings, durations in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub flicker_hz: u32,
    pub sound_threshold: u32,
    pub tilt_angle_deg: u32,
    pub max_flicker_hz: u32,
    pub flicker_duration_battery_ms: u32,
    pub flicker_duration_altitude_ms: u32,
    pub flicker_duration_call_ms: u32,
    pub flicker_duration_sms_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        let d = |key: SettingKey| key.metadata().default;
        Self {
            flicker_hz: d(SettingKey::FlickerHz),
            sound_threshold: d(SettingKey::SoundThreshold),
            tilt_angle_deg: d(SettingKey::TiltAngle),
            max_flicker_hz: d(SettingKey::MaxFlickerHz),
            flicker_duration_battery_ms: d(SettingKey::FlickerDurationBattery),
            flicker_duration_altitude_ms: d(SettingKey::FlickerDurationAltitude),
            flicker_duration_call_ms: d(SettingKey::FlickerDurationCall),
            flicker_duration_sms_ms: d(SettingKey::FlickerDurationSms),
        }
    }
}

impl Settings {
    pub fn get(&self, key: SettingKey) -> u32 {
        match key {
            SettingKey::FlickerHz => self.flicker_hz,
            SettingKey::SoundThreshold => self.sound_threshold,
            SettingKey::TiltAngle => self.tilt_angle_deg,
            SettingKey::MaxFlickerHz => self.max_flicker_hz,
            SettingKey::FlickerDurationBattery => self.flicker_duration_battery_ms,
            SettingKey::FlickerDurationAltitude => self.flicker_duration_altitude_ms,
            SettingKey::FlickerDurationCall => self.flicker_duration_call_ms,
            SettingKey::FlickerDurationSms => self.flicker_duration_sms_ms,
        }
    }

    /// Set a value after checking its bounds
    ///
    /// Lowering `MaxFlickerHz` below the manual frequency pulls the manual
    /// frequency down with it. `FlickerHz` above the current maximum is
    /// rejected.
    pub fn set(&mut self, key: SettingKey, value: u32) -> Result<(), ParameterError> {
        let in_range = key.metadata().is_valid(value)
            && !(key == SettingKey::FlickerHz && value > self.max_flicker_hz);
        if !in_range {
            return Err(ParameterError::OutOfRange { key, value });
        }

        match key {
            SettingKey::FlickerHz => self.flicker_hz = value,
            SettingKey::SoundThreshold => self.sound_threshold = value,
            SettingKey::TiltAngle => self.tilt_angle_deg = value,
            SettingKey::MaxFlickerHz => {
                self.max_flicker_hz = value;
                self.flicker_hz = self.flicker_hz.min(value);
            }
            SettingKey::FlickerDurationBattery => self.flicker_duration_battery_ms = value,
            SettingKey::FlickerDurationAltitude => self.flicker_duration_altitude_ms = value,
            SettingKey::FlickerDurationCall => self.flicker_duration_call_ms = value,
            SettingKey::FlickerDurationSms => self.flicker_duration_sms_ms = value,
        }
        Ok(())
    }

    /// Apply every accepted value of an update
    ///
    /// Values in an update were validated by [`SettingsForm::validate`];
    /// any that no longer fit (e.g. a stale manual frequency) are skipped.
    pub fn merge(&mut self, update: &SettingsUpdate) {
        // Max first so a new manual frequency is checked against the new max.
        if let Some(v) = update.get(SettingKey::MaxFlickerHz) {
            let _ = self.set(SettingKey::MaxFlickerHz, v);
        }
        for (key, value) in update.iter() {
            if key != SettingKey::MaxFlickerHz {
                let _ = self.set(key, value);
            }
        }
    }
}

/// Values accepted from a settings form, keyed by setting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    values: [Option<u32>; SettingKey::COUNT],
}

impl SettingsUpdate {
    pub fn get(&self, key: SettingKey) -> Option<u32> {
        self.values[key.index()]
    }

    pub fn insert(&mut self, key: SettingKey, value: u32) {
        self.values[key.index()] = Some(value);
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SettingKey, u32)> + '_ {
        SettingKey::ALL
            .into_iter()
            .filter_map(move |k| self.get(k).map(|v| (k, v)))
    }
}

bitflags! {
    /// Form fields that failed validation
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InvalidFields: u8 {
        const MAX_FLICKER_HZ = 1 << 0;
        const DURATION_BATTERY = 1 << 1;
        const DURATION_ALTITUDE = 1 << 2;
        const DURATION_CALL = 1 << 3;
        const DURATION_SMS = 1 << 4;
    }
}

/// Settings-screen input
///
/// Frequencies in Hz, durations in whole seconds. `None` means the field was
/// left empty and keeps its current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsForm {
    pub max_flicker_hz: Option<u32>,
    pub duration_battery_s: Option<u32>,
    pub duration_altitude_s: Option<u32>,
    pub duration_call_s: Option<u32>,
    pub duration_sms_s: Option<u32>,
}

/// Result of validating a [`SettingsForm`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormOutcome {
    /// Fields that passed validation
    pub update: SettingsUpdate,
    /// Fields to highlight
    pub invalid: InvalidFields,
}

impl FormOutcome {
    /// Whether the caller should report "invalid input exists"
    pub fn has_invalid(&self) -> bool {
        !self.invalid.is_empty()
    }
}

impl SettingsForm {
    /// Pre-fill the form with the caller's current values
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            max_flicker_hz: Some(settings.max_flicker_hz),
            duration_battery_s: Some(settings.flicker_duration_battery_ms / 1000),
            duration_altitude_s: Some(settings.flicker_duration_altitude_ms / 1000),
            duration_call_s: Some(settings.flicker_duration_call_ms / 1000),
            duration_sms_s: Some(settings.flicker_duration_sms_ms / 1000),
        }
    }

    /// Validate each field independently
    pub fn validate(&self) -> FormOutcome {
        let fields = [
            (self.max_flicker_hz, SettingKey::MaxFlickerHz, InvalidFields::MAX_FLICKER_HZ),
            (
                self.duration_battery_s,
                SettingKey::FlickerDurationBattery,
                InvalidFields::DURATION_BATTERY,
            ),
            (
                self.duration_altitude_s,
                SettingKey::FlickerDurationAltitude,
                InvalidFields::DURATION_ALTITUDE,
            ),
            (
                self.duration_call_s,
                SettingKey::FlickerDurationCall,
                InvalidFields::DURATION_CALL,
            ),
            (
                self.duration_sms_s,
                SettingKey::FlickerDurationSms,
                InvalidFields::DURATION_SMS,
            ),
        ];

        let mut outcome = FormOutcome::default();
        for (input, key, flag) in fields {
            let Some(raw) = input else { continue };
            let stored = if key.is_duration() {
                raw.checked_mul(1000)
            } else {
                Some(raw)
            };
            match stored {
                Some(value) if key.metadata().is_valid(value) => outcome.update.insert(key, value),
                _ => outcome.invalid |= flag,
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_rejects_out_of_bounds() {
        let mut s = Settings::default();
        assert_eq!(
            s.set(SettingKey::MaxFlickerHz, 5),
            Err(ParameterError::OutOfRange {
                key: SettingKey::MaxFlickerHz,
                value: 5
            })
        );
        assert!(s.set(SettingKey::MaxFlickerHz, 50).is_ok());
        assert_eq!(s.get(SettingKey::MaxFlickerHz), 50);
    }

    #[test]
    fn manual_frequency_follows_max() {
        let mut s = Settings::default();
        s.set(SettingKey::MaxFlickerHz, 60).unwrap();
        s.set(SettingKey::FlickerHz, 55).unwrap();

        s.set(SettingKey::MaxFlickerHz, 30).unwrap();
        assert_eq!(s.flicker_hz, 30);
        assert!(s.set(SettingKey::FlickerHz, 31).is_err());
    }

    #[test]
    fn form_hz_5_rejected_50_accepted() {
        let rejected = SettingsForm {
            max_flicker_hz: Some(5),
            ..SettingsForm::default()
        }
        .validate();
        assert!(rejected.has_invalid());
        assert_eq!(rejected.invalid, InvalidFields::MAX_FLICKER_HZ);
        assert!(rejected.update.is_empty());

        let accepted = SettingsForm {
            max_flicker_hz: Some(50),
            ..SettingsForm::default()
        }
        .validate();
        assert!(!accepted.has_invalid());
        assert_eq!(accepted.update.get(SettingKey::MaxFlickerHz), Some(50));
    }

    #[test]
    fn fields_validated_independently() {
        let outcome = SettingsForm {
            max_flicker_hz: Some(40),
            duration_battery_s: Some(200),
            duration_altitude_s: Some(30),
            duration_call_s: None,
            duration_sms_s: Some(9),
        }
        .validate();

        assert_eq!(
            outcome.invalid,
            InvalidFields::DURATION_BATTERY | InvalidFields::DURATION_SMS
        );
        assert_eq!(outcome.update.get(SettingKey::MaxFlickerHz), Some(40));
        assert_eq!(
            outcome.update.get(SettingKey::FlickerDurationAltitude),
            Some(30_000)
        );
        assert_eq!(outcome.update.get(SettingKey::FlickerDurationBattery), None);
        assert_eq!(outcome.update.get(SettingKey::FlickerDurationCall), None);
    }

    #[test]
    fn prefilled_form_round_trips() {
        let current = Settings {
            max_flicker_hz: 35,
            flicker_duration_call_ms: 60_000,
            ..Settings::default()
        };
        let outcome = SettingsForm::from_settings(&current).validate();
        assert!(!outcome.has_invalid());

        let mut merged = Settings::default();
        merged.merge(&outcome.update);
        assert_eq!(merged, current);
    }

    #[test]
    fn huge_duration_does_not_overflow() {
        let outcome = SettingsForm {
            duration_call_s: Some(u32::MAX),
            ..SettingsForm::default()
        }
        .validate();
        assert_eq!(outcome.invalid, InvalidFields::DURATION_CALL);
    }
}

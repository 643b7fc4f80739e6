//! Settings registry
//!
//! One [`SettingKey`] per persisted value, each with its persisted name,
//! default and inclusive bounds. Durations are stored in milliseconds.

/// Persisted setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SettingKey {
    /// Manual flicker frequency (Hz)
    FlickerHz = 0,
    /// Microphone amplitude that counts as a sound event
    SoundThreshold = 1,
    /// Tilt angle that counts as a tilt event (degrees)
    TiltAngle = 2,
    /// Upper bound for the manual flicker frequency (Hz)
    MaxFlickerHz = 3,
    /// Flicker duration after the battery trigger fires (ms)
    FlickerDurationBattery = 4,
    /// Flicker duration after the altitude trigger fires (ms)
    FlickerDurationAltitude = 5,
    /// Flicker duration for a ringing call (ms)
    FlickerDurationCall = 6,
    /// Flicker duration for an incoming SMS (ms)
    FlickerDurationSms = 7,
}

/// Default, bounds and persisted name of a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamMetadata {
    /// Persisted key
    pub name: &'static str,
    pub default: u32,
    /// Minimum allowed value (inclusive)
    pub min: u32,
    /// Maximum allowed value (inclusive)
    pub max: u32,
}

impl ParamMetadata {
    pub const fn new(name: &'static str, default: u32, min: u32, max: u32) -> Self {
        Self {
            name,
            default,
            min,
            max,
        }
    }

    /// Validate value is within bounds
    pub const fn is_valid(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }
}

const SECOND_MS: u32 = 1000;
const DURATION_DEFAULT_MS: u32 = 15 * SECOND_MS;
const DURATION_MIN_MS: u32 = 10 * SECOND_MS;
const DURATION_MAX_MS: u32 = 180 * SECOND_MS;

static METADATA: [ParamMetadata; SettingKey::COUNT] = [
    ParamMetadata::new("flickerFlashlightHz", 10, 1, 100),
    ParamMetadata::new("sensitivitySoundThreshold", 12_000, 1_000, 32_767),
    ParamMetadata::new("sensitivityAngle", 70, 5, 90),
    ParamMetadata::new("maxFlickerHz", 20, 10, 100),
    ParamMetadata::new(
        "maxFlickerDurationBattery",
        DURATION_DEFAULT_MS,
        DURATION_MIN_MS,
        DURATION_MAX_MS,
    ),
    ParamMetadata::new(
        "maxFlickerDurationAltitude",
        DURATION_DEFAULT_MS,
        DURATION_MIN_MS,
        DURATION_MAX_MS,
    ),
    ParamMetadata::new(
        "maxFlickerDurationCall",
        DURATION_DEFAULT_MS,
        DURATION_MIN_MS,
        DURATION_MAX_MS,
    ),
    ParamMetadata::new(
        "maxFlickerDurationSms",
        DURATION_DEFAULT_MS,
        DURATION_MIN_MS,
        DURATION_MAX_MS,
    ),
];

impl SettingKey {
    pub const COUNT: usize = 8;

    pub const ALL: [SettingKey; Self::COUNT] = [
        SettingKey::FlickerHz,
        SettingKey::SoundThreshold,
        SettingKey::TiltAngle,
        SettingKey::MaxFlickerHz,
        SettingKey::FlickerDurationBattery,
        SettingKey::FlickerDurationAltitude,
        SettingKey::FlickerDurationCall,
        SettingKey::FlickerDurationSms,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn metadata(self) -> &'static ParamMetadata {
        &METADATA[self as usize]
    }

    /// Persisted key name
    pub fn name(self) -> &'static str {
        self.metadata().name
    }

    /// True for settings entered in seconds and stored in milliseconds
    pub const fn is_duration(self) -> bool {
        matches!(
            self,
            SettingKey::FlickerDurationBattery
                | SettingKey::FlickerDurationAltitude
                | SettingKey::FlickerDurationCall
                | SettingKey::FlickerDurationSms
        )
    }

    /// Look up a key by its persisted name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_defaults_within_bounds() {
        for key in SettingKey::ALL {
            let meta = key.metadata();
            assert!(meta.is_valid(meta.default), "{} default", meta.name);
        }
    }

    #[test]
    fn max_flicker_hz_bounds() {
        let meta = SettingKey::MaxFlickerHz.metadata();
        assert!(!meta.is_valid(5));
        assert!(meta.is_valid(10));
        assert!(meta.is_valid(50));
        assert!(meta.is_valid(100));
        assert!(!meta.is_valid(101));
    }

    #[test]
    fn manual_flicker_hz_allows_slow_rates() {
        let meta = SettingKey::FlickerHz.metadata();
        assert!(!meta.is_valid(0));
        assert!(meta.is_valid(1));
        assert!(meta.is_valid(5));
        assert!(meta.is_valid(100));
        assert!(!meta.is_valid(101));
    }

    #[test]
    fn durations_stored_in_ms() {
        let meta = SettingKey::FlickerDurationBattery.metadata();
        assert_eq!(meta.min, 10_000);
        assert_eq!(meta.max, 180_000);
        assert!(SettingKey::FlickerDurationSms.is_duration());
        assert!(!SettingKey::MaxFlickerHz.is_duration());
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(
            SettingKey::from_name("sensitivityAngle"),
            Some(SettingKey::TiltAngle)
        );
        assert_eq!(SettingKey::from_name("unknown"), None);
    }
}

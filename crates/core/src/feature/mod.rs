//! Feature catalogue
//!
//! Every feature that can drive the torch, the request that activates it, the
//! hardware it needs and the icon state shown for it.
//!
//! ## Submodules
//!
//! - [`preemption`]: which feature may revoke which
//! - [`policy`]: how an active feature pulses the torch
//! - [`list`]: ordered list of features currently shown as active

pub mod list;
pub mod policy;
pub mod preemption;

pub use list::ActivatedFeatureList;
pub use policy::{
    FlickerPolicy, RequestError, NETWORK_FLICKER_DURATION_MS, TIMER_FLICKER_DURATION_MS,
    TRIGGER_FLICKER_PERIOD_MS,
};
pub use preemption::PreemptionTable;

use bitflags::bitflags;
use core::fmt;

/// A torch-driving feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Feature {
    /// Torch steadily on
    Flashlight = 0,
    /// On-demand flicker at the configured frequency
    Flicker = 1,
    /// Morse SOS pattern
    Sos = 2,
    /// Toggle on phone tilt
    Tilt = 3,
    /// Toggle on loud sound
    Sound = 4,
    /// Flicker when network connectivity changes
    Network = 5,
    /// Flicker when battery level crosses a threshold
    Battery = 6,
    /// Flicker when altitude crosses a threshold
    Altitude = 7,
    /// Flicker at a scheduled time
    Timer = 8,
    /// Flicker while a call is ringing
    IncomingCall = 9,
    /// Flicker on an incoming SMS
    IncomingSms = 10,
}

impl Feature {
    /// Number of features
    pub const COUNT: usize = 11;

    /// All features in declaration order
    pub const ALL: [Feature; Self::COUNT] = [
        Feature::Flashlight,
        Feature::Flicker,
        Feature::Sos,
        Feature::Tilt,
        Feature::Sound,
        Feature::Network,
        Feature::Battery,
        Feature::Altitude,
        Feature::Timer,
        Feature::IncomingCall,
        Feature::IncomingSms,
    ];

    /// Position in [`Feature::ALL`]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Single-bit set for this feature
    pub const fn flag(self) -> FeatureSet {
        FeatureSet::from_bits_truncate(1 << self as u16)
    }

    /// Label used in the activated-features list
    pub const fn label(self) -> &'static str {
        match self {
            Feature::Flashlight => "Flashlight",
            Feature::Flicker => "Flicker",
            Feature::Sos => "SOS",
            Feature::Tilt => "Tilt",
            Feature::Sound => "Sound",
            Feature::Network => "Network",
            Feature::Battery => "Battery",
            Feature::Altitude => "Altitude",
            Feature::Timer => "Timer",
            Feature::IncomingCall => "Incoming call",
            Feature::IncomingSms => "Incoming SMS",
        }
    }

    /// Hardware the feature cannot run without
    pub const fn required_hardware(self) -> Hardware {
        match self {
            Feature::Flashlight
            | Feature::Flicker
            | Feature::Sos
            | Feature::Timer
            | Feature::Network
            | Feature::Battery => Hardware::TORCH,
            Feature::Tilt => Hardware::TORCH.union(Hardware::ROTATION),
            Feature::Sound => Hardware::TORCH.union(Hardware::MICROPHONE),
            Feature::Altitude => Hardware::TORCH.union(Hardware::BAROMETER),
            Feature::IncomingCall | Feature::IncomingSms => {
                Hardware::TORCH.union(Hardware::TELEPHONY)
            }
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

bitflags! {
    /// Set of features, one bit per [`Feature`]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FeatureSet: u16 {
        const FLASHLIGHT = 1 << 0;
        const FLICKER = 1 << 1;
        const SOS = 1 << 2;
        const TILT = 1 << 3;
        const SOUND = 1 << 4;
        const NETWORK = 1 << 5;
        const BATTERY = 1 << 6;
        const ALTITUDE = 1 << 7;
        const TIMER = 1 << 8;
        const INCOMING_CALL = 1 << 9;
        const INCOMING_SMS = 1 << 10;
    }
}

impl FeatureSet {
    /// Check membership of a single feature
    pub fn has(self, feature: Feature) -> bool {
        self.contains(feature.flag())
    }

    /// Iterate contained features in declaration order
    pub fn features(self) -> impl Iterator<Item = Feature> {
        Feature::ALL.into_iter().filter(move |f| self.has(*f))
    }
}

bitflags! {
    /// Device hardware a feature depends on
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Hardware: u8 {
        /// Camera LED usable as a torch
        const TORCH = 1 << 0;
        /// Pressure sensor
        const BAROMETER = 1 << 1;
        /// Microphone for sound detection
        const MICROPHONE = 1 << 2;
        /// Rotation vector sensor
        const ROTATION = 1 << 3;
        /// Telephony stack for call/SMS notifications
        const TELEPHONY = 1 << 4;
    }
}

/// Icon shown next to a feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconState {
    Inactive,
    Active,
    /// Permission missing, tapping leads to the permission prompt
    NoPermission,
    /// Hardware missing, feature permanently disabled
    Unavailable,
}

/// Request to activate a feature, carrying its parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureRequest {
    Flashlight,
    /// Flicker at `hz` (must not exceed the configured maximum)
    Flicker { hz: u32 },
    Sos,
    Tilt,
    Sound,
    Network,
    /// Flicker once battery level reaches `target_percent`
    Battery { target_percent: u8 },
    /// Flicker once altitude reaches `target_m`
    Altitude { target_m: i32 },
    /// Flicker at absolute clock time `at_ms`
    Timer { at_ms: u64 },
    IncomingCall,
    IncomingSms,
}

impl FeatureRequest {
    /// Feature this request activates
    pub const fn feature(&self) -> Feature {
        match self {
            FeatureRequest::Flashlight => Feature::Flashlight,
            FeatureRequest::Flicker { .. } => Feature::Flicker,
            FeatureRequest::Sos => Feature::Sos,
            FeatureRequest::Tilt => Feature::Tilt,
            FeatureRequest::Sound => Feature::Sound,
            FeatureRequest::Network => Feature::Network,
            FeatureRequest::Battery { .. } => Feature::Battery,
            FeatureRequest::Altitude { .. } => Feature::Altitude,
            FeatureRequest::Timer { .. } => Feature::Timer,
            FeatureRequest::IncomingCall => Feature::IncomingCall,
            FeatureRequest::IncomingSms => Feature::IncomingSms,
        }
    }
}

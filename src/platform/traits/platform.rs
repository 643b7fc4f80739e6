//! Root platform trait
//!
//! Aggregates the device services a [`FeatureArbiter`](crate::arbiter::FeatureArbiter)
//! needs. Implementations provide concrete types via associated types, so the
//! arbiter is monomorphised per platform with no dynamic dispatch.

use super::{MicrophoneInterface, SensorHub, TorchInterface};
use crate::platform::Result;
use core::fmt;
use torchlight_core::feature::{Feature, Hardware};

/// Runtime permission a feature needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    RecordAudio,
    ReadPhoneState,
    ReceiveSms,
}

impl Permission {
    /// Permission `feature` cannot start without
    pub fn required_by(feature: Feature) -> Option<Permission> {
        match feature {
            Feature::Sound => Some(Permission::RecordAudio),
            Feature::IncomingCall => Some(Permission::ReadPhoneState),
            Feature::IncomingSms => Some(Permission::ReceiveSms),
            _ => None,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Permission::RecordAudio => write!(f, "record audio"),
            Permission::ReadPhoneState => write!(f, "read phone state"),
            Permission::ReceiveSms => write!(f, "receive SMS"),
        }
    }
}

/// Root platform trait
pub trait Platform {
    /// Torch type
    type Torch: TorchInterface;

    /// Sensor hub type
    type Sensors: SensorHub;

    /// Microphone type, opened per sound-trigger activation
    type Microphone: MicrophoneInterface;

    /// Hardware present on the device
    ///
    /// Queried once when the arbiter is created.
    fn capabilities(&self) -> Hardware;

    /// Whether the user has granted `permission`
    fn has_permission(&self, permission: Permission) -> bool;

    fn torch(&mut self) -> &mut Self::Torch;

    fn sensors(&self) -> &Self::Sensors;

    /// Open the microphone for a new capture session
    ///
    /// # Errors
    ///
    /// `PlatformError::Sensor(SensorError::AudioCapture)` if the audio
    /// service refuses.
    fn open_microphone(&mut self) -> Result<Self::Microphone>;
}

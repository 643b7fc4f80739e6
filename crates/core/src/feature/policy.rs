//! Flicker policies
//!
//! A [`FlickerPolicy`] describes how the active feature drives the torch.
//! The arbiter derives it once per activation from the request and the
//! current settings.

use super::FeatureRequest;
use crate::parameters::Settings;
use core::fmt;

/// Flicker period used by conditional triggers once they fire (10 Hz)
pub const TRIGGER_FLICKER_PERIOD_MS: u32 = 100;

/// How long a network change keeps the torch flickering
pub const NETWORK_FLICKER_DURATION_MS: u32 = 30_000;

/// How long a scheduled timer keeps the torch flickering
pub const TIMER_FLICKER_DURATION_MS: u32 = 30_000;

/// How the torch is driven while a feature is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlickerPolicy {
    /// Torch on until deactivated
    Constant,
    /// Repeating on/off cycle
    Periodic { period_ms: u32 },
    /// Morse SOS word, repeated
    Morse,
    /// Torch flips on each detected event (tilt, sound)
    OnEvent,
    /// Armed until an event, then flickers for a bounded duration
    Bounded { period_ms: u32, duration_ms: u32 },
}

/// Rejected activation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    /// Flicker frequency outside `1..=max`
    FrequencyOutOfRange { hz: u32, max: u32 },
    /// Battery target outside 0-100 %
    PercentOutOfRange { percent: u8 },
    /// Timer time is not in the future
    TimeInPast { at_ms: u64, now_ms: u64 },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::FrequencyOutOfRange { hz, max } => {
                write!(f, "flicker frequency {} Hz outside 1..={} Hz", hz, max)
            }
            RequestError::PercentOutOfRange { percent } => {
                write!(f, "battery target {}% outside 0..=100%", percent)
            }
            RequestError::TimeInPast { at_ms, now_ms } => {
                write!(f, "timer at {} ms is not after now ({} ms)", at_ms, now_ms)
            }
        }
    }
}

impl FlickerPolicy {
    /// Cycle length for a flicker frequency, `None` for 0 Hz
    pub const fn period_for_hz(hz: u32) -> Option<u32> {
        if hz == 0 {
            None
        } else {
            Some(1000 / hz)
        }
    }

    /// Derive the policy for an activation request
    pub fn for_request(
        request: &FeatureRequest,
        settings: &Settings,
    ) -> Result<Self, RequestError> {
        let bounded = |duration_ms| FlickerPolicy::Bounded {
            period_ms: TRIGGER_FLICKER_PERIOD_MS,
            duration_ms,
        };

        let policy = match *request {
            FeatureRequest::Flashlight => FlickerPolicy::Constant,
            FeatureRequest::Flicker { hz } => {
                let max = settings.max_flicker_hz;
                if hz > max {
                    return Err(RequestError::FrequencyOutOfRange { hz, max });
                }
                match Self::period_for_hz(hz) {
                    Some(period_ms) => FlickerPolicy::Periodic { period_ms },
                    None => return Err(RequestError::FrequencyOutOfRange { hz, max }),
                }
            }
            FeatureRequest::Sos => FlickerPolicy::Morse,
            FeatureRequest::Tilt | FeatureRequest::Sound => FlickerPolicy::OnEvent,
            FeatureRequest::Network => bounded(NETWORK_FLICKER_DURATION_MS),
            FeatureRequest::Battery { target_percent } => {
                if target_percent > 100 {
                    return Err(RequestError::PercentOutOfRange {
                        percent: target_percent,
                    });
                }
                bounded(settings.flicker_duration_battery_ms)
            }
            FeatureRequest::Altitude { .. } => bounded(settings.flicker_duration_altitude_ms),
            FeatureRequest::Timer { .. } => bounded(TIMER_FLICKER_DURATION_MS),
            FeatureRequest::IncomingCall => bounded(settings.flicker_duration_call_ms),
            FeatureRequest::IncomingSms => bounded(settings.flicker_duration_sms_ms),
        };

        Ok(policy)
    }

    /// Off-phase offset and cycle length of a repeating flicker
    pub const fn cycle(&self) -> Option<(u32, u32)> {
        match *self {
            FlickerPolicy::Periodic { period_ms } | FlickerPolicy::Bounded { period_ms, .. } => {
                Some((period_ms / 2, period_ms))
            }
            _ => None,
        }
    }
}

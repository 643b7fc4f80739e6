//! Arbiter configuration

use std::time::Duration;
use torchlight_core::feature::PreemptionTable;

/// Tilt angle the device must fall back under (below the trigger angle)
/// before another tilt counts
pub const DEFAULT_TILT_HYSTERESIS_DEG: f32 = 5.0;

/// Delay between microphone amplitude reads
pub const DEFAULT_SOUND_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Static arbiter configuration, fixed for the arbiter's lifetime
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArbiterConfig {
    /// Which feature revokes which
    pub preemption: PreemptionTable,
    pub tilt_hysteresis_deg: f32,
    pub sound_poll_interval: Duration,
}

impl Default for ArbiterConfig {
    fn default() -> Self {
        Self {
            preemption: PreemptionTable::exclusive(),
            tilt_hysteresis_deg: DEFAULT_TILT_HYSTERESIS_DEG,
            sound_poll_interval: DEFAULT_SOUND_POLL_INTERVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_fully_exclusive() {
        let config = ArbiterConfig::default();
        assert!(config.preemption.is_fully_exclusive());
        assert_eq!(config.preemption.asymmetric_pairs().count(), 0);
    }
}

//! Sensor triggers
//!
//! Pure detectors fed with sensor readings. They decide *when* a feature
//! should react; the arbiter decides *what* happens to the torch.
//!
//! - [`ThresholdTrigger`]: baseline capture then directional crossing
//!   (battery, altitude)
//! - [`EdgeDetector`]: rising edge past a level with hysteresis (tilt, sound)
//! - [`ChangeDetector`]: first value differing from the baseline (network)

pub mod conversions;
pub mod edge;
pub mod threshold;

pub use conversions::{altitude_from_pressure, battery_percent, tilt_from_rotation_vector};
pub use edge::EdgeDetector;
pub use threshold::{Direction, ThresholdTrigger, TriggerDecision};

/// Fires on the first observation that differs from the first one seen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeDetector<T> {
    baseline: Option<T>,
}

impl<T: Copy + PartialEq> ChangeDetector<T> {
    pub const fn new() -> Self {
        Self { baseline: None }
    }

    /// Returns `true` when `value` differs from the captured baseline
    pub fn observe(&mut self, value: T) -> bool {
        match self.baseline {
            None => {
                self.baseline = Some(value);
                false
            }
            Some(baseline) => baseline != value,
        }
    }

    pub fn baseline(&self) -> Option<T> {
        self.baseline
    }
}

impl<T: Copy + PartialEq> Default for ChangeDetector<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_detector_ignores_initial_report() {
        let mut d = ChangeDetector::new();
        assert!(!d.observe(true));
        assert!(!d.observe(true));
        assert_eq!(d.baseline(), Some(true));
        assert!(d.observe(false));
    }
}

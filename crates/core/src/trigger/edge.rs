//! Rising-edge detector with hysteresis
//!
//! Reports once each time a reading climbs to `level` after having been
//! below `level - hysteresis`. The detector starts disarmed, so a reading
//! already past the level at activation does not count until the value has
//! returned below the re-arm point.
//!
//! For a positive level the hysteresis is capped at half the level, so a
//! reading of zero always re-arms.

/// Rising-edge detector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeDetector {
    level: f32,
    hysteresis: f32,
    armed: bool,
}

impl EdgeDetector {
    pub fn new(level: f32, hysteresis: f32) -> Self {
        let hysteresis = if level > 0.0 {
            hysteresis.min(level / 2.0)
        } else {
            hysteresis
        };
        Self {
            level,
            hysteresis,
            armed: false,
        }
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    /// Feed one reading, `true` on a rising edge
    pub fn observe(&mut self, value: f32) -> bool {
        if self.armed {
            if value >= self.level {
                self.armed = false;
                return true;
            }
        } else if value < self.level - self.hysteresis {
            self.armed = true;
        }
        false
    }
}

//! Threshold trigger
//!
//! Armed with a target value. The first reading becomes the baseline and
//! fixes the crossing direction: a target above the baseline fires when the
//! reading rises to it, a target below fires when the reading falls to it.
//! A target equal to the baseline fires on that first reading.
//!
//! Pure logic, no platform dependencies. Mirrors the stateful checker shape
//! used for battery failsafe: feed readings, get at most one event.

/// Direction a reading must move to reach the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Rising,
    Falling,
}

/// Result of feeding one reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriggerDecision {
    /// First reading captured as baseline, target not yet reached
    BaselineCaptured { baseline: f32, direction: Direction },
    /// Target not reached
    Waiting,
    /// Target reached; the trigger stays fired until re-armed
    Crossed { value: f32 },
    /// Already fired earlier
    Spent,
}

/// Stateful baseline + crossing detector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdTrigger {
    target: f32,
    baseline: Option<(f32, Direction)>,
    fired: bool,
}

impl ThresholdTrigger {
    pub const fn new(target: f32) -> Self {
        Self {
            target,
            baseline: None,
            fired: false,
        }
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Baseline and direction, once captured
    pub fn baseline(&self) -> Option<(f32, Direction)> {
        self.baseline
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Feed one reading
    pub fn observe(&mut self, value: f32) -> TriggerDecision {
        if self.fired {
            return TriggerDecision::Spent;
        }

        let direction = match self.baseline {
            Some((_, direction)) => direction,
            None => {
                let direction = if self.target >= value {
                    Direction::Rising
                } else {
                    Direction::Falling
                };
                self.baseline = Some((value, direction));
                if !self.reached(value, direction) {
                    return TriggerDecision::BaselineCaptured {
                        baseline: value,
                        direction,
                    };
                }
                direction
            }
        };

        if self.reached(value, direction) {
            self.fired = true;
            TriggerDecision::Crossed { value }
        } else {
            TriggerDecision::Waiting
        }
    }

    /// Forget baseline and fired state
    pub fn rearm(&mut self) {
        self.baseline = None;
        self.fired = false;
    }

    fn reached(&self, value: f32, direction: Direction) -> bool {
        match direction {
            Direction::Rising => value >= self.target,
            Direction::Falling => value <= self.target,
        }
    }
}

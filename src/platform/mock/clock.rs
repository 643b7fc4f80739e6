//! Mock clock for deterministic timing tests

use std::cell::Cell;
use std::rc::Rc;
use torchlight_core::traits::TimeSource;

/// Manually advanced clock
///
/// Clones share the same time, so a test keeps one handle and the arbiter
/// owns another.
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    now_ms: Rc<Cell<u64>>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock starting at `ms`
    pub fn starting_at(ms: u64) -> Self {
        Self {
            now_ms: Rc::new(Cell::new(ms)),
        }
    }

    pub fn set(&self, ms: u64) {
        self.now_ms.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }
}

impl TimeSource for MockClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

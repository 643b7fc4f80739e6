//! Monotonic system clock

use std::sync::Arc;
use std::time::Instant;
use torchlight_core::traits::TimeSource;

/// Milliseconds since the clock was created
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Arc<Instant>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Arc::new(Instant::now()),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

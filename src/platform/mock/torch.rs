//! Mock torch implementation for testing

use crate::platform::{
    error::{PlatformError, TorchError},
    traits::TorchInterface,
    Result,
};

/// Mock torch
///
/// Records every accepted call so tests can assert on the exact on/off
/// sequence and on the absence of redundant hardware calls.
#[derive(Debug, Default)]
pub struct MockTorch {
    on: bool,
    history: Vec<bool>,
    fail_next: u32,
    fail_always: bool,
}

impl MockTorch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Accepted calls in order
    pub fn history(&self) -> &[bool] {
        &self.history
    }

    /// Number of accepted calls
    pub fn call_count(&self) -> usize {
        self.history.len()
    }

    /// Reject the next `count` calls with `CameraInUse`
    pub fn fail_next(&mut self, count: u32) {
        self.fail_next = count;
    }

    /// Reject every call until cleared
    pub fn set_failing(&mut self, failing: bool) {
        self.fail_always = failing;
    }
}

impl TorchInterface for MockTorch {
    fn set_torch(&mut self, on: bool) -> Result<()> {
        if self.fail_always {
            return Err(PlatformError::Torch(TorchError::CameraInUse));
        }
        if self.fail_next > 0 {
            self.fail_next -= 1;
            return Err(PlatformError::Torch(TorchError::CameraInUse));
        }
        self.on = on;
        self.history.push(on);
        Ok(())
    }
}

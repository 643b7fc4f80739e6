//! Mock platform implementation for testing

use super::{MockMicrophone, MockSensorHub, MockTorch};
use crate::platform::{
    error::{PlatformError, SensorError},
    traits::{Permission, Platform},
    Result,
};
use std::collections::HashSet;
use torchlight_core::feature::Hardware;

/// Mock platform
///
/// Defaults to a device with every piece of hardware and every permission
/// granted. Builder methods remove hardware or permissions for error-path
/// tests.
#[derive(Debug)]
pub struct MockPlatform {
    torch: MockTorch,
    sensors: MockSensorHub,
    microphone: MockMicrophone,
    capabilities: Hardware,
    denied: HashSet<Permission>,
    microphone_opens: usize,
    fail_microphone: bool,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            torch: MockTorch::new(),
            sensors: MockSensorHub::new(),
            microphone: MockMicrophone::new(),
            capabilities: Hardware::all(),
            denied: HashSet::new(),
            microphone_opens: 0,
            fail_microphone: false,
        }
    }

    /// Device with only the given hardware
    pub fn with_capabilities(mut self, capabilities: Hardware) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn deny(&mut self, permission: Permission) {
        self.denied.insert(permission);
    }

    pub fn grant(&mut self, permission: Permission) {
        self.denied.remove(&permission);
    }

    /// Make `open_microphone` fail
    pub fn set_microphone_failing(&mut self, fail: bool) {
        self.fail_microphone = fail;
    }

    pub fn torch_ref(&self) -> &MockTorch {
        &self.torch
    }

    /// Handle onto the shared sensor hub state
    pub fn sensor_hub(&self) -> MockSensorHub {
        self.sensors.clone()
    }

    /// Handle onto the shared microphone script
    pub fn microphone(&self) -> MockMicrophone {
        self.microphone.clone()
    }

    pub fn microphone_opens(&self) -> usize {
        self.microphone_opens
    }
}

impl Default for MockPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for MockPlatform {
    type Torch = MockTorch;
    type Sensors = MockSensorHub;
    type Microphone = MockMicrophone;

    fn capabilities(&self) -> Hardware {
        self.capabilities
    }

    fn has_permission(&self, permission: Permission) -> bool {
        !self.denied.contains(&permission)
    }

    fn torch(&mut self) -> &mut MockTorch {
        &mut self.torch
    }

    fn sensors(&self) -> &MockSensorHub {
        &self.sensors
    }

    fn open_microphone(&mut self) -> Result<MockMicrophone> {
        if self.fail_microphone {
            return Err(PlatformError::Sensor(SensorError::AudioCapture));
        }
        self.microphone_opens += 1;
        Ok(self.microphone.clone())
    }
}

//! Mock microphone implementation for testing

use crate::platform::{
    error::{PlatformError, SensorError},
    traits::MicrophoneInterface,
    Result,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Script {
    samples: VecDeque<u16>,
    fail: bool,
    reads: usize,
}

/// Scripted microphone
///
/// Returns queued amplitudes in order, then silence. Clones share the
/// script, so a test can keep feeding samples after the microphone has been
/// moved into the sound-monitor thread.
#[derive(Debug, Clone, Default)]
pub struct MockMicrophone {
    script: Arc<Mutex<Script>>,
}

impl MockMicrophone {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue amplitudes to return
    pub fn push_samples(&self, samples: &[u16]) {
        if let Ok(mut script) = self.script.lock() {
            script.samples.extend(samples.iter().copied());
        }
    }

    /// Make every following read fail
    pub fn set_failing(&self, fail: bool) {
        if let Ok(mut script) = self.script.lock() {
            script.fail = fail;
        }
    }

    /// Number of reads served so far
    pub fn read_count(&self) -> usize {
        self.script.lock().map(|s| s.reads).unwrap_or(0)
    }

    /// Whether every queued sample has been read
    pub fn is_drained(&self) -> bool {
        self.script
            .lock()
            .map(|s| s.samples.is_empty())
            .unwrap_or(true)
    }
}

impl MicrophoneInterface for MockMicrophone {
    fn read_amplitude(&mut self) -> Result<u16> {
        let mut script = self
            .script
            .lock()
            .map_err(|_| PlatformError::Sensor(SensorError::AudioCapture))?;
        if script.fail {
            return Err(PlatformError::Sensor(SensorError::AudioCapture));
        }
        script.reads += 1;
        Ok(script.samples.pop_front().unwrap_or(0))
    }
}

//! Sound monitor thread
//!
//! Polls the microphone's peak amplitude on a dedicated thread and reports
//! each rising edge past the threshold to the owner thread over a channel.
//! The owner drains the channel from its own loop; the torch is never
//! touched from the monitor thread.
//!
//! ## Shutdown
//!
//! [`SoundMonitor::stop`] (or drop) raises the stop flag, joins the thread
//! and drops the receiver. A signal sent after the stop request is never
//! observed by the owner.

use crate::platform::MicrophoneInterface;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use torchlight_core::trigger::EdgeDetector;

/// Message from the monitor thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundSignal {
    /// Amplitude rose past the threshold
    Loud { amplitude: u16 },
    /// Microphone read failed; the thread has exited
    CaptureFailed,
}

/// Handle to a running monitor thread
#[derive(Debug)]
pub struct SoundMonitor {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
    signals: Option<Receiver<SoundSignal>>,
}

impl SoundMonitor {
    /// Spawn the monitor thread
    ///
    /// # Arguments
    ///
    /// * `microphone` - Opened microphone, moved into the thread
    /// * `threshold` - Amplitude that counts as a sound event
    /// * `poll_interval` - Delay between amplitude reads
    ///
    /// # Errors
    ///
    /// Returns the OS error if the thread cannot be spawned.
    pub fn start<M: MicrophoneInterface>(
        microphone: M,
        threshold: u16,
        poll_interval: Duration,
    ) -> io::Result<Self> {
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel();

        let thread_stop = Arc::clone(&stop);
        let handle = thread::Builder::new()
            .name("sound-monitor".into())
            .spawn(move || monitor_loop(microphone, threshold, poll_interval, thread_stop, tx))?;

        crate::log_debug!("sound monitor started (threshold {})", threshold);
        Ok(Self {
            stop,
            handle: Some(handle),
            signals: Some(rx),
        })
    }

    /// Next pending signal, without blocking
    pub fn try_next(&self) -> Option<SoundSignal> {
        let rx = self.signals.as_ref()?;
        match rx.try_recv() {
            Ok(signal) => Some(signal),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Whether the thread is still running
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop and join the thread
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        // Drop the receiver first so a blocked send fails fast.
        self.signals = None;
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                crate::log_error!("sound monitor thread panicked");
            } else {
                crate::log_debug!("sound monitor stopped");
            }
        }
    }
}

impl Drop for SoundMonitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn monitor_loop<M: MicrophoneInterface>(
    mut microphone: M,
    threshold: u16,
    poll_interval: Duration,
    stop: Arc<AtomicBool>,
    tx: Sender<SoundSignal>,
) {
    let level = f32::from(threshold);
    let mut edge = EdgeDetector::new(level, level / 2.0);

    while !stop.load(Ordering::Acquire) {
        match microphone.read_amplitude() {
            Ok(amplitude) => {
                if edge.observe(f32::from(amplitude))
                    && tx.send(SoundSignal::Loud { amplitude }).is_err()
                {
                    break;
                }
            }
            Err(e) => {
                crate::log_warn!("microphone read failed: {}", e);
                let _ = tx.send(SoundSignal::CaptureFailed);
                break;
            }
        }
        thread::sleep(poll_interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockMicrophone;
    use std::time::Instant;

    fn wait_for(monitor: &SoundMonitor) -> Option<SoundSignal> {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if let Some(signal) = monitor.try_next() {
                return Some(signal);
            }
            thread::sleep(Duration::from_millis(1));
        }
        None
    }

    #[test]
    fn reports_rising_edges_only() {
        let mic = MockMicrophone::new();
        mic.push_samples(&[100, 20_000, 20_000, 100, 15_000]);
        let monitor = SoundMonitor::start(mic.clone(), 12_000, Duration::from_millis(1)).unwrap();

        assert_eq!(
            wait_for(&monitor),
            Some(SoundSignal::Loud { amplitude: 20_000 })
        );
        assert_eq!(
            wait_for(&monitor),
            Some(SoundSignal::Loud { amplitude: 15_000 })
        );
        monitor.stop();
        assert!(mic.is_drained());
    }

    #[test]
    fn loud_start_needs_quiet_first() {
        let mic = MockMicrophone::new();
        mic.push_samples(&[30_000, 30_000]);
        let monitor = SoundMonitor::start(mic.clone(), 12_000, Duration::from_millis(1)).unwrap();

        let deadline = Instant::now() + Duration::from_secs(2);
        while !mic.is_drained() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        thread::sleep(Duration::from_millis(5));
        assert_eq!(monitor.try_next(), None);
    }

    #[test]
    fn capture_failure_ends_thread() {
        let mic = MockMicrophone::new();
        mic.set_failing(true);
        let monitor = SoundMonitor::start(mic, 12_000, Duration::from_millis(1)).unwrap();
        assert_eq!(wait_for(&monitor), Some(SoundSignal::CaptureFailed));
    }

    #[test]
    fn stop_joins_thread() {
        let mic = MockMicrophone::new();
        let monitor = SoundMonitor::start(mic.clone(), 12_000, Duration::from_millis(1)).unwrap();
        assert!(monitor.is_running());
        monitor.stop();
        let reads = mic.read_count();
        thread::sleep(Duration::from_millis(10));
        assert_eq!(mic.read_count(), reads);
    }
}

//! Background subsystems driven by the arbiter

pub mod sound_monitor;

pub use sound_monitor::{SoundMonitor, SoundSignal};

//! Platform trait definitions
//!
//! Interfaces the arbiter drives. Implementations live in
//! [`crate::platform::mock`] (tests, simulation) and [`crate::platform::host`]
//! (desktop backing for storage and time).

pub mod microphone;
pub mod platform;
pub mod sensor;
pub mod storage;
pub mod torch;

pub use microphone::MicrophoneInterface;
pub use platform::{Permission, Platform};
pub use sensor::{CallState, ListenerId, SensorEvent, SensorHub, SensorKind};
pub use storage::SettingsStorage;
pub use torch::TorchInterface;

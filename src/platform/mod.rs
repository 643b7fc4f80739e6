//! Platform abstraction layer
//!
//! Device services (torch, sensors, microphone, storage) behind traits.
//! Arbitration logic never touches a concrete device type.

pub mod error;
pub mod host;
pub mod mock;
pub mod traits;

// Re-export commonly used types
pub use error::{PlatformError, Result, SensorError, StorageError, TorchError};
pub use traits::{
    CallState, ListenerId, MicrophoneInterface, Permission, Platform, SensorEvent, SensorHub,
    SensorKind, SettingsStorage, TorchInterface,
};

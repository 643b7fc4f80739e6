//! Settings persistence
//!
//! Values, bounds and the block format live in
//! [`torchlight_core::parameters`]; this module moves the block in and out
//! of a [`SettingsStorage`](crate::platform::SettingsStorage).

pub mod storage;

pub use storage::SettingsStore;

//! torchlight - Torch arbitration for a flashlight app
//!
//! This library drives a device torch on behalf of one feature at a time:
//! a steady flashlight, on-demand flicker, Morse SOS, and conditional
//! triggers (tilt, sound, network change, battery level, altitude, a
//! scheduled time, incoming calls and SMS). Pure logic lives in
//! [`torchlight_core`]; this crate adds the platform abstraction, the
//! arbiter, the sound-monitor thread and settings persistence.

// Platform abstraction layer
pub mod platform;

// Logging macros
pub mod core;

// Single-owner torch arbitration
pub mod arbiter;

// Background threads owned by features
pub mod subsystems;

// Settings persistence
pub mod parameters;

// Lifecycle coordinator
pub mod app;

pub use app::TorchlightApp;
pub use arbiter::{ArbiterError, ArbiterEvent, EventSink, FeatureArbiter};

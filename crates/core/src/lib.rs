//! torchlight_core - Pure no_std logic for torch arbitration
//!
//! This crate holds the platform-agnostic parts of the flashlight controller:
//! which features exist and which of them preempt each other, how each feature
//! pulses the torch, the Morse timing table, the cancellable timer queue, the
//! threshold and edge detectors used by the sensor triggers, and the settings
//! parameters with their persisted block format.
//!
//! # Design Principles
//!
//! - **Pure no_std**: No std library dependencies, testable on host
//! - **Trait abstractions**: Time is injected via [`traits::TimeSource`]
//! - **Fixed capacity**: Collections are `heapless`, sized at compile time
//!
//! # Modules
//!
//! - [`traits`]: Platform-agnostic trait abstractions (TimeSource)
//! - [`feature`]: Feature catalogue, preemption table, flicker policies
//! - [`morse`]: Morse timing and SOS step schedule
//! - [`scheduler`]: Generation-keyed timer queue
//! - [`trigger`]: Threshold/edge detectors and sensor conversions
//! - [`parameters`]: Settings parameters, validation and block codec

#![no_std]

pub mod feature;
pub mod morse;
pub mod parameters;
pub mod scheduler;
pub mod traits;
pub mod trigger;

pub use feature::{
    ActivatedFeatureList, Feature, FeatureRequest, FeatureSet, FlickerPolicy, IconState,
    PreemptionTable,
};
pub use parameters::{Settings, SettingsForm, SettingsUpdate};
pub use scheduler::{Expired, TimerQueue};
pub use traits::TimeSource;

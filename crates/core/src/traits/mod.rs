//! Platform-agnostic trait abstractions
//!
//! Traits here let the arbitration logic run against real clocks on a device
//! and against controllable clocks in tests.

pub mod time;

pub use time::TimeSource;

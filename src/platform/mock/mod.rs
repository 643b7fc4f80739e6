//! Mock platform implementation
//!
//! In-memory implementations of every platform trait, with failure
//! injection and inspection helpers. Used by unit tests, the integration
//! tests under `tests/` and the `torchlight_sim` binary, so the module is
//! always compiled.
//!
//! # Example
//!
//! ```
//! use torchlight::platform::mock::MockPlatform;
//! use torchlight::platform::traits::{Platform, TorchInterface};
//!
//! let mut platform = MockPlatform::new();
//! platform.torch().set_torch(true).unwrap();
//! assert!(platform.torch_ref().is_on());
//! ```

mod clock;
mod microphone;
mod platform;
mod sensor;
mod storage;
mod torch;

pub use clock::MockClock;
pub use microphone::MockMicrophone;
pub use platform::MockPlatform;
pub use sensor::MockSensorHub;
pub use storage::MockStorage;
pub use torch::MockTorch;

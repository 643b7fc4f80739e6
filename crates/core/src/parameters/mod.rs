//! Settings parameters
//!
//! Integer settings with defaults and bounds, the settings-form validation
//! contract, and the binary block used to persist them.
//!
//! Persistence itself (file, preferences store) lives in the host crate.

pub mod block;
pub mod crc;
pub mod error;
pub mod registry;
pub mod settings;

pub use block::{decode_settings, encode_settings, hash_param_name, BLOCK_MAX_SIZE};
pub use crc::{calculate_crc32, validate_crc32};
pub use error::ParameterError;
pub use registry::{ParamMetadata, SettingKey};
pub use settings::{FormOutcome, InvalidFields, Settings, SettingsForm, SettingsUpdate};

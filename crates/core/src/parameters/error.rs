//! Parameter error types

use super::registry::SettingKey;
use core::fmt;

/// Errors from settings validation and block decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// Value outside the key's bounds
    OutOfRange { key: SettingKey, value: u32 },
    /// Output buffer cannot hold the block
    BufferTooSmall,
    /// Block shorter than its header or declared entries
    Truncated,
    /// Magic number mismatch
    BadMagic,
    /// Block written by an unknown format version
    UnsupportedVersion(u16),
    /// Stored CRC does not match the block contents
    CrcMismatch,
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterError::OutOfRange { key, value } => {
                let meta = key.metadata();
                write!(
                    f,
                    "{} = {} outside {}..={}",
                    key.name(),
                    value,
                    meta.min,
                    meta.max
                )
            }
            ParameterError::BufferTooSmall => write!(f, "settings buffer too small"),
            ParameterError::Truncated => write!(f, "settings block truncated"),
            ParameterError::BadMagic => write!(f, "settings block magic mismatch"),
            ParameterError::UnsupportedVersion(v) => {
                write!(f, "unsupported settings block version {}", v)
            }
            ParameterError::CrcMismatch => write!(f, "settings block CRC mismatch"),
        }
    }
}

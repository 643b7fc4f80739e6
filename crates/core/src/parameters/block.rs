//! Settings block format
//!
//! ```text
//! [magic "TRCH"][version u16][count u16]
//! count x [fnv1a(name) u32][value u32]
//! [crc32 u32]
//! ```
//!
//! All fields little-endian. The CRC covers the header and the entries.

use super::crc::{calculate_crc32, validate_crc32};
use super::error::ParameterError;
use super::registry::SettingKey;
use super::settings::{Settings, SettingsUpdate};

/// Block magic number (ASCII "TRCH")
pub const BLOCK_MAGIC: [u8; 4] = *b"TRCH";

/// Block format version
pub const BLOCK_VERSION: u16 = 1;

const HEADER_SIZE: usize = 8;
const ENTRY_SIZE: usize = 8;
const CRC_SIZE: usize = 4;

/// Size of a block holding every setting
pub const BLOCK_MAX_SIZE: usize = HEADER_SIZE + SettingKey::COUNT * ENTRY_SIZE + CRC_SIZE;

/// Hash parameter name using FNV-1a
pub fn hash_param_name(name: &str) -> u32 {
    const FNV_OFFSET_BASIS: u32 = 2166136261;
    const FNV_PRIME: u32 = 16777619;

    name.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ byte as u32).wrapping_mul(FNV_PRIME)
    })
}

fn read_u16(buf: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

fn read_u32(buf: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

/// Serialize every setting into `buf`, returning the number of bytes written
pub fn encode_settings(settings: &Settings, buf: &mut [u8]) -> Result<usize, ParameterError> {
    if buf.len() < BLOCK_MAX_SIZE {
        return Err(ParameterError::BufferTooSmall);
    }

    buf[0..4].copy_from_slice(&BLOCK_MAGIC);
    buf[4..6].copy_from_slice(&BLOCK_VERSION.to_le_bytes());
    buf[6..8].copy_from_slice(&(SettingKey::COUNT as u16).to_le_bytes());

    let mut offset = HEADER_SIZE;
    for key in SettingKey::ALL {
        buf[offset..offset + 4].copy_from_slice(&hash_param_name(key.name()).to_le_bytes());
        buf[offset + 4..offset + 8].copy_from_slice(&settings.get(key).to_le_bytes());
        offset += ENTRY_SIZE;
    }

    let crc = calculate_crc32(&buf[..offset]);
    buf[offset..offset + CRC_SIZE].copy_from_slice(&crc.to_le_bytes());
    Ok(offset + CRC_SIZE)
}

/// Parse a block back into settings
///
/// A structurally broken block is an error. Inside a valid block, unknown
/// keys are skipped and out-of-range values leave the default in place.
pub fn decode_settings(buf: &[u8]) -> Result<Settings, ParameterError> {
    if buf.len() < HEADER_SIZE + CRC_SIZE {
        return Err(ParameterError::Truncated);
    }
    if buf[0..4] != BLOCK_MAGIC {
        return Err(ParameterError::BadMagic);
    }
    let version = read_u16(buf, 4);
    if version != BLOCK_VERSION {
        return Err(ParameterError::UnsupportedVersion(version));
    }

    let count = read_u16(buf, 6) as usize;
    let body_len = HEADER_SIZE + count * ENTRY_SIZE;
    if buf.len() < body_len + CRC_SIZE {
        return Err(ParameterError::Truncated);
    }
    if !validate_crc32(&buf[..body_len], read_u32(buf, body_len)) {
        return Err(ParameterError::CrcMismatch);
    }

    let mut update = SettingsUpdate::default();
    for entry in buf[HEADER_SIZE..body_len].chunks_exact(ENTRY_SIZE) {
        let hash = read_u32(entry, 0);
        let value = read_u32(entry, 4);
        let Some(key) = SettingKey::ALL
            .into_iter()
            .find(|k| hash_param_name(k.name()) == hash)
        else {
            continue;
        };
        if key.metadata().is_valid(value) {
            update.insert(key, value);
        }
    }

    let mut settings = Settings::default();
    settings.merge(&update);
    Ok(settings)
}

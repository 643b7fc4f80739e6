//! CRC32 calculation for settings block validation

use crc::{Crc, CRC_32_ISO_HDLC};

/// CRC32 algorithm (ISO HDLC / Ethernet / ZIP)
const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Calculate CRC32 checksum of data
pub fn calculate_crc32(data: &[u8]) -> u32 {
    CRC32.checksum(data)
}

/// Validate data against CRC32 checksum
///
/// # Example
///
/// ```
/// use torchlight_core::parameters::{calculate_crc32, validate_crc32};
///
/// let data = b"flickerFlashlightHz";
/// let crc = calculate_crc32(data);
/// assert!(validate_crc32(data, crc));
/// assert!(!validate_crc32(data, crc ^ 1));
/// ```
pub fn validate_crc32(data: &[u8], expected_crc: u32) -> bool {
    calculate_crc32(data) == expected_crc
}

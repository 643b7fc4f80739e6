//! Sensor reading conversions
//!
//! Raw platform readings to the values the triggers compare against.

/// Standard sea-level pressure in hPa
pub const PRESSURE_STANDARD_ATMOSPHERE: f32 = 1013.25;

/// Battery charge in percent from a level/scale pair
///
/// Returns `None` when the scale is zero (unknown battery state).
pub fn battery_percent(level: u32, scale: u32) -> Option<u8> {
    if scale == 0 {
        return None;
    }
    let pct = (level.min(scale) as u64 * 100) / scale as u64;
    Some(pct as u8)
}

/// Altitude in meters from static pressure in hPa
///
/// International barometric formula relative to the standard atmosphere.
pub fn altitude_from_pressure(pressure_hpa: f32) -> f32 {
    44330.0 * (1.0 - libm::powf(pressure_hpa / PRESSURE_STANDARD_ATMOSPHERE, 1.0 / 5.255))
}

/// Tilt in degrees between the device z axis and vertical
///
/// Takes the vector part of a unit rotation-vector quaternion. A phone lying
/// flat reports 0°, upright reports 90°, face down 180°.
pub fn tilt_from_rotation_vector(x: f32, y: f32, _z: f32) -> f32 {
    // z component of the rotated z axis: R[2][2] = 1 - 2(x² + y²)
    let r22 = (1.0 - 2.0 * (x * x + y * y)).clamp(-1.0, 1.0);
    libm::acosf(r22).to_degrees()
}

//! Sensor hub trait and sensor event types

use crate::platform::Result;

/// Kind of listener a feature registers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    /// Rotation vector (tilt trigger)
    RotationVector,
    /// Barometric pressure (altitude trigger)
    Pressure,
    /// Battery level broadcasts
    Battery,
    /// Connectivity change broadcasts
    Connectivity,
    /// Call state changes
    CallState,
    /// Incoming SMS broadcasts
    Sms,
}

/// Opaque listener registration id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u32);

/// Telephony call state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Idle,
    Ringing,
    OffHook,
}

/// A reading or broadcast delivered to the arbiter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorEvent {
    /// Rotation vector components (unit quaternion x/y/z)
    Rotation { x: f32, y: f32, z: f32 },
    /// Pressure in hPa
    Pressure { hpa: f32 },
    /// Battery level over scale
    Battery { level: u32, scale: u32 },
    /// Connectivity report
    Connectivity { connected: bool },
    CallState(CallState),
    SmsReceived,
}

impl SensorEvent {
    /// Listener kind that delivers this event
    pub fn kind(&self) -> SensorKind {
        match self {
            SensorEvent::Rotation { .. } => SensorKind::RotationVector,
            SensorEvent::Pressure { .. } => SensorKind::Pressure,
            SensorEvent::Battery { .. } => SensorKind::Battery,
            SensorEvent::Connectivity { .. } => SensorKind::Connectivity,
            SensorEvent::CallState(_) => SensorKind::CallState,
            SensorEvent::SmsReceived => SensorKind::Sms,
        }
    }
}

/// Sensor and broadcast registration service
///
/// Cheap to clone: a clone is another handle onto the same service, which
/// lets a [`ListenerGuard`](crate::arbiter::ListenerGuard) unregister itself
/// on drop.
pub trait SensorHub: Clone {
    /// Start delivering events of `kind`
    ///
    /// # Errors
    ///
    /// `PlatformError::Sensor(SensorError::NotPresent)` if the device has no
    /// such sensor.
    fn register(&self, kind: SensorKind) -> Result<ListenerId>;

    /// Stop delivering events for `id`; unknown ids are ignored
    fn unregister(&self, id: ListenerId);
}

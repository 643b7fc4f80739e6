//! Platform error types
//!
//! Every platform implementation maps its own failures onto these variants.

use super::traits::Permission;
use thiserror::Error;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Torch call failed
    #[error("torch error: {0}")]
    Torch(TorchError),
    /// Sensor registration failed
    #[error("sensor error: {0}")]
    Sensor(SensorError),
    /// Settings storage failed
    #[error("storage error: {0}")]
    Storage(StorageError),
    /// User has not granted the permission
    #[error("permission denied: {0}")]
    PermissionDenied(Permission),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Torch-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TorchError {
    /// Camera held by another client
    #[error("camera in use")]
    CameraInUse,
    /// Camera service disconnected
    #[error("camera disconnected")]
    Disconnected,
    /// Any other failure reported by the camera service
    #[error("torch call failed")]
    Failed,
}

/// Sensor-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SensorError {
    /// No sensor of the requested kind
    #[error("no such sensor")]
    NotPresent,
    /// The sensor service refused the listener
    #[error("listener registration rejected")]
    RegistrationRejected,
    /// Microphone could not be opened or read
    #[error("audio capture failed")]
    AudioCapture,
}

/// Storage-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Nothing stored yet
    #[error("no stored settings")]
    Empty,
    /// Write rejected by the backing store
    #[error("write failed")]
    WriteFailed,
}

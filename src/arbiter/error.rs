//! Arbiter error types

use crate::platform::{Permission, PlatformError};
use thiserror::Error;
use torchlight_core::feature::{Feature, RequestError};
use torchlight_core::scheduler::SchedulerError;

/// Why an arbiter operation did not take effect
#[derive(Debug, Error)]
pub enum ArbiterError {
    /// Device lacks hardware the feature needs
    #[error("{0} is not available on this device")]
    HardwareUnavailable(Feature),

    /// Required runtime permission not granted
    #[error("{feature} needs the {permission} permission")]
    PermissionDenied {
        feature: Feature,
        permission: Permission,
    },

    /// Current owner is not preempted by the requested feature
    #[error("{requested} blocked by active {owner}")]
    Busy { requested: Feature, owner: Feature },

    /// Request parameters rejected
    #[error("invalid request: {0}")]
    InvalidRequest(RequestError),

    /// No room left in the timer queue
    #[error("{0}")]
    Scheduler(SchedulerError),

    /// A platform call failed while starting the feature; it was rolled back
    #[error("{feature} failed to start: {source}")]
    StartFailed {
        feature: Feature,
        source: PlatformError,
    },

    /// Direct torch call failed
    #[error(transparent)]
    Platform(#[from] PlatformError),
}

impl From<RequestError> for ArbiterError {
    fn from(err: RequestError) -> Self {
        ArbiterError::InvalidRequest(err)
    }
}

impl From<SchedulerError> for ArbiterError {
    fn from(err: SchedulerError) -> Self {
        ArbiterError::Scheduler(err)
    }
}

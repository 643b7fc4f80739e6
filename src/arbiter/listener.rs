//! Scoped sensor listener registrations

use crate::platform::{ListenerId, Result, SensorHub, SensorKind};

/// A live listener registration
///
/// Unregisters itself when dropped, so a feature releases its listener on
/// every exit path: deactivation, preemption, a failed start and teardown.
#[derive(Debug)]
pub struct ListenerGuard<S: SensorHub> {
    hub: S,
    id: ListenerId,
    kind: SensorKind,
}

impl<S: SensorHub> ListenerGuard<S> {
    /// Register a listener of `kind` on `hub`
    pub fn register(hub: &S, kind: SensorKind) -> Result<Self> {
        let id = hub.register(kind)?;
        crate::log_debug!("listener {:?} registered for {:?}", id, kind);
        Ok(Self {
            hub: hub.clone(),
            id,
            kind,
        })
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl<S: SensorHub> Drop for ListenerGuard<S> {
    fn drop(&mut self) {
        self.hub.unregister(self.id);
        crate::log_debug!("listener {:?} released", self.id);
    }
}

//! Mock sensor hub for testing

use crate::platform::{
    error::{PlatformError, SensorError},
    traits::{ListenerId, SensorHub, SensorKind},
    Result,
};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Default)]
struct HubState {
    next_id: u32,
    active: HashMap<ListenerId, SensorKind>,
    missing: Vec<SensorKind>,
    registrations: usize,
}

/// Mock sensor hub
///
/// Tracks live registrations. Clones share state, matching the way a
/// `ListenerGuard` keeps its own handle onto the hub.
#[derive(Debug, Clone, Default)]
pub struct MockSensorHub {
    state: Rc<RefCell<HubState>>,
}

impl MockSensorHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make registrations of `kind` fail with `NotPresent`
    pub fn remove_sensor(&self, kind: SensorKind) {
        self.state.borrow_mut().missing.push(kind);
    }

    /// Number of live listeners
    pub fn active_count(&self) -> usize {
        self.state.borrow().active.len()
    }

    /// Whether a listener of `kind` is registered
    pub fn is_registered(&self, kind: SensorKind) -> bool {
        self.state.borrow().active.values().any(|k| *k == kind)
    }

    /// Total successful registrations since creation
    pub fn registration_count(&self) -> usize {
        self.state.borrow().registrations
    }
}

impl SensorHub for MockSensorHub {
    fn register(&self, kind: SensorKind) -> Result<ListenerId> {
        let mut state = self.state.borrow_mut();
        if state.missing.contains(&kind) {
            return Err(PlatformError::Sensor(SensorError::NotPresent));
        }
        let id = ListenerId(state.next_id);
        state.next_id += 1;
        state.registrations += 1;
        state.active.insert(id, kind);
        Ok(id)
    }

    fn unregister(&self, id: ListenerId) {
        self.state.borrow_mut().active.remove(&id);
    }
}

//! Outbound arbiter events
//!
//! The [`FeatureArbiter`](super::FeatureArbiter) reports every state change
//! through the [`EventSink`] port. Adapters on the other side decide what to
//! do with them: redraw an icon, show a banner, open a permission prompt,
//! or just log.

use crate::platform::Permission;
use std::cell::RefCell;
use std::rc::Rc;
use torchlight_core::feature::{Feature, FeatureSet, IconState};

/// Structured events emitted by the arbiter
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArbiterEvent {
    /// A feature's icon changed
    FeatureChanged { feature: Feature, icon: IconState },

    /// The torch was switched
    TorchChanged { on: bool },

    /// Features disabled for missing hardware; emitted once at startup
    HardwareUnavailable { features: FeatureSet },

    /// Activation refused until the user grants `permission`
    PermissionRequired {
        feature: Feature,
        permission: Permission,
    },

    /// A threshold trigger captured its first reading
    ThresholdBaseline { feature: Feature, baseline: f32 },

    /// A conditional trigger fired and started flickering
    TriggerFired { feature: Feature },
}

/// Receiver of arbiter events
pub trait EventSink {
    fn emit(&mut self, event: ArbiterEvent);
}

/// Sink that writes every event to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: ArbiterEvent) {
        match event {
            ArbiterEvent::FeatureChanged { feature, icon } => {
                crate::log_info!("{} -> {:?}", feature, icon);
            }
            ArbiterEvent::TorchChanged { on } => {
                crate::log_debug!("torch {}", if on { "on" } else { "off" });
            }
            ArbiterEvent::HardwareUnavailable { features } => {
                for feature in features.features() {
                    crate::log_warn!("{} unavailable on this device", feature);
                }
            }
            ArbiterEvent::PermissionRequired {
                feature,
                permission,
            } => {
                crate::log_warn!("{} needs permission: {}", feature, permission);
            }
            ArbiterEvent::ThresholdBaseline { feature, baseline } => {
                crate::log_info!("{} baseline {:.1}", feature, baseline);
            }
            ArbiterEvent::TriggerFired { feature } => {
                crate::log_info!("{} trigger fired", feature);
            }
        }
    }
}

/// Sink that keeps every event for later inspection
///
/// Clones share the recorded list.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    events: Rc<RefCell<Vec<ArbiterEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ArbiterEvent> {
        self.events.borrow().clone()
    }

    /// Remove and return everything recorded so far
    pub fn take(&self) -> Vec<ArbiterEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn contains(&self, event: &ArbiterEvent) -> bool {
        self.events.borrow().contains(event)
    }

    /// Number of recorded events matching `pred`
    pub fn count(&self, pred: impl Fn(&ArbiterEvent) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: ArbiterEvent) {
        self.events.borrow_mut().push(event);
    }
}

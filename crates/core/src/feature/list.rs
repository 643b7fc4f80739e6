//! Activated-features list
//!
//! Display-side mirror of the arbitration state: features are appended when
//! they become active and removed by value when they stop.

use super::Feature;
use heapless::Vec;

/// Ordered list of features currently shown as active
#[derive(Debug, Clone, Default)]
pub struct ActivatedFeatureList {
    entries: Vec<Feature, { Feature::COUNT }>,
}

impl ActivatedFeatureList {
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Append `feature`; no-op if already listed
    pub fn push(&mut self, feature: Feature) {
        if self.contains(feature) {
            return;
        }
        // Capacity equals the number of distinct features, so this cannot fail.
        let _ = self.entries.push(feature);
    }

    /// Remove `feature`, keeping the order of the others
    pub fn remove(&mut self, feature: Feature) -> bool {
        match self.entries.iter().position(|f| *f == feature) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, feature: Feature) -> bool {
        self.entries.contains(&feature)
    }

    pub fn as_slice(&self) -> &[Feature] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

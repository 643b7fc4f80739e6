//! Preemption table
//!
//! Maps each feature to the set of features it revokes when it is activated.
//! All exclusivity rules live here so they can be audited and validated in
//! one place.
//!
//! The default table makes every torch-driving feature mutually exclusive:
//! they all compete for the single torch.

use super::{Feature, FeatureSet};

/// Static feature → preempted-set table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreemptionTable {
    rules: [FeatureSet; Feature::COUNT],
}

impl PreemptionTable {
    /// Table where every feature preempts every other feature
    pub const fn exclusive() -> Self {
        let mut rules = [FeatureSet::empty(); Feature::COUNT];
        let mut i = 0;
        while i < Feature::COUNT {
            let own = FeatureSet::from_bits_truncate(1 << i);
            rules[i] = FeatureSet::all().difference(own);
            i += 1;
        }
        Self { rules }
    }

    /// Table where nothing preempts anything
    pub const fn empty() -> Self {
        Self {
            rules: [FeatureSet::empty(); Feature::COUNT],
        }
    }

    /// Replace the preempted set of `feature`
    ///
    /// A feature never preempts itself; re-activation is handled as a restart.
    pub fn with_rule(mut self, feature: Feature, preempts: FeatureSet) -> Self {
        self.rules[feature.index()] = preempts.difference(feature.flag());
        self
    }

    /// Features revoked when `feature` activates
    pub fn preempted_by(&self, feature: Feature) -> FeatureSet {
        self.rules[feature.index()]
    }

    /// Whether activating `by` may revoke `victim`
    pub fn preempts(&self, by: Feature, victim: Feature) -> bool {
        self.preempted_by(by).has(victim)
    }

    /// Pairs where `a` preempts `b` but `b` does not preempt `a`
    ///
    /// An asymmetric pair means the activation order decides whether the
    /// second request is honoured or refused.
    pub fn asymmetric_pairs(&self) -> impl Iterator<Item = (Feature, Feature)> + '_ {
        Feature::ALL.into_iter().flat_map(move |a| {
            Feature::ALL
                .into_iter()
                .filter(move |b| self.preempts(a, *b) && !self.preempts(*b, a))
                .map(move |b| (a, b))
        })
    }

    /// True when every pair of features preempt each other both ways
    pub fn is_fully_exclusive(&self) -> bool {
        Feature::ALL
            .iter()
            .all(|f| self.preempted_by(*f) == FeatureSet::all().difference(f.flag()))
    }
}

impl Default for PreemptionTable {
    fn default() -> Self {
        Self::exclusive()
    }
}

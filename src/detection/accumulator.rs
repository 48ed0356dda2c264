use crate::catalog::FeatureDescriptor;
use std::collections::HashMap;

/// Features confirmed as used during one build session
///
/// The set only ever grows. Insertion order is detection order.
#[derive(Debug, Clone, Default)]
pub struct DetectionState {
    used: HashMap<String, bool>,
    confirmed: Vec<FeatureDescriptor>,
}

impl DetectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records newly confirmed features, ignoring ones already known
    ///
    /// Returns how many were actually added.
    pub fn record<I>(&mut self, features: I) -> usize
    where
        I: IntoIterator<Item = FeatureDescriptor>,
    {
        let mut added = 0;
        for feature in features {
            let key = feature.key();
            if self.used.get(&key).copied().unwrap_or(false) {
                continue;
            }
            self.used.insert(key, true);
            self.confirmed.push(feature);
            added += 1;
        }
        added
    }

    pub fn is_confirmed(&self, feature: &FeatureDescriptor) -> bool {
        self.used.get(&feature.key()).copied().unwrap_or(false)
    }

    pub fn confirmed(&self) -> &[FeatureDescriptor] {
        &self.confirmed
    }

    pub fn into_confirmed(self) -> Vec<FeatureDescriptor> {
        self.confirmed
    }

    pub fn len(&self) -> usize {
        self.confirmed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.confirmed.is_empty()
    }
}

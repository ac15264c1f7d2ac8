//! Deterministic split-id suffixes for the additional splits of a system
//! image.

use crate::split::ModuleSplit;
use std::collections::BTreeSet;

/// Hands out a stable suffix per (module, targeting). When two splits derive
/// the same suffix, later ones get a numeric discriminator, in first-come
/// order, so repeated runs over the same input produce identical ids.
#[derive(Debug, Default)]
pub struct SuffixManager {
    used: BTreeSet<String>,
}

impl SuffixManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The suffix for this split's targeting, unique within this manager.
    pub fn suffix_for(&mut self, split: &ModuleSplit) -> String {
        let base = split.apk_targeting.suffix();
        let mut candidate = base.clone();
        let mut discriminator = 1;
        while !self.used.insert(format!("{}:{candidate}", split.module_name)) {
            candidate = format!("{base}_{discriminator}");
            discriminator += 1;
        }
        candidate
    }
}

//! Total preference order over variants, used by device matching and by the
//! deterministic emission order of the pipeline.
//!
//! Comparison order: SDK ascending (none < any), then ABI by architecture
//! order (missing < any), then screen density ascending (missing < any).
//! Ties keep stable iteration order.

use crate::targeting::{Abi, VariantTargeting};
use std::cmp::Ordering;

/// The ordered key a variant sorts by: (min SDK, min ABI, min density dpi).
/// `None` sorts before any present value in every position.
pub fn variant_sort_key(targeting: &VariantTargeting) -> (Option<u32>, Option<Abi>, Option<u16>) {
    (
        targeting.sdk_version.min_value().copied(),
        targeting.abi.min_value().copied(),
        targeting
            .screen_density
            .min_value()
            .map(|bucket| bucket.dpi()),
    )
}

pub fn compare_variants(a: &VariantTargeting, b: &VariantTargeting) -> Ordering {
    variant_sort_key(a).cmp(&variant_sort_key(b))
}

//! Effective optimization directives: version-pinned defaults reconciled
//! with developer configuration and command-line overrides.

mod defaults;

#[cfg(test)]
mod optimizations_test;

pub use defaults::defaults_for_version;

use crate::bundle::{BundleConfig, SuffixStrippingConfig};
use crate::error::Result;
use crate::targeting::TargetingDimension;
use std::collections::{BTreeMap, BTreeSet};

/// The resolved set of directives the pipeline runs with.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApkOptimizations {
    pub split_dimensions: BTreeSet<TargetingDimension>,
    pub standalone_dimensions: BTreeSet<TargetingDimension>,
    /// Suffix stripping directives for the suffixed dimensions.
    pub suffix_strippings: BTreeMap<TargetingDimension, SuffixStrippingConfig>,
    pub uncompress_native_libraries: bool,
    pub uncompress_dex_files: bool,
    pub uncompressed_dex_target_sdk: Option<u32>,
}

impl ApkOptimizations {
    /// Universal APK mode: no splitting, no standalone dimensions.
    pub fn universal() -> Self {
        Self::default()
    }
}

/// Computes the effective optimizations.
///
/// 1. Version-pinned defaults are looked up by floor entry on the version of
///    the tool that built the bundle.
/// 2. Developer split-dimension toggles add to or (negated) remove from the
///    default set.
/// 3. A non-empty command-line override replaces the split dimensions
///    entirely (legacy behavior).
/// 4. Uncompression flags: the developer value wins when explicitly set.
pub fn merge_optimizations(
    config: &BundleConfig,
    override_split_dimensions: Option<&BTreeSet<TargetingDimension>>,
) -> Result<ApkOptimizations> {
    let defaults = defaults_for_version(&config.version()?);
    let developer = &config.optimizations;

    let mut split_dimensions = defaults.split_dimensions.clone();
    let mut suffix_strippings = defaults.suffix_strippings.clone();
    for toggle in &developer.splits_config.split_dimension {
        if toggle.negate {
            split_dimensions.remove(&toggle.value);
            suffix_strippings.remove(&toggle.value);
        } else {
            split_dimensions.insert(toggle.value);
            if let Some(stripping) = &toggle.suffix_stripping {
                suffix_strippings.insert(toggle.value, stripping.clone());
            }
        }
    }

    if let Some(override_dimensions) = override_split_dimensions
        && !override_dimensions.is_empty()
    {
        split_dimensions = override_dimensions.clone();
    }

    let mut standalone_dimensions = defaults.standalone_dimensions.clone();
    for toggle in &developer.standalone_config.split_dimension {
        if toggle.negate {
            standalone_dimensions.remove(&toggle.value);
        } else {
            standalone_dimensions.insert(toggle.value);
        }
    }

    let uncompress_native_libraries = developer
        .uncompress_native_libraries
        .unwrap_or(defaults.uncompress_native_libraries);
    let (uncompress_dex_files, uncompressed_dex_target_sdk) = match developer.uncompress_dex_files {
        Some(dex) => (dex.enabled, dex.uncompressed_dex_target_sdk),
        None => (
            defaults.uncompress_dex_files,
            defaults.uncompressed_dex_target_sdk,
        ),
    };

    Ok(ApkOptimizations {
        split_dimensions,
        standalone_dimensions,
        suffix_strippings,
        uncompress_native_libraries,
        uncompress_dex_files,
        uncompressed_dex_target_sdk,
    })
}

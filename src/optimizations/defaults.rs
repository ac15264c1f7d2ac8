//! Version-pinned optimization defaults.
//!
//! The table is keyed by the tool version that introduced each default and
//! only ever grows. A bundle built by version V resolves to the greatest
//! key ≤ V (floor entry).

use crate::optimizations::ApkOptimizations;
use crate::targeting::TargetingDimension;
use semver::Version;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

static DEFAULTS: LazyLock<BTreeMap<Version, ApkOptimizations>> = LazyLock::new(|| {
    let mut table = BTreeMap::new();

    // The original split dimensions.
    table.insert(
        Version::new(0, 0, 0),
        ApkOptimizations {
            split_dimensions: BTreeSet::from([
                TargetingDimension::Abi,
                TargetingDimension::ScreenDensity,
                TargetingDimension::Language,
            ]),
            standalone_dimensions: BTreeSet::from([
                TargetingDimension::Abi,
                TargetingDimension::ScreenDensity,
            ]),
            ..ApkOptimizations::default()
        },
    );

    // Native libraries ship uncompressed from 0.10.1 on.
    let base = table[&Version::new(0, 0, 0)].clone();
    table.insert(
        Version::new(0, 10, 1),
        ApkOptimizations {
            uncompress_native_libraries: true,
            ..base
        },
    );

    // Dex files ship uncompressed from 1.11.3 on.
    let base = table[&Version::new(0, 10, 1)].clone();
    table.insert(
        Version::new(1, 11, 3),
        ApkOptimizations {
            uncompress_dex_files: true,
            ..base
        },
    );

    // 1.13.2 restricts uncompressed dex to devices where ART page-aligns
    // (SDK 29+).
    let base = table[&Version::new(1, 11, 3)].clone();
    table.insert(
        Version::new(1, 13, 2),
        ApkOptimizations {
            uncompressed_dex_target_sdk: Some(29),
            ..base
        },
    );

    table
});

/// The defaults for a bundle built by the given tool version.
pub fn defaults_for_version(version: &Version) -> ApkOptimizations {
    DEFAULTS
        .range(..=version.clone())
        .next_back()
        .map(|(_, defaults)| defaults.clone())
        // All real versions sit above 0.0.0; this is the safety net.
        .unwrap_or_else(|| DEFAULTS[&Version::new(0, 0, 0)].clone())
}

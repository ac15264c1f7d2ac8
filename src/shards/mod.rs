//! Standalone and system APK generation: collapsing splits from every
//! module into single-file APKs.

mod suffix_manager;
mod system;


pub use suffix_manager::SuffixManager;
pub use system::generate_system_apks;

use crate::bundle::{AppBundle, BundleModule, ModuleEntry};
use crate::error::{Error, Result};
use crate::merge::merge_same_targeting;
use crate::optimizations::ApkOptimizations;
use crate::resources::ResourceTable;
use crate::split::{ModuleSplit, SplitType};
use crate::splitters::split_module;
use crate::targeting::{
    Abi, ApkTargeting, DensityBucket, DimensionTargeting, TargetingDimension, VariantTargeting,
};
use log::warn;
use std::collections::BTreeSet;
use strum::IntoEnumIterator;

/// Generates the standalone APKs for pre-L devices: one per cell of the
/// ABI × screen-density cross product of the enabled shard dimensions.
/// Universal mode collapses the cross product into a single cell.
pub fn generate_standalone_shards(
    bundle: &AppBundle,
    optimizations: &ApkOptimizations,
    universal: bool,
) -> Result<Vec<ModuleSplit>> {
    let strip_64_bit = !universal
        && bundle
            .config()
            .optimizations
            .standalone_config
            .strip_64_bit_libraries;

    let mut modules: Vec<BundleModule> = bundle.modules().cloned().collect();
    if strip_64_bit {
        modules = modules.into_iter().map(strip_64_bit_libraries).collect();
    }

    let dimensions = if universal {
        BTreeSet::new()
    } else {
        optimizations.standalone_dimensions.clone()
    };

    let abi_cells = abi_cells(&modules, &dimensions);
    let density_cells = density_cells(&modules, &dimensions);

    let mut shards = Vec::new();
    for abi in &abi_cells {
        for density in &density_cells {
            shards.push(generate_shard(bundle, &modules, &dimensions, *abi, *density)?);
        }
    }
    Ok(shards)
}

fn abi_cells(modules: &[BundleModule], dimensions: &BTreeSet<TargetingDimension>) -> Vec<Option<Abi>> {
    if !dimensions.contains(&TargetingDimension::Abi) {
        return vec![None];
    }
    let abis: BTreeSet<Abi> = modules
        .iter()
        .flat_map(|module| module.entries_under("lib/"))
        .filter_map(|entry| {
            entry
                .path()
                .strip_prefix("lib/")
                .and_then(|rest| rest.split('/').next())
                .and_then(Abi::from_dir_name)
        })
        .collect();
    if abis.is_empty() {
        return vec![None];
    }
    abis.into_iter().map(Some).collect()
}

fn density_cells(
    modules: &[BundleModule],
    dimensions: &BTreeSet<TargetingDimension>,
) -> Vec<Option<DensityBucket>> {
    if !dimensions.contains(&TargetingDimension::ScreenDensity) {
        return vec![None];
    }
    let has_density_resources = modules.iter().any(|module| {
        module.resource_table().is_some_and(|table| {
            table
                .filter_configs(|config| config.density.bucket().is_some())
                .is_some()
        })
    });
    if !has_density_resources {
        return vec![None];
    }
    DensityBucket::iter().map(Some).collect()
}

/// One cell: split every module, keep the splits matching the cell, fuse
/// them per module, then across modules.
fn generate_shard(
    bundle: &AppBundle,
    modules: &[BundleModule],
    dimensions: &BTreeSet<TargetingDimension>,
    abi: Option<Abi>,
    density: Option<DensityBucket>,
) -> Result<ModuleSplit> {
    let mut merged_modules: Vec<ModuleSplit> = Vec::new();
    for module in modules {
        let splits = split_module(module, SplitType::Standalone, dimensions, None)?;
        let selected: Vec<ModuleSplit> = splits
            .into_iter()
            .filter(|split| split_matches_cell(split, abi, density))
            .collect();
        merged_modules.push(fuse_module_splits(module, selected)?);
    }

    let base = bundle.base_module()?;
    let fused = fuse_across_modules(base, &merged_modules)?;

    let mut apk_targeting = ApkTargeting::default();
    let mut variant_targeting = VariantTargeting {
        // Standalones serve devices below the split-capable SDK.
        sdk_version: DimensionTargeting::value(1),
        ..VariantTargeting::default()
    };
    if let Some(abi) = abi {
        apk_targeting.abi = DimensionTargeting::value(abi);
        variant_targeting.abi = DimensionTargeting::value(abi);
    }
    if let Some(density) = density {
        apk_targeting.screen_density = DimensionTargeting::value(density);
        variant_targeting.screen_density = DimensionTargeting::value(density);
    }

    Ok(fused
        .with_apk_targeting(apk_targeting)
        .with_variant_targeting(variant_targeting))
}

fn split_matches_cell(split: &ModuleSplit, abi: Option<Abi>, density: Option<DensityBucket>) -> bool {
    let abi_targeting = &split.apk_targeting.abi;
    if abi_targeting.has_values() {
        match abi {
            Some(abi) if abi_targeting.values().contains(&abi) => {}
            _ => return false,
        }
    }
    // Sanitizer splits never enter standalone shards.
    if split.apk_targeting.sanitizer.has_values() {
        return false;
    }
    let density_targeting = &split.apk_targeting.screen_density;
    if density_targeting.has_values() {
        match density {
            Some(density) if density_targeting.values().contains(&density) => {}
            _ => return false,
        }
    }
    true
}

/// Fuses one module's selected splits into a single module-scoped split via
/// the same-targeting merger. Resource tables are pre-merged and manifests
/// reset to the module manifest, since dimension splits intentionally
/// diverge on both.
fn fuse_module_splits(module: &BundleModule, splits: Vec<ModuleSplit>) -> Result<ModuleSplit> {
    if splits.is_empty() {
        return Err(Error::internal(format!(
            "module '{}' contributed no splits to a shard",
            module.name()
        )));
    }

    let merged_table = ResourceTable::merged(
        splits
            .iter()
            .filter_map(|split| split.resource_table.as_ref()),
    );

    let normalized: Vec<ModuleSplit> = splits
        .iter()
        .enumerate()
        .map(|(index, split)| {
            split
                .with_master_split(true)
                .with_apk_targeting(ApkTargeting::default())
                .with_variant_targeting(VariantTargeting::default())
                .with_manifest(module.manifest().clone())
                .with_resource_table(if index == 0 { merged_table.clone() } else { None })
        })
        .collect();

    let mut merged = merge_same_targeting(normalized)?;
    debug_assert_eq!(merged.len(), 1);
    Ok(merged.remove(0))
}

/// Fuses the per-module splits into one standalone split. The manifest is
/// the base module's, with split identity attributes removed.
fn fuse_across_modules(base: &BundleModule, modules: &[ModuleSplit]) -> Result<ModuleSplit> {
    let mut entries: Vec<ModuleEntry> = Vec::new();
    for module_split in modules {
        for entry in &module_split.entries {
            if entries.iter().any(|existing| existing.path() == entry.path()) {
                warn!(
                    "duplicate entry '{}' while fusing modules into a shard, keeping first",
                    entry.path()
                );
                continue;
            }
            entries.push(entry.clone());
        }
    }

    let merged_table = ResourceTable::merged(
        modules
            .iter()
            .filter_map(|split| split.resource_table.as_ref()),
    );
    let manifest = base.manifest().edit().remove_split_name().finish();

    let mut fused = ModuleSplit::master_of(base, SplitType::Standalone);
    fused = fused
        .with_manifest(manifest)
        .with_resource_table(merged_table)
        .with_entries(entries)
        .with_native_config(None)
        .with_apex_config(None);
    Ok(fused)
}

/// Drops 64-bit native directories when the publisher directed it.
fn strip_64_bit_libraries(module: BundleModule) -> BundleModule {
    let has_32_bit = module.entries_under("lib/").any(|entry| {
        entry
            .path()
            .strip_prefix("lib/")
            .and_then(|rest| rest.split('/').next())
            .and_then(Abi::from_dir_name)
            .is_some_and(|abi| !abi.is_64_bit())
    });
    // Stripping everything would leave the app without native code.
    if !has_32_bit {
        return module;
    }

    let entries: Vec<ModuleEntry> = module
        .entries()
        .filter(|entry| {
            entry
                .path()
                .strip_prefix("lib/")
                .and_then(|rest| rest.split('/').next())
                .and_then(Abi::from_dir_name)
                .is_none_or(|abi| !abi.is_64_bit())
        })
        .cloned()
        .collect();
    module.with_entries(entries)
}

//! Module sanitizers, run before splitting.

#[cfg(test)]
mod sanitize_test;

use crate::bundle::{BundleModule, ModuleEntry, NativeConfig};
use log::warn;
use std::collections::BTreeMap;

const LIB_DIR: &str = "lib/";
const DEX_DIR: &str = "dex/";

/// Keeps only the `lib/<abi>` directories with the maximum file count.
///
/// An inconsistent ABI layout (different file counts per directory) would
/// produce splits that crash at load time on some devices; the directories
/// that fall short are dropped, the discarded files logged, and the native
/// targeting adjusted to the survivors.
pub fn sanitize_abi_dirs(module: BundleModule) -> BundleModule {
    let mut by_dir: BTreeMap<String, Vec<ModuleEntry>> = BTreeMap::new();
    let mut rest: Vec<ModuleEntry> = Vec::new();
    for entry in module.entries() {
        match lib_dir_of(entry.path()) {
            Some(dir) => by_dir.entry(dir).or_default().push(entry.clone()),
            None => rest.push(entry.clone()),
        }
    }

    let max_files = by_dir.values().map(Vec::len).max().unwrap_or(0);
    let consistent = by_dir.values().all(|entries| entries.len() == max_files);
    if consistent {
        return module;
    }

    let mut kept_dirs: Vec<String> = Vec::new();
    let mut kept: Vec<ModuleEntry> = rest;
    for (dir, entries) in by_dir {
        if entries.len() == max_files {
            kept_dirs.push(dir);
            kept.extend(entries);
        } else {
            warn!(
                "module '{}': dropping inconsistent native directory '{dir}' ({} files, expected {max_files})",
                module.name(),
                entries.len(),
            );
            for entry in &entries {
                warn!("module '{}': discarding '{}'", module.name(), entry.path());
            }
        }
    }

    let native_config = module.native_config().map(|config| NativeConfig {
        directories: config
            .directories
            .iter()
            .filter(|dir| kept_dirs.iter().any(|kept_dir| dir.path.trim_end_matches('/') == kept_dir))
            .cloned()
            .collect(),
    });

    let mut module = module.with_entries(kept);
    if let Some(native_config) = native_config {
        module = module.with_native_config(native_config);
    }
    module
}

fn lib_dir_of(path: &str) -> Option<String> {
    let rest = path.strip_prefix(LIB_DIR)?;
    let (dir, _) = rest.split_once('/')?;
    Some(format!("lib/{dir}"))
}

/// Renames `dex/classes1.dex` to `dex/classes2.dex` (shifting the rest up)
/// to undo an off-by-one of older bundle producers. `dex/classes.dex` is
/// untouched.
pub fn renumber_classes_dex(module: BundleModule) -> BundleModule {
    if module.entry("dex/classes1.dex").is_none() {
        return module;
    }

    let entries: Vec<ModuleEntry> = module
        .entries()
        .map(|entry| match dex_index(entry.path()) {
            Some(index) => entry.with_path(format!("{DEX_DIR}classes{}.dex", index + 1)),
            None => entry.clone(),
        })
        .collect();
    module.with_entries(entries)
}

/// Drops the dex file with the highest numeric suffix. Used when converting
/// an SDK bundle into an app module: that file carries the SDK's RPackage
/// class, which the app inherits from its base.
pub fn remove_rpackage_dex(module: BundleModule) -> BundleModule {
    let Some(highest) = module
        .entries()
        .filter_map(|entry| dex_index(entry.path()))
        .max()
    else {
        return module;
    };

    let entries: Vec<ModuleEntry> = module
        .entries()
        .filter(|entry| dex_index(entry.path()) != Some(highest))
        .cloned()
        .collect();
    module.with_entries(entries)
}

/// The numeric suffix of `dex/classesN.dex`; `dex/classes.dex` has none.
fn dex_index(path: &str) -> Option<u32> {
    path.strip_prefix(DEX_DIR)?
        .strip_prefix("classes")?
        .strip_suffix(".dex")?
        .parse()
        .ok()
}

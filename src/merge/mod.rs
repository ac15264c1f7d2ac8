//! Same-targeting merger: fuses splits that ended up with identical
//! (module, targeting, master-flag) triples.
//!
//! Splitters run per dimension independently, so two of them can emit
//! dimension-agnostic splits with the same final targeting. This stage
//! guarantees the serializer sees exactly one split per final
//! (module, targeting) pair, and exactly one master per (module, variant).

mod alternatives;

#[cfg(test)]
mod merge_test;

pub use alternatives::{populate_split_alternatives, populate_variant_alternatives};

use crate::bundle::ModuleEntry;
use crate::error::{Error, Result};
use crate::split::ModuleSplit;
use crate::targeting::{ApkTargeting, VariantTargeting};
use indexmap::IndexMap;
use log::warn;
use std::collections::HashMap;

type MergeKey = (String, ApkTargeting, bool);

/// Fuses same-targeted splits, first-seen order preserved.
pub fn merge_same_targeting(splits: Vec<ModuleSplit>) -> Result<Vec<ModuleSplit>> {
    let mut groups: IndexMap<MergeKey, Vec<ModuleSplit>> = IndexMap::new();
    for split in splits {
        let key = (
            split.module_name.clone(),
            split.apk_targeting.clone(),
            split.master_split,
        );
        groups.entry(key).or_default().push(split);
    }

    let mut output: Vec<ModuleSplit> = Vec::with_capacity(groups.len());
    for (_, group) in groups {
        let mut group = group.into_iter();
        let mut fused = group.next().expect("group is never empty");
        for split in group {
            fused = fuse(fused, split)?;
        }
        output.push(fused);
    }
    check_single_master(&output)?;
    Ok(output)
}

fn fuse(first: ModuleSplit, second: ModuleSplit) -> Result<ModuleSplit> {
    if first.manifest != second.manifest {
        return Err(conflict(&first, "manifests"));
    }
    if first.variant_targeting != second.variant_targeting {
        return Err(conflict(&first, "variant targetings"));
    }
    if first.split_type != second.split_type {
        return Err(conflict(&first, "split types"));
    }

    let resource_table = match (&first.resource_table, &second.resource_table) {
        (Some(a), Some(b)) if a != b => return Err(conflict(&first, "resource tables")),
        (Some(a), _) => Some(a.clone()),
        (None, b) => b.clone(),
    };
    let native_config = match (&first.native_config, &second.native_config) {
        (Some(a), Some(b)) if a != b => return Err(conflict(&first, "native configs")),
        (Some(a), _) => Some(a.clone()),
        (None, b) => b.clone(),
    };

    // Concatenate entries; on duplicate paths the first seen wins.
    let mut entries: Vec<ModuleEntry> = first.entries.clone();
    for entry in &second.entries {
        if entries.iter().any(|existing| existing.path() == entry.path()) {
            warn!(
                "module '{}': duplicate entry '{}' while merging same-targeted splits, keeping first",
                first.module_name,
                entry.path()
            );
            continue;
        }
        entries.push(entry.clone());
    }

    Ok(first
        .with_entries(entries)
        .with_resource_table(resource_table)
        .with_native_config(native_config))
}

fn conflict(split: &ModuleSplit, what: &str) -> Error {
    Error::internal(format!(
        "conflicting {what} while merging same-targeted splits of module '{}'",
        split.module_name
    ))
}

/// Exactly one master split per (module, variant).
fn check_single_master(splits: &[ModuleSplit]) -> Result<()> {
    let mut masters: HashMap<(&str, &VariantTargeting), usize> = HashMap::new();
    for split in splits.iter().filter(|split| split.master_split) {
        *masters
            .entry((split.module_name.as_str(), &split.variant_targeting))
            .or_default() += 1;
    }
    for ((module, _), count) in masters {
        if count > 1 {
            return Err(Error::internal(format!(
                "module '{module}' has {count} master splits in one variant"
            )));
        }
    }
    Ok(())
}

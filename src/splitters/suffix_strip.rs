//! Post-split pass collapsing `#key_value` asset directories into their
//! canonical names.

use crate::bundle::SuffixStrippingConfig;
use crate::error::Result;
use crate::split::ModuleSplit;
use crate::splitters::assets::ASSETS_DIR;
use crate::targeting::{TargetedDirectory, TargetingDimension};
use std::collections::BTreeMap;

/// Rewrites asset paths of every split, dropping the suffix of the selected
/// variant's segment for each dimension with stripping enabled. Targeting is
/// left intact; only paths change.
pub fn strip_asset_suffixes(
    splits: Vec<ModuleSplit>,
    strippings: &BTreeMap<TargetingDimension, SuffixStrippingConfig>,
) -> Result<Vec<ModuleSplit>> {
    let enabled: Vec<TargetingDimension> = strippings
        .iter()
        .filter(|(_, config)| config.enabled)
        .map(|(dimension, _)| *dimension)
        .collect();
    if enabled.is_empty() {
        return Ok(splits);
    }

    splits
        .into_iter()
        .map(|split| strip_split(split, &enabled))
        .collect()
}

fn strip_split(split: ModuleSplit, dimensions: &[TargetingDimension]) -> Result<ModuleSplit> {
    let mut entries = Vec::with_capacity(split.entries.len());
    let mut changed = false;
    for entry in &split.entries {
        let Some((dir_path, file_name)) = entry
            .path()
            .starts_with(ASSETS_DIR)
            .then(|| entry.path().rsplit_once('/'))
            .flatten()
        else {
            entries.push(entry.clone());
            continue;
        };

        // After splitting, the only suffixes left in a split are those of
        // its own selected variant, so stripping the whole dimension is
        // stripping exactly that variant's segment.
        let dir = TargetedDirectory::parse(dir_path)?;
        let mut stripped = dir.to_path();
        for dimension in dimensions {
            stripped = TargetedDirectory::parse(&stripped)?.strip_dimension(*dimension);
        }
        if stripped == dir_path {
            entries.push(entry.clone());
        } else {
            changed = true;
            entries.push(entry.with_path(format!("{stripped}/{file_name}")));
        }
    }

    Ok(if changed {
        split.with_entries(entries)
    } else {
        split
    })
}

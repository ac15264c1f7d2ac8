//! Splits resource-table entries into screen-density buckets.

use crate::bundle::ModuleEntry;
use crate::error::{Error, Result, UserError, UserErrorKind};
use crate::split::ModuleSplit;
use crate::splitters::ModuleSplitter;
use crate::targeting::ApkTargeting;
use std::collections::BTreeSet;

use crate::resources::partition_by_density;

/// Partitions density-qualified resources into LDPI..XXXHDPI buckets.
/// `anydpi` values ride along in every bucket and in the master; `nodpi`
/// and unqualified values stay in the master as the fallback.
pub struct DensityResourcesSplitter;

impl ModuleSplitter for DensityResourcesSplitter {
    fn split(&self, split: &ModuleSplit) -> Result<Vec<ModuleSplit>> {
        let Some(table) = &split.resource_table else {
            return Ok(vec![split.clone()]);
        };

        validate_referenced_files(split)?;

        let partition = partition_by_density(table);
        if partition.buckets.is_empty() {
            return Ok(vec![split.clone()]);
        }

        let master_files: BTreeSet<&str> = partition
            .master
            .as_ref()
            .map(|table| table.referenced_files().into_iter().collect())
            .unwrap_or_default();
        let bucket_only_files: BTreeSet<&str> = partition
            .buckets
            .values()
            .flat_map(|table| table.referenced_files())
            .filter(|path| !master_files.contains(path))
            .collect();

        let remainder_entries: Vec<ModuleEntry> = split
            .entries
            .iter()
            .filter(|entry| !bucket_only_files.contains(entry.path()))
            .cloned()
            .collect();

        let mut output = vec![
            split
                .with_entries(remainder_entries)
                .with_resource_table(partition.master.clone()),
        ];
        for (bucket, bucket_table) in &partition.buckets {
            let bucket_files: BTreeSet<&str> =
                bucket_table.referenced_files().into_iter().collect();
            let entries: Vec<ModuleEntry> = split
                .entries
                .iter()
                .filter(|entry| bucket_files.contains(entry.path()))
                .cloned()
                .collect();
            output.push(
                split
                    .with_master_split(false)
                    .with_apk_targeting(
                        split
                            .apk_targeting
                            .union(&ApkTargeting::for_density(*bucket)),
                    )
                    .with_entries(entries)
                    .with_resource_table(Some(bucket_table.clone()))
                    .with_native_config(None),
            );
        }
        Ok(output)
    }
}

/// Every file the resource table references must exist among the split's
/// entries.
pub(crate) fn validate_referenced_files(split: &ModuleSplit) -> Result<()> {
    let Some(table) = &split.resource_table else {
        return Ok(());
    };
    for path in table.referenced_files() {
        if split.entry(path).is_none() {
            return Err(Error::User(
                UserError::new(
                    UserErrorKind::ResourceTableMissingFile,
                    format!(
                        "resource table of module '{}' references missing file '{path}'",
                        split.module_name
                    ),
                )
                .with_module(&split.module_name)
                .with_path(path),
            ));
        }
    }
    Ok(())
}

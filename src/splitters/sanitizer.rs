//! Separates sanitizer-instrumented native libraries into dedicated splits.

use crate::bundle::ModuleEntry;
use crate::error::Result;
use crate::split::ModuleSplit;
use crate::splitters::ModuleSplitter;
use crate::splitters::abi::{LibEntry, classify_lib_entry};
use crate::targeting::{Abi, ApkTargeting, DimensionTargeting, Sanitizer};
use std::collections::BTreeMap;

/// Always runs on the native pipeline. Instrumented directories
/// (`lib/<abi>-hwasan/`) become one split per ABI, marked with the
/// `requiresSanitizer` manifest meta-data so only capable devices install
/// them.
pub struct SanitizerLibrariesSplitter;

impl ModuleSplitter for SanitizerLibrariesSplitter {
    fn split(&self, split: &ModuleSplit) -> Result<Vec<ModuleSplit>> {
        let mut by_abi: BTreeMap<(Abi, Sanitizer), Vec<ModuleEntry>> = BTreeMap::new();
        let mut remainder: Vec<ModuleEntry> = Vec::new();

        for entry in &split.entries {
            match classify_lib_entry(split, entry.path())? {
                LibEntry::Sanitized(abi, sanitizer) => {
                    by_abi.entry((abi, sanitizer)).or_default().push(entry.clone());
                }
                LibEntry::Plain(_) | LibEntry::Other => remainder.push(entry.clone()),
            }
        }

        if by_abi.is_empty() {
            return Ok(vec![split.clone()]);
        }

        let mut output = vec![split.with_entries(remainder)];
        for ((abi, sanitizer), entries) in by_abi {
            let targeting = ApkTargeting {
                abi: DimensionTargeting::value(abi),
                sanitizer: DimensionTargeting::value(sanitizer),
                ..ApkTargeting::default()
            };
            output.push(
                split
                    .with_master_split(false)
                    .with_apk_targeting(split.apk_targeting.union(&targeting))
                    .with_entries(entries)
                    .with_resource_table(None)
                    .with_native_config(None)
                    .with_manifest(split.manifest.edit().set_requires_sanitizer().finish()),
            );
        }
        Ok(output)
    }
}

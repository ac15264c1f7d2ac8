//! Splits native libraries by ABI directory (`lib/<abi>/...`).

use crate::bundle::{ModuleEntry, NativeConfig};
use crate::error::{Error, Result};
use crate::split::ModuleSplit;
use crate::splitters::ModuleSplitter;
use crate::targeting::{Abi, ApkTargeting, Sanitizer};
use std::collections::BTreeMap;

pub const LIB_DIR: &str = "lib/";

const SANITIZER_DIR_SUFFIX: &str = "-hwasan";

/// Classification of an entry with respect to `lib/` directories.
pub(crate) enum LibEntry {
    /// `lib/<abi>/...`
    Plain(Abi),
    /// `lib/<abi>-hwasan/...`
    Sanitized(Abi, Sanitizer),
    /// Not under `lib/`.
    Other,
}

pub(crate) fn classify_lib_entry(split: &ModuleSplit, path: &str) -> Result<LibEntry> {
    let Some(rest) = path.strip_prefix(LIB_DIR) else {
        return Ok(LibEntry::Other);
    };
    let dir_name = rest.split('/').next().unwrap_or(rest);
    if let Some(base) = dir_name.strip_suffix(SANITIZER_DIR_SUFFIX) {
        let abi = parse_abi(split, path, base)?;
        return Ok(LibEntry::Sanitized(abi, Sanitizer::HwAddress));
    }
    Ok(LibEntry::Plain(parse_abi(split, path, dir_name)?))
}

fn parse_abi(split: &ModuleSplit, path: &str, dir_name: &str) -> Result<Abi> {
    Abi::from_dir_name(dir_name).ok_or_else(|| {
        Error::invalid_bundle(format!(
            "module '{}' has native directory with unrecognized ABI: '{path}'",
            split.module_name
        ))
    })
}

/// Produces one split per ABI directory; everything else stays in the
/// remainder. Sanitizer-instrumented directories are left for the
/// [`SanitizerLibrariesSplitter`](crate::splitters::SanitizerLibrariesSplitter).
pub struct NativeLibrariesSplitter;

impl ModuleSplitter for NativeLibrariesSplitter {
    fn split(&self, split: &ModuleSplit) -> Result<Vec<ModuleSplit>> {
        let mut by_abi: BTreeMap<Abi, Vec<ModuleEntry>> = BTreeMap::new();
        let mut remainder: Vec<ModuleEntry> = Vec::new();

        for entry in &split.entries {
            match classify_lib_entry(split, entry.path())? {
                LibEntry::Plain(abi) => by_abi.entry(abi).or_default().push(entry.clone()),
                LibEntry::Sanitized(..) | LibEntry::Other => remainder.push(entry.clone()),
            }
        }

        if by_abi.is_empty() {
            return Ok(vec![split.clone()]);
        }

        let mut output = vec![
            split
                .with_entries(remainder)
                .with_native_config(None),
        ];
        for (abi, entries) in by_abi {
            let native_config = split.native_config.as_ref().map(|config| NativeConfig {
                directories: config
                    .directories
                    .iter()
                    .filter(|dir| dir.abi == abi)
                    .cloned()
                    .collect(),
            });
            output.push(
                split
                    .with_master_split(false)
                    .with_apk_targeting(split.apk_targeting.union(&ApkTargeting::for_abi(abi)))
                    .with_entries(entries)
                    .with_resource_table(None)
                    .with_native_config(native_config),
            );
        }
        Ok(output)
    }
}

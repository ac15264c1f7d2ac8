//! Splits resource-table entries by locale.

use crate::bundle::ModuleEntry;
use crate::error::Result;
use crate::resources::{ResourceTable, partition_by_locale};
use crate::split::ModuleSplit;
use crate::splitters::ModuleSplitter;
use crate::splitters::density::validate_referenced_files;
use crate::targeting::ApkTargeting;
use std::collections::{BTreeMap, BTreeSet};

/// Peels explicitly locale-qualified resources into per-language splits.
/// The bundle's default-locale resources stay in the master. Locales are
/// grouped by language subtag, so `fr` and `fr-CA` share one split.
pub struct LanguageResourcesSplitter;

impl ModuleSplitter for LanguageResourcesSplitter {
    fn split(&self, split: &ModuleSplit) -> Result<Vec<ModuleSplit>> {
        let Some(table) = &split.resource_table else {
            return Ok(vec![split.clone()]);
        };

        validate_referenced_files(split)?;

        let partition = partition_by_locale(table);
        if partition.locales.is_empty() {
            return Ok(vec![split.clone()]);
        }

        // Locale tables grouped by language subtag.
        let mut languages: BTreeMap<String, Vec<&ResourceTable>> = BTreeMap::new();
        for (locale, locale_table) in &partition.locales {
            languages
                .entry(language_of(locale).to_lowercase())
                .or_default()
                .push(locale_table);
        }

        let master_files: BTreeSet<&str> = partition
            .master
            .as_ref()
            .map(|table| table.referenced_files().into_iter().collect())
            .unwrap_or_default();
        let language_only_files: BTreeSet<&str> = partition
            .locales
            .values()
            .flat_map(|table| table.referenced_files())
            .filter(|path| !master_files.contains(path))
            .collect();

        let remainder_entries: Vec<ModuleEntry> = split
            .entries
            .iter()
            .filter(|entry| !language_only_files.contains(entry.path()))
            .cloned()
            .collect();

        let mut output = vec![
            split
                .with_entries(remainder_entries)
                .with_resource_table(partition.master.clone()),
        ];
        for (language, locale_tables) in &languages {
            let language_table =
                ResourceTable::merged(locale_tables.iter().copied()).expect("non-empty group");
            let language_files: BTreeSet<&str> =
                language_table.referenced_files().into_iter().collect();
            let entries: Vec<ModuleEntry> = split
                .entries
                .iter()
                .filter(|entry| language_files.contains(entry.path()))
                .cloned()
                .collect();
            output.push(
                split
                    .with_master_split(false)
                    .with_apk_targeting(
                        split
                            .apk_targeting
                            .union(&ApkTargeting::for_language(language.clone())),
                    )
                    .with_entries(entries)
                    .with_resource_table(Some(language_table))
                    .with_native_config(None),
            );
        }
        Ok(output)
    }
}

fn language_of(locale: &str) -> &str {
    locale.split(['-', '_']).next().unwrap_or(locale)
}

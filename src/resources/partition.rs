//! Dimension-wise partitioning of a resource table, the heart of the
//! density and language resource splitters.

use crate::resources::ResourceTable;
use crate::targeting::{DensityBucket, DensityQualifier};
use std::collections::BTreeMap;

/// Result of partitioning a table by density qualifier.
///
/// `anydpi` config values are valid at every density, so they appear in the
/// master table and in every bucket table. `nodpi` and unqualified values
/// stay in the master only.
#[derive(Debug)]
pub struct DensityPartition {
    pub master: Option<ResourceTable>,
    pub buckets: BTreeMap<DensityBucket, ResourceTable>,
}

pub fn partition_by_density(table: &ResourceTable) -> DensityPartition {
    let master = table.filter_configs(|config| {
        matches!(
            config.density,
            DensityQualifier::Unqualified | DensityQualifier::NoDpi | DensityQualifier::AnyDpi
        )
    });

    let mut buckets = BTreeMap::new();
    let targeted_buckets: Vec<DensityBucket> = {
        let mut found: Vec<DensityBucket> = table
            .packages
            .iter()
            .flat_map(|package| &package.types)
            .flat_map(|ty| &ty.entries)
            .flat_map(|entry| &entry.configs)
            .filter_map(|config| config.config.density.bucket())
            .collect();
        found.sort();
        found.dedup();
        found
    };

    for bucket in targeted_buckets {
        let bucket_table = table.filter_configs(|config| {
            config.density.bucket() == Some(bucket)
                || config.density == DensityQualifier::AnyDpi
        });
        if let Some(bucket_table) = bucket_table {
            buckets.insert(bucket, bucket_table);
        }
    }

    DensityPartition { master, buckets }
}

/// Result of partitioning a table by locale qualifier.
///
/// Default-locale values stay in the master; only explicitly qualified
/// values are peeled off into per-locale tables.
#[derive(Debug)]
pub struct LocalePartition {
    pub master: Option<ResourceTable>,
    pub locales: BTreeMap<String, ResourceTable>,
}

pub fn partition_by_locale(table: &ResourceTable) -> LocalePartition {
    let master = table.filter_configs(|config| config.locale.is_none());

    let mut locales = BTreeMap::new();
    for locale in table.locales() {
        let locale_table =
            table.filter_configs(|config| config.locale.as_deref() == Some(locale.as_str()));
        if let Some(locale_table) = locale_table {
            locales.insert(locale, locale_table);
        }
    }

    LocalePartition { master, locales }
}

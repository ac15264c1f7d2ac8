//! Splits targeted asset directories (`assets/<dir>#<key>_<value>/...`)
//! along one dimension.

use crate::bundle::ModuleEntry;
use crate::error::Result;
use crate::split::ModuleSplit;
use crate::splitters::ModuleSplitter;
use crate::targeting::{
    ApkTargeting, DimensionTargeting, TargetedDirectory, TargetingDimension, TargetingValue,
};
use std::collections::BTreeMap;

pub const ASSETS_DIR: &str = "assets/";

/// One splitter instance handles one dimension (language, texture format,
/// device tier or country set); the pipeline stacks one per enabled
/// dimension.
pub struct AssetsDimensionSplitter {
    dimension: TargetingDimension,
}

impl AssetsDimensionSplitter {
    pub fn new(dimension: TargetingDimension) -> Self {
        Self { dimension }
    }

    fn targeting_of(&self, value: &TargetingValue) -> ApkTargeting {
        match value {
            TargetingValue::Language(language) => ApkTargeting::for_language(language.clone()),
            TargetingValue::TextureCompressionFormat(tcf) => ApkTargeting {
                texture_compression_format: DimensionTargeting::value(*tcf),
                ..ApkTargeting::default()
            },
            TargetingValue::DeviceTier(tier) => ApkTargeting {
                device_tier: DimensionTargeting::value(tier.clone()),
                ..ApkTargeting::default()
            },
            TargetingValue::CountrySet(country_set) => ApkTargeting {
                country_set: DimensionTargeting::value(country_set.clone()),
                ..ApkTargeting::default()
            },
            TargetingValue::GraphicsApi(api) => ApkTargeting {
                graphics_api: DimensionTargeting::value(*api),
                ..ApkTargeting::default()
            },
        }
    }
}

impl ModuleSplitter for AssetsDimensionSplitter {
    fn split(&self, split: &ModuleSplit) -> Result<Vec<ModuleSplit>> {
        let mut by_value: BTreeMap<TargetingValue, Vec<ModuleEntry>> = BTreeMap::new();
        let mut remainder: Vec<ModuleEntry> = Vec::new();

        for entry in &split.entries {
            let claimed = if let Some((dir_path, _)) = entry
                .path()
                .strip_prefix(ASSETS_DIR)
                .and(entry.path().rsplit_once('/'))
            {
                let dir = TargetedDirectory::parse(dir_path)?;
                dir.targeting_for(self.dimension).cloned()
            } else {
                None
            };
            match claimed {
                Some(value) => by_value.entry(value).or_default().push(entry.clone()),
                None => remainder.push(entry.clone()),
            }
        }

        if by_value.is_empty() {
            return Ok(vec![split.clone()]);
        }

        let mut output = vec![split.with_entries(remainder)];
        for (value, entries) in by_value {
            output.push(
                split
                    .with_master_split(false)
                    .with_apk_targeting(split.apk_targeting.union(&self.targeting_of(&value)))
                    .with_entries(entries)
                    .with_resource_table(None)
                    .with_native_config(None),
            );
        }
        Ok(output)
    }
}

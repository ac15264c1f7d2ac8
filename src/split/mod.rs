//! The central intermediate value of the pipeline: one module's contribution
//! to one targeting cell.
//!
//! Splits are immutable; later stages derive new values through the `with_*`
//! copy constructors. Splitters never mutate their input.

use crate::bundle::{ApexConfig, BundleModule, ModuleEntry, NativeConfig};
use crate::manifest::AndroidManifest;
use crate::resources::ResourceTable;
use crate::targeting::{ApkTargeting, VariantTargeting};
use derive_builder::Builder;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplitType {
    Split,
    Standalone,
    System,
    Instant,
    AssetSlice,
}

impl fmt::Display for SplitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Split => "SPLIT",
            Self::Standalone => "STANDALONE",
            Self::System => "SYSTEM",
            Self::Instant => "INSTANT",
            Self::AssetSlice => "ASSET_SLICE",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, Builder)]
pub struct ModuleSplit {
    pub module_name: String,
    pub split_type: SplitType,
    /// Exactly one split per (module, variant) carries the manifest and the
    /// dimension-agnostic entries.
    #[builder(default = "true")]
    pub master_split: bool,
    #[builder(default)]
    pub variant_targeting: VariantTargeting,
    #[builder(default)]
    pub apk_targeting: ApkTargeting,
    pub manifest: AndroidManifest,
    #[builder(default)]
    pub resource_table: Option<ResourceTable>,
    #[builder(default)]
    pub entries: Vec<ModuleEntry>,
    #[builder(default)]
    pub native_config: Option<NativeConfig>,
    #[builder(default)]
    pub apex_config: Option<ApexConfig>,
}

impl ModuleSplit {
    /// The initial split of a module before any splitter ran: the master
    /// carrying every entry.
    pub fn master_of(module: &BundleModule, split_type: SplitType) -> Self {
        ModuleSplitBuilder::default()
            .module_name(module.name().to_string())
            .split_type(split_type)
            .manifest(module.manifest().clone())
            .resource_table(module.resource_table().cloned())
            .entries(module.entries().cloned().collect())
            .native_config(module.native_config().cloned())
            .apex_config(module.apex_config().cloned())
            .build()
            .expect("all required fields set")
    }

    pub fn entry(&self, path: &str) -> Option<&ModuleEntry> {
        self.entries.iter().find(|entry| entry.path() == path)
    }

    pub fn entry_paths(&self) -> Vec<&str> {
        self.entries.iter().map(ModuleEntry::path).collect()
    }

    /// The split id written into the manifest: empty for the base master,
    /// the module name for feature masters, `[module.]config.<suffix>` for
    /// config splits.
    pub fn split_id(&self) -> String {
        self.split_id_with_suffix(&self.apk_targeting.suffix())
    }

    /// Split id with an explicit suffix, used by the system-mode suffix
    /// manager when two modules collide on the same targeting.
    pub fn split_id_with_suffix(&self, suffix: &str) -> String {
        let is_base = self.module_name == crate::bundle::BASE_MODULE_NAME;
        if self.master_split {
            if is_base {
                return String::new();
            }
            return self.module_name.clone();
        }
        if is_base {
            format!("config.{suffix}")
        } else {
            format!("{}.config.{suffix}", self.module_name)
        }
    }

    /// The master split id this config split references, if any.
    pub fn config_for_split_id(&self) -> Option<String> {
        if self.master_split {
            return None;
        }
        if self.module_name == crate::bundle::BASE_MODULE_NAME {
            Some(String::new())
        } else {
            Some(self.module_name.clone())
        }
    }

    /// Copies the split with its identity written into the manifest.
    pub fn with_split_identity_applied(&self) -> Self {
        self.with_split_identity(&self.split_id())
    }

    pub fn with_split_identity(&self, split_id: &str) -> Self {
        let mut editor = self.manifest.edit();
        if !split_id.is_empty() {
            editor = editor.set_split_id(split_id);
        }
        if let Some(config_for) = self.config_for_split_id() {
            editor = editor.set_config_for_split(&config_for);
        }
        self.with_manifest(editor.finish())
    }

    pub fn with_master_split(&self, master_split: bool) -> Self {
        Self {
            master_split,
            ..self.clone()
        }
    }

    pub fn with_split_type(&self, split_type: SplitType) -> Self {
        Self {
            split_type,
            ..self.clone()
        }
    }

    pub fn with_apk_targeting(&self, apk_targeting: ApkTargeting) -> Self {
        Self {
            apk_targeting,
            ..self.clone()
        }
    }

    pub fn with_variant_targeting(&self, variant_targeting: VariantTargeting) -> Self {
        Self {
            variant_targeting,
            ..self.clone()
        }
    }

    pub fn with_manifest(&self, manifest: AndroidManifest) -> Self {
        Self {
            manifest,
            ..self.clone()
        }
    }

    pub fn with_resource_table(&self, resource_table: Option<ResourceTable>) -> Self {
        Self {
            resource_table,
            ..self.clone()
        }
    }

    pub fn with_entries(&self, entries: Vec<ModuleEntry>) -> Self {
        Self {
            entries,
            ..self.clone()
        }
    }

    pub fn with_native_config(&self, native_config: Option<NativeConfig>) -> Self {
        Self {
            native_config,
            ..self.clone()
        }
    }

    pub fn with_apex_config(&self, apex_config: Option<ApexConfig>) -> Self {
        Self {
            apex_config,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{BundleModule, ByteSource};
    use crate::targeting::{Abi, DensityBucket};

    fn base_module() -> BundleModule {
        BundleModule::new("base", AndroidManifest::for_package("com.example.app")).with_entry(
            ModuleEntry::new("dex/classes.dex", ByteSource::from_bytes(vec![1])),
        )
    }

    #[test]
    fn master_of_carries_everything() {
        let split = ModuleSplit::master_of(&base_module(), SplitType::Split);
        assert!(split.master_split);
        assert!(split.apk_targeting.is_empty());
        assert_eq!(split.entry_paths(), vec!["dex/classes.dex"]);
    }

    #[test]
    fn split_ids() {
        let master = ModuleSplit::master_of(&base_module(), SplitType::Split);
        assert_eq!(master.split_id(), "");

        let abi_split = master
            .with_master_split(false)
            .with_apk_targeting(crate::targeting::ApkTargeting::for_abi(Abi::Arm64V8a));
        assert_eq!(abi_split.split_id(), "config.arm64_v8a");
        assert_eq!(abi_split.config_for_split_id(), Some(String::new()));

        let feature =
            BundleModule::new("camera", AndroidManifest::for_package("com.example.app"));
        let feature_master = ModuleSplit::master_of(&feature, SplitType::Split);
        assert_eq!(feature_master.split_id(), "camera");

        let density_split = feature_master
            .with_master_split(false)
            .with_apk_targeting(crate::targeting::ApkTargeting::for_density(
                DensityBucket::Xxhdpi,
            ));
        assert_eq!(density_split.split_id(), "camera.config.xxhdpi");
        assert_eq!(
            density_split.config_for_split_id(),
            Some("camera".to_string())
        );
    }

    #[test]
    fn split_identity_lands_in_the_manifest() {
        let master = ModuleSplit::master_of(&base_module(), SplitType::Split);
        let split = master
            .with_master_split(false)
            .with_apk_targeting(crate::targeting::ApkTargeting::for_language("fr"))
            .with_split_identity_applied();

        assert_eq!(split.manifest.split_name(), Some("config.fr"));
        assert_eq!(split.manifest.config_for_split(), Some(""));
        // The original master manifest is untouched.
        assert_eq!(master.manifest.split_name(), None);
    }
}

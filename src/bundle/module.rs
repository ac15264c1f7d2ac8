//! One module of the bundle: manifest, entries and targeting configs.

use crate::bundle::entry::ModuleEntry;
use crate::manifest::AndroidManifest;
use crate::resources::ResourceTable;
use crate::targeting::{Abi, MultiAbi};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const BASE_MODULE_NAME: &str = "base";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModuleType {
    Base,
    Feature,
    Asset,
    Sdk,
}

impl fmt::Display for ModuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Base => "base",
            Self::Feature => "feature",
            Self::Asset => "asset",
            Self::Sdk => "sdk",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DeliveryType {
    InstallTime,
    OnDemand,
    Conditional,
}

impl FromStr for DeliveryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "install-time" => Ok(Self::InstallTime),
            "on-demand" => Ok(Self::OnDemand),
            "conditional" => Ok(Self::Conditional),
            other => Err(format!("unrecognized delivery type: {other}")),
        }
    }
}

/// Declared ABI targeting of a `lib/<abi>` directory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetedNativeDirectory {
    pub path: String,
    pub abi: Abi,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub directories: Vec<TargetedNativeDirectory>,
}

/// Declared multi-ABI targeting of an APEX image.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetedApexImage {
    pub path: String,
    pub multi_abi: MultiAbi,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApexConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<TargetedApexImage>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TargetedAssetsDirectory {
    pub path: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub directories: Vec<TargetedAssetsDirectory>,
}

/// A unit of code and resources, immutable once the bundle is read.
#[derive(Clone, Debug)]
pub struct BundleModule {
    name: String,
    manifest: AndroidManifest,
    resource_table: Option<ResourceTable>,
    entries: IndexMap<String, ModuleEntry>,
    assets_config: Option<AssetsConfig>,
    native_config: Option<NativeConfig>,
    apex_config: Option<ApexConfig>,
}

impl BundleModule {
    pub fn new(name: impl Into<String>, manifest: AndroidManifest) -> Self {
        Self {
            name: name.into(),
            manifest,
            resource_table: None,
            entries: IndexMap::new(),
            assets_config: None,
            native_config: None,
            apex_config: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn manifest(&self) -> &AndroidManifest {
        &self.manifest
    }

    pub fn resource_table(&self) -> Option<&ResourceTable> {
        self.resource_table.as_ref()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ModuleEntry> {
        self.entries.values()
    }

    pub fn entry(&self, path: &str) -> Option<&ModuleEntry> {
        self.entries.get(path)
    }

    /// Entries whose path starts with the given directory prefix
    /// (e.g. `lib/`), in insertion order.
    pub fn entries_under<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a ModuleEntry> {
        self.entries
            .values()
            .filter(move |entry| entry.path().starts_with(prefix))
    }

    pub fn assets_config(&self) -> Option<&AssetsConfig> {
        self.assets_config.as_ref()
    }

    pub fn native_config(&self) -> Option<&NativeConfig> {
        self.native_config.as_ref()
    }

    pub fn apex_config(&self) -> Option<&ApexConfig> {
        self.apex_config.as_ref()
    }

    /// Module type from the `<dist:module>` declaration, defaulting to base
    /// or feature by name.
    pub fn module_type(&self) -> ModuleType {
        match self.manifest.module_type_attr() {
            Some("asset-pack") => ModuleType::Asset,
            Some("sdk") => ModuleType::Sdk,
            Some("feature") => ModuleType::Feature,
            _ if self.name == BASE_MODULE_NAME => ModuleType::Base,
            _ => ModuleType::Feature,
        }
    }

    /// Delivery declared in the manifest; absent declarations install with
    /// the app.
    pub fn delivery_type(&self) -> DeliveryType {
        self.manifest
            .delivery_type_attr()
            .and_then(|attr| DeliveryType::from_str(attr).ok())
            .unwrap_or(DeliveryType::InstallTime)
    }

    pub fn with_resource_table(mut self, table: ResourceTable) -> Self {
        self.resource_table = Some(table);
        self
    }

    pub fn with_entry(mut self, entry: ModuleEntry) -> Self {
        self.entries.insert(entry.path().to_string(), entry);
        self
    }

    pub fn with_assets_config(mut self, config: AssetsConfig) -> Self {
        self.assets_config = Some(config);
        self
    }

    pub fn with_native_config(mut self, config: NativeConfig) -> Self {
        self.native_config = Some(config);
        self
    }

    pub fn with_apex_config(mut self, config: ApexConfig) -> Self {
        self.apex_config = Some(config);
        self
    }

    /// Replaces the full entry map; used by sanitizers that rewrite paths.
    pub fn with_entries(mut self, entries: impl IntoIterator<Item = ModuleEntry>) -> Self {
        self.entries = entries
            .into_iter()
            .map(|entry| (entry.path().to_string(), entry))
            .collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::entry::ByteSource;
    use crate::manifest::{XmlAttribute, XmlElement};

    fn module_with_dist_type(name: &str, dist_type: Option<&str>) -> BundleModule {
        let mut manifest = AndroidManifest::for_package("com.example.app");
        if let Some(dist_type) = dist_type {
            manifest.root = manifest.root.clone().with_child(
                XmlElement::new("module").with_attribute(XmlAttribute {
                    name: "type".to_string(),
                    namespace: Some("dist".to_string()),
                    value: dist_type.to_string(),
                    ref_id: None,
                }),
            );
        }
        BundleModule::new(name, manifest)
    }

    #[test]
    fn module_type_defaults_by_name() {
        assert_eq!(
            module_with_dist_type("base", None).module_type(),
            ModuleType::Base
        );
        assert_eq!(
            module_with_dist_type("camera", None).module_type(),
            ModuleType::Feature
        );
        assert_eq!(
            module_with_dist_type("textures", Some("asset-pack")).module_type(),
            ModuleType::Asset
        );
    }

    #[test]
    fn entries_under_filters_by_prefix() {
        let module = BundleModule::new("base", AndroidManifest::for_package("com.example.app"))
            .with_entry(ModuleEntry::new("dex/classes.dex", ByteSource::from_bytes(vec![1])))
            .with_entry(ModuleEntry::new(
                "lib/x86/libfoo.so",
                ByteSource::from_bytes(vec![2]),
            ));

        let lib_paths: Vec<&str> = module
            .entries_under("lib/")
            .map(|entry| entry.path())
            .collect();
        assert_eq!(lib_paths, vec!["lib/x86/libfoo.so"]);
    }

    #[test]
    fn default_delivery_is_install_time() {
        let module = module_with_dist_type("base", None);
        assert_eq!(module.delivery_type(), DeliveryType::InstallTime);
    }
}

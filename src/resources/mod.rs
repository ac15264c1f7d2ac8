//! In-memory resource table model.
//!
//! Mirrors the compiled table shape: packages → types → entries → per-config
//! values. Resource ids are 32-bit `package<<24 | type<<16 | entry`. The
//! model is only as deep as splitting needs; resource compilation itself is
//! an external concern.

mod partition;


pub use partition::{DensityPartition, LocalePartition, partition_by_density, partition_by_locale};

use crate::manifest::{XmlElement, XmlNode};
use crate::targeting::DensityQualifier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Package id of the Android framework; references into it are never
/// remapped.
pub const FRAMEWORK_PACKAGE_ID: u8 = 0x01;

/// A 32-bit compiled resource identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub u32);

impl ResourceId {
    pub fn new(package_id: u8, type_id: u8, entry_id: u16) -> Self {
        Self((u32::from(package_id) << 24) | (u32::from(type_id) << 16) | u32::from(entry_id))
    }

    pub fn package_id(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn type_id(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn entry_id(&self) -> u16 {
        self.0 as u16
    }

    /// Substitutes the package-id byte, leaving framework references
    /// (package 0x01) untouched.
    pub fn remap_package(&self, new_package_id: u8) -> Self {
        if self.package_id() == FRAMEWORK_PACKAGE_ID {
            return *self;
        }
        Self((u32::from(new_package_id) << 24) | (self.0 & 0x00FF_FFFF))
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// Rewrites the compiled resource references of an XML tree onto a new
/// package id. Only the package-id byte of each reference changes; framework
/// references are untouched.
pub fn remap_xml_references(element: &XmlElement, new_package_id: u8) -> XmlElement {
    let attributes = element
        .attributes
        .iter()
        .map(|attribute| {
            let mut attribute = attribute.clone();
            if let Some(ref_id) = attribute.ref_id {
                attribute.ref_id = Some(ResourceId(ref_id).remap_package(new_package_id).0);
            }
            attribute
        })
        .collect();
    let children = element
        .children
        .iter()
        .map(|child| match child {
            XmlNode::Element(child) => {
                XmlNode::Element(remap_xml_references(child, new_package_id))
            }
            XmlNode::Text(text) => XmlNode::Text(text.clone()),
        })
        .collect();
    XmlElement {
        name: element.name.clone(),
        attributes,
        children,
    }
}

/// Qualifiers of one resource configuration. Only the dimensions the
/// splitters act on are modelled.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourceConfig {
    #[serde(default)]
    pub density: DensityQualifier,
    /// Locale qualifier; `None` is the default locale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl ResourceConfig {
    pub fn default_config() -> Self {
        Self::default()
    }

    pub fn for_density(density: DensityQualifier) -> Self {
        Self {
            density,
            locale: None,
        }
    }

    pub fn for_locale(locale: impl Into<String>) -> Self {
        Self {
            density: DensityQualifier::Unqualified,
            locale: Some(locale.into()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceValue {
    /// Reference to a file entry inside the module (e.g. `res/drawable/x.png`).
    FileReference(String),
    /// Inline value (string, color, dimension, ...), kept opaque.
    Literal(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValue {
    pub config: ResourceConfig,
    pub value: ResourceValue,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub id: u16,
    pub name: String,
    pub configs: Vec<ConfigValue>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceType {
    pub id: u8,
    pub name: String,
    pub entries: Vec<ResourceEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePackage {
    pub id: u8,
    pub name: String,
    pub types: Vec<ResourceType>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTable {
    pub packages: Vec<ResourcePackage>,
}

impl ResourceTable {
    pub fn is_empty(&self) -> bool {
        !self
            .packages
            .iter()
            .flat_map(|package| &package.types)
            .flat_map(|ty| &ty.entries)
            .any(|entry| !entry.configs.is_empty())
    }

    /// Every file path referenced by any config value.
    pub fn referenced_files(&self) -> Vec<&str> {
        self.packages
            .iter()
            .flat_map(|package| &package.types)
            .flat_map(|ty| &ty.entries)
            .flat_map(|entry| &entry.configs)
            .filter_map(|config| match &config.value {
                ResourceValue::FileReference(path) => Some(path.as_str()),
                ResourceValue::Literal(_) => None,
            })
            .collect()
    }

    /// A copy containing only the config values matching the predicate.
    /// Entries, types and packages left with nothing are dropped; returns
    /// `None` when nothing at all matched.
    pub fn filter_configs(&self, keep: impl Fn(&ResourceConfig) -> bool) -> Option<ResourceTable> {
        let packages: Vec<ResourcePackage> = self
            .packages
            .iter()
            .filter_map(|package| {
                let types: Vec<ResourceType> = package
                    .types
                    .iter()
                    .filter_map(|ty| {
                        let entries: Vec<ResourceEntry> = ty
                            .entries
                            .iter()
                            .filter_map(|entry| {
                                let configs: Vec<ConfigValue> = entry
                                    .configs
                                    .iter()
                                    .filter(|config| keep(&config.config))
                                    .cloned()
                                    .collect();
                                (!configs.is_empty()).then(|| ResourceEntry {
                                    id: entry.id,
                                    name: entry.name.clone(),
                                    configs,
                                })
                            })
                            .collect();
                        (!entries.is_empty()).then(|| ResourceType {
                            id: ty.id,
                            name: ty.name.clone(),
                            entries,
                        })
                    })
                    .collect();
                (!types.is_empty()).then(|| ResourcePackage {
                    id: package.id,
                    name: package.name.clone(),
                    types,
                })
            })
            .collect();
        (!packages.is_empty()).then_some(ResourceTable { packages })
    }

    /// Merges several tables into one, used when splits are fused back into
    /// a standalone or system APK. Packages, types and entries are matched
    /// by id; config values are concatenated with duplicates dropped.
    pub fn merged<'a>(tables: impl IntoIterator<Item = &'a ResourceTable>) -> Option<ResourceTable> {
        let mut result: Option<ResourceTable> = None;
        for table in tables {
            let Some(accumulated) = &mut result else {
                result = Some(table.clone());
                continue;
            };
            for package in &table.packages {
                let target_package = match accumulated
                    .packages
                    .iter_mut()
                    .find(|existing| existing.id == package.id)
                {
                    Some(existing) => existing,
                    None => {
                        accumulated.packages.push(package.clone());
                        continue;
                    }
                };
                for ty in &package.types {
                    let target_type = match target_package
                        .types
                        .iter_mut()
                        .find(|existing| existing.id == ty.id)
                    {
                        Some(existing) => existing,
                        None => {
                            target_package.types.push(ty.clone());
                            continue;
                        }
                    };
                    for entry in &ty.entries {
                        let target_entry = match target_type
                            .entries
                            .iter_mut()
                            .find(|existing| existing.id == entry.id)
                        {
                            Some(existing) => existing,
                            None => {
                                target_type.entries.push(entry.clone());
                                continue;
                            }
                        };
                        for config in &entry.configs {
                            if !target_entry.configs.contains(config) {
                                target_entry.configs.push(config.clone());
                            }
                        }
                    }
                }
            }
        }
        result
    }

    /// All locales with explicitly qualified resources, deduplicated.
    pub fn locales(&self) -> Vec<String> {
        let mut locales: Vec<String> = self
            .packages
            .iter()
            .flat_map(|package| &package.types)
            .flat_map(|ty| &ty.entries)
            .flat_map(|entry| &entry.configs)
            .filter_map(|config| config.config.locale.clone())
            .collect();
        locales.sort();
        locales.dedup();
        locales
    }
}

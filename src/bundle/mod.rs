//! In-memory representation of an App Bundle.

mod config;
mod entry;
mod metadata;
mod module;
mod reader;

#[cfg(test)]
mod reader_test;

pub use config::{
    AssetModuleCompression, BundleConfig, BundletoolConfig, CompressionConfig,
    DEFAULT_RECOMPRESSION_THRESHOLD_BYTES, OptimizationsConfig, RuntimeEnabledSdk,
    RuntimeEnabledSdkConfig, SplitDimensionConfig, SplitsConfig, StandaloneConfig,
    SuffixStrippingConfig, UncompressDexFiles, UnsignedEmbeddedApkConfig,
};
pub use entry::{ByteSource, ModuleEntry, normalize_entry_path};
pub use metadata::BundleMetadata;
pub use module::{
    ApexConfig, AssetsConfig, BASE_MODULE_NAME, BundleModule, DeliveryType, ModuleType,
    NativeConfig, TargetedApexImage, TargetedAssetsDirectory, TargetedNativeDirectory,
};
pub use reader::{BUNDLE_CONFIG_FILE, METADATA_DIR, read_bundle};

use crate::error::{Error, Result};
use indexmap::IndexMap;

/// A validated bundle: ordered modules plus bundle-level config and metadata.
#[derive(Clone, Debug)]
pub struct AppBundle {
    modules: IndexMap<String, BundleModule>,
    config: BundleConfig,
    metadata: BundleMetadata,
}

impl AppBundle {
    pub fn new(
        modules: impl IntoIterator<Item = BundleModule>,
        config: BundleConfig,
        metadata: BundleMetadata,
    ) -> Self {
        Self {
            modules: modules
                .into_iter()
                .map(|module| (module.name().to_string(), module))
                .collect(),
            config,
            metadata,
        }
    }

    pub fn config(&self) -> &BundleConfig {
        &self.config
    }

    pub fn metadata(&self) -> &BundleMetadata {
        &self.metadata
    }

    pub fn modules(&self) -> impl Iterator<Item = &BundleModule> {
        self.modules.values()
    }

    pub fn module(&self, name: &str) -> Option<&BundleModule> {
        self.modules.get(name)
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn base_module(&self) -> Result<&BundleModule> {
        self.modules
            .get(BASE_MODULE_NAME)
            .ok_or_else(|| Error::invalid_bundle("bundle has no base module"))
    }

    /// Replaces one module, keeping order; used by preprocessors.
    pub fn with_module(mut self, module: BundleModule) -> Self {
        self.modules.insert(module.name().to_string(), module);
        self
    }

    pub fn with_config(mut self, config: BundleConfig) -> Self {
        self.config = config;
        self
    }
}

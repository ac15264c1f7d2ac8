//! Bundle configuration: the directives the publisher shipped alongside the
//! modules in `BundleConfig.pb`.

use crate::error::{Error, Result};
use crate::targeting::TargetingDimension;
use semver::Version;
use serde::{Deserialize, Serialize};

/// Default size above which re-compression moves to the worker pool.
pub const DEFAULT_RECOMPRESSION_THRESHOLD_BYTES: u64 = 100_000;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundleConfig {
    pub bundletool: BundletoolConfig,
    pub optimizations: OptimizationsConfig,
    pub compression: CompressionConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unsigned_embedded_apk_config: Vec<UnsignedEmbeddedApkConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_enabled_sdk_config: Option<RuntimeEnabledSdkConfig>,
}

impl BundleConfig {
    /// The version of the tool that built the bundle. Mandatory; it keys the
    /// version-pinned optimization defaults.
    pub fn version(&self) -> Result<Version> {
        let raw = self
            .bundletool
            .version
            .as_deref()
            .ok_or_else(|| Error::invalid_bundle("bundle config carries no bundletool version"))?;
        Version::parse(raw)
            .map_err(|e| Error::invalid_bundle(format!("invalid bundletool version '{raw}': {e}")))
    }

    /// Threshold above which re-compression is scheduled on the worker pool.
    pub fn recompression_threshold_bytes(&self) -> u64 {
        self.compression
            .recompression_threshold_bytes
            .unwrap_or(DEFAULT_RECOMPRESSION_THRESHOLD_BYTES)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BundletoolConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizationsConfig {
    pub splits_config: SplitsConfig,
    pub standalone_config: StandaloneConfig,
    /// Developer override; `None` defers to the version-pinned default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncompress_native_libraries: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncompress_dex_files: Option<UncompressDexFiles>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UncompressDexFiles {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uncompressed_dex_target_sdk: Option<u32>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitsConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub split_dimension: Vec<SplitDimensionConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandaloneConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub split_dimension: Vec<SplitDimensionConfig>,
    pub strip_64_bit_libraries: bool,
}

/// One developer toggle: enable (or, with `negate`, disable) a dimension.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitDimensionConfig {
    pub value: TargetingDimension,
    #[serde(default)]
    pub negate: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix_stripping: Option<SuffixStrippingConfig>,
}

impl SplitDimensionConfig {
    pub fn enable(value: TargetingDimension) -> Self {
        Self {
            value,
            negate: false,
            suffix_stripping: None,
        }
    }

    pub fn disable(value: TargetingDimension) -> Self {
        Self {
            value,
            negate: true,
            suffix_stripping: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuffixStrippingConfig {
    pub enabled: bool,
    /// Variant kept for devices matching nothing, e.g. the fallback tier.
    pub default_suffix: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetModuleCompression {
    #[default]
    Compressed,
    Uncompressed,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionConfig {
    /// Globs of entry paths to keep exactly as compressed in the source.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub uncompressed_glob: Vec<String>,
    /// Default for assets of install-time asset modules.
    pub install_time_asset_module_default: AssetModuleCompression,
    /// Override for [`DEFAULT_RECOMPRESSION_THRESHOLD_BYTES`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recompression_threshold_bytes: Option<u64>,
}

/// An embedded APK the publisher declared as intentionally unsigned; the
/// build marks it so the final signer covers it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnsignedEmbeddedApkConfig {
    pub path: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeEnabledSdkConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub runtime_enabled_sdk: Vec<RuntimeEnabledSdk>,
}

/// A runtime-enabled SDK dependency of the app.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RuntimeEnabledSdk {
    pub package_name: String,
    #[serde(default)]
    pub version_major: u32,
    /// SHA-256 digest of the SDK signing certificate.
    pub certificate_digest: String,
}

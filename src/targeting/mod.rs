//! Targeting model: the dimensions a split or variant can be targeted by,
//! and the (values, alternatives) pair carried per active dimension.
//!
//! `values` is what an entity targets; `alternatives` are the sibling
//! variants a device picker must choose between. For any dimension the two
//! sets are disjoint, and the variants produced by one splitter for one
//! input collectively partition the dimension's universe.

mod abi;
mod comparator;
mod density;
mod dimension;
mod graphics;
mod path;
mod texture;


pub use abi::{Abi, Sanitizer};
pub use comparator::{compare_variants, variant_sort_key};
pub use density::{DensityBucket, DensityQualifier};
pub use dimension::TargetingDimension;
pub use graphics::GraphicsApi;
pub use path::{TargetedDirectory, TargetedDirectorySegment, TargetingKey, TargetingValue};
pub use texture::TextureCompressionFormat;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Android L, the first release with split APK support. Devices below it get
/// standalone APKs.
pub const ANDROID_L_API_VERSION: u32 = 21;

/// The (values, alternatives) pair for one dimension.
///
/// Alternatives are only ever computed from sibling variants (see
/// `merge::populate_alternatives`), which keeps the disjointness invariant
/// by construction.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DimensionTargeting<T: Ord> {
    values: BTreeSet<T>,
    alternatives: BTreeSet<T>,
}

impl<T: Ord> Default for DimensionTargeting<T> {
    fn default() -> Self {
        Self {
            values: BTreeSet::new(),
            alternatives: BTreeSet::new(),
        }
    }
}

impl<T: Ord + Clone> DimensionTargeting<T> {
    pub fn of(values: impl IntoIterator<Item = T>) -> Self {
        Self {
            values: values.into_iter().collect(),
            alternatives: BTreeSet::new(),
        }
    }

    pub fn value(value: T) -> Self {
        Self::of([value])
    }

    pub fn values(&self) -> &BTreeSet<T> {
        &self.values
    }

    pub fn alternatives(&self) -> &BTreeSet<T> {
        &self.alternatives
    }

    /// True when neither values nor alternatives are set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.alternatives.is_empty()
    }

    pub fn has_values(&self) -> bool {
        !self.values.is_empty()
    }

    /// Returns a copy with `alternatives` replaced. Values already targeted
    /// are excluded, preserving `values ∩ alternatives = ∅`.
    pub fn with_alternatives(&self, alternatives: impl IntoIterator<Item = T>) -> Self {
        let alternatives = alternatives
            .into_iter()
            .filter(|alt| !self.values.contains(alt))
            .collect();
        Self {
            values: self.values.clone(),
            alternatives,
        }
    }

    /// Union of two targetings: values are merged, alternatives are merged
    /// and then purged of anything now targeted.
    pub fn union(&self, other: &Self) -> Self {
        let values: BTreeSet<T> = self.values.union(&other.values).cloned().collect();
        let alternatives = self
            .alternatives
            .union(&other.alternatives)
            .filter(|alt| !values.contains(*alt))
            .cloned()
            .collect();
        Self {
            values,
            alternatives,
        }
    }

    /// The smallest targeted value, used for deterministic ordering.
    pub fn min_value(&self) -> Option<&T> {
        self.values.iter().next()
    }
}

/// An ordered ABI combination, the unit of APEX image targeting.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MultiAbi(pub Vec<Abi>);

impl MultiAbi {
    pub fn suffix(&self) -> String {
        self.0
            .iter()
            .map(|abi| abi.suffix())
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl fmt::Display for MultiAbi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(Abi::as_str).collect();
        f.write_str(&names.join("."))
    }
}

/// Per-dimension targeting of one APK (split, standalone or system).
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApkTargeting {
    #[serde(default, skip_serializing_if = "DimensionTargeting::is_empty")]
    pub abi: DimensionTargeting<Abi>,
    #[serde(default, skip_serializing_if = "DimensionTargeting::is_empty")]
    pub multi_abi: DimensionTargeting<MultiAbi>,
    #[serde(default, skip_serializing_if = "DimensionTargeting::is_empty")]
    pub screen_density: DimensionTargeting<DensityBucket>,
    #[serde(default, skip_serializing_if = "DimensionTargeting::is_empty")]
    pub language: DimensionTargeting<String>,
    #[serde(default, skip_serializing_if = "DimensionTargeting::is_empty")]
    pub texture_compression_format: DimensionTargeting<TextureCompressionFormat>,
    #[serde(default, skip_serializing_if = "DimensionTargeting::is_empty")]
    pub device_tier: DimensionTargeting<String>,
    #[serde(default, skip_serializing_if = "DimensionTargeting::is_empty")]
    pub country_set: DimensionTargeting<String>,
    #[serde(default, skip_serializing_if = "DimensionTargeting::is_empty")]
    pub graphics_api: DimensionTargeting<GraphicsApi>,
    #[serde(default, skip_serializing_if = "DimensionTargeting::is_empty")]
    pub sdk_version: DimensionTargeting<u32>,
    /// Sanitizer instrumentation, set only on dedicated sanitizer splits so
    /// they never collide with plain ABI splits.
    #[serde(default, skip_serializing_if = "DimensionTargeting::is_empty")]
    pub sanitizer: DimensionTargeting<Sanitizer>,
}

impl ApkTargeting {
    pub fn for_abi(abi: Abi) -> Self {
        Self {
            abi: DimensionTargeting::value(abi),
            ..Self::default()
        }
    }

    pub fn for_multi_abi(multi_abi: MultiAbi) -> Self {
        Self {
            multi_abi: DimensionTargeting::value(multi_abi),
            ..Self::default()
        }
    }

    pub fn for_density(bucket: DensityBucket) -> Self {
        Self {
            screen_density: DimensionTargeting::value(bucket),
            ..Self::default()
        }
    }

    pub fn for_language(language: impl Into<String>) -> Self {
        Self {
            language: DimensionTargeting::value(language.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.abi.is_empty()
            && self.multi_abi.is_empty()
            && self.screen_density.is_empty()
            && self.language.is_empty()
            && self.texture_compression_format.is_empty()
            && self.device_tier.is_empty()
            && self.country_set.is_empty()
            && self.graphics_api.is_empty()
            && self.sdk_version.is_empty()
            && self.sanitizer.is_empty()
    }

    /// Dimensions with at least one targeted value, in declaration order.
    pub fn targeted_dimensions(&self) -> Vec<TargetingDimension> {
        let mut dims = Vec::new();
        if self.abi.has_values() || self.multi_abi.has_values() || self.sanitizer.has_values() {
            dims.push(TargetingDimension::Abi);
        }
        if self.screen_density.has_values() {
            dims.push(TargetingDimension::ScreenDensity);
        }
        if self.language.has_values() {
            dims.push(TargetingDimension::Language);
        }
        if self.texture_compression_format.has_values() {
            dims.push(TargetingDimension::TextureCompressionFormat);
        }
        if self.device_tier.has_values() {
            dims.push(TargetingDimension::DeviceTier);
        }
        if self.country_set.has_values() {
            dims.push(TargetingDimension::CountrySet);
        }
        if self.graphics_api.has_values() {
            dims.push(TargetingDimension::GraphicsApi);
        }
        if self.sdk_version.has_values() {
            dims.push(TargetingDimension::SdkVersion);
        }
        dims
    }

    /// Per-dimension union, used when fusing splits into shards.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            abi: self.abi.union(&other.abi),
            multi_abi: self.multi_abi.union(&other.multi_abi),
            screen_density: self.screen_density.union(&other.screen_density),
            language: self.language.union(&other.language),
            texture_compression_format: self
                .texture_compression_format
                .union(&other.texture_compression_format),
            device_tier: self.device_tier.union(&other.device_tier),
            country_set: self.country_set.union(&other.country_set),
            graphics_api: self.graphics_api.union(&other.graphics_api),
            sdk_version: self.sdk_version.union(&other.sdk_version),
            sanitizer: self.sanitizer.union(&other.sanitizer),
        }
    }

    /// Deterministic split-id suffix derived from the targeted values,
    /// e.g. `arm64_v8a`, `xxhdpi`, `en`, `astc`, `tier_low`,
    /// `countries_latam`. Multi-dimension targetings concatenate tokens in
    /// a fixed dimension order.
    pub fn suffix(&self) -> String {
        let mut tokens: Vec<String> = Vec::new();
        tokens.extend(self.abi.values().iter().map(|abi| abi.suffix()));
        tokens.extend(
            self.sanitizer
                .values()
                .iter()
                .map(|sanitizer| sanitizer.suffix().to_string()),
        );
        tokens.extend(self.multi_abi.values().iter().map(MultiAbi::suffix));
        tokens.extend(self.language.values().iter().cloned());
        tokens.extend(
            self.texture_compression_format
                .values()
                .iter()
                .map(|tcf| tcf.as_str().to_string()),
        );
        tokens.extend(
            self.device_tier
                .values()
                .iter()
                .map(|tier| format!("tier_{tier}")),
        );
        tokens.extend(
            self.country_set
                .values()
                .iter()
                .map(|cs| format!("countries_{cs}")),
        );
        tokens.extend(self.graphics_api.values().iter().map(|g| g.to_string()));
        tokens.extend(
            self.screen_density
                .values()
                .iter()
                .map(|d| d.as_str().to_string()),
        );
        tokens.extend(self.sdk_version.values().iter().map(|sdk| format!("sdk_{sdk}")));
        tokens.join("_")
    }
}

/// Targeting shared by every APK of a variant: SDK always, plus ABI and
/// screen density for standalone variants.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VariantTargeting {
    #[serde(default, skip_serializing_if = "DimensionTargeting::is_empty")]
    pub sdk_version: DimensionTargeting<u32>,
    #[serde(default, skip_serializing_if = "DimensionTargeting::is_empty")]
    pub abi: DimensionTargeting<Abi>,
    #[serde(default, skip_serializing_if = "DimensionTargeting::is_empty")]
    pub screen_density: DimensionTargeting<DensityBucket>,
    #[serde(default, skip_serializing_if = "DimensionTargeting::is_empty")]
    pub multi_abi: DimensionTargeting<MultiAbi>,
}

impl VariantTargeting {
    pub fn for_sdk(min_sdk: u32) -> Self {
        Self {
            sdk_version: DimensionTargeting::value(min_sdk),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sdk_version.is_empty()
            && self.abi.is_empty()
            && self.screen_density.is_empty()
            && self.multi_abi.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_and_alternatives_stay_disjoint() {
        let targeting = DimensionTargeting::of([Abi::X86, Abi::Arm64V8a])
            .with_alternatives([Abi::X86, Abi::ArmeabiV7a]);
        assert!(targeting.values().contains(&Abi::X86));
        assert!(!targeting.alternatives().contains(&Abi::X86));
        assert!(targeting.alternatives().contains(&Abi::ArmeabiV7a));
    }

    #[test]
    fn union_purges_newly_targeted_alternatives() {
        let a = DimensionTargeting::value(Abi::X86).with_alternatives([Abi::Arm64V8a]);
        let b = DimensionTargeting::value(Abi::Arm64V8a).with_alternatives([Abi::X86]);
        let merged = a.union(&b);
        assert_eq!(merged.values().len(), 2);
        assert!(merged.alternatives().is_empty());
    }

    #[test]
    fn suffix_tokens() {
        assert_eq!(ApkTargeting::for_abi(Abi::Arm64V8a).suffix(), "arm64_v8a");
        assert_eq!(
            ApkTargeting::for_density(DensityBucket::Xxhdpi).suffix(),
            "xxhdpi"
        );
        assert_eq!(ApkTargeting::for_language("en").suffix(), "en");

        let tier = ApkTargeting {
            device_tier: DimensionTargeting::value("low".to_string()),
            ..ApkTargeting::default()
        };
        assert_eq!(tier.suffix(), "tier_low");
    }

    #[test]
    fn targeted_dimensions_reports_active_dimensions() {
        let mut targeting = ApkTargeting::for_abi(Abi::X86);
        targeting.language = DimensionTargeting::value("fr".to_string());
        assert_eq!(
            targeting.targeted_dimensions(),
            vec![TargetingDimension::Abi, TargetingDimension::Language]
        );
    }

    #[test]
    fn empty_targeting_is_empty() {
        assert!(ApkTargeting::default().is_empty());
        assert!(VariantTargeting::default().is_empty());
        assert!(!ApkTargeting::for_language("ru").is_empty());
    }
}

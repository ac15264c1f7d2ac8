//! The module→split transformation pipeline.
//!
//! A splitter consumes one split and returns a non-empty ordered sequence of
//! splits with disjoint targeting in one dimension; the untargeted remainder
//! keeps the input's targeting and master flag. A pipeline applies each
//! splitter to every current split and concatenates the results, so the
//! output covers the dimensional cross product.

mod abi;
mod apex;
mod assets;
mod density;
mod language;
mod sanitizer;
mod suffix_strip;

#[cfg(test)]
mod density_test;
#[cfg(test)]
mod suffix_strip_test;

pub use abi::NativeLibrariesSplitter;
pub use apex::ApexImagesSplitter;
pub use assets::AssetsDimensionSplitter;
pub use density::DensityResourcesSplitter;
pub use language::LanguageResourcesSplitter;
pub use sanitizer::SanitizerLibrariesSplitter;
pub use suffix_strip::strip_asset_suffixes;

use crate::bundle::{AppBundle, BundleModule, ModuleType, SuffixStrippingConfig};
use crate::device::DeviceSpec;
use crate::error::{Error, Result, UserError, UserErrorKind};
use crate::sanitize;
use crate::split::{ModuleSplit, SplitType};
use crate::targeting::{TargetedDirectory, TargetingDimension, TargetingValue};
use std::collections::{BTreeMap, BTreeSet};

/// One dimension-wise splitting step.
pub trait ModuleSplitter {
    fn split(&self, split: &ModuleSplit) -> Result<Vec<ModuleSplit>>;
}

/// An ordered list of splitters applied as a cross product.
pub struct SplittingPipeline {
    splitters: Vec<Box<dyn ModuleSplitter>>,
}

impl SplittingPipeline {
    pub fn new(splitters: Vec<Box<dyn ModuleSplitter>>) -> Self {
        Self { splitters }
    }

    pub fn split(&self, split: ModuleSplit) -> Result<Vec<ModuleSplit>> {
        let mut splits = vec![split];
        for splitter in &self.splitters {
            let mut next = Vec::new();
            for split in &splits {
                next.extend(splitter.split(split)?);
            }
            splits = next;
        }
        Ok(splits)
    }
}

/// Runs the sanitizers and the full per-module pipeline: native libraries,
/// APEX images, resources and assets, in that order.
pub fn split_module(
    module: &BundleModule,
    split_type: SplitType,
    dimensions: &BTreeSet<TargetingDimension>,
    device_spec: Option<&DeviceSpec>,
) -> Result<Vec<ModuleSplit>> {
    let mut module = sanitize::sanitize_abi_dirs(module.clone());
    module = sanitize::renumber_classes_dex(module);
    if module.module_type() == ModuleType::Sdk {
        module = sanitize::remove_rpackage_dex(module);
    }

    let pipeline = make_pipeline(dimensions, device_spec);
    pipeline.split(ModuleSplit::master_of(&module, split_type))
}

/// Assembles the splitter list for the enabled dimensions. Language splitting
/// requires a known, non-empty device spec.
fn make_pipeline(
    dimensions: &BTreeSet<TargetingDimension>,
    device_spec: Option<&DeviceSpec>,
) -> SplittingPipeline {
    let language_enabled = dimensions.contains(&TargetingDimension::Language)
        && device_spec.is_some_and(|spec| !spec.is_empty());

    let mut splitters: Vec<Box<dyn ModuleSplitter>> = Vec::new();

    // Native libraries.
    if dimensions.contains(&TargetingDimension::Abi) {
        splitters.push(Box::new(NativeLibrariesSplitter));
    }
    splitters.push(Box::new(SanitizerLibrariesSplitter));

    // APEX images split unconditionally.
    splitters.push(Box::new(ApexImagesSplitter));

    // Resources.
    if dimensions.contains(&TargetingDimension::ScreenDensity) {
        splitters.push(Box::new(DensityResourcesSplitter));
    }
    if language_enabled {
        splitters.push(Box::new(LanguageResourcesSplitter));
    }

    // Assets.
    if language_enabled {
        splitters.push(Box::new(AssetsDimensionSplitter::new(
            TargetingDimension::Language,
        )));
    }
    for dimension in [
        TargetingDimension::TextureCompressionFormat,
        TargetingDimension::DeviceTier,
        TargetingDimension::CountrySet,
    ] {
        if dimensions.contains(&dimension) {
            splitters.push(Box::new(AssetsDimensionSplitter::new(dimension)));
        }
    }

    SplittingPipeline::new(splitters)
}

/// Splits every module of the bundle and applies the suffix-stripping pass.
pub fn split_all_modules(
    bundle: &AppBundle,
    split_type: SplitType,
    dimensions: &BTreeSet<TargetingDimension>,
    suffix_strippings: &BTreeMap<TargetingDimension, SuffixStrippingConfig>,
    device_spec: Option<&DeviceSpec>,
) -> Result<Vec<ModuleSplit>> {
    check_texture_parity(bundle)?;
    let mut splits = Vec::new();
    for module in bundle.modules() {
        splits.extend(split_module(module, split_type, dimensions, device_spec)?);
    }
    strip_asset_suffixes(splits, suffix_strippings)
}

/// Texture-format coverage must agree across modules: every module shipping
/// TCF-suffixed assets must cover the same set of formats.
pub fn check_texture_parity(bundle: &AppBundle) -> Result<()> {
    let mut reference: Option<(String, BTreeSet<String>)> = None;
    for module in bundle.modules() {
        let mut formats = BTreeSet::new();
        for entry in module.entries_under("assets/") {
            let Some(dir_path) = entry.path().rsplit_once('/').map(|(dir, _)| dir) else {
                continue;
            };
            let dir = TargetedDirectory::parse(dir_path)?;
            if let Some(TargetingValue::TextureCompressionFormat(tcf)) =
                dir.targeting_for(TargetingDimension::TextureCompressionFormat)
            {
                formats.insert(tcf.as_str().to_string());
            }
        }
        if formats.is_empty() {
            continue;
        }
        match &reference {
            None => reference = Some((module.name().to_string(), formats)),
            Some((reference_module, reference_formats)) if *reference_formats != formats => {
                return Err(Error::User(
                    UserError::new(
                        UserErrorKind::TextureCompressionParity,
                        format!(
                            "modules '{reference_module}' and '{}' target different texture \
                             compression formats ({:?} vs {:?})",
                            module.name(),
                            reference_formats,
                            formats
                        ),
                    )
                    .with_module(module.name()),
                ));
            }
            Some(_) => {}
        }
    }
    Ok(())
}

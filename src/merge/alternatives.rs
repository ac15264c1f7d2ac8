//! Alternative-targeting population: fills the `alternatives` side of every
//! targeting with the union of sibling values, the information the on-device
//! split picker needs.

use crate::error::{Error, Result};
use crate::split::ModuleSplit;
use crate::targeting::{DimensionTargeting, TargetingDimension, VariantTargeting};
use std::collections::BTreeSet;

/// Populates alternatives on config splits, per module and dimension: for
/// each dimension, the universe is the union of values across that module's
/// splits targeting the dimension; each split's alternatives become
/// `universe \ values`. Splits not targeting a dimension are left alone.
pub fn populate_split_alternatives(splits: Vec<ModuleSplit>) -> Vec<ModuleSplit> {
    let modules: BTreeSet<String> = splits
        .iter()
        .map(|split| split.module_name.clone())
        .collect();

    let mut splits = splits;
    for module in modules {
        let abi_universe = universe(&splits, &module, |split| &split.apk_targeting.abi);
        let density_universe =
            universe(&splits, &module, |split| &split.apk_targeting.screen_density);
        let language_universe =
            universe(&splits, &module, |split| &split.apk_targeting.language);
        let tcf_universe = universe(&splits, &module, |split| {
            &split.apk_targeting.texture_compression_format
        });
        let tier_universe = universe(&splits, &module, |split| &split.apk_targeting.device_tier);
        let country_universe =
            universe(&splits, &module, |split| &split.apk_targeting.country_set);

        for split in splits.iter_mut().filter(|split| split.module_name == module) {
            let mut targeting = split.apk_targeting.clone();
            targeting.abi = with_universe(&targeting.abi, &abi_universe);
            targeting.screen_density = with_universe(&targeting.screen_density, &density_universe);
            targeting.language = with_universe(&targeting.language, &language_universe);
            targeting.texture_compression_format =
                with_universe(&targeting.texture_compression_format, &tcf_universe);
            targeting.device_tier = with_universe(&targeting.device_tier, &tier_universe);
            targeting.country_set = with_universe(&targeting.country_set, &country_universe);
            *split = split.with_apk_targeting(targeting);
        }
    }
    splits
}

fn universe<T: Ord + Clone>(
    splits: &[ModuleSplit],
    module: &str,
    dimension: impl Fn(&ModuleSplit) -> &DimensionTargeting<T>,
) -> BTreeSet<T> {
    splits
        .iter()
        .filter(|split| split.module_name == module)
        .flat_map(|split| dimension(split).values().iter().cloned())
        .collect()
}

fn with_universe<T: Ord + Clone>(
    targeting: &DimensionTargeting<T>,
    universe: &BTreeSet<T>,
) -> DimensionTargeting<T> {
    if !targeting.has_values() {
        return targeting.clone();
    }
    targeting.with_alternatives(universe.iter().cloned())
}

/// Populates alternatives across finished variants for the selected
/// dimensions (ABI, SCREEN_DENSITY, SDK_VERSION).
///
/// The caller runs this once over the standalone variants with ABI and
/// screen density, and once over split and standalone variants together
/// with SDK version. Precondition: within the collection each selected
/// dimension is targeted by every variant or by none; a mix means the
/// pipeline produced an inconsistent variant set.
pub fn populate_variant_alternatives(
    variants: Vec<VariantTargeting>,
    dimensions: &[TargetingDimension],
) -> Result<Vec<VariantTargeting>> {
    let sdk_universe = if dimensions.contains(&TargetingDimension::SdkVersion) {
        variant_universe(&variants, "SDK_VERSION", |variant| &variant.sdk_version)?
    } else {
        None
    };
    let abi_universe = if dimensions.contains(&TargetingDimension::Abi) {
        variant_universe(&variants, "ABI", |variant| &variant.abi)?
    } else {
        None
    };
    let density_universe = if dimensions.contains(&TargetingDimension::ScreenDensity) {
        variant_universe(&variants, "SCREEN_DENSITY", |variant| &variant.screen_density)?
    } else {
        None
    };

    Ok(variants
        .into_iter()
        .map(|variant| {
            let sdk_version = populate_dim(&variant.sdk_version, &sdk_universe);
            let abi = populate_dim(&variant.abi, &abi_universe);
            let screen_density = populate_dim(&variant.screen_density, &density_universe);
            VariantTargeting {
                sdk_version,
                abi,
                screen_density,
                multi_abi: variant.multi_abi,
            }
        })
        .collect())
}

fn populate_dim<T: Ord + Clone>(
    targeting: &DimensionTargeting<T>,
    universe: &Option<BTreeSet<T>>,
) -> DimensionTargeting<T> {
    match universe {
        Some(universe) => targeting.with_alternatives(universe.iter().cloned()),
        None => targeting.clone(),
    }
}

/// `Some(universe)` when every variant targets the dimension, `None` when
/// none does, error on a mix.
fn variant_universe<T: Ord + Clone>(
    variants: &[VariantTargeting],
    dimension_name: &str,
    dimension: impl Fn(&VariantTargeting) -> &DimensionTargeting<T>,
) -> Result<Option<BTreeSet<T>>> {
    let targeted = variants
        .iter()
        .filter(|variant| dimension(variant).has_values())
        .count();
    if targeted == 0 {
        return Ok(None);
    }
    if targeted != variants.len() {
        return Err(Error::internal(format!(
            "dimension {dimension_name} is targeted by {targeted} of {} variants; \
             it must be all or none",
            variants.len()
        )));
    }
    Ok(Some(
        variants
            .iter()
            .flat_map(|variant| dimension(variant).values().iter().cloned())
            .collect(),
    ))
}

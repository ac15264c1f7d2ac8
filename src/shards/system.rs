//! System-image APK generation: one fused APK for the target device plus
//! additional splits for non-fused modules and unmatched languages.

use crate::bundle::{AppBundle, BundleModule, ModuleEntry};
use crate::device::DeviceSpec;
use crate::error::{Error, Result, UserError, UserErrorKind};
use crate::manifest::{SplitsXmlBuilder, serialize_xml};
use crate::optimizations::ApkOptimizations;
use crate::shards::SuffixManager;
use crate::split::{ModuleSplit, SplitType};
use crate::splitters::split_module;
use crate::targeting::{Abi, ApkTargeting, DensityBucket, DimensionTargeting, VariantTargeting};
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::str::FromStr;

const SPLITS_XML_PATH: &str = "root/splits.xml";

/// Builds the system APK set for one device: the fused system split first,
/// followed by the additional splits in deterministic order.
pub fn generate_system_apks(
    bundle: &AppBundle,
    optimizations: &ApkOptimizations,
    device: &DeviceSpec,
    fused_modules: &BTreeSet<String>,
) -> Result<Vec<ModuleSplit>> {
    if device.is_empty() {
        return Err(Error::invalid_command(
            "system mode requires a target device spec",
        ));
    }
    let device_abi = pick_device_abi(bundle, device)?;
    let device_density = DensityBucket::for_dpi(device.screen_density as u16);

    // The device matches exactly one ABI × density cell.
    let mut fused_sources: Vec<ModuleSplit> = Vec::new();
    let mut unmatched_languages: IndexMap<String, Vec<ModuleSplit>> = IndexMap::new();
    let mut additional: Vec<ModuleSplit> = Vec::new();

    for module in bundle.modules() {
        let splits = split_module(
            module,
            SplitType::System,
            &optimizations.split_dimensions,
            Some(device),
        )?;
        let is_fused = fused_modules.contains(module.name());
        for split in splits {
            if !split_matches_device(&split, device_abi, device_density) {
                continue;
            }
            if is_fused {
                match unmatched_language(&split, device) {
                    Some(language) => unmatched_languages
                        .entry(language)
                        .or_default()
                        .push(split),
                    None => fused_sources.push(split),
                }
            } else {
                additional.push(split);
            }
        }
    }

    let mut suffix_manager = SuffixManager::new();
    let mut splits_xml = SplitsXmlBuilder::new();

    // Additional language splits: one per language across modules.
    let mut language_splits: Vec<ModuleSplit> = Vec::new();
    for (language, sources) in &unmatched_languages {
        let fused_language = fuse_language_splits(bundle, language, sources)?;
        let suffix = suffix_manager.suffix_for(&fused_language);
        for source in sources {
            splits_xml.add_language_mapping(
                &source.module_name,
                language,
                &fused_language.split_id_with_suffix(&suffix),
            )?;
        }
        language_splits.push(apply_identity(fused_language, &suffix));
    }

    let base = bundle.base_module()?;
    let mut system = fuse_system_split(base, &fused_sources, device_abi, device_density)?;
    if !unmatched_languages.is_empty() {
        let xml = serialize_xml(&splits_xml.build())?;
        let mut entries = system.entries.clone();
        entries.push(ModuleEntry::new(
            SPLITS_XML_PATH,
            crate::bundle::ByteSource::from_bytes(xml.into_bytes()),
        ));
        system = system.with_entries(entries);
    }
    system = apply_uncompression(system, optimizations, true);

    // One device, one variant: every additional split shares it.
    let variant_targeting = system.variant_targeting.clone();
    let mut output = vec![system];
    output.extend(
        language_splits
            .into_iter()
            .map(|split| split.with_variant_targeting(variant_targeting.clone())),
    );
    for split in additional {
        let suffix = suffix_manager.suffix_for(&split);
        let split = apply_identity(split.with_split_type(SplitType::System), &suffix)
            .with_variant_targeting(variant_targeting.clone());
        output.push(apply_uncompression(split, optimizations, false));
    }
    Ok(output)
}

fn pick_device_abi(bundle: &AppBundle, device: &DeviceSpec) -> Result<Option<Abi>> {
    let bundle_abis: BTreeSet<Abi> = bundle
        .modules()
        .flat_map(|module| module.entries_under("lib/"))
        .filter_map(|entry| {
            entry
                .path()
                .strip_prefix("lib/")
                .and_then(|rest| rest.split('/').next())
                .and_then(Abi::from_dir_name)
        })
        .collect();
    if bundle_abis.is_empty() {
        return Ok(None);
    }
    for name in &device.supported_abis {
        if let Ok(abi) = Abi::from_str(name)
            && bundle_abis.contains(&abi)
        {
            return Ok(Some(abi));
        }
    }
    Err(Error::User(UserError::new(
        UserErrorKind::DeviceNotFound,
        format!(
            "none of the device ABIs {:?} matches the bundle's native code",
            device.supported_abis
        ),
    )))
}

fn split_matches_device(
    split: &ModuleSplit,
    device_abi: Option<Abi>,
    device_density: DensityBucket,
) -> bool {
    if split.apk_targeting.sanitizer.has_values() {
        return false;
    }
    let abi_targeting = &split.apk_targeting.abi;
    if abi_targeting.has_values()
        && !device_abi.is_some_and(|abi| abi_targeting.values().contains(&abi))
    {
        return false;
    }
    let density_targeting = &split.apk_targeting.screen_density;
    if density_targeting.has_values() && !density_targeting.values().contains(&device_density) {
        return false;
    }
    true
}

/// A language split whose language the device does not speak: kept out of
/// the fused APK and re-emitted as an additional split.
fn unmatched_language(split: &ModuleSplit, device: &DeviceSpec) -> Option<String> {
    let languages = split.apk_targeting.language.values();
    if languages.is_empty() {
        return None;
    }
    languages
        .iter()
        .find(|language| !device.supports_language(language))
        .cloned()
}

/// Fuses same-language splits from multiple modules into one split owned by
/// the base module.
fn fuse_language_splits(
    bundle: &AppBundle,
    language: &str,
    sources: &[ModuleSplit],
) -> Result<ModuleSplit> {
    let base = bundle.base_module()?;
    let mut entries: Vec<ModuleEntry> = Vec::new();
    for source in sources {
        for entry in &source.entries {
            if entries.iter().all(|existing| existing.path() != entry.path()) {
                entries.push(entry.clone());
            }
        }
    }
    let merged_table = crate::resources::ResourceTable::merged(
        sources
            .iter()
            .filter_map(|split| split.resource_table.as_ref()),
    );

    Ok(ModuleSplit::master_of(base, SplitType::System)
        .with_master_split(false)
        .with_apk_targeting(ApkTargeting::for_language(language))
        .with_entries(entries)
        .with_resource_table(merged_table)
        .with_native_config(None)
        .with_apex_config(None))
}

/// The single fused system APK: base manifest, split identity removed.
fn fuse_system_split(
    base: &BundleModule,
    sources: &[ModuleSplit],
    device_abi: Option<Abi>,
    device_density: DensityBucket,
) -> Result<ModuleSplit> {
    let mut entries: Vec<ModuleEntry> = Vec::new();
    for source in sources {
        for entry in &source.entries {
            if entries.iter().all(|existing| existing.path() != entry.path()) {
                entries.push(entry.clone());
            }
        }
    }
    let merged_table = crate::resources::ResourceTable::merged(
        sources
            .iter()
            .filter_map(|split| split.resource_table.as_ref()),
    );

    let mut apk_targeting = ApkTargeting::default();
    let mut variant_targeting = VariantTargeting {
        sdk_version: DimensionTargeting::value(1),
        screen_density: DimensionTargeting::value(device_density),
        ..VariantTargeting::default()
    };
    if let Some(abi) = device_abi {
        apk_targeting.abi = DimensionTargeting::value(abi);
        variant_targeting.abi = DimensionTargeting::value(abi);
    }
    apk_targeting.screen_density = DimensionTargeting::value(device_density);

    Ok(ModuleSplit::master_of(base, SplitType::System)
        .with_manifest(base.manifest().edit().remove_split_name().finish())
        .with_entries(entries)
        .with_resource_table(merged_table)
        .with_apk_targeting(apk_targeting)
        .with_variant_targeting(variant_targeting)
        .with_native_config(None)
        .with_apex_config(None))
}

fn apply_identity(split: ModuleSplit, suffix: &str) -> ModuleSplit {
    let split_id = split.split_id_with_suffix(suffix);
    split.with_split_identity(&split_id)
}

/// System-image uncompression directives: native libraries are stored and
/// loaded in place (`extractNativeLibs=false`), dex files are stored.
fn apply_uncompression(
    split: ModuleSplit,
    optimizations: &ApkOptimizations,
    is_master: bool,
) -> ModuleSplit {
    let mut split = split;
    if optimizations.uncompress_native_libraries {
        let entries: Vec<ModuleEntry> = split
            .entries
            .iter()
            .map(|entry| {
                if entry.path().starts_with("lib/") && entry.path().ends_with(".so") {
                    entry.with_force_uncompressed(true)
                } else {
                    entry.clone()
                }
            })
            .collect();
        split = split.with_entries(entries);
        if is_master {
            let manifest = split.manifest.edit().set_extract_native_libs(false).finish();
            split = split.with_manifest(manifest);
        }
    }
    if optimizations.uncompress_dex_files {
        let entries: Vec<ModuleEntry> = split
            .entries
            .iter()
            .map(|entry| {
                if entry.path().starts_with("dex/") {
                    entry.with_force_uncompressed(true)
                } else {
                    entry.clone()
                }
            })
            .collect();
        split = split.with_entries(entries);
    }
    split
}

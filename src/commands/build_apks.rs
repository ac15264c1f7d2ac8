//! The build-apks command: bundle in, APK set out.

use crate::apkset::{ApkSetWriter, OutputFormat, ZipApkSerializer};
use crate::bundle::read_bundle;
use crate::device::DeviceSpec;
use crate::error::{Error, Result};
use crate::merge::{merge_same_targeting, populate_split_alternatives, populate_variant_alternatives};
use crate::optimizations::{ApkOptimizations, merge_optimizations};
use crate::preprocess::{
    BundlePreprocessor, EmbeddedApkPreprocessor, RecompressionPreprocessor,
    RuntimeSdkCertificatePreprocessor, run_preprocessors,
};
use crate::shards::{generate_standalone_shards, generate_system_apks};
use crate::split::{ModuleSplit, SplitType};
use crate::splitters::split_all_modules;
use crate::targeting::{
    ANDROID_L_API_VERSION, TargetingDimension, VariantTargeting,
};
use indexmap::IndexMap;
use log::info;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ApkBuildMode {
    #[default]
    Default,
    Universal,
    System,
}

impl FromStr for ApkBuildMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "universal" => Ok(Self::Universal),
            "system" => Ok(Self::System),
            other => Err(format!("unrecognized build mode: {other}")),
        }
    }
}

#[derive(Debug)]
pub struct BuildApksCommand {
    pub bundle_path: PathBuf,
    pub output_path: PathBuf,
    pub mode: ApkBuildMode,
    pub output_format: OutputFormat,
    pub device_spec_path: Option<PathBuf>,
    /// Command-line override replacing the split dimensions entirely.
    pub split_dimension_override: BTreeSet<TargetingDimension>,
    /// Modules fused into the system APK in system mode.
    pub fused_modules: BTreeSet<String>,
    pub sdk_certificate_digest: Option<String>,
    pub overwrite: bool,
}

impl BuildApksCommand {
    pub fn execute(&self) -> Result<PathBuf> {
        if self.output_path.exists() && !self.overwrite {
            return Err(Error::invalid_command(format!(
                "output '{}' already exists, pass --overwrite to replace it",
                self.output_path.display()
            )));
        }
        let device_spec = self
            .device_spec_path
            .as_deref()
            .map(DeviceSpec::from_json_file)
            .transpose()?;
        if self.mode == ApkBuildMode::System && device_spec.is_none() {
            return Err(Error::invalid_command(
                "system mode requires --device-spec",
            ));
        }

        let bundle = read_bundle(&self.bundle_path)?;
        let version = bundle.config().version()?;

        // Temp space is owned by this invocation and removed on any exit.
        let temp = tempfile::tempdir()?;
        let staging = temp.path().join("staging");
        std::fs::create_dir_all(&staging)?;

        let preprocessors: Vec<Box<dyn BundlePreprocessor>> = vec![
            Box::new(EmbeddedApkPreprocessor),
            Box::new(RuntimeSdkCertificatePreprocessor::new(
                self.sdk_certificate_digest.clone(),
            )),
            Box::new(RecompressionPreprocessor::new(
                &self.bundle_path,
                temp.path().join("normalized.aab"),
            )),
        ];
        let bundle = run_preprocessors(bundle, &preprocessors)?;

        let optimizations = match self.mode {
            ApkBuildMode::Universal => ApkOptimizations::universal(),
            _ => merge_optimizations(bundle.config(), Some(&self.split_dimension_override))?,
        };

        let splits = match self.mode {
            ApkBuildMode::Default => {
                let mut splits = self.build_split_apks(&bundle, &optimizations, device_spec.as_ref())?;
                if !optimizations.standalone_dimensions.is_empty() {
                    splits.extend(generate_standalone_shards(&bundle, &optimizations, false)?);
                }
                splits
            }
            ApkBuildMode::Universal => generate_standalone_shards(&bundle, &optimizations, true)?,
            ApkBuildMode::System => generate_system_apks(
                &bundle,
                &optimizations,
                device_spec.as_ref().expect("checked above"),
                &self.fused_modules,
            )?,
        };
        let splits = finalize_variant_targeting(splits)?;
        info!("produced {} APKs across the variants", splits.len());

        let serializer = ZipApkSerializer;
        let writer = ApkSetWriter::new(&serializer, self.output_format, version.to_string());
        writer.write(&splits, &staging, &self.output_path)
    }

    /// The split-APK path: per-module pipelines, same-targeting merge,
    /// sibling alternatives, split ids.
    fn build_split_apks(
        &self,
        bundle: &crate::bundle::AppBundle,
        optimizations: &ApkOptimizations,
        device_spec: Option<&DeviceSpec>,
    ) -> Result<Vec<ModuleSplit>> {
        let splits = split_all_modules(
            bundle,
            SplitType::Split,
            &optimizations.split_dimensions,
            &optimizations.suffix_strippings,
            device_spec,
        )?;
        let splits = merge_same_targeting(splits)?;
        let splits: Vec<ModuleSplit> = splits
            .into_iter()
            .map(|split| {
                split.with_variant_targeting(VariantTargeting::for_sdk(ANDROID_L_API_VERSION))
            })
            .collect();
        let splits = populate_split_alternatives(splits);
        Ok(splits
            .into_iter()
            .map(|split| split.with_split_identity_applied())
            .collect())
    }
}

/// Variant-level alternative population: SDK across every variant, ABI and
/// screen density among the standalone variants.
fn finalize_variant_targeting(splits: Vec<ModuleSplit>) -> Result<Vec<ModuleSplit>> {
    let mut unique: IndexMap<VariantTargeting, VariantTargeting> = IndexMap::new();
    for split in &splits {
        unique
            .entry(split.variant_targeting.clone())
            .or_insert_with(|| split.variant_targeting.clone());
    }
    let originals: Vec<VariantTargeting> = unique.keys().cloned().collect();

    let sdk_populated =
        populate_variant_alternatives(originals.clone(), &[TargetingDimension::SdkVersion])?;
    for (original, populated) in originals.iter().zip(sdk_populated) {
        unique[original] = populated;
    }

    let standalone_keys: Vec<VariantTargeting> = originals
        .iter()
        .filter(|targeting| targeting.abi.has_values() || targeting.screen_density.has_values())
        .cloned()
        .collect();
    if !standalone_keys.is_empty() {
        let current: Vec<VariantTargeting> = standalone_keys
            .iter()
            .map(|key| unique[key].clone())
            .collect();
        let populated = populate_variant_alternatives(
            current,
            &[TargetingDimension::Abi, TargetingDimension::ScreenDensity],
        )?;
        for (key, populated) in standalone_keys.iter().zip(populated) {
            unique[key] = populated;
        }
    }

    Ok(splits
        .into_iter()
        .map(|split| {
            let populated = unique[&split.variant_targeting].clone();
            split.with_variant_targeting(populated)
        })
        .collect())
}


//! Serializes finished splits and records the table of contents.

use crate::apkset::toc::{ApkDescription, ApkSetEntry, BuildApksResult, TOC_FILE, Variant};
use crate::apkset::serializer::ApkSerializer;
use crate::codec;
use crate::error::{Error, Result};
use crate::split::{ModuleSplit, SplitType};
use crate::targeting::{VariantTargeting, compare_variants};
use indexmap::IndexMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;

/// Shape of the final output: a zip containing the APKs plus `toc.pb`, or a
/// directory with them loose.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    ApkSet,
    Directory,
}

pub struct ApkSetWriter<'a> {
    serializer: &'a dyn ApkSerializer,
    format: OutputFormat,
    bundletool_version: String,
}

impl<'a> ApkSetWriter<'a> {
    pub fn new(
        serializer: &'a dyn ApkSerializer,
        format: OutputFormat,
        bundletool_version: impl Into<String>,
    ) -> Self {
        Self {
            serializer,
            format,
            bundletool_version: bundletool_version.into(),
        }
    }

    /// Serializes every split into `staging_dir`, groups them into variants
    /// in preference order, and assembles the final output at `output_path`.
    pub fn write(
        &self,
        splits: &[ModuleSplit],
        staging_dir: &Path,
        output_path: &Path,
    ) -> Result<PathBuf> {
        // Group by variant targeting, emission order by the comparator.
        let mut variants: IndexMap<VariantTargeting, Vec<&ModuleSplit>> = IndexMap::new();
        for split in splits {
            variants
                .entry(split.variant_targeting.clone())
                .or_default()
                .push(split);
        }
        variants.sort_by(|targeting_a, _, targeting_b, _| compare_variants(targeting_a, targeting_b));

        let mut toc_variants: Vec<Variant> = Vec::new();
        let mut apk_files: Vec<(String, PathBuf)> = Vec::new();

        for (variant_number, (targeting, variant_splits)) in variants.into_iter().enumerate() {
            let mut apk_sets: IndexMap<String, Vec<ApkDescription>> = IndexMap::new();
            for split in variant_splits {
                let set_path = self.apk_set_path(split);
                let file_path = staging_dir.join(set_path.replace('/', "_"));
                self.serializer.serialize(split, &file_path)?;
                apk_files.push((set_path.clone(), file_path));
                apk_sets
                    .entry(split.module_name.clone())
                    .or_default()
                    .push(ApkDescription::for_split(split, set_path));
            }
            toc_variants.push(Variant {
                variant_number: variant_number as u32,
                targeting,
                apk_sets: apk_sets
                    .into_iter()
                    .map(|(module_name, apk_descriptions)| ApkSetEntry {
                        module_name,
                        apk_descriptions,
                    })
                    .collect(),
            });
        }

        let toc = BuildApksResult {
            bundletool_version: self.bundletool_version.clone(),
            variants: toc_variants,
        };
        match self.format {
            OutputFormat::ApkSet => self.write_apk_set_zip(&toc, &apk_files, output_path),
            OutputFormat::Directory => self.write_directory(&toc, &apk_files, output_path),
        }
    }

    /// Path of the APK inside the set, derived from split type and identity.
    fn apk_set_path(&self, split: &ModuleSplit) -> String {
        let suffix = split.apk_targeting.suffix();
        match split.split_type {
            SplitType::Standalone => format!(
                "standalones/standalone-{}.apk",
                if suffix.is_empty() { "universal".to_string() } else { suffix }
            ),
            SplitType::System if split.master_split => "system/system.apk".to_string(),
            SplitType::System => format!(
                "splits/{}.apk",
                split
                    .manifest
                    .split_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{}-{suffix}", split.module_name))
            ),
            SplitType::Split | SplitType::Instant | SplitType::AssetSlice => {
                if split.master_split {
                    format!("splits/{}-master.apk", split.module_name)
                } else {
                    format!("splits/{}-{suffix}.apk", split.module_name)
                }
            }
        }
    }

    fn write_apk_set_zip(
        &self,
        toc: &BuildApksResult,
        apk_files: &[(String, PathBuf)],
        output_path: &Path,
    ) -> Result<PathBuf> {
        let file = std::fs::File::create(output_path)?;
        let mut writer = zip::ZipWriter::new(file);
        // APKs are already compressed containers; recompressing them buys
        // nothing.
        let stored = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored)
            .large_file(true);

        writer.start_file(TOC_FILE, SimpleFileOptions::default())?;
        writer.write_all(&codec::encode_toc(toc)?)?;

        for (set_path, file_path) in apk_files {
            writer.start_file(set_path.as_str(), stored)?;
            let mut source = std::fs::File::open(file_path)?;
            std::io::copy(&mut source, &mut writer)?;
        }
        writer.finish()?;
        Ok(output_path.to_path_buf())
    }

    fn write_directory(
        &self,
        toc: &BuildApksResult,
        apk_files: &[(String, PathBuf)],
        output_dir: &Path,
    ) -> Result<PathBuf> {
        std::fs::create_dir_all(output_dir)?;
        std::fs::write(output_dir.join(TOC_FILE), codec::encode_toc(toc)?)?;
        for (set_path, file_path) in apk_files {
            let target = output_dir.join(set_path);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(file_path, &target).map_err(Error::from)?;
        }
        Ok(output_dir.to_path_buf())
    }
}

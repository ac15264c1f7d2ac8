//! Table-of-contents model for the APK set.

use crate::split::ModuleSplit;
use crate::targeting::{ApkTargeting, VariantTargeting};
use serde::Serialize;

/// File name of the table of contents inside the APK set.
pub const TOC_FILE: &str = "toc.pb";

#[derive(Debug, Serialize)]
pub struct BuildApksResult {
    pub bundletool_version: String,
    pub variants: Vec<Variant>,
}

/// One variant: an equivalence class of APKs sharing variant targeting.
#[derive(Debug, Serialize)]
pub struct Variant {
    pub variant_number: u32,
    pub targeting: VariantTargeting,
    pub apk_sets: Vec<ApkSetEntry>,
}

/// The APKs one module contributes to a variant.
#[derive(Debug, Serialize)]
pub struct ApkSetEntry {
    pub module_name: String,
    pub apk_descriptions: Vec<ApkDescription>,
}

#[derive(Debug, Serialize)]
pub struct ApkDescription {
    /// Path of the APK inside the set.
    pub path: String,
    pub targeting: ApkTargeting,
    pub split_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_id: Option<String>,
    pub is_master_split: bool,
}

impl ApkDescription {
    pub fn for_split(split: &ModuleSplit, path: impl Into<String>) -> Self {
        let split_id = split.manifest.split_name().map(str::to_string);
        Self {
            path: path.into(),
            targeting: split.apk_targeting.clone(),
            split_type: split.split_type.to_string(),
            split_id,
            is_master_split: split.master_split,
        }
    }
}

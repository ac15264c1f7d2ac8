//! Target device specification, as produced by `adb shell` probing or
//! hand-written JSON. Drives system-image builds and language targeting.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeviceSpec {
    pub supported_abis: Vec<String>,
    /// BCP-47 tags in preference order, e.g. `["en-US", "fr"]`.
    pub supported_locales: Vec<String>,
    pub screen_density: u32,
    pub sdk_version: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub device_features: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub gl_extensions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_tier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_set: Option<String>,
}

impl DeviceSpec {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            Error::invalid_command(format!("malformed device spec {}: {e}", path.display()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Whether the device supports the given resource language. Locale tags
    /// match on their language subtag: a device speaking `en-US` matches
    /// language `en`.
    pub fn supports_language(&self, language: &str) -> bool {
        self.supported_locales
            .iter()
            .any(|locale| language_of(locale).eq_ignore_ascii_case(language))
    }

    /// Languages of the supported locales, deduplicated, preference order.
    pub fn languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = Vec::new();
        for locale in &self.supported_locales {
            let language = language_of(locale).to_lowercase();
            if !languages.contains(&language) {
                languages.push(language);
            }
        }
        languages
    }
}

fn language_of(locale: &str) -> &str {
    locale
        .split(['-', '_'])
        .next()
        .unwrap_or(locale)
}

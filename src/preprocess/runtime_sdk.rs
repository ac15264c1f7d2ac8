//! Overrides the certificate digests of runtime-enabled SDK dependencies,
//! used when the app is re-signed for local deployment and the SDKs come
//! from a debug-signed repository.

use crate::bundle::AppBundle;
use crate::error::{Error, Result};
use crate::preprocess::BundlePreprocessor;
use regex::Regex;
use std::sync::LazyLock;

/// Colon-separated SHA-256 fingerprint, as printed by apksigner.
static CERT_DIGEST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-F]{2}(:[0-9A-F]{2}){31}$").expect("static regex"));

pub struct RuntimeSdkCertificatePreprocessor {
    override_digest: Option<String>,
}

impl RuntimeSdkCertificatePreprocessor {
    pub fn new(override_digest: Option<String>) -> Self {
        Self { override_digest }
    }
}

impl BundlePreprocessor for RuntimeSdkCertificatePreprocessor {
    fn preprocess(&self, bundle: AppBundle) -> Result<AppBundle> {
        let Some(digest) = &self.override_digest else {
            return Ok(bundle);
        };
        let digest = digest.to_uppercase();
        if !CERT_DIGEST.is_match(&digest) {
            return Err(Error::invalid_command(format!(
                "'{digest}' is not a colon-separated SHA-256 certificate fingerprint"
            )));
        }

        let mut config = bundle.config().clone();
        let Some(sdk_config) = &mut config.runtime_enabled_sdk_config else {
            return Ok(bundle);
        };
        for sdk in &mut sdk_config.runtime_enabled_sdk {
            sdk.certificate_digest = digest.clone();
        }
        Ok(bundle.with_config(config))
    }
}

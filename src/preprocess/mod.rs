//! Whole-bundle rewrites applied in a fixed order before splitting.

mod embedded_apk;
mod recompress;
mod runtime_sdk;

#[cfg(test)]
mod recompress_test;

pub use embedded_apk::EmbeddedApkPreprocessor;
pub use recompress::{
    CompressionChoice, RecompressionPreprocessor, classify_entry, recompress_bundle,
};
pub use runtime_sdk::RuntimeSdkCertificatePreprocessor;

use crate::bundle::AppBundle;
use crate::error::Result;

/// One whole-bundle rewrite. Preprocessors take ownership and return a new
/// bundle; they run in the fixed order the command assembles them in.
pub trait BundlePreprocessor {
    fn preprocess(&self, bundle: AppBundle) -> Result<AppBundle>;
}

/// Applies the preprocessors front to back.
pub fn run_preprocessors(
    bundle: AppBundle,
    preprocessors: &[Box<dyn BundlePreprocessor>],
) -> Result<AppBundle> {
    let mut bundle = bundle;
    for preprocessor in preprocessors {
        bundle = preprocessor.preprocess(bundle)?;
    }
    Ok(bundle)
}

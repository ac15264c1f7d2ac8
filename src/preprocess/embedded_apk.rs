//! Marks declared-unsigned embedded APKs so the final signer covers them.

use crate::bundle::AppBundle;
use crate::error::{Error, Result};
use crate::preprocess::BundlePreprocessor;

pub struct EmbeddedApkPreprocessor;

impl BundlePreprocessor for EmbeddedApkPreprocessor {
    fn preprocess(&self, bundle: AppBundle) -> Result<AppBundle> {
        let declared: Vec<String> = bundle
            .config()
            .unsigned_embedded_apk_config
            .iter()
            .map(|config| config.path.clone())
            .collect();
        if declared.is_empty() {
            return Ok(bundle);
        }

        let mut bundle = bundle;
        for path in declared {
            let mut found = false;
            let modules: Vec<_> = bundle.modules().cloned().collect();
            for module in modules {
                let Some(entry) = module.entry(&path) else {
                    continue;
                };
                found = true;
                let marked = entry.with_should_sign(true);
                let entries: Vec<_> = module
                    .entries()
                    .map(|existing| {
                        if existing.path() == path {
                            marked.clone()
                        } else {
                            existing.clone()
                        }
                    })
                    .collect();
                bundle = bundle.with_module(module.clone().with_entries(entries));
            }
            if !found {
                return Err(Error::invalid_bundle(format!(
                    "unsigned embedded APK '{path}' declared in the bundle config does not exist"
                )));
            }
        }
        Ok(bundle)
    }
}

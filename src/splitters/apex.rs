//! Splits APEX images by their declared multi-ABI combinations.

use crate::bundle::{ApexConfig, ModuleEntry};
use crate::error::{Error, Result, UserError, UserErrorKind};
use crate::split::ModuleSplit;
use crate::splitters::ModuleSplitter;
use crate::targeting::ApkTargeting;

/// Runs unconditionally: a module with an apex config gets one split per
/// declared ABI combination, each carrying its image file.
pub struct ApexImagesSplitter;

impl ModuleSplitter for ApexImagesSplitter {
    fn split(&self, split: &ModuleSplit) -> Result<Vec<ModuleSplit>> {
        let Some(config) = &split.apex_config else {
            return Ok(vec![split.clone()]);
        };
        if config.images.is_empty() {
            return Err(Error::User(
                UserError::new(
                    UserErrorKind::InvalidApexConfig,
                    format!("module '{}' declares an empty apex config", split.module_name),
                )
                .with_module(&split.module_name),
            ));
        }

        let image_paths: Vec<&str> = config.images.iter().map(|image| image.path.as_str()).collect();
        let remainder: Vec<ModuleEntry> = split
            .entries
            .iter()
            .filter(|entry| !image_paths.contains(&entry.path()))
            .cloned()
            .collect();

        let mut output = vec![split.with_entries(remainder).with_apex_config(None)];
        for image in &config.images {
            let entry = split.entry(&image.path).ok_or_else(|| {
                Error::User(
                    UserError::new(
                        UserErrorKind::InvalidApexConfig,
                        format!(
                            "apex config of module '{}' references missing image '{}'",
                            split.module_name, image.path
                        ),
                    )
                    .with_module(&split.module_name)
                    .with_path(&image.path),
                )
            })?;
            output.push(
                split
                    .with_master_split(false)
                    .with_apk_targeting(
                        split
                            .apk_targeting
                            .union(&ApkTargeting::for_multi_abi(image.multi_abi.clone())),
                    )
                    .with_entries(vec![entry.clone()])
                    .with_resource_table(None)
                    .with_apex_config(Some(ApexConfig {
                        images: vec![image.clone()],
                    })),
            );
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use crate::bundle::{BundleModule, ByteSource, ModuleEntry};
    use crate::error::UserErrorKind;
    use crate::manifest::AndroidManifest;
    use crate::resources::{
        ConfigValue, ResourceConfig, ResourceEntry, ResourcePackage, ResourceTable, ResourceType,
        ResourceValue,
    };
    use crate::split::{ModuleSplit, SplitType};
    use crate::splitters::{DensityResourcesSplitter, ModuleSplitter};
    use crate::targeting::{DensityBucket, DensityQualifier};
    use std::collections::BTreeSet;

    fn table(configs: Vec<(DensityQualifier, &str)>) -> ResourceTable {
        ResourceTable {
            packages: vec![ResourcePackage {
                id: 0x7F,
                name: "com.example.app".to_string(),
                types: vec![ResourceType {
                    id: 0x01,
                    name: "drawable".to_string(),
                    entries: vec![ResourceEntry {
                        id: 0,
                        name: "img".to_string(),
                        configs: configs
                            .into_iter()
                            .map(|(density, path)| ConfigValue {
                                config: ResourceConfig::for_density(density),
                                value: ResourceValue::FileReference(path.to_string()),
                            })
                            .collect(),
                    }],
                }],
            }],
        }
    }

    fn split_with_table(table: ResourceTable) -> ModuleSplit {
        let mut module = BundleModule::new("base", AndroidManifest::for_package("com.example.app"))
            .with_resource_table(table.clone());
        for path in table.referenced_files() {
            module = module.with_entry(ModuleEntry::new(path, ByteSource::from_bytes(vec![0])));
        }
        ModuleSplit::master_of(&module, SplitType::Split)
    }

    #[test]
    fn density_buckets_claim_their_files() {
        let input = split_with_table(table(vec![
            (DensityQualifier::Dpi(240), "res/drawable-hdpi/img.png"),
            (DensityQualifier::Dpi(480), "res/drawable-xxhdpi/img.png"),
            (DensityQualifier::Unqualified, "res/drawable/img.png"),
        ]));

        let output = DensityResourcesSplitter.split(&input).unwrap();
        assert_eq!(output.len(), 3);

        assert!(output[0].master_split);
        assert_eq!(output[0].entry_paths(), vec!["res/drawable/img.png"]);

        assert_eq!(
            output[1].apk_targeting.screen_density.values(),
            &BTreeSet::from([DensityBucket::Hdpi])
        );
        assert_eq!(output[1].entry_paths(), vec!["res/drawable-hdpi/img.png"]);
        assert_eq!(
            output[2].apk_targeting.screen_density.values(),
            &BTreeSet::from([DensityBucket::Xxhdpi])
        );
    }

    #[test]
    fn anydpi_rides_in_every_split_and_the_master() {
        let input = split_with_table(table(vec![
            (DensityQualifier::AnyDpi, "res/drawable-anydpi/vector.xml"),
            (DensityQualifier::Dpi(240), "res/drawable-hdpi/img.png"),
            (DensityQualifier::Dpi(480), "res/drawable-xxhdpi/img.png"),
        ]));

        let output = DensityResourcesSplitter.split(&input).unwrap();
        for split in &output {
            assert!(
                split
                    .entry_paths()
                    .contains(&"res/drawable-anydpi/vector.xml"),
                "anydpi entry missing from {:?}",
                split.apk_targeting
            );
        }
    }

    #[test]
    fn missing_referenced_file_aborts_with_module_and_path() {
        let module = BundleModule::new("base", AndroidManifest::for_package("com.example.app"))
            .with_resource_table(table(vec![(
                DensityQualifier::Dpi(480),
                "res/drawable-xxhdpi/missing.png",
            )]));
        let input = ModuleSplit::master_of(&module, SplitType::Split);

        let err = DensityResourcesSplitter.split(&input).unwrap_err();
        assert_eq!(err.user_kind(), Some(UserErrorKind::ResourceTableMissingFile));
        let crate::error::Error::User(user) = err else {
            panic!("expected user error");
        };
        assert_eq!(user.module.as_deref(), Some("base"));
        assert_eq!(user.path.as_deref(), Some("res/drawable-xxhdpi/missing.png"));
    }

    #[test]
    fn split_without_resource_table_passes_through() {
        let module = BundleModule::new("base", AndroidManifest::for_package("com.example.app"));
        let input = ModuleSplit::master_of(&module, SplitType::Split);
        let output = DensityResourcesSplitter.split(&input).unwrap();
        assert_eq!(output.len(), 1);
    }
}

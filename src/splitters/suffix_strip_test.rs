#[cfg(test)]
mod tests {
    use crate::bundle::{BundleModule, ByteSource, ModuleEntry, SuffixStrippingConfig};
    use crate::manifest::AndroidManifest;
    use crate::split::{ModuleSplit, SplitType};
    use crate::splitters::strip_asset_suffixes;
    use crate::targeting::{ApkTargeting, DimensionTargeting, TargetingDimension, TextureCompressionFormat};
    use std::collections::BTreeMap;

    fn split_with_entries(paths: &[&str]) -> ModuleSplit {
        let mut module =
            BundleModule::new("textures", AndroidManifest::for_package("com.example.app"));
        for path in paths {
            module = module.with_entry(ModuleEntry::new(*path, ByteSource::from_bytes(vec![0])));
        }
        ModuleSplit::master_of(&module, SplitType::AssetSlice)
    }

    fn strippings(
        dimensions: &[TargetingDimension],
    ) -> BTreeMap<TargetingDimension, SuffixStrippingConfig> {
        dimensions
            .iter()
            .map(|dimension| {
                (
                    *dimension,
                    SuffixStrippingConfig {
                        enabled: true,
                        default_suffix: String::new(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn strips_the_selected_dimension_suffix_only() {
        let split = split_with_entries(&["assets/img#tcf_astc/a.ktx", "assets/models#tier_low/m.obj"])
            .with_apk_targeting(ApkTargeting {
                texture_compression_format: DimensionTargeting::value(
                    TextureCompressionFormat::Astc,
                ),
                ..ApkTargeting::default()
            });

        let output = strip_asset_suffixes(
            vec![split],
            &strippings(&[TargetingDimension::TextureCompressionFormat]),
        )
        .unwrap();

        let paths = output[0].entry_paths();
        assert!(paths.contains(&"assets/img/a.ktx"));
        // Tier suffix untouched: stripping was only directed for TCF.
        assert!(paths.contains(&"assets/models#tier_low/m.obj"));
        // Targeting is left intact.
        assert!(
            output[0]
                .apk_targeting
                .texture_compression_format
                .has_values()
        );
    }

    #[test]
    fn disabled_stripping_is_a_no_op() {
        let split = split_with_entries(&["assets/img#tcf_astc/a.ktx"]);
        let mut config = strippings(&[TargetingDimension::TextureCompressionFormat]);
        config
            .get_mut(&TargetingDimension::TextureCompressionFormat)
            .unwrap()
            .enabled = false;

        let output = strip_asset_suffixes(vec![split], &config).unwrap();
        assert_eq!(output[0].entry_paths(), vec!["assets/img#tcf_astc/a.ktx"]);
    }

    #[test]
    fn non_asset_entries_are_untouched() {
        let split = split_with_entries(&["root/file#tcf_astc.bin"]);
        let output = strip_asset_suffixes(
            vec![split],
            &strippings(&[TargetingDimension::TextureCompressionFormat]),
        )
        .unwrap();
        assert_eq!(output[0].entry_paths(), vec!["root/file#tcf_astc.bin"]);
    }
}

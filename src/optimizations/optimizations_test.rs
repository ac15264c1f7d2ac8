#[cfg(test)]
mod tests {
    use crate::bundle::{
        BundleConfig, BundletoolConfig, OptimizationsConfig, SplitDimensionConfig, SplitsConfig,
        SuffixStrippingConfig, UncompressDexFiles,
    };
    use crate::optimizations::{ApkOptimizations, merge_optimizations};
    use crate::targeting::TargetingDimension;
    use std::collections::BTreeSet;

    fn config_with_version(version: &str) -> BundleConfig {
        BundleConfig {
            bundletool: BundletoolConfig {
                version: Some(version.to_string()),
            },
            ..BundleConfig::default()
        }
    }

    #[test]
    fn defaults_flow_through_for_plain_bundles() {
        let optimizations = merge_optimizations(&config_with_version("1.13.2"), None).unwrap();
        assert!(
            optimizations
                .split_dimensions
                .contains(&TargetingDimension::Abi)
        );
        assert!(optimizations.uncompress_native_libraries);
        assert!(optimizations.uncompress_dex_files);
        assert_eq!(optimizations.uncompressed_dex_target_sdk, Some(29));
    }

    #[test]
    fn bundle_version_picks_floor_defaults() {
        // Built by 1.12.0: dex uncompression from the 1.11.3 entry, but no
        // target-sdk restriction yet.
        let optimizations = merge_optimizations(&config_with_version("1.12.0"), None).unwrap();
        assert!(optimizations.uncompress_dex_files);
        assert_eq!(optimizations.uncompressed_dex_target_sdk, None);
    }

    #[test]
    fn developer_toggles_add_and_remove_dimensions() {
        let mut config = config_with_version("1.13.2");
        config.optimizations = OptimizationsConfig {
            splits_config: SplitsConfig {
                split_dimension: vec![
                    SplitDimensionConfig::disable(TargetingDimension::Language),
                    SplitDimensionConfig::enable(TargetingDimension::TextureCompressionFormat),
                ],
            },
            ..OptimizationsConfig::default()
        };

        let optimizations = merge_optimizations(&config, None).unwrap();
        assert!(
            !optimizations
                .split_dimensions
                .contains(&TargetingDimension::Language)
        );
        assert!(
            optimizations
                .split_dimensions
                .contains(&TargetingDimension::TextureCompressionFormat)
        );
    }

    #[test]
    fn suffix_stripping_directives_are_collected() {
        let mut config = config_with_version("1.13.2");
        config.optimizations = OptimizationsConfig {
            splits_config: SplitsConfig {
                split_dimension: vec![SplitDimensionConfig {
                    value: TargetingDimension::TextureCompressionFormat,
                    negate: false,
                    suffix_stripping: Some(SuffixStrippingConfig {
                        enabled: true,
                        default_suffix: "etc1".to_string(),
                    }),
                }],
            },
            ..OptimizationsConfig::default()
        };

        let optimizations = merge_optimizations(&config, None).unwrap();
        let stripping = &optimizations.suffix_strippings
            [&TargetingDimension::TextureCompressionFormat];
        assert!(stripping.enabled);
        assert_eq!(stripping.default_suffix, "etc1");
    }

    #[test]
    fn command_line_override_replaces_split_dimensions() {
        let mut config = config_with_version("1.13.2");
        config.optimizations = OptimizationsConfig {
            splits_config: SplitsConfig {
                split_dimension: vec![SplitDimensionConfig::enable(
                    TargetingDimension::TextureCompressionFormat,
                )],
            },
            ..OptimizationsConfig::default()
        };

        let override_dims = BTreeSet::from([TargetingDimension::Language]);
        let optimizations = merge_optimizations(&config, Some(&override_dims)).unwrap();
        assert_eq!(optimizations.split_dimensions, override_dims);
    }

    #[test]
    fn empty_override_falls_back_to_merged_dimensions() {
        let config = config_with_version("1.13.2");
        let empty = BTreeSet::new();
        let optimizations = merge_optimizations(&config, Some(&empty)).unwrap();
        assert!(!optimizations.split_dimensions.is_empty());
    }

    #[test]
    fn developer_uncompression_values_take_precedence() {
        let mut config = config_with_version("1.13.2");
        config.optimizations.uncompress_native_libraries = Some(false);
        config.optimizations.uncompress_dex_files = Some(UncompressDexFiles {
            enabled: false,
            uncompressed_dex_target_sdk: None,
        });

        let optimizations = merge_optimizations(&config, None).unwrap();
        assert!(!optimizations.uncompress_native_libraries);
        assert!(!optimizations.uncompress_dex_files);
    }

    #[test]
    fn universal_mode_is_empty() {
        let universal = ApkOptimizations::universal();
        assert!(universal.split_dimensions.is_empty());
        assert!(universal.standalone_dimensions.is_empty());
        assert!(!universal.uncompress_native_libraries);
    }
}

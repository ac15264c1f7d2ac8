#[cfg(test)]
mod tests {
    use crate::bundle::{
        BundleModule, ByteSource, ModuleEntry, NativeConfig, TargetedNativeDirectory,
    };
    use crate::manifest::AndroidManifest;
    use crate::sanitize::{remove_rpackage_dex, renumber_classes_dex, sanitize_abi_dirs};
    use crate::targeting::Abi;

    fn module_with_entries(paths: &[&str]) -> BundleModule {
        let mut module = BundleModule::new("base", AndroidManifest::for_package("com.example.app"));
        for path in paths {
            module = module.with_entry(ModuleEntry::new(*path, ByteSource::from_bytes(vec![0])));
        }
        module
    }

    fn paths(module: &BundleModule) -> Vec<&str> {
        module.entries().map(|entry| entry.path()).collect()
    }

    #[test]
    fn consistent_abi_dirs_are_untouched() {
        let module = module_with_entries(&[
            "lib/x86/liba.so",
            "lib/x86/libb.so",
            "lib/x86_64/liba.so",
            "lib/x86_64/libb.so",
        ]);
        let sanitized = sanitize_abi_dirs(module);
        assert_eq!(sanitized.entries().count(), 4);
    }

    #[test]
    fn short_abi_dirs_are_dropped() {
        let module = module_with_entries(&[
            "lib/x86/liba.so",
            "lib/x86/libb.so",
            "lib/x86/libc.so",
            "lib/x86_64/liba.so",
            "lib/x86_64/libb.so",
            "dex/classes.dex",
        ])
        .with_native_config(NativeConfig {
            directories: vec![
                TargetedNativeDirectory {
                    path: "lib/x86".to_string(),
                    abi: Abi::X86,
                },
                TargetedNativeDirectory {
                    path: "lib/x86_64".to_string(),
                    abi: Abi::X86_64,
                },
            ],
        });

        let sanitized = sanitize_abi_dirs(module);
        let kept = paths(&sanitized);
        assert!(kept.contains(&"lib/x86/liba.so"));
        assert!(!kept.iter().any(|path| path.starts_with("lib/x86_64/")));
        assert!(kept.contains(&"dex/classes.dex"));

        // Native targeting retains only the surviving directory.
        let config = sanitized.native_config().unwrap();
        assert_eq!(config.directories.len(), 1);
        assert_eq!(config.directories[0].abi, Abi::X86);
    }

    #[test]
    fn dex_renumbering_shifts_numbered_files() {
        let module = module_with_entries(&[
            "dex/classes.dex",
            "dex/classes1.dex",
            "dex/classes2.dex",
        ]);
        let renumbered = renumber_classes_dex(module);
        let mut kept = paths(&renumbered);
        kept.sort();
        assert_eq!(
            kept,
            vec!["dex/classes.dex", "dex/classes2.dex", "dex/classes3.dex"]
        );
    }

    #[test]
    fn dex_renumbering_is_a_no_op_without_classes1() {
        let module = module_with_entries(&["dex/classes.dex", "dex/classes2.dex"]);
        let renumbered = renumber_classes_dex(module);
        let mut kept = paths(&renumbered);
        kept.sort();
        assert_eq!(kept, vec!["dex/classes.dex", "dex/classes2.dex"]);
    }

    #[test]
    fn rpackage_removal_drops_highest_numbered_dex() {
        let module = module_with_entries(&[
            "dex/classes.dex",
            "dex/classes2.dex",
            "dex/classes3.dex",
            "assets/data.bin",
        ]);
        let stripped = remove_rpackage_dex(module);
        let kept = paths(&stripped);
        assert!(kept.contains(&"dex/classes.dex"));
        assert!(kept.contains(&"dex/classes2.dex"));
        assert!(!kept.contains(&"dex/classes3.dex"));
        assert!(kept.contains(&"assets/data.bin"));
    }

    #[test]
    fn rpackage_removal_without_numbered_dex_is_a_no_op() {
        let module = module_with_entries(&["dex/classes.dex"]);
        let stripped = remove_rpackage_dex(module);
        assert_eq!(paths(&stripped), vec!["dex/classes.dex"]);
    }
}

#[cfg(test)]
mod tests {
    use crate::bundle::{BundleModule, ByteSource, ModuleEntry};
    use crate::manifest::AndroidManifest;
    use crate::merge::merge_same_targeting;
    use crate::split::{ModuleSplit, SplitType};
    use crate::targeting::{Abi, ApkTargeting};

    fn base_split() -> ModuleSplit {
        let module = BundleModule::new("base", AndroidManifest::for_package("com.example.app"));
        ModuleSplit::master_of(&module, SplitType::Split)
    }

    fn with_entry(split: &ModuleSplit, path: &str, content: &[u8]) -> ModuleSplit {
        let mut entries = split.entries.clone();
        entries.push(ModuleEntry::new(path, ByteSource::from_bytes(content.to_vec())));
        split.with_entries(entries)
    }

    #[test]
    fn same_targeted_splits_fuse_into_one() {
        let a = with_entry(&base_split(), "root/a.txt", b"a");
        let b = with_entry(&base_split(), "root/b.txt", b"b");

        let merged = merge_same_targeting(vec![a, b]).unwrap();
        assert_eq!(merged.len(), 1);
        let mut paths = merged[0].entry_paths();
        paths.sort();
        assert_eq!(paths, vec!["root/a.txt", "root/b.txt"]);
    }

    #[test]
    fn first_seen_entry_wins_on_duplicate_paths() {
        let a = with_entry(&base_split(), "root/same.txt", b"first");
        let b = with_entry(&base_split(), "root/same.txt", b"second");

        let merged = merge_same_targeting(vec![a, b]).unwrap();
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].entries.len(), 1);
        assert_eq!(
            merged[0].entries[0].content().read().unwrap(),
            b"first".to_vec()
        );
    }

    #[test]
    fn differently_targeted_splits_stay_apart() {
        let master = base_split();
        let x86 = base_split()
            .with_master_split(false)
            .with_apk_targeting(ApkTargeting::for_abi(Abi::X86));
        let arm = base_split()
            .with_master_split(false)
            .with_apk_targeting(ApkTargeting::for_abi(Abi::Arm64V8a));

        let merged = merge_same_targeting(vec![master, x86, arm]).unwrap();
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn merge_is_idempotent_and_never_grows() {
        let splits = vec![
            with_entry(&base_split(), "root/a.txt", b"a"),
            with_entry(&base_split(), "root/b.txt", b"b"),
            base_split()
                .with_master_split(false)
                .with_apk_targeting(ApkTargeting::for_abi(Abi::X86)),
        ];
        let input_len = splits.len();

        let once = merge_same_targeting(splits).unwrap();
        assert!(once.len() <= input_len);

        let twice = merge_same_targeting(once.clone()).unwrap();
        assert_eq!(once.len(), twice.len());
        for (a, b) in once.iter().zip(&twice) {
            assert_eq!(a.entry_paths(), b.entry_paths());
            assert_eq!(a.apk_targeting, b.apk_targeting);
            assert_eq!(a.master_split, b.master_split);
        }
    }

    #[test]
    fn conflicting_manifests_are_rejected() {
        let a = base_split();
        let module_b = BundleModule::new("base", AndroidManifest::for_package("com.other.app"));
        let b = ModuleSplit::master_of(&module_b, SplitType::Split);

        let err = merge_same_targeting(vec![a, b]).unwrap_err();
        assert!(err.user_kind().is_none());
        assert!(err.to_string().contains("conflicting manifests"));
    }

    #[test]
    fn duplicate_masters_in_one_variant_are_rejected() {
        // Same module, same variant, two masters with different targeting.
        let a = base_split();
        let b = base_split().with_apk_targeting(ApkTargeting::for_abi(Abi::X86));

        let err = merge_same_targeting(vec![a, b]).unwrap_err();
        assert!(err.to_string().contains("master"));
    }
}

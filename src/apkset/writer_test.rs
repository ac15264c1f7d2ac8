#[cfg(test)]
mod tests {
    use crate::apkset::{ApkSetWriter, OutputFormat, TOC_FILE, ZipApkSerializer};
    use crate::bundle::{BundleModule, ByteSource, ModuleEntry};
    use crate::manifest::AndroidManifest;
    use crate::split::{ModuleSplit, SplitType};
    use crate::targeting::{Abi, ApkTargeting, VariantTargeting};
    use std::io::Read;
    use tempfile::TempDir;

    fn sample_splits() -> Vec<ModuleSplit> {
        let module = BundleModule::new("base", AndroidManifest::for_package("com.example.app"))
            .with_entry(ModuleEntry::new(
                "dex/classes.dex",
                ByteSource::from_bytes(b"dex".to_vec()),
            ))
            .with_entry(ModuleEntry::new(
                "lib/x86/libfoo.so",
                ByteSource::from_bytes(b"elf".to_vec()),
            ));
        let master = ModuleSplit::master_of(&module, SplitType::Split)
            .with_variant_targeting(VariantTargeting::for_sdk(21));
        let abi_split = master
            .with_master_split(false)
            .with_apk_targeting(ApkTargeting::for_abi(Abi::X86))
            .with_split_identity_applied();
        vec![master, abi_split]
    }

    #[test]
    fn apk_set_zip_contains_toc_and_apks() {
        let dir = TempDir::new().unwrap();
        let staging = dir.path().join("staging");
        std::fs::create_dir_all(&staging).unwrap();
        let output = dir.path().join("app.apks");

        let serializer = ZipApkSerializer;
        let writer = ApkSetWriter::new(&serializer, OutputFormat::ApkSet, "1.13.2");
        let written = writer.write(&sample_splits(), &staging, &output).unwrap();

        let mut archive = zip::ZipArchive::new(std::fs::File::open(written).unwrap()).unwrap();
        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        assert!(names.contains(&TOC_FILE.to_string()));
        assert!(names.contains(&"splits/base-master.apk".to_string()));
        assert!(names.contains(&"splits/base-x86.apk".to_string()));

        let mut toc_bytes = Vec::new();
        archive
            .by_name(TOC_FILE)
            .unwrap()
            .read_to_end(&mut toc_bytes)
            .unwrap();
        let toc: serde_json::Value = serde_json::from_slice(&toc_bytes).unwrap();
        assert_eq!(toc["bundletool_version"], "1.13.2");
        assert_eq!(toc["variants"].as_array().unwrap().len(), 1);

        let descriptions = &toc["variants"][0]["apk_sets"][0]["apk_descriptions"];
        assert_eq!(descriptions.as_array().unwrap().len(), 2);
        assert_eq!(descriptions[0]["split_type"], "SPLIT");
    }

    #[test]
    fn directory_output_lays_apks_loose() {
        let dir = TempDir::new().unwrap();
        let staging = dir.path().join("staging");
        std::fs::create_dir_all(&staging).unwrap();
        let output = dir.path().join("out");

        let serializer = ZipApkSerializer;
        let writer = ApkSetWriter::new(&serializer, OutputFormat::Directory, "1.13.2");
        writer.write(&sample_splits(), &staging, &output).unwrap();

        assert!(output.join(TOC_FILE).is_file());
        assert!(output.join("splits/base-master.apk").is_file());
        assert!(output.join("splits/base-x86.apk").is_file());
    }

    #[test]
    fn serialized_apk_has_android_layout() {
        let dir = TempDir::new().unwrap();
        let apk_path = dir.path().join("test.apk");
        let splits = sample_splits();

        use crate::apkset::ApkSerializer;
        ZipApkSerializer.serialize(&splits[0], &apk_path).unwrap();

        let mut archive = zip::ZipArchive::new(std::fs::File::open(&apk_path).unwrap()).unwrap();
        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        assert!(names.contains(&"AndroidManifest.xml".to_string()));
        assert!(names.contains(&"classes.dex".to_string()));
        assert!(names.contains(&"lib/x86/libfoo.so".to_string()));

        let mut manifest_text = String::new();
        archive
            .by_name("AndroidManifest.xml")
            .unwrap()
            .read_to_string(&mut manifest_text)
            .unwrap();
        assert!(manifest_text.contains("com.example.app"));
    }

    #[test]
    fn standalone_variants_sort_before_split_variants() {
        let module = BundleModule::new("base", AndroidManifest::for_package("com.example.app"));
        let standalone = ModuleSplit::master_of(&module, SplitType::Standalone)
            .with_variant_targeting(VariantTargeting::for_sdk(1))
            .with_apk_targeting(ApkTargeting::for_abi(Abi::X86));
        let split = ModuleSplit::master_of(&module, SplitType::Split)
            .with_variant_targeting(VariantTargeting::for_sdk(21));

        let dir = TempDir::new().unwrap();
        let staging = dir.path().join("staging");
        std::fs::create_dir_all(&staging).unwrap();
        let output = dir.path().join("app.apks");

        let serializer = ZipApkSerializer;
        let writer = ApkSetWriter::new(&serializer, OutputFormat::ApkSet, "1.13.2");
        // Deliberately pass the split variant first.
        writer.write(&[split, standalone], &staging, &output).unwrap();

        let mut archive = zip::ZipArchive::new(std::fs::File::open(&output).unwrap()).unwrap();
        let mut toc_bytes = Vec::new();
        archive
            .by_name(TOC_FILE)
            .unwrap()
            .read_to_end(&mut toc_bytes)
            .unwrap();
        let toc: serde_json::Value = serde_json::from_slice(&toc_bytes).unwrap();
        let variants = toc["variants"].as_array().unwrap();
        assert_eq!(variants.len(), 2);
        // SDK 1 (standalone) sorts before SDK 21 (split).
        assert!(
            variants[0]["apk_sets"][0]["apk_descriptions"][0]["path"]
                .as_str()
                .unwrap()
                .starts_with("standalones/")
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::bundle::read_bundle;
    use crate::preprocess::{CompressionChoice, classify_entry, recompress_bundle};
    use std::collections::BTreeSet;
    use std::io::{Read, Write};
    use std::path::PathBuf;
    use tempfile::TempDir;
    use zip::CompressionMethod;
    use zip::write::SimpleFileOptions;

    const CONFIG_JSON: &str = r#"{
        "bundletool": {"version": "1.13.2"},
        "compression": {"uncompressed_glob": ["assets/raw/**"], "recompression_threshold_bytes": 1024}
    }"#;
    const MANIFEST_XML: &str =
        r#"<manifest package="com.example.app" android:versionCode="1"><application/></manifest>"#;

    fn write_source(entries: &[(&str, &[u8])]) -> (TempDir, PathBuf) {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("app.aab");
        let file = std::fs::File::create(&path).expect("create");
        let mut writer = zip::ZipWriter::new(file);
        for (name, content) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .expect("start");
            writer.write_all(content).expect("write");
        }
        writer.finish().expect("finish");
        (dir, path)
    }

    fn standard_entries() -> Vec<(&'static str, Vec<u8>)> {
        // A compressible blob above the 1024-byte test threshold and one
        // below it.
        let big_dex = vec![0x0Au8; 10_000];
        let small_dex = vec![0x0Bu8; 100];
        vec![
            ("BundleConfig.pb", CONFIG_JSON.as_bytes().to_vec()),
            (
                "base/manifest/AndroidManifest.xml",
                MANIFEST_XML.as_bytes().to_vec(),
            ),
            ("base/res/drawable/img.xml", b"<vector/>".to_vec()),
            ("base/dex/classes.dex", big_dex),
            ("base/dex/classes2.dex", small_dex),
            ("base/assets/raw/keep.bin", b"keep-as-source".to_vec()),
        ]
    }

    fn recompressed() -> (TempDir, PathBuf) {
        let entries = standard_entries();
        let borrowed: Vec<(&str, &[u8])> = entries
            .iter()
            .map(|(name, content)| (*name, content.as_slice()))
            .collect();
        let (dir, source) = write_source(&borrowed);
        let bundle = read_bundle(&source).unwrap();
        let target = dir.path().join("normalized.aab");
        recompress_bundle(&bundle, &source, &target).unwrap();
        (dir, target)
    }

    #[test]
    fn classification_follows_the_compression_rules() {
        let (_dir, source) = write_source(&[
            ("BundleConfig.pb", CONFIG_JSON.as_bytes()),
            ("base/manifest/AndroidManifest.xml", MANIFEST_XML.as_bytes()),
        ]);
        let bundle = read_bundle(&source).unwrap();

        assert_eq!(
            classify_entry(&bundle, "BundleConfig.pb"),
            CompressionChoice::SameAsSource
        );
        assert_eq!(
            classify_entry(&bundle, "BUNDLE-METADATA/ns/file"),
            CompressionChoice::SameAsSource
        );
        assert_eq!(
            classify_entry(&bundle, "base/res/drawable/img.xml"),
            CompressionChoice::NoCompression
        );
        assert_eq!(
            classify_entry(&bundle, "base/manifest/AndroidManifest.xml"),
            CompressionChoice::NoCompression
        );
        assert_eq!(
            classify_entry(&bundle, "base/resources.pb"),
            CompressionChoice::NoCompression
        );
        assert_eq!(
            classify_entry(&bundle, "base/assets/raw/keep.bin"),
            CompressionChoice::SameAsSource
        );
        assert_eq!(
            classify_entry(&bundle, "base/dex/classes.dex"),
            CompressionChoice::DefaultCompression
        );
        assert_eq!(
            classify_entry(&bundle, "base/root/data.bin"),
            CompressionChoice::DefaultCompression
        );
    }

    #[test]
    fn rewrite_preserves_the_entry_set_and_bytes() {
        let entries = standard_entries();
        let (_dir, target) = recompressed();

        let mut archive = zip::ZipArchive::new(std::fs::File::open(&target).unwrap()).unwrap();
        let rewritten_names: BTreeSet<String> =
            archive.file_names().map(str::to_string).collect();
        let source_names: BTreeSet<String> =
            entries.iter().map(|(name, _)| name.to_string()).collect();
        assert_eq!(rewritten_names, source_names);

        let mut total_original = 0u64;
        let mut total_rewritten = 0u64;
        for (name, content) in &entries {
            total_original += content.len() as u64;
            let mut entry = archive.by_name(name).unwrap();
            total_rewritten += entry.size();
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes).unwrap();
            assert_eq!(&bytes, content, "content mismatch for {name}");
        }
        assert_eq!(total_original, total_rewritten);
    }

    #[test]
    fn res_entries_are_stored_uncompressed() {
        let (_dir, target) = recompressed();
        let mut archive = zip::ZipArchive::new(std::fs::File::open(&target).unwrap()).unwrap();
        let entry = archive.by_name("base/res/drawable/img.xml").unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Stored);
    }

    #[test]
    fn large_compressible_entries_are_deflated() {
        let (_dir, target) = recompressed();
        let mut archive = zip::ZipArchive::new(std::fs::File::open(&target).unwrap()).unwrap();
        let entry = archive.by_name("base/dex/classes.dex").unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Deflated);
        assert!(entry.compressed_size() < entry.size());
    }

    #[test]
    fn incompressible_entries_fall_back_to_stored() {
        // Pseudo-random bytes deflate to a larger stream.
        let mut noise = Vec::with_capacity(4096);
        let mut state = 0x12345678u32;
        for _ in 0..4096 {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            noise.push((state >> 24) as u8);
        }

        let (dir, source) = write_source(&[
            ("BundleConfig.pb", CONFIG_JSON.as_bytes()),
            ("base/manifest/AndroidManifest.xml", MANIFEST_XML.as_bytes()),
            ("base/root/noise.bin", &noise),
        ]);
        let bundle = read_bundle(&source).unwrap();
        let target = dir.path().join("normalized.aab");
        recompress_bundle(&bundle, &source, &target).unwrap();

        let mut archive = zip::ZipArchive::new(std::fs::File::open(&target).unwrap()).unwrap();
        let mut entry = archive.by_name("base/root/noise.bin").unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Stored);
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).unwrap();
        assert_eq!(bytes, noise);
    }
}

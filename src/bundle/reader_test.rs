#[cfg(test)]
mod tests {
    use crate::bundle::read_bundle;
    use crate::error::UserErrorKind;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    const CONFIG_JSON: &str = r#"{"bundletool": {"version": "1.13.2"}}"#;
    const MANIFEST_XML: &str =
        r#"<manifest package="com.example.app" android:versionCode="1"><application/></manifest>"#;

    fn write_bundle(entries: &[(&str, &[u8])]) -> (TempDir, PathBuf) {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("app.aab");
        let file = std::fs::File::create(&path).expect("create bundle");
        let mut writer = zip::ZipWriter::new(file);
        for (name, content) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .expect("start entry");
            writer.write_all(content).expect("write entry");
        }
        writer.finish().expect("finish bundle");
        (dir, path)
    }

    #[test]
    fn reads_a_minimal_bundle() {
        let (_dir, path) = write_bundle(&[
            ("BundleConfig.pb", CONFIG_JSON.as_bytes()),
            ("base/manifest/AndroidManifest.xml", MANIFEST_XML.as_bytes()),
            ("base/dex/classes.dex", b"dex"),
            ("base/lib/x86/libfoo.so", b"elf"),
        ]);

        let bundle = read_bundle(&path).unwrap();
        assert_eq!(bundle.module_names().collect::<Vec<_>>(), vec!["base"]);

        let base = bundle.base_module().unwrap();
        assert_eq!(base.manifest().package(), Some("com.example.app"));
        assert_eq!(base.entries().count(), 2);

        // Entry content is read lazily out of the archive.
        let dex = base.entry("dex/classes.dex").unwrap();
        assert_eq!(dex.content().read().unwrap(), b"dex");
    }

    #[test]
    fn missing_config_is_rejected() {
        let (_dir, path) = write_bundle(&[(
            "base/manifest/AndroidManifest.xml",
            MANIFEST_XML.as_bytes(),
        )]);
        let err = read_bundle(&path).unwrap_err();
        assert_eq!(err.user_kind(), Some(UserErrorKind::InvalidBundle));
    }

    #[test]
    fn directory_entries_are_rejected() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("app.aab");
        let file = std::fs::File::create(&path).expect("create bundle");
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file("BundleConfig.pb", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(CONFIG_JSON.as_bytes()).unwrap();
        writer
            .add_directory("base/dex", SimpleFileOptions::default())
            .unwrap();
        writer.finish().unwrap();

        let err = read_bundle(&path).unwrap_err();
        assert_eq!(err.user_kind(), Some(UserErrorKind::InvalidBundle));
    }

    #[test]
    fn module_without_manifest_is_rejected() {
        let (_dir, path) = write_bundle(&[
            ("BundleConfig.pb", CONFIG_JSON.as_bytes()),
            ("base/dex/classes.dex", b"dex"),
        ]);
        let err = read_bundle(&path).unwrap_err();
        assert_eq!(err.user_kind(), Some(UserErrorKind::InvalidBundle));
    }

    #[test]
    fn invalid_module_name_is_rejected() {
        let (_dir, path) = write_bundle(&[
            ("BundleConfig.pb", CONFIG_JSON.as_bytes()),
            ("1bad/manifest/AndroidManifest.xml", MANIFEST_XML.as_bytes()),
        ]);
        let err = read_bundle(&path).unwrap_err();
        assert_eq!(err.user_kind(), Some(UserErrorKind::InvalidBundle));
    }

    #[test]
    fn unparseable_tool_version_is_rejected() {
        let (_dir, path) = write_bundle(&[
            (
                "BundleConfig.pb",
                br#"{"bundletool": {"version": "week-12"}}"#.as_slice(),
            ),
            ("base/manifest/AndroidManifest.xml", MANIFEST_XML.as_bytes()),
        ]);
        let err = read_bundle(&path).unwrap_err();
        assert_eq!(err.user_kind(), Some(UserErrorKind::InvalidBundle));
    }

    #[test]
    fn metadata_files_are_collected_by_namespace() {
        let (_dir, path) = write_bundle(&[
            ("BundleConfig.pb", CONFIG_JSON.as_bytes()),
            ("base/manifest/AndroidManifest.xml", MANIFEST_XML.as_bytes()),
            (
                "BUNDLE-METADATA/com.android.tools.build.profiles/baseline.prof",
                b"prof",
            ),
        ]);

        let bundle = read_bundle(&path).unwrap();
        let profile = bundle
            .metadata()
            .get("com.android.tools.build.profiles", "baseline.prof")
            .unwrap();
        assert_eq!(profile.read().unwrap(), b"prof");
    }
}

//! APK serialization contract and the built-in plain zip serializer.

use crate::codec;
use crate::error::Result;
use crate::manifest::serialize_xml;
use crate::split::ModuleSplit;
use std::io::Write;
use std::path::Path;
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// Serializes one split into an APK file on disk.
///
/// The split handed in is effectively immutable, so implementations may
/// serialize several APKs in parallel. Binary XML and `resources.arsc`
/// encoding, signing and alignment are the serializer's concern, not the
/// pipeline's.
pub trait ApkSerializer: Sync {
    fn serialize(&self, split: &ModuleSplit, output_path: &Path) -> Result<()>;
}

/// Built-in serializer: writes the Android directory layout as a plain zip.
/// The manifest is emitted as XML text and the resource table in its
/// structured encoding; a production serializer with the binary converters
/// plugs in through [`ApkSerializer`].
pub struct ZipApkSerializer;

impl ApkSerializer for ZipApkSerializer {
    fn serialize(&self, split: &ModuleSplit, output_path: &Path) -> Result<()> {
        let file = std::fs::File::create(output_path)?;
        let mut writer = zip::ZipWriter::new(file);
        let deflated = SimpleFileOptions::default();
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        writer.start_file("AndroidManifest.xml", deflated)?;
        writer.write_all(serialize_xml(&split.manifest.root)?.as_bytes())?;

        if let Some(table) = &split.resource_table {
            writer.start_file("resources.arsc", stored)?;
            writer.write_all(&codec::encode_resource_table(table)?)?;
        }

        for entry in &split.entries {
            let options = if entry.force_uncompressed {
                stored
            } else {
                deflated
            };
            writer.start_file(apk_path(entry.path()), options)?;
            writer.write_all(&entry.content().read()?)?;
        }

        writer.finish()?;
        Ok(())
    }
}

/// Maps a module entry path onto the APK layout: dex files land at the
/// root, `root/` contents are hoisted, everything else keeps its path.
fn apk_path(entry_path: &str) -> String {
    if let Some(rest) = entry_path.strip_prefix("dex/") {
        return rest.to_string();
    }
    if let Some(rest) = entry_path.strip_prefix("root/") {
        return rest.to_string();
    }
    entry_path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apk_layout_mapping() {
        assert_eq!(apk_path("dex/classes.dex"), "classes.dex");
        assert_eq!(apk_path("dex/classes2.dex"), "classes2.dex");
        assert_eq!(apk_path("root/META-INF/services/x"), "META-INF/services/x");
        assert_eq!(apk_path("lib/x86/libfoo.so"), "lib/x86/libfoo.so");
        assert_eq!(apk_path("assets/data.bin"), "assets/data.bin");
        assert_eq!(apk_path("res/drawable/icon.png"), "res/drawable/icon.png");
    }
}

//! Bundle-level metadata files (`BUNDLE-METADATA/<namespace>/<file>`).

use crate::bundle::entry::ByteSource;
use indexmap::IndexMap;

/// Arbitrary namespaced files the publisher shipped alongside the modules,
/// e.g. baseline profiles or the main-dex list. Carried through to the APK
/// set untouched.
#[derive(Clone, Debug, Default)]
pub struct BundleMetadata {
    /// `<namespace>/<file name>` → content.
    files: IndexMap<String, ByteSource>,
}

impl BundleMetadata {
    pub fn insert(&mut self, namespace: &str, file_name: &str, content: ByteSource) {
        self.files
            .insert(format!("{namespace}/{file_name}"), content);
    }

    pub fn get(&self, namespace: &str, file_name: &str) -> Option<&ByteSource> {
        self.files.get(&format!("{namespace}/{file_name}"))
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ByteSource)> {
        self.files
            .iter()
            .map(|(path, content)| (path.as_str(), content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_namespaced_files() {
        let mut metadata = BundleMetadata::default();
        metadata.insert(
            "com.android.tools.build.profiles",
            "baseline.prof",
            ByteSource::from_bytes(vec![1, 2, 3]),
        );

        assert!(
            metadata
                .get("com.android.tools.build.profiles", "baseline.prof")
                .is_some()
        );
        assert!(metadata.get("other.namespace", "baseline.prof").is_none());
        assert_eq!(metadata.iter().count(), 1);
    }
}

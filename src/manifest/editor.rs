//! Copy-on-write manifest mutations used by the splitting pipeline.

use crate::manifest::{ANDROID_NAMESPACE, AndroidManifest, XmlAttribute, XmlElement, XmlNode};

/// Name of the meta-data marker set on sanitizer splits so the platform
/// installs them only on sanitizer-enabled devices.
const REQUIRES_SANITIZER_META_DATA: &str = "com.android.requiresSanitizer";

/// Fluent editor over a manifest copy. Every setter replaces or inserts,
/// so applying the same edit twice is a no-op.
pub struct ManifestEditor {
    manifest: AndroidManifest,
}

impl ManifestEditor {
    pub fn new(manifest: AndroidManifest) -> Self {
        Self { manifest }
    }

    /// Assigns the `split` attribute identifying a non-master split APK.
    pub fn set_split_id(mut self, split_id: &str) -> Self {
        set_attribute(
            &mut self.manifest.root,
            None,
            "split",
            split_id.to_string(),
        );
        self
    }

    /// Points a config split at the master split of its module.
    pub fn set_config_for_split(mut self, master_split_id: &str) -> Self {
        set_attribute(
            &mut self.manifest.root,
            None,
            "configForSplit",
            master_split_id.to_string(),
        );
        self
    }

    /// Drops split identity attributes; standalone APKs carry none.
    pub fn remove_split_name(mut self) -> Self {
        self.manifest.root.attributes.retain(|attr| {
            !(attr.namespace.is_none() && (attr.name == "split" || attr.name == "configForSplit"))
        });
        self
    }

    /// Sets `android:extractNativeLibs` on `<application>`.
    pub fn set_extract_native_libs(mut self, value: bool) -> Self {
        let application = find_or_insert_child(&mut self.manifest.root, "application");
        set_attribute(
            application,
            Some(ANDROID_NAMESPACE),
            "extractNativeLibs",
            value.to_string(),
        );
        self
    }

    /// Marks the split as containing sanitizer-instrumented native code.
    pub fn set_requires_sanitizer(mut self) -> Self {
        let application = find_or_insert_child(&mut self.manifest.root, "application");
        let already_marked = application.child_elements().any(|child| {
            child.name == "meta-data"
                && child
                    .attribute(Some(ANDROID_NAMESPACE), "name")
                    .is_some_and(|attr| attr.value == REQUIRES_SANITIZER_META_DATA)
        });
        if !already_marked {
            let marker = XmlElement::new("meta-data")
                .with_attribute(XmlAttribute::android("name", REQUIRES_SANITIZER_META_DATA))
                .with_attribute(XmlAttribute::android("value", "true"));
            application.children.push(XmlNode::Element(marker));
        }
        self
    }

    pub fn finish(self) -> AndroidManifest {
        self.manifest
    }
}

fn set_attribute(element: &mut XmlElement, namespace: Option<&str>, name: &str, value: String) {
    if let Some(attr) = element
        .attributes
        .iter_mut()
        .find(|attr| attr.namespace.as_deref() == namespace && attr.name == name)
    {
        attr.value = value;
        return;
    }
    element.attributes.push(XmlAttribute {
        name: name.to_string(),
        namespace: namespace.map(str::to_string),
        value,
        ref_id: None,
    });
}

fn find_or_insert_child<'a>(element: &'a mut XmlElement, name: &str) -> &'a mut XmlElement {
    let position = element.children.iter().position(|node| {
        matches!(node, XmlNode::Element(child) if child.name == name)
    });
    let index = match position {
        Some(index) => index,
        None => {
            element
                .children
                .push(XmlNode::Element(XmlElement::new(name)));
            element.children.len() - 1
        }
    };
    match &mut element.children[index] {
        XmlNode::Element(child) => child,
        XmlNode::Text(_) => unreachable!("position matched an element"),
    }
}

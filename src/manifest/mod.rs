//! Editable structured representation of `AndroidManifest.xml`.
//!
//! The manifest travels through the pipeline as a tree of elements and
//! attributes. Mutation always goes through the editor functions in
//! [`editor`], which copy the tree and return a new value; the binary XML
//! encoding of the final APK is the job of the external serializer.

mod editor;
mod splits_xml;
mod xml;

#[cfg(test)]
mod splits_xml_test;

pub use editor::ManifestEditor;
pub use splits_xml::SplitsXmlBuilder;
pub use xml::{parse_xml, serialize_xml};

use crate::error::{Error, Result, UserError, UserErrorKind};
use serde::{Deserialize, Serialize};

/// The Android resource namespace prefix as written in manifests.
pub const ANDROID_NAMESPACE: &str = "android";

/// Distribution namespace prefix used by module declarations.
pub const DISTRIBUTION_NAMESPACE: &str = "dist";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlAttribute {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub value: String,
    /// Compiled resource reference carried by the attribute value, if any.
    /// The package-id byte of this reference is what gets remapped when a
    /// module changes package.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<u32>,
}

impl XmlAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            value: value.into(),
            ref_id: None,
        }
    }

    pub fn android(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Some(ANDROID_NAMESPACE.to_string()),
            value: value.into(),
            ref_id: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlElement {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<XmlAttribute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: XmlAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(XmlNode::Element(child));
        self
    }

    pub fn attribute(&self, namespace: Option<&str>, name: &str) -> Option<&XmlAttribute> {
        self.attributes
            .iter()
            .find(|attr| attr.namespace.as_deref() == namespace && attr.name == name)
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    pub fn find_child(&self, name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|element| element.name == name)
    }
}

/// An app or module manifest: the `<manifest>` element and its tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AndroidManifest {
    pub root: XmlElement,
}

impl AndroidManifest {
    pub fn new(root: XmlElement) -> Self {
        Self { root }
    }

    /// A minimal manifest for the given package, used by tests and by
    /// synthesized splits.
    pub fn for_package(package: impl Into<String>) -> Self {
        let root = XmlElement::new("manifest")
            .with_attribute(XmlAttribute::new("package", package))
            .with_child(XmlElement::new("application"));
        Self { root }
    }

    pub fn package(&self) -> Option<&str> {
        self.root
            .attribute(None, "package")
            .map(|attr| attr.value.as_str())
    }

    /// The versionCode attribute, validated as a positive integer.
    pub fn version_code(&self) -> Result<u32> {
        let attr = self
            .root
            .attribute(Some(ANDROID_NAMESPACE), "versionCode")
            .ok_or_else(|| invalid_version_code("missing android:versionCode"))?;
        let code: i64 = attr
            .value
            .parse()
            .map_err(|_| invalid_version_code(format!("not a number: '{}'", attr.value)))?;
        if !(1..=i64::from(u32::MAX)).contains(&code) {
            return Err(invalid_version_code(format!("out of range: {code}")));
        }
        Ok(code as u32)
    }

    /// The `split` attribute naming this split APK, if assigned.
    pub fn split_name(&self) -> Option<&str> {
        self.root
            .attribute(None, "split")
            .map(|attr| attr.value.as_str())
    }

    pub fn config_for_split(&self) -> Option<&str> {
        self.root
            .attribute(None, "configForSplit")
            .map(|attr| attr.value.as_str())
    }

    pub fn min_sdk_version(&self) -> Option<u32> {
        self.root
            .find_child("uses-sdk")?
            .attribute(Some(ANDROID_NAMESPACE), "minSdkVersion")?
            .value
            .parse()
            .ok()
    }

    /// The `<dist:module type="...">` declaration, when present.
    pub fn module_type_attr(&self) -> Option<&str> {
        self.root
            .find_child("module")?
            .attribute(Some(DISTRIBUTION_NAMESPACE), "type")
            .map(|attr| attr.value.as_str())
    }

    /// Delivery declared under `<dist:module><dist:delivery>`:
    /// `install-time`, `on-demand` or `conditional`.
    pub fn delivery_type_attr(&self) -> Option<&str> {
        let delivery = self.root.find_child("module")?.find_child("delivery")?;
        if let Some(install_time) = delivery.find_child("install-time") {
            if install_time.find_child("conditions").is_some() {
                return Some("conditional");
            }
            return Some("install-time");
        }
        delivery.find_child("on-demand").map(|_| "on-demand")
    }

    /// Starts an edit; the editor copies on write and returns a new value.
    pub fn edit(&self) -> ManifestEditor {
        ManifestEditor::new(self.clone())
    }
}

fn invalid_version_code(message: impl Into<String>) -> Error {
    Error::User(UserError::new(
        UserErrorKind::InvalidVersionCode,
        message.into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest_with_version(value: &str) -> AndroidManifest {
        let mut manifest = AndroidManifest::for_package("com.example.app");
        manifest
            .root
            .attributes
            .push(XmlAttribute::android("versionCode", value));
        manifest
    }

    #[test]
    fn package_accessor() {
        let manifest = AndroidManifest::for_package("com.example.app");
        assert_eq!(manifest.package(), Some("com.example.app"));
    }

    #[test]
    fn version_code_parses_valid_values() {
        assert_eq!(manifest_with_version("123").version_code().unwrap(), 123);
    }

    #[test]
    fn version_code_rejects_garbage_and_out_of_range() {
        for bad in ["abc", "0", "-1", "4294967296"] {
            let err = manifest_with_version(bad).version_code().unwrap_err();
            assert_eq!(
                err.user_kind(),
                Some(crate::error::UserErrorKind::InvalidVersionCode),
                "value {bad}"
            );
        }
    }

    #[test]
    fn missing_version_code_is_an_error() {
        let manifest = AndroidManifest::for_package("com.example.app");
        assert!(manifest.version_code().is_err());
    }

    #[test]
    fn delivery_type_detection() {
        let mut manifest = AndroidManifest::for_package("com.example.app");
        manifest.root = manifest.root.with_child(
            XmlElement::new("module").with_child(
                XmlElement::new("delivery").with_child(XmlElement::new("on-demand")),
            ),
        );
        assert_eq!(manifest.delivery_type_attr(), Some("on-demand"));
    }
}

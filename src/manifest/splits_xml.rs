//! Builder for the `splits.xml` language mapping shipped in system APKs.
//!
//! Maps each (module, language) pair to the split id that carries that
//! language's resources. Assignments are recorded after merging, so a pair
//! may be re-asserted with the same split id; asserting a different split id
//! for an already-assigned pair is a hard error.

use crate::error::{Error, Result};
use crate::manifest::{XmlAttribute, XmlElement};
use indexmap::IndexMap;

#[derive(Debug, Default)]
pub struct SplitsXmlBuilder {
    /// (module, language) → split id, in first-assignment order.
    assignments: IndexMap<(String, String), String>,
}

impl SplitsXmlBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `language` of `module` lives in `split_id`.
    ///
    /// The first assignment wins; repeating it is a no-op. A conflicting
    /// split id for the same pair indicates the pipeline produced two
    /// different language splits for one language, which is a bug.
    pub fn add_language_mapping(
        &mut self,
        module: &str,
        language: &str,
        split_id: &str,
    ) -> Result<()> {
        let key = (module.to_string(), language.to_string());
        match self.assignments.get(&key) {
            None => {
                self.assignments.insert(key, split_id.to_string());
                Ok(())
            }
            Some(existing) if existing == split_id => Ok(()),
            Some(existing) => Err(Error::internal(format!(
                "language '{language}' of module '{module}' already assigned to split \
                 '{existing}', cannot reassign to '{split_id}'"
            ))),
        }
    }

    /// Builds the `<splits>` document.
    pub fn build(&self) -> XmlElement {
        let mut modules: IndexMap<&str, Vec<(&str, &str)>> = IndexMap::new();
        for ((module, language), split_id) in &self.assignments {
            modules
                .entry(module.as_str())
                .or_default()
                .push((language.as_str(), split_id.as_str()));
        }

        let mut root = XmlElement::new("splits");
        for (module, languages) in modules {
            let mut module_element =
                XmlElement::new("module").with_attribute(XmlAttribute::new("name", module));
            for (language, split_id) in languages {
                let language_element = XmlElement::new("language")
                    .with_attribute(XmlAttribute::new("name", language))
                    .with_child(
                        XmlElement::new("apk")
                            .with_attribute(XmlAttribute::new("split", split_id)),
                    );
                module_element = module_element.with_child(language_element);
            }
            root = root.with_child(module_element);
        }
        root
    }
}

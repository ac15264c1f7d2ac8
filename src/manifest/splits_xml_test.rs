#[cfg(test)]
mod tests {
    use crate::manifest::SplitsXmlBuilder;

    #[test]
    fn first_assignment_wins_and_repeat_is_a_no_op() {
        let mut builder = SplitsXmlBuilder::new();
        builder
            .add_language_mapping("base", "en", "config.en")
            .unwrap();
        // Same pair, same split id: accepted silently.
        builder
            .add_language_mapping("base", "en", "config.en")
            .unwrap();

        let root = builder.build();
        let module = root.find_child("module").unwrap();
        assert_eq!(module.attribute(None, "name").unwrap().value, "base");
        let language = module.find_child("language").unwrap();
        assert_eq!(language.attribute(None, "name").unwrap().value, "en");
        let apk = language.find_child("apk").unwrap();
        assert_eq!(apk.attribute(None, "split").unwrap().value, "config.en");
        // Exactly one language element despite the repeated assignment.
        assert_eq!(module.child_elements().count(), 1);
    }

    #[test]
    fn conflicting_assignment_fails() {
        let mut builder = SplitsXmlBuilder::new();
        builder
            .add_language_mapping("base", "en", "config.en")
            .unwrap();
        let err = builder
            .add_language_mapping("base", "en", "feature.config.en")
            .unwrap_err();
        assert!(err.user_kind().is_none(), "conflict is an internal error");
    }

    #[test]
    fn languages_grouped_by_module() {
        let mut builder = SplitsXmlBuilder::new();
        builder
            .add_language_mapping("base", "en", "config.en")
            .unwrap();
        builder
            .add_language_mapping("base", "fr", "config.fr")
            .unwrap();
        builder
            .add_language_mapping("feature", "en", "feature.config.en")
            .unwrap();

        let root = builder.build();
        let modules: Vec<_> = root.child_elements().collect();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].child_elements().count(), 2);
        assert_eq!(modules[1].child_elements().count(), 1);
    }
}

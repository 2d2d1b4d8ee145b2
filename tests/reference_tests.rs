#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::rstest;
    use wexpr::{Expression, ParseErrorKind, ParseOptions};

    #[test]
    fn references_deep_copy_into_place() {
        let mut doc = wexpr::parse_text("@(first [val]\"name\" second *[val])").unwrap();
        assert_eq!(doc.map_get("first"), Some(&Expression::value("name")));
        assert_eq!(doc.map_get("second"), Some(&Expression::value("name")));

        // The two subtrees are independent copies.
        doc.map_get_mut("first").unwrap().set_value("changed");
        assert_eq!(doc.map_get("second"), Some(&Expression::value("name")));
    }

    #[test]
    fn dereferenced_containers_are_independent() {
        let mut doc = wexpr::parse_text("@(base [b]@(x 1) copy *[b])").unwrap();
        doc.map_get_mut("base")
            .unwrap()
            .map_insert("x", Expression::value("2"));
        assert_eq!(
            doc.map_get("copy").unwrap().map_get("x"),
            Some(&Expression::value("1"))
        );
    }

    #[test]
    fn reference_definitions_are_transparent() {
        assert_eq!(wexpr::parse_text("[x]5").unwrap(), Expression::value("5"));

        let array = wexpr::parse_text("#([a]1 *[a])").unwrap();
        assert_eq!(
            array.as_array().unwrap(),
            &[Expression::value("1"), Expression::value("1")]
        );
    }

    #[test]
    fn references_can_be_chained() {
        let array = wexpr::parse_text("#([a]1 [b]*[a] *[b])").unwrap();
        assert_eq!(array.as_array().unwrap().len(), 3);
        for item in array.as_array().unwrap() {
            assert_eq!(item, &Expression::value("1"));
        }
    }

    #[test]
    fn empty_reference_names_are_allowed() {
        let array = wexpr::parse_text("#([]7 *[])").unwrap();
        assert_eq!(
            array.as_array().unwrap(),
            &[Expression::value("7"), Expression::value("7")]
        );
    }

    #[test]
    fn external_references_resolve() {
        let mut refs = HashMap::new();
        refs.insert("name".to_string(), Expression::value("Bob"));

        let doc = wexpr::parse_text_with(
            "@(playerName *[name])",
            &ParseOptions::default(),
            &refs,
        )
        .unwrap();
        assert_eq!(doc.map_get("playerName"), Some(&Expression::value("Bob")));
    }

    #[test]
    fn internal_bindings_shadow_external_ones() {
        let mut refs = HashMap::new();
        refs.insert("name".to_string(), Expression::value("Bob"));

        let doc = wexpr::parse_text_with(
            "#([name]Alice *[name])",
            &ParseOptions::default(),
            &refs,
        )
        .unwrap();
        assert_eq!(
            doc.as_array().unwrap(),
            &[Expression::value("Alice"), Expression::value("Alice")]
        );
    }

    #[test]
    fn bindings_do_not_leak_between_documents() {
        wexpr::parse_text("[val]kept").unwrap();
        let err = wexpr::parse_text("*[val]").unwrap_err();
        assert_eq!(
            err.kind,
            ParseErrorKind::ReferenceUnknownReference("val".to_string())
        );
    }

    #[rstest]
    #[case("[unclosed x", ParseErrorKind::ReferenceMissingEndBracket)]
    #[case("*[unclosed", ParseErrorKind::ReferenceInsertMissingEndBracket)]
    #[case("*[missing]", ParseErrorKind::ReferenceUnknownReference("missing".to_string()))]
    #[case("[9bad] x", ParseErrorKind::ReferenceInvalidName("9bad".to_string()))]
    fn malformed_references_fail(#[case] document: &str, #[case] expected: ParseErrorKind) {
        assert_eq!(wexpr::parse_text(document).unwrap_err().kind, expected);
    }

    #[test]
    fn unknown_reference_errors_point_past_the_token() {
        let err = wexpr::parse_text("*[missing]").unwrap_err();
        assert_eq!((err.line, err.column), (1, 11));
        assert_eq!(err.to_string(), "1:11: unknown reference 'missing'");
    }

    #[test]
    fn nesting_depth_is_configurable() {
        let options = ParseOptions { max_depth: 2 };
        let refs = HashMap::new();

        assert!(wexpr::parse_text_with("#(#(x))", &options, &refs).is_ok());
        let err = wexpr::parse_text_with("#(#(#(x)))", &options, &refs).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::NestingTooDeep);

        assert_eq!(ParseOptions::default().max_depth, 128);
    }
}

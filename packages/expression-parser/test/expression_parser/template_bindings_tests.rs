/**
 * Template Binding Tests
 *
 * Microsyntax of structural directives, e.g. `*ngFor="let item of items"`.
 */

#[path = "utils/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use template_expression_parser::expression_parser::{ExpressionBinding, VariableBinding};
    use template_expression_parser::{serialize, Parser, TemplateBinding, TemplateBindingParseResult};

    fn parse_template_bindings(key: &str, value: &str) -> TemplateBindingParseResult {
        Parser::new().parse_template_bindings(key, value, "location", 0, 0)
    }

    fn keys(result: &TemplateBindingParseResult) -> Vec<&str> {
        result
            .template_bindings
            .iter()
            .map(|binding| binding.key().source.as_str())
            .collect()
    }

    /// `[key, value]` pairs, with variable values and serialized expressions.
    fn key_values(result: &TemplateBindingParseResult) -> Vec<(String, Option<String>)> {
        result
            .template_bindings
            .iter()
            .map(|binding| match binding {
                TemplateBinding::Variable(b) => {
                    (format!("let {}", b.key.source), b.value.as_ref().map(|v| v.source.clone()))
                }
                TemplateBinding::Expression(b) => {
                    (b.key.source.clone(), b.value.as_ref().map(|v| serialize(&v.ast)))
                }
            })
            .collect()
    }

    fn pair(key: &str, value: Option<&str>) -> (String, Option<String>) {
        (key.to_string(), value.map(str::to_string))
    }

    fn expression(binding: &TemplateBinding) -> &ExpressionBinding {
        match binding {
            TemplateBinding::Expression(b) => b,
            other => panic!("Expected ExpressionBinding, got {:?}", other),
        }
    }

    fn variable(binding: &TemplateBinding) -> &VariableBinding {
        match binding {
            TemplateBinding::Variable(b) => b,
            other => panic!("Expected VariableBinding, got {:?}", other),
        }
    }

    mod bindings {
        use super::*;

        #[test]
        fn should_parse_ng_for_in_source_order() {
            let result = parse_template_bindings("ngFor", "let item of items; index as i; trackBy: byId");
            assert!(result.errors.is_empty(), "{:?}", result.errors);
            assert_eq!(keys(&result), vec!["ngFor", "item", "ngForOf", "i", "ngForTrackBy"]);
            assert_eq!(
                key_values(&result),
                vec![
                    pair("ngFor", None),
                    pair("let item", None),
                    pair("ngForOf", Some("items")),
                    pair("let i", Some("index")),
                    pair("ngForTrackBy", Some("byId")),
                ]
            );
        }

        #[test]
        fn should_bind_the_directive_key_to_a_leading_expression() {
            let result = parse_template_bindings("ngIf", "cond");
            assert_eq!(key_values(&result), vec![pair("ngIf", Some("cond"))]);
        }

        #[test]
        fn should_produce_only_the_key_for_an_empty_value() {
            let result = parse_template_bindings("ngIf", "");
            assert!(result.errors.is_empty());
            assert_eq!(key_values(&result), vec![pair("ngIf", None)]);
        }

        #[test]
        fn should_parse_as_aliases() {
            let result = parse_template_bindings("ngIf", "user.name as name");
            assert_eq!(
                key_values(&result),
                vec![pair("ngIf", Some("user.name")), pair("let name", Some("ngIf"))]
            );
        }

        #[test]
        fn should_parse_let_with_value() {
            let result = parse_template_bindings("ngFor", "let item; let i = index");
            assert_eq!(
                key_values(&result),
                vec![pair("ngFor", None), pair("let item", None), pair("let i", Some("index"))]
            );
        }

        #[test]
        fn should_accept_commas_as_terminators() {
            let result = parse_template_bindings("ngFor", "let item of items, index as i");
            assert!(result.errors.is_empty(), "{:?}", result.errors);
            assert_eq!(keys(&result), vec!["ngFor", "item", "ngForOf", "i"]);
        }

        #[test]
        fn should_allow_an_optional_colon() {
            let result = parse_template_bindings("ngFor", "let item of: items");
            assert_eq!(keys(&result), vec!["ngFor", "item", "ngForOf"]);
        }

        #[test]
        fn should_parse_pipes_in_bound_expressions() {
            let result = parse_template_bindings("ngFor", "let item of items | async");
            assert_eq!(expression(&result.template_bindings[2]).value.as_ref().map(|v| serialize(&v.ast)), Some("items | async".to_string()));
        }

        #[test]
        fn should_join_dashed_keys() {
            let result = parse_template_bindings("ngFor", "let item-a of items");
            assert_eq!(keys(&result), vec!["ngFor", "item-a", "ngForOf"]);
        }

        #[test]
        fn should_prefix_and_capitalize_secondary_keys() {
            let result = parse_template_bindings("ngSwitchCase", "'a'; default: 'b'");
            assert_eq!(keys(&result), vec!["ngSwitchCase", "ngSwitchCaseDefault"]);
        }
    }

    mod spans {
        use super::*;

        #[test]
        fn should_span_the_directive_key() {
            let result = Parser::new().parse_template_bindings("ngIf", "cond", "location", 10, 16);
            let binding = expression(&result.template_bindings[0]);
            assert_eq!((binding.key.span.start, binding.key.span.end), (10, 14));
        }

        #[test]
        fn should_span_variable_keys() {
            let result = parse_template_bindings("ngFor", "let item of items");
            let binding = variable(&result.template_bindings[1]);
            assert_eq!((binding.key.span.start, binding.key.span.end), (4, 8));
        }

        #[test]
        fn should_keep_the_source_key_span_for_prefixed_keys() {
            let result = parse_template_bindings("ngFor", "let item of items");
            let binding = expression(&result.template_bindings[2]);
            assert_eq!(binding.key.source, "ngForOf");
            assert_eq!((binding.key.span.start, binding.key.span.end), (9, 11));
        }

        #[test]
        fn should_offset_bound_expressions() {
            let result = Parser::new().parse_template_bindings("ngFor", "let item of items", "location", 0, 20);
            let binding = expression(&result.template_bindings[2]);
            let value = binding.value.as_ref().expect("value");
            assert_eq!(value.source.as_deref(), Some("items"));
            assert_eq!(value.absolute_offset, 32);
            let source_span = value.ast.source_span();
            assert_eq!((source_span.start, source_span.end), (32, 37));
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn should_report_a_missing_let_key() {
            let result = parse_template_bindings("ngFor", "let");
            assert_eq!(result.errors.len(), 1);
            assert!(
                result.errors[0].message.contains("Unexpected end of input, expected identifier, keyword, or string"),
                "{:?}",
                result.errors
            );
        }

        #[test]
        fn should_attach_expression_errors_to_their_binding() {
            let result = parse_template_bindings("ngIf", "a = 1");
            let binding = expression(&result.template_bindings[0]);
            let value = binding.value.as_ref().expect("value");
            assert!(value.errors.iter().any(|e| e.message.contains("Bindings cannot contain assignments")));
            assert!(result.errors.iter().any(|e| e.message.contains("Bindings cannot contain assignments")));
        }

        #[test]
        fn should_not_leak_earlier_errors_into_later_bindings() {
            let result = parse_template_bindings("ngFor", "let item of a = 1; trackBy: byId");
            let track_by = expression(&result.template_bindings[3]);
            assert_eq!(track_by.key.source, "ngForTrackBy");
            assert!(track_by.value.as_ref().expect("value").errors.is_empty());
            assert!(!result.errors.is_empty());
        }

        #[test]
        fn should_report_private_identifier_keys() {
            let result = parse_template_bindings("ngFor", "let #item of items");
            assert!(result.errors.iter().any(|e| e.message.contains("Private identifiers are not supported")));
        }

        #[test]
        fn should_not_report_warnings() {
            let result = parse_template_bindings("ngFor", "let item of items");
            assert!(result.warnings.is_empty());
        }
    }
}

/**
 * Interpolation Tests
 *
 * Splitting text into literal and expression pieces, and parsing the
 * resulting interpolations.
 */

#[path = "utils/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{error_messages, expect_error, expect_no_errors, parse_interpolation};
    use template_expression_parser::expression_parser::{Interpolation, AST};
    use template_expression_parser::{
        serialize, InterpolationConfig, Parser, SplitInterpolation, DEFAULT_INTERPOLATION_CONFIG,
    };

    fn split(text: &str) -> SplitInterpolation {
        Parser::new().split_interpolation(text, "location", &DEFAULT_INTERPOLATION_CONFIG)
    }

    fn strings(split: &SplitInterpolation) -> Vec<&str> {
        split.strings.iter().map(|s| s.text.as_str()).collect()
    }

    fn expressions(split: &SplitInterpolation) -> Vec<&str> {
        split.expressions.iter().map(|e| e.text.as_str()).collect()
    }

    fn as_interpolation(ast: &AST) -> &Interpolation {
        match ast {
            AST::Interpolation(interpolation) => interpolation,
            other => panic!("Expected Interpolation, got {:?}", other),
        }
    }

    mod split_interpolation {
        use super::*;

        #[test]
        fn should_split_text_and_expressions() {
            let result = split("a {{ x }} b");
            assert_eq!(strings(&result), vec!["a ", " b"]);
            assert_eq!(expressions(&result), vec![" x "]);
            assert_eq!(result.offsets, vec![4]);
            assert!(result.errors.is_empty());
        }

        #[test]
        fn should_record_piece_positions() {
            let result = split("a {{ x }} b");
            assert_eq!((result.strings[0].start, result.strings[0].end), (0, 2));
            assert_eq!((result.expressions[0].start, result.expressions[0].end), (2, 9));
            assert_eq!((result.strings[1].start, result.strings[1].end), (9, 11));
        }

        #[test]
        fn should_always_have_one_more_string_than_expressions() {
            for text in ["{{a}}", "{{a}}{{b}}", "x{{a}}y{{b}}z", "plain", "a {{ b", ""] {
                let result = split(text);
                if !result.expressions.is_empty() {
                    assert_eq!(result.strings.len(), result.expressions.len() + 1, "for {:?}", text);
                }
            }
            assert_eq!(strings(&split("{{a}}{{b}}")), vec!["", "", ""]);
        }

        #[test]
        fn should_return_the_whole_text_without_interpolation() {
            let result = split("plain text");
            assert_eq!(strings(&result), vec!["plain text"]);
            assert!(result.expressions.is_empty());
        }

        #[test]
        fn should_fold_unterminated_interpolation_into_the_text() {
            let result = split("a {{ b");
            assert_eq!(strings(&result), vec!["a {{ b"]);
            assert!(result.expressions.is_empty());
            assert_eq!(result.strings[0].end, 6);
        }

        #[test]
        fn should_ignore_end_markers_in_quotes() {
            let result = split("{{ '}}' }}");
            assert_eq!(expressions(&result), vec![" '}}' "]);
        }

        #[test]
        fn should_replace_blank_expressions() {
            let result = split("a {{ }} b");
            assert_eq!(expressions(&result), vec!["$implicit"]);
            assert_eq!(result.errors.len(), 1);
            assert_eq!(
                result.errors[0].message,
                "Parser Error: Blank expressions are not allowed in interpolated strings at column 2 in [a {{ }} b] in location"
            );
        }

        #[test]
        fn should_use_custom_delimiters() {
            let config = InterpolationConfig::new("[[", "]]").expect("config");
            let result = Parser::new().split_interpolation("a [[ x ]] {{ y }}", "location", &config);
            assert_eq!(strings(&result), vec!["a ", " {{ y }}"]);
            assert_eq!(expressions(&result), vec![" x "]);
        }
    }

    mod delimiters {
        use super::*;

        #[test]
        fn should_reject_empty_markers() {
            assert!(InterpolationConfig::new("", "").is_err());
            assert!(InterpolationConfig::new("{{", "").is_err());
            assert!(InterpolationConfig::from_array(Some(&["".to_string(), "}}".to_string()])).is_err());
        }

        #[test]
        fn should_split_with_single_character_markers() {
            let config = InterpolationConfig::new("%", "%").expect("config");
            let result = Parser::new().split_interpolation("a %x% b", "location", &config);
            assert_eq!(strings(&result), vec!["a ", " b"]);
            assert_eq!(expressions(&result), vec!["x"]);
        }
    }

    mod parse_interpolation {
        use super::*;

        #[test]
        fn should_return_none_without_interpolation() {
            assert!(parse_interpolation("plain text").is_none());
            assert!(parse_interpolation("a {{ b").is_none());
        }

        #[test]
        fn should_parse_expressions() {
            let result = parse_interpolation("a {{ x.y }} b {{ z | p }}").expect("interpolation");
            expect_no_errors(&result);
            let interpolation = as_interpolation(&result.ast);
            assert_eq!(interpolation.strings, vec!["a ", " b ", ""]);
            assert_eq!(interpolation.expressions.len(), 2);
            assert_eq!(serialize(&result.ast), "a {{x.y}} b {{z | p}}");
        }

        #[test]
        fn should_span_the_whole_input() {
            let text = "a {{ x }} b";
            let result = parse_interpolation(text).expect("interpolation");
            let span = result.ast.span();
            assert_eq!((span.start, span.end), (0, text.len()));
        }

        #[test]
        fn should_measure_expression_spans_against_the_whole_input() {
            let result = parse_interpolation("a {{ x }} b").expect("interpolation");
            let interpolation = as_interpolation(&result.ast);
            let span = interpolation.expressions[0].span();
            assert_eq!((span.start, span.end), (5, 6));
        }

        #[test]
        fn should_apply_the_absolute_offset() {
            let result = Parser::new()
                .parse_interpolation("{{ x }}", "location", 100, &DEFAULT_INTERPOLATION_CONFIG)
                .expect("interpolation");
            let interpolation = as_interpolation(&result.ast);
            let source_span = interpolation.expressions[0].source_span();
            assert_eq!((source_span.start, source_span.end), (103, 104));
        }

        #[test]
        fn should_read_implicit_for_blank_expressions() {
            let result = parse_interpolation("{{ }}").expect("interpolation");
            expect_error(&result, "Blank expressions are not allowed in interpolated strings");
            let interpolation = as_interpolation(&result.ast);
            match &*interpolation.expressions[0] {
                AST::PropertyRead(read) => {
                    assert_eq!(read.name, "$implicit");
                    assert!(read.receiver.is_implicit_receiver());
                }
                other => panic!("Expected PropertyRead, got {:?}", other),
            }
        }

        #[test]
        fn should_ignore_comments() {
            let result = parse_interpolation("{{ a // comment }}").expect("interpolation");
            expect_no_errors(&result);
            assert_eq!(serialize(&result.ast), "{{a}}");
        }

        #[test]
        fn should_report_errors_against_the_whole_input() {
            let result = parse_interpolation("x {{ a b }}").expect("interpolation");
            let messages = error_messages(&result);
            assert_eq!(messages.len(), 1);
            assert!(messages[0].contains("Unexpected token 'b'"), "{:?}", messages);
            assert!(messages[0].contains("[x {{ a b }}]"), "{:?}", messages);
        }

        #[test]
        fn should_report_assignments() {
            let result = parse_interpolation("{{ a = 1 }}").expect("interpolation");
            expect_error(&result, "Bindings cannot contain assignments");
        }
    }

    mod parse_interpolation_expression {
        use super::*;

        #[test]
        fn should_wrap_a_single_expression() {
            let result = Parser::new().parse_interpolation_expression("a.b", "location", 0);
            expect_no_errors(&result);
            let interpolation = as_interpolation(&result.ast);
            assert_eq!(interpolation.strings, vec!["", ""]);
            assert_eq!(interpolation.expressions.len(), 1);
            assert_eq!(serialize(&interpolation.expressions[0]), "a.b");
        }
    }

    mod wrap_literal_primitive {
        use super::*;
        use template_expression_parser::expression_parser::LiteralPrimitive;

        #[test]
        fn should_wrap_text_in_a_string_literal() {
            let result = Parser::new().wrap_literal_primitive(Some("hello"), "location", 5);
            match &*result.ast {
                AST::LiteralPrimitive(LiteralPrimitive::String { value, source_span, .. }) => {
                    assert_eq!(value, "hello");
                    assert_eq!((source_span.start, source_span.end), (5, 10));
                }
                other => panic!("Expected string literal, got {:?}", other),
            }
        }

        #[test]
        fn should_wrap_missing_text_in_null() {
            let result = Parser::new().wrap_literal_primitive(None, "location", 0);
            assert!(matches!(&*result.ast, AST::LiteralPrimitive(LiteralPrimitive::Null { .. })));
            assert!(result.source.is_none());
        }
    }
}

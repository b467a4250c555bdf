/**
 * Expression Checker Tests
 *
 * Host bindings reject pipes. The shallow checker only inspects the root and
 * literal containers; the recursive one walks the whole expression.
 */

#[path = "utils/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::error_messages;
    use template_expression_parser::{
        ASTWithSource, CheckerKind, Parser, ParserConfig, DEFAULT_INTERPOLATION_CONFIG,
    };

    fn shallow(text: &str) -> ASTWithSource {
        Parser::new().parse_simple_binding(text, "location", 0, &DEFAULT_INTERPOLATION_CONFIG)
    }

    fn recursive(text: &str) -> ASTWithSource {
        Parser::ivy().parse_simple_binding(text, "location", 0, &DEFAULT_INTERPOLATION_CONFIG)
    }

    fn has_pipe_error(result: &ASTWithSource) -> bool {
        error_messages(result)
            .iter()
            .any(|m| m.contains("Host binding expression cannot contain pipes"))
    }

    mod shallow_checker {
        use super::*;

        #[test]
        fn should_reject_a_root_pipe() {
            assert!(has_pipe_error(&shallow("a | b")));
        }

        #[test]
        fn should_reject_pipes_in_literals() {
            assert!(has_pipe_error(&shallow("[a | b]")));
            assert!(has_pipe_error(&shallow("{k: a | b}")));
        }

        #[test]
        fn should_miss_nested_pipes() {
            assert!(!has_pipe_error(&shallow("f((a | b))")));
            assert!(!has_pipe_error(&shallow("c ? (a | b) : d")));
        }

        #[test]
        fn should_render_the_error_without_context() {
            let result = shallow("a | b");
            assert_eq!(
                error_messages(&result),
                vec!["Parser Error: Host binding expression cannot contain pipes location [a | b]".to_string()]
            );
        }
    }

    mod recursive_checker {
        use super::*;

        #[test]
        fn should_reject_a_root_pipe() {
            assert!(has_pipe_error(&recursive("a | b")));
        }

        #[test]
        fn should_reject_nested_pipes() {
            assert!(has_pipe_error(&recursive("f((a | b))")));
            assert!(has_pipe_error(&recursive("c ? (a | b) : d")));
            assert!(has_pipe_error(&recursive("x[(a | b)]")));
        }

        #[test]
        fn should_list_every_pipe() {
            let result = recursive("f((a | b), (c | d))");
            assert!(
                error_messages(&result)
                    .iter()
                    .any(|m| m.contains("cannot contain pipes pipes")),
                "{:?}",
                error_messages(&result)
            );
        }

        #[test]
        fn should_accept_pipe_free_expressions() {
            let result = recursive("a.b(c, [d], {e: f}) ? g : h");
            assert!(result.errors.is_empty(), "{:?}", error_messages(&result));
        }
    }

    mod selection {
        use super::*;

        #[test]
        fn should_default_to_the_shallow_checker() {
            assert_eq!(Parser::new().checker_kind(), CheckerKind::Shallow);
            assert_eq!(Parser::default().checker_kind(), CheckerKind::Shallow);
            assert_eq!(Parser::ivy().checker_kind(), CheckerKind::Recursive);
        }

        #[test]
        fn should_switch_checkers() {
            let parser = Parser::new().with_checker(CheckerKind::Recursive);
            let result = parser.parse_simple_binding("f((a | b))", "location", 0, &DEFAULT_INTERPOLATION_CONFIG);
            assert!(has_pipe_error(&result));
        }

        #[test]
        fn should_build_the_checker_from_config() {
            let config = ParserConfig::from_json(r#"{"ivy": true}"#).expect("config");
            let (parser, interpolation) = config.build().expect("parser");
            let result = parser.parse_simple_binding("f((a | b))", "location", 0, &interpolation);
            assert!(has_pipe_error(&result));
        }
    }
}

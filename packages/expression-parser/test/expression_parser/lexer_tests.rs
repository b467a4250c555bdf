/**
 * Lexer Tests
 *
 * Tokenization of template expressions, including the error tokens produced
 * for malformed input.
 */

#[cfg(test)]
mod tests {
    use template_expression_parser::expression_parser::{Lexer, Token, TokenType};

    fn lex(text: &str) -> Vec<Token> {
        Lexer::new().tokenize(text)
    }

    fn expect_token(token: &Token, index: usize, end: usize) {
        assert_eq!(token.index, index, "Token index mismatch");
        assert_eq!(token.end, end, "Token end mismatch");
    }

    fn expect_character_token(token: &Token, index: usize, end: usize, character: char) {
        expect_token(token, index, end);
        assert!(token.is_character(character), "Expected character token '{}'", character);
    }

    fn expect_operator_token(token: &Token, index: usize, end: usize, operator: &str) {
        expect_token(token, index, end);
        assert!(token.is_operator(operator), "Expected operator token '{}'", operator);
    }

    fn expect_number_token(token: &Token, index: usize, end: usize, n: f64) {
        expect_token(token, index, end);
        assert!(token.is_number(), "Expected number token");
        assert!((token.num_value - n).abs() < 1e-12, "Expected number {}", n);
    }

    fn expect_string_token(token: &Token, index: usize, end: usize, value: &str) {
        expect_token(token, index, end);
        assert!(token.is_string(), "Expected string token");
        assert_eq!(token.str_value, value);
    }

    fn expect_identifier_token(token: &Token, index: usize, end: usize, identifier: &str) {
        expect_token(token, index, end);
        assert!(token.is_identifier(), "Expected identifier token");
        assert_eq!(token.str_value, identifier);
    }

    fn expect_keyword_token(token: &Token, index: usize, end: usize, keyword: &str) {
        expect_token(token, index, end);
        assert!(token.is_keyword(), "Expected keyword token");
        assert_eq!(token.str_value, keyword);
    }

    fn expect_error_token(token: &Token, index: usize, end: usize, message: &str) {
        expect_token(token, index, end);
        assert!(token.is_error(), "Expected error token");
        assert_eq!(token.str_value, message);
    }

    mod identifiers {
        use super::*;

        #[test]
        fn should_tokenize_a_simple_identifier() {
            let tokens = lex("j");
            assert_eq!(tokens.len(), 1);
            expect_identifier_token(&tokens[0], 0, 1, "j");
        }

        #[test]
        fn should_tokenize_dotted_access() {
            let tokens = lex("j.k");
            assert_eq!(tokens.len(), 3);
            expect_identifier_token(&tokens[0], 0, 1, "j");
            expect_character_token(&tokens[1], 1, 2, '.');
            expect_identifier_token(&tokens[2], 2, 3, "k");
        }

        #[test]
        fn should_allow_dollar_and_underscore() {
            let tokens = lex("$a _b a$1");
            expect_identifier_token(&tokens[0], 0, 2, "$a");
            expect_identifier_token(&tokens[1], 3, 5, "_b");
            expect_identifier_token(&tokens[2], 6, 9, "a$1");
        }

        #[test]
        fn should_tokenize_private_identifiers() {
            let tokens = lex("#a");
            assert_eq!(tokens.len(), 1);
            expect_token(&tokens[0], 0, 2);
            assert!(tokens[0].is_private_identifier());
            assert_eq!(tokens[0].str_value, "#a");
        }

        #[test]
        fn should_tokenize_keywords() {
            let tokens = lex("let as null undefined true false this if else var");
            assert!(tokens.iter().all(Token::is_keyword));
            expect_keyword_token(&tokens[0], 0, 3, "let");
            assert!(tokens[0].is_keyword_let());
            assert!(tokens[1].is_keyword_as());
            assert!(tokens[2].is_keyword_null());
            assert!(tokens[3].is_keyword_undefined());
            assert!(tokens[4].is_keyword_true());
            assert!(tokens[5].is_keyword_false());
            assert!(tokens[6].is_keyword_this());
        }
    }

    mod numbers {
        use super::*;

        #[test]
        fn should_tokenize_integers() {
            let tokens = lex("88");
            expect_number_token(&tokens[0], 0, 2, 88.0);
        }

        #[test]
        fn should_tokenize_decimals() {
            expect_number_token(&lex("0.5")[0], 0, 3, 0.5);
            expect_number_token(&lex(".5")[0], 0, 2, 0.5);
        }

        #[test]
        fn should_tokenize_exponents() {
            expect_number_token(&lex("0.5E-10")[0], 0, 7, 0.5e-10);
            expect_number_token(&lex("0.5e+10")[0], 0, 7, 0.5e10);
            expect_number_token(&lex("1e3")[0], 0, 3, 1000.0);
        }

        #[test]
        fn should_round_integers_wider_than_64_bits() {
            let tokens = lex("12345678901234567890123");
            assert_eq!(tokens.len(), 1);
            assert!(tokens[0].is_number());
            assert_eq!(tokens[0].end, 23);
            assert!(tokens[0].num_value.is_finite());
            assert_eq!(tokens[0].num_value, 12345678901234567890123.0);
        }

        #[test]
        fn should_report_invalid_exponents() {
            expect_error_token(
                &lex("0.5E-A")[0],
                4,
                5,
                "Lexer Error: Invalid exponent at column 4 in expression [0.5E-A]",
            );
        }

        #[test]
        fn should_convert_only_numbers() {
            assert_eq!(lex("12")[0].to_number(), 12.0);
            assert_eq!(lex("a")[0].to_number(), -1.0);
        }
    }

    mod strings {
        use super::*;

        #[test]
        fn should_tokenize_quoted_strings() {
            expect_string_token(&lex("'a'")[0], 0, 3, "a");
            expect_string_token(&lex("\"a\"")[0], 0, 3, "a");
        }

        #[test]
        fn should_unescape_sequences() {
            expect_string_token(&lex(r"'\n\t\''")[0], 0, 8, "\n\t'");
            expect_string_token(&lex(r"'\u0041'")[0], 0, 8, "A");
        }

        #[test]
        fn should_keep_the_other_quote() {
            expect_string_token(&lex("\"it's\"")[0], 0, 6, "it's");
        }

        #[test]
        fn should_report_unterminated_quotes() {
            expect_error_token(
                &lex("\"abc")[0],
                4,
                4,
                "Lexer Error: Unterminated quote at column 4 in expression [\"abc]",
            );
        }

        #[test]
        fn should_report_invalid_unicode_escapes() {
            let tokens = lex(r#""\u123""#);
            assert!(tokens[0].is_error());
            assert_eq!(
                tokens[0].str_value,
                r#"Lexer Error: Invalid unicode escape [\u123"] at column 2 in expression ["\u123"]"#
            );
        }
    }

    mod operators {
        use super::*;

        #[test]
        fn should_tokenize_simple_operators() {
            let tokens = lex("+ - * / % ^");
            for (token, operator) in tokens.iter().zip(["+", "-", "*", "/", "%", "^"]) {
                assert!(token.is_operator(operator), "Expected {}", operator);
            }
        }

        #[test]
        fn should_tokenize_compound_operators() {
            let tokens = lex("== != === !== <= >= && || < > ! =");
            let expected = ["==", "!=", "===", "!==", "<=", ">=", "&&", "||", "<", ">", "!", "="];
            assert_eq!(tokens.len(), expected.len());
            for (token, operator) in tokens.iter().zip(expected) {
                assert!(token.is_operator(operator), "Expected {}, got {}", operator, token);
            }
        }

        #[test]
        fn should_tokenize_safe_navigation() {
            let tokens = lex("a?.b");
            assert_eq!(tokens.len(), 3);
            expect_operator_token(&tokens[1], 1, 3, "?.");
            let tokens = lex("a ? b : c");
            expect_operator_token(&tokens[1], 2, 3, "?");
            expect_character_token(&tokens[3], 6, 7, ':');
        }

        #[test]
        fn should_tokenize_a_pipe() {
            let tokens = lex("a | b");
            expect_operator_token(&tokens[1], 2, 3, "|");
        }

        #[test]
        fn should_tokenize_brackets_and_separators() {
            let tokens = lex("()[]{},;:");
            let expected = ['(', ')', '[', ']', '{', '}', ',', ';', ':'];
            assert_eq!(tokens.len(), expected.len());
            for (i, (token, character)) in tokens.iter().zip(expected).enumerate() {
                expect_character_token(token, i, i + 1, character);
            }
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn should_report_unexpected_characters() {
            let tokens = lex("~");
            assert_eq!(tokens.len(), 1);
            expect_error_token(&tokens[0], 1, 1, "Lexer Error: Unexpected character [~] at column 1 in expression [~]");
        }

        #[test]
        fn should_report_a_lone_hash() {
            let tokens = lex("#");
            expect_error_token(&tokens[0], 0, 1, "Lexer Error: Invalid character [#] at column 0 in expression [#]");
        }

        #[test]
        fn should_keep_scanning_after_errors() {
            let tokens = lex("a ~ b");
            assert_eq!(tokens.len(), 3);
            assert!(tokens[1].is_error());
            expect_identifier_token(&tokens[2], 4, 5, "b");
        }

        #[test]
        fn should_skip_whitespace() {
            let tokens = lex(" \t\n a \u{a0}");
            assert_eq!(tokens.len(), 1);
            expect_identifier_token(&tokens[0], 4, 5, "a");
        }

        #[test]
        fn should_use_byte_offsets() {
            let tokens = lex("'é' + a");
            expect_string_token(&tokens[0], 0, 4, "é");
            expect_identifier_token(&tokens[2], 7, 8, "a");
            assert_eq!(tokens[0].token_type, TokenType::String);
        }
    }
}

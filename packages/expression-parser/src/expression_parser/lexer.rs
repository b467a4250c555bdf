/**
 * Template Expression Lexer
 *
 * Tokenizes template expressions into tokens for parsing. The lexer never
 * fails: malformed input turns into `TokenType::Error` tokens that the parser
 * reports while recovering.
 */

use serde::{Deserialize, Serialize};
use crate::chars;

/// Token types in template expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TokenType {
    Character = 0,
    Identifier = 1,
    PrivateIdentifier = 2,
    Keyword = 3,
    String = 4,
    Operator = 5,
    Number = 6,
    Error = 7,
}

/// Token representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub index: usize,
    pub end: usize,
    pub token_type: TokenType,
    pub num_value: f64,
    pub str_value: String,
}

impl Token {
    pub fn new(
        index: usize,
        end: usize,
        token_type: TokenType,
        num_value: f64,
        str_value: String,
    ) -> Self {
        Token {
            index,
            end,
            token_type,
            num_value,
            str_value,
        }
    }

    pub fn is_character(&self, code: char) -> bool {
        self.token_type == TokenType::Character && self.num_value == code as u32 as f64
    }

    pub fn is_number(&self) -> bool {
        self.token_type == TokenType::Number
    }

    pub fn is_string(&self) -> bool {
        self.token_type == TokenType::String
    }

    pub fn is_operator(&self, operator: &str) -> bool {
        self.token_type == TokenType::Operator && self.str_value == operator
    }

    pub fn is_identifier(&self) -> bool {
        self.token_type == TokenType::Identifier
    }

    pub fn is_private_identifier(&self) -> bool {
        self.token_type == TokenType::PrivateIdentifier
    }

    pub fn is_keyword(&self) -> bool {
        self.token_type == TokenType::Keyword
    }

    pub fn is_keyword_let(&self) -> bool {
        self.token_type == TokenType::Keyword && self.str_value == "let"
    }

    pub fn is_keyword_as(&self) -> bool {
        self.token_type == TokenType::Keyword && self.str_value == "as"
    }

    pub fn is_keyword_null(&self) -> bool {
        self.token_type == TokenType::Keyword && self.str_value == "null"
    }

    pub fn is_keyword_undefined(&self) -> bool {
        self.token_type == TokenType::Keyword && self.str_value == "undefined"
    }

    pub fn is_keyword_true(&self) -> bool {
        self.token_type == TokenType::Keyword && self.str_value == "true"
    }

    pub fn is_keyword_false(&self) -> bool {
        self.token_type == TokenType::Keyword && self.str_value == "false"
    }

    pub fn is_keyword_this(&self) -> bool {
        self.token_type == TokenType::Keyword && self.str_value == "this"
    }

    pub fn is_error(&self) -> bool {
        self.token_type == TokenType::Error
    }

    pub fn to_number(&self) -> f64 {
        if self.token_type == TokenType::Number {
            self.num_value
        } else {
            -1.0
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.token_type {
            TokenType::Number => write!(f, "{}", self.num_value),
            _ => f.write_str(&self.str_value),
        }
    }
}

/// Helper functions for creating tokens
pub fn new_character_token(index: usize, end: usize, code: char) -> Token {
    Token::new(index, end, TokenType::Character, code as u32 as f64, code.to_string())
}

pub fn new_identifier_token(index: usize, end: usize, text: String) -> Token {
    Token::new(index, end, TokenType::Identifier, 0.0, text)
}

pub fn new_private_identifier_token(index: usize, end: usize, text: String) -> Token {
    Token::new(index, end, TokenType::PrivateIdentifier, 0.0, text)
}

pub fn new_keyword_token(index: usize, end: usize, text: String) -> Token {
    Token::new(index, end, TokenType::Keyword, 0.0, text)
}

pub fn new_operator_token(index: usize, end: usize, text: &str) -> Token {
    Token::new(index, end, TokenType::Operator, 0.0, text.to_string())
}

pub fn new_string_token(index: usize, end: usize, text: String) -> Token {
    Token::new(index, end, TokenType::String, 0.0, text)
}

pub fn new_number_token(index: usize, end: usize, n: f64) -> Token {
    Token::new(index, end, TokenType::Number, n, String::new())
}

pub fn new_error_token(index: usize, end: usize, message: String) -> Token {
    Token::new(index, end, TokenType::Error, 0.0, message)
}

// Template expression keywords
const KEYWORDS: &[&str] = &[
    "var", "let", "as", "null", "undefined", "true", "false", "if", "else", "this",
];

/// Template expression lexer
#[derive(Debug, Clone, Copy, Default)]
pub struct Lexer;

impl Lexer {
    pub fn new() -> Self {
        Lexer
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        let mut scanner = Scanner::new(text);
        let mut tokens = Vec::new();
        while let Some(token) = scanner.scan_token() {
            tokens.push(token);
        }
        tokens
    }
}

/// Whether `input` is a single well-formed identifier.
pub fn is_identifier(input: &str) -> bool {
    let mut chars = input.chars();
    match chars.next() {
        Some(first) if chars::is_identifier_start(first) => chars.all(chars::is_identifier_part),
        _ => false,
    }
}

/// Scanner for tokenizing input
struct Scanner<'a> {
    input: &'a str,
    length: usize,
    index: usize,
    peek: char,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        let peek = input.chars().next().unwrap_or(chars::EOF);
        Scanner {
            input,
            length: input.len(),
            index: 0,
            peek,
        }
    }

    fn at_end(&self) -> bool {
        self.index >= self.length
    }

    fn advance(&mut self) {
        if !self.at_end() {
            self.index += self.peek.len_utf8();
        }
        self.peek = self.input[self.index..].chars().next().unwrap_or(chars::EOF);
    }

    fn scan_token(&mut self) -> Option<Token> {
        while !self.at_end() && chars::is_whitespace(self.peek) {
            self.advance();
        }

        if self.at_end() {
            return None;
        }

        let start = self.index;
        let ch = self.peek;

        if chars::is_identifier_start(ch) {
            return Some(self.scan_identifier());
        }

        if chars::is_digit(ch) {
            return Some(self.scan_number(start));
        }

        let token = match ch {
            chars::PERIOD => {
                self.advance();
                if chars::is_digit(self.peek) {
                    self.scan_number(start)
                } else {
                    new_character_token(start, self.index, chars::PERIOD)
                }
            }
            chars::LPAREN | chars::RPAREN | chars::LBRACE | chars::RBRACE | chars::LBRACKET
            | chars::RBRACKET | chars::COMMA | chars::COLON | chars::SEMICOLON => {
                self.scan_character(start, ch)
            }
            chars::SQ | chars::DQ => self.scan_string(),
            chars::HASH => self.scan_private_identifier(),
            chars::PLUS | chars::MINUS | chars::STAR | chars::SLASH | chars::PERCENT
            | chars::CARET => self.scan_operator(start, ch),
            chars::QUESTION => self.scan_question(start),
            chars::LT | chars::GT => self.scan_complex_operator(start, ch, chars::EQ, None),
            chars::BANG | chars::EQ => {
                self.scan_complex_operator(start, ch, chars::EQ, Some(chars::EQ))
            }
            chars::AMPERSAND => self.scan_complex_operator(start, ch, chars::AMPERSAND, None),
            chars::BAR => self.scan_complex_operator(start, ch, chars::BAR, None),
            _ => {
                self.advance();
                self.error(format!("Unexpected character [{}]", ch), self.index)
            }
        };
        Some(token)
    }

    fn scan_character(&mut self, start: usize, ch: char) -> Token {
        self.advance();
        new_character_token(start, self.index, ch)
    }

    fn scan_operator(&mut self, start: usize, ch: char) -> Token {
        self.advance();
        new_operator_token(start, self.index, &ch.to_string())
    }

    /// `?` or the safe-navigation operator `?.`
    fn scan_question(&mut self, start: usize) -> Token {
        self.advance();
        if self.peek == chars::PERIOD {
            self.advance();
            return new_operator_token(start, self.index, "?.");
        }
        new_operator_token(start, self.index, "?")
    }

    /// Scans `one`, optionally followed by `two` and then `three`, e.g. `!`, `!=`, `!==`.
    fn scan_complex_operator(
        &mut self,
        start: usize,
        one: char,
        two: char,
        three: Option<char>,
    ) -> Token {
        self.advance();
        let mut text = one.to_string();
        if self.peek == two {
            self.advance();
            text.push(two);
            if let Some(three) = three {
                if self.peek == three {
                    self.advance();
                    text.push(three);
                }
            }
        }
        new_operator_token(start, self.index, &text)
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.index;
        self.advance();

        while !self.at_end() && chars::is_identifier_part(self.peek) {
            self.advance();
        }

        let str_value = self.input[start..self.index].to_string();
        if KEYWORDS.contains(&str_value.as_str()) {
            new_keyword_token(start, self.index, str_value)
        } else {
            new_identifier_token(start, self.index, str_value)
        }
    }

    fn scan_private_identifier(&mut self) -> Token {
        let start = self.index;
        self.advance(); // Skip #

        if !chars::is_identifier_start(self.peek) {
            return self.error("Invalid character [#]".to_string(), start);
        }

        while !self.at_end() && chars::is_identifier_part(self.peek) {
            self.advance();
        }

        let str_value = self.input[start..self.index].to_string();
        new_private_identifier_token(start, self.index, str_value)
    }

    fn scan_number(&mut self, start: usize) -> Token {
        self.advance(); // Skip initial digit or period

        loop {
            if chars::is_digit(self.peek) || self.peek == chars::PERIOD {
                // keep scanning
            } else if chars::is_exponent_start(self.peek) {
                self.advance();
                if chars::is_exponent_sign(self.peek) {
                    self.advance();
                }
                if !chars::is_digit(self.peek) {
                    let position = self.index - 1;
                    return self.error("Invalid exponent".to_string(), position);
                }
            } else {
                break;
            }
            self.advance();
        }

        new_number_token(start, self.index, parse_number(&self.input[start..self.index]))
    }

    fn scan_string(&mut self) -> Token {
        let start = self.index;
        let quote = self.peek;
        self.advance(); // Skip opening quote

        let mut buffer = String::new();
        let mut marker = self.index;

        while self.peek != quote {
            if self.at_end() {
                return self.error("Unterminated quote".to_string(), self.index);
            }
            if self.peek == chars::BACKSLASH {
                buffer.push_str(&self.input[marker..self.index]);
                self.advance();
                if self.peek == 'u' {
                    let hex: String = self.input[self.index + 1..].chars().take(4).collect();
                    let code = if hex.len() == 4 && hex.chars().all(chars::is_ascii_hex_digit) {
                        u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
                    } else {
                        None
                    };
                    let Some(unescaped) = code else {
                        return self.error(format!("Invalid unicode escape [\\u{}]", hex), self.index);
                    };
                    buffer.push(unescaped);
                    for _ in 0..5 {
                        self.advance();
                    }
                } else {
                    if self.at_end() {
                        return self.error("Unterminated quote".to_string(), self.index);
                    }
                    buffer.push(unescape(self.peek));
                    self.advance();
                }
                marker = self.index;
            } else {
                self.advance();
            }
        }

        buffer.push_str(&self.input[marker..self.index]);
        self.advance(); // Skip closing quote
        new_string_token(start, self.index, buffer)
    }

    fn error(&self, message: String, position: usize) -> Token {
        new_error_token(
            position,
            self.index,
            format!(
                "Lexer Error: {} at column {} in expression [{}]",
                message, position, self.input
            ),
        )
    }
}

/// Value of the longest prefix of `text` that reads as a number, so `1.2.3`
/// is `1.2`. Integers beyond `u64` round to the nearest double.
fn parse_number(text: &str) -> f64 {
    (1..=text.len())
        .rev()
        .find_map(|end| text[..end].parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

fn unescape(code: char) -> char {
    match code {
        'n' => '\n',
        'f' => '\x0c',
        'r' => '\r',
        't' => '\t',
        'v' => '\x0b',
        other => other,
    }
}

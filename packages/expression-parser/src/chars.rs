//! Characters the lexer and the grammar dispatch on, plus the character
//! classes used to scan identifiers, numbers and strings.

pub const EOF: char = '\0';
pub const NBSP: char = '\u{00A0}';

pub const BANG: char = '!';
pub const DQ: char = '"';
pub const HASH: char = '#';
pub const PERCENT: char = '%';
pub const AMPERSAND: char = '&';
pub const SQ: char = '\'';
pub const BT: char = '`';
pub const LPAREN: char = '(';
pub const RPAREN: char = ')';
pub const STAR: char = '*';
pub const PLUS: char = '+';
pub const COMMA: char = ',';
pub const MINUS: char = '-';
pub const PERIOD: char = '.';
pub const SLASH: char = '/';
pub const BACKSLASH: char = '\\';
pub const COLON: char = ':';
pub const SEMICOLON: char = ';';
pub const LT: char = '<';
pub const EQ: char = '=';
pub const GT: char = '>';
pub const QUESTION: char = '?';
pub const CARET: char = '^';
pub const BAR: char = '|';
pub const LBRACKET: char = '[';
pub const RBRACKET: char = ']';
pub const LBRACE: char = '{';
pub const RBRACE: char = '}';

/// ASCII control characters from tab through space, and the no-break space.
pub fn is_whitespace(ch: char) -> bool {
    matches!(ch, '\t'..=' ') || ch == NBSP
}

pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

pub fn is_ascii_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

pub fn is_quote(ch: char) -> bool {
    matches!(ch, SQ | DQ | BT)
}

pub fn is_identifier_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || matches!(ch, '_' | '$')
}

pub fn is_identifier_part(ch: char) -> bool {
    is_identifier_start(ch) || is_digit(ch)
}

/// Exponent marker inside a numeric literal
pub fn is_exponent_start(ch: char) -> bool {
    matches!(ch, 'e' | 'E')
}

/// Sign allowed right after an exponent marker
pub fn is_exponent_sign(ch: char) -> bool {
    matches!(ch, MINUS | PLUS)
}

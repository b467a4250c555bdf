/**
 * Template Expression Parser
 *
 * Recursive descent parser for template expressions. Parsing never fails:
 * problems are recorded as `ParserError`s and the grammar recovers by
 * skipping to the next synchronization token, so every entry point returns
 * a well-formed AST together with its diagnostics.
 */
use std::collections::HashMap;

use bitflags::bitflags;

use super::ast::*;
use super::expression_checker::CheckerKind;
use super::lexer::{is_identifier, Lexer, Token};
use crate::chars;
use crate::config::InterpolationConfig;

/// Interpolation piece (part of interpolation)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpolationPiece {
    pub text: String,
    pub start: usize,
    pub end: usize,
}

/// Split interpolation result
#[derive(Debug, Clone)]
pub struct SplitInterpolation {
    pub strings: Vec<InterpolationPiece>,
    pub expressions: Vec<InterpolationPiece>,
    pub offsets: Vec<usize>,
    pub errors: Vec<ParserError>,
}

bitflags! {
    /// Context the grammar is currently parsing in
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(super) struct ParseContextFlags: u8 {
        /// A `=` ends error recovery, since it may belong to a write one level up
        const WRITABLE = 1;
    }
}

/// Text standing in for a blank interpolation expression
const IMPLICIT_RECEIVER_NAME: &str = "$implicit";

/// Parser for template expressions
#[derive(Debug, Clone, Default)]
pub struct Parser {
    lexer: Lexer,
    checker: CheckerKind,
}

impl Parser {
    /// Parser whose host-binding check only looks at the expression root.
    pub fn new() -> Self {
        Parser {
            lexer: Lexer::new(),
            checker: CheckerKind::Shallow,
        }
    }

    /// Parser whose host-binding check rejects pipes at any depth.
    pub fn ivy() -> Self {
        Parser {
            lexer: Lexer::new(),
            checker: CheckerKind::Recursive,
        }
    }

    pub fn with_checker(mut self, checker: CheckerKind) -> Self {
        self.checker = checker;
        self
    }

    pub fn checker_kind(&self) -> CheckerKind {
        self.checker
    }

    /// Parse an action expression (event handler)
    pub fn parse_action(
        &self,
        input: &str,
        location: &str,
        absolute_offset: usize,
        interpolation_config: &InterpolationConfig,
    ) -> ASTWithSource {
        log::debug!("parse_action {} [{}]", location, input);
        let mut errors = Vec::new();
        self.check_no_interpolation(input, location, interpolation_config, &mut errors);
        let source_to_lex = strip_comments(input);
        let tokens = self.lexer.tokenize(source_to_lex);
        let ast = ParseAST::new(
            input,
            location,
            absolute_offset,
            tokens,
            input.len(),
            true,
            &mut errors,
            0,
        )
        .parse_chain();
        ASTWithSource::new(
            Box::new(ast),
            Some(input.to_string()),
            location.to_string(),
            absolute_offset,
            errors,
        )
    }

    /// Parse a binding expression (property binding)
    pub fn parse_binding(
        &self,
        input: &str,
        location: &str,
        absolute_offset: usize,
        interpolation_config: &InterpolationConfig,
    ) -> ASTWithSource {
        log::debug!("parse_binding {} [{}]", location, input);
        let mut errors = Vec::new();
        let ast = self.parse_binding_ast(
            input,
            location,
            absolute_offset,
            interpolation_config,
            &mut errors,
        );
        ASTWithSource::new(
            Box::new(ast),
            Some(input.to_string()),
            location.to_string(),
            absolute_offset,
            errors,
        )
    }

    /// Parse simple binding (for host bindings), where pipes are not allowed
    pub fn parse_simple_binding(
        &self,
        input: &str,
        location: &str,
        absolute_offset: usize,
        interpolation_config: &InterpolationConfig,
    ) -> ASTWithSource {
        log::debug!("parse_simple_binding {} [{}]", location, input);
        let mut errors = Vec::new();
        let ast = self.parse_binding_ast(
            input,
            location,
            absolute_offset,
            interpolation_config,
            &mut errors,
        );
        let restrictions = self.checker.check(&ast);
        if !restrictions.is_empty() {
            report_error(
                &mut errors,
                &format!(
                    "Host binding expression cannot contain {}",
                    restrictions.join(" ")
                ),
                input,
                location,
                None,
            );
        }
        ASTWithSource::new(
            Box::new(ast),
            Some(input.to_string()),
            location.to_string(),
            absolute_offset,
            errors,
        )
    }

    fn parse_binding_ast(
        &self,
        input: &str,
        location: &str,
        absolute_offset: usize,
        interpolation_config: &InterpolationConfig,
        errors: &mut Vec<ParserError>,
    ) -> AST {
        // Quoted expressions belong to another expression language and bypass the grammar.
        if let Some(quote) = parse_quote(input, location, absolute_offset) {
            return quote;
        }

        self.check_no_interpolation(input, location, interpolation_config, errors);
        let source_to_lex = strip_comments(input);
        let tokens = self.lexer.tokenize(source_to_lex);
        ParseAST::new(
            input,
            location,
            absolute_offset,
            tokens,
            input.len(),
            false,
            errors,
            0,
        )
        .parse_chain()
    }

    /// Parse interpolation string (e.g., "Hello {{name}}!").
    ///
    /// Returns `None` when the text contains no interpolation at all.
    pub fn parse_interpolation(
        &self,
        input: &str,
        location: &str,
        absolute_offset: usize,
        interpolation_config: &InterpolationConfig,
    ) -> Option<ASTWithSource> {
        log::debug!("parse_interpolation {} [{}]", location, input);
        let split = self.split_interpolation(input, location, interpolation_config);
        if split.expressions.is_empty() {
            return None;
        }

        let mut errors = split.errors;
        let mut expression_nodes = Vec::with_capacity(split.expressions.len());
        for (piece, &offset) in split.expressions.iter().zip(split.offsets.iter()) {
            let expression_end = piece.end - interpolation_config.end().len();
            let original = input.get(offset..expression_end).unwrap_or("");

            if piece.text == IMPLICIT_RECEIVER_NAME && original.trim().is_empty() {
                expression_nodes.push(Box::new(implicit_read(offset, expression_end, absolute_offset)));
                continue;
            }

            let source_to_lex = strip_comments(&piece.text);
            let tokens = self.lexer.tokenize(source_to_lex);
            let ast = ParseAST::new(
                input,
                location,
                absolute_offset,
                tokens,
                piece.text.len(),
                false,
                &mut errors,
                offset,
            )
            .parse_chain();
            expression_nodes.push(Box::new(ast));
        }

        let strings = split.strings.into_iter().map(|s| s.text).collect();
        Some(create_interpolation_ast(
            strings,
            expression_nodes,
            input,
            location,
            absolute_offset,
            errors,
        ))
    }

    /// Wraps a single bare expression in an `Interpolation` with empty
    /// surrounding strings.
    pub fn parse_interpolation_expression(
        &self,
        expression: &str,
        location: &str,
        absolute_offset: usize,
    ) -> ASTWithSource {
        log::debug!("parse_interpolation_expression {} [{}]", location, expression);
        let mut errors = Vec::new();
        let source_to_lex = strip_comments(expression);
        let tokens = self.lexer.tokenize(source_to_lex);
        let ast = ParseAST::new(
            expression,
            location,
            absolute_offset,
            tokens,
            expression.len(),
            false,
            &mut errors,
            0,
        )
        .parse_chain();

        create_interpolation_ast(
            vec![String::new(), String::new()],
            vec![Box::new(ast)],
            expression,
            location,
            absolute_offset,
            errors,
        )
    }

    /// Wraps raw text (or its absence) in a literal primitive.
    pub fn wrap_literal_primitive(
        &self,
        input: Option<&str>,
        location: &str,
        absolute_offset: usize,
    ) -> ASTWithSource {
        let span = ParseSpan::new(0, input.map_or(0, str::len));
        let source_span = span.to_absolute(absolute_offset);
        let literal = match input {
            Some(text) => LiteralPrimitive::string(span, source_span, text.to_string()),
            None => LiteralPrimitive::null(span, source_span),
        };
        ASTWithSource::new(
            Box::new(AST::LiteralPrimitive(literal)),
            input.map(str::to_string),
            location.to_string(),
            absolute_offset,
            Vec::new(),
        )
    }

    /// Splits text into alternating literal and expression pieces.
    ///
    /// An interpolation whose end marker is missing is folded back into the
    /// last literal piece. Blank expressions are replaced with `$implicit`
    /// and reported in `errors`.
    pub fn split_interpolation(
        &self,
        input: &str,
        location: &str,
        interpolation_config: &InterpolationConfig,
    ) -> SplitInterpolation {
        let mut strings: Vec<InterpolationPiece> = Vec::new();
        let mut expressions = Vec::new();
        let mut offsets = Vec::new();
        let mut errors = Vec::new();
        let interp_start = interpolation_config.start();
        let interp_end = interpolation_config.end();

        // Every iteration below must consume at least one marker.
        if interp_start.is_empty() || interp_end.is_empty() {
            return SplitInterpolation {
                strings: vec![InterpolationPiece {
                    text: input.to_string(),
                    start: 0,
                    end: input.len(),
                }],
                expressions,
                offsets,
                errors,
            };
        }

        let mut i = 0;
        let mut at_interpolation = false;
        let mut extend_last_string = false;

        while i < input.len() {
            if !at_interpolation {
                // parse until the start marker
                let start = i;
                i = input[i..].find(interp_start).map_or(input.len(), |found| i + found);
                strings.push(InterpolationPiece {
                    text: input[start..i].to_string(),
                    start,
                    end: i,
                });
                at_interpolation = true;
            } else {
                // parse from the start marker to the end marker, ignoring quoted content
                let full_start = i;
                let expr_start = full_start + interp_start.len();
                let Some(expr_end) = get_interpolation_end_index(input, interp_end, expr_start) else {
                    at_interpolation = false;
                    extend_last_string = true;
                    break;
                };
                let full_end = expr_end + interp_end.len();

                let mut text = input[expr_start..expr_end].to_string();
                if text.trim().is_empty() {
                    report_error(
                        &mut errors,
                        "Blank expressions are not allowed in interpolated strings",
                        input,
                        &format!("at column {} in", i),
                        Some(location),
                    );
                    text = IMPLICIT_RECEIVER_NAME.to_string();
                }
                expressions.push(InterpolationPiece {
                    text,
                    start: full_start,
                    end: full_end,
                });
                offsets.push(expr_start);

                i = full_end;
                at_interpolation = false;
            }
        }

        if !at_interpolation {
            match strings.last_mut() {
                Some(piece) if extend_last_string => {
                    piece.text.push_str(&input[i..]);
                    piece.end = input.len();
                }
                _ => strings.push(InterpolationPiece {
                    text: input[i..].to_string(),
                    start: i,
                    end: input.len(),
                }),
            }
        }

        SplitInterpolation {
            strings,
            expressions,
            offsets,
            errors,
        }
    }

    /// Parse a structural directive's microsyntax, e.g. the value of
    /// `*ngFor="let item of items; index as i"`.
    pub fn parse_template_bindings(
        &self,
        template_key: &str,
        template_value: &str,
        template_url: &str,
        absolute_key_offset: usize,
        absolute_value_offset: usize,
    ) -> TemplateBindingParseResult {
        log::debug!(
            "parse_template_bindings {} {}=[{}]",
            template_url,
            template_key,
            template_value
        );
        let mut errors = Vec::new();
        let tokens = self.lexer.tokenize(template_value);
        let template_bindings = ParseAST::new(
            template_value,
            template_url,
            absolute_value_offset,
            tokens,
            template_value.len(),
            false,
            &mut errors,
            0,
        )
        .parse_template_bindings(TemplateBindingIdentifier {
            source: template_key.to_string(),
            span: AbsoluteSourceSpan::new(
                absolute_key_offset,
                absolute_key_offset + template_key.len(),
            ),
        });

        TemplateBindingParseResult {
            template_bindings,
            warnings: Vec::new(),
            errors,
        }
    }

    fn check_no_interpolation(
        &self,
        input: &str,
        location: &str,
        interpolation_config: &InterpolationConfig,
        errors: &mut Vec<ParserError>,
    ) {
        let start = interpolation_config.start();
        let end = interpolation_config.end();
        let mut start_index = None;
        let mut end_index = None;

        for char_index in unquoted_char_indices(input, 0) {
            match start_index {
                None => {
                    if input[char_index..].starts_with(start) {
                        start_index = Some(char_index);
                    }
                }
                Some(_) => {
                    end_index = get_interpolation_end_index(input, end, char_index);
                    if end_index.is_some() {
                        break;
                    }
                }
            }
        }

        if let (Some(start_index), Some(_)) = (start_index, end_index) {
            report_error(
                errors,
                &format!("Got interpolation ({}{}) where expression was expected", start, end),
                input,
                &format!("at column {} in", start_index),
                Some(location),
            );
        }
    }
}

fn report_error(
    errors: &mut Vec<ParserError>,
    message: &str,
    input: &str,
    err_location: &str,
    ctx_location: Option<&str>,
) {
    log::trace!("{} {} [{}]", message, err_location, input);
    errors.push(ParserError::new(message, input, err_location, ctx_location));
}

/// Recognizes `prefix:rest` where `prefix` is an identifier.
fn parse_quote(input: &str, location: &str, absolute_offset: usize) -> Option<AST> {
    let separator = input.find(':')?;
    let prefix = input[..separator].trim();
    if !is_identifier(prefix) {
        return None;
    }
    let span = ParseSpan::new(0, input.len());
    Some(AST::Quote(Quote {
        span,
        source_span: span.to_absolute(absolute_offset),
        prefix: prefix.to_string(),
        uninterpreted_expression: input[separator + 1..].to_string(),
        location: location.to_string(),
    }))
}

fn create_interpolation_ast(
    strings: Vec<String>,
    expressions: Vec<Box<AST>>,
    input: &str,
    location: &str,
    absolute_offset: usize,
    errors: Vec<ParserError>,
) -> ASTWithSource {
    let span = ParseSpan::new(0, input.len());
    let interpolation = AST::Interpolation(Interpolation {
        span,
        source_span: span.to_absolute(absolute_offset),
        strings,
        expressions,
    });
    ASTWithSource::new(
        Box::new(interpolation),
        Some(input.to_string()),
        location.to_string(),
        absolute_offset,
        errors,
    )
}

/// `$implicit` read covering the blank region `start..end` of an interpolation.
fn implicit_read(start: usize, end: usize, absolute_offset: usize) -> AST {
    let span = ParseSpan::new(start, end);
    let source_span = span.to_absolute(absolute_offset);
    AST::PropertyRead(PropertyRead::new(
        span,
        source_span,
        source_span,
        Box::new(AST::ImplicitReceiver(ImplicitReceiver::new(span, source_span))),
        IMPLICIT_RECEIVER_NAME.to_string(),
    ))
}

/// Cuts the text at the first unquoted `//`.
fn strip_comments(input: &str) -> &str {
    match comment_start(input) {
        Some(index) => input[..index].trim_end(),
        None => input,
    }
}

fn comment_start(input: &str) -> Option<usize> {
    let mut outer_quote: Option<char> = None;
    let mut chars_iter = input.char_indices().peekable();
    while let Some((i, ch)) = chars_iter.next() {
        let next = chars_iter.peek().map(|&(_, c)| c);
        if ch == chars::SLASH && next == Some(chars::SLASH) && outer_quote.is_none() {
            return Some(i);
        }
        if outer_quote == Some(ch) {
            outer_quote = None;
        } else if outer_quote.is_none() && chars::is_quote(ch) {
            outer_quote = Some(ch);
        }
    }
    None
}

/// Finds the end marker starting at `start`, skipping quoted regions. After an
/// unquoted `//` nothing else matters, so the marker is searched for directly.
fn get_interpolation_end_index(input: &str, expression_end: &str, start: usize) -> Option<usize> {
    for char_index in unquoted_char_indices(input, start) {
        let rest = &input[char_index..];
        if rest.starts_with(expression_end) {
            return Some(char_index);
        }
        if rest.starts_with("//") {
            return rest.find(expression_end).map(|found| char_index + found);
        }
    }
    None
}

/// Byte offsets of the characters from `start` onward that sit outside quotes.
/// Only the outermost quote pair counts, and escaped quotes do not toggle it.
fn unquoted_char_indices(input: &str, start: usize) -> impl Iterator<Item = usize> + '_ {
    let mut current_quote: Option<char> = None;
    let mut escape_count = 0usize;
    input[start..].char_indices().filter_map(move |(offset, ch)| {
        let mut result = None;
        if chars::is_quote(ch)
            && (current_quote.is_none() || current_quote == Some(ch))
            && escape_count % 2 == 0
        {
            current_quote = if current_quote.is_none() { Some(ch) } else { None };
        } else if current_quote.is_none() {
            result = Some(start + offset);
        }
        escape_count = if ch == chars::BACKSLASH { escape_count + 1 } else { 0 };
        result
    })
}

/// Single-use parser state over one token stream.
///
/// `input` is the full text spans are measured against; tokens were lexed
/// from a slice of it starting at `offset`.
pub(super) struct ParseAST<'a> {
    pub(super) input: &'a str,
    pub(super) location: &'a str,
    pub(super) absolute_offset: usize,
    pub(super) tokens: Vec<Token>,
    pub(super) input_length: usize,
    pub(super) parse_action: bool,
    pub(super) errors: &'a mut Vec<ParserError>,
    pub(super) offset: usize,
    pub(super) index: usize,
    rparens_expected: usize,
    rbrackets_expected: usize,
    rbraces_expected: usize,
    context: ParseContextFlags,
    source_span_cache: HashMap<(usize, usize, Option<usize>), AbsoluteSourceSpan>,
}

impl<'a> ParseAST<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(super) fn new(
        input: &'a str,
        location: &'a str,
        absolute_offset: usize,
        tokens: Vec<Token>,
        input_length: usize,
        parse_action: bool,
        errors: &'a mut Vec<ParserError>,
        offset: usize,
    ) -> Self {
        ParseAST {
            input,
            location,
            absolute_offset,
            tokens,
            input_length,
            parse_action,
            errors,
            offset,
            index: 0,
            rparens_expected: 0,
            rbrackets_expected: 0,
            rbraces_expected: 0,
            context: ParseContextFlags::empty(),
            source_span_cache: HashMap::new(),
        }
    }

    pub(super) fn next(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    pub(super) fn at_eof(&self) -> bool {
        self.index >= self.tokens.len()
    }

    /// Index of the next token in `input`, or the end of the last one at EOF.
    pub(super) fn input_index(&self) -> usize {
        match self.next() {
            Some(token) => token.index + self.offset,
            None => self.current_end_index(),
        }
    }

    /// End of the last consumed token.
    fn current_end_index(&self) -> usize {
        if self.index > 0 {
            if let Some(token) = self.tokens.get(self.index - 1) {
                return token.end + self.offset;
            }
        }
        match self.tokens.first() {
            Some(token) if self.index == 0 => token.index + self.offset,
            _ => self.input_length + self.offset,
        }
    }

    pub(super) fn current_absolute_offset(&self) -> usize {
        self.absolute_offset + self.input_index()
    }

    pub(super) fn span(&self, start: usize) -> ParseSpan {
        self.span_to(start, None)
    }

    fn span_to(&self, start: usize, artificial_end: Option<usize>) -> ParseSpan {
        let mut end = self.current_end_index();
        if let Some(artificial_end) = artificial_end {
            end = end.max(artificial_end);
        }
        if start > end {
            ParseSpan::new(end, start)
        } else {
            ParseSpan::new(start, end)
        }
    }

    pub(super) fn source_span(&mut self, start: usize) -> AbsoluteSourceSpan {
        self.source_span_to(start, None)
    }

    fn source_span_to(&mut self, start: usize, artificial_end: Option<usize>) -> AbsoluteSourceSpan {
        let key = (start, self.input_index(), artificial_end);
        if let Some(span) = self.source_span_cache.get(&key) {
            return *span;
        }
        let span = self.span_to(start, artificial_end).to_absolute(self.absolute_offset);
        self.source_span_cache.insert(key, span);
        span
    }

    pub(super) fn advance(&mut self) {
        self.index += 1;
    }

    /// Runs `f` with `context` added, restoring the previous flags afterwards.
    fn with_context<T>(&mut self, context: ParseContextFlags, f: impl FnOnce(&mut Self) -> T) -> T {
        let previous = self.context;
        self.context |= context;
        let result = f(self);
        self.context = previous;
        result
    }

    fn next_is_character(&self, code: char) -> bool {
        self.next().map_or(false, |t| t.is_character(code))
    }

    fn next_is_operator(&self, operator: &str) -> bool {
        self.next().map_or(false, |t| t.is_operator(operator))
    }

    pub(super) fn peek_keyword_let(&self) -> bool {
        self.next().map_or(false, Token::is_keyword_let)
    }

    pub(super) fn peek_keyword_as(&self) -> bool {
        self.next().map_or(false, Token::is_keyword_as)
    }

    pub(super) fn consume_optional_character(&mut self, code: char) -> bool {
        if self.next_is_character(code) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn consume_optional_operator(&mut self, operator: &str) -> bool {
        if self.next_is_operator(operator) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_character(&mut self, code: char) {
        if !self.consume_optional_character(code) {
            self.error(&format!("Missing expected {}", code), None);
        }
    }

    fn pretty_print_token(token: Option<&Token>) -> String {
        match token {
            Some(token) => format!("token {}", token),
            None => "end of input".to_string(),
        }
    }

    fn expect_identifier_or_keyword(&mut self) -> Option<String> {
        let Some(token) = self.next().cloned() else {
            self.error("Unexpected end of input, expected identifier or keyword", None);
            return None;
        };
        if !token.is_identifier() && !token.is_keyword() {
            if token.is_private_identifier() {
                self.report_private_identifier(&token, Some("expected identifier or keyword"));
            } else {
                self.error(
                    &format!(
                        "Unexpected {}, expected identifier or keyword",
                        Self::pretty_print_token(Some(&token))
                    ),
                    None,
                );
            }
            return None;
        }
        self.advance();
        Some(token.str_value)
    }

    pub(super) fn expect_identifier_or_keyword_or_string(&mut self) -> String {
        let token = self.next().cloned();
        match token {
            Some(token) if token.is_identifier() || token.is_keyword() || token.is_string() => {
                self.advance();
                token.str_value
            }
            Some(token) if token.is_private_identifier() => {
                self.report_private_identifier(&token, Some("expected identifier, keyword or string"));
                String::new()
            }
            other => {
                self.error(
                    &format!(
                        "Unexpected {}, expected identifier, keyword, or string",
                        Self::pretty_print_token(other.as_ref())
                    ),
                    None,
                );
                String::new()
            }
        }
    }

    fn report_private_identifier(&mut self, token: &Token, extra_message: Option<&str>) {
        let mut message = format!(
            "Private identifiers are not supported. Unexpected private identifier: {}",
            token
        );
        if let Some(extra) = extra_message {
            message.push_str(", ");
            message.push_str(extra);
        }
        self.error(&message, None);
    }

    /// Records an error at token `index` (default: the next token) and
    /// skips to a recovery point.
    pub(super) fn error(&mut self, message: &str, index: Option<usize>) {
        let err_location = self.location_text(index);
        report_error(self.errors, message, self.input, &err_location, Some(self.location));
        self.skip();
    }

    fn location_text(&self, index: Option<usize>) -> String {
        let index = index.unwrap_or(self.index);
        match self.tokens.get(index) {
            Some(token) => format!("at column {} in", token.index + 1),
            None => "at the end of the expression".to_string(),
        }
    }

    /// Advances to the next token a caller up the stack can resume from:
    /// `;`, `|`, a closing bracket some production is waiting for, or `=`
    /// while a write target is being parsed. Lexer error tokens passed over
    /// on the way are reported.
    fn skip(&mut self) {
        while let Some(token) = self.tokens.get(self.index) {
            let stop = token.is_character(chars::SEMICOLON)
                || token.is_operator("|")
                || (self.rparens_expected > 0 && token.is_character(chars::RPAREN))
                || (self.rbraces_expected > 0 && token.is_character(chars::RBRACE))
                || (self.rbrackets_expected > 0 && token.is_character(chars::RBRACKET))
                || (self.context.contains(ParseContextFlags::WRITABLE) && token.is_operator("="));
            if stop {
                break;
            }
            if token.is_error() {
                let message = token.str_value.clone();
                let err_location = self.location_text(None);
                report_error(self.errors, &message, self.input, &err_location, Some(self.location));
            }
            self.advance();
        }
    }

    pub(super) fn parse_chain(&mut self) -> AST {
        let mut expressions = Vec::new();
        let start = self.input_index();

        while !self.at_eof() {
            expressions.push(Box::new(self.parse_pipe()));

            if self.consume_optional_character(chars::SEMICOLON) {
                if !self.parse_action {
                    self.error("Binding expression cannot contain chained expression", None);
                }
                while self.consume_optional_character(chars::SEMICOLON) {}
            } else if let Some(token) = self.next() {
                let message = format!("Unexpected token '{}'", token);
                self.error(&message, None);
            }
        }

        match expressions.len() {
            0 => {
                let artificial_start = self.offset;
                let artificial_end = self.offset + self.input_length;
                AST::EmptyExpr(EmptyExpr::new(
                    self.span_to(artificial_start, Some(artificial_end)),
                    self.source_span_to(artificial_start, Some(artificial_end)),
                ))
            }
            1 => *expressions.remove(0),
            _ => AST::Chain(Chain {
                span: self.span(start),
                source_span: self.source_span(start),
                expressions,
            }),
        }
    }

    /// Parse pipe expression (e.g., `value | pipeName:arg`)
    pub(super) fn parse_pipe(&mut self) -> AST {
        let start = self.input_index();
        let mut result = self.parse_expression();

        if self.consume_optional_operator("|") {
            if self.parse_action {
                self.error("Cannot have a pipe in an action expression", None);
            }

            loop {
                let name_start = self.input_index();
                let (name, name_span, full_span_end) = match self.expect_identifier_or_keyword() {
                    Some(name) => (name, self.source_span(name_start), None),
                    None => {
                        // No name: the pipe extends up to the next token, trailing whitespace included.
                        let end = self
                            .next()
                            .map_or(self.input_length + self.offset, |t| t.index + self.offset);
                        let name_span = ParseSpan::new(end, end).to_absolute(self.absolute_offset);
                        (String::new(), name_span, Some(end))
                    }
                };

                let mut args = Vec::new();
                while self.consume_optional_character(chars::COLON) {
                    args.push(Box::new(self.parse_expression()));
                }

                result = AST::BindingPipe(BindingPipe {
                    span: self.span(start),
                    source_span: self.source_span_to(start, full_span_end),
                    name_span,
                    exp: Box::new(result),
                    name,
                    args,
                });

                if !self.consume_optional_operator("|") {
                    break;
                }
            }
        }

        result
    }

    fn parse_expression(&mut self) -> AST {
        self.parse_conditional()
    }

    /// Parse conditional/ternary expression (e.g., `a ? b : c`)
    fn parse_conditional(&mut self) -> AST {
        let start = self.input_index();
        let result = self.parse_logical_or();

        if !self.consume_optional_operator("?") {
            return result;
        }

        let yes = self.parse_pipe();
        let no = if self.consume_optional_character(chars::COLON) {
            self.parse_pipe()
        } else {
            let end = self.input_index();
            let expression = self.input.get(start..end).unwrap_or("").to_string();
            self.error(
                &format!("Conditional expression {} requires all 3 expressions", expression),
                None,
            );
            AST::EmptyExpr(EmptyExpr::new(self.span(start), self.source_span(start)))
        };

        AST::Conditional(Conditional {
            span: self.span(start),
            source_span: self.source_span(start),
            condition: Box::new(result),
            true_exp: Box::new(yes),
            false_exp: Box::new(no),
        })
    }

    fn binary(&mut self, start: usize, operation: String, left: AST, right: AST) -> AST {
        AST::Binary(Binary::new(
            self.span(start),
            self.source_span(start),
            operation,
            Box::new(left),
            Box::new(right),
        ))
    }

    /// Operator at the cursor if it is one of `operators`.
    fn next_operator_in(&self, operators: &[&str]) -> Option<String> {
        self.next()
            .filter(|t| operators.iter().any(|op| t.is_operator(op)))
            .map(|t| t.str_value.clone())
    }

    /// Parse logical OR (||)
    fn parse_logical_or(&mut self) -> AST {
        let start = self.input_index();
        let mut result = self.parse_logical_and();
        while self.consume_optional_operator("||") {
            let right = self.parse_logical_and();
            result = self.binary(start, "||".to_string(), result, right);
        }
        result
    }

    /// Parse logical AND (&&)
    fn parse_logical_and(&mut self) -> AST {
        let start = self.input_index();
        let mut result = self.parse_equality();
        while self.consume_optional_operator("&&") {
            let right = self.parse_equality();
            result = self.binary(start, "&&".to_string(), result, right);
        }
        result
    }

    /// Parse equality operators (==, !=, ===, !==)
    fn parse_equality(&mut self) -> AST {
        let start = self.input_index();
        let mut result = self.parse_relational();
        while let Some(operator) = self.next_operator_in(&["==", "===", "!=", "!=="]) {
            self.advance();
            let right = self.parse_relational();
            result = self.binary(start, operator, result, right);
        }
        result
    }

    /// Parse relational operators (<, >, <=, >=)
    fn parse_relational(&mut self) -> AST {
        let start = self.input_index();
        let mut result = self.parse_additive();
        while let Some(operator) = self.next_operator_in(&["<", ">", "<=", ">="]) {
            self.advance();
            let right = self.parse_additive();
            result = self.binary(start, operator, result, right);
        }
        result
    }

    /// Parse additive operators (+, -)
    fn parse_additive(&mut self) -> AST {
        let start = self.input_index();
        let mut result = self.parse_multiplicative();
        while let Some(operator) = self.next_operator_in(&["+", "-"]) {
            self.advance();
            let right = self.parse_multiplicative();
            result = self.binary(start, operator, result, right);
        }
        result
    }

    /// Parse multiplicative operators (*, /, %)
    fn parse_multiplicative(&mut self) -> AST {
        let start = self.input_index();
        let mut result = self.parse_prefix();
        while let Some(operator) = self.next_operator_in(&["*", "%", "/"]) {
            self.advance();
            let right = self.parse_prefix();
            result = self.binary(start, operator, result, right);
        }
        result
    }

    /// Parse prefix operators (!, -, +)
    fn parse_prefix(&mut self) -> AST {
        let start = self.input_index();
        match self.next_operator_in(&["+", "-", "!"]) {
            Some(operator) => {
                self.advance();
                let expression = Box::new(self.parse_prefix());
                let span = self.span(start);
                let source_span = self.source_span(start);
                if operator == "!" {
                    AST::PrefixNot(PrefixNot {
                        span,
                        source_span,
                        expression,
                    })
                } else {
                    AST::Unary(Unary {
                        span,
                        source_span,
                        operator,
                        expr: expression,
                    })
                }
            }
            None => self.parse_call_chain(),
        }
    }

    /// Parse call chain (member access, keyed access, calls, non-null assertions)
    fn parse_call_chain(&mut self) -> AST {
        let start = self.input_index();
        let mut result = self.parse_primary();

        loop {
            if self.consume_optional_character(chars::PERIOD) {
                result = self.parse_access_member_or_method_call(result, start, false);
            } else if self.consume_optional_operator("?.") {
                result = self.parse_access_member_or_method_call(result, start, true);
            } else if self.consume_optional_character(chars::LBRACKET) {
                result = self.with_context(ParseContextFlags::WRITABLE, |this| {
                    this.parse_keyed_access(result, start)
                });
            } else if self.consume_optional_character(chars::LPAREN) {
                self.rparens_expected += 1;
                let args = self.parse_call_arguments();
                self.rparens_expected -= 1;
                self.expect_character(chars::RPAREN);
                result = AST::FunctionCall(FunctionCall {
                    span: self.span(start),
                    source_span: self.source_span(start),
                    target: Box::new(result),
                    args,
                });
            } else if self.consume_optional_operator("!") {
                result = AST::NonNullAssert(NonNullAssert {
                    span: self.span(start),
                    source_span: self.source_span(start),
                    expression: Box::new(result),
                });
            } else {
                return result;
            }
        }
    }

    /// `[key]` after a receiver, with an optional `= value` making it a write.
    fn parse_keyed_access(&mut self, receiver: AST, start: usize) -> AST {
        self.rbrackets_expected += 1;
        let key = self.parse_pipe();
        if key.is_empty_expr() {
            self.error("Key access cannot be empty", None);
        }
        self.rbrackets_expected -= 1;
        self.expect_character(chars::RBRACKET);

        if self.consume_optional_operator("=") {
            if !self.parse_action {
                self.error("Bindings cannot contain assignments", None);
            }
            let value = self.parse_conditional();
            AST::KeyedWrite(KeyedWrite {
                span: self.span(start),
                source_span: self.source_span(start),
                receiver: Box::new(receiver),
                key: Box::new(key),
                value: Box::new(value),
            })
        } else {
            AST::KeyedRead(KeyedRead {
                span: self.span(start),
                source_span: self.source_span(start),
                receiver: Box::new(receiver),
                key: Box::new(key),
            })
        }
    }

    /// Parse primary expression (literals, identifiers, parentheses, arrays, objects)
    fn parse_primary(&mut self) -> AST {
        let start = self.input_index();

        let Some(token) = self.next().cloned() else {
            let message = format!("Unexpected end of expression: {}", self.input);
            self.error(&message, None);
            return AST::EmptyExpr(EmptyExpr::new(self.span(start), self.source_span(start)));
        };

        if token.is_character(chars::LPAREN) {
            self.advance();
            self.rparens_expected += 1;
            let result = self.parse_pipe();
            self.rparens_expected -= 1;
            self.expect_character(chars::RPAREN);
            return result;
        }

        if token.is_keyword_null() || token.is_keyword_undefined() || token.is_keyword_true()
            || token.is_keyword_false()
        {
            self.advance();
            let span = self.span(start);
            let source_span = self.source_span(start);
            let literal = if token.is_keyword_null() {
                LiteralPrimitive::null(span, source_span)
            } else if token.is_keyword_undefined() {
                LiteralPrimitive::undefined(span, source_span)
            } else {
                LiteralPrimitive::boolean(span, source_span, token.is_keyword_true())
            };
            return AST::LiteralPrimitive(literal);
        }

        if token.is_keyword_this() {
            self.advance();
            return AST::ThisReceiver(ThisReceiver::new(self.span(start), self.source_span(start)));
        }

        if token.is_character(chars::LBRACKET) {
            self.advance();
            self.rbrackets_expected += 1;
            let expressions = self.parse_expression_list(chars::RBRACKET);
            self.rbrackets_expected -= 1;
            self.expect_character(chars::RBRACKET);
            return AST::LiteralArray(LiteralArray {
                span: self.span(start),
                source_span: self.source_span(start),
                expressions,
            });
        }

        if token.is_character(chars::LBRACE) {
            return self.parse_literal_map();
        }

        if token.is_identifier() {
            let span = ParseSpan::new(start, start);
            let receiver =
                AST::ImplicitReceiver(ImplicitReceiver::new(span, span.to_absolute(self.absolute_offset)));
            return self.parse_access_member_or_method_call(receiver, start, false);
        }

        if token.is_number() {
            self.advance();
            return AST::LiteralPrimitive(LiteralPrimitive::number(
                self.span(start),
                self.source_span(start),
                token.to_number(),
            ));
        }

        if token.is_string() {
            self.advance();
            return AST::LiteralPrimitive(LiteralPrimitive::string(
                self.span(start),
                self.source_span(start),
                token.str_value,
            ));
        }

        if token.is_private_identifier() {
            self.report_private_identifier(&token, None);
        } else {
            self.error(&format!("Unexpected token {}", token), None);
        }
        AST::EmptyExpr(EmptyExpr::new(self.span(start), self.source_span(start)))
    }

    fn parse_expression_list(&mut self, terminator: char) -> Vec<Box<AST>> {
        let mut result = Vec::new();
        loop {
            if self.next_is_character(terminator) {
                break;
            }
            result.push(Box::new(self.parse_pipe()));
            if !self.consume_optional_character(chars::COMMA) {
                break;
            }
        }
        result
    }

    /// Parse object literal {a: 1, 'b': 2}
    fn parse_literal_map(&mut self) -> AST {
        let mut keys = Vec::new();
        let mut values = Vec::new();
        let start = self.input_index();
        self.expect_character(chars::LBRACE);

        if !self.consume_optional_character(chars::RBRACE) {
            self.rbraces_expected += 1;
            loop {
                let quoted = self.next().map_or(false, Token::is_string);
                let key = self.expect_identifier_or_keyword_or_string();
                keys.push(LiteralMapKey { key, quoted });
                self.expect_character(chars::COLON);
                values.push(Box::new(self.parse_pipe()));
                if !self.consume_optional_character(chars::COMMA) {
                    break;
                }
            }
            self.rbraces_expected -= 1;
            self.expect_character(chars::RBRACE);
        }

        AST::LiteralMap(LiteralMap {
            span: self.span(start),
            source_span: self.source_span(start),
            keys,
            values,
        })
    }

    fn parse_access_member_or_method_call(&mut self, receiver: AST, start: usize, is_safe: bool) -> AST {
        let name_start = self.input_index();
        let name = self
            .with_context(ParseContextFlags::WRITABLE, |this| this.expect_identifier_or_keyword())
            .unwrap_or_default();
        let name_span = self.source_span(name_start);

        if self.consume_optional_character(chars::LPAREN) {
            self.rparens_expected += 1;
            let args = self.parse_call_arguments();
            self.expect_character(chars::RPAREN);
            self.rparens_expected -= 1;
            let span = self.span(start);
            let source_span = self.source_span(start);
            let receiver = Box::new(receiver);
            return if is_safe {
                AST::SafeMethodCall(SafeMethodCall {
                    span,
                    source_span,
                    name_span,
                    receiver,
                    name,
                    args,
                })
            } else {
                AST::MethodCall(MethodCall {
                    span,
                    source_span,
                    name_span,
                    receiver,
                    name,
                    args,
                })
            };
        }

        if is_safe {
            if self.consume_optional_operator("=") {
                self.error("The '?.' operator cannot be used in the assignment", None);
                return AST::EmptyExpr(EmptyExpr::new(self.span(start), self.source_span(start)));
            }
            return AST::SafePropertyRead(SafePropertyRead {
                span: self.span(start),
                source_span: self.source_span(start),
                name_span,
                receiver: Box::new(receiver),
                name,
            });
        }

        if self.consume_optional_operator("=") {
            if !self.parse_action {
                self.error("Bindings cannot contain assignments", None);
                return AST::EmptyExpr(EmptyExpr::new(self.span(start), self.source_span(start)));
            }
            let value = self.parse_conditional();
            return AST::PropertyWrite(PropertyWrite {
                span: self.span(start),
                source_span: self.source_span(start),
                name_span,
                receiver: Box::new(receiver),
                name,
                value: Box::new(value),
            });
        }

        AST::PropertyRead(PropertyRead::new(
            self.span(start),
            self.source_span(start),
            name_span,
            Box::new(receiver),
            name,
        ))
    }

    fn parse_call_arguments(&mut self) -> Vec<Box<AST>> {
        if self.next_is_character(chars::RPAREN) {
            return Vec::new();
        }
        let mut positionals = Vec::new();
        loop {
            positionals.push(Box::new(self.parse_pipe()));
            if !self.consume_optional_character(chars::COMMA) {
                break;
            }
        }
        positionals
    }
}

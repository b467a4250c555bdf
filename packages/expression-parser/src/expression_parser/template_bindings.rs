//! Microsyntax parsing for structural directives.
//!
//! `*ngFor="let item of items; index as i; trackBy: byId"` becomes, in order:
//! `ngFor`, `item`, `ngForOf: items`, `i = index`, `ngForTrackBy: byId`.

use super::ast::*;
use super::parser::ParseAST;
use crate::chars;

impl<'a> ParseAST<'a> {
    /// Parses the whole microsyntax value. The first binding is always the
    /// directive key itself, followed by bindings in source order.
    pub(super) fn parse_template_bindings(
        &mut self,
        template_key: TemplateBindingIdentifier,
    ) -> Vec<TemplateBinding> {
        let mut bindings = Vec::new();
        let template_source = template_key.source.clone();

        bindings.extend(self.parse_directive_keyword_bindings(template_key));

        while !self.at_eof() {
            if let Some(let_binding) = self.parse_let_binding() {
                bindings.push(let_binding);
            } else {
                let mut key = self.expect_template_binding_key();
                match self.parse_as_binding(&key) {
                    Some(as_binding) => bindings.push(as_binding),
                    None => {
                        key.source = format!("{}{}", template_source, capitalize(&key.source));
                        bindings.extend(self.parse_directive_keyword_bindings(key));
                    }
                }
            }
            self.consume_statement_terminator();
        }

        bindings
    }

    /// `key [:] [expression] [as alias]`
    fn parse_directive_keyword_bindings(
        &mut self,
        key: TemplateBindingIdentifier,
    ) -> Vec<TemplateBinding> {
        let mut bindings = Vec::new();
        self.consume_optional_character(chars::COLON);
        let value = self.get_directive_bound_target();
        let mut span_end = self.current_absolute_offset();

        let as_binding = self.parse_as_binding(&key);
        if as_binding.is_none() {
            self.consume_statement_terminator();
            span_end = self.current_absolute_offset();
        }

        bindings.push(TemplateBinding::Expression(ExpressionBinding {
            span: AbsoluteSourceSpan::new(key.span.start, span_end),
            key,
            value,
        }));
        bindings.extend(as_binding);
        bindings
    }

    /// Expression bound to a directive keyword, if one follows.
    fn get_directive_bound_target(&mut self) -> Option<ASTWithSource> {
        if self.at_eof() || self.peek_keyword_as() || self.peek_keyword_let() {
            return None;
        }

        let first_error = self.errors.len();
        let ast = self.parse_pipe();
        let span = ast.span();
        let source = self.input.get(span.start..span.end).unwrap_or("").to_string();
        Some(ASTWithSource::new(
            Box::new(ast),
            Some(source),
            self.location.to_string(),
            self.absolute_offset + span.start,
            self.errors[first_error..].to_vec(),
        ))
    }

    /// `<value> as <key>`: the alias after `as` becomes the key.
    fn parse_as_binding(&mut self, value: &TemplateBindingIdentifier) -> Option<TemplateBinding> {
        if !self.peek_keyword_as() {
            return None;
        }
        self.advance(); // consume 'as'
        let key = self.expect_template_binding_key();
        self.consume_statement_terminator();
        Some(TemplateBinding::Variable(VariableBinding {
            span: AbsoluteSourceSpan::new(value.span.start, self.current_absolute_offset()),
            key,
            value: Some(value.clone()),
        }))
    }

    /// `let <key> [= <value>]`
    fn parse_let_binding(&mut self) -> Option<TemplateBinding> {
        if !self.peek_keyword_let() {
            return None;
        }
        let span_start = self.current_absolute_offset();
        self.advance(); // consume 'let'
        let key = self.expect_template_binding_key();
        let value = if self.consume_optional_operator("=") {
            Some(self.expect_template_binding_key())
        } else {
            None
        };
        self.consume_statement_terminator();
        Some(TemplateBinding::Variable(VariableBinding {
            span: AbsoluteSourceSpan::new(span_start, self.current_absolute_offset()),
            key,
            value,
        }))
    }

    fn consume_statement_terminator(&mut self) {
        if !self.consume_optional_character(chars::SEMICOLON) {
            self.consume_optional_character(chars::COMMA);
        }
    }

    /// A binding key, possibly dash-joined such as `let-item`.
    fn expect_template_binding_key(&mut self) -> TemplateBindingIdentifier {
        let mut result = String::new();
        let start = self.current_absolute_offset();
        loop {
            result.push_str(&self.expect_identifier_or_keyword_or_string());
            if !self.consume_optional_operator("-") {
                break;
            }
            result.push('-');
        }
        TemplateBindingIdentifier {
            span: AbsoluteSourceSpan::new(start, start + result.len()),
            source: result,
        }
    }
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

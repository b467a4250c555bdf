/**
 * Template Expression AST
 *
 * Defines all AST node types for template expressions, the source-carrying
 * wrappers handed back by the parser, and the microsyntax binding types.
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Span relative to the text handed to one parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseSpan {
    pub start: usize,
    pub end: usize,
}

impl ParseSpan {
    pub fn new(start: usize, end: usize) -> Self {
        ParseSpan { start, end }
    }

    pub fn to_absolute(&self, absolute_offset: usize) -> AbsoluteSourceSpan {
        AbsoluteSourceSpan::new(absolute_offset + self.start, absolute_offset + self.end)
    }
}

/// Absolute source span for mapping back to source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AbsoluteSourceSpan {
    pub start: usize,
    pub end: usize,
}

impl AbsoluteSourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        AbsoluteSourceSpan { start, end }
    }
}

/// A recoverable problem found while parsing user input.
///
/// `message` holds the fully rendered text,
/// `Parser Error: <message> <errLocation> [<input>] in <ctxLocation>`;
/// the trailing ` in ...` is left out when there is no context location.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ParserError {
    pub message: String,
    pub input: String,
    pub err_location: String,
    pub ctx_location: Option<String>,
}

impl ParserError {
    pub fn new(
        message: &str,
        input: &str,
        err_location: &str,
        ctx_location: Option<&str>,
    ) -> Self {
        let mut rendered = format!("Parser Error: {} {} [{}]", message, err_location, input);
        if let Some(ctx) = ctx_location {
            rendered.push_str(" in ");
            rendered.push_str(ctx);
        }
        ParserError {
            message: rendered,
            input: input.to_string(),
            err_location: err_location.to_string(),
            ctx_location: ctx_location.map(str::to_string),
        }
    }
}

/// Main AST enum containing all node types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum AST {
    EmptyExpr(EmptyExpr),
    ImplicitReceiver(ImplicitReceiver),
    ThisReceiver(ThisReceiver),
    Chain(Chain),
    Conditional(Conditional),
    PropertyRead(PropertyRead),
    PropertyWrite(PropertyWrite),
    SafePropertyRead(SafePropertyRead),
    KeyedRead(KeyedRead),
    KeyedWrite(KeyedWrite),
    BindingPipe(BindingPipe),
    LiteralPrimitive(LiteralPrimitive),
    LiteralArray(LiteralArray),
    LiteralMap(LiteralMap),
    Interpolation(Interpolation),
    Binary(Binary),
    Unary(Unary),
    PrefixNot(PrefixNot),
    NonNullAssert(NonNullAssert),
    MethodCall(MethodCall),
    SafeMethodCall(SafeMethodCall),
    FunctionCall(FunctionCall),
    Quote(Quote),
}

/// Empty expression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmptyExpr {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
}

/// Implicit receiver (the component instance)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImplicitReceiver {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
}

/// This receiver (explicit `this`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThisReceiver {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
}

/// Chain of expressions (e.g., `a; b; c`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chain {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub expressions: Vec<Box<AST>>,
}

/// Ternary conditional (e.g., `condition ? true : false`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conditional {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub condition: Box<AST>,
    pub true_exp: Box<AST>,
    pub false_exp: Box<AST>,
}

/// Property read (e.g., `obj.property`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyRead {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub name_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub name: String,
}

/// Property write (e.g., `obj.property = value`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyWrite {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub name_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub name: String,
    pub value: Box<AST>,
}

/// Safe property read (e.g., `obj?.property`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafePropertyRead {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub name_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub name: String,
}

/// Keyed read (e.g., `obj[key]`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyedRead {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub key: Box<AST>,
}

/// Keyed write (e.g., `obj[key] = value`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyedWrite {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub key: Box<AST>,
    pub value: Box<AST>,
}

/// Pipe binding (e.g., `value | pipeName:arg1:arg2`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingPipe {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub name_span: AbsoluteSourceSpan,
    pub exp: Box<AST>,
    pub name: String,
    pub args: Vec<Box<AST>>,
}

/// Literal primitive (string, number, boolean, null)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "literalType")]
pub enum LiteralPrimitive {
    String {
        span: ParseSpan,
        source_span: AbsoluteSourceSpan,
        value: String,
    },
    Number {
        span: ParseSpan,
        source_span: AbsoluteSourceSpan,
        value: f64,
    },
    Boolean {
        span: ParseSpan,
        source_span: AbsoluteSourceSpan,
        value: bool,
    },
    Null {
        span: ParseSpan,
        source_span: AbsoluteSourceSpan,
    },
    Undefined {
        span: ParseSpan,
        source_span: AbsoluteSourceSpan,
    },
}

/// Array literal (e.g., `[1, 2, 3]`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiteralArray {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub expressions: Vec<Box<AST>>,
}

/// Map literal key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteralMapKey {
    pub key: String,
    pub quoted: bool,
}

/// Object literal (e.g., `{a: 1, b: 2}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiteralMap {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub keys: Vec<LiteralMapKey>,
    pub values: Vec<Box<AST>>,
}

/// Interpolation ({{expr}}); `strings` always has one more entry than `expressions`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interpolation {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub strings: Vec<String>,
    pub expressions: Vec<Box<AST>>,
}

/// Binary operator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Binary {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub operation: String,
    pub left: Box<AST>,
    pub right: Box<AST>,
}

/// Unary operator (e.g., `+expr`, `-expr`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Unary {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub operator: String,
    pub expr: Box<AST>,
}

/// Prefix not operator (e.g., `!expr`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefixNot {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub expression: Box<AST>,
}

/// Non-null assertion (e.g., `expr!`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonNullAssert {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub expression: Box<AST>,
}

/// Method call (e.g., `obj.method(a, b)`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodCall {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub name_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub name: String,
    pub args: Vec<Box<AST>>,
}

/// Safe method call (e.g., `obj?.method(a, b)`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafeMethodCall {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub name_span: AbsoluteSourceSpan,
    pub receiver: Box<AST>,
    pub name: String,
    pub args: Vec<Box<AST>>,
}

/// Call of an arbitrary callee (e.g., `fns[0](a)`, `getter()(a)`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub target: Box<AST>,
    pub args: Vec<Box<AST>>,
}

/// Opaque `prefix:expression` handed to a third-party interpreter untouched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub span: ParseSpan,
    pub source_span: AbsoluteSourceSpan,
    pub prefix: String,
    pub uninterpreted_expression: String,
    pub location: String,
}

// Helper constructors
impl EmptyExpr {
    pub fn new(span: ParseSpan, source_span: AbsoluteSourceSpan) -> Self {
        EmptyExpr { span, source_span }
    }
}

impl ImplicitReceiver {
    pub fn new(span: ParseSpan, source_span: AbsoluteSourceSpan) -> Self {
        ImplicitReceiver { span, source_span }
    }
}

impl ThisReceiver {
    pub fn new(span: ParseSpan, source_span: AbsoluteSourceSpan) -> Self {
        ThisReceiver { span, source_span }
    }
}

impl PropertyRead {
    pub fn new(
        span: ParseSpan,
        source_span: AbsoluteSourceSpan,
        name_span: AbsoluteSourceSpan,
        receiver: Box<AST>,
        name: String,
    ) -> Self {
        PropertyRead {
            span,
            source_span,
            name_span,
            receiver,
            name,
        }
    }
}

impl Binary {
    pub fn new(
        span: ParseSpan,
        source_span: AbsoluteSourceSpan,
        operation: String,
        left: Box<AST>,
        right: Box<AST>,
    ) -> Self {
        Binary {
            span,
            source_span,
            operation,
            left,
            right,
        }
    }
}

impl LiteralPrimitive {
    pub fn string(span: ParseSpan, source_span: AbsoluteSourceSpan, value: String) -> Self {
        LiteralPrimitive::String {
            span,
            source_span,
            value,
        }
    }

    pub fn number(span: ParseSpan, source_span: AbsoluteSourceSpan, value: f64) -> Self {
        LiteralPrimitive::Number {
            span,
            source_span,
            value,
        }
    }

    pub fn boolean(span: ParseSpan, source_span: AbsoluteSourceSpan, value: bool) -> Self {
        LiteralPrimitive::Boolean {
            span,
            source_span,
            value,
        }
    }

    pub fn null(span: ParseSpan, source_span: AbsoluteSourceSpan) -> Self {
        LiteralPrimitive::Null { span, source_span }
    }

    pub fn undefined(span: ParseSpan, source_span: AbsoluteSourceSpan) -> Self {
        LiteralPrimitive::Undefined { span, source_span }
    }

    pub fn span(&self) -> ParseSpan {
        match self {
            LiteralPrimitive::String { span, .. }
            | LiteralPrimitive::Number { span, .. }
            | LiteralPrimitive::Boolean { span, .. }
            | LiteralPrimitive::Null { span, .. }
            | LiteralPrimitive::Undefined { span, .. } => *span,
        }
    }

    pub fn source_span(&self) -> AbsoluteSourceSpan {
        match self {
            LiteralPrimitive::String { source_span, .. }
            | LiteralPrimitive::Number { source_span, .. }
            | LiteralPrimitive::Boolean { source_span, .. }
            | LiteralPrimitive::Null { source_span, .. }
            | LiteralPrimitive::Undefined { source_span, .. } => *source_span,
        }
    }
}

impl AST {
    pub fn span(&self) -> ParseSpan {
        match self {
            AST::EmptyExpr(e) => e.span,
            AST::ImplicitReceiver(e) => e.span,
            AST::ThisReceiver(e) => e.span,
            AST::Chain(e) => e.span,
            AST::Conditional(e) => e.span,
            AST::PropertyRead(e) => e.span,
            AST::PropertyWrite(e) => e.span,
            AST::SafePropertyRead(e) => e.span,
            AST::KeyedRead(e) => e.span,
            AST::KeyedWrite(e) => e.span,
            AST::BindingPipe(e) => e.span,
            AST::LiteralPrimitive(e) => e.span(),
            AST::LiteralArray(e) => e.span,
            AST::LiteralMap(e) => e.span,
            AST::Interpolation(e) => e.span,
            AST::Binary(e) => e.span,
            AST::Unary(e) => e.span,
            AST::PrefixNot(e) => e.span,
            AST::NonNullAssert(e) => e.span,
            AST::MethodCall(e) => e.span,
            AST::SafeMethodCall(e) => e.span,
            AST::FunctionCall(e) => e.span,
            AST::Quote(e) => e.span,
        }
    }

    pub fn source_span(&self) -> AbsoluteSourceSpan {
        match self {
            AST::EmptyExpr(e) => e.source_span,
            AST::ImplicitReceiver(e) => e.source_span,
            AST::ThisReceiver(e) => e.source_span,
            AST::Chain(e) => e.source_span,
            AST::Conditional(e) => e.source_span,
            AST::PropertyRead(e) => e.source_span,
            AST::PropertyWrite(e) => e.source_span,
            AST::SafePropertyRead(e) => e.source_span,
            AST::KeyedRead(e) => e.source_span,
            AST::KeyedWrite(e) => e.source_span,
            AST::BindingPipe(e) => e.source_span,
            AST::LiteralPrimitive(e) => e.source_span(),
            AST::LiteralArray(e) => e.source_span,
            AST::LiteralMap(e) => e.source_span,
            AST::Interpolation(e) => e.source_span,
            AST::Binary(e) => e.source_span,
            AST::Unary(e) => e.source_span,
            AST::PrefixNot(e) => e.source_span,
            AST::NonNullAssert(e) => e.source_span,
            AST::MethodCall(e) => e.source_span,
            AST::SafeMethodCall(e) => e.source_span,
            AST::FunctionCall(e) => e.source_span,
            AST::Quote(e) => e.source_span,
        }
    }

    pub fn is_implicit_receiver(&self) -> bool {
        matches!(self, AST::ImplicitReceiver(_))
    }

    pub fn is_empty_expr(&self) -> bool {
        matches!(self, AST::EmptyExpr(_))
    }

    /// Dispatches to the visitor method for this node's variant only.
    pub fn visit<V: AstVisitor>(&self, visitor: &mut V) -> V::Result {
        match self {
            AST::EmptyExpr(e) => visitor.visit_empty_expr(e),
            AST::ImplicitReceiver(e) => visitor.visit_implicit_receiver(e),
            AST::ThisReceiver(e) => visitor.visit_this_receiver(e),
            AST::Chain(e) => visitor.visit_chain(e),
            AST::Conditional(e) => visitor.visit_conditional(e),
            AST::PropertyRead(e) => visitor.visit_property_read(e),
            AST::PropertyWrite(e) => visitor.visit_property_write(e),
            AST::SafePropertyRead(e) => visitor.visit_safe_property_read(e),
            AST::KeyedRead(e) => visitor.visit_keyed_read(e),
            AST::KeyedWrite(e) => visitor.visit_keyed_write(e),
            AST::BindingPipe(e) => visitor.visit_pipe(e),
            AST::LiteralPrimitive(e) => visitor.visit_literal_primitive(e),
            AST::LiteralArray(e) => visitor.visit_literal_array(e),
            AST::LiteralMap(e) => visitor.visit_literal_map(e),
            AST::Interpolation(e) => visitor.visit_interpolation(e),
            AST::Binary(e) => visitor.visit_binary(e),
            AST::Unary(e) => visitor.visit_unary(e),
            AST::PrefixNot(e) => visitor.visit_prefix_not(e),
            AST::NonNullAssert(e) => visitor.visit_non_null_assert(e),
            AST::MethodCall(e) => visitor.visit_method_call(e),
            AST::SafeMethodCall(e) => visitor.visit_safe_method_call(e),
            AST::FunctionCall(e) => visitor.visit_function_call(e),
            AST::Quote(e) => visitor.visit_quote(e),
        }
    }
}

/// Visitor over a single node. Every method defaults to `Result::default()`,
/// implementors decide whether to descend into children.
pub trait AstVisitor {
    type Result: Default;

    fn visit_empty_expr(&mut self, _ast: &EmptyExpr) -> Self::Result { Self::Result::default() }
    fn visit_implicit_receiver(&mut self, _ast: &ImplicitReceiver) -> Self::Result { Self::Result::default() }
    fn visit_this_receiver(&mut self, _ast: &ThisReceiver) -> Self::Result { Self::Result::default() }
    fn visit_chain(&mut self, _ast: &Chain) -> Self::Result { Self::Result::default() }
    fn visit_conditional(&mut self, _ast: &Conditional) -> Self::Result { Self::Result::default() }
    fn visit_property_read(&mut self, _ast: &PropertyRead) -> Self::Result { Self::Result::default() }
    fn visit_property_write(&mut self, _ast: &PropertyWrite) -> Self::Result { Self::Result::default() }
    fn visit_safe_property_read(&mut self, _ast: &SafePropertyRead) -> Self::Result { Self::Result::default() }
    fn visit_keyed_read(&mut self, _ast: &KeyedRead) -> Self::Result { Self::Result::default() }
    fn visit_keyed_write(&mut self, _ast: &KeyedWrite) -> Self::Result { Self::Result::default() }
    fn visit_pipe(&mut self, _ast: &BindingPipe) -> Self::Result { Self::Result::default() }
    fn visit_literal_primitive(&mut self, _ast: &LiteralPrimitive) -> Self::Result { Self::Result::default() }
    fn visit_literal_array(&mut self, _ast: &LiteralArray) -> Self::Result { Self::Result::default() }
    fn visit_literal_map(&mut self, _ast: &LiteralMap) -> Self::Result { Self::Result::default() }
    fn visit_interpolation(&mut self, _ast: &Interpolation) -> Self::Result { Self::Result::default() }
    fn visit_binary(&mut self, _ast: &Binary) -> Self::Result { Self::Result::default() }
    fn visit_unary(&mut self, _ast: &Unary) -> Self::Result { Self::Result::default() }
    fn visit_prefix_not(&mut self, _ast: &PrefixNot) -> Self::Result { Self::Result::default() }
    fn visit_non_null_assert(&mut self, _ast: &NonNullAssert) -> Self::Result { Self::Result::default() }
    fn visit_method_call(&mut self, _ast: &MethodCall) -> Self::Result { Self::Result::default() }
    fn visit_safe_method_call(&mut self, _ast: &SafeMethodCall) -> Self::Result { Self::Result::default() }
    fn visit_function_call(&mut self, _ast: &FunctionCall) -> Self::Result { Self::Result::default() }
    fn visit_quote(&mut self, _ast: &Quote) -> Self::Result { Self::Result::default() }
}

/// Dispatches `ast` to the matching `visit_*` method of a recursive visitor.
pub fn walk<V: RecursiveAstVisitor + ?Sized>(visitor: &mut V, ast: &AST) {
    match ast {
        AST::EmptyExpr(_) | AST::ImplicitReceiver(_) | AST::ThisReceiver(_) => {}
        AST::Chain(e) => visitor.visit_chain(e),
        AST::Conditional(e) => visitor.visit_conditional(e),
        AST::PropertyRead(e) => visitor.visit_property_read(e),
        AST::PropertyWrite(e) => visitor.visit_property_write(e),
        AST::SafePropertyRead(e) => visitor.visit_safe_property_read(e),
        AST::KeyedRead(e) => visitor.visit_keyed_read(e),
        AST::KeyedWrite(e) => visitor.visit_keyed_write(e),
        AST::BindingPipe(e) => visitor.visit_pipe(e),
        AST::LiteralPrimitive(e) => visitor.visit_literal_primitive(e),
        AST::LiteralArray(e) => visitor.visit_literal_array(e),
        AST::LiteralMap(e) => visitor.visit_literal_map(e),
        AST::Interpolation(e) => visitor.visit_interpolation(e),
        AST::Binary(e) => visitor.visit_binary(e),
        AST::Unary(e) => visitor.visit_unary(e),
        AST::PrefixNot(e) => visitor.visit_prefix_not(e),
        AST::NonNullAssert(e) => visitor.visit_non_null_assert(e),
        AST::MethodCall(e) => visitor.visit_method_call(e),
        AST::SafeMethodCall(e) => visitor.visit_safe_method_call(e),
        AST::FunctionCall(e) => visitor.visit_function_call(e),
        AST::Quote(e) => visitor.visit_quote(e),
    }
}

/// Visitor that walks the whole tree. An overridden `visit_*` method must
/// visit the node's children itself to keep descending; an overridden
/// `visit` can hand back to [`walk`].
pub trait RecursiveAstVisitor {
    fn visit(&mut self, ast: &AST) {
        walk(self, ast);
    }

    fn visit_all(&mut self, asts: &[Box<AST>]) {
        for ast in asts {
            self.visit(ast);
        }
    }

    fn visit_chain(&mut self, ast: &Chain) {
        self.visit_all(&ast.expressions);
    }

    fn visit_conditional(&mut self, ast: &Conditional) {
        self.visit(&ast.condition);
        self.visit(&ast.true_exp);
        self.visit(&ast.false_exp);
    }

    fn visit_property_read(&mut self, ast: &PropertyRead) {
        self.visit(&ast.receiver);
    }

    fn visit_property_write(&mut self, ast: &PropertyWrite) {
        self.visit(&ast.receiver);
        self.visit(&ast.value);
    }

    fn visit_safe_property_read(&mut self, ast: &SafePropertyRead) {
        self.visit(&ast.receiver);
    }

    fn visit_keyed_read(&mut self, ast: &KeyedRead) {
        self.visit(&ast.receiver);
        self.visit(&ast.key);
    }

    fn visit_keyed_write(&mut self, ast: &KeyedWrite) {
        self.visit(&ast.receiver);
        self.visit(&ast.key);
        self.visit(&ast.value);
    }

    fn visit_pipe(&mut self, ast: &BindingPipe) {
        self.visit(&ast.exp);
        self.visit_all(&ast.args);
    }

    fn visit_literal_primitive(&mut self, _ast: &LiteralPrimitive) {}

    fn visit_literal_array(&mut self, ast: &LiteralArray) {
        self.visit_all(&ast.expressions);
    }

    fn visit_literal_map(&mut self, ast: &LiteralMap) {
        self.visit_all(&ast.values);
    }

    fn visit_interpolation(&mut self, ast: &Interpolation) {
        self.visit_all(&ast.expressions);
    }

    fn visit_binary(&mut self, ast: &Binary) {
        self.visit(&ast.left);
        self.visit(&ast.right);
    }

    fn visit_unary(&mut self, ast: &Unary) {
        self.visit(&ast.expr);
    }

    fn visit_prefix_not(&mut self, ast: &PrefixNot) {
        self.visit(&ast.expression);
    }

    fn visit_non_null_assert(&mut self, ast: &NonNullAssert) {
        self.visit(&ast.expression);
    }

    fn visit_method_call(&mut self, ast: &MethodCall) {
        self.visit(&ast.receiver);
        self.visit_all(&ast.args);
    }

    fn visit_safe_method_call(&mut self, ast: &SafeMethodCall) {
        self.visit(&ast.receiver);
        self.visit_all(&ast.args);
    }

    fn visit_function_call(&mut self, ast: &FunctionCall) {
        self.visit(&ast.target);
        self.visit_all(&ast.args);
    }

    fn visit_quote(&mut self, _ast: &Quote) {}
}

/// AST with source location info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ASTWithSource {
    pub ast: Box<AST>,
    pub source: Option<String>,
    pub location: String,
    pub absolute_offset: usize,
    pub errors: Vec<ParserError>,
}

impl ASTWithSource {
    pub fn new(
        ast: Box<AST>,
        source: Option<String>,
        location: String,
        absolute_offset: usize,
        errors: Vec<ParserError>,
    ) -> Self {
        ASTWithSource {
            ast,
            source,
            location,
            absolute_offset,
            errors,
        }
    }
}

/// Template binding identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateBindingIdentifier {
    pub source: String,
    pub span: AbsoluteSourceSpan,
}

/// Variable binding (`let x = y`, `exp as alias`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableBinding {
    pub span: AbsoluteSourceSpan,
    pub key: TemplateBindingIdentifier,
    pub value: Option<TemplateBindingIdentifier>,
}

/// Expression binding (`ngForOf: items`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpressionBinding {
    pub span: AbsoluteSourceSpan,
    pub key: TemplateBindingIdentifier,
    pub value: Option<ASTWithSource>,
}

/// Template binding (combination of variable and expression bindings)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TemplateBinding {
    Variable(VariableBinding),
    Expression(ExpressionBinding),
}

impl TemplateBinding {
    pub fn key(&self) -> &TemplateBindingIdentifier {
        match self {
            TemplateBinding::Variable(b) => &b.key,
            TemplateBinding::Expression(b) => &b.key,
        }
    }

    pub fn span(&self) -> AbsoluteSourceSpan {
        match self {
            TemplateBinding::Variable(b) => b.span,
            TemplateBinding::Expression(b) => b.span,
        }
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, TemplateBinding::Variable(_))
    }
}

/// Result of parsing a microsyntax attribute value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateBindingParseResult {
    pub template_bindings: Vec<TemplateBinding>,
    pub warnings: Vec<String>,
    pub errors: Vec<ParserError>,
}

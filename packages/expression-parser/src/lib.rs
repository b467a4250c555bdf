/**
 * Template Expression Parser
 *
 * Turns the text of template bindings, interpolations and structural
 * directive microsyntax into span-annotated ASTs. Malformed input never
 * aborts a parse; diagnostics are returned next to a best-effort tree.
 */

// Core modules
pub mod assertions;
pub mod chars;
pub mod config;
pub mod error;

// Parser modules
pub mod expression_parser;

pub use config::{InterpolationConfig, ParserConfig, DEFAULT_INTERPOLATION_CONFIG};
pub use error::{CompilerError, Result};
pub use expression_parser::{
    serialize, ASTWithSource, CheckerKind, Parser, ParserError, SplitInterpolation,
    TemplateBinding, TemplateBindingParseResult, AST,
};

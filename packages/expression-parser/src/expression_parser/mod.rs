/**
 * Expression Parser Module
 *
 * Lexer, grammar, microsyntax and host-binding checks for template expressions.
 */
pub mod ast;
pub mod expression_checker;
pub mod lexer;
pub mod parser;
pub mod serializer;
mod template_bindings;

pub use ast::*;
pub use expression_checker::CheckerKind;
pub use lexer::{is_identifier, Lexer, Token, TokenType};
pub use parser::{InterpolationPiece, Parser, SplitInterpolation};
pub use serializer::serialize;

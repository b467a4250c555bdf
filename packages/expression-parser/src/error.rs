//! Error types
//!
//! Malformed expressions never surface here: they are collected as
//! `ParserError` values next to the AST. `CompilerError` covers misuse of the
//! API itself, such as unusable interpolation delimiters or a broken
//! configuration document.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompilerError {
    #[error("Invalid interpolation config: {message}")]
    InvalidInterpolationConfig { message: String },

    #[error("Invalid parser config: {0}")]
    InvalidConfig(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CompilerError>;

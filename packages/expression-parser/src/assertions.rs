//! Assertions Module
//!
//! Guards on caller-supplied configuration.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{CompilerError, Result};

static UNUSABLE_INTERPOLATION_REGEXPS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"@",           // control flow reserved symbol
        r"^\s*$",       // empty
        r"[<>]",        // html tag
        r"^[{}]$",      // i18n expansion
        r"&(#|[a-z])",  // character reference
        r"^//",         // comment
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Rejects interpolation delimiters that would collide with template syntax.
pub fn assert_interpolation_symbols(identifier: &str, value: Option<&[String]>) -> Result<()> {
    let Some(val) = value else {
        return Ok(());
    };

    if val.len() != 2 {
        return Err(CompilerError::InvalidInterpolationConfig {
            message: format!("Expected '{}' to be an array, [start, end].", identifier),
        });
    }

    let start = &val[0];
    let end = &val[1];

    for regexp in UNUSABLE_INTERPOLATION_REGEXPS.iter() {
        if regexp.is_match(start) || regexp.is_match(end) {
            return Err(CompilerError::InvalidInterpolationConfig {
                message: format!("['{}', '{}'] contains unusable interpolation symbol.", start, end),
            });
        }
    }

    Ok(())
}

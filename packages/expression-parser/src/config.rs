//! Parser Configuration
//!
//! Interpolation delimiters and the knobs that select parser behavior.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::assertions::assert_interpolation_symbols;
use crate::error::Result;
use crate::expression_parser::parser::Parser;

/// Interpolation delimiters. Only validated pairs can be constructed, so
/// both markers are always non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterpolationConfig {
    start: String,
    end: String,
}

impl InterpolationConfig {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Result<Self> {
        let markers = [start.into(), end.into()];
        assert_interpolation_symbols("interpolation", Some(&markers[..]))?;
        let [start, end] = markers;
        Ok(InterpolationConfig { start, end })
    }

    pub fn from_array(markers: Option<&[String]>) -> Result<Self> {
        match markers {
            None => Ok(DEFAULT_INTERPOLATION_CONFIG.clone()),
            Some(m) => {
                assert_interpolation_symbols("interpolation", Some(m))?;
                Ok(InterpolationConfig {
                    start: m[0].clone(),
                    end: m[1].clone(),
                })
            }
        }
    }

    pub fn start(&self) -> &str {
        &self.start
    }

    pub fn end(&self) -> &str {
        &self.end
    }
}

impl Default for InterpolationConfig {
    fn default() -> Self {
        DEFAULT_INTERPOLATION_CONFIG.clone()
    }
}

/// Default interpolation config {{ }}
pub static DEFAULT_INTERPOLATION_CONFIG: Lazy<InterpolationConfig> =
    Lazy::new(|| InterpolationConfig {
        start: "{{".to_string(),
        end: "}}".to_string(),
    });

/// Parser configuration, loadable from a JSON document such as
/// `{"ivy": true, "interpolation": ["[[", "]]"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserConfig {
    /// Use the recursive host-binding checker, which also catches nested pipes
    pub ivy: bool,
    /// Custom interpolation delimiters, `[start, end]`
    pub interpolation: Option<[String; 2]>,
}

impl ParserConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn interpolation_config(&self) -> Result<InterpolationConfig> {
        InterpolationConfig::from_array(self.interpolation.as_ref().map(|m| m.as_slice()))
    }

    /// Builds the configured parser together with its validated delimiters.
    pub fn build(&self) -> Result<(Parser, InterpolationConfig)> {
        let interpolation = self.interpolation_config()?;
        let parser = if self.ivy { Parser::ivy() } else { Parser::new() };
        log::debug!("built parser (ivy: {}, interpolation: {}{})", self.ivy, interpolation.start(), interpolation.end());
        Ok((parser, interpolation))
    }
}

//! Structured docstrings.
//!
//! The renderer only depends on the [`DocstringParser`] trait and the
//! [`ParsedDocstring`] schema; [`GoogleDocstringParser`] is the parser used
//! by the command-line tool.

pub mod google;

use serde::Serialize;
use thiserror::Error;

pub use google::GoogleDocstringParser;

/// A structural failure in a docstring, with the 1-based line it was found on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct DocstringError {
    pub line: usize,
    pub message: String,
}

impl DocstringError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// One entry of an argument-like section (`name (type): description`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Arg {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    pub description: String,
}

/// A docstring section. Headerless sections hold free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Section {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<String>,
    pub args: Vec<Arg>,
    pub text: String,
    /// Call syntax declared by the docstring itself; only set on the first section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedDocstring {
    /// Section headers in order of appearance
    pub headers: Vec<String>,
    pub sections: Vec<Section>,
}

impl ParsedDocstring {
    /// Signature override carried by the first section, if any.
    pub fn signature_override(&self) -> Option<&str> {
        self.sections.first().and_then(|s| s.signature.as_deref())
    }
}

pub trait DocstringParser {
    fn parse(&self, docstring: &str) -> Result<ParsedDocstring, DocstringError>;
}

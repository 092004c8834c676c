//! Source extraction.
//!
//! A [`SourceExtractor`] is bound to one source file and answers which
//! classes, functions and methods it defines, along with their signatures
//! and raw docstrings.

pub mod parser;
pub mod python;

use serde::Serialize;

use crate::error::Result;

pub use parser::{ParsedFile, PythonParser};
pub use python::{ModuleDocstring, PythonExtractor};

/// Metadata for a documentable unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ObjectInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub signature: String,
    #[serde(skip)]
    pub docstring: String,
}

impl ObjectInfo {
    pub fn class(name: impl Into<String>, signature: impl Into<String>, docstring: impl Into<String>) -> Self {
        Self {
            function_name: None,
            class_name: Some(name.into()),
            signature: signature.into(),
            docstring: docstring.into(),
        }
    }

    pub fn function(name: impl Into<String>, signature: impl Into<String>, docstring: impl Into<String>) -> Self {
        Self {
            function_name: Some(name.into()),
            class_name: None,
            signature: signature.into(),
            docstring: docstring.into(),
        }
    }

    pub fn method(
        class_name: impl Into<String>,
        name: impl Into<String>,
        signature: impl Into<String>,
        docstring: impl Into<String>,
    ) -> Self {
        Self {
            function_name: Some(name.into()),
            class_name: Some(class_name.into()),
            signature: signature.into(),
            docstring: docstring.into(),
        }
    }

    /// `Class.method`, `Class` or `function`
    pub fn label(&self) -> String {
        match (&self.class_name, &self.function_name) {
            (Some(class), Some(function)) => format!("{}.{}", class, function),
            (Some(class), None) => class.clone(),
            (None, Some(function)) => function.clone(),
            (None, None) => "<module>".to_string(),
        }
    }
}

pub trait SourceExtractor {
    /// Public class names in source order
    fn classes(&self) -> Vec<String>;

    /// Public top-level function names in source order
    fn functions(&self) -> Vec<String>;

    /// Public method names of `class_name` in source order
    fn methods(&self, class_name: &str) -> Result<Vec<String>>;

    fn class_info(&self, class_name: &str) -> Result<ObjectInfo>;

    fn function_info(&self, function_name: &str) -> Result<ObjectInfo>;

    fn method_info(&self, class_name: &str, method_name: &str) -> Result<ObjectInfo>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        assert_eq!(ObjectInfo::method("Foo", "bar", "bar()", "").label(), "Foo.bar");
        assert_eq!(ObjectInfo::class("Foo", "Foo()", "").label(), "Foo");
        assert_eq!(ObjectInfo::function("f", "f()", "").label(), "f");
    }
}

use std::path::PathBuf;

use thiserror::Error;

use crate::docstring::DocstringError;

#[derive(Error, Debug)]
pub enum GendocsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{method} not a method of {class}")]
    UnknownMethod { class: String, method: String },

    #[error("Template found for {} but missing {{{{autogenerated}}}} tag", .0.display())]
    MissingPlaceholder(PathBuf),

    #[error("Error while processing docstrings for {object}: {source}")]
    DocstringParse {
        object: String,
        #[source]
        source: DocstringError,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

impl GendocsError {
    /// Errors caused by the configuration rather than by sources or I/O.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            GendocsError::Config(_)
                | GendocsError::Yaml(_)
                | GendocsError::UnknownMethod { .. }
                | GendocsError::MissingPlaceholder(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, GendocsError>;

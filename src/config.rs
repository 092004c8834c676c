//! Loader for the `mkgendocs.yml` page configuration.
//!
//! Format:
//! ```yaml
//! sources_dir: docs/sources
//! templates: docs/templates
//! docstring_template: docs/fragment.md.j2
//!
//! pages:
//!   - page: "api/shapes.md"
//!     source: "geometry/shapes.py"
//!     classes:
//!       - Shape                 # every public method
//!       - Point:                # only the listed methods
//!           - distance
//!       - Polygon:
//!           - "!triangulate"    # every public method but this one
//!     functions:
//!       - area_of
//!
//!   - page: "api/index.md"
//!     source: "geometry/shapes.py"
//!     index: true
//! ```

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::error::{GendocsError, Result};

pub const DEFAULT_SOURCES_DIR: &str = "docs/sources";
pub const DEFAULT_CONFIG_FILE: &str = "mkgendocs.yml";

/// Marks where generated markdown is inserted into a template page.
pub const PLACEHOLDER: &str = "{{autogenerated}}";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Destination of the generated markdown tree
    #[serde(default)]
    pub sources_dir: Option<PathBuf>,

    /// Directory copied verbatim into the destination before generation
    #[serde(default)]
    pub templates: Option<PathBuf>,

    /// Custom fragment template replacing the built-in one
    #[serde(default)]
    pub docstring_template: Option<PathBuf>,

    #[serde(default = "default_readme")]
    pub readme: PathBuf,

    #[serde(default = "default_contributing")]
    pub contributing: PathBuf,

    /// Directory of example scripts rendered into `examples/`
    #[serde(default = "default_examples_dir")]
    pub examples_dir: PathBuf,

    #[serde(default)]
    pub pages: Vec<PageDeclaration>,
}

fn default_readme() -> PathBuf {
    PathBuf::from("README.md")
}

fn default_contributing() -> PathBuf {
    PathBuf::from("CONTRIBUTING.md")
}

fn default_examples_dir() -> PathBuf {
    PathBuf::from("examples")
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GendocsError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (i, page) in self.pages.iter().enumerate() {
            if page.page.as_os_str().is_empty() {
                return Err(GendocsError::Config(format!(
                    "page declaration #{} has an empty 'page' path",
                    i + 1
                )));
            }
            if page.page.is_absolute() {
                return Err(GendocsError::Config(format!(
                    "page '{}' must be relative to sources_dir",
                    page.page.display()
                )));
            }
            if page.source.as_os_str().is_empty() {
                return Err(GendocsError::Config(format!(
                    "page declaration '{}' has an empty 'source' path",
                    page.page.display()
                )));
            }
        }
        Ok(())
    }

    /// Destination directory; an unset or empty value falls back to the default.
    pub fn sources_dir(&self) -> PathBuf {
        match &self.sources_dir {
            Some(dir) if !dir.as_os_str().is_empty() => dir.clone(),
            _ => PathBuf::from(DEFAULT_SOURCES_DIR),
        }
    }
}

/// One configured output page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageDeclaration {
    pub page: PathBuf,
    pub source: PathBuf,
    #[serde(default)]
    pub index: bool,
    #[serde(default)]
    pub classes: Vec<ClassSpec>,
    #[serde(default)]
    pub functions: Vec<String>,
}

impl PageDeclaration {
    /// Source path with `.` components removed, used as the index key.
    pub fn source_key(&self) -> PathBuf {
        normalize_source(&self.source)
    }
}

pub fn normalize_source(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// A class entry: either a bare name or a single-key mapping to member tokens.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawClassSpec")]
pub enum ClassSpec {
    AllMembers(String),
    SelectedMembers { name: String, tokens: Vec<MemberToken> },
}

impl ClassSpec {
    pub fn name(&self) -> &str {
        match self {
            ClassSpec::AllMembers(name) => name,
            ClassSpec::SelectedMembers { name, .. } => name,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawClassSpec {
    Name(String),
    Map(BTreeMap<String, Option<Vec<String>>>),
}

impl TryFrom<RawClassSpec> for ClassSpec {
    type Error = String;

    fn try_from(raw: RawClassSpec) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawClassSpec::Name(name) => Ok(ClassSpec::AllMembers(name)),
            RawClassSpec::Map(map) => {
                if map.len() != 1 {
                    return Err(format!(
                        "class entry must map exactly one class name to its members, found {} keys",
                        map.len()
                    ));
                }
                let (name, tokens) = map
                    .into_iter()
                    .next()
                    .ok_or_else(|| "empty class entry".to_string())?;
                Ok(ClassSpec::SelectedMembers {
                    name,
                    tokens: tokens
                        .unwrap_or_default()
                        .iter()
                        .map(|t| MemberToken::parse(t))
                        .collect(),
                })
            }
        }
    }
}

/// A configured method name; a leading `!` excludes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberToken {
    Include(String),
    Exclude(String),
}

impl MemberToken {
    pub fn parse(token: &str) -> Self {
        let trimmed = token.trim_start();
        match trimmed.strip_prefix('!') {
            Some(name) => MemberToken::Exclude(name.trim().to_string()),
            None => MemberToken::Include(token.trim().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
sources_dir: site/src
templates: site/templates
pages:
  - page: api/shapes.md
    source: ./geometry/shapes.py
    classes:
      - Shape
      - Point:
          - distance
          - "!norm"
      - Empty:
    functions:
      - area_of
  - page: api/index.md
    source: geometry/shapes.py
    index: true
"#;

    #[test]
    fn test_parse_config() {
        let config = Config::parse(CONFIG).unwrap();
        assert_eq!(config.sources_dir(), PathBuf::from("site/src"));
        assert_eq!(config.templates, Some(PathBuf::from("site/templates")));
        assert_eq!(config.docstring_template, None);
        assert_eq!(config.readme, PathBuf::from("README.md"));
        assert_eq!(config.pages.len(), 2);

        let page = &config.pages[0];
        assert!(!page.index);
        assert_eq!(page.functions, vec!["area_of"]);
        assert_eq!(page.classes[0], ClassSpec::AllMembers("Shape".to_string()));
        assert_eq!(
            page.classes[1],
            ClassSpec::SelectedMembers {
                name: "Point".to_string(),
                tokens: vec![
                    MemberToken::Include("distance".to_string()),
                    MemberToken::Exclude("norm".to_string()),
                ],
            }
        );
        assert_eq!(
            page.classes[2],
            ClassSpec::SelectedMembers {
                name: "Empty".to_string(),
                tokens: vec![],
            }
        );
        assert!(config.pages[1].index);
    }

    #[test]
    fn test_source_key_normalized() {
        let config = Config::parse(CONFIG).unwrap();
        assert_eq!(config.pages[0].source_key(), config.pages[1].source_key());
    }

    #[test]
    fn test_default_sources_dir() {
        let config = Config::parse("pages: []").unwrap();
        assert_eq!(config.sources_dir(), PathBuf::from(DEFAULT_SOURCES_DIR));

        let config = Config::parse("sources_dir: ''").unwrap();
        assert_eq!(config.sources_dir(), PathBuf::from(DEFAULT_SOURCES_DIR));
    }

    #[test]
    fn test_multi_key_class_entry_rejected() {
        let yaml = r#"
pages:
  - page: a.md
    source: a.py
    classes:
      - {A: [x], B: [y]}
"#;
        let err = Config::parse(yaml).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_missing_source_rejected() {
        let yaml = "pages:\n  - page: a.md\n";
        assert!(matches!(Config::parse(yaml), Err(GendocsError::Yaml(_))));
    }

    #[test]
    fn test_empty_page_rejected() {
        let yaml = "pages:\n  - page: ''\n    source: a.py\n";
        assert!(matches!(Config::parse(yaml), Err(GendocsError::Config(_))));
    }

    #[test]
    fn test_absolute_page_rejected() {
        let yaml = "pages:\n  - page: /tmp/outside.md\n    source: a.py\n";
        let err = Config::parse(yaml).unwrap_err();
        assert!(matches!(err, GendocsError::Config(_)));
        assert!(err.to_string().contains("/tmp/outside.md"));
    }

    #[test]
    fn test_member_token_parse() {
        assert_eq!(MemberToken::parse("run"), MemberToken::Include("run".to_string()));
        assert_eq!(MemberToken::parse(" !run"), MemberToken::Exclude("run".to_string()));
        assert_eq!(MemberToken::parse("!"), MemberToken::Exclude(String::new()));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/nonexistent/gendocs.yml"));
        assert!(matches!(result, Err(GendocsError::Config(_))));
    }
}

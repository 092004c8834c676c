//! Cross-reference from source files to the pages documenting their members.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::PageDeclaration;

type NameIndex = HashMap<PathBuf, HashMap<String, PathBuf>>;

/// Read-only snapshot built once per run, before any page is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageIndex {
    classes: NameIndex,
    functions: NameIndex,
}

impl PageIndex {
    /// Indexes every class and function claimed by a content page.
    ///
    /// Index pages are skipped. When several pages claim the same
    /// `(source, name)` pair the last one in configuration order wins.
    pub fn build(pages: &[PageDeclaration]) -> Self {
        let mut index = Self::default();

        for page in pages.iter().filter(|p| !p.index) {
            let source = page.source_key();

            let classes = index.classes.entry(source.clone()).or_default();
            for class in &page.classes {
                classes.insert(class.name().to_string(), page.page.clone());
            }

            let functions = index.functions.entry(source).or_default();
            for function in &page.functions {
                functions.insert(function.clone(), page.page.clone());
            }
        }

        index
    }

    /// Documented classes of `source`, or `None` when nothing documents any.
    pub fn classes_for(&self, source: &Path) -> Option<&HashMap<String, PathBuf>> {
        self.classes.get(source).filter(|m| !m.is_empty())
    }

    /// Documented functions of `source`, or `None` when nothing documents any.
    pub fn functions_for(&self, source: &Path) -> Option<&HashMap<String, PathBuf>> {
        self.functions.get(source).filter(|m| !m.is_empty())
    }

    #[cfg(test)]
    fn class_page(&self, source: &Path, class_name: &str) -> Option<&Path> {
        self.classes
            .get(source)
            .and_then(|m| m.get(class_name))
            .map(PathBuf::as_path)
    }

    #[cfg(test)]
    fn function_page(&self, source: &Path, function_name: &str) -> Option<&Path> {
        self.functions
            .get(source)
            .and_then(|m| m.get(function_name))
            .map(PathBuf::as_path)
    }
}

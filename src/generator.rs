//! Full rebuild of the documentation sources tree.

use std::fs;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use crate::assembler::{self, PageAssembler};
use crate::config::{Config, PLACEHOLDER};
use crate::docs;
use crate::docstring::GoogleDocstringParser;
use crate::error::{GendocsError, Result};
use crate::example_pages;
use crate::extractor::PythonExtractor;
use crate::index::PageIndex;
use crate::render::FragmentTemplate;

/// Counts of what a run produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub pages: usize,
    pub examples: usize,
    pub template_files: usize,
}

pub struct Generator {
    root: PathBuf,
    config: Config,
}

impl Generator {
    /// `root` is the directory every configured path is relative to.
    pub fn new(root: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    /// Destination directory with `.` and `..` components resolved.
    pub fn sources_dir(&self) -> PathBuf {
        lexical_clean(&self.resolve(&self.config.sources_dir()))
    }

    /// Rebuilds the sources directory from scratch.
    ///
    /// Stops at the first error; pages written before it are left in place.
    pub fn run(&self) -> Result<GenerationReport> {
        let template_path = self
            .config
            .docstring_template
            .as_ref()
            .map(|p| self.resolve(p));
        let template = FragmentTemplate::load(template_path.as_deref())?;

        let sources_dir = self.sources_dir();
        let mut report = GenerationReport {
            template_files: self.prepare_destination(&sources_dir)?,
            ..Default::default()
        };

        self.write_home_page(&sources_dir)?;
        self.copy_contributing(&sources_dir)?;

        let examples_dir = self.resolve(&self.config.examples_dir);
        if examples_dir.is_dir() {
            report.examples =
                example_pages::render_examples(&examples_dir, &sources_dir.join("examples"))?;
        }

        tracing::info!("Generating docs ...");
        report.pages = self.generate_pages(&sources_dir, &template)?;

        Ok(report)
    }

    /// Removes the previous output and seeds it from the templates directory.
    fn prepare_destination(&self, sources_dir: &Path) -> Result<usize> {
        if lexical_clean(&self.root).starts_with(sources_dir) {
            return Err(GendocsError::Config(format!(
                "sources_dir {} would remove the project root",
                sources_dir.display()
            )));
        }

        if sources_dir.exists() {
            tracing::info!("Cleaning up existing sources directory {}", sources_dir.display());
            fs::remove_dir_all(sources_dir)?;
        }

        let mut copied = 0;
        if let Some(templates) = &self.config.templates {
            let templates = self.resolve(templates);
            if !templates.is_dir() {
                return Err(GendocsError::Config(format!(
                    "No such directory: {}",
                    templates.display()
                )));
            }
            tracing::info!("Populating sources directory with templates");
            copied = copy_tree(&templates, sources_dir)?;
        }

        fs::create_dir_all(sources_dir)?;
        Ok(copied)
    }

    /// Writes `index.md`: the templates' `index.md` with the readme spliced in
    /// from its first second-level heading, or the readme itself.
    fn write_home_page(&self, sources_dir: &Path) -> Result<()> {
        let readme_path = self.resolve(&self.config.readme);
        let readme = if readme_path.is_file() {
            fs::read_to_string(&readme_path)?
        } else {
            String::new()
        };

        let template_index = self
            .config
            .templates
            .as_ref()
            .map(|t| self.resolve(t).join("index.md"))
            .filter(|p| p.is_file());

        let index = match template_index {
            Some(path) => {
                fs::read_to_string(&path)?.replace(PLACEHOLDER, docs::from_first_section(&readme))
            }
            None => readme,
        };

        fs::write(sources_dir.join("index.md"), index)?;
        Ok(())
    }

    fn copy_contributing(&self, sources_dir: &Path) -> Result<()> {
        let contributing = self.resolve(&self.config.contributing);
        if contributing.is_file() {
            fs::copy(&contributing, sources_dir.join("contributing.md"))?;
        }
        Ok(())
    }

    /// Builds the index from every declaration, then renders pages in order.
    fn generate_pages(&self, sources_dir: &Path, template: &FragmentTemplate) -> Result<usize> {
        let parser = GoogleDocstringParser::new();
        let index = PageIndex::build(&self.config.pages);
        let assembler = PageAssembler::new(template, &parser, &index);

        for page in &self.config.pages {
            tracing::info!("Generating {} from {}", page.page.display(), page.source.display());
            let extractor = PythonExtractor::from_file(&self.resolve(&page.source))?;
            let markdown = assembler.assemble(page, &extractor).map_err(|e| {
                tracing::error!("Failed to generate {}: {}", page.page.display(), e);
                e
            })?;
            assembler::write_page(&sources_dir.join(&page.page), &markdown)?;
        }

        Ok(self.config.pages.len())
    }
}

/// Resolves `.` and `..` without touching the filesystem. A `..` past the
/// root of an absolute path is dropped.
fn lexical_clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match cleaned.components().next_back() {
                Some(Component::Normal(_)) => {
                    cleaned.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => cleaned.push(".."),
            },
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}

/// Copies the contents of `from` into `to`, creating directories as needed.
fn copy_tree(from: &Path, to: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(from) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|e| GendocsError::Config(e.to_string()))?;
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            tracing::debug!("Copied template {}", relative.display());
            copied += 1;
        }
    }

    Ok(copied)
}

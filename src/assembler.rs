//! Builds the markdown of one page and merges it into the destination file.

use std::fs;
use std::path::Path;

use crate::config::{ClassSpec, PageDeclaration, PLACEHOLDER};
use crate::docstring::DocstringParser;
use crate::error::{GendocsError, Result};
use crate::extractor::SourceExtractor;
use crate::index::PageIndex;
use crate::render::FragmentTemplate;
use crate::selector;

/// Separator between class and function fragments of a content page.
pub const FRAGMENT_SEPARATOR: &str = "\n----\n\n";

pub struct PageAssembler<'a> {
    template: &'a FragmentTemplate,
    parser: &'a dyn DocstringParser,
    index: &'a PageIndex,
}

impl<'a> PageAssembler<'a> {
    pub fn new(template: &'a FragmentTemplate, parser: &'a dyn DocstringParser, index: &'a PageIndex) -> Self {
        Self {
            template,
            parser,
            index,
        }
    }

    /// Generates the markdown for `page` from the source bound to `extractor`.
    pub fn assemble(&self, page: &PageDeclaration, extractor: &dyn SourceExtractor) -> Result<String> {
        if page.index {
            Ok(self.index_page(page, extractor))
        } else {
            self.content_page(page, extractor)
        }
    }

    /// Lists the classes and functions of the source, restricted to the ones
    /// documented on some page whenever the index knows about the source.
    fn index_page(&self, page: &PageDeclaration, extractor: &dyn SourceExtractor) -> String {
        let source = page.source_key();

        let mut classes = extractor.classes();
        if let Some(documented) = self.index.classes_for(&source) {
            classes.retain(|c| documented.contains_key(c));
        }

        let mut functions = extractor.functions();
        if let Some(documented) = self.index.functions_for(&source) {
            functions.retain(|f| documented.contains_key(f));
        }

        let mut lines = vec!["## Classes".to_string()];
        lines.extend(classes.iter().map(|c| format!("class **{}**", c)));
        lines.push("\n\n".to_string());
        lines.push("## Functions".to_string());
        lines.extend(functions.iter().map(|f| format!("**{}**", f)));
        lines.push("\n\n".to_string());

        lines.join("\n")
    }

    fn content_page(&self, page: &PageDeclaration, extractor: &dyn SourceExtractor) -> Result<String> {
        let mut fragments = Vec::with_capacity(page.classes.len() + page.functions.len());

        for class in &page.classes {
            let name = class.name();
            let all_methods = extractor.methods(name)?;
            let methods = match class {
                ClassSpec::AllMembers(_) => all_methods,
                ClassSpec::SelectedMembers { tokens, .. } => {
                    selector::select(name, &all_methods, tokens)?
                }
            };
            tracing::info!("{}", name);
            tracing::debug!("Documenting methods of {}: {:?}", name, methods);
            fragments.push(self.class_fragment(name, &methods, extractor)?);
        }

        for function in &page.functions {
            tracing::info!("Generating docs for {}", function);
            let info = extractor.function_info(function)?;
            fragments.push(self.template.render(&info, self.parser)?);
        }

        Ok(fragments.join(FRAGMENT_SEPARATOR))
    }

    fn class_fragment(
        &self,
        class_name: &str,
        methods: &[String],
        extractor: &dyn SourceExtractor,
    ) -> Result<String> {
        let info = extractor.class_info(class_name)?;
        let mut markdown = self.template.render(&info, self.parser)?;

        if methods.is_empty() {
            return Ok(markdown);
        }

        markdown.push_str("\n\n**Methods:**\n\n");
        for method in methods {
            tracing::info!("Generating docs for {}.{}", class_name, method);
            match extractor.method_info(class_name, method) {
                Ok(info) => markdown.push_str(&self.template.render(&info, self.parser)?),
                Err(GendocsError::NotFound(reason)) => {
                    tracing::warn!("Skipping {}.{}: {}", class_name, method, reason);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(markdown)
    }
}

/// Writes `markdown` to `path`.
///
/// An existing file is a template: its `{{autogenerated}}` token is replaced
/// by the markdown, and a template without the token is an error. Otherwise
/// the markdown is the whole page. Parent directories are created as needed.
pub fn write_page(path: &Path, markdown: &str) -> Result<()> {
    let content = if path.exists() {
        let template = fs::read_to_string(path)?;
        if !template.contains(PLACEHOLDER) {
            return Err(GendocsError::MissingPlaceholder(path.to_path_buf()));
        }
        tracing::info!("Inserting autogenerated content into template: {}", path.display());
        template.replace(PLACEHOLDER, markdown)
    } else {
        tracing::info!("Creating new page with autogenerated content: {}", path.display());
        markdown.to_string()
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;

    Ok(())
}

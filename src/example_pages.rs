//! Turns example scripts into markdown pages: the module docstring as prose,
//! followed by the rest of the script in a fenced code block.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::extractor::{ModuleDocstring, PythonExtractor};

/// Renders every `*.py` file directly inside `examples_dir` into
/// `destination/<stem>.md`. Returns the number of pages written.
pub fn render_examples(examples_dir: &Path, destination: &Path) -> Result<usize> {
    fs::create_dir_all(destination)?;

    let mut scripts: Vec<PathBuf> = fs::read_dir(examples_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "py"))
        .collect();
    scripts.sort();

    for script in &scripts {
        let source = fs::read_to_string(script)?;
        let extractor = PythonExtractor::from_source(script.clone(), &source)?;
        let page = render_example(&source, extractor.module_docstring());

        let Some(stem) = script.file_stem() else {
            continue;
        };
        let target = destination.join(format!("{}.md", stem.to_string_lossy()));
        tracing::info!("Rendering example {} -> {}", script.display(), target.display());
        fs::write(&target, page)?;
    }

    Ok(scripts.len())
}

pub fn render_example(source: &str, docstring: Option<&ModuleDocstring>) -> String {
    let (text, skip) = match docstring {
        Some(doc) => (doc.text.as_str(), doc.end_line),
        None => ("", 0),
    };

    let mut page = String::with_capacity(source.len() + text.len() + 32);
    page.push_str(text);
    page.push_str("\n\n```python\n");

    let mut rest = source.split_inclusive('\n').skip(skip);
    if let Some(first) = rest.next() {
        if !first.trim().is_empty() {
            page.push_str(first);
        }
    }
    for line in rest {
        page.push_str(line);
    }

    if !page.ends_with('\n') {
        page.push('\n');
    }
    page.push_str("```");
    page
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const EXAMPLE: &str = "\"\"\"# Training a model\n\nShows the basic loop.\n\"\"\"\n\nimport model\n\nmodel.train()\n";

    #[test]
    fn test_render_example() {
        let extractor = PythonExtractor::from_source("train.py", EXAMPLE).unwrap();
        let page = render_example(EXAMPLE, extractor.module_docstring());
        assert_eq!(
            page,
            "# Training a model\n\nShows the basic loop.\n\n```python\nimport model\n\nmodel.train()\n```"
        );
    }

    #[test]
    fn test_render_example_without_docstring() {
        let page = render_example("print('hi')", None);
        assert_eq!(page, "\n\n```python\nprint('hi')\n```");
    }

    #[test]
    fn test_render_examples_directory() {
        let dir = TempDir::new().unwrap();
        let examples = dir.path().join("examples");
        fs::create_dir_all(&examples).unwrap();
        fs::write(examples.join("train.py"), EXAMPLE).unwrap();
        fs::write(examples.join("notes.txt"), "ignored").unwrap();

        let destination = dir.path().join("out/examples");
        let count = render_examples(&examples, &destination).unwrap();

        assert_eq!(count, 1);
        let page = fs::read_to_string(destination.join("train.md")).unwrap();
        assert!(page.starts_with("# Training a model"));
        assert!(!destination.join("notes.md").exists());
    }
}

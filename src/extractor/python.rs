//! Python source extractor backed by tree-sitter.

use std::path::{Path, PathBuf};

use crate::error::{GendocsError, Result};
use crate::extractor::parser::{ParsedFile, PythonParser};
use crate::extractor::{ObjectInfo, SourceExtractor};

#[derive(Debug, Clone)]
struct FunctionEntry {
    name: String,
    signature: String,
    docstring: String,
}

#[derive(Debug, Clone)]
struct ClassEntry {
    name: String,
    signature: String,
    docstring: String,
    methods: Vec<FunctionEntry>,
}

/// Module-level docstring and the 1-based line on which it ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDocstring {
    pub text: String,
    pub end_line: usize,
}

pub struct PythonExtractor {
    path: PathBuf,
    classes: Vec<ClassEntry>,
    functions: Vec<FunctionEntry>,
    module_docstring: Option<ModuleDocstring>,
}

fn is_public(name: &str) -> bool {
    !name.starts_with('_')
}

impl PythonExtractor {
    pub fn from_file(path: &Path) -> Result<Self> {
        let parsed = PythonParser::new().parse_file(path)?;
        Ok(Self::from_parsed(path, &parsed))
    }

    pub fn from_source(path: impl Into<PathBuf>, source: &str) -> Result<Self> {
        let path = path.into();
        let parsed = PythonParser::new().parse_source(source)?;
        Ok(Self::from_parsed(&path, &parsed))
    }

    fn from_parsed(path: &Path, parsed: &ParsedFile) -> Self {
        if parsed.has_errors() {
            tracing::warn!("{} contains syntax errors; extraction may be partial", path.display());
        }

        let root = parsed.root_node();
        let mut classes = Vec::new();
        let mut functions = Vec::new();

        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            let Some(def) = unwrap_decorated(child) else {
                continue;
            };
            match def.kind() {
                "class_definition" => {
                    if let Some(entry) = class_entry(parsed, &def) {
                        classes.push(entry);
                    }
                }
                "function_definition" => {
                    if let Some(entry) = function_entry(parsed, &def, false) {
                        functions.push(entry);
                    }
                }
                _ => {}
            }
        }

        Self {
            path: path.to_path_buf(),
            module_docstring: module_docstring(parsed),
            classes,
            functions,
        }
    }

    pub fn module_docstring(&self) -> Option<&ModuleDocstring> {
        self.module_docstring.as_ref()
    }

    fn find_class(&self, class_name: &str) -> Result<&ClassEntry> {
        self.classes
            .iter()
            .find(|c| c.name == class_name)
            .ok_or_else(|| {
                GendocsError::NotFound(format!(
                    "class {} in {}",
                    class_name,
                    self.path.display()
                ))
            })
    }
}

impl SourceExtractor for PythonExtractor {
    fn classes(&self) -> Vec<String> {
        self.classes
            .iter()
            .filter(|c| is_public(&c.name))
            .map(|c| c.name.clone())
            .collect()
    }

    fn functions(&self) -> Vec<String> {
        self.functions
            .iter()
            .filter(|f| is_public(&f.name))
            .map(|f| f.name.clone())
            .collect()
    }

    fn methods(&self, class_name: &str) -> Result<Vec<String>> {
        let class = self.find_class(class_name)?;
        Ok(class
            .methods
            .iter()
            .filter(|m| is_public(&m.name))
            .map(|m| m.name.clone())
            .collect())
    }

    fn class_info(&self, class_name: &str) -> Result<ObjectInfo> {
        let class = self.find_class(class_name)?;
        Ok(ObjectInfo::class(
            &class.name,
            &class.signature,
            &class.docstring,
        ))
    }

    fn function_info(&self, function_name: &str) -> Result<ObjectInfo> {
        let function = self
            .functions
            .iter()
            .find(|f| f.name == function_name)
            .ok_or_else(|| {
                GendocsError::NotFound(format!(
                    "function {} in {}",
                    function_name,
                    self.path.display()
                ))
            })?;
        Ok(ObjectInfo::function(
            &function.name,
            &function.signature,
            &function.docstring,
        ))
    }

    fn method_info(&self, class_name: &str, method_name: &str) -> Result<ObjectInfo> {
        let class = self.find_class(class_name)?;
        let method = class
            .methods
            .iter()
            .find(|m| m.name == method_name)
            .ok_or_else(|| {
                GendocsError::NotFound(format!(
                    "method {}.{} in {}",
                    class_name,
                    method_name,
                    self.path.display()
                ))
            })?;
        Ok(ObjectInfo::method(
            &class.name,
            &method.name,
            &method.signature,
            &method.docstring,
        ))
    }
}

fn unwrap_decorated(node: tree_sitter::Node<'_>) -> Option<tree_sitter::Node<'_>> {
    if node.kind() == "decorated_definition" {
        node.child_by_field_name("definition")
    } else {
        Some(node)
    }
}

fn class_entry(parsed: &ParsedFile, node: &tree_sitter::Node) -> Option<ClassEntry> {
    let name = parsed.node_text(&node.child_by_field_name("name")?).to_string();
    let body = node.child_by_field_name("body")?;

    let mut methods = Vec::new();
    let mut init_params = None;

    let mut cursor = body.walk();
    for child in body.named_children(&mut cursor) {
        let Some(def) = unwrap_decorated(child) else {
            continue;
        };
        if def.kind() != "function_definition" {
            continue;
        }
        if let Some(method) = function_entry(parsed, &def, true) {
            if method.name == "__init__" {
                init_params = def
                    .child_by_field_name("parameters")
                    .map(|p| parameters_text(parsed, &p, true));
            }
            methods.push(method);
        }
    }

    Some(ClassEntry {
        signature: format!("{}({})", name, init_params.unwrap_or_default()),
        docstring: body_docstring(parsed, &body).unwrap_or_default(),
        name,
        methods,
    })
}

fn function_entry(
    parsed: &ParsedFile,
    node: &tree_sitter::Node,
    is_method: bool,
) -> Option<FunctionEntry> {
    let name = parsed.node_text(&node.child_by_field_name("name")?).to_string();
    let params = node
        .child_by_field_name("parameters")
        .map(|p| parameters_text(parsed, &p, is_method))
        .unwrap_or_default();

    let mut signature = format!("{}({})", name, params);
    if let Some(ret) = node.child_by_field_name("return_type") {
        signature.push_str(" -> ");
        signature.push_str(&collapse_whitespace(parsed.node_text(&ret)));
    }

    let docstring = node
        .child_by_field_name("body")
        .and_then(|body| body_docstring(parsed, &body))
        .unwrap_or_default();

    Some(FunctionEntry {
        name,
        signature,
        docstring,
    })
}

/// Parameter list without parentheses; drops a leading `self`/`cls` for methods.
fn parameters_text(parsed: &ParsedFile, node: &tree_sitter::Node, drop_receiver: bool) -> String {
    let mut cursor = node.walk();
    let mut parts: Vec<String> = node
        .named_children(&mut cursor)
        .filter(|c| c.kind() != "comment")
        .map(|c| collapse_whitespace(parsed.node_text(&c)))
        .collect();

    if drop_receiver {
        let is_receiver = parts.first().is_some_and(|first| {
            let name = first.split([':', '=']).next().unwrap_or("").trim();
            name == "self" || name == "cls"
        });
        if is_receiver {
            parts.remove(0);
        }
    }

    parts.join(", ")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// String literal that opens a block, if any.
fn leading_string<'t>(node: &tree_sitter::Node<'t>) -> Option<tree_sitter::Node<'t>> {
    let mut cursor = node.walk();
    let first = node
        .named_children(&mut cursor)
        .find(|c| c.kind() != "comment")?;
    if first.kind() != "expression_statement" {
        return None;
    }
    let mut inner = first.walk();
    let string = first.named_children(&mut inner).next()?;
    (string.kind() == "string").then_some(string)
}

fn body_docstring(parsed: &ParsedFile, body: &tree_sitter::Node) -> Option<String> {
    let string = leading_string(body)?;
    Some(clean_docstring(string_literal_value(parsed.node_text(&string))))
}

fn module_docstring(parsed: &ParsedFile) -> Option<ModuleDocstring> {
    let root = parsed.root_node();
    let string = leading_string(&root)?;
    Some(ModuleDocstring {
        text: clean_docstring(string_literal_value(parsed.node_text(&string))),
        end_line: string.end_position().row + 1,
    })
}

fn string_literal_value(literal: &str) -> &str {
    let unprefixed = literal.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    for quote in ["\"\"\"", "'''", "\"", "'"] {
        if unprefixed.len() >= quote.len() * 2
            && unprefixed.starts_with(quote)
            && unprefixed.ends_with(quote)
        {
            return &unprefixed[quote.len()..unprefixed.len() - quote.len()];
        }
    }
    unprefixed
}

/// Normalises docstring indentation: the first line is left-trimmed, the
/// common margin of the remaining lines is removed, and blank lines at either
/// end are dropped.
pub fn clean_docstring(raw: &str) -> String {
    let expanded = raw.replace('\t', "        ");
    let lines: Vec<&str> = expanded.lines().collect();
    let Some(first) = lines.first() else {
        return String::new();
    };

    let indent = |l: &str| l.len() - l.trim_start_matches(' ').len();
    let margin = lines
        .iter()
        .skip(1)
        .copied()
        .filter(|l| !l.trim().is_empty())
        .map(indent)
        .min()
        .unwrap_or(0);

    let mut cleaned: Vec<&str> = vec![first.trim()];
    for line in lines.iter().skip(1) {
        if line.trim().is_empty() {
            cleaned.push("");
        } else {
            cleaned.push(line[margin..].trim_end());
        }
    }

    while cleaned.first().is_some_and(|l| l.is_empty()) {
        cleaned.remove(0);
    }
    while cleaned.last().is_some_and(|l| l.is_empty()) {
        cleaned.pop();
    }

    cleaned.join("\n")
}

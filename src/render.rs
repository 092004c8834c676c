//! Renders one docstring into a markdown fragment.

use std::path::Path;

use minijinja::{context, Environment};

use crate::docstring::DocstringParser;
use crate::error::{GendocsError, Result};
use crate::extractor::ObjectInfo;

/// Built-in fragment template.
///
/// Classes get an `h2` header, methods and functions an `h3` header; each
/// section renders as an emphasised label (or a rule when it has no header),
/// its argument bullets and then its free text.
pub const DEFAULT_TEMPLATE: &str = r#"
{% if header.function_name %}
{% if header.class_name %}
{{ h3 }} .{{ header.function_name }}
```python
.{{ signature }}
```
{% else %}
{{ h3 }} {{ header.function_name }}
```python
{{ signature }}
```
{% endif %}
{% elif header.class_name %}
{{ h2 }} {{ header.class_name }}

```python
{{ signature }}
```

{% endif %}

{% for section in sections %}
{% if section.header %}

**{{ section.header }}**

{% else %}
---
{% endif %}
{% for arg in section.args %}
{% if arg.field %}
* **{{ arg.field }}** {% if arg.signature %}{{ arg.signature }} {% endif %}: {{ arg.description }}
{% else %}
* {{ arg.description }}
{% endif %}
{% endfor %}
{{ section.text }}
{% endfor %}
"#;

const TEMPLATE_NAME: &str = "fragment";

/// Fragment template shared by every page of a run, compiled once.
#[derive(Debug, Clone)]
pub struct FragmentTemplate {
    env: Environment<'static>,
}

impl Default for FragmentTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE).expect("built-in fragment template is valid")
    }
}

impl FragmentTemplate {
    /// Compiles `source`, so syntax errors surface before any page is written.
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);
        env.add_template_owned(TEMPLATE_NAME, source.into())?;
        Ok(Self { env })
    }

    /// Loads `path`, or the built-in template when no path is configured.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            None => Ok(Self::default()),
            Some(path) => {
                let source = std::fs::read_to_string(path).map_err(|e| {
                    GendocsError::Config(format!(
                        "cannot read docstring template {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                tracing::info!("Using docstring template {}", path.display());
                Self::new(source)
            }
        }
    }

    /// Renders `info` into markdown.
    ///
    /// A signature declared inside the docstring replaces the extracted one.
    pub fn render(&self, info: &ObjectInfo, parser: &dyn DocstringParser) -> Result<String> {
        let parsed = parser
            .parse(&info.docstring)
            .map_err(|source| GendocsError::DocstringParse {
                object: info.label(),
                source,
            })?;

        let signature = parsed
            .signature_override()
            .unwrap_or(info.signature.as_str());

        let rendered = self.env.get_template(TEMPLATE_NAME)?.render(context! {
            header => info,
            signature => signature,
            sections => &parsed.sections,
            headers => &parsed.headers,
            h2 => "##",
            h3 => "###",
        })?;

        Ok(rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docstring::GoogleDocstringParser;

    fn render(info: &ObjectInfo) -> String {
        FragmentTemplate::default()
            .render(info, &GoogleDocstringParser::new())
            .unwrap()
    }

    #[test]
    fn test_render_class_header() {
        let info = ObjectInfo::class("Shape", "Shape(name)", "Base shape.");
        let md = render(&info);
        assert!(md.contains("## Shape\n"));
        assert!(md.contains("```python\nShape(name)\n```"));
        assert!(md.contains("---\nBase shape."));
        assert!(!md.contains("###"));
    }

    #[test]
    fn test_render_method_header() {
        let info = ObjectInfo::method("Shape", "area", "area() -> float", "Area.");
        let md = render(&info);
        assert!(md.contains("### .area\n"));
        assert!(md.contains("```python\n.area() -> float\n```"));
    }

    #[test]
    fn test_render_function_header() {
        let info = ObjectInfo::function("area_of", "area_of(shape)", "Area of shape.");
        let md = render(&info);
        assert!(md.contains("### area_of\n"));
        assert!(md.contains("```python\narea_of(shape)\n```"));
        assert!(!md.contains("## area_of"));
    }

    #[test]
    fn test_render_sections_and_args() {
        let doc = "Summary.\n\nArgs:\n    x (int): first\n    y: second\n\nReturns:\n    the total";
        let info = ObjectInfo::function("add", "add(x, y)", doc);
        let md = render(&info);
        assert!(md.contains("**Args**"));
        assert!(md.contains("* **x** (int) : first"));
        assert!(md.contains("* **y** : second"));
        assert!(md.contains("**Returns**"));
        assert!(md.contains("* the total"));
        assert!(!md.contains("none"));
    }

    #[test]
    fn test_signature_override() {
        let info = ObjectInfo::function("wrapped", "wrapper(*args, **kwargs)", "wrapped(a, b)\n\nDecorated.");
        let md = render(&info);
        assert!(md.contains("wrapped(a, b)"));
        assert!(!md.contains("wrapper(*args"));
    }

    #[test]
    fn test_parse_error_names_object() {
        let info = ObjectInfo::method("Shape", "area", "area()", "Args:\n    not valid");
        let err = FragmentTemplate::default()
            .render(&info, &GoogleDocstringParser::new())
            .unwrap_err();
        match &err {
            GendocsError::DocstringParse { object, source } => {
                assert_eq!(object, "Shape.area");
                assert_eq!(source.line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("Shape.area"));
    }

    #[test]
    fn test_custom_template() {
        let template = FragmentTemplate::new(
            "{{ header.function_name }}|{{ signature }}|{{ headers | join(',') }}",
        )
        .unwrap();
        let info = ObjectInfo::function("f", "f(x)", "Doc.\n\nArgs:\n    x: value");
        let md = template.render(&info, &GoogleDocstringParser::new()).unwrap();
        assert_eq!(md, "f|f(x)|Args");
    }

    #[test]
    fn test_invalid_template_rejected() {
        let result = FragmentTemplate::new("{% for x in %}");
        assert!(matches!(result, Err(GendocsError::Template(_))));
    }

    #[test]
    fn test_load_missing_template() {
        let result = FragmentTemplate::load(Some(Path::new("/nonexistent/fragment.j2")));
        assert!(matches!(result, Err(GendocsError::Config(_))));
    }

    #[test]
    fn test_load_default() {
        let info = ObjectInfo::function("area_of", "area_of(shape)", "Area of shape.");
        let parser = GoogleDocstringParser::new();
        let loaded = FragmentTemplate::load(None).unwrap().render(&info, &parser).unwrap();
        assert_eq!(loaded, render(&info));
    }

    #[test]
    fn test_template_reused_across_renders() {
        let template = FragmentTemplate::new("{{ signature }}").unwrap();
        let parser = GoogleDocstringParser::new();
        let first = ObjectInfo::function("f", "f(x)", "First.");
        let second = ObjectInfo::method("C", "g", "g()", "Second.");
        assert_eq!(template.render(&first, &parser).unwrap(), "f(x)");
        assert_eq!(template.render(&second, &parser).unwrap(), "g()");
    }
}

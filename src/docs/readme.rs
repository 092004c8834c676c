//! Heading extraction for README-style markdown.

/// A heading in a markdown document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading level (1-6)
    pub level: u8,
    /// Heading text
    pub text: String,
    /// Line number (1-based)
    pub line: u32,
    /// Byte offset of the start of the heading line
    pub offset: usize,
}

/// ATX headings of `content`, skipping lines inside fenced code blocks.
pub fn extract_headings(content: &str) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut in_block = false;
    let mut offset = 0;

    for (i, line) in content.split_inclusive('\n').enumerate() {
        let start = offset;
        offset += line.len();

        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_block = !in_block;
            continue;
        }
        if in_block || !trimmed.starts_with('#') {
            continue;
        }

        let level = trimmed.chars().take_while(|&c| c == '#').count();
        let rest = &trimmed[level..];
        if level > 6 || !(rest.starts_with(' ') || rest.trim().is_empty()) {
            continue;
        }

        let text = rest.trim().to_string();
        if !text.is_empty() {
            headings.push(Heading {
                level: level as u8,
                text,
                line: (i + 1) as u32,
                offset: start,
            });
        }
    }

    headings
}

/// The part of `content` starting at its first second-level heading.
///
/// Documents without one are returned whole.
pub fn from_first_section(content: &str) -> &str {
    extract_headings(content)
        .iter()
        .find(|h| h.level == 2)
        .map(|h| &content[h.offset..])
        .unwrap_or(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const README: &str = r#"# My Project

[![badge](https://example.com/badge.svg)](https://example.com)

Some intro text.

```bash
## not a heading
pip install my-project
```

## Installation

Run the installer.

### Details

## Usage
"#;

    #[test]
    fn test_extract_headings() {
        let headings = extract_headings(README);
        let texts: Vec<_> = headings.iter().map(|h| (h.level, h.text.as_str())).collect();
        assert_eq!(
            texts,
            vec![(1, "My Project"), (2, "Installation"), (3, "Details"), (2, "Usage")]
        );
        assert_eq!(headings[1].line, 12);
    }

    #[test]
    fn test_from_first_section() {
        let section = from_first_section(README);
        assert!(section.starts_with("## Installation\n"));
        assert!(section.ends_with("## Usage\n"));
        assert!(!section.contains("My Project"));
    }

    #[test]
    fn test_from_first_section_without_h2() {
        let doc = "# Title\n\n### Deep\n";
        assert_eq!(from_first_section(doc), doc);
    }

    #[test]
    fn test_hashtag_is_not_heading() {
        let headings = extract_headings("#hashtag\n## Real\n");
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Real");
        assert_eq!(headings[0].offset, 9);
    }
}

//! Google-style docstring parser.
//!
//! Recognised layout:
//!
//! ```text
//! resize(width, height)          <- optional call-syntax override
//!
//! Free text description.
//!
//! Args:
//!     width (int): target width
//!         continued description
//!     height (int): target height
//!
//! Returns:
//!     Image: the resized image
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Arg, DocstringError, DocstringParser, ParsedDocstring, Section};

static SIGNATURE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][\w.]*\(.*\)(\s*->\s*\S.*)?$").expect("valid signature regex")
});

static HEADER_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z][A-Za-z ]*):\s*$").expect("valid header regex"));

static FIELD_ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\*{0,2}[A-Za-z_][\w.]*)\s*(\([^)]*\))?\s*:\s*(.*)$")
        .expect("valid field regex")
});

static RETURN_ENTRY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^:\s][^:]*?)\s*:\s*(.*)$").expect("valid return regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionKind {
    /// `name (type): description` entries
    Fields,
    /// `type: description` entries, or a plain description
    Returns,
    /// Body kept verbatim
    Text,
}

fn classify(name: &str) -> Option<SectionKind> {
    const FIELDS: &[&str] = &[
        "args",
        "arguments",
        "parameters",
        "params",
        "keyword args",
        "keyword arguments",
        "kwargs",
        "attributes",
        "raises",
    ];
    const RETURNS: &[&str] = &["returns", "return", "yields", "yield"];
    const TEXT: &[&str] = &[
        "example",
        "examples",
        "note",
        "notes",
        "warning",
        "warnings",
        "todo",
        "see also",
        "references",
    ];

    let lower = name.trim().to_lowercase();
    if FIELDS.contains(&lower.as_str()) {
        Some(SectionKind::Fields)
    } else if RETURNS.contains(&lower.as_str()) {
        Some(SectionKind::Returns)
    } else if TEXT.contains(&lower.as_str()) {
        Some(SectionKind::Text)
    } else {
        None
    }
}

struct Block<'a> {
    header: Option<(String, SectionKind)>,
    line: usize,
    body: Vec<(usize, &'a str)>,
}

impl<'a> Block<'a> {
    fn free(line: usize) -> Self {
        Self {
            header: None,
            line,
            body: Vec::new(),
        }
    }

    fn is_blank(&self) -> bool {
        self.body.iter().all(|(_, l)| l.trim().is_empty())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GoogleDocstringParser;

impl GoogleDocstringParser {
    pub fn new() -> Self {
        Self
    }

    fn split_blocks<'a>(lines: &[&'a str], start: usize) -> Vec<Block<'a>> {
        let mut blocks = Vec::new();
        let mut current = Block::free(start + 1);

        for (i, &line) in lines.iter().enumerate().skip(start) {
            let lineno = i + 1;
            let indented = line.starts_with(' ') || line.starts_with('\t');

            if !indented && !line.trim().is_empty() {
                let header = HEADER_LINE
                    .captures(line)
                    .and_then(|caps| classify(&caps[1]).map(|kind| (caps[1].to_string(), kind)));

                if let Some(header) = header {
                    let next = Block {
                        header: Some(header),
                        line: lineno,
                        body: Vec::new(),
                    };
                    blocks.push(std::mem::replace(&mut current, next));
                    continue;
                }

                // unindented text closes a headed section
                if current.header.is_some() {
                    blocks.push(std::mem::replace(&mut current, Block::free(lineno)));
                }
            }

            current.body.push((lineno, line));
        }

        blocks.push(current);
        blocks
    }
}

impl DocstringParser for GoogleDocstringParser {
    fn parse(&self, docstring: &str) -> Result<ParsedDocstring, DocstringError> {
        let lines: Vec<&str> = docstring.lines().collect();

        let mut start = 0;
        let mut signature = None;
        if let Some(first) = lines.first() {
            let trimmed = first.trim();
            if SIGNATURE_LINE.is_match(trimmed) {
                signature = Some(trimmed.to_string());
                start = 1;
            }
        }

        let mut parsed = ParsedDocstring::default();

        for block in Self::split_blocks(&lines, start) {
            let section = match &block.header {
                None => {
                    if block.is_blank() {
                        continue;
                    }
                    Section {
                        text: join_text(&block.body),
                        ..Default::default()
                    }
                }
                Some((name, kind)) => {
                    let body = dedent(&block.body);
                    let mut section = Section {
                        header: Some(name.clone()),
                        ..Default::default()
                    };
                    match kind {
                        SectionKind::Fields => {
                            section.args = parse_fields(name, block.line, &body)?;
                        }
                        SectionKind::Returns => {
                            section.args = parse_returns(&body);
                        }
                        SectionKind::Text => {
                            section.text = join_text(&body);
                        }
                    }
                    parsed.headers.push(name.clone());
                    section
                }
            };
            parsed.sections.push(section);
        }

        if let Some(signature) = signature {
            match parsed.sections.first_mut() {
                Some(first) => first.signature = Some(signature),
                None => parsed.sections.push(Section {
                    signature: Some(signature),
                    ..Default::default()
                }),
            }
        }

        Ok(parsed)
    }
}

fn indent_of(line: &str) -> usize {
    line.len() - line.trim_start_matches([' ', '\t']).len()
}

fn dedent<'a>(body: &[(usize, &'a str)]) -> Vec<(usize, &'a str)> {
    let min = body
        .iter()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(_, l)| indent_of(l))
        .min()
        .unwrap_or(0);

    body.iter()
        .map(|&(n, l)| {
            if l.trim().is_empty() {
                (n, "")
            } else {
                (n, &l[min..])
            }
        })
        .collect()
}

fn join_text(body: &[(usize, &str)]) -> String {
    let lines: Vec<&str> = body.iter().map(|(_, l)| l.trim_end()).collect();
    let first = lines.iter().position(|l| !l.is_empty());
    let last = lines.iter().rposition(|l| !l.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n"),
        _ => String::new(),
    }
}

fn append_description(arg: &mut Arg, text: &str) {
    if arg.description.is_empty() {
        arg.description = text.to_string();
    } else {
        arg.description.push(' ');
        arg.description.push_str(text);
    }
}

fn parse_fields(
    header: &str,
    header_line: usize,
    body: &[(usize, &str)],
) -> Result<Vec<Arg>, DocstringError> {
    let mut args: Vec<Arg> = Vec::new();

    for (lineno, line) in body {
        if line.is_empty() {
            continue;
        }

        if indent_of(line) == 0 {
            let caps = FIELD_ENTRY.captures(line).ok_or_else(|| {
                DocstringError::new(
                    *lineno,
                    format!("malformed entry in '{}' section: {}", header, line.trim()),
                )
            })?;
            args.push(Arg {
                field: Some(caps[1].to_string()),
                signature: caps.get(2).map(|m| m.as_str().to_string()),
                description: caps[3].trim().to_string(),
            });
        } else {
            match args.last_mut() {
                Some(arg) => append_description(arg, line.trim()),
                None => {
                    return Err(DocstringError::new(
                        *lineno,
                        format!("continuation line before any entry in '{}' section", header),
                    ))
                }
            }
        }
    }

    if args.is_empty() {
        return Err(DocstringError::new(
            header_line,
            format!("empty '{}' section", header),
        ));
    }

    Ok(args)
}

fn parse_returns(body: &[(usize, &str)]) -> Vec<Arg> {
    let first = body.iter().find(|(_, l)| !l.is_empty()).map(|(_, l)| *l);
    let Some(first) = first else {
        return Vec::new();
    };

    let structured = FIELD_ENTRY.is_match(first) || RETURN_ENTRY.is_match(first);
    if !structured {
        let text: Vec<&str> = body
            .iter()
            .map(|(_, l)| l.trim())
            .filter(|l| !l.is_empty())
            .collect();
        return vec![Arg {
            description: text.join(" "),
            ..Default::default()
        }];
    }

    let mut args: Vec<Arg> = Vec::new();
    for (_, line) in body {
        if line.is_empty() {
            continue;
        }

        let entry = if indent_of(line) == 0 {
            FIELD_ENTRY
                .captures(line)
                .map(|caps| Arg {
                    field: Some(caps[1].to_string()),
                    signature: caps.get(2).map(|m| m.as_str().to_string()),
                    description: caps[3].trim().to_string(),
                })
                .or_else(|| {
                    RETURN_ENTRY.captures(line).map(|caps| Arg {
                        field: Some(caps[1].to_string()),
                        signature: None,
                        description: caps[2].trim().to_string(),
                    })
                })
        } else {
            None
        };

        match (entry, args.last_mut()) {
            (Some(arg), _) => args.push(arg),
            (None, Some(last)) => append_description(last, line.trim()),
            (None, None) => args.push(Arg {
                description: line.trim().to_string(),
                ..Default::default()
            }),
        }
    }

    args
}

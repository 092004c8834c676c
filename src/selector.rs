//! Resolution of the methods documented for a class.

use crate::config::MemberToken;
use crate::error::{GendocsError, Result};

/// Resolves the methods of `class_name` to document.
///
/// Inclusions win outright: when any method is listed without `!`, the result
/// is exactly those methods and exclusions are not subtracted. With only
/// exclusions the result is `all_methods` minus them, and with no tokens at
/// all it is `all_methods`. Every exclusion must name a method in
/// `all_methods`.
pub fn select(class_name: &str, all_methods: &[String], tokens: &[MemberToken]) -> Result<Vec<String>> {
    let mut included: Vec<String> = Vec::new();
    let mut excluded: Vec<String> = Vec::new();

    for token in tokens {
        match token {
            MemberToken::Include(name) => push_unique(&mut included, name),
            MemberToken::Exclude(name) => {
                if !all_methods.iter().any(|m| m == name) {
                    return Err(GendocsError::UnknownMethod {
                        class: class_name.to_string(),
                        method: name.clone(),
                    });
                }
                push_unique(&mut excluded, name);
            }
        }
    }

    if !excluded.is_empty() {
        tracing::info!("\tExcluded: {}", excluded.join(", "));
    }

    if !included.is_empty() {
        if !excluded.is_empty() {
            tracing::warn!(
                "{}: explicit method list given, ignoring exclusions {}",
                class_name,
                excluded.join(", ")
            );
        }
        return Ok(included);
    }

    Ok(all_methods
        .iter()
        .filter(|m| !excluded.contains(m))
        .fold(Vec::new(), |mut acc, m| {
            push_unique(&mut acc, m);
            acc
        }))
}

fn push_unique(names: &mut Vec<String>, name: &str) {
    if !names.iter().any(|n| n == name) {
        names.push(name.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn methods() -> Vec<String> {
        vec!["bar".to_string(), "baz".to_string(), "qux".to_string()]
    }

    fn tokens(raw: &[&str]) -> Vec<MemberToken> {
        raw.iter().map(|t| MemberToken::parse(t)).collect()
    }

    fn as_set(names: Vec<String>) -> BTreeSet<String> {
        names.into_iter().collect()
    }

    #[test]
    fn test_no_tokens_selects_all() {
        let selected = select("Foo", &methods(), &[]).unwrap();
        assert_eq!(selected, methods());
    }

    #[test]
    fn test_inclusion_wins_over_exclusion() {
        let selected = select("Foo", &methods(), &tokens(&["bar", "!baz"])).unwrap();
        assert_eq!(selected, vec!["bar"]);
    }

    #[test]
    fn test_inclusion_only() {
        let selected = select("Foo", &methods(), &tokens(&["qux", "bar", "qux"])).unwrap();
        assert_eq!(selected, vec!["qux", "bar"]);
    }

    #[test]
    fn test_inclusion_not_validated_against_methods() {
        let selected = select("Foo", &methods(), &tokens(&["stale"])).unwrap();
        assert_eq!(selected, vec!["stale"]);
    }

    #[test]
    fn test_exclusion_only() {
        let selected = select("Foo", &methods(), &tokens(&["!baz"])).unwrap();
        assert_eq!(
            as_set(selected),
            as_set(vec!["bar".to_string(), "qux".to_string()])
        );
    }

    #[test]
    fn test_exclude_everything() {
        let selected = select("Foo", &methods(), &tokens(&["!bar", "!baz", "!qux"])).unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn test_unknown_exclusion_fails() {
        let err = select("Foo", &methods(), &tokens(&["!nope"])).unwrap_err();
        match err {
            GendocsError::UnknownMethod { class, method } => {
                assert_eq!(class, "Foo");
                assert_eq!(method, "nope");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_exclusion_fails_even_with_inclusions() {
        let result = select("Foo", &methods(), &tokens(&["bar", "!nope"]));
        assert!(matches!(result, Err(GendocsError::UnknownMethod { .. })));
    }

    #[test]
    fn test_bare_exclusion_marker_fails() {
        let result = select("Foo", &methods(), &tokens(&["!"]));
        assert!(matches!(result, Err(GendocsError::UnknownMethod { .. })));
    }
}

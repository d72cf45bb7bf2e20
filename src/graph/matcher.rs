//! # Reference Matchers
//!
//! Pluggable scanning of model source text for `ref(...)` and `source(...)`
//! calls. Graph assembly only sees [`Reference`] values, so a stricter parser can
//! replace the regex scan without touching the extractor.

use regex::{Captures, Regex};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static REF_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bref\s*\(\s*['"]([^'"]+)['"](?:\s*,\s*['"]([^'"]+)['"])?"#)
        .expect("ref pattern is valid")
});

static SOURCE_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bsource\s*\(\s*['"]([^'"]+)['"](?:\s*,\s*['"]([^'"]+)['"])?"#)
        .expect("source pattern is valid")
});

static ANY_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:ref|source)\s*\(").expect("call pattern is valid"));

/// One reference occurrence found in source text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    /// Another model built by the project
    Model { name: String },
    /// External dataset; `table` is absent for single-argument calls
    Source { source: String, table: Option<String> },
}

impl Reference {
    pub fn model(name: impl Into<String>) -> Self {
        Self::Model { name: name.into() }
    }

    pub fn source(source: impl Into<String>, table: Option<&str>) -> Self {
        Self::Source {
            source: source.into(),
            table: table.map(str::to_string),
        }
    }

    /// `source.table`, or just `source` for single-argument calls
    pub fn qualified_name(&self) -> String {
        match self {
            Self::Model { name } => name.clone(),
            Self::Source { source, table } => match table {
                Some(table) => format!("{source}.{table}"),
                None => source.clone(),
            },
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("unterminated template expression starting at byte {offset}")]
    UnterminatedExpression { offset: usize },

    #[error("reference call with non-literal arguments in expression '{expression}'")]
    NonLiteralReference { expression: String },
}

/// Extract reference occurrences from model source text
pub trait ReferenceMatcher: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    fn find_references(&self, text: &str) -> Result<Vec<Reference>, MatchError>;
}

fn model_from(caps: &Captures<'_>) -> Reference {
    // `ref('package', 'model')` names the model last
    let name = caps.get(2).or_else(|| caps.get(1)).map_or("", |m| m.as_str());
    Reference::model(name)
}

fn source_from(caps: &Captures<'_>) -> Reference {
    Reference::source(&caps[1], caps.get(2).map(|m| m.as_str()))
}

/// Scans the whole text with call patterns. Never fails; dynamic names are
/// simply not seen.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegexReferenceMatcher;

impl ReferenceMatcher for RegexReferenceMatcher {
    fn name(&self) -> &'static str {
        "regex"
    }

    fn find_references(&self, text: &str) -> Result<Vec<Reference>, MatchError> {
        let models = REF_CALL.captures_iter(text).map(|c| model_from(&c));
        let sources = SOURCE_CALL.captures_iter(text).map(|c| source_from(&c));
        Ok(models.chain(sources).collect())
    }
}

/// Scans only inside `{{ ... }}` expressions, in order of appearance.
///
/// Fails on an unterminated expression, or on a `ref`/`source` call whose
/// arguments are not string literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateMatcher;

impl TemplateMatcher {
    fn scan_expression(expression: &str, out: &mut Vec<Reference>) -> Result<(), MatchError> {
        let mut found: Vec<(usize, Reference)> = REF_CALL
            .captures_iter(expression)
            .filter_map(|c| c.get(0).map(|m| (m.start(), model_from(&c))))
            .chain(
                SOURCE_CALL
                    .captures_iter(expression)
                    .filter_map(|c| c.get(0).map(|m| (m.start(), source_from(&c)))),
            )
            .collect();

        if found.len() != ANY_CALL.find_iter(expression).count() {
            return Err(MatchError::NonLiteralReference {
                expression: expression.trim().to_string(),
            });
        }

        found.sort_by_key(|(offset, _)| *offset);
        out.extend(found.into_iter().map(|(_, reference)| reference));
        Ok(())
    }
}

impl ReferenceMatcher for TemplateMatcher {
    fn name(&self) -> &'static str {
        "template"
    }

    fn find_references(&self, text: &str) -> Result<Vec<Reference>, MatchError> {
        let mut references = Vec::new();
        let mut cursor = 0;

        while let Some(open) = text[cursor..].find("{{") {
            let start = cursor + open;
            let body_start = start + 2;
            let close = text[body_start..]
                .find("}}")
                .ok_or(MatchError::UnterminatedExpression { offset: start })?;

            Self::scan_expression(&text[body_start..body_start + close], &mut references)?;
            cursor = body_start + close + 2;
        }

        Ok(references)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQL: &str = "select * from {{ ref('orders') }} join {{ source('raw','customers') }}";

    #[test]
    fn test_regex_finds_refs_and_sources() {
        let refs = RegexReferenceMatcher.find_references(SQL).unwrap();
        assert_eq!(
            refs,
            vec![
                Reference::model("orders"),
                Reference::source("raw", Some("customers")),
            ]
        );
        assert_eq!(refs[1].qualified_name(), "raw.customers");
    }

    #[test]
    fn test_regex_handles_whitespace_and_double_quotes() {
        let refs = RegexReferenceMatcher
            .find_references(r#"{{ ref ( "stg_orders" ) }} {{ source( "raw" ) }}"#)
            .unwrap();
        assert_eq!(
            refs,
            vec![Reference::model("stg_orders"), Reference::source("raw", None)]
        );
    }

    #[test]
    fn test_two_argument_ref_uses_model_name() {
        let refs = RegexReferenceMatcher
            .find_references("{{ ref('analytics_pkg', 'dim_customers') }}")
            .unwrap();
        assert_eq!(refs, vec![Reference::model("dim_customers")]);
    }

    #[test]
    fn test_regex_ignores_identifier_suffixes() {
        let refs = RegexReferenceMatcher
            .find_references("select xref('nope'), data_source('nope')")
            .unwrap();
        assert!(refs.is_empty());
    }

    #[test]
    fn test_template_preserves_order_of_appearance() {
        let refs = TemplateMatcher
            .find_references("{{ source('raw', 'a') }} {{ ref('b') }}")
            .unwrap();
        assert_eq!(
            refs,
            vec![Reference::source("raw", Some("a")), Reference::model("b")]
        );
    }

    #[test]
    fn test_template_ignores_text_outside_expressions() {
        let refs = TemplateMatcher
            .find_references("-- ref('commented') \n select 1 from {{ ref('real') }}")
            .unwrap();
        assert_eq!(refs, vec![Reference::model("real")]);
    }

    #[test]
    fn test_template_rejects_unterminated_expression() {
        let err = TemplateMatcher
            .find_references("select * from {{ ref('orders') ")
            .unwrap_err();
        assert_eq!(err, MatchError::UnterminatedExpression { offset: 14 });
    }

    #[test]
    fn test_template_rejects_dynamic_reference() {
        let err = TemplateMatcher
            .find_references("{{ ref(var('target_model')) }}")
            .unwrap_err();
        assert!(matches!(err, MatchError::NonLiteralReference { .. }));
    }

    #[test]
    fn test_template_unterminated_after_complete_expression() {
        let err = TemplateMatcher
            .find_references("select 1 {{ ref('a') }} from {{ ref('b')")
            .unwrap_err();
        assert_eq!(err, MatchError::UnterminatedExpression { offset: 29 });
    }
}

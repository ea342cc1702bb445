mod parser;

use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::mapping::{MappingTable, Test};
use combine::Parser;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    AllOf,
    AnyOf,
}

impl Combinator {
    pub fn as_str(self) -> &'static str {
        match self {
            Combinator::AllOf => "allof",
            Combinator::AnyOf => "anyof",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `(header, operator, value)` comparison with quoting removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub header: String,
    pub operator: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub combinator: Combinator,
    pub terms: Vec<Term>,
}

/// Removes the escaping Thunderbird puts around quoted header names and
/// values.
fn unquote(s: &str) -> String {
    s.replace("\\\"", "\"").trim_matches('"').to_string()
}

impl Condition {
    /// Splits a raw condition like `AND (from,contains,x) AND (...)` into its
    /// combinator and terms. Without an `AND` / `OR` prefix the terms are
    /// combined with `anyof`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let (combinator, rest) = if let Some(rest) = raw.strip_prefix("OR ") {
            (Combinator::AnyOf, rest)
        } else if let Some(rest) = raw.strip_prefix("AND ") {
            (Combinator::AllOf, rest)
        } else {
            (Combinator::AnyOf, raw)
        };
        let terms = parser::terms()
            .parse(rest)
            .map(|(terms, _)| terms)
            .unwrap_or_default()
            .into_iter()
            .map(|t| Term {
                header: unquote(&t.header),
                operator: t.operator,
                value: unquote(&t.value),
            })
            .collect();
        Condition { combinator, terms }
    }

    /// Translates every term through `table`. Terms without a mapping are
    /// reported to `diagnostics` and left out.
    pub fn translate(&self, table: &MappingTable, diagnostics: &mut Diagnostics) -> Vec<Test> {
        let mut tests = vec![];
        for term in &self.terms {
            debug!(
                "header operation value: h'{}' o'{}' v'{}'",
                term.header, term.operator, term.value
            );
            match table.translate(term) {
                Some(translated) => tests.extend(translated),
                None => diagnostics.emit(Diagnostic::UnhandledTerm {
                    header: term.header.clone(),
                    operator: term.operator.clone(),
                }),
            }
        }
        tests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Dialect;

    fn term(header: &str, operator: &str, value: &str) -> Term {
        Term {
            header: header.to_string(),
            operator: operator.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_combinator_prefix() {
        let cond = Condition::parse("AND (from,contains,a) AND (subject,contains,b)");
        assert_eq!(cond.combinator, Combinator::AllOf);
        assert_eq!(
            cond.terms,
            vec![term("from", "contains", "a"), term("subject", "contains", "b")]
        );

        let cond = Condition::parse("  OR (from,is,a) OR (from,is,b)  ");
        assert_eq!(cond.combinator, Combinator::AnyOf);
        assert_eq!(cond.terms.len(), 2);

        let cond = Condition::parse("(from,is,a)");
        assert_eq!(cond.combinator, Combinator::AnyOf);
        assert_eq!(cond.terms, vec![term("from", "is", "a")]);
    }

    #[test]
    fn test_unquote_terms() {
        let cond = Condition::parse(r#"AND (\"X-Spam-Flag\",contains,\"YES\")"#);
        assert_eq!(cond.terms, vec![term("X-Spam-Flag", "contains", "YES")]);

        let cond = Condition::parse(r#"(subject,contains,"a \"b\" c")"#);
        assert_eq!(cond.terms, vec![term("subject", "contains", r#"a "b" c"#)]);
    }

    #[test]
    fn test_no_terms() {
        assert_eq!(Condition::parse("ALL").terms, vec![]);
        assert_eq!(Condition::parse("").terms, vec![]);
    }

    #[test]
    fn test_translate_reports_unhandled() {
        let table = Dialect::Standard.mapping_table();
        let cond = Condition::parse("OR (from,contains,a) OR (date,is before,2020)");
        let mut diagnostics = Diagnostics::new("test");
        let tests = cond.translate(&table, &mut diagnostics);
        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].to_string(), r#"header :contains "From" "a""#);
        assert_eq!(
            diagnostics.into_comments(),
            vec!["# NOTE: unhandled header/operation: h'date' o'is before'"]
        );
    }
}

use crate::condition::Term;
use crate::utils::quote;
use clap::ValueEnum;
use std::fmt;

/// Which flavour of conversion to perform.
///
/// `Standard` understands negated and `to or cc` conditions and keeps the
/// case of folder names. `Legacy` reproduces the older converter: a smaller
/// table, with folder names lowercased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Dialect {
    #[default]
    Standard,
    Legacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderCase {
    Preserve,
    Lower,
}

impl Dialect {
    pub fn mapping_table(self) -> MappingTable {
        match self {
            Dialect::Standard => MappingTable::new(STANDARD),
            Dialect::Legacy => MappingTable::new(LEGACY),
        }
    }

    pub fn folder_case(self) -> FolderCase {
        match self {
            Dialect::Standard => FolderCase::Preserve,
            Dialect::Legacy => FolderCase::Lower,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    Is,
    Contains,
    Matches,
}

impl MatchType {
    fn as_str(self) -> &'static str {
        match self {
            MatchType::Is => ":is",
            MatchType::Contains => ":contains",
            MatchType::Matches => ":matches",
        }
    }
}

/// A translated Sieve `header` test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Test {
    pub negated: bool,
    pub match_type: MatchType,
    pub headers: Vec<String>,
    pub key: String,
}

impl fmt::Display for Test {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.negated {
            f.write_str("not ")?;
        }
        write!(f, "header {} ", self.match_type.as_str())?;
        match self.headers.as_slice() {
            [header] => f.write_str(&quote(header))?,
            headers => {
                let list: Vec<_> = headers.iter().map(|h| quote(h)).collect();
                write!(f, "[{}]", list.join(", "))?;
            }
        }
        write!(f, " {}", quote(&self.key))
    }
}

#[derive(Debug, Clone, Copy)]
enum Headers {
    /// The header name written in the condition.
    Source,
    Fixed(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
enum Key {
    Exact,
    Prefix,
    Suffix,
}

#[derive(Debug, Clone, Copy)]
struct Template {
    negated: bool,
    match_type: MatchType,
    headers: Headers,
    key: Key,
}

impl Template {
    fn render(&self, term: &Term) -> Test {
        let headers = match self.headers {
            Headers::Source => vec![term.header.clone()],
            Headers::Fixed(names) => names.iter().map(|n| n.to_string()).collect(),
        };
        let key = match self.key {
            Key::Exact => term.value.clone(),
            Key::Prefix => format!("{}*", term.value),
            Key::Suffix => format!("*{}", term.value),
        };
        Test {
            negated: self.negated,
            match_type: self.match_type,
            headers,
            key,
        }
    }
}

/// `None` matches any header.
type Mapping = (Option<&'static str>, &'static str, &'static [Template]);

const fn plain(match_type: MatchType, headers: Headers, key: Key) -> Template {
    Template {
        negated: false,
        match_type,
        headers,
        key,
    }
}

const fn negated(match_type: MatchType, headers: Headers, key: Key) -> Template {
    Template {
        negated: true,
        match_type,
        headers,
        key,
    }
}

use self::Headers::{Fixed, Source};
use self::Key::{Exact, Prefix, Suffix};
use self::MatchType::{Contains, Is, Matches};

const FROM: Headers = Fixed(&["From"]);
const SUBJECT: Headers = Fixed(&["Subject"]);
const TO_OR_CC: Headers = Fixed(&["to", "cc"]);

const STANDARD: &[Mapping] = &[
    (Some("from"), "is", &[plain(Is, FROM, Exact)]),
    (Some("from"), "contains", &[plain(Contains, FROM, Exact)]),
    (Some("subject"), "contains", &[plain(Contains, SUBJECT, Exact)]),
    (
        Some("to or cc"),
        "contains",
        &[
            plain(Contains, Fixed(&["to"]), Exact),
            plain(Contains, Fixed(&["cc"]), Exact),
        ],
    ),
    (None, "contains", &[plain(Contains, Source, Exact)]),
    (Some("from"), "doesn't contain", &[negated(Contains, FROM, Exact)]),
    (Some("subject"), "doesn't contain", &[negated(Contains, SUBJECT, Exact)]),
    // Negates both headers at once.
    (Some("to or cc"), "doesn't contain", &[negated(Contains, TO_OR_CC, Exact)]),
    (None, "doesn't contain", &[negated(Contains, Source, Exact)]),
    (Some("from"), "begins with", &[plain(Matches, FROM, Prefix)]),
    (Some("subject"), "begins with", &[plain(Matches, SUBJECT, Prefix)]),
    (Some("from"), "ends with", &[plain(Matches, FROM, Suffix)]),
];

const LEGACY: &[Mapping] = &[
    (Some("from"), "is", &[plain(Is, FROM, Exact)]),
    (Some("from"), "contains", &[plain(Contains, FROM, Exact)]),
    (Some("subject"), "contains", &[plain(Contains, SUBJECT, Exact)]),
    (None, "contains", &[plain(Contains, Source, Exact)]),
    (Some("from"), "begins with", &[plain(Matches, FROM, Prefix)]),
    (Some("subject"), "begins with", &[plain(Matches, SUBJECT, Prefix)]),
    (Some("from"), "ends with", &[plain(Matches, FROM, Suffix)]),
];

/// Lookup table from `(header, operator)` to the Sieve tests it produces.
#[derive(Debug, Clone)]
pub struct MappingTable {
    mappings: &'static [Mapping],
}

impl MappingTable {
    fn new(mappings: &'static [Mapping]) -> Self {
        MappingTable { mappings }
    }

    /// An entry for the exact header wins over a catch-all entry.
    fn lookup(&self, header: &str, operator: &str) -> Option<&'static [Template]> {
        let by_operator = || self.mappings.iter().filter(|(_, op, _)| *op == operator);
        by_operator()
            .find(|(h, _, _)| *h == Some(header))
            .or_else(|| by_operator().find(|(h, _, _)| h.is_none()))
            .map(|(_, _, templates)| *templates)
    }

    /// Returns `None` if the combination is not supported.
    pub fn translate(&self, term: &Term) -> Option<Vec<Test>> {
        let templates = self.lookup(&term.header, &term.operator)?;
        Some(templates.iter().map(|t| t.render(term)).collect())
    }
}

use combine::{
    error::StringStreamError,
    parser::{
        choice::choice,
        combinator::attempt,
        repeat::{many, many1},
        token::{any, none_of, satisfy, token},
    },
    Parser,
};

/// A `(header, operator, value)` triple exactly as it appears in the
/// condition, before any unquoting.
#[derive(Debug, PartialEq, Eq)]
pub struct RawTerm {
    pub header: String,
    pub operator: String,
    pub value: String,
}

/// Collects every term found in the input, skipping anything in between,
/// such as the `AND` / `OR` keywords.
pub fn terms<'a>() -> impl Parser<&'a str, Output = Vec<RawTerm>> {
    many::<Vec<_>, _, _>(choice((attempt(term()).map(Some), any().map(|_| None))))
        .map(|items: Vec<Option<RawTerm>>| items.into_iter().flatten().collect())
}

fn term<'a>() -> impl Parser<&'a str, Output = RawTerm> {
    (token('('), field(), token(','), operator(), token(','), value()).map(
        |(_, header, _, operator, _, value)| RawTerm {
            header,
            operator,
            value,
        },
    )
}

fn field<'a>() -> impl Parser<&'a str, Output = String> {
    many1::<String, _, _>(none_of(",".chars()))
}

/// Leading whitespace is skipped, but the operator is never empty: a run
/// made only of whitespace keeps its last character.
fn operator<'a>() -> impl Parser<&'a str, Output = String> {
    field().map(|run: String| {
        let trimmed = run.trim_start();
        if trimmed.is_empty() {
            run.chars().last().map(String::from).unwrap_or_default()
        } else {
            trimmed.to_string()
        }
    })
}

/// The value, including its closing parenthesis.
///
/// It runs up to the first closing parenthesis on the same line, but always
/// takes at least one character, so `(a,b,))` yields `)`. When nothing but
/// `)` follows the leading whitespace, the last whitespace character becomes
/// the value, so `(a,b, )` yields ` `.
fn value<'a>() -> impl Parser<&'a str, Output = String> {
    many::<String, _, _>(satisfy(char::is_whitespace)).then(|ws: String| {
        let last = ws.chars().last().filter(|&c| c != '\n');
        choice((
            attempt((
                satisfy(|c: char| c != '\n'),
                many::<String, _, _>(none_of(")\n".chars())),
                token(')'),
            ))
            .map(|(first, rest, _)| {
                let mut value = String::with_capacity(rest.len() + 1);
                value.push(first);
                value.push_str(&rest);
                value
            }),
            token(')').and_then(move |_| {
                last.map(String::from)
                    .ok_or(StringStreamError::UnexpectedParse)
            }),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Vec<(String, String, String)> {
        let (terms, rest) = terms().parse(s).unwrap();
        assert_eq!(rest, "");
        terms
            .into_iter()
            .map(|t| (t.header, t.operator, t.value))
            .collect()
    }

    fn triple(h: &str, o: &str, v: &str) -> (String, String, String) {
        (h.to_string(), o.to_string(), v.to_string())
    }

    #[test]
    fn test_single_term() {
        assert_eq!(
            parse(r#"(from,contains,"x@y.com")"#),
            vec![triple("from", "contains", r#""x@y.com""#)]
        );
    }

    #[test]
    fn test_multiple_terms() {
        assert_eq!(
            parse("(from,contains,shop.example.com) AND (subject,begins with,invoice)"),
            vec![
                triple("from", "contains", "shop.example.com"),
                triple("subject", "begins with", "invoice"),
            ]
        );
    }

    #[test]
    fn test_spaces_after_commas() {
        assert_eq!(
            parse("(to or cc, contains,  someone)"),
            vec![triple("to or cc", "contains", "someone")]
        );
    }

    #[test]
    fn test_value_with_commas() {
        assert_eq!(
            parse("(subject,contains,a, b, c)"),
            vec![triple("subject", "contains", "a, b, c")]
        );
    }

    #[test]
    fn test_value_stops_at_first_paren() {
        assert_eq!(
            parse("(subject,contains,foo (bar)) trailing"),
            vec![triple("subject", "contains", "foo (bar")]
        );
        assert_eq!(parse("(a,b,))"), vec![triple("a", "b", ")")]);
    }

    #[test]
    fn test_whitespace_only_fields() {
        assert_eq!(parse("(a, ,b)"), vec![triple("a", " ", "b")]);
        assert_eq!(parse("(a,  \t,b)"), vec![triple("a", "\t", "b")]);
        assert_eq!(parse("(a,b, )"), vec![triple("a", "b", " ")]);
        assert_eq!(parse("(a,b, ))"), vec![triple("a", "b", ")")]);
        assert_eq!(parse("(a,b,\n)"), vec![]);
        assert_eq!(parse("(a,b,)"), vec![]);
    }

    #[test]
    fn test_no_terms() {
        assert_eq!(parse(""), vec![]);
        assert_eq!(parse("ALL"), vec![]);
        assert_eq!(parse("(from,contains)"), vec![]);
        assert_eq!(parse("(from,contains,unterminated"), vec![]);
    }
}

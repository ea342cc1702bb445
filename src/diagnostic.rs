use tracing::warn;

/// Something worth telling the user about while converting one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    UnhandledTerm { header: String, operator: String },
    UnhandledCondition(String),
    MissingAction,
    Hint(String),
}

impl Diagnostic {
    /// Rule-level warnings are shown first in the output block.
    fn is_banner(&self) -> bool {
        matches!(
            self,
            Diagnostic::UnhandledCondition(_) | Diagnostic::MissingAction
        )
    }

    fn comment(&self) -> String {
        match self {
            Diagnostic::UnhandledTerm { header, operator } => format!(
                "# NOTE: unhandled header/operation: h'{}' o'{}'",
                header, operator
            ),
            Diagnostic::UnhandledCondition(_) => "# WARNING: condition not convertible".into(),
            Diagnostic::MissingAction => "# WARNING: rule has no action".into(),
            Diagnostic::Hint(hint) => format!("# hint {}", hint),
        }
    }
}

/// Collects the diagnostics of a single rule.
///
/// Every diagnostic is logged as soon as it is emitted and later rendered as
/// a comment in the rule block, so the console and the script always report
/// the same events.
#[derive(Debug)]
pub struct Diagnostics {
    rule: String,
    emitted: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(rule: &str) -> Self {
        Diagnostics {
            rule: rule.to_string(),
            emitted: vec![],
        }
    }

    pub fn emit(&mut self, diagnostic: Diagnostic) {
        let rule = &self.rule;
        match &diagnostic {
            Diagnostic::UnhandledTerm { header, operator } => {
                warn!(rule = %rule, "unhandled header/operation: h'{}' o'{}'", header, operator)
            }
            Diagnostic::UnhandledCondition(condition) => {
                warn!(rule = %rule, "unhandled condition: {}", condition);
                warn!("see rule '{}' (unhandled condition)", rule);
            }
            Diagnostic::MissingAction => warn!("see rule '{}' (missing action)", rule),
            Diagnostic::Hint(hint) => warn!(rule = %rule, "{}", hint),
        }
        self.emitted.push(diagnostic);
    }

    /// Comment lines for the rule block, banners first.
    pub fn into_comments(self) -> Vec<String> {
        let (banners, notes): (Vec<_>, Vec<_>) =
            self.emitted.iter().partition(|d| d.is_banner());
        banners.into_iter().chain(notes).map(Diagnostic::comment).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banners_first() {
        let mut diagnostics = Diagnostics::new("rule");
        diagnostics.emit(Diagnostic::UnhandledTerm {
            header: "body".into(),
            operator: "contains".into(),
        });
        diagnostics.emit(Diagnostic::Hint("some hint".into()));
        diagnostics.emit(Diagnostic::MissingAction);
        assert_eq!(
            diagnostics.into_comments(),
            vec![
                "# WARNING: rule has no action",
                "# NOTE: unhandled header/operation: h'body' o'contains'",
                "# hint some hint",
            ]
        );
    }
}

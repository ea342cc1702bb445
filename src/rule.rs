use crate::action::{translate_actions, Action};
use crate::condition::{Combinator, Condition};
use crate::diagnostic::{Diagnostic, Diagnostics};
use crate::mapping::{Dialect, FolderCase, MappingTable, Test};
use crate::record::FilterRecord;
use std::fmt::{self, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Active {
        combinator: Combinator,
        tests: Vec<Test>,
        actions: Vec<Action>,
    },
    /// No condition term could be converted. The rule is kept commented out.
    UnconvertibleCondition {
        condition: String,
        combinator: Combinator,
        actions: Vec<Action>,
    },
    /// Conditions were converted but nothing would happen on a match.
    NoAction {
        condition: String,
        actions: Vec<String>,
        action_value: Option<String>,
    },
}

/// The Sieve rendering of one filter record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleBlock {
    pub name: String,
    pub comments: Vec<String>,
    pub kind: BlockKind,
}

impl fmt::Display for RuleBlock {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut lines: Vec<String> = self.comments.clone();
        match &self.kind {
            BlockKind::Active {
                combinator,
                tests,
                actions,
            } => {
                lines.push(format!("# rule:[{}]", self.name));
                lines.push(format!("if {} (", combinator));
                let tests: Vec<_> = tests.iter().map(|t| format!("    {}", t)).collect();
                lines.push(tests.join(",\n"));
                lines.push(")".into());
                lines.push("{".into());
                lines.extend(actions.iter().map(|a| format!("\t{}", a)));
                lines.push("}".into());
            }
            BlockKind::UnconvertibleCondition {
                condition,
                combinator,
                actions,
            } => {
                lines.push(format!("# {}", condition));
                lines.push(format!("# rule:[{}]", self.name));
                lines.push(format!("#if {} (", combinator));
                lines.push("#)".into());
                lines.push("#{".into());
                lines.extend(actions.iter().map(|a| format!("#\t{}", a)));
                lines.push("#}".into());
            }
            BlockKind::NoAction {
                condition,
                actions,
                action_value,
            } => {
                lines.push(format!("# rule:[{}]", self.name));
                lines.push(format!("# conditions {}", condition));
                lines.push(format!("# actions {:?}", actions));
                lines.push(format!(
                    "# values {}",
                    action_value.as_deref().unwrap_or("none")
                ));
            }
        }
        let mut first = true;
        for line in lines {
            if !first {
                f.write_char('\n')?;
            }
            first = false;
            f.write_str(&line)?;
        }
        Ok(())
    }
}

/// Converts filter records into rule blocks for one dialect.
pub struct Translator {
    table: MappingTable,
    folder_case: FolderCase,
}

impl Translator {
    pub fn new(dialect: Dialect) -> Self {
        Translator {
            table: dialect.mapping_table(),
            folder_case: dialect.folder_case(),
        }
    }

    pub fn translate(&self, record: &FilterRecord) -> RuleBlock {
        let mut diagnostics = Diagnostics::new(&record.name);
        let condition = Condition::parse(&record.condition);
        let tests = condition.translate(&self.table, &mut diagnostics);
        let translated = translate_actions(
            &record.actions,
            record.action_value.as_deref(),
            self.folder_case,
        );
        if let Some(hint) = translated.hint {
            diagnostics.emit(Diagnostic::Hint(hint));
        }

        let kind = if tests.is_empty() {
            diagnostics.emit(Diagnostic::UnhandledCondition(record.condition.clone()));
            BlockKind::UnconvertibleCondition {
                condition: record.condition.clone(),
                combinator: condition.combinator,
                actions: translated.actions,
            }
        } else if translated.actions.is_empty() {
            diagnostics.emit(Diagnostic::MissingAction);
            BlockKind::NoAction {
                condition: record.condition.clone(),
                actions: record.actions.clone(),
                action_value: record.action_value.clone(),
            }
        } else {
            BlockKind::Active {
                combinator: condition.combinator,
                tests,
                actions: translated.actions,
            }
        };

        RuleBlock {
            name: record.name.clone(),
            comments: diagnostics.into_comments(),
            kind,
        }
    }
}

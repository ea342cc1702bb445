use std::collections::BTreeMap;

const NAME_KEY: &str = "name";
const CONDITION_KEY: &str = "condition";
const ACTION_KEY: &str = "action";
const ACTION_VALUE_KEY: &str = "actionValue";

/// A single filter rule read from `msgFilterRules.dat`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRecord {
    pub name: String,
    pub condition: String,
    /// One entry per `action=` line, in file order.
    pub actions: Vec<String>,
    pub action_value: Option<String>,
    /// Every other scalar field, e.g. `enabled` or `type`.
    pub fields: BTreeMap<String, String>,
}

/// Accumulates the fields of the record currently being read.
#[derive(Debug, Default)]
pub struct RecordBuilder {
    name: Option<String>,
    actions: Vec<String>,
    fields: BTreeMap<String, String>,
}

impl RecordBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &str, value: &str) {
        match key {
            NAME_KEY => self.name = Some(value.to_string()),
            ACTION_KEY => self.actions.push(value.to_string()),
            _ => {
                self.fields.insert(key.to_string(), value.to_string());
            }
        }
    }

    /// Returns the record if it has both a name and a condition.
    pub fn finish(mut self) -> Option<FilterRecord> {
        let name = self.name?;
        let condition = self.fields.remove(CONDITION_KEY)?;
        let action_value = self.fields.remove(ACTION_VALUE_KEY);
        Some(FilterRecord {
            name,
            condition,
            actions: self.actions,
            action_value,
            fields: self.fields,
        })
    }
}

fn split_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    Some((key, value.trim_matches('"')))
}

/// Parses the content of a filter file into records.
///
/// Incomplete stanzas, including the `version` / `logging` header at the top
/// of the file, are dropped without any error.
pub fn parse_records(text: &str) -> Vec<FilterRecord> {
    let mut records = vec![];
    let mut current = RecordBuilder::new();
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (key, value) = match split_line(line) {
            Some(kv) => kv,
            None => continue,
        };
        if key == NAME_KEY {
            let finished = std::mem::take(&mut current);
            records.extend(finished.finish());
        }
        current.push(key, value);
    }
    records.extend(current.finish());
    records
}

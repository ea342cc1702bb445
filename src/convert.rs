use crate::mapping::Dialect;
use crate::record;
use crate::rule::Translator;
use tracing::info;

const REQUIRE: &str = r#"require ["fileinto", "imap4flags"];"#;

#[derive(Debug)]
pub struct Conversion {
    pub document: String,
    /// Number of rule blocks written, including commented-out ones.
    pub rules: usize,
}

/// Converts the content of a Thunderbird filter file into a Sieve script.
pub fn convert(text: &str, dialect: Dialect) -> Conversion {
    info!("Parsing filters...");
    let records = record::parse_records(text);

    info!("Converting {} filters...", records.len());
    let translator = Translator::new(dialect);
    let blocks: Vec<String> = records
        .iter()
        .map(|record| translator.translate(record).to_string())
        .collect();

    let mut document = String::from(REQUIRE);
    document.push('\n');
    if !blocks.is_empty() {
        document.push('\n');
        document.push_str(&blocks.join("\n\n"));
        document.push('\n');
    }
    Conversion {
        document,
        rules: blocks.len(),
    }
}

//! Corpus listing. Touches no external service.

use civic_core::{AppConfig, AppResult};
use civic_knowledge::{load_corpus, SchemeRecord};
use clap::Args;

/// List the schemes parsed from the corpus
#[derive(Args, Debug)]
pub struct SchemesCommand {
    /// Only show schemes whose name contains this text (case-insensitive)
    #[arg(long)]
    pub name: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl SchemesCommand {
    pub fn execute(&self, config: &AppConfig) -> AppResult<()> {
        let records = load_corpus(&config.corpus_file())?;
        let records = filter_by_name(records, self.name.as_deref());

        if self.json {
            println!("{}", serde_json::to_string_pretty(&records)?);
            return Ok(());
        }

        if records.is_empty() {
            println!("No schemes found.");
            return Ok(());
        }

        for (i, record) in records.iter().enumerate() {
            println!("{}.", i + 1);
            println!("{}", record.render());
        }
        println!("{} scheme(s)", records.len());

        Ok(())
    }
}

fn filter_by_name(records: Vec<SchemeRecord>, name: Option<&str>) -> Vec<SchemeRecord> {
    match name.map(|n| n.trim().to_lowercase()).filter(|n| !n.is_empty()) {
        Some(needle) => records
            .into_iter()
            .filter(|r| r.scheme_name.to_lowercase().contains(&needle))
            .collect(),
        None => records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_knowledge::parse_corpus;

    #[test]
    fn test_filter_by_name() {
        let records = parse_corpus("1.\nscheme_name: Gruha Jyothi\n2.\nscheme_name: Gruha Lakshmi\n3.\nscheme_name: Shakti\n");

        assert_eq!(filter_by_name(records.clone(), Some("gruha")).len(), 2);
        assert_eq!(filter_by_name(records.clone(), Some("  ")).len(), 3);
        assert_eq!(filter_by_name(records, None).len(), 3);
    }
}

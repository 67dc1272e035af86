//! Scheme corpus parsing.
//!
//! The corpus is plain text. Schemes are separated by lines consisting solely
//! of a number followed by a period (`12.`). Inside a block, a field starts at
//! a line beginning with `<field_name>:` and runs until the next recognised
//! label or the end of the block. Parsing never fails: absent fields become
//! [`NOT_SPECIFIED`].

use crate::types::RetrievableUnit;
use civic_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Value used for any field missing from a block.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Recognised field labels, in record order. Case-sensitive.
pub const FIELD_NAMES: [&str; 8] = [
    "scheme_name",
    "benefit",
    "eligibility",
    "category",
    "start_date",
    "application_details",
    "region",
    "source_url",
];

const DISPLAY_LABELS: [(&str, &str); 8] = [
    ("📌", "Scheme Name"),
    ("💰", "Benefit"),
    ("🧾", "Eligibility"),
    ("🏷️", "Category"),
    ("📅", "Start Date"),
    ("📝", "Application Details"),
    ("📍", "Region"),
    ("🔗", "Source"),
];

/// One government scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeRecord {
    pub scheme_name: String,
    pub benefit: String,
    pub eligibility: String,
    pub category: String,
    pub start_date: String,
    pub application_details: String,
    pub region: String,
    pub source_url: String,
}

impl SchemeRecord {
    fn from_values(values: [Option<String>; 8]) -> Self {
        let [scheme_name, benefit, eligibility, category, start_date, application_details, region, source_url] =
            values.map(|v| v.unwrap_or_else(|| NOT_SPECIFIED.to_string()));

        Self {
            scheme_name,
            benefit,
            eligibility,
            category,
            start_date,
            application_details,
            region,
            source_url,
        }
    }

    /// Field values in [`FIELD_NAMES`] order.
    pub fn values(&self) -> [&str; 8] {
        [
            &self.scheme_name,
            &self.benefit,
            &self.eligibility,
            &self.category,
            &self.start_date,
            &self.application_details,
            &self.region,
            &self.source_url,
        ]
    }

    /// Look up a field by its corpus label.
    pub fn field(&self, name: &str) -> Option<&str> {
        FIELD_NAMES
            .iter()
            .position(|f| *f == name)
            .map(|idx| self.values()[idx])
    }

    /// Human-readable form embedded into the index.
    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn to_unit(&self) -> RetrievableUnit {
        RetrievableUnit::new(self.render(), self.scheme_name.clone())
    }
}

impl fmt::Display for SchemeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ((icon, label), value) in DISPLAY_LABELS.iter().zip(self.values()) {
            writeln!(f, "{} **{}**: {}", icon, label, value)?;
        }
        Ok(())
    }
}

/// Parse the whole corpus. Produces exactly one record per non-blank block.
pub fn parse_corpus(text: &str) -> Vec<SchemeRecord> {
    let records: Vec<SchemeRecord> = split_blocks(text)
        .into_iter()
        .filter(|block| !block.trim().is_empty())
        .map(|block| parse_block(&block))
        .collect();

    tracing::debug!("Parsed {} scheme records", records.len());
    records
}

/// Read and parse a corpus file.
pub fn load_corpus(path: &Path) -> AppResult<Vec<SchemeRecord>> {
    if !path.exists() {
        return Err(AppError::Config(format!(
            "Scheme corpus not found: {:?}",
            path
        )));
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| AppError::Knowledge(format!("Failed to read corpus {:?}: {}", path, e)))?;

    let records = parse_corpus(&raw);
    tracing::info!("Loaded {} schemes from {:?}", records.len(), path);
    Ok(records)
}

/// Split on delimiter lines. Delimiters themselves are dropped.
fn split_blocks(text: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if is_delimiter(line) {
            blocks.push(current.join("\n"));
            current.clear();
        } else {
            current.push(line);
        }
    }
    blocks.push(current.join("\n"));

    blocks
}

fn is_delimiter(line: &str) -> bool {
    match line.trim().strip_suffix('.') {
        Some(number) => !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

/// Return the field index and the remainder of the line if it opens a field.
fn match_label(line: &str) -> Option<(usize, &str)> {
    let line = line.trim_start();
    FIELD_NAMES.iter().enumerate().find_map(|(idx, name)| {
        line.strip_prefix(name)
            .and_then(|rest| rest.strip_prefix(':'))
            .map(|rest| (idx, rest))
    })
}

fn parse_block(block: &str) -> SchemeRecord {
    let mut values: [Option<String>; 8] = Default::default();
    // (field index, collected lines); None while outside a field or inside a repeated label
    let mut current: Option<(usize, Vec<&str>)> = None;

    for line in block.lines() {
        if let Some((idx, rest)) = match_label(line) {
            flush(&mut current, &mut values);
            if values[idx].is_none() {
                current = Some((idx, vec![rest]));
            } else {
                tracing::warn!("Ignoring repeated '{}' label in scheme block", FIELD_NAMES[idx]);
            }
            continue;
        }

        if let Some((_, lines)) = current.as_mut() {
            lines.push(line);
        }
    }
    flush(&mut current, &mut values);

    SchemeRecord::from_values(values)
}

fn flush(current: &mut Option<(usize, Vec<&str>)>, values: &mut [Option<String>; 8]) {
    if let Some((idx, lines)) = current.take() {
        values[idx] = Some(lines.join("\n").trim().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CORPUS: &str = "1.
scheme_name: Sanjeevini
benefit: Livelihood support for rural women
through self-help groups
eligibility: Women in rural Karnataka
category: Rural Development
start_date: 2011
application_details: Apply via the gram panchayat
region: Karnataka
source_url: https://sanjeevini.karnataka.gov.in

2.
scheme_name: Gruha Jyothi
benefit: Free electricity up to 200 units

3.

";

    #[test]
    fn test_one_record_per_non_empty_block() {
        let records = parse_corpus(CORPUS);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].scheme_name, "Sanjeevini");
        assert_eq!(records[1].scheme_name, "Gruha Jyothi");
    }

    #[test]
    fn test_multiline_value_preserves_newlines() {
        let records = parse_corpus(CORPUS);
        assert_eq!(
            records[0].benefit,
            "Livelihood support for rural women\nthrough self-help groups"
        );
    }

    #[test]
    fn test_value_with_colon_is_kept() {
        let records = parse_corpus(CORPUS);
        assert_eq!(records[0].source_url, "https://sanjeevini.karnataka.gov.in");
    }

    #[test]
    fn test_missing_fields_default_independently() {
        let records = parse_corpus(CORPUS);
        let record = &records[1];
        assert_eq!(record.benefit, "Free electricity up to 200 units");
        assert_eq!(record.eligibility, NOT_SPECIFIED);
        assert_eq!(record.category, NOT_SPECIFIED);
        assert_eq!(record.start_date, NOT_SPECIFIED);
        assert_eq!(record.application_details, NOT_SPECIFIED);
        assert_eq!(record.region, NOT_SPECIFIED);
        assert_eq!(record.source_url, NOT_SPECIFIED);
    }

    #[test]
    fn test_block_without_labels_is_all_defaults() {
        let records = parse_corpus("1.\nJust some prose about schemes.\n");
        assert_eq!(records.len(), 1);
        assert!(records[0].values().iter().all(|v| *v == NOT_SPECIFIED));
    }

    #[test]
    fn test_whitespace_only_corpus() {
        assert!(parse_corpus("").is_empty());
        assert!(parse_corpus("1.\n   \n2.\n\t\n").is_empty());
    }

    #[test]
    fn test_text_before_first_delimiter_is_a_block() {
        let records = parse_corpus("scheme_name: Preface\n1.\nscheme_name: Next\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].scheme_name, "Preface");
    }

    #[test]
    fn test_labels_are_case_sensitive() {
        let records = parse_corpus("Scheme_Name: Upper\nbenefit: ok\n");
        assert_eq!(records[0].scheme_name, NOT_SPECIFIED);
        assert_eq!(records[0].benefit, "ok");
    }

    #[test]
    fn test_unrecognised_label_belongs_to_previous_field() {
        let records = parse_corpus("eligibility: Farmers\nnote: landholding under 2 acres\n");
        assert_eq!(
            records[0].eligibility,
            "Farmers\nnote: landholding under 2 acres"
        );
    }

    #[test]
    fn test_repeated_label_keeps_first_value() {
        let records = parse_corpus("region: Mysuru\nregion: Belagavi\n");
        assert_eq!(records[0].region, "Mysuru");
    }

    #[test]
    fn test_empty_value_is_empty_string() {
        let records = parse_corpus("scheme_name:\ncategory: Health\n");
        assert_eq!(records[0].scheme_name, "");
        assert_eq!(records[0].category, "Health");
    }

    #[test]
    fn test_delimiter_detection() {
        assert!(is_delimiter("12."));
        assert!(is_delimiter(" 3. \r"));
        assert!(!is_delimiter("."));
        assert!(!is_delimiter("1.5."));
        assert!(!is_delimiter("12. scheme"));
        assert!(!is_delimiter("a."));
    }

    #[test]
    fn test_field_lookup() {
        let records = parse_corpus(CORPUS);
        assert_eq!(records[0].field("region"), Some("Karnataka"));
        assert_eq!(records[0].field("unknown"), None);
    }

    #[test]
    fn test_render_contains_all_labels() {
        let rendered = parse_corpus(CORPUS)[1].render();
        for (_, label) in DISPLAY_LABELS {
            assert!(rendered.contains(&format!("**{}**:", label)));
        }
        assert!(rendered.contains("**Scheme Name**: Gruha Jyothi"));
        assert!(rendered.contains("**Region**: Not specified"));
    }

    #[test]
    fn test_to_unit_uses_scheme_name_as_source() {
        let unit = parse_corpus(CORPUS)[0].to_unit();
        assert_eq!(unit.source, "Sanjeevini");
        assert!(unit.text.contains("Sanjeevini"));
    }

    #[test]
    fn test_load_corpus_missing_file_is_config_error() {
        let temp = TempDir::new().unwrap();
        let result = load_corpus(&temp.path().join("schemes.txt"));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_load_corpus_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("schemes.txt");
        std::fs::write(&path, CORPUS).unwrap();
        assert_eq!(load_corpus(&path).unwrap().len(), 2);
    }
}

//! Keyword pre-filter deciding whether a query belongs to the scheme domain.

use civic_core::DomainSettings;

/// Case-insensitive substring match against a fixed keyword set.
///
/// Deliberately coarse: retrieval emptiness and answer confidence catch
/// what this lets through or turns away.
#[derive(Debug, Clone)]
pub struct RelevanceClassifier {
    keywords: Vec<String>,
}

impl RelevanceClassifier {
    /// Blank keywords are ignored; they would match every query.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Self {
        let keywords = keywords
            .iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        Self { keywords }
    }

    pub fn from_settings(settings: &DomainSettings) -> Self {
        Self::new(&settings.keywords)
    }

    pub fn is_in_domain(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.keywords.iter().any(|k| query.contains(k.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> RelevanceClassifier {
        RelevanceClassifier::from_settings(&DomainSettings::default())
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let classifier = classifier();
        assert!(classifier.is_in_domain("What is the eligibility for Sanjeevini?"));
        assert!(classifier.is_in_domain("KARNATAKA pension"));
        assert!(classifier.is_in_domain("nrlm loans"));
    }

    #[test]
    fn test_substring_match() {
        // "schemes" contains "scheme"
        assert!(classifier().is_in_domain("list all schemes"));
    }

    #[test]
    fn test_off_topic_query() {
        assert!(!classifier().is_in_domain("What's the weather in Paris?"));
        assert!(!classifier().is_in_domain(""));
    }

    #[test]
    fn test_blank_keywords_ignored() {
        let classifier = RelevanceClassifier::new(&["", "  ", "Yuva"]);
        assert!(!classifier.is_in_domain("anything at all"));
        assert!(classifier.is_in_domain("yuva nidhi"));
    }

    #[test]
    fn test_empty_keyword_set_matches_nothing() {
        let classifier = RelevanceClassifier::new::<String>(&[]);
        assert!(!classifier.is_in_domain("scheme"));
    }
}

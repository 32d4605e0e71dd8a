//! Contact details: name, email and phone

use crate::error::Result;
use crate::processing::document::Document;
use crate::processing::entities::{EntityLabel, EntityRecognizer};
use crate::processing::reference::ReferenceData;
use log::debug;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Phone shapes, most specific first so a long number is never cut short
const PHONE_PATTERNS: [&str; 6] = [
    r"\+?\d{1,3}[-.\s]?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}",
    r"\+?\d{1,3}[-.\s]?\d{2,4}[-.\s]?\d{3,4}[-.\s]?\d{3,4}",
    r"\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}",
    r"\d{3}[-.\s]?\d{3}[-.\s]?\d{4}",
    r"\d{10,11}",
    r"0\d{2}[-.\s]?\d{4}[-.\s]?\d{4}",
];

pub struct ContactExtractor {
    email_regex: Regex,
    phone_regexes: Vec<Regex>,
    whitespace_regex: Regex,
    names: NameExtractor,
}

impl ContactExtractor {
    pub fn new(names: NameExtractor) -> Result<Self> {
        let phone_regexes = PHONE_PATTERNS
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            email_regex: Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")?,
            phone_regexes,
            whitespace_regex: Regex::new(r"\s+")?,
            names,
        })
    }

    pub fn extract(&self, doc: &Document) -> ContactInfo {
        ContactInfo {
            name: self.names.extract(doc),
            email: self.extract_email(doc.text()),
            phone: self.extract_phone(doc.text()),
        }
    }

    pub fn extract_email(&self, text: &str) -> Option<String> {
        self.email_regex.find(text).map(|m| m.as_str().to_string())
    }

    pub fn extract_phone(&self, text: &str) -> Option<String> {
        self.phone_regexes.iter().find_map(|regex| {
            regex.find(text).map(|m| {
                self.whitespace_regex
                    .replace_all(m.as_str().trim(), " ")
                    .to_string()
            })
        })
    }
}

/// Patterns shared by every name strategy
pub struct NameRules {
    skip_patterns: Vec<Regex>,
    name_shape: Regex,
    section_keywords: Vec<String>,
}

impl NameRules {
    pub fn new(reference: &ReferenceData) -> Result<Self> {
        let skip_patterns = reference
            .name_skip_patterns
            .iter()
            .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            skip_patterns,
            name_shape: Regex::new(r"^[A-Za-z][A-Za-z\s.\-']+$")?,
            section_keywords: reference
                .section_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
        })
    }

    fn is_non_name_marker(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.skip_patterns.iter().any(|p| p.is_match(&lowered))
    }

    fn has_name_shape(&self, line: &str) -> bool {
        self.name_shape.is_match(line)
    }

    fn mentions_section(&self, line: &str) -> bool {
        let lowered = line.to_lowercase();
        self.section_keywords.iter().any(|k| lowered.contains(k.as_str()))
    }
}

/// One way of finding the candidate's name
pub trait NameStrategy: Send + Sync {
    fn label(&self) -> &'static str;
    fn extract(&self, doc: &Document) -> Option<String>;
}

/// Name-shaped line among the first few non-empty lines
pub struct HeaderLineStrategy {
    rules: Arc<NameRules>,
    max_lines: usize,
}

impl HeaderLineStrategy {
    pub fn new(rules: Arc<NameRules>, max_lines: usize) -> Self {
        Self { rules, max_lines }
    }
}

impl NameStrategy for HeaderLineStrategy {
    fn label(&self) -> &'static str {
        "header-line"
    }

    fn extract(&self, doc: &Document) -> Option<String> {
        let mut checked = 0;

        for line in doc.lines() {
            if checked >= self.max_lines {
                break;
            }

            let line = line.trim();
            if line.chars().count() < 3 {
                continue;
            }
            checked += 1;

            if self.rules.is_non_name_marker(line) {
                continue;
            }

            let words: Vec<&str> = line.split_whitespace().collect();
            if !(2..=5).contains(&words.len()) || line.chars().count() >= 50 {
                continue;
            }
            if !self.rules.has_name_shape(line) {
                continue;
            }
            // All-caps lines are usually headers unless short
            if !is_all_uppercase(line) || words.len() <= 3 {
                return Some(capitalize_words(&words));
            }
        }

        None
    }
}

/// First PERSON entity near the top of the document
pub struct EntityStrategy {
    rules: Arc<NameRules>,
    recognizer: Arc<dyn EntityRecognizer>,
    window_chars: usize,
}

impl EntityStrategy {
    pub fn new(rules: Arc<NameRules>, recognizer: Arc<dyn EntityRecognizer>, window_chars: usize) -> Self {
        Self {
            rules,
            recognizer,
            window_chars,
        }
    }
}

impl NameStrategy for EntityStrategy {
    fn label(&self) -> &'static str {
        "entity"
    }

    fn extract(&self, doc: &Document) -> Option<String> {
        self.recognizer
            .entities(doc.head(self.window_chars))
            .into_iter()
            .filter(|entity| entity.label == EntityLabel::Person)
            .map(|entity| entity.text.trim().to_string())
            .find(|name| {
                name.chars().count() >= 2
                    && !name.chars().any(|c| c.is_ascii_digit())
                    && name.chars().any(|c| c.is_alphanumeric() || c == '_')
                    && !self.rules.is_non_name_marker(name)
            })
    }
}

/// Looser scan of the opening lines, used when nothing else matched
pub struct RelaxedLineStrategy {
    rules: Arc<NameRules>,
    max_lines: usize,
}

impl RelaxedLineStrategy {
    pub fn new(rules: Arc<NameRules>, max_lines: usize) -> Self {
        Self { rules, max_lines }
    }
}

impl NameStrategy for RelaxedLineStrategy {
    fn label(&self) -> &'static str {
        "relaxed-line"
    }

    fn extract(&self, doc: &Document) -> Option<String> {
        doc.lines()
            .iter()
            .take(self.max_lines)
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .find_map(|line| {
                let words: Vec<&str> = line.split_whitespace().collect();
                let accepted = (2..=4).contains(&words.len())
                    && line.chars().count() < 40
                    && self.rules.has_name_shape(line)
                    && !self.rules.mentions_section(line);
                accepted.then(|| capitalize_words(&words))
            })
    }
}

/// Ordered name strategies; the first one to produce a name wins
pub struct NameExtractor {
    strategies: Vec<Box<dyn NameStrategy>>,
}

impl NameExtractor {
    pub fn new(strategies: Vec<Box<dyn NameStrategy>>) -> Self {
        Self { strategies }
    }

    /// Header scan, then entity recognition, then the relaxed scan
    pub fn standard(
        reference: &ReferenceData,
        recognizer: Arc<dyn EntityRecognizer>,
        header_lines: usize,
        relaxed_lines: usize,
        entity_window_chars: usize,
    ) -> Result<Self> {
        let rules = Arc::new(NameRules::new(reference)?);
        Ok(Self::new(vec![
            Box::new(HeaderLineStrategy::new(rules.clone(), header_lines)),
            Box::new(EntityStrategy::new(rules.clone(), recognizer, entity_window_chars)),
            Box::new(RelaxedLineStrategy::new(rules, relaxed_lines)),
        ]))
    }

    pub fn extract(&self, doc: &Document) -> Option<String> {
        for strategy in &self.strategies {
            if let Some(name) = strategy.extract(doc) {
                debug!("Name found by {} strategy: {}", strategy.label(), name);
                return Some(name);
            }
        }
        debug!("No name found");
        None
    }
}

/// True when the text has cased letters and none of them are lower-case
fn is_all_uppercase(text: &str) -> bool {
    let mut has_cased = false;
    for c in text.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// Title-case words written entirely in lower case; keep the rest as written
fn capitalize_words(words: &[&str]) -> String {
    words
        .iter()
        .map(|word| {
            let all_lower = word.chars().any(|c| c.is_lowercase()) && !word.chars().any(|c| c.is_uppercase());
            if all_lower {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::entities::{default_recognizer, Entity};

    fn extractor() -> ContactExtractor {
        let names = NameExtractor::standard(&ReferenceData::default(), default_recognizer(), 5, 10, 1500).unwrap();
        ContactExtractor::new(names).unwrap()
    }

    fn name_of(text: &str) -> Option<String> {
        extractor().extract(&Document::new(text)).name
    }

    #[test]
    fn test_email_extraction() {
        let contact = extractor();
        assert_eq!(
            contact.extract_email("Reach me: jane.doe+jobs@mail.example.org today"),
            Some("jane.doe+jobs@mail.example.org".to_string())
        );
        assert_eq!(contact.extract_email("no address here @ all"), None);
    }

    #[test]
    fn test_phone_formats() {
        let contact = extractor();
        assert_eq!(contact.extract_phone("Phone: 123-456-7890"), Some("123-456-7890".to_string()));
        assert_eq!(contact.extract_phone("Call +1 (555) 123-4567"), Some("+1 (555) 123-4567".to_string()));
        assert_eq!(contact.extract_phone("Mobile: 01712345678"), Some("01712345678".to_string()));
        assert_eq!(contact.extract_phone("no digits"), None);
    }

    #[test]
    fn test_phone_whitespace_collapsed() {
        let contact = extractor();
        assert_eq!(contact.extract_phone("Tel: 555\t123\t4567"), Some("555 123 4567".to_string()));
    }

    #[test]
    fn test_name_from_first_line() {
        assert_eq!(name_of("Jane Doe\njane@x.com\nEngineer"), Some("Jane Doe".to_string()));
    }

    #[test]
    fn test_name_is_title_cased() {
        assert_eq!(name_of("john o'neil smith\nDeveloper"), Some("John O'neil Smith".to_string()));
    }

    #[test]
    fn test_header_lines_are_skipped() {
        let text = "Resume\n+1 555 123 4567\njane@x.com\nMARY ANN LEE\nSummary";
        assert_eq!(name_of(text), Some("MARY ANN LEE".to_string()));
    }

    #[test]
    fn test_long_uppercase_line_rejected_by_header_pass() {
        let rules = Arc::new(NameRules::new(&ReferenceData::default()).unwrap());
        let strategy = HeaderLineStrategy::new(rules, 5);
        let doc = Document::new("SENIOR STAFF SOFTWARE ENGINEER II\nxx");
        assert_eq!(strategy.extract(&doc), None);
    }

    #[test]
    fn test_entity_strategy_used_when_no_header_line() {
        let text = "Curriculum Vitae\nPrepared for review by Ada Lovelace, 2024\nObjective: build things";
        assert_eq!(name_of(text), Some("Ada Lovelace".to_string()));
    }

    struct NoEntities;

    impl EntityRecognizer for NoEntities {
        fn entities(&self, _text: &str) -> Vec<Entity> {
            Vec::new()
        }
    }

    #[test]
    fn test_relaxed_strategy_is_last_resort() {
        let names = NameExtractor::standard(&ReferenceData::default(), Arc::new(NoEntities), 1, 10, 1500).unwrap();
        // The header pass only sees the first line, which is a section marker
        let doc = Document::new("Summary\nalan turing\nWork history");
        assert_eq!(names.extract(&doc), Some("Alan Turing".to_string()));
    }

    #[test]
    fn test_no_name_found() {
        assert_eq!(name_of("12345\n@@@\n"), None);
    }

    #[test]
    fn test_capitalize_words() {
        assert_eq!(capitalize_words(&["jane", "McDonald", "DOE"]), "Jane McDonald DOE");
    }

    #[test]
    fn test_is_all_uppercase() {
        assert!(is_all_uppercase("JANE DOE"));
        assert!(!is_all_uppercase("Jane DOE"));
        assert!(!is_all_uppercase("123"));
    }
}

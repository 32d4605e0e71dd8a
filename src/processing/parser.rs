//! Runs every extractor over one document and assembles the parsed record

use crate::config::ExtractionConfig;
use crate::error::Result;
use crate::processing::contact::{ContactExtractor, ContactInfo, NameExtractor};
use crate::processing::document::Document;
use crate::processing::education::EducationExtractor;
use crate::processing::entities::{default_recognizer, EntityRecognizer};
use crate::processing::experience::{ExperienceSegment, TimelineExtractor};
use crate::processing::reference::ReferenceData;
use crate::processing::skills::SkillMatcher;
use chrono::{Local, NaiveDate};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    #[serde(flatten)]
    pub contact: ContactInfo,
    pub skills: Vec<String>,
    pub education: Vec<String>,
    pub experience_years: f64,
    pub experience_breakdown: Vec<ExperienceSegment>,
}

/// Compiled extractors. Building one validates the reference tables; parsing never fails.
pub struct ResumeParser {
    contact: ContactExtractor,
    skills: SkillMatcher,
    education: EducationExtractor,
    timeline: TimelineExtractor,
}

impl ResumeParser {
    pub fn new(config: &ExtractionConfig, reference: &ReferenceData) -> Result<Self> {
        Self::with_recognizer(config, reference, default_recognizer())
    }

    pub fn with_recognizer(
        config: &ExtractionConfig,
        reference: &ReferenceData,
        recognizer: Arc<dyn EntityRecognizer>,
    ) -> Result<Self> {
        reference.validate()?;

        let names = NameExtractor::standard(
            reference,
            recognizer,
            config.name_header_lines,
            config.name_relaxed_lines,
            config.entity_window_chars,
        )?;

        Ok(Self {
            contact: ContactExtractor::new(names)?,
            skills: SkillMatcher::new(reference, config.max_skills)?,
            education: EducationExtractor::new(reference, config.max_education_entries)?,
            timeline: TimelineExtractor::new(reference, config.title_context_radius, config.max_title_chars)?,
        })
    }

    pub fn parse(&self, text: &str) -> ParsedResume {
        self.parse_document(&Document::new(text))
    }

    pub fn parse_document(&self, doc: &Document) -> ParsedResume {
        self.parse_document_at(doc, Local::now().date_naive())
    }

    /// Parse with a fixed "today" so open-ended ranges are reproducible
    pub fn parse_document_at(&self, doc: &Document, today: NaiveDate) -> ParsedResume {
        let contact = self.contact.extract(doc);
        let skills = self.skills.extract(doc);
        let education = self.education.extract(doc);
        let experience = self.timeline.extract_at(doc, today);

        info!(
            "Parsed document ({} lines): {} skills, {} education entries, {} roles, {:.1} years",
            doc.metadata.line_count,
            skills.len(),
            education.len(),
            experience.breakdown.len(),
            experience.total_years
        );

        ParsedResume {
            contact,
            skills,
            education,
            experience_years: experience.total_years,
            experience_breakdown: experience.breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO_A: &str =
        "Jane Doe\njane.doe@email.com\n123-456-7890\nSoftware Engineer\nJan 2019 - Present\nPython, React, AWS";

    fn parser() -> ResumeParser {
        ResumeParser::new(&ExtractionConfig::default(), &ReferenceData::default()).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_full_record() {
        let parsed = parser().parse_document_at(&Document::new(SCENARIO_A), today());

        assert_eq!(parsed.contact.name.as_deref(), Some("Jane Doe"));
        assert_eq!(parsed.contact.email.as_deref(), Some("jane.doe@email.com"));
        assert_eq!(parsed.contact.phone.as_deref(), Some("123-456-7890"));
        assert_eq!(parsed.skills, vec!["Python", "React", "AWS"]);
        assert!(parsed.education.is_empty());
        assert_eq!(parsed.experience_breakdown.len(), 1);
        assert!(parsed.experience_breakdown[0].title.contains("Engineer"));
        assert_eq!(parsed.experience_breakdown[0].end, "present");
        assert_eq!(parsed.experience_years, 7.8);
    }

    #[test]
    fn test_sparse_input_degrades_gracefully() {
        let parsed = parser().parse("???");
        assert_eq!(parsed, ParsedResume::default());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let parser = parser();
        let doc = Document::new(SCENARIO_A);
        assert_eq!(parser.parse_document_at(&doc, today()), parser.parse_document_at(&doc, today()));
    }

    #[test]
    fn test_invalid_reference_pattern_fails_at_construction() {
        let reference = ReferenceData {
            degree_patterns: vec!["(unclosed".to_string()],
            ..ReferenceData::default()
        };
        let result = ResumeParser::new(&ExtractionConfig::default(), &reference);
        assert!(matches!(result, Err(crate::error::ResumeExtractorError::Configuration(_))));
    }

    #[test]
    fn test_contact_fields_flatten_in_json() {
        let parsed = parser().parse_document_at(&Document::new(SCENARIO_A), today());
        let json = serde_json::to_value(&parsed).unwrap();
        assert_eq!(json["name"], "Jane Doe");
        assert_eq!(json["experience_breakdown"][0]["end"], "present");
    }
}

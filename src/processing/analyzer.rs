//! Analysis engine: validation, parsing, classification and the experience split

use crate::config::Config;
use crate::error::{Result, ResumeExtractorError};
use crate::processing::classifier::{Classification, Classifier, KeywordClassifier};
use crate::processing::document::Document;
use crate::processing::parser::{ParsedResume, ResumeParser};
use crate::processing::relevance::{Attribution, ExperienceLevel, RelevanceSplitter};
use chrono::{Local, NaiveDate};
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Final result for one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(flatten)]
    pub resume: ParsedResume,
    #[serde(rename = "relevant_experience_years")]
    pub relevant_years: f64,
    #[serde(rename = "other_experience_years")]
    pub other_years: f64,
    pub experience_attribution: Attribution,
    pub experience_level: ExperienceLevel,
    pub classification: String,
    pub confidence: f64,
}

/// Owns the compiled parser and the classifier; holds no per-document state
pub struct AnalysisEngine {
    parser: ResumeParser,
    splitter: RelevanceSplitter,
    classifier: Arc<dyn Classifier>,
    min_text_chars: usize,
}

impl AnalysisEngine {
    /// Engine using the keyword classifier over the configured reference tables
    pub fn new(config: &Config) -> Result<Self> {
        let reference = config.reference_data()?;
        let classifier = Arc::new(KeywordClassifier::new(&reference));
        Self::with_classifier(config, classifier)
    }

    pub fn with_classifier(config: &Config, classifier: Arc<dyn Classifier>) -> Result<Self> {
        let reference = config.reference_data()?;
        let parser = ResumeParser::new(&config.extraction, &reference)?;

        Ok(Self {
            parser,
            splitter: RelevanceSplitter::new(reference),
            classifier,
            min_text_chars: config.extraction.min_text_chars,
        })
    }

    pub fn analyze(&self, text: &str) -> Result<AnalysisResult> {
        self.analyze_at(text, Local::now().date_naive())
    }

    /// Analyze with a fixed "today" for open-ended date ranges
    pub fn analyze_at(&self, text: &str, today: NaiveDate) -> Result<AnalysisResult> {
        let start_time = Instant::now();

        let text = text.trim();
        if text.chars().count() < self.min_text_chars {
            return Err(ResumeExtractorError::InvalidInput(format!(
                "Resume content is too short or empty ({} characters, at least {} required)",
                text.chars().count(),
                self.min_text_chars
            )));
        }

        let document = Document::new(text);
        let resume = self.parser.parse_document_at(&document, today);
        let Classification { category, confidence } = self.classifier.classify(text)?;
        let split = self.splitter.split(&category, &resume);
        let experience_level = split.level();

        info!(
            "Analysis completed in {}ms: {} ({:.0}% confidence), {} level",
            start_time.elapsed().as_millis(),
            category,
            confidence * 100.0,
            experience_level
        );

        Ok(AnalysisResult {
            resume,
            relevant_years: split.relevant_years,
            other_years: split.other_years,
            experience_attribution: split.attribution,
            experience_level,
            classification: category,
            confidence,
        })
    }

    /// Analyze independent documents concurrently; results keep input order
    pub async fn analyze_batch(self: Arc<Self>, texts: Vec<String>) -> Vec<Result<AnalysisResult>> {
        let handles: Vec<_> = texts
            .into_iter()
            .map(|text| {
                let engine = Arc::clone(&self);
                tokio::task::spawn_blocking(move || engine.analyze(&text))
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            let result = handle
                .await
                .unwrap_or_else(|e| Err(ResumeExtractorError::AnalysisFailed(format!("Worker task failed: {}", e))));
            results.push(result);
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::classifier::FixedClassifier;

    const RESUME: &str = "Jane Doe\njane.doe@email.com\n123-456-7890\n\nWeb Developer\n2018 - 2021\n\nData Analyst\n2021 - 2023\n\nSkills: Python, React, AWS";

    fn engine(category: &str) -> AnalysisEngine {
        let classifier = Arc::new(FixedClassifier::new(category, 0.85).unwrap());
        AnalysisEngine::with_classifier(&Config::default(), classifier).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_short_input_rejected() {
        let result = engine("Web Developer").analyze("   Jane Doe, engineer   ");
        assert!(matches!(result, Err(ResumeExtractorError::InvalidInput(_))));
    }

    #[test]
    fn test_relevant_split_and_level() {
        let result = engine("Web Developer").analyze_at(RESUME, today()).unwrap();

        assert_eq!(result.resume.contact.name.as_deref(), Some("Jane Doe"));
        assert_eq!(result.resume.experience_years, 5.0);
        assert_eq!(result.relevant_years, 3.0);
        assert_eq!(result.other_years, 2.0);
        assert_eq!(result.experience_attribution, Attribution::Timeline);
        assert_eq!(result.experience_level, ExperienceLevel::Mid);
        assert_eq!(result.classification, "Web Developer");
        assert_eq!(result.confidence, 0.85);
    }

    #[test]
    fn test_json_field_names() {
        let result = engine("Web Developer").analyze_at(RESUME, today()).unwrap();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["email"], "jane.doe@email.com");
        assert_eq!(json["relevant_experience_years"], 3.0);
        assert_eq!(json["other_experience_years"], 2.0);
        assert_eq!(json["experience_level"], "Mid");
        assert_eq!(json["experience_attribution"], "timeline");
        assert_eq!(json["classification"], "Web Developer");
    }

    #[test]
    fn test_idempotent() {
        let engine = engine("Data Scientist");
        assert_eq!(
            engine.analyze_at(RESUME, today()).unwrap(),
            engine.analyze_at(RESUME, today()).unwrap()
        );
    }

    #[tokio::test]
    async fn test_batch_keeps_order_and_isolates_failures() {
        let engine = Arc::new(engine("Web Developer"));
        let results = engine
            .analyze_batch(vec![RESUME.to_string(), "too short".to_string(), RESUME.to_string()])
            .await;

        assert_eq!(results.len(), 3);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ResumeExtractorError::InvalidInput(_))));
        assert_eq!(results[2].as_ref().unwrap().relevant_years, 3.0);
    }
}

//! Report structure wrapping one analysis result for rendering

use crate::processing::analyzer::AnalysisResult;
use crate::processing::relevance::Attribution;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub summary: ReportSummary,
    pub metadata: ReportMetadata,
    pub result: AnalysisResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    /// One-line description of the candidate
    pub headline: String,
    pub fields_found: Vec<String>,
    pub fields_missing: Vec<String>,
    /// Caveat shown when the relevance split is an approximation
    pub attribution_note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub extractor_version: String,
    pub source_file: Option<String>,
    pub processing_time_ms: u64,
}

impl ExtractionReport {
    pub fn from_analysis(result: AnalysisResult, source_file: Option<String>, processing_time_ms: u64) -> Self {
        Self {
            summary: Self::create_summary(&result),
            metadata: ReportMetadata {
                generated_at: Utc::now(),
                extractor_version: env!("CARGO_PKG_VERSION").to_string(),
                source_file,
                processing_time_ms,
            },
            result,
        }
    }

    fn create_summary(result: &AnalysisResult) -> ReportSummary {
        let resume = &result.resume;
        let name = resume.contact.name.as_deref().unwrap_or("Unnamed candidate");
        let headline = format!(
            "{}: {} level {} ({:.1} relevant of {:.1} total years)",
            name, result.experience_level, result.classification, result.relevant_years, resume.experience_years
        );

        let checks = [
            ("name", resume.contact.name.is_some()),
            ("email", resume.contact.email.is_some()),
            ("phone", resume.contact.phone.is_some()),
            ("skills", !resume.skills.is_empty()),
            ("education", !resume.education.is_empty()),
            ("experience", resume.experience_years > 0.0),
        ];
        let (found, missing): (Vec<_>, Vec<_>) = checks.iter().partition(|(_, present)| *present);

        let attribution_note = match result.experience_attribution {
            Attribution::Assumed => Some(
                "No dated roles were found; all stated experience is counted as relevant".to_string(),
            ),
            Attribution::Timeline | Attribution::None => None,
        };

        ReportSummary {
            headline,
            fields_found: found.iter().map(|(field, _)| field.to_string()).collect(),
            fields_missing: missing.iter().map(|(field, _)| field.to_string()).collect(),
            attribution_note,
        }
    }
}

//! Relevant vs other experience for a job category, and the level derived from it

use crate::processing::experience::{months_to_years, round_tenth, ExperienceSegment};
use crate::processing::parser::ParsedResume;
use crate::processing::reference::ReferenceData;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Junior,
    Mid,
    Senior,
}

impl ExperienceLevel {
    pub fn from_years(years: f64) -> Self {
        if years < 2.0 {
            ExperienceLevel::Junior
        } else if years < 5.0 {
            ExperienceLevel::Mid
        } else {
            ExperienceLevel::Senior
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExperienceLevel::Junior => "Junior",
            ExperienceLevel::Mid => "Mid",
            ExperienceLevel::Senior => "Senior",
        };
        write!(f, "{}", label)
    }
}

/// How the relevant/other split was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribution {
    /// Per-segment keyword match over the breakdown
    Timeline,
    /// No breakdown; the stated total was counted as relevant
    Assumed,
    /// No experience found
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceSplit {
    pub relevant_years: f64,
    pub other_years: f64,
    pub attribution: Attribution,
}

impl ExperienceSplit {
    pub fn level(&self) -> ExperienceLevel {
        ExperienceLevel::from_years(self.relevant_years)
    }
}

pub struct RelevanceSplitter {
    reference: ReferenceData,
}

impl RelevanceSplitter {
    pub fn new(reference: ReferenceData) -> Self {
        Self { reference }
    }

    pub fn split(&self, category: &str, parsed: &ParsedResume) -> ExperienceSplit {
        let keywords = self.reference.keywords_for_category(category);
        let split = split_segments(&keywords, &parsed.experience_breakdown, parsed.experience_years);

        debug!(
            "Category '{}': {} relevant, {} other years ({:?})",
            category, split.relevant_years, split.other_years, split.attribution
        );
        split
    }
}

/// Bucket segments by keyword substring match on the lower-cased title.
///
/// Buckets are summed in whole months and rounded once, and "other" is the
/// remainder of the rounded total, so `relevant + other` equals the total.
pub fn split_segments(keywords: &[String], breakdown: &[ExperienceSegment], total_years: f64) -> ExperienceSplit {
    if breakdown.is_empty() {
        let attribution = if total_years > 0.0 {
            Attribution::Assumed
        } else {
            Attribution::None
        };
        return ExperienceSplit {
            relevant_years: total_years,
            other_years: 0.0,
            attribution,
        };
    }

    let (relevant_months, total_months) = breakdown.iter().fold((0u32, 0u32), |(relevant, total), segment| {
        let title = segment.title.to_lowercase();
        if keywords.iter().any(|k| title.contains(k.as_str())) {
            (relevant + segment.months, total + segment.months)
        } else {
            (relevant, total + segment.months)
        }
    });

    let relevant_years = months_to_years(relevant_months);
    let other_years = round_tenth(months_to_years(total_months) - relevant_years).max(0.0);

    ExperienceSplit {
        relevant_years,
        other_years,
        attribution: Attribution::Timeline,
    }
}

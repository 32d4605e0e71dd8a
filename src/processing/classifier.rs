//! Job-category classification seam

use crate::error::{Result, ResumeExtractorError};
use crate::processing::reference::ReferenceData;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation;

pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub category: String,
    pub confidence: f64,
}

impl Classification {
    pub fn new(category: impl Into<String>, confidence: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(ResumeExtractorError::Classification(format!(
                "Confidence must be within [0, 1], got {}",
                confidence
            )));
        }
        Ok(Self {
            category: category.into(),
            confidence,
        })
    }

    pub fn unknown() -> Self {
        Self {
            category: UNKNOWN_CATEGORY.to_string(),
            confidence: 0.0,
        }
    }
}

pub trait Classifier: Send + Sync {
    fn classify(&self, text: &str) -> Result<Classification>;
}

/// Returns a label decided elsewhere, e.g. by an upstream service or a CLI flag
pub struct FixedClassifier {
    classification: Classification,
}

impl FixedClassifier {
    pub fn new(category: impl Into<String>, confidence: f64) -> Result<Self> {
        Ok(Self {
            classification: Classification::new(category, confidence)?,
        })
    }
}

impl Classifier for FixedClassifier {
    fn classify(&self, _text: &str) -> Result<Classification> {
        Ok(self.classification.clone())
    }
}

/// Scores every known category by relevance-keyword hits in the text.
///
/// Single-word keywords are counted against word tokens, multi-word keywords
/// against the lower-cased text. Confidence is the winner's share of all hits.
pub struct KeywordClassifier {
    categories: Vec<(String, Vec<String>)>,
}

impl KeywordClassifier {
    pub fn new(reference: &ReferenceData) -> Self {
        let categories = reference
            .category_keywords
            .iter()
            .map(|(category, keywords)| {
                (category.clone(), keywords.iter().map(|k| k.to_lowercase()).collect())
            })
            .collect();
        Self { categories }
    }
}

impl Classifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Result<Classification> {
        let lowered = text.to_lowercase();

        let mut token_counts: HashMap<&str, usize> = HashMap::new();
        for word in lowered.unicode_words() {
            *token_counts.entry(word).or_insert(0) += 1;
        }

        let scores: Vec<(&str, usize)> = self
            .categories
            .iter()
            .map(|(category, keywords)| {
                let hits = keywords
                    .iter()
                    .map(|keyword| {
                        if keyword.contains(|c: char| !c.is_alphanumeric()) {
                            lowered.matches(keyword.as_str()).count()
                        } else {
                            token_counts.get(keyword.as_str()).copied().unwrap_or(0)
                        }
                    })
                    .sum();
                (category.as_str(), hits)
            })
            .collect();

        let total: usize = scores.iter().map(|(_, hits)| hits).sum();
        // First maximum wins so ties resolve in table order
        let best = scores
            .iter()
            .fold(None::<(&str, usize)>, |best, &(category, hits)| match best {
                Some((_, top)) if top >= hits => best,
                _ => Some((category, hits)),
            });

        match best {
            Some((category, hits)) if hits > 0 => {
                let confidence = hits as f64 / total as f64;
                debug!("Classified as '{}' ({} of {} keyword hits)", category, hits, total);
                Classification::new(category, confidence)
            }
            _ => {
                debug!("No category keywords found");
                Ok(Classification::unknown())
            }
        }
    }
}

//! Named-entity recognition used by the name extractor.
//!
//! The extractor only needs PERSON spans, so the recognizer is a trait. With
//! the `ner-model` feature the shared recognizer is a BERT token classifier
//! (see `ner_model`); without it, or when the model cannot be loaded, a
//! capitalized-span recognizer is used.

use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};
use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityLabel {
    Person,
    Organization,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    pub label: EntityLabel,
    pub start: usize,
    pub end: usize,
}

/// Read-only recognizer, shared across threads once loaded
pub trait EntityRecognizer: Send + Sync {
    fn entities(&self, text: &str) -> Vec<Entity>;
}

/// Tags runs of capitalized words: organization runs by suffix, the rest of
/// the 2-4 word runs as people.
pub struct CapitalizedSpanRecognizer {
    organization_suffixes: HashSet<&'static str>,
    non_person_words: HashSet<&'static str>,
}

impl Default for CapitalizedSpanRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl CapitalizedSpanRecognizer {
    pub fn new() -> Self {
        let organization_suffixes = [
            "university", "college", "institute", "school", "academy", "inc", "ltd", "llc",
            "corp", "corporation", "company", "technologies", "solutions", "labs", "group",
            "bank", "limited", "systems", "services", "foundation",
        ]
        .into_iter()
        .collect();

        let non_person_words = [
            "resume", "curriculum", "vitae", "profile", "summary", "objective", "contact",
            "experience", "education", "skills", "projects", "work", "professional", "email",
            "phone", "address", "linkedin", "github", "portfolio", "website", "software",
            "engineer", "developer", "manager", "senior", "junior", "lead", "data", "scientist",
            "analyst", "present", "january", "february", "march", "april", "may", "june", "july",
            "august", "september", "october", "november", "december", "street", "road", "avenue",
            "city", "the", "and", "of", "at", "in", "for", "with",
        ]
        .into_iter()
        .collect();

        Self {
            organization_suffixes,
            non_person_words,
        }
    }

    fn is_capitalized(word: &str) -> bool {
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => first.is_uppercase() && word.chars().all(|c| c.is_alphabetic() || c == '\'' || c == '-'),
            None => false,
        }
    }

    fn classify_run(&self, words: &[&str]) -> EntityLabel {
        let lowered: Vec<String> = words.iter().map(|w| w.to_lowercase()).collect();
        if lowered.iter().any(|w| self.organization_suffixes.contains(w.as_str())) {
            return EntityLabel::Organization;
        }
        if (2..=4).contains(&words.len())
            && !lowered.iter().any(|w| self.non_person_words.contains(w.as_str()))
        {
            return EntityLabel::Person;
        }
        EntityLabel::Other
    }

    fn flush(&self, text: &str, run: &mut Vec<(usize, &str)>, entities: &mut Vec<Entity>) {
        if run.is_empty() {
            return;
        }
        let words: Vec<&str> = run.iter().map(|(_, w)| *w).collect();
        let label = self.classify_run(&words);
        if label != EntityLabel::Other {
            let (start, _) = run[0];
            let (last_start, last_word) = run[run.len() - 1];
            let end = last_start + last_word.len();
            entities.push(Entity {
                text: text[start..end].to_string(),
                label,
                start,
                end,
            });
        }
        run.clear();
    }
}

impl EntityRecognizer for CapitalizedSpanRecognizer {
    fn entities(&self, text: &str) -> Vec<Entity> {
        let mut entities = Vec::new();

        // Runs never cross a line break
        let mut line_offset = 0;
        for line in text.split('\n') {
            let mut run: Vec<(usize, &str)> = Vec::new();
            let mut last_end = 0;

            for (idx, word) in line.unicode_word_indices() {
                let gap = &line[last_end..idx];
                // Punctuation other than spacing between words ends a run
                let breaks_run = gap.chars().any(|c| !c.is_whitespace() && c != '.');
                if breaks_run || !Self::is_capitalized(word) {
                    self.flush(text, &mut run, &mut entities);
                }
                if Self::is_capitalized(word) {
                    run.push((line_offset + idx, word));
                }
                last_end = idx + word.len();
            }
            self.flush(text, &mut run, &mut entities);

            line_offset += line.len() + 1;
        }

        entities
    }
}

/// Group per-token BIO tags ("B-PER", "I-ORG", "O") into entity spans.
///
/// `offsets` are byte ranges into `text`; empty ranges (special tokens) are
/// skipped. A word piece that starts where the previous token ended belongs
/// to the open span whatever its own tag.
pub fn bio_spans(text: &str, offsets: &[(usize, usize)], tags: &[&str]) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut open: Option<(EntityLabel, usize, usize)> = None;
    let mut last_end: Option<usize> = None;

    let close = |open: &mut Option<(EntityLabel, usize, usize)>, entities: &mut Vec<Entity>| {
        if let Some((label, start, end)) = open.take() {
            if let Some(span) = text.get(start..end) {
                entities.push(Entity {
                    text: span.to_string(),
                    label,
                    start,
                    end,
                });
            }
        }
    };

    for (&(start, end), &tag) in offsets.iter().zip(tags) {
        if start >= end {
            continue;
        }
        let continues_word = last_end == Some(start);
        last_end = Some(end);

        if continues_word {
            if let Some((_, _, open_end)) = open.as_mut() {
                *open_end = end;
                continue;
            }
        }

        if tag == "O" {
            close(&mut open, &mut entities);
            continue;
        }

        let (position, kind) = tag.split_once('-').unwrap_or(("I", tag));
        let label = match kind {
            "PER" => EntityLabel::Person,
            "ORG" => EntityLabel::Organization,
            _ => EntityLabel::Other,
        };

        let extends_open = matches!(open, Some((open_label, _, _)) if position == "I" && open_label == label);
        if extends_open {
            if let Some((_, _, open_end)) = open.as_mut() {
                *open_end = end;
            }
        } else {
            close(&mut open, &mut entities);
            open = Some((label, start, end));
        }
    }
    close(&mut open, &mut entities);

    entities
}

static DEFAULT_RECOGNIZER: OnceLock<Arc<dyn EntityRecognizer>> = OnceLock::new();

/// Process-wide recognizer, constructed at most once on first use
pub fn default_recognizer() -> Arc<dyn EntityRecognizer> {
    DEFAULT_RECOGNIZER.get_or_init(load_default_recognizer).clone()
}

#[cfg(feature = "ner-model")]
fn load_default_recognizer() -> Arc<dyn EntityRecognizer> {
    match crate::processing::ner_model::BertEntityRecognizer::from_env() {
        Ok(model) => {
            info!("Entity model loaded for name detection");
            Arc::new(model)
        }
        Err(e) => {
            log::warn!("Entity model unavailable, using capitalized spans: {}", e);
            Arc::new(CapitalizedSpanRecognizer::new())
        }
    }
}

#[cfg(not(feature = "ner-model"))]
fn load_default_recognizer() -> Arc<dyn EntityRecognizer> {
    info!("Built without the entity model, using capitalized spans for names");
    Arc::new(CapitalizedSpanRecognizer::new())
}

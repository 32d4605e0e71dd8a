//! Education entries: degree lines merged with nearby date or institution lines

use crate::error::Result;
use crate::processing::document::Document;
use crate::processing::reference::ReferenceData;
use log::debug;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

const MAX_ENTRY_CHARS: usize = 400;
const MAX_DATE_LINE_CHARS: usize = 30;
const MAX_INSTITUTION_LINE_CHARS: usize = 100;
const MIN_REPEATED_CHARS: usize = 5;

pub struct EducationExtractor {
    degree_regex: Regex,
    strong_degree_regex: Regex,
    role_filters: Vec<Regex>,
    institution_regex: Regex,
    date_line_regex: Regex,
    max_entries: usize,
}

fn case_insensitive(pattern: &str) -> std::result::Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

impl EducationExtractor {
    pub fn new(reference: &ReferenceData, max_entries: usize) -> Result<Self> {
        let degree_pattern = reference
            .degree_patterns
            .iter()
            .map(|p| format!("(?:{})", p))
            .collect::<Vec<_>>()
            .join("|");

        let role_filters = reference
            .role_filter_patterns
            .iter()
            .map(|p| case_insensitive(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            degree_regex: case_insensitive(&degree_pattern)?,
            strong_degree_regex: case_insensitive(&reference.strong_degree_pattern)?,
            role_filters,
            institution_regex: case_insensitive(&reference.institution_pattern)?,
            date_line_regex: case_insensitive(&reference.date_line_pattern)?,
            max_entries,
        })
    }

    pub fn extract(&self, doc: &Document) -> Vec<String> {
        let entries = dedupe(self.candidates(doc), self.max_entries);
        debug!("Found {} education entries", entries.len());
        entries
    }

    /// Line-local pass: accept degree lines and merge neighbouring context
    pub fn candidates(&self, doc: &Document) -> Vec<String> {
        let lines = doc.lines();
        let mut consumed: HashSet<usize> = HashSet::new();
        let mut candidates = Vec::new();

        for (idx, raw) in lines.iter().enumerate() {
            if consumed.contains(&idx) {
                continue;
            }

            let line = raw.trim();
            if line.is_empty() || !self.is_education_line(line) {
                continue;
            }

            let line = collapse_repeated(line);
            if !self.degree_regex.is_match(line) {
                continue;
            }

            let mut entry = line.to_string();

            if idx > 0 {
                let previous = lines[idx - 1].trim();
                if self.is_context_line(previous) {
                    entry = format!("{} {}", previous, entry);
                }
            }

            if idx + 1 < lines.len() && !consumed.contains(&(idx + 1)) {
                let next = collapse_repeated(lines[idx + 1].trim());
                if self.is_context_line(next) {
                    entry = format!("{} {}", entry, next);
                    consumed.insert(idx + 1);
                }
            }

            if entry.chars().count() < MAX_ENTRY_CHARS {
                candidates.push(entry);
            }
        }

        candidates
    }

    /// Rejects contact lines, bare keywords, labelled fields and work-history lines
    fn is_education_line(&self, line: &str) -> bool {
        if line.contains('@') || line.contains("http") || line.contains("www.") || line.contains(".com") {
            return false;
        }

        if line.split_whitespace().count() == 1
            && self.degree_regex.find(line).is_some_and(|m| m.start() == 0)
        {
            return false;
        }

        if line.contains(':') && !(line.contains("GPA") || line.contains("Grade")) {
            return false;
        }

        let looks_like_role = self.role_filters.iter().any(|r| r.is_match(line));
        if looks_like_role && !self.strong_degree_regex.is_match(line) {
            return false;
        }

        true
    }

    /// Short date lines and institution lines, excluding project descriptions
    fn is_context_line(&self, line: &str) -> bool {
        if line.is_empty() || line.to_lowercase().contains("project") {
            return false;
        }
        let chars = line.chars().count();
        let is_date = chars < MAX_DATE_LINE_CHARS && self.date_line_regex.is_match(line);
        let is_institution = chars < MAX_INSTITUTION_LINE_CHARS && self.institution_regex.is_match(line);
        is_date || is_institution
    }
}

/// Global pass: case-insensitive dedup, drop entries contained in longer ones, cap
pub fn dedupe(candidates: Vec<String>, max_entries: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unique: Vec<String> = candidates
        .into_iter()
        .filter(|entry| seen.insert(entry.to_lowercase()))
        .collect();

    // Longest first so containment is always checked against longer kept entries
    unique.sort_by_key(|entry| std::cmp::Reverse(entry.chars().count()));

    let mut kept: Vec<String> = Vec::new();
    for entry in unique {
        let lowered = entry.to_lowercase();
        if !kept.iter().any(|k| k.to_lowercase().contains(&lowered)) {
            kept.push(entry);
        }
    }

    kept.truncate(max_entries);
    kept
}

/// "X X" becomes "X" when X is long enough to not be a coincidence
fn collapse_repeated(line: &str) -> &str {
    let mut search_from = 0;
    while let Some(offset) = line[search_from..].find(char::is_whitespace) {
        let ws_start = search_from + offset;
        let ws_end = line[ws_start..]
            .find(|c: char| !c.is_whitespace())
            .map_or(line.len(), |o| ws_start + o);

        let (left, right) = (&line[..ws_start], &line[ws_end..]);
        if !left.is_empty() && left.to_lowercase() == right.to_lowercase() {
            if left.chars().count() > MIN_REPEATED_CHARS {
                return left.trim();
            }
            return line;
        }

        if ws_end >= line.len() {
            break;
        }
        search_from = ws_end;
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> EducationExtractor {
        EducationExtractor::new(&ReferenceData::default(), 5).unwrap()
    }

    fn education_of(text: &str) -> Vec<String> {
        extractor().extract(&Document::new(text))
    }

    #[test]
    fn test_degree_merged_with_institution() {
        let found = education_of("EDUCATION\nB.Sc Computer Science\nNorth South University\n");
        assert_eq!(found, vec!["B.Sc Computer Science North South University"]);
    }

    #[test]
    fn test_contained_entry_dropped() {
        let kept = dedupe(
            vec![
                "North South University".to_string(),
                "B.Sc Computer Science North South University".to_string(),
            ],
            5,
        );
        assert_eq!(kept, vec!["B.Sc Computer Science North South University"]);
    }

    #[test]
    fn test_case_insensitive_duplicates_dropped() {
        let kept = dedupe(vec!["MBA, Harvard".to_string(), "mba, harvard".to_string()], 5);
        assert_eq!(kept, vec!["MBA, Harvard"]);
    }

    #[test]
    fn test_cap_applies() {
        let entries: Vec<String> = (0..8).map(|i| format!("Diploma number {}", i)).collect();
        assert_eq!(dedupe(entries, 5).len(), 5);
    }

    #[test]
    fn test_previous_date_line_merged() {
        let found = education_of("2016 - 2020\nBachelor of Science in Physics\n\nSkills");
        assert_eq!(found, vec!["2016 - 2020 Bachelor of Science in Physics"]);
    }

    #[test]
    fn test_role_lines_rejected_without_strong_degree() {
        let found = education_of("Certificate of appreciation as project volunteer");
        assert!(found.is_empty());

        let kept = education_of("Master of Engineering, research track");
        assert_eq!(kept, vec!["Master of Engineering, research track"]);
    }

    #[test]
    fn test_contact_and_label_lines_rejected() {
        assert!(education_of("Diploma holder: see www.example.com").is_empty());
        assert!(education_of("Degree: Bachelor of Arts").is_empty());
        assert_eq!(
            education_of("Bachelor of Arts, GPA: 3.8"),
            vec!["Bachelor of Arts, GPA: 3.8"]
        );
    }

    #[test]
    fn test_bare_keyword_line_rejected() {
        assert!(education_of("MBA").is_empty());
    }

    #[test]
    fn test_project_neighbour_not_merged() {
        let found = education_of("MSc in Data Science\nProject: University rankings");
        assert_eq!(found, vec!["MSc in Data Science"]);
    }

    #[test]
    fn test_collapse_repeated() {
        assert_eq!(collapse_repeated("Dhaka College Dhaka College"), "Dhaka College");
        assert_eq!(collapse_repeated("HSC HSC"), "HSC HSC");
        assert_eq!(collapse_repeated("Bachelor of Arts"), "Bachelor of Arts");
    }
}

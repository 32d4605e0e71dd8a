//! Skill keyword matching against the reference skill list

use crate::error::Result;
use crate::processing::document::Document;
use crate::processing::reference::ReferenceData;
use aho_corasick::{AhoCorasick, MatchKind};
use log::debug;
use std::collections::HashSet;

pub struct SkillMatcher {
    matcher: AhoCorasick,
    skills: Vec<String>,
    uppercase: HashSet<String>,
    max_skills: usize,
}

impl SkillMatcher {
    pub fn new(reference: &ReferenceData, max_skills: usize) -> Result<Self> {
        let skills: Vec<String> = reference.skills.iter().map(|s| s.to_lowercase()).collect();

        // Standard semantics so overlapping terms ("react", "react.js") are all reported
        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .match_kind(MatchKind::Standard)
            .build(&skills)?;

        let uppercase = reference
            .uppercase_skills
            .iter()
            .map(|s| s.to_lowercase())
            .collect();

        Ok(Self {
            matcher,
            skills,
            uppercase,
            max_skills,
        })
    }

    /// Skills in reference-list order, display-cased, de-duplicated and capped
    pub fn extract(&self, doc: &Document) -> Vec<String> {
        let text = doc.lowercase();

        let mut matched = vec![false; self.skills.len()];
        for mat in self.matcher.find_overlapping_iter(text) {
            if is_whole_word(text, mat.start(), mat.end()) {
                matched[mat.pattern().as_usize()] = true;
            }
        }

        let mut seen = HashSet::new();
        let found: Vec<String> = self
            .skills
            .iter()
            .zip(matched)
            .filter(|(_, hit)| *hit)
            .map(|(skill, _)| self.display_form(skill))
            .filter(|skill| seen.insert(skill.to_lowercase()))
            .take(self.max_skills)
            .collect();

        debug!("Matched {} skills", found.len());
        found
    }

    fn display_form(&self, skill: &str) -> String {
        if self.uppercase.contains(skill) {
            skill.to_uppercase()
        } else if skill.contains('.') || skill.contains('-') {
            skill.to_string()
        } else {
            title_case(skill)
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// A match may not run into neighbouring word characters. Edges that are
/// themselves punctuation ("c++", ".net") need no boundary on that side.
fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let matched = &text[start..end];

    let starts_with_word = matched.chars().next().is_some_and(is_word_char);
    let ends_with_word = matched.chars().next_back().is_some_and(is_word_char);

    let before_ok = !starts_with_word || !text[..start].chars().next_back().is_some_and(is_word_char);
    let after_ok = !ends_with_word || !text[end..].chars().next().is_some_and(is_word_char);

    before_ok && after_ok
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest
fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills_of(text: &str) -> Vec<String> {
        SkillMatcher::new(&ReferenceData::default(), 30)
            .unwrap()
            .extract(&Document::new(text))
    }

    #[test]
    fn test_casing_rules() {
        let found = skills_of("Python, React, AWS and node.js with ci/cd");
        assert_eq!(found, vec!["Python", "React", "node.js", "AWS", "Ci/Cd"]);
    }

    #[test]
    fn test_reference_order_not_text_order() {
        let found = skills_of("Docker first, then Python");
        assert_eq!(found, vec!["Python", "Docker"]);
    }

    #[test]
    fn test_whole_word_only() {
        let found = skills_of("Javascriptish gopher reactive");
        assert!(found.is_empty(), "{:?}", found);
    }

    #[test]
    fn test_multi_word_and_symbol_terms() {
        let found = skills_of("Built ML in C++ and .NET using machine learning and spring boot");
        assert!(found.contains(&"C++".to_string()));
        assert!(found.contains(&".net".to_string()));
        assert!(found.contains(&"Machine Learning".to_string()));
        assert!(found.contains(&"Spring Boot".to_string()));
        assert!(found.contains(&"Spring".to_string()));
    }

    #[test]
    fn test_case_insensitive_dedup() {
        let found = skills_of("postgres POSTGRES Postgres");
        assert_eq!(found, vec!["Postgres"]);
    }

    #[test]
    fn test_cap_applies() {
        let matcher = SkillMatcher::new(&ReferenceData::default(), 3).unwrap();
        let found = matcher.extract(&Document::new("python java rust go docker kafka"));
        assert_eq!(found, vec!["Python", "Java", "Go"]);
    }

    #[test]
    fn test_whole_word_edges() {
        assert!(is_whole_word("use c++ daily", 4, 7));
        assert!(!is_whole_word("gopher", 0, 2));
        assert!(is_whole_word("asp.net", 3, 7));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("a/b testing"), "A/B Testing");
        assert_eq!(title_case("k8s"), "K8S");
        assert_eq!(title_case("power bi"), "Power Bi");
    }
}

//! Work-history timeline: date ranges, the role near each range, and totals

use crate::error::Result;
use crate::processing::dates::{months_between, DateInterpreter};
use crate::processing::document::Document;
use crate::processing::reference::ReferenceData;
use chrono::{Local, NaiveDate};
use log::debug;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::ops::Range;

pub const UNKNOWN_ROLE: &str = "Unknown Role";

const MONTH_TOKEN: &str = r"(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s*\d{4}";
const YEAR_TOKEN: &str = r"\b(?:19|20)\d{2}\b";
const NUMERIC_TOKEN: &str = r"\d{1,2}/\d{4}";
const RANGE_SEPARATOR: &str = r"\s*[-–—to]+\s*";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceSegment {
    pub title: String,
    pub years: f64,
    /// Whole months behind `years`; bucket sums are taken over these
    pub months: u32,
    pub start: String,
    pub end: String,
    pub is_current: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceSummary {
    pub total_years: f64,
    pub breakdown: Vec<ExperienceSegment>,
}

pub struct TimelineExtractor {
    dates: DateInterpreter,
    range_regexes: Vec<Regex>,
    title_regex: Regex,
    phrase_regexes: Vec<Regex>,
    context_radius: usize,
    max_title_chars: usize,
}

impl TimelineExtractor {
    pub fn new(reference: &ReferenceData, context_radius: usize, max_title_chars: usize) -> Result<Self> {
        let mut present_words: Vec<&String> = reference.present_words.iter().collect();
        // Longest first so "till date" is preferred over any shorter prefix
        present_words.sort_by_key(|w| std::cmp::Reverse(w.len()));
        let present = present_words
            .iter()
            .map(|w| regex::escape(&w.to_lowercase()))
            .collect::<Vec<_>>()
            .join("|");

        let range_regexes = [
            format!(r"({m}){sep}({m}|{p})", m = MONTH_TOKEN, sep = RANGE_SEPARATOR, p = present),
            format!(r"({y}){sep}((?:19|20)\d{{2}}|{p})", y = YEAR_TOKEN, sep = RANGE_SEPARATOR, p = present),
            format!(r"({n}){sep}({n}|{p})", n = NUMERIC_TOKEN, sep = RANGE_SEPARATOR, p = present),
        ]
        .iter()
        .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
        .collect::<std::result::Result<Vec<_>, _>>()?;

        let titles = reference
            .job_titles
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        let title_regex = RegexBuilder::new(&format!(r"\b(?:{})\b", titles))
            .case_insensitive(true)
            .build()?;

        let phrase_regexes = reference
            .experience_phrases
            .iter()
            .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            dates: DateInterpreter::new(&reference.present_words)?,
            range_regexes,
            title_regex,
            phrase_regexes,
            context_radius,
            max_title_chars,
        })
    }

    pub fn extract(&self, doc: &Document) -> ExperienceSummary {
        self.extract_at(doc, Local::now().date_naive())
    }

    /// Timeline relative to a fixed "today", used for open-ended ranges
    pub fn extract_at(&self, doc: &Document, today: NaiveDate) -> ExperienceSummary {
        let lines = doc.lines();
        let mut total_months: u32 = 0;
        let mut breakdown = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            let lowered = line.to_lowercase();
            // A range claimed by an earlier shape is not counted again ("jan 2019 - present")
            let mut claimed: Vec<Range<usize>> = Vec::new();

            for regex in &self.range_regexes {
                for caps in regex.captures_iter(&lowered) {
                    let Some(whole) = caps.get(0) else { continue };
                    if claimed.iter().any(|r| r.start < whole.end() && whole.start() < r.end) {
                        continue;
                    }

                    let (start_token, end_token) = (&caps[1], &caps[2]);
                    let Some(months) = self.range_months(start_token, end_token, today) else {
                        continue;
                    };
                    claimed.push(whole.range());

                    let title = find_title(lines, idx, self.context_radius, |candidate| {
                        self.title_regex.is_match(candidate)
                            && candidate.chars().count() < self.max_title_chars
                    })
                    .unwrap_or_else(|| UNKNOWN_ROLE.to_string());

                    debug!("Range '{}' - '{}' ({} months) as {}", start_token, end_token, months, title);

                    breakdown.push(ExperienceSegment {
                        title,
                        years: months_to_years(months),
                        months,
                        start: start_token.trim().to_string(),
                        end: end_token.trim().to_string(),
                        is_current: self.dates.is_present_word(end_token),
                    });
                    total_months += months;
                }
            }
        }

        if total_months == 0 {
            let stated = self.stated_years(doc);
            debug!("No dated ranges, stated experience: {} years", stated);
            return ExperienceSummary {
                total_years: stated,
                breakdown: Vec::new(),
            };
        }

        ExperienceSummary {
            total_years: months_to_years(total_months),
            breakdown,
        }
    }

    /// Positive whole months between two tokens, or None when the range is unusable
    fn range_months(&self, start: &str, end: &str, today: NaiveDate) -> Option<u32> {
        let (Some(start_date), Some(end_date)) =
            (self.dates.interpret_at(start, today), self.dates.interpret_at(end, today))
        else {
            debug!("Skipping range '{}' - '{}': unreadable date", start, end);
            return None;
        };

        if end_date <= start_date {
            debug!("Skipping range '{}' - '{}': ends before it starts", start, end);
            return None;
        }

        u32::try_from(months_between(start_date, end_date))
            .ok()
            .filter(|months| *months > 0)
    }

    /// Largest "N years of experience" style figure in the document
    pub fn stated_years(&self, doc: &Document) -> f64 {
        self.phrase_regexes
            .iter()
            .flat_map(|regex| regex.captures_iter(doc.lowercase()))
            .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
            .fold(0.0, f64::max)
    }
}

/// First line within `radius` lines of `index` (inclusive) that `is_title` accepts
pub fn find_title<F>(lines: &[String], index: usize, radius: usize, is_title: F) -> Option<String>
where
    F: Fn(&str) -> bool,
{
    if lines.is_empty() {
        return None;
    }
    let start = index.saturating_sub(radius);
    let end = (index + radius + 1).min(lines.len());

    lines[start..end]
        .iter()
        .map(|line| line.trim())
        .find(|line| !line.is_empty() && is_title(line))
        .map(str::to_string)
}

pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn months_to_years(months: u32) -> f64 {
    round_tenth(months as f64 / 12.0)
}

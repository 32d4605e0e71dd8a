//! Date token interpretation for experience ranges

use crate::error::Result;
use chrono::{Datelike, Local, NaiveDate};
use regex::Regex;

/// Turns loose date tokens ("Jan 2020", "03/2020", "2020", "Present") into calendar dates.
///
/// The regexes only locate a date inside the surrounding words; the located
/// text is handed to chrono's format parser.
pub struct DateInterpreter {
    present_words: Vec<String>,
    iso_regex: Regex,
    full_numeric_regex: Regex,
    month_year_numeric_regex: Regex,
    month_name_regex: Regex,
    day_month_name_regex: Regex,
    year_regex: Regex,
}

impl DateInterpreter {
    pub fn new(present_words: &[String]) -> Result<Self> {
        Ok(Self {
            present_words: present_words.iter().map(|w| w.to_lowercase()).collect(),
            iso_regex: Regex::new(r"\b\d{4}-\d{1,2}-\d{1,2}\b")?,
            full_numeric_regex: Regex::new(r"\b\d{1,2}/\d{1,2}/\d{4}\b")?,
            month_year_numeric_regex: Regex::new(r"\b\d{1,2}/\d{4}\b")?,
            month_name_regex: Regex::new(
                r"\b([a-z]{3,9})\.?\s*(?:(\d{1,2})(?:st|nd|rd|th)?,?\s+)?(\d{4})\b",
            )?,
            day_month_name_regex: Regex::new(r"\b(\d{1,2})\s+([a-z]{3,9})\.?,?\s+(\d{4})\b")?,
            year_regex: Regex::new(r"\b((?:19|20)\d{2})\b")?,
        })
    }

    /// Interpret a token relative to today's date
    pub fn interpret(&self, token: &str) -> Option<NaiveDate> {
        self.interpret_at(token, Local::now().date_naive())
    }

    /// Interpret a token with an explicit "now", so results are reproducible
    pub fn interpret_at(&self, token: &str, today: NaiveDate) -> Option<NaiveDate> {
        let token = token.trim().to_lowercase();
        if token.is_empty() {
            return None;
        }

        if self.present_words.iter().any(|w| *w == token) {
            return Some(today);
        }

        self.parse_full_date(&token)
            .or_else(|| self.parse_month_year(&token))
            .or_else(|| self.parse_bare_year(&token))
    }

    pub fn is_present_word(&self, token: &str) -> bool {
        let token = token.trim().to_lowercase();
        self.present_words.iter().any(|w| *w == token)
    }

    fn parse_full_date(&self, token: &str) -> Option<NaiveDate> {
        if let Some(date) = self
            .iso_regex
            .find(token)
            .and_then(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok())
        {
            return Some(date);
        }

        // Month-first, falling back to day-first when the month is out of range
        if let Some(date) = self.full_numeric_regex.find(token).and_then(|m| {
            NaiveDate::parse_from_str(m.as_str(), "%m/%d/%Y")
                .or_else(|_| NaiveDate::parse_from_str(m.as_str(), "%d/%m/%Y"))
                .ok()
        }) {
            return Some(date);
        }

        self.day_month_name_regex.captures_iter(token).find_map(|caps| {
            let month = month_abbreviation(caps.get(2)?.as_str())?;
            parse_day_month_year(&caps[1], month, &caps[3])
        })
    }

    fn parse_month_year(&self, token: &str) -> Option<NaiveDate> {
        let named = self.month_name_regex.captures_iter(token).find_map(|caps| {
            let month = month_abbreviation(caps.get(1)?.as_str())?;
            let day = caps.get(2).map_or("01", |d| d.as_str());
            parse_day_month_year(day, month, &caps[3])
        });
        if named.is_some() {
            return named;
        }

        let found = self.month_year_numeric_regex.find(token)?;
        NaiveDate::parse_from_str(&format!("01/{}", found.as_str()), "%d/%m/%Y").ok()
    }

    /// A bare year carries no month, so it is anchored mid-year
    fn parse_bare_year(&self, token: &str) -> Option<NaiveDate> {
        let caps = self.year_regex.captures(token)?;
        NaiveDate::from_ymd_opt(caps[1].parse().ok()?, 6, 1)
    }
}

fn parse_day_month_year(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{} {} {}", day, month, year), "%d %b %Y").ok()
}

/// Three-letter month abbreviation for a month name or a prefix of one of at
/// least three letters ("sep", "sept", "september"); None for other words.
fn month_abbreviation(word: &str) -> Option<&str> {
    let abbreviation = word.get(..3)?;
    let month = NaiveDate::parse_from_str(&format!("01 {} 2000", abbreviation), "%d %b %Y").ok()?;
    month
        .format("%B")
        .to_string()
        .to_lowercase()
        .starts_with(word)
        .then_some(abbreviation)
}

/// Whole calendar months from `start` to `end`; partial trailing months are dropped
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    let mut months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    if months > 0 && end.day() < start.day() {
        months -= 1;
    } else if months < 0 && end.day() > start.day() {
        months += 1;
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::reference::ReferenceData;

    fn interpreter() -> DateInterpreter {
        DateInterpreter::new(&ReferenceData::default().present_words).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_present_words_resolve_to_today() {
        let dates = interpreter();
        for word in ["present", "Current", " NOW ", "ongoing", "till date", "to date"] {
            assert_eq!(dates.interpret_at(word, today()), Some(today()), "{}", word);
        }
    }

    #[test]
    fn test_month_name_and_year() {
        let dates = interpreter();
        assert_eq!(dates.interpret_at("Jan 2020", today()), Some(ymd(2020, 1, 1)));
        assert_eq!(dates.interpret_at("september 2018", today()), Some(ymd(2018, 9, 1)));
        assert_eq!(dates.interpret_at("Sept. 2018", today()), Some(ymd(2018, 9, 1)));
        assert_eq!(dates.interpret_at("dec2021", today()), Some(ymd(2021, 12, 1)));
    }

    #[test]
    fn test_numeric_month_year() {
        let dates = interpreter();
        assert_eq!(dates.interpret_at("03/2020", today()), Some(ymd(2020, 3, 1)));
        assert_eq!(dates.interpret_at("13/2020", today()), Some(ymd(2020, 6, 1)));
    }

    #[test]
    fn test_full_dates() {
        let dates = interpreter();
        assert_eq!(dates.interpret_at("2021-04-15", today()), Some(ymd(2021, 4, 15)));
        assert_eq!(dates.interpret_at("04/15/2021", today()), Some(ymd(2021, 4, 15)));
        assert_eq!(dates.interpret_at("15/04/2021", today()), Some(ymd(2021, 4, 15)));
        assert_eq!(dates.interpret_at("15 Apr 2021", today()), Some(ymd(2021, 4, 15)));
        assert_eq!(dates.interpret_at("April 15, 2021", today()), Some(ymd(2021, 4, 15)));
    }

    #[test]
    fn test_bare_year_anchors_mid_year() {
        let dates = interpreter();
        assert_eq!(dates.interpret_at("2019", today()), Some(ymd(2019, 6, 1)));
        assert_eq!(dates.interpret_at("since 2019 or so", today()), Some(ymd(2019, 6, 1)));
    }

    #[test]
    fn test_surrounding_words_are_tolerated() {
        let dates = interpreter();
        assert_eq!(dates.interpret_at("started in March 2017", today()), Some(ymd(2017, 3, 1)));
    }

    #[test]
    fn test_uninterpretable_tokens() {
        let dates = interpreter();
        assert_eq!(dates.interpret_at("", today()), None);
        assert_eq!(dates.interpret_at("soon", today()), None);
        assert_eq!(dates.interpret_at("1850", today()), None);
        assert_eq!(dates.interpret_at("junk 123", today()), None);
    }

    #[test]
    fn test_month_prefixes() {
        assert_eq!(month_abbreviation("jan"), Some("jan"));
        assert_eq!(month_abbreviation("sept"), Some("sep"));
        assert_eq!(month_abbreviation("december"), Some("dec"));
        assert_eq!(month_abbreviation("ma"), None);
        assert_eq!(month_abbreviation("mayor"), None);
        assert_eq!(month_abbreviation("janitor"), None);
    }

    #[test]
    fn test_invalid_calendar_days_rejected() {
        let dates = interpreter();
        // February 30th is not a date; the month and year still are
        assert_eq!(dates.interpret_at("30 feb 2021", today()), Some(ymd(2021, 2, 1)));
        assert_eq!(dates.interpret_at("2021-02-30", today()), Some(ymd(2021, 6, 1)));
    }

    #[test]
    fn test_months_between() {
        assert_eq!(months_between(ymd(2019, 1, 1), ymd(2026, 10, 19)), 93);
        assert_eq!(months_between(ymd(2019, 6, 1), ymd(2021, 6, 1)), 24);
        assert_eq!(months_between(ymd(2020, 1, 15), ymd(2020, 2, 14)), 0);
        assert_eq!(months_between(ymd(2020, 1, 15), ymd(2020, 2, 15)), 1);
        assert_eq!(months_between(ymd(2021, 1, 1), ymd(2020, 1, 1)), -12);
    }
}

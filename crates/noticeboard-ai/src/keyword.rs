//! Keyword and date-phrase priority classifier.
//!
//! Priority comes from two signals and the more urgent wins:
//!
//! 1. keyword tiers (`urgent` → Critical, `due` → High, `meeting` → Medium)
//! 2. the deadline found in the text: already past → Critical, within a day
//!    → High, within a week → Medium
//!
//! Recognised deadline phrases are ISO dates (`2026-03-14`), `today`,
//! `tomorrow`, and a weekday after `next`, `by`, `this` or `on`. Deadlines
//! are the end of the named day, UTC.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};

use noticeboard_core::result::AppResult;
use noticeboard_core::traits::PriorityClassifier;
use noticeboard_core::types::{Priority, PriorityAssessment};

const CRITICAL_TERMS: &[&str] = &[
    "urgent",
    "immediately",
    "asap",
    "emergency",
    "overdue",
    "final notice",
    "last day",
    "disconnection",
    "eviction",
];

const HIGH_TERMS: &[&str] = &[
    "due",
    "deadline",
    "important",
    "exam",
    "payment",
    "pay",
    "rent",
    "submit",
    "submission",
    "required",
    "mandatory",
];

const MEDIUM_TERMS: &[&str] = &[
    "meeting",
    "reminder",
    "schedule",
    "scheduled",
    "appointment",
    "event",
    "update",
    "rsvp",
];

/// Rule-based classifier used when no classifier service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordPriorityClassifier;

impl KeywordPriorityClassifier {
    /// Create a classifier.
    pub fn new() -> Self {
        Self
    }

    /// Classify `text` relative to `now`.
    pub fn analyze_at(&self, text: &str, now: DateTime<Utc>) -> PriorityAssessment {
        let words = tokenize(text);
        let joined = format!(" {} ", words.join(" "));

        let keyword_priority = keyword_tier(&joined);
        let deadline = find_deadline(&words, now.date_naive()).map(end_of_day);
        let deadline_priority = deadline.map(|d| urgency_of(d, now)).unwrap_or_default();

        PriorityAssessment {
            priority: keyword_priority.max(deadline_priority),
            deadline,
        }
    }
}

#[async_trait]
impl PriorityClassifier for KeywordPriorityClassifier {
    fn name(&self) -> &str {
        "keyword"
    }

    async fn analyze(&self, text: &str) -> AppResult<PriorityAssessment> {
        Ok(self.analyze_at(text, Utc::now()))
    }
}

/// Lower-cased words; only `-` survives inside a word so ISO dates stay whole.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .map(|w| w.trim_matches('-'))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn contains_term(joined: &str, term: &str) -> bool {
    joined.contains(&format!(" {term} "))
}

fn keyword_tier(joined: &str) -> Priority {
    if CRITICAL_TERMS.iter().any(|t| contains_term(joined, t)) {
        Priority::Critical
    } else if HIGH_TERMS.iter().any(|t| contains_term(joined, t)) {
        Priority::High
    } else if MEDIUM_TERMS.iter().any(|t| contains_term(joined, t)) {
        Priority::Medium
    } else {
        Priority::Low
    }
}

fn urgency_of(deadline: DateTime<Utc>, now: DateTime<Utc>) -> Priority {
    let remaining = deadline - now;
    if remaining < Duration::zero() {
        Priority::Critical
    } else if remaining <= Duration::days(1) {
        Priority::High
    } else if remaining <= Duration::days(7) {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// First recognised deadline phrase, in text order.
fn find_deadline(words: &[String], today: NaiveDate) -> Option<NaiveDate> {
    for (i, word) in words.iter().enumerate() {
        if let Ok(date) = NaiveDate::parse_from_str(word, "%Y-%m-%d") {
            return Some(date);
        }
        match word.as_str() {
            "today" | "tonight" => return Some(today),
            "tomorrow" => return Some(today + Duration::days(1)),
            "next" | "by" | "this" | "on" => {
                if let Some(weekday) = words.get(i + 1).and_then(|w| parse_weekday(w)) {
                    let strictly_after = word == "next";
                    return Some(next_weekday(today, weekday, strictly_after));
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_weekday(word: &str) -> Option<Weekday> {
    match word {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// The next date falling on `weekday`. With `strictly_after`, today never
/// counts, so "next Friday" said on a Friday means a week later.
fn next_weekday(today: NaiveDate, weekday: Weekday, strictly_after: bool) -> NaiveDate {
    let current = today.weekday().num_days_from_monday() as i64;
    let target = weekday.num_days_from_monday() as i64;
    let mut ahead = (target - current).rem_euclid(7);
    if ahead == 0 && strictly_after {
        ahead = 7;
    }
    today + Duration::days(ahead)
}

fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    date.and_time(time).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Wednesday 2026-03-11, 09:00 UTC.
    fn wednesday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 11, 9, 0, 0).unwrap()
    }

    fn deadline(y: i32, m: u32, d: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(y, m, d, 23, 59, 59).unwrap())
    }

    #[test]
    fn test_rent_due_next_friday() {
        let result = KeywordPriorityClassifier
            .analyze_at("Rent due next Friday, amount $1200", wednesday());
        assert_eq!(result.priority, Priority::High);
        assert_eq!(result.deadline, deadline(2026, 3, 13));
    }

    #[test]
    fn test_next_weekday_skips_today() {
        let result = KeywordPriorityClassifier.analyze_at("Staff meeting next Wednesday", wednesday());
        assert_eq!(result.deadline, deadline(2026, 3, 18));
        assert_eq!(result.priority, Priority::Medium);
    }

    #[test]
    fn test_by_weekday_includes_today() {
        let result = KeywordPriorityClassifier.analyze_at("Return forms by Wednesday", wednesday());
        assert_eq!(result.deadline, deadline(2026, 3, 11));
        assert_eq!(result.priority, Priority::High);
    }

    #[test]
    fn test_iso_date_in_past_is_critical() {
        let result = KeywordPriorityClassifier.analyze_at("Library books were due 2026-03-01.", wednesday());
        assert_eq!(result.deadline, deadline(2026, 3, 1));
        assert_eq!(result.priority, Priority::Critical);
    }

    #[test]
    fn test_tomorrow() {
        let result = KeywordPriorityClassifier.analyze_at("Bring snacks tomorrow", wednesday());
        assert_eq!(result.deadline, deadline(2026, 3, 12));
        assert_eq!(result.priority, Priority::Medium);
    }

    #[test]
    fn test_urgent_keyword_without_date() {
        let result = KeywordPriorityClassifier.analyze_at("URGENT: water shut off", wednesday());
        assert_eq!(result.priority, Priority::Critical);
        assert!(result.deadline.is_none());
    }

    #[test]
    fn test_plain_text_defaults_to_low() {
        let result = KeywordPriorityClassifier.analyze_at("Nice weather on the terrace", wednesday());
        assert_eq!(result.priority, Priority::Low);
        assert!(result.deadline.is_none());
    }

    #[test]
    fn test_terms_match_whole_words() {
        // "produced" must not trigger "due".
        let result = KeywordPriorityClassifier.analyze_at("The band produced an album", wednesday());
        assert_eq!(result.priority, Priority::Low);
    }

    #[test]
    fn test_multi_word_term() {
        let result = KeywordPriorityClassifier.analyze_at("Final notice for parking", wednesday());
        assert_eq!(result.priority, Priority::Critical);
    }
}

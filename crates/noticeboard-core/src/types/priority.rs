//! Priority label set shared by the classifier contract and the notice entity.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordered urgency label: `Low < Medium < High < Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Priority {
    /// Informational.
    #[default]
    Low,
    /// Worth attention soon.
    Medium,
    /// Needs action.
    High,
    /// Needs action now, or the deadline has passed.
    Critical,
}

impl Priority {
    /// All labels, most urgent first.
    pub const ALL: [Priority; 4] = [Self::Critical, Self::High, Self::Medium, Self::Low];

    /// Return the label as stored and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(format!("unknown priority label '{other}'")),
        }
    }
}

/// Output of a priority classifier: a label and an optional due time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriorityAssessment {
    /// Assigned label.
    pub priority: Priority,
    /// Detected deadline, if any.
    pub deadline: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering() {
        assert!(Priority::Critical > Priority::High);
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
        assert_eq!(Priority::default(), Priority::Low);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("HIGH".parse::<Priority>(), Ok(Priority::High));
        assert_eq!(" critical ".parse::<Priority>(), Ok(Priority::Critical));
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_serde_uses_capitalized_labels() {
        let json = serde_json::to_string(&Priority::Medium).expect("serialize");
        assert_eq!(json, "\"Medium\"");
        let parsed: Priority = serde_json::from_str("\"Critical\"").expect("deserialize");
        assert_eq!(parsed, Priority::Critical);
    }
}

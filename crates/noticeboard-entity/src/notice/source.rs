//! Provenance tags recorded on notices that were not typed in by hand.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a notice came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NoticeSource {
    /// Text extracted from an uploaded image.
    Ocr,
    /// Pulled from the email listener.
    Email,
    /// Pulled from the calendar sync.
    Calendar,
}

impl NoticeSource {
    /// Return the tag as stored.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ocr => "OCR",
            Self::Email => "EMAIL",
            Self::Calendar => "CALENDAR",
        }
    }
}

impl fmt::Display for NoticeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoticeSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OCR" => Ok(Self::Ocr),
            "EMAIL" => Ok(Self::Email),
            "CALENDAR" => Ok(Self::Calendar),
            other => Err(format!("unknown notice source '{other}'")),
        }
    }
}

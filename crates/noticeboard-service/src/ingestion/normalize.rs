//! OCR text cleanup.

/// How an em-dash reads after UTF-8 bytes were decoded as Windows-1252.
const MISDECODED_EM_DASH: &str = "\u{e2}\u{20ac}\u{201d}";

/// Clean raw OCR output before it is summarized.
///
/// Drops control characters other than newline and tab, strips `|` (a
/// common misread of table rules and the letter I), repairs the mis-decoded
/// em-dash to `-`, and trims. Applying it twice gives the same result as
/// applying it once.
pub fn normalize_ocr_text(raw: &str) -> String {
    let filtered: String = raw
        .chars()
        .filter(|c| *c == '\n' || *c == '\t' || !c.is_control())
        .filter(|c| *c != '|')
        .collect();
    filtered.replace(MISDECODED_EM_DASH, "-").trim().to_string()
}

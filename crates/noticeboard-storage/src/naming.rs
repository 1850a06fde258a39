//! Upload file naming.

use uuid::Uuid;

/// Fallback basename when the client sent nothing usable.
const FALLBACK_NAME: &str = "upload";

/// Longest basename kept, in characters.
const MAX_BASENAME_CHARS: usize = 100;

/// Reduce a client-supplied filename to a safe basename.
///
/// Directory components are dropped and anything outside
/// `[A-Za-z0-9._-]` becomes `_`. Leading dots are stripped so the result is
/// never hidden or a parent reference.
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_BASENAME_CHARS)
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        FALLBACK_NAME.to_string()
    } else {
        cleaned.to_string()
    }
}

/// Collision-resistant stored name: `<uuid-hex>_<sanitized-basename>`.
pub fn upload_name(raw: &str) -> String {
    format!("{}_{}", Uuid::new_v4().simple(), sanitize_filename(raw))
}

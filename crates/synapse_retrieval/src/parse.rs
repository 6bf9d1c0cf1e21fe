//! Lenient parsing of structured model responses.
//!
//! Models frequently wrap their JSON in a markdown code fence or pad it with
//! prose. `parse_json_record` strips an optional fence, tries a direct parse,
//! then falls back to the outermost `{...}` span before giving up.

use serde::de::DeserializeOwned;

/// Strip a surrounding markdown code fence (```json ... ``` or ``` ... ```),
/// returning the input unchanged when no fence wraps it.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the language tag on the opening fence line, if any.
    match body.split_once('\n') {
        Some((first_line, remainder)) if !first_line.contains(' ') => remainder.trim(),
        _ => body.trim(),
    }
}

/// Parse a structured record out of a model response, tolerating fences and
/// surrounding prose. `None` means no parseable record was found.
pub fn parse_json_record<T: DeserializeOwned>(text: &str) -> Option<T> {
    let cleaned = strip_code_fence(text);

    if let Ok(record) = serde_json::from_str::<T>(cleaned) {
        return Some(record);
    }

    // Fall back to the outermost object span.
    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<T>(&cleaned[start..=end]).ok()
}

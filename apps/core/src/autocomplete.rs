use std::time::Duration;

use serde_json::Value;

use crate::transport::{FetchOutcome, Fetcher};

pub const MAX_AUTOCOMPLETE_TIMEOUT: Duration = Duration::from_secs(2);

pub fn autocomplete_url(backend_url: &str, query: &str) -> String {
    format!(
        "{backend_url}/autocompleter?q={}",
        urlencoding::encode(query)
    )
}

/// Best-effort suggestions for `query`; any failure yields an empty list.
pub fn fetch_autocomplete(
    fetcher: &dyn Fetcher,
    query: &str,
    backend_url: &str,
    timeout: Duration,
) -> Vec<String> {
    let url = autocomplete_url(backend_url, query);
    let body = match fetcher.get_text(&url, timeout.min(MAX_AUTOCOMPLETE_TIMEOUT)) {
        FetchOutcome::Success { body, .. } => body,
        FetchOutcome::Failure(detail) => {
            log::debug!("autocomplete failed: {detail}");
            return Vec::new();
        }
    };

    clean_suggestions(query, parse_autocomplete_response(&body))
}

/// Trims entries and drops blanks, duplicates and echoes of `query` (case-insensitive).
pub fn clean_suggestions(query: &str, raw: Vec<String>) -> Vec<String> {
    let query_key = query.trim().to_lowercase();
    let mut suggestions: Vec<String> = Vec::new();
    for suggestion in raw {
        let trimmed = suggestion.trim();
        if trimmed.is_empty() || trimmed.to_lowercase() == query_key {
            continue;
        }
        if !suggestions.iter().any(|existing| existing == trimmed) {
            suggestions.push(trimmed.to_string());
        }
    }
    suggestions
}

/// Accepts only the `[echo, [suggestion, ...]]` shape.
pub fn parse_autocomplete_response(body: &str) -> Vec<String> {
    if body.trim().is_empty() {
        return Vec::new();
    }

    let Ok(Value::Array(parts)) = serde_json::from_str::<Value>(body) else {
        return Vec::new();
    };
    if parts.len() != 2 {
        return Vec::new();
    }

    match &parts[1] {
        Value::Array(entries) => entries
            .iter()
            .filter_map(|entry| entry.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

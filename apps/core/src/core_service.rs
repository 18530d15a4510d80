use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::Duration;

use crate::autocomplete::{clean_suggestions, fetch_autocomplete};
use crate::classify::{classify_search, Classification};
use crate::config::{validate, Config};
use crate::contract::{build_response, DisplayItem, ItemText, ScriptFilterResponse};
use crate::error::SearchError;
use crate::favicon::FaviconResolver;
use crate::feedback::{
    classification_error_item, config_error_item, empty_input_item, fallback_item,
    filters_only_item, internal_error_item, no_results_item, result_to_display_item, search_url,
    separator_item, suggestion_to_item,
};
use crate::logging::panic_payload_message;
use crate::query_dsl::{parse_bangs, ParsedQuery};
use crate::shell::curl_command;
use crate::transport::Fetcher;

/// Queries of this many characters or fewer only get suggestions.
pub const SUGGESTIONS_ONLY_MAX_CHARS: usize = 3;
pub const SUGGESTIONS_CACHE_SECONDS: i64 = 30;
pub const RESULTS_CACHE_SECONDS: i64 = 300;

pub fn should_show_full_results(query: &str) -> bool {
    query.trim().chars().count() > SUGGESTIONS_ONLY_MAX_CHARS
}

pub struct SearchService<F> {
    config: Config,
    fetcher: F,
}

impl<F: Fetcher> SearchService<F> {
    pub fn new(config: Config, fetcher: F) -> Self {
        Self { config, fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Turns one raw launcher query into the response envelope.
    pub fn run(&self, raw: &str) -> ScriptFilterResponse {
        if !self.config.is_configured() {
            return ScriptFilterResponse::uncached(vec![config_error_item(
                "The SearXNG URL is missing",
            )]);
        }
        if let Err(message) = validate(&self.config) {
            return ScriptFilterResponse::uncached(vec![config_error_item(&message)]);
        }

        if raw.trim().is_empty() {
            return ScriptFilterResponse::uncached(vec![empty_input_item()]);
        }

        let parsed = parse_bangs(raw);
        log::info!(
            "query={:?} category={:?} time_range={:?}",
            parsed.query,
            parsed.category.map(|c| c.as_str()),
            parsed.time_range.map(|t| t.as_str()),
        );
        if parsed.query.is_empty() {
            return ScriptFilterResponse::uncached(vec![filters_only_item(&parsed)]);
        }

        let timeout = Duration::from_millis(self.config.timeout_ms);
        let suggestions: Vec<DisplayItem> =
            fetch_autocomplete(&self.fetcher, &parsed.query, &self.config.backend_url, timeout)
                .iter()
                .map(|suggestion| suggestion_to_item(suggestion, &parsed))
                .collect();
        log::debug!("suggestions={}", suggestions.len());

        if !should_show_full_results(&parsed.query) {
            let mut items = suggestions;
            if items.is_empty() {
                items.push(self.fallback(&parsed));
            }
            return build_response(
                items,
                Some(SUGGESTIONS_CACHE_SECONDS),
                self.config.cache_results,
            );
        }

        let url = search_url(&self.config.backend_url, &parsed, Some("json"));
        let classification = classify_search(&self.fetcher.get_text(&url, timeout));

        match classification {
            Classification::Ok(response) => {
                log::info!(
                    "results={} reported_total={:?}",
                    response.results.len(),
                    response.number_of_results
                );
                let mut favicons = FaviconResolver::new(&self.fetcher, &self.config);
                let results: Vec<DisplayItem> = response
                    .results
                    .iter()
                    .map(|result| {
                        result_to_display_item(
                            result,
                            &parsed,
                            &self.config.backend_url,
                            &mut favicons,
                        )
                    })
                    .collect();
                log::debug!("favicon_fetches={}", favicons.attempts());

                let suggestions = if suggestions.is_empty() {
                    clean_suggestions(&parsed.query, response.suggestions)
                        .iter()
                        .map(|suggestion| suggestion_to_item(suggestion, &parsed))
                        .collect()
                } else {
                    suggestions
                };
                let mut items = Vec::with_capacity(suggestions.len() + results.len() + 2);
                if !suggestions.is_empty() {
                    items.extend(suggestions);
                    items.push(separator_item("Results"));
                }
                items.extend(results);
                items.push(self.fallback(&parsed));
                build_response(items, Some(RESULTS_CACHE_SECONDS), self.config.cache_results)
            }
            Classification::NoResults if !suggestions.is_empty() => {
                let mut items = suggestions;
                items.push(separator_item("Results"));
                items.push(no_results_item(&parsed));
                items.push(self.fallback(&parsed));
                ScriptFilterResponse::uncached(items)
            }
            failed => {
                log::warn!("search failed: kind={} url={url}", failed.kind());
                let mut items = Vec::with_capacity(2);
                if let Some(mut item) =
                    classification_error_item(&failed, &parsed, &self.config.backend_url)
                {
                    if let Classification::NetworkError(detail) = &failed {
                        let command = curl_command(&url, self.config.timeout_ms);
                        item.text = Some(ItemText {
                            largetype: format!("{detail}\n\n{command}"),
                            copy: command,
                        });
                    }
                    items.push(item);
                }
                items.push(self.fallback(&parsed));
                ScriptFilterResponse::uncached(items)
            }
        }
    }

    /// `run` behind the top-level guard.
    pub fn run_guarded(&self, raw: &str) -> ScriptFilterResponse {
        let context = vec![("backend".to_string(), self.config.backend_url.clone())];
        guard(raw, context, || Ok(self.run(raw)))
    }

    fn fallback(&self, parsed: &ParsedQuery) -> DisplayItem {
        fallback_item(parsed, &self.config.backend_url)
    }
}

/// Runs `work`, converting errors and panics of any payload type into a
/// single "Internal Error" item.
pub fn guard<W>(raw: &str, context: Vec<(String, String)>, work: W) -> ScriptFilterResponse
where
    W: FnOnce() -> Result<ScriptFilterResponse, SearchError>,
{
    match panic::catch_unwind(AssertUnwindSafe(work)) {
        Ok(Ok(response)) => response,
        Ok(Err(error)) => {
            log::error!("search failed: {error}");
            let mut details = vec![("query".to_string(), raw.to_string())];
            details.extend(context);
            details.extend(error.context().iter().cloned());
            internal_error_response(&error.to_string(), &details)
        }
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            log::error!("search panicked: {message}");
            let mut details = vec![("query".to_string(), raw.to_string())];
            details.extend(context);
            internal_error_response(&message, &details)
        }
    }
}

pub fn internal_error_response(message: &str, context: &[(String, String)]) -> ScriptFilterResponse {
    ScriptFilterResponse::uncached(vec![internal_error_item(message, context)])
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    panic_payload_message(payload).unwrap_or_else(|| "panic with non-string payload".to_string())
}

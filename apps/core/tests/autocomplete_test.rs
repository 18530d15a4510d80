mod support;

use std::time::Duration;

use searxng_alfred_core::autocomplete::fetch_autocomplete;
use searxng_alfred_core::transport::FetchOutcome;
use support::{FakeFetcher, BACKEND};

#[test]
fn returns_suggestions_without_the_echoed_query() {
    let fetcher = FakeFetcher::new()
        .suggestions(r#"["clim", ["Clim", "climate", " climate ", "climbing", ""]]"#);

    let suggestions = fetch_autocomplete(&fetcher, "clim", BACKEND, Duration::from_secs(5));

    assert_eq!(suggestions, vec!["climate".to_string(), "climbing".to_string()]);
    assert_eq!(
        fetcher.requested_urls(),
        vec!["https://search.example/autocompleter?q=clim".to_string()]
    );
}

#[test]
fn caps_timeout_at_two_seconds() {
    let fetcher = FakeFetcher::new().suggestions(r#"["a", []]"#);

    fetch_autocomplete(&fetcher, "a", BACKEND, Duration::from_secs(30));
    fetch_autocomplete(&fetcher, "b", BACKEND, Duration::from_millis(800));

    assert_eq!(
        fetcher.timeout_for(&format!("{BACKEND}/autocompleter?q=a")),
        Some(Duration::from_secs(2))
    );
    assert_eq!(
        fetcher.timeout_for(&format!("{BACKEND}/autocompleter?q=b")),
        Some(Duration::from_millis(800))
    );
}

#[test]
fn failures_yield_no_suggestions() {
    let fetcher = FakeFetcher::new().route(
        &format!("{BACKEND}/autocompleter"),
        FetchOutcome::failed("connection refused"),
    );
    assert!(fetch_autocomplete(&fetcher, "rust", BACKEND, Duration::from_secs(1)).is_empty());

    let fetcher = FakeFetcher::new().suggestions("");
    assert!(fetch_autocomplete(&fetcher, "rust", BACKEND, Duration::from_secs(1)).is_empty());

    let fetcher = FakeFetcher::new().suggestions("<html>nope</html>");
    assert!(fetch_autocomplete(&fetcher, "rust", BACKEND, Duration::from_secs(1)).is_empty());
}

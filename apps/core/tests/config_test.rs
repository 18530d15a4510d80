use std::collections::HashMap;
use std::path::PathBuf;

use searxng_alfred_core::config::{self, Config, DEFAULT_TIMEOUT_MS, MAX_TIMEOUT_MS, MIN_TIMEOUT_MS};

fn from_pairs(pairs: &[(&str, &str)]) -> Config {
    let values: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| values.get(key).cloned())
}

#[test]
fn accepts_default_config_with_backend() {
    let cfg = from_pairs(&[("searxng_url", "https://search.example/")]);
    assert_eq!(cfg.backend_url, "https://search.example");
    assert_eq!(cfg.timeout_ms, DEFAULT_TIMEOUT_MS);
    assert!(cfg.cache_results);
    assert!(cfg.secret_key.is_none());
    assert_eq!(cfg.favicon_fetch_limit, 10);
    assert!(cfg.cache_dir.to_string_lossy().contains("searxng-alfred"));
    assert!(config::validate(&cfg).is_ok());
}

#[test]
fn strips_every_trailing_slash() {
    let cfg = from_pairs(&[("searxng_url", "  http://localhost:8888/// ")]);
    assert_eq!(cfg.backend_url, "http://localhost:8888");
}

#[test]
fn missing_or_blank_url_is_unconfigured() {
    assert!(!from_pairs(&[]).is_configured());
    let cfg = from_pairs(&[("searxng_url", "   ")]);
    assert!(!cfg.is_configured());
    assert!(config::validate(&cfg).is_err());
}

#[test]
fn rejects_url_without_scheme() {
    let cfg = from_pairs(&[("searxng_url", "search.example")]);
    assert!(config::validate(&cfg).is_err());
}

#[test]
fn clamps_timeout() {
    let timeout = |raw: &str| from_pairs(&[("timeout_ms", raw)]).timeout_ms;
    assert_eq!(timeout("99999"), MAX_TIMEOUT_MS);
    assert_eq!(timeout("10"), MIN_TIMEOUT_MS);
    assert_eq!(timeout("2500"), 2500);
    assert_eq!(timeout("soon"), DEFAULT_TIMEOUT_MS);
    assert_eq!(timeout("-1"), DEFAULT_TIMEOUT_MS);
}

#[test]
fn blank_secret_disables_favicons() {
    assert!(from_pairs(&[("secret_key", "  ")]).secret_key.is_none());
    assert_eq!(
        from_pairs(&[("secret_key", "abc")]).secret_key.as_deref(),
        Some("abc")
    );
}

#[test]
fn parses_cache_toggle_and_dirs() {
    let cfg = from_pairs(&[
        ("cache_results", "0"),
        ("alfred_workflow_cache", "/tmp/wf-cache"),
        ("favicon_fetch_limit", "99"),
        ("alfred_debug", "1"),
    ]);
    assert!(!cfg.cache_results);
    assert_eq!(cfg.cache_dir, PathBuf::from("/tmp/wf-cache"));
    assert_eq!(cfg.favicon_dir(), PathBuf::from("/tmp/wf-cache/favicons"));
    assert_eq!(cfg.favicon_fetch_limit, 25);
    assert!(cfg.debug);

    assert!(!from_pairs(&[("cache_results", "off")]).cache_results);
    assert!(from_pairs(&[("cache_results", "maybe")]).cache_results);
}

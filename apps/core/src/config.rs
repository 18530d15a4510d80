use std::path::PathBuf;

pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
pub const MIN_TIMEOUT_MS: u64 = 500;
pub const MAX_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_FAVICON_FETCH_LIMIT: usize = 10;
pub const MAX_FAVICON_FETCH_LIMIT: usize = 25;

const APP_DIR_NAME: &str = "searxng-alfred";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub backend_url: String,
    pub timeout_ms: u64,
    pub secret_key: Option<String>,
    pub cache_results: bool,
    pub cache_dir: PathBuf,
    pub favicon_fetch_limit: usize,
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: String::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            secret_key: None,
            cache_results: true,
            cache_dir: default_cache_dir(),
            favicon_fetch_limit: DEFAULT_FAVICON_FETCH_LIMIT,
            debug: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key/value source; missing or malformed values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let backend_url = non_blank("searxng_url")
            .map(|value| normalize_backend_url(&value))
            .unwrap_or_default();
        let timeout_ms = non_blank("timeout_ms")
            .map(|value| parse_timeout_ms(&value))
            .unwrap_or(defaults.timeout_ms);
        let cache_results = non_blank("cache_results")
            .and_then(|value| parse_bool(&value))
            .unwrap_or(defaults.cache_results);
        let favicon_fetch_limit = non_blank("favicon_fetch_limit")
            .and_then(|value| value.parse::<usize>().ok())
            .map(|limit| limit.min(MAX_FAVICON_FETCH_LIMIT))
            .unwrap_or(defaults.favicon_fetch_limit);
        let cache_dir = non_blank("alfred_workflow_cache")
            .map(PathBuf::from)
            .unwrap_or(defaults.cache_dir);
        let debug = non_blank("alfred_debug")
            .and_then(|value| parse_bool(&value))
            .unwrap_or(false);

        Self {
            backend_url,
            timeout_ms,
            secret_key: non_blank("secret_key"),
            cache_results,
            cache_dir,
            favicon_fetch_limit,
            debug,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.backend_url.is_empty()
    }

    pub fn favicon_dir(&self) -> PathBuf {
        self.cache_dir.join("favicons")
    }

    pub fn logs_dir(&self) -> PathBuf {
        self.cache_dir.join("logs")
    }
}

pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

pub fn normalize_backend_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

pub fn parse_timeout_ms(raw: &str) -> u64 {
    raw.trim()
        .parse::<u64>()
        .map(|value| value.clamp(MIN_TIMEOUT_MS, MAX_TIMEOUT_MS))
        .unwrap_or(DEFAULT_TIMEOUT_MS)
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn validate(cfg: &Config) -> Result<(), String> {
    if cfg.backend_url.is_empty() {
        return Err("searxng_url is required".into());
    }

    if !cfg.backend_url.starts_with("http://") && !cfg.backend_url.starts_with("https://") {
        return Err("searxng_url must start with http:// or https://".into());
    }

    if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&cfg.timeout_ms) {
        return Err("timeout_ms out of range".into());
    }

    if cfg.favicon_fetch_limit > MAX_FAVICON_FETCH_LIMIT {
        return Err("favicon_fetch_limit out of range".into());
    }

    Ok(())
}

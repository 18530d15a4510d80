use std::path::Path;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::favicon::FaviconResolver;
use crate::feedback::result_to_display_item;
use crate::model::SearchResult;
use crate::query_dsl::parse_bangs;
use crate::transport::{FetchError, FetchOutcome, Fetcher};

struct Offline;

impl Fetcher for Offline {
    fn get_text(&self, _url: &str, _timeout: Duration) -> FetchOutcome {
        FetchOutcome::failed("offline")
    }

    fn download(&self, _url: &str, _timeout: Duration, _dest: &Path) -> Result<u64, FetchError> {
        Err(FetchError::Transport("offline".into()))
    }
}

fn p95_ms(samples: &mut [f64]) -> f64 {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let last = samples.len().saturating_sub(1);
    let idx = ((last as f64) * 0.95).round() as usize;
    samples[idx.min(last)]
}

#[test]
fn full_page_transform_p95_under_50ms() {
    let config = Config {
        backend_url: "https://search.example".into(),
        ..Config::default()
    };
    let results: Vec<SearchResult> = (0..200)
        .map(|i| {
            SearchResult::new(
                &format!("Result {i:03} - SomeCamelCaseTitle"),
                &format!("https://www.site{i}.example/path/{i}"),
            )
            .with_content(&"Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(4))
        })
        .collect();

    let mut samples = Vec::with_capacity(40);
    for _ in 0..40 {
        let start = Instant::now();
        let parsed = parse_bangs("!n !d rust release notes");
        let mut favicons = FaviconResolver::new(&Offline, &config);
        let items: Vec<_> = results
            .iter()
            .map(|result| result_to_display_item(result, &parsed, &config.backend_url, &mut favicons))
            .collect();
        assert_eq!(items.len(), results.len());
        samples.push(start.elapsed().as_secs_f64() * 1000.0);
    }

    let p95 = p95_ms(&mut samples);
    assert!(p95 <= 50.0, "p95 too high: {p95:.3}ms (budget 50.0ms)");
}

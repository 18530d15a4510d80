use crate::config::Config;
use crate::contract::ScriptFilterResponse;
use crate::core_service::{guard, internal_error_response, SearchService};
use crate::error::SearchError;
use crate::transport::HttpFetcher;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CliOptions {
    pub query: String,
    pub pretty: bool,
    pub show_version: bool,
}

pub fn parse_cli_args(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut words: Vec<&str> = Vec::new();
    let mut positional_only = false;

    for arg in args {
        if positional_only {
            words.push(arg);
            continue;
        }
        match arg.as_str() {
            "--" => positional_only = true,
            "--pretty" => options.pretty = true,
            "--version" | "-V" => options.show_version = true,
            flag if flag.starts_with("--") => {
                return Err(format!("unknown option '{flag}'"));
            }
            _ => words.push(arg),
        }
    }

    options.query = words.join(" ");
    Ok(options)
}

/// Full invocation: config from the environment, logging, search, JSON encoding.
pub fn run_with_options(options: &CliOptions) -> String {
    let config = Config::from_env();
    if let Err(error) = crate::logging::init(&config) {
        eprintln!("[searxng-alfred] logging disabled: {error}");
    }

    let response = run_with_config(config, &options.query);
    encode_response(&response, options.pretty)
}

/// Guarded search over the real HTTP client. Cache directories are created
/// lazily by the parts that write to them.
pub fn run_with_config(config: Config, query: &str) -> ScriptFilterResponse {
    let context = vec![("backend".to_string(), config.backend_url.clone())];
    guard(query, context, || {
        let fetcher = HttpFetcher::new().map_err(|error| {
            SearchError::internal(error.to_string()).with_context("stage", "http client")
        })?;
        Ok(SearchService::new(config, fetcher).run(query))
    })
}

pub fn encode_response(response: &ScriptFilterResponse, pretty: bool) -> String {
    let encoded = if pretty {
        serde_json::to_string_pretty(response)
    } else {
        serde_json::to_string(response)
    };

    match encoded {
        Ok(json) => json,
        Err(error) => {
            let fallback = internal_error_response(&SearchError::from(error).to_string(), &[]);
            serde_json::to_string(&fallback).unwrap_or_else(|_| r#"{"items":[]}"#.to_string())
        }
    }
}

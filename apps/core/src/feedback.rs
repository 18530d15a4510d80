//! Launcher item assembly: search results, suggestions, separators, errors and
//! the browser fallback row.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::classify::Classification;
use crate::contract::{DisplayItem, Icon, ItemText, Modifier, Mods};
use crate::favicon::{FaviconResolver, FALLBACK_ICON};
use crate::model::SearchResult;
use crate::query_dsl::{Category, ParsedQuery};

pub const SNIPPET_MAX_CHARS: usize = 80;
pub const SUBTITLE_SEPARATOR: &str = " · ";
pub const ERROR_ICON: &str =
    "/System/Library/CoreServices/CoreTypes.bundle/Contents/Resources/AlertStopIcon.icns";
pub const JSON_FORMAT_DOCS_URL: &str =
    "https://docs.searxng.org/admin/settings/settings_search.html";

/// `{backend}/search?q=...` with active filters; `format` selects the JSON API.
pub fn search_url(backend_url: &str, parsed: &ParsedQuery, format: Option<&str>) -> String {
    let mut url = format!("{backend_url}/search?q={}", urlencoding::encode(&parsed.query));
    if let Some(format) = format {
        url.push_str("&format=");
        url.push_str(format);
    }
    if let Some(category) = parsed.category {
        url.push_str("&categories=");
        url.push_str(category.as_str());
    }
    if let Some(time_range) = parsed.time_range {
        url.push_str("&time_range=");
        url.push_str(time_range.as_str());
    }
    url
}

/// Host for display: scheme and a leading `www.` removed, raw URL when it is not http(s).
pub fn display_domain(url: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^https?://(?:www\.)?([^/?#]+)").expect("domain pattern should compile")
    });
    pattern
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| url.to_string())
}

/// `host[:port]` as the favicon proxy expects it.
pub fn favicon_authority(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Collapses whitespace and cuts to at most `max_chars` characters, ending in `…` when cut.
pub fn truncate_snippet(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(max_chars.saturating_sub(1)).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}

pub fn join_subtitle(parts: &[Option<String>]) -> String {
    parts
        .iter()
        .flatten()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(SUBTITLE_SEPARATOR)
}

pub fn strip_punctuation(text: &str) -> String {
    text.chars()
        .map(|ch| if ch.is_alphanumeric() || ch.is_whitespace() { ch } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// `GitHub` -> `Git Hub`, `iPhone15` -> `i Phone15`.
pub fn split_camel_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut previous: Option<char> = None;
    for ch in text.chars() {
        if let Some(prev) = previous {
            if ch.is_uppercase() && (prev.is_lowercase() || prev.is_ascii_digit()) {
                out.push(' ');
            }
        }
        out.push(ch);
        previous = Some(ch);
    }
    out
}

/// Extra text the launcher's own filter can match against.
pub fn match_text(title: &str, snippet: &str) -> String {
    let mut variants: Vec<String> = Vec::new();
    for source in [title, snippet] {
        for variant in [
            source.trim().to_string(),
            strip_punctuation(source),
            split_camel_case(&strip_punctuation(source)),
        ] {
            if !variant.is_empty() && !variants.contains(&variant) {
                variants.push(variant);
            }
        }
    }
    variants.join(" ")
}

fn result_detail_parts(result: &SearchResult, parsed: &ParsedQuery) -> Vec<Option<String>> {
    let mut parts = Vec::new();

    let is_news =
        parsed.category == Some(Category::News) || result.category.as_deref() == Some("news");
    if is_news {
        parts.push(
            result
                .published_date
                .as_deref()
                .map(|date| date.chars().take(10).collect::<String>()),
        );
    }

    match result.content_text() {
        Some(content) => parts.push(Some(truncate_snippet(content, SNIPPET_MAX_CHARS))),
        None => {
            parts.push(result.resolution.clone());
            parts.push(result.filesize_text());
        }
    }
    parts
}

pub fn result_to_display_item(
    result: &SearchResult,
    parsed: &ParsedQuery,
    backend_url: &str,
    favicons: &mut FaviconResolver<'_>,
) -> DisplayItem {
    let domain = display_domain(&result.url);
    let title = if result.title.trim().is_empty() {
        domain.clone()
    } else {
        result.title.trim().to_string()
    };
    let snippet = result
        .content_text()
        .map(|content| truncate_snippet(content, SNIPPET_MAX_CHARS))
        .unwrap_or_default();

    let mut parts = vec![Some(domain), parsed.filter_summary()];
    parts.extend(result_detail_parts(result, parsed));
    let subtitle = join_subtitle(&parts);

    let icon_path = match favicon_authority(&result.url) {
        Some(authority) => favicons.favicon_path(&authority),
        None => FALLBACK_ICON.to_string(),
    };

    let quicklookurl = if parsed.category == Some(Category::Images) {
        result.image_source().unwrap_or(&result.url).to_string()
    } else {
        result.url.clone()
    };

    let web_url = search_url(backend_url, parsed, None);
    let web_subtitle = match parsed.filter_summary() {
        Some(summary) => format!("Open '{}' in SearXNG ({summary})", parsed.query),
        None => format!("Open '{}' in SearXNG", parsed.query),
    };

    let mods = Mods {
        cmd: Some(Modifier {
            arg: Some(web_url),
            subtitle: web_subtitle,
            valid: true,
        }),
        alt: result.engine.as_deref().map(|engine| Modifier {
            arg: Some(result.url.clone()),
            subtitle: format!("Found via {engine} · {}", result.url),
            valid: true,
        }),
        ..Default::default()
    };

    DisplayItem {
        title: title.clone(),
        subtitle,
        arg: Some(result.url.clone()),
        icon: Some(Icon::new(icon_path)),
        quicklookurl: Some(quicklookurl),
        match_text: Some(match_text(&title, &snippet)),
        autocomplete: None,
        variables: BTreeMap::new(),
        mods: Some(mods),
        valid: true,
        text: Some(ItemText {
            copy: result.url.clone(),
            largetype: format!("{title}\n{}", result.url),
        }),
    }
}

pub fn suggestion_subtitle(parsed: &ParsedQuery) -> String {
    let mut subtitle = String::from("Search");
    if let Some(category) = parsed.category {
        subtitle.push(' ');
        subtitle.push_str(category.label());
    }
    if let Some(time_range) = parsed.time_range {
        subtitle.push_str(&format!(" ({})", time_range.label()));
    }
    subtitle.push_str(" for this suggestion");
    subtitle
}

pub fn suggestion_to_item(suggestion: &str, parsed: &ParsedQuery) -> DisplayItem {
    let mut variables = BTreeMap::new();
    if let Some(category) = parsed.category {
        variables.insert("category".to_string(), category.as_str().to_string());
    }
    if let Some(time_range) = parsed.time_range {
        variables.insert("time_range".to_string(), time_range.as_str().to_string());
    }

    DisplayItem {
        title: suggestion.to_string(),
        subtitle: suggestion_subtitle(parsed),
        arg: Some(suggestion.to_string()),
        icon: Some(Icon::new(FALLBACK_ICON)),
        quicklookurl: None,
        match_text: None,
        autocomplete: Some(format!("{}{suggestion}", parsed.bang_prefix())),
        variables,
        mods: None,
        valid: true,
        text: None,
    }
}

pub fn separator_item(label: &str) -> DisplayItem {
    DisplayItem::info(format!("──── {label} ────"), "")
}

/// Error row; actionable only when `arg` is given, every modifier disabled.
pub fn error_item(title: &str, subtitle: &str, arg: Option<String>) -> DisplayItem {
    DisplayItem {
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        valid: arg.is_some(),
        arg,
        icon: Some(Icon::new(ERROR_ICON)),
        mods: Some(Mods::all_disabled(subtitle)),
        text: Some(ItemText {
            copy: subtitle.to_string(),
            largetype: format!("{title}\n{subtitle}"),
        }),
        ..DisplayItem::info("", "")
    }
}

/// "Search in browser" row carrying the raw query and active filters.
pub fn fallback_item(parsed: &ParsedQuery, backend_url: &str) -> DisplayItem {
    let subtitle = match parsed.filter_summary() {
        Some(summary) => format!("Open SearXNG in your browser · {summary}"),
        None => "Open SearXNG in your browser".to_string(),
    };
    DisplayItem {
        title: format!("Search SearXNG for '{}'", parsed.query),
        subtitle,
        arg: Some(search_url(backend_url, parsed, None)),
        icon: Some(Icon::new(FALLBACK_ICON)),
        valid: true,
        ..DisplayItem::info("", "")
    }
}

pub fn config_error_item(message: &str) -> DisplayItem {
    error_item(
        "SearXNG is not configured",
        &format!("{message}. Set it in the workflow configuration."),
        None,
    )
}

pub fn empty_input_item() -> DisplayItem {
    DisplayItem {
        icon: Some(Icon::new(FALLBACK_ICON)),
        ..DisplayItem::info(
            "Search SearXNG",
            "Type a query. Filters: !i !n !v !maps, time: !d !m !y",
        )
    }
}

pub fn filters_only_item(parsed: &ParsedQuery) -> DisplayItem {
    let summary = parsed.filter_summary().unwrap_or_default();
    DisplayItem {
        icon: Some(Icon::new(FALLBACK_ICON)),
        ..DisplayItem::info(
            format!("Search SearXNG · {summary}"),
            "Type a query to search with these filters",
        )
    }
}

pub fn no_results_item(parsed: &ParsedQuery) -> DisplayItem {
    let subtitle = if parsed.has_filters() {
        "Try different keywords or remove filters"
    } else {
        "Try different keywords"
    };
    error_item(&format!("No results for '{}'", parsed.query), subtitle, None)
}

/// The error row for a failed full search; `None` for successful classifications.
pub fn classification_error_item(
    classification: &Classification,
    parsed: &ParsedQuery,
    backend_url: &str,
) -> Option<DisplayItem> {
    let item = match classification {
        Classification::NetworkError(detail) => error_item(
            "Could not reach SearXNG",
            &truncate_snippet(&format!("{backend_url} · {detail}"), 120),
            None,
        ),
        Classification::EmptyResponse => error_item(
            "SearXNG returned an empty response",
            &format!("Check that the instance at {backend_url} is running"),
            None,
        ),
        Classification::HtmlNotJson => error_item(
            "SearXNG JSON API is disabled",
            "Add json to search.formats in settings.yml (↵ opens the docs)",
            Some(JSON_FORMAT_DOCS_URL.to_string()),
        ),
        Classification::InvalidResponse(detail) => error_item(
            "Invalid response from SearXNG",
            &truncate_snippet(detail, 120),
            None,
        ),
        Classification::ApiError(message) => error_item(
            "SearXNG reported an error",
            &truncate_snippet(message, 120),
            None,
        ),
        Classification::NoResults => no_results_item(parsed),
        Classification::Ok(_) => return None,
    };
    Some(item)
}

/// Generic non-actionable row for unexpected failures; diagnostics go to copy/large type.
pub fn internal_error_item(message: &str, context: &[(String, String)]) -> DisplayItem {
    let message = if message.trim().is_empty() {
        "unknown error"
    } else {
        message.trim()
    };

    let mut details = vec![format!("error: {message}")];
    details.extend(context.iter().map(|(key, value)| format!("{key}: {value}")));
    details.push(format!("version: {}", env!("CARGO_PKG_VERSION")));
    let details = details.join("\n");

    DisplayItem {
        text: Some(ItemText {
            copy: details.clone(),
            largetype: details,
        }),
        ..error_item("Internal Error", message, None)
    }
}

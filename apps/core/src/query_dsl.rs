use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Images,
    News,
    Videos,
    Maps,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Images => "images",
            Self::News => "news",
            Self::Videos => "videos",
            Self::Maps => "maps",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Images => "Images",
            Self::News => "News",
            Self::Videos => "Videos",
            Self::Maps => "Maps",
        }
    }

    fn bang(self) -> &'static str {
        match self {
            Self::Images => "!images",
            Self::News => "!news",
            Self::Videos => "!videos",
            Self::Maps => "!maps",
        }
    }
}

/// Recency filters the backend accepts. There is intentionally no week variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    Day,
    Month,
    Year,
}

impl TimeRange {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "Past day",
            Self::Month => "Past month",
            Self::Year => "Past year",
        }
    }

    fn bang(self) -> &'static str {
        match self {
            Self::Day => "!d",
            Self::Month => "!m",
            Self::Year => "!y",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bang {
    Category(Category),
    TimeRange(TimeRange),
}

const BANGS: [(&str, Bang); 10] = [
    ("images", Bang::Category(Category::Images)),
    ("i", Bang::Category(Category::Images)),
    ("news", Bang::Category(Category::News)),
    ("n", Bang::Category(Category::News)),
    ("videos", Bang::Category(Category::Videos)),
    ("v", Bang::Category(Category::Videos)),
    ("maps", Bang::Category(Category::Maps)),
    ("d", Bang::TimeRange(TimeRange::Day)),
    ("m", Bang::TimeRange(TimeRange::Month)),
    ("y", Bang::TimeRange(TimeRange::Year)),
];

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedQuery {
    pub query: String,
    pub category: Option<Category>,
    pub time_range: Option<TimeRange>,
}

impl ParsedQuery {
    /// Extracts category and time-range bangs from free text.
    ///
    /// Bangs only match as whole tokens, case-insensitively. Every occurrence is
    /// removed; when one family appears more than once, the occurrence furthest
    /// to the right wins.
    pub fn parse(raw: &str) -> Self {
        let mut working = raw.to_string();
        let mut category = None;
        let mut time_range = None;

        loop {
            let Some(caps) = bang_pattern().captures(&working) else {
                break;
            };
            let Some(whole) = caps.get(0) else {
                break;
            };
            let range = whole.range();
            let lead = caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default();
            let key = caps
                .get(2)
                .map(|m| m.as_str().to_ascii_lowercase())
                .unwrap_or_default();

            match lookup_bang(&key) {
                Some(Bang::Category(value)) => category = Some(value),
                Some(Bang::TimeRange(value)) => time_range = Some(value),
                None => break,
            }

            working.replace_range(range, &lead);
        }

        let query = space_run_pattern()
            .replace_all(&working, "  ")
            .trim()
            .to_string();

        Self {
            query,
            category,
            time_range,
        }
    }

    pub fn has_filters(&self) -> bool {
        self.category.is_some() || self.time_range.is_some()
    }

    /// Human summary of active filters, e.g. `Images · Past day`.
    pub fn filter_summary(&self) -> Option<String> {
        let parts: Vec<&str> = [
            self.category.map(Category::label),
            self.time_range.map(TimeRange::label),
        ]
        .into_iter()
        .flatten()
        .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" · "))
        }
    }

    /// Active filters written back as bangs, with a trailing space when non-empty.
    pub fn bang_prefix(&self) -> String {
        let mut prefix = String::new();
        if let Some(category) = self.category {
            prefix.push_str(category.bang());
            prefix.push(' ');
        }
        if let Some(time_range) = self.time_range {
            prefix.push_str(time_range.bang());
            prefix.push(' ');
        }
        prefix
    }
}

pub fn parse_bangs(raw: &str) -> ParsedQuery {
    ParsedQuery::parse(raw)
}

fn lookup_bang(key: &str) -> Option<Bang> {
    BANGS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, bang)| *bang)
}

fn bang_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let keys: Vec<&str> = BANGS.iter().map(|(name, _)| *name).collect();
        let pattern = format!(r"(?i)(^|\s)!({})(?:\s|$)", keys.join("|"));
        Regex::new(&pattern).expect("bang pattern should compile")
    })
}

fn space_run_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r" {3,}").expect("space pattern should compile"))
}

#[cfg(test)]
mod tests {
    use super::{parse_bangs, Category, ParsedQuery, TimeRange};

    #[test]
    fn parses_short_and_long_category_bangs() {
        for (raw, expected) in [
            ("!i cats", Category::Images),
            ("!images cats", Category::Images),
            ("!n cats", Category::News),
            ("!news cats", Category::News),
            ("!v cats", Category::Videos),
            ("!videos cats", Category::Videos),
            ("!maps cats", Category::Maps),
        ] {
            let parsed = parse_bangs(raw);
            assert_eq!(parsed.category, Some(expected), "{raw}");
            assert_eq!(parsed.query, "cats", "{raw}");
            assert_eq!(parsed.time_range, None, "{raw}");
        }
    }

    #[test]
    fn maps_has_no_short_form() {
        let parsed = parse_bangs("!ma berlin");
        assert_eq!(parsed.category, None);
        assert_eq!(parsed.query, "!ma berlin");
    }

    #[test]
    fn parses_time_range_bangs() {
        assert_eq!(parse_bangs("!d rust").time_range, Some(TimeRange::Day));
        assert_eq!(parse_bangs("rust !m").time_range, Some(TimeRange::Month));
        assert_eq!(parse_bangs("rust !Y release").time_range, Some(TimeRange::Year));
    }

    #[test]
    fn week_bang_is_not_recognized() {
        let parsed = parse_bangs("!w rust");
        assert_eq!(parsed.time_range, None);
        assert_eq!(parsed.query, "!w rust");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let parsed = parse_bangs("!IMAGES !D sunsets");
        assert_eq!(parsed.category, Some(Category::Images));
        assert_eq!(parsed.time_range, Some(TimeRange::Day));
        assert_eq!(parsed.query, "sunsets");
    }

    #[test]
    fn does_not_match_inside_words() {
        let parsed = parse_bangs("exciting news");
        assert_eq!(parsed.category, None);
        assert_eq!(parsed.query, "exciting news");

        let parsed = parse_bangs("monday!d wat!i");
        assert_eq!(parsed.time_range, None);
        assert_eq!(parsed.category, None);
        assert_eq!(parsed.query, "monday!d wat!i");

        let parsed = parse_bangs("!images2 cats");
        assert_eq!(parsed.category, None);
    }

    #[test]
    fn later_occurrence_wins_within_a_family() {
        assert_eq!(parse_bangs("!i !n search").category, Some(Category::News));
        assert_eq!(parse_bangs("!n !i search").category, Some(Category::Images));
        assert_eq!(parse_bangs("!y search !d").time_range, Some(TimeRange::Day));
        assert_eq!(parse_bangs("!i !n search").query, "search");
    }

    #[test]
    fn duplicate_bangs_are_all_removed() {
        let parsed = parse_bangs("!i !i cats !i");
        assert_eq!(parsed.category, Some(Category::Images));
        assert_eq!(parsed.query, "cats");
    }

    #[test]
    fn removal_keeps_single_spacing() {
        assert_eq!(parse_bangs("!n breaking story").query, "breaking story");
        assert_eq!(parse_bangs("breaking story !n").query, "breaking story");
        assert_eq!(parse_bangs("breaking !n story").query, "breaking story");
        assert_eq!(parse_bangs("a !n !d b").query, "a b");
    }

    #[test]
    fn long_space_runs_collapse_to_two_spaces() {
        // Runs of three or more collapse to two, not one.
        assert_eq!(parse_bangs("a     b").query, "a  b");
        assert_eq!(parse_bangs("a  b").query, "a  b");
        assert_eq!(parse_bangs("  padded  ").query, "padded");
    }

    #[test]
    fn unknown_bangs_pass_through() {
        let parsed = parse_bangs("!foo !gh rust");
        assert_eq!(parsed.query, "!foo !gh rust");
        assert!(!parsed.has_filters());
    }

    #[test]
    fn plain_text_is_only_trimmed() {
        for raw in ["rust", "  hello world ", "what's up?", "café", ""] {
            let parsed = parse_bangs(raw);
            assert_eq!(parsed.query, raw.trim());
            assert_eq!(parsed, ParsedQuery { query: raw.trim().to_string(), ..Default::default() });
        }
    }

    #[test]
    fn bang_only_input_yields_empty_query() {
        let parsed = parse_bangs("!n !d");
        assert_eq!(parsed.query, "");
        assert_eq!(parsed.category, Some(Category::News));
        assert_eq!(parsed.time_range, Some(TimeRange::Day));
    }

    #[test]
    fn summarizes_filters() {
        let parsed = parse_bangs("!i !d sunsets");
        assert_eq!(parsed.filter_summary().as_deref(), Some("Images · Past day"));
        assert_eq!(parse_bangs("!y x").filter_summary().as_deref(), Some("Past year"));
        assert_eq!(parse_bangs("x").filter_summary(), None);
    }

    #[test]
    fn bang_prefix_round_trips_filters() {
        let parsed = parse_bangs("!v !m trailers");
        assert_eq!(parsed.bang_prefix(), "!videos !m ");
        let reparsed = parse_bangs(&format!("{}{}", parsed.bang_prefix(), parsed.query));
        assert_eq!(reparsed, parsed);
        assert_eq!(parse_bangs("plain").bang_prefix(), "");
    }
}

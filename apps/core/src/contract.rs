use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Icon {
    pub path: String,
}

impl Icon {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Alternate action shown while a modifier key is held.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Modifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,
    pub subtitle: String,
    pub valid: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mods {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmd: Option<Modifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<Modifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ctrl: Option<Modifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shift: Option<Modifier>,
    #[serde(rename = "fn", skip_serializing_if = "Option::is_none")]
    pub function: Option<Modifier>,
}

impl Mods {
    /// Every modifier present and disabled, all showing the same subtitle.
    pub fn all_disabled(subtitle: &str) -> Self {
        let disabled = || {
            Some(Modifier {
                arg: None,
                subtitle: subtitle.to_string(),
                valid: false,
            })
        };
        Self {
            cmd: disabled(),
            alt: disabled(),
            ctrl: disabled(),
            shift: disabled(),
            function: disabled(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemText {
    pub copy: String,
    pub largetype: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DisplayItem {
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quicklookurl: Option<String>,
    #[serde(rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocomplete: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub variables: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mods: Option<Mods>,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<ItemText>,
}

impl DisplayItem {
    /// A non-actionable row with only a title and subtitle.
    pub fn info(title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: subtitle.into(),
            arg: None,
            icon: None,
            quicklookurl: None,
            match_text: None,
            autocomplete: None,
            variables: BTreeMap::new(),
            mods: None,
            valid: false,
            text: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheDirective {
    pub seconds: u32,
    pub loosereload: bool,
}

/// Envelope printed to stdout for the launcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScriptFilterResponse {
    pub items: Vec<DisplayItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheDirective>,
}

impl ScriptFilterResponse {
    pub fn uncached(items: Vec<DisplayItem>) -> Self {
        Self { items, cache: None }
    }
}

/// Wraps items in the envelope; the cache directive is only attached when
/// caching is enabled and `seconds` is positive.
pub fn build_response(
    items: Vec<DisplayItem>,
    seconds: Option<i64>,
    cache_enabled: bool,
) -> ScriptFilterResponse {
    let cache = match seconds {
        Some(seconds) if cache_enabled && seconds > 0 => Some(CacheDirective {
            seconds: u32::try_from(seconds).unwrap_or(u32::MAX),
            loosereload: true,
        }),
        _ => None,
    };
    ScriptFilterResponse { items, cache }
}

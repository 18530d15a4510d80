use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One entry of the backend's `results` array. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchResult {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "publishedDate")]
    pub published_date: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub img_src: Option<String>,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub filesize: Option<Value>,
}

impl SearchResult {
    pub fn new(title: &str, url: &str) -> Self {
        Self {
            title: title.to_string(),
            url: url.to_string(),
            ..Default::default()
        }
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    pub fn content_text(&self) -> Option<&str> {
        non_blank(self.content.as_deref())
    }

    pub fn image_source(&self) -> Option<&str> {
        non_blank(self.img_src.as_deref()).or_else(|| non_blank(self.thumbnail.as_deref()))
    }

    /// File size as display text; the backend sends either a string or a byte count.
    pub fn filesize_text(&self) -> Option<String> {
        match self.filesize.as_ref()? {
            Value::String(text) => non_blank(Some(text)).map(str::to_string),
            Value::Number(number) => number.as_u64().map(format_bytes),
            _ => None,
        }
    }
}

/// Decoded body of `GET /search?format=json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResponse {
    pub results: Vec<SearchResult>,
    pub error: Option<String>,
    pub suggestions: Vec<String>,
    pub number_of_results: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawSearchResponse {
    #[serde(default)]
    results: Option<Vec<Value>>,
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    suggestions: Option<Vec<Value>>,
    #[serde(default)]
    number_of_results: Option<Value>,
}

impl SearchResponse {
    /// Decodes a search payload. Individual results that fail to decode, or
    /// carry no URL, are dropped instead of failing the whole page.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let raw: RawSearchResponse = serde_json::from_str(body)?;

        let results = raw
            .results
            .unwrap_or_default()
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<SearchResult>(value) {
                Ok(result) if !result.url.trim().is_empty() => Some(result),
                Ok(_) => None,
                Err(error) => {
                    log::warn!("skipping malformed search result: {error}");
                    None
                }
            })
            .collect();

        let error = raw.error.and_then(|value| match value {
            Value::Null => None,
            Value::String(text) if text.trim().is_empty() => None,
            Value::String(text) => Some(text),
            other => Some(other.to_string()),
        });

        let suggestions = raw
            .suggestions
            .unwrap_or_default()
            .into_iter()
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect();

        Ok(Self {
            results,
            error,
            suggestions,
            number_of_results: raw
                .number_of_results
                .and_then(|value| value.as_f64())
                .map(|count| count as u64),
        })
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}

use crate::model::SearchResponse;
use crate::transport::FetchOutcome;

const HTML_MARKERS: [&str; 4] = ["<!doctype", "<html", "<head", "<body"];

/// How a full-search fetch turned out.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    NetworkError(String),
    EmptyResponse,
    HtmlNotJson,
    InvalidResponse(String),
    ApiError(String),
    NoResults,
    Ok(SearchResponse),
}

impl Classification {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NetworkError(_) => "network-error",
            Self::EmptyResponse => "empty-response",
            Self::HtmlNotJson => "html-not-json",
            Self::InvalidResponse(_) => "invalid-response",
            Self::ApiError(_) => "api-error",
            Self::NoResults => "no-results",
            Self::Ok(_) => "ok",
        }
    }
}

pub fn classify_search(outcome: &FetchOutcome) -> Classification {
    let body = match outcome {
        FetchOutcome::Failure(detail) => return Classification::NetworkError(detail.clone()),
        FetchOutcome::Success { body, .. } => body,
    };

    if body.trim().is_empty() {
        return Classification::EmptyResponse;
    }

    let response = match SearchResponse::from_json(body) {
        Ok(response) => response,
        Err(error) => {
            if looks_like_html(body) {
                return Classification::HtmlNotJson;
            }
            return Classification::InvalidResponse(error.to_string());
        }
    };

    if let Some(message) = response.error.clone() {
        return Classification::ApiError(message);
    }

    if response.results.is_empty() {
        return Classification::NoResults;
    }

    Classification::Ok(response)
}

pub fn looks_like_html(body: &str) -> bool {
    let lowered = body.to_ascii_lowercase();
    HTML_MARKERS.iter().any(|marker| lowered.contains(marker))
}

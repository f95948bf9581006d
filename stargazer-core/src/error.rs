use reqwest::StatusCode;
use thiserror::Error;

/// Rejected coordinate input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter coordinates in the format <latitude, longitude>!")]
    Missing,

    #[error("Invalid format '{input}'! Please use <latitude, longitude>.")]
    Malformed { input: String },
}

/// Failure while retrieving or decoding a remote document.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("Failed to send request to {url}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} failed with status {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to parse response from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Grid metadata response is missing the '{0}' link")]
    MissingLink(&'static str),

    #[error("Malformed payload from {url}: {reason}")]
    Malformed { url: String, reason: String },
}

/// Anything that aborts a forecast run.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        let head: String = body.chars().take(MAX).collect();
        format!("{head}...")
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_kept() {
        assert_eq!(truncate_body("not found"), "not found");
    }

    #[test]
    fn long_bodies_are_cut_on_char_boundaries() {
        let body = "é".repeat(300);
        let cut = truncate_body(&body);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }

    #[test]
    fn validation_error_wraps_transparently() {
        let err: ForecastError = ValidationError::Missing.into();
        assert!(err.to_string().contains("<latitude, longitude>"));
    }
}

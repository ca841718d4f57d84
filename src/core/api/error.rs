//! Backend request errors.

/// Errors from a single backend request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The body did not decode and the status was not a success.
    #[error("{url} answered HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("Unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

#[cfg(test)]
mod tests {
    use super::ApiError;

    #[test]
    fn status_error_names_url_and_code() {
        let err = ApiError::Status {
            url: "http://localhost/api/get-itinerary/9/".into(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "http://localhost/api/get-itinerary/9/ answered HTTP 404"
        );
    }

    #[test]
    fn decode_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let err = ApiError::Decode {
            url: "http://localhost/".into(),
            source,
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("Unexpected response from http://localhost/"));
    }
}

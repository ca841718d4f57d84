//! `Backend` over HTTP with `reqwest`, sharing one cookie store across requests.

use std::sync::Arc;

use reqwest::Url;
use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;

use super::csrf;
use super::paths;
use super::types::ChatRequest;
use super::{
    ApiError, ApiKeyEntry, Backend, ChatMessage, ChatReply, Itinerary, ItineraryId,
    ItinerarySummary, MapData,
};

/// HTTP client bound to one backend base URL.
pub struct HttpBackend {
    client: reqwest::Client,
    jar: Arc<Jar>,
    base: Url,
    configured_token: Option<String>,
    embedded_token: Option<String>,
}

impl HttpBackend {
    /// `base_url` must be absolute; a trailing `/` is added so endpoint paths nest under it.
    pub fn new(base_url: &str, csrf_token: Option<String>) -> Result<Self, ApiError> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base = Url::parse(&normalized)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()
            .map_err(|source| ApiError::Transport {
                url: base.to_string(),
                source,
            })?;
        Ok(Self {
            client,
            jar,
            base,
            configured_token: csrf_token.filter(|t| !t.is_empty()),
            embedded_token: None,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Load the backend's home page once so its CSRF cookie lands in the jar
    /// and its embedded form token is remembered. Failure only means the
    /// chat POST may go out without a token.
    pub async fn prime_csrf(&mut self) {
        if self.configured_token.is_some() {
            return;
        }
        let url = self.base.clone();
        match self.client.get(url.clone()).send().await {
            Ok(resp) => match resp.text().await {
                Ok(html) => {
                    self.embedded_token = csrf::embedded_token(&html);
                    log::debug!(
                        "CSRF priming: embedded token {}",
                        if self.embedded_token.is_some() { "found" } else { "absent" }
                    );
                }
                Err(e) => log::warn!("CSRF priming: could not read {}: {}", url, e),
            },
            Err(e) => log::warn!("CSRF priming: could not fetch {}: {}", url, e),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::InvalidUrl(format!("{}{}: {}", self.base, path, e)))
    }

    /// Token for the chat POST, if any source provides one.
    pub fn csrf_token(&self) -> Option<String> {
        let cookies = self
            .jar
            .cookies(&self.base)
            .and_then(|h| h.to_str().ok().map(str::to_string));
        csrf::resolve(
            self.configured_token.as_deref(),
            self.embedded_token.as_deref(),
            cookies.as_deref(),
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        log::debug!("GET {}", url);
        let resp = self
            .client
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;
        read_json(&url, resp).await
    }
}

/// Decode the body whatever the status: the backend reports chat failures
/// as a 500 whose JSON body is still meant for display.
async fn read_json<T: DeserializeOwned>(url: &Url, resp: reqwest::Response) -> Result<T, ApiError> {
    let status = resp.status();
    let body = resp.bytes().await.map_err(|source| ApiError::Transport {
        url: url.to_string(),
        source,
    })?;
    match serde_json::from_slice(&body) {
        Ok(value) => {
            if !status.is_success() {
                log::warn!("{} answered HTTP {} with a JSON body", url, status.as_u16());
            }
            Ok(value)
        }
        Err(_) if !status.is_success() => Err(ApiError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        }),
        Err(source) => Err(ApiError::Decode {
            url: url.to_string(),
            source,
        }),
    }
}

impl Backend for HttpBackend {
    async fn api_keys(&self) -> Result<Vec<ApiKeyEntry>, ApiError> {
        self.get_json(paths::API_KEYS).await
    }

    async fn itineraries(&self) -> Result<Vec<ItinerarySummary>, ApiError> {
        self.get_json(paths::ITINERARIES).await
    }

    async fn itinerary(&self, id: ItineraryId) -> Result<Itinerary, ApiError> {
        self.get_json(&paths::itinerary(id)).await
    }

    async fn map_data(&self, id: Option<ItineraryId>) -> Result<MapData, ApiError> {
        self.get_json(&paths::map_data(id)).await
    }

    async fn chat_history(&self) -> Result<Vec<ChatMessage>, ApiError> {
        self.get_json(paths::CHAT_HISTORY).await
    }

    async fn send_chat_message(&self, message: &str) -> Result<ChatReply, ApiError> {
        let url = self.endpoint(paths::CHAT_MESSAGE)?;
        log::debug!("POST {}", url);
        let mut req = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&ChatRequest { message });
        match self.csrf_token() {
            Some(token) => req = req.header(csrf::HEADER_NAME, token),
            None => log::warn!("No CSRF token available; sending chat message without one"),
        }
        let resp = req.send().await.map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;
        read_json(&url, resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_appends_trailing_slash() {
        let backend = HttpBackend::new("http://127.0.0.1:8000", None).unwrap();
        assert_eq!(backend.base_url().as_str(), "http://127.0.0.1:8000/");
    }

    #[test]
    fn endpoints_nest_under_base_path() {
        let backend = HttpBackend::new("http://example.test/travel", None).unwrap();
        let url = backend.endpoint(&paths::itinerary(5)).unwrap();
        assert_eq!(url.as_str(), "http://example.test/travel/api/get-itinerary/5/");
    }

    #[test]
    fn new_rejects_relative_url() {
        assert!(matches!(
            HttpBackend::new("not a url", None),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn configured_token_wins() {
        let backend = HttpBackend::new("http://127.0.0.1:8000", Some("cfg".into())).unwrap();
        assert_eq!(backend.csrf_token().as_deref(), Some("cfg"));
    }

    #[test]
    fn token_falls_back_to_cookie_jar() {
        let backend = HttpBackend::new("http://127.0.0.1:8000", None).unwrap();
        assert_eq!(backend.csrf_token(), None);
        backend
            .jar
            .add_cookie_str("csrftoken=jar-token; Path=/", backend.base_url());
        assert_eq!(backend.csrf_token().as_deref(), Some("jar-token"));
    }
}

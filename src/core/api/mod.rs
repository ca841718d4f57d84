//! Backend API: wire types, the `Backend` seam used by the sync controller,
//! and its HTTP implementation.

pub mod csrf;
mod error;
mod http;
pub mod types;

pub use error::ApiError;
pub use http::HttpBackend;
pub use types::{
    ApiKeyEntry, ChatMessage, ChatReply, Day, Destination, Itinerary, ItineraryId,
    ItinerarySummary, MapData, Place, Role,
};

/// Endpoint paths, relative to the configured base URL.
pub mod paths {
    use super::ItineraryId;

    pub const API_KEYS: &str = "api/api-keys/";
    pub const ITINERARIES: &str = "api/get-itineraries/";
    pub const CHAT_HISTORY: &str = "api/chat-history/";
    pub const CHAT_MESSAGE: &str = "api/chat-message/";
    pub const MAP_DATA: &str = "api/map-data/";

    pub fn itinerary(id: ItineraryId) -> String {
        format!("api/get-itinerary/{}/", id)
    }

    /// Scoped to one itinerary, or the backend's most recent one when `None`.
    pub fn map_data(id: Option<ItineraryId>) -> String {
        match id {
            Some(id) => format!("api/map-data/{}/", id),
            None => MAP_DATA.to_string(),
        }
    }
}

/// The fetch operations the page needs. One call per request; no caching,
/// retries or de-duplication happen behind this trait.
pub trait Backend {
    async fn api_keys(&self) -> Result<Vec<ApiKeyEntry>, ApiError>;

    async fn itineraries(&self) -> Result<Vec<ItinerarySummary>, ApiError>;

    async fn itinerary(&self, id: ItineraryId) -> Result<Itinerary, ApiError>;

    async fn map_data(&self, id: Option<ItineraryId>) -> Result<MapData, ApiError>;

    async fn chat_history(&self) -> Result<Vec<ChatMessage>, ApiError>;

    /// POST a user message; the reply may name an itinerary the backend just created.
    async fn send_chat_message(&self, message: &str) -> Result<ChatReply, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::paths;

    #[test]
    fn map_data_path_scoping() {
        assert_eq!(paths::map_data(None), "api/map-data/");
        assert_eq!(paths::map_data(Some(12)), "api/map-data/12/");
    }

    #[test]
    fn itinerary_path() {
        assert_eq!(paths::itinerary(3), "api/get-itinerary/3/");
    }
}

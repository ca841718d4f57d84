//! Wire types of the travel backend. Unknown fields are ignored.

use serde::{Deserialize, Serialize};

/// Backend primary key of an itinerary.
pub type ItineraryId = i64;

/// Entry of `GET /api/api-keys/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiKeyEntry {
    pub name: String,
}

/// Entry of `GET /api/get-itineraries/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ItinerarySummary {
    pub id: ItineraryId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Destination {
    pub name: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Destination {
    /// `(lat, lng)` when both coordinates are present.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Day {
    pub day_number: i64,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Place {
    /// `(lat, lng)` when both coordinates are present; only such places get a marker or badge.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }
}

/// `GET /api/get-itinerary/{id}/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Itinerary {
    #[serde(default)]
    pub id: Option<ItineraryId>,
    pub title: String,
    #[serde(default)]
    pub destination: Option<Destination>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub days: Vec<Day>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub places: Vec<Place>,
}

impl Itinerary {
    /// Days in ascending `day_number` order; the backend order is not trusted.
    pub fn sorted_days(&self) -> Vec<&Day> {
        let mut days: Vec<&Day> = self.days.iter().collect();
        days.sort_by_key(|d| d.day_number);
        days
    }
}

/// `GET /api/map-data/` and `GET /api/map-data/{id}/`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MapData {
    #[serde(default)]
    pub destination: Option<Destination>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub places: Vec<Place>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// Entry of `GET /api/chat-history/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// ISO 8601 creation time, when the backend sends one.
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: None,
        }
    }
}

/// Body of `POST /api/chat-message/`.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

/// Reply of `POST /api/chat-message/`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatReply {
    pub message: String,
    #[serde(default)]
    pub itinerary_id: Option<ItineraryId>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn itinerary_with_nulls_and_extra_fields() {
        let json = serde_json::json!({
            "id": 4,
            "title": "Paris Itinerary",
            "destination": {"id": 1, "name": "Paris", "latitude": 48.85, "longitude": 2.35},
            "content": "Day 1: ...",
            "days": null,
            "places": [{"id": 9, "name": "Louvre", "latitude": null, "longitude": 2.33, "description": null}],
            "created_at": "2024-05-01T10:00:00Z"
        });
        let itinerary: Itinerary = serde_json::from_value(json).unwrap();
        assert!(itinerary.days.is_empty());
        assert_eq!(itinerary.places.len(), 1);
        assert_eq!(itinerary.places[0].coordinates(), None);
        assert_eq!(
            itinerary.destination.unwrap().coordinates(),
            Some((48.85, 2.35))
        );
    }

    #[test]
    fn itinerary_minimal() {
        let itinerary: Itinerary = serde_json::from_str(r#"{"title": "Trip"}"#).unwrap();
        assert_eq!(itinerary.title, "Trip");
        assert!(itinerary.destination.is_none());
        assert!(itinerary.content.is_none());
    }

    #[test]
    fn sorted_days_ascending_regardless_of_input_order() {
        let itinerary: Itinerary = serde_json::from_value(serde_json::json!({
            "title": "T",
            "days": [
                {"day_number": 3, "content": "c"},
                {"day_number": 1, "content": "a"},
                {"day_number": 2, "content": "b"}
            ]
        }))
        .unwrap();
        let order: Vec<i64> = itinerary.sorted_days().iter().map(|d| d.day_number).collect();
        assert_eq!(order, vec![1, 2, 3]);
    }

    #[test]
    fn zero_is_a_present_coordinate() {
        let place = Place {
            name: "Null Island".into(),
            description: None,
            latitude: Some(0.0),
            longitude: Some(0.0),
        };
        assert_eq!(place.coordinates(), Some((0.0, 0.0)));
    }

    #[test]
    fn chat_message_roles() {
        let msgs: Vec<ChatMessage> = serde_json::from_str(
            r#"[{"role":"user","content":"hi","timestamp":"2024-05-01T10:00:00Z"},{"role":"assistant","content":"hello"}]"#,
        )
        .unwrap();
        assert_eq!(msgs[0].role, Role::User);
        assert_eq!(msgs[1].role, Role::Assistant);
        assert!(msgs[1].timestamp.is_none());
    }

    #[test]
    fn chat_reply_with_itinerary() {
        let reply: ChatReply =
            serde_json::from_str(r#"{"message":"created","itinerary_id":7}"#).unwrap();
        assert_eq!(reply.itinerary_id, Some(7));
        let reply: ChatReply = serde_json::from_str(r#"{"message":"ok"}"#).unwrap();
        assert_eq!(reply.itinerary_id, None);
    }
}

//! Page session state: every panel, the map, and the current selection.
//!
//! One `Page` is owned by the sync controller; the views only read it.

use crate::core::api::{ChatMessage, Itinerary, ItineraryId, ItinerarySummary, Role};
use crate::core::formatter;
use crate::core::map::{LatLng, MapView};

pub const NO_ITINERARIES: &str = "No itineraries yet. Use the chat to create one!";
pub const ITINERARIES_ERROR: &str = "Error loading itineraries. Please try again later.";
pub const DEFAULT_TITLE: &str = "Your Itinerary";
pub const ITINERARY_ERROR_TITLE: &str = "Error loading itinerary";
pub const ITINERARY_ERROR: &str = "Could not load the itinerary. Please try again later.";
pub const WELCOME_MESSAGE: &str = "Hi! I'm your travel assistant. I can help you plan trips and answer travel-related questions. Try asking me about destinations or type \"/add\" followed by a destination to create a new itinerary!";
pub const CHAT_HISTORY_ERROR: &str =
    "Sorry, I couldn't load your chat history. Please try refreshing the page.";
pub const SEND_ERROR: &str = "Sorry, something went wrong. Please try again.";

/// Load state of one panel. An error replaces whatever was shown before.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PanelState {
    #[default]
    Empty,
    Loading,
    Loaded,
    Error,
}

/// Placeholder text shown in place of panel content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Muted(&'static str),
    Error(&'static str),
}

impl Notice {
    pub fn text(&self) -> &'static str {
        match self {
            Notice::Muted(s) | Notice::Error(s) => s,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItineraryListPanel {
    pub state: PanelState,
    pub entries: Vec<ItinerarySummary>,
    pub placeholder: Option<Notice>,
    /// Highlighted entry; follows the last requested itinerary.
    pub active: Option<ItineraryId>,
}

impl ItineraryListPanel {
    pub fn show(&mut self, entries: Vec<ItinerarySummary>) {
        self.state = PanelState::Loaded;
        self.placeholder = entries.is_empty().then_some(Notice::Muted(NO_ITINERARIES));
        self.entries = entries;
    }

    pub fn show_error(&mut self) {
        self.state = PanelState::Error;
        self.entries.clear();
        self.placeholder = Some(Notice::Error(ITINERARIES_ERROR));
    }
}

/// One rendered day of an itinerary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySection {
    pub day_number: i64,
    pub html: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DetailBody {
    #[default]
    Empty,
    Days(Vec<DaySection>),
    /// Formatted flat content, used when the itinerary has no days.
    Content(String),
    Notice(Notice),
}

/// Clickable place chip; only places with both coordinates get one.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceBadge {
    pub name: String,
    pub position: LatLng,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryPanel {
    pub state: PanelState,
    pub title: String,
    /// Shown in the map header.
    pub destination_name: Option<String>,
    pub body: DetailBody,
    pub badges: Vec<PlaceBadge>,
}

impl Default for ItineraryPanel {
    fn default() -> Self {
        Self {
            state: PanelState::Empty,
            title: DEFAULT_TITLE.to_string(),
            destination_name: None,
            body: DetailBody::Empty,
            badges: Vec::new(),
        }
    }
}

impl ItineraryPanel {
    pub fn show(&mut self, itinerary: &Itinerary) {
        self.state = PanelState::Loaded;
        self.title = itinerary.title.clone();
        self.destination_name = itinerary
            .destination
            .as_ref()
            .map(|d| d.name.clone())
            .filter(|n| !n.is_empty());
        self.body = if itinerary.days.is_empty() {
            DetailBody::Content(formatter::format(
                itinerary.content.as_deref().unwrap_or_default(),
            ))
        } else {
            DetailBody::Days(
                itinerary
                    .sorted_days()
                    .into_iter()
                    .map(|day| DaySection {
                        day_number: day.day_number,
                        html: formatter::format(&day.content),
                    })
                    .collect(),
            )
        };
        self.badges = itinerary
            .places
            .iter()
            .filter_map(|p| {
                p.coordinates().map(|c| PlaceBadge {
                    name: p.name.clone(),
                    position: c.into(),
                })
            })
            .collect();
    }

    pub fn show_error(&mut self) {
        self.state = PanelState::Error;
        self.title = ITINERARY_ERROR_TITLE.to_string();
        self.destination_name = None;
        self.body = DetailBody::Notice(Notice::Error(ITINERARY_ERROR));
        self.badges.clear();
    }

    pub fn places_visible(&self) -> bool {
        !self.badges.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatEntry {
    Message(ChatMessage),
    /// "Thinking..." placeholder of one in-flight send.
    Typing(u64),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatPanel {
    pub state: PanelState,
    pub entries: Vec<ChatEntry>,
    /// Text in the input box.
    pub draft: String,
    next_typing_id: u64,
}

impl ChatPanel {
    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.entries
            .push(ChatEntry::Message(ChatMessage::new(role, content)));
    }

    /// Replace the transcript with the backend history, or the welcome message when empty.
    pub fn show_history(&mut self, messages: Vec<ChatMessage>) {
        self.state = PanelState::Loaded;
        self.entries.clear();
        if messages.is_empty() {
            self.push(Role::Assistant, WELCOME_MESSAGE);
        } else {
            self.entries
                .extend(messages.into_iter().map(ChatEntry::Message));
        }
    }

    pub fn show_history_error(&mut self) {
        self.state = PanelState::Error;
        self.entries.clear();
        self.push(Role::Assistant, CHAT_HISTORY_ERROR);
    }

    pub fn begin_typing(&mut self) -> u64 {
        let id = self.next_typing_id;
        self.next_typing_id += 1;
        self.entries.push(ChatEntry::Typing(id));
        id
    }

    pub fn end_typing(&mut self, id: u64) {
        self.entries
            .retain(|e| !matches!(e, ChatEntry::Typing(t) if *t == id));
    }

    pub fn is_typing(&self) -> bool {
        self.entries.iter().any(|e| matches!(e, ChatEntry::Typing(_)))
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter().filter_map(|e| match e {
            ChatEntry::Message(m) => Some(m),
            ChatEntry::Typing(_) => None,
        })
    }
}

/// Everything the page shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// API-key warning banner: shown unless both search keys are configured.
    pub api_warning: bool,
    pub itineraries: ItineraryListPanel,
    pub itinerary: ItineraryPanel,
    pub map: MapView,
    pub chat: ChatPanel,
    pub current_itinerary_id: Option<ItineraryId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api::{Day, Place};

    fn itinerary(days: Vec<Day>, content: Option<&str>, places: Vec<Place>) -> Itinerary {
        Itinerary {
            id: Some(1),
            title: "Rome".to_string(),
            destination: None,
            days,
            content: content.map(str::to_string),
            places,
        }
    }

    #[test]
    fn list_empty_shows_placeholder() {
        let mut panel = ItineraryListPanel::default();
        panel.show(vec![]);
        assert_eq!(panel.state, PanelState::Loaded);
        assert_eq!(panel.placeholder, Some(Notice::Muted(NO_ITINERARIES)));
    }

    #[test]
    fn list_error_clears_entries() {
        let mut panel = ItineraryListPanel::default();
        panel.show(vec![ItinerarySummary {
            id: 1,
            title: "A".into(),
        }]);
        panel.show_error();
        assert!(panel.entries.is_empty());
        assert_eq!(panel.placeholder, Some(Notice::Error(ITINERARIES_ERROR)));
    }

    #[test]
    fn detail_days_sorted_and_formatted() {
        let mut panel = ItineraryPanel::default();
        panel.show(&itinerary(
            vec![
                Day {
                    day_number: 2,
                    content: "* b".into(),
                },
                Day {
                    day_number: 1,
                    content: "# a".into(),
                },
            ],
            Some("ignored"),
            vec![],
        ));
        assert_eq!(
            panel.body,
            DetailBody::Days(vec![
                DaySection {
                    day_number: 1,
                    html: "<h3>a</h3>".into()
                },
                DaySection {
                    day_number: 2,
                    html: "<ul><li>b</li></ul>".into()
                },
            ])
        );
    }

    #[test]
    fn detail_falls_back_to_flat_content() {
        let mut panel = ItineraryPanel::default();
        panel.show(&itinerary(vec![], Some("**Go**"), vec![]));
        assert_eq!(
            panel.body,
            DetailBody::Content("<strong>Go</strong>".into())
        );
        panel.show(&itinerary(vec![], None, vec![]));
        assert_eq!(panel.body, DetailBody::Content(String::new()));
    }

    #[test]
    fn badges_only_for_places_with_both_coordinates() {
        let mut panel = ItineraryPanel::default();
        panel.show(&itinerary(
            vec![],
            None,
            vec![
                Place {
                    name: "Colosseum".into(),
                    description: Some("Day 1".into()),
                    latitude: Some(41.89),
                    longitude: Some(12.49),
                },
                Place {
                    name: "Somewhere".into(),
                    description: Some("Day 2".into()),
                    latitude: Some(41.0),
                    longitude: None,
                },
            ],
        ));
        assert_eq!(panel.badges.len(), 1);
        assert_eq!(panel.badges[0].name, "Colosseum");
        assert!(panel.places_visible());
    }

    #[test]
    fn detail_error_overwrites_content() {
        let mut panel = ItineraryPanel::default();
        panel.show(&itinerary(vec![], Some("x"), vec![]));
        panel.show_error();
        assert_eq!(panel.title, ITINERARY_ERROR_TITLE);
        assert_eq!(panel.body, DetailBody::Notice(Notice::Error(ITINERARY_ERROR)));
        assert!(!panel.places_visible());
    }

    #[test]
    fn chat_history_empty_shows_welcome() {
        let mut chat = ChatPanel::default();
        chat.show_history(vec![]);
        let msgs: Vec<_> = chat.messages().collect();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].role, Role::Assistant);
        assert_eq!(msgs[0].content, WELCOME_MESSAGE);
    }

    #[test]
    fn typing_indicators_are_removed_by_id() {
        let mut chat = ChatPanel::default();
        let a = chat.begin_typing();
        let b = chat.begin_typing();
        chat.end_typing(a);
        assert_eq!(chat.entries, vec![ChatEntry::Typing(b)]);
        chat.end_typing(b);
        assert!(!chat.is_typing());
    }
}

//! Fetch-then-render cycles for the itinerary list, itinerary detail, map
//! and chat panels.
//!
//! Every operation takes `&self`, so several can run at once on one task
//! (the page load joins four of them). The page is never borrowed across
//! an await. Failures end up as placeholders in the affected panel and a
//! log line; nothing is retried and no operation returns an error.

mod supersede;

use std::cell::{Ref, RefCell};

use crate::core::api::{ApiKeyEntry, Backend, ItineraryId, Role};
use crate::core::page::{Page, PanelState, SEND_ERROR};

use self::supersede::{Supersede, unless_superseded};

/// Search keys the backend needs; the warning banner shows unless both exist.
pub const REQUIRED_API_KEYS: [&str; 2] = ["serper", "google"];

/// Session controller owning the backend client and the page state.
pub struct SyncController<B> {
    backend: B,
    page: RefCell<Page>,
    list_slot: Supersede,
    detail_slot: Supersede,
    map_slot: Supersede,
    history_slot: Supersede,
}

fn missing_api_keys(keys: &[ApiKeyEntry]) -> bool {
    !REQUIRED_API_KEYS
        .iter()
        .all(|required| keys.iter().any(|k| k.name == *required))
}

impl<B: Backend> SyncController<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            page: RefCell::new(Page::default()),
            list_slot: Supersede::default(),
            detail_slot: Supersede::default(),
            map_slot: Supersede::default(),
            history_slot: Supersede::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Current page state. Do not hold across an await.
    pub fn page(&self) -> Ref<'_, Page> {
        self.page.borrow()
    }

    pub fn set_draft(&self, text: &str) {
        self.page.borrow_mut().chat.draft = text.to_string();
    }

    /// Initial page load: default map data, key check, itinerary list (which
    /// loads the first itinerary) and chat history, concurrently.
    ///
    /// The default map request goes out first so the itinerary-scoped one
    /// started by the list supersedes it.
    pub async fn load_page(&self) {
        futures::join!(
            self.load_map_data(None),
            self.check_api_keys(),
            self.list_itineraries(),
            self.load_chat_history(),
        );
    }

    pub async fn check_api_keys(&self) {
        let warning = match self.backend.api_keys().await {
            Ok(keys) => missing_api_keys(&keys),
            Err(e) => {
                log::error!("Error checking API keys: {}", e);
                true
            }
        };
        self.page.borrow_mut().api_warning = warning;
    }

    /// Reload the itinerary list and show its first entry.
    pub async fn list_itineraries(&self) {
        self.refresh_itineraries(None).await;
    }

    /// Reload the list, then load `select` (or the first entry when `None`).
    async fn refresh_itineraries(&self, select: Option<ItineraryId>) {
        let token = self.list_slot.begin();
        self.page.borrow_mut().itineraries.state = PanelState::Loading;

        let Some(result) = unless_superseded(&token, self.backend.itineraries()).await else {
            log::debug!("Itinerary list load superseded");
            return;
        };
        let first = match result {
            Ok(entries) => {
                let first = entries.first().map(|e| e.id);
                self.page.borrow_mut().itineraries.show(entries);
                first
            }
            Err(e) => {
                log::error!("Error loading itineraries: {}", e);
                self.page.borrow_mut().itineraries.show_error();
                None
            }
        };
        if let Some(id) = select.or(first) {
            self.load_itinerary(id).await;
        }
    }

    /// Select and show one itinerary, then refresh the map for it.
    pub async fn load_itinerary(&self, id: ItineraryId) {
        let token = self.detail_slot.begin();
        {
            let mut page = self.page.borrow_mut();
            page.current_itinerary_id = Some(id);
            page.itineraries.active = Some(id);
            page.itinerary.state = PanelState::Loading;
        }

        let Some(result) = unless_superseded(&token, self.backend.itinerary(id)).await else {
            log::debug!("Itinerary {} load superseded", id);
            return;
        };
        match result {
            Ok(itinerary) => {
                self.page.borrow_mut().itinerary.show(&itinerary);
                self.load_map_data(Some(id)).await;
            }
            Err(e) => {
                log::error!("Error loading itinerary {}: {}", id, e);
                self.page.borrow_mut().itinerary.show_error();
            }
        }
    }

    /// Redraw the markers. Failures are logged only; the map keeps what it had.
    pub async fn load_map_data(&self, itinerary_id: Option<ItineraryId>) {
        let token = self.map_slot.begin();
        let Some(result) = unless_superseded(&token, self.backend.map_data(itinerary_id)).await
        else {
            log::debug!("Map data load superseded");
            return;
        };
        match result {
            Ok(data) => self.page.borrow_mut().map.show(&data),
            Err(e) => log::error!("Error loading map data: {}", e),
        }
    }

    pub async fn load_chat_history(&self) {
        let token = self.history_slot.begin();
        self.page.borrow_mut().chat.state = PanelState::Loading;
        let Some(result) = unless_superseded(&token, self.backend.chat_history()).await else {
            log::debug!("Chat history load superseded");
            return;
        };
        match result {
            Ok(messages) => self.page.borrow_mut().chat.show_history(messages),
            Err(e) => {
                log::error!("Error loading chat history: {}", e);
                self.page.borrow_mut().chat.show_history_error();
            }
        }
    }

    /// Send a chat message. Whitespace-only input does nothing.
    ///
    /// The user's message is shown immediately and stays even if the send
    /// fails. A reply that names a new itinerary reloads the list and then
    /// shows that itinerary.
    pub async fn send_message(&self, text: &str) {
        let message = text.trim();
        if message.is_empty() {
            return;
        }
        let typing = {
            let mut page = self.page.borrow_mut();
            page.chat.push(Role::User, message);
            page.chat.draft.clear();
            page.chat.begin_typing()
        };

        let result = self.backend.send_chat_message(message).await;

        let created = {
            let mut page = self.page.borrow_mut();
            page.chat.end_typing(typing);
            match result {
                Ok(reply) => {
                    page.chat.push(Role::Assistant, reply.message);
                    reply.itinerary_id
                }
                Err(e) => {
                    log::error!("Error sending message: {}", e);
                    page.chat.push(Role::Assistant, SEND_ERROR);
                    None
                }
            }
        };
        if let Some(id) = created {
            log::info!("Backend created itinerary {}", id);
            self.refresh_itineraries(Some(id)).await;
        }
    }

    /// Send whatever is in the chat input box.
    pub async fn submit_draft(&self) {
        let draft = self.page.borrow().chat.draft.clone();
        self.send_message(&draft).await;
    }

    /// Place badge click: center the map on the place and open its popup.
    /// Returns false when there is no badge at `index`.
    pub fn focus_place(&self, index: usize) -> bool {
        let mut page = self.page.borrow_mut();
        let Some(position) = page.itinerary.badges.get(index).map(|b| b.position) else {
            return false;
        };
        page.map.focus(position);
        true
    }
}

//! HTML rendering of the page panels and of a standalone page snapshot.
//!
//! Titles, names and chat text are escaped; itinerary content is already
//! HTML from the formatter and is inserted as-is.

use crate::core::map::{MapView, Marker, MarkerKind, Viewport};
use crate::core::page::{
    ChatEntry, ChatPanel, DetailBody, ItineraryListPanel, ItineraryPanel, Notice, Page,
};

const TYPING_INDICATOR: &str = r#"<div class="message message-assistant typing-indicator"><span>Thinking</span><span class="dot">.</span><span class="dot">.</span><span class="dot">.</span></div>"#;

const API_WARNING: &str = "Search API keys are not configured. Add the serper and google keys to enable itinerary generation.";

/// Escape text for use in element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn notice(n: &Notice) -> String {
    let class = match n {
        Notice::Muted(_) => "text-muted",
        Notice::Error(_) => "text-danger",
    };
    format!(r#"<p class="{}">{}</p>"#, class, escape(n.text()))
}

pub fn api_warning(page: &Page) -> String {
    if page.api_warning {
        format!(
            r#"<div id="api-warning" class="alert alert-warning">{}</div>"#,
            escape(API_WARNING)
        )
    } else {
        String::new()
    }
}

pub fn itinerary_list(panel: &ItineraryListPanel) -> String {
    let mut out = String::from(r#"<div id="itineraries-list" class="list-group">"#);
    if let Some(n) = &panel.placeholder {
        out.push_str(&notice(n));
    }
    for entry in &panel.entries {
        let active = if panel.active == Some(entry.id) {
            " active"
        } else {
            ""
        };
        out.push_str(&format!(
            r##"<a href="#" class="list-group-item list-group-item-action{}" data-id="{}">{}</a>"##,
            active,
            entry.id,
            escape(&entry.title)
        ));
    }
    out.push_str("</div>");
    out
}

fn day_section(day_number: i64, html: &str) -> String {
    format!(
        concat!(
            r#"<div class="day-accordion mb-3">"#,
            r#"<div class="day-header bg-light p-2 rounded d-flex justify-content-between align-items-center">"#,
            r#"<h6 class="mb-0"><i class="fas fa-calendar-day me-2"></i>Day {}</h6>"#,
            r#"<i class="fas fa-chevron-down"></i></div>"#,
            r#"<div class="day-content mt-2 ps-2">{}</div></div>"#
        ),
        day_number, html
    )
}

pub fn itinerary_detail(panel: &ItineraryPanel) -> String {
    let mut out = format!(
        r#"<h5 id="itinerary-title"><i class="fas fa-route me-2"></i>{}</h5>"#,
        escape(&panel.title)
    );
    out.push_str(r#"<div id="itinerary-days">"#);
    match &panel.body {
        DetailBody::Empty => {}
        DetailBody::Days(days) => {
            for day in days {
                out.push_str(&day_section(day.day_number, &day.html));
            }
        }
        DetailBody::Content(html) => {
            out.push_str(&format!(r#"<div class="itinerary-content p-2">{}</div>"#, html));
        }
        DetailBody::Notice(n) => out.push_str(&notice(n)),
    }
    out.push_str("</div>");

    let hidden = if panel.places_visible() { "" } else { " d-none" };
    out.push_str(&format!(
        r#"<div id="places-section" class="mt-3{}"><div id="place-list">"#,
        hidden
    ));
    for (idx, badge) in panel.badges.iter().enumerate() {
        out.push_str(&format!(
            r#"<div class="place-badge" data-index="{}" data-lat="{}" data-lng="{}"><i class="fas fa-map-marker-alt me-1"></i>{}</div>"#,
            idx,
            badge.position.lat,
            badge.position.lng,
            escape(&badge.name)
        ));
    }
    out.push_str("</div></div>");
    out
}

pub fn marker_popup(marker: &Marker) -> String {
    let mut out = format!(
        r#"<div class="popup-title">{}</div>"#,
        escape(&marker.title)
    );
    if let Some(desc) = &marker.description {
        out.push_str(&format!(
            r#"<div class="popup-description">{}</div>"#,
            escape(desc)
        ));
    }
    out
}

pub fn map_panel(map: &MapView, destination_name: Option<&str>) -> String {
    let mut out = format!(
        r#"<h5 class="map-header">Map <span id="destination-name">{}</span></h5>"#,
        escape(destination_name.unwrap_or_default())
    );
    let view = match &map.viewport {
        Viewport::Center { center, zoom } => format!(
            r#"data-view="center" data-lat="{}" data-lng="{}" data-zoom="{}""#,
            center.lat, center.lng, zoom
        ),
        Viewport::Fit(b) => format!(
            r#"data-view="fit" data-south="{}" data-west="{}" data-north="{}" data-east="{}""#,
            b.south_west.lat, b.south_west.lng, b.north_east.lat, b.north_east.lng
        ),
    };
    out.push_str(&format!(r#"<div id="map" {}><ul class="markers">"#, view));
    for (idx, marker) in map.markers.iter().enumerate() {
        let class = match marker.kind {
            MarkerKind::Destination => "destination-marker",
            MarkerKind::Place => "place-marker",
        };
        let open = if map.open_popup == Some(idx) {
            " popup-open"
        } else {
            ""
        };
        out.push_str(&format!(
            r#"<li class="{}{}" data-lat="{}" data-lng="{}">{}</li>"#,
            class,
            open,
            marker.position.lat,
            marker.position.lng,
            marker_popup(marker)
        ));
    }
    out.push_str("</ul></div>");
    out
}

pub fn chat_panel(chat: &ChatPanel) -> String {
    let mut out = String::from(r#"<div id="chat-messages">"#);
    for entry in &chat.entries {
        match entry {
            ChatEntry::Message(msg) => {
                out.push_str(&format!(
                    r#"<div class="message message-{}">{}</div>"#,
                    msg.role.as_str(),
                    escape(&msg.content)
                ));
            }
            ChatEntry::Typing(_) => out.push_str(TYPING_INDICATOR),
        }
    }
    out.push_str("</div>");
    out.push_str(&format!(
        r#"<input id="chat-input" type="text" value="{}">"#,
        escape(&chat.draft)
    ));
    out
}

/// A complete HTML document showing every panel of the page.
pub fn page_document(page: &Page) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n",
            "<title>{title} - Travel Planner</title>\n",
            "<style>body{{font-family:sans-serif;margin:1rem}}.d-none{{display:none}}",
            ".text-danger{{color:#b00}}.text-muted{{color:#777}}.active{{font-weight:bold}}",
            ".message-user{{text-align:right}}.place-badge{{display:inline-block;margin:.2rem;",
            "padding:.2rem .5rem;border-radius:1rem;background:#eef}}</style>\n",
            "</head>\n<body>\n{warning}\n",
            "<section id=\"itineraries\">{list}</section>\n",
            "<section id=\"itinerary\">{detail}</section>\n",
            "<section id=\"map-panel\">{map}</section>\n",
            "<section id=\"chat\">{chat}</section>\n",
            "</body>\n</html>\n"
        ),
        title = escape(&page.itinerary.title),
        warning = api_warning(page),
        list = itinerary_list(&page.itineraries),
        detail = itinerary_detail(&page.itinerary),
        map = map_panel(&page.map, page.itinerary.destination_name.as_deref()),
        chat = chat_panel(&page.chat),
    )
}

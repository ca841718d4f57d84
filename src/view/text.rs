//! Plain-text rendering of the page panels for the terminal.

use std::sync::OnceLock;

use regex::Regex;

use crate::core::api::{ChatMessage, Role};
use crate::core::map::{MapView, MarkerKind, Viewport};
use crate::core::page::{ChatEntry, ChatPanel, DetailBody, ItineraryListPanel, ItineraryPanel, Page};

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag regex is valid"))
}

/// Split text into lines of max width (columns).
fn wrap_text(s: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![s.to_string()];
    }
    textwrap::wrap(s, width)
        .into_iter()
        .map(|cow| cow.into_owned())
        .collect()
}

/// Split a message into display lines respecting message newlines, then wrap to `width`.
pub(crate) fn wrap_message(msg: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in msg.split('\n') {
        if line.is_empty() {
            out.push(String::new());
        } else {
            out.extend(wrap_text(line, width));
        }
    }
    out
}

/// Turn formatter output back into readable terminal lines.
pub(crate) fn html_to_text(html: &str) -> String {
    let spaced = html
        .replace("<br>", "\n")
        .replace("<li>", "\n• ")
        .replace("</ul>", "\n")
        .replace("</h3>", "\n")
        .replace("</h4>", "\n")
        .replace("</h5>", "\n");
    let plain = tag_re().replace_all(&spaced, "");
    let lines: Vec<&str> = plain.lines().map(str::trim_end).filter(|l| !l.is_empty()).collect();
    lines.join("\n")
}

/// `2024-05-01T10:00:00Z` → local `2024-05-01 12:00`; unparsable stamps are shown as-is.
pub(crate) fn format_timestamp(stamp: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(stamp)
        .map(|dt| {
            dt.with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_else(|_| stamp.to_string())
}

pub fn api_warning(page: &Page) -> Option<String> {
    page.api_warning
        .then(|| "! Search API keys (serper, google) are not configured.".to_string())
}

pub fn itinerary_list(panel: &ItineraryListPanel) -> String {
    let mut out = String::from("Itineraries\n");
    if let Some(n) = &panel.placeholder {
        out.push_str(&format!("  {}\n", n.text()));
    }
    for entry in &panel.entries {
        let mark = if panel.active == Some(entry.id) { '>' } else { ' ' };
        out.push_str(&format!("{} [{}] {}\n", mark, entry.id, entry.title));
    }
    out
}

pub fn itinerary(panel: &ItineraryPanel, width: usize) -> String {
    let mut out = format!("{}\n", panel.title);
    if let Some(name) = &panel.destination_name {
        out.push_str(&format!("Destination: {}\n", name));
    }
    let indent = |text: &str| -> String {
        text.lines()
            .flat_map(|l| wrap_message(l, width.saturating_sub(4)))
            .map(|l| format!("    {}\n", l))
            .collect()
    };
    match &panel.body {
        DetailBody::Empty => {}
        DetailBody::Days(days) => {
            for day in days {
                out.push_str(&format!("\n  Day {}\n", day.day_number));
                out.push_str(&indent(&html_to_text(&day.html)));
            }
        }
        DetailBody::Content(html) => {
            out.push('\n');
            out.push_str(&indent(&html_to_text(html)));
        }
        DetailBody::Notice(n) => out.push_str(&format!("  {}\n", n.text())),
    }
    if panel.places_visible() {
        out.push_str("\nPlaces\n");
        for (idx, badge) in panel.badges.iter().enumerate() {
            out.push_str(&format!(
                "  {}. {} ({:.4}, {:.4})\n",
                idx + 1,
                badge.name,
                badge.position.lat,
                badge.position.lng
            ));
        }
    }
    out
}

pub fn map(map: &MapView) -> String {
    let mut out = match &map.viewport {
        Viewport::Center { center, zoom } => format!(
            "Map centered on ({:.4}, {:.4}) at zoom {}\n",
            center.lat, center.lng, zoom
        ),
        Viewport::Fit(b) => {
            let c = b.center();
            format!(
                "Map fitted to ({:.4}, {:.4}) to ({:.4}, {:.4}), centered on ({:.4}, {:.4})\n",
                b.south_west.lat, b.south_west.lng, b.north_east.lat, b.north_east.lng, c.lat, c.lng
            )
        }
    };
    for (idx, marker) in map.markers.iter().enumerate() {
        let kind = match marker.kind {
            MarkerKind::Destination => "destination",
            MarkerKind::Place => "place",
        };
        out.push_str(&format!(
            "  {} {} ({:.4}, {:.4}) {}",
            if map.open_popup == Some(idx) { '*' } else { '-' },
            marker.title,
            marker.position.lat,
            marker.position.lng,
            kind
        ));
        if let Some(desc) = &marker.description {
            out.push_str(&format!(": {}", desc));
        }
        out.push('\n');
    }
    out
}

fn message(msg: &ChatMessage, width: usize) -> String {
    let who = match msg.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    let mut out = match &msg.timestamp {
        Some(ts) => format!("{} [{}]\n", who, format_timestamp(ts)),
        None => format!("{}\n", who),
    };
    for line in wrap_message(&msg.content, width.saturating_sub(2)) {
        out.push_str(&format!("  {}\n", line));
    }
    out
}

pub fn chat(panel: &ChatPanel, width: usize) -> String {
    let mut out = String::new();
    for entry in &panel.entries {
        match entry {
            ChatEntry::Message(m) => out.push_str(&message(m, width)),
            ChatEntry::Typing(_) => out.push_str("assistant\n  Thinking...\n"),
        }
    }
    out
}

/// Every panel, top to bottom.
pub fn page(page: &Page, width: usize) -> String {
    let mut sections = Vec::new();
    if let Some(w) = api_warning(page) {
        sections.push(format!("{}\n", w));
    }
    sections.push(itinerary_list(&page.itineraries));
    sections.push(itinerary(&page.itinerary, width));
    sections.push(map(&page.map));
    sections.push(chat(&page.chat, width));
    sections.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::api::ItinerarySummary;
    use crate::core::map::LatLng;
    use crate::core::page::{DaySection, PlaceBadge};

    #[test]
    fn html_to_text_lists_and_breaks() {
        let html = "<h3>Morning</h3><ul><li><strong>Forum</strong></li><br><li>Lunch</li><br></ul>Walk<br>Rest";
        assert_eq!(
            html_to_text(html),
            "Morning\n• Forum\n• Lunch\nWalk\nRest"
        );
    }

    #[test]
    fn html_to_text_ends_every_heading_level() {
        assert_eq!(
            html_to_text("<h4>Afternoon</h4>Museum<h5>Evening</h5>Dinner"),
            "Afternoon\nMuseum\nEvening\nDinner"
        );
    }

    #[test]
    fn wrap_message_keeps_blank_lines() {
        assert_eq!(
            wrap_message("one two three\n\nfour", 7),
            vec!["one two", "three", "", "four"]
        );
    }

    #[test]
    fn timestamp_falls_back_to_raw() {
        assert_eq!(format_timestamp("yesterday"), "yesterday");
        assert_eq!(format_timestamp("2024-05-01T10:00:00.123456Z").len(), 16);
    }

    #[test]
    fn list_marks_active() {
        let panel = ItineraryListPanel {
            entries: vec![ItinerarySummary {
                id: 3,
                title: "Lisbon".into(),
            }],
            active: Some(3),
            ..Default::default()
        };
        assert_eq!(itinerary_list(&panel), "Itineraries\n> [3] Lisbon\n");
    }

    #[test]
    fn itinerary_shows_days_and_places() {
        let panel = ItineraryPanel {
            title: "Rome".into(),
            destination_name: Some("Rome, Italy".into()),
            body: DetailBody::Days(vec![DaySection {
                day_number: 1,
                html: "<ul><li>Forum</li></ul>".into(),
            }]),
            badges: vec![PlaceBadge {
                name: "Forum".into(),
                position: LatLng::new(41.8925, 12.4853),
            }],
            ..Default::default()
        };
        let text = itinerary(&panel, 80);
        assert!(text.starts_with("Rome\nDestination: Rome, Italy\n"));
        assert!(text.contains("  Day 1\n    • Forum\n"));
        assert!(text.contains("Places\n  1. Forum (41.8925, 12.4853)\n"));
    }

    #[test]
    fn chat_shows_typing_indicator() {
        let mut panel = ChatPanel::default();
        panel.push(Role::User, "hello");
        panel.begin_typing();
        assert_eq!(chat(&panel, 80), "you\n  hello\nassistant\n  Thinking...\n");
    }

    #[test]
    fn default_map_is_centered() {
        assert!(map(&MapView::default()).starts_with("Map centered on (40.7128, -74.0060) at zoom 10"));
    }
}

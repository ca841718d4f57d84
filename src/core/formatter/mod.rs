//! Markdown subset to HTML for itinerary content.
//!
//! Supports `#`/`##`/`###` headings, `*`/`-` bullet lists, `**bold**`,
//! `*italic*` and newlines. Everything else, raw HTML included, passes
//! through untouched.
//!
//! The conversion is a single scan over lines followed by an inline pass
//! per line, so running it on its own output changes nothing.

mod inline;

use std::sync::OnceLock;

use regex::Regex;

/// Separator emitted at every line boundary.
const LINE_BREAK: &str = "<br>";

static LIST_ITEM: OnceLock<Regex> = OnceLock::new();

/// Bullet line: optional indent, `*` or `-`, at least one blank, then the item text.
fn list_item_pattern() -> &'static Regex {
    LIST_ITEM.get_or_init(|| Regex::new(r"^[ \t]*[*-][ \t]+(.*)$").expect("list item pattern"))
}

/// A classified source line.
#[derive(Debug, PartialEq, Eq)]
enum Block<'a> {
    Heading { level: u8, text: &'a str },
    Item(&'a str),
    /// A line that already is a complete `<li>..</li>` element.
    RawItem(&'a str),
    Text(&'a str),
}

impl Block<'_> {
    fn is_item(&self) -> bool {
        matches!(self, Block::Item(_) | Block::RawItem(_))
    }
}

fn classify(line: &str) -> Block<'_> {
    for (marker, level) in [("### ", 5), ("## ", 4), ("# ", 3)] {
        if let Some(text) = line.strip_prefix(marker) {
            return Block::Heading { level, text };
        }
    }
    if let Some(caps) = list_item_pattern().captures(line) {
        let text = caps.get(1).map_or("", |m| m.as_str());
        return Block::Item(text);
    }
    let trimmed = line.trim();
    if is_raw_item(trimmed) {
        return Block::RawItem(trimmed);
    }
    Block::Text(line)
}

fn is_raw_item(s: &str) -> bool {
    s.starts_with("<li>") && s.ends_with("</li>")
}

/// Drop the `<ul>`/`</ul>` tags of an already formatted list from `line`;
/// the assembly loop emits them again. Other lines come back unchanged.
fn unwrap_list_markup(line: &str, in_list: bool, last: bool) -> &str {
    if in_list
        && let Some(rest) = line.strip_prefix("</ul>")
        && !classify(rest).is_item()
    {
        return rest;
    }
    let trimmed = line.trim();
    let mut inner = trimmed;
    if !in_list && let Some(rest) = inner.strip_prefix("<ul>") {
        inner = rest;
    }
    if last && let Some(rest) = inner.strip_suffix("</ul>") {
        inner = rest;
    }
    if inner.len() != trimmed.len() && is_raw_item(inner) {
        inner
    } else {
        line
    }
}

/// Split on newlines and on `<br>` already present in the input.
fn split_lines(content: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = content;
    loop {
        let newline = rest.find('\n').map(|p| (p, 1));
        let br = rest.find(LINE_BREAK).map(|p| (p, LINE_BREAK.len()));
        let next = match (newline, br) {
            (Some(n), Some(b)) => Some(if n.0 <= b.0 { n } else { b }),
            (n, b) => n.or(b),
        };
        match next {
            Some((pos, len)) => {
                lines.push(&rest[..pos]);
                rest = &rest[pos + len..];
            }
            None => {
                lines.push(rest);
                return lines;
            }
        }
    }
}

fn push_block(out: &mut String, block: &Block<'_>) {
    match block {
        Block::Heading { level, text } => {
            out.push_str(&format!("<h{level}>"));
            out.push_str(&inline::render(text));
            out.push_str(&format!("</h{level}>"));
        }
        Block::Item(text) => {
            out.push_str("<li>");
            out.push_str(&inline::render(text));
            out.push_str("</li>");
        }
        Block::RawItem(element) => out.push_str(element),
        Block::Text(text) => out.push_str(&inline::render(text)),
    }
}

/// Convert itinerary markdown into an HTML fragment.
///
/// Consecutive list lines share one `<ul>`. Every line boundary becomes
/// `<br>`, those after list items inside the list. Unmatched `*` and `**`
/// stay literal.
pub fn format(content: &str) -> String {
    if content.is_empty() {
        return String::new();
    }
    let lines = split_lines(content);
    let count = lines.len();
    let mut out = String::with_capacity(content.len() + content.len() / 4);
    let mut prev_item = false;
    for (i, line) in lines.into_iter().enumerate() {
        let block = classify(unwrap_list_markup(line, prev_item, i + 1 == count));
        let item = block.is_item();
        if i > 0 {
            out.push_str(LINE_BREAK);
        }
        match (prev_item, item) {
            (false, true) => out.push_str("<ul>"),
            (true, false) => out.push_str("</ul>"),
            _ => {}
        }
        push_block(&mut out, &block);
        prev_item = item;
    }
    if prev_item {
        out.push_str("</ul>");
    }
    out
}

//! Anti-forgery token lookup for the chat POST.
//!
//! The token comes from, in order: explicit configuration, the hidden
//! `csrfmiddlewaretoken` input of the backend's home page, or the
//! `csrftoken` cookie.

use std::sync::OnceLock;

use regex::Regex;

/// Cookie the backend sets alongside its pages.
pub const COOKIE_NAME: &str = "csrftoken";

/// Request header the backend checks.
pub const HEADER_NAME: &str = "X-CSRFToken";

static EMBEDDED_TOKEN: OnceLock<Regex> = OnceLock::new();

fn embedded_token_pattern() -> &'static Regex {
    EMBEDDED_TOKEN.get_or_init(|| {
        Regex::new(r#"name=["']csrfmiddlewaretoken["'][^>]*?value=["']([^"']+)["']"#)
            .expect("csrf input pattern")
    })
}

/// Value of cookie `name` in a `Cookie` header string, percent-decoded.
pub fn cookie_value(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header.split(';').find_map(|pair| {
        let value = pair.trim().strip_prefix(name)?.strip_prefix('=')?;
        Some(
            urlencoding::decode(value)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| value.to_string()),
        )
    })
}

/// Token of the hidden form input embedded in a rendered page.
pub fn embedded_token(html: &str) -> Option<String> {
    embedded_token_pattern()
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Pick the token to send, first present source wins.
pub fn resolve(
    configured: Option<&str>,
    embedded: Option<&str>,
    cookie_header: Option<&str>,
) -> Option<String> {
    configured
        .or(embedded)
        .map(str::to_string)
        .filter(|t| !t.is_empty())
        .or_else(|| cookie_header.and_then(|h| cookie_value(h, COOKIE_NAME)))
}

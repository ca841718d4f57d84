//! Inline emphasis within one line: `**bold**` first, then `*italic*`.

#[derive(Debug)]
enum Token<'a> {
    Text(&'a str),
    /// A single `*`, candidate italic delimiter.
    Star,
    /// An unmatched `**`; printed as-is and never used as a delimiter.
    Literal(&'a str),
    /// Already rendered markup (a `<strong>` span).
    Markup(String),
}

/// Render bold and italic spans of a single line.
pub(super) fn render(line: &str) -> String {
    emphasize(&tokenize(line))
}

/// Split a line into text, single stars and resolved bold spans.
fn tokenize(line: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = line;
    while let Some(pos) = rest.find('*') {
        if pos > 0 {
            tokens.push(Token::Text(&rest[..pos]));
        }
        rest = &rest[pos..];
        if let Some(after) = rest.strip_prefix("**") {
            match find_bold_close(after) {
                Some(end) => {
                    let inner = &after[..end];
                    tokens.push(Token::Markup(format!("<strong>{}</strong>", render(inner))));
                    rest = &after[end + 2..];
                }
                None => {
                    tokens.push(Token::Literal(&rest[..2]));
                    rest = after;
                }
            }
        } else {
            tokens.push(Token::Star);
            rest = &rest[1..];
        }
    }
    if !rest.is_empty() {
        tokens.push(Token::Text(rest));
    }
    tokens
}

/// Byte offset of the closing `**`, leaving at least one character of content.
fn find_bold_close(after_open: &str) -> Option<usize> {
    let first = after_open.chars().next()?.len_utf8();
    after_open[first..].find("**").map(|end| first + end)
}

fn push_token(out: &mut String, token: &Token<'_>) {
    match token {
        Token::Text(s) | Token::Literal(s) => out.push_str(s),
        Token::Star => out.push('*'),
        Token::Markup(s) => out.push_str(s),
    }
}

/// Pair each star with the next one; an unpaired star stays literal.
fn emphasize(tokens: &[Token<'_>]) -> String {
    let mut out = String::new();
    let mut i = 0;
    while i < tokens.len() {
        if !matches!(tokens[i], Token::Star) {
            push_token(&mut out, &tokens[i]);
            i += 1;
            continue;
        }
        let close = tokens[i + 1..]
            .iter()
            .position(|t| matches!(t, Token::Star))
            .map(|p| i + 1 + p);
        match close {
            Some(j) if j > i + 1 => {
                out.push_str("<em>");
                for token in &tokens[i + 1..j] {
                    push_token(&mut out, token);
                }
                out.push_str("</em>");
                i = j + 1;
            }
            _ => {
                out.push('*');
                i += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_unchanged() {
        assert_eq!(render("nothing to see"), "nothing to see");
    }

    #[test]
    fn bold_needs_content() {
        assert_eq!(render("****"), "****");
    }

    #[test]
    fn bold_with_multibyte_content() {
        assert_eq!(render("**é**"), "<strong>é</strong>");
    }

    #[test]
    fn failed_bold_is_not_an_italic_delimiter() {
        assert_eq!(render("**x*"), "**x*");
    }

    #[test]
    fn italic_inside_bold() {
        assert_eq!(render("**a *b* c**"), "<strong>a <em>b</em> c</strong>");
    }
}

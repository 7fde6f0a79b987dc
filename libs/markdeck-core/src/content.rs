//! Inline content tokenizer for card text.
//!
//! Card fronts and backs may carry a small set of inline markup. Instead of
//! producing HTML, the tokenizer yields a closed set of [`ContentPart`]s that
//! a renderer can map to safe output.
//!
//! Patterns are tried in a fixed order at each position: image, link, bold,
//! italic, inline code, line break, then plain text. The first match wins and
//! its content is opaque (no nested formatting).

use serde::{Deserialize, Serialize};

/// Characters that may start a pattern. Plain text runs stop before them.
const SPECIAL: &[char] = &['!', '[', '*', '_', '`', '\n', '\r', '\\'];

/// A piece of rendered card content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { content: String },
    Bold { content: String },
    Italic { content: String },
    Code { content: String },
    Image { alt: String, url: String },
    Link { content: String, url: String },
    #[serde(rename = "linebreak")]
    LineBreak,
}

impl ContentPart {
    fn text(content: &str) -> Self {
        Self::Text {
            content: content.to_string(),
        }
    }

    /// The part's text without markup.
    pub fn plain_text(&self) -> &str {
        match self {
            Self::Text { content }
            | Self::Bold { content }
            | Self::Italic { content }
            | Self::Code { content }
            | Self::Link { content, .. } => content,
            Self::Image { alt, .. } => alt,
            Self::LineBreak => "\n",
        }
    }
}

/// Iterator over the content parts of a string.
///
/// Restartable: iterating the same input again yields the same sequence.
#[derive(Debug, Clone)]
pub struct ContentParts<'a> {
    rest: &'a str,
}

impl<'a> ContentParts<'a> {
    pub fn new(content: &'a str) -> Self {
        Self { rest: content }
    }
}

impl Iterator for ContentParts<'_> {
    type Item = ContentPart;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let s = self.rest;
        let (part, consumed) = match_image(s)
            .or_else(|| match_link(s))
            .or_else(|| match_bold(s))
            .or_else(|| match_italic(s))
            .or_else(|| match_code(s))
            .or_else(|| match_line_break(s))
            .unwrap_or_else(|| match_plain(s));

        self.rest = &s[consumed..];
        Some(part)
    }
}

/// Tokenize inline content into parts.
pub fn parse_content(content: &str) -> Vec<ContentPart> {
    ContentParts::new(content).collect()
}

/// Concatenate the plain text of a sequence of parts.
pub fn to_plain_text(parts: &[ContentPart]) -> String {
    parts.iter().map(ContentPart::plain_text).collect()
}

/// Whether a link target uses an allowed scheme (`http` or `https`).
pub fn is_valid_url(url: &str) -> bool {
    if url.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((scheme, rest)) = url.split_once(':') else {
        return false;
    };
    let scheme = scheme.to_ascii_lowercase();
    if scheme != "http" && scheme != "https" {
        return false;
    }
    rest.strip_prefix("//")
        .is_some_and(|authority| !authority.is_empty() && !authority.starts_with('/'))
}

/// Whether an image source is allowed: `http`, `https` or an inline
/// `data:image/*` payload.
pub fn is_valid_image_url(url: &str) -> bool {
    if url.len() > "data:image/".len()
        && url.is_char_boundary("data:image/".len())
        && url[.."data:image/".len()].eq_ignore_ascii_case("data:image/")
    {
        return !url.chars().any(char::is_whitespace);
    }
    is_valid_url(url)
}

/// `[label](target)` at the start of `s`: returns label, target and the
/// number of bytes consumed.
fn bracket_target(s: &str) -> Option<(&str, &str, usize)> {
    let inner = s.strip_prefix('[')?;
    let close = inner.find(']')?;
    let label = &inner[..close];
    let target = inner[close + 1..].strip_prefix('(')?;
    let end = target.find(')')?;
    let url = &target[..end];

    if url.is_empty() || label.contains('\n') || url.contains('\n') {
        return None;
    }
    Some((label, url, close + end + 4))
}

fn match_image(s: &str) -> Option<(ContentPart, usize)> {
    let rest = s.strip_prefix('!')?;
    let (alt, url, consumed) = bracket_target(rest)?;
    let consumed = consumed + 1;

    if !is_valid_image_url(url) {
        return Some((ContentPart::text(&s[..consumed]), consumed));
    }
    Some((
        ContentPart::Image {
            alt: alt.to_string(),
            url: url.to_string(),
        },
        consumed,
    ))
}

fn match_link(s: &str) -> Option<(ContentPart, usize)> {
    let (label, url, consumed) = bracket_target(s)?;
    if label.is_empty() {
        return None;
    }

    if !is_valid_url(url) {
        return Some((ContentPart::text(&s[..consumed]), consumed));
    }
    Some((
        ContentPart::Link {
            content: label.to_string(),
            url: url.to_string(),
        },
        consumed,
    ))
}

/// Content between a pair of delimiters: non-empty and on a single line.
fn delimited<'a>(s: &'a str, delimiter: &str) -> Option<(&'a str, usize)> {
    let inner = s.strip_prefix(delimiter)?;
    let end = inner.find(delimiter)?;
    let content = &inner[..end];
    if content.is_empty() || content.contains('\n') {
        return None;
    }
    Some((content, end + delimiter.len() * 2))
}

fn match_bold(s: &str) -> Option<(ContentPart, usize)> {
    delimited(s, "**")
        .or_else(|| delimited(s, "__"))
        .map(|(content, consumed)| {
            (
                ContentPart::Bold {
                    content: content.to_string(),
                },
                consumed,
            )
        })
}

fn match_italic(s: &str) -> Option<(ContentPart, usize)> {
    delimited(s, "*")
        .or_else(|| delimited(s, "_"))
        .map(|(content, consumed)| {
            (
                ContentPart::Italic {
                    content: content.to_string(),
                },
                consumed,
            )
        })
}

fn match_code(s: &str) -> Option<(ContentPart, usize)> {
    delimited(s, "`").map(|(content, consumed)| {
        (
            ContentPart::Code {
                content: content.to_string(),
            },
            consumed,
        )
    })
}

fn match_line_break(s: &str) -> Option<(ContentPart, usize)> {
    if s.starts_with("\r\n") || s.starts_with("\\n") {
        Some((ContentPart::LineBreak, 2))
    } else if s.starts_with('\n') {
        Some((ContentPart::LineBreak, 1))
    } else {
        None
    }
}

/// A run of ordinary characters, or a single special character that did
/// not start any pattern.
fn match_plain(s: &str) -> (ContentPart, usize) {
    let first = s.chars().next().map_or(0, char::len_utf8);
    let consumed = if s.starts_with(SPECIAL) {
        first
    } else {
        s.find(SPECIAL).unwrap_or(s.len())
    };
    (ContentPart::text(&s[..consumed]), consumed)
}

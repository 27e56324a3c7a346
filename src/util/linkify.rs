use std::sync::OnceLock;

use regex::Regex;

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://\S+").unwrap())
}

/// A piece of todo text, tagged as plain text or a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPiece<'a> {
    pub text: &'a str,
    pub is_url: bool,
}

/// Split text into plain and URL pieces, in order, so the renderer can
/// style links differently.
pub fn split_urls(text: &str) -> Vec<TextPiece<'_>> {
    let mut pieces = Vec::new();
    let mut last_end = 0;
    for m in url_re().find_iter(text) {
        if m.start() > last_end {
            pieces.push(TextPiece {
                text: &text[last_end..m.start()],
                is_url: false,
            });
        }
        pieces.push(TextPiece {
            text: m.as_str(),
            is_url: true,
        });
        last_end = m.end();
    }
    if last_end < text.len() || pieces.is_empty() {
        pieces.push(TextPiece {
            text: &text[last_end..],
            is_url: false,
        });
    }
    pieces
}

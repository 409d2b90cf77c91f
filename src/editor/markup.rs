//! Canonical text storage for text blocks.
//!
//! The authoring surface only ever edits plain text. Stored markup is
//! stripped when a block is opened and exactly one paragraph wrap is applied
//! when it is written back, so formatting beyond the paragraph is lost.

/// Remove every `<...>` tag. An unterminated `<` is kept as literal text.
pub fn strip_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        match rest[open..].find('>') {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            None => break,
        }
    }

    out.push_str(rest);
    out
}

/// Wrap plain text in a single paragraph element.
pub fn wrap_paragraph(text: &str) -> String {
    format!("<p>{}</p>", text)
}

/// Canonical stored form of a text block's content.
pub fn canonical_text(content: &str) -> String {
    wrap_paragraph(&strip_markup(content))
}

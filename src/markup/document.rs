use crate::grammar::punctuation::collapse_redundant_dots;
use crate::markup::sanitize;
use crate::types::field_key::FieldKey;

const ANCHOR_STYLE: &str = "color:blue;text-decoration:none;";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Justify,
    Left,
    Center,
    Right,
}

impl Alignment {
    fn as_attr(self) -> &'static str {
        match self {
            Alignment::Justify => "justify",
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub align: Alignment,
    /// Inline markup: `b`, `i`, `u`, `br` and field anchors.
    pub html: String,
}

/// A rendered document as an ordered list of paragraphs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    paragraphs: Vec<Paragraph>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a justified paragraph, tidying doubled periods.
    pub fn push(&mut self, html: impl AsRef<str>) {
        self.push_aligned(Alignment::Justify, html);
    }

    pub fn push_aligned(&mut self, align: Alignment, html: impl AsRef<str>) {
        self.paragraphs.push(Paragraph {
            align,
            html: collapse_redundant_dots(html.as_ref()),
        });
    }

    pub fn blank_line(&mut self) {
        self.paragraphs.push(Paragraph {
            align: Alignment::Left,
            html: String::new(),
        });
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn to_html(&self) -> String {
        let body: String = self
            .paragraphs
            .iter()
            .map(|p| format!("<p align='{}'>{}</p>", p.align.as_attr(), p.html))
            .collect();
        format!("<div style=\"text-align: justify;\">{body}</div>")
    }

    /// One line per paragraph, markup removed.
    pub fn to_plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| sanitize::to_plain_text(&p.html).replace('\n', " "))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Case-sensitive search over the plain text.
    pub fn contains(&self, needle: &str) -> bool {
        self.to_plain_text().contains(needle)
    }

    /// Counts occurrences in the markup (useful for tags such as `<b>`).
    pub fn count_in_html(&self, needle: &str) -> usize {
        self.paragraphs.iter().map(|p| p.html.matches(needle).count()).sum()
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// A clickable, escaped field value. Blank values show `placeholder`, or the
/// bracketed key when there is none.
pub fn anchor(text: &str, key: FieldKey, placeholder: Option<&str>) -> String {
    let href = key.href();
    let shown = if text.trim().is_empty() {
        placeholder.map_or_else(|| format!("[{href}]"), str::to_string)
    } else {
        text.to_string()
    };
    format!(
        "<a href=\"{href}\" style=\"{ANCHOR_STYLE}\">{}</a>",
        escape_html(&shown)
    )
}

/// Like [`anchor`], but `markup` is already sanitized and kept as is.
pub fn anchor_html(markup: &str, key: FieldKey, placeholder: Option<&str>) -> String {
    if markup.trim().is_empty() {
        return anchor("", key, placeholder);
    }
    format!("<a href=\"{}\" style=\"{ANCHOR_STYLE}\">{markup}</a>", key.href())
}

/// Unlinked text (for values with no backing field), escaped.
pub fn text_or(text: &str, placeholder: &str) -> String {
    if text.trim().is_empty() {
        escape_html(placeholder)
    } else {
        escape_html(text.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_escape_and_fall_back() {
        assert_eq!(
            anchor("A & B", FieldKey::Caption, None),
            "<a href=\"edit_caratula\" style=\"color:blue;text-decoration:none;\">A &amp; B</a>"
        );
        assert!(anchor("  ", FieldKey::Courtroom, Some("Sala")).ends_with(">Sala</a>"));
        assert!(anchor("", FieldKey::Courtroom, None).ends_with(">[edit_sala]</a>"));
    }

    #[test]
    fn plain_text_drops_anchors() {
        let mut doc = Document::new();
        doc.push(format!("En {}..", anchor("Córdoba", FieldKey::Locality, None)));
        doc.push("<b>Segundo</b> párrafo");
        assert_eq!(doc.to_plain_text(), "En Córdoba.\nSegundo párrafo");
        assert!(doc.to_html().starts_with("<div style=\"text-align: justify;\"><p align='justify'>"));
    }
}

use scraper::{ElementRef, Html, Node};

use crate::types::field_key::EditPolicy;

/// Inline formatting that survives sanitization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Marks {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub text: String,
    pub marks: Marks,
}

/// Rich text reduced to paragraphs of marked runs.
///
/// Runs inside a paragraph never share marks with their neighbour and
/// whitespace is already collapsed, so serializing and parsing again gives
/// the same tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RichText {
    pub paragraphs: Vec<Vec<Run>>,
}

const SKIPPED_ELEMENTS: &[&str] = &["head", "style", "script", "meta", "title", "link"];
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "tr", "table",
];

impl RichText {
    /// Best-effort parse of arbitrary markup. Never fails.
    pub fn parse(markup: &str) -> Self {
        let fragment = Html::parse_fragment(markup);
        let mut builder = Builder::default();
        builder.walk(fragment.root_element(), Marks::default());
        builder.finish()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn has_italic(&self) -> bool {
        self.runs().any(|run| run.marks.italic)
    }

    fn runs(&self) -> impl Iterator<Item = &Run> {
        self.paragraphs.iter().flatten()
    }

    /// Rewrites the marks of every run, then re-merges neighbours.
    pub fn map_marks(mut self, f: impl Fn(Marks) -> Marks) -> Self {
        for paragraph in &mut self.paragraphs {
            for run in paragraph.iter_mut() {
                run.marks = f(run.marks);
            }
            *paragraph = merge_runs(std::mem::take(paragraph));
        }
        self
    }

    /// A single paragraph is emitted bare; several are wrapped in `<p>`.
    pub fn to_html(&self) -> String {
        match self.paragraphs.as_slice() {
            [] => String::new(),
            [only] => paragraph_html(only),
            many => many
                .iter()
                .map(|paragraph| format!("<p>{}</p>", paragraph_html(paragraph)))
                .collect(),
        }
    }

    /// Paragraphs joined by a double line break, for embedding in running text.
    pub fn to_inline_html(&self) -> String {
        self.paragraphs
            .iter()
            .map(|paragraph| paragraph_html(paragraph))
            .collect::<Vec<_>>()
            .join("<br><br>")
    }

    pub fn to_plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|paragraph| paragraph.iter().map(|run| run.text.as_str()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Default)]
struct Builder {
    paragraphs: Vec<Vec<Run>>,
    current: Vec<Run>,
}

impl Builder {
    fn walk(&mut self, element: ElementRef<'_>, marks: Marks) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.push_text(text, marks),
                Node::Element(_) => {
                    if let Some(child_element) = ElementRef::wrap(child) {
                        self.visit_element(child_element, marks);
                    }
                }
                _ => {}
            }
        }
    }

    fn visit_element(&mut self, element: ElementRef<'_>, marks: Marks) {
        let name = element.value().name();
        if SKIPPED_ELEMENTS.contains(&name) {
            return;
        }
        if name == "br" {
            self.push_text(" ", marks);
            return;
        }

        // Adjacent cells read as separate words.
        if matches!(name, "td" | "th") {
            self.push_text(" ", marks);
        }

        let marks = marks_for(element, marks);
        let is_block = BLOCK_ELEMENTS.contains(&name);
        if is_block {
            self.break_paragraph();
        }
        self.walk(element, marks);
        if is_block {
            self.break_paragraph();
        }
    }

    fn push_text(&mut self, text: &str, marks: Marks) {
        for ch in text.chars() {
            if ch.is_whitespace() {
                // Collapse runs of whitespace (nbsp included) and drop leading ones.
                let after_space = self
                    .current
                    .iter()
                    .rev()
                    .find_map(|run| run.text.chars().last())
                    .map_or(true, |last| last == ' ');
                if after_space {
                    continue;
                }
                self.push_char(' ', marks);
            } else {
                self.push_char(ch, marks);
            }
        }
    }

    fn push_char(&mut self, ch: char, marks: Marks) {
        match self.current.last_mut() {
            Some(run) if run.marks == marks => run.text.push(ch),
            _ => self.current.push(Run {
                text: ch.to_string(),
                marks,
            }),
        }
    }

    fn break_paragraph(&mut self) {
        let mut runs = std::mem::take(&mut self.current);
        if let Some(last) = runs.last_mut() {
            let trimmed = last.text.trim_end().len();
            last.text.truncate(trimmed);
        }
        runs.retain(|run| !run.text.is_empty());
        let runs = merge_runs(runs);
        if !runs.is_empty() {
            self.paragraphs.push(runs);
        }
    }

    fn finish(mut self) -> RichText {
        self.break_paragraph();
        RichText {
            paragraphs: self.paragraphs,
        }
    }
}

fn marks_for(element: ElementRef<'_>, inherited: Marks) -> Marks {
    let mut marks = inherited;
    match element.value().name() {
        "b" | "strong" => marks.bold = true,
        "i" | "em" => marks.italic = true,
        "u" | "ins" => marks.underline = true,
        _ => {}
    }

    if let Some(style) = element.value().attr("style") {
        for declaration in style.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim().to_ascii_lowercase();
            match property.as_str() {
                "font-weight" => {
                    let numeric_bold = value.parse::<u32>().is_ok_and(|weight| weight >= 600);
                    if value == "bold" || value == "bolder" || numeric_bold {
                        marks.bold = true;
                    }
                }
                "font-style" if value == "italic" || value == "oblique" => marks.italic = true,
                "text-decoration" | "text-decoration-line" if value.contains("underline") => {
                    marks.underline = true
                }
                _ => {}
            }
        }
    }
    marks
}

fn merge_runs(runs: Vec<Run>) -> Vec<Run> {
    let mut merged: Vec<Run> = Vec::with_capacity(runs.len());
    for run in runs {
        match merged.last_mut() {
            Some(previous) if previous.marks == run.marks => previous.text.push_str(&run.text),
            _ => merged.push(run),
        }
    }
    merged
}

fn paragraph_html(runs: &[Run]) -> String {
    let mut out = String::new();
    for run in runs {
        let Marks {
            bold,
            italic,
            underline,
        } = run.marks;
        if bold {
            out.push_str("<b>");
        }
        if italic {
            out.push_str("<i>");
        }
        if underline {
            out.push_str("<u>");
        }
        out.push_str(&super::document::escape_html(&run.text));
        if underline {
            out.push_str("</u>");
        }
        if italic {
            out.push_str("</i>");
        }
        if bold {
            out.push_str("</b>");
        }
    }
    out
}

// --- Policies ---

/// Keeps bold, italic, underline and paragraphs; drops everything else.
pub fn sanitize_html(markup: &str) -> String {
    RichText::parse(markup).to_html()
}

/// Only italics survive. Text with no italics at all becomes fully italic.
pub fn sanitize_italic_only(markup: &str) -> String {
    let text = RichText::parse(markup);
    let force = !text.has_italic();
    text.map_marks(|marks| Marks {
        bold: false,
        italic: marks.italic || force,
        underline: false,
    })
    .to_html()
}

pub fn sanitize_without_bold(markup: &str) -> String {
    RichText::parse(markup)
        .map_marks(|marks| Marks { bold: false, ..marks })
        .to_html()
}

/// Flattens paragraphs into `<br><br>` separated inline markup.
pub fn inline_with_paragraphs(markup: &str) -> String {
    RichText::parse(markup).to_inline_html()
}

pub fn to_plain_text(markup: &str) -> String {
    RichText::parse(markup).to_plain_text()
}

/// Cleans an edited value the way its field expects.
pub fn sanitize_for(policy: EditPolicy, markup: &str) -> String {
    match policy {
        EditPolicy::Plain => to_plain_text(markup).replace('\n', " "),
        EditPolicy::Rich => sanitize_html(markup),
        EditPolicy::RichWithoutBold => sanitize_without_bold(markup),
        EditPolicy::ItalicOnly => sanitize_italic_only(markup),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn styles_become_tags() {
        let raw = r#"<span style="font-weight:700; color:red">Juan</span> <span style="font-style: italic">dijo</span>"#;
        assert_eq!(sanitize_html(raw), "<b>Juan</b> <i>dijo</i>");
    }

    #[test]
    fn editor_document_is_reduced() {
        let raw = "<html><head><style>p { margin: 0 }</style></head><body>\
                   <p style=\"margin-top:0px\">uno&nbsp;&nbsp;dos</p><p></p><p><strong>tres</strong></p></body></html>";
        assert_eq!(sanitize_html(raw), "<p>uno dos</p><p><b>tres</b></p>");
    }

    #[test]
    fn table_cells_do_not_run_together() {
        assert_eq!(sanitize_html("<table><tr><td>a</td><td>b</td></tr></table>"), "a b");
        assert_eq!(
            sanitize_html("<table><tr><th>Nombre</th><th>DNI</th></tr><tr><td>Ana</td><td>30.123.456</td></tr></table>"),
            "<p>Nombre DNI</p><p>Ana 30.123.456</p>"
        );
    }

    #[test]
    fn nested_marks_use_canonical_order() {
        assert_eq!(sanitize_html("<u><i><b>x</b></i></u>"), "<b><i><u>x</u></i></b>");
    }

    #[test]
    fn italic_only_policy() {
        assert_eq!(sanitize_italic_only("<b>robo</b> simple"), "<i>robo simple</i>");
        assert_eq!(sanitize_italic_only("<i>robo</i> <u>simple</u>"), "<i>robo</i> simple");
    }

    #[test]
    fn paragraphs_inline() {
        assert_eq!(inline_with_paragraphs("<p>a</p><p>b</p>"), "a<br><br>b");
    }

    #[test]
    fn malformed_markup_is_tolerated() {
        assert_eq!(sanitize_html("<b>sin cerrar <i>y más"), "<b>sin cerrar </b><b><i>y más</i></b>");
    }
}

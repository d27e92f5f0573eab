use regex::Regex;
use std::sync::OnceLock;

fn dot_across_closing_tags() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\.(?:\s*</[^>]+>\s*)+\.").unwrap_or_else(|e| panic!("invalid dot regex: {e}"))
    })
}

fn leading_article() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(El|La|Los|Las)\b").unwrap_or_else(|e| panic!("invalid article regex: {e}")))
}

/// Cleans up the doubled periods that template concatenation produces
/// (a field ending in "." followed by the template's own ".").
///
/// - an isolated ".." becomes "."
/// - "." + closing tags + "." keeps only the first period
/// - a trailing run of periods becomes a single "." unless it is "..."
///
/// Ellipses are never touched.
pub fn collapse_redundant_dots(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = collapse_isolated_double_dots(text);
    let text = collapse_dots_around_tags(&text);

    let body = text.trim_end_matches('.');
    let tail_len = text.len() - body.len();
    if tail_len > 0 && tail_len != 3 {
        format!("{body}.")
    } else {
        text
    }
}

fn collapse_isolated_double_dots(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut run = 0usize;
    let flush = |out: &mut String, run: usize| {
        let keep = if run == 2 { 1 } else { run };
        out.extend(std::iter::repeat('.').take(keep));
    };
    for ch in text.chars() {
        if ch == '.' {
            run += 1;
        } else {
            flush(&mut out, run);
            run = 0;
            out.push(ch);
        }
    }
    flush(&mut out, run);
    out
}

fn collapse_dots_around_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in dot_across_closing_tags().find_iter(text) {
        let before_is_dot = text[..m.start()].ends_with('.');
        let after_is_dot = text[m.end()..].starts_with('.');
        out.push_str(&text[last..m.start()]);
        if before_is_dot || after_is_dot {
            out.push_str(m.as_str());
        } else {
            // Drop the second period, keep the tags.
            out.push_str(&m.as_str()[..m.as_str().len() - 1]);
        }
        last = m.end();
    }
    out.push_str(&text[last..]);
    out
}

/// Drops one closing period so a value can sit mid-sentence. Ellipses stay.
pub fn without_final_period(text: &str) -> &str {
    let text = text.trim_end();
    if text.ends_with("...") {
        text
    } else {
        text.strip_suffix('.').unwrap_or(text)
    }
}

/// Removes trailing commas, semicolons and periods.
pub fn trim_trailing_punctuation(text: &str) -> &str {
    text.trim_end().trim_end_matches([',', ';', '.'])
}

/// "El auto ..." -> "el auto ..." (only for a leading article).
pub fn lowercase_leading_article(text: &str) -> String {
    let text = text.trim();
    leading_article()
        .replace(text, |caps: &regex::Captures| caps[1].to_lowercase())
        .into_owned()
}

pub fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubled_period_collapses() {
        assert_eq!(collapse_redundant_dots("tres años.."), "tres años.");
        assert_eq!(collapse_redundant_dots("uno.. dos"), "uno. dos");
    }

    #[test]
    fn ellipsis_survives() {
        assert_eq!(collapse_redundant_dots("y luego..."), "y luego...");
        assert_eq!(collapse_redundant_dots("a... b"), "a... b");
    }

    #[test]
    fn long_tail_becomes_one_period() {
        assert_eq!(collapse_redundant_dots("fin....."), "fin.");
    }

    #[test]
    fn period_split_by_closing_tags() {
        assert_eq!(collapse_redundant_dots("<b>prisión.</b>."), "<b>prisión.</b>");
        assert_eq!(collapse_redundant_dots("<a href=\"x\">dos.</a> </p>."), "<a href=\"x\">dos.</a> </p>");
    }

    #[test]
    fn final_period_is_dropped_once() {
        assert_eq!(without_final_period("tres años. "), "tres años");
        assert_eq!(without_final_period("y así..."), "y así...");
        assert_eq!(trim_trailing_punctuation("dictado por X,"), "dictado por X");
    }

    #[test]
    fn articles_are_lowercased_only_at_start() {
        assert_eq!(lowercase_leading_article("El auto de elevación"), "el auto de elevación");
        assert_eq!(lowercase_leading_article("Elevación"), "Elevación");
        assert_eq!(lowercase_leading_article("Los requerimientos"), "los requerimientos");
    }
}

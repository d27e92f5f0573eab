use crate::grammar::numerals::roman_numeral;

/// Hands out "I", "II", ... only when a section is actually emitted.
#[derive(Debug, Clone)]
pub struct SectionCounter {
    next: u32,
}

impl SectionCounter {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }

    pub fn next_label(&mut self) -> String {
        let label = roman_numeral(self.next);
        self.next += 1;
        label
    }

    /// Labels handed out so far.
    pub fn emitted(&self) -> u32 {
        self.next.saturating_sub(1)
    }
}

impl Default for SectionCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// One conditional, numbered clause: skipped entirely when `applies` is false.
pub struct ClauseRule<C> {
    pub title: &'static str,
    pub applies: fn(&C) -> bool,
    pub body: fn(&C) -> String,
}

/// Evaluates the rules in order and returns the emitted paragraphs,
/// numbered `"<b>II. Title:</b> body"` without gaps.
pub fn emit_numbered<C>(rules: &[ClauseRule<C>], context: &C, counter: &mut SectionCounter) -> Vec<String> {
    rules
        .iter()
        .filter(|rule| (rule.applies)(context))
        .map(|rule| {
            let label = counter.next_label();
            format!("<b>{label}. {}:</b> {}", rule.title, (rule.body)(context))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Flags {
        first: bool,
        second: bool,
    }

    const RULES: &[ClauseRule<Flags>] = &[
        ClauseRule {
            title: "Primero",
            applies: |f| f.first,
            body: |_| "uno".to_string(),
        },
        ClauseRule {
            title: "Segundo",
            applies: |f| f.second,
            body: |_| "dos".to_string(),
        },
        ClauseRule {
            title: "Cierre",
            applies: |_| true,
            body: |_| "fin".to_string(),
        },
    ];

    #[test]
    fn skipped_rules_do_not_consume_numbers() {
        let mut counter = SectionCounter::starting_at(2);
        let out = emit_numbered(RULES, &Flags { first: false, second: true }, &mut counter);
        assert_eq!(out, vec!["<b>II. Segundo:</b> dos", "<b>III. Cierre:</b> fin"]);
        assert_eq!(counter.emitted(), 3);
    }
}

use std::ops::Range;
use std::time::{Duration, Instant};

/// Above this many token comparisons the whole edited region is marked as
/// one span instead of running the word diff.
const MAX_DIFF_CELLS: usize = 250_000;

/// Character ranges of `new` that differ from `old`.
///
/// The common prefix and suffix are skipped first; the middle is compared
/// word by word so that an edit in one field does not light up the rest of
/// the paragraph.
pub fn changed_spans(old: &str, new: &str) -> Vec<Range<usize>> {
    let old: Vec<char> = old.chars().collect();
    let new: Vec<char> = new.chars().collect();

    let prefix = old.iter().zip(&new).take_while(|(a, b)| a == b).count();
    let max_suffix = old.len().min(new.len()) - prefix;
    let suffix = old
        .iter()
        .rev()
        .zip(new.iter().rev())
        .take(max_suffix)
        .take_while(|(a, b)| a == b)
        .count();

    let old_mid = &old[prefix..old.len() - suffix];
    let new_mid = &new[prefix..new.len() - suffix];
    if new_mid.is_empty() {
        return Vec::new();
    }

    let old_tokens = tokenize(old_mid);
    let new_tokens = tokenize(new_mid);
    if old_tokens.len().saturating_mul(new_tokens.len()) > MAX_DIFF_CELLS {
        return vec![prefix..prefix + new_mid.len()];
    }

    let matched = lcs_matches(old_mid, &old_tokens, new_mid, &new_tokens);
    let mut spans: Vec<Range<usize>> = Vec::new();
    for (token, is_matched) in new_tokens.iter().zip(matched) {
        if is_matched || new_mid[token.clone()].iter().all(|c| c.is_whitespace()) {
            continue;
        }
        let range = prefix + token.start..prefix + token.end;
        match spans.last_mut() {
            // Only whitespace separates the two changed words.
            Some(last) if new[last.end..range.start].iter().all(|c| c.is_whitespace()) => {
                last.end = range.end
            }
            _ => spans.push(range),
        }
    }
    spans
}

/// Splits into alternating word and whitespace tokens.
fn tokenize(chars: &[char]) -> Vec<Range<usize>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    for i in 1..=chars.len() {
        let boundary = i == chars.len() || chars[i].is_whitespace() != chars[i - 1].is_whitespace();
        if boundary {
            tokens.push(start..i);
            start = i;
        }
    }
    tokens
}

/// For each token of `new`, whether it belongs to a longest common subsequence.
fn lcs_matches(old: &[char], old_tokens: &[Range<usize>], new: &[char], new_tokens: &[Range<usize>]) -> Vec<bool> {
    let (n, m) = (old_tokens.len(), new_tokens.len());
    let same = |i: usize, j: usize| old[old_tokens[i].clone()] == new[new_tokens[j].clone()];

    let mut table = vec![vec![0u32; m + 1]; n + 1];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i][j] = if same(i, j) {
                table[i + 1][j + 1] + 1
            } else {
                table[i + 1][j].max(table[i][j + 1])
            };
        }
    }

    let mut matched = vec![false; m];
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if same(i, j) {
            matched[j] = true;
            i += 1;
            j += 1;
        } else if table[i + 1][j] >= table[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    matched
}

/// Every case-insensitive occurrence of `needle` in `haystack`, as character ranges.
pub fn occurrence_spans(haystack: &str, needle: &str) -> Vec<Range<usize>> {
    let fold = |c: char| c.to_lowercase().next().unwrap_or(c);
    let hay: Vec<char> = haystack.chars().map(fold).collect();
    let pin: Vec<char> = needle.chars().map(fold).collect();
    if pin.is_empty() || pin.len() > hay.len() {
        return Vec::new();
    }

    let mut spans = Vec::new();
    let mut start = 0;
    while start + pin.len() <= hay.len() {
        if hay[start..start + pin.len()] == pin[..] {
            spans.push(start..start + pin.len());
            start += pin.len();
        } else {
            start += 1;
        }
    }
    spans
}

/// Spans to paint over the rendered text until the highlight expires.
#[derive(Debug, Clone, PartialEq)]
pub struct Highlight {
    pub spans: Vec<Range<usize>>,
    pub created_at: Instant,
    pub ttl: Duration,
}

impl Highlight {
    pub fn new(spans: Vec<Range<usize>>, created_at: Instant, ttl: Duration) -> Self {
        Self { spans, created_at, ttl }
    }

    pub fn is_active_at(&self, now: Instant) -> bool {
        !self.spans.is_empty() && now.saturating_duration_since(self.created_at) < self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_word_change() {
        let spans = changed_spans("la pena de tres años", "la pena de cuatro años");
        assert_eq!(spans, vec![11..17]);
    }

    #[test]
    fn identical_texts_have_no_spans() {
        assert!(changed_spans("igual", "igual").is_empty());
        assert!(changed_spans("", "").is_empty());
    }

    #[test]
    fn deletion_only_marks_nothing() {
        assert!(changed_spans("uno dos tres", "uno tres").is_empty());
    }

    #[test]
    fn occurrences_ignore_case() {
        assert_eq!(occurrence_spans("Decomiso y DECOMISO", "decomiso"), vec![0..8, 11..19]);
    }

    #[test]
    fn highlight_expires() {
        let start = Instant::now();
        let highlight = Highlight::new(vec![0..3], start, Duration::from_millis(3000));
        assert!(highlight.is_active_at(start + Duration::from_millis(2999)));
        assert!(!highlight.is_active_at(start + Duration::from_millis(3000)));
    }
}

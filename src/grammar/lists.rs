/// Joins with commas and a final " y ": "A", "A y B", "A, B y C".
///
/// Blank items are skipped.
pub fn join_with_and<S: AsRef<str>>(items: &[S]) -> String {
    let items: Vec<&str> = items
        .iter()
        .map(|item| item.as_ref())
        .filter(|item| !item.trim().is_empty())
        .collect();

    match items.as_slice() {
        [] => String::new(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{} y {}", init.join(", "), last),
    }
}

/// Joins longer clauses with semicolons: "A; y B", "A; B; y C".
///
/// Items are trimmed and blank ones skipped.
pub fn join_with_semicolon_and<S: AsRef<str>>(items: &[S]) -> String {
    let items: Vec<&str> = items
        .iter()
        .map(|item| item.as_ref().trim())
        .filter(|item| !item.is_empty())
        .collect();

    match items.as_slice() {
        [] => String::new(),
        [only] => (*only).to_string(),
        [init @ .., last] => format!("{}; y {}", init.join("; "), last),
    }
}

/// Members sharing one value, in the order the value was first seen.
#[derive(Debug, Clone, PartialEq)]
pub struct Group<K, V> {
    pub key: K,
    pub members: Vec<V>,
}

/// Merges `(value, member)` pairs by value, keeping first-seen order of both
/// the groups and the members inside each group.
pub fn group_by_shared_value<K, V, I>(pairs: I) -> Vec<Group<K, V>>
where
    K: PartialEq,
    I: IntoIterator<Item = (K, V)>,
{
    let mut groups: Vec<Group<K, V>> = Vec::new();
    for (key, member) in pairs {
        match groups.iter_mut().find(|group| group.key == key) {
            Some(group) => group.members.push(member),
            None => groups.push(Group {
                key,
                members: vec![member],
            }),
        }
    }
    groups
}

/// Referral clauses that carry no case-specific detail.
const BOILERPLATE_CLAUSES: &[&str] = &[
    "el auto de elevación a juicio",
    "el requerimiento de citación a juicio",
];

fn normalize_clause(clause: &str) -> String {
    clause
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn is_boilerplate_clause(clause: &str) -> bool {
    BOILERPLATE_CLAUSES.contains(&normalize_clause(clause).as_str())
}

/// Removes repeated referral clauses, keeping the first occurrence.
///
/// When more than one clause survives and at least one of them names a
/// concrete document, the bare boilerplate clauses are dropped as well.
// NOTE: preserved as observed in practice; the precedence is a special case, not a general rule.
pub fn dedup_referral_clauses<S: AsRef<str>>(clauses: &[S]) -> Vec<String> {
    dedup_referral_clauses_by(clauses.iter().map(|c| c.as_ref().to_string()).collect(), |c| c.as_str())
}

/// [`dedup_referral_clauses`] over arbitrary items, compared by `text`.
pub fn dedup_referral_clauses_by<T, F>(items: Vec<T>, text: F) -> Vec<T>
where
    F: Fn(&T) -> &str,
{
    let mut seen: Vec<String> = Vec::new();
    let mut unique: Vec<T> = Vec::new();
    for item in items {
        let normalized = normalize_clause(text(&item));
        if !seen.contains(&normalized) {
            seen.push(normalized);
            unique.push(item);
        }
    }

    let has_specific = unique.iter().any(|item| !is_boilerplate_clause(text(item)));
    if has_specific && unique.len() > 1 {
        unique.retain(|item| !is_boilerplate_clause(text(item)));
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping_keeps_first_seen_order() {
        let groups = group_by_shared_value(vec![("robo", "Ana"), ("hurto", "Luis"), ("robo", "Eva")]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "robo");
        assert_eq!(groups[0].members, vec!["Ana", "Eva"]);
        assert_eq!(groups[1].members, vec!["Luis"]);
    }

    #[test]
    fn blank_items_do_not_leave_dangling_conjunctions() {
        assert_eq!(join_with_and(&["A", " ", "B"]), "A y B");
        assert_eq!(join_with_semicolon_and(&["  A ", ""]), "A");
    }

    #[test]
    fn lone_boilerplate_clause_survives() {
        let clauses = ["El auto de elevación a juicio", "el  auto de elevación a juicio"];
        assert_eq!(dedup_referral_clauses(&clauses), vec!["El auto de elevación a juicio"]);
    }

    #[test]
    fn two_specific_clauses_both_survive() {
        let clauses = [
            "El auto de elevación a juicio n° 12",
            "El requerimiento de citación a juicio de fecha 3/4/2024",
            "El auto de elevación a juicio",
        ];
        assert_eq!(
            dedup_referral_clauses(&clauses),
            vec![
                "El auto de elevación a juicio n° 12",
                "El requerimiento de citación a juicio de fecha 3/4/2024"
            ]
        );
    }
}

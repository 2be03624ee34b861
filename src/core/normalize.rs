use std::collections::HashSet;

/// Canonical form used for every string comparison: trimmed and lower-cased
#[inline]
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Case/whitespace-insensitive intersection of two string lists
///
/// Both sides are normalized. The result keeps the left side's first-seen
/// order, holds each value once, and contains only values that also appear
/// on the right.
pub fn intersection<'a, L, R>(left: L, right: R) -> Vec<String>
where
    L: IntoIterator<Item = &'a str>,
    R: IntoIterator<Item = &'a str>,
{
    let right: HashSet<String> = right.into_iter().map(normalize).collect();
    let mut seen = HashSet::new();

    left.into_iter()
        .map(normalize)
        .filter(|item| right.contains(item) && seen.insert(item.clone()))
        .collect()
}

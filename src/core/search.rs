//! Linear-scan search and lookup over an in-memory collection.

/// Result of filtering a collection.
///
/// An empty store and a store with no matching records are reported
/// differently to the operator, so they stay distinct here.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome<T> {
    EmptyStore,
    NoMatches,
    Matches(Vec<T>),
}

impl<T> SearchOutcome<T> {
    pub fn matches(&self) -> &[T] {
        match self {
            SearchOutcome::Matches(items) => items,
            _ => &[],
        }
    }

    pub fn into_matches(self) -> Vec<T> {
        match self {
            SearchOutcome::Matches(items) => items,
            _ => Vec::new(),
        }
    }
}

/// Keep records satisfying `predicate`, preserving their order.
pub fn search<T, F>(records: &[T], predicate: F) -> SearchOutcome<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    if records.is_empty() {
        return SearchOutcome::EmptyStore;
    }
    let found: Vec<T> = records.iter().filter(|r| predicate(r)).cloned().collect();
    if found.is_empty() {
        SearchOutcome::NoMatches
    } else {
        SearchOutcome::Matches(found)
    }
}

/// Case-insensitive substring test. `needle` is expected lower-cased.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

pub fn eq_ci(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Index of the first record whose key equals `key`, ignoring case.
pub fn position_ci<T, F>(records: &[T], key: &str, key_of: F) -> Option<usize>
where
    F: Fn(&T) -> &str,
{
    let wanted = key.trim().to_lowercase();
    records
        .iter()
        .position(|r| key_of(r).to_lowercase() == wanted)
}

//! Relevance scoring and ranking
//!
//! Filtering is a plain case-insensitive substring test against title and
//! description; only the items that pass are scored and ranked.

use std::cmp::Reverse;

use crate::catalog::Item;

/// Bonus when the title equals the query
pub const EXACT_TITLE_BONUS: i32 = 1000;
/// Bonus when the title starts with the query
pub const PREFIX_BONUS: i32 = 500;
/// Bonus when the title contains the query
pub const CONTAINS_BONUS: i32 = 100;
/// Bonus for direct children of a search root (`~/<root>/<name>`)
pub const ROOT_PROJECT_BONUS: i32 = 200;
/// Bonus when the description contains the query
pub const DESCRIPTION_BONUS: i32 = 50;

const ROOT_PROJECT_DEPTH: i32 = 2;
const PATH_SEPARATOR: char = '/';

/// Order in which ranked items are laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RankOrder {
    /// Best match first (normal and search views)
    #[default]
    Descending,
    /// Best match last, next to a bottom-anchored input line
    Ascending,
}

/// An item (by catalog position) paired with its score for one ranking pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredItem {
    /// Index into the catalog that was ranked
    pub index: usize,
    /// Relevance score (0 for unranked, empty-query views)
    pub score: i32,
}

/// Score `item` against an already-lowercased `query`
///
/// Returns 0 when the query occurs in neither the title nor the description.
pub fn score(item: &Item, query: &str) -> i32 {
    score_match(item, query).unwrap_or(0)
}

/// Score of an included item, or None when the item is filtered out
///
/// The score of an included item may be zero or negative for very deep
/// paths; inclusion is decided by the substring test alone.
fn score_match(item: &Item, query: &str) -> Option<i32> {
    let title = item.title.to_lowercase();
    let description = item.description.to_lowercase();

    let in_title = title.contains(query);
    let in_description = description.contains(query);
    if !in_title && !in_description {
        return None;
    }

    let mut total = 0;
    if title == query {
        total += EXACT_TITLE_BONUS;
    }
    if title.starts_with(query) {
        total += PREFIX_BONUS;
    }
    if in_title {
        total += CONTAINS_BONUS;
    }

    let depth = description.matches(PATH_SEPARATOR).count() as i32;
    total += (10 - depth) * 10;
    if depth == ROOT_PROJECT_DEPTH {
        total += ROOT_PROJECT_BONUS;
    }

    if in_description {
        total += DESCRIPTION_BONUS;
    }

    Some(total)
}

/// Filter `items` by `query` and rank the survivors in `order`
///
/// An empty query means no filtering at all: every item, in catalog order,
/// without scoring. Ties keep catalog order.
pub fn filter_and_rank(items: &[Item], query: &str, order: RankOrder) -> Vec<ScoredItem> {
    if query.is_empty() {
        return items
            .iter()
            .enumerate()
            .map(|(index, _)| ScoredItem { index, score: 0 })
            .collect();
    }

    let query = query.to_lowercase();
    let mut scored: Vec<ScoredItem> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            score_match(item, &query).map(|score| ScoredItem { index, score })
        })
        .collect();

    match order {
        RankOrder::Descending => scored.sort_by_key(|s| Reverse(s.score)),
        RankOrder::Ascending => scored.sort_by_key(|s| s.score),
    }
    scored
}

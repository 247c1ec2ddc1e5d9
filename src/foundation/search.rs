use std::cmp::Ordering;

use crate::model::CatalogEntry;
use crate::utils::date_utils::parse_timestamp;

/// Normalized edit-distance acceptance bound, 0.0 is a perfect match.
/// Mirrors the strictness of the common fuzzy-search default (0.4).
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.4;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SearchMode {
    Exact,
    Fuzzy,
}

/// Filters a catalog by title. An empty query is a no-op and returns the
/// input unchanged, so an empty search box means "show all".
///
/// Exact mode keeps input order; fuzzy mode returns best matches first
/// (stable, ties keep input order).
pub fn search<T: CatalogEntry + Clone>(entries: &[T], query: &str, mode: SearchMode) -> Vec<T> {
    let query = query.trim();
    if query.is_empty() {
        return entries.to_vec();
    }
    match mode {
        SearchMode::Exact => {
            let needle = query.to_lowercase();
            entries
                .iter()
                .filter(|entry| entry.display_name().to_lowercase() == needle)
                .cloned()
                .collect()
        }
        SearchMode::Fuzzy => {
            let mut scored: Vec<(f64, &T)> = entries
                .iter()
                .filter_map(|entry| {
                    let score = entry_score(query, entry);
                    (score <= FUZZY_MATCH_THRESHOLD).then_some((score, entry))
                })
                .collect();
            scored.sort_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(Ordering::Equal));
            scored.into_iter().map(|(_, entry)| entry.clone()).collect()
        }
    }
}

/// Keeps entries whose normalized timestamp is at or after `min_epoch`.
/// Entries without a parseable timestamp are dropped while the bound is
/// active (fail closed).
pub fn filter_min_added<T: CatalogEntry + Clone>(entries: &[T], min_epoch: i64) -> Vec<T> {
    entries
        .iter()
        .filter(|entry| {
            entry
                .added_raw()
                .and_then(parse_timestamp)
                .is_some_and(|ts| ts >= min_epoch)
        })
        .cloned()
        .collect()
}

fn entry_score<T: CatalogEntry>(query: &str, entry: &T) -> f64 {
    let score = fuzzy_score(query, entry.name());
    match entry.alternate_title() {
        Some(title) => score.min(fuzzy_score(query, title)),
        None => score,
    }
}

/// Approximate-substring match score in 0.0..=1.0, 0.0 is best. The query
/// is slid over every same-length window of the text so a short query can
/// match inside a long title; window distances are normalized by the query
/// length, the whole-string distance by the longer of the two.
fn fuzzy_score(query: &str, text: &str) -> f64 {
    let query_chars: Vec<char> = query.to_lowercase().chars().collect();
    let text_chars: Vec<char> = text.to_lowercase().chars().collect();
    if query_chars.is_empty() {
        return 0.0;
    }
    if text_chars.is_empty() {
        return 1.0;
    }
    let query_lc: String = query_chars.iter().collect();
    let text_lc: String = text_chars.iter().collect();
    if text_lc.contains(&query_lc) {
        return 0.0;
    }
    let mut best = 1.0 - strsim::normalized_levenshtein(&query_lc, &text_lc);
    if text_chars.len() > query_chars.len() {
        for window in text_chars.windows(query_chars.len()) {
            let window_str: String = window.iter().collect();
            let dist =
                strsim::levenshtein(&query_lc, &window_str) as f64 / query_chars.len() as f64;
            if dist < best {
                best = dist;
            }
        }
    }
    best.clamp(0.0, 1.0)
}

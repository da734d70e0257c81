use std::collections::HashMap;

use serde::Serialize;

use crate::catalog::Book;
use crate::score::ScoreBreakdown;

/// One shortlist entry, in rank order.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub book: Book,
    pub total: f64,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Clone, Copy)]
pub struct SelectOptions {
    /// Shortlist size cap.
    pub k: usize,
    /// Accepted books per first-listed author before the diversity cap bites.
    pub max_per_author: usize,
    /// Floor the backfill step tops the shortlist up to.
    pub min_results: usize,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            k: 10,
            max_per_author: 2,
            min_results: 5,
        }
    }
}

/// Joins books with their breakdowns and sorts descending by total. The sort
/// is stable: books with equal totals keep the collection's original order.
pub fn rank(books: &[Book], scores: &HashMap<String, ScoreBreakdown>) -> Vec<Recommendation> {
    let mut ranked: Vec<Recommendation> = books
        .iter()
        .filter_map(|book| {
            scores.get(book.id()).map(|breakdown| Recommendation {
                book: book.clone(),
                total: breakdown.total(),
                breakdown: *breakdown,
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.total.total_cmp(&a.total));
    ranked
}

/// Two-phase shortlist extraction: greedily accept in score order while each
/// first-listed author stays under `max_per_author`, stopping at `k`; if the
/// cap left fewer than `min_results`, backfill from the skipped books in
/// score order ignoring the cap. Returns at most `k` entries.
pub fn shortlist(ranked: Vec<Recommendation>, opts: SelectOptions) -> Vec<Recommendation> {
    let mut selected: Vec<Recommendation> = Vec::new();
    let mut rest: Vec<Recommendation> = Vec::new();
    let mut per_author: HashMap<String, usize> = HashMap::new();

    for item in ranked {
        if selected.len() >= opts.k {
            rest.push(item);
            continue;
        }
        let author = item.book.first_author();
        let count = per_author.get(&author).copied().unwrap_or(0);
        if count >= opts.max_per_author {
            rest.push(item);
            continue;
        }
        per_author.insert(author, count + 1);
        selected.push(item);
    }

    if selected.len() < opts.min_results {
        let needed = opts.min_results - selected.len();
        selected.extend(rest.into_iter().take(needed));
    }
    selected.truncate(opts.k);
    selected
}

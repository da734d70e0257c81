use std::collections::HashMap;

use serde::Serialize;

use crate::catalog::{Book, Difficulty};
use crate::steps::{PagesBias, StepCatalog, StepOption};

const ACCLAIM_WEIGHT: f64 = 8.0;
const VIBE_MATCH_BONUS: f64 = 12.0;
const MOOD_BONUS: f64 = 18.0;
const MOOD_PENALTY: f64 = 20.0;
const DIFF_MATCH_BONUS: f64 = 15.0;
// Steering away from dense books is penalized harder than the reverse.
const DIFF_WANT_LIGHT_GOT_DENSE: f64 = 12.0;
const DIFF_WANT_DENSE_GOT_LIGHT: f64 = 8.0;
const PAGE_FILTER_BONUS: f64 = 15.0;
const PAGE_FILTER_PENALTY: f64 = 12.0;
const SHORT_BIAS_PENALTY: f64 = 6.0;
const LONG_BIAS_PENALTY: f64 = 4.0;
const SHORT_BIAS_THRESHOLD: u32 = 350;
const LONG_BIAS_THRESHOLD: u32 = 300;
const SERIES_BONUS: f64 = 10.0;
const OPTION_AWARD_BONUS: f64 = 15.0;
const FLAT_AWARD_BONUS: f64 = 8.0;

/// Step id → chosen option value. At most one answer per step.
pub type AnswerSet = HashMap<String, String>;

/// Additive per-book score components. `penalties` is non-positive by
/// convention; nothing is normalized or clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub base: f64,
    pub vibes: f64,
    pub mood: f64,
    pub difficulty: f64,
    pub format: f64,
    pub awards: f64,
    pub penalties: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.base
            + self.vibes
            + self.mood
            + self.difficulty
            + self.format
            + self.awards
            + self.penalties
    }
}

/// Scores every book against the answer set. Pure: same inputs, same output.
///
/// An answer whose step or option no longer resolves (stale answer set,
/// catalog drift) contributes nothing instead of failing the run.
pub fn score(
    books: &[Book],
    answers: &AnswerSet,
    catalog: &StepCatalog,
) -> HashMap<String, ScoreBreakdown> {
    let mut scores: HashMap<String, ScoreBreakdown> = books
        .iter()
        .map(|book| {
            let breakdown = ScoreBreakdown {
                base: book.acclaim() * ACCLAIM_WEIGHT,
                ..ScoreBreakdown::default()
            };
            (book.id().to_owned(), breakdown)
        })
        .collect();

    for (step_id, value) in answers {
        let Some(option) = catalog.by_id(step_id).and_then(|step| step.option(value)) else {
            tracing::debug!(step_id, value, "skipping unresolved answer");
            continue;
        };
        for book in books {
            if let Some(breakdown) = scores.get_mut(book.id()) {
                apply_option(option, book, breakdown);
            }
        }
    }

    // Awarded books get a flat bonus regardless of the answers given.
    for book in books {
        if !book.awards().is_empty()
            && let Some(breakdown) = scores.get_mut(book.id())
        {
            breakdown.awards += FLAT_AWARD_BONUS;
        }
    }

    scores
}

fn apply_option(option: &StepOption, book: &Book, breakdown: &mut ScoreBreakdown) {
    if !option.boost_vibes.is_empty() {
        let book_vibes: Vec<String> = book
            .vibes()
            .iter()
            .map(|vibe| vibe.to_lowercase())
            .collect();
        let matches = option
            .boost_vibes
            .iter()
            .filter(|term| {
                let term = term.to_lowercase();
                book_vibes.iter().any(|vibe| vibe.contains(&term))
            })
            .count();
        breakdown.vibes += matches as f64 * VIBE_MATCH_BONUS;
    }

    if let Some(mood) = book.mood() {
        if option.boost_moods.iter().any(|m| *m == mood) {
            breakdown.mood += MOOD_BONUS;
        }
        if option.penalty_moods.iter().any(|m| *m == mood) {
            breakdown.penalties -= MOOD_PENALTY;
        }
    }

    if let Some(target) = option.diff_bias {
        let actual = book.difficulty();
        if actual == target {
            breakdown.difficulty += DIFF_MATCH_BONUS;
        } else if target == Difficulty::Ligero && actual == Difficulty::Denso {
            breakdown.difficulty -= DIFF_WANT_LIGHT_GOT_DENSE;
        } else if target == Difficulty::Denso && actual == Difficulty::Ligero {
            breakdown.difficulty -= DIFF_WANT_DENSE_GOT_LIGHT;
        }
    }

    let pages = book.pages();
    if let Some(filter) = &option.page_filter {
        if filter.contains(pages) {
            breakdown.format += PAGE_FILTER_BONUS;
        } else {
            breakdown.format -= PAGE_FILTER_PENALTY;
        }
    }
    match option.pages_bias {
        Some(PagesBias::Corto) if pages > SHORT_BIAS_THRESHOLD => {
            breakdown.format -= SHORT_BIAS_PENALTY;
        }
        Some(PagesBias::Largo) if pages < LONG_BIAS_THRESHOLD => {
            breakdown.format -= LONG_BIAS_PENALTY;
        }
        _ => {}
    }

    if option.prefer_series && book.series().is_some() {
        breakdown.format += SERIES_BONUS;
    }
    if option.award_bonus && !book.awards().is_empty() {
        breakdown.awards += OPTION_AWARD_BONUS;
    }
}

use std::{cmp::Ordering, collections::HashMap};

use serde::{Deserialize, Serialize};

use crate::core::record::category_key;

/// Terminal status of a played cell.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Buzzed in and self-marked correct.
    Correct,
    /// Buzzed in and self-marked wrong.
    Wrong,
    /// No buzz before the window expired, or the clue was abandoned.
    Skipped,
}

impl OutcomeStatus {
    /// Signed score contribution of a clue worth `value`.
    #[must_use]
    pub fn score_delta(self, value: u32) -> i64 {
        match self {
            Self::Correct => i64::from(value),
            Self::Wrong => -i64::from(value),
            Self::Skipped => 0,
        }
    }

    #[must_use]
    pub fn needs_review(self) -> bool {
        matches!(self, Self::Wrong | Self::Skipped)
    }
}

/// Record of one resolved cell. Never mutated after it is logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub category: String,
    pub value: u32,
    pub clue: String,
    pub response: String,
    pub status: OutcomeStatus,
}

/// Append-only log of outcomes for the current board.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct OutcomeLog {
    outcomes: Vec<Outcome>,
}

impl OutcomeLog {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            outcomes: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, outcome: Outcome) {
        self.outcomes.push(outcome);
    }

    pub(crate) fn clear(&mut self) {
        self.outcomes.clear();
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Outcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    #[must_use]
    pub fn count(&self, status: OutcomeStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Sum of the signed score contributions of all outcomes.
    #[must_use]
    pub fn score(&self) -> i64 {
        self.outcomes
            .iter()
            .map(|o| o.status.score_delta(o.value))
            .sum()
    }
}

/// Per-category counts derived from the outcome log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: String,
    pub correct: usize,
    pub wrong: usize,
    pub skipped: usize,
}

impl CategoryStat {
    fn new(category: String) -> Self {
        Self {
            category,
            correct: 0,
            wrong: 0,
            skipped: 0,
        }
    }

    /// Clues buzzed on (correct plus wrong).
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.correct + self.wrong
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.attempted() + self.skipped
    }

    /// Fraction of attempted clues answered correctly, `0.0` when nothing was
    /// attempted.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn accuracy(&self) -> f64 {
        let attempted = self.attempted();
        if attempted == 0 {
            0.0
        } else {
            self.correct as f64 / attempted as f64
        }
    }
}

/// Computes per-category statistics from an outcome slice.
///
/// Categories are grouped by [`category_key`] and listed in order of first
/// appearance. This is recomputed on demand rather than maintained
/// incrementally.
#[must_use]
pub fn compute_stats(outcomes: &[Outcome]) -> Vec<CategoryStat> {
    let mut index = HashMap::new();
    let mut stats: Vec<CategoryStat> = Vec::new();
    for outcome in outcomes {
        let i = *index
            .entry(category_key(&outcome.category))
            .or_insert_with(|| {
                stats.push(CategoryStat::new(outcome.category.clone()));
                stats.len() - 1
            });
        let stat = &mut stats[i];
        match outcome.status {
            OutcomeStatus::Correct => stat.correct += 1,
            OutcomeStatus::Wrong => stat.wrong += 1,
            OutcomeStatus::Skipped => stat.skipped += 1,
        }
    }
    stats
}

/// Minimum attempts before a category's accuracy counts as signal.
pub const MIN_ATTEMPTS_FOR_SIGNAL: usize = 2;

/// Default number of weak categories selected for review.
pub const DEFAULT_WEAK_CATEGORY_COUNT: usize = 4;

/// Orders stats by ascending accuracy, then more attempts, then name.
pub fn cmp_by_weakness(a: &CategoryStat, b: &CategoryStat) -> Ordering {
    a.accuracy()
        .total_cmp(&b.accuracy())
        .then_with(|| b.attempted().cmp(&a.attempted()))
        .then_with(|| a.category.cmp(&b.category))
}

/// Selects up to `count` weakest categories.
///
/// Only categories with at least [`MIN_ATTEMPTS_FOR_SIGNAL`] attempts are
/// ranked. If no category reaches that threshold, every category with at least
/// one attempt is ranked instead. Categories that were never attempted are
/// never selected.
#[must_use]
pub fn weak_categories(stats: &[CategoryStat], count: usize) -> Vec<&CategoryStat> {
    let mut ranked = stats
        .iter()
        .filter(|s| s.attempted() >= MIN_ATTEMPTS_FOR_SIGNAL)
        .collect::<Vec<_>>();
    if ranked.is_empty() {
        ranked = stats.iter().filter(|s| s.attempted() > 0).collect();
    }
    ranked.sort_by(|a, b| cmp_by_weakness(a, b));
    ranked.truncate(count);
    ranked
}

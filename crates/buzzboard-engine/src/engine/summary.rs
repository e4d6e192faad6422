use serde::{Deserialize, Serialize};

use crate::{
    core::{CategoryStat, Outcome, OutcomeStatus, cmp_by_weakness, compute_stats, weak_categories},
    engine::review::review_feed,
};

/// One entry of the review feed, ready to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewCard {
    pub category: String,
    pub value: u32,
    pub clue: String,
    pub response: String,
    pub status: OutcomeStatus,
    /// `MISSED` for wrong answers, `SKIPPED` otherwise.
    pub label: String,
    /// The response without its question phrasing.
    pub anchor: String,
    /// Search terms for looking the answer up.
    pub search_query: String,
}

impl ReviewCard {
    #[must_use]
    pub fn from_outcome(outcome: &Outcome) -> Self {
        let label = match outcome.status {
            OutcomeStatus::Wrong => "MISSED",
            OutcomeStatus::Correct | OutcomeStatus::Skipped => "SKIPPED",
        };
        Self {
            category: outcome.category.clone(),
            value: outcome.value,
            clue: outcome.clue.clone(),
            response: outcome.response.clone(),
            status: outcome.status,
            label: label.to_owned(),
            anchor: response_anchor(&outcome.response).to_owned(),
            search_query: format!("{} {}", outcome.response, outcome.category),
        }
    }
}

/// Strips a leading "who is"/"what are"-style prefix and a trailing `?`.
///
/// ```
/// use buzzboard_engine::response_anchor;
///
/// assert_eq!(response_anchor("What is the Nile?"), "the Nile");
/// assert_eq!(response_anchor("who are  The Beatles"), "The Beatles");
/// assert_eq!(response_anchor("Nile"), "Nile");
/// ```
#[must_use]
pub fn response_anchor(response: &str) -> &str {
    let response = response.trim();
    let body = strip_question_prefix(response).unwrap_or(response);
    body.strip_suffix('?').unwrap_or(body).trim_end()
}

fn strip_question_prefix(response: &str) -> Option<&str> {
    let (pronoun, rest) = response.split_once(char::is_whitespace)?;
    if !["who", "what"].iter().any(|p| pronoun.eq_ignore_ascii_case(p)) {
        return None;
    }
    let (verb, rest) = rest.trim_start().split_once(char::is_whitespace)?;
    if !["is", "are"].iter().any(|v| verb.eq_ignore_ascii_case(v)) {
        return None;
    }
    Some(rest.trim_start())
}

/// End-of-board performance summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub score: i64,
    pub total_cells: usize,
    pub buzzed: usize,
    pub correct: usize,
    pub wrong: usize,
    pub skipped: usize,
    /// Fraction of buzzed clues answered correctly.
    pub accuracy: f64,
    /// Per-category stats, weakest first.
    pub categories: Vec<CategoryStat>,
    pub weak_categories: Vec<String>,
    pub review: Vec<ReviewCard>,
}

impl Summary {
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn from_outcomes(outcomes: &[Outcome], total_cells: usize, weak_count: usize) -> Self {
        let count = |status| outcomes.iter().filter(|o| o.status == status).count();
        let correct = count(OutcomeStatus::Correct);
        let wrong = count(OutcomeStatus::Wrong);
        let skipped = count(OutcomeStatus::Skipped);
        let buzzed = correct + wrong;
        let accuracy = if buzzed == 0 {
            0.0
        } else {
            correct as f64 / buzzed as f64
        };

        let mut categories = compute_stats(outcomes);
        let weak = weak_categories(&categories, weak_count)
            .into_iter()
            .map(|stat| stat.category.clone())
            .collect();
        categories.sort_by(|a, b| a.accuracy().total_cmp(&b.accuracy()));

        Self {
            score: outcomes.iter().map(|o| o.status.score_delta(o.value)).sum(),
            total_cells,
            buzzed,
            correct,
            wrong,
            skipped,
            accuracy,
            categories,
            weak_categories: weak,
            review: review_feed(outcomes)
                .map(ReviewCard::from_outcome)
                .collect(),
        }
    }

    /// Stats of the weak categories, weakest first.
    pub fn weak_stats(&self) -> impl Iterator<Item = &CategoryStat> + '_ {
        let mut stats = self
            .categories
            .iter()
            .filter(|stat| self.weak_categories.contains(&stat.category))
            .collect::<Vec<_>>();
        stats.sort_by(|a, b| cmp_by_weakness(a, b));
        stats.into_iter()
    }
}

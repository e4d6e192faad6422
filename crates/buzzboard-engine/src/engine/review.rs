use std::collections::HashSet;

use rand::{Rng, seq::SliceRandom as _};
use serde::{Deserialize, Serialize};

use crate::core::{ClueRecord, Outcome, category_key};

/// Outcomes worth reviewing (wrong or skipped), in the order they were played.
pub fn review_feed(outcomes: &[Outcome]) -> impl Iterator<Item = &Outcome> + '_ {
    outcomes.iter().filter(|o| o.status.needs_review())
}

/// Shape of the next round in the multi-round flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundPlan {
    /// Number of clues in the round.
    pub length: usize,
    /// Share of the round drawn from weak categories, in `0.0..=1.0`.
    pub review_ratio: f64,
}

impl Default for RoundPlan {
    fn default() -> Self {
        Self {
            length: 30,
            review_ratio: 0.5,
        }
    }
}

impl RoundPlan {
    /// Number of clues to draw from weak categories.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn review_target(&self) -> usize {
        let ratio = if self.review_ratio.is_nan() {
            0.0
        } else {
            self.review_ratio.clamp(0.0, 1.0)
        };
        ((ratio * self.length as f64).round() as usize).min(self.length)
    }
}

/// Builds the clue pool of the next round, biased toward weak categories.
///
/// Draws [`RoundPlan::review_target`] clues from the weak categories and the
/// rest from every other category, both uniformly without replacement. A
/// short side is backfilled from the other one, so the result always holds
/// `min(plan.length, pool.len())` clues. The result is shuffled.
pub fn next_round_pool<R>(
    pool: &[ClueRecord],
    weak_categories: &[String],
    plan: &RoundPlan,
    rng: &mut R,
) -> Vec<ClueRecord>
where
    R: Rng + ?Sized,
{
    let weak_keys = weak_categories
        .iter()
        .map(|name| category_key(name))
        .collect::<HashSet<_>>();
    let (mut weak, mut general): (Vec<&ClueRecord>, Vec<&ClueRecord>) = pool
        .iter()
        .partition(|record| weak_keys.contains(&record.category_key()));
    weak.shuffle(rng);
    general.shuffle(rng);

    let length = plan.length.min(pool.len());
    let weak_take = plan.review_target().min(weak.len()).min(length);
    let general_take = (length - weak_take).min(general.len());
    let leftover_weak = length - weak_take - general_take;

    let mut round = weak
        .drain(..weak_take + leftover_weak)
        .chain(general.drain(..general_take))
        .cloned()
        .collect::<Vec<_>>();
    round.shuffle(rng);

    tracing::debug!(
        length,
        from_weak = weak_take + leftover_weak,
        from_general = general_take,
        "next round pool"
    );
    round
}

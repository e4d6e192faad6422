use std::{
    collections::{BTreeMap, btree_map::Entry},
    fmt::Write as _,
};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
    seq::{IndexedRandom as _, SliceRandom as _},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    BoardBuildError,
    core::{Board, BoardCategory, ClueRecord, Round, ValueLadder},
    engine::settings::clamp_category_count,
};

/// Seed for deterministic board generation.
///
/// A 128-bit seed serialized as 32 hex digits. Two builders created with the
/// same seed produce the same boards from the same clue pool.
///
/// # Example
///
/// ```
/// use buzzboard_engine::BoardSeed;
/// use rand::Rng as _;
///
/// let seed: BoardSeed = rand::rng().random();
/// let hex = seed.to_string();
/// assert_eq!(hex.parse::<BoardSeed>().unwrap(), seed);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSeed([u8; 16]);

impl BoardSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl std::fmt::Display for BoardSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

/// Error parsing a [`BoardSeed`] from hex.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("invalid board seed {input:?}: expected 32 hex digits")]
pub struct ParseBoardSeedError {
    input: String,
}

impl std::str::FromStr for BoardSeed {
    type Err = ParseBoardSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseBoardSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| invalid())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for BoardSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{self}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for BoardSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `BoardSeed` values with `rng.random()`.
impl Distribution<BoardSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BoardSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        BoardSeed(seed)
    }
}

/// Candidates of one category, grouped by normalized key.
#[derive(Debug)]
struct CategoryCandidates<'a> {
    name: &'a str,
    by_value: BTreeMap<u32, Vec<&'a ClueRecord>>,
}

impl CategoryCandidates<'_> {
    fn is_complete(&self, ladder: &ValueLadder) -> bool {
        ladder.iter().all(|value| self.by_value.contains_key(&value))
    }

    /// Picks one candidate per ladder value.
    fn draw<R: Rng + ?Sized>(
        &self,
        ladder: &ValueLadder,
        rng: &mut R,
    ) -> Result<BoardCategory, BoardBuildError> {
        let mut cells = BTreeMap::new();
        for value in ladder.iter() {
            let clue = self
                .by_value
                .get(&value)
                .and_then(|candidates| candidates.choose(rng))
                .ok_or_else(|| BoardBuildError::IncompleteCategory {
                    category: self.name.to_owned(),
                    value,
                })?;
            cells.insert(value, (*clue).clone());
        }
        Ok(BoardCategory::new(self.name.to_owned(), cells))
    }
}

/// Groups the eligible part of `pool` by normalized category key.
///
/// A record is eligible when it belongs to `round` and its value is on the
/// ladder. The display name of a group is the first spelling seen.
fn group_candidates<'a>(
    pool: &'a [ClueRecord],
    ladder: &ValueLadder,
    round: Round,
) -> BTreeMap<String, CategoryCandidates<'a>> {
    let mut groups = BTreeMap::<String, CategoryCandidates<'a>>::new();
    for record in pool
        .iter()
        .filter(|r| r.round() == round && ladder.contains(r.value()))
    {
        let group = match groups.entry(record.category_key()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(CategoryCandidates {
                name: record.category(),
                by_value: BTreeMap::new(),
            }),
        };
        group.by_value.entry(record.value()).or_default().push(record);
    }
    groups
}

/// Display names of the categories that can fill a whole board column.
///
/// Sorted by normalized key.
#[must_use]
pub fn complete_category_names(
    pool: &[ClueRecord],
    ladder: &ValueLadder,
    round: Round,
) -> Vec<String> {
    group_candidates(pool, ladder, round)
        .into_values()
        .filter(|group| group.is_complete(ladder))
        .map(|group| group.name.to_owned())
        .collect()
}

/// Number of records in `pool` a board could be built from.
#[must_use]
pub fn eligible_count(pool: &[ClueRecord], ladder: &ValueLadder, round: Round) -> usize {
    pool.iter()
        .filter(|r| r.round() == round && ladder.contains(r.value()))
        .count()
}

/// Builds boards from a clue pool.
///
/// Categories are chosen uniformly at random without replacement among the
/// complete ones, then one candidate is drawn per cell. For reproducible
/// boards use [`Self::with_seed`].
#[derive(Debug, Clone)]
pub struct BoardBuilder {
    rng: Pcg32,
    eligible_round: Round,
}

impl Default for BoardBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: BoardSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
            eligible_round: Round::First,
        }
    }

    /// Restricts the builder to clues from `round` (first round by default).
    #[must_use]
    pub fn eligible_round(self, eligible_round: Round) -> Self {
        Self {
            eligible_round,
            ..self
        }
    }

    /// Builds a board of `category_count` categories.
    ///
    /// The count is clamped to the valid range first. The build either
    /// returns a complete board or fails without side effects on the caller.
    pub fn build(
        &mut self,
        pool: &[ClueRecord],
        category_count: usize,
        ladder: &ValueLadder,
    ) -> Result<Board, BoardBuildError> {
        if pool.is_empty() {
            return Err(BoardBuildError::EmptyDataset);
        }
        let requested =
            clamp_category_count(i64::try_from(category_count).unwrap_or(i64::MAX));

        let mut complete = group_candidates(pool, ladder, self.eligible_round)
            .into_values()
            .filter(|group| group.is_complete(ladder))
            .collect::<Vec<_>>();
        if complete.len() < requested {
            tracing::info!(
                requested,
                found = complete.len(),
                "not enough complete categories"
            );
            return Err(BoardBuildError::InsufficientCategories {
                requested,
                found: complete.len(),
            });
        }

        complete.shuffle(&mut self.rng);
        complete.truncate(requested);

        let categories = complete
            .iter()
            .map(|group| group.draw(ladder, &mut self.rng))
            .collect::<Result<Vec<_>, _>>()?;

        let board = Board::new(categories, ladder.clone());
        tracing::info!(
            categories = board.categories().len(),
            cells = board.total_cells(),
            "board built"
        );
        Ok(board)
    }
}

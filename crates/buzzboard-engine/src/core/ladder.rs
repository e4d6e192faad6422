use serde::{Deserialize, Serialize};

use crate::InvalidLadderError;

/// Ordered set of point values forming the rows of a board.
///
/// A ladder is non-empty, contains only positive values, and is strictly
/// increasing. The ladder is fixed per deployment; every board category holds
/// exactly one clue per ladder value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u32>", into = "Vec<u32>")]
pub struct ValueLadder(Vec<u32>);

impl Default for ValueLadder {
    fn default() -> Self {
        Self::standard()
    }
}

impl ValueLadder {
    /// The classic first-round ladder: 200, 400, 600, 800, 1000.
    pub const STANDARD: [u32; 5] = [200, 400, 600, 800, 1000];

    #[must_use]
    pub fn standard() -> Self {
        Self(Self::STANDARD.to_vec())
    }

    /// Creates a ladder from values given in ascending order.
    pub fn new(values: impl Into<Vec<u32>>) -> Result<Self, InvalidLadderError> {
        let values = values.into();
        if values.is_empty() {
            return Err(InvalidLadderError::Empty);
        }
        if values.contains(&0) {
            return Err(InvalidLadderError::ZeroValue);
        }
        if values.windows(2).any(|w| w[0] >= w[1]) {
            return Err(InvalidLadderError::NotIncreasing);
        }
        Ok(Self(values))
    }

    #[must_use]
    pub fn values(&self) -> &[u32] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn contains(&self, value: u32) -> bool {
        self.0.binary_search(&value).is_ok()
    }

    /// Row index of `value` on the board, if it is on the ladder.
    #[must_use]
    pub fn position(&self, value: u32) -> Option<usize> {
        self.0.binary_search(&value).ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }
}

impl TryFrom<Vec<u32>> for ValueLadder {
    type Error = InvalidLadderError;

    fn try_from(values: Vec<u32>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<ValueLadder> for Vec<u32> {
    fn from(ladder: ValueLadder) -> Self {
        ladder.0
    }
}

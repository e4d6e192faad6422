use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::core::{ladder::ValueLadder, record::ClueRecord};

/// Address of one cell on the board: a category column and a ladder value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CellRef {
    pub category: usize,
    pub value: u32,
}

impl CellRef {
    #[must_use]
    pub const fn new(category: usize, value: u32) -> Self {
        Self { category, value }
    }
}

/// One column of the board.
///
/// Holds exactly one clue per ladder value and the set of values that have
/// already been played.
#[derive(Debug, Clone, Serialize)]
pub struct BoardCategory {
    name: String,
    cells: BTreeMap<u32, ClueRecord>,
    used: BTreeSet<u32>,
}

impl BoardCategory {
    pub(crate) fn new(name: String, cells: BTreeMap<u32, ClueRecord>) -> Self {
        Self {
            name,
            cells,
            used: BTreeSet::new(),
        }
    }

    /// Display name (first-seen spelling in the dataset).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn clue(&self, value: u32) -> Option<&ClueRecord> {
        self.cells.get(&value)
    }

    #[must_use]
    pub fn is_used(&self, value: u32) -> bool {
        self.used.contains(&value)
    }

    /// Cells in ascending value order.
    pub fn cells(&self) -> impl Iterator<Item = (u32, &ClueRecord)> + '_ {
        self.cells.iter().map(|(value, clue)| (*value, clue))
    }
}

/// A generated board: categories in display order times the value ladder.
///
/// The number of cells is fixed at creation. Played cells are recorded in a
/// monotonically growing used set and can never be opened again.
#[derive(Debug, Clone, Serialize)]
pub struct Board {
    categories: Vec<BoardCategory>,
    ladder: ValueLadder,
    total_cells: usize,
    used_count: usize,
}

impl Board {
    pub(crate) fn new(categories: Vec<BoardCategory>, ladder: ValueLadder) -> Self {
        debug_assert!(
            categories
                .iter()
                .all(|category| ladder.iter().all(|value| category.clue(value).is_some()))
        );
        let total_cells = categories.len() * ladder.len();
        Self {
            categories,
            ladder,
            total_cells,
            used_count: 0,
        }
    }

    #[must_use]
    pub fn categories(&self) -> &[BoardCategory] {
        &self.categories
    }

    #[must_use]
    pub fn ladder(&self) -> &ValueLadder {
        &self.ladder
    }

    #[must_use]
    pub fn total_cells(&self) -> usize {
        self.total_cells
    }

    #[must_use]
    pub fn used_count(&self) -> usize {
        self.used_count
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total_cells - self.used_count
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.used_count >= self.total_cells
    }

    #[must_use]
    pub fn category(&self, cell: CellRef) -> Option<&BoardCategory> {
        self.categories.get(cell.category)
    }

    #[must_use]
    pub fn clue(&self, cell: CellRef) -> Option<&ClueRecord> {
        self.category(cell)?.clue(cell.value)
    }

    #[must_use]
    pub fn is_used(&self, cell: CellRef) -> bool {
        self.category(cell)
            .is_some_and(|category| category.is_used(cell.value))
    }

    /// Marks a cell as played.
    ///
    /// Returns `false` if the cell does not exist or was already used.
    pub(crate) fn mark_used(&mut self, cell: CellRef) -> bool {
        let Some(category) = self.categories.get_mut(cell.category) else {
            return false;
        };
        if !category.cells.contains_key(&cell.value) || !category.used.insert(cell.value) {
            return false;
        }
        self.used_count += 1;
        true
    }

    /// Cells that have not been played yet, row by row.
    pub fn open_cells(&self) -> impl Iterator<Item = CellRef> + '_ {
        self.ladder.iter().flat_map(move |value| {
            self.categories
                .iter()
                .enumerate()
                .filter(move |(_, category)| !category.is_used(value))
                .map(move |(index, _)| CellRef::new(index, value))
        })
    }
}

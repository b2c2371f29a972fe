//! Board state and the cycle move
//!
//! Each column is a stack stored bottom-to-top. A cycle drops the held cube in
//! at the bottom and lifts the top cube out into the hand, so the column and
//! the hand form one ring that rotates by a single slot per move.

use std::collections::VecDeque;

use serde::Serialize;

use super::catalog::{Continent, Country};
use super::layout::Board;

/// A cube on the board: the country and the key it matches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Tile {
    pub country: Country,
    pub key: Continent,
}

impl Tile {
    pub fn new(country: Country, key: Continent) -> Self {
        Self { country, key }
    }

    #[inline]
    pub fn code(&self) -> &'static str {
        self.country.code
    }
}

/// Per-column interaction lock
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ColumnState {
    Idle,
    /// Locked until `started_ms + animation_ms`
    Animating { started_ms: f64 },
}

/// Derived match statistics for one column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnCompletion {
    pub matched: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent
    pub percentage: u8,
}

impl ColumnCompletion {
    pub fn is_full(&self) -> bool {
        self.total > 0 && self.matched == self.total
    }
}

/// Why a cycle was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    Animating,
    NoSuchColumn,
    NotPlaying,
}

/// Result of [`PuzzleGrid::cycle_column`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Committed { committed: Tile, released: Tile },
    Rejected(Rejection),
}

/// Mutable board: committed columns, the held cube and column locks
#[derive(Debug, Clone)]
pub struct PuzzleGrid {
    columns: Vec<VecDeque<Tile>>,
    held: Tile,
    states: Vec<ColumnState>,
    animation_ms: f64,
    completion: Vec<ColumnCompletion>,
    /// Bumped on every completion recomputation
    revision: u64,
}

impl PuzzleGrid {
    pub fn from_board(board: Board, animation_ms: f64) -> Self {
        let columns: Vec<VecDeque<Tile>> = board.columns.into_iter().map(VecDeque::from).collect();
        let states = vec![ColumnState::Idle; columns.len()];
        let mut grid = Self {
            columns,
            held: board.held,
            states,
            animation_ms: animation_ms.max(0.0),
            completion: Vec::new(),
            revision: 0,
        };
        grid.recompute();
        grid
    }

    /// Swap the held cube through `column`.
    ///
    /// Refused (and the board left untouched) while the column is still
    /// animating from its previous move.
    pub fn cycle_column(&mut self, column: usize, now_ms: f64) -> CycleOutcome {
        if column >= self.columns.len() {
            return CycleOutcome::Rejected(Rejection::NoSuchColumn);
        }
        if !self.is_idle(column, now_ms) {
            return CycleOutcome::Rejected(Rejection::Animating);
        }

        let committed = self.held;
        let stack = &mut self.columns[column];
        stack.push_front(committed);
        let Some(released) = stack.pop_back() else {
            // Unreachable: we just pushed
            return CycleOutcome::Rejected(Rejection::NoSuchColumn);
        };
        self.held = released;
        self.states[column] = ColumnState::Animating { started_ms: now_ms };
        self.recompute();

        CycleOutcome::Committed {
            committed,
            released,
        }
    }

    /// Whether `column` accepts a move at `now_ms`
    pub fn is_idle(&self, column: usize, now_ms: f64) -> bool {
        match self.states.get(column) {
            Some(ColumnState::Idle) => true,
            Some(ColumnState::Animating { started_ms }) => now_ms - started_ms >= self.animation_ms,
            None => false,
        }
    }

    /// Release locks whose animation has run out; returns the settled columns
    pub fn settle(&mut self, now_ms: f64) -> Vec<usize> {
        let mut settled = Vec::new();
        for column in 0..self.states.len() {
            if let ColumnState::Animating { .. } = self.states[column] {
                if self.is_idle(column, now_ms) {
                    self.states[column] = ColumnState::Idle;
                    settled.push(column);
                }
            }
        }
        settled
    }

    /// Fresh completion figures straight from the board
    pub fn compute_completion(&self) -> Vec<ColumnCompletion> {
        self.columns
            .iter()
            .zip(Continent::BOARD)
            .map(|(stack, target)| {
                let total = stack.len();
                let matched = stack.iter().filter(|t| t.key == target).count();
                let percentage = if total == 0 {
                    0
                } else {
                    ((matched as f64 / total as f64) * 100.0).round() as u8
                };
                ColumnCompletion {
                    matched,
                    total,
                    percentage,
                }
            })
            .collect()
    }

    fn recompute(&mut self) {
        self.completion = self.compute_completion();
        self.revision += 1;
    }

    /// Completion as of the last committed move
    pub fn completion(&self) -> &[ColumnCompletion] {
        &self.completion
    }

    pub fn completion_revision(&self) -> u64 {
        self.revision
    }

    /// Number of columns at 100%
    pub fn full_columns(&self) -> usize {
        self.completion.iter().filter(|c| c.is_full()).count()
    }

    pub fn is_complete(&self, columns_required: usize) -> bool {
        self.full_columns() >= columns_required.min(self.columns.len())
    }

    pub fn held(&self) -> Tile {
        self.held
    }

    pub fn column(&self, column: usize) -> Option<&VecDeque<Tile>> {
        self.columns.get(column)
    }

    /// Codes in `column`, bottom to top
    pub fn column_codes(&self, column: usize) -> Vec<&'static str> {
        self.columns
            .get(column)
            .map(|stack| stack.iter().map(Tile::code).collect())
            .unwrap_or_default()
    }

    pub fn column_state(&self, column: usize) -> Option<ColumnState> {
        self.states.get(column).copied()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn layers(&self) -> usize {
        self.columns.first().map(VecDeque::len).unwrap_or(0)
    }

    /// Board cubes plus the held one
    pub fn item_count(&self) -> usize {
        self.columns.iter().map(VecDeque::len).sum::<usize>() + 1
    }

    pub fn target(&self, column: usize) -> Option<Continent> {
        Continent::BOARD.get(column).copied()
    }
}

//! Deterministic quiz engine
//!
//! All puzzle logic lives here. This module must stay pure:
//! - Timestamps come in as arguments, never read from a clock
//! - Seeded RNG only (the held-cube draw takes explicit entropy)
//! - No rendering or platform dependencies

pub mod catalog;
pub mod grid;
pub mod layout;
pub mod level;
pub mod progression;
pub mod rng;
pub mod state;
pub mod tick;
pub mod timer;

pub use catalog::{CatalogEntry, Continent, Country, CountryCatalog};
pub use grid::{ColumnCompletion, ColumnState, CycleOutcome, PuzzleGrid, Rejection, Tile};
pub use layout::{Board, Layout, LayoutGenerator};
pub use level::{LevelCatalog, LevelDefinition, LevelMode, PoolSpec, TimerMode};
pub use progression::{Advance, ProgressionState};
pub use rng::SeededRandom;
pub use state::{QuizEvent, QuizPhase, QuizState, level_seed};
pub use tick::{QuizInput, tick};
pub use timer::{TimerController, TimerDisplay, TimerState, TimerThresholds, TimerTick, format_clock};

//! Tower of Flags - a stacked-cube geography quiz
//!
//! Core modules:
//! - `quiz`: Deterministic puzzle engine (generation, board, timer, progress)
//! - `renderer`: Snapshot and placement handed to the external 3D layer
//! - `platform`: Browser/native clock and entropy
//! - `persistence`: LocalStorage-backed key/value store
//! - `tuning`: Data-driven engine constants

pub mod persistence;
pub mod platform;
pub mod quiz;
pub mod records;
pub mod renderer;
pub mod settings;
pub mod tuning;

pub use records::Records;
pub use settings::Settings;
pub use tuning::Tuning;

/// Board configuration constants
pub mod consts {
    /// One column per board continent
    pub const COLUMN_COUNT: usize = 5;
    /// Cubes per column on a standard level
    pub const DEFAULT_LAYERS: usize = 10;
}

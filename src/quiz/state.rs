//! Session state
//!
//! One owned context for everything a running quiz needs: reference data,
//! the live board, the timer, progress and the store they persist to.

use serde::Serialize;

use super::catalog::CountryCatalog;
use super::grid::{CycleOutcome, PuzzleGrid, Rejection};
use super::layout::LayoutGenerator;
use super::level::{LevelCatalog, LevelDefinition, TimerMode};
use super::progression::ProgressionState;
use super::timer::{TimerController, TimerDisplay, TimerThresholds, TimerTick};
use crate::persistence::Storage;
use crate::records::{RecordKind, Records};
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Seed stride between consecutive levels
const LEVEL_SEED_STRIDE: u32 = 7_919;
/// Seed stride between retries of one level
const ATTEMPT_SEED_STRIDE: u32 = 104_729;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum QuizPhase {
    Playing,
    /// Enough columns full; progress already advanced
    Cleared { time_ms: f64, new_record: bool },
    /// Blitz clock ran out; continue restarts the same level
    TimeUp,
}

/// Notifications for the UI layer, drained every tick
#[derive(Debug, Clone, PartialEq)]
pub enum QuizEvent {
    LevelStarted { index: usize, seed: u32, degraded: bool },
    Cycled { column: usize, committed: &'static str, released: &'static str, correct: bool },
    Penalty { seconds: f64 },
    ColumnSettled { column: usize },
    LevelCleared { index: usize, time_ms: f64, new_record: bool },
    /// Last level cleared, campaign wrapped to the start (once per session)
    CampaignComplete,
    TimeUp { index: usize },
}

pub struct QuizState {
    catalog: CountryCatalog,
    levels: LevelCatalog,
    tuning: Tuning,
    settings: Settings,
    progression: ProgressionState,
    records: Records,
    storage: Box<dyn Storage>,
    grid: PuzzleGrid,
    timer: TimerController,
    phase: QuizPhase,
    seed: u32,
    /// Restarts of the current level since it was entered
    attempt: u32,
    degraded: bool,
    level_started_ms: f64,
    events: Vec<QuizEvent>,
}

impl QuizState {
    /// Load persisted progress and deal the current level
    pub fn new(storage: Box<dyn Storage>, tuning: Tuning, now_ms: f64, entropy: u64) -> Self {
        let catalog = CountryCatalog::builtin();
        let levels = LevelCatalog::builtin(&catalog);
        Self::with_levels(storage, tuning, catalog, levels, now_ms, entropy)
    }

    /// As [`QuizState::new`] with custom reference data
    pub fn with_levels(
        storage: Box<dyn Storage>,
        tuning: Tuning,
        catalog: CountryCatalog,
        levels: LevelCatalog,
        now_ms: f64,
        entropy: u64,
    ) -> Self {
        let settings = Settings::load(storage.as_ref());
        let progression = ProgressionState::load(storage.as_ref(), levels.len());
        let records = Records::load(storage.as_ref());

        let level = levels.level(progression.current());
        let seed = level_seed(tuning.base_seed, progression.current(), 0);
        let animation_ms = settings.effective_animation_ms(tuning.animation_ms);
        let layout = LayoutGenerator::new(&catalog, tuning.generator).generate(level, seed, entropy);
        let degraded = layout.is_degraded();
        let grid = PuzzleGrid::from_board(layout.into_board(), animation_ms);

        let mut state = Self {
            catalog,
            levels,
            tuning,
            settings,
            progression,
            records,
            storage,
            grid,
            timer: TimerController::new(),
            phase: QuizPhase::Playing,
            seed,
            attempt: 0,
            degraded,
            level_started_ms: now_ms,
            events: Vec::new(),
        };
        state.begin(now_ms);
        state
    }

    /// Deal a fresh board for the current level and start its timer
    pub fn start_level(&mut self, now_ms: f64, entropy: u64) {
        let index = self.progression.current();
        let level = self.levels.level(index);
        self.seed = level_seed(self.tuning.base_seed, index, self.attempt);
        let layout = LayoutGenerator::new(&self.catalog, self.tuning.generator)
            .generate(level, self.seed, entropy);
        self.degraded = layout.is_degraded();
        let animation_ms = self.settings.effective_animation_ms(self.tuning.animation_ms);
        self.grid = PuzzleGrid::from_board(layout.into_board(), animation_ms);
        self.begin(now_ms);
    }

    fn begin(&mut self, now_ms: f64) {
        let index = self.progression.current();
        let level = self.levels.level(index);
        self.timer.start(level.timer, now_ms);
        self.phase = QuizPhase::Playing;
        self.level_started_ms = now_ms;
        log::info!(
            "Level {} '{}' started (seed {}, attempt {}{})",
            index + 1,
            level.title,
            self.seed,
            self.attempt + 1,
            if self.degraded { ", unconstrained board" } else { "" }
        );
        self.events.push(QuizEvent::LevelStarted {
            index,
            seed: self.seed,
            degraded: self.degraded,
        });
    }

    /// Column pick from the input layer
    pub fn select_column(&mut self, column: usize, now_ms: f64) -> CycleOutcome {
        // A move landing after the deadline loses to the clock
        self.poll_timer(now_ms);
        if self.phase != QuizPhase::Playing {
            return CycleOutcome::Rejected(Rejection::NotPlaying);
        }
        let outcome = self.grid.cycle_column(column, now_ms);
        match outcome {
            CycleOutcome::Committed { committed, released } => {
                let correct = self.grid.target(column) == Some(committed.key);
                self.events.push(QuizEvent::Cycled {
                    column,
                    committed: committed.code(),
                    released: released.code(),
                    correct,
                });
                if !correct && matches!(self.timer.mode(), TimerMode::Blitz { .. }) {
                    let seconds = self.tuning.blitz_penalty_secs;
                    self.timer.apply_penalty(seconds);
                    self.events.push(QuizEvent::Penalty { seconds });
                    self.poll_timer(now_ms);
                }
                if self.phase == QuizPhase::Playing
                    && self.grid.is_complete(self.tuning.columns_required)
                {
                    self.on_cleared(now_ms);
                }
            }
            CycleOutcome::Rejected(reason) => {
                log::debug!("Pick on column {} ignored: {:?}", column, reason);
            }
        }
        outcome
    }

    /// Per-frame refresh: column locks and the timer
    pub fn update(&mut self, now_ms: f64) {
        for column in self.grid.settle(now_ms) {
            self.events.push(QuizEvent::ColumnSettled { column });
        }
        self.poll_timer(now_ms);
    }

    fn poll_timer(&mut self, now_ms: f64) {
        if self.phase == QuizPhase::Playing && self.timer.poll(now_ms) == TimerTick::Expired {
            let index = self.progression.current();
            log::info!("Time's up on level {}", index + 1);
            self.phase = QuizPhase::TimeUp;
            self.events.push(QuizEvent::TimeUp { index });
        }
    }

    fn on_cleared(&mut self, now_ms: f64) {
        let index = self.progression.current();
        let level_id = self.levels.level(index).id;
        let (kind, time_ms) = match self.timer.remaining_ms(now_ms) {
            Some(remaining) => (RecordKind::Remaining, remaining),
            None => (RecordKind::Elapsed, now_ms - self.level_started_ms),
        };
        self.timer.stop(now_ms);

        let new_record = self.records.submit(level_id, kind, time_ms, now_ms);
        if new_record {
            self.records.save(self.storage.as_mut());
        }
        log::info!("Level {} cleared in {:.1}s", index + 1, time_ms / 1000.0);
        self.events.push(QuizEvent::LevelCleared {
            index,
            time_ms,
            new_record,
        });

        let advance = self.progression.advance(self.storage.as_mut());
        if self.progression.take_wrap_notice(advance) {
            log::info!("All levels cleared, starting over");
            self.events.push(QuizEvent::CampaignComplete);
        }
        self.attempt = 0;
        self.phase = QuizPhase::Cleared {
            time_ms,
            new_record,
        };
    }

    /// Leave a Cleared/TimeUp screen
    pub fn continue_play(&mut self, now_ms: f64, entropy: u64) {
        match self.phase {
            QuizPhase::Playing => {}
            QuizPhase::Cleared { .. } => self.start_level(now_ms, entropy),
            QuizPhase::TimeUp => self.restart(now_ms, entropy),
        }
    }

    /// Fresh board for the same level
    pub fn restart(&mut self, now_ms: f64, entropy: u64) {
        self.timer.stop(now_ms);
        self.attempt = self.attempt.wrapping_add(1);
        self.start_level(now_ms, entropy);
    }

    /// Debug/tooling navigation; immediately deals the new level
    pub fn jump_to(&mut self, index: usize, now_ms: f64, entropy: u64) -> bool {
        if !self.progression.jump_to(index, self.storage.as_mut()) {
            return false;
        }
        self.timer.stop(now_ms);
        self.attempt = 0;
        self.start_level(now_ms, entropy);
        true
    }

    pub fn set_settings(&mut self, settings: Settings) {
        settings.save(self.storage.as_mut());
        self.settings = settings;
    }

    pub fn drain_events(&mut self) -> Vec<QuizEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn timer_display(&self, now_ms: f64) -> Option<TimerDisplay> {
        self.timer.display(
            now_ms,
            TimerThresholds {
                blitz_warning_secs: self.tuning.blitz_warning_secs,
                count_up_warning_secs: self.tuning.count_up_warning_secs,
            },
        )
    }

    pub fn grid(&self) -> &PuzzleGrid {
        &self.grid
    }

    pub fn timer(&self) -> &TimerController {
        &self.timer
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn level_index(&self) -> usize {
        self.progression.current()
    }

    pub fn level(&self) -> &LevelDefinition {
        self.levels.level(self.progression.current())
    }

    pub fn levels(&self) -> &LevelCatalog {
        &self.levels
    }

    pub fn catalog(&self) -> &CountryCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn records(&self) -> &Records {
        &self.records
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    #[cfg(test)]
    pub(crate) fn install_board(&mut self, board: super::layout::Board) {
        let animation_ms = self.settings.effective_animation_ms(self.tuning.animation_ms);
        self.grid = PuzzleGrid::from_board(board, animation_ms);
    }

    #[cfg(test)]
    pub(crate) fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }
}

/// Reproducible seed for a level attempt
pub fn level_seed(base: u32, level_index: usize, attempt: u32) -> u32 {
    base.wrapping_add((level_index as u32).wrapping_mul(LEVEL_SEED_STRIDE))
        .wrapping_add(attempt.wrapping_mul(ATTEMPT_SEED_STRIDE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;
    use crate::quiz::catalog::{Continent, CountryCatalog};
    use crate::quiz::grid::Tile;
    use crate::quiz::layout::Board;
    use crate::quiz::progression::PROGRESS_KEY;

    const ANIM: f64 = 450.0;

    fn state_at(level: usize) -> QuizState {
        let mut storage = MemoryStorage::new();
        storage.set_item(PROGRESS_KEY, &level.to_string());
        QuizState::new(Box::new(storage), Tuning::default(), 0.0, 1)
    }

    fn index_of(state: &QuizState, id: &str) -> usize {
        state.levels().iter().position(|l| l.id == id).unwrap()
    }

    /// Four full columns, Africa missing one cube which sits in the hand
    fn nearly_solved(catalog: &CountryCatalog, layers: usize) -> Board {
        let mut columns: Vec<Vec<Tile>> = Continent::BOARD
            .iter()
            .map(|&c| catalog.by_continent(c).take(layers).map(|k| Tile::new(k, c)).collect())
            .collect();
        columns[0][layers - 1] = Tile::new(catalog.resolve("FR"), Continent::Europe);
        columns[1][layers - 1] = Tile::new(catalog.resolve("DE"), Continent::Europe);
        let held = Tile::new(catalog.resolve("MU"), Continent::Africa);
        Board { columns, held }
    }

    #[test]
    fn test_starts_at_persisted_level() {
        let mut state = state_at(2);
        assert_eq!(state.level_index(), 2);
        assert_eq!(state.phase(), QuizPhase::Playing);
        assert_eq!(state.seed(), level_seed(98_597, 2, 0));
        let events = state.drain_events();
        assert!(matches!(events[0], QuizEvent::LevelStarted { index: 2, .. }));
    }

    #[test]
    fn test_first_attempt_is_reproducible() {
        let a = state_at(1);
        let b = state_at(1);
        for column in 0..5 {
            assert_eq!(a.grid().column_codes(column), b.grid().column_codes(column));
        }
    }

    #[test]
    fn test_clear_advances_and_records() {
        let mut state = state_at(0);
        let layers = state.level().layers;
        let board = nearly_solved(state.catalog(), layers);
        state.install_board(board);
        state.drain_events();

        state.select_column(0, 10_000.0);
        assert!(matches!(state.phase(), QuizPhase::Cleared { new_record: true, .. }));
        assert_eq!(state.level_index(), 1);
        assert_eq!(state.storage().get_item(PROGRESS_KEY).as_deref(), Some("1"));
        assert!(state.records().best(state.levels().level(0).id).is_some());

        // Board is frozen until continue
        assert_eq!(
            state.select_column(1, 20_000.0),
            CycleOutcome::Rejected(Rejection::NotPlaying)
        );
        state.continue_play(20_000.0, 2);
        assert_eq!(state.phase(), QuizPhase::Playing);
        assert_eq!(state.grid().layers(), state.levels().level(1).layers);
    }

    #[test]
    fn test_blitz_times_out() {
        let blitz = {
            let probe = state_at(0);
            index_of(&probe, "blitz")
        };
        let mut state = state_at(blitz);
        assert_eq!(state.level().blitz_seconds(), Some(180.0));
        state.update(180_999.0 - 1_000.0);
        assert_eq!(state.phase(), QuizPhase::Playing);
        state.update(181_000.0);
        assert_eq!(state.phase(), QuizPhase::TimeUp);
        assert!(state.drain_events().contains(&QuizEvent::TimeUp { index: blitz }));

        // Time up restarts the same level with a new attempt seed
        let seed = state.seed();
        state.continue_play(200_000.0, 3);
        assert_eq!(state.level_index(), blitz);
        assert_ne!(state.seed(), seed);
        assert_eq!(state.phase(), QuizPhase::Playing);
    }

    #[test]
    fn test_pick_after_deadline_times_out() {
        let blitz = index_of(&state_at(0), "blitz");
        let mut state = state_at(blitz);
        let layers = state.level().layers;
        let board = nearly_solved(state.catalog(), layers);
        state.install_board(board);
        state.drain_events();
        let codes = state.grid().column_codes(0);

        // The winning drop arrives in the first frame past the 180 s deadline
        let outcome = state.select_column(0, 200_000.0);
        assert_eq!(outcome, CycleOutcome::Rejected(Rejection::NotPlaying));
        assert_eq!(state.phase(), QuizPhase::TimeUp);
        assert_eq!(state.grid().column_codes(0), codes);
        assert_eq!(state.level_index(), blitz);
        assert!(state.records().best(state.level().id).is_none());
        assert_eq!(state.drain_events(), vec![QuizEvent::TimeUp { index: blitz }]);
    }

    #[test]
    fn test_wrong_drop_costs_blitz_time() {
        let blitz = index_of(&state_at(0), "blitz");
        let mut state = state_at(blitz);
        let layers = state.level().layers;
        let board = nearly_solved(state.catalog(), layers);
        state.install_board(board);
        state.drain_events();

        // Mauritius onto Oceania is wrong
        let before = state.timer().remaining_ms(1_000.0).unwrap();
        state.select_column(4, 1_000.0);
        assert_eq!(state.timer().remaining_ms(1_000.0).unwrap(), before - 5_000.0);
        assert!(state.drain_events().contains(&QuizEvent::Penalty { seconds: 5.0 }));
    }

    #[test]
    fn test_penalty_past_deadline_times_out() {
        let blitz = index_of(&state_at(0), "blitz");
        let mut state = state_at(blitz);
        let layers = state.level().layers;
        let board = nearly_solved(state.catalog(), layers);
        state.install_board(board);
        state.drain_events();

        // 2 s left; the 5 s penalty runs the clock out on this very move
        state.select_column(4, 178_000.0);
        assert_eq!(state.phase(), QuizPhase::TimeUp);
        let events = state.drain_events();
        assert!(events.contains(&QuizEvent::Penalty { seconds: 5.0 }));
        assert!(events.contains(&QuizEvent::TimeUp { index: blitz }));
    }

    #[test]
    fn test_no_penalty_outside_blitz() {
        let mut state = state_at(0);
        let layers = state.level().layers;
        let board = nearly_solved(state.catalog(), layers);
        state.install_board(board);
        state.drain_events();
        state.select_column(4, 0.0);
        assert!(!state.drain_events().iter().any(|e| matches!(e, QuizEvent::Penalty { .. })));
    }

    #[test]
    fn test_rejected_pick_keeps_board() {
        let mut state = state_at(1);
        state.select_column(2, 0.0);
        let codes = state.grid().column_codes(2);
        let revision = state.grid().completion_revision();
        let outcome = state.select_column(2, ANIM / 2.0);
        assert_eq!(outcome, CycleOutcome::Rejected(Rejection::Animating));
        assert_eq!(state.grid().column_codes(2), codes);
        assert_eq!(state.grid().completion_revision(), revision);
    }

    #[test]
    fn test_settled_columns_are_reported() {
        let mut state = state_at(1);
        state.select_column(3, 0.0);
        state.drain_events();
        state.update(ANIM);
        assert_eq!(state.drain_events(), vec![QuizEvent::ColumnSettled { column: 3 }]);
    }

    #[test]
    fn test_jump_to_deals_new_level() {
        let mut state = state_at(0);
        state.drain_events();
        assert!(state.jump_to(3, 5.0, 9));
        assert_eq!(state.level_index(), 3);
        assert_eq!(state.storage().get_item(PROGRESS_KEY).as_deref(), Some("3"));
        assert!(matches!(state.drain_events()[0], QuizEvent::LevelStarted { index: 3, .. }));
        assert!(!state.jump_to(99, 6.0, 9));
        assert_eq!(state.level_index(), 3);
    }

    #[test]
    fn test_last_level_wraps_with_notice() {
        let last = state_at(0).levels().len() - 1;
        let mut state = state_at(last);
        let layers = state.level().layers;
        let board = nearly_solved(state.catalog(), layers);
        state.install_board(board);
        state.drain_events();
        state.select_column(0, 1.0);
        assert_eq!(state.level_index(), 0);
        assert!(state.drain_events().contains(&QuizEvent::CampaignComplete));
    }

    #[test]
    fn test_level_seed_strides() {
        assert_eq!(level_seed(98_597, 0, 0), 98_597);
        assert_eq!(level_seed(98_597, 1, 0), 98_597 + 7_919);
        assert_eq!(level_seed(98_597, 0, 1), 98_597 + 104_729);
        assert_eq!(level_seed(u32::MAX, 1, 0), 7_918);
    }
}

//! Per-frame step
//!
//! Turns one frame's worth of input into state changes, then polls the
//! column locks and the timer against the frame's timestamp.

use super::state::{QuizEvent, QuizState};

/// Input commands collected since the last frame
#[derive(Debug, Clone, Default)]
pub struct QuizInput {
    /// Column picked (click/tap/number key)
    pub pick_column: Option<usize>,
    /// Dismiss the cleared / time's-up screen
    pub continue_play: bool,
    /// Re-deal the current level
    pub restart: bool,
    /// Jump to a level (debug/tooling)
    pub jump_to: Option<usize>,
}

impl QuizInput {
    pub fn pick(column: usize) -> Self {
        Self {
            pick_column: Some(column),
            ..Default::default()
        }
    }

    /// Clear one-shot commands after processing
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Advance the session to `now_ms` and return what happened
pub fn tick(state: &mut QuizState, input: &QuizInput, now_ms: f64, entropy: u64) -> Vec<QuizEvent> {
    if let Some(index) = input.jump_to {
        state.jump_to(index, now_ms, entropy);
    } else if input.restart {
        state.restart(now_ms, entropy);
    } else if input.continue_play {
        state.continue_play(now_ms, entropy);
    }

    if let Some(column) = input.pick_column {
        state.select_column(column, now_ms);
    }

    state.update(now_ms);
    state.drain_events()
}

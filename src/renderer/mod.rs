//! Render boundary
//!
//! The 3D scene, meshes and textures live outside this crate. This module
//! hands the render layer a read-only snapshot of the session plus the cube
//! placement it should use; nothing here touches a graphics API.

pub mod labels;

pub use labels::{ColumnLabels, LabelProvider, TextLabels};

use glam::Vec3;
use serde::Serialize;

use crate::quiz::{
    ColumnCompletion, ColumnState, Continent, LevelMode, QuizPhase, QuizState, TimerDisplay,
};

/// Cube edge length (world units)
pub const CUBE_SIZE: f32 = 1.0;
/// Vertical gap between stacked cubes
pub const LAYER_GAP: f32 = 0.06;
/// Distance between column centres
pub const COLUMN_SPACING: f32 = 2.2;
/// Height of the held cube above the tallest tower
pub const HELD_CLEARANCE: f32 = 1.5;

/// One tower as the render layer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSnapshot {
    pub continent: Continent,
    pub label: &'static str,
    /// Bottom to top
    pub codes: Vec<&'static str>,
    /// World position of each cube, same order as `codes`
    pub positions: Vec<Vec3>,
    pub completion: ColumnCompletion,
    pub animating: bool,
}

/// Title block for the HUD
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelText {
    pub number: usize,
    pub title: &'static str,
    pub subtitle: &'static str,
    /// Hidden when the player turned hints off
    pub hint: Option<&'static str>,
}

/// Everything the render/UI layer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardSnapshot {
    pub level: LevelText,
    pub mode: LevelMode,
    pub columns: Vec<ColumnSnapshot>,
    pub held: &'static str,
    pub held_position: Vec3,
    /// Text for the held cube's face (name or capital, per mode)
    pub held_label: Option<&'static str>,
    pub timer: Option<TimerDisplay>,
    pub phase: QuizPhase,
}

impl BoardSnapshot {
    pub fn capture(state: &QuizState, now_ms: f64) -> Self {
        let grid = state.grid();
        let level = state.level();
        let column_count = grid.column_count();
        let columns = Continent::BOARD
            .iter()
            .zip(grid.completion())
            .enumerate()
            .map(|(i, (&continent, &completion))| ColumnSnapshot {
                continent,
                label: continent.as_str(),
                codes: grid.column_codes(i),
                positions: (0..grid.column(i).map_or(0, |c| c.len()))
                    .map(|layer| cube_position(i, layer, column_count))
                    .collect(),
                completion,
                animating: matches!(grid.column_state(i), Some(ColumnState::Animating { .. }))
                    && !grid.is_idle(i, now_ms),
            })
            .collect();
        let held = grid.held();
        let held_label = state
            .catalog()
            .entry(held.code())
            .and_then(|entry| level.mode.cube_label(entry));

        Self {
            level: LevelText {
                number: state.level_index() + 1,
                title: level.title,
                subtitle: level.subtitle,
                hint: state.settings().show_hints.then_some(level.hint),
            },
            mode: level.mode,
            columns,
            held: held.code(),
            held_position: held_position(grid.layers()),
            held_label,
            timer: state.timer_display(now_ms),
            phase: state.phase(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// World position of the cube at `layer` (0 = bottom) in `column`
pub fn cube_position(column: usize, layer: usize, column_count: usize) -> Vec3 {
    let centre = (column_count.max(1) - 1) as f32 / 2.0;
    let x = (column as f32 - centre) * COLUMN_SPACING;
    let y = layer as f32 * (CUBE_SIZE + LAYER_GAP) + CUBE_SIZE / 2.0;
    Vec3::new(x, y, 0.0)
}

/// Where the held cube hovers: centred, above the towers
pub fn held_position(layers: usize) -> Vec3 {
    let top = layers as f32 * (CUBE_SIZE + LAYER_GAP);
    Vec3::new(0.0, top + HELD_CLEARANCE + CUBE_SIZE / 2.0, 0.0)
}

//! Data-driven engine constants
//!
//! Defaults reproduce the shipped game. Any subset of fields can be
//! overridden from JSON; missing fields keep their defaults.

use serde::{Deserialize, Serialize};

/// Board generation knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorTuning {
    /// Max share of a column that may start on its own continent
    pub quota_fraction: f64,
    /// Constrained attempts before the unconstrained fallback
    pub retry_budget: u32,
}

impl Default for GeneratorTuning {
    fn default() -> Self {
        Self {
            quota_fraction: 0.3,
            retry_budget: 100,
        }
    }
}

impl GeneratorTuning {
    /// Per-column cap for a board of `layers` rows (always at least 1)
    pub fn cap(&self, layers: usize) -> usize {
        // Epsilon keeps exact products (10 × 0.3) from rounding up a slot
        let raw = (layers as f64 * self.quota_fraction.clamp(0.0, 1.0) - 1e-9).ceil();
        (raw as usize).max(1)
    }
}

/// Complete engine tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub generator: GeneratorTuning,
    /// Columns at 100% needed to clear a level
    pub columns_required: usize,
    /// Column lock after a successful cycle (ms)
    pub animation_ms: f64,
    /// Seconds removed from a Blitz deadline per wrong drop
    pub blitz_penalty_secs: f64,
    /// Blitz display turns to warning colour at or below this
    pub blitz_warning_secs: f64,
    /// CountUp display turns to warning colour above this
    pub count_up_warning_secs: f64,
    /// Seed of the first attempt at level 0
    pub base_seed: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            generator: GeneratorTuning::default(),
            columns_required: 4,
            animation_ms: 450.0,
            blitz_penalty_secs: 5.0,
            blitz_warning_secs: 30.0,
            count_up_warning_secs: 180.0,
            base_seed: 98_597,
        }
    }
}

impl Tuning {
    /// Parse overrides, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Tuning>(json) {
            Ok(tuning) => tuning.sanitized(),
            Err(e) => {
                log::warn!("Ignoring malformed tuning ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Clamp values that would break the engine's invariants
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.generator.retry_budget == 0 {
            self.generator.retry_budget = 1;
        }
        if !self.generator.quota_fraction.is_finite() {
            self.generator.quota_fraction = defaults.generator.quota_fraction;
        }
        self.columns_required = self.columns_required.clamp(1, crate::consts::COLUMN_COUNT);
        if !(self.animation_ms.is_finite() && self.animation_ms >= 0.0) {
            self.animation_ms = defaults.animation_ms;
        }
        if !(self.blitz_penalty_secs.is_finite() && self.blitz_penalty_secs >= 0.0) {
            self.blitz_penalty_secs = defaults.blitz_penalty_secs;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cap_rounds_up() {
        let g = GeneratorTuning::default();
        assert_eq!(g.cap(10), 3);
        assert_eq!(g.cap(6), 2);
        assert_eq!(g.cap(1), 1);
        let zero = GeneratorTuning {
            quota_fraction: 0.0,
            retry_budget: 1,
        };
        assert_eq!(zero.cap(10), 1);
    }

    #[test]
    fn test_partial_override() {
        let t = Tuning::from_json(r#"{"columns_required": 5, "generator": {"retry_budget": 7}}"#);
        assert_eq!(t.columns_required, 5);
        assert_eq!(t.generator.retry_budget, 7);
        assert_eq!(t.generator.quota_fraction, 0.3);
        assert_eq!(t.base_seed, 98_597);
    }

    #[test]
    fn test_malformed_falls_back() {
        assert_eq!(Tuning::from_json("{not json"), Tuning::default());
    }

    #[test]
    fn test_sanitize_clamps() {
        let t = Tuning::from_json(r#"{"columns_required": 9, "generator": {"retry_budget": 0}, "animation_ms": -3}"#);
        assert_eq!(t.columns_required, 5);
        assert_eq!(t.generator.retry_budget, 1);
        assert_eq!(t.animation_ms, 450.0);
    }
}

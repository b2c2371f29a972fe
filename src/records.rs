//! Best clear times per level
//!
//! Persisted to LocalStorage, one entry per level id.

use serde::{Deserialize, Serialize};

use crate::persistence::{Storage, load_json, save_json};

/// Which reading a record compares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    /// Time taken; lower is better
    Elapsed,
    /// Blitz time left on the clock; higher is better
    Remaining,
}

/// Best result on one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub level_id: String,
    pub kind: RecordKind,
    pub best_ms: f64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Records {
    pub entries: Vec<LevelRecord>,
}

impl Records {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "flag_tower_records";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn best(&self, level_id: &str) -> Option<&LevelRecord> {
        self.entries.iter().find(|r| r.level_id == level_id)
    }

    /// Whether `ms` would beat the stored record
    pub fn qualifies(&self, level_id: &str, kind: RecordKind, ms: f64) -> bool {
        if !ms.is_finite() || ms < 0.0 {
            return false;
        }
        match self.best(level_id) {
            // A level changing timer modes starts a fresh record
            Some(record) if record.kind != kind => true,
            Some(record) => match kind {
                RecordKind::Elapsed => ms < record.best_ms,
                RecordKind::Remaining => ms > record.best_ms,
            },
            None => true,
        }
    }

    /// Store `ms` if it is a new best; returns whether it was
    pub fn submit(&mut self, level_id: &str, kind: RecordKind, ms: f64, timestamp: f64) -> bool {
        if !self.qualifies(level_id, kind, ms) {
            return false;
        }
        let record = LevelRecord {
            level_id: level_id.to_string(),
            kind,
            best_ms: ms,
            timestamp,
        };
        match self.entries.iter_mut().find(|r| r.level_id == level_id) {
            Some(existing) => *existing = record,
            None => self.entries.push(record),
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn load(storage: &dyn Storage) -> Self {
        match load_json::<Records>(storage, Self::STORAGE_KEY) {
            Some(records) => {
                log::info!("Loaded {} level records", records.entries.len());
                records
            }
            None => Self::new(),
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) {
        if save_json(storage, Self::STORAGE_KEY, self) {
            log::info!("Level records saved ({} entries)", self.entries.len());
        }
    }
}

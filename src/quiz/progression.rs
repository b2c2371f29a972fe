//! Campaign progress
//!
//! One persisted integer: the current level index. Missing, corrupt or
//! out-of-range values fall back to the first level.

use crate::persistence::{Storage, load_json, save_json};

/// LocalStorage key for the level index
pub const PROGRESS_KEY: &str = "flag_tower_level";

/// Result of [`ProgressionState::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub index: usize,
    /// Ran off the end of the table and restarted at level 0
    pub wrapped: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressionState {
    current: usize,
    level_count: usize,
    wrap_notice_shown: bool,
}

impl ProgressionState {
    /// Read the persisted index, defaulting to 0
    pub fn load(storage: &dyn Storage, level_count: usize) -> Self {
        let level_count = level_count.max(1);
        let current = match load_json::<usize>(storage, PROGRESS_KEY) {
            Some(index) if index < level_count => {
                log::info!("Resuming at level {}", index + 1);
                index
            }
            Some(index) => {
                log::warn!("Saved level {} out of range, starting over", index + 1);
                0
            }
            None => 0,
        };
        Self {
            current,
            level_count,
            wrap_notice_shown: false,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn level_count(&self) -> usize {
        self.level_count
    }

    /// Next level, wrapping to the first after the last
    pub fn advance(&mut self, storage: &mut dyn Storage) -> Advance {
        let next = self.current + 1;
        let wrapped = next >= self.level_count;
        self.current = if wrapped { 0 } else { next };
        self.persist(storage);
        Advance {
            index: self.current,
            wrapped,
        }
    }

    /// Direct navigation; out-of-range indices are ignored
    pub fn jump_to(&mut self, index: usize, storage: &mut dyn Storage) -> bool {
        if index >= self.level_count {
            log::debug!("Ignoring jump to missing level {}", index + 1);
            return false;
        }
        self.current = index;
        self.persist(storage);
        true
    }

    /// True the first time it is asked after a wrap, false afterwards
    pub fn take_wrap_notice(&mut self, advance: Advance) -> bool {
        if advance.wrapped && !self.wrap_notice_shown {
            self.wrap_notice_shown = true;
            return true;
        }
        false
    }

    fn persist(&self, storage: &mut dyn Storage) {
        save_json(storage, PROGRESS_KEY, &self.current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStorage;

    #[test]
    fn test_defaults_to_first_level() {
        let storage = MemoryStorage::new();
        assert_eq!(ProgressionState::load(&storage, 8).current(), 0);
    }

    #[test]
    fn test_corrupt_or_out_of_range_defaults() {
        let mut storage = MemoryStorage::new();
        storage.set_item(PROGRESS_KEY, "three");
        assert_eq!(ProgressionState::load(&storage, 8).current(), 0);
        storage.set_item(PROGRESS_KEY, "12");
        assert_eq!(ProgressionState::load(&storage, 8).current(), 0);
        storage.set_item(PROGRESS_KEY, "-1");
        assert_eq!(ProgressionState::load(&storage, 8).current(), 0);
    }

    #[test]
    fn test_advance_persists_and_wraps() {
        let mut storage = MemoryStorage::new();
        let mut progress = ProgressionState::load(&storage, 3);
        assert_eq!(progress.advance(&mut storage), Advance { index: 1, wrapped: false });
        assert_eq!(ProgressionState::load(&storage, 3).current(), 1);
        progress.advance(&mut storage);
        let wrap = progress.advance(&mut storage);
        assert_eq!(wrap, Advance { index: 0, wrapped: true });
        assert_eq!(storage.get_item(PROGRESS_KEY).as_deref(), Some("0"));
    }

    #[test]
    fn test_wrap_notice_is_one_time() {
        let mut storage = MemoryStorage::new();
        let mut progress = ProgressionState::load(&storage, 1);
        let first = progress.advance(&mut storage);
        assert!(progress.take_wrap_notice(first));
        let second = progress.advance(&mut storage);
        assert!(second.wrapped);
        assert!(!progress.take_wrap_notice(second));
    }

    #[test]
    fn test_jump_to() {
        let mut storage = MemoryStorage::new();
        let mut progress = ProgressionState::load(&storage, 5);
        assert!(progress.jump_to(4, &mut storage));
        assert_eq!(ProgressionState::load(&storage, 5).current(), 4);
        assert!(!progress.jump_to(5, &mut storage));
        assert_eq!(progress.current(), 4);
    }

    #[test]
    fn test_write_failure_is_not_fatal() {
        let mut storage = MemoryStorage::read_only();
        let mut progress = ProgressionState::load(&storage, 3);
        assert_eq!(progress.advance(&mut storage).index, 1);
        assert_eq!(progress.current(), 1);
    }
}

//! The persisted game record.

use serde::{Deserialize, Serialize};

use crate::enums::PlayerKeyState;

/// Progress carried between levels and sessions. Read and written whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    pub level: u32,
    pub keys: u32,
    pub treasure: u32,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            level: 1,
            keys: 0,
            treasure: 0,
        }
    }
}

impl SaveData {
    /// Fresh record for a new game.
    pub fn start_new_game() -> Self {
        Self::default()
    }

    pub fn key_state(&self) -> PlayerKeyState {
        PlayerKeyState::from_count(self.keys)
    }

    /// Record a completed level. Keys and treasure carry over.
    pub fn advance_level(&mut self) -> u32 {
        self.level += 1;
        self.level
    }
}

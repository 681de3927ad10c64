//! Save record on disk: one JSON file in a save directory.

use std::fs;
use std::path::{Path, PathBuf};

use valsrevenge_core::constants::SAVE_FILE_NAME;
use valsrevenge_core::save::SaveData;

use crate::error::SaveError;

pub fn save_path(dir: &Path) -> PathBuf {
    dir.join(SAVE_FILE_NAME)
}

pub fn save_to_file(dir: &Path, data: &SaveData) -> Result<(), SaveError> {
    fs::create_dir_all(dir)?;
    let json = serde_json::to_string_pretty(data)?;
    fs::write(save_path(dir), json)?;
    Ok(())
}

pub fn load_from_file(dir: &Path) -> Result<SaveData, SaveError> {
    let json = fs::read_to_string(save_path(dir))?;
    Ok(serde_json::from_str(&json)?)
}

/// Load the saved record, or a fresh one when there is none yet.
pub fn resume_saved_game(dir: &Path) -> Result<SaveData, SaveError> {
    if !save_path(dir).exists() {
        return Ok(SaveData::start_new_game());
    }
    load_from_file(dir)
}

pub fn delete_save(dir: &Path) -> Result<(), SaveError> {
    let path = save_path(dir);
    if path.exists() {
        fs::remove_file(&path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("valsrevenge_test_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = temp_dir("roundtrip");
        let data = SaveData {
            level: 3,
            keys: 2,
            treasure: 150,
        };
        save_to_file(&dir, &data).unwrap();
        assert_eq!(load_from_file(&dir).unwrap(), data);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn load_missing_file_fails() {
        let dir = temp_dir("missing");
        assert!(matches!(load_from_file(&dir), Err(SaveError::Io(_))));
    }

    #[test]
    fn resume_without_save_starts_fresh() {
        let dir = temp_dir("resume");
        assert_eq!(resume_saved_game(&dir).unwrap(), SaveData::start_new_game());
    }

    #[test]
    fn corrupt_file_is_a_format_error() {
        let dir = temp_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        fs::write(save_path(&dir), "{\"level\": \"two\"}").unwrap();
        assert!(matches!(load_from_file(&dir), Err(SaveError::Format(_))));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = temp_dir("delete");
        save_to_file(&dir, &SaveData::default()).unwrap();
        delete_save(&dir).unwrap();
        assert!(!save_path(&dir).exists());
        delete_save(&dir).unwrap();
        let _ = fs::remove_dir_all(&dir);
    }
}

//! Session persistence for save/load.
//!
//! Only the session state is serialized; the sector graph is considered
//! static and is rebuilt fresh from its fixed definitions on load. Saves
//! are versioned, human-readable JSON with a metadata block that can be
//! inspected without loading the full state.

use crate::world::SessionState;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Current save file version.
const SAVE_VERSION: u32 = 1;

/// A saved investigation with everything needed to resume play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedGame {
    /// Save format version for compatibility checking.
    pub version: u32,

    /// When the save was created (unix seconds, as a string).
    pub saved_at: String,

    /// The complete session state.
    pub state: SessionState,

    /// Quick-access metadata about the save.
    pub metadata: SaveMetadata,
}

/// Metadata about a save file, for listings and load menus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMetadata {
    /// Sector the player was in when saving.
    pub current_sector: String,

    /// Memory integrity percentage at save time.
    pub integrity_percent: f64,

    /// Number of discovered clues.
    pub clues_found: usize,

    /// Number of sectors in the unlocked set.
    pub sectors_unlocked: usize,

    /// Accumulated play time in seconds.
    pub play_time_seconds: u64,

    /// When the save was created (duplicated from parent for peek access).
    #[serde(default)]
    pub saved_at: String,
}

impl SavedGame {
    /// Wrap session state for saving.
    pub fn new(state: SessionState) -> Self {
        let saved_at = timestamp_now();
        let metadata = SaveMetadata {
            current_sector: state.current_sector().to_string(),
            integrity_percent: state.integrity() * 100.0,
            clues_found: state.discovered_clues().len(),
            sectors_unlocked: state.unlocked_sectors().len(),
            play_time_seconds: state.play_time_seconds(),
            saved_at: saved_at.clone(),
        };

        Self {
            version: SAVE_VERSION,
            saved_at,
            state,
            metadata,
        }
    }

    /// Save to a JSON file.
    pub async fn save_json(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).await?;
        Ok(())
    }

    /// Load from a JSON file.
    pub async fn load_json(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let content = fs::read_to_string(path).await?;
        let saved: Self = serde_json::from_str(&content)?;

        if saved.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: saved.version,
            });
        }

        Ok(saved)
    }

    /// Read a save file's metadata without deserializing the full state.
    pub async fn peek_metadata(path: impl AsRef<Path>) -> Result<SaveMetadata, PersistError> {
        let content = fs::read_to_string(path).await?;

        #[derive(Deserialize)]
        struct Partial {
            version: u32,
            metadata: SaveMetadata,
        }

        let partial: Partial = serde_json::from_str(&content)?;

        if partial.version != SAVE_VERSION {
            return Err(PersistError::VersionMismatch {
                expected: SAVE_VERSION,
                found: partial.version,
            });
        }

        Ok(partial.metadata)
    }
}

/// Information about a save file.
#[derive(Debug, Clone)]
pub struct SaveInfo {
    /// Path to the save file.
    pub path: String,

    /// Save metadata.
    pub metadata: SaveMetadata,
}

/// List all save files in a directory. Creates the directory if missing.
pub async fn list_saves(dir: impl AsRef<Path>) -> Result<Vec<SaveInfo>, PersistError> {
    let mut saves = Vec::new();

    let dir_path = dir.as_ref();
    if !dir_path.exists() {
        fs::create_dir_all(dir_path).await?;
        return Ok(saves);
    }

    let mut entries = fs::read_dir(dir_path).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            if let Ok(metadata) = SavedGame::peek_metadata(&path).await {
                saves.push(SaveInfo {
                    path: path.to_string_lossy().to_string(),
                    metadata,
                });
            }
        }
    }

    saves.sort_by(|a, b| b.metadata.saved_at.cmp(&a.metadata.saved_at));
    Ok(saves)
}

/// Generate a save path from a player-supplied name.
pub fn save_path(dir: impl AsRef<Path>, name: &str) -> std::path::PathBuf {
    let sanitized = name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect::<String>();
    dir.as_ref().join(format!("{sanitized}.json"))
}

/// Current timestamp as unix seconds. Lexicographic order matches
/// chronological order, which `list_saves` relies on.
fn timestamp_now() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}", now.as_secs())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_game_metadata() {
        let mut state = SessionState::new("BOOT_SECTOR");
        state.record_clue("sabotage_detected");

        let saved = SavedGame::new(state);
        assert_eq!(saved.version, SAVE_VERSION);
        assert_eq!(saved.metadata.current_sector, "BOOT_SECTOR");
        assert_eq!(saved.metadata.clues_found, 1);
        assert_eq!(saved.metadata.sectors_unlocked, 1);
    }

    #[test]
    fn test_save_path_sanitizes_name() {
        let path = save_path("/saves", "dr. chen's notes!");
        let s = path.to_string_lossy();
        assert!(s.contains("dr__chen_s_notes_"));
        assert!(s.ends_with(".json"));
    }

    #[tokio::test]
    async fn test_save_and_load_round_trip() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("autosave.json");

        let mut state = SessionState::new("BOOT_SECTOR");
        state.record_clue("chen_shutdown");
        state.set_flag("intro_seen", true);

        SavedGame::new(state)
            .save_json(&path)
            .await
            .expect("Save should succeed");

        let loaded = SavedGame::load_json(&path)
            .await
            .expect("Load should succeed");
        assert_eq!(loaded.state.current_sector(), "BOOT_SECTOR");
        assert_eq!(loaded.state.discovered_clues(), ["chen_shutdown"]);
        assert!(loaded.state.flag("intro_seen"));
    }

    #[tokio::test]
    async fn test_peek_metadata() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("peek.json");

        let state = SessionState::new("SECURITY_LOGS");
        SavedGame::new(state)
            .save_json(&path)
            .await
            .expect("Save should succeed");

        let metadata = SavedGame::peek_metadata(&path)
            .await
            .expect("Peek should succeed");
        assert_eq!(metadata.current_sector, "SECURITY_LOGS");
    }

    #[tokio::test]
    async fn test_version_mismatch_rejected() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("future.json");

        let mut saved = SavedGame::new(SessionState::new("BOOT_SECTOR"));
        saved.version = SAVE_VERSION + 1;
        let content = serde_json::to_string_pretty(&saved).unwrap();
        tokio::fs::write(&path, content).await.unwrap();

        let err = SavedGame::load_json(&path).await.unwrap_err();
        assert!(matches!(err, PersistError::VersionMismatch { .. }));
    }

    #[tokio::test]
    async fn test_list_saves_empty_dir_created() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let dir = temp_dir.path().join("saves");

        let saves = list_saves(&dir).await.expect("List should succeed");
        assert!(saves.is_empty());
        assert!(dir.exists());
    }

    #[tokio::test]
    async fn test_list_saves_finds_files() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for name in ["one", "two"] {
            let state = SessionState::new("BOOT_SECTOR");
            SavedGame::new(state)
                .save_json(save_path(temp_dir.path(), name))
                .await
                .expect("Save should succeed");
        }

        let saves = list_saves(temp_dir.path()).await.expect("List should succeed");
        assert_eq!(saves.len(), 2);
    }
}

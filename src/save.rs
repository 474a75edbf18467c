//! Save slots for exploration progress.
//!
//! Only the world seed, view range and conquered coordinates are written.
//! Tiles are regenerated from the seed on load, so a snapshot stays small no
//! matter how much of the map has been seen.
//!
//! Slots are JSON files stored flat in one directory: `{base_dir}/{slot}.json`

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::hex::AxialCoord;

/// Format version for forward compatibility
pub const SAVE_VERSION: u32 = 1;

const SLOT_EXTENSION: &str = "json";

/// One persisted tile
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TileSaveData {
    pub coordinate: AxialCoord,
    pub conquered: bool,
}

/// Everything needed to rebuild exploration state
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SaveSnapshot {
    pub version: u32,
    pub seed: i32,
    pub view_range: i32,
    pub slot_name: String,
    /// RFC 3339 timestamp of the save
    pub last_save_time: String,

    pub conquered_tiles: Vec<TileSaveData>,

    // Derived counters, recomputed on every save
    pub total_tiles_explored: usize,
    pub total_megagons_defeated: usize,
}

impl SaveSnapshot {
    /// Snapshot stamped with the current time
    pub fn new(slot_name: &str, seed: i32, view_range: i32) -> Self {
        Self {
            version: SAVE_VERSION,
            seed,
            view_range,
            slot_name: slot_name.to_string(),
            last_save_time: chrono::Utc::now().to_rfc3339(),
            conquered_tiles: Vec::new(),
            total_tiles_explored: 0,
            total_megagons_defeated: 0,
        }
    }

    pub fn conquered_coordinates(&self) -> impl Iterator<Item = AxialCoord> + '_ {
        self.conquered_tiles
            .iter()
            .filter(|t| t.conquered)
            .map(|t| t.coordinate)
    }

    /// Save time in local time, for display
    pub fn saved_at_local(&self) -> Option<chrono::DateTime<chrono::Local>> {
        chrono::DateTime::parse_from_rfc3339(&self.last_save_time)
            .ok()
            .map(|t| t.with_timezone(&chrono::Local))
    }
}

/// Directory of save slots
pub struct SaveStore {
    base_dir: PathBuf,
}

impl SaveStore {
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn slot_path(&self, slot: &str) -> Result<PathBuf, SaveError> {
        validate_slot_name(slot)?;
        Ok(self.base_dir.join(format!("{}.{}", slot, SLOT_EXTENSION)))
    }

    pub fn exists(&self, slot: &str) -> bool {
        self.slot_path(slot).map(|p| p.exists()).unwrap_or(false)
    }

    /// Write a snapshot, replacing any existing slot of the same name.
    pub fn save(&self, snapshot: &SaveSnapshot) -> Result<(), SaveError> {
        let path = self.slot_path(&snapshot.slot_name)?;
        fs::create_dir_all(&self.base_dir)?;

        let file = File::create(&path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, snapshot).map_err(|e| SaveError::Serialization(e.to_string()))?;

        Ok(())
    }

    /// Read a snapshot. Returns `None` if the slot doesn't exist.
    pub fn load(&self, slot: &str) -> Result<Option<SaveSnapshot>, SaveError> {
        let path = self.slot_path(slot)?;
        if !path.exists() {
            return Ok(None);
        }

        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let snapshot: SaveSnapshot =
            serde_json::from_reader(reader).map_err(|e| SaveError::Deserialization(e.to_string()))?;

        if snapshot.version > SAVE_VERSION {
            return Err(SaveError::UnsupportedVersion(snapshot.version));
        }

        Ok(Some(snapshot))
    }

    /// Remove a slot. Returns whether a file was deleted.
    pub fn delete(&self, slot: &str) -> Result<bool, SaveError> {
        let path = self.slot_path(slot)?;
        if path.exists() {
            fs::remove_file(path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Names of all slots, sorted
    pub fn list_slots(&self) -> Result<Vec<String>, SaveError> {
        if !self.base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut slots = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(SLOT_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if validate_slot_name(stem).is_ok() {
                    slots.push(stem.to_string());
                }
            }
        }

        slots.sort();
        Ok(slots)
    }
}

fn validate_slot_name(slot: &str) -> Result<(), SaveError> {
    let invalid = slot.is_empty()
        || slot == "."
        || slot == ".."
        || slot.chars().any(|c| c == '/' || c == '\\' || c.is_control());
    if invalid {
        Err(SaveError::InvalidSlotName(slot.to_string()))
    } else {
        Ok(())
    }
}

/// Errors that can occur while reading or writing save slots
#[derive(Debug)]
pub enum SaveError {
    /// IO error (permissions, disk full, etc.)
    Io(std::io::Error),
    Serialization(String),
    /// Corrupted or hand-edited file
    Deserialization(String),
    /// Written by a newer version of the format
    UnsupportedVersion(u32),
    InvalidSlotName(String),
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::Io(e) => write!(f, "IO error: {}", e),
            SaveError::Serialization(e) => write!(f, "Serialization error: {}", e),
            SaveError::Deserialization(e) => write!(f, "Deserialization error: {}", e),
            SaveError::UnsupportedVersion(v) => write!(
                f,
                "Save file version {} is newer than supported version {}",
                v, SAVE_VERSION
            ),
            SaveError::InvalidSlotName(name) => write!(f, "Invalid save slot name: {:?}", name),
        }
    }
}

impl std::error::Error for SaveError {}

impl From<std::io::Error> for SaveError {
    fn from(e: std::io::Error) -> Self {
        SaveError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_snapshot(slot: &str) -> SaveSnapshot {
        let mut snapshot = SaveSnapshot::new(slot, 12345, 2);
        snapshot.conquered_tiles = vec![
            TileSaveData {
                coordinate: AxialCoord::new(0, 0),
                conquered: true,
            },
            TileSaveData {
                coordinate: AxialCoord::new(1, -1),
                conquered: true,
            },
        ];
        snapshot.total_tiles_explored = 2;
        snapshot
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let store = SaveStore::new(dir.path());

        let snapshot = make_snapshot("slot1");
        store.save(&snapshot).unwrap();

        assert!(store.exists("slot1"));
        assert!(!store.exists("slot2"));

        let loaded = store.load("slot1").unwrap().unwrap();
        assert_eq!(loaded, snapshot);
        assert_eq!(loaded.conquered_coordinates().count(), 2);
        assert!(loaded.saved_at_local().is_some());
    }

    #[test]
    fn test_load_nonexistent() {
        let dir = tempdir().unwrap();
        let store = SaveStore::new(dir.path().join("missing"));
        assert!(store.load("nope").unwrap().is_none());
        assert!(store.list_slots().unwrap().is_empty());
    }

    #[test]
    fn test_list_and_delete() {
        let dir = tempdir().unwrap();
        let store = SaveStore::new(dir.path());

        store.save(&make_snapshot("b")).unwrap();
        store.save(&make_snapshot("a")).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(store.list_slots().unwrap(), vec!["a".to_string(), "b".to_string()]);

        assert!(store.delete("a").unwrap());
        assert!(!store.delete("a").unwrap());
        assert_eq!(store.list_slots().unwrap(), vec!["b".to_string()]);
    }

    #[test]
    fn test_rejects_path_like_slot_names() {
        let dir = tempdir().unwrap();
        let store = SaveStore::new(dir.path());

        let err = store.save(&make_snapshot("../escape")).unwrap_err();
        assert!(matches!(err, SaveError::InvalidSlotName(_)));
        assert!(!store.exists(""));
    }

    #[test]
    fn test_newer_version_rejected() {
        let dir = tempdir().unwrap();
        let store = SaveStore::new(dir.path());

        let mut snapshot = make_snapshot("future");
        snapshot.version = SAVE_VERSION + 1;
        store.save(&snapshot).unwrap();

        let err = store.load("future").unwrap_err();
        assert!(matches!(err, SaveError::UnsupportedVersion(v) if v == SAVE_VERSION + 1));
    }

    #[test]
    fn test_corrupted_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{ \"seed\": ").unwrap();

        let store = SaveStore::new(dir.path());
        let err = store.load("broken").unwrap_err();
        assert!(matches!(err, SaveError::Deserialization(_)));
    }
}

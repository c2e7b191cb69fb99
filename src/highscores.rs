//! Persisted high score
//!
//! A single integer, read once at session start and written at most once
//! at game end. Stored as a small JSON document.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// On-disk record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreRecord {
    pub high_score: u64,
}

/// Durable storage for the high score
pub trait HighScoreStore {
    fn load(&self) -> Result<u64>;
    fn save(&mut self, score: u64) -> Result<()>;

    /// Load, treating any failure as "no prior high score"
    fn load_or_default(&self) -> u64 {
        match self.load() {
            Ok(score) => score,
            Err(e) => {
                log::warn!("High score unavailable ({:#}), starting from 0", e);
                0
            }
        }
    }
}

/// JSON file store
#[derive(Debug, Clone)]
pub struct FileHighScoreStore {
    path: PathBuf,
}

impl FileHighScoreStore {
    /// File name inside the data directory
    const FILE_NAME: &'static str = "highscore.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform data directory
    pub fn in_data_dir() -> Result<Self> {
        let dirs = ProjectDirs::from("", "", "dino-runner")
            .context("could not determine data directory")?;
        Ok(Self::new(dirs.data_dir().join(Self::FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileHighScoreStore {
    fn load(&self) -> Result<u64> {
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("reading {}", self.path.display()))?;
        let record: HighScoreRecord = serde_json::from_str(&json)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        log::info!("Loaded high score {}", record.high_score);
        Ok(record.high_score)
    }

    fn save(&mut self, score: u64) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        let json = serde_json::to_string(&HighScoreRecord { high_score: score })?;
        fs::write(&self.path, json).with_context(|| format!("writing {}", self.path.display()))?;
        log::info!("High score {} saved", score);
        Ok(())
    }
}

/// In-memory store; counts writes
#[derive(Debug, Clone, Default)]
pub struct MemoryHighScoreStore {
    pub value: Option<u64>,
    pub saves: u32,
}

impl MemoryHighScoreStore {
    pub fn with_score(score: u64) -> Self {
        Self {
            value: Some(score),
            saves: 0,
        }
    }
}

impl HighScoreStore for MemoryHighScoreStore {
    fn load(&self) -> Result<u64> {
        self.value.context("no high score stored")
    }

    fn save(&mut self, score: u64) -> Result<()> {
        self.value = Some(score);
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("dino-runner-test-{}-{}", std::process::id(), name))
            .join(FileHighScoreStore::FILE_NAME)
    }

    #[test]
    fn test_file_round_trip() {
        let path = temp_path("roundtrip");
        let mut store = FileHighScoreStore::new(&path);
        store.save(4321).unwrap();
        assert_eq!(FileHighScoreStore::new(&path).load().unwrap(), 4321);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_missing_file_defaults_to_zero() {
        let store = FileHighScoreStore::new(temp_path("missing"));
        assert!(store.load().is_err());
        assert_eq!(store.load_or_default(), 0);
    }

    #[test]
    fn test_corrupt_file_defaults_to_zero() {
        let path = temp_path("corrupt");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json {").unwrap();
        let store = FileHighScoreStore::new(&path);
        assert_eq!(store.load_or_default(), 0);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryHighScoreStore::default();
        assert_eq!(store.load_or_default(), 0);
        store.save(9).unwrap();
        assert_eq!(store.load().unwrap(), 9);
        assert_eq!(store.saves, 1);
    }
}

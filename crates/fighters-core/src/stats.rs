//! Persistent player statistics and the Genius unlock progression.
//!
//! The record is kept in memory and written through a [`StatsStore`] after every match.
//! Any load failure (missing file, unreadable file, malformed JSON) falls back to the
//! defaults; save failures are logged and play continues.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::archetype::Archetype;

/// Cumulative kills (while locked) needed to unlock the Genius class.
pub const GENIUS_UNLOCK_KILLS: u32 = 10;

/// Kill and game counts for one class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassStats {
    pub kills: u32,
    pub games: u32,
}

impl ClassStats {
    pub fn average_kills(&self) -> f32 {
        if self.games == 0 {
            0.0
        } else {
            self.kills as f32 / self.games as f32
        }
    }
}

/// The persisted statistics record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsRecord {
    pub total_kills: u32,
    pub games_played: u32,
    pub best_score: u32,
    pub unlocked_genius: bool,
    pub genius_unlock_progress: u32,
    pub class_stats: BTreeMap<Archetype, ClassStats>,
}

impl Default for StatsRecord {
    fn default() -> Self {
        let class_stats = [
            Archetype::Gunner,
            Archetype::Tank,
            Archetype::Mage,
            Archetype::Genius,
        ]
        .into_iter()
        .map(|a| (a, ClassStats::default()))
        .collect();
        Self {
            total_kills: 0,
            games_played: 0,
            best_score: 0,
            unlocked_genius: false,
            genius_unlock_progress: 0,
            class_stats,
        }
    }
}

impl StatsRecord {
    /// Fold one finished match into the record.
    pub fn apply_match(&mut self, kills: u32, archetype: Archetype) {
        self.total_kills = self.total_kills.saturating_add(kills);
        self.games_played = self.games_played.saturating_add(1);
        self.best_score = self.best_score.max(kills);

        if !self.unlocked_genius {
            self.genius_unlock_progress = self.genius_unlock_progress.saturating_add(kills);
            if self.genius_unlock_progress >= GENIUS_UNLOCK_KILLS {
                self.unlocked_genius = true;
            }
        }

        let entry = self.class_stats.entry(archetype).or_default();
        entry.kills = entry.kills.saturating_add(kills);
        entry.games = entry.games.saturating_add(1);
    }

    /// Genius unlock progress in percent, 100 once unlocked.
    pub fn unlock_progress_percent(&self) -> u8 {
        if self.unlocked_genius {
            return 100;
        }
        let pct = self.genius_unlock_progress.saturating_mul(100) / GENIUS_UNLOCK_KILLS;
        pct.min(100) as u8
    }

    pub fn is_unlocked(&self, archetype: Archetype) -> bool {
        !archetype.requires_unlock() || self.unlocked_genius
    }
}

/// Encode a record as pretty JSON.
pub fn encode_record(record: &StatsRecord) -> Result<String, StatsError> {
    serde_json::to_string_pretty(record).map_err(StatsError::Encode)
}

/// Decode a record from JSON.
pub fn decode_record(contents: &str) -> Result<StatsRecord, StatsError> {
    serde_json::from_str(contents).map_err(StatsError::Parse)
}

/// Failure reading or writing the stats record.
#[derive(Debug)]
pub enum StatsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Encode(serde_json::Error),
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "stats I/O failed: {e}"),
            Self::Parse(e) => write!(f, "stats record is malformed: {e}"),
            Self::Encode(e) => write!(f, "stats record could not be encoded: {e}"),
        }
    }
}

impl std::error::Error for StatsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) | Self::Encode(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for StatsError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Key-value backend the stats record is persisted to.
pub trait StatsStore: Send {
    /// Stored contents, or `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<String>, StatsError>;

    fn save(&mut self, contents: &str) -> Result<(), StatsError>;
}

/// Stores the record as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StatsStore for JsonFileStore {
    fn load(&self) -> Result<Option<String>, StatsError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, contents: &str) -> Result<(), StatsError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

/// In-memory store. Used when persistence is disabled, and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    contents: Option<String>,
    fail_saves: bool,
    saves: u32,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw contents (which may be malformed).
    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: Some(contents.into()),
            ..Self::default()
        }
    }

    /// Store whose saves always fail with an I/O error.
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// Number of successful saves.
    pub fn saves(&self) -> u32 {
        self.saves
    }
}

impl StatsStore for MemoryStore {
    fn load(&self) -> Result<Option<String>, StatsError> {
        Ok(self.contents.clone())
    }

    fn save(&mut self, contents: &str) -> Result<(), StatsError> {
        if self.fail_saves {
            return Err(StatsError::Io(std::io::Error::other("store is read-only")));
        }
        self.contents = Some(contents.to_string());
        self.saves += 1;
        Ok(())
    }
}

/// Stats collaborator seen by the match loop.
pub trait StatsCollaborator {
    /// Fire-and-forget update with the result of a finished match.
    fn record_match(&mut self, kills: u32, archetype: Archetype);

    fn unlock_progress_percent(&self) -> u8;
}

/// Numbers shown on the game-over screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverSummary {
    pub kills: u32,
    pub total_kills: u32,
    pub best_score: u32,
}

/// Owns the in-memory record and writes it through to a store.
#[derive(Debug)]
pub struct StatsTracker<S: StatsStore> {
    record: StatsRecord,
    store: S,
}

impl<S: StatsStore> StatsTracker<S> {
    /// Load the record from `store`, falling back to defaults on any failure.
    pub fn open(store: S) -> Self {
        let record = match store.load() {
            Ok(Some(contents)) => decode_record(&contents).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Discarding unreadable stats record, using defaults");
                StatsRecord::default()
            }),
            Ok(None) => {
                tracing::info!("No stats record found, starting fresh");
                StatsRecord::default()
            },
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load stats, using defaults");
                StatsRecord::default()
            },
        };
        Self { record, store }
    }

    pub fn record(&self) -> &StatsRecord {
        &self.record
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_unlocked(&self, archetype: Archetype) -> bool {
        self.record.is_unlocked(archetype)
    }

    /// Restore defaults and persist them.
    pub fn reset(&mut self) {
        self.record = StatsRecord::default();
        self.persist();
    }

    pub fn summary(&self, kills: u32) -> GameOverSummary {
        GameOverSummary {
            kills,
            total_kills: self.record.total_kills,
            best_score: self.record.best_score,
        }
    }

    /// Write the current record to the store.
    pub fn flush(&mut self) -> Result<(), StatsError> {
        let contents = encode_record(&self.record)?;
        self.store.save(&contents)
    }

    fn persist(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "Failed to save stats, keeping in-memory copy");
        }
    }
}

impl<S: StatsStore> StatsCollaborator for StatsTracker<S> {
    fn record_match(&mut self, kills: u32, archetype: Archetype) {
        self.record.apply_match(kills, archetype);
        tracing::info!(
            kills,
            %archetype,
            total_kills = self.record.total_kills,
            unlocked_genius = self.record.unlocked_genius,
            "Recorded match"
        );
        self.persist();
    }

    fn unlock_progress_percent(&self) -> u8 {
        self.record.unlock_progress_percent()
    }
}

//! Bounded conversation history with optional persistence.
//!
//! The history holds at most [`MAX_HISTORY`] turns (oldest evicted first)
//! and owns the monotonic turn-id counter. Persistence honors the
//! user-controlled retention flag: while the flag is off an empty record is
//! written, and flipping it off clears memory and disk in the same call.

use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::message::{Turn, TurnId};

/// Capacity of the conversation history.
pub const MAX_HISTORY: usize = 10;

#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HistoryError>;

/// On-disk shape of the history record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedHistory {
    pub keep_history: bool,
    pub turns: Vec<Turn>,
}

/// Persistence backend for the history.
///
/// Synchronous by contract: retention changes must hit the backing store
/// before the call returns.
pub trait HistoryStore: Send {
    /// Load the persisted record, `None` when nothing was saved yet.
    fn load(&self) -> Result<Option<PersistedHistory>>;

    /// Save a record, replacing any previous one.
    fn save(&self, record: &PersistedHistory) -> Result<()>;
}

/// JSON-file backed [`HistoryStore`].
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self) -> Result<Option<PersistedHistory>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let record: PersistedHistory = serde_json::from_str(&contents)?;
        Ok(Some(record))
    }

    fn save(&self, record: &PersistedHistory) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(record)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

/// Capacity-limited, ordered collection of conversation turns.
pub struct ChatHistory {
    turns: Vec<Turn>,
    capacity: usize,
    keep_history: bool,
    next_turn_id: TurnId,
    store: Option<Box<dyn HistoryStore>>,
}

impl ChatHistory {
    /// In-memory history with the given capacity and retention off.
    pub fn new(capacity: usize) -> Self {
        Self {
            turns: Vec::new(),
            capacity,
            keep_history: false,
            next_turn_id: 0,
            store: None,
        }
    }

    /// History backed by `store`, restoring any persisted record.
    ///
    /// A record whose retention flag is off yields an empty history; a kept
    /// record is truncated to the most recent `capacity` turns. The id
    /// counter resumes past the largest restored id.
    pub fn with_store(capacity: usize, store: Box<dyn HistoryStore>) -> Result<Self> {
        let mut history = Self::new(capacity);
        if let Some(record) = store.load()? {
            history.keep_history = record.keep_history;
            if record.keep_history {
                let mut turns = record.turns;
                if turns.len() > capacity {
                    turns.drain(..turns.len() - capacity);
                }
                history.next_turn_id = turns.iter().map(|t| t.id + 1).max().unwrap_or(0);
                history.turns = turns;
            }
        }
        history.store = Some(store);
        // A stale kept record from a session that later turned retention off
        // is cleared here rather than lingering on disk.
        history.persist();
        Ok(history)
    }

    /// Next unique turn id. Monotonic for the lifetime of the history;
    /// never reset, not even by [`clear`](Self::clear).
    pub fn next_turn_id(&mut self) -> TurnId {
        let id = self.next_turn_id;
        self.next_turn_id += 1;
        id
    }

    /// Append a turn, evicting the oldest beyond capacity.
    pub fn push(&mut self, turn: Turn) -> &Turn {
        self.turns.push(turn);
        if self.turns.len() > self.capacity {
            let excess = self.turns.len() - self.capacity;
            self.turns.drain(..excess);
        }
        self.persist();
        self.turns.last().expect("just pushed")
    }

    /// Flip the retention flag. Turning it off clears the in-memory turns
    /// and rewrites the persisted record as empty before returning.
    pub fn set_keep_history(&mut self, keep: bool) {
        self.keep_history = keep;
        if !keep {
            self.turns.clear();
        }
        self.persist();
    }

    /// Drop all turns. The id counter keeps its position.
    pub fn clear(&mut self) {
        self.turns.clear();
        self.persist();
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn keep_history(&self) -> bool {
        self.keep_history
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Write the current state through the backend. While retention is off
    /// an empty turn list is written regardless of the in-memory content.
    /// Storage failures are logged, never surfaced to the exchange path.
    fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };
        let record = PersistedHistory {
            keep_history: self.keep_history,
            turns: if self.keep_history {
                self.turns.clone()
            } else {
                Vec::new()
            },
        };
        if let Err(e) = store.save(&record) {
            warn!("Failed to persist chat history: {e}");
        }
    }
}

//! File-backed board store
//!
//! ```text
//! <root>/
//! ├── board.json   # whole board state (tasks + lane counters)
//! └── .lock        # advisory lock serializing writers across processes
//! ```
//!
//! Writers take the lock, re-read `board.json`, apply the change in memory
//! and replace the file through a temp file and rename. Readers skip the
//! lock: the rename guarantees they see either the old or the new board,
//! never a mixture.

use super::{BoardState, BoardStore, ConditionalWrite};
use crate::error::{BoardError, Result};
use crate::types::{Lane, LaneSnapshot, ProjectId, Task, TaskId};
use async_trait::async_trait;
use fs2::FileExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use taskboard_config::StorageConfig;
use tokio::fs;

/// Board store persisted as a single JSON file
#[derive(Debug, Clone)]
pub struct FileBoardStore {
    root: PathBuf,
    lock_timeout: Duration,
    lock_retry: Duration,
}

impl FileBoardStore {
    /// Create a store rooted at `root` with default lock timings
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::from_config(&StorageConfig {
            root: root.into(),
            ..StorageConfig::default()
        })
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self {
            root: config.root.clone(),
            lock_timeout: Duration::from_millis(config.lock_timeout_ms),
            lock_retry: Duration::from_millis(config.lock_retry_ms),
        }
    }

    /// Get the root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to board.json
    pub fn board_path(&self) -> PathBuf {
        self.root.join("board.json")
    }

    /// Path to the lock file
    pub fn lock_path(&self) -> PathBuf {
        self.root.join(".lock")
    }

    /// Read the whole board. A missing file is an empty board.
    pub async fn read_state(&self) -> Result<BoardState> {
        let path = self.board_path();
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BoardState::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Try to acquire the exclusive writer lock (non-blocking)
    pub async fn try_lock(&self) -> Result<FileBoardLock> {
        let lock_path = self.lock_path();

        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&lock_path)?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(FileBoardLock {
                file,
                path: lock_path,
            }),
            Err(_) => Err(BoardError::LockBusy),
        }
    }

    /// Acquire the writer lock, retrying until the configured timeout
    pub async fn lock(&self) -> Result<FileBoardLock> {
        let started = Instant::now();
        loop {
            match self.try_lock().await {
                Err(BoardError::LockBusy) => {
                    let elapsed = started.elapsed();
                    if elapsed >= self.lock_timeout {
                        tracing::warn!(path = %self.lock_path().display(), "board lock timed out");
                        return Err(BoardError::LockTimeout {
                            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
                        });
                    }
                    tokio::time::sleep(self.lock_retry).await;
                }
                other => return other,
            }
        }
    }

    /// Run `change` against the latest state under the writer lock and
    /// persist the result. Nothing is written when `change` fails.
    async fn mutate<T, F>(&self, change: F) -> Result<T>
    where
        T: Send,
        F: FnOnce(&mut BoardState) -> Result<T> + Send,
    {
        let _lock = self.lock().await?;
        let mut state = self.read_state().await?;
        let result = change(&mut state)?;

        let content = serde_json::to_string_pretty(&state)?;
        atomic_write(&self.board_path(), content.as_bytes()).await?;
        Ok(result)
    }
}

/// RAII lock guard - releases on drop
#[derive(Debug)]
pub struct FileBoardLock {
    file: std::fs::File,
    path: PathBuf,
}

impl FileBoardLock {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileBoardLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

#[async_trait]
impl BoardStore for FileBoardStore {
    async fn get_task(&self, id: &TaskId) -> Result<Task> {
        self.read_state().await?.task(id).cloned()
    }

    async fn tasks_in_lane(&self, project: &ProjectId, lane: Lane) -> Result<LaneSnapshot> {
        Ok(self.read_state().await?.lane(project, lane))
    }

    async fn lanes(&self, project: &ProjectId) -> Result<Vec<LaneSnapshot>> {
        let state = self.read_state().await?;
        Ok(Lane::ALL.iter().map(|lane| state.lane(project, *lane)).collect())
    }

    async fn write_if_version_matches(&self, write: &ConditionalWrite) -> Result<Task> {
        self.mutate(|state| state.apply_write(write)).await
    }

    async fn renumber_lane(
        &self,
        project: &ProjectId,
        lane: Lane,
        expected_lane_version: u64,
        assignment: &[(TaskId, f64)],
    ) -> Result<LaneSnapshot> {
        self.mutate(|state| state.apply_renumber(project, lane, expected_lane_version, assignment))
            .await
    }

    async fn insert_task(&self, task: Task, expected_lane_version: u64) -> Result<Task> {
        self.mutate(|state| state.insert(task, expected_lane_version)).await
    }

    async fn remove_task(&self, id: &TaskId, expected_version: u64) -> Result<Task> {
        self.mutate(|state| state.remove(id, expected_version)).await
    }
}

/// Atomic write via temp file and rename
async fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).await?;
    fs::rename(&temp_path, path).await?;

    Ok(())
}

//! Delivery of "task moved" facts to activity and notification collaborators

use crate::error::Result;
use crate::types::TaskMoved;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::broadcast;

/// Receives every committed move. Called after the commit; a failure here
/// is logged and never undoes the move.
#[async_trait]
pub trait MoveEventSink: Send + Sync {
    async fn task_moved(&self, event: &TaskMoved) -> Result<()>;
}

/// Discards events
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

#[async_trait]
impl MoveEventSink for NullSink {
    async fn task_moved(&self, _event: &TaskMoved) -> Result<()> {
        Ok(())
    }
}

/// Fans events out to in-process subscribers
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: broadcast::Sender<TaskMoved>,
}

impl ChannelSink {
    /// Create a sink buffering up to `capacity` events per slow subscriber
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TaskMoved> {
        self.sender.subscribe()
    }
}

#[async_trait]
impl MoveEventSink for ChannelSink {
    async fn task_moved(&self, event: &TaskMoved) -> Result<()> {
        // No subscribers is not an error
        let _ = self.sender.send(event.clone());
        Ok(())
    }
}

/// Append-only JSONL activity file, one event per line
#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read entries, newest first
    pub async fn read(&self, limit: Option<usize>) -> Result<Vec<TaskMoved>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries: Vec<TaskMoved> = content
            .lines()
            .filter(|line| !line.is_empty())
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect();
        entries.reverse();

        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }
}

#[async_trait]
impl MoveEventSink for ActivityLog {
    async fn task_moved(&self, event: &TaskMoved) -> Result<()> {
        let mut line = serde_json::to_string(event)?;
        line.push('\n');

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Lane, ProjectId, TaskId};
    use chrono::Utc;
    use tempfile::TempDir;

    fn event(task: &str, to: Lane) -> TaskMoved {
        TaskMoved {
            task_id: TaskId::from(task),
            project: ProjectId::from("p"),
            from: Lane::Todo,
            to,
            index: 0,
            position: 1000.0,
            version: 2,
            actor: None,
            timestamp: Utc::now(),
            rebalanced: false,
        }
    }

    #[tokio::test]
    async fn test_channel_sink_delivers() {
        let sink = ChannelSink::new(8);
        let mut rx = sink.subscribe();

        sink.task_moved(&event("a", Lane::Completed)).await.unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.task_id, TaskId::from("a"));
        assert!(received.changed_status());
    }

    #[tokio::test]
    async fn test_channel_sink_without_subscribers() {
        let sink = ChannelSink::new(1);
        assert!(sink.task_moved(&event("a", Lane::Todo)).await.is_ok());
    }

    #[tokio::test]
    async fn test_activity_log_newest_first() {
        let temp = TempDir::new().unwrap();
        let log = ActivityLog::new(temp.path().join("activity").join("moves.jsonl"));

        assert!(log.read(None).await.unwrap().is_empty());

        log.task_moved(&event("first", Lane::InProgress)).await.unwrap();
        log.task_moved(&event("second", Lane::InReview)).await.unwrap();

        let entries = log.read(None).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].task_id, TaskId::from("second"));
        assert_eq!(entries[1].task_id, TaskId::from("first"));

        let limited = log.read(Some(1)).await.unwrap();
        assert_eq!(limited.len(), 1);
    }
}

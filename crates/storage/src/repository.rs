use async_trait::async_trait;
use quiz_core::model::ActivityRecord;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted activity record together with its storage-assigned id.
///
/// Ids increase monotonically with insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRow {
    pub id: i64,
    pub record: ActivityRecord,
}

/// Aggregate counts over the activity log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityCounts {
    pub total: u64,
    pub correct: u64,
}

/// Repository contract for the append-only answer log.
///
/// `exam = None` addresses the whole log; `Some(exam)` only the records
/// tagged with that exam.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Append one record and return its assigned id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn append_activity(&self, record: &ActivityRecord) -> Result<i64, StorageError>;

    /// List matching records, most recent first.
    ///
    /// Records with equal timestamps are ordered by id, newest insertion first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read or mapping failures.
    async fn list_activity(&self, exam: Option<&str>) -> Result<Vec<ActivityRow>, StorageError>;

    /// Count matching records and how many of them were answered correctly.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on read failures.
    async fn count_activity(&self, exam: Option<&str>) -> Result<ActivityCounts, StorageError>;

    /// Delete matching records and return how many were removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    async fn delete_activity(&self, exam: Option<&str>) -> Result<u64, StorageError>;
}

fn in_scope(record: &ActivityRecord, exam: Option<&str>) -> bool {
    exam.is_none_or(|exam| record.exam == exam)
}

#[derive(Debug, Default)]
struct ActivityLog {
    next_id: i64,
    rows: Vec<ActivityRow>,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    log: Arc<Mutex<ActivityLog>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActivityRepository for InMemoryRepository {
    async fn append_activity(&self, record: &ActivityRecord) -> Result<i64, StorageError> {
        let mut guard = self
            .log
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.next_id += 1;
        let id = guard.next_id;
        guard.rows.push(ActivityRow {
            id,
            record: record.clone(),
        });
        Ok(id)
    }

    async fn list_activity(&self, exam: Option<&str>) -> Result<Vec<ActivityRow>, StorageError> {
        let guard = self
            .log
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut rows: Vec<ActivityRow> = guard
            .rows
            .iter()
            .filter(|row| in_scope(&row.record, exam))
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.record
                .answered_at
                .cmp(&a.record.answered_at)
                .then(b.id.cmp(&a.id))
        });
        Ok(rows)
    }

    async fn count_activity(&self, exam: Option<&str>) -> Result<ActivityCounts, StorageError> {
        let guard = self
            .log
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut counts = ActivityCounts::default();
        for row in guard.rows.iter().filter(|row| in_scope(&row.record, exam)) {
            counts.total += 1;
            if row.record.is_correct() {
                counts.correct += 1;
            }
        }
        Ok(counts)
    }

    async fn delete_activity(&self, exam: Option<&str>) -> Result<u64, StorageError> {
        let mut guard = self
            .log
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let before = guard.rows.len();
        guard.rows.retain(|row| !in_scope(&row.record, exam));
        Ok((before - guard.rows.len()) as u64)
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub activity: Arc<dyn ActivityRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let activity: Arc<dyn ActivityRepository> = Arc::new(InMemoryRepository::new());
        Self { activity }
    }
}

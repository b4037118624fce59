use std::collections::HashSet;
use std::sync::Arc;

use quiz_core::model::{
    ActivityRecord, DifficultyStats, QuestionId, QuizStats, TaskStats, difficulty_breakdown,
    task_breakdown,
};
use storage::repository::{ActivityRepository, Storage};

/// Fail-soft facade over the activity log.
///
/// Storage failures never reach the caller: they are logged and reads fall
/// back to empty results, writes report that nothing was persisted. Losing
/// one answer must not interrupt a quiz.
#[derive(Clone)]
pub struct ActivityStore {
    repo: Arc<dyn ActivityRepository>,
}

impl ActivityStore {
    #[must_use]
    pub fn new(repo: Arc<dyn ActivityRepository>) -> Self {
        Self { repo }
    }

    #[must_use]
    pub fn from_storage(storage: Storage) -> Self {
        Self::new(storage.activity)
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_storage(Storage::in_memory())
    }

    /// Append one record. Returns the storage id, or `None` if the write failed.
    pub async fn append(&self, record: &ActivityRecord) -> Option<i64> {
        match self.repo.append_activity(record).await {
            Ok(id) => Some(id),
            Err(error) => {
                tracing::warn!(
                    %error,
                    question_id = %record.question_id,
                    exam = %record.exam,
                    "failed to save quiz activity"
                );
                None
            }
        }
    }

    /// Matching records, most recent first. Empty on storage failure.
    pub async fn history(&self, exam: Option<&str>) -> Vec<ActivityRecord> {
        match self.repo.list_activity(exam).await {
            Ok(rows) => rows.into_iter().map(|row| row.record).collect(),
            Err(error) => {
                tracing::warn!(%error, ?exam, "failed to load quiz history");
                Vec::new()
            }
        }
    }

    /// Aggregate accuracy over matching records. Zero on storage failure.
    pub async fn stats(&self, exam: Option<&str>) -> QuizStats {
        match self.repo.count_activity(exam).await {
            Ok(counts) => QuizStats::new(counts.total, counts.correct),
            Err(error) => {
                tracing::warn!(%error, ?exam, "failed to load quiz stats");
                QuizStats::default()
            }
        }
    }

    /// Irreversibly delete matching records (all of them when `exam` is `None`).
    ///
    /// Returns the number of deleted records; 0 on storage failure.
    pub async fn clear(&self, exam: Option<&str>) -> u64 {
        match self.repo.delete_activity(exam).await {
            Ok(deleted) => {
                tracing::info!(deleted, ?exam, "cleared quiz history");
                deleted
            }
            Err(error) => {
                tracing::warn!(%error, ?exam, "failed to clear quiz history");
                0
            }
        }
    }

    /// Ids of every question answered at least once, right or wrong.
    pub async fn seen_question_ids(&self, exam: Option<&str>) -> HashSet<QuestionId> {
        self.history(exam)
            .await
            .into_iter()
            .map(|record| record.question_id)
            .filter(|id| !id.is_unknown())
            .collect()
    }

    pub async fn difficulty_breakdown(&self, exam: Option<&str>) -> Vec<DifficultyStats> {
        difficulty_breakdown(&self.history(exam).await)
    }

    /// Per-task accuracy, weakest task first.
    pub async fn task_breakdown(&self, exam: Option<&str>) -> Vec<TaskStats> {
        task_breakdown(&self.history(exam).await)
    }
}

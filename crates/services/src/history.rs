use std::sync::Arc;

use quiz_core::QuestionBank;
use quiz_core::model::{ActivityRecord, DifficultyStats, Question, QuizStats, TaskStats};
use serde::Serialize;

use crate::activity::ActivityStore;

/// One answered question, joined with its dataset entry when it still exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub record: ActivityRecord,
    pub question: Option<Question>,
}

/// Everything a history screen shows for one exam scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryOverview {
    pub stats: QuizStats,
    pub by_difficulty: Vec<DifficultyStats>,
    /// Weakest task first.
    pub by_task: Vec<TaskStats>,
    /// Most recent first.
    pub entries: Vec<HistoryEntry>,
}

/// Read side of the activity log for review screens.
#[derive(Clone)]
pub struct HistoryService {
    bank: Arc<QuestionBank>,
    store: ActivityStore,
}

impl HistoryService {
    #[must_use]
    pub fn new(bank: Arc<QuestionBank>, store: ActivityStore) -> Self {
        Self { bank, store }
    }

    /// Stats, breakdowns and the latest `limit` entries for `exam`.
    ///
    /// Breakdowns cover the full history; only `entries` is truncated.
    pub async fn overview(&self, exam: Option<&str>, limit: Option<usize>) -> HistoryOverview {
        let (stats, records) = tokio::join!(self.store.stats(exam), self.store.history(exam));

        let by_difficulty = quiz_core::model::difficulty_breakdown(&records);
        let by_task = quiz_core::model::task_breakdown(&records);
        let entries = records
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .map(|record| {
                let question = self.question_detail(&record).cloned();
                HistoryEntry { record, question }
            })
            .collect();

        HistoryOverview {
            stats,
            by_difficulty,
            by_task,
            entries,
        }
    }

    /// The question a record refers to, or `None` if the dataset dropped it.
    #[must_use]
    pub fn question_detail(&self, record: &ActivityRecord) -> Option<&Question> {
        let question = self.bank.resolve(record);
        if question.is_none() {
            tracing::debug!(
                question_id = %record.question_id,
                "question detail unavailable for history entry"
            );
        }
        question
    }

    /// Delete history for `exam`, or everything when `None`.
    pub async fn clear(&self, exam: Option<&str>) -> u64 {
        self.store.clear(exam).await
    }
}

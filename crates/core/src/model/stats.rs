use serde::Serialize;
use std::collections::BTreeMap;

use crate::model::activity::ActivityRecord;
use crate::model::question::Difficulty;

/// Rounds `correct / total * 100` half-up to a whole percent.
///
/// Returns 0 for an empty total.
#[must_use]
pub fn percentage(correct: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total);
    let rounded = (correct * 200 + total) / (total * 2);
    u8::try_from(rounded).unwrap_or(100)
}

/// Running accuracy figures over a set of activity records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QuizStats {
    pub total: u64,
    pub correct: u64,
    pub percentage: u8,
}

impl QuizStats {
    #[must_use]
    pub fn new(total: u64, correct: u64) -> Self {
        Self {
            total,
            correct,
            percentage: percentage(correct, total),
        }
    }

    #[must_use]
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ActivityRecord>) -> Self {
        let (total, correct) = records.into_iter().fold((0_u64, 0_u64), |(t, c), r| {
            (t + 1, c + u64::from(r.is_correct()))
        });
        Self::new(total, correct)
    }

    /// Stats after one more answer, without touching storage.
    #[must_use]
    pub fn with_answer(self, correct: bool) -> Self {
        Self::new(self.total + 1, self.correct + u64::from(correct))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Accuracy for one difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DifficultyStats {
    pub difficulty: Difficulty,
    pub stats: QuizStats,
}

/// Accuracy for one task statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub task_statement: String,
    pub stats: QuizStats,
}

/// Per-difficulty accuracy, always EASY, MEDIUM, HARD in that order.
#[must_use]
pub fn difficulty_breakdown(records: &[ActivityRecord]) -> Vec<DifficultyStats> {
    Difficulty::ALL
        .into_iter()
        .map(|difficulty| DifficultyStats {
            difficulty,
            stats: QuizStats::from_records(records.iter().filter(|r| r.difficulty == difficulty)),
        })
        .collect()
}

/// Per-task accuracy for every task statement present in `records`,
/// weakest first. Equal percentages are ordered by task name.
#[must_use]
pub fn task_breakdown(records: &[ActivityRecord]) -> Vec<TaskStats> {
    let mut grouped: BTreeMap<&str, Vec<&ActivityRecord>> = BTreeMap::new();
    for record in records {
        grouped
            .entry(record.task_statement.as_str())
            .or_default()
            .push(record);
    }

    let mut out: Vec<TaskStats> = grouped
        .into_iter()
        .map(|(task, group)| TaskStats {
            task_statement: task.to_owned(),
            stats: QuizStats::from_records(group),
        })
        .collect();
    // BTreeMap already yields names in order; a stable sort keeps it for ties.
    out.sort_by_key(|t| t.stats.percentage);
    out
}

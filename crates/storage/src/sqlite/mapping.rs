use chrono::{DateTime, SecondsFormat, Utc};
use quiz_core::model::{ActivityRecord, ChoiceKey, Difficulty, QuestionId};
use sqlx::Row;

use crate::repository::{ActivityRow, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Timestamps are stored as fixed-width RFC 3339 UTC strings so that text
/// ordering in `SQLite` matches chronological ordering.
pub(crate) fn timestamp_to_text(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn timestamp_from_text(raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StorageError::Serialization(format!("invalid answered_at {raw:?}: {e}")))
}

pub(crate) fn parse_choice(field: &'static str, raw: &str) -> Result<ChoiceKey, StorageError> {
    raw.parse()
        .map_err(|_| StorageError::Serialization(format!("invalid {field}: {raw}")))
}

pub(crate) fn parse_difficulty(raw: &str) -> Result<Difficulty, StorageError> {
    raw.parse()
        .map_err(|_| StorageError::Serialization(format!("invalid difficulty: {raw}")))
}

pub(crate) fn map_activity_row(row: &sqlx::sqlite::SqliteRow) -> Result<ActivityRow, StorageError> {
    let selected: String = row.try_get("selected_answer").map_err(ser)?;
    let correct: String = row.try_get("correct_answer").map_err(ser)?;
    let difficulty: String = row.try_get("difficulty").map_err(ser)?;
    let answered_at: String = row.try_get("answered_at").map_err(ser)?;

    Ok(ActivityRow {
        id: row.try_get("id").map_err(ser)?,
        record: ActivityRecord {
            question_id: QuestionId::new(row.try_get::<String, _>("question_id").map_err(ser)?),
            exam: row.try_get("exam").map_err(ser)?,
            task_statement: row.try_get("task_statement").map_err(ser)?,
            difficulty: parse_difficulty(&difficulty)?,
            selected_answer: parse_choice("selected_answer", &selected)?,
            correct_answer: parse_choice("correct_answer", &correct)?,
            answered_at: timestamp_from_text(&answered_at)?,
        },
    })
}

use quiz_core::model::ActivityRecord;
use sqlx::Row;

use super::{
    SqliteRepository,
    mapping::{map_activity_row, timestamp_to_text},
};
use crate::repository::{ActivityCounts, ActivityRepository, ActivityRow, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn count_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

/// Appends the optional exam predicate; the exam is always bound as `?1`.
fn scoped_sql(base: &str, exam: Option<&str>, suffix: &str) -> String {
    let mut sql = String::from(base);
    if exam.is_some() {
        sql.push_str(" WHERE exam = ?1");
    }
    sql.push_str(suffix);
    sql
}

#[async_trait::async_trait]
impl ActivityRepository for SqliteRepository {
    async fn append_activity(&self, record: &ActivityRecord) -> Result<i64, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO quiz_activity (
                    question_id, exam, task_statement, difficulty,
                    selected_answer, correct_answer, answered_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(record.question_id.as_str())
        .bind(record.exam.as_str())
        .bind(record.task_statement.as_str())
        .bind(record.difficulty.as_str())
        .bind(record.selected_answer.as_str())
        .bind(record.correct_answer.as_str())
        .bind(timestamp_to_text(record.answered_at))
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(res.last_insert_rowid())
    }

    async fn list_activity(&self, exam: Option<&str>) -> Result<Vec<ActivityRow>, StorageError> {
        let sql = scoped_sql(
            r"
                SELECT
                    id, question_id, exam, task_statement, difficulty,
                    selected_answer, correct_answer, answered_at
                FROM quiz_activity
            ",
            exam,
            " ORDER BY answered_at DESC, id DESC",
        );

        let mut query = sqlx::query(&sql);
        if let Some(exam) = exam {
            query = query.bind(exam);
        }

        let rows = query.fetch_all(&self.pool).await.map_err(conn)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_activity_row(&row)?);
        }
        Ok(out)
    }

    async fn count_activity(&self, exam: Option<&str>) -> Result<ActivityCounts, StorageError> {
        let sql = scoped_sql(
            r"
                SELECT
                    COUNT(*) AS total,
                    COALESCE(SUM(selected_answer = correct_answer), 0) AS correct
                FROM quiz_activity
            ",
            exam,
            "",
        );

        let mut query = sqlx::query(&sql);
        if let Some(exam) = exam {
            query = query.bind(exam);
        }

        let row = query.fetch_one(&self.pool).await.map_err(conn)?;
        Ok(ActivityCounts {
            total: count_u64("total", row.try_get("total").map_err(ser)?)?,
            correct: count_u64("correct", row.try_get("correct").map_err(ser)?)?,
        })
    }

    async fn delete_activity(&self, exam: Option<&str>) -> Result<u64, StorageError> {
        let sql = scoped_sql("DELETE FROM quiz_activity", exam, "");

        let mut query = sqlx::query(&sql);
        if let Some(exam) = exam {
            query = query.bind(exam);
        }

        let res = query.execute(&self.pool).await.map_err(conn)?;
        Ok(res.rows_affected())
    }
}

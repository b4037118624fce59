use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::model::ids::QuestionId;
use crate::model::question::{ChoiceKey, Difficulty, Question};

/// Record of a single submitted answer.
///
/// `question_id` is a weak reference: the dataset may change between
/// releases, so it is not guaranteed to resolve to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub question_id: QuestionId,
    pub exam: String,
    pub task_statement: String,
    pub difficulty: Difficulty,
    pub selected_answer: ChoiceKey,
    pub correct_answer: ChoiceKey,
    pub answered_at: DateTime<Utc>,
}

impl ActivityRecord {
    /// Builds the record for answering `question` with `selected`.
    ///
    /// `exam` falls back to the question's own exam tag when `None`.
    /// `answered_at` is truncated to milliseconds, the precision storage keeps.
    #[must_use]
    pub fn for_answer(
        question: &Question,
        exam: Option<&str>,
        selected: ChoiceKey,
        answered_at: DateTime<Utc>,
    ) -> Self {
        let exam = question.exam().or(exam).unwrap_or_default().to_owned();
        Self {
            question_id: question.id().cloned().unwrap_or_else(QuestionId::unknown),
            exam,
            task_statement: question.task_statement().to_owned(),
            difficulty: question.difficulty(),
            selected_answer: selected,
            correct_answer: question.correct(),
            answered_at: answered_at.trunc_subsecs(3),
        }
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.selected_answer == self.correct_answer
    }

    /// Timestamp as an ISO-8601 string with millisecond precision.
    #[must_use]
    pub fn timestamp(&self) -> String {
        self.answered_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AnswerChoices;
    use crate::time::fixed_now;

    fn question() -> Question {
        Question::new(
            "Task 2.1",
            "stem",
            AnswerChoices::new("a", "b", "c", "d"),
            ChoiceKey::C,
            Difficulty::Hard,
        )
    }

    #[test]
    fn record_copies_question_metadata() {
        let q = question().with_id(QuestionId::new("q-9")).with_exam("SAA-C03");
        let record = ActivityRecord::for_answer(&q, None, ChoiceKey::C, fixed_now());

        assert_eq!(record.question_id, QuestionId::new("q-9"));
        assert_eq!(record.exam, "SAA-C03");
        assert_eq!(record.task_statement, "Task 2.1");
        assert_eq!(record.difficulty, Difficulty::Hard);
        assert!(record.is_correct());
    }

    #[test]
    fn missing_id_uses_unknown_sentinel_and_fallback_exam() {
        let record =
            ActivityRecord::for_answer(&question(), Some("AIF-C01"), ChoiceKey::A, fixed_now());
        assert!(record.question_id.is_unknown());
        assert_eq!(record.exam, "AIF-C01");
        assert!(!record.is_correct());
    }

    #[test]
    fn timestamp_is_iso_8601() {
        let record = ActivityRecord::for_answer(&question(), None, ChoiceKey::A, fixed_now());
        assert_eq!(record.timestamp(), "2023-11-14T22:13:20.000Z");
        assert_eq!(record.exam, "");
    }

    #[test]
    fn answered_at_keeps_millisecond_precision() {
        let at = fixed_now() + chrono::Duration::nanoseconds(123_456_789);
        let record = ActivityRecord::for_answer(&question(), None, ChoiceKey::A, at);
        assert_eq!(record.answered_at, fixed_now() + chrono::Duration::milliseconds(123));
        assert_eq!(record.timestamp(), "2023-11-14T22:13:20.123Z");
    }
}

use quiz_core::QuestionFilter;
use quiz_core::model::Difficulty;

/// Whether a quiz draws from every matching question or only unanswered ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuestionType {
    #[default]
    All,
    Unseen,
}

/// Criteria a quiz session builds its working set from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizFilter {
    pub exam: Option<String>,
    pub task_statement: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub question_type: QuestionType,
    /// Upper bound on the working set size, applied after shuffling.
    pub limit: Option<usize>,
}

impl QuizFilter {
    #[must_use]
    pub fn for_exam(exam: impl Into<String>) -> Self {
        Self {
            exam: Some(exam.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task_statement = Some(task.into());
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    #[must_use]
    pub fn unseen_only(mut self) -> Self {
        self.question_type = QuestionType::Unseen;
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn question_filter(&self) -> QuestionFilter {
        QuestionFilter {
            exam: self.exam.clone(),
            task_statement: self.task_statement.clone(),
            difficulty: self.difficulty,
        }
    }
}

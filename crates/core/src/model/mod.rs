mod activity;
mod ids;
mod question;
mod stats;

pub use ids::{ParseIdError, QuestionId};

pub use activity::ActivityRecord;
pub use question::{
    AnswerChoices, ChoiceKey, Difficulty, ParseChoiceError, ParseDifficultyError, Question,
};
pub use stats::{
    DifficultyStats, QuizStats, TaskStats, difficulty_breakdown, percentage, task_breakdown,
};

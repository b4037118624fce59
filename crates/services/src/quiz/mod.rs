mod filter;
mod plan;
mod progress;
mod session;

// Public API of the quiz subsystem.
pub use crate::error::QuizError;
pub use filter::{QuestionType, QuizFilter};
pub use progress::{QuizProgress, SessionFlags};
pub use session::{QuizPhase, QuizSession, SubmissionOutcome};

#![forbid(unsafe_code)]

pub mod activity;
pub mod app_services;
pub mod error;
pub mod history;
pub mod quiz;

pub use quiz_core::Clock;

pub use activity::ActivityStore;
pub use app_services::AppServices;
pub use error::{AppServicesError, QuizError};
pub use history::{HistoryEntry, HistoryOverview, HistoryService};
pub use quiz::{
    QuestionType, QuizFilter, QuizPhase, QuizProgress, QuizSession, SessionFlags,
    SubmissionOutcome,
};

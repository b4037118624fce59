//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::dataset::DatasetError;
use storage::sqlite::SqliteInitError;

/// User-recoverable errors from quiz session actions.
///
/// None of these leave the session in a different state than before the call.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("select an answer before submitting")]
    NoAnswerSelected,
    #[error("this question has already been answered")]
    AlreadySubmitted,
    #[error("submit an answer before moving on")]
    NotSubmitted,
    #[error("there is no current question")]
    NoCurrentQuestion,
    #[error("the quiz is still loading")]
    StillLoading,
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error("question loading task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

//! Loading the static question dataset.
//!
//! The dataset is a JSON array of questions in the shape produced by the
//! question authoring tools: camelCase keys, answers keyed `A`..`D`.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use thiserror::Error;

use crate::bank::QuestionBank;
use crate::model::{Question, QuestionId};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DatasetError {
    #[error("failed to read question dataset: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed question dataset: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate question id in dataset: {0}")]
    DuplicateId(QuestionId),
}

impl QuestionBank {
    /// Parse a bank from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Parse` for malformed JSON or unknown answer keys,
    /// and `DatasetError::DuplicateId` when two questions share an id.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let questions: Vec<Question> = serde_json::from_str(json)?;
        Self::validated(questions)
    }

    /// Parse a bank from any reader yielding JSON.
    ///
    /// # Errors
    ///
    /// See [`QuestionBank::from_json_str`].
    pub fn from_reader(reader: impl Read) -> Result<Self, DatasetError> {
        let questions: Vec<Question> = serde_json::from_reader(reader)?;
        Self::validated(questions)
    }

    /// Read and parse the dataset file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Io` if the file cannot be read, otherwise see
    /// [`QuestionBank::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    fn validated(questions: Vec<Question>) -> Result<Self, DatasetError> {
        let mut ids = HashSet::new();
        for id in questions.iter().filter_map(Question::id) {
            if !ids.insert(id) {
                return Err(DatasetError::DuplicateId(id.clone()));
            }
        }
        Ok(Self::new(questions))
    }
}

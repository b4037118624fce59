use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid answer choice: {0:?} (expected A, B, C or D)")]
pub struct ParseChoiceError(pub String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid difficulty: {0:?} (expected EASY, MEDIUM or HARD)")]
pub struct ParseDifficultyError(pub String);

//
// ─── CHOICE KEY ───────────────────────────────────────────────────────────────
//

/// One of the four fixed answer slots of a multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChoiceKey {
    A,
    B,
    C,
    D,
}

impl ChoiceKey {
    /// All keys in display order.
    pub const ALL: [ChoiceKey; 4] = [ChoiceKey::A, ChoiceKey::B, ChoiceKey::C, ChoiceKey::D];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ChoiceKey::A => "A",
            ChoiceKey::B => "B",
            ChoiceKey::C => "C",
            ChoiceKey::D => "D",
        }
    }
}

impl fmt::Display for ChoiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChoiceKey {
    type Err = ParseChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(ChoiceKey::A),
            "B" => Ok(ChoiceKey::B),
            "C" => Ok(ChoiceKey::C),
            "D" => Ok(ChoiceKey::D),
            _ => Err(ParseChoiceError(s.to_owned())),
        }
    }
}

//
// ─── DIFFICULTY ───────────────────────────────────────────────────────────────
//

/// Difficulty tag attached to each question.
///
/// Datasets that omit the field are treated as `Medium`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EASY" => Ok(Difficulty::Easy),
            "MEDIUM" => Ok(Difficulty::Medium),
            "HARD" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_owned())),
        }
    }
}

//
// ─── ANSWER CHOICES ───────────────────────────────────────────────────────────
//

/// Text of the four answer slots, keyed A through D.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerChoices {
    #[serde(rename = "A")]
    a: String,
    #[serde(rename = "B")]
    b: String,
    #[serde(rename = "C")]
    c: String,
    #[serde(rename = "D")]
    d: String,
}

impl AnswerChoices {
    #[must_use]
    pub fn new(
        a: impl Into<String>,
        b: impl Into<String>,
        c: impl Into<String>,
        d: impl Into<String>,
    ) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            c: c.into(),
            d: d.into(),
        }
    }

    #[must_use]
    pub fn get(&self, key: ChoiceKey) -> &str {
        match key {
            ChoiceKey::A => &self.a,
            ChoiceKey::B => &self.b,
            ChoiceKey::C => &self.c,
            ChoiceKey::D => &self.d,
        }
    }

    /// Iterates the choices in key order.
    pub fn iter(&self) -> impl Iterator<Item = (ChoiceKey, &str)> {
        ChoiceKey::ALL.into_iter().map(|key| (key, self.get(key)))
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// Immutable multiple-choice exam question.
///
/// The serialized shape matches the question dataset (camelCase keys,
/// `answers` keyed `A`..`D`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<QuestionId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exam: Option<String>,
    task_statement: String,
    stem: String,
    answers: AnswerChoices,
    correct: ChoiceKey,
    #[serde(default)]
    difficulty: Difficulty,
    #[serde(default)]
    explanation: String,
}

impl Question {
    #[must_use]
    pub fn new(
        task_statement: impl Into<String>,
        stem: impl Into<String>,
        answers: AnswerChoices,
        correct: ChoiceKey,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            id: None,
            exam: None,
            task_statement: task_statement.into(),
            stem: stem.into(),
            answers,
            correct,
            difficulty,
            explanation: String::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: QuestionId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_exam(mut self, exam: impl Into<String>) -> Self {
        self.exam = Some(exam.into());
        self
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<&QuestionId> {
        self.id.as_ref()
    }

    #[must_use]
    pub fn exam(&self) -> Option<&str> {
        self.exam.as_deref()
    }

    #[must_use]
    pub fn task_statement(&self) -> &str {
        &self.task_statement
    }

    #[must_use]
    pub fn stem(&self) -> &str {
        &self.stem
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerChoices {
        &self.answers
    }

    #[must_use]
    pub fn correct(&self) -> ChoiceKey {
        self.correct
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// Returns true when `selected` is the keyed answer.
    #[must_use]
    pub fn is_correct(&self, selected: ChoiceKey) -> bool {
        selected == self.correct
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

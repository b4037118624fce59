#![forbid(unsafe_code)]

pub mod bank;
pub mod dataset;
pub mod model;
pub mod time;

pub use bank::{ExamSummary, QuestionBank, QuestionCounts, QuestionFilter};
pub use time::Clock;

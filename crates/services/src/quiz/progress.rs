use quiz_core::model::percentage;

/// Position within the working set, useful for progress bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    /// 1-based index of the current question; equals `total` once complete.
    pub position: usize,
    pub total: usize,
    pub percent: u8,
}

impl QuizProgress {
    pub(crate) fn new(cursor: usize, total: usize) -> Self {
        let position = if total == 0 { 0 } else { (cursor + 1).min(total) };
        Self {
            position,
            total,
            percent: percentage(position as u64, total as u64),
        }
    }
}

/// State flags the presentation layer renders from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionFlags {
    pub submitted: bool,
    pub is_correct: bool,
    pub is_last_question: bool,
}

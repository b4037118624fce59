use std::collections::HashSet;

use quiz_core::QuestionBank;
use quiz_core::bank::shuffle;
use quiz_core::model::{Question, QuestionId};
use rand::Rng;

use super::filter::{QuestionType, QuizFilter};

/// Builds the ordered working set for a session.
///
/// Filtering always happens before shuffling; the optional limit is applied
/// last so it picks a random subset. Under [`QuestionType::Unseen`] questions
/// without an id are dropped because their answers cannot be tracked.
pub(crate) fn build_working_set<R: Rng + ?Sized>(
    bank: &QuestionBank,
    filter: &QuizFilter,
    seen: &HashSet<QuestionId>,
    rng: &mut R,
) -> Vec<Question> {
    let mut questions = bank.filter(&filter.question_filter());

    if filter.question_type == QuestionType::Unseen {
        questions.retain(|q| q.id().is_some_and(|id| !seen.contains(id)));
    }

    shuffle(&mut questions, rng);

    if let Some(limit) = filter.limit {
        questions.truncate(limit);
    }
    questions
}

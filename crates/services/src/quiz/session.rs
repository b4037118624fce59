use std::collections::HashSet;
use std::sync::Arc;

use quiz_core::model::{ActivityRecord, AnswerChoices, ChoiceKey, Difficulty, Question, QuizStats};
use quiz_core::{Clock, QuestionBank};
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::filter::{QuestionType, QuizFilter};
use super::plan::build_working_set;
use super::progress::{QuizProgress, SessionFlags};
use crate::activity::ActivityStore;
use crate::error::QuizError;

/// Where a session is in the answer cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Working set not computed yet.
    Loading,
    Ready,
    AnswerSelected,
    Submitted,
    /// Every question in the working set has been answered.
    Complete,
    /// The current filters match nothing. Not an error.
    NoQuestions,
}

/// Result of submitting the selected answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub is_correct: bool,
    pub selected: ChoiceKey,
    pub correct_answer: ChoiceKey,
    pub explanation: String,
    /// Storage id of the saved record; `None` if it could not be persisted.
    pub record_id: Option<i64>,
}

/// Drives one quiz over a shuffled working set.
///
/// Every action is a discrete step gated by [`QuizPhase`]. A rejected action
/// returns a [`QuizError`] and leaves the session untouched.
pub struct QuizSession {
    bank: Arc<QuestionBank>,
    store: ActivityStore,
    clock: Clock,
    rng: StdRng,
    filter: QuizFilter,
    phase: QuizPhase,
    working_set: Vec<Question>,
    cursor: usize,
    selected: Option<ChoiceKey>,
    last_result_correct: bool,
    stats: QuizStats,
    prior_stats: QuizStats,
    final_score: Option<QuizStats>,
}

impl QuizSession {
    #[must_use]
    pub fn new(bank: Arc<QuestionBank>, store: ActivityStore, filter: QuizFilter) -> Self {
        Self {
            bank,
            store,
            clock: Clock::default(),
            rng: StdRng::from_os_rng(),
            filter,
            phase: QuizPhase::Loading,
            working_set: Vec::new(),
            cursor: 0,
            selected: None,
            last_result_correct: false,
            stats: QuizStats::default(),
            prior_stats: QuizStats::default(),
            final_score: None,
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Seeds the shuffle so working set order is reproducible.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Compute the working set for the current filter and leave `Loading`.
    pub async fn load(&mut self) -> QuizPhase {
        self.rebuild().await;
        self.phase
    }

    //
    // ─── FILTERS ───────────────────────────────────────────────────────────────
    //

    /// Replace the filter and rebuild from scratch with a fresh shuffle.
    pub async fn apply_filter(&mut self, filter: QuizFilter) -> QuizPhase {
        self.filter = filter;
        self.load().await
    }

    /// Switching exams also drops the task filter, since task names are exam-scoped.
    pub async fn set_exam(&mut self, exam: Option<String>) -> QuizPhase {
        let filter = QuizFilter {
            exam,
            task_statement: None,
            ..self.filter.clone()
        };
        self.apply_filter(filter).await
    }

    pub async fn set_task(&mut self, task_statement: Option<String>) -> QuizPhase {
        let filter = QuizFilter {
            task_statement,
            ..self.filter.clone()
        };
        self.apply_filter(filter).await
    }

    pub async fn set_difficulty(&mut self, difficulty: Option<Difficulty>) -> QuizPhase {
        let filter = QuizFilter {
            difficulty,
            ..self.filter.clone()
        };
        self.apply_filter(filter).await
    }

    pub async fn set_question_type(&mut self, question_type: QuestionType) -> QuizPhase {
        let filter = QuizFilter {
            question_type,
            ..self.filter.clone()
        };
        self.apply_filter(filter).await
    }

    async fn rebuild(&mut self) {
        let exam = self.filter.exam.clone();
        let (stats, seen) = match self.filter.question_type {
            QuestionType::All => (self.store.stats(exam.as_deref()).await, HashSet::new()),
            QuestionType::Unseen => tokio::join!(
                self.store.stats(exam.as_deref()),
                self.store.seen_question_ids(exam.as_deref())
            ),
        };

        self.working_set = build_working_set(&self.bank, &self.filter, &seen, &mut self.rng);
        self.stats = stats;
        self.prior_stats = stats;
        self.reset_cursor();

        tracing::debug!(
            exam = ?self.filter.exam,
            task = ?self.filter.task_statement,
            difficulty = ?self.filter.difficulty,
            question_type = ?self.filter.question_type,
            questions = self.working_set.len(),
            "built quiz working set"
        );
    }

    fn reset_cursor(&mut self) {
        self.cursor = 0;
        self.selected = None;
        self.last_result_correct = false;
        self.final_score = None;
        self.phase = if self.working_set.is_empty() {
            QuizPhase::NoQuestions
        } else {
            QuizPhase::Ready
        };
    }

    //
    // ─── ACTIONS ───────────────────────────────────────────────────────────────
    //

    /// Choose an answer for the current question. Selecting again overwrites.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::AlreadySubmitted` once the question is answered, and
    /// `QuizError::NoCurrentQuestion` when there is nothing to answer.
    pub fn select_answer(&mut self, choice: ChoiceKey) -> Result<(), QuizError> {
        match self.phase {
            QuizPhase::Loading => Err(QuizError::StillLoading),
            QuizPhase::Complete | QuizPhase::NoQuestions => Err(QuizError::NoCurrentQuestion),
            QuizPhase::Submitted => Err(QuizError::AlreadySubmitted),
            QuizPhase::Ready | QuizPhase::AnswerSelected => {
                self.selected = Some(choice);
                self.phase = QuizPhase::AnswerSelected;
                Ok(())
            }
        }
    }

    /// Grade the selected answer, record it and refresh the running stats.
    ///
    /// A failed write is logged by the store; the outcome still reports the
    /// grade with `record_id: None`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoAnswerSelected` when nothing is selected and
    /// `QuizError::AlreadySubmitted` on a second submission.
    pub async fn submit_answer(&mut self) -> Result<SubmissionOutcome, QuizError> {
        match self.phase {
            QuizPhase::Loading => return Err(QuizError::StillLoading),
            QuizPhase::Complete | QuizPhase::NoQuestions => {
                return Err(QuizError::NoCurrentQuestion);
            }
            QuizPhase::Submitted => return Err(QuizError::AlreadySubmitted),
            QuizPhase::Ready | QuizPhase::AnswerSelected => {}
        }
        let selected = self.selected.ok_or(QuizError::NoAnswerSelected)?;
        let question = self
            .working_set
            .get(self.cursor)
            .ok_or(QuizError::NoCurrentQuestion)?;

        let is_correct = question.is_correct(selected);
        let record = ActivityRecord::for_answer(
            question,
            self.filter.exam.as_deref(),
            selected,
            self.clock.now(),
        );
        let correct_answer = question.correct();
        let explanation = question.explanation().to_owned();

        self.prior_stats = self.stats;
        let record_id = self.store.append(&record).await;
        self.stats = self.store.stats(self.filter.exam.as_deref()).await;
        self.last_result_correct = is_correct;
        self.phase = QuizPhase::Submitted;

        tracing::debug!(
            question_id = %record.question_id,
            is_correct,
            persisted = record_id.is_some(),
            "answer submitted"
        );

        Ok(SubmissionOutcome {
            is_correct,
            selected,
            correct_answer,
            explanation,
            record_id,
        })
    }

    /// Move past a submitted question. Returns the resulting phase.
    ///
    /// On the last question the session becomes `Complete` and the final score
    /// is the stats seen before the last submission plus that answer.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotSubmitted` unless the current question has been
    /// submitted.
    pub fn next_question(&mut self) -> Result<QuizPhase, QuizError> {
        match self.phase {
            QuizPhase::Loading => return Err(QuizError::StillLoading),
            QuizPhase::Complete | QuizPhase::NoQuestions => {
                return Err(QuizError::NoCurrentQuestion);
            }
            QuizPhase::Ready | QuizPhase::AnswerSelected => return Err(QuizError::NotSubmitted),
            QuizPhase::Submitted => {}
        }

        if self.cursor + 1 >= self.working_set.len() {
            let score = self.prior_stats.with_answer(self.last_result_correct);
            self.cursor = self.working_set.len();
            self.selected = None;
            self.final_score = Some(score);
            self.phase = QuizPhase::Complete;
            tracing::info!(
                total = score.total,
                correct = score.correct,
                percentage = score.percentage,
                "quiz complete"
            );
        } else {
            self.cursor += 1;
            self.selected = None;
            self.last_result_correct = false;
            self.phase = QuizPhase::Ready;
        }
        Ok(self.phase)
    }

    /// Step back one question, discarding any unsubmitted selection.
    ///
    /// Does nothing on the first question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoCurrentQuestion` outside an active quiz.
    pub fn previous_question(&mut self) -> Result<(), QuizError> {
        match self.phase {
            QuizPhase::Loading => Err(QuizError::StillLoading),
            QuizPhase::Complete | QuizPhase::NoQuestions => Err(QuizError::NoCurrentQuestion),
            QuizPhase::Ready | QuizPhase::AnswerSelected | QuizPhase::Submitted => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.selected = None;
                    self.last_result_correct = false;
                    self.phase = QuizPhase::Ready;
                }
                Ok(())
            }
        }
    }

    /// Start over on the same working set, keeping its order.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::StillLoading` before the first load.
    pub fn restart(&mut self) -> Result<(), QuizError> {
        if self.phase == QuizPhase::Loading {
            return Err(QuizError::StillLoading);
        }
        self.prior_stats = self.stats;
        self.reset_cursor();
        tracing::debug!(questions = self.working_set.len(), "quiz restarted");
        Ok(())
    }

    //
    // ─── VIEW ──────────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn filter(&self) -> &QuizFilter {
        &self.filter
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            QuizPhase::Ready | QuizPhase::AnswerSelected | QuizPhase::Submitted => {
                self.working_set.get(self.cursor)
            }
            QuizPhase::Loading | QuizPhase::Complete | QuizPhase::NoQuestions => None,
        }
    }

    #[must_use]
    pub fn answer_choices(&self) -> Option<&AnswerChoices> {
        self.current_question().map(Question::answers)
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<ChoiceKey> {
        self.selected
    }

    #[must_use]
    pub fn flags(&self) -> SessionFlags {
        let submitted = self.phase == QuizPhase::Submitted;
        SessionFlags {
            submitted,
            is_correct: submitted && self.last_result_correct,
            is_last_question: self.current_question().is_some()
                && self.cursor + 1 == self.working_set.len(),
        }
    }

    /// Running stats for the filtered exam, refreshed after every submission.
    #[must_use]
    pub fn stats(&self) -> QuizStats {
        self.stats
    }

    /// Set once the session reaches `Complete`.
    #[must_use]
    pub fn final_score(&self) -> Option<QuizStats> {
        self.final_score
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress::new(self.cursor, self.working_set.len())
    }

    #[must_use]
    pub fn working_set(&self) -> &[Question] {
        &self.working_set
    }

    /// Task statements for the filter's exam, for populating a task picker.
    #[must_use]
    pub fn available_task_statements(&self) -> Vec<String> {
        self.bank.available_task_statements(self.filter.exam.as_deref())
    }
}

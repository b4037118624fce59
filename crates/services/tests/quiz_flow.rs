use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::QuestionBank;
use quiz_core::model::{
    ActivityRecord, AnswerChoices, ChoiceKey, Difficulty, Question, QuestionId, QuizStats,
};
use quiz_core::time::fixed_clock;
use services::{
    ActivityStore, AppServices, QuestionType, QuizError, QuizFilter, QuizPhase, QuizSession,
};
use storage::repository::{ActivityCounts, ActivityRepository, ActivityRow, StorageError};

fn question(id: &str, exam: &str, difficulty: Difficulty, correct: ChoiceKey) -> Question {
    Question::new(
        format!("Task {}", difficulty.as_str()),
        format!("Question {id}?"),
        AnswerChoices::new("first", "second", "third", "fourth"),
        correct,
        difficulty,
    )
    .with_id(QuestionId::new(id))
    .with_exam(exam)
}

fn exam_a_bank() -> Arc<QuestionBank> {
    Arc::new(QuestionBank::new(vec![
        question("a-easy", "A", Difficulty::Easy, ChoiceKey::A),
        question("a-medium", "A", Difficulty::Medium, ChoiceKey::B),
        question("a-hard", "A", Difficulty::Hard, ChoiceKey::C),
        question("b-easy", "B", Difficulty::Easy, ChoiceKey::D),
    ]))
}

fn services(bank: Arc<QuestionBank>, store: ActivityStore) -> AppServices {
    AppServices::from_parts(bank, store, fixed_clock())
}

fn wrong(key: ChoiceKey) -> ChoiceKey {
    if key == ChoiceKey::A { ChoiceKey::B } else { ChoiceKey::A }
}

async fn answer_current(quiz: &mut QuizSession, correctly: bool) -> bool {
    let key = quiz.current_question().expect("current question").correct();
    let choice = if correctly { key } else { wrong(key) };
    quiz.select_answer(choice).expect("select");
    quiz.submit_answer().await.expect("submit").is_correct
}

#[tokio::test]
async fn medium_question_for_exam_a_scores_correct_answer() {
    let app = services(exam_a_bank(), ActivityStore::in_memory());
    let mut quiz = app
        .quiz_session(QuizFilter::for_exam("A").with_difficulty(Difficulty::Medium))
        .with_seed(1);

    assert_eq!(quiz.load().await, QuizPhase::Ready);
    assert_eq!(quiz.working_set().len(), 1);
    assert!(answer_current(&mut quiz, true).await);
    assert_eq!(app.activity().stats(Some("A")).await, QuizStats::new(1, 1));
    assert_eq!(quiz.stats().percentage, 100);
}

#[tokio::test]
async fn medium_question_for_exam_a_scores_incorrect_answer() {
    let app = services(exam_a_bank(), ActivityStore::in_memory());
    let mut quiz = app
        .quiz_session(QuizFilter::for_exam("A").with_difficulty(Difficulty::Medium))
        .with_seed(1);
    quiz.load().await;

    assert!(!answer_current(&mut quiz, false).await);
    let stats = app.activity().stats(Some("A")).await;
    assert_eq!((stats.total, stats.correct, stats.percentage), (1, 0, 0));
}

#[tokio::test]
async fn completing_two_questions_reports_final_score() {
    let app = services(exam_a_bank(), ActivityStore::in_memory());

    // One earlier wrong answer for exam A.
    let mut warmup = app
        .quiz_session(QuizFilter::for_exam("A").with_difficulty(Difficulty::Hard))
        .with_seed(2);
    warmup.load().await;
    answer_current(&mut warmup, false).await;

    let mut quiz = app
        .quiz_session(QuizFilter::for_exam("A").with_limit(2))
        .with_seed(3);
    quiz.load().await;
    assert_eq!(quiz.working_set().len(), 2);

    answer_current(&mut quiz, true).await;
    assert_eq!(quiz.next_question(), Ok(QuizPhase::Ready));
    assert!(quiz.flags().is_last_question);
    answer_current(&mut quiz, true).await;
    assert_eq!(quiz.next_question(), Ok(QuizPhase::Complete));

    // prior: 2 total, 1 correct; plus one more correct.
    assert_eq!(quiz.final_score(), Some(QuizStats::new(3, 2)));
    assert_eq!(quiz.final_score().map(|s| s.percentage), Some(67));
    assert!(quiz.current_question().is_none());
    assert_eq!(quiz.next_question(), Err(QuizError::NoCurrentQuestion));
}

#[tokio::test]
async fn unseen_filter_excludes_answered_questions() {
    let app = services(exam_a_bank(), ActivityStore::in_memory());
    let mut quiz = app.quiz_session(QuizFilter::for_exam("A")).with_seed(4);
    quiz.load().await;

    let answered = quiz
        .current_question()
        .and_then(|q| q.id().cloned())
        .expect("question id");
    answer_current(&mut quiz, false).await;

    assert_eq!(quiz.set_question_type(QuestionType::Unseen).await, QuizPhase::Ready);
    assert_eq!(quiz.working_set().len(), 2);
    assert!(quiz.working_set().iter().all(|q| q.id() != Some(&answered)));
}

#[tokio::test]
async fn unseen_filter_reports_no_questions_when_exhausted() {
    let app = services(exam_a_bank(), ActivityStore::in_memory());
    let mut quiz = app.quiz_session(QuizFilter::for_exam("B")).with_seed(5);
    quiz.load().await;
    answer_current(&mut quiz, true).await;

    assert_eq!(
        quiz.set_question_type(QuestionType::Unseen).await,
        QuizPhase::NoQuestions
    );
    assert!(quiz.current_question().is_none());
    assert_eq!(quiz.select_answer(ChoiceKey::A), Err(QuizError::NoCurrentQuestion));
    assert_eq!(quiz.progress().total, 0);
}

#[tokio::test]
async fn submitting_without_selection_or_twice_is_rejected() {
    let app = services(exam_a_bank(), ActivityStore::in_memory());
    let mut quiz = app.quiz_session(QuizFilter::for_exam("A")).with_seed(6);
    quiz.load().await;

    assert_eq!(quiz.submit_answer().await, Err(QuizError::NoAnswerSelected));
    assert_eq!(quiz.phase(), QuizPhase::Ready);

    answer_current(&mut quiz, true).await;
    assert_eq!(quiz.submit_answer().await, Err(QuizError::AlreadySubmitted));
    assert_eq!(app.activity().history(None).await.len(), 1);
}

#[tokio::test]
async fn unknown_exam_yields_no_questions() {
    let app = services(exam_a_bank(), ActivityStore::in_memory());
    let mut quiz = app.quiz_session(QuizFilter::for_exam("Z"));
    assert_eq!(quiz.load().await, QuizPhase::NoQuestions);
    assert_eq!(quiz.restart(), Ok(()));
    assert_eq!(quiz.phase(), QuizPhase::NoQuestions);
}

#[tokio::test]
async fn restart_keeps_working_set_order() {
    let app = services(exam_a_bank(), ActivityStore::in_memory());
    let mut quiz = app.quiz_session(QuizFilter::for_exam("A")).with_seed(7);
    quiz.load().await;
    let order = quiz.working_set().to_vec();

    while quiz.phase() != QuizPhase::Complete {
        answer_current(&mut quiz, true).await;
        quiz.next_question().expect("next");
    }
    quiz.restart().expect("restart");

    assert_eq!(quiz.phase(), QuizPhase::Ready);
    assert_eq!(quiz.working_set(), order.as_slice());
    assert_eq!(quiz.current_question(), order.first());
    assert_eq!(quiz.final_score(), None);
}

#[tokio::test]
async fn filter_change_is_a_hard_reset() {
    let app = services(exam_a_bank(), ActivityStore::in_memory());
    let mut quiz = app.quiz_session(QuizFilter::for_exam("A")).with_seed(8);
    quiz.load().await;
    answer_current(&mut quiz, true).await;
    quiz.next_question().expect("next");
    quiz.select_answer(ChoiceKey::C).expect("select");

    assert_eq!(quiz.set_difficulty(Some(Difficulty::Easy)).await, QuizPhase::Ready);
    assert_eq!(quiz.progress().position, 1);
    assert_eq!(quiz.selected_answer(), None);
    assert!(!quiz.flags().submitted);
    assert_eq!(quiz.stats(), QuizStats::new(1, 1));
}

#[tokio::test]
async fn record_carries_question_and_exam_details() {
    let bank = Arc::new(QuestionBank::new(vec![Question::new(
        "Legacy task",
        "No id here",
        AnswerChoices::new("a", "b", "c", "d"),
        ChoiceKey::D,
        Difficulty::Hard,
    )
    .with_exam("Legacy")]));
    let store = ActivityStore::in_memory();
    let app = services(bank, store.clone());
    let mut quiz = app.quiz_session(QuizFilter::for_exam("Legacy"));
    quiz.load().await;
    quiz.select_answer(ChoiceKey::D).expect("select");
    quiz.submit_answer().await.expect("submit");

    let history = store.history(Some("Legacy")).await;
    assert_eq!(history.len(), 1);
    let record = &history[0];
    assert!(record.question_id.is_unknown());
    assert_eq!(record.task_statement, "Legacy task");
    assert_eq!(record.difficulty, Difficulty::Hard);
    assert!(record.is_correct());
}

// ─── STORAGE FAILURE ─────────────────────────────────────────────────────────

struct UnavailableRepository;

#[async_trait]
impl ActivityRepository for UnavailableRepository {
    async fn append_activity(&self, _: &ActivityRecord) -> Result<i64, StorageError> {
        Err(StorageError::Connection("database is locked".into()))
    }

    async fn list_activity(&self, _: Option<&str>) -> Result<Vec<ActivityRow>, StorageError> {
        Err(StorageError::Connection("database is locked".into()))
    }

    async fn count_activity(&self, _: Option<&str>) -> Result<ActivityCounts, StorageError> {
        Err(StorageError::Connection("database is locked".into()))
    }

    async fn delete_activity(&self, _: Option<&str>) -> Result<u64, StorageError> {
        Err(StorageError::Connection("database is locked".into()))
    }
}

#[tokio::test]
async fn quiz_continues_when_storage_is_unavailable() {
    let store = ActivityStore::new(Arc::new(UnavailableRepository));
    let app = services(exam_a_bank(), store);
    let mut quiz = app
        .quiz_session(QuizFilter::for_exam("A").unseen_only().with_limit(2))
        .with_seed(9);

    assert_eq!(quiz.load().await, QuizPhase::Ready);
    assert_eq!(quiz.stats(), QuizStats::default());

    let key = quiz.current_question().expect("question").correct();
    quiz.select_answer(key).expect("select");
    let outcome = quiz.submit_answer().await.expect("submit");
    assert!(outcome.is_correct);
    assert_eq!(outcome.record_id, None);
    assert_eq!(quiz.phase(), QuizPhase::Submitted);

    quiz.next_question().expect("next");
    answer_current(&mut quiz, false).await;
    assert_eq!(quiz.next_question(), Ok(QuizPhase::Complete));
    assert_eq!(quiz.final_score(), Some(QuizStats::new(1, 0)));

    let overview = app.history().overview(Some("A"), None).await;
    assert!(overview.entries.is_empty());
    assert_eq!(app.history().clear(None).await, 0);
}

// ─── BOOTSTRAP ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn bootstrap_loads_bundled_dataset_into_sqlite_backed_services() {
    let questions = concat!(env!("CARGO_MANIFEST_DIR"), "/../../data/questions.json");
    let app = AppServices::bootstrap("sqlite::memory:", questions, fixed_clock())
        .await
        .expect("bootstrap");

    let exams: Vec<_> = app.bank().exams().into_iter().map(|e| e.name).collect();
    assert_eq!(exams, vec!["AIF-C01", "SAA-C03"]);

    let mut quiz = app.quiz_session(QuizFilter::for_exam("AIF-C01")).with_seed(10);
    assert_eq!(quiz.load().await, QuizPhase::Ready);
    let record_id = {
        let key = quiz.current_question().expect("question").correct();
        quiz.select_answer(key).expect("select");
        quiz.submit_answer().await.expect("submit").record_id
    };
    assert!(record_id.is_some());
    assert_eq!(app.activity().stats(Some("AIF-C01")).await, QuizStats::new(1, 1));
}

#[tokio::test]
async fn bootstrap_fails_for_missing_dataset() {
    let result =
        AppServices::bootstrap("sqlite::memory:", "does/not/exist.json", fixed_clock()).await;
    assert!(matches!(result, Err(services::AppServicesError::Dataset(_))));
}

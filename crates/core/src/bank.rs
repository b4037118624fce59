//! Read-only, indexed view over the static question dataset.
//!
//! All queries return owned copies so callers can shuffle and slice freely
//! without touching the bank itself. Unknown exams, tasks or ids produce empty
//! results rather than errors.

use rand::Rng;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::model::{ActivityRecord, Difficulty, Question, QuestionId};

//
// ─── FILTER ────────────────────────────────────────────────────────────────────
//

/// Conjunction of optional equality criteria. `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionFilter {
    pub exam: Option<String>,
    pub task_statement: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl QuestionFilter {
    #[must_use]
    pub fn for_exam(exam: impl Into<String>) -> Self {
        Self {
            exam: Some(exam.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_task(mut self, task: impl Into<String>) -> Self {
        self.task_statement = Some(task.into());
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    #[must_use]
    pub fn matches(&self, question: &Question) -> bool {
        self.exam
            .as_deref()
            .is_none_or(|exam| question.exam() == Some(exam))
            && self
                .task_statement
                .as_deref()
                .is_none_or(|task| question.task_statement() == task)
            && self
                .difficulty
                .is_none_or(|difficulty| question.difficulty() == difficulty)
    }
}

//
// ─── SUMMARIES ─────────────────────────────────────────────────────────────────
//

/// An exam tag present in the dataset together with its question count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamSummary {
    pub name: String,
    pub question_count: usize,
}

/// Question totals broken down by difficulty and task statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuestionCounts {
    pub total: usize,
    pub by_difficulty: BTreeMap<Difficulty, usize>,
    pub by_task: BTreeMap<String, usize>,
}

//
// ─── BANK ──────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    fn scoped<'a>(&'a self, exam: Option<&'a str>) -> impl Iterator<Item = &'a Question> + 'a {
        self.questions
            .iter()
            .filter(move |q| exam.is_none_or(|exam| q.exam() == Some(exam)))
    }

    /// All questions tagged with `exam`, in dataset order.
    #[must_use]
    pub fn by_exam(&self, exam: &str) -> Vec<Question> {
        self.scoped(Some(exam)).cloned().collect()
    }

    #[must_use]
    pub fn by_task_statement(&self, task: &str) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| q.task_statement() == task)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn by_difficulty(&self, difficulty: Difficulty) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| q.difficulty() == difficulty)
            .cloned()
            .collect()
    }

    /// Questions matching every criterion of `filter`, in dataset order.
    #[must_use]
    pub fn filter(&self, filter: &QuestionFilter) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| filter.matches(q))
            .cloned()
            .collect()
    }

    /// Distinct task statements in scope, sorted lexicographically.
    ///
    /// Computed on every call so switching exams never shows stale tasks.
    #[must_use]
    pub fn available_task_statements(&self, exam: Option<&str>) -> Vec<String> {
        self.scoped(exam)
            .map(|q| q.task_statement())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Exams present in the dataset with their question counts, by name.
    ///
    /// Questions without an exam tag are not listed.
    #[must_use]
    pub fn exams(&self) -> Vec<ExamSummary> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for exam in self.questions.iter().filter_map(Question::exam) {
            *counts.entry(exam).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(name, question_count)| ExamSummary {
                name: name.to_owned(),
                question_count,
            })
            .collect()
    }

    #[must_use]
    pub fn question_counts(&self, exam: Option<&str>) -> QuestionCounts {
        let mut counts = QuestionCounts::default();
        for q in self.scoped(exam) {
            counts.total += 1;
            *counts.by_difficulty.entry(q.difficulty()).or_default() += 1;
            *counts
                .by_task
                .entry(q.task_statement().to_owned())
                .or_default() += 1;
        }
        counts
    }

    /// Case-insensitive substring search over stems and task statements.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Question> {
        let needle = query.to_lowercase();
        self.questions
            .iter()
            .filter(|q| {
                q.stem().to_lowercase().contains(&needle)
                    || q.task_statement().to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Up to `count` questions drawn at random from the (optionally exam-scoped) pool.
    ///
    /// When the pool is not larger than `count` it is returned unshuffled.
    pub fn random_questions<R: Rng + ?Sized>(
        &self,
        count: usize,
        exam: Option<&str>,
        rng: &mut R,
    ) -> Vec<Question> {
        let pool: Vec<Question> = self.scoped(exam).cloned().collect();
        if pool.len() <= count {
            return pool;
        }
        let mut shuffled = shuffled(pool, rng);
        shuffled.truncate(count);
        shuffled
    }

    #[must_use]
    pub fn find(&self, id: &QuestionId) -> Option<&Question> {
        if id.is_unknown() {
            return None;
        }
        self.questions.iter().find(|q| q.id() == Some(id))
    }

    /// Resolves the question an activity record refers to.
    ///
    /// Returns `None` when the dataset no longer contains it.
    #[must_use]
    pub fn resolve(&self, record: &ActivityRecord) -> Option<&Question> {
        self.find(&record.question_id)
    }
}

//
// ─── SHUFFLE ───────────────────────────────────────────────────────────────────
//

/// In-place Fisher–Yates shuffle.
///
/// Walks `i` from the last index down to 1 and swaps with a uniform `j` in
/// `0..=i`, so every permutation is equally likely.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Returns a uniformly shuffled copy of `items`.
#[must_use]
pub fn shuffled<T, R: Rng + ?Sized>(mut items: Vec<T>, rng: &mut R) -> Vec<T> {
    shuffle(&mut items, rng);
    items
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerChoices, ChoiceKey};
    use crate::time::fixed_now;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;

    fn q(id: &str, exam: Option<&str>, task: &str, difficulty: Difficulty) -> Question {
        let question = Question::new(
            task,
            format!("Stem for {id}"),
            AnswerChoices::new("a", "b", "c", "d"),
            ChoiceKey::A,
            difficulty,
        )
        .with_id(QuestionId::new(id));
        match exam {
            Some(exam) => question.with_exam(exam),
            None => question,
        }
    }

    fn bank() -> QuestionBank {
        QuestionBank::new(vec![
            q("a1", Some("A"), "Task 2", Difficulty::Easy),
            q("a2", Some("A"), "Task 1", Difficulty::Medium),
            q("a3", Some("A"), "Task 2", Difficulty::Hard),
            q("b1", Some("B"), "Task 9", Difficulty::Medium),
            q("x1", None, "Loose", Difficulty::Easy),
        ])
    }

    fn ids(questions: &[Question]) -> Vec<&str> {
        questions
            .iter()
            .filter_map(|q| q.id().map(QuestionId::as_str))
            .collect()
    }

    #[test]
    fn by_exam_preserves_order_and_ignores_unknown() {
        let bank = bank();
        assert_eq!(ids(&bank.by_exam("A")), vec!["a1", "a2", "a3"]);
        assert!(bank.by_exam("Z").is_empty());
    }

    #[test]
    fn single_field_queries() {
        let bank = bank();
        assert_eq!(ids(&bank.by_task_statement("Task 2")), vec!["a1", "a3"]);
        assert_eq!(ids(&bank.by_difficulty(Difficulty::Medium)), vec!["a2", "b1"]);
        assert!(bank.by_task_statement("nope").is_empty());
    }

    #[test]
    fn filter_matches_iff_every_criterion_matches() {
        let bank = bank();
        let filters = [
            QuestionFilter::default(),
            QuestionFilter::for_exam("A"),
            QuestionFilter::for_exam("A").with_task("Task 2"),
            QuestionFilter::for_exam("A").with_difficulty(Difficulty::Medium),
            QuestionFilter::default().with_difficulty(Difficulty::Easy),
            QuestionFilter::for_exam("B").with_task("Task 2"),
        ];
        for filter in &filters {
            let result = bank.filter(filter);
            for question in bank.questions() {
                let expected = filter.exam.as_deref().is_none_or(|e| question.exam() == Some(e))
                    && filter
                        .task_statement
                        .as_deref()
                        .is_none_or(|t| question.task_statement() == t)
                    && filter.difficulty.is_none_or(|d| question.difficulty() == d);
                assert_eq!(result.contains(question), expected, "{filter:?} / {question:?}");
            }
        }
    }

    #[test]
    fn exam_and_difficulty_scenario_yields_one_question() {
        let result =
            bank().filter(&QuestionFilter::for_exam("A").with_difficulty(Difficulty::Medium));
        assert_eq!(ids(&result), vec!["a2"]);
    }

    #[test]
    fn task_statements_are_sorted_distinct_and_scoped() {
        let bank = bank();
        assert_eq!(bank.available_task_statements(Some("A")), vec!["Task 1", "Task 2"]);
        assert_eq!(bank.available_task_statements(Some("B")), vec!["Task 9"]);
        assert_eq!(
            bank.available_task_statements(None),
            vec!["Loose", "Task 1", "Task 2", "Task 9"]
        );
    }

    #[test]
    fn exams_lists_tagged_questions_only() {
        let exams = bank().exams();
        assert_eq!(
            exams,
            vec![
                ExamSummary { name: "A".into(), question_count: 3 },
                ExamSummary { name: "B".into(), question_count: 1 },
            ]
        );
    }

    #[test]
    fn question_counts_group_by_difficulty_and_task() {
        let counts = bank().question_counts(Some("A"));
        assert_eq!(counts.total, 3);
        assert_eq!(counts.by_difficulty.get(&Difficulty::Easy), Some(&1));
        assert_eq!(counts.by_task.get("Task 2"), Some(&2));
        assert_eq!(counts.by_task.get("Task 9"), None);
    }

    #[test]
    fn search_is_case_insensitive_over_stem_and_task() {
        let bank = bank();
        assert_eq!(ids(&bank.search("stem for A2")), vec!["a2"]);
        assert_eq!(ids(&bank.search("loose")), vec!["x1"]);
        assert!(bank.search("kubernetes").is_empty());
    }

    #[test]
    fn random_questions_caps_count() {
        let bank = bank();
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(bank.random_questions(2, Some("A"), &mut rng).len(), 2);
        let all = bank.random_questions(10, Some("A"), &mut rng);
        assert_eq!(ids(&all), vec!["a1", "a2", "a3"]);
    }

    #[test]
    fn resolve_handles_missing_and_unknown_ids() {
        let bank = bank();
        let mut record =
            ActivityRecord::for_answer(&bank.questions()[1], None, ChoiceKey::A, fixed_now());
        assert_eq!(bank.resolve(&record).and_then(Question::id), Some(&QuestionId::new("a2")));

        record.question_id = QuestionId::new("deleted");
        assert!(bank.resolve(&record).is_none());

        record.question_id = QuestionId::unknown();
        assert!(bank.resolve(&record).is_none());
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        let input: Vec<u32> = (0..50).collect();
        let mut out = shuffled(input.clone(), &mut rng);
        out.sort_unstable();
        assert_eq!(out, input);
    }

    #[test]
    fn shuffle_handles_empty_and_single() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(shuffled(Vec::<u8>::new(), &mut rng).is_empty());
        assert_eq!(shuffled(vec![9], &mut rng), vec![9]);
    }

    #[test]
    fn shuffle_is_uniform_over_permutations() {
        const RUNS: usize = 60_000;
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut seen: HashMap<Vec<u8>, usize> = HashMap::new();
        for _ in 0..RUNS {
            *seen.entry(shuffled(vec![1, 2, 3], &mut rng)).or_default() += 1;
        }

        assert_eq!(seen.len(), 6);
        let expected = RUNS / 6;
        for (perm, count) in &seen {
            let deviation = count.abs_diff(expected);
            assert!(deviation < expected / 20, "{perm:?} appeared {count} times");
        }
    }
}

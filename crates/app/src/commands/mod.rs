use std::io::{BufRead, Write};

use quiz_core::model::QuizStats;
use services::{AppServices, HistoryOverview};

pub mod quiz;

pub use quiz::run_quiz;

fn score(stats: &QuizStats) -> String {
    format!("{}/{} ({}%)", stats.correct, stats.total, stats.percentage)
}

/// Exams in the dataset with per-difficulty question counts.
pub fn list_exams<W: Write>(app: &AppServices, out: &mut W) -> anyhow::Result<()> {
    let bank = app.bank();
    let exams = bank.exams();
    if exams.is_empty() {
        writeln!(out, "No exams found in the question dataset.")?;
        return Ok(());
    }
    for exam in exams {
        let counts = bank.question_counts(Some(&exam.name));
        let by_difficulty: Vec<String> = counts
            .by_difficulty
            .iter()
            .map(|(difficulty, n)| format!("{difficulty} {n}"))
            .collect();
        writeln!(
            out,
            "{} ({} questions: {})",
            exam.name,
            exam.question_count,
            by_difficulty.join(", ")
        )?;
    }
    Ok(())
}

/// Task statements for an exam with their question counts.
pub fn list_tasks<W: Write>(
    app: &AppServices,
    exam: Option<&str>,
    out: &mut W,
) -> anyhow::Result<()> {
    let counts = app.bank().question_counts(exam);
    if counts.by_task.is_empty() {
        writeln!(out, "No task statements found.")?;
    }
    for (task, n) in &counts.by_task {
        writeln!(out, "{task} ({n})")?;
    }
    Ok(())
}

pub async fn show_stats<W: Write>(
    app: &AppServices,
    exam: Option<&str>,
    json: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let overview = app.history().overview(exam, Some(0)).await;
    if json {
        serde_json::to_writer_pretty(&mut *out, &overview)?;
        writeln!(out)?;
        return Ok(());
    }
    render_summary(&overview, out)
}

fn render_summary<W: Write>(overview: &HistoryOverview, out: &mut W) -> anyhow::Result<()> {
    writeln!(out, "Overall: {}", score(&overview.stats))?;
    if overview.stats.is_empty() {
        return Ok(());
    }
    writeln!(out, "\nBy difficulty:")?;
    for entry in &overview.by_difficulty {
        writeln!(out, "  {:<8} {}", entry.difficulty.as_str(), score(&entry.stats))?;
    }
    writeln!(out, "\nBy task (weakest first):")?;
    for entry in &overview.by_task {
        writeln!(out, "  {} {}", score(&entry.stats), entry.task_statement)?;
    }
    Ok(())
}

pub async fn show_history<W: Write>(
    app: &AppServices,
    exam: Option<&str>,
    limit: usize,
    json: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let overview = app.history().overview(exam, Some(limit)).await;
    if json {
        serde_json::to_writer_pretty(&mut *out, &overview.entries)?;
        writeln!(out)?;
        return Ok(());
    }
    if overview.entries.is_empty() {
        writeln!(out, "No answers recorded yet.")?;
        return Ok(());
    }
    for entry in &overview.entries {
        let record = &entry.record;
        let mark = if record.is_correct() { "correct" } else { "wrong" };
        writeln!(
            out,
            "{} {:<7} [{}] {} ({})",
            record.timestamp(),
            mark,
            record.difficulty,
            record.task_statement,
            record.question_id
        )?;
        match &entry.question {
            Some(question) => writeln!(out, "    {}", question.stem())?,
            None => writeln!(out, "    (question no longer in the dataset)")?,
        }
    }
    Ok(())
}

/// Delete history after confirmation unless `yes` is set.
pub async fn clear_history<R: BufRead, W: Write>(
    app: &AppServices,
    exam: Option<&str>,
    yes: bool,
    input: &mut R,
    out: &mut W,
) -> anyhow::Result<()> {
    if !yes {
        let scope = exam.map_or_else(|| "all exams".to_owned(), |e| format!("exam {e}"));
        write!(out, "Permanently delete quiz history for {scope}? [y/N] ")?;
        out.flush()?;
        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if !matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
            writeln!(out, "Aborted.")?;
            return Ok(());
        }
    }
    let deleted = app.history().clear(exam).await;
    writeln!(out, "Deleted {deleted} record(s).")?;
    Ok(())
}

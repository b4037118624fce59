use std::io::{BufRead, Write};

use quiz_core::model::ChoiceKey;
use services::{QuizPhase, QuizSession, SubmissionOutcome};

/// Interactive quiz over line-based input.
///
/// Returns when the user quits, input ends or the filters match nothing.
pub async fn run_quiz<R: BufRead, W: Write>(
    quiz: &mut QuizSession,
    input: &mut R,
    out: &mut W,
) -> anyhow::Result<()> {
    loop {
        match quiz.phase() {
            QuizPhase::Loading => {
                quiz.load().await;
            }
            QuizPhase::NoQuestions => {
                writeln!(out, "No questions match these filters. Try relaxing them.")?;
                return Ok(());
            }
            QuizPhase::Ready | QuizPhase::AnswerSelected => {
                render_question(quiz, out)?;
                let Some(line) = prompt(input, out, "Answer [A-D], [p]revious, [q]uit: ")? else {
                    return Ok(());
                };
                match line.to_ascii_lowercase().as_str() {
                    "q" => return Ok(()),
                    "p" => quiz.previous_question()?,
                    other => match other.parse::<ChoiceKey>() {
                        Ok(choice) => {
                            quiz.select_answer(choice)?;
                            let outcome = quiz.submit_answer().await?;
                            render_outcome(quiz, &outcome, out)?;
                        }
                        Err(err) => writeln!(out, "{err}")?,
                    },
                }
            }
            QuizPhase::Submitted => {
                let next = if quiz.flags().is_last_question {
                    "Press Enter to finish, [q]uit: "
                } else {
                    "Press Enter for the next question, [q]uit: "
                };
                match prompt(input, out, next)? {
                    Some(line) if !line.eq_ignore_ascii_case("q") => {
                        quiz.next_question()?;
                    }
                    _ => return Ok(()),
                }
            }
            QuizPhase::Complete => {
                if let Some(score) = quiz.final_score() {
                    writeln!(
                        out,
                        "\nQuiz complete. Score: {}/{} ({}%)",
                        score.correct, score.total, score.percentage
                    )?;
                }
                match prompt(input, out, "[r]estart or [q]uit: ")? {
                    Some(line) if line.eq_ignore_ascii_case("r") => quiz.restart()?,
                    _ => return Ok(()),
                }
            }
        }
    }
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    message: &str,
) -> anyhow::Result<Option<String>> {
    write!(out, "{message}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_owned()))
}

fn render_question<W: Write>(quiz: &QuizSession, out: &mut W) -> anyhow::Result<()> {
    let Some(question) = quiz.current_question() else {
        return Ok(());
    };
    let progress = quiz.progress();
    writeln!(
        out,
        "\nQuestion {}/{} [{}] {}",
        progress.position,
        progress.total,
        question.difficulty(),
        question.task_statement()
    )?;
    writeln!(out, "{}", question.stem())?;
    for (key, text) in question.answers().iter() {
        writeln!(out, "  {key}) {text}")?;
    }
    Ok(())
}

fn render_outcome<W: Write>(
    quiz: &QuizSession,
    outcome: &SubmissionOutcome,
    out: &mut W,
) -> anyhow::Result<()> {
    if outcome.is_correct {
        writeln!(out, "Correct!")?;
    } else {
        writeln!(
            out,
            "Incorrect. You chose {}, the answer is {}.",
            outcome.selected, outcome.correct_answer
        )?;
    }
    if !outcome.explanation.is_empty() {
        writeln!(out, "{}", outcome.explanation)?;
    }
    if outcome.record_id.is_none() {
        writeln!(out, "(answer could not be saved)")?;
    }
    let stats = quiz.stats();
    writeln!(
        out,
        "Running score: {}/{} ({}%)",
        stats.correct, stats.total, stats.percentage
    )?;
    Ok(())
}

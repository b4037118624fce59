//! certquiz: terminal self-quiz for certification exams.

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quiz_core::model::Difficulty;
use services::{AppServices, Clock, QuizFilter};
use tracing_subscriber::EnvFilter;

mod commands;
mod db;

#[derive(Parser)]
#[command(name = "certquiz", version, about = "Practice certification exam questions")]
struct Cli {
    /// SQLite database for answer history
    #[arg(long, env = "CERTQUIZ_DB_URL", default_value = "sqlite:certquiz.sqlite3")]
    db: String,

    /// Question dataset (JSON)
    #[arg(long, env = "CERTQUIZ_QUESTIONS", default_value = "data/questions.json")]
    questions: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List exams in the question dataset
    Exams,
    /// List task statements, optionally for one exam
    Tasks {
        #[arg(long)]
        exam: Option<String>,
    },
    /// Take a quiz
    Quiz {
        #[arg(long)]
        exam: Option<String>,
        #[arg(long)]
        task: Option<String>,
        /// EASY, MEDIUM or HARD
        #[arg(long)]
        difficulty: Option<Difficulty>,
        /// Only questions not answered before
        #[arg(long)]
        unseen: bool,
        /// Maximum number of questions
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show accuracy overall, by difficulty and by task
    Stats {
        #[arg(long)]
        exam: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Show recent answers
    History {
        #[arg(long)]
        exam: Option<String>,
        #[arg(long, default_value = "20")]
        limit: usize,
        #[arg(long)]
        json: bool,
    },
    /// Delete answer history
    Clear {
        #[arg(long)]
        exam: Option<String>,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Open + migrate SQLite and load questions before dispatching.
    let db_url = db::normalize_sqlite_url(&cli.db);
    db::prepare_sqlite_file(&db_url)?;
    tracing::debug!(%db_url, questions = %cli.questions.display(), "starting");
    let app = AppServices::bootstrap(&db_url, cli.questions, Clock::default_clock()).await?;

    let mut out = io::stdout().lock();
    match cli.command {
        Command::Exams => commands::list_exams(&app, &mut out),
        Command::Tasks { exam } => commands::list_tasks(&app, exam.as_deref(), &mut out),
        Command::Quiz {
            exam,
            task,
            difficulty,
            unseen,
            limit,
        } => {
            let mut filter = QuizFilter {
                exam,
                task_statement: task,
                difficulty,
                limit,
                ..QuizFilter::default()
            };
            if unseen {
                filter = filter.unseen_only();
            }
            let mut quiz = app.quiz_session(filter);
            commands::run_quiz(&mut quiz, &mut io::stdin().lock(), &mut out).await
        }
        Command::Stats { exam, json } => {
            commands::show_stats(&app, exam.as_deref(), json, &mut out).await
        }
        Command::History { exam, limit, json } => {
            commands::show_history(&app, exam.as_deref(), limit, json, &mut out).await
        }
        Command::Clear { exam, yes } => {
            commands::clear_history(&app, exam.as_deref(), yes, &mut io::stdin().lock(), &mut out)
                .await
        }
    }
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so quiz output on stdout stays clean.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("certquiz=info,services=info"));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        eprintln!("error: {err:#}");
        std::process::exit(2);
    }
}

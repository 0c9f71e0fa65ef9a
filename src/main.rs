use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use clap::{Parser, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};
use gat_exam::{
    Difficulty, Exam, ExamConfig, ExamError, ExamPreset, HistoryFile, InMemoryBank,
    QuestionFilter, Subject, generate_questions, load_history, load_questions_from_json,
};
use tracing_subscriber::EnvFilter;

const DEFAULT_HISTORY_PATH: &str = "gat-history.jsonl";

#[derive(Parser, Debug)]
#[command(version, about = "Timed GAT practice exams in the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Take a timed exam
    Take {
        /// Subject: math or arabic
        #[arg(short, long, default_value = "math")]
        subject: Subject,

        /// Difficulty: easy, medium or hard (omit for a mixed exam)
        #[arg(short, long)]
        difficulty: Option<Difficulty>,

        /// JSON file to load the questions from (uses built-in questions if omitted)
        #[arg(short, long)]
        questions: Option<PathBuf>,

        /// Override the time limit, in minutes
        #[arg(long)]
        duration_minutes: Option<u32>,

        /// File that finished exams are appended to
        #[arg(long, default_value = DEFAULT_HISTORY_PATH)]
        history: PathBuf,

        /// Write logs to this file (the terminal is taken by the exam)
        #[arg(long)]
        log_file: Option<PathBuf>,
    },

    /// List past exam results
    History {
        /// History file to read
        #[arg(long, default_value = DEFAULT_HISTORY_PATH)]
        history: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Take {
            subject,
            difficulty,
            questions,
            duration_minutes,
            history,
            log_file,
        } => {
            if let Some(path) = &log_file {
                init_file_logging(path);
            }
            take(subject, difficulty, questions, duration_minutes, history).await
        }
        Command::History { history } => {
            init_stderr_logging();
            show_history(&history)
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn take(
    subject: Subject,
    difficulty: Option<Difficulty>,
    questions: Option<PathBuf>,
    duration_minutes: Option<u32>,
    history: PathBuf,
) -> Result<(), ExamError> {
    let bank = match questions {
        Some(path) => InMemoryBank::new(load_questions_from_json(path)?),
        None => InMemoryBank::new(generate_questions(
            subject,
            difficulty,
            ExamPreset::for_difficulty(difficulty).question_count,
            &mut rand::rng(),
        )),
    };
    let duration = duration_minutes.map(ExamConfig::from_minutes).transpose()?;
    let filter = QuestionFilter::new(subject, difficulty);

    let exam = Exam::assemble(&bank, filter, duration, HistoryFile::new(&history))?;
    if let Some(result) = exam.run().await? {
        println!(
            "{}: {}/{} correct ({}%, grade {}) in {}",
            result.title,
            result.correct_count,
            result.total_questions,
            result.score,
            result.grade().letter(),
            result.formatted_time_spent()
        );
    }
    Ok(())
}

fn show_history(path: &Path) -> Result<(), ExamError> {
    let results = load_history(path)?;
    if results.is_empty() {
        println!("No exams recorded in {}", path.display());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        "Submitted",
        "Subject",
        "Difficulty",
        "Correct",
        "Score",
        "Grade",
        "Time",
    ]);
    for result in &results {
        table.add_row(vec![
            result.submitted_at.format("%Y-%m-%d %H:%M").to_string(),
            result.subject.label().to_string(),
            result
                .difficulty
                .map_or_else(|| "mixed".to_string(), |d| d.to_string()),
            format!("{}/{}", result.correct_count, result.total_questions),
            format!("{}%", result.score),
            result.grade().letter().to_string(),
            result.formatted_time_spent(),
        ]);
    }
    println!("{table}");
    Ok(())
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

fn init_file_logging(path: &Path) {
    match File::create(path) {
        Ok(file) => tracing_subscriber::fmt()
            .with_env_filter(env_filter())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init(),
        Err(e) => eprintln!("Cannot open log file {}: {}", path.display(), e),
    }
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

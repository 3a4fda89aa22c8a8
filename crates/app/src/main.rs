use std::error::Error;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::DateTime;
use quiz_core::model::{AnsweredQuestion, RankingRecord, ScoreSummary, TopicKey};
use services::{
    AnswerFeedback, Clock, FlowEvent, QuizFlow, QuizSettings, Screen, build_sqlite_flow,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

const DEFAULT_DB_URL: &str = "sqlite://quiz.sqlite3";
const DEFAULT_QUESTIONS_DIR: &str = "assets/questions";
const DEFAULT_REVEAL_MS: u64 = 800;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidRevealMs { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidRevealMs { raw } => write!(f, "invalid --reveal-ms value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quiz [--db <sqlite_url>] [--questions <dir>] [--nickname <name>]");
    eprintln!("       [--reveal-ms <millis>] [--shuffle] [--newest-first]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --questions {DEFAULT_QUESTIONS_DIR}");
    eprintln!("  --reveal-ms {DEFAULT_REVEAL_MS}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_QUESTIONS_DIR, QUIZ_NICKNAME, QUIZ_REVEAL_MS, QUIZ_SHUFFLE");
    eprintln!("  RUST_LOG controls log output");
}

struct Args {
    db_url: String,
    questions_dir: PathBuf,
    reveal_delay: Duration,
    settings: QuizSettings,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("QUIZ_DB_URL")
            .ok()
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let mut questions_dir = std::env::var("QUIZ_QUESTIONS_DIR")
            .map_or_else(|_| PathBuf::from(DEFAULT_QUESTIONS_DIR), PathBuf::from);
        let mut reveal_ms = std::env::var("QUIZ_REVEAL_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REVEAL_MS);

        let mut settings = QuizSettings::default()
            .with_shuffle_questions(std::env::var("QUIZ_SHUFFLE").is_ok_and(|v| env_flag(&v)));
        if let Ok(nickname) = std::env::var("QUIZ_NICKNAME") {
            settings = settings.with_nickname(nickname);
        }

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--questions" => {
                    questions_dir = PathBuf::from(require_value(args, "--questions")?);
                }
                "--nickname" => {
                    settings = settings.with_nickname(require_value(args, "--nickname")?);
                }
                "--reveal-ms" => {
                    let value = require_value(args, "--reveal-ms")?;
                    reveal_ms = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidRevealMs { raw: value.clone() })?;
                }
                "--shuffle" => settings = settings.with_shuffle_questions(true),
                "--newest-first" => settings = settings.with_notebook_newest_first(true),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            questions_dir,
            reveal_delay: Duration::from_millis(reveal_ms),
            settings,
        })
    }
}

fn env_flag(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "yes" | "on")
}

fn normalize_sqlite_url(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_owned();
    }

    let path = std::path::Path::new(trimmed.strip_prefix("sqlite:").unwrap_or(trimmed));
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .and_then(|rest| rest.split('?').next())
        .filter(|path| !path.is_empty())
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

/// Rings the terminal bell on a wrong answer.
struct TerminalFeedback;

impl AnswerFeedback for TerminalFeedback {
    fn on_correct(&self) {}

    fn on_incorrect(&self) {
        print!("\x07");
    }
}

/// Line-oriented driver for the quiz flow.
struct Terminal {
    flow: QuizFlow,
    input: Lines<BufReader<Stdin>>,
    reveal_delay: Duration,
}

impl Terminal {
    async fn run(&mut self) -> Result<(), Box<dyn Error>> {
        loop {
            let keep_going = match self.flow.screen() {
                Screen::Home => self.home().await?,
                Screen::Quiz { .. } => self.quiz().await?,
                Screen::Result { .. } => self.result().await?,
                Screen::Notebook => self.notebook().await?,
                Screen::Ranking => self.ranking().await?,
            };
            if !keep_going {
                return Ok(());
            }
        }
    }

    async fn prompt(&mut self, text: &str) -> Result<Option<String>, std::io::Error> {
        print!("{text}");
        std::io::stdout().flush()?;
        Ok(self
            .input
            .next_line()
            .await?
            .map(|line| line.trim().to_owned()))
    }

    async fn home(&mut self) -> Result<bool, Box<dyn Error>> {
        let topics: Vec<(TopicKey, String)> = self
            .flow
            .service()
            .catalog()
            .topics()
            .iter()
            .map(|topic| (topic.key().clone(), topic.label().to_owned()))
            .collect();

        println!();
        println!("== Quiz ==");
        for (i, (_, label)) in topics.iter().enumerate() {
            println!("  {}) {label}", i + 1);
        }
        println!("  n) wrong-answer notebook");
        println!("  r) ranking");
        println!("  q) quit");

        let Some(choice) = self.prompt("> ").await? else {
            return Ok(false);
        };
        match choice.as_str() {
            "q" => return Ok(false),
            "n" => {
                self.flow.open_notebook()?;
            }
            "r" => {
                self.flow.open_ranking()?;
            }
            other => match parse_choice(other, topics.len()) {
                Some(i) => {
                    if let Err(err) = self.flow.select_topic(&topics[i].0).await {
                        println!("could not start quiz: {err}");
                    }
                }
                None => println!("unknown choice: {other}"),
            },
        }
        Ok(true)
    }

    async fn quiz(&mut self) -> Result<bool, Box<dyn Error>> {
        let option_count = {
            let Some(session) = self.flow.session() else {
                return Ok(true);
            };
            let Some(question) = session.current_question() else {
                return Ok(true);
            };
            let position = session.current_index().map_or(0, |i| i + 1);

            println!();
            println!("[{}] {position}/{}", session.topic(), session.questions().len());
            println!("{}", question.text());
            for (i, option) in question.options().iter().enumerate() {
                println!("  {}) {option}", i + 1);
            }
            question.option_count()
        };

        let Some(line) = self.prompt("answer (h = home)> ").await? else {
            return Ok(false);
        };
        if line == "h" {
            self.flow.go_home();
            return Ok(true);
        }
        let Some(index) = parse_choice(&line, option_count) else {
            println!("pick a number from 1 to {option_count}");
            return Ok(true);
        };

        if let FlowEvent::AnswerRevealed(outcome) = self.flow.select_option(index)? {
            if outcome.is_correct {
                println!("correct!");
            } else {
                println!("wrong, the answer was {}", outcome.correct_index + 1);
            }
        }

        tokio::time::sleep(self.reveal_delay).await;
        if let FlowEvent::SessionFinished(finished) = self.flow.confirm_advance().await? {
            if !finished.ranking_recorded {
                log::info!("session was not added to the ranking");
            }
        }
        Ok(true)
    }

    async fn result(&mut self) -> Result<bool, Box<dyn Error>> {
        if let Screen::Result {
            summary,
            wrong_list,
        } = self.flow.screen()
        {
            print_summary(summary, wrong_list);
        }

        println!("  h) home  n) notebook  r) ranking  q) quit");
        let Some(choice) = self.prompt("> ").await? else {
            return Ok(false);
        };
        match choice.as_str() {
            "q" => return Ok(false),
            "n" => {
                self.flow.open_notebook()?;
            }
            "r" => {
                self.flow.open_ranking()?;
            }
            _ => {
                self.flow.go_home();
            }
        }
        Ok(true)
    }

    async fn notebook(&mut self) -> Result<bool, Box<dyn Error>> {
        let entries: Vec<AnsweredQuestion> =
            self.flow.notebook_entries().into_iter().cloned().collect();

        println!();
        println!("== Wrong-answer notebook ({}) ==", entries.len());
        for (i, entry) in entries.iter().enumerate() {
            print_entry(i + 1, entry);
        }
        println!("  d <n>) delete entry  h) home");

        let Some(line) = self.prompt("> ").await? else {
            return Ok(false);
        };
        if let Some(raw) = line.strip_prefix('d') {
            match parse_choice(raw.trim(), entries.len()) {
                Some(i) => {
                    self.flow.delete_notebook_entry(&entries[i]).await?;
                }
                None => println!("no entry {}", raw.trim()),
            }
        } else {
            self.flow.go_home();
        }
        Ok(true)
    }

    async fn ranking(&mut self) -> Result<bool, Box<dyn Error>> {
        let board = self.flow.leaderboard().await;

        println!();
        println!("== Ranking ==");
        if board.is_empty() {
            println!("  no results yet");
        }
        for (i, record) in board.iter().enumerate() {
            print_record(i + 1, record);
        }
        println!("  c) clear  h) home");

        let Some(line) = self.prompt("> ").await? else {
            return Ok(false);
        };
        if line == "c" {
            if let FlowEvent::RankingsCleared { cleared: false } =
                self.flow.clear_rankings().await?
            {
                println!("ranking could not be cleared");
            }
        } else {
            self.flow.go_home();
        }
        Ok(true)
    }
}

/// Map a 1-based menu choice to an index below `len`.
fn parse_choice(raw: &str, len: usize) -> Option<usize> {
    raw.parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .filter(|&i| i < len)
}

fn print_summary(summary: &ScoreSummary, wrong_list: &[AnsweredQuestion]) {
    println!();
    println!("== {} ==", summary.topic());
    println!(
        "score {}  correct {}  wrong {}  of {}",
        summary.score(),
        summary.correct_count(),
        summary.wrong_count(),
        summary.total_questions()
    );
    for (i, entry) in wrong_list.iter().enumerate() {
        print_entry(i + 1, entry);
    }
}

fn print_entry(position: usize, entry: &AnsweredQuestion) {
    let question = entry.question();
    let correct = question.option(question.answer_index()).unwrap_or_default();
    let chosen = entry.selected_option().unwrap_or("-");
    println!("  {position}. [{}] {}", entry.topic(), question.text());
    println!("     answered: {chosen}  correct: {correct}");
}

fn print_record(position: usize, record: &RankingRecord) {
    let when = DateTime::from_timestamp_millis(record.timestamp)
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    println!(
        "  {position}. {:<12} {:<20} {:>3}  ({}/{})  {when}",
        record.nickname.as_deref().unwrap_or("anonymous"),
        record.topic,
        record.score,
        record.correct_count,
        record.total_questions
    );
}

async fn run() -> Result<(), Box<dyn Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&args.db_url)?;
    log::debug!(
        "opening {} with questions from {}",
        args.db_url,
        args.questions_dir.display()
    );
    let flow = build_sqlite_flow(
        &args.db_url,
        args.questions_dir,
        Clock::default_clock(),
        args.settings,
        Arc::new(TerminalFeedback),
    )
    .await?;

    let mut terminal = Terminal {
        flow,
        input: BufReader::new(tokio::io::stdin()).lines(),
        reveal_delay: args.reveal_delay,
    };
    terminal.run().await
}

#[tokio::main]
async fn main() {
    pretty_env_logger::init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

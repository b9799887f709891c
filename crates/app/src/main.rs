use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use client::{ApiConfig, Backend};
use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{Clock, QuizCatalogService, QuizSessionService};
use study_core::model::{NoteId, QuizId};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt as log_fmt};
use ui::{App, UiApp, build_app_context};
use ui::vm::{map_note_cards, map_quiz_cards, stats_label};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidId { flag: &'static str, raw: String },
    InvalidTimeout { raw: String },
    MissingQuizId,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidId { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidTimeout { raw } => {
                write!(f, "invalid --timeout value: {raw} (expected whole seconds above 0)")
            }
            ArgsError::MissingQuizId => write!(f, "stats requires --quiz-id"),
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

fn parse_id(flag: &'static str, raw: String) -> Result<u64, ArgsError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ArgsError::InvalidId { flag, raw })
}

struct DesktopApp {
    note_id: NoteId,
    quiz_sessions: Arc<QuizSessionService>,
    quiz_catalog: Arc<QuizCatalogService>,
}

impl UiApp for DesktopApp {
    fn current_note_id(&self) -> NoteId {
        self.note_id
    }

    fn quiz_sessions(&self) -> Arc<QuizSessionService> {
        Arc::clone(&self.quiz_sessions)
    }

    fn quiz_catalog(&self) -> Arc<QuizCatalogService> {
        Arc::clone(&self.quiz_catalog)
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui    [--api-url <url>] [--token <token>] [--note-id <id>]");
    eprintln!("  cargo run -p app -- notes [--api-url <url>] [--token <token>]");
    eprintln!("  cargo run -p app -- list  [--api-url <url>] [--token <token>] [--note-id <id>]");
    eprintln!("  cargo run -p app -- stats --quiz-id <id> [--api-url <url>] [--token <token>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api-url {}", ApiConfig::DEFAULT_BASE_URL);
    eprintln!("  --note-id 1");
    eprintln!("  --timeout {}", ApiConfig::DEFAULT_TIMEOUT.as_secs());
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  STUDY_API_URL, STUDY_API_TOKEN, STUDY_API_TIMEOUT_SECS, STUDY_NOTE_ID, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Notes,
    List,
    Stats,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "notes" => Some(Self::Notes),
            "list" => Some(Self::List),
            "stats" => Some(Self::Stats),
            _ => None,
        }
    }
}

struct Args {
    api: ApiConfig,
    note_id: NoteId,
    quiz_id: Option<QuizId>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut api = ApiConfig::from_env();
        let mut note_id = std::env::var("STUDY_NOTE_ID")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map_or_else(|| NoteId::new(1), NoteId::new);
        let mut quiz_id = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api-url" => {
                    api.base_url = require_value(args, "--api-url")?;
                }
                "--token" => {
                    let value = require_value(args, "--token")?;
                    api = api.with_token(Some(value).filter(|token| !token.trim().is_empty()));
                }
                "--timeout" => {
                    let value = require_value(args, "--timeout")?;
                    let secs = value
                        .trim()
                        .parse::<u64>()
                        .ok()
                        .filter(|secs| *secs > 0)
                        .ok_or_else(|| ArgsError::InvalidTimeout { raw: value.clone() })?;
                    api = api.with_timeout(Duration::from_secs(secs));
                }
                "--note-id" => {
                    let value = require_value(args, "--note-id")?;
                    note_id = NoteId::new(parse_id("--note-id", value)?);
                }
                "--quiz-id" => {
                    let value = require_value(args, "--quiz-id")?;
                    quiz_id = Some(QuizId::new(parse_id("--quiz-id", value)?));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            api,
            note_id,
            quiz_id,
        })
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    log_fmt().with_env_filter(filter).init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the desktop UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();
    info!(api = %parsed.api.base_url, note_id = %parsed.note_id, "starting");

    let backend = Backend::http(parsed.api)?;
    let quiz_catalog = Arc::new(QuizCatalogService::new(Arc::clone(&backend.catalog)));

    match cmd {
        Command::Ui => {
            let quiz_sessions = Arc::new(QuizSessionService::new(
                Clock::system(),
                Arc::clone(&backend.quizzes),
                Arc::clone(&backend.submissions),
            ));
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                note_id: parsed.note_id,
                quiz_sessions,
                quiz_catalog,
            });
            let context = build_app_context(&app);

            // Some dev setups default to an always-on-top window; turn it off explicitly.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Study")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Notes => {
            let overview = quiz_catalog.overview().await?;
            if overview.is_empty() {
                println!("No quizzes generated yet.");
            }
            for card in map_note_cards(&overview) {
                let notebook = card.subtitle.unwrap_or_default();
                println!("{}\t{}\t{notebook}\t{}", card.note_id, card.title, card.quizzes_label);
            }
            Ok(())
        }
        Command::List => {
            let quizzes = quiz_catalog.list_quizzes(parsed.note_id).await?;
            if quizzes.is_empty() {
                println!("No quizzes for note {}.", parsed.note_id);
            }
            for card in map_quiz_cards(&quizzes) {
                let created = card.created_label.unwrap_or_default();
                println!("{}\t{}\t{created}", card.title, card.questions_label);
            }
            Ok(())
        }
        Command::Stats => {
            let quiz_id = parsed.quiz_id.ok_or(ArgsError::MissingQuizId)?;
            let stats = quiz_catalog.quiz_stats(quiz_id).await?;
            println!("Quiz #{quiz_id}: {}", stats_label(&stats));
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(ToString::to_string);
        Args::parse(&mut iter)
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = parse(&["--timeout", "0"]).err();
        assert!(matches!(err, Some(ArgsError::InvalidTimeout { ref raw }) if raw == "0"));
        assert!(matches!(
            parse(&["--timeout", "soon"]).err(),
            Some(ArgsError::InvalidTimeout { .. })
        ));
    }

    #[test]
    fn parses_ids_and_timeout() {
        let args = parse(&["--timeout", "5", "--note-id", "3", "--quiz-id", "9"]).unwrap();
        assert_eq!(args.api.timeout, Duration::from_secs(5));
        assert_eq!(args.note_id, NoteId::new(3));
        assert_eq!(args.quiz_id, Some(QuizId::new(9)));
    }

    #[test]
    fn missing_value_is_reported() {
        assert!(matches!(
            parse(&["--note-id"]).err(),
            Some(ArgsError::MissingValue { flag: "--note-id" })
        ));
    }
}

mod terminal;

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use quiz_core::model::Level;
use services::{
    Clock, GameService, GameSettings, GeminiHintProvider, HintProvider, LocalHintProvider,
    QuestionStore,
};
use storage::repository::Storage;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidSeed { raw: String },
    InvalidMaxLevel { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidMaxLevel { raw } => write!(f, "invalid --max-level value: {raw}"),
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

#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Json(PathBuf),
    Sqlite(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    source: Source,
    seed: Option<u64>,
    max_level: Option<Level>,
}

impl Args {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut questions = std::env::var("QUIZ_QUESTIONS")
            .map_or_else(|_| PathBuf::from("questions.json"), PathBuf::from);
        let mut db_url = None;
        let mut seed = None;
        let mut max_level = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--questions" => {
                    questions = PathBuf::from(require_value(&mut args, "--questions")?);
                }
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = Some(value);
                }
                "--seed" => {
                    let value = require_value(&mut args, "--seed")?;
                    let parsed = value
                        .parse::<u64>()
                        .map_err(|_| ArgsError::InvalidSeed { raw: value.clone() })?;
                    seed = Some(parsed);
                }
                "--max-level" => {
                    let value = require_value(&mut args, "--max-level")?;
                    let parsed = value
                        .parse::<u32>()
                        .ok()
                        .and_then(|v| Level::new(v).ok())
                        .ok_or_else(|| ArgsError::InvalidMaxLevel { raw: value.clone() })?;
                    max_level = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let source = db_url.map_or(Source::Json(questions), Source::Sqlite);
        Ok(Self {
            source,
            seed,
            max_level,
        })
    }
}

const USAGE: &str = "\
Usage:
  cargo run -p app -- [options]

Options:
  --questions <path>   JSON question file (default: questions.json)
  --db <sqlite_url>    Load questions from SQLite instead of JSON
  --seed <u64>         Deterministic question draws and 50/50 picks
  --max-level <n>      Number of levels to win (default: 8)
  -h, --help           Show this help

Environment:
  QUIZ_QUESTIONS, QUIZ_MAX_LEVEL, QUIZ_HINT_TIMEOUT_SECS
  GEMINI_API_KEY, QUIZ_HINT_MODEL, QUIZ_HINT_BASE_URL, RUST_LOG
";

fn print_usage() {
    eprint!("{USAGE}");
}

fn hint_provider() -> Arc<dyn HintProvider> {
    let gemini = GeminiHintProvider::from_env();
    if gemini.enabled() {
        info!("AI support uses the live Gemini provider");
        Arc::new(gemini)
    } else {
        warn!("GEMINI_API_KEY not set; AI support uses local hints");
        Arc::new(LocalHintProvider)
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse(std::env::args().skip(1)).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let mut settings = GameSettings::from_env()?;
    if let Some(max_level) = args.max_level {
        settings = settings.with_max_level(max_level);
    }

    let storage = match &args.source {
        Source::Json(path) => Storage::json_file(path.clone()),
        Source::Sqlite(url) => Storage::sqlite(url).await?,
    };
    let store = QuestionStore::load(storage.questions.as_ref(), settings.max_level()).await?;
    info!(
        questions = store.len(),
        max_level = %store.max_level(),
        "question bank loaded"
    );
    let missing = store.missing_levels();
    if !missing.is_empty() {
        let levels: Vec<String> = missing.iter().map(ToString::to_string).collect();
        warn!(levels = %levels.join(", "), "levels without questions; games can stall there");
    }

    let mut service = GameService::new(
        Arc::new(store),
        hint_provider(),
        settings,
        Clock::default_clock(),
    );
    if let Some(seed) = args.seed {
        service = service.with_rng_seed(seed);
    }

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    terminal::play(&service, &mut input, &mut output).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        Args::parse(args.iter().map(ToString::to_string))
    }

    #[test]
    fn db_flag_switches_source() {
        let args = parse(&["--db", "sqlite:q.sqlite3", "--seed", "7"]).unwrap();
        assert_eq!(args.source, Source::Sqlite("sqlite:q.sqlite3".into()));
        assert_eq!(args.seed, Some(7));
    }

    #[test]
    fn questions_flag_sets_json_path() {
        let args = parse(&["--questions", "bank.json", "--max-level", "3"]).unwrap();
        assert_eq!(args.source, Source::Json(PathBuf::from("bank.json")));
        assert_eq!(args.max_level, Level::new(3).ok());
    }

    #[test]
    fn usage_lists_only_settings_the_binary_honours() {
        assert!(USAGE.contains("QUIZ_HINT_TIMEOUT_SECS"));
        assert!(!USAGE.contains("QUIZ_SESSION_TTL_SECS"));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            parse(&["--max-level", "0"]),
            Err(ArgsError::InvalidMaxLevel { .. })
        ));
        assert!(matches!(
            parse(&["--seed", "x"]),
            Err(ArgsError::InvalidSeed { .. })
        ));
        assert!(matches!(
            parse(&["--db"]),
            Err(ArgsError::MissingValue { flag: "--db" })
        ));
        assert!(matches!(parse(&["--nope"]), Err(ArgsError::UnknownArg(_))));
    }
}

use std::fmt;
use std::path::{Path, PathBuf};

use quiz_core::model::{QuizConfigDraft, SampleMode};
use services::{Clock, QuizWorkflow, Shuffler, load_quiz_str};
use tracing_subscriber::EnvFilter;

mod terminal;

use terminal::Terminal;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    MissingFile,
    UnknownArg(String),
    InvalidNumber { flag: &'static str, raw: String },
    InvalidEnv { name: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFile => write!(f, "missing quiz file"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNumber { flag, raw } => write!(f, "invalid {flag} value: {raw}"),
            ArgsError::InvalidEnv { name, raw } => write!(f, "invalid {name} value: {raw}"),
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
    eprintln!("  quiz run   <file> [--shuffle-questions] [--shuffle-options]");
    eprintln!("                    [--percent <n> | --count <n>] [--seed <u64>]");
    eprintln!("  quiz build <file> [same flags as run]   # print one derived set as JSON");
    eprintln!("  quiz check <file>                       # validate only");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  no shuffling, --percent 100");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_SHUFFLE_QUESTIONS, QUIZ_SHUFFLE_OPTIONS, QUIZ_SIZE_MODE, QUIZ_SIZE,");
    eprintln!("  QUIZ_SEED, QUIZ_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Run,
    Build,
    Check,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "run" => Some(Self::Run),
            "build" => Some(Self::Build),
            "check" => Some(Self::Check),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    file: PathBuf,
    draft: QuizConfigDraft,
    seed: Option<u64>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut draft = QuizConfigDraft {
            shuffle_questions: env_flag("QUIZ_SHUFFLE_QUESTIONS"),
            shuffle_options: env_flag("QUIZ_SHUFFLE_OPTIONS"),
            ..QuizConfigDraft::new()
        };
        if let Ok(raw) = std::env::var("QUIZ_SIZE_MODE") {
            draft.sample_mode = raw.parse().map_err(|_| ArgsError::InvalidEnv {
                name: "QUIZ_SIZE_MODE",
                raw,
            })?;
        }
        if let Ok(raw) = std::env::var("QUIZ_SIZE") {
            draft.sample_size = raw;
        }
        let mut seed = match std::env::var("QUIZ_SEED") {
            Ok(raw) => Some(raw.parse::<u64>().map_err(|_| ArgsError::InvalidEnv {
                name: "QUIZ_SEED",
                raw,
            })?),
            Err(_) => None,
        };
        let mut file = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--shuffle-questions" => draft.shuffle_questions = true,
                "--shuffle-options" => draft.shuffle_options = true,
                "--percent" => {
                    draft.sample_mode = SampleMode::Percentage;
                    draft.sample_size = require_value(args, "--percent")?;
                }
                "--count" => {
                    draft.sample_mode = SampleMode::Count;
                    draft.sample_size = require_value(args, "--count")?;
                }
                "--seed" => {
                    let value = require_value(args, "--seed")?;
                    let parsed: u64 = value.parse().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--seed",
                        raw: value.clone(),
                    })?;
                    seed = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if arg.starts_with("--") || file.is_some() => {
                    return Err(ArgsError::UnknownArg(arg));
                }
                _ => file = Some(PathBuf::from(arg)),
            }
        }

        Ok(Self {
            file: file.ok_or(ArgsError::MissingFile)?,
            draft,
            seed,
        })
    }

    fn shuffler(&self) -> Shuffler {
        self.seed.map_or_else(Shuffler::thread, Shuffler::seeded)
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("QUIZ_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // `run` is the default when the first argument is not a subcommand.
    let cmd = match argv.first().map(String::as_str) {
        None => {
            print_usage();
            return Err(ArgsError::MissingFile.into());
        }
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) => Command::from_arg(first),
    };
    if cmd.is_some() {
        argv.remove(0);
    }
    let cmd = cmd.unwrap_or(Command::Run);

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let name = display_name(&parsed.file);
    let text = std::fs::read_to_string(&parsed.file)?;
    tracing::debug!(file = %parsed.file.display(), ?cmd, "quiz file read");

    if cmd == Command::Check {
        let questions = load_quiz_str(&text)?;
        println!("{name}: {} questions", questions.len());
        return Ok(());
    }

    let mut workflow = QuizWorkflow::new()
        .with_clock(Clock::default_clock())
        .with_shuffler(parsed.shuffler());
    workflow.upload(name, &text)?;
    let attempt = workflow.start(parsed.draft)?;

    match cmd {
        Command::Build => {
            println!("{}", attempt.questions().to_json_pretty()?);
            Ok(())
        }
        Command::Run | Command::Check => {
            let stdin = std::io::stdin();
            let mut terminal = Terminal::new(workflow, stdin.lock(), std::io::stdout().lock());
            terminal.run()?;
            Ok(())
        }
    }
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}

use std::fmt;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use services::{ProgressIndicator, ResultsView, ScenarioView, SessionEvent, WorkshopSession, WorkshopView};
use storage::{FileStore, InMemoryStore, ProgressStore};
use workshop_core::Catalog;
use workshop_core::model::{Technique, TechniqueId};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidStoreDir { raw: String },
    ConflictingBackends,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidStoreDir { raw } => write!(f, "invalid --store-dir value: {raw:?}"),
            ArgsError::ConflictingBackends => {
                write!(f, "--in-memory and --no-storage cannot be combined")
            }
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
    eprintln!("  workshop [practice]          [--store-dir <dir> | --in-memory | --no-storage]");
    eprintln!("  workshop reference [<technique-id>]");
    eprintln!("  workshop results             [--store-dir <dir>]");
    eprintln!("  workshop reset               [--store-dir <dir>]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  WORKSHOP_STORE_DIR   progress directory (default: <data dir>/prompt-workshop)");
    eprintln!("  RUST_LOG             log filter (default: warn)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Practice,
    Reference,
    Results,
    Reset,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "practice" => Some(Self::Practice),
            "reference" => Some(Self::Reference),
            "results" => Some(Self::Results),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Backend {
    Files(PathBuf),
    Memory,
    Unavailable,
}

struct Args {
    backend: Backend,
    technique: Option<TechniqueId>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>, cmd: Command) -> Result<Self, ArgsError> {
        let mut store_dir = std::env::var("WORKSHOP_STORE_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(default_store_dir, PathBuf::from);
        let mut in_memory = false;
        let mut no_storage = false;
        let mut technique = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--store-dir" => {
                    let value = require_value(args, "--store-dir")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidStoreDir { raw: value });
                    }
                    store_dir = PathBuf::from(value);
                }
                "--in-memory" => in_memory = true,
                "--no-storage" => no_storage = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if cmd == Command::Reference && technique.is_none() && !arg.starts_with("--") => {
                    technique = Some(TechniqueId::new(arg));
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let backend = match (in_memory, no_storage) {
            (true, true) => return Err(ArgsError::ConflictingBackends),
            (true, false) => Backend::Memory,
            (false, true) => Backend::Unavailable,
            (false, false) => Backend::Files(store_dir),
        };

        Ok(Self { backend, technique })
    }
}

fn default_store_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("prompt-workshop"))
        .unwrap_or_else(|| PathBuf::from(".prompt-workshop"))
}

fn progress_store(backend: &Backend) -> ProgressStore {
    match backend {
        Backend::Files(dir) => match FileStore::open(dir) {
            Ok(files) => ProgressStore::new(Arc::new(files)),
            Err(err) => {
                // Progress is optional; carry on without it.
                tracing::warn!(dir = %dir.display(), error = %err, "cannot open progress directory");
                ProgressStore::unavailable()
            }
        },
        Backend::Memory => ProgressStore::new(Arc::new(InMemoryStore::new())),
        Backend::Unavailable => ProgressStore::unavailable(),
    }
}

// ─── Rendering ─────────────────────────────────────────────────────────────────

fn print_progress(out: &mut impl Write, progress: ProgressIndicator) -> io::Result<()> {
    writeln!(
        out,
        "{} of {} completed ({}%)",
        progress.completed, progress.total, progress.percentage
    )
}

fn print_scenario(out: &mut impl Write, view: &ScenarioView) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Scenario")?;
    writeln!(out, "{}", view.description)?;
    writeln!(out)?;
    writeln!(out, "Which technique is being used?")?;
    for (i, option) in view.options.iter().enumerate() {
        let marker = match (option.verdict, option.reveal_correct) {
            (Some(true), _) | (None, true) => "✓",
            (Some(false), _) => "✗",
            (None, false) => " ",
        };
        writeln!(out, "  [{}] {marker} {}", i + 1, option.name)?;
    }

    if let Some(feedback) = &view.feedback {
        writeln!(out)?;
        writeln!(out, "{}", if feedback.correct { "✓ Correct!" } else { "✗ Not quite" })?;
        writeln!(out, "{}", feedback.message)?;
    }

    if let Some(rewrite) = &view.rewrite {
        writeln!(out)?;
        writeln!(out, "Bonus: Prompt Rewrite Exercise")?;
        writeln!(out, "Original prompt:\n{}", rewrite.original_prompt)?;
        if !rewrite.draft.is_empty() {
            writeln!(out, "Your improved prompt:\n{}", rewrite.draft)?;
        }
        match &rewrite.sample_improved_prompt {
            Some(sample) => writeln!(out, "Sample improved prompt:\n{sample}")?,
            None => writeln!(out, "(type `d <text>` to draft, `r` to reveal the sample)")?,
        }
    }

    if let Some(advance) = view.advance {
        writeln!(out)?;
        writeln!(out, "[n] {}   [v] view technique   [q] quit", advance.label())?;
    } else {
        writeln!(out, "Pick 1-{} or [q] quit", view.options.len())?;
    }
    Ok(())
}

fn print_results(out: &mut impl Write, results: &ResultsView) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Workshop Results")?;
    writeln!(
        out,
        "{} / {} correct on first attempt ({}%)",
        results.correct, results.total, results.percentage
    )?;
    if !results.identified.is_empty() {
        let names: Vec<&str> = results.identified.iter().map(|c| c.name.as_str()).collect();
        writeln!(out, "✓ Correctly identified: {}", names.join(", "))?;
    }
    if !results.needs_review.is_empty() {
        let names: Vec<String> = results
            .needs_review
            .iter()
            .map(|c| format!("{} ({})", c.name, c.technique_id))
            .collect();
        writeln!(out, "✗ Needs review: {}", names.join(", "))?;
    }
    if results.perfect {
        writeln!(
            out,
            "Perfect score! You identified every technique correctly on the first attempt."
        )?;
    }
    Ok(())
}

fn print_technique(out: &mut impl Write, technique: &Technique) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{} [{}]", technique.name, technique.risk_level)?;
    writeln!(out, "{}", technique.description)?;
    writeln!(out, "Primary vulnerability: {}", technique.primary_vulnerability)?;
    writeln!(out, "Example:\n{}", technique.example)?;
    writeln!(out, "With mitigations:\n{}", technique.mitigated_example)
}

fn print_reference(out: &mut impl Write, catalog: &Catalog) -> io::Result<()> {
    writeln!(out, "Hallucination Risk Summary")?;
    for row in catalog.risk_summary() {
        writeln!(
            out,
            "  {:<30} {:<12} {}",
            row.name, row.risk_level, row.primary_vulnerability
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Mitigation Strategies")?;
    for (i, strategy) in catalog.mitigation_strategies().iter().enumerate() {
        writeln!(out, "  {}. {}: {}", i + 1, strategy.title, strategy.description)?;
    }
    writeln!(out)?;
    writeln!(out, "Cross-Provider Consensus")?;
    for point in catalog.cross_provider_consensus() {
        writeln!(out, "  - {point}")?;
    }
    writeln!(out)?;
    writeln!(out, "Run `workshop reference <technique-id>` for details. Ids:")?;
    let ids: Vec<&str> = catalog.techniques().iter().map(|t| t.id.as_str()).collect();
    writeln!(out, "  {}", ids.join(", "))
}

// ─── Commands ──────────────────────────────────────────────────────────────────

fn practice(session: &mut WorkshopSession) -> io::Result<()> {
    session.set_view(WorkshopView::Practice);
    let stdin = io::stdin();
    let mut out = io::stdout().lock();
    let mut lines = stdin.lock().lines();

    loop {
        if session.show_results() {
            print_results(&mut out, &session.results_view())?;
            writeln!(out, "Restart workshop? [y/N]")?;
            out.flush()?;
            match lines.next().transpose()? {
                Some(answer) if answer.trim().eq_ignore_ascii_case("y") => {
                    session.restart();
                    continue;
                }
                _ => return Ok(()),
            }
        }

        let Some(view) = session.scenario_view() else {
            writeln!(out, "No further scenarios. Run `workshop reset` to start over.")?;
            return Ok(());
        };
        print_progress(&mut out, session.progress_indicator())?;
        print_scenario(&mut out, &view)?;
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next().transpose()? else {
            return Ok(());
        };
        let input = line.trim();

        match input {
            "q" => return Ok(()),
            "n" => {
                if let Some(SessionEvent::Completed) = session.advance() {
                    writeln!(out, "Workshop complete.")?;
                }
            }
            "r" => {
                if let Some(rewrite) = session.exercise_mut().evaluator_mut().and_then(|e| e.rewrite_mut()) {
                    rewrite.reveal();
                }
            }
            "v" => {
                if let Some((id, _)) = view.correct_technique {
                    match session.view_technique(&TechniqueId::new(id)) {
                        Ok(technique) => print_technique(&mut out, technique)?,
                        Err(err) => writeln!(out, "{err}")?,
                    }
                    session.set_view(WorkshopView::Practice);
                }
            }
            _ if input.starts_with("d ") => {
                if let Some(rewrite) = session.exercise_mut().evaluator_mut().and_then(|e| e.rewrite_mut()) {
                    rewrite.set_draft(input[2..].trim());
                }
            }
            _ => {
                let picked = input
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| view.options.get(i));
                match picked {
                    Some(option) => {
                        session.select(&TechniqueId::new(option.technique_id.as_str()));
                    }
                    None => writeln!(out, "Unrecognized input: {input}")?,
                }
            }
        }
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    let cmd = match argv.first().map(String::as_str) {
        None => Command::Practice,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Practice,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            ArgsError::UnknownArg(first.to_owned())
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter, cmd).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let catalog = Arc::new(Catalog::builtin().clone());
    let store = progress_store(&parsed.backend);
    tracing::debug!(backend = ?parsed.backend, available = store.is_available(), "progress store ready");
    let mut session = WorkshopSession::open(catalog, store);
    let mut out = io::stdout().lock();

    match cmd {
        Command::Practice => {
            drop(out);
            practice(&mut session)?;
        }
        Command::Reference => match parsed.technique {
            Some(id) => {
                let technique = session.view_technique(&id)?;
                print_technique(&mut out, technique)?;
            }
            None => print_reference(&mut out, session.catalog())?,
        },
        Command::Results => {
            if session.show_results() {
                print_results(&mut out, &session.results_view())?;
            } else {
                print_progress(&mut out, session.progress_indicator())?;
            }
        }
        Command::Reset => {
            session.restart();
            writeln!(out, "Progress cleared.")?;
        }
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

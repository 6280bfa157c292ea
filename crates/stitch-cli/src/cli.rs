//! CLI definition and command dispatch for stitch.
//!
//! This module defines the command-line interface using `clap` and provides
//! the `run()` function that dispatches commands to the engine.
//!
//! ## Configuration Precedence
//!
//! Settings are resolved with the following precedence (highest to lowest):
//! 1. CLI flags (e.g., `--project-dir`, `--debug`)
//! 2. Environment variables (`STITCH_PROJECT_DIR`, `STITCH_DEBUG`, `STITCH_COLOR`, `STITCH_KB_PATH`)
//! 3. Built-in defaults

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::terminal::{ConsoleReporter, TerminalInput};
use crate::ui::{ColorMode, MessageType, Style};

use stitch_core::constants::EXPECTED_LAYOUT_HINT;
use stitch_core::{InitOutcome, StitchEngine, StitchError};

// ============================================================================
// CLI Definition
// ============================================================================

/// Version string including git commit hash
const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_HASH"), ")");

/// Stitch – assemble project guidelines from a shared knowledge base
#[derive(Parser, Debug)]
#[command(name = "stitch")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable debug logging and full error chains
    #[arg(short, long, global = true, env = "STITCH_DEBUG")]
    pub debug: bool,

    /// Color output mode: always, never, or auto (default: auto)
    #[arg(long, global = true, env = "STITCH_COLOR", default_value = "auto")]
    pub color: String,

    /// Project root holding stitch.yaml (default: current directory)
    #[arg(long, global = true, env = "STITCH_PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create or edit stitch.yaml interactively
    #[command(after_help = r#"EXAMPLES:
    # Prompt for the knowledge base, then pick components
    stitch init

    # Use a local knowledge base checkout
    stitch init --kb-path ../guidelines-kb

    # Use a GitHub shorthand (cloned over SSH)
    stitch init --kb-path my-org/guidelines-kb
"#)]
    Init {
        /// Knowledge base reference: local path, owner/name, or git URL
        #[arg(short = 'p', long, env = "STITCH_KB_PATH")]
        kb_path: Option<String>,
    },

    /// Copy the selected guidelines into the project and render the workflow document
    #[command(after_help = r#"EXAMPLES:
    # Materialize stitch.yaml in the current directory
    stitch sync

    # Sync another project
    stitch sync --project-dir ../service-a
"#)]
    Sync,
}

// ============================================================================
// Entry point
// ============================================================================

/// Parse arguments, run the command, and map the result to an exit code.
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    // - Always show warnings (malformed metadata, cleanup failures)
    // - Show debug info only when --debug is set
    let log_level = if cli.debug { "debug" } else { "warn" };
    // The binary target is `stitch`, so its events carry `stitch::*` targets.
    let filter = format!("stitch_core={},stitch={}", log_level, log_level);

    tracing_subscriber::fmt()
        .with_env_filter(&filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let color_mode = ColorMode::from_flag(&cli.color).unwrap_or_default();
    let style = Style::new(color_mode);

    let result = StitchEngine::with_system_git(&cli.project_dir).and_then(|engine| {
        tracing::debug!(
            "Dispatching {:?} in {}",
            cli.command,
            engine.project().root().display()
        );
        match &cli.command {
            Command::Init { kb_path } => handle_init(&style, &engine, kb_path.as_deref()),
            Command::Sync => handle_sync(&style, &engine),
        }
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(&style, e, cli.debug);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// Command handlers
// ============================================================================

fn handle_init(
    style: &Style,
    engine: &StitchEngine,
    kb_path: Option<&str>,
) -> Result<(), StitchError> {
    let mut input = TerminalInput;
    let reporter = ConsoleReporter::new(style.clone());

    match engine.init(kb_path, &mut input, &reporter)? {
        InitOutcome::Saved { components } => {
            println!(
                "{}",
                style.message(MessageType::Ok, "Configuration saved successfully.")
            );
            println!(
                "{}",
                style.message_detail(
                    "File",
                    &style.file_path(&engine.project().config_path().display().to_string())
                )
            );
            println!(
                "{}",
                style.message_detail("Components", &components.to_string())
            );
            if components > 0 {
                println!(
                    "{}",
                    style.message(
                        MessageType::Hint,
                        "Run `stitch sync` to copy the selected guidelines into the project"
                    )
                );
            }
        }
        InitOutcome::Discarded => {
            println!("{}", style.message(MessageType::Info, "Configuration not saved."));
        }
    }
    Ok(())
}

fn handle_sync(style: &Style, engine: &StitchEngine) -> Result<(), StitchError> {
    let config = engine.load_config()?;
    println!(
        "{}",
        style.message(
            MessageType::Info,
            &style.key_value("Repository", &config.kb.repository)
        )
    );

    let report = engine.sync_with(&config)?;
    let root = engine.project().root();

    for key in &report.components {
        let target = engine.project().component_dir(key);
        println!(
            "{}",
            style.message(
                MessageType::Ok,
                &format!("Synced {} -> {}", key, style.file_path(&relative(root, &target)))
            )
        );
    }

    if report.templates_copied {
        println!("{}", style.message(MessageType::Ok, "Synced template directory"));
    } else {
        println!(
            "{}",
            style.message(MessageType::Skip, "No template directory in knowledge base")
        );
    }

    println!(
        "{}",
        style.message(
            MessageType::Ok,
            &format!(
                "Rendered {}",
                style.file_path(&relative(root, &report.workflow_path))
            )
        )
    );
    println!("{}", style.message(MessageType::Ok, "Sync completed successfully!"));
    if let Some(commit) = &report.kb_commit {
        println!("{}", style.message_detail("KB commit", &style.revision(commit)));
    }
    Ok(())
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

// ============================================================================
// Error reporting
// ============================================================================

/// Print a failure: one line plus a hint normally, the full chain under `--debug`.
fn report_error(style: &Style, err: StitchError, debug: bool) {
    let hint = hint_for(&err);

    if !debug {
        eprintln!("{}", style.error_with_context(&err.to_string(), None, None));
        if let Some(hint) = hint {
            eprintln!(
                "{}",
                style.message(MessageType::Hint, &hint.replace('\n', "\n       "))
            );
        }
        return;
    }

    let detail = err.detail().map(str::to_string);
    eprintln!(
        "{}",
        style.error_with_context(&err.to_string(), detail.as_deref(), hint)
    );
    eprintln!();
    eprintln!("{:?}", anyhow::Error::new(err));
}

/// Actionable next step for known failures.
fn hint_for(err: &StitchError) -> Option<&'static str> {
    match err {
        StitchError::ConfigurationNotFound(_) => {
            Some("Run `stitch init` to create stitch.yaml")
        }
        StitchError::ConfigurationInvalid { .. } => {
            Some("Fix stitch.yaml by hand or run `stitch init` and decline to modify it")
        }
        StitchError::InvalidKbReference { .. } => Some(
            "Use a local directory, an owner/name shorthand, or a git URL (git@..., https://...)",
        ),
        StitchError::InvalidKbRepository { .. } => Some(
            "The knowledge base must be a git checkout containing docs/guidelines (run with --debug for details)",
        ),
        StitchError::CloneFailed { .. } => {
            Some("Check the URL and your git credentials; branches `main` and `master` were tried")
        }
        StitchError::NoComponentsAvailable => Some(EXPECTED_LAYOUT_HINT),
        StitchError::ComponentNotFoundInKb { .. } => {
            Some("Run `stitch init` to pick a variation that exists in the knowledge base")
        }
        StitchError::WorkflowTemplateNotFound(_) => Some(
            "Add docs/guidelines/ai-tools/workflow.md.mustache to the knowledge base",
        ),
        StitchError::Prompt(_) => Some("`stitch init` is interactive; run it from a terminal"),
        _ => None,
    }
}

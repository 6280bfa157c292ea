//! # stitch CLI
//!
//! Command-line interface for stitch.
//!
//! This binary drives `stitch-core`: `stitch init` edits `stitch.yaml`
//! interactively and `stitch sync` materializes it. Run `stitch --help` for
//! usage information.

mod cli;
mod terminal;
pub mod ui;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}

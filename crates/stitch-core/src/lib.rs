//! # stitch-core
//!
//! Core library of **stitch**, which assembles a project's guideline docs
//! from a shared knowledge base (KB) repository.
//!
//! A KB is a git repository laid out as
//! `docs/guidelines/<category>/<component>/<variation>/...`. A project picks one
//! variation per component in `stitch.yaml`, and `sync` copies the picks into
//! the project and renders a workflow document listing them.
//!
//! ## Main Types
//!
//! - [`StitchEngine`] – entry point for `init` and `sync`
//! - [`Project`] – the explicit project root and its derived paths
//! - [`StitchConfig`] – the persisted selection
//! - [`StitchError`] – domain-specific error type
//!
//! ## Modules
//!
//! - [`repository`] – KB reference parsing, cloning, validation
//! - [`catalog`] – scanning the KB directory layout
//! - [`config`] – `stitch.yaml` types and store
//! - [`reconciler`] – the interactive selection state machine
//! - [`sync`] – copying and rendering
//! - [`prompt`] – interaction capabilities; scripted doubles live in
//!   `testing` behind the `testing` feature
//!
//! ## Example
//!
//! ```ignore
//! use stitch_core::StitchEngine;
//! use std::path::Path;
//!
//! let engine = StitchEngine::with_system_git(Path::new("."))?;
//! let report = engine.sync()?;
//! for key in &report.components {
//!     println!("synced {}", key);
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod fsutil;
pub mod git;
pub mod init;
pub mod project;
pub mod prompt;
pub mod reconciler;
pub mod render;
pub mod repository;
pub mod sync;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use catalog::{scan_catalog, KbCatalog};
pub use config::{ComponentKey, ComponentSelection, ConfigStore, StitchConfig};
pub use engine::StitchEngine;
pub use errors::{GitError, StitchError};
pub use git::{GitClient, SystemGit};
pub use init::InitOutcome;
pub use project::Project;
pub use prompt::{InputSource, NoticeKind, Reporter};
pub use reconciler::{Action, ReconcileOutcome};
pub use repository::{KbReference, KbRepository, RepositoryAccessor};
pub use sync::SyncReport;

//! # CLI UI Module
//!
//! Consistent styling for stitch CLI output.
//!
//! ## Design Principles
//!
//! 1. **Scannable**: every line starts with a typed prefix (`[ok]`, `[err]`, ...)
//! 2. **Accessible**: works without colors (respects `NO_COLOR` and non-TTY output)
//! 3. **Progressive**: causes and chains only under `--debug`
//!
//! ## Module Structure
//!
//! - `color`: Color mode detection and terminal capability checks
//! - `style`: Message types, prefixes, and styling functions

pub mod color;
pub mod style;

pub use color::ColorMode;
pub use style::{MessageType, Style};

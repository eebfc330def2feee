//! # CLI Layer
//!
//! One possible UI client for quire. This is the only place that:
//! - Knows about terminal I/O (stdout, stderr, prompts)
//! - Sets up logging and resolves the data directory
//! - Turns `CmdResult`s into colored text
//!
//! ## Structure
//!
//! - `setup`: clap definitions, version string, logger bootstrap
//! - `commands`: `run()` dispatch, `init_context()`, and one `handle_*()` per command
//! - `print`: output formatting

mod commands;
mod print;
mod setup;

pub use commands::run;

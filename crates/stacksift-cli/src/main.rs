//! # stacksift CLI
//!
//! Command-line interface for repository technology detection.
//!
//! Run `stacksift --help` for usage information.

mod cli;
pub mod ui;

use std::process::ExitCode;

fn main() -> ExitCode {
    cli::run()
}

//! Terminal front end: command parsing, prompts, rendering and the shell loop.

pub mod commands;
pub mod io;
pub mod output;
pub mod render;
mod shell;

use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::errors::SmokeError;

pub use shell::{run_cli, CliMode, SCRIPT_ENV};

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] SmokeError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Prompt(#[from] dialoguer::Error),
    #[error(transparent)]
    Readline(#[from] ReadlineError),
}

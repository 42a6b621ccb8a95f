//! Storia command-line interface
//!
//! Argument definitions and command execution for the `storia-cli` binary.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands, GenerateArgs, TextInput};
pub use commands::{ProvidersReport, run};

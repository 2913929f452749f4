//! # push-cli
//!
//! Argument parsing and subcommand handlers for `pushctl`.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Commands};

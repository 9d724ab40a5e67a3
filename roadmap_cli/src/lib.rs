//! Roadmap CLI
//!
//! Command-line front end for [`roadmap_core`].

pub mod cli;

pub use cli::{execute, run, Action, Cli, Outcome};

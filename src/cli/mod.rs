//! CLI module for citypop
//!
//! Resolves configuration from flags and environment, then runs the
//! HTTP service.

mod args;
mod commands;
mod errors;

pub use args::{Backend, Cli, ServiceConfig};
pub use commands::{connector_for, run, serve};
pub use errors::{CliError, CliErrorCode, CliResult};

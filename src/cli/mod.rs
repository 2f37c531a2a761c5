//! Thin command-line front end over the data layer.

pub mod args;
pub mod commands;
pub mod render;

pub use args::{Cli, Command, ReportArg};
pub use commands::execute;

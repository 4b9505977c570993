//! Command line interface

pub mod commands;
pub mod display;
pub mod render;

pub use commands::{CliArgs, Commands};

//! CLI module for supportcrew
//!
//! Handles command-line argument parsing.

pub mod args;

pub use args::{Args, Commands};
